// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Spectral-radius estimation by power iteration.
//!
//! The recurrent weight matrices here are large and sparse-ish; a full
//! eigendecomposition is overkill when only the largest-magnitude
//! eigenvalue is needed. Power iteration with a deterministic start vector
//! converges to it quickly and keeps construction reproducible.

use ndarray::{Array1, Array2};

/// Convergence tolerance on successive radius estimates.
const TOLERANCE: f64 = 1e-6;

/// Iteration cap; non-convergent matrices return the last estimate.
const MAX_ITERATIONS: usize = 1000;

/// Estimate the spectral radius (largest-magnitude eigenvalue) of a square
/// matrix by power iteration.
///
/// Deterministic: the start vector is fixed, so identical matrices yield
/// identical estimates. Returns 0 for empty or all-zero matrices.
pub fn estimate_spectral_radius(matrix: &Array2<f64>) -> f64 {
    let n = matrix.nrows();
    debug_assert_eq!(n, matrix.ncols(), "spectral radius needs a square matrix");
    if n == 0 {
        return 0.0;
    }

    // Fixed, mildly uneven start vector: a constant vector can be
    // orthogonal to the dominant eigenvector for some matrices.
    let mut v = Array1::from_shape_fn(n, |i| 1.0 + (i % 7) as f64 * 0.25);
    let norm = v.dot(&v).sqrt();
    v /= norm;

    let mut radius = 0.0f64;
    for _ in 0..MAX_ITERATIONS {
        let w = matrix.dot(&v);
        let norm = w.dot(&w).sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return 0.0;
        }
        let next = norm;
        v = w / norm;
        if (next - radius).abs() <= TOLERANCE * next.max(1.0) {
            return next;
        }
        radius = next;
    }
    radius
}
