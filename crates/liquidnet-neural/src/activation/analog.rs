// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Analog activation functions: stateless, pure closed forms.

use super::{bound_input, ActivationUnit};
use crate::types::{ActivationKind, Interval, Result};

/// Identity function, y = x.
#[derive(Debug, Clone, Copy)]
pub struct Identity;

impl ActivationUnit for Identity {
    fn kind(&self) -> ActivationKind {
        ActivationKind::Analog
    }

    fn output_range(&self) -> Interval {
        Interval {
            min: -super::SAFE_INPUT_BOUND,
            max: super::SAFE_INPUT_BOUND,
        }
    }

    fn compute(&mut self, x: f64) -> f64 {
        bound_input(x)
    }

    fn compute_derivative(&self, _y: f64, _x: f64) -> f64 {
        1.0
    }
}

/// Hyperbolic tangent, y = tanh(x), range (-1, 1).
#[derive(Debug, Clone, Copy)]
pub struct TanH;

impl ActivationUnit for TanH {
    fn kind(&self) -> ActivationKind {
        ActivationKind::Analog
    }

    fn output_range(&self) -> Interval {
        Interval::SYMMETRIC_UNIT
    }

    fn compute(&mut self, x: f64) -> f64 {
        bound_input(x).tanh()
    }

    fn compute_derivative(&self, y: f64, _x: f64) -> f64 {
        1.0 - y * y
    }
}

/// Logistic sigmoid, y = 1 / (1 + e^-x), range (0, 1).
#[derive(Debug, Clone, Copy)]
pub struct Sigmoid;

impl ActivationUnit for Sigmoid {
    fn kind(&self) -> ActivationKind {
        ActivationKind::Analog
    }

    fn output_range(&self) -> Interval {
        Interval::UNIT
    }

    fn compute(&mut self, x: f64) -> f64 {
        1.0 / (1.0 + (-bound_input(x)).exp())
    }

    fn compute_derivative(&self, y: f64, _x: f64) -> f64 {
        y * (1.0 - y)
    }
}

/// Inverse Square Root Unit, y = x / sqrt(1 + shape·x²).
///
/// Symmetric output range ±1/sqrt(shape); `shape` must be strictly
/// positive. With shape = 1 the derivative at x = 0 is exactly 1.
#[derive(Debug, Clone, Copy)]
pub struct Isru {
    shape: f64,
    bound: f64,
}

impl Isru {
    pub fn new(shape: f64) -> Result<Self> {
        if shape <= 0.0 || !shape.is_finite() {
            return Err(crate::types::NeuralError::NonPositiveShape(shape));
        }
        Ok(Self {
            shape,
            bound: 1.0 / shape.sqrt(),
        })
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }
}

impl ActivationUnit for Isru {
    fn kind(&self) -> ActivationKind {
        ActivationKind::Analog
    }

    fn output_range(&self) -> Interval {
        Interval {
            min: -self.bound,
            max: self.bound,
        }
    }

    fn compute(&mut self, x: f64) -> f64 {
        let x = bound_input(x);
        x / (1.0 + self.shape * x * x).sqrt()
    }

    fn compute_derivative(&self, _y: f64, x: f64) -> f64 {
        let x = bound_input(x);
        (1.0 / (1.0 + self.shape * x * x)).powf(1.5)
    }
}
