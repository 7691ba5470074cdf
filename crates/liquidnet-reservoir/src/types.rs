// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for reservoir composition.

use liquidnet_neural::NeuralError;

/// Result type for reservoir-layer operations
pub type Result<T> = core::result::Result<T, ReservoirError>;

/// Errors raised while building or driving reservoirs.
///
/// Construction errors are fatal configuration inconsistencies: the caller
/// must rebuild with corrected settings.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReservoirError {
    #[error(transparent)]
    Neural(#[from] NeuralError),

    #[error("Reservoir '{0}' defines no pools")]
    NoPools(String),

    #[error("Pool '{0}' defines no neuron groups")]
    NoGroups(String),

    #[error("Duplicate pool name '{0}'")]
    DuplicatePoolName(String),

    #[error("Duplicate group name '{group}' in pool '{pool}'")]
    DuplicateGroupName { pool: String, group: String },

    #[error("Unknown pool '{0}' referenced by a connection")]
    UnknownPool(String),

    #[error("Pool '{pool}': density {density} outside [0, 1]")]
    InvalidDensity { pool: String, density: f64 },

    #[error("Pool '{pool}' has zero neurons (dimensions {dims:?})")]
    EmptyPool { pool: String, dims: [usize; 3] },

    #[error("Group '{group}': relative share {share} must be positive")]
    InvalidShare { group: String, share: f64 },

    #[error("Input field index {index} out of range for {field_count} fields")]
    InputFieldOutOfRange { index: usize, field_count: usize },

    #[error("Input vector length {actual} does not match configured field count {expected}")]
    InputLengthMismatch { expected: usize, actual: usize },

    #[error("Empty input pattern")]
    EmptyPattern,

    #[error("Target spectral radius {0} must be positive")]
    InvalidSpectralRadius(f64),

    #[error("Chain schema ratio {0} outside (0, 1]")]
    InvalidChainRatio(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
