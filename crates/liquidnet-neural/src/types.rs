// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Core type definitions shared by the neural building blocks.

use serde::{Deserialize, Serialize};

/// Result type for neural-layer operations
pub type Result<T> = core::result::Result<T, NeuralError>;

/// Errors raised while constructing neural components.
///
/// All of these are fatal configuration inconsistencies: the caller must
/// rebuild with corrected settings. Nothing here is retried at runtime.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NeuralError {
    #[error("Activation shape parameter must be positive, got {0}")]
    NonPositiveShape(f64),

    #[error("Activation kind mismatch: neuron declared {declared:?}, unit is {actual:?}")]
    ActivationKindMismatch {
        declared: ActivationKind,
        actual: ActivationKind,
    },

    #[error("Signaling restriction {restriction:?} is incompatible with a {kind:?} activation unit")]
    IncompatibleRestriction {
        restriction: SignalingRestriction,
        kind: ActivationKind,
    },

    #[error("Retainment strength must be in [0, 1), got {0}")]
    InvalidRetainment(f64),

    #[error("Invalid interval: min {min} exceeds max {max}")]
    InvalidInterval { min: f64, max: f64 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Computational paradigm of an activation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationKind {
    /// Continuous-valued, stateless transfer function
    Analog,
    /// Event-driven integrate-and-fire unit with internal membrane state
    Spiking,
}

/// Which signal form a caller asks a neuron for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Analog,
    Spiking,
}

/// Role of a neuron inside the network.
///
/// The role fixes the sign of every outgoing synapse weight: excitatory
/// sources drive positive weights, inhibitory sources negative ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeuronRole {
    /// External input relay (always excitatory toward the reservoir)
    Input,
    Excitatory,
    Inhibitory,
}

impl NeuronRole {
    /// Sign applied to outgoing synapse weights.
    #[inline]
    pub fn weight_sign(&self) -> f64 {
        match self {
            NeuronRole::Inhibitory => -1.0,
            NeuronRole::Input | NeuronRole::Excitatory => 1.0,
        }
    }
}

/// Restriction on which signal form a neuron emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalingRestriction {
    /// Emit whichever form the caller requests
    NoRestriction,
    /// Always emit the analog signal, even for spiking requests
    AnalogOnly,
    /// Always emit the spiking signal, even for analog requests
    SpikingOnly,
}

/// Closed numeric interval with clamping and interval-to-interval rescaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
    pub const SYMMETRIC_UNIT: Interval = Interval {
        min: -1.0,
        max: 1.0,
    };

    pub fn new(min: f64, max: f64) -> Result<Self> {
        if min > max {
            return Err(NeuralError::InvalidInterval { min, max });
        }
        Ok(Self { min, max })
    }

    /// Span of the interval (max - min).
    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Clamp `x` into the interval.
    #[inline]
    pub fn bound(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Linearly rescale `x` from `self` into `target`.
    ///
    /// Degenerate (zero-span) source intervals map to the target minimum.
    #[inline]
    pub fn rescale(&self, x: f64, target: &Interval) -> f64 {
        if self.span() == 0.0 {
            return target.min;
        }
        target.min + (self.bound(x) - self.min) / self.span() * target.span()
    }
}

/// Location of a neuron inside the composed structure.
///
/// Flat indices are arena-style dense indices into per-reservoir and
/// per-pool storage; the 3D coordinates exist for distance computation and
/// topology generation, never for ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeuronPlacement {
    /// Dense index within the owning reservoir
    pub reservoir_flat_idx: usize,
    /// Index of the owning pool within the reservoir
    pub pool_idx: usize,
    /// Dense index within the owning pool
    pub pool_flat_idx: usize,
    /// Index of the neuron group within the pool
    pub group_idx: usize,
    /// Lattice coordinates, unique per neuron within its pool
    pub coordinates: [i32; 3],
}

impl NeuronPlacement {
    /// Euclidean distance between two placements' lattice coordinates.
    pub fn distance(&self, other: &NeuronPlacement) -> f64 {
        let dx = (self.coordinates[0] - other.coordinates[0]) as f64;
        let dy = (self.coordinates[1] - other.coordinates[1]) as f64;
        let dz = (self.coordinates[2] - other.coordinates[2]) as f64;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}
