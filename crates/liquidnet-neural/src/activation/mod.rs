// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Activation Units
//!
//! Scalar transfer functions behind the hidden neurons. Two families:
//!
//! - **Analog**: stateless closed forms (identity, tanh, sigmoid, ISRU).
//!   `compute` is a pure function of its input.
//! - **Spiking**: integrate-and-fire units that advance a membrane-potential
//!   state by one discrete step per `compute` call (Euler sub-steps), emit a
//!   binary spike on threshold crossing and apply their own reset rule.
//!
//! Every input passes through a silent clamp to [`SAFE_INPUT_BOUND`] before
//! evaluation so exponential terms cannot overflow. This is policy, not an
//! error path.

mod analog;
mod spiking;

pub use analog::{Identity, Isru, Sigmoid, TanH};
pub use spiking::{ExpIf, ExpIfSettings, LeakyIf, LeakyIfSettings, SimpleIf, SimpleIfSettings};

use crate::types::{ActivationKind, Interval, NeuralError, Result};
use serde::{Deserialize, Serialize};

/// Magnitude bound applied to every activation input before evaluation.
pub const SAFE_INPUT_BOUND: f64 = 1e20;

/// Clamp an activation input into the finite safe range.
#[inline]
pub(crate) fn bound_input(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(-SAFE_INPUT_BOUND, SAFE_INPUT_BOUND)
}

/// Common contract of all activation units.
///
/// `compute` must be deterministic: identical call sequences reproduce
/// identical outputs. Spiking units carry mutable integration state which
/// `reset` clears independently of the immutable parameters.
pub trait ActivationUnit: Send + Sync + std::fmt::Debug {
    /// Computational paradigm of this unit.
    fn kind(&self) -> ActivationKind;

    /// Range of values `compute` can return.
    fn output_range(&self) -> Interval;

    /// Range of the internal membrane-like state (spiking units only).
    ///
    /// Analog units return their output range; they have no hidden state.
    fn internal_state_range(&self) -> Interval {
        self.output_range()
    }

    /// Evaluate the unit for one discrete step.
    fn compute(&mut self, x: f64) -> f64;

    /// Derivative dy/dx given a previously computed `y` at `x`.
    ///
    /// # Panics
    /// Spiking units have no usable derivative; calling this on one is a
    /// precondition violation and panics.
    fn compute_derivative(&self, y: f64, x: f64) -> f64;

    /// Current internal state (spiking units); analog units return 0.
    fn internal_state(&self) -> f64 {
        0.0
    }

    /// Clear integration state. No-op for stateless analog units.
    fn reset(&mut self) {}
}

/// Declarative activation configuration, constructed by the settings layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActivationSettings {
    Identity,
    TanH,
    Sigmoid,
    /// Inverse Square Root Unit; `shape` must be strictly positive
    Isru { shape: f64 },
    SimpleIf(SimpleIfSettings),
    LeakyIf(LeakyIfSettings),
    ExpIf(ExpIfSettings),
}

impl ActivationSettings {
    /// Kind of the unit this configuration produces.
    pub fn kind(&self) -> ActivationKind {
        match self {
            ActivationSettings::Identity
            | ActivationSettings::TanH
            | ActivationSettings::Sigmoid
            | ActivationSettings::Isru { .. } => ActivationKind::Analog,
            ActivationSettings::SimpleIf(_)
            | ActivationSettings::LeakyIf(_)
            | ActivationSettings::ExpIf(_) => ActivationKind::Spiking,
        }
    }
}

/// Instantiate an activation unit from its settings.
///
/// Fails on invalid parameters (non-positive ISRU shape, degenerate
/// membrane voltages); these are fatal configuration errors.
pub fn build_activation(settings: &ActivationSettings) -> Result<Box<dyn ActivationUnit>> {
    Ok(match settings {
        ActivationSettings::Identity => Box::new(Identity),
        ActivationSettings::TanH => Box::new(TanH),
        ActivationSettings::Sigmoid => Box::new(Sigmoid),
        ActivationSettings::Isru { shape } => Box::new(Isru::new(*shape)?),
        ActivationSettings::SimpleIf(s) => Box::new(SimpleIf::new(s.clone())?),
        ActivationSettings::LeakyIf(s) => Box::new(LeakyIf::new(s.clone())?),
        ActivationSettings::ExpIf(s) => Box::new(ExpIf::new(s.clone())?),
    })
}

pub(crate) fn check_positive(value: f64, what: &str) -> Result<()> {
    if value <= 0.0 || !value.is_finite() {
        return Err(NeuralError::InvalidParameter(format!(
            "{} must be positive and finite, got {}",
            what, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_input_is_silent() {
        assert_eq!(bound_input(f64::INFINITY), SAFE_INPUT_BOUND);
        assert_eq!(bound_input(f64::NEG_INFINITY), -SAFE_INPUT_BOUND);
        assert_eq!(bound_input(f64::NAN), 0.0);
        assert_eq!(bound_input(1.5), 1.5);
    }

    #[test]
    fn test_settings_kind() {
        assert_eq!(ActivationSettings::TanH.kind(), ActivationKind::Analog);
        assert_eq!(
            ActivationSettings::LeakyIf(LeakyIfSettings::default()).kind(),
            ActivationKind::Spiking
        );
    }

    #[test]
    fn test_build_rejects_bad_shape() {
        assert!(build_activation(&ActivationSettings::Isru { shape: 0.0 }).is_err());
        assert!(build_activation(&ActivationSettings::Isru { shape: -1.0 }).is_err());
        assert!(build_activation(&ActivationSettings::Isru { shape: 1.0 }).is_ok());
    }
}
