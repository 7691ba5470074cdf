// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neuron Models
//!
//! Closed variant set behind one capability surface:
//!
//! - [`InputNeuron`] — relays one external input field into the reservoir.
//! - [`HiddenNeuron`] — owns exactly one activation unit (analog or
//!   spiking) and implements the two-phase step contract.
//!
//! The two-phase contract is enforced by the caller (the reservoir): every
//! neuron finishes `receive_stimulation` (reading previous-cycle signals)
//! before any neuron runs `advance` (mutating its own state). That barrier
//! is what makes a full step independent of neuron visitation order.

mod hidden;
mod input;

pub use hidden::HiddenNeuron;
pub use input::InputNeuron;

use crate::predictors::PredictorSet;
use crate::statistics::NeuronStatistics;
use crate::types::{ActivationKind, NeuronPlacement, NeuronRole, SignalKind};

/// Tagged neuron variant dispatching the shared capability set.
#[derive(Debug)]
pub enum Neuron {
    Input(InputNeuron),
    Hidden(HiddenNeuron),
}

impl Neuron {
    pub fn placement(&self) -> &NeuronPlacement {
        match self {
            Neuron::Input(n) => n.placement(),
            Neuron::Hidden(n) => n.placement(),
        }
    }

    pub fn role(&self) -> NeuronRole {
        match self {
            Neuron::Input(n) => n.role(),
            Neuron::Hidden(n) => n.role(),
        }
    }

    pub fn bias(&self) -> f64 {
        match self {
            Neuron::Input(_) => 0.0,
            Neuron::Hidden(n) => n.bias(),
        }
    }

    /// Activation paradigm; `None` for input neurons (they have no unit).
    pub fn activation_kind(&self) -> Option<ActivationKind> {
        match self {
            Neuron::Input(_) => None,
            Neuron::Hidden(n) => Some(n.activation_kind()),
        }
    }

    /// Current signal of the requested kind, honoring the neuron's
    /// signaling restriction.
    #[inline]
    pub fn signal(&self, kind: SignalKind) -> f64 {
        match self {
            Neuron::Input(n) => n.signal(kind),
            Neuron::Hidden(n) => n.signal(kind),
        }
    }

    /// Phase 1: store the step's stimulation components.
    #[inline]
    pub fn receive_stimulation(&mut self, external: f64, recurrent: f64) {
        match self {
            Neuron::Input(n) => n.receive_stimulation(external, recurrent),
            Neuron::Hidden(n) => n.receive_stimulation(external, recurrent),
        }
    }

    /// Phase 2: mutate own state for the current step.
    #[inline]
    pub fn advance(&mut self, collect_stats: bool) {
        match self {
            Neuron::Input(n) => n.advance(collect_stats),
            Neuron::Hidden(n) => n.advance(collect_stats),
        }
    }

    /// Reinitialize dynamic state; structure is untouched.
    pub fn reset(&mut self, clear_statistics: bool) {
        match self {
            Neuron::Input(n) => n.reset(clear_statistics),
            Neuron::Hidden(n) => n.reset(clear_statistics),
        }
    }

    pub fn statistics(&self) -> &NeuronStatistics {
        match self {
            Neuron::Input(n) => n.statistics(),
            Neuron::Hidden(n) => n.statistics(),
        }
    }

    /// Steps since the last spike.
    ///
    /// # Panics
    /// Input neurons do not track spike timing; asking one is a
    /// precondition violation.
    pub fn ticks_since_last_spike(&self) -> u64 {
        match self {
            Neuron::Input(_) => {
                panic!("Input neurons do not track spike timing")
            }
            Neuron::Hidden(n) => n.ticks_since_last_spike(),
        }
    }

    /// Predictor set, when the neuron is readout-eligible.
    pub fn predictors(&self) -> Option<&PredictorSet> {
        match self {
            Neuron::Input(_) => None,
            Neuron::Hidden(n) => n.predictors(),
        }
    }

    /// Number of predictor values this neuron contributes.
    pub fn predictor_count(&self) -> usize {
        self.predictors().map_or(0, PredictorSet::count)
    }

    /// Append this neuron's predictor values in canonical order.
    pub fn write_predictors_into(&self, buffer: &mut Vec<f64>) {
        if let Some(p) = self.predictors() {
            p.write_into(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::{build_activation, ActivationSettings};
    use crate::types::SignalingRestriction;

    fn placement() -> NeuronPlacement {
        NeuronPlacement {
            reservoir_flat_idx: 0,
            pool_idx: 0,
            pool_flat_idx: 0,
            group_idx: 0,
            coordinates: [0, 0, 0],
        }
    }

    #[test]
    #[should_panic(expected = "spike timing")]
    fn test_spike_timing_query_on_input_neuron_panics() {
        let n = Neuron::Input(InputNeuron::new(
            placement(),
            crate::types::Interval::SYMMETRIC_UNIT,
        ));
        let _ = n.ticks_since_last_spike();
    }

    #[test]
    fn test_input_neuron_has_no_predictors() {
        let n = Neuron::Input(InputNeuron::new(
            placement(),
            crate::types::Interval::SYMMETRIC_UNIT,
        ));
        assert_eq!(n.predictor_count(), 0);
        assert_eq!(n.bias(), 0.0);
        assert!(n.activation_kind().is_none());
    }

    #[test]
    fn test_hidden_neuron_dispatch() {
        let unit = build_activation(&ActivationSettings::TanH).unwrap();
        let hidden = HiddenNeuron::new(
            placement(),
            NeuronRole::Excitatory,
            0.0,
            SignalingRestriction::NoRestriction,
            ActivationKind::Analog,
            unit,
            0.0,
            0.001,
            None,
        )
        .unwrap();
        let mut n = Neuron::Hidden(hidden);
        assert_eq!(n.activation_kind(), Some(ActivationKind::Analog));
        n.receive_stimulation(0.5, 0.0);
        n.advance(true);
        assert!(n.signal(SignalKind::Analog) > 0.0);
        assert_eq!(n.statistics().activation_state.count(), 1);
    }
}
