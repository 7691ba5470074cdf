// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Hidden neuron: one activation unit, two-phase step, signal restriction.

use crate::activation::{bound_input, ActivationUnit};
use crate::predictors::{PredictorSet, PredictorSettings};
use crate::statistics::NeuronStatistics;
use crate::types::{
    ActivationKind, Interval, NeuralError, NeuronPlacement, NeuronRole, Result, SignalKind,
    SignalingRestriction,
};

/// Hidden reservoir neuron, analog or spiking per its activation unit.
///
/// Analog neurons blend the raw activation output with the previous state
/// through the retainment strength (leaky integration) and emit a synthetic
/// spike when the step-over-step increase of the normalized state exceeds
/// the firing threshold. Spiking neurons forward the unit's binary spike as
/// both signal forms and expose the normalized membrane state to
/// statistics and predictors.
#[derive(Debug)]
pub struct HiddenNeuron {
    placement: NeuronPlacement,
    role: NeuronRole,
    bias: f64,
    restriction: SignalingRestriction,
    kind: ActivationKind,
    activation: Box<dyn ActivationUnit>,
    /// Analog only: previous-state blending strength, in [0, 1)
    retainment: f64,
    /// Analog only: minimum increase of the normalized state that counts
    /// as a synthetic spike
    firing_threshold: f64,

    // Dynamic state
    external_stimulation: f64,
    recurrent_stimulation: f64,
    total_stimulation: f64,
    activation_state: f64,
    normalized_state: f64,
    analog_signal: f64,
    spiking_signal: f64,
    ticks_since_last_spike: u64,
    ever_spiked: bool,

    predictors: Option<PredictorSet>,
    statistics: NeuronStatistics,
}

impl HiddenNeuron {
    /// Construct with exactly one activation unit of the declared kind.
    ///
    /// Fatal configuration errors: unit kind differs from `declared_kind`;
    /// an `AnalogOnly` restriction on a spiking unit; retainment outside
    /// [0, 1).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        placement: NeuronPlacement,
        role: NeuronRole,
        bias: f64,
        restriction: SignalingRestriction,
        declared_kind: ActivationKind,
        activation: Box<dyn ActivationUnit>,
        retainment: f64,
        firing_threshold: f64,
        predictors: Option<PredictorSettings>,
    ) -> Result<Self> {
        if activation.kind() != declared_kind {
            return Err(NeuralError::ActivationKindMismatch {
                declared: declared_kind,
                actual: activation.kind(),
            });
        }
        if declared_kind == ActivationKind::Spiking
            && restriction == SignalingRestriction::AnalogOnly
        {
            return Err(NeuralError::IncompatibleRestriction {
                restriction,
                kind: declared_kind,
            });
        }
        if !(0.0..1.0).contains(&retainment) {
            return Err(NeuralError::InvalidRetainment(retainment));
        }
        // The resting activation state (0) normalizes to mid-range for
        // symmetric outputs; the previous-step value must start there or
        // the first step's rise is overstated.
        let normalized_state = activation.output_range().rescale(0.0, &Interval::UNIT);
        Ok(Self {
            placement,
            role,
            bias,
            restriction,
            kind: declared_kind,
            activation,
            retainment,
            firing_threshold,
            external_stimulation: 0.0,
            recurrent_stimulation: 0.0,
            total_stimulation: 0.0,
            activation_state: 0.0,
            normalized_state,
            analog_signal: 0.0,
            spiking_signal: 0.0,
            ticks_since_last_spike: 0,
            ever_spiked: false,
            predictors: predictors.map(PredictorSet::new),
            statistics: NeuronStatistics::new(),
        })
    }

    pub fn placement(&self) -> &NeuronPlacement {
        &self.placement
    }

    pub fn role(&self) -> NeuronRole {
        self.role
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn activation_kind(&self) -> ActivationKind {
        self.kind
    }

    pub fn restriction(&self) -> SignalingRestriction {
        self.restriction
    }

    /// Current signal, honoring the signaling restriction.
    #[inline]
    pub fn signal(&self, kind: SignalKind) -> f64 {
        match self.restriction {
            SignalingRestriction::AnalogOnly => self.analog_signal,
            SignalingRestriction::SpikingOnly => self.spiking_signal,
            SignalingRestriction::NoRestriction => match kind {
                SignalKind::Analog => self.analog_signal,
                SignalKind::Spiking => self.spiking_signal,
            },
        }
    }

    /// Phase 1: store both stimulation components; the total is bounded.
    #[inline]
    pub fn receive_stimulation(&mut self, external: f64, recurrent: f64) {
        self.external_stimulation = external;
        self.recurrent_stimulation = recurrent;
        self.total_stimulation = bound_input(external + recurrent + self.bias);
    }

    /// Phase 2: evaluate the activation unit and publish this step's
    /// signals, counters, predictors and statistics.
    pub fn advance(&mut self, collect_stats: bool) {
        let spiked = match self.kind {
            ActivationKind::Spiking => {
                let spike = self.activation.compute(self.total_stimulation);
                self.spiking_signal = spike;
                self.analog_signal = spike;
                self.activation_state = self.activation.internal_state();
                self.normalized_state = self
                    .activation
                    .internal_state_range()
                    .rescale(self.activation_state, &Interval::UNIT);
                spike != 0.0
            }
            ActivationKind::Analog => {
                let raw = self.activation.compute(self.total_stimulation);
                let new_state =
                    self.retainment * self.activation_state + (1.0 - self.retainment) * raw;
                self.activation_state = new_state;
                self.analog_signal = new_state;
                let previous_normalized = self.normalized_state;
                self.normalized_state = self
                    .activation
                    .output_range()
                    .rescale(new_state, &Interval::UNIT);
                let spiked =
                    self.normalized_state - previous_normalized > self.firing_threshold;
                self.spiking_signal = if spiked { 1.0 } else { 0.0 };
                spiked
            }
        };

        if spiked {
            self.ticks_since_last_spike = 0;
            self.ever_spiked = true;
        } else {
            self.ticks_since_last_spike = self.ticks_since_last_spike.saturating_add(1);
        }

        if let Some(p) = self.predictors.as_mut() {
            p.update(
                self.activation_state,
                Interval::UNIT.bound(self.normalized_state),
                spiked,
            );
        }
        if collect_stats {
            self.statistics.update(
                self.external_stimulation,
                self.recurrent_stimulation,
                self.total_stimulation,
                self.activation_state,
                self.analog_signal,
                self.spiking_signal,
            );
        }
    }

    pub fn ticks_since_last_spike(&self) -> u64 {
        self.ticks_since_last_spike
    }

    pub fn ever_spiked(&self) -> bool {
        self.ever_spiked
    }

    pub fn predictors(&self) -> Option<&PredictorSet> {
        self.predictors.as_ref()
    }

    /// Reinitialize dynamic state without reallocating structure.
    pub fn reset(&mut self, clear_statistics: bool) {
        self.activation.reset();
        self.external_stimulation = 0.0;
        self.recurrent_stimulation = 0.0;
        self.total_stimulation = 0.0;
        self.activation_state = 0.0;
        self.normalized_state = self.activation.output_range().rescale(0.0, &Interval::UNIT);
        self.analog_signal = 0.0;
        self.spiking_signal = 0.0;
        self.ticks_since_last_spike = 0;
        self.ever_spiked = false;
        if let Some(p) = self.predictors.as_mut() {
            p.reset();
        }
        if clear_statistics {
            self.statistics.reset();
        }
    }

    pub fn statistics(&self) -> &NeuronStatistics {
        &self.statistics
    }
}
