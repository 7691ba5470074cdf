// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Predictor Subsystem
//!
//! Per-neuron rolling features harvested into the fixed-order predictor
//! vector the downstream readout trains on. The predictor ID space is a
//! closed enum with stable iteration order ([`PredictorId::ALL`]); for a
//! given configuration the enabled subset, and therefore the vector layout,
//! never changes.
//!
//! The predictor set is an owned optional component of a hidden neuron:
//! present when the neuron is readout-eligible, absent otherwise.

use serde::{Deserialize, Serialize};

/// Closed, ordered space of predictor features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictorId {
    /// Current activation state
    Activation,
    /// Square of the current activation state (keeps sign information out)
    ActivationSquare,
    /// Exponentially fading sum of the normalized activation
    ActivationFadingSum,
    /// Exponentially fading sum of emitted spikes
    FiringFadingSum,
    /// Number of spikes within the trailing 64-step window
    FiringCount64,
}

impl PredictorId {
    /// All predictor IDs in their canonical harvesting order.
    pub const ALL: [PredictorId; 5] = [
        PredictorId::Activation,
        PredictorId::ActivationSquare,
        PredictorId::ActivationFadingSum,
        PredictorId::FiringFadingSum,
        PredictorId::FiringCount64,
    ];
}

/// Which predictors a neuron group enables, plus fading strengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorSettings {
    pub activation: bool,
    pub activation_square: bool,
    pub activation_fading_sum: bool,
    pub firing_fading_sum: bool,
    pub firing_count_64: bool,
    /// Per-step decay of the activation fading sum, in [0, 1)
    pub activation_fading_strength: f64,
    /// Per-step decay of the firing fading sum, in [0, 1)
    pub firing_fading_strength: f64,
}

impl Default for PredictorSettings {
    fn default() -> Self {
        Self {
            activation: true,
            activation_square: false,
            activation_fading_sum: false,
            firing_fading_sum: false,
            firing_count_64: false,
            activation_fading_strength: 0.005,
            firing_fading_strength: 0.005,
        }
    }
}

impl PredictorSettings {
    /// Enable every predictor feature.
    pub fn all() -> Self {
        Self {
            activation: true,
            activation_square: true,
            activation_fading_sum: true,
            firing_fading_sum: true,
            firing_count_64: true,
            ..Default::default()
        }
    }

    pub fn is_enabled(&self, id: PredictorId) -> bool {
        match id {
            PredictorId::Activation => self.activation,
            PredictorId::ActivationSquare => self.activation_square,
            PredictorId::ActivationFadingSum => self.activation_fading_sum,
            PredictorId::FiringFadingSum => self.firing_fading_sum,
            PredictorId::FiringCount64 => self.firing_count_64,
        }
    }

    /// Number of enabled predictors.
    pub fn enabled_count(&self) -> usize {
        PredictorId::ALL
            .iter()
            .filter(|&&id| self.is_enabled(id))
            .count()
    }
}

/// Rolling predictor values of one neuron.
#[derive(Debug, Clone)]
pub struct PredictorSet {
    settings: PredictorSettings,
    activation: f64,
    activation_fading_sum: f64,
    firing_fading_sum: f64,
    /// Bit register of the trailing 64 spike flags, newest in bit 0
    firing_history: u64,
}

impl PredictorSet {
    pub fn new(settings: PredictorSettings) -> Self {
        Self {
            settings,
            activation: 0.0,
            activation_fading_sum: 0.0,
            firing_fading_sum: 0.0,
            firing_history: 0,
        }
    }

    pub fn settings(&self) -> &PredictorSettings {
        &self.settings
    }

    /// Number of values this set contributes to the predictor vector.
    pub fn count(&self) -> usize {
        self.settings.enabled_count()
    }

    /// Fold in one step's outcome.
    ///
    /// `normalized_activation` is the activation state rescaled into [0, 1];
    /// `spiked` is the step's binary spiking signal.
    pub fn update(&mut self, activation: f64, normalized_activation: f64, spiked: bool) {
        self.activation = activation;
        self.activation_fading_sum = self.activation_fading_sum
            * (1.0 - self.settings.activation_fading_strength)
            + normalized_activation;
        self.firing_fading_sum = self.firing_fading_sum
            * (1.0 - self.settings.firing_fading_strength)
            + if spiked { 1.0 } else { 0.0 };
        self.firing_history = (self.firing_history << 1) | u64::from(spiked);
    }

    /// Append the enabled predictor values in canonical order.
    pub fn write_into(&self, buffer: &mut Vec<f64>) {
        for id in PredictorId::ALL {
            if !self.settings.is_enabled(id) {
                continue;
            }
            buffer.push(match id {
                PredictorId::Activation => self.activation,
                PredictorId::ActivationSquare => self.activation * self.activation,
                PredictorId::ActivationFadingSum => self.activation_fading_sum,
                PredictorId::FiringFadingSum => self.firing_fading_sum,
                PredictorId::FiringCount64 => self.firing_history.count_ones() as f64,
            });
        }
    }

    pub fn reset(&mut self) {
        self.activation = 0.0;
        self.activation_fading_sum = 0.0;
        self.firing_fading_sum = 0.0;
        self.firing_history = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_is_stable() {
        // The readout vector layout depends on this exact order
        assert_eq!(PredictorId::ALL[0], PredictorId::Activation);
        assert_eq!(PredictorId::ALL[4], PredictorId::FiringCount64);
    }

    #[test]
    fn test_enabled_count_matches_write() {
        let set = PredictorSet::new(PredictorSettings::all());
        let mut buf = Vec::new();
        set.write_into(&mut buf);
        assert_eq!(buf.len(), set.count());
        assert_eq!(buf.len(), PredictorId::ALL.len());
    }

    #[test]
    fn test_firing_count_window() {
        let mut set = PredictorSet::new(PredictorSettings::all());
        for _ in 0..10 {
            set.update(0.5, 0.5, true);
        }
        for _ in 0..4 {
            set.update(0.1, 0.1, false);
        }
        let mut buf = Vec::new();
        set.write_into(&mut buf);
        // FiringCount64 is the last enabled value
        assert_eq!(buf[4], 10.0);
    }

    #[test]
    fn test_fading_sum_decays() {
        let settings = PredictorSettings {
            activation_fading_sum: true,
            activation_fading_strength: 0.5,
            ..PredictorSettings::default()
        };
        let mut set = PredictorSet::new(settings);
        set.update(1.0, 1.0, false);
        set.update(0.0, 0.0, false);
        let mut buf = Vec::new();
        set.write_into(&mut buf);
        // Activation enabled by default (index 0), fading sum next
        assert_eq!(buf.len(), 2);
        assert!((buf[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_reset_clears_rolling_state() {
        let mut set = PredictorSet::new(PredictorSettings::all());
        set.update(1.0, 1.0, true);
        set.reset();
        let mut buf = Vec::new();
        set.write_into(&mut buf);
        assert!(buf.iter().all(|&v| v == 0.0));
    }
}
