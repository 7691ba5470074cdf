// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Rolling per-neuron statistics.
//!
//! Six tracked streams per neuron: input stimulation, recurrent stimulation,
//! total stimulation, activation state, analog signal and spiking signal.
//! Aggregates accumulate across steps until explicitly reset; they are
//! diagnostics only and never feed back into the simulation.

use serde::{Deserialize, Serialize};

/// Rolling scalar aggregate: count, sum, sum of squares, min, max.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasicStat {
    count: u64,
    sum: f64,
    sum_sq: f64,
    min: f64,
    max: f64,
}

impl Default for BasicStat {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sum_sq: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl BasicStat {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Population variance.
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        (self.sum_sq / self.count as f64 - mean * mean).max(0.0)
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn root_mean_square(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.sum_sq / self.count as f64).sqrt()
        }
    }

    pub fn min(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.min
        }
    }

    pub fn max(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.max
        }
    }

    /// max - min over the observed samples.
    pub fn span(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.max - self.min
        }
    }
}

/// The six tracked streams of one neuron.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeuronStatistics {
    pub input_stimulation: BasicStat,
    pub recurrent_stimulation: BasicStat,
    pub total_stimulation: BasicStat,
    pub activation_state: BasicStat,
    pub analog_signal: BasicStat,
    pub spiking_signal: BasicStat,
}

impl NeuronStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one step's worth of samples across all six streams.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        input_stimulation: f64,
        recurrent_stimulation: f64,
        total_stimulation: f64,
        activation_state: f64,
        analog_signal: f64,
        spiking_signal: f64,
    ) {
        self.input_stimulation.add(input_stimulation);
        self.recurrent_stimulation.add(recurrent_stimulation);
        self.total_stimulation.add(total_stimulation);
        self.activation_state.add(activation_state);
        self.analog_signal.add(analog_signal);
        self.spiking_signal.add(spiking_signal);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Immutable copy for diagnostics reporting.
    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            samples: self.activation_state.count(),
            avg_total_stimulation: self.total_stimulation.mean(),
            avg_activation: self.activation_state.mean(),
            activation_span: self.activation_state.span(),
            avg_analog_signal: self.analog_signal.mean(),
            firing_rate: self.spiking_signal.mean(),
        }
    }
}

/// Condensed statistics view handed out to diagnostics consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub samples: u64,
    pub avg_total_stimulation: f64,
    pub avg_activation: f64,
    pub activation_span: f64,
    pub avg_analog_signal: f64,
    pub firing_rate: f64,
}
