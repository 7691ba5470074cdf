// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Input neuron: relays one external input field.

use crate::statistics::NeuronStatistics;
use crate::types::{Interval, NeuronPlacement, NeuronRole, SignalKind};

/// Relay neuron for one external input field.
///
/// No activation unit, no predictors, bias fixed at zero, role fixed at
/// `Input`. The externally supplied value is bounded to the configured
/// input range. For spiking consumers the bounded value is rescaled from
/// the canonical [0, 1] spiking-target range back into the configured
/// input-value range.
#[derive(Debug)]
pub struct InputNeuron {
    placement: NeuronPlacement,
    input_range: Interval,
    stimulation: f64,
    value: f64,
    statistics: NeuronStatistics,
}

impl InputNeuron {
    pub fn new(placement: NeuronPlacement, input_range: Interval) -> Self {
        Self {
            placement,
            input_range,
            stimulation: 0.0,
            value: 0.0,
            statistics: NeuronStatistics::new(),
        }
    }

    pub fn placement(&self) -> &NeuronPlacement {
        &self.placement
    }

    pub fn role(&self) -> NeuronRole {
        NeuronRole::Input
    }

    pub fn input_range(&self) -> &Interval {
        &self.input_range
    }

    #[inline]
    pub fn signal(&self, kind: SignalKind) -> f64 {
        match kind {
            SignalKind::Analog => self.value,
            SignalKind::Spiking => Interval::UNIT.rescale(self.value, &self.input_range),
        }
    }

    /// Phase 1: the external component carries the input field value;
    /// input neurons receive no recurrent stimulation.
    #[inline]
    pub fn receive_stimulation(&mut self, external: f64, _recurrent: f64) {
        self.stimulation = external;
    }

    /// Phase 2: publish the bounded value as the neuron's signal.
    #[inline]
    pub fn advance(&mut self, collect_stats: bool) {
        self.value = self.input_range.bound(self.stimulation);
        if collect_stats {
            self.statistics.update(
                self.stimulation,
                0.0,
                self.value,
                self.value,
                self.signal(SignalKind::Analog),
                self.signal(SignalKind::Spiking),
            );
        }
    }

    pub fn reset(&mut self, clear_statistics: bool) {
        self.stimulation = 0.0;
        self.value = 0.0;
        if clear_statistics {
            self.statistics.reset();
        }
    }

    pub fn statistics(&self) -> &NeuronStatistics {
        &self.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_value_is_bounded_to_input_range() {
        let mut n = InputNeuron::new(placement(), Interval::SYMMETRIC_UNIT);
        n.receive_stimulation(5.0, 0.0);
        n.advance(false);
        assert_eq!(n.signal(SignalKind::Analog), 1.0);
        n.receive_stimulation(-5.0, 0.0);
        n.advance(false);
        assert_eq!(n.signal(SignalKind::Analog), -1.0);
    }

    #[test]
    fn test_spiking_signal_rescales_into_input_range() {
        let range = Interval::new(-10.0, 10.0).unwrap();
        let mut n = InputNeuron::new(placement(), range);
        n.receive_stimulation(0.5, 0.0);
        n.advance(false);
        // 0.5 on the canonical [0,1] scale maps to the middle of the range
        assert_eq!(n.signal(SignalKind::Spiking), 0.0);
        assert_eq!(n.signal(SignalKind::Analog), 0.5);
    }

    #[test]
    fn test_reset_clears_value() {
        let mut n = InputNeuron::new(placement(), Interval::SYMMETRIC_UNIT);
        n.receive_stimulation(0.7, 0.0);
        n.advance(true);
        n.reset(true);
        assert_eq!(n.signal(SignalKind::Analog), 0.0);
        assert_eq!(n.statistics().analog_signal.count(), 0);
    }
}
