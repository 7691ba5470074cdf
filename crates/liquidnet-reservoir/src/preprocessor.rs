// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neural Preprocessor
//!
//! Orchestrates one or more reservoirs across a time series and harvests
//! the fixed-order predictor vector the downstream readout consumes.
//!
//! Two feeding regimes:
//! - **Continuous**: one external vector per step, one predictor vector
//!   per step after the configured warm-up (boot) cycles.
//! - **Patterned**: each input instance is a whole step sequence; all
//!   reservoirs reset at the pattern boundary and one predictor vector is
//!   produced per pattern (final step or per-step average).
//!
//! Reservoirs own disjoint mutable state, so they advance in parallel
//! across the rayon pool; harvesting stays sequential in reservoir order
//! to keep the vector layout fixed.

use crate::reservoir::Reservoir;
use crate::settings::{FeedingSettings, PatternAggregation, PreprocessorSettings};
use crate::types::{ReservoirError, Result};
use liquidnet_neural::StatisticsSnapshot;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, trace};

/// Multi-reservoir orchestrator with a fixed predictor-vector layout.
#[derive(Debug)]
pub struct NeuralPreprocessor {
    settings: PreprocessorSettings,
    reservoirs: Vec<Reservoir>,
    predictor_count: usize,
    /// Remaining warm-up steps (continuous regime)
    boot_countdown: usize,
    collect_statistics: bool,
}

impl NeuralPreprocessor {
    /// Validate the configuration and build every reservoir instance from
    /// one seeded generator.
    pub fn new(settings: PreprocessorSettings) -> Result<Self> {
        settings.validate()?;
        let mut rng = StdRng::seed_from_u64(settings.seed);
        let reservoirs: Vec<Reservoir> = settings
            .reservoirs
            .iter()
            .map(|r| Reservoir::build(r, settings.input_field_count, &mut rng))
            .collect::<Result<_>>()?;
        let predictor_count = reservoirs.iter().map(Reservoir::predictor_count).sum();
        let boot_countdown = match settings.feeding {
            FeedingSettings::Continuous { boot_cycles } => boot_cycles,
            FeedingSettings::Patterned { .. } => 0,
        };
        debug!(
            reservoirs = reservoirs.len(),
            predictors = predictor_count,
            "preprocessor built"
        );
        Ok(Self {
            settings,
            reservoirs,
            predictor_count,
            boot_countdown,
            collect_statistics: false,
        })
    }

    /// Fixed length of the harvested predictor vector.
    pub fn predictor_count(&self) -> usize {
        self.predictor_count
    }

    pub fn reservoirs(&self) -> &[Reservoir] {
        &self.reservoirs
    }

    /// Enable or disable per-neuron statistics collection.
    pub fn set_collect_statistics(&mut self, collect: bool) {
        self.collect_statistics = collect;
    }

    /// Continuous regime: run one step and harvest the predictor vector.
    ///
    /// During the configured boot cycles the reservoirs advance but the
    /// returned vector is empty — the warm-up states are not meaningful
    /// predictors.
    pub fn preprocess(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.check_input(input)?;
        self.step_all(input);
        if self.boot_countdown > 0 {
            self.boot_countdown -= 1;
            trace!(remaining = self.boot_countdown, "boot cycle");
            return Ok(Vec::new());
        }
        Ok(self.harvest())
    }

    /// Patterned regime: feed one complete pattern and produce its
    /// predictor vector. State never leaks across pattern boundaries when
    /// `reset_between_patterns` is set.
    pub fn preprocess_pattern(&mut self, pattern: &[Vec<f64>]) -> Result<Vec<f64>> {
        if pattern.is_empty() {
            return Err(ReservoirError::EmptyPattern);
        }
        for step in pattern {
            self.check_input(step)?;
        }
        let aggregation = match self.settings.feeding {
            FeedingSettings::Patterned { aggregation } => aggregation,
            FeedingSettings::Continuous { .. } => PatternAggregation::FinalStep,
        };
        if self.settings.reset_between_patterns {
            self.reset_state();
        }

        match aggregation {
            PatternAggregation::FinalStep => {
                for step in pattern {
                    self.step_all(step);
                }
                Ok(self.harvest())
            }
            PatternAggregation::Average => {
                let mut sums = vec![0.0; self.predictor_count];
                let mut buffer = Vec::with_capacity(self.predictor_count);
                for step in pattern {
                    self.step_all(step);
                    buffer.clear();
                    for reservoir in &self.reservoirs {
                        reservoir.harvest_predictors(&mut buffer);
                    }
                    for (sum, value) in sums.iter_mut().zip(&buffer) {
                        *sum += value;
                    }
                }
                let len = pattern.len() as f64;
                sums.iter_mut().for_each(|s| *s /= len);
                Ok(sums)
            }
        }
    }

    /// Reinitialize all dynamic state. Boot cycles start over; statistics
    /// are cleared only when requested.
    pub fn reset(&mut self, clear_statistics: bool) {
        for reservoir in self.reservoirs.iter_mut() {
            reservoir.reset(clear_statistics);
        }
        self.boot_countdown = match self.settings.feeding {
            FeedingSettings::Continuous { boot_cycles } => boot_cycles,
            FeedingSettings::Patterned { .. } => 0,
        };
    }

    /// Per-reservoir, per-neuron statistics snapshots for diagnostics.
    pub fn statistics(&self) -> Vec<Vec<StatisticsSnapshot>> {
        self.reservoirs.iter().map(Reservoir::statistics).collect()
    }

    fn check_input(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.settings.input_field_count {
            return Err(ReservoirError::InputLengthMismatch {
                expected: self.settings.input_field_count,
                actual: input.len(),
            });
        }
        Ok(())
    }

    /// Advance every reservoir one step. Instances own disjoint state, so
    /// the fork-join split cannot change the outcome.
    fn step_all(&mut self, input: &[f64]) {
        let collect = self.collect_statistics;
        if self.reservoirs.len() > 1 {
            self.reservoirs
                .par_iter_mut()
                .for_each(|reservoir| reservoir.compute(input, collect));
        } else {
            for reservoir in self.reservoirs.iter_mut() {
                reservoir.compute(input, collect);
            }
        }
    }

    /// Harvest all reservoirs in instance order into one vector.
    fn harvest(&self) -> Vec<f64> {
        let mut buffer = Vec::with_capacity(self.predictor_count);
        for reservoir in &self.reservoirs {
            reservoir.harvest_predictors(&mut buffer);
        }
        buffer
    }

    /// State-only reset at pattern boundaries; statistics keep
    /// accumulating across patterns.
    fn reset_state(&mut self) {
        for reservoir in self.reservoirs.iter_mut() {
            reservoir.reset(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{
        InputConnectionSettings, InterconnectSettings, NeuronGroupSettings, PoolSettings,
        RandomValue, ReservoirSettings,
    };
    use liquidnet_neural::{ActivationSettings, Interval};

    fn settings(feeding: FeedingSettings) -> PreprocessorSettings {
        PreprocessorSettings {
            input_field_count: 1,
            reservoirs: vec![ReservoirSettings {
                name: "res".to_string(),
                input_range: Interval::SYMMETRIC_UNIT,
                pools: vec![PoolSettings {
                    name: "main".to_string(),
                    dimensions: [8, 1, 1],
                    groups: vec![NeuronGroupSettings::analog("exc", ActivationSettings::TanH)],
                    interconnects: vec![InterconnectSettings::Random {
                        density: 0.4,
                        weight: RandomValue::Uniform { min: 0.1, max: 0.8 },
                        max_delay: 1,
                        allow_self: false,
                        source_role: None,
                        target_role: None,
                        plasticity: None,
                    }],
                }],
                links: vec![],
                input_connections: vec![InputConnectionSettings {
                    input_field: 0,
                    pool: "main".to_string(),
                    density: 1.0,
                    weight: RandomValue::Uniform { min: 0.1, max: 0.4 },
                    max_delay: 0,
                    plasticity: None,
                }],
                spectral_radius: Some(0.9),
            }],
            feeding,
            reset_between_patterns: true,
            seed: 7,
        }
    }

    #[test]
    fn test_boot_cycles_return_empty_vectors() {
        let mut pp =
            NeuralPreprocessor::new(settings(FeedingSettings::Continuous { boot_cycles: 3 }))
                .unwrap();
        for _ in 0..3 {
            assert!(pp.preprocess(&[0.5]).unwrap().is_empty());
        }
        let out = pp.preprocess(&[0.5]).unwrap();
        assert_eq!(out.len(), pp.predictor_count());
    }

    #[test]
    fn test_input_length_is_checked() {
        let mut pp =
            NeuralPreprocessor::new(settings(FeedingSettings::Continuous { boot_cycles: 0 }))
                .unwrap();
        assert!(matches!(
            pp.preprocess(&[0.5, 0.5]),
            Err(ReservoirError::InputLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_pattern_isolation() {
        let mut pp = NeuralPreprocessor::new(settings(FeedingSettings::Patterned {
            aggregation: PatternAggregation::FinalStep,
        }))
        .unwrap();
        let pattern: Vec<Vec<f64>> = vec![vec![0.1], vec![0.5], vec![-0.3]];
        let once = pp.preprocess_pattern(&pattern).unwrap();
        let again = pp.preprocess_pattern(&pattern).unwrap();
        assert_eq!(once, again, "no state may leak across pattern boundaries");
    }

    #[test]
    fn test_pattern_average_aggregation() {
        let mut pp = NeuralPreprocessor::new(settings(FeedingSettings::Patterned {
            aggregation: PatternAggregation::Average,
        }))
        .unwrap();
        let out = pp.preprocess_pattern(&[vec![0.4]]).unwrap();
        // Single-step pattern: the average equals the final step
        let mut pp2 = NeuralPreprocessor::new(settings(FeedingSettings::Patterned {
            aggregation: PatternAggregation::FinalStep,
        }))
        .unwrap();
        let final_step = pp2.preprocess_pattern(&[vec![0.4]]).unwrap();
        assert_eq!(out, final_step);
    }

    #[test]
    fn test_empty_pattern_is_rejected() {
        let mut pp = NeuralPreprocessor::new(settings(FeedingSettings::Patterned {
            aggregation: PatternAggregation::FinalStep,
        }))
        .unwrap();
        assert!(matches!(
            pp.preprocess_pattern(&[]),
            Err(ReservoirError::EmptyPattern)
        ));
    }

    #[test]
    fn test_reset_restarts_boot_cycles() {
        let mut pp =
            NeuralPreprocessor::new(settings(FeedingSettings::Continuous { boot_cycles: 1 }))
                .unwrap();
        assert!(pp.preprocess(&[0.2]).unwrap().is_empty());
        assert!(!pp.preprocess(&[0.2]).unwrap().is_empty());
        pp.reset(true);
        assert!(pp.preprocess(&[0.2]).unwrap().is_empty());
    }

    #[test]
    fn test_statistics_toggle() {
        let mut pp =
            NeuralPreprocessor::new(settings(FeedingSettings::Continuous { boot_cycles: 0 }))
                .unwrap();
        pp.preprocess(&[0.3]).unwrap();
        assert!(pp.statistics()[0].iter().all(|s| s.samples == 0));
        pp.set_collect_statistics(true);
        pp.preprocess(&[0.3]).unwrap();
        assert!(pp.statistics()[0].iter().all(|s| s.samples == 1));
    }
}
