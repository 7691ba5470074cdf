// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Synapses
//!
//! Directed, weighted, delayed signal paths between two neurons. A synapse
//! never owns a neuron: `source` and `target` are arena-style dense indices
//! whose meaning (input array vs. hidden array) is fixed by the owning
//! reservoir.
//!
//! The delay is realized as a fixed-capacity ring buffer exclusively owned
//! by the synapse: each step the newest source signal is pushed in and the
//! oldest entry is delivered to the target.
//!
//! Two models:
//! - **Static**: weight fixed at construction.
//! - **Dynamic**: baseline weight scaled every step by short-term plasticity
//!   state (facilitation/depression variables that decay toward resting
//!   values and are perturbed on presynaptic spikes).

use crate::types::NeuronRole;
use serde::{Deserialize, Serialize};

/// Fixed-capacity ring buffer of past source signals.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f64>,
    head: usize,
}

impl DelayLine {
    /// A line for `delay` steps of latency holds `delay + 1` slots.
    pub fn new(delay: usize) -> Self {
        Self {
            buffer: vec![0.0; delay + 1],
            head: 0,
        }
    }

    /// Push the newest signal, return the oldest.
    #[inline]
    pub fn shift(&mut self, newest: f64) -> f64 {
        let oldest = self.buffer[self.head];
        self.buffer[self.head] = newest;
        self.head = (self.head + 1) % self.buffer.len();
        oldest
    }

    /// Latency in steps.
    pub fn delay(&self) -> usize {
        self.buffer.len() - 1
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.head = 0;
    }
}

/// Short-term plasticity parameters, configured per synapse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlasticitySettings {
    /// Resting synaptic efficacy (utilization at rest), in (0, 1]
    pub resting_efficacy: f64,
    /// Decay constant of the facilitation variable, in steps
    pub facilitation_tau: f64,
    /// Recovery constant of the depression variable, in steps
    pub depression_tau: f64,
}

impl Default for PlasticitySettings {
    fn default() -> Self {
        Self {
            resting_efficacy: 0.5,
            facilitation_tau: 500.0,
            depression_tau: 1000.0,
        }
    }
}

/// Mutable facilitation/depression state of a dynamic synapse.
#[derive(Debug, Clone)]
pub struct Plasticity {
    cfg: PlasticitySettings,
    /// Utilization (facilitation) variable; rests at `resting_efficacy`
    utilization: f64,
    /// Resource (depression) variable; rests at 1.0
    resources: f64,
}

impl Plasticity {
    pub fn new(cfg: PlasticitySettings) -> Self {
        Self {
            utilization: cfg.resting_efficacy,
            resources: 1.0,
            cfg,
        }
    }

    /// Advance one step: decay toward rest, then perturb on a presynaptic
    /// spike. Returns the weight scale for this step (1.0 at rest).
    #[inline]
    pub fn advance(&mut self, presynaptic_spike: bool) -> f64 {
        self.utilization +=
            (self.cfg.resting_efficacy - self.utilization) / self.cfg.facilitation_tau;
        self.resources += (1.0 - self.resources) / self.cfg.depression_tau;
        if presynaptic_spike {
            self.utilization += self.cfg.resting_efficacy * (1.0 - self.utilization);
            self.resources *= 1.0 - self.utilization;
        }
        (self.utilization * self.resources) / self.cfg.resting_efficacy
    }

    pub fn reset(&mut self) {
        self.utilization = self.cfg.resting_efficacy;
        self.resources = 1.0;
    }
}

/// Directed source → target signal path.
#[derive(Debug, Clone)]
pub struct Synapse {
    source: usize,
    target: usize,
    /// Signed base weight; sign fixed by the source neuron's role
    weight: f64,
    line: DelayLine,
    plasticity: Option<Plasticity>,
}

impl Synapse {
    /// Static synapse. The weight magnitude is taken from `weight`; its
    /// sign is forced by `source_role` (excitatory positive, inhibitory
    /// negative).
    pub fn new_static(
        source: usize,
        target: usize,
        source_role: NeuronRole,
        weight: f64,
        delay: usize,
    ) -> Self {
        Self {
            source,
            target,
            weight: source_role.weight_sign() * weight.abs(),
            line: DelayLine::new(delay),
            plasticity: None,
        }
    }

    /// Dynamic synapse with per-synapse plasticity parameters.
    pub fn new_dynamic(
        source: usize,
        target: usize,
        source_role: NeuronRole,
        weight: f64,
        delay: usize,
        plasticity: PlasticitySettings,
    ) -> Self {
        Self {
            plasticity: Some(Plasticity::new(plasticity)),
            ..Self::new_static(source, target, source_role, weight, delay)
        }
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Signed base weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn delay(&self) -> usize {
        self.line.delay()
    }

    pub fn is_dynamic(&self) -> bool {
        self.plasticity.is_some()
    }

    /// Rescale the base weight in place (spectral-radius normalization).
    pub fn scale_weight(&mut self, factor: f64) {
        self.weight *= factor;
    }

    /// One step of signal transport: push the source's newest signal,
    /// update plasticity from the presynaptic spike flag, and return the
    /// weighted signal arriving at the target this step.
    #[inline]
    pub fn shift(&mut self, source_signal: f64, source_spiked: bool) -> f64 {
        let scale = match self.plasticity.as_mut() {
            Some(p) => p.advance(source_spiked),
            None => 1.0,
        };
        self.line.shift(source_signal) * self.weight * scale
    }

    /// Clear delay line and plasticity state; structure stays intact.
    pub fn reset(&mut self) {
        self.line.reset();
        if let Some(p) = self.plasticity.as_mut() {
            p.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_line_latency() {
        let mut line = DelayLine::new(2);
        assert_eq!(line.shift(1.0), 0.0);
        assert_eq!(line.shift(2.0), 0.0);
        assert_eq!(line.shift(3.0), 1.0);
        assert_eq!(line.shift(4.0), 2.0);
    }

    #[test]
    fn test_zero_delay_passes_through() {
        let mut line = DelayLine::new(0);
        assert_eq!(line.shift(5.0), 5.0);
        assert_eq!(line.shift(-1.0), -1.0);
    }

    #[test]
    fn test_static_synapse_sign_follows_role() {
        let exc = Synapse::new_static(0, 1, NeuronRole::Excitatory, 0.5, 0);
        let inh = Synapse::new_static(0, 1, NeuronRole::Inhibitory, 0.5, 0);
        assert_eq!(exc.weight(), 0.5);
        assert_eq!(inh.weight(), -0.5);
        // Magnitude sign from configuration is discarded
        let inh2 = Synapse::new_static(0, 1, NeuronRole::Inhibitory, -0.5, 0);
        assert_eq!(inh2.weight(), -0.5);
    }

    #[test]
    fn test_static_synapse_delivers_delayed_weighted_signal() {
        let mut syn = Synapse::new_static(0, 1, NeuronRole::Excitatory, 2.0, 1);
        assert_eq!(syn.shift(1.0, false), 0.0);
        assert_eq!(syn.shift(0.0, false), 2.0);
    }

    #[test]
    fn test_dynamic_synapse_depresses_under_sustained_firing() {
        let mut syn = Synapse::new_dynamic(
            0,
            1,
            NeuronRole::Excitatory,
            1.0,
            0,
            PlasticitySettings::default(),
        );
        let first = syn.shift(1.0, true);
        let mut last = first;
        for _ in 0..20 {
            last = syn.shift(1.0, true);
        }
        // Resources deplete faster than facilitation compensates
        assert!(last < first);
    }

    #[test]
    fn test_dynamic_synapse_recovers_at_rest() {
        let mut syn = Synapse::new_dynamic(
            0,
            1,
            NeuronRole::Excitatory,
            1.0,
            0,
            PlasticitySettings {
                resting_efficacy: 0.5,
                facilitation_tau: 10.0,
                depression_tau: 10.0,
            },
        );
        for _ in 0..20 {
            syn.shift(1.0, true);
        }
        let depressed = syn.shift(1.0, false);
        for _ in 0..500 {
            syn.shift(1.0, false);
        }
        let recovered = syn.shift(1.0, false);
        assert!(recovered > depressed);
        assert!((recovered - 1.0).abs() < 1e-2);
    }

    #[test]
    fn test_reset_restores_initial_transport() {
        let mut syn = Synapse::new_dynamic(
            0,
            1,
            NeuronRole::Excitatory,
            1.0,
            2,
            PlasticitySettings::default(),
        );
        for _ in 0..10 {
            syn.shift(1.0, true);
        }
        syn.reset();
        // Delay line is empty again and plasticity is at rest
        assert_eq!(syn.shift(1.0, false), 0.0);
        assert_eq!(syn.shift(0.0, false), 0.0);
        assert!((syn.shift(0.0, false) - 1.0).abs() < 1e-12);
    }
}
