// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Reservoir
//!
//! Composition of pools, input wiring and inter-pool synapses, plus the
//! synchronous per-step update.
//!
//! ## Step phases
//!
//! ```text
//! 1. Transport: shift every synapse's delay line against the neurons'
//!    previous-cycle signals, accumulating per-target external/recurrent
//!    stimulation sums.
//! 2. Receive:   every neuron stores its stimulation components.
//!    ── hard barrier ──
//! 3. Advance:   every neuron mutates its own state (parallelizable).
//! 4. Harvest:   predictor values, in flat neuron order.
//! ```
//!
//! The barrier between phases 2 and 3 makes the result independent of
//! neuron visitation order: all previous-step signals are read before any
//! neuron updates. Phase 3 runs on rayon above a size threshold — each
//! neuron touches only its own state, so scheduling cannot change the
//! result.

use crate::pool::Pool;
use crate::settings::ReservoirSettings;
use crate::spectral::estimate_spectral_radius;
use crate::types::Result;
use ahash::AHashSet;
use liquidnet_neural::{
    ActivationKind, InputNeuron, Neuron, NeuronPlacement, NeuronRole, SignalKind,
    StatisticsSnapshot, Synapse,
};
use ndarray::Array2;
use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

/// Below this neuron count the advance phase stays sequential.
const PARALLEL_THRESHOLD: usize = 128;

/// A synapse plus the signal form it transports, fixed by the target
/// neuron's activation paradigm (spiking targets consume spiking signals).
#[derive(Debug)]
struct Link {
    synapse: Synapse,
    signal_kind: SignalKind,
}

/// One recurrent network of pools with input wiring.
#[derive(Debug)]
pub struct Reservoir {
    name: String,
    pools: Vec<Pool>,
    /// Hidden neurons of all pools, in reservoir-flat order
    neurons: Vec<Neuron>,
    /// One relay per attached external input field, ascending field order
    input_neurons: Vec<InputNeuron>,
    /// External input field index per relay
    relay_fields: Vec<usize>,
    /// Input-layer synapses; `source` indexes `input_neurons`
    input_links: Vec<Link>,
    /// Intra- and inter-pool synapses; both ends index `neurons`
    internal_links: Vec<Link>,
    /// Expected length of the external input vector
    input_field_count: usize,
    predictor_count: usize,
    // Step scratch, sized once
    external_sums: Vec<f64>,
    recurrent_sums: Vec<f64>,
}

impl Reservoir {
    /// Build the reservoir structure from validated settings.
    ///
    /// Stochastic topology and bias generation draw from `rng`; afterward
    /// the structure is immutable and per-step execution is deterministic.
    pub fn build<R: Rng>(
        settings: &ReservoirSettings,
        input_field_count: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let mut pools = Vec::with_capacity(settings.pools.len());
        let mut neurons = Vec::new();
        let mut internal_synapses: Vec<Synapse> = Vec::new();
        for (pool_idx, pool_settings) in settings.pools.iter().enumerate() {
            let (pool, pool_neurons, pool_synapses) =
                Pool::build(pool_settings, pool_idx, neurons.len(), rng)?;
            pools.push(pool);
            neurons.extend(pool_neurons);
            internal_synapses.extend(pool_synapses);
        }

        // Duplicate rejection continues across pool links
        let mut seen: AHashSet<(usize, usize)> = internal_synapses
            .iter()
            .map(|s| (s.source(), s.target()))
            .collect();
        let pool_by_name = |name: &str| pools.iter().find(|p| p.name() == name);
        for link in &settings.links {
            let source_range = pool_by_name(&link.source_pool)
                .expect("validated pool name")
                .range();
            let target_range = pool_by_name(&link.target_pool)
                .expect("validated pool name")
                .range();
            for src in source_range {
                for tgt in target_range.clone() {
                    if src == tgt || rng.gen::<f64>() >= link.density {
                        continue;
                    }
                    if !seen.insert((src, tgt)) {
                        continue;
                    }
                    let weight = link.weight.sample(rng);
                    let delay = sample_delay(link.max_delay, rng);
                    internal_synapses.push(match &link.plasticity {
                        Some(p) => Synapse::new_dynamic(
                            src,
                            tgt,
                            neurons[src].role(),
                            weight,
                            delay,
                            p.clone(),
                        ),
                        None => {
                            Synapse::new_static(src, tgt, neurons[src].role(), weight, delay)
                        }
                    });
                }
            }
        }

        // Input layer: one relay per distinct attached field
        let mut relay_fields: Vec<usize> = settings
            .input_connections
            .iter()
            .map(|c| c.input_field)
            .collect();
        relay_fields.sort_unstable();
        relay_fields.dedup();
        let input_neurons: Vec<InputNeuron> = relay_fields
            .iter()
            .enumerate()
            .map(|(i, &field)| {
                InputNeuron::new(
                    NeuronPlacement {
                        reservoir_flat_idx: i,
                        pool_idx: 0,
                        pool_flat_idx: i,
                        group_idx: 0,
                        coordinates: [field as i32, -1, -1],
                    },
                    settings.input_range,
                )
            })
            .collect();

        let mut input_synapses: Vec<Synapse> = Vec::new();
        let mut seen_input: AHashSet<(usize, usize)> = AHashSet::new();
        for conn in &settings.input_connections {
            let relay = relay_fields
                .binary_search(&conn.input_field)
                .expect("relay exists for attached field");
            let range = pool_by_name(&conn.pool).expect("validated pool name").range();
            for tgt in range {
                if rng.gen::<f64>() >= conn.density || !seen_input.insert((relay, tgt)) {
                    continue;
                }
                let weight = conn.weight.sample(rng);
                let delay = sample_delay(conn.max_delay, rng);
                input_synapses.push(match &conn.plasticity {
                    Some(p) => Synapse::new_dynamic(
                        relay,
                        tgt,
                        NeuronRole::Input,
                        weight,
                        delay,
                        p.clone(),
                    ),
                    None => Synapse::new_static(relay, tgt, NeuronRole::Input, weight, delay),
                });
            }
        }

        // Spectral-radius normalization of the recurrent weights. Only
        // analog continuous-state dynamics are governed by the radius;
        // purely spiking reservoirs skip the pass.
        let has_analog = neurons
            .iter()
            .any(|n| n.activation_kind() == Some(ActivationKind::Analog));
        if let Some(target_radius) = settings.spectral_radius {
            if has_analog {
                let n = neurons.len();
                let mut weights = Array2::<f64>::zeros((n, n));
                for syn in &internal_synapses {
                    weights[[syn.target(), syn.source()]] += syn.weight();
                }
                let radius = estimate_spectral_radius(&weights);
                if radius > 0.0 {
                    let factor = target_radius / radius;
                    for syn in internal_synapses.iter_mut() {
                        syn.scale_weight(factor);
                    }
                    debug!(
                        reservoir = %settings.name,
                        estimated = radius,
                        target = target_radius,
                        "recurrent weights normalized"
                    );
                }
            } else {
                debug!(
                    reservoir = %settings.name,
                    "normalization skipped: no analog neurons"
                );
            }
        }

        let wire = |synapses: Vec<Synapse>| -> Vec<Link> {
            synapses
                .into_iter()
                .map(|synapse| {
                    let signal_kind = match neurons[synapse.target()].activation_kind() {
                        Some(ActivationKind::Spiking) => SignalKind::Spiking,
                        _ => SignalKind::Analog,
                    };
                    Link {
                        synapse,
                        signal_kind,
                    }
                })
                .collect()
        };
        let input_links = wire(input_synapses);
        let internal_links = wire(internal_synapses);

        let predictor_count = neurons.iter().map(Neuron::predictor_count).sum();
        let neuron_count = neurons.len();

        debug!(
            reservoir = %settings.name,
            neurons = neuron_count,
            input_synapses = input_links.len(),
            internal_synapses = internal_links.len(),
            predictors = predictor_count,
            "reservoir built"
        );

        Ok(Self {
            name: settings.name.clone(),
            pools,
            neurons,
            input_neurons,
            relay_fields,
            input_links,
            internal_links,
            input_field_count,
            predictor_count,
            external_sums: vec![0.0; neuron_count],
            recurrent_sums: vec![0.0; neuron_count],
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    pub fn synapse_count(&self) -> usize {
        self.input_links.len() + self.internal_links.len()
    }

    /// Length of this reservoir's slice of the predictor vector.
    pub fn predictor_count(&self) -> usize {
        self.predictor_count
    }

    /// Run one synchronous step against the full external input vector.
    ///
    /// # Panics
    /// The input slice must have exactly the field count the reservoir was
    /// built for; a wrong length is a caller precondition violation.
    pub fn compute(&mut self, input_fields: &[f64], collect_stats: bool) {
        assert_eq!(
            input_fields.len(),
            self.input_field_count,
            "input vector length does not match the configured field count"
        );
        // Input relays publish the new field values first; their signals
        // feed the input synapses' delay lines this same step.
        for (relay, neuron) in self.input_neurons.iter_mut().enumerate() {
            neuron.receive_stimulation(input_fields[self.relay_fields[relay]], 0.0);
            neuron.advance(collect_stats);
        }

        // Phase 1: transport. All reads target previous-cycle (input:
        // current-relay) signals; no hidden neuron mutates yet.
        self.external_sums.fill(0.0);
        self.recurrent_sums.fill(0.0);
        for link in self.input_links.iter_mut() {
            let source = &self.input_neurons[link.synapse.source()];
            let signal = source.signal(link.signal_kind);
            let spiked = source.signal(SignalKind::Spiking) != 0.0;
            self.external_sums[link.synapse.target()] += link.synapse.shift(signal, spiked);
        }
        for link in self.internal_links.iter_mut() {
            let source = &self.neurons[link.synapse.source()];
            let signal = source.signal(link.signal_kind);
            let spiked = source.signal(SignalKind::Spiking) != 0.0;
            self.recurrent_sums[link.synapse.target()] += link.synapse.shift(signal, spiked);
        }

        // Phase 2: receive. Hard barrier before any state mutation.
        for (idx, neuron) in self.neurons.iter_mut().enumerate() {
            neuron.receive_stimulation(self.external_sums[idx], self.recurrent_sums[idx]);
        }

        // Phase 3: advance. Each neuron mutates only its own state, so the
        // fork-join split cannot affect the outcome.
        if self.neurons.len() >= PARALLEL_THRESHOLD {
            self.neurons
                .par_iter_mut()
                .for_each(|neuron| neuron.advance(collect_stats));
        } else {
            for neuron in self.neurons.iter_mut() {
                neuron.advance(collect_stats);
            }
        }
    }

    /// Phase 4: append predictor values in flat neuron order.
    pub fn harvest_predictors(&self, buffer: &mut Vec<f64>) {
        for neuron in &self.neurons {
            neuron.write_predictors_into(buffer);
        }
    }

    /// Reinitialize all dynamic state; structure and weights are kept.
    pub fn reset(&mut self, clear_statistics: bool) {
        for neuron in self.input_neurons.iter_mut() {
            neuron.reset(clear_statistics);
        }
        for neuron in self.neurons.iter_mut() {
            neuron.reset(clear_statistics);
        }
        for link in self.input_links.iter_mut() {
            link.synapse.reset();
        }
        for link in self.internal_links.iter_mut() {
            link.synapse.reset();
        }
    }

    /// Per-neuron statistics snapshots, flat order, for diagnostics.
    pub fn statistics(&self) -> Vec<StatisticsSnapshot> {
        self.neurons
            .iter()
            .map(|n| n.statistics().snapshot())
            .collect()
    }

    /// Recurrent weight matrix assembled from the internal synapses
    /// (row = target, column = source). Diagnostics and tests only.
    pub fn weight_matrix(&self) -> Array2<f64> {
        let n = self.neurons.len();
        let mut weights = Array2::<f64>::zeros((n, n));
        for link in &self.internal_links {
            weights[[link.synapse.target(), link.synapse.source()]] += link.synapse.weight();
        }
        weights
    }

    #[cfg(test)]
    pub(crate) fn input_range_of_relay(&self, relay: usize) -> liquidnet_neural::Interval {
        *self.input_neurons[relay].input_range()
    }
}

#[inline]
fn sample_delay<R: Rng>(max_delay: usize, rng: &mut R) -> usize {
    if max_delay == 0 {
        0
    } else {
        rng.gen_range(0..=max_delay)
    }
}
