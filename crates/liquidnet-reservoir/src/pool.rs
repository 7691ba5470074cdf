// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Pool Construction
//!
//! A pool realizes its neuron groups over a 3D lattice: every neuron gets
//! a unique shuffled lattice coordinate, a group-sampled bias and (per the
//! group's readout density) an owned predictor set. Intra-pool wiring is
//! produced by the configured interconnection schemas applied in sequence;
//! duplicate (source, target) pairs are rejected across the sequence.
//!
//! Neurons live in the owning reservoir's flat arena; the pool keeps the
//! structural metadata (name, index range, group sizes).

use crate::settings::PoolSettings;
use crate::topology::apply_schema;
use crate::types::{ReservoirError, Result};
use ahash::AHashSet;
use liquidnet_neural::{
    build_activation, ActivationKind, HiddenNeuron, Neuron, NeuronPlacement, NeuronRole, Synapse,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::Range;
use tracing::debug;

/// Structural metadata of one built pool.
#[derive(Debug, Clone)]
pub struct Pool {
    name: String,
    first_flat_idx: usize,
    neuron_count: usize,
    /// Neuron count per group, in group order
    group_sizes: Vec<usize>,
}

impl Pool {
    /// Build the pool's neurons and intra-pool synapses.
    ///
    /// `base` is the reservoir-flat index of the pool's first neuron;
    /// `pool_idx` its position within the reservoir. Construction is the
    /// only stochastic phase; the shared `rng` keeps it reproducible.
    pub fn build<R: Rng>(
        settings: &PoolSettings,
        pool_idx: usize,
        base: usize,
        rng: &mut R,
    ) -> Result<(Pool, Vec<Neuron>, Vec<Synapse>)> {
        let [dx, dy, dz] = settings.dimensions;
        let total = dx * dy * dz;

        // Shares must be usable even when the caller skipped the settings
        // validation pass
        for group in &settings.groups {
            if group.rel_share <= 0.0 || !group.rel_share.is_finite() {
                return Err(ReservoirError::InvalidShare {
                    group: group.name.clone(),
                    share: group.rel_share,
                });
            }
        }

        // Unique lattice coordinates, shuffled so group membership does not
        // correlate with spatial position.
        let mut coordinates = Vec::with_capacity(total);
        for x in 0..dx {
            for y in 0..dy {
                for z in 0..dz {
                    coordinates.push([x as i32, y as i32, z as i32]);
                }
            }
        }
        coordinates.shuffle(rng);

        let group_sizes = partition_by_share(
            total,
            &settings
                .groups
                .iter()
                .map(|g| g.rel_share)
                .collect::<Vec<_>>(),
        );

        let mut neurons = Vec::with_capacity(total);
        let mut pool_flat = 0usize;
        for (group_idx, (group, &count)) in
            settings.groups.iter().zip(group_sizes.iter()).enumerate()
        {
            let analog = group.activation.kind() == ActivationKind::Analog;
            for _ in 0..count {
                let placement = NeuronPlacement {
                    reservoir_flat_idx: base + pool_flat,
                    pool_idx,
                    pool_flat_idx: pool_flat,
                    group_idx,
                    coordinates: coordinates[pool_flat],
                };
                let bias = group.bias.sample(rng);
                let retainment = if analog { group.retainment.sample(rng) } else { 0.0 };
                let predictors = if rng.gen::<f64>() < group.readout_density {
                    Some(group.predictors.clone())
                } else {
                    None
                };
                let neuron = HiddenNeuron::new(
                    placement,
                    group.role,
                    bias,
                    group.signaling_restriction,
                    group.activation.kind(),
                    build_activation(&group.activation)?,
                    retainment,
                    group.firing_threshold,
                    predictors,
                )?;
                neurons.push(Neuron::Hidden(neuron));
                pool_flat += 1;
            }
        }

        let roles: Vec<NeuronRole> = neurons.iter().map(Neuron::role).collect();
        let mut seen: AHashSet<(usize, usize)> = AHashSet::new();
        let mut synapses = Vec::new();
        for schema in &settings.interconnects {
            for edge in apply_schema(schema, &roles, base, rng) {
                if !seen.insert((edge.source, edge.target)) {
                    continue;
                }
                let source_role = roles[edge.source - base];
                synapses.push(match edge.plasticity {
                    Some(plasticity) => Synapse::new_dynamic(
                        edge.source,
                        edge.target,
                        source_role,
                        edge.weight,
                        edge.delay,
                        plasticity,
                    ),
                    None => Synapse::new_static(
                        edge.source,
                        edge.target,
                        source_role,
                        edge.weight,
                        edge.delay,
                    ),
                });
            }
        }

        debug!(
            pool = %settings.name,
            neurons = total,
            synapses = synapses.len(),
            "pool built"
        );

        Ok((
            Pool {
                name: settings.name.clone(),
                first_flat_idx: base,
                neuron_count: total,
                group_sizes,
            },
            neurons,
            synapses,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reservoir-flat index range of this pool's neurons.
    pub fn range(&self) -> Range<usize> {
        self.first_flat_idx..self.first_flat_idx + self.neuron_count
    }

    pub fn neuron_count(&self) -> usize {
        self.neuron_count
    }

    pub fn group_sizes(&self) -> &[usize] {
        &self.group_sizes
    }
}

/// Split `total` across groups by relative share, largest remainder first.
/// Every group with a positive share gets at least its floor; leftover
/// slots go to the largest fractional parts in group order. Shares must be
/// positive and finite (checked by `Pool::build`).
fn partition_by_share(total: usize, shares: &[f64]) -> Vec<usize> {
    let share_sum: f64 = shares.iter().sum();
    let exact: Vec<f64> = shares
        .iter()
        .map(|s| s / share_sum * total as f64)
        .collect();
    let mut counts: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();
    let assigned: usize = counts.iter().sum();

    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| {
        let fa = exact[a] - exact[a].floor();
        let fb = exact[b] - exact[b].floor();
        fb.total_cmp(&fa).then(a.cmp(&b))
    });
    for idx in order.into_iter().cycle().take(total - assigned) {
        counts[idx] += 1;
    }
    counts
}
