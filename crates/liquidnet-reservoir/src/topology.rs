// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Interconnection Schemas
//!
//! Schemas generate candidate directed edges over one pool's neurons. They
//! know nothing about duplicate rejection — the pool applies schemas in
//! sequence and filters repeated (source, target) pairs across the whole
//! sequence.
//!
//! Iteration order over pairs is fixed (source-major), so one seeded
//! generator reproduces the same topology on every build.

use crate::settings::{InterconnectSettings, RandomValue};
use liquidnet_neural::{NeuronRole, PlasticitySettings};
use rand::Rng;

/// One candidate directed edge, in reservoir-flat indices. The weight is a
/// magnitude; the synapse constructor applies the source role's sign.
#[derive(Debug, Clone)]
pub struct EdgeCandidate {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
    pub delay: usize,
    pub plasticity: Option<PlasticitySettings>,
}

/// Apply one schema over a pool whose neurons occupy reservoir-flat
/// indices `base..base + roles.len()`, in pool-flat (placement) order.
pub fn apply_schema<R: Rng>(
    schema: &InterconnectSettings,
    roles: &[NeuronRole],
    base: usize,
    rng: &mut R,
) -> Vec<EdgeCandidate> {
    match schema {
        InterconnectSettings::Random {
            density,
            weight,
            max_delay,
            allow_self,
            source_role,
            target_role,
            plasticity,
        } => random_schema(
            roles,
            base,
            *density,
            weight,
            *max_delay,
            *allow_self,
            *source_role,
            *target_role,
            plasticity,
            rng,
        ),
        InterconnectSettings::Chain {
            ratio,
            circle,
            weight,
            max_delay,
            plasticity,
        } => chain_schema(
            roles.len(),
            base,
            *ratio,
            *circle,
            weight,
            *max_delay,
            plasticity,
            rng,
        ),
    }
}

/// Independently include each ordered (source, target) pair with the
/// configured density, optionally filtered by source/target role.
#[allow(clippy::too_many_arguments)]
fn random_schema<R: Rng>(
    roles: &[NeuronRole],
    base: usize,
    density: f64,
    weight: &RandomValue,
    max_delay: usize,
    allow_self: bool,
    source_role: Option<NeuronRole>,
    target_role: Option<NeuronRole>,
    plasticity: &Option<PlasticitySettings>,
    rng: &mut R,
) -> Vec<EdgeCandidate> {
    let n = roles.len();
    let mut edges = Vec::new();
    for src in 0..n {
        if source_role.is_some_and(|role| roles[src] != role) {
            continue;
        }
        for tgt in 0..n {
            if src == tgt && !allow_self {
                continue;
            }
            if target_role.is_some_and(|role| roles[tgt] != role) {
                continue;
            }
            if rng.gen::<f64>() >= density {
                continue;
            }
            edges.push(EdgeCandidate {
                source: base + src,
                target: base + tgt,
                weight: weight.sample(rng),
                delay: sample_delay(max_delay, rng),
                plasticity: plasticity.clone(),
            });
        }
    }
    edges
}

/// Connect the leading `ratio` share of the pool along its placement
/// ordering into an open chain, or a closed ring when `circle` is set.
#[allow(clippy::too_many_arguments)]
fn chain_schema<R: Rng>(
    pool_size: usize,
    base: usize,
    ratio: f64,
    circle: bool,
    weight: &RandomValue,
    max_delay: usize,
    plasticity: &Option<PlasticitySettings>,
    rng: &mut R,
) -> Vec<EdgeCandidate> {
    let count = ((pool_size as f64 * ratio).round() as usize).clamp(2.min(pool_size), pool_size);
    if count < 2 {
        return Vec::new();
    }
    let mut edges = Vec::with_capacity(count);
    for i in 0..count {
        let next = i + 1;
        if next == count && !circle {
            break;
        }
        edges.push(EdgeCandidate {
            source: base + i,
            target: base + (next % count),
            weight: weight.sample(rng),
            delay: sample_delay(max_delay, rng),
            plasticity: plasticity.clone(),
        });
    }
    edges
}

#[inline]
fn sample_delay<R: Rng>(max_delay: usize, rng: &mut R) -> usize {
    if max_delay == 0 {
        0
    } else {
        rng.gen_range(0..=max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn roles(n: usize) -> Vec<NeuronRole> {
        vec![NeuronRole::Excitatory; n]
    }

    fn random(density: f64, allow_self: bool) -> InterconnectSettings {
        InterconnectSettings::Random {
            density,
            weight: RandomValue::Constant(1.0),
            max_delay: 0,
            allow_self,
            source_role: None,
            target_role: None,
            plasticity: None,
        }
    }

    #[test]
    fn test_random_density_zero_and_one() {
        let mut rng = StdRng::seed_from_u64(3);
        let none = apply_schema(&random(0.0, false), &roles(10), 0, &mut rng);
        assert!(none.is_empty());
        let all = apply_schema(&random(1.0, false), &roles(10), 0, &mut rng);
        assert_eq!(all.len(), 10 * 9);
    }

    #[test]
    fn test_random_excludes_self_loops() {
        let mut rng = StdRng::seed_from_u64(3);
        let edges = apply_schema(&random(1.0, false), &roles(5), 100, &mut rng);
        assert!(edges.iter().all(|e| e.source != e.target));
        // Indices are offset by the pool base
        assert!(edges.iter().all(|e| (100..105).contains(&e.source)));
    }

    #[test]
    fn test_random_edge_count_converges_to_density() {
        let n = 80;
        let density = 0.3;
        let mut rng = StdRng::seed_from_u64(11);
        let edges = apply_schema(&random(density, false), &roles(n), 0, &mut rng);
        let expected = density * (n * (n - 1)) as f64;
        let deviation = (edges.len() as f64 - expected).abs() / expected;
        assert!(
            deviation < 0.1,
            "edge count {} too far from expected {}",
            edges.len(),
            expected
        );
    }

    #[test]
    fn test_random_role_filter() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut mixed = roles(6);
        mixed[0] = NeuronRole::Inhibitory;
        mixed[1] = NeuronRole::Inhibitory;
        let schema = InterconnectSettings::Random {
            density: 1.0,
            weight: RandomValue::Constant(1.0),
            max_delay: 0,
            allow_self: false,
            source_role: Some(NeuronRole::Inhibitory),
            target_role: Some(NeuronRole::Excitatory),
            plasticity: None,
        };
        let edges = apply_schema(&schema, &mixed, 0, &mut rng);
        // 2 inhibitory sources × 4 excitatory targets
        assert_eq!(edges.len(), 8);
        assert!(edges.iter().all(|e| e.source < 2 && e.target >= 2));
    }

    #[test]
    fn test_chain_ring_connects_all_successors() {
        let mut rng = StdRng::seed_from_u64(3);
        let schema = InterconnectSettings::Chain {
            ratio: 1.0,
            circle: true,
            weight: RandomValue::Constant(1.0),
            max_delay: 0,
            plasticity: None,
        };
        let n = 7;
        let edges = apply_schema(&schema, &roles(n), 0, &mut rng);
        assert_eq!(edges.len(), n);
        for (i, edge) in edges.iter().enumerate() {
            assert_eq!(edge.source, i);
            assert_eq!(edge.target, (i + 1) % n);
        }
    }

    #[test]
    fn test_chain_open_has_no_wraparound() {
        let mut rng = StdRng::seed_from_u64(3);
        let schema = InterconnectSettings::Chain {
            ratio: 1.0,
            circle: false,
            weight: RandomValue::Constant(1.0),
            max_delay: 0,
            plasticity: None,
        };
        let edges = apply_schema(&schema, &roles(5), 0, &mut rng);
        assert_eq!(edges.len(), 4);
        assert!(edges.iter().all(|e| e.target == e.source + 1));
    }

    #[test]
    fn test_chain_ratio_limits_span() {
        let mut rng = StdRng::seed_from_u64(3);
        let schema = InterconnectSettings::Chain {
            ratio: 0.5,
            circle: false,
            weight: RandomValue::Constant(1.0),
            max_delay: 0,
            plasticity: None,
        };
        let edges = apply_schema(&schema, &roles(10), 0, &mut rng);
        // Chain over the leading 5 neurons
        assert_eq!(edges.len(), 4);
        assert!(edges.iter().all(|e| e.target <= 4));
    }
}
