// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Reservoir Configuration
//!
//! Pre-validated settings objects consumed by the construction phase. The
//! structs are plain data with serde derives; parsing them out of any file
//! format is the caller's concern. `PreprocessorSettings::validate` is the
//! single gate for every fatal configuration inconsistency — construction
//! assumes validated settings.

use crate::types::{ReservoirError, Result};
use liquidnet_neural::{
    ActivationKind, ActivationSettings, Interval, NeuronRole, PlasticitySettings,
    PredictorSettings, SignalingRestriction,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Sampling distribution for construction-time values (biases, weights).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RandomValue {
    Constant(f64),
    Uniform { min: f64, max: f64 },
    Gaussian { mean: f64, std_dev: f64 },
}

impl RandomValue {
    /// Draw one value. Confined to the construction phase.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            RandomValue::Constant(v) => *v,
            RandomValue::Uniform { min, max } => {
                if min == max {
                    *min
                } else {
                    rng.gen_range(*min..*max)
                }
            }
            RandomValue::Gaussian { mean, std_dev } => {
                // Box-Muller transform
                let u1: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
                let u2: f64 = rng.gen_range(0.0..1.0);
                let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
                mean + std_dev * z
            }
        }
    }

    fn validate(&self, what: &str) -> Result<()> {
        let ok = match self {
            RandomValue::Constant(v) => v.is_finite(),
            RandomValue::Uniform { min, max } => min.is_finite() && max.is_finite() && min <= max,
            RandomValue::Gaussian { mean, std_dev } => {
                mean.is_finite() && std_dev.is_finite() && *std_dev >= 0.0
            }
        };
        if ok {
            Ok(())
        } else {
            Err(ReservoirError::InvalidConfiguration(format!(
                "{}: malformed distribution {:?}",
                what, self
            )))
        }
    }
}

/// One named neuron group inside a pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronGroupSettings {
    pub name: String,
    /// Excitatory or Inhibitory; input relays are never part of a pool
    pub role: NeuronRole,
    /// Relative share of the pool's neuron count claimed by this group
    pub rel_share: f64,
    pub activation: ActivationSettings,
    /// Constant-bias sampling distribution
    pub bias: RandomValue,
    /// Probability that a neuron of this group carries a predictor set
    pub readout_density: f64,
    /// Analog only: previous-state blending strength sampled per neuron
    pub retainment: RandomValue,
    /// Analog only: normalized-state rise that counts as a synthetic spike
    pub firing_threshold: f64,
    pub signaling_restriction: SignalingRestriction,
    pub predictors: PredictorSettings,
}

impl NeuronGroupSettings {
    /// Excitatory analog group with sensible defaults.
    pub fn analog(name: &str, activation: ActivationSettings) -> Self {
        Self {
            name: name.to_string(),
            role: NeuronRole::Excitatory,
            rel_share: 1.0,
            activation,
            bias: RandomValue::Constant(0.0),
            readout_density: 1.0,
            retainment: RandomValue::Constant(0.0),
            firing_threshold: 0.00125,
            signaling_restriction: SignalingRestriction::NoRestriction,
            predictors: PredictorSettings::default(),
        }
    }

    /// Excitatory spiking group with sensible defaults.
    pub fn spiking(name: &str, activation: ActivationSettings) -> Self {
        Self {
            predictors: PredictorSettings {
                activation: false,
                firing_fading_sum: true,
                ..PredictorSettings::default()
            },
            ..Self::analog(name, activation)
        }
    }
}

/// One intra-pool interconnection schema. Schemas are applied in order,
/// each adding directed synapses without removing prior ones; duplicate
/// (source, target) pairs are rejected across the whole sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InterconnectSettings {
    /// Independently include each ordered (source, target) pair with the
    /// configured density.
    Random {
        density: f64,
        weight: RandomValue,
        /// Delays are drawn uniformly from 0..=max_delay
        max_delay: usize,
        allow_self: bool,
        /// Restrict to sources of this role; role-split densities are
        /// expressed as multiple Random schemas with different filters
        source_role: Option<NeuronRole>,
        /// Restrict to targets of this role
        target_role: Option<NeuronRole>,
        /// Present: dynamic synapses with these plasticity parameters
        plasticity: Option<PlasticitySettings>,
    },
    /// Connect neurons along their placement ordering into an open chain
    /// or a closed ring.
    Chain {
        /// Leading share of the pool included in the chain, in (0, 1]
        ratio: f64,
        circle: bool,
        weight: RandomValue,
        max_delay: usize,
        plasticity: Option<PlasticitySettings>,
    },
}

/// One pool: 3D lattice dimensions, neuron groups, wiring schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSettings {
    pub name: String,
    /// Lattice extent; the pool holds x·y·z neurons
    pub dimensions: [usize; 3],
    pub groups: Vec<NeuronGroupSettings>,
    pub interconnects: Vec<InterconnectSettings>,
}

/// Wiring of one external input field into one pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConnectionSettings {
    /// Index into the external input vector
    pub input_field: usize,
    pub pool: String,
    /// Probability of wiring the field to each pool neuron
    pub density: f64,
    pub weight: RandomValue,
    pub max_delay: usize,
    pub plasticity: Option<PlasticitySettings>,
}

/// Directed pool-to-pool synapse block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolLinkSettings {
    pub source_pool: String,
    pub target_pool: String,
    /// Probability of each ordered cross-pool (source, target) pair
    pub density: f64,
    pub weight: RandomValue,
    pub max_delay: usize,
    pub plasticity: Option<PlasticitySettings>,
}

/// One reservoir: pools, links, input wiring, normalization target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservoirSettings {
    pub name: String,
    /// Range the input relays bound external values into
    pub input_range: Interval,
    pub pools: Vec<PoolSettings>,
    pub links: Vec<PoolLinkSettings>,
    pub input_connections: Vec<InputConnectionSettings>,
    /// Target spectral radius of the recurrent weight matrix; `None`
    /// disables normalization
    pub spectral_radius: Option<f64>,
}

/// How a patterned run folds its per-step predictors into one vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternAggregation {
    /// Use the final step's predictor vector
    FinalStep,
    /// Average predictors across all steps of the pattern
    Average,
}

/// Feeding regime of the preprocessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedingSettings {
    /// One external vector per step; predictors per step after warm-up
    Continuous { boot_cycles: usize },
    /// Each input instance is a step sequence; predictors once per pattern
    Patterned { aggregation: PatternAggregation },
}

/// Top-level preprocessor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessorSettings {
    /// Length of the external input vector
    pub input_field_count: usize,
    pub reservoirs: Vec<ReservoirSettings>,
    pub feeding: FeedingSettings,
    /// Reset reservoir state at every pattern boundary (patterned regime)
    pub reset_between_patterns: bool,
    /// Seed for all construction-time randomness
    pub seed: u64,
}

fn check_density(pool: &str, density: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&density) || density.is_nan() {
        return Err(ReservoirError::InvalidDensity {
            pool: pool.to_string(),
            density,
        });
    }
    Ok(())
}

impl InterconnectSettings {
    fn validate(&self, pool: &str) -> Result<()> {
        match self {
            InterconnectSettings::Random {
                density, weight, ..
            } => {
                check_density(pool, *density)?;
                weight.validate("interconnect weight")
            }
            InterconnectSettings::Chain { ratio, weight, .. } => {
                if !(0.0..=1.0).contains(ratio) || *ratio == 0.0 {
                    return Err(ReservoirError::InvalidChainRatio(*ratio));
                }
                weight.validate("chain weight")
            }
        }
    }
}

impl NeuronGroupSettings {
    fn validate(&self, pool: &str) -> Result<()> {
        if self.rel_share <= 0.0 || !self.rel_share.is_finite() {
            return Err(ReservoirError::InvalidShare {
                group: self.name.clone(),
                share: self.rel_share,
            });
        }
        check_density(pool, self.readout_density)?;
        self.bias.validate("group bias")?;
        self.retainment.validate("group retainment")?;
        // Construction of the activation unit surfaces parameter errors
        // (non-positive ISRU shape, degenerate voltages) right here.
        liquidnet_neural::build_activation(&self.activation)?;
        if self.activation.kind() == ActivationKind::Spiking
            && self.signaling_restriction == SignalingRestriction::AnalogOnly
        {
            return Err(liquidnet_neural::NeuralError::IncompatibleRestriction {
                restriction: self.signaling_restriction,
                kind: ActivationKind::Spiking,
            }
            .into());
        }
        Ok(())
    }
}

impl ReservoirSettings {
    fn validate(&self, input_field_count: usize) -> Result<()> {
        if self.pools.is_empty() {
            return Err(ReservoirError::NoPools(self.name.clone()));
        }
        if let Some(radius) = self.spectral_radius {
            if radius <= 0.0 || !radius.is_finite() {
                return Err(ReservoirError::InvalidSpectralRadius(radius));
            }
        }
        let mut pool_names = ahash::AHashSet::new();
        for pool in &self.pools {
            if !pool_names.insert(pool.name.as_str()) {
                return Err(ReservoirError::DuplicatePoolName(pool.name.clone()));
            }
            if pool.dimensions.iter().product::<usize>() == 0 {
                return Err(ReservoirError::EmptyPool {
                    pool: pool.name.clone(),
                    dims: pool.dimensions,
                });
            }
            if pool.groups.is_empty() {
                return Err(ReservoirError::NoGroups(pool.name.clone()));
            }
            let mut group_names = ahash::AHashSet::new();
            for group in &pool.groups {
                if !group_names.insert(group.name.as_str()) {
                    return Err(ReservoirError::DuplicateGroupName {
                        pool: pool.name.clone(),
                        group: group.name.clone(),
                    });
                }
                group.validate(&pool.name)?;
            }
            for schema in &pool.interconnects {
                schema.validate(&pool.name)?;
            }
        }
        for link in &self.links {
            for name in [&link.source_pool, &link.target_pool] {
                if !pool_names.contains(name.as_str()) {
                    return Err(ReservoirError::UnknownPool(name.clone()));
                }
            }
            check_density(&link.target_pool, link.density)?;
            link.weight.validate("link weight")?;
        }
        for conn in &self.input_connections {
            if conn.input_field >= input_field_count {
                return Err(ReservoirError::InputFieldOutOfRange {
                    index: conn.input_field,
                    field_count: input_field_count,
                });
            }
            if !pool_names.contains(conn.pool.as_str()) {
                return Err(ReservoirError::UnknownPool(conn.pool.clone()));
            }
            check_density(&conn.pool, conn.density)?;
            conn.weight.validate("input weight")?;
        }
        Ok(())
    }
}

impl PreprocessorSettings {
    /// Validate the complete configuration. Every failure here is fatal:
    /// the caller must rebuild with corrected settings.
    pub fn validate(&self) -> Result<()> {
        if self.reservoirs.is_empty() {
            return Err(ReservoirError::InvalidConfiguration(
                "at least one reservoir is required".to_string(),
            ));
        }
        for reservoir in &self.reservoirs {
            reservoir.validate(self.input_field_count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn minimal_settings() -> PreprocessorSettings {
        PreprocessorSettings {
            input_field_count: 1,
            reservoirs: vec![ReservoirSettings {
                name: "res".to_string(),
                input_range: Interval::SYMMETRIC_UNIT,
                pools: vec![PoolSettings {
                    name: "pool".to_string(),
                    dimensions: [2, 2, 1],
                    groups: vec![NeuronGroupSettings::analog(
                        "exc",
                        ActivationSettings::TanH,
                    )],
                    interconnects: vec![InterconnectSettings::Random {
                        density: 0.5,
                        weight: RandomValue::Uniform { min: 0.0, max: 1.0 },
                        max_delay: 0,
                        allow_self: false,
                        source_role: None,
                        target_role: None,
                        plasticity: None,
                    }],
                }],
                links: vec![],
                input_connections: vec![InputConnectionSettings {
                    input_field: 0,
                    pool: "pool".to_string(),
                    density: 1.0,
                    weight: RandomValue::Constant(0.5),
                    max_delay: 0,
                    plasticity: None,
                }],
                spectral_radius: Some(0.9),
            }],
            feeding: FeedingSettings::Continuous { boot_cycles: 0 },
            reset_between_patterns: true,
            seed: 1,
        }
    }

    #[test]
    fn test_minimal_settings_validate() {
        assert!(minimal_settings().validate().is_ok());
    }

    #[test]
    fn test_zero_groups_rejected() {
        let mut s = minimal_settings();
        s.reservoirs[0].pools[0].groups.clear();
        assert!(matches!(s.validate(), Err(ReservoirError::NoGroups(_))));
    }

    #[test]
    fn test_duplicate_group_names_rejected() {
        let mut s = minimal_settings();
        let dup = s.reservoirs[0].pools[0].groups[0].clone();
        s.reservoirs[0].pools[0].groups.push(dup);
        assert!(matches!(
            s.validate(),
            Err(ReservoirError::DuplicateGroupName { .. })
        ));
    }

    #[test]
    fn test_non_positive_isru_shape_rejected() {
        let mut s = minimal_settings();
        s.reservoirs[0].pools[0].groups[0].activation =
            ActivationSettings::Isru { shape: -1.0 };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_spiking_group_with_analog_only_restriction_rejected() {
        let mut s = minimal_settings();
        let group = &mut s.reservoirs[0].pools[0].groups[0];
        group.activation =
            ActivationSettings::LeakyIf(liquidnet_neural::activation::LeakyIfSettings::default());
        group.signaling_restriction = SignalingRestriction::AnalogOnly;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_input_field_out_of_range_rejected() {
        let mut s = minimal_settings();
        s.reservoirs[0].input_connections[0].input_field = 3;
        assert!(matches!(
            s.validate(),
            Err(ReservoirError::InputFieldOutOfRange { .. })
        ));
    }

    #[test]
    fn test_density_out_of_range_rejected() {
        let mut s = minimal_settings();
        s.reservoirs[0].input_connections[0].density = 1.5;
        assert!(matches!(
            s.validate(),
            Err(ReservoirError::InvalidDensity { .. })
        ));
    }

    #[test]
    fn test_random_value_sampling() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(RandomValue::Constant(2.5).sample(&mut rng), 2.5);
        for _ in 0..100 {
            let v = RandomValue::Uniform { min: -1.0, max: 1.0 }.sample(&mut rng);
            assert!((-1.0..1.0).contains(&v));
        }
        let gaussian = RandomValue::Gaussian {
            mean: 10.0,
            std_dev: 0.0,
        };
        assert_eq!(gaussian.sample(&mut rng), 10.0);
    }

    #[test]
    fn test_sampling_is_deterministic_per_seed() {
        let dist = RandomValue::Gaussian {
            mean: 0.0,
            std_dev: 1.0,
        };
        let a: Vec<f64> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| dist.sample(&mut rng)).collect()
        };
        let b: Vec<f64> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| dist.sample(&mut rng)).collect()
        };
        assert_eq!(a, b);
    }
}
