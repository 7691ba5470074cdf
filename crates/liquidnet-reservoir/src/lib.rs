// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Liquidnet Reservoir Composition
//!
//! Composes the leaf components of `liquidnet-neural` into running
//! structure:
//!
//! - **Settings**: pre-validated configuration objects (pools, groups,
//!   interconnection schemas, synapse models)
//! - **Pool**: spatially placed neuron collection wired by schemas
//! - **Reservoir**: pools + input synapses + inter-pool synapses with
//!   spectral-radius weight normalization
//! - **NeuralPreprocessor**: drives one or more reservoirs across a time
//!   series under continuous or patterned feeding and harvests the
//!   fixed-order predictor vector
//!
//! All randomness (topology, bias sampling) happens during construction
//! from one seeded generator; per-step execution is a pure deterministic
//! function of state and input.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod pool;
pub mod preprocessor;
pub mod reservoir;
pub mod settings;
pub mod spectral;
pub mod topology;
mod types;

pub use pool::Pool;
pub use preprocessor::NeuralPreprocessor;
pub use reservoir::Reservoir;
pub use settings::{
    FeedingSettings, InputConnectionSettings, InterconnectSettings, NeuronGroupSettings,
    PatternAggregation, PoolLinkSettings, PoolSettings, PreprocessorSettings, RandomValue,
    ReservoirSettings,
};
pub use spectral::estimate_spectral_radius;
pub use types::{ReservoirError, Result};
