// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Liquidnet Neural Computation
//!
//! Leaf-level building blocks of the reservoir simulation:
//! - **Types**: kinds, roles, intervals, placements, error types
//! - **Activation**: analog transfer functions and spiking integrate-and-fire units
//! - **Neuron**: input and hidden neuron models with the two-phase step contract
//! - **Synapse**: delayed, weighted signal paths with optional short-term plasticity
//! - **Statistics / Predictors**: rolling per-neuron diagnostics and readout features
//!
//! Everything here is deterministic: given the same stimulation sequence, a
//! neuron or synapse reproduces bit-identical state across runs. Stochastic
//! construction (topology, bias sampling) lives in `liquidnet-reservoir`.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod activation;
pub mod neuron;
pub mod predictors;
pub mod statistics;
pub mod synapse;
pub mod types;

// Re-export the working set
pub use activation::{
    build_activation, ActivationSettings, ActivationUnit, SAFE_INPUT_BOUND,
};
pub use neuron::{HiddenNeuron, InputNeuron, Neuron};
pub use predictors::{PredictorId, PredictorSet, PredictorSettings};
pub use statistics::{BasicStat, NeuronStatistics, StatisticsSnapshot};
pub use synapse::{DelayLine, Plasticity, PlasticitySettings, Synapse};
pub use types::{
    ActivationKind, Interval, NeuralError, NeuronPlacement, NeuronRole, Result, SignalKind,
    SignalingRestriction,
};
