// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Liquidnet - Reservoir-Computing Simulation Core
//!
//! Liquidnet is a recurrent simulation engine for reservoir computing in
//! the Echo State Network / Liquid State Machine family. It unifies
//! continuous-valued leaky-integrator neurons and event-driven
//! integrate-and-fire neurons inside one synchronous, order-independent
//! discrete-time update, with configurable delay lines, short-term
//! plasticity and deterministic predictor extraction.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! liquidnet = "0.1"
//! ```
//!
//! ```rust
//! use liquidnet::prelude::*;
//!
//! let settings = PreprocessorSettings {
//!     input_field_count: 1,
//!     reservoirs: vec![ReservoirSettings {
//!         name: "main".to_string(),
//!         input_range: Interval::SYMMETRIC_UNIT,
//!         pools: vec![PoolSettings {
//!             name: "pool".to_string(),
//!             dimensions: [10, 1, 1],
//!             groups: vec![NeuronGroupSettings::analog("exc", ActivationSettings::TanH)],
//!             interconnects: vec![InterconnectSettings::Random {
//!                 density: 0.3,
//!                 weight: RandomValue::Uniform { min: 0.1, max: 1.0 },
//!                 max_delay: 0,
//!                 allow_self: false,
//!                 source_role: None,
//!                 target_role: None,
//!                 plasticity: None,
//!             }],
//!         }],
//!         links: vec![],
//!         input_connections: vec![InputConnectionSettings {
//!             input_field: 0,
//!             pool: "pool".to_string(),
//!             density: 1.0,
//!             weight: RandomValue::Uniform { min: 0.1, max: 0.5 },
//!             max_delay: 0,
//!             plasticity: None,
//!         }],
//!         spectral_radius: Some(0.9),
//!     }],
//!     feeding: FeedingSettings::Continuous { boot_cycles: 0 },
//!     reset_between_patterns: true,
//!     seed: 42,
//! };
//!
//! let mut preprocessor = NeuralPreprocessor::new(settings).unwrap();
//! let predictors = preprocessor.preprocess(&[0.5]).unwrap();
//! assert_eq!(predictors.len(), preprocessor.predictor_count());
//! ```
//!
//! ## Crates
//!
//! - [`liquidnet_neural`] — activation units, neuron models, synapses,
//!   statistics and predictors
//! - [`liquidnet_reservoir`] — settings, pools, topology schemas,
//!   reservoirs with spectral-radius normalization, the preprocessor
//!
//! Readout training, configuration parsing and data I/O are external
//! collaborators and live outside this crate.

pub use liquidnet_neural as neural;
pub use liquidnet_reservoir as reservoir;

/// Common imports for working with the simulation core.
pub mod prelude {
    pub use liquidnet_neural::{
        ActivationKind, ActivationSettings, Interval, NeuralError, Neuron, NeuronPlacement,
        NeuronRole, PlasticitySettings, PredictorId, PredictorSettings, SignalKind,
        SignalingRestriction, StatisticsSnapshot,
    };
    pub use liquidnet_reservoir::{
        estimate_spectral_radius, FeedingSettings, InputConnectionSettings,
        InterconnectSettings, NeuralPreprocessor, NeuronGroupSettings, PatternAggregation,
        PoolLinkSettings, PoolSettings, PreprocessorSettings, RandomValue, Reservoir,
        ReservoirError, ReservoirSettings,
    };
}
