// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Spiking activation units: integrate-and-fire membrane models.
//!
//! Each unit advances a membrane potential by one discrete simulation step
//! per `compute` call, splitting the step into `sub_steps` Euler
//! sub-iterations. Crossing the firing threshold emits a binary spike (1.0),
//! resets the membrane and starts the refractory countdown during which
//! stimulation is ignored.
//!
//! Potentials are expressed on a normalized scale: resting at 0, firing
//! threshold around 1. The stimuli coefficient converts the dimensionless
//! stimulation sum into membrane drive.

use super::{bound_input, check_positive, ActivationUnit};
use crate::types::{ActivationKind, Interval, NeuralError, Result};
use serde::{Deserialize, Serialize};

fn check_voltages(reset_v: f64, firing_v: f64) -> Result<()> {
    if firing_v <= reset_v {
        return Err(NeuralError::InvalidParameter(format!(
            "Firing threshold {} must exceed reset potential {}",
            firing_v, reset_v
        )));
    }
    Ok(())
}

/// Non-leaky integrate-and-fire: the membrane accumulates stimulation
/// scaled by `resistance` and never decays on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleIfSettings {
    /// Membrane resistance scaling the stimulation drive
    pub resistance: f64,
    /// Potential the membrane resets to after a spike
    pub reset_v: f64,
    /// Firing threshold potential
    pub firing_v: f64,
    /// Steps after a spike during which stimulation is ignored
    pub refractory_periods: u16,
    /// Euler sub-iterations per simulation step
    pub sub_steps: u16,
}

impl Default for SimpleIfSettings {
    fn default() -> Self {
        Self {
            resistance: 1.0,
            reset_v: 0.0,
            firing_v: 1.0,
            refractory_periods: 1,
            sub_steps: 2,
        }
    }
}

#[derive(Debug)]
pub struct SimpleIf {
    cfg: SimpleIfSettings,
    membrane_v: f64,
    refractory_countdown: u16,
}

impl SimpleIf {
    pub fn new(cfg: SimpleIfSettings) -> Result<Self> {
        check_positive(cfg.resistance, "SimpleIf resistance")?;
        check_positive(cfg.sub_steps as f64, "SimpleIf sub_steps")?;
        check_voltages(cfg.reset_v, cfg.firing_v)?;
        Ok(Self {
            membrane_v: cfg.reset_v,
            refractory_countdown: 0,
            cfg,
        })
    }
}

impl ActivationUnit for SimpleIf {
    fn kind(&self) -> ActivationKind {
        ActivationKind::Spiking
    }

    fn output_range(&self) -> Interval {
        Interval::UNIT
    }

    fn internal_state_range(&self) -> Interval {
        Interval {
            min: self.cfg.reset_v,
            max: self.cfg.firing_v,
        }
    }

    fn compute(&mut self, x: f64) -> f64 {
        if self.refractory_countdown > 0 {
            self.refractory_countdown -= 1;
            self.membrane_v = self.cfg.reset_v;
            return 0.0;
        }
        let stimuli = bound_input(x);
        let dt = 1.0 / self.cfg.sub_steps as f64;
        for _ in 0..self.cfg.sub_steps {
            self.membrane_v += dt * self.cfg.resistance * stimuli;
            if self.membrane_v >= self.cfg.firing_v {
                self.membrane_v = self.cfg.reset_v;
                self.refractory_countdown = self.cfg.refractory_periods;
                return 1.0;
            }
        }
        0.0
    }

    fn compute_derivative(&self, _y: f64, _x: f64) -> f64 {
        panic!("Derivative is undefined for spiking activation units");
    }

    fn internal_state(&self) -> f64 {
        self.membrane_v
    }

    fn reset(&mut self) {
        self.membrane_v = self.cfg.reset_v;
        self.refractory_countdown = 0;
    }
}

/// Leaky integrate-and-fire: dV = (-(V - V_rest) + R·I) / tau.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeakyIfSettings {
    /// Membrane time constant (in simulation steps)
    pub time_scale: f64,
    /// Membrane resistance scaling the stimulation drive
    pub resistance: f64,
    /// Resting potential the membrane decays toward
    pub resting_v: f64,
    /// Potential the membrane resets to after a spike
    pub reset_v: f64,
    /// Firing threshold potential
    pub firing_v: f64,
    /// Steps after a spike during which stimulation is ignored
    pub refractory_periods: u16,
    /// Euler sub-iterations per simulation step
    pub sub_steps: u16,
}

impl Default for LeakyIfSettings {
    fn default() -> Self {
        Self {
            time_scale: 8.0,
            resistance: 8.0,
            resting_v: 0.0,
            reset_v: 0.0,
            firing_v: 1.0,
            refractory_periods: 1,
            sub_steps: 2,
        }
    }
}

#[derive(Debug)]
pub struct LeakyIf {
    cfg: LeakyIfSettings,
    membrane_v: f64,
    refractory_countdown: u16,
}

impl LeakyIf {
    pub fn new(cfg: LeakyIfSettings) -> Result<Self> {
        check_positive(cfg.time_scale, "LeakyIf time_scale")?;
        check_positive(cfg.resistance, "LeakyIf resistance")?;
        check_positive(cfg.sub_steps as f64, "LeakyIf sub_steps")?;
        check_voltages(cfg.reset_v, cfg.firing_v)?;
        Ok(Self {
            membrane_v: cfg.reset_v,
            refractory_countdown: 0,
            cfg,
        })
    }
}

impl ActivationUnit for LeakyIf {
    fn kind(&self) -> ActivationKind {
        ActivationKind::Spiking
    }

    fn output_range(&self) -> Interval {
        Interval::UNIT
    }

    fn internal_state_range(&self) -> Interval {
        Interval {
            min: self.cfg.reset_v.min(self.cfg.resting_v),
            max: self.cfg.firing_v,
        }
    }

    fn compute(&mut self, x: f64) -> f64 {
        if self.refractory_countdown > 0 {
            self.refractory_countdown -= 1;
            self.membrane_v = self.cfg.reset_v;
            return 0.0;
        }
        let stimuli = bound_input(x);
        let dt = 1.0 / self.cfg.sub_steps as f64;
        for _ in 0..self.cfg.sub_steps {
            let dv = (-(self.membrane_v - self.cfg.resting_v)
                + self.cfg.resistance * stimuli)
                / self.cfg.time_scale;
            self.membrane_v += dt * dv;
            if self.membrane_v >= self.cfg.firing_v {
                self.membrane_v = self.cfg.reset_v;
                self.refractory_countdown = self.cfg.refractory_periods;
                return 1.0;
            }
        }
        0.0
    }

    fn compute_derivative(&self, _y: f64, _x: f64) -> f64 {
        panic!("Derivative is undefined for spiking activation units");
    }

    fn internal_state(&self) -> f64 {
        self.membrane_v
    }

    fn reset(&mut self) {
        self.membrane_v = self.cfg.reset_v;
        self.refractory_countdown = 0;
    }
}

/// Exponential integrate-and-fire:
/// dV = (-(V - V_rest) + sharpness·e^((V - rheobase)/sharpness) + R·I) / tau.
///
/// The exponential term is why activation inputs are clamped: an unbounded
/// stimulation sum would overflow it within a single sub-step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpIfSettings {
    /// Membrane time constant (in simulation steps)
    pub time_scale: f64,
    /// Membrane resistance scaling the stimulation drive
    pub resistance: f64,
    /// Resting potential
    pub resting_v: f64,
    /// Post-spike reset potential
    pub reset_v: f64,
    /// Rheobase: the knee of the exponential upswing
    pub rheobase_v: f64,
    /// Sharpness of the exponential upswing; strictly positive
    pub sharpness: f64,
    /// Firing threshold potential
    pub firing_v: f64,
    /// Steps after a spike during which stimulation is ignored
    pub refractory_periods: u16,
    /// Euler sub-iterations per simulation step
    pub sub_steps: u16,
}

impl Default for ExpIfSettings {
    fn default() -> Self {
        Self {
            time_scale: 12.0,
            resistance: 12.0,
            resting_v: 0.0,
            reset_v: 0.0,
            rheobase_v: 0.8,
            sharpness: 0.05,
            firing_v: 1.0,
            refractory_periods: 1,
            sub_steps: 2,
        }
    }
}

#[derive(Debug)]
pub struct ExpIf {
    cfg: ExpIfSettings,
    membrane_v: f64,
    refractory_countdown: u16,
}

impl ExpIf {
    pub fn new(cfg: ExpIfSettings) -> Result<Self> {
        check_positive(cfg.time_scale, "ExpIf time_scale")?;
        check_positive(cfg.resistance, "ExpIf resistance")?;
        check_positive(cfg.sharpness, "ExpIf sharpness")?;
        check_positive(cfg.sub_steps as f64, "ExpIf sub_steps")?;
        check_voltages(cfg.reset_v, cfg.firing_v)?;
        Ok(Self {
            membrane_v: cfg.reset_v,
            refractory_countdown: 0,
            cfg,
        })
    }
}

impl ActivationUnit for ExpIf {
    fn kind(&self) -> ActivationKind {
        ActivationKind::Spiking
    }

    fn output_range(&self) -> Interval {
        Interval::UNIT
    }

    fn internal_state_range(&self) -> Interval {
        Interval {
            min: self.cfg.reset_v.min(self.cfg.resting_v),
            max: self.cfg.firing_v,
        }
    }

    fn compute(&mut self, x: f64) -> f64 {
        if self.refractory_countdown > 0 {
            self.refractory_countdown -= 1;
            self.membrane_v = self.cfg.reset_v;
            return 0.0;
        }
        let stimuli = bound_input(x);
        let dt = 1.0 / self.cfg.sub_steps as f64;
        for _ in 0..self.cfg.sub_steps {
            // Cap the exponent so the upswing saturates instead of overflowing
            let exponent =
                ((self.membrane_v - self.cfg.rheobase_v) / self.cfg.sharpness).min(50.0);
            let dv = (-(self.membrane_v - self.cfg.resting_v)
                + self.cfg.sharpness * exponent.exp()
                + self.cfg.resistance * stimuli)
                / self.cfg.time_scale;
            self.membrane_v += dt * dv;
            if self.membrane_v >= self.cfg.firing_v {
                self.membrane_v = self.cfg.reset_v;
                self.refractory_countdown = self.cfg.refractory_periods;
                return 1.0;
            }
        }
        0.0
    }

    fn compute_derivative(&self, _y: f64, _x: f64) -> f64 {
        panic!("Derivative is undefined for spiking activation units");
    }

    fn internal_state(&self) -> f64 {
        self.membrane_v
    }

    fn reset(&mut self) {
        self.membrane_v = self.cfg.reset_v;
        self.refractory_countdown = 0;
    }
}
