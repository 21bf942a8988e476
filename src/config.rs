use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

// ---------------------------------------------------------------------------
// Classical gains as supplied by the vehicle configuration
// ---------------------------------------------------------------------------

/// Parameters of one controller axis, in the form the flight configuration
/// carries them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrustParams {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Accepted with the classical gains; not used by the control law.
    pub integral_limit: f64,
    pub cycle_time: f64,   // s
    pub velocity_max: f64, // m/s, symmetric
}

impl Default for ThrustParams {
    fn default() -> Self {
        Self {
            kp: 0.5,
            ki: 0.1,
            kd: 0.05,
            integral_limit: 1.0,
            cycle_time: 0.02, // 50 Hz
            velocity_max: 2.0,
        }
    }
}

fn check_finite(name: &'static str, v: f64) -> std::result::Result<(), ConfigError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite(name))
    }
}

impl ThrustParams {
    /// Check the parameters and derive the two-degree-of-freedom gains.
    pub fn validate(&self) -> std::result::Result<PidGains, ConfigError> {
        check_finite("kp", self.kp)?;
        check_finite("ki", self.ki)?;
        check_finite("kd", self.kd)?;
        check_finite("cycle_time", self.cycle_time)?;
        check_finite("velocity_max", self.velocity_max)?;

        if self.kp == 0.0 || self.ki == 0.0 {
            return Err(ConfigError::ZeroGain);
        }
        if self.kp.signum() != self.ki.signum() {
            return Err(ConfigError::GainSignMismatch);
        }
        if self.kd != 0.0 && self.kd.signum() != self.kp.signum() {
            return Err(ConfigError::InvalidDerivativeGain);
        }
        if self.cycle_time <= 0.0 {
            return Err(ConfigError::InvalidCycleTime);
        }
        if self.velocity_max <= 0.0 {
            return Err(ConfigError::InvalidVelocityMax);
        }

        let gains = PidGains::from_classical(self.kp, self.ki, self.kd);
        // Extreme ratios can still overflow Ti.
        check_finite("ki", gains.ti)?;
        check_finite("kd", gains.td)?;
        Ok(gains)
    }
}

// ---------------------------------------------------------------------------
// Derived two-degree-of-freedom gains
// ---------------------------------------------------------------------------

/// Gains of the two-degree-of-freedom law, derived from classical PID gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Integral time `kp / ki`.
    pub ti: f64,
    /// Derivative time `kd / kp`.
    pub td: f64,
    /// Anti-windup tracking gain `(Ti + Td) / 2`.
    pub kt: f64,
    /// Derivative filter time constant `Td / 10`.
    pub tf: f64,
    /// Set-point weight on the proportional path, in `[0, 1]`.
    pub beta: f64,
}

impl PidGains {
    /// Derivation used for the velocity axis: full set-point following
    /// (`beta = 1`) and a derivative filter a decade faster than `Td`.
    pub fn from_classical(kp: f64, ki: f64, kd: f64) -> Self {
        let ti = kp / ki;
        let td = kd / kp;
        Self {
            kp,
            ki,
            kd,
            ti,
            td,
            kt: (ti + td) / 2.0,
            tf: td / 10.0,
            beta: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Axis sign convention
// ---------------------------------------------------------------------------

/// How the law output maps onto physical thrust for an axis.
///
/// On a down-positive velocity axis, thrust has to *decrease* when the
/// measured descent rate falls short of the setpoint, so the command is
/// `neutral - u` ([`ThrustSense::Inverted`]). An up-positive axis uses
/// `neutral + u`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrustSense {
    Direct,
    #[default]
    Inverted,
}

impl ThrustSense {
    pub const fn sign(self) -> f64 {
        match self {
            ThrustSense::Direct => 1.0,
            ThrustSense::Inverted => -1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Full controller configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    #[serde(flatten)]
    pub params: ThrustParams,
    /// Initial trim; normally overwritten by the trim estimator.
    pub neutral_thrust: f64,
    pub sense: ThrustSense,
    /// Maximum setpoint slew (m/s^2). `None` feeds the FSM-bounded target
    /// straight through.
    pub setpoint_rate_limit: Option<f64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            params: ThrustParams::default(),
            neutral_thrust: 0.5,
            sense: ThrustSense::default(),
            setpoint_rate_limit: None,
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> std::result::Result<PidGains, ConfigError> {
        let gains = self.params.validate()?;
        if !self.neutral_thrust.is_finite() {
            return Err(ConfigError::InvalidNeutralThrust);
        }
        if let Some(rate) = self.setpoint_rate_limit {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConfigError::InvalidRateLimit);
            }
        }
        Ok(gains)
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: ControllerConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
