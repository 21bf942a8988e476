use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.80665;

// ---------------------------------------------------------------------------
// Point-mass state: position and velocity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub time: f64,
    pub pos: Vector3<f64>, // m, ENU, z = height above ground
    pub vel: Vector3<f64>, // m/s
}

impl State {
    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        State {
            time: self.time + dt,
            pos: self.pos + d.dpos * dt,
            vel: self.vel + d.dvel * dt,
        }
    }

    pub fn altitude(&self) -> f64 {
        self.pos.z
    }

    /// Vertical velocity, positive down.
    pub fn descent_rate(&self) -> f64 {
        -self.vel.z
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Deriv {
    pub dpos: Vector3<f64>,
    pub dvel: Vector3<f64>,
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub max_time: f64,
    pub initial_altitude: f64,
    pub initial_velocity: Vector3<f64>,
    /// Commanded descent rate (m/s, positive down).
    pub descent_rate: f64,
    /// Closed loop takes over at this time; before that `manual_thrust` is
    /// dispatched.
    pub engage_time: f64,
    /// Open-loop thrust before engagement; the vehicle's hover thrust when
    /// `None`.
    pub manual_thrust: Option<f64>,
    /// Relative error of the neutral thrust handed to the controller, so
    /// the integrator has something to correct.
    pub trim_error: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_time: 120.0,
            initial_altitude: 20.0,
            initial_velocity: Vector3::zeros(),
            descent_rate: 1.5,
            engage_time: 0.5,
            manual_thrust: None,
            trim_error: 0.05,
        }
    }
}
