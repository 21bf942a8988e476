use serde::{Deserialize, Serialize};

use crate::dynamics::state::G0;

// ---------------------------------------------------------------------------
// Lander: a point mass with a single vertical thruster
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lander {
    pub name: String,
    pub mass: f64,          // kg
    pub max_thrust: f64,    // N at a thrust command of 1.0
    pub cd: f64,
    pub area: f64,          // m^2
    pub air_density: f64,   // kg/m^3, 0 for vacuum
    pub gravity: f64,       // m/s^2
}

impl Lander {
    /// Thrust command that exactly cancels gravity.
    pub fn hover_thrust(&self) -> f64 {
        if self.max_thrust > 0.0 {
            self.mass * self.gravity / self.max_thrust
        } else {
            0.0
        }
    }

    /// Vertical acceleration authority at full thrust, net of gravity.
    pub fn climb_authority(&self) -> f64 {
        self.max_thrust / self.mass - self.gravity
    }
}

impl Default for Lander {
    fn default() -> Self {
        presets::quadcopter()
    }
}

// ---------------------------------------------------------------------------
// Lander builder
// ---------------------------------------------------------------------------

pub struct LanderBuilder {
    name: String,
    mass: f64,
    max_thrust: f64,
    cd: f64,
    area: f64,
    air_density: f64,
    gravity: f64,
}

impl LanderBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mass: 1.5,
            max_thrust: 30.0,
            cd: 1.0,
            area: 0.05,
            air_density: 1.225,
            gravity: G0,
        }
    }

    pub fn mass(mut self, v: f64) -> Self { self.mass = v; self }
    pub fn max_thrust(mut self, v: f64) -> Self { self.max_thrust = v; self }
    pub fn cd(mut self, v: f64) -> Self { self.cd = v; self }
    pub fn area(mut self, v: f64) -> Self { self.area = v; self }
    pub fn air_density(mut self, v: f64) -> Self { self.air_density = v; self }
    pub fn gravity(mut self, v: f64) -> Self { self.gravity = v; self }

    pub fn build(self) -> Lander {
        Lander {
            name: self.name,
            mass: self.mass,
            max_thrust: self.max_thrust,
            cd: self.cd,
            area: self.area,
            air_density: self.air_density,
            gravity: self.gravity,
        }
    }
}

// ---------------------------------------------------------------------------
// Preset vehicles
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// 1.5 kg multirotor, hovering at about half throttle.
    pub fn quadcopter() -> Lander {
        LanderBuilder::new("Quadcopter").build()
    }

    /// Apollo-class descent stage under lunar gravity.
    pub fn lunar_module() -> Lander {
        LanderBuilder::new("Lunar Module")
            .mass(15_000.0)
            .max_thrust(45_000.0)
            .cd(0.0)
            .area(0.0)
            .air_density(0.0)
            .gravity(1.62)
            .build()
    }
}
