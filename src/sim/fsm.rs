use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gnc::{PhaseBounds, ThrustBounds};

// ---------------------------------------------------------------------------
// Landing state machine: the flight-phase side of the thrust loop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightPhase {
    Descent,
    Flare,
    Touchdown,
}

impl fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlightPhase::Descent => "descent",
            FlightPhase::Flare => "flare",
            FlightPhase::Touchdown => "touchdown",
        };
        f.pad(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingFsmSettings {
    pub descent_rate_max: f64,      // m/s, positive down
    pub climb_rate_max: f64,        // m/s
    pub flare_altitude: f64,        // m
    pub flare_descent_rate: f64,    // m/s, reached at the ground
    pub touchdown_altitude: f64,    // m
    pub thrust_min: f64,
    pub thrust_max: f64,
    pub touchdown_thrust_max: f64,
}

impl Default for LandingFsmSettings {
    fn default() -> Self {
        Self {
            descent_rate_max: 1.5,
            climb_rate_max: 1.0,
            flare_altitude: 5.0,
            flare_descent_rate: 0.5,
            touchdown_altitude: 0.05,
            thrust_min: 0.1,
            thrust_max: 0.9,
            touchdown_thrust_max: 0.3,
        }
    }
}

/// Altitude-driven landing sequence: Descent, then Flare below
/// `flare_altitude`, then Touchdown below `touchdown_altitude`.
///
/// Phases only advance. The descent-rate ceiling tapers linearly through
/// the flare, and the thrust envelope is cut back once on the ground so
/// the vehicle settles instead of bouncing.
#[derive(Debug, Clone)]
pub struct LandingFsm {
    settings: LandingFsmSettings,
    phase: FlightPhase,
    altitude: f64,
}

impl LandingFsm {
    pub fn new(settings: LandingFsmSettings) -> Self {
        Self { settings, phase: FlightPhase::Descent, altitude: f64::INFINITY }
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    /// Feed the current height above ground. Returns `(from, to)` when the
    /// phase changed.
    pub fn update(&mut self, altitude: f64) -> Option<(FlightPhase, FlightPhase)> {
        self.altitude = altitude;
        let next = if altitude <= self.settings.touchdown_altitude {
            FlightPhase::Touchdown
        } else if altitude <= self.settings.flare_altitude {
            FlightPhase::Flare
        } else {
            FlightPhase::Descent
        };

        if next > self.phase {
            let from = self.phase;
            self.phase = next;
            Some((from, next))
        } else {
            None
        }
    }

    /// Descent-rate ceiling for the current phase and height.
    fn descent_limit(&self) -> f64 {
        let s = &self.settings;
        match self.phase {
            FlightPhase::Descent => s.descent_rate_max,
            FlightPhase::Flare => {
                let frac = if s.flare_altitude > 0.0 {
                    (self.altitude / s.flare_altitude).max(0.0).min(1.0)
                } else {
                    0.0
                };
                s.flare_descent_rate + (s.descent_rate_max - s.flare_descent_rate) * frac
            }
            FlightPhase::Touchdown => s.flare_descent_rate,
        }
    }
}

impl PhaseBounds for LandingFsm {
    fn bound_velocity_down(&self, requested: f64) -> f64 {
        let floor = match self.phase {
            FlightPhase::Descent => -self.settings.climb_rate_max,
            FlightPhase::Flare | FlightPhase::Touchdown => 0.0,
        };
        requested.max(floor).min(self.descent_limit())
    }

    fn bound_thrust(&self) -> ThrustBounds {
        let s = &self.settings;
        match self.phase {
            FlightPhase::Descent | FlightPhase::Flare => ThrustBounds::new(s.thrust_min, s.thrust_max),
            FlightPhase::Touchdown => ThrustBounds::new(0.0, s.touchdown_thrust_max),
        }
    }

    fn name(&self) -> &str {
        "LandingFsm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_advance_with_altitude() {
        let mut fsm = LandingFsm::new(LandingFsmSettings::default());
        assert_eq!(fsm.update(20.0), None);
        assert_eq!(fsm.phase(), FlightPhase::Descent);
        assert_eq!(fsm.update(4.0), Some((FlightPhase::Descent, FlightPhase::Flare)));
        assert_eq!(fsm.update(0.01), Some((FlightPhase::Flare, FlightPhase::Touchdown)));
    }

    #[test]
    fn phases_never_regress() {
        let mut fsm = LandingFsm::new(LandingFsmSettings::default());
        fsm.update(3.0);
        assert_eq!(fsm.update(10.0), None);
        assert_eq!(fsm.phase(), FlightPhase::Flare);
    }

    #[test]
    fn descent_clamped_per_phase() {
        let mut fsm = LandingFsm::new(LandingFsmSettings::default());
        fsm.update(50.0);
        assert_eq!(fsm.bound_velocity_down(3.0), 1.5);
        assert_eq!(fsm.bound_velocity_down(-3.0), -1.0);
        assert_eq!(fsm.bound_velocity_down(0.7), 0.7);

        // halfway through the flare: 0.5 + (1.5 - 0.5) * 0.5
        fsm.update(2.5);
        assert!((fsm.bound_velocity_down(3.0) - 1.0).abs() < 1e-12);
        assert_eq!(fsm.bound_velocity_down(-1.0), 0.0, "No climbing in the flare");
    }

    #[test]
    fn thrust_envelope_tightens_at_touchdown() {
        let mut fsm = LandingFsm::new(LandingFsmSettings::default());
        fsm.update(10.0);
        assert_eq!(fsm.bound_thrust(), ThrustBounds::new(0.1, 0.9));
        fsm.update(0.0);
        assert_eq!(fsm.bound_thrust(), ThrustBounds::new(0.0, 0.3));
        assert_eq!(fsm.bound_velocity_down(2.0), 0.5);
    }
}
