use crate::dynamics::state::State;
use super::fsm::FlightPhase;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Closed loop took over from the open-loop thrust.
    Engaged { thrust: f64 },
    PhaseChange { from: FlightPhase, to: FlightPhase },
    Touchdown { speed: f64 },
    /// Descended through a configured callout height.
    Callout { altitude: f64 },
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub state: State,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive states and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind>;
}

/// Detects ground contact (height crossing zero going down).
pub struct TouchdownDetector;

impl EventDetector for TouchdownDetector {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind> {
        if prev.pos.z > 0.0 && current.pos.z <= 0.0 {
            Some(EventKind::Touchdown { speed: current.vel.norm() })
        } else {
            None
        }
    }
}

/// Reports once when the vehicle first descends through `altitude`.
pub struct AltitudeCallout {
    pub altitude: f64,
    fired: bool,
}

impl AltitudeCallout {
    pub fn new(altitude: f64) -> Self {
        Self { altitude, fired: false }
    }
}

impl EventDetector for AltitudeCallout {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind> {
        if self.fired || !(prev.pos.z > self.altitude && current.pos.z <= self.altitude) {
            return None;
        }
        self.fired = true;
        Some(EventKind::Callout { altitude: self.altitude })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn make_state(alt: f64, vz: f64) -> State {
        State {
            time: 0.0,
            pos: Vector3::new(0.0, 0.0, alt),
            vel: Vector3::new(0.0, 0.0, vz),
        }
    }

    #[test]
    fn touchdown_detected_with_speed() {
        let mut det = TouchdownDetector;
        let prev = make_state(0.01, -0.6);
        let curr = make_state(-0.001, -0.6);
        assert_eq!(det.check(&prev, &curr), Some(EventKind::Touchdown { speed: 0.6 }));
        assert_eq!(det.check(&curr, &curr), None);
    }

    #[test]
    fn callout_fires_once_on_the_way_down() {
        let mut det = AltitudeCallout::new(10.0);
        // climbing through the height is not a callout
        assert_eq!(det.check(&make_state(9.9, 1.0), &make_state(10.2, 1.0)), None);
        assert_eq!(
            det.check(&make_state(10.2, -1.0), &make_state(9.9, -1.0)),
            Some(EventKind::Callout { altitude: 10.0 })
        );
        assert_eq!(det.check(&make_state(10.2, -1.0), &make_state(9.9, -1.0)), None);
    }
}
