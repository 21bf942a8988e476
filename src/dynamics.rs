pub mod state;

use nalgebra::Vector3;

use crate::vehicle::Lander;
use state::{Deriv, State};

// ---------------------------------------------------------------------------
// Equations of motion (point mass, vertical thruster)
// ---------------------------------------------------------------------------

/// Compute state derivatives for a given thrust command.
///
/// Forces modeled:
///   1. Gravity: uniform, down
///   2. Thrust: command (saturated to [0, 1]) times `max_thrust`, along +z
///   3. Drag: quadratic, opposing velocity
pub fn derivatives(state: &State, lander: &Lander, thrust: f64) -> Deriv {
    let a_gravity = Vector3::new(0.0, 0.0, -lander.gravity);

    let a_thrust = if lander.mass > 0.0 {
        let command = thrust.max(0.0).min(1.0);
        Vector3::new(0.0, 0.0, command * lander.max_thrust / lander.mass)
    } else {
        Vector3::zeros()
    };

    let speed = state.vel.norm();
    let a_drag = if speed > 1e-9 && lander.mass > 0.0 {
        let q_dyn = 0.5 * lander.air_density * speed * speed;
        -state.vel / speed * (q_dyn * lander.cd * lander.area / lander.mass)
    } else {
        Vector3::zeros()
    };

    Deriv {
        dpos: state.vel,
        dvel: a_gravity + a_thrust + a_drag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::presets;

    fn at_rest() -> State {
        State { time: 0.0, pos: Vector3::new(0.0, 0.0, 10.0), vel: Vector3::zeros() }
    }

    #[test]
    fn hover_thrust_cancels_gravity() {
        let lander = presets::quadcopter();
        let d = derivatives(&at_rest(), &lander, lander.hover_thrust());
        assert!(d.dvel.norm() < 1e-12, "Hover should not accelerate, got {:?}", d.dvel);
    }

    #[test]
    fn no_thrust_is_free_fall() {
        let lander = presets::lunar_module();
        let d = derivatives(&at_rest(), &lander, 0.0);
        assert!((d.dvel.z + 1.62).abs() < 1e-12);
    }

    #[test]
    fn thrust_command_saturates() {
        let lander = presets::quadcopter();
        let full = derivatives(&at_rest(), &lander, 1.0);
        let over = derivatives(&at_rest(), &lander, 3.0);
        assert_eq!(full.dvel, over.dvel);
    }

    #[test]
    fn drag_opposes_motion() {
        let lander = presets::quadcopter();
        let mut s = at_rest();
        s.vel = Vector3::new(3.0, 0.0, -4.0);
        let d = derivatives(&s, &lander, lander.hover_thrust());
        assert!(d.dvel.x < 0.0 && d.dvel.z > 0.0);
        assert!(d.dvel.dot(&s.vel) < 0.0);
    }
}
