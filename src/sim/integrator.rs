use crate::dynamics;
use crate::dynamics::state::State;
use crate::vehicle::Lander;

// ---------------------------------------------------------------------------
// RK4 integrator with the thrust command held over the step
// ---------------------------------------------------------------------------

/// Single RK4 step with a constant thrust command over the step.
pub fn rk4_step(state: &State, lander: &Lander, thrust: f64, dt: f64) -> State {
    let k1 = dynamics::derivatives(state, lander, thrust);
    let k2 = dynamics::derivatives(&state.apply(&k1, dt * 0.5), lander, thrust);
    let k3 = dynamics::derivatives(&state.apply(&k2, dt * 0.5), lander, thrust);
    let k4 = dynamics::derivatives(&state.apply(&k3, dt), lander, thrust);

    State {
        time: state.time + dt,
        pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * (dt / 6.0),
        vel: state.vel + (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) * (dt / 6.0),
    }
}
