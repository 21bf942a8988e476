//! Plugging a hand-written flight-phase envelope into the thrust controller.
//!
//! A lunar module descends under a "ceiling" envelope: the allowed descent
//! rate shrinks with altitude and the thrust floor rises as fuel margins
//! would demand. The vehicle is flown open-loop at hover for the first
//! second, then handed to the controller.

use nalgebra::Vector3;
use thrust_control::dynamics::state::State;
use thrust_control::gnc::{PhaseBounds, ThrustBounds, ThrustController};
use thrust_control::sim::rk4_step;
use thrust_control::vehicle::presets;
use thrust_control::{ThrustParams, ThrustSense};

struct AltitudeEnvelope {
    altitude: f64,
}

impl PhaseBounds for AltitudeEnvelope {
    fn bound_velocity_down(&self, requested: f64) -> f64 {
        // 10 % of height per second, never slower than 0.5 m/s
        let ceiling = (0.1 * self.altitude).max(0.5);
        requested.max(0.0).min(ceiling)
    }

    fn bound_thrust(&self) -> ThrustBounds {
        if self.altitude > 10.0 {
            ThrustBounds::new(0.2, 1.0)
        } else {
            ThrustBounds::new(0.4, 1.0)
        }
    }

    fn name(&self) -> &str {
        "AltitudeEnvelope"
    }
}

fn main() {
    let lander = presets::lunar_module();
    let dt = 0.05;
    let params = ThrustParams {
        kp: 0.4,
        ki: 0.08,
        kd: 0.0,
        cycle_time: dt,
        velocity_max: 5.0,
        ..ThrustParams::default()
    };

    let mut state = State {
        time: 0.0,
        pos: Vector3::new(0.0, 0.0, 60.0),
        vel: Vector3::new(0.0, 0.0, -2.0),
    };

    let mut ctl = ThrustController::new(AltitudeEnvelope { altitude: state.altitude() });
    if let Err(e) = ctl.configure(&params) {
        eprintln!("rejected gains: {}", e);
        return;
    }
    ctl.set_sense(ThrustSense::Inverted);
    ctl.update_neutral_thrust(lander.hover_thrust());
    ctl.update_velocity_setpoint(4.0);

    let manual = lander.hover_thrust();
    println!("  {} under {}", lander.name, ctl.bounds().name());
    println!("  {:>6}  {:>7}  {:>7}  {:>7}  {:>6}", "t (s)", "alt (m)", "vd", "sp", "thrust");

    let mut step = 0usize;
    while state.pos.z > 0.0 && state.time < 120.0 {
        ctl.bounds_mut().altitude = state.altitude();
        if !ctl.is_active() && state.time >= 1.0 {
            ctl.activate_from(manual);
        }

        ctl.update_velocity_state(state.descent_rate());
        let thrust = if ctl.is_active() { ctl.get_thrust_command() } else { manual };

        if step % 40 == 0 {
            println!(
                "  {:>6.1}  {:>7.2}  {:>7.3}  {:>7.3}  {:>6.3}",
                state.time,
                state.altitude(),
                state.descent_rate(),
                ctl.get_velocity_desired(),
                thrust
            );
        }

        state = rk4_step(&state, &lander, thrust, dt);
        step += 1;
    }

    println!(
        "  landed at t={:.1}s, {:.2} m/s",
        state.time,
        state.descent_rate()
    );
}
