use log::{debug, info};

use crate::dynamics::state::State;
use crate::error::ConfigError;
use crate::gnc::{PhaseBounds, ThrustBounds, ThrustController};
use super::event::{AltitudeCallout, EventDetector, EventKind, SimEvent, TouchdownDetector};
use super::fsm::{FlightPhase, LandingFsm};
use super::integrator::rk4_step;
use super::scenario::Scenario;

// ---------------------------------------------------------------------------
// Per-cycle telemetry
// ---------------------------------------------------------------------------

/// One control cycle: the state the controller saw and what it commanded.
#[derive(Debug, Clone)]
pub struct Sample {
    pub state: State,
    pub phase: FlightPhase,
    pub active: bool,
    pub velocity_setpoint: f64, // m/s, positive down
    pub thrust: f64,
    pub bounds: ThrustBounds,
    pub neutral: f64,
}

#[derive(Debug, Clone, Default)]
pub struct LandingRun {
    pub samples: Vec<Sample>,
    pub events: Vec<SimEvent>,
}

impl LandingRun {
    pub fn touchdown(&self) -> Option<&SimEvent> {
        self.events
            .iter()
            .find(|e| matches!(e.kind, EventKind::Touchdown { .. }))
    }

    pub fn engaged(&self) -> Option<&SimEvent> {
        self.events
            .iter()
            .find(|e| matches!(e.kind, EventKind::Engaged { .. }))
    }
}

// ---------------------------------------------------------------------------
// Closed-loop landing
// ---------------------------------------------------------------------------

/// Fly a scenario: open-loop thrust until `engage_time`, then the thrust
/// controller under the landing FSM until ground contact or `max_time`.
///
/// The controller period doubles as the integration step.
pub fn simulate_landing(scenario: &Scenario) -> Result<LandingRun, ConfigError> {
    let lander = &scenario.lander;
    let sim = &scenario.sim;
    let dt = scenario.controller.params.cycle_time;

    let mut controller =
        ThrustController::with_config(LandingFsm::new(scenario.fsm), &scenario.controller)?;

    let hover = lander.hover_thrust();
    controller.update_neutral_thrust(hover * (1.0 + sim.trim_error));
    controller.update_velocity_setpoint(sim.descent_rate);
    let manual_thrust = sim.manual_thrust.unwrap_or(hover);

    let mut state = State {
        time: 0.0,
        pos: nalgebra::Vector3::new(0.0, 0.0, sim.initial_altitude),
        vel: sim.initial_velocity,
    };

    let capacity = ((sim.max_time / dt) as usize + 1).min(200_000);
    let mut run = LandingRun { samples: Vec::with_capacity(capacity), events: Vec::new() };
    let mut detectors: Vec<Box<dyn EventDetector>> = vec![Box::new(TouchdownDetector)];
    for &altitude in &scenario.callouts {
        detectors.push(Box::new(AltitudeCallout::new(altitude)));
    }

    info!(
        "simulating {} from {:.1} m, target descent {:.2} m/s",
        lander.name, sim.initial_altitude, sim.descent_rate
    );

    while state.time < sim.max_time {
        // Flight phase
        if let Some((from, to)) = controller.bounds_mut().update(state.altitude()) {
            debug!("t={:.2}s phase {} -> {}", state.time, from, to);
            run.events.push(SimEvent {
                time: state.time,
                kind: EventKind::PhaseChange { from, to },
                state: state.clone(),
            });
        }

        // Hand-over
        if !controller.is_active() && state.time >= sim.engage_time {
            controller.activate_from(manual_thrust);
            run.events.push(SimEvent {
                time: state.time,
                kind: EventKind::Engaged { thrust: manual_thrust },
                state: state.clone(),
            });
        }

        // Control cycle
        controller.update_velocity_state(state.descent_rate());
        let thrust = if controller.is_active() {
            controller.get_thrust_command()
        } else {
            manual_thrust
        };

        run.samples.push(Sample {
            state: state.clone(),
            phase: controller.bounds().phase(),
            active: controller.is_active(),
            velocity_setpoint: controller.get_velocity_desired(),
            thrust,
            bounds: controller.bounds().bound_thrust(),
            neutral: controller.neutral_thrust(),
        });

        // Integrate
        let mut next = rk4_step(&state, lander, thrust, dt);

        let mut landed = false;
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&state, &next) {
                landed |= matches!(kind, EventKind::Touchdown { .. });
                run.events.push(SimEvent { time: next.time, kind, state: next.clone() });
            }
        }

        // Ground contact
        if landed || next.pos.z <= 0.0 {
            next.pos.z = 0.0;
            info!("touchdown at t={:.2}s, {:.2} m/s", next.time, next.vel.norm());
            run.samples.push(Sample {
                state: next,
                phase: controller.bounds().phase(),
                active: controller.is_active(),
                velocity_setpoint: controller.get_velocity_desired(),
                thrust,
                bounds: controller.bounds().bound_thrust(),
                neutral: controller.neutral_thrust(),
            });
            break;
        }

        state = next;
    }

    Ok(run)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
