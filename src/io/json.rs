use std::io::{self, Write};

use serde::Serialize;

use crate::sim::runner::LandingRun;
use crate::sim::event::EventKind;
use crate::vehicle::Lander;

/// Summary statistics computed from a landing run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandingSummary {
    pub lander: String,
    pub engage_time: Option<f64>,
    pub touchdown_time: Option<f64>,
    pub touchdown_speed: Option<f64>,
    pub max_descent_rate: f64,
    pub min_thrust: f64,
    pub max_thrust: f64,
    /// Closed-loop cycles spent on a thrust bound.
    pub saturated_cycles: usize,
    pub cycles: usize,
}

impl LandingSummary {
    /// Compute summary from run data.
    pub fn from_run(lander: &Lander, run: &LandingRun) -> Self {
        let touchdown = run.touchdown().map(|e| match e.kind {
            EventKind::Touchdown { speed } => (e.time, speed),
            _ => (e.time, e.state.vel.norm()),
        });

        let max_descent_rate = run
            .samples
            .iter()
            .map(|s| s.state.descent_rate())
            .fold(0.0_f64, f64::max);

        let thrusts = run.samples.iter().map(|s| s.thrust);
        let min_thrust = thrusts.clone().fold(f64::INFINITY, f64::min);
        let max_thrust = thrusts.fold(f64::NEG_INFINITY, f64::max);

        let saturated_cycles = run
            .samples
            .iter()
            .filter(|s| s.active && (s.thrust <= s.bounds.lower || s.thrust >= s.bounds.upper))
            .count();

        LandingSummary {
            lander: lander.name.clone(),
            engage_time: run.engaged().map(|e| e.time),
            touchdown_time: touchdown.map(|(t, _)| t),
            touchdown_speed: touchdown.map(|(_, v)| v),
            max_descent_rate,
            min_thrust: if min_thrust.is_finite() { min_thrust } else { 0.0 },
            max_thrust: if max_thrust.is_finite() { max_thrust } else { 0.0 },
            saturated_cycles,
            cycles: run.samples.len(),
        }
    }
}

/// Write landing summary as pretty-printed JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &LandingSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)
}

/// Write landing summary JSON to a file.
pub fn write_summary_file(path: &str, summary: &LandingSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{simulate_landing, Scenario};

    #[test]
    fn summary_of_default_landing() {
        let scenario = Scenario::default();
        let run = simulate_landing(&scenario).unwrap();
        let s = LandingSummary::from_run(&scenario.lander, &run);
        assert_eq!(s.lander, "Quadcopter");
        assert!(s.touchdown_time.is_some());
        assert!(s.engage_time.unwrap() >= scenario.sim.engage_time);
        assert!(s.min_thrust >= 0.0 && s.max_thrust <= 0.9);
        assert_eq!(s.cycles, run.samples.len());
    }

    #[test]
    fn json_output_is_valid() {
        let scenario = Scenario::default();
        let run = simulate_landing(&scenario).unwrap();
        let summary = LandingSummary::from_run(&scenario.lander, &run);

        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["lander"], "Quadcopter");
        assert!(value["touchdown_speed"].as_f64().is_some());
        assert!(value["saturated_cycles"].is_u64());
    }

    #[test]
    fn empty_run_has_no_touchdown() {
        let lander = Lander::default();
        let s = LandingSummary::from_run(&lander, &LandingRun::default());
        assert_eq!(s.touchdown_time, None);
        assert_eq!(s.cycles, 0);
        assert_eq!(s.max_thrust, 0.0);
    }
}
