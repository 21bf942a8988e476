use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use thrust_control::io::json::LandingSummary;
use thrust_control::io::{csv, json};
use thrust_control::sim::event::EventKind;
use thrust_control::sim::{simulate_landing, Scenario};

/// Closed-loop landing with a velocity-regulated thrust controller.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Scenario file (JSON); defaults to the built-in quadcopter descent
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Write per-cycle telemetry to this CSV file
    #[arg(long)]
    csv: Option<String>,

    /// Write the landing summary to this JSON file
    #[arg(long)]
    json: Option<String>,

    /// Override the initial altitude (m)
    #[arg(long)]
    altitude: Option<f64>,

    /// Override the commanded descent rate (m/s, positive down)
    #[arg(long)]
    descent_rate: Option<f64>,

    /// Report when descending through this height (m); repeatable
    #[arg(long = "callout")]
    callouts: Vec<f64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut scenario = match &cli.scenario {
        Some(path) => Scenario::from_json_file(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => Scenario::default(),
    };
    if let Some(alt) = cli.altitude {
        scenario.sim.initial_altitude = alt;
    }
    if let Some(rate) = cli.descent_rate {
        scenario.sim.descent_rate = rate;
    }
    scenario.callouts.extend(cli.callouts.iter().copied());

    let run = simulate_landing(&scenario).context("invalid controller configuration")?;
    let summary = LandingSummary::from_run(&scenario.lander, &run);
    let lander = &scenario.lander;
    let params = &scenario.controller.params;

    // -----------------------------------------------------------------------
    // Report
    // -----------------------------------------------------------------------
    println!();
    println!("  Vehicle: {}", lander.name);
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mass:          {:>8.1} kg    Max thrust:   {:>8.0} N",
        lander.mass, lander.max_thrust
    );
    println!(
        "  Hover thrust:  {:>8.3}       Gravity:      {:>8.2} m/s^2",
        lander.hover_thrust(),
        lander.gravity
    );
    println!(
        "  Kp / Ki / Kd:  {:>5.2} / {:.2} / {:.2}    Cycle:  {:>6.3} s",
        params.kp, params.ki, params.kd, params.cycle_time
    );
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for ev in &run.events {
        match &ev.kind {
            EventKind::Engaged { thrust } => println!(
                "  ENGAGED   t={:>6.2}s   alt={:>7.2}m   thrust={:.3}",
                ev.time, ev.state.altitude(), thrust
            ),
            EventKind::PhaseChange { from, to } => println!(
                "  PHASE     t={:>6.2}s   alt={:>7.2}m   {} -> {}",
                ev.time, ev.state.altitude(), from, to
            ),
            EventKind::Touchdown { speed } => println!(
                "  TOUCHDOWN t={:>6.2}s   vel={:>6.2}m/s",
                ev.time, speed
            ),
            EventKind::Callout { altitude } => println!(
                "  CALLOUT   t={:>6.2}s   alt={:>7.2}m   vel={:>6.2}m/s",
                ev.time, altitude, ev.state.descent_rate()
            ),
        }
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Max descent:   {:>8.2} m/s", summary.max_descent_rate);
    println!(
        "  Thrust range:  {:>8.3} .. {:.3}",
        summary.min_thrust, summary.max_thrust
    );
    println!(
        "  Saturated:     {:>8} of {} cycles",
        summary.saturated_cycles, summary.cycles
    );
    match summary.touchdown_speed {
        Some(v) => println!("  Touchdown:     {:>8.2} m/s", v),
        None => println!("  Touchdown:     not reached within {:.0} s", scenario.sim.max_time),
    }
    println!();

    // -----------------------------------------------------------------------
    // Descent table (sampled)
    // -----------------------------------------------------------------------
    println!("  Descent");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>8}  {:>8}  {:>8}  {:>7}  {:<10}",
        "t (s)", "alt (m)", "vz (m/s)", "sp (m/s)", "thrust", "phase"
    );
    let step = (run.samples.len() / 20).max(1);
    for s in run.samples.iter().step_by(step) {
        println!(
            "  {:>7.2}  {:>8.2}  {:>8.3}  {:>8.3}  {:>7.3}  {:<10}",
            s.state.time,
            s.state.altitude(),
            s.state.vel.z,
            s.velocity_setpoint,
            s.thrust,
            s.phase
        );
    }
    println!();

    if let Some(path) = &cli.csv {
        csv::write_samples_file(path, &run.samples)
            .with_context(|| format!("writing {}", path))?;
        println!("  Telemetry written to {}", path);
    }
    if let Some(path) = &cli.json {
        json::write_summary_file(path, &summary)
            .with_context(|| format!("writing {}", path))?;
        println!("  Summary written to {}", path);
    }

    Ok(())
}
