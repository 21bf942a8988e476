pub mod event;
pub mod fsm;
pub mod integrator;
pub mod runner;
pub mod scenario;

pub use fsm::{FlightPhase, LandingFsm, LandingFsmSettings};
pub use integrator::rk4_step;
pub use runner::{simulate_landing, LandingRun, Sample};
pub use scenario::Scenario;
