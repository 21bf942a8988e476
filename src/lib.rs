pub mod config;
pub mod error;
pub mod dynamics;
pub mod vehicle;
mod gnc_mod;
pub mod sim;
pub mod io;

// The gnc module: expose gnc_mod as `gnc` publicly
pub mod gnc {
    pub use crate::gnc_mod::*;
}

pub use config::{ControllerConfig, PidGains, ThrustParams, ThrustSense};
pub use error::{ConfigError, Error, Result};
pub use gnc::{FixedBounds, PhaseBounds, ThrustBounds, ThrustController};
