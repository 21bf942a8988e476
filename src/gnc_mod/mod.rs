pub mod bounds;
pub mod pid;
pub mod rate_limit;
pub mod thrust;

pub use bounds::{FixedBounds, PhaseBounds, ThrustBounds};
pub use pid::Pid2;
pub use rate_limit::rate_limit;
pub use thrust::ThrustController;
