pub mod lander;

pub use lander::{presets, Lander, LanderBuilder};
