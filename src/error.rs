use thiserror::Error;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Rejected controller parameters.
///
/// Returned by [`ThrustParams::validate`](crate::config::ThrustParams::validate)
/// and everything that configures a controller. A rejected configuration
/// never reaches the control law; the previous one stays in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// `kp` or `ki` is zero, which makes `Ti = kp / ki` or `Td = kd / kp` undefined.
    #[error("proportional and integral gains must be non-zero")]
    ZeroGain,

    /// `kp` and `ki` have opposite signs.
    #[error("proportional and integral gains must have the same sign")]
    GainSignMismatch,

    /// `kd` has the opposite sign of `kp`, giving a negative derivative time.
    #[error("derivative gain must be zero or share the sign of the proportional gain")]
    InvalidDerivativeGain,

    #[error("cycle time must be positive")]
    InvalidCycleTime,

    #[error("velocity limit must be positive")]
    InvalidVelocityMax,

    #[error("setpoint rate limit must be positive")]
    InvalidRateLimit,

    #[error("neutral thrust must be finite")]
    InvalidNeutralThrust,

    /// A parameter is NaN or infinite.
    #[error("parameter `{0}` is not finite")]
    NonFinite(&'static str),
}

// ---------------------------------------------------------------------------
// Loading errors
// ---------------------------------------------------------------------------

/// Errors raised while loading configuration or scenario files.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
