/// Physical thrust range the actuator may be driven over this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrustBounds {
    pub lower: f64,
    pub upper: f64,
}

impl ThrustBounds {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Finite and ordered.
    pub fn is_valid(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite() && self.lower <= self.upper
    }

    pub fn contains(&self, thrust: f64) -> bool {
        (self.lower..=self.upper).contains(&thrust)
    }
}

impl Default for ThrustBounds {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Capabilities the flight-phase state machine exposes to a thrust
/// controller.
///
/// Implement this to plug a path follower (or a test stub) into a
/// [`ThrustController`](super::ThrustController).
pub trait PhaseBounds {
    /// Phase-aware clamp of the requested velocity, applied every cycle
    /// (e.g. a slower descent close to the ground).
    fn bound_velocity_down(&self, requested: f64) -> f64;

    /// Permissible thrust range for this cycle.
    fn bound_thrust(&self) -> ThrustBounds;

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

impl<T: PhaseBounds + ?Sized> PhaseBounds for &T {
    fn bound_velocity_down(&self, requested: f64) -> f64 {
        (**self).bound_velocity_down(requested)
    }

    fn bound_thrust(&self) -> ThrustBounds {
        (**self).bound_thrust()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: PhaseBounds + ?Sized> PhaseBounds for &mut T {
    fn bound_velocity_down(&self, requested: f64) -> f64 {
        (**self).bound_velocity_down(requested)
    }

    fn bound_thrust(&self) -> ThrustBounds {
        (**self).bound_thrust()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: PhaseBounds + ?Sized> PhaseBounds for Box<T> {
    fn bound_velocity_down(&self, requested: f64) -> f64 {
        (**self).bound_velocity_down(requested)
    }

    fn bound_thrust(&self) -> ThrustBounds {
        (**self).bound_thrust()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Fixed envelope: passes velocities through and always offers the same
/// thrust range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedBounds {
    pub thrust: ThrustBounds,
}

impl FixedBounds {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { thrust: ThrustBounds::new(lower, upper) }
    }
}

impl PhaseBounds for FixedBounds {
    fn bound_velocity_down(&self, requested: f64) -> f64 {
        requested
    }

    fn bound_thrust(&self) -> ThrustBounds {
        self.thrust
    }

    fn name(&self) -> &str {
        "FixedBounds"
    }
}
