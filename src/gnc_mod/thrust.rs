use log::{debug, warn};

use crate::config::{ControllerConfig, PidGains, ThrustParams, ThrustSense};
use crate::error::ConfigError;
use super::bounds::{PhaseBounds, ThrustBounds};
use super::pid::Pid2;
use super::rate_limit::rate_limit;

// ---------------------------------------------------------------------------
// Velocity-regulated thrust controller (one axis)
// ---------------------------------------------------------------------------

/// Turns a velocity target into a bounded thrust command once per control
/// cycle.
///
/// Per cycle the owner calls [`update_velocity_state`](Self::update_velocity_state)
/// with the fresh velocity estimate and then
/// [`get_thrust_command`](Self::get_thrust_command) exactly once. The
/// flight-phase state machine steers the controller through the
/// [`PhaseBounds`] it was built with.
///
/// The law runs in coordinates relative to the neutral (trim) thrust: the
/// command is `neutral + sense * u`, and the FSM thrust bounds are
/// translated into limits on `u`.
#[derive(Debug, Clone)]
pub struct ThrustController<B> {
    bounds: B,
    pid: Pid2,
    params: ThrustParams,
    gains: Option<PidGains>,
    sense: ThrustSense,
    setpoint_rate_limit: Option<f64>,
    neutral: f64,
    target_velocity: f64,
    velocity_setpoint: f64,
    measured_velocity: f64,
    thrust_command: Option<f64>,
    active: bool,
}

impl<B: PhaseBounds> ThrustController<B> {
    /// Unconfigured, inactive controller bound to `bounds`.
    ///
    /// Until [`configure`](Self::configure) succeeds the controller only
    /// ever holds the neutral thrust.
    pub fn new(bounds: B) -> Self {
        Self {
            bounds,
            pid: Pid2::default(),
            params: ThrustParams::default(),
            gains: None,
            sense: ThrustSense::default(),
            setpoint_rate_limit: None,
            neutral: 0.5,
            target_velocity: 0.0,
            velocity_setpoint: 0.0,
            measured_velocity: 0.0,
            thrust_command: None,
            active: false,
        }
    }

    /// Build and configure in one step.
    pub fn with_config(bounds: B, config: &ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut ctl = Self::new(bounds);
        ctl.sense = config.sense;
        ctl.setpoint_rate_limit = config.setpoint_rate_limit;
        ctl.neutral = config.neutral_thrust;
        ctl.configure(&config.params)?;
        Ok(ctl)
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Derive the law coefficients from classical gains and store the cycle
    /// time and velocity ceiling.
    ///
    /// Safe while active: the law is re-seeded from the last command, so
    /// only future dynamics change. On error nothing is modified.
    pub fn configure(&mut self, params: &ThrustParams) -> Result<(), ConfigError> {
        let gains = params.validate().inspect_err(|e| {
            warn!("rejected thrust controller parameters: {e}");
        })?;

        self.pid.configure(&gains, params.cycle_time, 0.0);
        if self.active {
            self.pid.transfer(self.law_offset(self.held_command()));
        }
        self.params = *params;
        self.gains = Some(gains);

        // A lower ceiling applies to the stored target right away.
        self.target_velocity = self.saturate_velocity(self.target_velocity);
        self.velocity_setpoint = self.saturate_velocity(self.velocity_setpoint);

        debug!(
            "thrust controller configured: kp={} Ti={:.4} Td={:.4} kt={:.4} Tf={:.4} dt={} vmax={}",
            gains.kp, gains.ti, gains.td, gains.kt, gains.tf, params.cycle_time, params.velocity_max
        );
        Ok(())
    }

    pub fn set_sense(&mut self, sense: ThrustSense) {
        self.sense = sense;
    }

    /// Enable (`Some`) or disable (`None`) setpoint slewing in
    /// [`update_velocity_state`](Self::update_velocity_state).
    pub fn set_setpoint_rate_limit(&mut self, max_rate: Option<f64>) -> Result<(), ConfigError> {
        if let Some(rate) = max_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConfigError::InvalidRateLimit);
            }
        }
        self.setpoint_rate_limit = max_rate;
        Ok(())
    }

    /// Move the trim point.
    ///
    /// While active the integrator absorbs the change so the command at
    /// this instant is unchanged. Non-finite values are ignored.
    pub fn update_neutral_thrust(&mut self, neutral: f64) {
        if !neutral.is_finite() {
            warn!("ignoring non-finite neutral thrust {neutral}");
            return;
        }
        if self.active {
            self.pid.shift_bias(self.sense.sign() * (self.neutral - neutral));
        }
        debug!("neutral thrust {:.4} -> {:.4}", self.neutral, neutral);
        self.neutral = neutral;
    }

    // -----------------------------------------------------------------------
    // Engagement
    // -----------------------------------------------------------------------

    /// Engage, continuing from the last command this controller produced
    /// (neutral thrust on a cold start).
    ///
    /// Every call re-seeds the law, also when already active.
    pub fn activate(&mut self) {
        self.activate_from(self.held_command());
    }

    /// Engage, continuing from `applied_thrust`, the thrust the actuator is
    /// currently receiving from whoever was in charge before.
    pub fn activate_from(&mut self, applied_thrust: f64) {
        let applied = if applied_thrust.is_finite() {
            applied_thrust
        } else {
            warn!("non-finite applied thrust on activation, seeding from neutral");
            self.neutral
        };
        self.pid.transfer(self.law_offset(applied));
        self.thrust_command = Some(applied);
        self.active = true;
        debug!("thrust controller active (seed thrust {applied:.4})");
    }

    /// Disengage. Integrator and filter state are held, not zeroed.
    pub fn deactivate(&mut self) {
        self.active = false;
        debug!("thrust controller inactive");
    }

    // -----------------------------------------------------------------------
    // Per-cycle inputs
    // -----------------------------------------------------------------------

    /// New requested velocity, magnitude saturated to the configured
    /// ceiling with its sign kept.
    pub fn update_velocity_setpoint(&mut self, requested: f64) {
        if requested.is_nan() {
            warn!("ignoring NaN velocity setpoint");
            return;
        }
        self.target_velocity = self.saturate_velocity(requested);
    }

    /// Record this cycle's velocity estimate and refresh the setpoint from
    /// the FSM-bounded target.
    pub fn update_velocity_state(&mut self, measured: f64) {
        if measured.is_finite() {
            self.measured_velocity = measured;
        } else {
            warn!("ignoring non-finite velocity estimate, holding {}", self.measured_velocity);
        }

        let bounded = self.bounds.bound_velocity_down(self.target_velocity);
        if bounded.is_nan() {
            warn!("{} returned NaN velocity bound, holding setpoint", self.bounds.name());
            return;
        }
        let desired = self.saturate_velocity(bounded);

        match self.setpoint_rate_limit {
            Some(max_rate) => {
                let mut current = self.velocity_setpoint;
                self.rate_limit(desired, &mut current, max_rate);
                self.velocity_setpoint = current;
            }
            None => self.velocity_setpoint = desired,
        }
    }

    /// Slew `current` towards `desired` at no more than `max_rate`
    /// (velocity units per second squared) over one cycle. The sign of
    /// `max_rate` is ignored.
    pub fn rate_limit(&self, desired: f64, current: &mut f64, max_rate: f64) {
        rate_limit(desired, current, max_rate, self.params.cycle_time);
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    /// Compute, cache and return this cycle's thrust command.
    ///
    /// The result always lies within the bounds the FSM reports now. While
    /// inactive (or unconfigured) the law is not evaluated and the held
    /// command is returned, limited to those bounds.
    pub fn get_thrust_command(&mut self) -> f64 {
        let ThrustBounds { lower, upper } = self.thrust_bounds();

        if !self.active || self.gains.is_none() {
            return self.held_command().max(lower).min(upper);
        }

        let (u_low, u_high) = self.law_limits(lower, upper);
        let u = self.pid.apply(self.velocity_setpoint, self.measured_velocity, u_low, u_high);
        let command = (self.neutral + self.sense.sign() * u).max(lower).min(upper);

        self.thrust_command = Some(command);
        command
    }

    pub fn get_velocity_desired(&self) -> f64 {
        self.velocity_setpoint
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_configured(&self) -> bool {
        self.gains.is_some()
    }

    pub fn neutral_thrust(&self) -> f64 {
        self.neutral
    }

    pub fn target_velocity(&self) -> f64 {
        self.target_velocity
    }

    pub fn measured_velocity(&self) -> f64 {
        self.measured_velocity
    }

    /// Last computed command; neutral thrust if none was computed yet.
    pub fn thrust_command(&self) -> f64 {
        self.held_command()
    }

    pub fn gains(&self) -> Option<&PidGains> {
        self.gains.as_ref()
    }

    pub fn params(&self) -> &ThrustParams {
        &self.params
    }

    pub fn sense(&self) -> ThrustSense {
        self.sense
    }

    pub fn pid(&self) -> &Pid2 {
        &self.pid
    }

    pub fn bounds(&self) -> &B {
        &self.bounds
    }

    pub fn bounds_mut(&mut self) -> &mut B {
        &mut self.bounds
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn held_command(&self) -> f64 {
        self.thrust_command.unwrap_or(self.neutral)
    }

    fn saturate_velocity(&self, v: f64) -> f64 {
        let vmax = if self.gains.is_some() { self.params.velocity_max } else { 0.0 };
        v.max(-vmax).min(vmax)
    }

    /// Law output that maps onto `thrust`.
    fn law_offset(&self, thrust: f64) -> f64 {
        self.sense.sign() * (thrust - self.neutral)
    }

    /// FSM thrust bounds translated into limits on the law output.
    fn law_limits(&self, lower: f64, upper: f64) -> (f64, f64) {
        let a = self.law_offset(lower);
        let b = self.law_offset(upper);
        (a.min(b), a.max(b))
    }

    /// FSM bounds, collapsed onto the neutral thrust when unusable.
    fn thrust_bounds(&self) -> ThrustBounds {
        let b = self.bounds.bound_thrust();
        if b.is_valid() {
            b
        } else {
            warn!(
                "{} returned unusable thrust bounds [{}, {}], holding neutral {}",
                self.bounds.name(),
                b.lower,
                b.upper,
                self.neutral
            );
            ThrustBounds::new(self.neutral, self.neutral)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
