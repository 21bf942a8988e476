use crate::config::PidGains;

// ---------------------------------------------------------------------------
// Two-degree-of-freedom PID (single axis)
// ---------------------------------------------------------------------------
//
//   P = kp * (beta * r - y)
//   D = ad * D - bd * (y - y_old)           filtered, on measurement
//   v = P + I + D                           unsaturated output
//   u = clamp(v, u_low, u_high)
//   I = I + bi * (r - y) + br * (u - v)     back-calculation anti-windup
//
// with bi = ki * dt, br = kt * dt, ad = Tf / (Tf + dt), bd = kd / (Tf + dt).

#[derive(Debug, Clone, Default)]
pub struct Pid2 {
    kp: f64,
    beta: f64,
    bi: f64,
    br: f64,
    ad: f64,
    bd: f64,
    /// Output reproduced by the first step after a (re)seed.
    u0: f64,
    /// A seed is pending and will be applied on the next step.
    reseed: bool,
    i: f64,
    d: f64,
    y_old: f64,
}

impl Pid2 {
    pub fn new(gains: &PidGains, dt: f64) -> Self {
        let mut pid = Self::default();
        pid.configure(gains, dt, 0.0);
        pid
    }

    /// Recompute the discrete coefficients and schedule a seed so the next
    /// step outputs `u0`.
    pub fn configure(&mut self, gains: &PidGains, dt: f64, u0: f64) {
        self.kp = gains.kp;
        self.beta = gains.beta;
        self.bi = gains.ki * dt;
        self.br = gains.kt * dt;
        self.ad = gains.tf / (gains.tf + dt);
        self.bd = gains.kd / (gains.tf + dt);
        self.transfer(u0);
    }

    /// Bumpless transfer: the next step outputs exactly `u0` (before
    /// saturation), whatever the setpoint and measurement are then.
    pub fn transfer(&mut self, u0: f64) {
        self.u0 = if u0.is_nan() { 0.0 } else { u0 };
        self.reseed = true;
    }

    /// Shift the integrator (or the pending seed) by `delta`.
    pub fn shift_bias(&mut self, delta: f64) {
        if self.reseed {
            self.u0 += delta;
        } else {
            self.i += delta;
        }
    }

    /// One control step. Returns the saturated output.
    pub fn apply(&mut self, r: f64, y: f64, u_low: f64, u_high: f64) -> f64 {
        if self.reseed {
            self.reseed = false;
            self.y_old = y;
            self.d = 0.0;
            self.i = self.u0 - self.kp * (self.beta * r - y);
        }

        let p = self.kp * (self.beta * r - y);
        self.d = self.ad * self.d - self.bd * (y - self.y_old);

        let v = p + self.i + self.d;
        // max/min instead of clamp: never panics, and a NaN v lands on u_low
        let u = v.max(u_low).min(u_high);

        self.i += self.bi * (r - y) + self.br * (u - v);
        self.y_old = y;

        // A non-finite integrator or filter would latch; start over from
        // the last usable output instead.
        if !self.i.is_finite() || !self.d.is_finite() {
            self.i = 0.0;
            self.d = 0.0;
            self.transfer(if u.is_finite() { u } else { 0.0 });
        }

        u
    }

    pub fn integral(&self) -> f64 {
        self.i
    }

    pub fn derivative(&self) -> f64 {
        self.d
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn gains(kp: f64, ki: f64, kd: f64) -> PidGains {
        PidGains::from_classical(kp, ki, kd)
    }

    #[test]
    fn first_step_reproduces_seed() {
        let mut pid = Pid2::new(&gains(0.5, 0.1, 0.05), 0.02);
        pid.transfer(0.3);
        let u = pid.apply(1.7, -0.4, -1.0, 1.0);
        assert!((u - 0.3).abs() < 1e-12, "Seeded output should be 0.3, got {}", u);
    }

    #[test]
    fn proportional_acts_on_weighted_error() {
        let mut pid = Pid2::new(&gains(2.0, 0.001, 0.0), 0.01);
        pid.apply(0.0, 0.0, -10.0, 10.0);
        // step the setpoint; only P (and a tiny I) responds
        let u = pid.apply(1.0, 0.0, -10.0, 10.0);
        assert!((u - 2.0).abs() < 1e-3, "Expected kp * error, got {}", u);
    }

    #[test]
    fn integral_accumulates_on_constant_error() {
        let mut pid = Pid2::new(&gains(1.0, 1.0, 0.0), 0.1);
        let first = pid.apply(1.0, 0.0, -10.0, 10.0);
        let second = pid.apply(1.0, 0.0, -10.0, 10.0);
        assert!((second - first - 0.1).abs() < 1e-12, "Integral should add ki*dt*e per step");
    }

    #[test]
    fn derivative_ignores_setpoint_steps() {
        let mut pid = Pid2::new(&gains(1.0, 0.01, 0.5), 0.02);
        pid.apply(0.0, 0.0, -10.0, 10.0);
        pid.apply(5.0, 0.0, -10.0, 10.0);
        assert_eq!(pid.derivative(), 0.0, "No derivative kick from a setpoint step");
        pid.apply(5.0, 0.1, -10.0, 10.0);
        assert!(pid.derivative() < 0.0, "Rising measurement should damp the output");
    }

    #[test]
    fn output_respects_limits() {
        let mut pid = Pid2::new(&gains(10.0, 5.0, 0.0), 0.02);
        for _ in 0..100 {
            let u = pid.apply(10.0, 0.0, -0.2, 0.3);
            assert!((-0.2..=0.3).contains(&u));
        }
    }

    #[test]
    fn anti_windup_limits_integrator_growth() {
        let g = gains(1.0, 2.0, 0.0);
        let mut pid = Pid2::new(&g, 0.02);
        for _ in 0..4_000 {
            pid.apply(5.0, 0.0, -1.0, 1.0);
        }
        // Back-calculation settles where bi*e == -br*(u - v); without it I
        // would have grown to ki * e * t = 800.
        let settled = 1.0 - g.kp * 5.0 + (g.ki * 5.0) / g.kt;
        assert!(
            (pid.integral() - settled).abs() < 1e-3,
            "Integrator should settle at {:.4}, got {:.4}",
            settled,
            pid.integral()
        );
    }

    #[test]
    fn bias_shift_moves_output_one_to_one() {
        let g = gains(0.5, 0.1, 0.05);
        let mut a = Pid2::new(&g, 0.02);
        let mut b = a.clone();
        for k in 0..10 {
            let y = 0.1 * k as f64;
            a.apply(1.0, y, -5.0, 5.0);
            b.apply(1.0, y, -5.0, 5.0);
        }
        b.shift_bias(0.25);
        let ua = a.apply(1.0, 1.0, -5.0, 5.0);
        let ub = b.apply(1.0, 1.0, -5.0, 5.0);
        assert!((ub - ua - 0.25).abs() < 1e-12);
    }

    #[test]
    fn infinite_limits_do_not_latch_the_integrator() {
        let mut pid = Pid2::new(&gains(0.5, 0.1, 0.05), 0.02);
        pid.apply(0.0, 0.0, -1.0, 1.0);
        pid.apply(0.0, 0.0, f64::INFINITY, f64::INFINITY);
        pid.apply(0.0, 0.0, f64::INFINITY, f64::INFINITY);
        assert!(pid.integral().is_finite());

        let mut last = f64::NAN;
        for _ in 0..10 {
            last = pid.apply(0.0, 0.0, -1.0, 1.0);
        }
        assert!(pid.integral().is_finite());
        assert!(last.abs() < 1.0, "Output should leave the limit, got {}", last);
    }

    #[test]
    fn nan_seed_falls_back_to_zero() {
        let mut pid = Pid2::new(&gains(0.5, 0.1, 0.0), 0.02);
        pid.transfer(f64::NAN);
        let u = pid.apply(0.0, 0.0, -1.0, 1.0);
        assert_eq!(u, 0.0);
    }
}
