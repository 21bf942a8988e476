// ---------------------------------------------------------------------------
// Setpoint slew limiting
// ---------------------------------------------------------------------------

/// Gaps smaller than this are closed in one step.
pub const SNAP_TOLERANCE: f64 = 1e-6;

/// Slew rates below this snap to the target instead of crawling towards it.
pub const MIN_SLEW_RATE: f64 = 0.1;

/// Move `current` towards `desired` at no more than `max_rate` per second
/// over one step of `dt` seconds.
///
/// Only the magnitude of `max_rate` is used and `dt` must be positive. A
/// zero or NaN rate leaves `current` unchanged. The snap threshold never
/// exceeds `|max_rate|`, so a single call moves `current` by at most
/// `|max_rate| * dt` unless the remaining gap is below [`SNAP_TOLERANCE`].
pub fn rate_limit(desired: f64, current: &mut f64, max_rate: f64, dt: f64) {
    let max_rate = max_rate.abs();
    if max_rate == 0.0 || max_rate.is_nan() {
        return;
    }

    let delta = desired - *current;

    if delta.abs() < SNAP_TOLERANCE {
        *current = desired;
        return;
    }

    let rate = (delta / dt).max(-max_rate).min(max_rate);

    if rate.abs() < MIN_SLEW_RATE.min(max_rate) {
        *current = desired;
    } else {
        *current += rate * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_gap_snaps_exactly() {
        let mut current = 1.0;
        rate_limit(1.0 + 5e-7, &mut current, 2.0, 0.02);
        assert_eq!(current, 1.0 + 5e-7);
    }

    #[test]
    fn large_gap_is_slewed() {
        let mut current = 0.0;
        rate_limit(10.0, &mut current, 2.0, 0.02);
        assert!((current - 0.04).abs() < 1e-12, "Expected max_rate*dt, got {}", current);

        let mut current = 0.0;
        rate_limit(-10.0, &mut current, 2.0, 0.02);
        assert!((current + 0.04).abs() < 1e-12, "Slew must keep the sign, got {}", current);
    }

    #[test]
    fn step_never_exceeds_limit() {
        let (max_rate, dt) = (1.5, 0.01);
        let mut current = -3.0;
        let mut prev = current;
        for _ in 0..1_000 {
            rate_limit(4.0, &mut current, max_rate, dt);
            assert!((current - prev).abs() <= max_rate * dt + 1e-12);
            prev = current;
        }
        assert_eq!(current, 4.0, "Should converge onto the target");
    }

    #[test]
    fn slow_limit_still_bounded() {
        // max_rate below MIN_SLEW_RATE must not trigger a snap across a big gap
        let mut current = 0.0;
        rate_limit(1.0, &mut current, 0.05, 0.02);
        assert!((current - 0.001).abs() < 1e-12);
    }

    #[test]
    fn negative_rate_still_moves_towards_target() {
        let mut current = 0.0;
        rate_limit(1.0, &mut current, -2.0, 0.02);
        assert!((current - 0.04).abs() < 1e-12, "Expected +0.04, got {}", current);
    }

    #[test]
    fn zero_or_nan_rate_holds() {
        let mut current = 0.3;
        rate_limit(1.0, &mut current, 0.0, 0.02);
        assert_eq!(current, 0.3);
        rate_limit(1.0, &mut current, f64::NAN, 0.02);
        assert_eq!(current, 0.3);
    }

    #[test]
    fn small_remaining_gap_snaps() {
        let mut current = 0.0;
        // rate = 0.001 / 0.02 = 0.05 < MIN_SLEW_RATE
        rate_limit(0.001, &mut current, 2.0, 0.02);
        assert_eq!(current, 0.001);
    }
}
