use std::time::{Duration, Instant};

/// A fixed-duration transition between two values, sampled with an
/// explicit clock so state stays testable. Easing is cubic in-out.
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    from: f64,
    to: f64,
    start: Instant,
    duration: Duration,
}

impl Tween {
    pub fn new(from: f64, to: f64, start: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// A tween that is already at rest on `value`
    pub fn fixed(value: f64) -> Self {
        Self {
            from: value,
            to: value,
            start: Instant::now(),
            duration: Duration::ZERO,
        }
    }

    /// Final value of the transition
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Displayed value at `now`
    pub fn at(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.start);
        if elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * ease_cubic_in_out(t)
    }

    pub fn is_done(&self, now: Instant) -> bool {
        self.duration.is_zero() || now.saturating_duration_since(self.start) >= self.duration
    }

    /// Start a new transition toward `to`, beginning from whatever value
    /// is currently displayed. An interrupted tween therefore restarts
    /// mid-flight instead of jumping.
    pub fn retarget(&self, to: f64, now: Instant, duration: Duration) -> Self {
        Self {
            from: self.at(now),
            to,
            start: now,
            duration,
        }
    }
}

fn ease_cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = 2.0 * t - 2.0;
        1.0 + u * u * u / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUR: Duration = Duration::from_millis(750);

    #[test]
    fn test_endpoints() {
        let start = Instant::now();
        let tween = Tween::new(0.0, 10.0, start, DUR);
        assert_eq!(tween.at(start), 0.0);
        assert_eq!(tween.at(start + DUR), 10.0);
        assert_eq!(tween.at(start + 2 * DUR), 10.0);
    }

    #[test]
    fn test_midpoint_is_half() {
        let start = Instant::now();
        let tween = Tween::new(0.0, 10.0, start, DUR);
        let mid = tween.at(start + DUR / 2);
        assert!((mid - 5.0).abs() < 1e-6, "cubic in-out is 0.5 at t=0.5, got {mid}");
    }

    #[test]
    fn test_retarget_starts_from_displayed_value() {
        let start = Instant::now();
        let tween = Tween::new(0.0, 10.0, start, DUR);
        let halfway = start + DUR / 2;
        let retargeted = tween.retarget(3.0, halfway, DUR);
        // New transition begins exactly where the old one was showing
        assert!((retargeted.at(halfway) - 5.0).abs() < 1e-6);
        assert_eq!(retargeted.at(halfway + DUR), 3.0);
    }

    #[test]
    fn test_fixed_is_done() {
        let tween = Tween::fixed(7.0);
        let now = Instant::now();
        assert!(tween.is_done(now));
        assert_eq!(tween.at(now), 7.0);
        assert_eq!(tween.target(), 7.0);
    }
}
