//! Simulation clock

/// Session clock advanced by the host once per frame.
///
/// The core never reads wall-clock time; timers compare against `now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Time {
    elapsed: f32,
    delta: f32,
    frame_count: u64,
}

impl Time {
    /// Create a clock at t = 0
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds. Negative steps are treated as zero.
    pub fn advance(&mut self, dt: f32) {
        self.delta = dt.max(0.0);
        self.elapsed += self.delta;
        self.frame_count += 1;
    }

    /// Seconds since the session started
    #[must_use]
    pub fn now(&self) -> f32 {
        self.elapsed
    }

    /// Length of the last step
    #[must_use]
    pub fn delta_seconds(&self) -> f32 {
        self.delta
    }

    /// Number of steps taken
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_advance() {
        let mut time = Time::new();
        time.advance(0.5);
        time.advance(0.25);

        assert!((time.now() - 0.75).abs() < f32::EPSILON);
        assert!((time.delta_seconds() - 0.25).abs() < f32::EPSILON);
        assert_eq!(time.frame_count(), 2);
    }

    #[test]
    fn test_negative_step_clamps() {
        let mut time = Time::new();
        time.advance(-1.0);
        assert_eq!(time.now(), 0.0);
    }
}
