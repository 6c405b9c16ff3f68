use std::time::Instant;

/// Wall-clock seconds since start, for driving the oscillators.
///
/// Monotonic and never reset. Timestamps earlier than the start read as zero.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    start: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { start }
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn seconds_at(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.start).as_secs_f64()
    }

    pub fn seconds(&self) -> f64 {
        self.seconds_at(Instant::now())
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn measures_from_start() {
        let start = Instant::now();
        let clock = FrameClock::starting_at(start);
        let t = clock.seconds_at(start + Duration::from_millis(1500));
        assert!((t - 1.5).abs() < 1e-9);
    }

    #[test]
    fn earlier_timestamps_saturate_to_zero() {
        let start = Instant::now() + Duration::from_secs(10);
        let clock = FrameClock::starting_at(start);
        assert_eq!(clock.seconds_at(Instant::now()), 0.0);
    }
}
