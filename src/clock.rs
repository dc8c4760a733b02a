/// Elapsed time since a mode was last (re)activated.
///
/// The clock starts lazily on the first sample after a reset, so a mode that
/// is selected while its panel is hidden does not accumulate time until the
/// first frame it is actually drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModeClock {
    started_at: Option<f64>,
}

impl ModeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to zero and frozen until the next sample.
    pub fn reset(&mut self) {
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Seconds since the first sample after the last reset.
    pub fn elapsed(&mut self, now: f64) -> f64 {
        let start = *self.started_at.get_or_insert(now);
        (now - start).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_first_sample() {
        let mut clock = ModeClock::new();
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(100.0), 0.0);
        assert!(clock.is_running());
        assert_eq!(clock.elapsed(102.5), 2.5);
    }

    #[test]
    fn reset_restarts_from_zero() {
        let mut clock = ModeClock::new();
        clock.elapsed(10.0);
        clock.reset();
        assert_eq!(clock.elapsed(50.0), 0.0);
        assert_eq!(clock.elapsed(51.0), 1.0);
    }

    #[test]
    fn never_negative() {
        let mut clock = ModeClock::new();
        clock.elapsed(10.0);
        assert_eq!(clock.elapsed(9.0), 0.0);
    }
}
