/// Longest frame delta fed to the accumulator, in seconds.
pub const MAX_FRAME_DT: f64 = 0.1;

/// Converts variable frame deltas into whole fixed ticks.
#[derive(Debug, Clone)]
pub struct FrameClock {
    tick_accumulator: f64,
    tick_rate: f64,
}

impl FrameClock {
    pub fn new(tick_rate_hz: u32) -> Self {
        Self {
            tick_accumulator: 0.0,
            tick_rate: 1.0 / tick_rate_hz.max(1) as f64,
        }
    }

    /// Seconds per tick.
    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    /// Feed one frame's delta and return how many ticks are due.
    pub fn advance(&mut self, dt: f64) -> u32 {
        self.tick_accumulator += dt.clamp(0.0, MAX_FRAME_DT);
        let mut ticks = 0;
        // tolerate rounding so a delta of exactly one period is one tick
        while self.tick_accumulator + 1e-9 >= self.tick_rate {
            self.tick_accumulator -= self.tick_rate;
            ticks += 1;
        }
        self.tick_accumulator = self.tick_accumulator.max(0.0);
        ticks
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_period_is_one_tick() {
        let mut clock = FrameClock::new(60);
        assert_eq!(clock.advance(1.0 / 60.0), 1);
        assert_eq!(clock.advance(1.0 / 60.0), 1);
    }

    #[test]
    fn short_frames_accumulate() {
        let mut clock = FrameClock::new(60);
        assert_eq!(clock.advance(1.0 / 120.0), 0);
        assert_eq!(clock.advance(1.0 / 120.0), 1);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut clock = FrameClock::new(60);
        // one second stall counts as 0.1 s
        assert_eq!(clock.advance(1.0), 6);
    }

    #[test]
    fn negative_delta_ignored() {
        let mut clock = FrameClock::new(60);
        assert_eq!(clock.advance(-5.0), 0);
    }

    #[test]
    fn zero_rate_treated_as_one_hz() {
        let clock = FrameClock::new(0);
        assert_eq!(clock.tick_rate(), 1.0);
    }
}
