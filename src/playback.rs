use crate::*;
use std::time::Duration;

/// Spaces frame advances out to a fixed interval for a consumer that is
/// ticked at its own, usually faster, rate.
///
/// The first tick always advances. After that the pacer waits until the
/// accumulated tick deltas reach the interval, and the tick after that
/// advances again.
#[derive(Debug, Clone, new)]
pub struct FramePacer {
    interval: Duration,
    #[new(default)]
    elapsed: Duration,
    #[new(default)]
    waiting: bool,
}

impl FramePacer {
    pub fn from_config(config: &ReplayConfig) -> Self {
        Self::new(config.frame_interval())
    }

    pub fn tick(&mut self, delta: Duration) -> bool {
        if !self.waiting {
            self.waiting = true;
            self.elapsed = Duration::ZERO;
            return true;
        }
        self.elapsed += delta;
        if self.elapsed >= self.interval {
            self.waiting = false;
        }
        false
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_advances_then_waits() {
        let mut pacer = FramePacer::new(Duration::from_millis(100));
        let step = Duration::from_millis(40);
        let advanced: Vec<bool> = (0..8).map(|_| pacer.tick(step)).collect();
        // 40 + 40 + 40 crosses the interval on the fourth tick, so the fifth
        // advances.
        assert_eq!(
            advanced,
            vec![true, false, false, false, true, false, false, false]
        );
    }

    #[test]
    fn test_zero_interval_advances_every_other_tick() {
        let mut pacer = FramePacer::new(Duration::ZERO);
        let advanced: Vec<bool> = (0..4).map(|_| pacer.tick(Duration::ZERO)).collect();
        assert_eq!(advanced, vec![true, false, true, false]);
    }
}
