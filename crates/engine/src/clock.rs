use std::time::{Duration, Instant};

/// Longest frame delta handed to gameplay, in seconds.
pub const MAX_DELTA: f32 = 0.1;

/// Frame delta source with a rolling history of recent frame times.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(120)
    }
}

impl FrameClock {
    /// A clock that averages over the last `capacity` frames.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            last: None,
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    /// Seconds since the previous tick, clamped to [`MAX_DELTA`]. The first
    /// tick returns zero.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = self
            .last
            .map(|last| now.duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now);
        self.record(elapsed)
    }

    /// Record a measured frame time and return the clamped delta.
    pub fn record(&mut self, elapsed: Duration) -> f32 {
        self.history[self.index] = elapsed;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
        elapsed.as_secs_f32().min(MAX_DELTA)
    }

    pub fn count(&self) -> usize {
        if self.filled { self.capacity } else { self.index }
    }

    pub fn average(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        let total: Duration = self.history[..count].iter().sum();
        total / count as u32
    }

    /// Frames per second implied by [`average`](Self::average), or zero
    /// before any non-zero frame time was recorded.
    pub fn fps(&self) -> f32 {
        let avg = self.average().as_secs_f32();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_frames_are_clamped() {
        let mut clock = FrameClock::new(4);
        assert!((clock.record(Duration::from_millis(16)) - 0.016).abs() < 1e-6);
        assert_eq!(clock.record(Duration::from_secs(2)), MAX_DELTA);
        // history keeps the real value
        assert_eq!(clock.average(), Duration::from_millis(1008));
    }

    #[test]
    fn history_wraps_around() {
        let mut clock = FrameClock::new(2);
        clock.record(Duration::from_millis(10));
        clock.record(Duration::from_millis(20));
        clock.record(Duration::from_millis(30));
        assert_eq!(clock.count(), 2);
        assert_eq!(clock.average(), Duration::from_millis(25));
        assert!((clock.fps() - 40.0).abs() < 1e-3);
    }

    #[test]
    fn first_tick_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(), 0.0);
        assert!(clock.tick() <= MAX_DELTA);
    }
}
