use std::time::{Duration, Instant};

/// Monotonic elapsed-time source for the animation loop.
///
/// Starts at construction, never resets, and is read once per tick.
#[derive(Debug, Clone)]
pub struct FrameClock {
    started: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Seconds since the clock was constructed.
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame time tracker for instrumentation (overlay FPS readout).
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    pub fn average(&self) -> Duration {
        let count = if self.filled { self.capacity } else { self.index };
        if count == 0 {
            return Duration::ZERO;
        }
        let total: Duration = self.history[..count].iter().sum();
        total / count as u32
    }

    /// Average frames per second over the recorded window.
    pub fn fps(&self) -> f64 {
        let avg = self.average().as_secs_f64();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_monotonic() {
        let clock = FrameClock::new();
        let a = clock.elapsed();
        let b = clock.elapsed();
        assert!(b >= a);
        assert!(a >= 0.0);
    }

    #[test]
    fn frame_timer_averages() {
        let mut timer = FrameTimer::new(3);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));
        assert_eq!(timer.average(), Duration::from_millis(20));
        assert!((timer.fps() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn frame_timer_wraps_around() {
        let mut timer = FrameTimer::new(2);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));
        assert_eq!(timer.average(), Duration::from_millis(25));
    }
}
