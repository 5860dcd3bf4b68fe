use std::time::{Duration, Instant};

/// Default frame-rate cap.
pub const TARGET_FPS: u32 = 60;

/// Per-frame timing: elapsed seconds, a once-per-second fps sample and an
/// optional sleep to cap the frame rate.
pub struct FrameClock {
    last: Instant,
    frame_budget: Duration,
    delta: f32,
    since_sample: f32,
    fps: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(TARGET_FPS)
    }
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        Self {
            last: Instant::now(),
            frame_budget: Duration::from_micros(1_000_000 / target_fps.max(1) as u64),
            delta: 0.0,
            since_sample: 0.0,
            fps: 0,
        }
    }

    /// Start a new frame; returns seconds since the previous call.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.advance(now.duration_since(self.last));
        self.last = now;
        self.delta
    }

    fn advance(&mut self, elapsed: Duration) {
        self.delta = elapsed.as_secs_f32();
        self.since_sample += self.delta;
        if self.since_sample > 1.0 && self.delta > 0.0 {
            self.fps = (1.0 / self.delta) as u32;
            self.since_sample = 0.0;
        }
    }

    /// Seconds the last frame took.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Last fps sample (refreshed about once per second).
    #[inline]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Sleep away whatever is left of this frame's budget.
    pub fn limit(&self) {
        let spent = self.last.elapsed();
        if spent < self.frame_budget {
            std::thread::sleep(self.frame_budget - spent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_sampled_after_a_second() {
        let mut clock = FrameClock::new(60);
        for _ in 0..60 {
            clock.advance(Duration::from_millis(20));
        }
        assert!((clock.delta() - 0.02).abs() < 1e-6);
        assert_eq!(clock.fps(), 50);
    }

    #[test]
    fn no_sample_before_a_second() {
        let mut clock = FrameClock::new(60);
        clock.advance(Duration::from_millis(500));
        assert_eq!(clock.fps(), 0);
    }
}
