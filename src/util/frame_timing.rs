use web_time::{Duration, Instant};

/// Longest step handed to the camera after a stall.
const MAX_STEP: Duration = Duration::from_millis(100);

/// Frame timing with FPS calculation and optional frame limiting.
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        Self {
            target_fps,
            min_frame_duration,
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Whether enough time has passed since the last frame.
    #[must_use]
    pub fn should_render(&self) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        self.last_frame.elapsed() >= self.min_frame_duration
    }

    /// Time left before the next frame is due.
    #[must_use]
    pub fn until_next_frame(&self) -> Duration {
        self.min_frame_duration
            .saturating_sub(self.last_frame.elapsed())
    }

    /// Sleep until the next frame is due, then finish the frame and return
    /// its step as [`end_frame`](Self::end_frame) does.
    pub fn pace(&mut self) -> f32 {
        while !self.should_render() {
            std::thread::sleep(self.until_next_frame());
        }
        self.end_frame()
    }

    /// Finish a frame and return the step (in seconds) to advance the
    /// viewport by. Steps are capped so a stall does not jump the camera.
    pub fn end_frame(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        elapsed.min(MAX_STEP).as_secs_f32()
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_always_renders() {
        let timing = FrameTiming::new(0);
        assert!(timing.should_render());
        assert_eq!(timing.until_next_frame(), Duration::ZERO);
    }

    #[test]
    fn steps_are_capped() {
        let mut timing = FrameTiming::new(60);
        std::thread::sleep(Duration::from_millis(120));
        let dt = timing.end_frame();
        assert!(dt <= MAX_STEP.as_secs_f32());
        assert!(dt > 0.0);
    }

    #[test]
    fn limited_timer_waits_for_the_frame_budget() {
        let mut timing = FrameTiming::new(60);
        let _ = timing.end_frame();
        assert!(!timing.should_render());
        let left = timing.until_next_frame();
        assert!(left > Duration::ZERO);
        assert!(left <= Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn pace_returns_at_least_one_frame_budget() {
        let mut timing = FrameTiming::new(50);
        let _ = timing.end_frame();
        let dt = timing.pace();
        assert!(dt >= 0.019, "step {dt} shorter than the frame budget");
        assert!(dt <= MAX_STEP.as_secs_f32());
    }
}
