//! Frame pacing for the shell event loop.

use web_time::{Duration, Instant};

/// Frame pacing and smoothed FPS for the shell's event loop.
pub struct FrameTiming {
    /// Minimum frame duration (zero = unlimited)
    min_frame_duration: Duration,
    /// Loop start, the origin of [`elapsed`](Self::elapsed)
    started: Instant,
    last_frame: Instant,
    /// Exponential moving average of instantaneous FPS
    smoothed_fps: f32,
    /// Weight of the newest sample (0.0-1.0)
    smoothing: f32,
    frames: u64,
}

impl FrameTiming {
    /// Timer targeting `target_fps` frames per second (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };
        let now = Instant::now();
        Self {
            min_frame_duration,
            started: now,
            last_frame: now,
            smoothed_fps: 60.0,
            smoothing: 0.05,
            frames: 0,
        }
    }

    /// Seconds since the timer was created.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// Time left before the next frame is due.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.min_frame_duration
            .saturating_sub(self.last_frame.elapsed())
    }

    /// Record the end of a frame.
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frames += 1;

        if frame_time > 0.0 {
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + self.smoothing / frame_time;
        }
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Frames completed so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_never_waits() {
        let timing = FrameTiming::new(0);
        assert_eq!(timing.remaining(), Duration::ZERO);
    }

    #[test]
    fn capped_rate_waits_at_most_one_frame() {
        let timing = FrameTiming::new(10);
        assert!(timing.remaining() <= Duration::from_millis(100));
    }

    #[test]
    fn end_frame_counts() {
        let mut timing = FrameTiming::new(0);
        timing.end_frame();
        timing.end_frame();
        assert_eq!(timing.frame_count(), 2);
        assert!(timing.fps() > 0.0);
    }
}
