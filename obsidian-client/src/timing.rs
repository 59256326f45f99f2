//! Frame timing and FPS sampling.

use std::time::{Duration, Instant};

/// How often an FPS sample is produced.
const FPS_INTERVAL: Duration = Duration::from_secs(1);

/// Result of one [`FrameClock::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick.
    pub delta: f32,
    /// Frames per second averaged over the last interval, present about once per second.
    pub fps: Option<f32>,
}

/// Measures the time between frames and samples the frame rate.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    fps_since: Instant,
    frames: u32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            last: now,
            fps_since: now,
            frames: 0,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let delta = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        self.frames += 1;

        let elapsed = now.saturating_duration_since(self.fps_since);
        let fps = if elapsed >= FPS_INTERVAL {
            let fps = self.frames as f32 / elapsed.as_secs_f32();
            self.fps_since = now;
            self.frames = 0;
            Some(fps)
        } else {
            None
        };

        FrameTime { delta, fps }
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

    #[test]
    fn test_delta_between_ticks() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        let frame = clock.tick_at(start + Duration::from_millis(16));
        assert!((frame.delta - 0.016).abs() < 1e-6);
        assert_eq!(frame.fps, None);
    }

    #[test]
    fn test_fps_reported_once_per_second() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        let mut samples = Vec::new();
        for i in 1..=150 {
            let frame = clock.tick_at(start + Duration::from_millis(20 * i));
            if let Some(fps) = frame.fps {
                samples.push(fps);
            }
        }

        assert_eq!(samples.len(), 3);
        for fps in samples {
            assert!((fps - 50.0).abs() < 1e-3);
        }
    }
}
