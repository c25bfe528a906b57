const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo {
    pub number: u64,
    pub time: f32,
    pub delta: f32,
}

/// Per-frame clock with a once-per-second fps estimate
pub struct FrameClock {
    frame_number: u64,
    start_time: std::time::Instant,
    last_frame_time: std::time::Instant,
    interval_frames: u32,
    interval_timer: f32,
    fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = std::time::Instant::now();
        Self {
            frame_number: 0,
            start_time: now,
            last_frame_time: now,
            interval_frames: 0,
            interval_timer: 0.0,
            fps: 0.0,
        }
    }

    /// Advance to the next frame and return its timing info
    pub fn tick(&mut self) -> FrameInfo {
        let now = std::time::Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f32();
        let time = now.duration_since(self.start_time).as_secs_f32();
        self.last_frame_time = now;

        let info = FrameInfo {
            number: self.frame_number,
            time,
            delta,
        };
        self.frame_number += 1;

        self.interval_frames += 1;
        self.interval_timer += delta;
        if self.interval_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.interval_frames as f32 / self.interval_timer;
            log::debug!("fps: {:.1}", self.fps);
            self.interval_frames = 0;
            self.interval_timer = 0.0;
        }

        info
    }

    /// Most recent once-per-second fps estimate (0 until the first interval)
    pub fn fps(&self) -> f32 {
        self.fps
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
    fn test_frame_numbers_increase() {
        let mut clock = FrameClock::new();
        let a = clock.tick();
        let b = clock.tick();

        assert_eq!(a.number, 0);
        assert_eq!(b.number, 1);
        assert!(b.time >= a.time);
    }

    #[test]
    fn test_delta_is_nonnegative() {
        let mut clock = FrameClock::new();
        for _ in 0..5 {
            assert!(clock.tick().delta >= 0.0);
        }
    }
}
