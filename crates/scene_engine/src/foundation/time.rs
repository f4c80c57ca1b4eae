//! Frame timing utilities

use std::time::Instant;

/// Frame clock feeding delta time into the driver loop
///
/// `tick` measures wall time between calls. `tick_fixed` advances by a given
/// step instead, which keeps headless runs and tests deterministic.
#[derive(Debug)]
pub struct FrameClock {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new clock starting now
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance by the wall time elapsed since the previous tick
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Advance by a fixed step in seconds
    pub fn tick_fixed(&mut self, step: f32) -> f32 {
        self.last_frame = Instant::now();
        self.advance(step.max(0.0))
    }

    fn advance(&mut self, delta: f32) -> f32 {
        self.delta_time = delta;
        self.total_time += delta;
        self.frame_count += 1;
        delta
    }

    /// Time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Total elapsed time since the clock was created
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second since creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_ticks_accumulate() {
        let mut clock = FrameClock::new();
        clock.tick_fixed(0.25);
        clock.tick_fixed(0.25);

        assert_eq!(clock.frame_count(), 2);
        assert!((clock.total_time() - 0.5).abs() < f32::EPSILON);
        assert!((clock.average_fps() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_negative_step_is_clamped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick_fixed(-1.0), 0.0);
        assert_eq!(clock.total_time(), 0.0);
    }
}
