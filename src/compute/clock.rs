//! Fixed-timestep update clock.
//!
//! Frames arrive at a variable rate while the simulation advances in fixed
//! ticks. Each frame adds its (clamped) duration to an accumulator which is
//! then drained in whole ticks; the remainder is the interpolation progress
//! handed to rendering.

use crate::schema::KoiConfig;

/// Result of advancing the clock by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTicks {
    /// Number of simulation ticks to run this frame.
    pub ticks: u32,
    /// Interpolation progress in `[0, 1]` between the last two ticks.
    pub progress: f32,
}

/// Accumulates frame time and converts it into ticks.
#[derive(Debug, Clone)]
pub struct FrameClock {
    update_rate: f32,
    frame_time_max: f32,
    max_ticks: u32,
    accumulator: f32,
}

impl FrameClock {
    /// Create a clock primed with one tick worth of time, so the first frame
    /// renders a fully advanced state.
    pub fn new(update_rate: f32, frame_time_max: f32, max_ticks: u32) -> Self {
        Self {
            update_rate,
            frame_time_max,
            max_ticks,
            accumulator: update_rate,
        }
    }

    pub fn from_config(config: &KoiConfig) -> Self {
        Self::new(
            config.update_rate,
            config.frame_time_max,
            config.max_ticks_per_frame,
        )
    }

    /// Seconds per tick.
    #[inline]
    pub fn update_rate(&self) -> f32 {
        self.update_rate
    }

    /// Add a frame of `delta` seconds.
    ///
    /// Deltas are clamped to `[0, frame_time_max]`. Time that would need more
    /// than `max_ticks` ticks is dropped.
    pub fn advance(&mut self, delta: f32) -> FrameTicks {
        let delta = if delta.is_finite() { delta } else { 0.0 };
        self.accumulator += delta.clamp(0.0, self.frame_time_max);

        let mut ticks = 0;
        while self.accumulator > self.update_rate && ticks < self.max_ticks {
            self.accumulator -= self.update_rate;
            ticks += 1;
        }

        if self.accumulator > self.update_rate {
            log::warn!(
                "Dropping {:.3}s of simulation time after {} ticks",
                self.accumulator - self.update_rate,
                ticks
            );
            self.accumulator = self.update_rate;
        }

        FrameTicks {
            ticks,
            progress: (self.accumulator / self.update_rate).clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primed_start() {
        let mut clock = FrameClock::new(0.1, 1.0, 10);
        let frame = clock.advance(0.0);
        assert_eq!(frame.ticks, 0);
        assert!((frame.progress - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_drains_whole_ticks() {
        let mut clock = FrameClock::new(0.1, 1.0, 10);
        let frame = clock.advance(0.25);
        assert_eq!(frame.ticks, 3);
        assert!((frame.progress - 0.5).abs() < 1e-4);

        let total: u32 = (0..100).map(|_| clock.advance(0.1).ticks).sum();
        assert!((99..=101).contains(&total));
    }

    #[test]
    fn test_caps_catch_up() {
        let mut clock = FrameClock::new(1.0 / 14.0, 1.0, 5);

        // A long pause is clamped to frame_time_max, then to the tick cap
        let frame = clock.advance(3600.0);
        assert_eq!(frame.ticks, 5);
        assert!((frame.progress - 1.0).abs() < 1e-6);

        let frame = clock.advance(0.0);
        assert_eq!(frame.ticks, 0);
    }

    #[test]
    fn test_ignores_invalid_deltas() {
        let mut clock = FrameClock::from_config(&KoiConfig::default());
        assert_eq!(clock.advance(-5.0).ticks, 0);
        assert_eq!(clock.advance(f32::NAN).ticks, 0);
        assert_eq!(clock.advance(f32::INFINITY).ticks, 0);
    }
}
