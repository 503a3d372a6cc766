//! Fixed-timestep accumulator for the caller-owned frame loop

use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS, SIM_DT};

/// Converts variable frame times into a count of fixed simulation steps
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    accumulator: f64,
    step: f64,
    max_steps: u32,
    max_frame_time: f64,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS, MAX_FRAME_TIME)
    }
}

impl FixedTimestep {
    pub fn new(step: f64, max_steps: u32, max_frame_time: f64) -> Self {
        Self {
            accumulator: 0.0,
            step,
            max_steps,
            max_frame_time,
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Feed one frame's elapsed time; returns how many steps to run now.
    ///
    /// Frame time is clamped first. Backlog beyond `max_steps` is dropped
    /// rather than carried into the next frame.
    pub fn advance(&mut self, frame_dt: f64) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, self.max_frame_time);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps && self.accumulator >= self.step {
            self.accumulator %= self.step;
        }
        steps
    }

    /// Fraction of a step left over, for render interpolation
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.step
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_frames() {
        let mut clock = FixedTimestep::default();
        let mut total = 0;
        for _ in 0..60 {
            total += clock.advance(1.0 / 60.0 + 1e-9);
        }
        assert_eq!(total, 60);
    }

    #[test]
    fn test_accumulates_short_frames() {
        let mut clock = FixedTimestep::new(0.1, 4, 0.25);
        assert_eq!(clock.advance(0.06), 0);
        assert_eq!(clock.advance(0.06), 1);
        assert!((clock.alpha() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_stall_is_clamped_and_capped() {
        let mut clock = FixedTimestep::default();
        // A 5 second stall counts as 0.25s = 15 steps, capped to 4
        assert_eq!(clock.advance(5.0), MAX_SUBSTEPS);
        // Backlog is dropped, so the next quiet frame runs nothing extra
        assert_eq!(clock.advance(0.0), 0);
        assert!(clock.alpha() < 1.0);
    }

    #[test]
    fn test_negative_frame_time_ignored() {
        let mut clock = FixedTimestep::default();
        assert_eq!(clock.advance(-1.0), 0);
        clock.reset();
        assert_eq!(clock.alpha(), 0.0);
    }
}
