//! Fixed-timestep accumulator.

use bevy::prelude::*;

use crate::core::{MAX_FRAME_DELTA_MS, TIMESTEP_MS};

/// Slack for float drift when comparing the accumulator with the timestep.
const EPSILON_MS: f64 = 1e-6;

/// Turns variable frame deltas into whole simulation ticks.
#[derive(Resource, Debug, Clone)]
pub struct GameLoop {
    pub timestep_ms: f64,
    accumulator_ms: f64,
    alpha: f32,
    running: bool,
}

impl Default for GameLoop {
    fn default() -> Self {
        Self {
            timestep_ms: TIMESTEP_MS,
            accumulator_ms: 0.0,
            alpha: 0.0,
            running: false,
        }
    }
}

impl GameLoop {
    pub fn start(&mut self) {
        self.accumulator_ms = 0.0;
        self.alpha = 0.0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Leftover fraction of a tick. Only for render interpolation.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator_ms
    }

    /// Add a frame delta and return how many ticks are due.
    /// Deltas are clamped to `MAX_FRAME_DELTA_MS`.
    pub fn accumulate(&mut self, delta_ms: f64) -> u32 {
        let delta_ms = if delta_ms.is_finite() {
            delta_ms.clamp(0.0, MAX_FRAME_DELTA_MS)
        } else {
            0.0
        };
        self.accumulator_ms += delta_ms;

        let mut ticks = 0;
        while self.accumulator_ms + EPSILON_MS >= self.timestep_ms {
            self.accumulator_ms = (self.accumulator_ms - self.timestep_ms).max(0.0);
            ticks += 1;
        }
        self.alpha = (self.accumulator_ms / self.timestep_ms) as f32;
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_tick_per_60hz_frame() {
        let mut game_loop = GameLoop::default();
        game_loop.start();
        for _ in 0..120 {
            assert_eq!(game_loop.accumulate(TIMESTEP_MS), 1);
        }
        assert!(game_loop.alpha() < 1e-3);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut game_loop = GameLoop::default();
        game_loop.start();
        // a one second hitch only counts as 33.3 ms
        assert_eq!(game_loop.accumulate(1000.0), 2);
        assert_eq!(game_loop.accumulate(f64::NAN), 0);
        assert_eq!(game_loop.accumulate(-5.0), 0);
    }

    #[test]
    fn partial_frames_carry_over() {
        let mut game_loop = GameLoop::default();
        game_loop.start();
        assert_eq!(game_loop.accumulate(10.0), 0);
        assert!((game_loop.alpha() - 0.6).abs() < 1e-4);
        assert_eq!(game_loop.accumulate(10.0), 1);
        assert!((game_loop.accumulator_ms() - (20.0 - TIMESTEP_MS)).abs() < 1e-9);
    }
}
