//! Simulation time, counted in fixed ticks.

use bevy::prelude::*;

/// Length of one logic tick (60 Hz).
pub const TIMESTEP_MS: f64 = 1000.0 / 60.0;

/// Largest frame delta fed into the accumulator (spiral-of-death guard).
pub const MAX_FRAME_DELTA_MS: f64 = 1000.0 / 30.0;

/// Time as seen by the simulation. Only ever advanced by whole ticks.
#[derive(Resource, Debug, Clone)]
pub struct SimClock {
    pub tick: u64,
    pub elapsed_ms: f64,
    pub timestep_ms: f64,
}

impl Default for SimClock {
    fn default() -> Self {
        Self {
            tick: 0,
            elapsed_ms: 0.0,
            timestep_ms: TIMESTEP_MS,
        }
    }
}

impl SimClock {
    /// Tick length in seconds, for kinematics.
    pub fn dt(&self) -> f32 {
        (self.timestep_ms / 1000.0) as f32
    }

    pub fn now_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_ms += self.timestep_ms;
    }

    pub fn reset(&mut self) {
        self.tick = 0;
        self.elapsed_ms = 0.0;
    }
}

/// First system of every tick.
pub fn advance_clock(mut clock: ResMut<SimClock>) {
    clock.advance();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancing_accumulates_whole_ticks() {
        let mut clock = SimClock::default();
        for _ in 0..60 {
            clock.advance();
        }
        assert_eq!(clock.tick, 60);
        assert!((clock.elapsed_ms - 1000.0).abs() < 1e-6);

        clock.reset();
        assert_eq!(clock.tick, 0);
        assert_eq!(clock.elapsed_ms, 0.0);
    }
}
