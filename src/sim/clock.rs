//! Fixed-timestep accumulator
//!
//! Hosts hand in variable frame times; the simulation only ever sees
//! `SIM_DT` steps and a game clock built from them.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedStep {
    accumulator: f32,
    /// Game time built from consumed steps (ms)
    game_time_ms: f64,
    steps: u64,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame's elapsed time and run `step` once per due substep
    ///
    /// `step` receives the fixed dt and the game time at the end of that
    /// step. Returns the number of substeps run.
    pub fn advance(&mut self, frame_dt: f32, mut step: impl FnMut(f32, f64)) -> u32 {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            self.steps += 1;
            self.game_time_ms += f64::from(SIM_DT) * 1000.0;
            step(SIM_DT, self.game_time_ms);
            substeps += 1;
        }
        substeps
    }

    pub fn game_time_ms(&self) -> f64 {
        self.game_time_ms
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_frames_accumulate() {
        let mut clock = FixedStep::new();
        let mut calls = 0;
        assert_eq!(clock.advance(SIM_DT * 0.5, |_, _| calls += 1), 0);
        assert_eq!(clock.advance(SIM_DT * 0.6, |_, _| calls += 1), 1);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_long_frame_clamped() {
        let mut clock = FixedStep::new();
        let ran = clock.advance(5.0, |dt, _| assert_eq!(dt, SIM_DT));
        // 0.1 s at 60 Hz, give or take float rounding
        assert!((5..=6).contains(&ran));
        assert_eq!(clock.steps(), u64::from(ran));
    }

    #[test]
    fn test_game_time_tracks_steps() {
        let mut clock = FixedStep::new();
        let mut last = 0.0;
        for _ in 0..60 {
            clock.advance(SIM_DT, |_, now| last = now);
        }
        let expected = clock.steps() as f64 * f64::from(SIM_DT) * 1000.0;
        assert!((clock.game_time_ms() - expected).abs() < 1e-6);
        assert_eq!(last, clock.game_time_ms());
    }

    #[test]
    fn test_bad_frame_times_ignored() {
        let mut clock = FixedStep::new();
        assert_eq!(clock.advance(f32::NAN, |_, _| {}), 0);
        assert_eq!(clock.advance(-1.0, |_, _| {}), 0);
        assert_eq!(clock.advance(f32::INFINITY, |_, _| {}), 0);
        assert_eq!(clock.game_time_ms(), 0.0);
    }
}
