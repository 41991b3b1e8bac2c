//! Score, combo and accuracy bookkeeping
//!
//! Kills landing within the combo window of each other build a combo; from
//! the threshold on, awards are multiplied. At game over an accuracy bonus
//! may scale the final score. Only the high score outlives a run, through a
//! [`KeyValueStore`]; storage failures are logged and otherwise ignored.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;
use crate::tuning::ScoreTuning;

/// Per-run score state plus the persisted high score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u64,
    pub high_score: u64,
    pub total_shots: u32,
    pub total_hits: u32,
    /// Consecutive kills inside the combo window
    pub combo: u32,
    /// Game time of the last kill (ms)
    pub last_kill_time: Option<f64>,
    pub enemies_destroyed: u32,
}

/// Parse a stored high score
///
/// Missing, non-numeric, negative or non-finite values read as 0. Fractional
/// values are floored.
pub fn parse_high_score(raw: Option<&str>) -> u64 {
    let Some(raw) = raw.map(str::trim) else {
        return 0;
    };
    if let Ok(v) = raw.parse::<u64>() {
        return v;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v.floor() as u64,
        _ => 0,
    }
}

/// `value * pct / 100`, floored and saturating at `u64::MAX`
fn scale_pct(value: u64, pct: u64) -> u64 {
    let scaled = u128::from(value) * u128::from(pct) / 100;
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Authoritative score keeper
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    tuning: ScoreTuning,
    state: ScoreState,
}

impl ScoreTracker {
    /// Tracker with no stored high score
    pub fn new(tuning: ScoreTuning) -> Self {
        Self {
            tuning,
            state: ScoreState::default(),
        }
    }

    /// Tracker seeded with the high score found in `storage`
    pub fn load(tuning: ScoreTuning, storage: &dyn KeyValueStore) -> Self {
        let mut tracker = Self::new(tuning);
        tracker.state.high_score = match storage.get_string(&tracker.tuning.high_score_key) {
            Ok(raw) => parse_high_score(raw.as_deref()),
            Err(e) => {
                log::warn!("Could not read high score, starting at 0: {}", e);
                0
            }
        };
        log::info!("High score loaded: {}", tracker.state.high_score);
        tracker
    }

    /// Clear per-run fields, keeping the high score
    pub fn reset(&mut self) {
        self.state = ScoreState {
            high_score: self.state.high_score,
            ..ScoreState::default()
        };
    }

    pub fn state(&self) -> &ScoreState {
        &self.state
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn high_score(&self) -> u64 {
        self.state.high_score
    }

    pub fn combo(&self) -> u32 {
        self.state.combo
    }

    /// Credit points, returning what was actually awarded
    ///
    /// A timestamp marks the award as a kill and advances the combo window.
    pub fn add_score(&mut self, points: u64, timestamp_ms: Option<f64>) -> u64 {
        let mut awarded = points;

        if let Some(now) = timestamp_ms {
            let within_window = self
                .state
                .last_kill_time
                .is_some_and(|last| now - last <= self.tuning.combo_timeout_ms);
            self.state.combo = if within_window {
                self.state.combo.saturating_add(1)
            } else {
                1
            };
            self.state.last_kill_time = Some(now);

            if self.state.combo >= self.tuning.combo_threshold {
                awarded = scale_pct(points, self.tuning.combo_multiplier_pct);
            }
        }

        self.state.score = self.state.score.saturating_add(awarded);
        awarded
    }

    pub fn record_shots(&mut self, n: u32) {
        self.state.total_shots = self.state.total_shots.saturating_add(n);
    }

    pub fn record_hit(&mut self) {
        self.state.total_hits = self.state.total_hits.saturating_add(1);
    }

    pub fn record_enemy_destroyed(&mut self) {
        self.state.enemies_destroyed = self.state.enemies_destroyed.saturating_add(1);
    }

    /// Hit percentage, rounded, 0 before the first shot
    pub fn accuracy(&self) -> u32 {
        if self.state.total_shots == 0 {
            return 0;
        }
        let pct = f64::from(self.state.total_hits) / f64::from(self.state.total_shots) * 100.0;
        (pct.round() as u32).min(100)
    }

    /// Score after the accuracy bonus
    pub fn final_score(&self) -> u64 {
        if self.accuracy() > self.tuning.accuracy_bonus_threshold {
            scale_pct(self.state.score, self.tuning.accuracy_bonus_pct)
        } else {
            self.state.score
        }
    }

    /// Commit the final score and persist a beaten high score
    ///
    /// Returns true when the high score was beaten.
    pub fn apply_final_bonus(&mut self, storage: &mut dyn KeyValueStore) -> bool {
        self.state.score = self.final_score();
        if self.state.score <= self.state.high_score {
            return false;
        }

        self.state.high_score = self.state.score;
        let value = self.state.high_score.to_string();
        if let Err(e) = storage.set_string(&self.tuning.high_score_key, &value) {
            log::warn!("Could not save high score {}: {}", value, e);
        } else {
            log::info!("New high score saved: {}", value);
        }
        true
    }
}
