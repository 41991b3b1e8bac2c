//! Shared simulation context
//!
//! Everything a tick or a collision handler may touch, owned in one place and
//! passed explicitly.

use super::entity::Arena;
use super::score::ScoreTracker;
use super::spawn::SpawnScheduler;
use super::store::EntityStore;
use crate::audio::{AudioCue, AudioSink};
use crate::tuning::GameConfig;

pub struct SimContext {
    pub config: GameConfig,
    pub arena: Arena,
    pub store: EntityStore,
    pub spawner: SpawnScheduler,
    pub score: ScoreTracker,
    pub audio: Box<dyn AudioSink>,
    /// Game time of the tick being processed (ms)
    pub now_ms: f64,
}

impl SimContext {
    pub fn new(
        config: GameConfig,
        score: ScoreTracker,
        audio: Box<dyn AudioSink>,
        seed: u64,
    ) -> Self {
        Self {
            arena: Arena::from_config(&config),
            spawner: SpawnScheduler::new(config.spawn.clone(), seed),
            store: EntityStore::new(),
            score,
            audio,
            now_ms: 0.0,
            config,
        }
    }

    pub fn play(&mut self, cue: AudioCue) {
        self.audio.play(cue);
    }

    #[cfg(test)]
    pub(crate) fn for_tests(config: GameConfig) -> Self {
        let score = ScoreTracker::new(config.score.clone());
        Self::new(config, score, Box::new(crate::audio::NullAudio), 1)
    }
}
