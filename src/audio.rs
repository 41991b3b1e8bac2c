//! Sound cues emitted by the simulation
//!
//! The kernel never plays audio itself. It names what happened and hands the
//! cue to an [`AudioSink`]; delivery is fire-and-forget.

use std::cell::RefCell;
use std::rc::Rc;

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Player fired a volley
    ShotFired,
    /// Enemy took damage but survived
    EnemyHit,
    /// Enemy destroyed
    EnemyDestroyed,
    /// Player took damage
    PlayerHit,
    /// Power-up collected
    PowerUpCollected,
    /// Boss entered the arena
    BossSpawned,
    /// Boss destroyed
    BossDefeated,
    /// Run ended
    GameOver,
    /// Final score beat the stored high score
    NewHighScore,
}

impl AudioCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCue::ShotFired => "shot fired",
            AudioCue::EnemyHit => "enemy hit",
            AudioCue::EnemyDestroyed => "enemy destroyed",
            AudioCue::PlayerHit => "player hit",
            AudioCue::PowerUpCollected => "power-up collected",
            AudioCue::BossSpawned => "boss spawned",
            AudioCue::BossDefeated => "boss defeated",
            AudioCue::GameOver => "game over",
            AudioCue::NewHighScore => "new high score",
        }
    }
}

/// Receives sound cues from the simulation
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Discards every cue
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Records cues into a shared log
///
/// Clones share the same log, so a handle kept outside the simulation can
/// inspect what was played after the recorder was boxed into the game.
#[derive(Debug, Clone, Default)]
pub struct CueRecorder {
    cues: Rc<RefCell<Vec<AudioCue>>>,
}

impl CueRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All cues recorded so far
    pub fn cues(&self) -> Vec<AudioCue> {
        self.cues.borrow().clone()
    }

    /// Number of times a cue was played
    pub fn count(&self, cue: AudioCue) -> usize {
        self.cues.borrow().iter().filter(|c| **c == cue).count()
    }
}

impl AudioSink for CueRecorder {
    fn play(&mut self, cue: AudioCue) {
        log::trace!("cue: {}", cue.as_str());
        self.cues.borrow_mut().push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_shares_log() {
        let recorder = CueRecorder::new();
        let mut sink: Box<dyn AudioSink> = Box::new(recorder.clone());
        sink.play(AudioCue::ShotFired);
        sink.play(AudioCue::ShotFired);
        sink.play(AudioCue::GameOver);

        assert_eq!(recorder.count(AudioCue::ShotFired), 2);
        assert_eq!(recorder.cues().last(), Some(&AudioCue::GameOver));
    }
}
