//! Nova Strike - a vertical-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation kernel (entities, spawning, scoring, collisions, phases)
//! - `tuning`: Data-driven game balance
//! - `persistence`: Scalar key-value storage for the high score
//! - `renderer`: Read-only frame view handed to the drawing layer
//! - `audio`: Named sound cues emitted by the simulation
//! - `input`: Level-triggered action polling

pub mod audio;
pub mod input;
pub mod persistence;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use audio::{AudioCue, AudioSink};
pub use input::{Action, ActionState, InputSource};
pub use persistence::{KeyValueStore, StorageError};
pub use sim::{Game, Phase};
pub use tuning::GameConfig;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame time fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Storage key for the persisted high score
    pub const HIGH_SCORE_KEY: &str = "nova_strike_high_score";
}
