//! Nova Strike entry point
//!
//! On native targets this runs a headless autopilot game and prints the final
//! frame as JSON. Browser hosts drive `nova_strike::Game` directly.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use nova_strike::audio::{AudioCue, AudioSink};
    use nova_strike::input::{Action, ActionState};
    use nova_strike::persistence::JsonFileStore;
    use nova_strike::renderer::RenderView;
    use nova_strike::sim::{FixedStep, Game, Phase};
    use nova_strike::tuning::GameConfig;

    /// Longest run the autopilot plays before giving up (ms of game time)
    const MAX_RUN_MS: f64 = 5.0 * 60.0 * 1000.0;
    /// Simulated host frame time; deliberately off the sim rate
    const FRAME_DT: f32 = 1.0 / 50.0;

    /// Sends cues to the log
    struct LogAudio;

    impl AudioSink for LogAudio {
        fn play(&mut self, cue: AudioCue) {
            log::debug!("cue {}", cue.as_str());
        }
    }

    fn load_config() -> GameConfig {
        let Some(path) = std::env::args().nth(1) else {
            return GameConfig::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => GameConfig::from_json(&json),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path, e);
                GameConfig::default()
            }
        }
    }

    /// Track the closest enemy horizontally and keep firing
    fn autopilot(view: &RenderView<'_>) -> ActionState {
        let mut input = ActionState::new().with(Action::Fire);
        let Some(player) = view.player else {
            return input;
        };
        let px = player.center().x;
        let target = view
            .enemies
            .iter()
            .map(|e| e.center().x)
            .min_by(|a, b| (a - px).abs().total_cmp(&(b - px).abs()));
        if let Some(tx) = target {
            if tx < px - 4.0 {
                input.set(Action::MoveLeft, true);
            } else if tx > px + 4.0 {
                input.set(Action::MoveRight, true);
            }
        }
        input
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let storage = JsonFileStore::new(std::env::temp_dir().join("nova_strike_scores.json"));
        log::info!("High scores at {}", storage.path().display());

        let seed: u64 = rand::random();
        let mut game = Game::new(load_config(), Box::new(storage), Box::new(LogAudio), seed);
        game.start_game();

        let mut clock = FixedStep::new();
        while game.phase() == Phase::Playing && clock.game_time_ms() < MAX_RUN_MS {
            let input = autopilot(&game.view());
            clock.advance(FRAME_DT, |dt, now_ms| game.tick(dt, now_ms, &input));
        }

        let view = game.view();
        match serde_json::to_string_pretty(&view) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Could not serialize final frame: {}", e),
        }
        log::info!(
            "Finished in {:?} after {:.1}s of game time",
            game.phase(),
            clock.game_time_ms() / 1000.0
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}
