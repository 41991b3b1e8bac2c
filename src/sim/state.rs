//! Game phases and the top-level game object
//!
//! `Game` owns the simulation context, the collision table and the high-score
//! storage. Each phase maps to a strategy (update + render); transitions are
//! explicit calls that either apply completely or are refused.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::CollisionDetector;
use super::context::SimContext;
use super::entity::Entity;
use super::handlers::register_default_handlers;
use super::score::{ScoreState, ScoreTracker};
use super::spawn::SpawnState;
use super::store::EntityStore;
use super::tick::{TickTime, tick};
use crate::audio::{AudioCue, AudioSink};
use crate::input::{Action, InputSource};
use crate::persistence::KeyValueStore;
use crate::renderer::{RenderView, Renderer};
use crate::tuning::GameConfig;

/// Gap between the player ship and the bottom edge at spawn
const PLAYER_SPAWN_MARGIN: f32 = 20.0;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Title screen, nothing simulated
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen frame with overlay
    Paused,
    /// Run ended, final score shown
    GameOver,
}

impl Phase {
    fn strategy(self) -> &'static PhaseStrategy {
        &STRATEGIES[self as usize]
    }
}

/// Per-phase behaviour
struct PhaseStrategy {
    update: fn(&mut Game, &dyn InputSource, TickTime),
    render: fn(&Game, &mut dyn Renderer),
}

/// Indexed by `Phase as usize`
const STRATEGIES: [PhaseStrategy; 4] = [
    PhaseStrategy {
        update: idle_update,
        render: menu_render,
    },
    PhaseStrategy {
        update: playing_update,
        render: world_render,
    },
    PhaseStrategy {
        update: idle_update,
        render: world_render,
    },
    PhaseStrategy {
        update: idle_update,
        render: world_render,
    },
];

fn idle_update(_game: &mut Game, _input: &dyn InputSource, _time: TickTime) {}

fn playing_update(game: &mut Game, input: &dyn InputSource, time: TickTime) {
    tick(&mut game.ctx, &mut game.collisions, input, time);
    if game.player_destroyed() {
        game.end_game();
    }
}

fn menu_render(game: &Game, renderer: &mut dyn Renderer) {
    renderer.draw_hud(game.ctx.score.state(), game.ctx.spawner.state());
    renderer.draw_overlay(Phase::Menu);
}

fn world_render(game: &Game, renderer: &mut dyn Renderer) {
    game.ctx.store.render(renderer);
    renderer.draw_hud(game.ctx.score.state(), game.ctx.spawner.state());
    if game.phase != Phase::Playing {
        renderer.draw_overlay(game.phase);
    }
}

/// The whole game: phase machine over a simulation context
pub struct Game {
    phase: Phase,
    ctx: SimContext,
    collisions: CollisionDetector,
    storage: Box<dyn KeyValueStore>,
    /// Session seed; each run derives its own from this
    seed: u64,
    games_played: u32,
    /// Pause action level from the previous tick, for edge detection
    pause_held: bool,
}

impl Game {
    /// Build a game in the Menu phase, loading the stored high score
    pub fn new(
        config: GameConfig,
        storage: Box<dyn KeyValueStore>,
        audio: Box<dyn AudioSink>,
        seed: u64,
    ) -> Self {
        let config = config.sanitized();
        let score = ScoreTracker::load(config.score.clone(), storage.as_ref());
        let ctx = SimContext::new(config, score, audio, seed);

        let mut collisions = CollisionDetector::new();
        register_default_handlers(&mut collisions);

        Self {
            phase: Phase::Menu,
            ctx,
            collisions,
            storage,
            seed,
            games_played: 0,
            pause_held: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.ctx.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.ctx.store
    }

    pub fn score(&self) -> &ScoreState {
        self.ctx.score.state()
    }

    pub fn spawn_state(&self) -> &SpawnState {
        self.ctx.spawner.state()
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    /// Collision table, for hosts adding their own handlers
    pub fn collisions_mut(&mut self) -> &mut CollisionDetector {
        &mut self.collisions
    }

    /// Menu/GameOver → Playing with fresh per-run state
    pub fn start_game(&mut self) -> bool {
        if !matches!(self.phase, Phase::Menu | Phase::GameOver) {
            return self.refuse("start_game");
        }

        self.games_played += 1;
        let run_seed = self
            .seed
            .wrapping_add(u64::from(self.games_played).wrapping_mul(0x9E37_79B9_7F4A_7C15));

        self.reset_run(run_seed);
        self.spawn_player();
        self.phase = Phase::Playing;

        log::info!("Game {} started (seed {:#x})", self.games_played, run_seed);
        true
    }

    /// Playing → Paused
    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return self.refuse("pause");
        }
        self.phase = Phase::Paused;
        log::debug!("Paused");
        true
    }

    /// Paused → Playing, nothing reset
    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return self.refuse("resume");
        }
        self.phase = Phase::Playing;
        log::debug!("Resumed");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Playing => self.pause(),
            Phase::Paused => self.resume(),
            _ => self.refuse("toggle_pause"),
        }
    }

    /// GameOver/Paused → Menu, dropping the current world and run stats
    pub fn return_to_menu(&mut self) -> bool {
        if !matches!(self.phase, Phase::GameOver | Phase::Paused) {
            return self.refuse("return_to_menu");
        }
        self.reset_run(self.seed);
        self.phase = Phase::Menu;
        log::info!("Returned to menu");
        true
    }

    /// Advance one tick
    ///
    /// `dt` is in seconds, `game_time_ms` is the host's accumulated game
    /// clock. Input is polled once; a fresh Pause press toggles pause before
    /// the phase update runs.
    pub fn tick(&mut self, dt: f32, game_time_ms: f64, input: &dyn InputSource) {
        let pause_pressed = input.is_action_active(Action::Pause);
        if pause_pressed && !self.pause_held {
            self.toggle_pause();
        }
        self.pause_held = pause_pressed;

        let time = TickTime {
            dt,
            now_ms: game_time_ms,
        };
        (self.phase.strategy().update)(self, input, time);
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        (self.phase.strategy().render)(self, renderer);
    }

    /// Read-only snapshot of the current frame
    pub fn view(&self) -> RenderView<'_> {
        RenderView::capture(
            self.phase,
            &self.ctx.store,
            self.ctx.score.state(),
            self.ctx.spawner.state(),
        )
    }

    /// Playing → GameOver: bank the final bonus and persist a beaten record
    fn end_game(&mut self) {
        let beaten = self.ctx.score.apply_final_bonus(self.storage.as_mut());
        self.phase = Phase::GameOver;
        self.ctx.play(AudioCue::GameOver);
        if beaten {
            self.ctx.play(AudioCue::NewHighScore);
        }

        let score = self.ctx.score.state();
        log::info!(
            "Game over: score {}, accuracy {}%, {} destroyed, high score {}",
            score.score,
            self.ctx.score.accuracy(),
            score.enemies_destroyed,
            score.high_score
        );
    }

    /// Per-run state back to a blank slate; the high score survives
    fn reset_run(&mut self, run_seed: u64) {
        self.ctx.store.clear();
        self.ctx.spawner.reset(run_seed);
        self.ctx.score.reset();
        self.pause_held = false;
    }

    fn player_destroyed(&self) -> bool {
        self.ctx
            .store
            .player()
            .and_then(Entity::as_player)
            .is_none_or(|p| p.health <= 0)
    }

    fn spawn_player(&mut self) {
        let tuning = &self.ctx.config.player;
        let pos = Vec2::new(
            (self.ctx.arena.width - tuning.width) / 2.0,
            self.ctx.arena.height - tuning.height - PLAYER_SPAWN_MARGIN,
        );
        let player = Entity::player(0, pos, &self.ctx.config);
        self.ctx.store.spawn(player);
    }

    fn refuse(&self, transition: &str) -> bool {
        log::debug!("Ignored {} in {:?}", transition, self.phase);
        false
    }
}
