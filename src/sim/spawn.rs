//! Enemy and power-up spawn scheduling
//!
//! Spawn pacing tightens as the run goes on: the difficulty factor grows by a
//! fixed step every difficulty interval and divides the base spawn interval,
//! down to a floor. Every `boss_kill_interval` kills a boss is scheduled, and
//! while it lives no ordinary enemy enters.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{EnemyKind, Entity, PowerUpKind};
use super::store::EntityStore;
use crate::tuning::{EnemyWeights, FALLBACK_MIN_SPAWN_MS, GameConfig, SpawnTuning};

/// Scheduler bookkeeping, reset at the start of every run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnState {
    /// Spawn-rate multiplier, starts at 1.0 and only grows
    pub difficulty: f64,
    /// Difficulty steps taken so far
    pub difficulty_steps: u32,
    /// Play time accumulated from tick deltas (ms)
    pub elapsed_ms: f64,
    /// Enemies killed this run
    pub kills: u32,
    /// A boss is in the arena
    pub boss_active: bool,
    /// A boss has been scheduled but not emitted yet
    pub boss_pending: bool,
    /// Game time of the last spawn (ms), `None` until the first update
    pub last_spawn_time: Option<f64>,
}

impl Default for SpawnState {
    fn default() -> Self {
        Self {
            difficulty: 1.0,
            difficulty_steps: 0,
            elapsed_ms: 0.0,
            kills: 0,
            boss_active: false,
            boss_pending: false,
            last_spawn_time: None,
        }
    }
}

/// Spawn interval for a difficulty factor
///
/// `max(base / difficulty, min)`; a non-positive or non-finite result is
/// clamped to the floor so a bad configuration never spawns unboundedly fast.
/// A floor that is itself not positive is replaced by the fallback floor.
pub fn spawn_interval(base_ms: f64, min_ms: f64, difficulty: f64) -> f64 {
    let floor = if min_ms > 0.0 && min_ms.is_finite() {
        min_ms
    } else {
        FALLBACK_MIN_SPAWN_MS
    };
    let interval = base_ms / difficulty.max(f64::MIN_POSITIVE);
    if interval.is_finite() && interval > floor {
        interval
    } else {
        floor
    }
}

/// Weighted draw over the ordinary enemy subtypes
///
/// `roll` is uniform in [0, 1). Walks the cumulative weights; any residue
/// left by weights summing below 1 falls back to Basic.
pub fn pick_enemy_kind(weights: &EnemyWeights, roll: f32) -> EnemyKind {
    let mut cumulative = 0.0;
    for (kind, weight) in weights.table() {
        cumulative += weight;
        if roll < cumulative {
            return kind;
        }
    }
    EnemyKind::Basic
}

/// Decides when and what to spawn
#[derive(Debug)]
pub struct SpawnScheduler {
    tuning: SpawnTuning,
    state: SpawnState,
    rng: Pcg32,
}

impl SpawnScheduler {
    /// Scheduler over `tuning`, clamped into a runnable range
    pub fn new(tuning: SpawnTuning, seed: u64) -> Self {
        Self {
            tuning: tuning.sanitized(),
            state: SpawnState::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Start a fresh run
    pub fn reset(&mut self, seed: u64) {
        self.state = SpawnState::default();
        self.rng = Pcg32::seed_from_u64(seed);
    }

    pub fn state(&self) -> &SpawnState {
        &self.state
    }

    pub fn difficulty(&self) -> f64 {
        self.state.difficulty
    }

    pub fn boss_active(&self) -> bool {
        self.state.boss_active
    }

    pub fn kills(&self) -> u32 {
        self.state.kills
    }

    /// Current gap between ordinary spawns (ms)
    pub fn current_spawn_interval(&self) -> f64 {
        spawn_interval(
            self.tuning.base_interval_ms,
            self.tuning.min_interval_ms,
            self.state.difficulty,
        )
    }

    /// Advance elapsed time and spawn at most one enemy
    ///
    /// Returns the subtype spawned this tick, if any.
    pub fn update(
        &mut self,
        dt: f32,
        store: &mut EntityStore,
        config: &GameConfig,
        now_ms: f64,
    ) -> Option<EnemyKind> {
        self.advance_difficulty(dt);

        let Some(last_spawn) = self.state.last_spawn_time else {
            self.state.last_spawn_time = Some(now_ms);
            if self.state.boss_pending {
                self.spawn_boss(store, config, now_ms);
                return Some(EnemyKind::Boss);
            }
            return None;
        };

        if self.state.boss_pending {
            self.spawn_boss(store, config, now_ms);
            return Some(EnemyKind::Boss);
        }

        if self.state.boss_active {
            return None;
        }

        if now_ms - last_spawn < self.current_spawn_interval() {
            return None;
        }
        let roll = self.rng.random::<f32>();
        let kind = pick_enemy_kind(&self.tuning.weights, roll);
        self.spawn_enemy(kind, store, config);
        self.state.last_spawn_time = Some(now_ms);
        Some(kind)
    }

    fn advance_difficulty(&mut self, dt: f32) {
        self.state.elapsed_ms += f64::from(dt.max(0.0)) * 1000.0;
        let steps = (self.state.elapsed_ms / self.tuning.difficulty_interval_ms).floor() as u32;
        if steps > self.state.difficulty_steps {
            self.state.difficulty_steps = steps;
            self.state.difficulty = 1.0 + f64::from(steps) * self.tuning.difficulty_increment;
            log::debug!(
                "Difficulty {:.2}, spawn interval {:.0} ms",
                self.state.difficulty,
                self.current_spawn_interval()
            );
        }
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, store: &mut EntityStore, config: &GameConfig) {
        let stats = config.enemies.stats(kind);
        let max_x = (config.arena.width - stats.width).max(0.0);
        let x = self.rng.random::<f32>() * max_x;
        let id = store.next_entity_id();
        store.add(Entity::enemy(id, kind, Vec2::new(x, -stats.height), &config.enemies));
        log::debug!("Spawned {:?} #{} at x={:.0}", kind, id, x);
    }

    fn spawn_boss(&mut self, store: &mut EntityStore, config: &GameConfig, now_ms: f64) {
        let stats = &config.enemies.boss;
        let x = (config.arena.width - stats.width) / 2.0;
        let id = store.next_entity_id();
        store.add(Entity::enemy(
            id,
            EnemyKind::Boss,
            Vec2::new(x, -stats.height),
            &config.enemies,
        ));
        self.state.boss_pending = false;
        self.state.boss_active = true;
        self.state.last_spawn_time = Some(now_ms);
        log::info!("Boss #{} entered after {} kills", id, self.state.kills);
    }

    /// Count a kill; schedules a boss on every positive multiple of the kill interval
    ///
    /// Returns true when this kill scheduled a boss.
    pub fn on_enemy_killed(&mut self) -> bool {
        self.state.kills += 1;
        let due = self.state.kills % self.tuning.boss_kill_interval == 0;
        if due && !self.state.boss_active && !self.state.boss_pending {
            self.state.boss_pending = true;
            log::info!("Boss scheduled at {} kills", self.state.kills);
            return true;
        }
        false
    }

    /// Boss died; the next kill milestone may schedule another
    pub fn on_boss_defeated(&mut self) {
        self.state.boss_active = false;
    }

    /// Bernoulli power-up drop at a destroyed enemy's centre
    pub fn try_spawn_power_up(
        &mut self,
        store: &mut EntityStore,
        config: &GameConfig,
        center: Vec2,
    ) -> Option<PowerUpKind> {
        if self.tuning.power_up_kinds.is_empty() {
            return None;
        }
        if !self.rng.random_bool(self.tuning.power_up_chance) {
            return None;
        }
        let idx = self.rng.random_range(0..self.tuning.power_up_kinds.len());
        let kind = self.tuning.power_up_kinds[idx];
        let id = store.next_entity_id();
        store.add(Entity::power_up(id, kind, center, config));
        log::debug!("Dropped {:?} power-up", kind);
        Some(kind)
    }
}
