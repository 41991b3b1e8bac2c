//! Data-driven game balance
//!
//! Every section defaults field-by-field, so a partial JSON document only
//! overrides what it names. Values are clamped by [`GameConfig::sanitized`]
//! before the simulation sees them.

use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, HIGH_SCORE_KEY};
use crate::sim::entity::{EnemyKind, PowerUpKind};

/// Fallback spawn floor when the configured one is unusable (ms)
pub const FALLBACK_MIN_SPAWN_MS: f64 = 400.0;

/// Play field size
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

/// Player ship balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Movement speed (pixels/s)
    pub speed: f32,
    pub max_health: i32,
    /// Seconds between shots
    pub fire_cooldown: f32,
    pub bullet_speed: f32,
    pub bullet_damage: i32,
    /// Spread between side bullets at weapon level 3 (pixels/s of horizontal drift)
    pub spread_speed: f32,
    pub max_weapon_level: u8,
    /// Grace period after taking a hit (seconds)
    pub invulnerability: f32,
    /// Damage taken when ramming an enemy
    pub contact_damage: i32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 40.0,
            speed: 300.0,
            max_health: 100,
            fire_cooldown: 0.2,
            bullet_speed: 520.0,
            bullet_damage: 1,
            spread_speed: 120.0,
            max_weapon_level: 3,
            invulnerability: 1.0,
            contact_damage: 20,
        }
    }
}

/// Per-subtype enemy stats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyStats {
    pub width: f32,
    pub height: f32,
    pub health: i32,
    /// Descent speed (pixels/s)
    pub speed: f32,
    pub points: u64,
    /// Seconds between shots, 0 = never fires
    pub fire_interval: f32,
    pub shot_speed: f32,
    pub shot_damage: i32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 32.0,
            health: 1,
            speed: 100.0,
            points: 10,
            fire_interval: 0.0,
            shot_speed: 250.0,
            shot_damage: 10,
        }
    }
}

/// Stats for every enemy subtype
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub basic: EnemyStats,
    pub shooter: EnemyStats,
    pub zigzag: EnemyStats,
    pub boss: EnemyStats,
    /// Zigzag sway amplitude (pixels/s of horizontal speed)
    pub zigzag_sway: f32,
    /// Zigzag sway frequency (radians/s)
    pub zigzag_frequency: f32,
    /// Boss stops descending at this y
    pub boss_hover_y: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            basic: EnemyStats::default(),
            shooter: EnemyStats {
                health: 2,
                speed: 70.0,
                points: 20,
                fire_interval: 1.5,
                ..EnemyStats::default()
            },
            zigzag: EnemyStats {
                speed: 120.0,
                points: 15,
                ..EnemyStats::default()
            },
            boss: EnemyStats {
                width: 120.0,
                height: 80.0,
                health: 50,
                speed: 40.0,
                points: 500,
                fire_interval: 0.6,
                shot_speed: 300.0,
                shot_damage: 15,
            },
            zigzag_sway: 150.0,
            zigzag_frequency: 3.0,
            boss_hover_y: 60.0,
        }
    }
}

impl EnemyTuning {
    pub fn stats(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::Basic => &self.basic,
            EnemyKind::Shooter => &self.shooter,
            EnemyKind::Zigzag => &self.zigzag,
            EnemyKind::Boss => &self.boss,
        }
    }
}

/// Relative odds of each ordinary enemy subtype
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyWeights {
    pub basic: f32,
    pub shooter: f32,
    pub zigzag: f32,
}

impl Default for EnemyWeights {
    fn default() -> Self {
        Self {
            basic: 0.60,
            shooter: 0.25,
            zigzag: 0.15,
        }
    }
}

impl EnemyWeights {
    /// Weighted table in draw order
    pub fn table(&self) -> [(EnemyKind, f32); 3] {
        [
            (EnemyKind::Basic, self.basic),
            (EnemyKind::Shooter, self.shooter),
            (EnemyKind::Zigzag, self.zigzag),
        ]
    }
}

/// Spawn pacing and difficulty curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Spawn interval at difficulty 1.0 (ms)
    pub base_interval_ms: f64,
    /// Spawn interval floor (ms)
    pub min_interval_ms: f64,
    /// Added to the difficulty factor every `difficulty_interval_ms`
    pub difficulty_increment: f64,
    pub difficulty_interval_ms: f64,
    /// A boss is scheduled every this many kills
    pub boss_kill_interval: u32,
    /// Chance that a destroyed enemy drops a power-up
    pub power_up_chance: f64,
    pub power_up_kinds: Vec<PowerUpKind>,
    pub weights: EnemyWeights,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_interval_ms: 1500.0,
            min_interval_ms: FALLBACK_MIN_SPAWN_MS,
            difficulty_increment: 0.1,
            difficulty_interval_ms: 30_000.0,
            boss_kill_interval: 50,
            power_up_chance: 0.1,
            power_up_kinds: vec![
                PowerUpKind::WeaponUpgrade,
                PowerUpKind::Health,
                PowerUpKind::Shield,
            ],
            weights: EnemyWeights::default(),
        }
    }
}

impl SpawnTuning {
    /// Clamp pacing values so the scheduler never panics or spawns every tick
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.min_interval_ms > 0.0 && self.min_interval_ms.is_finite()) {
            log::warn!(
                "Spawn floor {} ms is not positive, using {} ms",
                self.min_interval_ms,
                FALLBACK_MIN_SPAWN_MS
            );
            self.min_interval_ms = FALLBACK_MIN_SPAWN_MS;
        }
        if !self.base_interval_ms.is_finite() {
            self.base_interval_ms = self.min_interval_ms;
        }
        if !(self.difficulty_increment >= 0.0) {
            self.difficulty_increment = 0.0;
        }
        if !positive64(self.difficulty_interval_ms) {
            self.difficulty_interval_ms = defaults.difficulty_interval_ms;
        }
        self.boss_kill_interval = self.boss_kill_interval.max(1);
        self.power_up_chance = if self.power_up_chance.is_finite() {
            self.power_up_chance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let weights = &mut self.weights;
        for w in [&mut weights.basic, &mut weights.shooter, &mut weights.zigzag] {
            if !(*w >= 0.0 && w.is_finite()) {
                *w = 0.0;
            }
        }

        self
    }
}

/// Score, combo and accuracy bonus rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTuning {
    /// Max gap between kills that keeps a combo alive (ms)
    pub combo_timeout_ms: f64,
    /// Consecutive kills needed before the combo multiplier applies
    pub combo_threshold: u32,
    /// Combo award as a percentage of the base points
    pub combo_multiplier_pct: u64,
    /// Accuracy (percent) that must be exceeded for the final bonus
    pub accuracy_bonus_threshold: u32,
    /// Final score as a percentage of the raw score when the bonus applies
    pub accuracy_bonus_pct: u64,
    pub high_score_key: String,
}

impl Default for ScoreTuning {
    fn default() -> Self {
        Self {
            combo_timeout_ms: 2000.0,
            combo_threshold: 3,
            combo_multiplier_pct: 150,
            accuracy_bonus_threshold: 70,
            accuracy_bonus_pct: 120,
            high_score_key: HIGH_SCORE_KEY.to_string(),
        }
    }
}

/// Power-up pickups
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    pub size: f32,
    pub fall_speed: f32,
    /// Seconds before an uncollected pickup expires
    pub lifetime: f32,
    pub health_restore: i32,
    /// Seconds of protection from a Shield pickup
    pub shield_duration: f32,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            size: 24.0,
            fall_speed: 80.0,
            lifetime: 8.0,
            health_restore: 25,
            shield_duration: 5.0,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub arena: ArenaTuning,
    pub player: PlayerTuning,
    pub enemies: EnemyTuning,
    pub spawn: SpawnTuning,
    pub score: ScoreTuning,
    pub power_ups: PowerUpTuning,
}

impl GameConfig {
    /// Parse a JSON balance table, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<GameConfig>(json) {
            Ok(config) => {
                log::info!("Loaded game tuning");
                config.sanitized()
            }
            Err(e) => {
                log::warn!("Invalid game tuning ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Clamp every value into a range the simulation can run with
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !positive(self.arena.width) {
            self.arena.width = defaults.arena.width;
        }
        if !positive(self.arena.height) {
            self.arena.height = defaults.arena.height;
        }

        let player = &mut self.player;
        if !positive(player.width) || !positive(player.height) {
            player.width = defaults.player.width;
            player.height = defaults.player.height;
        }
        player.max_health = player.max_health.max(1);
        player.max_weapon_level = player.max_weapon_level.max(1);
        player.fire_cooldown = player.fire_cooldown.max(0.0);
        player.invulnerability = player.invulnerability.max(0.0);

        for stats in [
            &mut self.enemies.basic,
            &mut self.enemies.shooter,
            &mut self.enemies.zigzag,
            &mut self.enemies.boss,
        ] {
            stats.health = stats.health.max(1);
            if !positive(stats.width) || !positive(stats.height) {
                stats.width = defaults.enemies.basic.width;
                stats.height = defaults.enemies.basic.height;
            }
            stats.fire_interval = stats.fire_interval.max(0.0);
        }

        self.spawn = self.spawn.sanitized();

        let score = &mut self.score;
        score.combo_threshold = score.combo_threshold.max(1);
        if !(score.combo_timeout_ms >= 0.0) {
            score.combo_timeout_ms = defaults.score.combo_timeout_ms;
        }
        if score.high_score_key.is_empty() {
            score.high_score_key = defaults.score.high_score_key;
        }

        let power_ups = &mut self.power_ups;
        if !positive(power_ups.size) {
            power_ups.size = defaults.power_ups.size;
        }
        power_ups.lifetime = power_ups.lifetime.max(0.0);
        power_ups.shield_duration = power_ups.shield_duration.max(0.0);

        self
    }
}

fn positive(v: f32) -> bool {
    v > 0.0 && v.is_finite()
}

fn positive64(v: f64) -> bool {
    v > 0.0 && v.is_finite()
}
