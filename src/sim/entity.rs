//! Simulation entities
//!
//! Every object in the arena is an [`Entity`]: a bounding box, a velocity, an
//! `active` flag, and an [`EntityKind`] tag carrying the variant-specific
//! state. Dispatch is a `match` on the tag.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::{EnemyStats, EnemyTuning, GameConfig};

/// Enemy subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Drifts straight down
    Basic,
    /// Descends slowly and fires downward
    Shooter,
    /// Sways side to side while descending
    Zigzag,
    /// Hovers near the top and patrols, firing often
    Boss,
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Adds a bullet to each volley
    WeaponUpgrade,
    /// Restores health
    Health,
    /// Blocks all damage for a while
    Shield,
}

/// Variant discriminator used for typed store queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Player,
    Enemy,
    Bullet,
    PowerUp,
}

/// Player ship state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerData {
    pub health: i32,
    pub max_health: i32,
    pub weapon_level: u8,
    /// Seconds until the next volley may fire
    pub fire_cooldown: f32,
    /// Seconds of post-hit grace remaining
    pub invulnerable: f32,
    /// Seconds of shield remaining
    pub shield: f32,
}

impl PlayerData {
    pub fn is_protected(&self) -> bool {
        self.invulnerable > 0.0 || self.shield > 0.0
    }
}

/// Enemy state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyData {
    pub kind: EnemyKind,
    pub health: i32,
    pub points: u64,
    /// Movement speed (pixels/s)
    pub speed: f32,
    /// Seconds between shots, 0 = never fires
    pub fire_interval: f32,
    /// Seconds until the next shot
    pub fire_timer: f32,
    pub shot_speed: f32,
    pub shot_damage: i32,
    /// Seconds alive (drives sway/patrol patterns)
    pub age: f32,
    /// Horizontal sway amplitude (pixels/s), Zigzag only
    pub sway: f32,
    /// Sway frequency (radians/s)
    pub sway_frequency: f32,
    /// Stop descending at this y, Boss only
    pub hover_y: Option<f32>,
}

/// Projectile state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletData {
    pub owner: BulletOwner,
    pub damage: i32,
}

/// Pickup state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpData {
    pub kind: PowerUpKind,
    /// Seconds before the pickup expires
    pub ttl: f32,
}

/// Variant tag with per-variant state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Player(PlayerData),
    Enemy(EnemyData),
    Bullet(BulletData),
    PowerUp(PowerUpData),
}

/// A projectile requested by an entity during its update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Centre of the muzzle
    pub origin: Vec2,
    pub vel: Vec2,
    pub damage: i32,
}

/// Player bullet size
pub const PLAYER_BULLET_SIZE: Vec2 = Vec2::new(4.0, 12.0);
/// Enemy bullet size
pub const ENEMY_BULLET_SIZE: Vec2 = Vec2::new(6.0, 10.0);

/// Arena bounds used by entity updates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            width: config.arena.width,
            height: config.arena.height,
        }
    }
}

/// A simulation object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    /// Bounding box width/height
    pub size: Vec2,
    pub vel: Vec2,
    pub active: bool,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            pos,
            size,
            vel: Vec2::ZERO,
            active: true,
            kind,
        }
    }

    /// Player ship at full health
    pub fn player(id: u32, pos: Vec2, config: &GameConfig) -> Self {
        let tuning = &config.player;
        let data = PlayerData {
            health: tuning.max_health,
            max_health: tuning.max_health,
            weapon_level: 1,
            fire_cooldown: 0.0,
            invulnerable: 0.0,
            shield: 0.0,
        };
        Self::new(
            id,
            EntityKind::Player(data),
            pos,
            Vec2::new(tuning.width, tuning.height),
        )
    }

    /// Enemy of the given subtype, descending at its configured speed
    pub fn enemy(id: u32, kind: EnemyKind, pos: Vec2, tuning: &EnemyTuning) -> Self {
        let stats: &EnemyStats = tuning.stats(kind);
        let data = EnemyData {
            kind,
            health: stats.health,
            points: stats.points,
            speed: stats.speed,
            fire_interval: stats.fire_interval,
            fire_timer: stats.fire_interval,
            shot_speed: stats.shot_speed,
            shot_damage: stats.shot_damage,
            age: 0.0,
            sway: if kind == EnemyKind::Zigzag {
                tuning.zigzag_sway
            } else {
                0.0
            },
            sway_frequency: tuning.zigzag_frequency,
            hover_y: (kind == EnemyKind::Boss).then_some(tuning.boss_hover_y),
        };
        let mut entity = Self::new(
            id,
            EntityKind::Enemy(data),
            pos,
            Vec2::new(stats.width, stats.height),
        );
        entity.vel = Vec2::new(0.0, stats.speed);
        entity
    }

    /// Bullet whose box is centred on `center`
    pub fn bullet(id: u32, owner: BulletOwner, center: Vec2, vel: Vec2, damage: i32) -> Self {
        let size = match owner {
            BulletOwner::Player => PLAYER_BULLET_SIZE,
            BulletOwner::Enemy => ENEMY_BULLET_SIZE,
        };
        let mut entity = Self::new(
            id,
            EntityKind::Bullet(BulletData { owner, damage }),
            center - size / 2.0,
            size,
        );
        entity.vel = vel;
        entity
    }

    /// Falling pickup whose box is centred on `center`
    pub fn power_up(id: u32, kind: PowerUpKind, center: Vec2, config: &GameConfig) -> Self {
        let tuning = &config.power_ups;
        let size = Vec2::splat(tuning.size);
        let mut entity = Self::new(
            id,
            EntityKind::PowerUp(PowerUpData {
                kind,
                ttl: tuning.lifetime,
            }),
            center - size / 2.0,
            size,
        );
        entity.vel = Vec2::new(0.0, tuning.fall_speed);
        entity
    }

    pub fn entity_type(&self) -> EntityType {
        match self.kind {
            EntityKind::Player(_) => EntityType::Player,
            EntityKind::Enemy(_) => EntityType::Enemy,
            EntityKind::Bullet(_) => EntityType::Bullet,
            EntityKind::PowerUp(_) => EntityType::PowerUp,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn as_player(&self) -> Option<&PlayerData> {
        match &self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&EnemyData> {
        match &self.kind {
            EntityKind::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_enemy_mut(&mut self) -> Option<&mut EnemyData> {
        match &mut self.kind {
            EntityKind::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_bullet(&self) -> Option<&BulletData> {
        match &self.kind {
            EntityKind::Bullet(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_power_up(&self) -> Option<&PowerUpData> {
        match &self.kind {
            EntityKind::PowerUp(p) => Some(p),
            _ => None,
        }
    }

    pub fn bullet_owner(&self) -> Option<BulletOwner> {
        self.as_bullet().map(|b| b.owner)
    }

    /// True when no part of the box is inside the arena
    fn is_outside(&self, arena: &Arena) -> bool {
        self.pos.x + self.size.x < 0.0
            || self.pos.x > arena.width
            || self.pos.y + self.size.y < 0.0
            || self.pos.y > arena.height
    }

    /// Advance one tick
    ///
    /// Runs for inactive entities too; the store prunes them afterwards.
    /// Returns a projectile when an enemy's fire timer elapses.
    pub fn update(&mut self, dt: f32, arena: &Arena) -> Option<Shot> {
        let mut shot = None;

        match &mut self.kind {
            EntityKind::Player(player) => {
                player.fire_cooldown = (player.fire_cooldown - dt).max(0.0);
                player.invulnerable = (player.invulnerable - dt).max(0.0);
                player.shield = (player.shield - dt).max(0.0);

                self.pos += self.vel * dt;
                let max = Vec2::new(arena.width, arena.height) - self.size;
                self.pos = self.pos.clamp(Vec2::ZERO, max.max(Vec2::ZERO));
            }

            EntityKind::Enemy(enemy) => {
                enemy.age += dt;

                match enemy.kind {
                    EnemyKind::Zigzag => {
                        self.vel.x = enemy.sway * (enemy.age * enemy.sway_frequency).cos();
                    }
                    EnemyKind::Boss => {
                        if let Some(hover_y) = enemy.hover_y {
                            if self.pos.y >= hover_y {
                                self.pos.y = hover_y;
                                self.vel.y = 0.0;
                                // Patrol once parked
                                if self.vel.x == 0.0 {
                                    self.vel.x = enemy.speed * 2.0;
                                }
                            }
                        }
                        if self.pos.x <= 0.0 {
                            self.vel.x = self.vel.x.abs();
                        } else if self.pos.x + self.size.x >= arena.width {
                            self.vel.x = -self.vel.x.abs();
                        }
                    }
                    EnemyKind::Basic | EnemyKind::Shooter => {}
                }

                self.pos += self.vel * dt;

                if enemy.fire_interval > 0.0 && self.active {
                    enemy.fire_timer -= dt;
                    if enemy.fire_timer <= 0.0 {
                        enemy.fire_timer += enemy.fire_interval;
                        let muzzle =
                            Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y);
                        shot = Some(Shot {
                            origin: muzzle,
                            vel: Vec2::new(0.0, enemy.shot_speed),
                            damage: enemy.shot_damage,
                        });
                    }
                }

                // Left through the bottom
                if self.pos.y > arena.height {
                    self.active = false;
                }
            }

            EntityKind::Bullet(_) => {
                self.pos += self.vel * dt;
                if self.is_outside(arena) {
                    self.active = false;
                }
            }

            EntityKind::PowerUp(power_up) => {
                power_up.ttl -= dt;
                self.pos += self.vel * dt;
                if power_up.ttl <= 0.0 || self.pos.y > arena.height {
                    self.active = false;
                }
            }
        }

        shot
    }

    /// Draw this entity if it is still alive
    pub fn render(&self, renderer: &mut dyn crate::renderer::Renderer) {
        if self.active {
            renderer.draw_entity(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Arena {
        Arena {
            width: 800.0,
            height: 600.0,
        }
    }

    #[test]
    fn test_bullet_leaves_arena() {
        let mut bullet = Entity::bullet(
            1,
            BulletOwner::Player,
            Vec2::new(100.0, 5.0),
            Vec2::new(0.0, -600.0),
            1,
        );
        bullet.update(0.1, &arena());
        assert!(!bullet.active);
    }

    #[test]
    fn test_player_clamped_to_arena() {
        let config = GameConfig::default();
        let mut player = Entity::player(1, Vec2::new(5.0, 300.0), &config);
        player.vel = Vec2::new(-1000.0, 0.0);
        player.update(0.5, &arena());
        assert_eq!(player.pos.x, 0.0);
        assert!(player.active);
    }

    #[test]
    fn test_shooter_fires_on_interval() {
        let config = GameConfig::default();
        let mut enemy =
            Entity::enemy(1, EnemyKind::Shooter, Vec2::new(100.0, 50.0), &config.enemies);
        let interval = config.enemies.shooter.fire_interval;

        assert!(enemy.update(interval * 0.5, &arena()).is_none());
        let shot = enemy.update(interval * 0.6, &arena()).expect("shooter should fire");
        assert!(shot.vel.y > 0.0);
        assert_eq!(shot.damage, config.enemies.shooter.shot_damage);
    }

    #[test]
    fn test_basic_enemy_never_fires() {
        let config = GameConfig::default();
        let mut enemy = Entity::enemy(1, EnemyKind::Basic, Vec2::new(100.0, 0.0), &config.enemies);
        for _ in 0..100 {
            assert!(enemy.update(0.05, &arena()).is_none());
        }
    }

    #[test]
    fn test_enemy_deactivates_below_arena() {
        let config = GameConfig::default();
        let mut enemy =
            Entity::enemy(1, EnemyKind::Basic, Vec2::new(100.0, 590.0), &config.enemies);
        enemy.update(1.0, &arena());
        assert!(!enemy.active);
    }

    #[test]
    fn test_zigzag_sways() {
        let config = GameConfig::default();
        let mut enemy = Entity::enemy(1, EnemyKind::Zigzag, Vec2::new(400.0, 0.0), &config.enemies);
        let start_x = enemy.pos.x;
        enemy.update(0.1, &arena());
        assert!(enemy.pos.x != start_x);
    }

    #[test]
    fn test_boss_parks_at_hover_line() {
        let config = GameConfig::default();
        let mut boss = Entity::enemy(1, EnemyKind::Boss, Vec2::new(340.0, -80.0), &config.enemies);
        for _ in 0..600 {
            boss.update(1.0 / 60.0, &arena());
        }
        assert_eq!(boss.pos.y, config.enemies.boss_hover_y);
        assert!(boss.active);
        assert!(boss.pos.x >= 0.0 && boss.pos.x + boss.size.x <= 800.0 + 10.0);
    }

    #[test]
    fn test_power_up_expires() {
        let config = GameConfig::default();
        let mut pickup = Entity::power_up(1, PowerUpKind::Shield, Vec2::new(100.0, 100.0), &config);
        pickup.update(config.power_ups.lifetime + 0.1, &Arena { width: 800.0, height: 10_000.0 });
        assert!(!pickup.active);
    }
}
