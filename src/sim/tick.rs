//! Playing-phase simulation tick
//!
//! Order within a tick: input → spawn → entity update/prune → collisions.
//! Spawn decisions therefore see the world as the previous tick left it, and
//! collisions see this tick's positions.

use glam::Vec2;

use super::collision::CollisionDetector;
use super::context::SimContext;
use super::entity::EnemyKind;
use crate::audio::AudioCue;
use crate::input::{Action, InputSource};

/// Per-tick timing handed down by the host loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickTime {
    /// Seconds since the previous tick
    pub dt: f32,
    /// Accumulated game time (ms)
    pub now_ms: f64,
}

/// Muzzle offsets per weapon level; the spread volley stores drift direction
const SINGLE_SHOT: [Vec2; 1] = [Vec2::ZERO];
const TWIN_SHOT: [Vec2; 2] = [Vec2::new(-8.0, 0.0), Vec2::new(8.0, 0.0)];
const SPREAD_SHOT: [Vec2; 3] = [Vec2::new(-1.0, 0.0), Vec2::ZERO, Vec2::new(1.0, 0.0)];

/// Advance the playing simulation by one tick
pub fn tick(
    ctx: &mut SimContext,
    collisions: &mut CollisionDetector,
    input: &dyn InputSource,
    time: TickTime,
) {
    ctx.now_ms = time.now_ms;

    apply_player_input(ctx, input);

    let SimContext {
        spawner,
        store,
        config,
        ..
    } = ctx;
    if spawner.update(time.dt, store, config, time.now_ms) == Some(EnemyKind::Boss) {
        ctx.play(AudioCue::BossSpawned);
    }

    let arena = ctx.arena;
    ctx.store.update(time.dt, &arena);

    collisions.run(ctx);
}

/// Steer the ship and fire from the polled action state
pub fn apply_player_input(ctx: &mut SimContext, input: &dyn InputSource) {
    let tuning = &ctx.config.player;
    let Some(player) = ctx.store.player_mut() else {
        return;
    };
    if !player.active {
        return;
    }

    let mut dir = Vec2::ZERO;
    if input.is_action_active(Action::MoveLeft) {
        dir.x -= 1.0;
    }
    if input.is_action_active(Action::MoveRight) {
        dir.x += 1.0;
    }
    if input.is_action_active(Action::MoveUp) {
        dir.y -= 1.0;
    }
    if input.is_action_active(Action::MoveDown) {
        dir.y += 1.0;
    }
    player.vel = dir.normalize_or_zero() * tuning.speed;

    if !input.is_action_active(Action::Fire) {
        return;
    }
    let muzzle = Vec2::new(player.pos.x + player.size.x / 2.0, player.pos.y);
    let Some(data) = player.as_player_mut() else {
        return;
    };
    if data.fire_cooldown > 0.0 {
        return;
    }
    data.fire_cooldown = tuning.fire_cooldown;
    let level = data.weapon_level;

    let speed = tuning.bullet_speed;
    let damage = tuning.bullet_damage;
    let spread = tuning.spread_speed;
    let volley: &[Vec2] = match level {
        0 | 1 => &SINGLE_SHOT,
        2 => &TWIN_SHOT,
        _ => &SPREAD_SHOT,
    };

    for offset in volley {
        // Side guns drift outward
        let (origin, vel) = if level >= 3 {
            (muzzle, Vec2::new(offset.x * spread, -speed))
        } else {
            (muzzle + *offset, Vec2::new(0.0, -speed))
        };
        ctx.store.spawn_player_bullet(origin, vel, damage);
    }

    ctx.score.record_shots(volley.len() as u32);
    ctx.play(AudioCue::ShotFired);
}
