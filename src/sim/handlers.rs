//! Gameplay responses to collisions
//!
//! Registered once on the detector at startup. These are where damage,
//! scoring, kill counting and power-up drops happen.

use super::collision::{CollisionDetector, CollisionEvent, RelationKind};
use super::context::SimContext;
use super::entity::{EnemyKind, PowerUpKind};
use super::store::EntityHandle;
use crate::audio::AudioCue;

/// Install the default gameplay handlers
pub fn register_default_handlers(detector: &mut CollisionDetector) {
    detector.on(RelationKind::PlayerBulletEnemy, player_bullet_hits_enemy);
    detector.on(RelationKind::EnemyBulletPlayer, enemy_bullet_hits_player);
    detector.on(RelationKind::PlayerEnemy, player_rams_enemy);
    detector.on(RelationKind::PlayerPowerUp, player_collects_power_up);
}

/// Apply damage to the player unless shielded or still recovering
///
/// Returns true when damage was taken.
pub fn damage_player(ctx: &mut SimContext, player: EntityHandle, amount: i32) -> bool {
    let grace = ctx.config.player.invulnerability;
    let Some(data) = ctx.store.get_mut(player).and_then(|e| e.as_player_mut()) else {
        return false;
    };
    if data.is_protected() {
        return false;
    }

    data.health = (data.health - amount).max(0);
    data.invulnerable = grace;
    log::debug!("Player hit for {}, health {}", amount, data.health);
    ctx.play(AudioCue::PlayerHit);
    true
}

fn player_bullet_hits_enemy(event: &CollisionEvent, ctx: &mut SimContext) {
    let Some(bullet) = ctx.store.get_mut(event.a) else {
        return;
    };
    bullet.active = false;
    let damage = bullet.as_bullet().map_or(0, |b| b.damage);
    ctx.score.record_hit();

    let Some(enemy) = ctx.store.get_mut(event.b) else {
        return;
    };
    let center = enemy.center();
    let Some(data) = enemy.as_enemy_mut() else {
        return;
    };
    data.health -= damage;
    if data.health > 0 {
        ctx.play(AudioCue::EnemyHit);
        return;
    }

    let (kind, points) = (data.kind, data.points);
    enemy.active = false;

    let now = ctx.now_ms;
    let awarded = ctx.score.add_score(points, Some(now));
    ctx.score.record_enemy_destroyed();

    if kind == EnemyKind::Boss {
        ctx.spawner.on_boss_defeated();
        ctx.play(AudioCue::BossDefeated);
        log::info!("Boss defeated for {} points", awarded);
    } else {
        ctx.play(AudioCue::EnemyDestroyed);
    }
    ctx.spawner.on_enemy_killed();

    let SimContext {
        spawner,
        store,
        config,
        ..
    } = ctx;
    spawner.try_spawn_power_up(store, config, center);
}

fn enemy_bullet_hits_player(event: &CollisionEvent, ctx: &mut SimContext) {
    let Some(bullet) = ctx.store.get_mut(event.a) else {
        return;
    };
    bullet.active = false;
    let damage = bullet.as_bullet().map_or(0, |b| b.damage);
    damage_player(ctx, event.b, damage);
}

fn player_rams_enemy(event: &CollisionEvent, ctx: &mut SimContext) {
    let damage = ctx.config.player.contact_damage;
    damage_player(ctx, event.a, damage);

    // Bosses shrug off rams
    if let Some(enemy) = ctx.store.get_mut(event.b) {
        if enemy.as_enemy().is_some_and(|e| e.kind != EnemyKind::Boss) {
            enemy.active = false;
        }
    }
}

fn player_collects_power_up(event: &CollisionEvent, ctx: &mut SimContext) {
    let Some(pickup) = ctx.store.get_mut(event.b) else {
        return;
    };
    let Some(kind) = pickup.as_power_up().map(|p| p.kind) else {
        return;
    };
    pickup.active = false;

    let max_level = ctx.config.player.max_weapon_level;
    let restore = ctx.config.power_ups.health_restore;
    let shield = ctx.config.power_ups.shield_duration;
    let Some(player) = ctx.store.get_mut(event.a).and_then(|e| e.as_player_mut()) else {
        return;
    };
    match kind {
        PowerUpKind::WeaponUpgrade => {
            player.weapon_level = (player.weapon_level + 1).min(max_level);
        }
        PowerUpKind::Health => {
            player.health = (player.health + restore).min(player.max_health);
        }
        PowerUpKind::Shield => {
            player.shield = shield;
        }
    }
    log::debug!("Collected {:?}", kind);
    ctx.play(AudioCue::PowerUpCollected);
}
