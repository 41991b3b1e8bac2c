//! Entity store
//!
//! Single owner of every simulation object. Entities live in insertion order;
//! typed queries filter on the [`EntityType`] tag and never on `active`, so a
//! deactivated entity stays visible until the next [`EntityStore::update`]
//! sweep removes it.

use glam::Vec2;

use super::entity::{Arena, BulletOwner, Entity, EntityType};
use crate::renderer::Renderer;

/// Position of an entity inside the store
///
/// Valid until the next prune; handles handed out during a tick stay valid
/// for the rest of that tick because insertions only append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(pub usize);

/// Owns all live entities
#[derive(Debug)]
pub struct EntityStore {
    entities: Vec<Entity>,
    /// Next id handed out by `next_entity_id`
    next_id: u32,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Insert an entity as-is (ids are not checked for uniqueness)
    pub fn add(&mut self, entity: Entity) -> EntityHandle {
        self.entities.push(entity);
        EntityHandle(self.entities.len() - 1)
    }

    /// Insert with a freshly allocated id
    pub fn spawn(&mut self, mut entity: Entity) -> EntityHandle {
        entity.id = self.next_entity_id();
        self.add(entity)
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        self.entities.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.entities.get_mut(handle.0)
    }

    /// All entities of a variant, in insertion order, active or not
    pub fn get_by_type(&self, ty: EntityType) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|e| e.entity_type() == ty)
            .collect()
    }

    /// Handles of all entities of a variant, in insertion order
    pub fn handles_of(&self, ty: EntityType) -> Vec<EntityHandle> {
        self.entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.entity_type() == ty)
            .map(|(i, _)| EntityHandle(i))
            .collect()
    }

    /// Handles of bullets fired by `owner`, in insertion order
    pub fn bullet_handles(&self, owner: BulletOwner) -> Vec<EntityHandle> {
        self.entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.bullet_owner() == Some(owner))
            .map(|(i, _)| EntityHandle(i))
            .collect()
    }

    /// Active entities of a variant
    pub fn active_of(&self, ty: EntityType) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |e| e.active && e.entity_type() == ty)
    }

    pub fn active_count(&self, ty: EntityType) -> usize {
        self.active_of(ty).count()
    }

    /// The player ship, if one is stored
    pub fn player(&self) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.entity_type() == EntityType::Player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|e| e.entity_type() == EntityType::Player)
    }

    pub fn player_handle(&self) -> Option<EntityHandle> {
        self.handles_of(EntityType::Player).first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Update every entity, then drop the inactive ones
    ///
    /// Entities deactivated earlier in the tick still get this final update
    /// before removal. Projectiles fired during the pass are appended after
    /// the prune.
    pub fn update(&mut self, dt: f32, arena: &Arena) {
        let mut shots = Vec::new();
        for entity in &mut self.entities {
            if let Some(shot) = entity.update(dt, arena) {
                shots.push(shot);
            }
        }

        self.entities.retain(|e| e.active);

        for shot in shots {
            self.spawn(Entity::bullet(0, BulletOwner::Enemy, shot.origin, shot.vel, shot.damage));
        }
    }

    /// Empty the store
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Draw every active entity
    pub fn render(&self, renderer: &mut dyn Renderer) {
        for entity in &self.entities {
            entity.render(renderer);
        }
    }

    /// Insert a player bullet centred on `center`
    pub fn spawn_player_bullet(&mut self, center: Vec2, vel: Vec2, damage: i32) -> EntityHandle {
        self.spawn(Entity::bullet(0, BulletOwner::Player, center, vel, damage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EnemyKind, PowerUpKind};
    use crate::tuning::GameConfig;

    fn arena() -> Arena {
        Arena {
            width: 800.0,
            height: 600.0,
        }
    }

    fn sample_store(config: &GameConfig) -> EntityStore {
        let mut store = EntityStore::new();
        store.spawn(Entity::player(0, Vec2::new(380.0, 540.0), config));
        store.spawn(Entity::enemy(0, EnemyKind::Basic, Vec2::new(100.0, 50.0), &config.enemies));
        store.spawn(Entity::enemy(0, EnemyKind::Zigzag, Vec2::new(300.0, 50.0), &config.enemies));
        store.spawn_player_bullet(Vec2::new(400.0, 500.0), Vec2::new(0.0, -500.0), 1);
        store.spawn(Entity::power_up(0, PowerUpKind::Health, Vec2::new(200.0, 200.0), config));
        store
    }

    #[test]
    fn test_spawn_allocates_ids() {
        let config = GameConfig::default();
        let store = sample_store(&config);
        let ids: Vec<u32> = store.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_get_by_type_insertion_order() {
        let config = GameConfig::default();
        let store = sample_store(&config);

        let enemies = store.get_by_type(EntityType::Enemy);
        assert_eq!(enemies.len(), 2);
        assert!(enemies[0].id < enemies[1].id);
        assert_eq!(store.get_by_type(EntityType::Player).len(), 1);
        assert_eq!(store.get_by_type(EntityType::Bullet).len(), 1);
        assert_eq!(store.get_by_type(EntityType::PowerUp).len(), 1);
    }

    #[test]
    fn test_inactive_visible_until_prune() {
        let config = GameConfig::default();
        let mut store = sample_store(&config);

        let handle = store.handles_of(EntityType::Enemy)[0];
        store.get_mut(handle).unwrap().active = false;

        // Still listed before the sweep
        assert_eq!(store.get_by_type(EntityType::Enemy).len(), 2);
        assert_eq!(store.active_count(EntityType::Enemy), 1);

        store.update(1.0 / 60.0, &arena());
        assert_eq!(store.get_by_type(EntityType::Enemy).len(), 1);
    }

    #[test]
    fn test_deactivated_shooter_is_pruned_without_firing() {
        let config = GameConfig::default();
        let mut store = EntityStore::new();
        let shooter =
            Entity::enemy(7, EnemyKind::Shooter, Vec2::new(100.0, 100.0), &config.enemies);
        let handle = store.add(shooter);
        store.get_mut(handle).unwrap().active = false;

        // Its fire timer elapses during the final update, but dead enemies don't shoot
        store.update(config.enemies.shooter.fire_interval + 0.1, &arena());
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_empties_store() {
        let config = GameConfig::default();
        let mut store = sample_store(&config);
        assert!(!store.is_empty());
        store.clear();
        assert!(store.is_empty());
        assert!(store.player().is_none());
        assert!(store.get_by_type(EntityType::Enemy).is_empty());
    }

    #[test]
    fn test_stale_handle_is_none() {
        let store = EntityStore::new();
        assert!(store.get(EntityHandle(3)).is_none());
    }

    #[test]
    fn test_enemy_fire_appended_after_prune() {
        let config = GameConfig::default();
        let mut store = EntityStore::new();
        store.add(Entity::enemy(1, EnemyKind::Shooter, Vec2::new(100.0, 100.0), &config.enemies));

        let interval = config.enemies.shooter.fire_interval;
        store.update(interval + 0.01, &arena());

        let bullets = store.get_by_type(EntityType::Bullet);
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].bullet_owner(), Some(BulletOwner::Enemy));
        assert!(bullets[0].active);
    }

    #[test]
    fn test_duplicate_ids_allowed() {
        let config = GameConfig::default();
        let mut store = EntityStore::new();
        store.add(Entity::enemy(5, EnemyKind::Basic, Vec2::ZERO, &config.enemies));
        store.add(Entity::enemy(5, EnemyKind::Basic, Vec2::ZERO, &config.enemies));
        assert_eq!(store.len(), 2);
    }
}
