//! Collision detection and event dispatch
//!
//! Each tick the detector tests four relations between active entities with
//! axis-aligned bounding boxes and hands every overlapping pair to the
//! handlers registered for that relation. The detector only reads entities;
//! handlers do all the mutating.

use glam::Vec2;

use super::context::SimContext;
use super::entity::{BulletOwner, Entity, EntityType};
use super::store::{EntityHandle, EntityStore};

/// Category of a detected pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// (player bullet, enemy)
    PlayerBulletEnemy,
    /// (enemy bullet, player)
    EnemyBulletPlayer,
    /// (player, enemy)
    PlayerEnemy,
    /// (player, power-up)
    PlayerPowerUp,
}

impl RelationKind {
    /// Evaluation order within a pass
    pub const ALL: [RelationKind; 4] = [
        RelationKind::PlayerBulletEnemy,
        RelationKind::EnemyBulletPlayer,
        RelationKind::PlayerEnemy,
        RelationKind::PlayerPowerUp,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// One overlapping pair, valid for the tick that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub kind: RelationKind,
    pub a: EntityHandle,
    pub b: EntityHandle,
}

/// Collision callback
pub type CollisionHandler = Box<dyn FnMut(&CollisionEvent, &mut SimContext)>;

/// Strict AABB overlap; boxes that only touch along an edge do not overlap
#[inline]
pub fn aabb_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}

/// True when both entities are active and their boxes overlap
pub fn entities_collide(a: &Entity, b: &Entity) -> bool {
    a.active && b.active && aabb_overlap(a.pos, a.size, b.pos, b.size)
}

/// Category members captured at the start of a pass
struct Candidates {
    players: Vec<EntityHandle>,
    enemies: Vec<EntityHandle>,
    player_bullets: Vec<EntityHandle>,
    enemy_bullets: Vec<EntityHandle>,
    power_ups: Vec<EntityHandle>,
}

impl Candidates {
    fn collect(store: &EntityStore) -> Self {
        Self {
            players: store.handles_of(EntityType::Player),
            enemies: store.handles_of(EntityType::Enemy),
            player_bullets: store.bullet_handles(BulletOwner::Player),
            enemy_bullets: store.bullet_handles(BulletOwner::Enemy),
            power_ups: store.handles_of(EntityType::PowerUp),
        }
    }

    /// (left, right) operand lists for a relation
    fn operands(&self, kind: RelationKind) -> (&[EntityHandle], &[EntityHandle]) {
        match kind {
            RelationKind::PlayerBulletEnemy => (&self.player_bullets, &self.enemies),
            RelationKind::EnemyBulletPlayer => (&self.enemy_bullets, &self.players),
            RelationKind::PlayerEnemy => (&self.players, &self.enemies),
            RelationKind::PlayerPowerUp => (&self.players, &self.power_ups),
        }
    }
}

/// Relation-kind to handler-list table plus the per-tick detection pass
#[derive(Default)]
pub struct CollisionDetector {
    handlers: [Vec<CollisionHandler>; 4],
}

impl CollisionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; handlers of a kind run in registration order
    pub fn on(
        &mut self,
        kind: RelationKind,
        handler: impl FnMut(&CollisionEvent, &mut SimContext) + 'static,
    ) {
        self.handlers[kind.index()].push(Box::new(handler));
    }

    pub fn handler_count(&self, kind: RelationKind) -> usize {
        self.handlers[kind.index()].len()
    }

    /// Run one detection pass, returning the number of events emitted
    ///
    /// Membership is captured when the pass starts, while `active` is re-read
    /// for every pair, so an entity a handler deactivates cannot collide again
    /// in the same pass.
    pub fn run(&mut self, ctx: &mut SimContext) -> usize {
        let candidates = Candidates::collect(&ctx.store);
        let mut emitted = 0;

        for kind in RelationKind::ALL {
            let (left, right) = candidates.operands(kind);
            for &a in left {
                for &b in right {
                    let hit = match (ctx.store.get(a), ctx.store.get(b)) {
                        (Some(ea), Some(eb)) => entities_collide(ea, eb),
                        _ => false,
                    };
                    if !hit {
                        continue;
                    }

                    let event = CollisionEvent { kind, a, b };
                    for handler in self.handlers[kind.index()].iter_mut() {
                        handler(&event, ctx);
                    }
                    emitted += 1;
                }
            }
        }

        emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EnemyKind, PowerUpKind};
    use crate::tuning::GameConfig;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ctx() -> SimContext {
        SimContext::for_tests(GameConfig::default())
    }

    fn recorder(detector: &mut CollisionDetector) -> Rc<RefCell<Vec<CollisionEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in RelationKind::ALL {
            let log = Rc::clone(&log);
            detector.on(kind, move |event, _ctx| log.borrow_mut().push(*event));
        }
        log
    }

    fn add_player(ctx: &mut SimContext, pos: Vec2) -> EntityHandle {
        let id = ctx.store.next_entity_id();
        let player = Entity::player(id, pos, &ctx.config);
        ctx.store.add(player)
    }

    fn add_enemy(ctx: &mut SimContext, pos: Vec2) -> EntityHandle {
        let id = ctx.store.next_entity_id();
        let enemy = Entity::enemy(id, EnemyKind::Basic, pos, &ctx.config.enemies);
        ctx.store.add(enemy)
    }

    #[test]
    fn test_aabb_overlap() {
        let size = Vec2::splat(10.0);
        assert!(aabb_overlap(Vec2::ZERO, size, Vec2::new(5.0, 5.0), size));
        assert!(!aabb_overlap(Vec2::ZERO, size, Vec2::new(20.0, 0.0), size));
        // Touching edges
        assert!(!aabb_overlap(Vec2::ZERO, size, Vec2::new(10.0, 0.0), size));
        // Containment
        assert!(aabb_overlap(Vec2::ZERO, Vec2::splat(100.0), Vec2::new(40.0, 40.0), size));
    }

    #[test]
    fn test_each_relation_reports_correct_kind() {
        let mut ctx = ctx();
        let mut detector = CollisionDetector::new();
        let log = recorder(&mut detector);

        let player = add_player(&mut ctx, Vec2::new(100.0, 500.0));
        let enemy = add_enemy(&mut ctx, Vec2::new(400.0, 100.0));
        let bullet = ctx
            .store
            .spawn_player_bullet(Vec2::new(410.0, 110.0), Vec2::ZERO, 1);
        let id = ctx.store.next_entity_id();
        let enemy_bullet = ctx.store.add(Entity::bullet(
            id,
            BulletOwner::Enemy,
            Vec2::new(110.0, 510.0),
            Vec2::ZERO,
            10,
        ));

        assert_eq!(detector.run(&mut ctx), 2);
        let events = log.borrow();
        assert_eq!(
            events[0],
            CollisionEvent {
                kind: RelationKind::PlayerBulletEnemy,
                a: bullet,
                b: enemy
            }
        );
        assert_eq!(
            events[1],
            CollisionEvent {
                kind: RelationKind::EnemyBulletPlayer,
                a: enemy_bullet,
                b: player
            }
        );
    }

    #[test]
    fn test_player_enemy_and_power_up() {
        let mut ctx = ctx();
        let mut detector = CollisionDetector::new();
        let log = recorder(&mut detector);

        let player = add_player(&mut ctx, Vec2::new(100.0, 100.0));
        let enemy = add_enemy(&mut ctx, Vec2::new(110.0, 110.0));
        let id = ctx.store.next_entity_id();
        let config = ctx.config.clone();
        let pickup = ctx.store.add(Entity::power_up(
            id,
            PowerUpKind::Health,
            Vec2::new(120.0, 120.0),
            &config,
        ));

        assert_eq!(detector.run(&mut ctx), 2);
        let events = log.borrow();
        assert_eq!(events[0].kind, RelationKind::PlayerEnemy);
        assert_eq!((events[0].a, events[0].b), (player, enemy));
        assert_eq!(events[1].kind, RelationKind::PlayerPowerUp);
        assert_eq!((events[1].a, events[1].b), (player, pickup));
    }

    #[test]
    fn test_untracked_pairs_ignored() {
        let mut ctx = ctx();
        let mut detector = CollisionDetector::new();
        let log = recorder(&mut detector);

        // Enemy on enemy, and an enemy bullet inside an enemy
        add_enemy(&mut ctx, Vec2::new(100.0, 100.0));
        add_enemy(&mut ctx, Vec2::new(105.0, 105.0));
        let id = ctx.store.next_entity_id();
        ctx.store.add(Entity::bullet(
            id,
            BulletOwner::Enemy,
            Vec2::new(110.0, 110.0),
            Vec2::ZERO,
            10,
        ));

        assert_eq!(detector.run(&mut ctx), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_inactive_entities_skipped() {
        let mut ctx = ctx();
        let mut detector = CollisionDetector::new();
        let log = recorder(&mut detector);

        add_player(&mut ctx, Vec2::new(100.0, 100.0));
        let enemy = add_enemy(&mut ctx, Vec2::new(110.0, 110.0));
        ctx.store.get_mut(enemy).unwrap().active = false;

        assert_eq!(detector.run(&mut ctx), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let mut ctx = ctx();
        let mut detector = CollisionDetector::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            detector.on(RelationKind::PlayerEnemy, move |_, _| order.borrow_mut().push(tag));
        }

        add_player(&mut ctx, Vec2::new(100.0, 100.0));
        add_enemy(&mut ctx, Vec2::new(110.0, 110.0));
        detector.run(&mut ctx);

        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
        assert_eq!(detector.handler_count(RelationKind::PlayerEnemy), 3);
    }

    #[test]
    fn test_deactivated_bullet_hits_once() {
        let mut ctx = ctx();
        let mut detector = CollisionDetector::new();
        detector.on(RelationKind::PlayerBulletEnemy, |event, ctx| {
            if let Some(bullet) = ctx.store.get_mut(event.a) {
                bullet.active = false;
            }
        });

        // One bullet overlapping two stacked enemies
        add_enemy(&mut ctx, Vec2::new(100.0, 100.0));
        add_enemy(&mut ctx, Vec2::new(102.0, 102.0));
        ctx.store
            .spawn_player_bullet(Vec2::new(115.0, 115.0), Vec2::ZERO, 1);

        assert_eq!(detector.run(&mut ctx), 1);
    }

    #[test]
    fn test_detector_does_not_mutate() {
        let mut ctx = ctx();
        let mut detector = CollisionDetector::new();
        add_player(&mut ctx, Vec2::new(100.0, 100.0));
        let enemy = add_enemy(&mut ctx, Vec2::new(110.0, 110.0));

        // No handlers registered: events are counted, nothing changes
        assert_eq!(detector.run(&mut ctx), 1);
        assert!(ctx.store.get(enemy).unwrap().active);
        assert_eq!(ctx.store.player().unwrap().as_player().unwrap().health, 100);
    }

    #[test]
    fn test_each_pass_reevaluates() {
        let mut ctx = ctx();
        let mut detector = CollisionDetector::new();
        add_player(&mut ctx, Vec2::new(100.0, 100.0));
        add_enemy(&mut ctx, Vec2::new(110.0, 110.0));

        assert_eq!(detector.run(&mut ctx), 1);
        assert_eq!(detector.run(&mut ctx), 1);
    }

    proptest! {
        #[test]
        fn prop_overlap_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
            aw in 1.0f32..50.0, ah in 1.0f32..50.0,
            bw in 1.0f32..50.0, bh in 1.0f32..50.0,
        ) {
            let a = (Vec2::new(ax, ay), Vec2::new(aw, ah));
            let b = (Vec2::new(bx, by), Vec2::new(bw, bh));
            prop_assert_eq!(aabb_overlap(a.0, a.1, b.0, b.1), aabb_overlap(b.0, b.1, a.0, a.1));
        }

        #[test]
        fn prop_separated_boxes_never_collide(
            x in 0.0f32..300.0, y in 0.0f32..300.0, gap in 0.0f32..200.0,
        ) {
            let mut ctx = ctx();
            let mut detector = CollisionDetector::new();
            let log = recorder(&mut detector);

            let player = add_player(&mut ctx, Vec2::new(x, y));
            let width = ctx.store.get(player).unwrap().size.x;
            add_enemy(&mut ctx, Vec2::new(x + width + gap, y));

            prop_assert_eq!(detector.run(&mut ctx), 0);
            prop_assert!(log.borrow().is_empty());
        }
    }
}
