//! Renderer-facing surface
//!
//! The simulation never draws. Each frame it hands a [`Renderer`] its active
//! entities, the HUD numbers and the phase overlay; hosts that prefer pulling
//! data can take a [`RenderView`] snapshot instead.

use serde::Serialize;

use crate::sim::entity::{Entity, EntityType};
use crate::sim::score::ScoreState;
use crate::sim::spawn::SpawnState;
use crate::sim::state::Phase;
use crate::sim::store::EntityStore;

/// Drawing backend driven by the simulation
pub trait Renderer {
    fn draw_entity(&mut self, entity: &Entity);
    fn draw_hud(&mut self, score: &ScoreState, spawn: &SpawnState);
    /// Called for phases that show a screen over or instead of the world
    fn draw_overlay(&mut self, phase: Phase);
}

/// Read-only per-frame snapshot grouped by category
#[derive(Debug, Clone, Serialize)]
pub struct RenderView<'a> {
    pub phase: Phase,
    pub player: Option<&'a Entity>,
    pub enemies: Vec<&'a Entity>,
    pub bullets: Vec<&'a Entity>,
    pub power_ups: Vec<&'a Entity>,
    pub score: &'a ScoreState,
    pub spawn: &'a SpawnState,
}

impl<'a> RenderView<'a> {
    pub fn capture(
        phase: Phase,
        store: &'a EntityStore,
        score: &'a ScoreState,
        spawn: &'a SpawnState,
    ) -> Self {
        Self {
            phase,
            player: store.active_of(EntityType::Player).next(),
            enemies: store.active_of(EntityType::Enemy).collect(),
            bullets: store.active_of(EntityType::Bullet).collect(),
            power_ups: store.active_of(EntityType::PowerUp).collect(),
            score,
            spawn,
        }
    }

    pub fn entity_count(&self) -> usize {
        usize::from(self.player.is_some())
            + self.enemies.len()
            + self.bullets.len()
            + self.power_ups.len()
    }
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Entity { id: u32, ty: EntityType },
    Hud { score: u64, high_score: u64 },
    Overlay(Phase),
}

/// Renderer that records what it was asked to draw
///
/// Used by headless hosts and tests.
#[derive(Debug, Default)]
pub struct DrawRecorder {
    pub calls: Vec<DrawCall>,
}

impl DrawRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entities_drawn(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Entity { .. }))
            .count()
    }

    pub fn overlays(&self) -> Vec<Phase> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Overlay(phase) => Some(*phase),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Renderer for DrawRecorder {
    fn draw_entity(&mut self, entity: &Entity) {
        self.calls.push(DrawCall::Entity {
            id: entity.id,
            ty: entity.entity_type(),
        });
    }

    fn draw_hud(&mut self, score: &ScoreState, _spawn: &SpawnState) {
        self.calls.push(DrawCall::Hud {
            score: score.score,
            high_score: score.high_score,
        });
    }

    fn draw_overlay(&mut self, phase: Phase) {
        self.calls.push(DrawCall::Overlay(phase));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::GameConfig;
    use glam::Vec2;

    #[test]
    fn test_view_skips_inactive() {
        let config = GameConfig::default();
        let mut store = EntityStore::new();
        let id = store.next_entity_id();
        store.add(Entity::player(id, Vec2::new(10.0, 10.0), &config));
        let h = store.spawn_player_bullet(Vec2::new(50.0, 50.0), Vec2::new(0.0, -1.0), 1);
        store.spawn_player_bullet(Vec2::new(60.0, 50.0), Vec2::new(0.0, -1.0), 1);
        store.get_mut(h).unwrap().active = false;

        let score = ScoreState::default();
        let spawn = SpawnState::default();
        let view = RenderView::capture(Phase::Playing, &store, &score, &spawn);
        assert!(view.player.is_some());
        assert_eq!(view.bullets.len(), 1);
        assert!(view.enemies.is_empty());
        assert_eq!(view.entity_count(), 2);
    }

    #[test]
    fn test_recorder_counts() {
        let config = GameConfig::default();
        let mut store = EntityStore::new();
        let id = store.next_entity_id();
        store.add(Entity::player(id, Vec2::ZERO, &config));

        let mut rec = DrawRecorder::new();
        store.render(&mut rec);
        rec.draw_overlay(Phase::Paused);
        assert_eq!(rec.entities_drawn(), 1);
        assert_eq!(rec.overlays(), vec![Phase::Paused]);
        rec.clear();
        assert!(rec.calls.is_empty());
    }
}
