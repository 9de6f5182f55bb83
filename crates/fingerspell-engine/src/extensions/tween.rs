// extensions/tween.rs
//
// Tween system — manages animated value transitions by EntityId.
// Each entity has independent channels (translation, rotation, scale, tint,
// opacity). Starting a tween on a busy channel supersedes the running one, so
// rapid state changes never leave two tweens fighting over the same value.
//
// Usage:
//   let mut tweens = TweenState::new();
//   tweens.add(model_id, Tween::scale_uniform(0.0, 1.0, 0.8, Easing::BackOut));
//   tweens.tick(dt, &mut scene);  // Advances all tweens, updates entity locals

use std::collections::HashMap;
use glam::{Quat, Vec3};
use crate::api::types::EntityId;
use crate::core::scene::Scene;
use super::easing::{Easing, ease, ease_vec3};

/// What property a tween animates. Values are written to `Entity.local`
/// (or the entity's tint/opacity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenTarget {
    /// Animate the local translation.
    Translation { from: Vec3, to: Vec3 },
    /// Animate the local translation's Y only.
    TranslationY { from: f32, to: f32 },
    /// Animate a rotation about the local Y axis, in radians.
    /// Angles are not wrapped, so `0 → 2π` is one full turn.
    Yaw { from: f32, to: f32 },
    /// Animate the local scale.
    Scale { from: Vec3, to: Vec3 },
    /// Animate the RGB tint.
    Tint { from: Vec3, to: Vec3 },
    /// Animate the opacity.
    Opacity { from: f32, to: f32 },
}

/// Independent animation slot on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenChannel {
    Translation,
    Rotation,
    Scale,
    Tint,
    Opacity,
}

impl TweenTarget {
    pub fn channel(&self) -> TweenChannel {
        match self {
            TweenTarget::Translation { .. } | TweenTarget::TranslationY { .. } => {
                TweenChannel::Translation
            }
            TweenTarget::Yaw { .. } => TweenChannel::Rotation,
            TweenTarget::Scale { .. } => TweenChannel::Scale,
            TweenTarget::Tint { .. } => TweenChannel::Tint,
            TweenTarget::Opacity { .. } => TweenChannel::Opacity,
        }
    }
}

/// What happens when a tween completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    /// Stop and remove the tween.
    #[default]
    Once,
    /// Restart from the beginning.
    Loop,
    /// Reverse direction (ping-pong).
    PingPong,
}

/// A single tween animation.
#[derive(Debug, Clone)]
pub struct Tween {
    pub target: TweenTarget,
    /// Duration in seconds.
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
    pub loop_mode: TweenLoop,
    /// For ping-pong: current direction (true = forward).
    forward: bool,
    /// Optional id reported through `drain_completed` when a Once tween ends.
    pub on_complete: Option<u32>,
}

impl Tween {
    pub fn new(target: TweenTarget, duration: f32, easing: Easing) -> Self {
        Self {
            target,
            duration,
            elapsed: 0.0,
            easing,
            loop_mode: TweenLoop::Once,
            forward: true,
            on_complete: None,
        }
    }

    pub fn translation(from: Vec3, to: Vec3, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Translation { from, to }, duration, easing)
    }

    pub fn translation_y(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::TranslationY { from, to }, duration, easing)
    }

    pub fn yaw(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Yaw { from, to }, duration, easing)
    }

    pub fn scale(from: Vec3, to: Vec3, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Scale { from, to }, duration, easing)
    }

    pub fn scale_uniform(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::scale(Vec3::splat(from), Vec3::splat(to), duration, easing)
    }

    pub fn tint(from: Vec3, to: Vec3, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Tint { from, to }, duration, easing)
    }

    pub fn opacity(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Opacity { from, to }, duration, easing)
    }

    // -- Builder methods --

    pub fn with_loop(mut self, mode: TweenLoop) -> Self {
        self.loop_mode = mode;
        self
    }

    pub fn with_on_complete(mut self, event_id: u32) -> Self {
        self.on_complete = Some(event_id);
        self
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// Handle to a tween for later reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u32);

/// Manages all active tweens.
#[derive(Debug, Default)]
pub struct TweenState {
    tweens: HashMap<TweenId, (EntityId, Tween)>,
    next_id: u32,
    /// Completed tween events to be polled.
    completed_events: Vec<u32>,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tween for an entity, cancelling whatever was running on the
    /// same channel of that entity. The cancelled tween never reports
    /// completion.
    pub fn add(&mut self, entity: EntityId, tween: Tween) -> TweenId {
        let channel = tween.target.channel();
        self.cancel(entity, channel);

        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.insert(id, (entity, tween));
        id
    }

    /// Cancel the tween on one channel of an entity. Returns whether one ran.
    pub fn cancel(&mut self, entity: EntityId, channel: TweenChannel) -> bool {
        let before = self.tweens.len();
        self.tweens
            .retain(|_, (e, t)| !(*e == entity && t.target.channel() == channel));
        before != self.tweens.len()
    }

    /// Remove all tweens for an entity.
    pub fn remove_entity(&mut self, entity: EntityId) {
        self.tweens.retain(|_, (e, _)| *e != entity);
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(&id).map(|(_, t)| t)
    }

    /// Whether any tween is running on the entity.
    pub fn is_animating(&self, entity: EntityId) -> bool {
        self.tweens.values().any(|(e, _)| *e == entity)
    }

    /// Advance all tweens and apply to entities in the scene.
    /// Returns the number of tweens that completed this tick.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) -> usize {
        let mut completed = Vec::new();

        for (&id, (entity_id, tween)) in self.tweens.iter_mut() {
            tween.elapsed += dt;

            let raw_t = if tween.duration > 0.0 {
                tween.elapsed / tween.duration
            } else {
                1.0
            };
            let t = if tween.forward {
                raw_t.clamp(0.0, 1.0)
            } else {
                (1.0 - raw_t).clamp(0.0, 1.0)
            };

            if let Some(entity) = scene.get_mut(*entity_id) {
                match tween.target {
                    TweenTarget::Translation { from, to } => {
                        entity.local.translation = ease_vec3(from, to, t, tween.easing);
                    }
                    TweenTarget::TranslationY { from, to } => {
                        entity.local.translation.y = ease(from, to, t, tween.easing);
                    }
                    TweenTarget::Yaw { from, to } => {
                        entity.local.rotation = Quat::from_rotation_y(ease(from, to, t, tween.easing));
                    }
                    TweenTarget::Scale { from, to } => {
                        entity.local.scale = ease_vec3(from, to, t, tween.easing);
                    }
                    TweenTarget::Tint { from, to } => {
                        entity.tint = ease_vec3(from, to, t, tween.easing);
                    }
                    TweenTarget::Opacity { from, to } => {
                        entity.opacity = ease(from, to, t, tween.easing);
                    }
                }
            }

            if tween.elapsed >= tween.duration {
                match tween.loop_mode {
                    TweenLoop::Once => {
                        if let Some(event_id) = tween.on_complete {
                            self.completed_events.push(event_id);
                        }
                        completed.push(id);
                    }
                    TweenLoop::Loop => {
                        tween.elapsed = 0.0;
                    }
                    TweenLoop::PingPong => {
                        tween.elapsed = 0.0;
                        tween.forward = !tween.forward;
                    }
                }
            }
        }

        let count = completed.len();
        for id in completed {
            self.tweens.remove(&id);
        }

        count
    }

    /// Drain completed tween events.
    pub fn drain_completed(&mut self) -> impl Iterator<Item = u32> + '_ {
        self.completed_events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
        self.completed_events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;

    fn scene_with(id: EntityId) -> Scene {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(id));
        scene
    }

    #[test]
    fn tween_scale_reaches_target_and_reports() {
        let id = EntityId(1);
        let mut scene = scene_with(id);
        let mut tweens = TweenState::new();
        tweens.add(id, Tween::scale_uniform(0.0, 2.0, 1.0, Easing::Linear).with_on_complete(9));

        tweens.tick(0.5, &mut scene);
        assert!((scene.get(id).unwrap().local.scale.x - 1.0).abs() < 1e-4);

        assert_eq!(tweens.tick(0.5, &mut scene), 1);
        assert!((scene.get(id).unwrap().local.scale.y - 2.0).abs() < 1e-4);
        assert_eq!(tweens.drain_completed().collect::<Vec<_>>(), vec![9]);
        assert!(tweens.is_empty());
    }

    #[test]
    fn yaw_full_turn_passes_through_half_turn() {
        let id = EntityId(1);
        let mut scene = scene_with(id);
        let mut tweens = TweenState::new();
        tweens.add(id, Tween::yaw(0.0, std::f32::consts::TAU, 1.0, Easing::Linear));

        tweens.tick(0.5, &mut scene);
        let forward = scene.get(id).unwrap().local.rotation * Vec3::Z;
        assert!((forward - Vec3::NEG_Z).length() < 1e-4, "{:?}", forward);
    }

    #[test]
    fn new_tween_supersedes_same_channel() {
        let id = EntityId(1);
        let mut scene = scene_with(id);
        let mut tweens = TweenState::new();
        tweens.add(id, Tween::scale_uniform(1.0, 0.0, 1.0, Easing::Linear).with_on_complete(1));
        tweens.add(id, Tween::scale_uniform(0.0, 3.0, 1.0, Easing::Linear).with_on_complete(2));
        assert_eq!(tweens.len(), 1);

        tweens.tick(1.0, &mut scene);
        assert!((scene.get(id).unwrap().local.scale.x - 3.0).abs() < 1e-4);
        assert_eq!(tweens.drain_completed().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn different_channels_run_together() {
        let id = EntityId(1);
        let mut tweens = TweenState::new();
        tweens.add(id, Tween::scale_uniform(0.0, 1.0, 1.0, Easing::Linear));
        tweens.add(id, Tween::translation_y(0.0, 1.0, 1.0, Easing::Linear));
        tweens.add(id, Tween::yaw(0.0, 1.0, 1.0, Easing::Linear));
        assert_eq!(tweens.len(), 3);
        assert!(tweens.cancel(id, TweenChannel::Rotation));
        assert!(!tweens.cancel(id, TweenChannel::Rotation));
        assert_eq!(tweens.len(), 2);
    }

    #[test]
    fn ping_pong_opacity_returns() {
        let id = EntityId(1);
        let mut scene = scene_with(id);
        let mut tweens = TweenState::new();
        tweens.add(id, Tween::opacity(1.0, 0.2, 1.0, Easing::Linear).with_loop(TweenLoop::PingPong));

        tweens.tick(1.0, &mut scene);
        assert!((scene.get(id).unwrap().opacity - 0.2).abs() < 1e-4);
        tweens.tick(1.0, &mut scene);
        assert!((scene.get(id).unwrap().opacity - 1.0).abs() < 1e-4);
        assert_eq!(tweens.len(), 1);
    }

    #[test]
    fn remove_entity_tweens() {
        let id = EntityId(1);
        let mut tweens = TweenState::new();
        tweens.add(id, Tween::tint(Vec3::ZERO, Vec3::ONE, 1.0, Easing::Linear));
        tweens.add(EntityId(2), Tween::tint(Vec3::ZERO, Vec3::ONE, 1.0, Easing::Linear));
        tweens.remove_entity(id);
        assert!(!tweens.is_animating(id));
        assert!(tweens.is_animating(EntityId(2)));
    }
}
