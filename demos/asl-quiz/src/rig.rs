use fingerspell_engine::*;

/// Scene hierarchy plus animation state for the quiz visuals.
/// Every entity the quiz draws goes through here so that tweened locals
/// always reach the world transforms the host reads.
#[derive(Debug, Default)]
pub struct Rig {
    pub graph: TransformGraph,
    pub tweens: TweenState,
}

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an entity under `parent` (or as a root).
    pub fn spawn(
        &mut self,
        ctx: &mut EngineContext,
        parent: Option<EntityId>,
        build: impl FnOnce(Entity) -> Entity,
    ) -> EntityId {
        let id = ctx.spawn(build);
        self.graph.register(id);
        if parent.is_some() {
            self.graph.set_parent(id, parent);
        }
        id
    }

    /// Despawn an entity with its children and their tweens.
    pub fn despawn(&mut self, ctx: &mut EngineContext, id: EntityId) {
        for removed in self.graph.remove_subtree(id) {
            self.tweens.remove_entity(removed);
            ctx.scene.despawn(removed);
        }
    }

    /// Advance tweens and recompute world transforms. Returns the
    /// completion ids reported this frame.
    pub fn tick(&mut self, ctx: &mut EngineContext) -> Vec<u32> {
        self.tweens.tick(ctx.dt, &mut ctx.scene);
        self.graph.propagate(&mut ctx.scene);
        self.tweens.drain_completed().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn children_follow_parent() {
        let mut ctx = EngineContext::new();
        let mut rig = Rig::new();
        let root = rig.spawn(&mut ctx, None, |e| e.with_translation(Vec3::new(1.0, 0.0, 0.0)));
        let child = rig.spawn(&mut ctx, Some(root), |e| {
            e.with_kind(EntityKind::Marker).with_translation(Vec3::new(0.0, 2.0, 0.0))
        });

        rig.tick(&mut ctx);
        let world = ctx.scene.get(child).unwrap().world.translation;
        assert!((world - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn despawn_takes_subtree_and_tweens() {
        let mut ctx = EngineContext::new();
        let mut rig = Rig::new();
        let root = rig.spawn(&mut ctx, None, |e| e);
        let child = rig.spawn(&mut ctx, Some(root), |e| e);
        rig.tweens.add(child, Tween::opacity(1.0, 0.0, 1.0, Easing::Linear));

        rig.despawn(&mut ctx, root);
        assert!(ctx.scene.is_empty());
        assert!(rig.graph.is_empty());
        assert!(rig.tweens.is_empty());
    }
}
