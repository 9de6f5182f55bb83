use glam::Vec3;
use fingerspell_engine::*;
use crate::rig::Rig;

const BAR_WIDTH: f32 = 0.3;
const BAR_HEIGHT: f32 = 0.03;
const BAR_DEPTH: f32 = 0.005;
const TICK_DEPTH: f32 = 0.001;

// #3e3e3e
const BACKDROP_COLOR: Vec3 = Vec3::splat(0.243);

/// One tick per question on a dark backdrop. Ticks of answered questions sit
/// flush with the front face; the rest are sunk into the backdrop.
#[derive(Debug)]
pub struct ProgressBar {
    root: EntityId,
    ticks: Vec<EntityId>,
    answered: usize,
}

impl ProgressBar {
    pub fn new(rig: &mut Rig, ctx: &mut EngineContext, anchor: EntityId, offset: Vec3, total: usize) -> Self {
        let root = rig.spawn(ctx, Some(anchor), |e| e.with_tag("progress").with_translation(offset));
        rig.spawn(ctx, Some(root), |e| {
            e.with_kind(EntityKind::Panel)
                .with_scale(Vec3::new(BAR_WIDTH, BAR_HEIGHT, BAR_DEPTH))
                .with_tint(BACKDROP_COLOR)
        });

        let total = total.max(1);
        let tick_width = BAR_WIDTH / total as f32 / 2.0;
        let ticks = (0..total)
            .map(|i| {
                let x = -BAR_WIDTH / 2.0 + tick_width + 2.0 * tick_width * i as f32;
                rig.spawn(ctx, Some(root), |e| {
                    e.with_kind(EntityKind::Panel)
                        .with_translation(Vec3::new(x, 0.0, Self::tick_z(false)))
                        .with_scale(Vec3::new(tick_width, BAR_HEIGHT / 2.0, TICK_DEPTH))
                })
            })
            .collect();

        Self { root, ticks, answered: 0 }
    }

    fn tick_z(raised: bool) -> f32 {
        if raised {
            BAR_DEPTH / 2.0
        } else {
            0.0
        }
    }

    pub fn root(&self) -> EntityId {
        self.root
    }

    pub fn answered(&self) -> usize {
        self.answered
    }

    /// Raise the first `count` ticks.
    pub fn set_answered(&mut self, ctx: &mut EngineContext, count: usize) {
        self.answered = count.min(self.ticks.len());
        for (i, &tick) in self.ticks.iter().enumerate() {
            if let Some(entity) = ctx.scene.get_mut(tick) {
                entity.local.translation.z = Self::tick_z(i < self.answered);
            }
        }
    }

    pub fn ticks(&self) -> &[EntityId] {
        &self.ticks
    }
}
