use glam::{Quat, Vec3};
use fingerspell_engine::*;
use crate::rig::Rig;

const ENLARGED: f32 = 0.25;
const SHRUNK: f32 = 0.05;

/// Chart size for a wrist orientation: enlarged while the hand's local +X
/// points upwards (palm turned towards the face), small otherwise.
pub fn chart_scale(wrist: Quat) -> f32 {
    let side = wrist * Vec3::X;
    if side.normalize_or_zero().dot(Vec3::Y) > 0.1 {
        ENLARGED
    } else {
        SHRUNK
    }
}

/// ASL alphabet chart carried on one hand.
#[derive(Debug)]
pub struct ReferenceChart {
    image: EntityId,
    hand: Handedness,
}

impl ReferenceChart {
    pub fn new(rig: &mut Rig, ctx: &mut EngineContext, hand: Handedness, path: &str) -> Self {
        let image = rig.spawn(ctx, None, |e| {
            e.with_tag("chart")
                .with_kind(EntityKind::Image)
                .with_label(path)
                .with_scale(Vec3::ZERO)
                .inactive()
        });
        Self { image, hand }
    }

    pub fn entity(&self) -> EntityId {
        self.image
    }

    pub fn set_image(&self, ctx: &mut EngineContext, path: &str) {
        ctx.scene.set_label(self.image, path);
    }

    pub fn set_hand(&mut self, hand: Handedness) {
        self.hand = hand;
    }

    /// Follow the wrist; hidden while the hand is not tracked.
    pub fn update(&self, ctx: &mut EngineContext, frame: &XrFrame) {
        let Some(entity) = ctx.scene.get_mut(self.image) else { return };
        match frame.hand(self.hand) {
            Some(skeleton) => {
                let wrist = skeleton.wrist();
                entity.active = true;
                entity.local.translation = wrist.position;
                entity.local.rotation = wrist.orientation;
                entity.local.scale = Vec3::splat(chart_scale(wrist.orientation));
            }
            None => entity.active = false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn palm_up_enlarges() {
        assert_eq!(chart_scale(Quat::IDENTITY), SHRUNK);
        // +X rolled onto +Y.
        assert_eq!(chart_scale(Quat::from_rotation_z(FRAC_PI_2)), ENLARGED);
        assert_eq!(chart_scale(Quat::from_rotation_z(-FRAC_PI_2)), SHRUNK);
    }

    #[test]
    fn follows_tracked_hand_only() {
        let mut ctx = EngineContext::new();
        let mut rig = Rig::new();
        let chart = ReferenceChart::new(&mut rig, &mut ctx, Handedness::Left, "img/asl_signs.png");
        let mut frame = XrFrame::new();

        chart.update(&mut ctx, &frame);
        assert!(!ctx.scene.get(chart.entity()).unwrap().active);

        let wrist = Pose::new(Vec3::new(0.2, 1.1, -0.3), Quat::from_rotation_z(FRAC_PI_2));
        frame.set_hand(Handedness::Left, Some(HandSkeleton::new([wrist; JOINT_COUNT])));
        chart.update(&mut ctx, &frame);
        let entity = ctx.scene.get(chart.entity()).unwrap();
        assert!(entity.active);
        assert_eq!(entity.local.translation, wrist.position);
        assert_eq!(entity.local.scale, Vec3::splat(ENLARGED));
        assert_eq!(ctx.scene.label(chart.entity()), Some("img/asl_signs.png"));
    }
}
