use crate::components::entity::{Entity, EntityKind};
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from a set of entities.
/// Skips inactive entities and pure `Group` nodes, and stops at `max`
/// instances (the shared buffer's capacity). Returns how many drawable
/// entities were dropped.
pub fn build_render_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    buffer: &mut RenderBuffer,
    max: usize,
) -> usize {
    buffer.clear();
    let mut dropped = 0;

    for entity in entities {
        if !entity.active || entity.kind == EntityKind::Group {
            continue;
        }
        if buffer.instances.len() >= max {
            dropped += 1;
            continue;
        }
        buffer.push(RenderInstance::from_entity(entity));
    }

    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;

    #[test]
    fn skips_groups_and_inactive() {
        let entities = vec![
            Entity::new(EntityId(1)),
            Entity::new(EntityId(2)).with_kind(EntityKind::Text),
            Entity::new(EntityId(3)).with_kind(EntityKind::Marker).inactive(),
        ];

        let mut buffer = RenderBuffer::new();
        let dropped = build_render_buffer(entities.iter(), &mut buffer, 16);
        assert_eq!(dropped, 0);
        assert_eq!(buffer.instance_count(), 1);
        assert_eq!(buffer.instances[0].entity_id, 2.0);
    }

    #[test]
    fn caps_at_capacity() {
        let entities: Vec<Entity> = (1..=5)
            .map(|i| Entity::new(EntityId(i)).with_kind(EntityKind::Marker))
            .collect();
        let mut buffer = RenderBuffer::new();
        let dropped = build_render_buffer(entities.iter(), &mut buffer, 3);
        assert_eq!(buffer.instance_count(), 3);
        assert_eq!(dropped, 2);
    }
}
