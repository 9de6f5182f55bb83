use crate::api::types::EntityId;
use crate::components::entity::{Entity, EntityKind};

/// Simple entity storage using a flat Vec.
/// An XR quiz holds tens of entities, so linear lookups are fine.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(64),
        }
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        if self.get(id).is_some() {
            log::warn!("entity {:?} spawned twice; replacing", id);
            self.despawn(id);
        }
        self.entities.push(entity);
        id
    }

    /// Remove an entity by ID. Returns the removed entity if found.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    /// Show or hide an entity. Returns false if it does not exist.
    pub fn set_active(&mut self, id: EntityId, active: bool) -> bool {
        match self.get_mut(id) {
            Some(entity) => {
                entity.active = active;
                true
            }
            None => false,
        }
    }

    /// Replace the text/image label of an entity.
    pub fn set_label(&mut self, id: EntityId, label: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(entity) => {
                entity.label = Some(label.into());
                true
            }
            None => false,
        }
    }

    /// Label of an entity, if it has one.
    pub fn label(&self, id: EntityId) -> Option<&str> {
        self.get(id).and_then(|e| e.label.as_deref())
    }

    /// Count entities of a kind (models, markers, ...).
    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn spawn_get_and_despawn() {
        let mut scene = Scene::new();
        let id = scene.spawn(Entity::new(EntityId(7)).with_translation(Vec3::new(0.0, 1.0, 0.0)));
        assert_eq!(scene.get(id).unwrap().local.translation.y, 1.0);
        assert!(scene.despawn(id).is_some());
        assert!(scene.despawn(id).is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn double_spawn_replaces() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("old"));
        scene.spawn(Entity::new(EntityId(1)).with_tag("new"));
        assert_eq!(scene.len(), 1);
        assert!(scene.find_by_tag("new").is_some());
    }

    #[test]
    fn labels_and_visibility() {
        let mut scene = Scene::new();
        let id = scene.spawn(Entity::new(EntityId(1)).with_kind(EntityKind::Text));
        assert!(scene.set_label(id, "L_MP"));
        assert_eq!(scene.label(id), Some("L_MP"));
        assert!(scene.set_active(id, false));
        assert!(!scene.get(id).unwrap().active);
        assert!(!scene.set_label(EntityId(99), "nope"));
        assert_eq!(scene.count_kind(EntityKind::Text), 1);
    }
}
