// extensions/transform.rs
//
// Transform hierarchy extension — tracks parent-child relationships by EntityId.
// Entities keep their own local transform; the graph only knows who hangs under whom.
//
// Usage:
//   let mut graph = TransformGraph::new();
//   graph.set_parent(model_id, Some(anchor_id));
//   graph.propagate(&mut scene);  // Writes Entity.world from the local chain

use std::collections::HashMap;
use glam::{Quat, Vec3};
use crate::api::types::EntityId;
use crate::core::scene::Scene;

/// Translation, rotation and non-uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, ..Self::IDENTITY }
    }

    pub fn from_translation_rotation(translation: Vec3, rotation: Quat) -> Self {
        Self { translation, rotation, scale: Vec3::ONE }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Compose `child` (expressed in this transform's space) into world space.
    pub fn mul_transform(&self, child: &Transform) -> Transform {
        Transform {
            translation: self.translation + self.rotation * (self.scale * child.translation),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }

    /// Map a local point into this transform's parent space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * point)
    }
}

#[derive(Debug, Clone, Default)]
struct TransformNode {
    parent: Option<EntityId>,
    children: Vec<EntityId>,
}

/// Transform hierarchy graph — manages parent-child relationships.
///
/// Exists separately from Scene to maintain clean architecture.
/// Games that need hierarchy create this alongside their Scene.
#[derive(Debug, Default)]
pub struct TransformGraph {
    nodes: HashMap<EntityId, TransformNode>,
    /// Entities with no parent (top-level).
    roots: Vec<EntityId>,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity as a root.
    pub fn register(&mut self, id: EntityId) {
        self.nodes.entry(id).or_default();
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
    }

    /// Set the parent of an entity. Pass `None` to make it a root.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) {
        if parent == Some(child) {
            log::warn!("refusing to parent {:?} to itself", child);
            return;
        }
        self.nodes.entry(child).or_default();
        if let Some(p) = parent {
            self.nodes.entry(p).or_default();
            if !self.roots.contains(&p) && self.get_parent(p).is_none() {
                self.roots.push(p);
            }
        }

        if let Some(old_parent) = self.nodes.get(&child).and_then(|n| n.parent) {
            if let Some(old_node) = self.nodes.get_mut(&old_parent) {
                old_node.children.retain(|&c| c != child);
            }
        }

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = parent;
        }

        match parent {
            Some(p) => {
                if let Some(parent_node) = self.nodes.get_mut(&p) {
                    if !parent_node.children.contains(&child) {
                        parent_node.children.push(child);
                    }
                }
                self.roots.retain(|&r| r != child);
            }
            None => {
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
        }
    }

    pub fn get_parent(&self, id: EntityId) -> Option<EntityId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn get_children(&self, id: EntityId) -> Option<&[EntityId]> {
        self.nodes.get(&id).map(|n| n.children.as_slice())
    }

    /// Remove an entity and its whole subtree from the hierarchy.
    /// Returns the removed ids (root first) so the caller can despawn them.
    pub fn remove_subtree(&mut self, id: EntityId) -> Vec<EntityId> {
        let parent = self.get_parent(id);

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children.iter().copied());
                removed.push(current);
            }
        }

        if let Some(parent_node) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent_node.children.retain(|&c| c != id);
        }
        self.roots.retain(|r| !removed.contains(r));
        removed
    }

    /// Compute world transforms from the local chain, roots first.
    pub fn propagate(&self, scene: &mut Scene) {
        for &root in &self.roots {
            self.propagate_recursive(root, Transform::IDENTITY, scene);
        }
    }

    fn propagate_recursive(&self, id: EntityId, parent_world: Transform, scene: &mut Scene) {
        let Some(node) = self.nodes.get(&id) else { return };

        let world = match scene.get_mut(id) {
            Some(entity) => {
                entity.world = parent_world.mul_transform(&entity.local);
                entity.world
            }
            None => return,
        };

        for &child in &node.children {
            self.propagate_recursive(child, world, scene);
        }
    }

    /// Number of entities in the hierarchy.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }
}
