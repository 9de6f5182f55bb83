use std::collections::HashMap;
use serde::Serialize;
use crate::api::types::{AssetRequest, EntityId};
use crate::core::scene::Scene;

/// A text/image label the host must (re)build for an entity.
/// `text: None` means the entity no longer carries a label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelUpdate {
    pub id: u32,
    pub text: Option<String>,
}

/// Tracks entity labels between frames so only changes cross the bridge.
#[derive(Debug, Default)]
pub struct LabelSync {
    sent: HashMap<EntityId, String>,
    pending: Vec<LabelUpdate>,
}

impl LabelSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff the scene against what the host already has and queue updates.
    pub fn sync(&mut self, scene: &Scene) {
        let mut seen = Vec::new();
        for entity in scene.iter() {
            let Some(text) = &entity.label else { continue };
            seen.push(entity.id);
            if self.sent.get(&entity.id) != Some(text) {
                self.sent.insert(entity.id, text.clone());
                self.pending.push(LabelUpdate {
                    id: entity.id.0,
                    text: Some(text.clone()),
                });
            }
        }

        let gone: Vec<EntityId> = self
            .sent
            .keys()
            .filter(|id| !seen.contains(id))
            .copied()
            .collect();
        for id in gone {
            self.sent.remove(&id);
            self.pending.push(LabelUpdate { id: id.0, text: None });
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take queued updates as a JSON array.
    pub fn take_json(&mut self) -> String {
        let updates = std::mem::take(&mut self.pending);
        serde_json::to_string(&updates).unwrap_or_else(|e| {
            log::error!("label updates not serializable: {}", e);
            "[]".to_string()
        })
    }
}

#[derive(Serialize)]
struct RequestRecord<'a> {
    id: u32,
    path: &'a str,
}

/// Serialize pending asset requests for the host.
pub fn requests_json(requests: &[AssetRequest]) -> String {
    let records: Vec<RequestRecord> = requests
        .iter()
        .map(|r| RequestRecord { id: r.id.0, path: &r.path })
        .collect();
    serde_json::to_string(&records).unwrap_or_else(|e| {
        log::error!("asset requests not serializable: {}", e);
        "[]".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::RequestId;
    use crate::components::entity::Entity;

    #[test]
    fn only_changes_are_sent() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_label("Loading..."));
        scene.spawn(Entity::new(EntityId(2)));

        let mut sync = LabelSync::new();
        sync.sync(&scene);
        assert_eq!(sync.take_json(), r#"[{"id":1,"text":"Loading..."}]"#);

        sync.sync(&scene);
        assert!(!sync.has_pending());

        scene.set_label(EntityId(1), "c_t");
        sync.sync(&scene);
        assert_eq!(sync.take_json(), r#"[{"id":1,"text":"c_t"}]"#);
    }

    #[test]
    fn despawned_labels_are_cleared() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(4)).with_label("hi"));
        let mut sync = LabelSync::new();
        sync.sync(&scene);
        sync.take_json();

        scene.despawn(EntityId(4));
        sync.sync(&scene);
        assert_eq!(sync.take_json(), r#"[{"id":4,"text":null}]"#);
    }

    #[test]
    fn requests_serialize_as_records() {
        let requests = vec![AssetRequest { id: RequestId(3), path: "a.glb".to_string() }];
        assert_eq!(requests_json(&requests), r#"[{"id":3,"path":"a.glb"}]"#);
    }
}
