use std::collections::HashMap;
use crate::api::types::SoundEvent;
use crate::assets::manifest::AssetManifest;

/// Registry of named sounds, built from an AssetManifest.
/// Lets game code emit sounds by name instead of by numeric id.
#[derive(Debug, Default)]
pub struct SoundRegistry {
    sounds: HashMap<String, SoundEvent>,
}

impl SoundRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a parsed AssetManifest. Sounds without an
    /// `event_id` are host-only and not registered.
    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let sounds = manifest
            .sounds
            .iter()
            .filter_map(|(name, desc)| desc.event_id.map(|id| (name.clone(), SoundEvent(id))))
            .collect();
        Self { sounds }
    }

    /// Look up a sound by name. Returns None if not found.
    pub fn get(&self, name: &str) -> Option<SoundEvent> {
        self.sounds.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}
