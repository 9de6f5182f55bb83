use std::collections::HashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Errors raised while reading the asset manifest.
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sound '{name}' has event id {id}, ids must be below 128")]
    SoundId { name: String, id: u32 },

    #[error("sound event id {id} is used by both '{first}' and '{second}'")]
    DuplicateSoundId { id: u32, first: String, second: String },

    #[error("settings section '{section}' is malformed: {source}")]
    Settings {
        section: String,
        source: serde_json::Error,
    },
}

/// Asset manifest describing the sounds, documents and tunables of a game.
/// Loaded from a JSON file at runtime; the host reads the same file to know
/// what to fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Audio assets, loaded once at startup by the host.
    #[serde(default)]
    pub sounds: HashMap<String, SoundDescriptor>,
    /// Named JSON documents the host fetches and hands to `game_load_document`.
    #[serde(default)]
    pub documents: HashMap<String, String>,
    /// Free-form per-game settings sections, e.g. `"quiz": { ... }`.
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
}

/// Describes an audio asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDescriptor {
    /// Relative path to the audio file.
    pub path: String,
    /// Numeric event ID that triggers this sound from Rust.
    #[serde(default)]
    pub event_id: Option<u32>,
    #[serde(default, rename = "loop")]
    pub looping: bool,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_volume() -> f32 {
    1.0
}

impl AssetManifest {
    /// Parse and validate a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<(), AssetError> {
        let mut seen: HashMap<u32, &str> = HashMap::new();
        let mut names: Vec<&String> = self.sounds.keys().collect();
        names.sort();
        for name in names {
            let Some(id) = self.sounds[name].event_id else { continue };
            if id >= crate::api::types::SoundEvent::STOP_FLAG {
                return Err(AssetError::SoundId { name: name.clone(), id });
            }
            if let Some(first) = seen.insert(id, name.as_str()) {
                return Err(AssetError::DuplicateSoundId {
                    id,
                    first: first.to_string(),
                    second: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Deserialize one settings section. Absent sections yield `None`.
    pub fn settings<T: DeserializeOwned>(&self, section: &str) -> Result<Option<T>, AssetError> {
        match self.settings.get(section) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|source| AssetError::Settings {
                    section: section.to_string(),
                    source,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_manifest_with_sounds() {
        let json = r#"{
            "sounds": {
                "charging": { "path": "charging.mp3", "event_id": 1, "loop": true, "volume": 0.5 },
                "correct": { "path": "correct.mp3" }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.sounds.len(), 2);

        let charging = &manifest.sounds["charging"];
        assert_eq!(charging.event_id, Some(1));
        assert!(charging.looping);
        assert_eq!(charging.volume, 0.5);

        let correct = &manifest.sounds["correct"];
        assert_eq!(correct.event_id, None);
        assert!(!correct.looping);
        assert_eq!(correct.volume, 1.0);
    }

    #[test]
    fn rejects_colliding_or_flagged_ids() {
        let json = r#"{ "sounds": {
            "a": { "path": "a.mp3", "event_id": 2 },
            "b": { "path": "b.mp3", "event_id": 2 }
        }}"#;
        assert!(matches!(
            AssetManifest::from_json(json),
            Err(AssetError::DuplicateSoundId { id: 2, .. })
        ));

        let json = r#"{ "sounds": { "a": { "path": "a.mp3", "event_id": 200 } } }"#;
        assert!(matches!(AssetManifest::from_json(json), Err(AssetError::SoundId { .. })));
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Tunables {
        speed: f32,
    }

    #[test]
    fn reads_settings_sections() {
        let json = r#"{ "settings": { "quiz": { "speed": 2.5 }, "bad": { "speed": "x" } } }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.settings::<Tunables>("quiz").unwrap(), Some(Tunables { speed: 2.5 }));
        assert_eq!(manifest.settings::<Tunables>("missing").unwrap(), None);
        assert!(manifest.settings::<Tunables>("bad").is_err());
    }

    #[test]
    fn empty_manifest_is_valid() {
        let manifest = AssetManifest::from_json("{}").unwrap();
        assert!(manifest.sounds.is_empty());
        assert!(manifest.documents.is_empty());
    }
}
