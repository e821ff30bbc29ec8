//! Dialogue sequence data loaded from RON files.

use bevy::prelude::*;
use bevy_kira_audio::AudioSource as KiraAudioSource;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::sequence::DialogueSequence;
use crate::core::DataLoadError;

/// Directory holding one `<id>.ron` file per sequence.
pub const DIALOGUE_DIR: &str = "assets/data/dialogue";

fn default_fallback_duration() -> f32 {
    1.0
}

/// Sequence as authored on disk, with asset paths instead of handles.
#[derive(Deserialize, Clone, Debug)]
pub struct DialogueSequenceDef {
    pub npc_sprites: Vec<Option<String>>,
    pub player_sprites: Vec<Option<String>>,
    pub durations: Vec<f32>,
    #[serde(default = "default_fallback_duration")]
    pub fallback_duration: f32,
    #[serde(default)]
    pub beat_sound: Option<String>,
}

impl DialogueSequenceDef {
    pub fn from_ron(path: &str, contents: &str) -> Result<Self, DataLoadError> {
        DataLoadError::parse(path, contents)
    }

    /// Turn paths into handles. Empty paths count as "no sprite".
    pub fn resolve(
        self,
        mut load_image: impl FnMut(&str) -> Handle<Image>,
        mut load_sound: impl FnMut(&str) -> Handle<KiraAudioSource>,
    ) -> DialogueSequence {
        let mut lane = |paths: Vec<Option<String>>| -> Vec<Option<Handle<Image>>> {
            paths
                .into_iter()
                .map(|path| path.filter(|p| !p.is_empty()).map(|p| load_image(&p)))
                .collect()
        };
        let npc_sprites = lane(self.npc_sprites);
        let player_sprites = lane(self.player_sprites);

        DialogueSequence {
            npc_sprites,
            player_sprites,
            durations: self.durations,
            fallback_duration: self.fallback_duration,
            beat_sound: self.beat_sound.filter(|p| !p.is_empty()).map(|p| load_sound(&p)),
        }
    }
}

/// Resource holding every dialogue sequence, keyed by file stem.
#[derive(Resource, Default)]
pub struct DialogueLibrary {
    sequences: HashMap<String, DialogueSequence>,
}

impl DialogueLibrary {
    pub fn get(&self, id: &str) -> Option<&DialogueSequence> {
        self.sequences.get(id)
    }

    /// Add a sequence, warning about authoring problems and correcting
    /// the ones that would stall playback.
    pub fn insert(&mut self, id: impl Into<String>, sequence: DialogueSequence) {
        let id = id.into();
        for issue in sequence.issues() {
            warn!("Dialogue sequence '{}': {}", id, issue);
        }
        self.sequences.insert(id, sequence.sanitized());
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

/// Load all sequences from the assets/data/dialogue/ directory.
pub fn load_dialogue_library(mut library: ResMut<DialogueLibrary>, asset_server: Res<AssetServer>) {
    let dialogue_dir = Path::new(DIALOGUE_DIR);

    if !dialogue_dir.exists() {
        warn!("Dialogue directory not found: {:?}", dialogue_dir);
        return;
    }

    let Ok(entries) = fs::read_dir(dialogue_dir) else {
        warn!("Failed to read dialogue directory");
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if !path.extension().is_some_and(|ext| ext == "ron") {
            continue;
        }

        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let def = DataLoadError::read(&path)
            .and_then(|contents| DialogueSequenceDef::from_ron(&path.display().to_string(), &contents));

        match def {
            Ok(def) => {
                let sequence = def.resolve(|p| asset_server.load(p.to_string()), |p| asset_server.load(p.to_string()));
                info!("Loaded dialogue sequence: {} ({} steps)", id, sequence.step_count());
                library.insert(id, sequence);
            }
            Err(e) => {
                error!("Failed to load dialogue sequence {:?}: {}", path, e);
            }
        }
    }

    info!("Loaded {} dialogue sequence(s)", library.len());
}
