//! Scene list and scene switching.
//!
//! A scene is just a name in `assets/data/scenes.ron`. Switching despawns
//! everything tagged [`SceneEntity`] and announces the new scene with
//! [`SceneEntered`]; whoever builds scene content listens for that.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

use crate::core::{DataLoadError, LoadScene, SceneRef};

/// Path of the ordered scene list, relative to the working directory.
pub const SCENES_PATH: &str = "assets/data/scenes.ron";

/// Scene list file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneListFile {
    pub scenes: Vec<String>,
}

/// Ordered scene names; a scene's index is its position.
#[derive(Resource, Debug, Clone, Default)]
pub struct SceneRegistry {
    names: Vec<String>,
}

impl SceneRegistry {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_ron(path: &str, contents: &str) -> Result<Self, DataLoadError> {
        let file: SceneListFile = DataLoadError::parse(path, contents)?;
        Ok(Self::new(file.scenes))
    }

    /// Resolve a reference to `(index, name)`.
    pub fn resolve(&self, scene: &SceneRef) -> Result<(usize, &str), DataLoadError> {
        let found = match scene {
            SceneRef::Index(index) => self.names.get(*index).map(|name| (*index, name.as_str())),
            SceneRef::Name(name) => self
                .names
                .iter()
                .position(|n| n == name)
                .map(|index| (index, self.names[index].as_str())),
        };
        found.ok_or_else(|| DataLoadError::UnknownScene(scene.to_string()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The scene currently shown.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveScene {
    pub index: Option<usize>,
    pub name: String,
}

/// Marks entities owned by the current scene; they are despawned on switch.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct SceneEntity;

/// Sent after a scene switch, once the old scene's entities are gone.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SceneEntered {
    pub index: usize,
    pub name: String,
}

/// Load the scene list at startup.
pub fn load_scene_registry(mut commands: Commands) {
    let registry = DataLoadError::read(Path::new(SCENES_PATH))
        .and_then(|contents| SceneRegistry::from_ron(SCENES_PATH, &contents));

    match registry {
        Ok(registry) => {
            info!("Loaded {} scene(s) from {}", registry.len(), SCENES_PATH);
            commands.insert_resource(registry);
        }
        Err(e) => {
            error!("Failed to load scene list: {}", e);
        }
    }
}

/// Switch scenes on request. Only the last valid request of a frame wins.
pub fn apply_scene_requests(
    mut commands: Commands,
    mut requests: EventReader<LoadScene>,
    registry: Res<SceneRegistry>,
    mut active: ResMut<ActiveScene>,
    owned: Query<Entity, With<SceneEntity>>,
    mut entered: EventWriter<SceneEntered>,
) {
    let mut target = None;
    for LoadScene(scene) in requests.read() {
        match registry.resolve(scene) {
            Ok((index, name)) => target = Some((index, name.to_string())),
            Err(e) => warn!("Ignoring scene request: {}", e),
        }
    }
    let Some((index, name)) = target else {
        return;
    };

    for entity in owned.iter() {
        commands.entity(entity).despawn_recursive();
    }
    info!("Entering scene {} ({})", name, index);
    *active = ActiveScene {
        index: Some(index),
        name: name.clone(),
    };
    entered.send(SceneEntered { index, name });
}
