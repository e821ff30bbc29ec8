//! Scenes module - scene list, transitions, menus and scene content.

mod content;
mod fader;
mod menu;
mod plugin;
mod registry;
mod scroll;

pub use content::spawn_scene_content;
pub use fader::{ScreenFader, StartFade};
pub use menu::{MenuAction, PauseMenu, FIRST_LEVEL};
pub use plugin::ScenesPlugin;
pub use registry::{ActiveScene, SceneEntered, SceneEntity, SceneListFile, SceneRegistry, SCENES_PATH};
pub use scroll::TextureScroll;
