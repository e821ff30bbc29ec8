//! Core gameplay module - states, events, trigger dispatch and shared components.
//!
//! Every other plugin builds on the pieces defined here.

mod animator;
mod config;
mod error;
mod events;
mod plugin;
mod states;
mod tags;
mod triggers;
mod tween;

pub use animator::AnimatorParams;
pub use config::{load_gameplay_config, GameplayConfig};
pub use error::DataLoadError;
pub use events::*;
pub use plugin::{CorePlugin, GameplaySet};
pub use states::GameState;
pub use tags::{has_tag, ActorTag, Suspended, NPC_TAG, PLAYER_TAG};
pub use triggers::dispatch_trigger_events;
pub use tween::{update_smooth_translations, Easing, SmoothTranslation};
