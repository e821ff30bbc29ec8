//! Dialogue module - interactors, NPC conversations and looping chatter.

mod audio;
mod interactor;
mod library;
mod looper;
mod npc_interactor;
mod plugin;
mod sequence;

pub use interactor::Interactor;
pub use library::{DialogueLibrary, DialogueSequenceDef, DIALOGUE_DIR};
pub use looper::{ChatRun, DialogueLooper, SetChatEnabled};
pub use npc_interactor::{DialoguePlayback, NpcDialogue};
pub use plugin::{DialogueAssetsPlugin, DialoguePlugin};
pub use sequence::{
    effective_step_seconds, DialogueSequence, DialogueStep, SequenceIssue, SpriteSnapshot, MIN_FALLBACK_DURATION,
};
