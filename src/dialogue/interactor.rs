//! Range-gated interaction volumes.
//!
//! An interactor watches its trigger volume for the player. While the
//! player is inside, pressing interact sends `Interacted`, and optionally
//! requests a scene change.

use bevy::prelude::*;

use crate::core::{
    has_tag, ActorTag, AnimatorParams, Interacted, LoadScene, SceneRef, Suspended, TriggerEntered, TriggerExited,
    PLAYER_TAG,
};
use crate::player::interact_just_pressed;

/// Interaction volume placed on an entity with a sensor collider.
#[derive(Component, Debug, Clone, Default)]
pub struct Interactor {
    /// Prompt shown the first time the player walks into range
    pub prompt: Option<Entity>,
    /// Animation target receiving `bool_to_control` on enter/exit
    pub animator: Option<Entity>,
    pub bool_to_control: Option<String>,
    pub bool_on_entry: bool,
    pub bool_on_exit: bool,
    /// Scene requested when the player interacts
    pub scene_on_interact: Option<SceneRef>,
    player_in_range: Option<Entity>,
    prompt_shown: bool,
}

impl Interactor {
    pub fn with_prompt(prompt: Entity) -> Self {
        Self {
            prompt: Some(prompt),
            ..default()
        }
    }

    pub fn player_in_range(&self) -> Option<Entity> {
        self.player_in_range
    }

    fn write_bool(&self, animators: &mut Query<&mut AnimatorParams>, value: bool) {
        let (Some(name), Some(animator)) = (self.bool_to_control.as_deref(), self.animator) else {
            return;
        };
        if let Ok(mut params) = animators.get_mut(animator) {
            params.set_bool(name, value);
        }
    }
}

/// Track the player entering and leaving interactor volumes.
pub fn track_interactor_range(
    mut entered: EventReader<TriggerEntered>,
    mut exited: EventReader<TriggerExited>,
    tags: Query<&ActorTag>,
    mut interactors: Query<&mut Interactor>,
    mut animators: Query<&mut AnimatorParams>,
) {
    for event in entered.read() {
        let Ok(mut interactor) = interactors.get_mut(event.volume) else {
            continue;
        };
        if !has_tag(&tags, event.other, PLAYER_TAG) {
            continue;
        }
        interactor.player_in_range = Some(event.other);
        interactor.write_bool(&mut animators, interactor.bool_on_entry);
    }

    for event in exited.read() {
        let Ok(mut interactor) = interactors.get_mut(event.volume) else {
            continue;
        };
        if !has_tag(&tags, event.other, PLAYER_TAG) {
            continue;
        }
        interactor.player_in_range = None;
        interactor.write_bool(&mut animators, interactor.bool_on_exit);
    }
}

/// Hide prompts out of range; show each prompt on the first approach only.
pub fn update_interaction_prompts(
    mut interactors: Query<&mut Interactor>,
    mut prompts: Query<&mut Visibility>,
) {
    for mut interactor in interactors.iter_mut() {
        let Some(prompt) = interactor.prompt else {
            continue;
        };
        let Ok(mut visibility) = prompts.get_mut(prompt) else {
            continue;
        };

        if interactor.player_in_range.is_none() {
            visibility.set_if_neq(Visibility::Hidden);
        } else if !interactor.prompt_shown {
            *visibility = Visibility::Inherited;
            interactor.prompt_shown = true;
        }
    }
}

/// Send `Interacted` for every active interactor the player stands in.
pub fn fire_interactions(
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    interactors: Query<(Entity, &Interactor), Without<Suspended>>,
    mut interacted: EventWriter<Interacted>,
    mut load_scene: EventWriter<LoadScene>,
) {
    if !interact_just_pressed(&keyboard, &gamepads) {
        return;
    }

    for (entity, interactor) in interactors.iter() {
        let Some(player) = interactor.player_in_range else {
            continue;
        };
        interacted.send(Interacted {
            interactor: entity,
            player,
        });
        if let Some(scene) = &interactor.scene_on_interact {
            load_scene.send(LoadScene(scene.clone()));
        }
    }
}
