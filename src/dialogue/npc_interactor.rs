//! NPC conversations played as timed sprite beats.
//!
//! Interacting with an NPC freezes the listed behaviours (usually player
//! movement), swaps the speaker sprites beat by beat, then puts everything
//! back. Playback is `Idle -> Playing -> Idle`; `Playing` is the presence of
//! a `DialoguePlayback` component.

use bevy::prelude::*;

use super::interactor::Interactor;
use super::library::DialogueLibrary;
use super::sequence::{effective_step_seconds, show_step, DialogueSequence, RenderTargets, SpriteSnapshot};
use crate::core::{DialogueBeat, DialogueFinished, DialogueStarted, GameplayConfig, Interacted, Suspended};

/// Conversation attached to an interactor.
#[derive(Component, Debug, Clone)]
#[require(Interactor)]
pub struct NpcDialogue {
    /// Id of the sequence in the `DialogueLibrary`
    pub sequence: Option<String>,
    pub npc_renderer: Option<Entity>,
    pub player_renderer: Option<Entity>,
    /// Entities suspended while the conversation plays
    pub disable_during_dialogue: Vec<Entity>,
    /// Put the original sprites back when the conversation ends
    pub restore_original_sprites: bool,
    /// Ignore interact presses while playing; otherwise a press restarts
    pub block_reentry_while_playing: bool,
    pub speed_multiplier: f32,
}

impl Default for NpcDialogue {
    fn default() -> Self {
        Self {
            sequence: None,
            npc_renderer: None,
            player_renderer: None,
            disable_during_dialogue: Vec::new(),
            restore_original_sprites: true,
            block_reentry_while_playing: true,
            speed_multiplier: 1.0,
        }
    }
}

impl NpcDialogue {
    pub fn new(sequence: impl Into<String>) -> Self {
        Self {
            sequence: Some(sequence.into()),
            ..default()
        }
    }
}

/// A conversation in progress.
#[derive(Component, Debug)]
pub struct DialoguePlayback {
    sequence_id: String,
    sequence: DialogueSequence,
    step: usize,
    timer: Timer,
    npc_original: Option<SpriteSnapshot>,
    player_original: Option<SpriteSnapshot>,
}

impl DialoguePlayback {
    /// Index of the beat currently shown.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn sequence_id(&self) -> &str {
        &self.sequence_id
    }

    fn beat_timer(&self, dialogue: &NpcDialogue, config: &GameplayConfig) -> Timer {
        let seconds = effective_step_seconds(
            self.sequence.duration_at(self.step),
            config.min_step_seconds,
            dialogue.speed_multiplier,
        );
        Timer::from_seconds(seconds, TimerMode::Once)
    }

    /// Show the current beat and arm its timer. Returns false when the
    /// sequence has no beat at this index.
    fn show_current(
        &mut self,
        source: Entity,
        dialogue: &NpcDialogue,
        config: &GameplayConfig,
        targets: &mut RenderTargets,
        beats: &mut EventWriter<DialogueBeat>,
    ) -> bool {
        let Some(step) = self.sequence.step(self.step) else {
            return false;
        };
        show_step(targets, dialogue.npc_renderer, dialogue.player_renderer, &step);
        self.timer = self.beat_timer(dialogue, config);
        beats.send(DialogueBeat {
            source,
            sequence: self.sequence_id.clone(),
            step: self.step,
        });
        true
    }
}

fn set_suspended(commands: &mut Commands, entities: &[Entity], suspended: bool) {
    for &entity in entities {
        let Some(mut entity_commands) = commands.get_entity(entity) else {
            continue;
        };
        if suspended {
            entity_commands.insert(Suspended);
        } else {
            entity_commands.remove::<Suspended>();
        }
    }
}

/// Start (or restart) conversations on interaction.
#[allow(clippy::too_many_arguments)]
pub fn start_npc_dialogue(
    mut commands: Commands,
    mut interacted: EventReader<Interacted>,
    library: Res<DialogueLibrary>,
    config: Res<GameplayConfig>,
    mut dialogues: Query<(&NpcDialogue, Option<&mut DialoguePlayback>), Without<Suspended>>,
    mut targets: RenderTargets,
    mut started: EventWriter<DialogueStarted>,
    mut beats: EventWriter<DialogueBeat>,
) {
    for event in interacted.read() {
        let Ok((dialogue, playback)) = dialogues.get_mut(event.interactor) else {
            continue;
        };
        let Some(sequence_id) = dialogue.sequence.as_deref() else {
            continue;
        };
        let Some(sequence) = library.get(sequence_id) else {
            warn!("Dialogue sequence '{}' not found, ignoring interaction", sequence_id);
            continue;
        };

        if let Some(mut playback) = playback {
            if dialogue.block_reentry_while_playing {
                debug!("Dialogue '{}' already playing, re-entry blocked", sequence_id);
                continue;
            }
            debug!("Restarting dialogue '{}'", sequence_id);
            playback.step = 0;
            playback.sequence = sequence.clone();
            started.send(DialogueStarted {
                interactor: event.interactor,
            });
            playback.show_current(event.interactor, dialogue, &config, &mut targets, &mut beats);
            continue;
        }

        let mut playback = DialoguePlayback {
            sequence_id: sequence_id.to_string(),
            sequence: sequence.clone(),
            step: 0,
            timer: Timer::default(),
            npc_original: SpriteSnapshot::capture(&targets, dialogue.npc_renderer),
            player_original: SpriteSnapshot::capture(&targets, dialogue.player_renderer),
        };

        set_suspended(&mut commands, &dialogue.disable_during_dialogue, true);
        started.send(DialogueStarted {
            interactor: event.interactor,
        });
        debug!("Starting dialogue '{}' ({} steps)", sequence_id, playback.sequence.step_count());

        playback.show_current(event.interactor, dialogue, &config, &mut targets, &mut beats);
        commands.entity(event.interactor).insert(playback);
    }
}

/// Advance playing conversations; finish them after the last beat.
pub fn advance_npc_dialogue(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameplayConfig>,
    mut dialogues: Query<(Entity, &NpcDialogue, &mut DialoguePlayback), Without<Suspended>>,
    mut targets: RenderTargets,
    mut finished: EventWriter<DialogueFinished>,
    mut beats: EventWriter<DialogueBeat>,
) {
    for (entity, dialogue, mut playback) in dialogues.iter_mut() {
        // An empty sequence has no beat to wait on
        if playback.step < playback.sequence.step_count() {
            playback.timer.tick(time.delta());
            if !playback.timer.finished() {
                continue;
            }
            playback.step += 1;
            if playback.show_current(entity, dialogue, &config, &mut targets, &mut beats) {
                continue;
            }
        }

        if dialogue.restore_original_sprites {
            if let Some(original) = &playback.npc_original {
                original.restore(&mut targets, dialogue.npc_renderer);
            }
            if let Some(original) = &playback.player_original {
                original.restore(&mut targets, dialogue.player_renderer);
            }
        }

        set_suspended(&mut commands, &dialogue.disable_during_dialogue, false);
        finished.send(DialogueFinished { interactor: entity });
        debug!("Dialogue '{}' finished", playback.sequence_id);
        commands.entity(entity).remove::<DialoguePlayback>();
    }
}

/// Suspending a playing interactor aborts its conversation on the spot.
///
/// Nothing is restored and the disabled behaviours stay disabled.
pub fn abort_suspended_dialogue(
    mut commands: Commands,
    aborted: Query<(Entity, &DialoguePlayback), With<Suspended>>,
) {
    for (entity, playback) in aborted.iter() {
        warn!("Dialogue '{}' aborted at step {}", playback.sequence_id, playback.step);
        commands.entity(entity).remove::<DialoguePlayback>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ActorTag;
    use crate::dialogue::sequence::tests::{image, uniform_sequence};
    use crate::dialogue::DialoguePlugin;
    use crate::testing::{advance, app_with, enter, record, recorded, tap};

    struct Fixture {
        app: App,
        npc: Entity,
        npc_renderer: Entity,
        player_renderer: Entity,
        player: Entity,
    }

    /// NPC with a two-beat conversation: 0.5 s then 0.3 s.
    fn scene(configure: impl FnOnce(&mut NpcDialogue)) -> Fixture {
        let mut app = app_with(DialoguePlugin);
        record::<DialogueStarted>(&mut app);
        record::<DialogueFinished>(&mut app);

        let mut sequence = uniform_sequence(2, 0.5);
        sequence.durations[1] = 0.3;
        app.world_mut().resource_mut::<DialogueLibrary>().insert("chat", sequence);

        let world = app.world_mut();
        let player = world.spawn(ActorTag::player()).id();
        let npc_renderer = world
            .spawn((Sprite::from_image(image(1)), Visibility::Hidden))
            .id();
        let player_renderer = world
            .spawn((Sprite::from_image(image(2)), Visibility::Inherited))
            .id();

        let mut dialogue = NpcDialogue::new("chat");
        dialogue.npc_renderer = Some(npc_renderer);
        dialogue.player_renderer = Some(player_renderer);
        dialogue.disable_during_dialogue = vec![player];
        configure(&mut dialogue);
        let npc = world.spawn(dialogue).id();

        enter(&mut app, npc, player);
        Fixture {
            app,
            npc,
            npc_renderer,
            player_renderer,
            player,
        }
    }

    fn shown(app: &App, target: Entity) -> (Handle<Image>, Visibility) {
        let world = app.world();
        (
            world.get::<Sprite>(target).unwrap().image.clone(),
            *world.get::<Visibility>(target).unwrap(),
        )
    }

    #[test]
    fn plays_beats_then_restores() {
        let Fixture {
            mut app,
            npc,
            npc_renderer,
            player_renderer,
            player,
        } = scene(|_| {});

        tap(&mut app, KeyCode::KeyF);
        assert_eq!(recorded::<DialogueStarted>(&app), vec![DialogueStarted { interactor: npc }]);
        assert!(app.world().get::<Suspended>(player).is_some());
        assert_eq!(shown(&app, npc_renderer), (image(100), Visibility::Inherited));
        assert_eq!(shown(&app, player_renderer), (image(200), Visibility::Inherited));

        advance(&mut app, 0.3);
        assert_eq!(app.world().get::<DialoguePlayback>(npc).unwrap().step(), 0);

        advance(&mut app, 0.4);
        assert_eq!(app.world().get::<DialoguePlayback>(npc).unwrap().step(), 1);
        assert_eq!(shown(&app, npc_renderer).0, image(101));

        advance(&mut app, 0.4);
        assert!(app.world().get::<DialoguePlayback>(npc).is_none());
        assert_eq!(recorded::<DialogueFinished>(&app), vec![DialogueFinished { interactor: npc }]);
        assert!(app.world().get::<Suspended>(player).is_none());
        assert_eq!(shown(&app, npc_renderer), (image(1), Visibility::Hidden));
        assert_eq!(shown(&app, player_renderer), (image(2), Visibility::Inherited));
    }

    #[test]
    fn keeps_final_beat_without_restore() {
        let Fixture {
            mut app,
            npc_renderer,
            ..
        } = scene(|dialogue| dialogue.restore_original_sprites = false);

        tap(&mut app, KeyCode::KeyF);
        advance(&mut app, 1.2);
        assert_eq!(shown(&app, npc_renderer), (image(101), Visibility::Inherited));
    }

    #[test]
    fn reentry_is_blocked_while_playing() {
        let Fixture { mut app, npc, .. } = scene(|_| {});

        tap(&mut app, KeyCode::KeyF);
        advance(&mut app, 0.3);
        tap(&mut app, KeyCode::KeyF);

        assert_eq!(recorded::<DialogueStarted>(&app).len(), 1);
        advance(&mut app, 0.3);
        assert_eq!(app.world().get::<DialoguePlayback>(npc).unwrap().step(), 1);
    }

    #[test]
    fn reentry_restarts_when_allowed() {
        let Fixture {
            mut app,
            npc,
            npc_renderer,
            ..
        } = scene(|dialogue| dialogue.block_reentry_while_playing = false);

        tap(&mut app, KeyCode::KeyF);
        advance(&mut app, 0.6);
        assert_eq!(app.world().get::<DialoguePlayback>(npc).unwrap().step(), 1);

        tap(&mut app, KeyCode::KeyF);
        assert_eq!(recorded::<DialogueStarted>(&app).len(), 2);
        assert_eq!(app.world().get::<DialoguePlayback>(npc).unwrap().step(), 0);
        assert_eq!(shown(&app, npc_renderer).0, image(100));

        // The restart still restores the sprites from before the first start
        advance(&mut app, 1.2);
        assert_eq!(shown(&app, npc_renderer), (image(1), Visibility::Hidden));
    }

    #[test]
    fn empty_beat_hides_target() {
        let Fixture {
            mut app,
            npc_renderer,
            ..
        } = scene(|_| {});
        app.world_mut().resource_mut::<DialogueLibrary>().insert(
            "chat",
            DialogueSequence {
                npc_sprites: vec![None],
                player_sprites: vec![Some(image(7))],
                durations: vec![1.0],
                ..default()
            },
        );
        app.world_mut().entity_mut(npc_renderer).insert(Visibility::Inherited);

        tap(&mut app, KeyCode::KeyF);
        assert_eq!(*app.world().get::<Visibility>(npc_renderer).unwrap(), Visibility::Hidden);
    }

    #[test]
    fn empty_sequence_finishes_immediately() {
        let Fixture { mut app, npc, player, .. } = scene(|_| {});
        app.world_mut()
            .resource_mut::<DialogueLibrary>()
            .insert("chat", DialogueSequence::default());

        tap(&mut app, KeyCode::KeyF);
        app.update();

        assert_eq!(recorded::<DialogueFinished>(&app), vec![DialogueFinished { interactor: npc }]);
        assert!(app.world().get::<Suspended>(player).is_none());
    }

    #[test]
    fn unknown_sequence_is_skipped() {
        let Fixture { mut app, npc, .. } = scene(|dialogue| dialogue.sequence = Some("missing".into()));

        tap(&mut app, KeyCode::KeyF);
        assert!(recorded::<DialogueStarted>(&app).is_empty());
        assert!(app.world().get::<DialoguePlayback>(npc).is_none());
    }

    #[test]
    fn suspending_aborts_without_restoring() {
        let Fixture {
            mut app,
            npc,
            npc_renderer,
            player,
            ..
        } = scene(|_| {});

        tap(&mut app, KeyCode::KeyF);
        app.world_mut().entity_mut(npc).insert(Suspended);
        advance(&mut app, 1.2);

        assert!(app.world().get::<DialoguePlayback>(npc).is_none());
        assert!(recorded::<DialogueFinished>(&app).is_empty());
        assert_eq!(shown(&app, npc_renderer).0, image(100));
        assert!(app.world().get::<Suspended>(player).is_some());
    }

    #[test]
    fn speed_multiplier_shortens_beats() {
        let Fixture { mut app, npc, .. } = scene(|dialogue| dialogue.speed_multiplier = 2.0);

        tap(&mut app, KeyCode::KeyF);
        advance(&mut app, 0.35);
        assert_eq!(app.world().get::<DialoguePlayback>(npc).unwrap().step(), 1);
    }
}
