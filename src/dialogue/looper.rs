//! Background chatter between two speakers, looping while enabled.

use bevy::prelude::*;

use super::library::DialogueLibrary;
use super::sequence::{effective_step_seconds, show_step, DialogueSequence, RenderTargets, SpriteSnapshot};
use crate::core::{DialogueBeat, GameplayConfig, Suspended};

/// Loops a sequence across two sprite targets: `npc_sprites` drive speaker
/// A and `player_sprites` drive speaker B.
#[derive(Component, Debug, Clone)]
pub struct DialogueLooper {
    pub sequence: Option<String>,
    pub speaker_a: Option<Entity>,
    pub speaker_b: Option<Entity>,
    /// Start chatting as soon as the looper is spawned
    pub auto_start: bool,
    /// Loop forever while enabled; otherwise play the sequence once
    pub looping: bool,
    /// Extra seconds between beats
    pub pause_between_beats: f32,
    /// Extra seconds after a full pass, before the next one
    pub pause_between_loops: f32,
    pub speed_multiplier: f32,
    /// Put the original sprites back when chatting stops
    pub clear_sprites_on_stop: bool,
    pub(crate) can_chat: bool,
    pub(crate) originals: Option<[Option<SpriteSnapshot>; 2]>,
}

impl Default for DialogueLooper {
    fn default() -> Self {
        Self {
            sequence: None,
            speaker_a: None,
            speaker_b: None,
            auto_start: false,
            looping: true,
            pause_between_beats: 0.0,
            pause_between_loops: 0.5,
            speed_multiplier: 1.0,
            clear_sprites_on_stop: true,
            can_chat: false,
            originals: None,
        }
    }
}

impl DialogueLooper {
    pub fn new(sequence: impl Into<String>, speaker_a: Entity, speaker_b: Entity) -> Self {
        Self {
            sequence: Some(sequence.into()),
            speaker_a: Some(speaker_a),
            speaker_b: Some(speaker_b),
            ..default()
        }
    }

    pub fn can_chat(&self) -> bool {
        self.can_chat
    }

    fn restore(&self, targets: &mut RenderTargets) {
        if !self.clear_sprites_on_stop {
            return;
        }
        let Some([a, b]) = &self.originals else {
            return;
        };
        if let Some(original) = a {
            original.restore(targets, self.speaker_a);
        }
        if let Some(original) = b {
            original.restore(targets, self.speaker_b);
        }
    }
}

/// Enable or disable chatting on a looper.
#[derive(Event, Debug, Clone, Copy)]
pub struct SetChatEnabled {
    pub looper: Entity,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChatPhase {
    /// Showing beat `n`
    Beat(usize),
    /// Pause after beat `n`
    BeatPause(usize),
    /// Pause after a full pass
    LoopPause,
    /// Empty sequence, waiting before looking again
    Idle,
}

/// A looper that is currently chatting.
#[derive(Component, Debug)]
pub struct ChatRun {
    sequence_id: String,
    sequence: DialogueSequence,
    phase: ChatPhase,
    timer: Timer,
}

impl ChatRun {
    /// Beat currently on screen, if any.
    pub fn beat(&self) -> Option<usize> {
        match self.phase {
            ChatPhase::Beat(step) | ChatPhase::BeatPause(step) => Some(step),
            ChatPhase::LoopPause | ChatPhase::Idle => None,
        }
    }
}

/// What the run should do after a phase ends.
enum Next {
    Show(usize),
    Wait(ChatPhase, f32),
    Stop,
}

/// Begin a pass from beat 0, or idle when there is nothing to play.
fn begin_pass(sequence: &DialogueSequence, looper: &DialogueLooper, config: &GameplayConfig) -> Next {
    if sequence.step_count() > 0 {
        Next::Show(0)
    } else if looper.looping {
        Next::Wait(ChatPhase::Idle, config.empty_sequence_retry_seconds)
    } else {
        Next::Stop
    }
}

/// Decide what follows the phase that just ended.
fn after_phase(run: &ChatRun, looper: &DialogueLooper, config: &GameplayConfig) -> Next {
    let next_beat = |step: usize| {
        if step + 1 < run.sequence.step_count() {
            Next::Show(step + 1)
        } else if !looper.looping {
            Next::Stop
        } else if looper.pause_between_loops > 0.0 {
            Next::Wait(ChatPhase::LoopPause, looper.pause_between_loops)
        } else {
            begin_pass(&run.sequence, looper, config)
        }
    };

    match run.phase {
        ChatPhase::Beat(step) if looper.pause_between_beats > 0.0 => {
            Next::Wait(ChatPhase::BeatPause(step), looper.pause_between_beats)
        }
        ChatPhase::Beat(step) | ChatPhase::BeatPause(step) => next_beat(step),
        ChatPhase::LoopPause | ChatPhase::Idle => begin_pass(&run.sequence, looper, config),
    }
}

/// Apply `next` to a run. Returns false when the run should stop.
fn enter_phase(
    source: Entity,
    run: &mut ChatRun,
    next: Next,
    looper: &DialogueLooper,
    config: &GameplayConfig,
    targets: &mut RenderTargets,
    beats: &mut EventWriter<DialogueBeat>,
) -> bool {
    match next {
        Next::Show(step) => {
            let Some(beat) = run.sequence.step(step) else {
                return false;
            };
            show_step(targets, looper.speaker_a, looper.speaker_b, &beat);
            let seconds = effective_step_seconds(beat.duration, config.min_step_seconds, looper.speed_multiplier);
            run.phase = ChatPhase::Beat(step);
            run.timer = Timer::from_seconds(seconds, TimerMode::Once);
            beats.send(DialogueBeat {
                source,
                sequence: run.sequence_id.clone(),
                step,
            });
            true
        }
        Next::Wait(phase, seconds) => {
            run.phase = phase;
            run.timer = Timer::from_seconds(seconds, TimerMode::Once);
            true
        }
        Next::Stop => false,
    }
}

/// Build a run for a looper, or None when it lacks a sequence or speakers.
fn start_run(
    source: Entity,
    looper: &DialogueLooper,
    library: &DialogueLibrary,
    config: &GameplayConfig,
    targets: &mut RenderTargets,
    beats: &mut EventWriter<DialogueBeat>,
) -> Option<ChatRun> {
    if looper.speaker_a.is_none() || looper.speaker_b.is_none() {
        warn!("Dialogue looper {:?} has no speakers, not chatting", source);
        return None;
    }
    let sequence_id = looper.sequence.as_deref()?;
    let Some(sequence) = library.get(sequence_id) else {
        warn!("Dialogue sequence '{}' not found for looper {:?}", sequence_id, source);
        return None;
    };

    let mut run = ChatRun {
        sequence_id: sequence_id.to_string(),
        sequence: sequence.clone(),
        phase: ChatPhase::Idle,
        timer: Timer::default(),
    };
    let next = begin_pass(&run.sequence, looper, config);
    enter_phase(source, &mut run, next, looper, config, targets, beats).then_some(run)
}

/// Cache the speakers' sprites and honour `auto_start`.
pub fn init_dialogue_loopers(
    mut commands: Commands,
    library: Res<DialogueLibrary>,
    config: Res<GameplayConfig>,
    mut loopers: Query<(Entity, &mut DialogueLooper), Added<DialogueLooper>>,
    mut targets: RenderTargets,
    mut beats: EventWriter<DialogueBeat>,
) {
    for (entity, mut looper) in loopers.iter_mut() {
        looper.originals = Some([
            SpriteSnapshot::capture(&targets, looper.speaker_a),
            SpriteSnapshot::capture(&targets, looper.speaker_b),
        ]);

        if looper.auto_start {
            looper.can_chat = true;
            if let Some(run) = start_run(entity, &looper, &library, &config, &mut targets, &mut beats) {
                commands.entity(entity).insert(run);
            }
        }
    }
}

/// Handle `SetChatEnabled` requests.
#[allow(clippy::too_many_arguments)]
pub fn toggle_dialogue_loopers(
    mut commands: Commands,
    mut requests: EventReader<SetChatEnabled>,
    library: Res<DialogueLibrary>,
    config: Res<GameplayConfig>,
    mut loopers: Query<(&mut DialogueLooper, Has<ChatRun>, Has<Suspended>)>,
    mut targets: RenderTargets,
    mut beats: EventWriter<DialogueBeat>,
) {
    for request in requests.read() {
        let Ok((mut looper, running, suspended)) = loopers.get_mut(request.looper) else {
            continue;
        };
        looper.can_chat = request.enabled;

        if request.enabled {
            if running || suspended {
                continue;
            }
            if let Some(run) = start_run(request.looper, &looper, &library, &config, &mut targets, &mut beats) {
                commands.entity(request.looper).insert(run);
            }
        } else {
            if running {
                commands.entity(request.looper).remove::<ChatRun>();
            }
            looper.restore(&mut targets);
        }
    }
}

/// Step every chatting looper through its beats and pauses.
pub fn advance_dialogue_loopers(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameplayConfig>,
    mut loopers: Query<(Entity, &DialogueLooper, &mut ChatRun), Without<Suspended>>,
    mut targets: RenderTargets,
    mut beats: EventWriter<DialogueBeat>,
) {
    for (entity, looper, mut run) in loopers.iter_mut() {
        if !looper.can_chat {
            continue;
        }
        run.timer.tick(time.delta());
        if !run.timer.finished() {
            continue;
        }

        let next = after_phase(&run, looper, &config);
        if !enter_phase(entity, &mut run, next, looper, &config, &mut targets, &mut beats) {
            looper.restore(&mut targets);
            commands.entity(entity).remove::<ChatRun>();
        }
    }
}

/// Suspending a looper stops it, restoring its speakers.
pub fn stop_suspended_loopers(
    mut commands: Commands,
    loopers: Query<(Entity, &DialogueLooper), (With<ChatRun>, With<Suspended>)>,
    mut targets: RenderTargets,
) {
    for (entity, looper) in loopers.iter() {
        looper.restore(&mut targets);
        commands.entity(entity).remove::<ChatRun>();
    }
}
