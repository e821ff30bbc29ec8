//! Dialogue sequences and the render targets they drive.
//!
//! A sequence is three parallel lanes: the NPC's sprite, the player's
//! sprite and how long the beat lasts. Lanes of unequal length are a content
//! mistake, not a crash; playback simply stops at the shortest lane.

use bevy::prelude::*;
use bevy_kira_audio::AudioSource as KiraAudioSource;
use thiserror::Error;

/// Fallback used when a sequence is authored with a non-positive one.
pub const MIN_FALLBACK_DURATION: f32 = 0.1;

/// Sprite + visibility pairs that dialogue writes to.
pub type RenderTargets<'w, 's> = Query<'w, 's, (&'static mut Sprite, &'static mut Visibility)>;

/// A timed two-lane sprite conversation.
#[derive(Debug, Clone)]
pub struct DialogueSequence {
    /// NPC lane; `None` hides the NPC target for that beat
    pub npc_sprites: Vec<Option<Handle<Image>>>,
    /// Player lane; `None` hides the player target for that beat
    pub player_sprites: Vec<Option<Handle<Image>>>,
    /// Seconds per beat; non-positive entries use `fallback_duration`
    pub durations: Vec<f32>,
    pub fallback_duration: f32,
    /// Played on every beat when audio is available
    pub beat_sound: Option<Handle<KiraAudioSource>>,
}

impl Default for DialogueSequence {
    fn default() -> Self {
        Self {
            npc_sprites: Vec::new(),
            player_sprites: Vec::new(),
            durations: Vec::new(),
            fallback_duration: 1.0,
            beat_sound: None,
        }
    }
}

/// One resolved beat of a sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueStep {
    pub npc: Option<Handle<Image>>,
    pub player: Option<Handle<Image>>,
    /// Authored duration after fallback substitution
    pub duration: f32,
}

/// Authoring problems found in a sequence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SequenceIssue {
    #[error("lane lengths differ (npc {npc}, player {player}, durations {durations}), only {playable} step(s) will play")]
    UnequalLengths {
        npc: usize,
        player: usize,
        durations: usize,
        playable: usize,
    },

    #[error("fallback duration {0} is not positive, using {MIN_FALLBACK_DURATION}")]
    NonPositiveFallback(f32),
}

impl DialogueSequence {
    /// Number of beats that will actually play.
    pub fn step_count(&self) -> usize {
        self.npc_sprites
            .len()
            .min(self.player_sprites.len())
            .min(self.durations.len())
    }

    /// Authored duration of beat `index`, with the fallback substituted for
    /// non-positive entries.
    pub fn duration_at(&self, index: usize) -> f32 {
        match self.durations.get(index) {
            Some(&duration) if duration > 0.0 => duration,
            _ => self.fallback_duration,
        }
    }

    pub fn step(&self, index: usize) -> Option<DialogueStep> {
        if index >= self.step_count() {
            return None;
        }
        Some(DialogueStep {
            npc: self.npc_sprites[index].clone(),
            player: self.player_sprites[index].clone(),
            duration: self.duration_at(index),
        })
    }

    pub fn issues(&self) -> Vec<SequenceIssue> {
        let mut issues = Vec::new();
        let (npc, player, durations) = (self.npc_sprites.len(), self.player_sprites.len(), self.durations.len());
        if npc != player || player != durations {
            issues.push(SequenceIssue::UnequalLengths {
                npc,
                player,
                durations,
                playable: self.step_count(),
            });
        }
        if self.fallback_duration <= 0.0 {
            issues.push(SequenceIssue::NonPositiveFallback(self.fallback_duration));
        }
        issues
    }

    /// Correct values that would stall playback.
    pub fn sanitized(mut self) -> Self {
        if self.fallback_duration <= 0.0 {
            self.fallback_duration = MIN_FALLBACK_DURATION;
        }
        self
    }
}

/// Wall-clock length of a beat: the authored duration floored at
/// `min_seconds`, divided by the (equally floored) speed multiplier.
pub fn effective_step_seconds(duration: f32, min_seconds: f32, speed_multiplier: f32) -> f32 {
    duration.max(min_seconds) / speed_multiplier.max(min_seconds)
}

/// Image and visibility of a render target before dialogue touched it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSnapshot {
    pub image: Handle<Image>,
    pub visibility: Visibility,
}

impl SpriteSnapshot {
    pub fn capture(targets: &RenderTargets, target: Option<Entity>) -> Option<Self> {
        let (sprite, visibility) = targets.get(target?).ok()?;
        Some(Self {
            image: sprite.image.clone(),
            visibility: *visibility,
        })
    }

    pub fn restore(&self, targets: &mut RenderTargets, target: Option<Entity>) {
        let Some((mut sprite, mut visibility)) = target.and_then(|entity| targets.get_mut(entity).ok()) else {
            return;
        };
        sprite.image = self.image.clone();
        *visibility = self.visibility;
    }
}

/// Show `image` on `target`, or hide the target when there is no image.
pub fn show_image(targets: &mut RenderTargets, target: Option<Entity>, image: Option<&Handle<Image>>) {
    let Some((mut sprite, mut visibility)) = target.and_then(|entity| targets.get_mut(entity).ok()) else {
        return;
    };
    match image {
        Some(handle) => {
            sprite.image = handle.clone();
            *visibility = Visibility::Inherited;
        }
        None => *visibility = Visibility::Hidden,
    }
}

/// Show one beat on a pair of targets.
pub fn show_step(targets: &mut RenderTargets, first: Option<Entity>, second: Option<Entity>, step: &DialogueStep) {
    show_image(targets, first, step.npc.as_ref());
    show_image(targets, second, step.player.as_ref());
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn image(id: u128) -> Handle<Image> {
        Handle::weak_from_u128(id)
    }

    /// Sequence with `n` beats of `seconds` each, images numbered from 1.
    pub fn uniform_sequence(n: usize, seconds: f32) -> DialogueSequence {
        DialogueSequence {
            npc_sprites: (0..n).map(|i| Some(image(100 + i as u128))).collect(),
            player_sprites: (0..n).map(|i| Some(image(200 + i as u128))).collect(),
            durations: vec![seconds; n],
            ..default()
        }
    }

    #[test]
    fn step_count_is_shortest_lane() {
        let sequence = DialogueSequence {
            npc_sprites: vec![Some(image(1)); 4],
            player_sprites: vec![None; 2],
            durations: vec![1.0; 3],
            ..default()
        };
        assert_eq!(sequence.step_count(), 2);
        assert!(sequence.step(1).is_some());
        assert!(sequence.step(2).is_none());
        assert_eq!(
            sequence.issues(),
            vec![SequenceIssue::UnequalLengths {
                npc: 4,
                player: 2,
                durations: 3,
                playable: 2
            }]
        );
    }

    #[test]
    fn non_positive_durations_use_fallback() {
        let sequence = DialogueSequence {
            durations: vec![2.0, 0.0, -1.0],
            fallback_duration: 0.75,
            ..default()
        };
        assert_eq!(sequence.duration_at(0), 2.0);
        assert_eq!(sequence.duration_at(1), 0.75);
        assert_eq!(sequence.duration_at(2), 0.75);
    }

    #[test]
    fn sanitizing_fixes_fallback() {
        let sequence = DialogueSequence {
            fallback_duration: 0.0,
            ..default()
        };
        assert_eq!(sequence.issues(), vec![SequenceIssue::NonPositiveFallback(0.0)]);
        let sequence = sequence.sanitized();
        assert_eq!(sequence.fallback_duration, MIN_FALLBACK_DURATION);
        assert!(sequence.issues().is_empty());
    }

    #[test]
    fn effective_duration_floors_and_scales() {
        assert_eq!(effective_step_seconds(2.0, 0.01, 2.0), 1.0);
        assert_eq!(effective_step_seconds(0.001, 0.01, 1.0), 0.01);
        // A zero multiplier is floored instead of dividing by zero
        assert_eq!(effective_step_seconds(1.0, 0.01, 0.0), 100.0);
    }
}
