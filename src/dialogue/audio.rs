//! Beat sounds for dialogue sequences.

use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioControl, AudioSource as KiraAudioSource};

use super::library::DialogueLibrary;
use crate::core::DialogueBeat;

/// Sound to play for `beat`, if its sequence is known and has one.
pub fn beat_sound(library: &DialogueLibrary, beat: &DialogueBeat) -> Option<Handle<KiraAudioSource>> {
    library
        .get(&beat.sequence)
        .and_then(|sequence| sequence.beat_sound.clone())
}

/// Play the sequence's beat sound every time a beat is shown.
pub fn play_beat_sounds(
    mut beats: EventReader<DialogueBeat>,
    library: Res<DialogueLibrary>,
    audio: Res<Audio>,
) {
    for beat in beats.read() {
        if let Some(sound) = beat_sound(&library, beat) {
            audio.play(sound);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::sequence::tests::uniform_sequence;
    use crate::dialogue::sequence::DialogueSequence;

    fn beat(sequence: &str) -> DialogueBeat {
        DialogueBeat {
            source: Entity::PLACEHOLDER,
            sequence: sequence.to_string(),
            step: 0,
        }
    }

    fn library() -> DialogueLibrary {
        let mut library = DialogueLibrary::default();
        library.insert(
            "chime",
            DialogueSequence {
                beat_sound: Some(Handle::weak_from_u128(7)),
                ..uniform_sequence(2, 1.0)
            },
        );
        library.insert("silent", uniform_sequence(2, 1.0));
        library
    }

    #[test]
    fn beats_use_their_sequence_sound() {
        let library = library();
        assert_eq!(beat_sound(&library, &beat("chime")), Some(Handle::weak_from_u128(7)));
    }

    #[test]
    fn silent_and_unknown_sequences_play_nothing() {
        let library = library();
        assert_eq!(beat_sound(&library, &beat("silent")), None);
        assert_eq!(beat_sound(&library, &beat("missing")), None);
    }
}
