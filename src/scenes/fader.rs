//! Full-screen fade to black followed by a scene switch.

use bevy::prelude::*;
use bevy::ui::FocusPolicy;

use crate::core::{Easing, LoadScene, SceneRef};

/// Shortest fade; avoids dividing by zero.
const MIN_FADE_SECONDS: f32 = 0.0001;

/// Fades the alpha of this UI node's `BackgroundColor` up to opaque on
/// [`StartFade`], then requests `scene`.
#[derive(Component, Debug, Clone)]
#[require(BackgroundColor, FocusPolicy)]
pub struct ScreenFader {
    /// Fade length in real (unpaused) seconds
    pub duration: f32,
    pub ease: Easing,
    /// Swallow pointer input while fading
    pub block_input: bool,
    pub scene: SceneRef,
    pub(crate) run: Option<FadeRun>,
}

#[derive(Debug, Clone, Copy)]
struct FadeRun {
    start_alpha: f32,
    progress: f32,
    focus_before: FocusPolicy,
}

impl Default for ScreenFader {
    fn default() -> Self {
        Self {
            duration: 1.0,
            ease: Easing::Linear,
            block_input: true,
            scene: SceneRef::Index(0),
            run: None,
        }
    }
}

impl ScreenFader {
    pub fn is_fading(&self) -> bool {
        self.run.is_some()
    }
}

/// Ask a fader to start (or restart) fading.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartFade {
    pub fader: Entity,
}

/// Begin fades from the node's current alpha. Hidden faders ignore requests.
pub fn start_fades(
    mut requests: EventReader<StartFade>,
    mut faders: Query<(&mut ScreenFader, &BackgroundColor, &mut FocusPolicy, Option<&Visibility>)>,
) {
    for request in requests.read() {
        let Ok((mut fader, color, mut focus, visibility)) = faders.get_mut(request.fader) else {
            warn!("StartFade sent to {:?}, which has no ScreenFader", request.fader);
            continue;
        };
        if visibility == Some(&Visibility::Hidden) {
            debug!("Fader {:?} is hidden, not fading", request.fader);
            continue;
        }

        // A restart keeps the focus policy from before the first run
        let focus_before = fader.run.map_or(*focus, |run| run.focus_before);
        fader.run = Some(FadeRun {
            start_alpha: color.0.alpha(),
            progress: 0.0,
            focus_before,
        });
        *focus = if fader.block_input { FocusPolicy::Block } else { FocusPolicy::Pass };
    }
}

/// Step running fades on real time and load the scene once opaque.
pub fn advance_fades(
    time: Res<Time<Real>>,
    mut faders: Query<(&mut ScreenFader, &mut BackgroundColor, &mut FocusPolicy)>,
    mut load_scene: EventWriter<LoadScene>,
) {
    for (mut fader, mut color, mut focus) in faders.iter_mut() {
        let duration = fader.duration.max(MIN_FADE_SECONDS);
        let ease = fader.ease;
        let Some(run) = fader.run.as_mut() else {
            continue;
        };

        run.progress += time.delta_secs() / duration;
        let k = ease.apply(run.progress);
        color.0.set_alpha(run.start_alpha + (1.0 - run.start_alpha) * k);

        if run.progress < 1.0 {
            continue;
        }
        color.0.set_alpha(1.0);
        *focus = run.focus_before;
        fader.run = None;
        info!("Fade finished, loading scene {}", fader.scene);
        load_scene.send(LoadScene(fader.scene.clone()));
    }
}
