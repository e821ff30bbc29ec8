//! Main menu buttons and the pause toggle.

use bevy::prelude::*;

use crate::core::{GameState, LoadScene, SceneRef};

/// Scene requested by the Play button.
pub const FIRST_LEVEL: usize = 1;

/// Root of the pause overlay, shown only while paused.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct PauseMenu;

/// What a menu button does when pressed.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    Quit,
    TogglePause,
}

/// Setup menu and pause systems.
pub fn setup_menu_systems(app: &mut App) {
    app.add_systems(
        Update,
        (toggle_pause_on_escape, handle_menu_buttons)
            .run_if(in_state(GameState::Playing).or(in_state(GameState::Paused))),
    )
    .add_systems(OnEnter(GameState::Paused), pause_game)
    .add_systems(OnExit(GameState::Paused), resume_game)
    .add_systems(Update, hide_pause_menus.run_if(in_state(GameState::Playing)));
}

fn toggled(state: GameState) -> GameState {
    match state {
        GameState::Paused => GameState::Playing,
        _ => GameState::Paused,
    }
}

/// Escape flips between playing and paused.
pub fn toggle_pause_on_escape(
    keyboard: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        next_state.set(toggled(*state.get()));
    }
}

/// React to pressed menu buttons.
pub fn handle_menu_buttons(
    buttons: Query<(&Interaction, &MenuAction), Changed<Interaction>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut load_scene: EventWriter<LoadScene>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, action) in buttons.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match action {
            MenuAction::Play => {
                if *state.get() == GameState::Paused {
                    next_state.set(GameState::Playing);
                }
                load_scene.send(LoadScene(SceneRef::Index(FIRST_LEVEL)));
            }
            MenuAction::Quit => {
                info!("Quit requested from menu");
                exit.send(AppExit::Success);
            }
            MenuAction::TogglePause => next_state.set(toggled(*state.get())),
        }
    }
}

/// Stop virtual time and show the pause overlay.
fn pause_game(mut time: ResMut<Time<Virtual>>, mut menus: Query<&mut Visibility, With<PauseMenu>>) {
    time.pause();
    for mut visibility in menus.iter_mut() {
        *visibility = Visibility::Visible;
    }
    debug!("Game paused");
}

/// Restart virtual time and hide the pause overlay.
fn resume_game(mut time: ResMut<Time<Virtual>>, mut menus: Query<&mut Visibility, With<PauseMenu>>) {
    time.unpause();
    for mut visibility in menus.iter_mut() {
        *visibility = Visibility::Hidden;
    }
    debug!("Game resumed");
}

/// Pause overlays spawned with a scene start hidden.
fn hide_pause_menus(mut menus: Query<&mut Visibility, Added<PauseMenu>>) {
    for mut visibility in menus.iter_mut() {
        *visibility = Visibility::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::ScenesPlugin;
    use crate::testing::{app_with, record, recorded, tap};

    fn state(app: &App) -> GameState {
        *app.world().resource::<State<GameState>>().get()
    }

    /// State changes requested in one frame apply at the start of the next.
    fn settle(app: &mut App) {
        app.update();
    }

    #[test]
    fn escape_toggles_pause_and_virtual_time() {
        let mut app = app_with(ScenesPlugin);
        let overlay = app.world_mut().spawn((PauseMenu, Visibility::Visible)).id();
        app.update();
        assert_eq!(*app.world().get::<Visibility>(overlay).unwrap(), Visibility::Hidden);

        tap(&mut app, KeyCode::Escape);
        settle(&mut app);
        assert_eq!(state(&app), GameState::Paused);
        assert!(app.world().resource::<Time<Virtual>>().is_paused());
        assert_eq!(*app.world().get::<Visibility>(overlay).unwrap(), Visibility::Visible);

        tap(&mut app, KeyCode::Escape);
        settle(&mut app);
        assert_eq!(state(&app), GameState::Playing);
        assert!(!app.world().resource::<Time<Virtual>>().is_paused());
        assert_eq!(*app.world().get::<Visibility>(overlay).unwrap(), Visibility::Hidden);
    }

    #[test]
    fn play_button_requests_first_level() {
        let mut app = app_with(ScenesPlugin);
        record::<LoadScene>(&mut app);
        app.world_mut().spawn((MenuAction::Play, Interaction::Pressed));
        app.update();
        assert_eq!(recorded::<LoadScene>(&app), vec![LoadScene(SceneRef::Index(FIRST_LEVEL))]);
    }

    #[test]
    fn quit_button_exits() {
        let mut app = app_with(ScenesPlugin);
        app.world_mut().spawn((MenuAction::Quit, Interaction::Pressed));
        app.update();
        assert_eq!(app.should_exit(), Some(AppExit::Success));
    }
}
