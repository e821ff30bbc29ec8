//! Charging station: stand on it long enough and the lights go green.

use bevy::prelude::*;

use crate::core::{
    has_tag, ActorTag, GameplayConfig, LoadScene, SceneRef, Suspended, TriggerEntered, TriggerExited, PLAYER_TAG,
};

/// Highest progress stage (green).
pub const MAX_STAGE: usize = 4;

/// Progress stage reached after standing `stay_seconds` on the charger.
pub fn stage_for(stay_seconds: f32, step_seconds: f32) -> usize {
    if step_seconds <= 0.0 {
        return MAX_STAGE;
    }
    ((stay_seconds / step_seconds).floor().max(0.0) as usize).min(MAX_STAGE)
}

/// Charging station placed on the entity whose sprite is the arrow.
#[derive(Component, Debug, Clone)]
pub struct LightCharger {
    pub player_tag: String,
    /// Arrow sprite while the player stands on the charger
    pub lit_arrow: Option<Handle<Image>>,
    /// Arrow sprite while idle
    pub dark_arrow: Option<Handle<Image>>,
    /// Renderer showing the stage lights
    pub light_renderer: Option<Entity>,
    /// Red, orange, yellow, pale green, green
    pub stage_sprites: [Option<Handle<Image>>; MAX_STAGE + 1],
    /// Seconds to advance one stage
    pub step_seconds: f32,
    /// Scene requested shortly after reaching green
    pub completion_scene: SceneRef,
    pub(crate) player_inside: bool,
    pub(crate) stay_seconds: f32,
    pub(crate) stage: usize,
    pub(crate) completion: Option<Timer>,
}

impl Default for LightCharger {
    fn default() -> Self {
        Self {
            player_tag: PLAYER_TAG.to_string(),
            lit_arrow: None,
            dark_arrow: None,
            light_renderer: None,
            stage_sprites: Default::default(),
            step_seconds: 2.0,
            completion_scene: SceneRef::Index(3),
            player_inside: false,
            stay_seconds: 0.0,
            stage: 0,
            completion: None,
        }
    }
}

impl LightCharger {
    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn player_inside(&self) -> bool {
        self.player_inside
    }

    /// Move to `stage`, updating the light sprite. Returns true on reaching
    /// green, which only counts when a green sprite is there to show.
    fn set_stage(&mut self, stage: usize, force: bool, sprites: &mut Query<&mut Sprite>) -> bool {
        if !force && stage == self.stage {
            return false;
        }
        self.stage = stage.min(MAX_STAGE);

        let Some(image) = &self.stage_sprites[self.stage] else {
            return false;
        };
        if let Some(mut light) = self.light_renderer.and_then(|e| sprites.get_mut(e).ok()) {
            light.image = image.clone();
        }
        self.stage == MAX_STAGE
    }

    fn set_arrow(entity: Entity, arrow: &Option<Handle<Image>>, sprites: &mut Query<&mut Sprite>) {
        if let (Some(image), Ok(mut sprite)) = (arrow, sprites.get_mut(entity)) {
            sprite.image = image.clone();
        }
    }
}

/// Show the dark arrow and the red light on spawn.
pub fn init_light_chargers(
    mut chargers: Query<(Entity, &mut LightCharger), Added<LightCharger>>,
    mut sprites: Query<&mut Sprite>,
) {
    for (entity, mut charger) in chargers.iter_mut() {
        LightCharger::set_arrow(entity, &charger.dark_arrow, &mut sprites);
        charger.set_stage(0, true, &mut sprites);
    }
}

/// Reset progress whenever the player steps on or off.
pub fn light_charger_triggers(
    mut entered: EventReader<TriggerEntered>,
    mut exited: EventReader<TriggerExited>,
    tags: Query<&ActorTag>,
    mut chargers: Query<&mut LightCharger, Without<Suspended>>,
    mut sprites: Query<&mut Sprite>,
) {
    let changes = entered
        .read()
        .map(|e| (e.volume, e.other, true))
        .chain(exited.read().map(|e| (e.volume, e.other, false)));

    for (volume, other, inside) in changes {
        let Ok(mut charger) = chargers.get_mut(volume) else {
            continue;
        };
        if !has_tag(&tags, other, &charger.player_tag) {
            continue;
        }

        charger.player_inside = inside;
        charger.stay_seconds = 0.0;
        charger.set_stage(0, true, &mut sprites);

        let arrow = if inside { &charger.lit_arrow } else { &charger.dark_arrow };
        LightCharger::set_arrow(volume, arrow, &mut sprites);
    }
}

/// Advance stages while the player stays, and request the completion scene.
pub fn charge_light_chargers(
    time: Res<Time>,
    config: Res<GameplayConfig>,
    mut chargers: Query<&mut LightCharger, Without<Suspended>>,
    mut sprites: Query<&mut Sprite>,
    mut load_scene: EventWriter<LoadScene>,
) {
    for mut charger in chargers.iter_mut() {
        if let Some(timer) = charger.completion.as_mut() {
            timer.tick(time.delta());
            if timer.finished() {
                info!("Charger complete, loading scene {}", charger.completion_scene);
                load_scene.send(LoadScene(charger.completion_scene.clone()));
                charger.completion = None;
            }
        }

        if !charger.player_inside {
            continue;
        }

        charger.stay_seconds += time.delta_secs();
        let target = stage_for(charger.stay_seconds, charger.step_seconds);
        if target != charger.stage && charger.set_stage(target, false, &mut sprites) && charger.completion.is_none() {
            charger.completion = Some(Timer::from_seconds(config.charger_completion_delay, TimerMode::Once));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactables::InteractablesPlugin;
    use crate::testing::{advance, app_with, enter, exit, record, recorded};

    fn image(id: u128) -> Handle<Image> {
        Handle::weak_from_u128(id)
    }

    #[test]
    fn stage_is_clamped_floor() {
        assert_eq!(stage_for(0.0, 2.0), 0);
        assert_eq!(stage_for(1.99, 2.0), 0);
        assert_eq!(stage_for(2.0, 2.0), 1);
        assert_eq!(stage_for(7.9, 2.0), 3);
        assert_eq!(stage_for(100.0, 2.0), MAX_STAGE);
    }

    struct Fixture {
        app: App,
        charger: Entity,
        light: Entity,
        player: Entity,
    }

    fn fixture() -> Fixture {
        let mut app = app_with(InteractablesPlugin);
        record::<LoadScene>(&mut app);
        let world = app.world_mut();
        let player = world.spawn(ActorTag::player()).id();
        let light = world.spawn(Sprite::default()).id();
        let charger = world
            .spawn((
                Sprite::default(),
                LightCharger {
                    lit_arrow: Some(image(10)),
                    dark_arrow: Some(image(11)),
                    light_renderer: Some(light),
                    stage_sprites: [1, 2, 3, 4, 5].map(|id| Some(image(id))),
                    step_seconds: 0.5,
                    completion_scene: SceneRef::Index(5),
                    ..default()
                },
            ))
            .id();
        app.update();
        Fixture {
            app,
            charger,
            light,
            player,
        }
    }

    fn light_image(app: &App, light: Entity) -> Handle<Image> {
        app.world().get::<Sprite>(light).unwrap().image.clone()
    }

    #[test]
    fn standing_advances_stages_and_exit_resets() {
        let Fixture {
            mut app,
            charger,
            light,
            player,
        } = fixture();
        assert_eq!(app.world().get::<Sprite>(charger).unwrap().image, image(11));
        assert_eq!(light_image(&app, light), image(1));

        enter(&mut app, charger, player);
        assert_eq!(app.world().get::<Sprite>(charger).unwrap().image, image(10));

        advance(&mut app, 1.2);
        assert_eq!(app.world().get::<LightCharger>(charger).unwrap().stage(), 2);
        assert_eq!(light_image(&app, light), image(3));

        exit(&mut app, charger, player);
        assert_eq!(app.world().get::<LightCharger>(charger).unwrap().stage(), 0);
        assert_eq!(light_image(&app, light), image(1));
        assert_eq!(app.world().get::<Sprite>(charger).unwrap().image, image(11));
    }

    #[test]
    fn reaching_green_requests_completion_scene() {
        let Fixture {
            mut app,
            charger,
            player,
            ..
        } = fixture();

        enter(&mut app, charger, player);
        advance(&mut app, 2.2);
        assert_eq!(app.world().get::<LightCharger>(charger).unwrap().stage(), MAX_STAGE);
        assert!(recorded::<LoadScene>(&app).is_empty());

        advance(&mut app, 0.6);
        assert_eq!(recorded::<LoadScene>(&app), vec![LoadScene(SceneRef::Index(5))]);
    }

    #[test]
    fn missing_green_sprite_never_completes() {
        let Fixture {
            mut app,
            charger,
            player,
            ..
        } = fixture();
        app.world_mut().get_mut::<LightCharger>(charger).unwrap().stage_sprites[MAX_STAGE] = None;

        enter(&mut app, charger, player);
        advance(&mut app, 4.0);
        assert_eq!(app.world().get::<LightCharger>(charger).unwrap().stage(), MAX_STAGE);
        assert!(recorded::<LoadScene>(&app).is_empty());
    }

    #[test]
    fn suspended_charger_ignores_the_player() {
        let Fixture {
            mut app,
            charger,
            light,
            player,
        } = fixture();
        app.world_mut().entity_mut(charger).insert(Suspended);

        enter(&mut app, charger, player);
        advance(&mut app, 1.0);
        assert!(!app.world().get::<LightCharger>(charger).unwrap().player_inside());
        assert_eq!(app.world().get::<Sprite>(charger).unwrap().image, image(11));
        assert_eq!(light_image(&app, light), image(1));
    }

    #[test]
    fn suspended_charger_holds_its_stage() {
        let Fixture {
            mut app,
            charger,
            player,
            ..
        } = fixture();
        enter(&mut app, charger, player);
        advance(&mut app, 0.6);
        assert_eq!(app.world().get::<LightCharger>(charger).unwrap().stage(), 1);

        app.world_mut().entity_mut(charger).insert(Suspended);
        advance(&mut app, 3.0);
        assert_eq!(app.world().get::<LightCharger>(charger).unwrap().stage(), 1);
        assert!(recorded::<LoadScene>(&app).is_empty());
    }

    #[test]
    fn other_tags_do_not_charge() {
        let Fixture { mut app, charger, .. } = fixture();
        let npc = app.world_mut().spawn(ActorTag::npc()).id();

        enter(&mut app, charger, npc);
        advance(&mut app, 1.0);
        assert!(!app.world().get::<LightCharger>(charger).unwrap().player_inside());
        assert_eq!(app.world().get::<LightCharger>(charger).unwrap().stage(), 0);
    }
}
