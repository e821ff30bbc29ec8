//! Scene content: what gets spawned when a scene is entered.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::fader::{ScreenFader, StartFade};
use super::menu::{MenuAction, PauseMenu};
use super::registry::{SceneEntered, SceneEntity};
use super::scroll::TextureScroll;
use crate::core::{ActorTag, AnimatorParams, Easing, GameplayConfig, SceneRef, SmoothTranslation};
use crate::dialogue::{DialogueLooper, Interactor, NpcDialogue};
use crate::interactables::{
    Door, LiftCabin, LiftManager, LightCharger, PressurePlate, SlidingFloor, WheelChair, LIFT_UP_PARAM, MAX_STAGE,
};
use crate::npc::NpcFollower;
use crate::player::spawn_player;

const GROUND_Y: f32 = -1.0;
const GROUND_HALF_EXTENTS: Vec2 = Vec2::new(26.0, 0.5);
const BUBBLE_SIZE: Vec2 = Vec2::new(1.2, 0.8);
/// Charger lights from red to green.
const CHARGER_STAGE_SPRITES: [&str; MAX_STAGE + 1] = [
    "sprites/charger/stage_0.png",
    "sprites/charger/stage_1.png",
    "sprites/charger/stage_2.png",
    "sprites/charger/stage_3.png",
    "sprites/charger/stage_4.png",
];

/// Build the content of each scene as it is entered.
pub fn spawn_scene_content(
    mut commands: Commands,
    mut entered: EventReader<SceneEntered>,
    config: Res<GameplayConfig>,
    asset_server: Option<Res<AssetServer>>,
    mut fades: EventWriter<StartFade>,
) {
    for scene in entered.read() {
        match scene.name.as_str() {
            "main_menu" => spawn_main_menu(&mut commands),
            "street" => spawn_street(&mut commands, &config, asset_server.as_deref()),
            "credits" => spawn_credits(&mut commands),
            other => {
                let fader = spawn_interlude(&mut commands, other);
                fades.send(StartFade { fader });
            }
        }
    }
}

fn spawn_main_menu(commands: &mut Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.08, 0.08, 0.1)),
            SceneEntity,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Wheelhouse"),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
            ));
            spawn_button(parent, "Play", MenuAction::Play);
            spawn_button(parent, "Quit", MenuAction::Quit);
        });
}

fn spawn_button(parent: &mut ChildBuilder, label: &str, action: MenuAction) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(48.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgb(0.2, 0.2, 0.25)),
            action,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
            ));
        });
}

/// Hidden speech bubble that dialogue fills with beat sprites.
fn spawn_bubble(commands: &mut Commands, position: Vec2) -> Entity {
    commands
        .spawn((
            Sprite::from_color(Color::WHITE, BUBBLE_SIZE),
            Transform::from_translation(position.extend(5.0)),
            Visibility::Hidden,
            SceneEntity,
        ))
        .id()
}

/// Static sensor reporting overlaps as trigger events.
fn sensor(half_extents: Vec2) -> impl Bundle {
    (
        RigidBody::Fixed,
        Collider::cuboid(half_extents.x, half_extents.y),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
    )
}

fn spawn_street(commands: &mut Commands, config: &GameplayConfig, assets: Option<&AssetServer>) {
    // Ground
    commands.spawn((
        Name::new("Ground"),
        Sprite::from_color(Color::srgb(0.3, 0.3, 0.32), GROUND_HALF_EXTENTS * 2.0),
        Transform::from_xyz(0.0, GROUND_Y, 0.0),
        RigidBody::Fixed,
        Collider::cuboid(GROUND_HALF_EXTENTS.x, GROUND_HALF_EXTENTS.y),
        SceneEntity,
    ));

    let player = spawn_player(commands, Vec2::new(-12.0, 0.5), config);
    commands.entity(player).insert(SceneEntity);
    // Rides along with the player, so the player's despawn takes it too
    let player_bubble = commands
        .spawn((
            Sprite::from_color(Color::WHITE, BUBBLE_SIZE),
            Transform::from_xyz(0.0, 1.6, 5.0),
            Visibility::Hidden,
        ))
        .set_parent(player)
        .id();

    // Doctor: talk to them with interact
    let doctor_bubble = spawn_bubble(commands, Vec2::new(-8.0, 2.1));
    let prompt = commands
        .spawn((
            Sprite::from_color(Color::srgb(1.0, 0.9, 0.3), Vec2::splat(0.3)),
            Transform::from_xyz(-8.0, 1.5, 5.0),
            Visibility::Hidden,
            SceneEntity,
        ))
        .id();
    commands.spawn((
        Name::new("Doctor"),
        Sprite::from_color(Color::srgb(0.9, 0.9, 0.95), Vec2::new(0.8, 1.8)),
        Transform::from_xyz(-8.0, 0.4, 0.5),
        sensor(Vec2::new(1.2, 1.0)),
        Interactor::with_prompt(prompt),
        NpcDialogue {
            npc_renderer: Some(doctor_bubble),
            player_renderer: Some(player_bubble),
            disable_during_dialogue: vec![player],
            ..NpcDialogue::new("greeting")
        },
        SceneEntity,
    ));

    // Two patients gossiping in the background
    let left_bubble = spawn_bubble(commands, Vec2::new(-4.5, 2.0));
    let right_bubble = spawn_bubble(commands, Vec2::new(-3.0, 2.0));
    for x in [-4.5, -3.0] {
        commands.spawn((
            Sprite::from_color(Color::srgb(0.6, 0.7, 0.8), Vec2::new(0.8, 1.6)),
            Transform::from_xyz(x, 0.3, 0.4),
            SceneEntity,
        ));
    }
    commands.spawn((
        Name::new("Gossip"),
        DialogueLooper {
            auto_start: true,
            ..DialogueLooper::new("gossip", left_bubble, right_bubble)
        },
        SceneEntity,
    ));

    // Nurse trailing the player; her weight works the pressure plate
    commands.spawn((
        Name::new("Nurse"),
        ActorTag::npc(),
        NpcFollower::following(player),
        Sprite::from_color(Color::srgb(0.9, 0.6, 0.7), Vec2::new(0.8, 1.7)),
        Transform::from_xyz(-10.5, 0.4, 0.6),
        RigidBody::Dynamic,
        Collider::capsule_y(0.45, 0.4),
        LockedAxes::ROTATION_LOCKED,
        GravityScale(0.0),
        Velocity::zero(),
        SceneEntity,
    ));

    // Wheelchair with its hint
    let hint = commands
        .spawn((
            Sprite::from_color(Color::srgb(0.4, 0.9, 1.0), Vec2::splat(0.3)),
            Transform::from_xyz(-0.5, 1.2, 5.0),
            SceneEntity,
        ))
        .id();
    let chair = commands
        .spawn((
            Name::new("Wheelchair"),
            WheelChair {
                dialogue_image: Some(hint),
                ..default()
            },
            Sprite::from_color(Color::srgb(0.25, 0.35, 0.6), Vec2::new(1.0, 1.0)),
            Transform::from_xyz(-0.5, 0.0, 0.7),
            RigidBody::KinematicPositionBased,
            Collider::cuboid(0.5, 0.5),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
            SceneEntity,
        ))
        .id();

    // Pressure plate and the door it opens
    let door = commands
        .spawn((
            Name::new("Door"),
            Door::default(),
            AnimatorParams::default(),
            Sprite::from_color(Color::srgb(0.45, 0.3, 0.2), Vec2::new(0.4, 3.0)),
            Transform::from_xyz(6.0, 1.0, 0.3),
            RigidBody::Fixed,
            Collider::cuboid(0.2, 1.5),
            SceneEntity,
        ))
        .id();
    commands.spawn((
        Name::new("Pressure Plate"),
        PressurePlate::for_door(door),
        Sprite::from_color(Color::srgb(0.5, 0.5, 0.2), Vec2::new(1.0, 0.1)),
        Transform::from_xyz(3.5, -0.45, 0.2),
        sensor(Vec2::new(0.5, 0.3)),
        SceneEntity,
    ));

    // Conveyor belt pushing back toward the door
    let belt = SlidingFloor {
        half_extents: Vec2::new(2.0, 0.25),
        ..default()
    };
    commands.spawn((
        Name::new("Belt"),
        Sprite::from_color(Color::srgb(0.2, 0.2, 0.2), belt.half_extents * 2.0),
        Transform::from_xyz(10.0, -0.25, 0.2),
        RigidBody::Fixed,
        Collider::cuboid(belt.half_extents.x, belt.half_extents.y),
        belt,
        SceneEntity,
    ));

    // Lift: bring the wheelchair in to ride it
    let cabin_down = Vec2::new(16.0, -0.4);
    let cabin = commands
        .spawn((
            Name::new("Lift Cabin"),
            LiftCabin {
                up: Vec2::new(16.0, 3.6),
                down: cabin_down,
            },
            AnimatorParams::default().with_bool(LIFT_UP_PARAM, false),
            SmoothTranslation::new(2.0),
            Sprite::from_color(Color::srgb(0.5, 0.55, 0.6), Vec2::new(2.4, 0.2)),
            Transform::from_translation(cabin_down.extend(0.2)),
            RigidBody::KinematicPositionBased,
            Collider::cuboid(1.2, 0.1),
            SceneEntity,
        ))
        .id();
    commands.spawn((
        Name::new("Lift Call"),
        LiftManager::new(chair, cabin),
        Transform::from_xyz(16.0, 0.5, 0.0),
        sensor(Vec2::new(1.0, 1.0)),
        SceneEntity,
    ));

    // Charging station up top. Without loaded stage sprites it never goes green.
    let light = commands
        .spawn((
            Sprite {
                custom_size: Some(Vec2::splat(0.4)),
                ..default()
            },
            Transform::from_xyz(21.0, 5.0, 0.3),
            SceneEntity,
        ))
        .id();
    let stage_sprites = CHARGER_STAGE_SPRITES.map(|path| assets.map(|server| server.load(path)));
    commands.spawn((
        Name::new("Charger"),
        LightCharger {
            light_renderer: Some(light),
            stage_sprites,
            ..default()
        },
        Sprite::from_color(Color::srgb(0.3, 0.3, 0.3), Vec2::new(1.5, 0.2)),
        Transform::from_xyz(21.0, 3.6, 0.2),
        sensor(Vec2::new(0.75, 0.5)),
        SceneEntity,
    ));

    spawn_pause_menu(commands);
}

fn spawn_pause_menu(commands: &mut Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(12.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            Visibility::Hidden,
            PauseMenu,
            SceneEntity,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Paused"),
                TextFont {
                    font_size: 36.0,
                    ..default()
                },
            ));
            spawn_button(parent, "Resume", MenuAction::TogglePause);
            spawn_button(parent, "Quit", MenuAction::Quit);
        });
}

fn spawn_credits(commands: &mut Commands) {
    commands.spawn((
        Name::new("Credits"),
        Sprite::from_color(Color::srgb(0.1, 0.1, 0.2), Vec2::new(16.0, 9.0)),
        TextureScroll::new(0.05, Vec2::new(1600.0, 900.0)).then_load(SceneRef::Index(0), 8.0),
        SceneEntity,
    ));
    commands.spawn((
        Text2d::new("Thanks for playing"),
        TextFont {
            font_size: 48.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 1.0).with_scale(Vec3::splat(1.0 / 48.0)),
        SceneEntity,
    ));
}

/// Title card for scenes without content of their own, fading on to the credits.
fn spawn_interlude(commands: &mut Commands, name: &str) -> Entity {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
            ScreenFader {
                duration: 3.0,
                ease: Easing::SmoothStep,
                scene: SceneRef::Name("credits".to_string()),
                ..default()
            },
            SceneEntity,
        ))
        .with_children(|parent| {
            parent.spawn(Text::new(name.replace('_', " ")));
        })
        .id()
}
