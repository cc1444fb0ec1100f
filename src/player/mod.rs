//! Player components and systems (input, look, movement, stats).
//!
//! The character control loop is split into small systems that run chained in
//! `Update`, each a thin wrapper over a plain step function:
//!
//! 1. input: `reset_character_input`, `keyboard_mouse_input`, touch buttons
//! 2. `camera_look`: yaw on the body, pitch on the camera child
//! 3. `player_movement`: speed/stamina policy and collision-aware displacement
//! 4. interaction, flashlight, sanity and damage
//!
//! # Example:
//!
//! ```no_run
//! use bevy::prelude::*;
//! use lantern::player::{spawn_player, ControllerPlugin};
//! use lantern::settings::Settings;
//!
//! fn setup(mut commands: Commands, settings: Res<Settings>) {
//!     spawn_player(&mut commands, &settings, Vec3::new(0.0, 1.0, 0.0));
//! }
//!
//! App::new()
//!     .insert_resource(Settings::default())
//!     .add_plugins(ControllerPlugin)
//!     .add_systems(Startup, setup);
//! ```
pub mod camera;
pub mod input;
pub mod movement;
pub mod physics;
pub mod sanity;
pub mod stats;

use bevy::prelude::*;

pub use camera::*;
pub use input::*;
pub use movement::*;
pub use physics::*;
pub use sanity::*;
pub use stats::*;

use crate::interaction::{self, InteractionPrompt};
use crate::lighting::{self, Flashlight, FlickerTask};
use crate::settings::Settings;
use crate::world::ColliderWorld;

/// Marker for the player-controlled character body.
#[derive(Component, Debug, Default)]
pub struct Player;

/// Marker for the spot light child carried by the player.
#[derive(Component, Debug, Default)]
pub struct FlashlightBeam;

/// Ordering of the control loop within `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlSet {
    /// Fill `CharacterInput`.
    Input,
    /// Look, move, interact.
    Act,
    /// Stats, lights and other consequences of this frame.
    React,
}

/// Registers the character control loop.
///
/// Expects a `Settings` resource. Desktop input (`keyboard_mouse_input`,
/// `cursor_grab`) is added by the binary since it needs window and input
/// plugins.
pub struct ControllerPlugin;

impl Plugin for ControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CharacterInput>()
            .init_resource::<ColliderWorld>()
            .init_resource::<InteractionPrompt>()
            .add_event::<DamageEvent>()
            .add_event::<PlayerDied>()
            .configure_sets(Update, (ControlSet::Input, ControlSet::Act, ControlSet::React).chain())
            .add_systems(First, reset_character_input)
            .add_systems(
                Update,
                (
                    camera_look,
                    player_movement,
                    interaction::player_interaction::<ColliderWorld>,
                    lighting::toggle_flashlight,
                )
                    .chain()
                    .in_set(ControlSet::Act),
            )
            .add_systems(
                Update,
                (
                    lighting::flashlight_flicker,
                    lighting::sync_flashlight,
                    player_sanity,
                    apply_damage,
                    interaction::interaction_prompt::<ColliderWorld>,
                    interaction::props::animate_doors,
                    interaction::props::sync_light_switches,
                )
                    .in_set(ControlSet::React),
            );
    }
}

/// Spawn a player body with its camera and flashlight children.
///
/// The flicker task handle lives on the body, so despawning the player
/// (recursively) cancels the task.
pub fn spawn_player(commands: &mut Commands, settings: &Settings, position: Vec3) -> Entity {
    let movement = &settings.movement;
    let flashlight = Flashlight::new(settings.flashlight.start_on);
    let (flicker, handle) = FlickerTask::new(&settings.flashlight);

    let body = commands
        .spawn((
            SpatialBundle::from_transform(Transform::from_translation(position)),
            Player,
            PlayerLook::default(),
            MovementState::default(),
            CharacterBody::new(movement.stand_height, movement.radius),
            Vitals::from_settings(settings),
            flashlight,
            flicker,
            handle,
        ))
        .id();

    let eye = Vec3::Y * (movement.stand_height - settings.camera.eye_offset);
    commands.entity(body).with_children(|parent| {
        parent.spawn((
            Camera3dBundle {
                transform: Transform::from_translation(eye),
                ..default()
            },
            PlayerCamera,
        ));
        parent.spawn((
            SpotLightBundle {
                spot_light: SpotLight {
                    intensity: flashlight.output(&settings.flashlight),
                    range: settings.flashlight.range,
                    outer_angle: 0.45,
                    inner_angle: 0.3,
                    shadows_enabled: true,
                    ..default()
                },
                transform: Transform::from_translation(eye),
                ..default()
            },
            FlashlightBeam,
        ));
    });

    info!("spawned player {body:?} at {position}");
    body
}
