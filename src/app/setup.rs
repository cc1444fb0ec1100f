//! Startup system building the test level.
//!
//! The level is a dark room with a doorway, a lamp on a switch, a note and a
//! hazard. Every solid box is registered in the `ColliderWorld` so the mover
//! and the interaction ray see the same geometry that is rendered.
use bevy::prelude::*;
use lantern::interaction::{Door, LightSwitch, Note};
use lantern::player::spawn_player;
use lantern::settings::Settings;
use lantern::world::{Collider, ColliderWorld, LAYER_INTERACTABLE, LAYER_STATIC};

use super::Hazard;

const ROOM_HALF: f32 = 8.0;
const WALL_HEIGHT: f32 = 3.0;

struct LevelBuilder<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a mut Assets<Mesh>,
    materials: &'a mut Assets<StandardMaterial>,
    world: &'a mut ColliderWorld,
}

impl LevelBuilder<'_, '_, '_> {
    /// Spawn a rendered box and register its collider.
    fn solid(&mut self, center: Vec3, size: Vec3, color: Color, layers: u32) -> Entity {
        let entity = self
            .commands
            .spawn(PbrBundle {
                mesh: self.meshes.add(Cuboid::new(size.x, size.y, size.z)),
                material: self.materials.add(color),
                transform: Transform::from_translation(center),
                ..default()
            })
            .id();
        self.world.insert(Collider::cuboid(center, size, layers).with_owner(entity));
        entity
    }
}

/// Build the room, its props and the player.
#[allow(clippy::needless_pass_by_value)]
pub fn setup_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut world: ResMut<ColliderWorld>,
    settings: Res<Settings>,
) {
    let wall = Color::srgb(0.25, 0.24, 0.22);
    let mut level = LevelBuilder {
        commands: &mut commands,
        meshes: &mut meshes,
        materials: &mut materials,
        world: &mut world,
    };

    // floor and ceiling
    level.solid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(ROOM_HALF * 2.0, 1.0, ROOM_HALF * 2.0), wall, LAYER_STATIC);
    level.solid(
        Vec3::new(0.0, WALL_HEIGHT + 0.5, 0.0),
        Vec3::new(ROOM_HALF * 2.0, 1.0, ROOM_HALF * 2.0),
        wall,
        LAYER_STATIC,
    );

    // walls, the north one split around a doorway
    let y = WALL_HEIGHT * 0.5;
    level.solid(Vec3::new(0.0, y, ROOM_HALF), Vec3::new(ROOM_HALF * 2.0, WALL_HEIGHT, 0.2), wall, LAYER_STATIC);
    level.solid(Vec3::new(ROOM_HALF, y, 0.0), Vec3::new(0.2, WALL_HEIGHT, ROOM_HALF * 2.0), wall, LAYER_STATIC);
    level.solid(Vec3::new(-ROOM_HALF, y, 0.0), Vec3::new(0.2, WALL_HEIGHT, ROOM_HALF * 2.0), wall, LAYER_STATIC);
    level.solid(Vec3::new(-4.75, y, -ROOM_HALF), Vec3::new(6.5, WALL_HEIGHT, 0.2), wall, LAYER_STATIC);
    level.solid(Vec3::new(4.75, y, -ROOM_HALF), Vec3::new(6.5, WALL_HEIGHT, 0.2), wall, LAYER_STATIC);

    let door = level.solid(
        Vec3::new(0.0, 1.1, -ROOM_HALF),
        Vec3::new(3.0, 2.2, 0.1),
        Color::srgb(0.35, 0.2, 0.1),
        LAYER_INTERACTABLE,
    );
    level.commands.entity(door).insert(Door::default());

    let table = Color::srgb(0.3, 0.22, 0.15);
    level.solid(Vec3::new(3.0, 0.4, 3.0), Vec3::new(1.6, 0.8, 0.9), table, LAYER_STATIC);
    let note = level.solid(
        Vec3::new(3.0, 0.82, 3.0),
        Vec3::new(0.3, 0.04, 0.4),
        Color::srgb(0.85, 0.82, 0.7),
        LAYER_INTERACTABLE,
    );
    level
        .commands
        .entity(note)
        .insert(Note::new("Keep the light on. It only moves in the dark."));

    let switch = level.solid(
        Vec3::new(-ROOM_HALF + 0.15, 1.3, 2.0),
        Vec3::new(0.1, 0.25, 0.15),
        Color::srgb(0.8, 0.8, 0.8),
        LAYER_INTERACTABLE,
    );
    level
        .commands
        .entity(switch)
        .insert(LightSwitch { on: false, radius: 4.0 })
        .with_children(|p| {
            p.spawn(PointLightBundle {
                point_light: PointLight {
                    intensity: 0.0,
                    range: 8.0,
                    shadows_enabled: true,
                    ..default()
                },
                transform: Transform::from_xyz(2.0, 1.5, 0.0),
                ..default()
            });
        });

    commands.spawn((
        SpatialBundle::from_transform(Transform::from_xyz(-5.0, 0.0, -5.0)),
        Hazard { radius: 1.0, damage_per_second: 20.0 },
    ));

    spawn_player(&mut commands, &settings, Vec3::new(0.0, 0.1, 4.0));
}
