use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use bevy::math::{Vec2, Vec3};
use bevy::prelude::Transform;
use lantern::interaction::try_interact;
use lantern::lighting::{flicker_tick, Flashlight};
use lantern::player::camera::PlayerLook;
use lantern::player::{
    movement_step, CharacterBody, CharacterMover, KinematicMover, MoveBasis, MovementInput, MovementState,
};
use lantern::settings::Settings;
use lantern::world::{Collider, ColliderWorld, SpatialQuery, LAYER_INTERACTABLE, LAYER_STATIC};

/// Room with a floor, four walls and a row of props.
fn test_room() -> ColliderWorld {
    let mut w = ColliderWorld::new();
    w.insert(Collider::cuboid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 1.0, 20.0), LAYER_STATIC));
    for (x, z, sx, sz) in [(10.0, 0.0, 0.2, 20.0), (-10.0, 0.0, 0.2, 20.0), (0.0, 10.0, 20.0, 0.2), (0.0, -10.0, 20.0, 0.2)] {
        w.insert(Collider::cuboid(Vec3::new(x, 1.5, z), Vec3::new(sx, 3.0, sz), LAYER_STATIC));
    }
    for i in 0..32 {
        let x = (i % 8) as f32 * 2.0 - 7.0;
        let z = (i / 8) as f32 * 2.0 - 4.0;
        w.insert(Collider::cuboid(Vec3::new(x, 0.5, z), Vec3::splat(0.5), LAYER_INTERACTABLE));
    }
    w
}

/// Randomized look deltas (deterministic LCG) to approximate variable input
fn bench_camera_look(c: &mut Criterion) {
    let s = Settings::default();
    c.bench_function("camera_look_random", |b| {
        b.iter(|| {
            let mut look = PlayerLook::default();
            let mut state: u32 = 0x1234_5678;
            for _ in 0..1_000usize {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                let dx = (((state >> 16) & 0x7fff) as f32 / 32767.0) * 200.0 - 100.0;
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                let dy = (((state >> 16) & 0x7fff) as f32 / 32767.0) * 200.0 - 100.0;
                look.apply_delta(black_box(Vec2::new(dx, dy)), &s.controls, &s.camera);
            }
            black_box((look.yaw, look.pitch));
        })
    });
}

fn bench_movement_policy(c: &mut Criterion) {
    let s = Settings::default();
    let basis = MoveBasis { right: Vec3::X, forward: Vec3::NEG_Z };
    c.bench_function("movement_step_run_and_walk", |b| {
        b.iter(|| {
            let mut state = MovementState::default();
            let mut stamina = s.stamina.to_stat();
            let dt = 1.0 / 60.0;
            for i in 0..5_000usize {
                let input = MovementInput {
                    axis: Vec2::new(0.3, 1.0),
                    run: (i / 300) % 2 == 0,
                    crouch_pressed: i % 1_000 == 0,
                };
                black_box(movement_step(&mut state, &mut stamina, input, basis, true, dt, &s.movement));
            }
            black_box((state, stamina));
        })
    });
}

/// Physics stepping around the room, walking into walls and props.
fn bench_player_physics_sim(c: &mut Criterion) {
    let world = test_room();
    let s = Settings::default();
    let basis = MoveBasis { right: Vec3::X, forward: Vec3::NEG_Z };

    c.bench_function("player_physics_many_steps", |b| {
        b.iter(|| {
            let mut tf = Transform::from_xyz(0.0, 2.0, 0.0);
            let mut body = CharacterBody::new(s.movement.stand_height, s.movement.radius);
            let mut state = MovementState::default();
            let mut stamina = s.stamina.to_stat();
            let dt = 1.0f32 / 60.0f32;
            let input = MovementInput { axis: Vec2::new(0.2, 1.0), ..Default::default() };

            for _ in 0..5_000 {
                let mut mover = KinematicMover::new(&mut tf, &mut body, &world);
                let frame = movement_step(&mut state, &mut stamina, input, basis, mover.is_grounded(), dt, &s.movement);
                mover.move_by(frame.velocity * dt);
            }

            black_box((tf, body));
        })
    });
}

fn bench_raycast(c: &mut Criterion) {
    let world = test_room();
    let s = Settings::default();
    c.bench_function("interaction_raycast", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for i in 0..1_000usize {
                let angle = i as f32 * 0.0063;
                let dir = Vec3::new(angle.sin(), -0.2, -angle.cos());
                if world.raycast(Vec3::new(0.0, 1.8, 0.0), dir, 20.0, None).is_some() {
                    hits += 1;
                }
                black_box(try_interact(&world, Vec3::new(0.0, 1.8, 0.0), dir, &s.interaction, |_| true));
            }
            black_box(hits);
        })
    });
}

fn bench_flicker(c: &mut Criterion) {
    let s = Settings::default();
    c.bench_function("flashlight_flicker_samples", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            let mut light = Flashlight::new(true);
            let mut dark = 0u32;
            for _ in 0..10_000 {
                flicker_tick(&mut light, &mut rng, &s.flashlight);
                dark += u32::from(!light.enabled);
            }
            black_box(dark);
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(200);
    targets =
        bench_camera_look,
        bench_movement_policy,
        bench_player_physics_sim,
        bench_raycast,
        bench_flicker
}
criterion_main!(benches);
