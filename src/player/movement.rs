//! Movement and stamina policy.
//!
//! `movement_step` is the whole per-frame policy as a plain function: it
//! picks walk/run/crouch speed against the stamina pool, toggles crouch,
//! integrates vertical velocity and returns the velocity to hand to a
//! [`CharacterMover`]. `player_movement` is the Bevy system that feeds it.

use crate::player::camera::PlayerCamera;
use crate::player::input::CharacterInput;
use crate::player::physics::{CharacterBody, CharacterMover, KinematicMover};
use crate::player::stats::{Stat, Vitals};
use crate::player::{FlashlightBeam, Player};
use crate::settings::{MovementSettings, Settings};
use crate::world::ColliderWorld;
use bevy::prelude::*;

/// Which speed the character moved at this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedMode {
    #[default]
    Walk,
    Run,
    Crouch,
}

/// Per-character movement state carried between frames.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementState {
    pub mode: SpeedMode,
    pub crouched: bool,
    pub vertical_velocity: f32,
}

/// Inputs the policy reads for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementInput {
    /// Strafe (x) and forward (y), each in `-1..=1`.
    pub axis: Vec2,
    pub run: bool,
    /// Crouch toggle edge.
    pub crouch_pressed: bool,
}

/// Horizontal basis the move axis is expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveBasis {
    pub right: Vec3,
    pub forward: Vec3,
}

impl MoveBasis {
    /// Flattened right/forward of a transform. Pitch never leaks into movement.
    #[must_use]
    pub fn from_transform(tf: &Transform) -> Self {
        let flat = |v: Vec3| Vec3::new(v.x, 0.0, v.z).normalize_or_zero();
        Self {
            right: flat(*tf.right()),
            forward: flat(*tf.forward()),
        }
    }
}

/// Result of one policy step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementFrame {
    /// World-space velocity in units per second.
    pub velocity: Vec3,
    /// New collision height when crouch toggled this frame.
    pub new_height: Option<f32>,
}

/// Run one frame of the movement/stamina policy.
///
/// Crouch toggles first, so a frame that starts crouching already moves at
/// crouch speed and cannot run. Running needs stamina above zero and drains it;
/// walking regenerates it. Crouching does neither.
pub fn movement_step(
    state: &mut MovementState,
    stamina: &mut Stat,
    input: MovementInput,
    basis: MoveBasis,
    grounded: bool,
    dt: f32,
    tuning: &MovementSettings,
) -> MovementFrame {
    let dt = dt.max(0.0);

    let new_height = input.crouch_pressed.then(|| {
        state.crouched = !state.crouched;
        if state.crouched { tuning.crouch_height } else { tuning.stand_height }
    });

    state.mode = if input.run && !stamina.is_empty() && !state.crouched {
        SpeedMode::Run
    } else if state.crouched {
        SpeedMode::Crouch
    } else {
        SpeedMode::Walk
    };

    let speed = match state.mode {
        SpeedMode::Run => {
            stamina.drain(dt, 1.0);
            tuning.run_speed
        }
        SpeedMode::Crouch => tuning.crouch_speed,
        SpeedMode::Walk => {
            stamina.regen(dt);
            tuning.walk_speed
        }
    };

    if grounded {
        state.vertical_velocity = tuning.grounded_bias;
    } else {
        state.vertical_velocity += tuning.gravity * dt;
    }

    let axis = input.axis.clamp_length_max(1.0);
    let planar = basis.right * axis.x + basis.forward * axis.y;
    let mut velocity = planar * speed;
    velocity.y = state.vertical_velocity;

    MovementFrame { velocity, new_height }
}

/// Apply the movement policy to every player and move it through the world.
#[allow(clippy::needless_pass_by_value)]
pub fn player_movement(
    time: Res<Time>,
    input: Res<CharacterInput>,
    settings: Res<Settings>,
    world: Res<ColliderWorld>,
    mut players: Query<(&mut Transform, &mut CharacterBody, &mut MovementState, &mut Vitals, &Children), With<Player>>,
    mut cameras: Query<&mut Transform, (Or<(With<PlayerCamera>, With<FlashlightBeam>)>, Without<Player>)>,
) {
    let dt = time.delta_seconds();
    let move_input = MovementInput {
        axis: input.axis,
        run: input.run,
        crouch_pressed: input.crouch_pressed,
    };

    for (mut tf, mut body, mut state, mut vitals, children) in &mut players {
        if vitals.is_dead() {
            continue;
        }
        let basis = MoveBasis::from_transform(&tf);
        let mut mover = KinematicMover::new(&mut tf, &mut body, &world);
        let frame = movement_step(
            &mut state,
            &mut vitals.stamina,
            move_input,
            basis,
            mover.is_grounded(),
            dt,
            &settings.movement,
        );

        if let Some(height) = frame.new_height {
            mover.set_height(height);
            for child in children.iter() {
                if let Ok(mut cam) = cameras.get_mut(*child) {
                    cam.translation.y = height - settings.camera.eye_offset;
                }
            }
        }
        mover.move_by(frame.velocity * dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basis() -> MoveBasis {
        MoveBasis { right: Vec3::X, forward: Vec3::NEG_Z }
    }

    fn stamina(t: &Settings) -> Stat {
        t.stamina.to_stat()
    }

    #[test]
    fn walk_is_default_and_regenerates() {
        let s = Settings::default();
        let mut st = MovementState::default();
        let mut sp = stamina(&s);
        sp.set(1.0);
        let input = MovementInput { axis: Vec2::Y, ..default() };
        let f = movement_step(&mut st, &mut sp, input, basis(), true, 0.5, &s.movement);
        assert_eq!(st.mode, SpeedMode::Walk);
        assert_eq!(f.velocity.z, -3.0);
        assert_eq!(sp.current(), 1.5);
    }

    #[test]
    fn running_drains_until_empty_then_walks() {
        let s = Settings::default();
        let mut st = MovementState::default();
        let mut sp = stamina(&s);
        let input = MovementInput { axis: Vec2::Y, run: true, ..default() };

        let mut frames = 0;
        while !sp.is_empty() {
            let f = movement_step(&mut st, &mut sp, input, basis(), true, 0.25, &s.movement);
            assert_eq!(st.mode, SpeedMode::Run);
            assert_eq!(f.velocity.z, -6.0);
            frames += 1;
        }
        assert_eq!(frames, 20);

        movement_step(&mut st, &mut sp, input, basis(), true, 0.25, &s.movement);
        assert_eq!(st.mode, SpeedMode::Walk);
    }

    #[test]
    fn never_runs_while_crouched() {
        let s = Settings::default();
        let mut st = MovementState::default();
        let mut sp = stamina(&s);
        let toggle = MovementInput { axis: Vec2::X, run: true, crouch_pressed: true };
        let f = movement_step(&mut st, &mut sp, toggle, basis(), true, 0.1, &s.movement);
        assert_eq!(st.mode, SpeedMode::Crouch);
        assert_eq!(f.velocity.x, 1.5);
        assert_eq!(sp.current(), 5.0);

        let hold = MovementInput { crouch_pressed: false, ..toggle };
        for _ in 0..10 {
            movement_step(&mut st, &mut sp, hold, basis(), true, 0.1, &s.movement);
            assert_ne!(st.mode, SpeedMode::Run);
        }
    }

    #[test]
    fn crouching_neither_drains_nor_regenerates() {
        let s = Settings::default();
        let mut st = MovementState::default();
        let mut sp = stamina(&s);
        sp.set(2.0);
        let toggle = MovementInput { axis: Vec2::Y, crouch_pressed: true, ..default() };
        movement_step(&mut st, &mut sp, toggle, basis(), true, 0.25, &s.movement);
        assert_eq!(st.mode, SpeedMode::Crouch);
        assert_eq!(sp.current(), 2.0);

        for run in [false, true, false, true, true, false] {
            let input = MovementInput { axis: Vec2::Y, run, crouch_pressed: false };
            movement_step(&mut st, &mut sp, input, basis(), true, 0.25, &s.movement);
            assert_eq!(st.mode, SpeedMode::Crouch);
            assert_eq!(sp.current(), 2.0);
        }
    }

    #[test]
    fn crouch_toggle_alternates_between_two_heights() {
        let s = Settings::default();
        let mut st = MovementState::default();
        let mut sp = stamina(&s);
        let press = MovementInput { crouch_pressed: true, ..default() };
        let heights: Vec<f32> = (0..4)
            .filter_map(|_| movement_step(&mut st, &mut sp, press, basis(), true, 0.016, &s.movement).new_height)
            .collect();
        assert_eq!(heights, vec![1.0, 2.0, 1.0, 2.0]);

        let none = movement_step(&mut st, &mut sp, MovementInput::default(), basis(), true, 0.016, &s.movement);
        assert_eq!(none.new_height, None);
    }

    #[test]
    fn gravity_accumulates_in_air_and_resets_on_ground() {
        let s = Settings::default();
        let mut st = MovementState::default();
        let mut sp = stamina(&s);
        movement_step(&mut st, &mut sp, MovementInput::default(), basis(), false, 1.0, &s.movement);
        movement_step(&mut st, &mut sp, MovementInput::default(), basis(), false, 1.0, &s.movement);
        assert!((st.vertical_velocity + 19.62).abs() < 1e-4);

        let f = movement_step(&mut st, &mut sp, MovementInput::default(), basis(), true, 1.0, &s.movement);
        assert_eq!(st.vertical_velocity, -2.0);
        assert_eq!(f.velocity.y, -2.0);
    }

    #[test]
    fn diagonal_input_is_not_faster() {
        let s = Settings::default();
        let mut st = MovementState::default();
        let mut sp = stamina(&s);
        let input = MovementInput { axis: Vec2::new(1.0, 1.0), ..default() };
        let f = movement_step(&mut st, &mut sp, input, basis(), true, 0.1, &s.movement);
        let planar = Vec2::new(f.velocity.x, f.velocity.z).length();
        assert!((planar - 3.0).abs() < 1e-4);
    }

    #[test]
    fn basis_ignores_pitch() {
        let tf = Transform::from_rotation(Quat::from_euler(bevy::math::EulerRot::YXZ, 0.0, -0.8, 0.0));
        let b = MoveBasis::from_transform(&tf);
        assert!((b.forward - Vec3::NEG_Z).length() < 1e-5);
        assert_eq!(b.forward.y, 0.0);
    }
}
