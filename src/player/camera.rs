//! Look orientation and cursor helpers.
//!
//! Yaw turns the player body; pitch tilts only the child camera node, so the
//! movement basis never picks up pitch. `cursor_grab` locks the cursor on
//! click and releases it on the pause key.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use crate::player::input::CharacterInput;
use crate::player::stats::Vitals;
use crate::player::{FlashlightBeam, Player};
use crate::settings::{CameraSettings, ControlsSettings, Settings};

/// Marker for the camera node parented under a player.
#[derive(Component, Debug, Default)]
pub struct PlayerCamera;

/// Stores the player's look orientation (yaw and pitch) in radians.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct PlayerLook {
    /// Horizontal angle (radians), applied to the body.
    pub yaw: f32,
    /// Vertical angle (radians), applied to the camera.
    pub pitch: f32,
}

impl PlayerLook {
    /// Apply a look delta (updates yaw/pitch, clamping pitch when configured).
    pub fn apply_delta(&mut self, delta: Vec2, controls: &ControlsSettings, camera: &CameraSettings) {
        let mut delta = delta;
        if controls.invert_x { delta.x = -delta.x; }
        if controls.invert_y { delta.y = -delta.y; }

        let scale = controls.look_sensitivity.to_radians();
        self.yaw -= delta.x * scale;
        self.pitch -= delta.y * scale;

        if let Some(max_deg) = camera.max_pitch_deg {
            let max_pitch = max_deg.abs().to_radians();
            self.pitch = self.pitch.clamp(-max_pitch, max_pitch);
        }
    }

    #[must_use]
    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    #[must_use]
    pub fn camera_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch)
    }
}

/// Apply the frame's look input to living player bodies and their cameras.
///
/// The flashlight beam pitches with the camera so it lights what the player
/// looks at.
#[allow(clippy::needless_pass_by_value)]
pub fn camera_look(
    input: Res<CharacterInput>,
    settings: Res<Settings>,
    mut players: Query<(&mut Transform, &mut PlayerLook, &Vitals, &Children), With<Player>>,
    mut cameras: Query<&mut Transform, (Or<(With<PlayerCamera>, With<FlashlightBeam>)>, Without<Player>)>,
) {
    if input.look == Vec2::ZERO {
        return;
    }

    for (mut body_tf, mut look, vitals, children) in &mut players {
        if vitals.is_dead() {
            continue;
        }
        look.apply_delta(input.look, &settings.controls, &settings.camera);
        body_tf.rotation = look.body_rotation();

        for child in children.iter() {
            if let Ok(mut cam_tf) = cameras.get_mut(*child) {
                cam_tf.rotation = look.camera_rotation();
            }
        }
    }
}

/// Toggle cursor grab and visibility.
#[allow(clippy::needless_pass_by_value)]
pub fn cursor_grab(
    mut wq: Query<&mut Window, With<PrimaryWindow>>,
    mb: Res<ButtonInput<MouseButton>>,
    kb: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    let Ok(mut w) = wq.get_single_mut() else { return };
    if mb.just_pressed(MouseButton::Left) {
        w.cursor.grab_mode = CursorGrabMode::Locked;
        w.cursor.visible = false;
    }

    if kb.just_pressed(settings.controls.key_for("pause", KeyCode::Escape)) {
        w.cursor.grab_mode = CursorGrabMode::None;
        w.cursor.visible = true;
    }
}
