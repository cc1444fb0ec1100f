//! Per-frame character input.
//!
//! Keyboard/mouse and on-screen touch buttons both write into
//! [`CharacterInput`]. Edges (`*_pressed`) are true for exactly one frame.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::settings::Settings;

/// Normalized input for the character control loop.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CharacterInput {
    /// Strafe (x) and forward (y).
    pub axis: Vec2,
    /// Look delta for this frame.
    pub look: Vec2,
    /// Run held.
    pub run: bool,
    pub crouch_pressed: bool,
    pub interact_pressed: bool,
    pub flashlight_pressed: bool,
}

impl CharacterInput {
    /// Clear everything that only lives for one frame.
    pub fn begin_frame(&mut self) {
        *self = Self::default();
    }
}

/// Reset the input resource at the start of the frame.
pub fn reset_character_input(mut input: ResMut<CharacterInput>) {
    input.begin_frame();
}

/// Read keyboard and mouse into [`CharacterInput`].
///
/// Mouse motion only counts while the cursor is grabbed.
#[allow(clippy::needless_pass_by_value)]
pub fn keyboard_mouse_input(
    kb: Res<ButtonInput<KeyCode>>,
    mut motion: EventReader<MouseMotion>,
    windows: Query<&Window, With<PrimaryWindow>>,
    settings: Res<Settings>,
    mut input: ResMut<CharacterInput>,
) {
    let controls = &settings.controls;
    let held = |action: &str, default: KeyCode| kb.pressed(controls.key_for(action, default));
    let edge = |action: &str, default: KeyCode| kb.just_pressed(controls.key_for(action, default));

    let mut axis = Vec2::ZERO;
    if held("forward", KeyCode::KeyW) { axis.y += 1.0; }
    if held("back", KeyCode::KeyS) { axis.y -= 1.0; }
    if held("right", KeyCode::KeyD) { axis.x += 1.0; }
    if held("left", KeyCode::KeyA) { axis.x -= 1.0; }
    input.axis += axis;

    input.run |= held("run", KeyCode::ShiftLeft);
    input.crouch_pressed |= edge("crouch", KeyCode::KeyC);
    input.interact_pressed |= edge("interact", KeyCode::KeyE);
    input.flashlight_pressed |= edge("flashlight", KeyCode::KeyF);

    let grabbed = windows.get_single().is_ok_and(|w| !w.cursor.visible);
    let delta: Vec2 = motion.read().map(|ev| ev.delta).sum();
    if grabbed {
        input.look += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_frame_clears_edges_and_axes() {
        let mut input = CharacterInput {
            axis: Vec2::ONE,
            look: Vec2::ONE,
            run: true,
            crouch_pressed: true,
            interact_pressed: true,
            flashlight_pressed: true,
        };
        input.begin_frame();
        assert_eq!(input, CharacterInput::default());
    }
}
