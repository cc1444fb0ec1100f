//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! through the RON watcher utilities (see `ron::setup_ron_watcher`). Every field
//! has a serde default so a partial file only overrides what it names.
pub mod loader;

use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::player::stats::Stat;

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default)]
    pub invert_y: bool, // Invert look Y axis
    #[serde(default)]
    pub invert_x: bool, // Invert look X axis
    #[serde(default = "ControlsSettings::default_sensitivity")]
    pub look_sensitivity: f32, // Degrees of rotation per unit of look input
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Map of action names to key identifiers
}

impl ControlsSettings {
    fn default_sensitivity() -> f32 { 0.1 }

    fn default_keybinds() -> HashMap<String, String> {
        [
            ("forward", "W"),
            ("back", "S"),
            ("left", "A"),
            ("right", "D"),
            ("run", "LShift"),
            ("crouch", "C"),
            ("interact", "E"),
            ("flashlight", "F"),
            ("pause", "Escape"),
        ]
        .into_iter()
        .map(|(action, key)| (action.to_string(), key.to_string()))
        .collect()
    }

    /// Resolve the key bound to `action`, falling back to `default` when the
    /// binding is missing or names an unknown key.
    #[must_use]
    pub fn key_for(&self, action: &str, default: KeyCode) -> KeyCode {
        self.keybinds
            .get(action)
            .and_then(|s| Settings::keycode_from_str(s))
            .unwrap_or(default)
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            invert_y: false,
            invert_x: false,
            look_sensitivity: Self::default_sensitivity(),
            keybinds: Self::default_keybinds(),
        }
    }
}

/// Camera placement and look limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Pitch limit in degrees either side of the horizon. `None` leaves pitch
    /// unbounded.
    #[serde(default = "CameraSettings::default_max_pitch")]
    pub max_pitch_deg: Option<f32>,
    #[serde(default = "CameraSettings::default_eye_offset")]
    pub eye_offset: f32, // Distance from the top of the body down to the camera
}

impl CameraSettings {
    fn default_max_pitch() -> Option<f32> { Some(89.0) }
    fn default_eye_offset() -> f32 { 0.2 }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            max_pitch_deg: Self::default_max_pitch(),
            eye_offset: Self::default_eye_offset(),
        }
    }
}

/// Speeds, gravity and collision shape of the character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementSettings {
    #[serde(default = "MovementSettings::default_walk")]
    pub walk_speed: f32,
    #[serde(default = "MovementSettings::default_run")]
    pub run_speed: f32,
    #[serde(default = "MovementSettings::default_crouch")]
    pub crouch_speed: f32,
    #[serde(default = "MovementSettings::default_gravity")]
    pub gravity: f32, // Vertical acceleration (negative is down)
    #[serde(default = "MovementSettings::default_grounded_bias")]
    pub grounded_bias: f32, // Vertical velocity held while grounded to keep floor contact
    #[serde(default = "MovementSettings::default_stand_height")]
    pub stand_height: f32,
    #[serde(default = "MovementSettings::default_crouch_height")]
    pub crouch_height: f32,
    #[serde(default = "MovementSettings::default_radius")]
    pub radius: f32,
}

impl MovementSettings {
    fn default_walk() -> f32 { 3.0 }
    fn default_run() -> f32 { 6.0 }
    fn default_crouch() -> f32 { 1.5 }
    fn default_gravity() -> f32 { -9.81 }
    fn default_grounded_bias() -> f32 { -2.0 }
    fn default_stand_height() -> f32 { 2.0 }
    fn default_crouch_height() -> f32 { 1.0 }
    fn default_radius() -> f32 { 0.4 }
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            walk_speed: Self::default_walk(),
            run_speed: Self::default_run(),
            crouch_speed: Self::default_crouch(),
            gravity: Self::default_gravity(),
            grounded_bias: Self::default_grounded_bias(),
            stand_height: Self::default_stand_height(),
            crouch_height: Self::default_crouch_height(),
            radius: Self::default_radius(),
        }
    }
}

/// Tuning for a single clamped stat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatSettings {
    pub max: f32,
    #[serde(default)]
    pub regen_rate: f32, // Units per second restored while regenerating
    #[serde(default)]
    pub drain_rate: f32, // Units per second removed while draining
}

impl StatSettings {
    /// Build a full stat from these settings.
    #[must_use]
    pub fn to_stat(self) -> Stat {
        Stat::new(self.max, self.regen_rate, self.drain_rate)
    }
}

/// Sanity drain tuning. Only used when `enabled` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitySettings {
    #[serde(default = "SanitySettings::default_enabled")]
    pub enabled: bool,
    #[serde(default = "SanitySettings::default_stat")]
    pub stat: StatSettings,
    #[serde(default = "SanitySettings::default_dark_multiplier")]
    pub dark_multiplier: f32, // Drain multiplier applied while out of any light
}

impl SanitySettings {
    fn default_enabled() -> bool { true }
    fn default_stat() -> StatSettings { StatSettings { max: 100.0, regen_rate: 0.0, drain_rate: 0.5 } }
    fn default_dark_multiplier() -> f32 { 3.0 }
}

impl Default for SanitySettings {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            stat: Self::default_stat(),
            dark_multiplier: Self::default_dark_multiplier(),
        }
    }
}

/// Flashlight flicker tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashlightSettings {
    #[serde(default = "FlashlightSettings::default_interval")]
    pub flicker_interval: f32, // Seconds between flicker samples
    #[serde(default = "FlashlightSettings::default_intensity_min")]
    pub intensity_min: f32,
    #[serde(default = "FlashlightSettings::default_intensity_max")]
    pub intensity_max: f32,
    #[serde(default = "FlashlightSettings::default_on_probability")]
    pub on_probability: f64, // Chance that a sample leaves the bulb lit
    #[serde(default = "FlashlightSettings::default_lumens")]
    pub lumens: f32, // Spot light intensity at an intensity factor of 1.0
    #[serde(default = "FlashlightSettings::default_range")]
    pub range: f32,
    #[serde(default)]
    pub start_on: bool,
}

impl FlashlightSettings {
    fn default_interval() -> f32 { 0.1 }
    fn default_intensity_min() -> f32 { 0.8 }
    fn default_intensity_max() -> f32 { 1.2 }
    fn default_on_probability() -> f64 { 0.95 }
    fn default_lumens() -> f32 { 200_000.0 }
    fn default_range() -> f32 { 25.0 }
}

impl Default for FlashlightSettings {
    fn default() -> Self {
        Self {
            flicker_interval: Self::default_interval(),
            intensity_min: Self::default_intensity_min(),
            intensity_max: Self::default_intensity_max(),
            on_probability: Self::default_on_probability(),
            lumens: Self::default_lumens(),
            range: Self::default_range(),
            start_on: false,
        }
    }
}

/// Interaction ray tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionSettings {
    #[serde(default = "InteractionSettings::default_distance")]
    pub distance: f32,
    /// Collider layers the interaction ray can hit. `None` hits every layer.
    #[serde(default)]
    pub layer_mask: Option<u32>,
}

impl InteractionSettings {
    fn default_distance() -> f32 { 2.0 }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            distance: Self::default_distance(),
            layer_mask: None,
        }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub movement: MovementSettings,
    #[serde(default = "Settings::default_stamina")]
    pub stamina: StatSettings,
    #[serde(default = "Settings::default_health")]
    pub health: StatSettings,
    #[serde(default)]
    pub sanity: SanitySettings,
    #[serde(default)]
    pub flashlight: FlashlightSettings,
    #[serde(default)]
    pub interaction: InteractionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            controls: ControlsSettings::default(),
            camera: CameraSettings::default(),
            movement: MovementSettings::default(),
            stamina: Self::default_stamina(),
            health: Self::default_health(),
            sanity: SanitySettings::default(),
            flashlight: FlashlightSettings::default(),
            interaction: InteractionSettings::default(),
        }
    }
}

impl Settings {
    fn default_stamina() -> StatSettings { StatSettings { max: 5.0, regen_rate: 1.0, drain_rate: 1.0 } }
    fn default_health() -> StatSettings { StatSettings { max: 100.0, regen_rate: 0.0, drain_rate: 0.0 } }

    /// Convert a string key identifier (e.g., from `controls.keybinds`) into a `KeyCode`.
    ///
    /// Letters and digits map to their physical keys; a handful of named keys
    /// cover the rest of the bindable actions. Unknown names return `None`.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
            KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
            KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
            KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
            KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
            KeyCode::KeyZ,
        ];
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
            KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
        ];

        let s = name.trim().to_ascii_uppercase();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                return Some(LETTERS[(c as u8 - b'A') as usize]);
            }
            if c.is_ascii_digit() {
                return Some(DIGITS[(c as u8 - b'0') as usize]);
            }
        }

        Some(match s.as_str() {
            "F1" => KeyCode::F1,
            "F2" => KeyCode::F2,
            "F3" => KeyCode::F3,
            "F4" => KeyCode::F4,
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,
            _ => return None,
        })
    }
}
