//! Interactable props: doors, light switches and notes.

use bevy::prelude::*;

use super::Interactable;
use crate::lighting::LightZone;

const LAMP_LUMENS: f32 = 400_000.0;

/// A hinged door. Swings 90 degrees about its local Y axis when opened.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Door {
    pub open: bool,
}

impl Interactable for Door {
    fn interact(&mut self) {
        self.open = !self.open;
    }

    fn prompt(&self) -> &str {
        if self.open { "Close door" } else { "Open door" }
    }
}

/// A switch controlling the lamp on the same entity.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct LightSwitch {
    pub on: bool,
    /// Radius of the lit area while on.
    pub radius: f32,
}

impl Interactable for LightSwitch {
    fn interact(&mut self) {
        self.on = !self.on;
    }

    fn prompt(&self) -> &str {
        if self.on { "Turn off light" } else { "Turn on light" }
    }
}

/// A readable note.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub text: String,
    pub read: bool,
}

impl Note {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), read: false }
    }
}

impl Interactable for Note {
    fn interact(&mut self) {
        if !self.read {
            info!("note: {}", self.text);
        }
        self.read = true;
    }

    fn prompt(&self) -> &str {
        "Read note"
    }
}

/// Rotate doors whose state changed.
pub fn animate_doors(mut doors: Query<(&Door, &mut Transform), Changed<Door>>) {
    for (door, mut tf) in &mut doors {
        let angle = if door.open { std::f32::consts::FRAC_PI_2 } else { 0.0 };
        tf.rotation = Quat::from_rotation_y(angle);
    }
}

/// Add or remove the light zone and lamp intensity of switches that changed.
pub fn sync_light_switches(
    mut commands: Commands,
    switches: Query<(Entity, &LightSwitch, Option<&Children>), Changed<LightSwitch>>,
    mut lamps: Query<&mut PointLight>,
) {
    for (entity, switch, children) in &switches {
        if switch.on {
            commands.entity(entity).insert(LightZone { radius: switch.radius });
        } else {
            commands.entity(entity).remove::<LightZone>();
        }
        let Some(children) = children else { continue };
        for child in children.iter() {
            if let Ok(mut lamp) = lamps.get_mut(*child) {
                lamp.intensity = if switch.on { LAMP_LUMENS } else { 0.0 };
                lamp.range = switch.radius * 2.0;
            }
        }
    }
}
