//! Sanity drain driven by light exposure.

use bevy::prelude::*;

use crate::lighting::{is_in_light, Flashlight, LightZone};
use crate::player::stats::{Stat, Vitals};
use crate::player::Player;
use crate::settings::{SanitySettings, Settings};

/// Drain sanity for one frame. Darkness multiplies the drain rate.
pub fn sanity_step(sanity: &mut Stat, in_light: bool, dt: f32, settings: &SanitySettings) {
    let multiplier = if in_light { 1.0 } else { settings.dark_multiplier.max(0.0) };
    sanity.drain(dt, multiplier);
}

#[allow(clippy::needless_pass_by_value)]
pub fn player_sanity(
    time: Res<Time>,
    settings: Res<Settings>,
    zones: Query<(&GlobalTransform, &LightZone)>,
    mut players: Query<(&GlobalTransform, &mut Vitals, Option<&Flashlight>), With<Player>>,
) {
    if !settings.sanity.enabled {
        return;
    }
    let dt = time.delta_seconds();
    for (tf, mut vitals, flashlight) in &mut players {
        if vitals.is_dead() {
            continue;
        }
        let lit = is_in_light(
            flashlight,
            tf.translation(),
            zones.iter().map(|(z_tf, zone)| (z_tf.translation(), zone)),
        );
        sanity_step(&mut vitals.sanity, lit, dt, &settings.sanity);
    }
}
