//! Flashlight and light exposure.
//!
//! The flashlight has two layers of state: `on` is the player's toggle, and
//! `enabled`/`intensity` are what the flicker task last rolled. Only the
//! toggle counts as carrying light for sanity purposes; the flicker is a
//! visual effect.

use bevy::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::player::input::CharacterInput;
use crate::player::stats::Vitals;
use crate::settings::{FlashlightSettings, Settings};
use crate::task::{RepeatingTask, TaskHandle};

/// Player flashlight state.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Flashlight {
    /// Toggle controlled by the player.
    pub on: bool,
    /// Whether the bulb is currently lit (flicker output).
    pub enabled: bool,
    /// Intensity factor (flicker output), multiplied by the configured lumens.
    pub intensity: f32,
}

impl Flashlight {
    #[must_use]
    pub fn new(on: bool) -> Self {
        Self { on, enabled: on, intensity: 1.0 }
    }

    pub fn toggle(&mut self) {
        self.on = !self.on;
        self.enabled = self.on;
    }

    /// Light actually emitted, in the units of the configured lumens.
    #[must_use]
    pub fn output(&self, settings: &FlashlightSettings) -> f32 {
        if self.on && self.enabled { self.intensity * settings.lumens } else { 0.0 }
    }
}

/// One flicker sample: pick a random intensity and light the bulb with
/// `on_probability`. A switched-off flashlight stays dark.
pub fn flicker_tick<R: Rng>(light: &mut Flashlight, rng: &mut R, settings: &FlashlightSettings) {
    if !light.on {
        light.enabled = false;
        return;
    }
    let (lo, hi) = if settings.intensity_min <= settings.intensity_max {
        (settings.intensity_min, settings.intensity_max)
    } else {
        (settings.intensity_max, settings.intensity_min)
    };
    light.intensity = if lo < hi { rng.gen_range(lo..=hi) } else { lo };
    light.enabled = rng.gen_bool(settings.on_probability.clamp(0.0, 1.0));
}

/// The flicker task attached to a flashlight owner.
#[derive(Component)]
pub struct FlickerTask {
    pub task: RepeatingTask,
    pub rng: StdRng,
}

/// Owning handle for [`FlickerTask`]; cancels it when the entity is despawned.
#[derive(Component)]
pub struct FlickerHandle(pub TaskHandle);

impl FlickerTask {
    /// Create a task seeded from entropy, returning the handle to keep with its owner.
    #[must_use]
    pub fn new(settings: &FlashlightSettings) -> (Self, FlickerHandle) {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    #[must_use]
    pub fn with_rng(settings: &FlashlightSettings, rng: StdRng) -> (Self, FlickerHandle) {
        let (task, handle) = RepeatingTask::new(settings.flicker_interval);
        (Self { task, rng }, FlickerHandle(handle))
    }

    /// Advance by `delta` and roll one flicker sample per elapsed interval.
    pub fn run(&mut self, delta: std::time::Duration, light: &mut Flashlight, settings: &FlashlightSettings) {
        for _ in 0..self.task.advance(delta) {
            flicker_tick(light, &mut self.rng, settings);
        }
    }
}

/// A region that counts as lit for sanity purposes.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct LightZone {
    pub radius: f32,
}

impl LightZone {
    #[must_use]
    pub fn contains(&self, center: Vec3, point: Vec3) -> bool {
        center.distance_squared(point) <= self.radius * self.radius
    }
}

/// Whether a player at `position` is in light: flashlight toggled on, or
/// inside any light zone.
pub fn is_in_light<'a>(
    flashlight: Option<&Flashlight>,
    position: Vec3,
    zones: impl IntoIterator<Item = (Vec3, &'a LightZone)>,
) -> bool {
    flashlight.is_some_and(|f| f.on) || zones.into_iter().any(|(center, zone)| zone.contains(center, position))
}

/// Toggle the flashlight on its input edge.
#[allow(clippy::needless_pass_by_value)]
pub fn toggle_flashlight(input: Res<CharacterInput>, mut lights: Query<(&mut Flashlight, Option<&Vitals>)>) {
    if !input.flashlight_pressed {
        return;
    }
    for (mut light, vitals) in &mut lights {
        if vitals.is_some_and(Vitals::is_dead) {
            continue;
        }
        light.toggle();
        debug!("flashlight {}", if light.on { "on" } else { "off" });
    }
}

/// Drive every flicker task with frame time.
#[allow(clippy::needless_pass_by_value)]
pub fn flashlight_flicker(
    time: Res<Time>,
    settings: Res<Settings>,
    mut q: Query<(&mut FlickerTask, &mut Flashlight)>,
) {
    for (mut flicker, mut light) in &mut q {
        if settings.is_changed() {
            flicker.task.set_interval(settings.flashlight.flicker_interval);
        }
        flicker.run(time.delta(), &mut light, &settings.flashlight);
    }
}

/// Mirror flashlight state onto the spot light it drives.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_flashlight(
    settings: Res<Settings>,
    owners: Query<(&Flashlight, &Children)>,
    mut spots: Query<&mut SpotLight>,
) {
    for (light, children) in &owners {
        for child in children.iter() {
            if let Ok(mut spot) = spots.get_mut(*child) {
                spot.intensity = light.output(&settings.flashlight);
                spot.range = settings.flashlight.range;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_ratio_is_near_five_percent() {
        let settings = FlashlightSettings::default();
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut light = Flashlight::new(true);
        let samples = 20_000;
        let mut dark = 0;
        for _ in 0..samples {
            flicker_tick(&mut light, &mut rng, &settings);
            assert!((settings.intensity_min..=settings.intensity_max).contains(&light.intensity));
            if !light.enabled {
                dark += 1;
            }
        }
        let ratio = f64::from(dark) / f64::from(samples);
        assert!((0.04..0.06).contains(&ratio), "dark ratio {ratio}");
    }

    #[test]
    fn switched_off_light_stays_dark() {
        let settings = FlashlightSettings::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut light = Flashlight::new(false);
        for _ in 0..100 {
            flicker_tick(&mut light, &mut rng, &settings);
            assert!(!light.enabled);
            assert_eq!(light.output(&settings), 0.0);
        }
    }

    #[test]
    fn task_rolls_once_per_interval_and_stops_when_cancelled() {
        let mut settings = FlashlightSettings::default();
        settings.on_probability = 0.0;
        let (mut task, handle) = FlickerTask::with_rng(&settings, StdRng::seed_from_u64(2));
        let mut light = Flashlight::new(true);

        task.run(std::time::Duration::from_millis(50), &mut light, &settings);
        assert!(light.enabled);
        task.run(std::time::Duration::from_millis(60), &mut light, &settings);
        assert!(!light.enabled);

        drop(handle);
        light.enabled = true;
        task.run(std::time::Duration::from_secs(1), &mut light, &settings);
        assert!(light.enabled);
    }

    #[test]
    fn in_light_ignores_flicker_state() {
        let mut light = Flashlight::new(true);
        light.enabled = false;
        let none: [(Vec3, &LightZone); 0] = [];
        assert!(is_in_light(Some(&light), Vec3::ZERO, none));

        light.on = false;
        let zone = LightZone { radius: 3.0 };
        assert!(is_in_light(Some(&light), Vec3::new(1.0, 0.0, 1.0), [(Vec3::ZERO, &zone)]));
        assert!(!is_in_light(Some(&light), Vec3::new(5.0, 0.0, 0.0), [(Vec3::ZERO, &zone)]));
        assert!(!is_in_light(None, Vec3::ZERO, none));
    }

    #[test]
    fn inverted_range_is_tolerated() {
        let settings = FlashlightSettings { intensity_min: 2.0, intensity_max: 1.0, ..FlashlightSettings::default() };
        let mut rng = StdRng::seed_from_u64(3);
        let mut light = Flashlight::new(true);
        flicker_tick(&mut light, &mut rng, &settings);
        assert!((1.0..=2.0).contains(&light.intensity));
    }
}
