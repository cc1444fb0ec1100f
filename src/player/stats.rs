//! Clamped player stats: stamina, health and sanity.
//!
//! Every mutation clamps the stat back into `0..=max`, so callers never need
//! to guard the arithmetic themselves.

use bevy::prelude::*;

use crate::settings::Settings;

/// A clamped numeric resource with per-second drain and regeneration rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stat {
    current: f32,
    max: f32,
    /// Units per second restored by [`Stat::regen`].
    pub regen_rate: f32,
    /// Units per second removed by [`Stat::drain`].
    pub drain_rate: f32,
}

impl Stat {
    /// Create a full stat. A negative `max` is treated as zero.
    #[must_use]
    pub fn new(max: f32, regen_rate: f32, drain_rate: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            regen_rate,
            drain_rate,
        }
    }

    #[must_use]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Current value as a fraction of max, `0.0` for a zero-sized stat.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 { self.current / self.max } else { 0.0 }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    /// Set the current value, clamped.
    pub fn set(&mut self, value: f32) {
        // NaN collapses to empty rather than poisoning later comparisons
        self.current = if value.is_nan() { 0.0 } else { value.clamp(0.0, self.max) };
    }

    /// Add `delta` (which may be negative) and clamp.
    pub fn add(&mut self, delta: f32) {
        self.set(self.current + delta);
    }

    /// Remove `drain_rate * dt * multiplier`.
    pub fn drain(&mut self, dt: f32, multiplier: f32) {
        self.add(-(self.drain_rate * dt.max(0.0) * multiplier));
    }

    /// Restore `regen_rate * dt`.
    pub fn regen(&mut self, dt: f32) {
        self.add(self.regen_rate * dt.max(0.0));
    }
}

/// Result of applying damage to [`Vitals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Health went down (or the hit was zero) and the player is still alive.
    Hurt,
    /// This hit brought health to zero.
    Died,
    /// Health was already zero before the hit.
    AlreadyDead,
}

/// All stats carried by a player.
#[derive(Component, Debug, Clone)]
pub struct Vitals {
    pub stamina: Stat,
    pub health: Stat,
    pub sanity: Stat,
    dead: bool,
}

impl Vitals {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            stamina: settings.stamina.to_stat(),
            health: settings.health.to_stat(),
            sanity: settings.sanity.stat.to_stat(),
            dead: false,
        }
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Subtract `amount` from health. Negative amounts are ignored.
    ///
    /// Returns [`DamageOutcome::Died`] exactly once, on the hit that brings
    /// health to zero.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::AlreadyDead;
        }
        self.health.add(-amount.max(0.0));
        if self.health.is_empty() {
            self.dead = true;
            DamageOutcome::Died
        } else {
            DamageOutcome::Hurt
        }
    }
}

/// Request to damage a player entity.
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageEvent {
    pub target: Entity,
    pub amount: f32,
}

/// Emitted once when a player's health reaches zero.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerDied {
    pub entity: Entity,
}

/// Apply queued damage and emit [`PlayerDied`] on the killing hit.
pub fn apply_damage(
    mut damage: EventReader<DamageEvent>,
    mut died: EventWriter<PlayerDied>,
    mut q: Query<&mut Vitals>,
) {
    for ev in damage.read() {
        let Ok(mut vitals) = q.get_mut(ev.target) else { continue };
        if vitals.take_damage(ev.amount) == DamageOutcome::Died {
            info!("player {:?} died", ev.target);
            died.send(PlayerDied { entity: ev.target });
        }
    }
}
