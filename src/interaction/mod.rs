//! Player interaction with world objects.
//!
//! On the interact edge a ray is cast from the player camera along its forward
//! axis. The nearest collider within range is looked up and, if its owner
//! implements [`Interactable`], that object's `interact` runs. Misses and hits
//! on plain geometry do nothing.
//!
//! ```
//! use bevy::math::Vec3;
//! use lantern::interaction::{try_interact, InteractOutcome};
//! use lantern::settings::InteractionSettings;
//! use lantern::world::ColliderWorld;
//!
//! let world = ColliderWorld::new();
//! let outcome = try_interact(&world, Vec3::ZERO, Vec3::NEG_Z, &InteractionSettings::default(), |_| true);
//! assert_eq!(outcome, InteractOutcome::Missed);
//! ```

pub mod props;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::player::camera::PlayerCamera;
use crate::player::input::CharacterInput;
use crate::player::stats::Vitals;
use crate::settings::{InteractionSettings, Settings};
use crate::world::{RayHit, SpatialQuery};

pub use props::{Door, LightSwitch, Note};

/// A world object the player can use.
pub trait Interactable {
    /// Perform the interaction.
    fn interact(&mut self);
    /// Short label shown while the object is targeted.
    fn prompt(&self) -> &str;
}

/// What happened on an interaction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractOutcome {
    /// Nothing within range.
    Missed,
    /// Something was hit but it has no interaction.
    NotInteractable,
    Interacted(Entity),
}

/// Nearest hit along the interaction ray, if any.
pub fn interaction_target<Q: SpatialQuery + ?Sized>(
    query: &Q,
    origin: Vec3,
    direction: Vec3,
    settings: &InteractionSettings,
) -> Option<RayHit> {
    query.raycast(origin, direction, settings.distance, settings.layer_mask)
}

/// Cast the interaction ray and hand the hit owner to `dispatch`.
///
/// `dispatch` returns whether the entity had an interaction to run.
pub fn try_interact<Q: SpatialQuery + ?Sized>(
    query: &Q,
    origin: Vec3,
    direction: Vec3,
    settings: &InteractionSettings,
    dispatch: impl FnOnce(Entity) -> bool,
) -> InteractOutcome {
    let Some(hit) = interaction_target(query, origin, direction, settings) else {
        return InteractOutcome::Missed;
    };
    match hit.owner {
        Some(entity) if dispatch(entity) => InteractOutcome::Interacted(entity),
        _ => InteractOutcome::NotInteractable,
    }
}

fn interact_with<T: Interactable + Component>(q: &mut Query<&mut T>, entity: Entity) -> bool {
    match q.get_mut(entity) {
        Ok(mut target) => {
            target.interact();
            true
        }
        Err(_) => false,
    }
}

fn prompt_of<T: Interactable + Component>(q: &Query<&mut T>, entity: Entity) -> Option<String> {
    q.get(entity).ok().map(|t| t.prompt().to_string())
}

/// Every component type that implements [`Interactable`].
#[derive(SystemParam)]
pub struct Interactables<'w, 's> {
    doors: Query<'w, 's, &'static mut Door>,
    switches: Query<'w, 's, &'static mut LightSwitch>,
    notes: Query<'w, 's, &'static mut Note>,
}

impl Interactables<'_, '_> {
    /// Run the interaction on `entity`. Returns false if it has none.
    pub fn dispatch(&mut self, entity: Entity) -> bool {
        interact_with(&mut self.doors, entity)
            || interact_with(&mut self.switches, entity)
            || interact_with(&mut self.notes, entity)
    }

    #[must_use]
    pub fn prompt(&self, entity: Entity) -> Option<String> {
        prompt_of(&self.doors, entity)
            .or_else(|| prompt_of(&self.switches, entity))
            .or_else(|| prompt_of(&self.notes, entity))
    }
}

/// Label of the interactable currently under the crosshair.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct InteractionPrompt(pub Option<String>);

/// Dispatch interactions on the interact edge. Dead players cannot interact.
#[allow(clippy::needless_pass_by_value)]
pub fn player_interaction<Q: SpatialQuery + Resource>(
    input: Res<CharacterInput>,
    settings: Res<Settings>,
    world: Res<Q>,
    cameras: Query<(&GlobalTransform, Option<&Parent>), With<PlayerCamera>>,
    vitals: Query<&Vitals>,
    mut targets: Interactables,
) {
    if !input.interact_pressed {
        return;
    }
    let Some((cam, owner)) = cameras.iter().next() else { return };
    if owner.and_then(|p| vitals.get(p.get()).ok()).is_some_and(Vitals::is_dead) {
        return;
    }

    let outcome = try_interact(
        &*world,
        cam.translation(),
        *cam.forward(),
        &settings.interaction,
        |entity| targets.dispatch(entity),
    );
    debug!("interaction: {outcome:?}");
}

/// Keep [`InteractionPrompt`] in sync with what the camera is looking at.
#[allow(clippy::needless_pass_by_value)]
pub fn interaction_prompt<Q: SpatialQuery + Resource>(
    settings: Res<Settings>,
    world: Res<Q>,
    cameras: Query<&GlobalTransform, With<PlayerCamera>>,
    targets: Interactables,
    mut prompt: ResMut<InteractionPrompt>,
) {
    let next = cameras.iter().next().and_then(|cam| {
        interaction_target(&*world, cam.translation(), *cam.forward(), &settings.interaction)
            .and_then(|hit| hit.owner)
            .and_then(|entity| targets.prompt(entity))
    });
    if prompt.0 != next {
        prompt.0 = next;
    }
}
