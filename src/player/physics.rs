//! Character mover: collision-aware displacement and ground detection.
//!
//! The movement policy only produces a velocity. Turning that into a new
//! position is the job of a [`CharacterMover`]; [`KinematicMover`] is the
//! implementation used in game, resolving the body box against the
//! [`ColliderWorld`] one axis at a time.

use crate::world::{ColliderWorld, LAYER_STATIC};
use bevy::prelude::*;

/// Distance below the feet probed for ground contact.
pub const GROUND_PROBE: f32 = 0.05;
/// Bisection steps used to close the gap when a move is blocked.
const RESOLVE_STEPS: u32 = 6;

/// Collision shape and contact state of a character.
///
/// The body is an upright box whose base sits at the entity's translation.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CharacterBody {
    pub height: f32,
    pub radius: f32,
    pub grounded: bool,
}

impl CharacterBody {
    #[must_use]
    pub fn new(height: f32, radius: f32) -> Self {
        Self { height, radius, grounded: false }
    }

    /// World-space bounds of the body with its feet at `feet`.
    #[must_use]
    pub fn bounds_at(&self, feet: Vec3) -> (Vec3, Vec3) {
        let r = Vec3::new(self.radius, 0.0, self.radius);
        (feet - r, feet + r + Vec3::Y * self.height)
    }
}

/// Something that can move a character through the world.
pub trait CharacterMover {
    /// Whether the character touched the floor on its last move.
    fn is_grounded(&self) -> bool;
    /// Change the collision height (crouch / stand).
    fn set_height(&mut self, height: f32);
    /// Move by `displacement`, stopping at obstacles.
    fn move_by(&mut self, displacement: Vec3);
}

/// [`CharacterMover`] over a transform and body, colliding with the static
/// layer of a [`ColliderWorld`]. Interactable props do not block movement.
pub struct KinematicMover<'a> {
    pub transform: &'a mut Transform,
    pub body: &'a mut CharacterBody,
    pub world: &'a ColliderWorld,
}

impl<'a> KinematicMover<'a> {
    pub fn new(transform: &'a mut Transform, body: &'a mut CharacterBody, world: &'a ColliderWorld) -> Self {
        Self { transform, body, world }
    }

    /// Whether moving the feet from `from` to `to` pushes the body further
    /// into static geometry. A body left embedded by `set_height` can still
    /// slide along or away from what it overlaps.
    fn blocked_moving(&self, from: Vec3, to: Vec3) -> bool {
        self.world
            .deepens_overlap(self.body.bounds_at(from), self.body.bounds_at(to), LAYER_STATIC)
    }

    /// Move along a single axis, shortening the step until it is free.
    fn step_axis(&mut self, axis: Vec3, amount: f32) -> bool {
        if amount == 0.0 {
            return false;
        }
        let start = self.transform.translation;
        if !self.blocked_moving(start, start + axis * amount) {
            self.transform.translation = start + axis * amount;
            return false;
        }
        let mut free = 0.0;
        let mut blocked = amount;
        for _ in 0..RESOLVE_STEPS {
            let mid = (free + blocked) * 0.5;
            if self.blocked_moving(start, start + axis * mid) {
                blocked = mid;
            } else {
                free = mid;
            }
        }
        self.transform.translation = start + axis * free;
        true
    }
}

impl CharacterMover for KinematicMover<'_> {
    fn is_grounded(&self) -> bool {
        self.body.grounded
    }

    fn set_height(&mut self, height: f32) {
        self.body.height = height.max(0.0);
    }

    fn move_by(&mut self, displacement: Vec3) {
        self.step_axis(Vec3::X, displacement.x);
        self.step_axis(Vec3::Z, displacement.z);
        let hit_vertical = self.step_axis(Vec3::Y, displacement.y);

        let feet = self.transform.translation;
        self.body.grounded =
            (hit_vertical && displacement.y < 0.0) || self.blocked_moving(feet, feet - Vec3::Y * GROUND_PROBE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Collider;

    fn floor_world() -> ColliderWorld {
        let mut w = ColliderWorld::new();
        w.insert(Collider::cuboid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 1.0, 20.0), LAYER_STATIC));
        w
    }

    #[test]
    fn falling_body_lands_on_floor() {
        let world = floor_world();
        let mut tf = Transform::from_xyz(0.0, 0.5, 0.0);
        let mut body = CharacterBody::new(2.0, 0.4);
        let mut mover = KinematicMover::new(&mut tf, &mut body, &world);
        mover.move_by(Vec3::new(0.0, -1.0, 0.0));
        assert!(mover.is_grounded());
        assert!(tf.translation.y >= 0.0 && tf.translation.y < 0.02, "y = {}", tf.translation.y);
    }

    #[test]
    fn airborne_body_is_not_grounded() {
        let world = floor_world();
        let mut tf = Transform::from_xyz(0.0, 5.0, 0.0);
        let mut body = CharacterBody::new(2.0, 0.4);
        KinematicMover::new(&mut tf, &mut body, &world).move_by(Vec3::new(0.1, -0.1, 0.0));
        assert!(!body.grounded);
        assert!((tf.translation.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn wall_stops_horizontal_motion() {
        let mut world = floor_world();
        world.insert(Collider::cuboid(Vec3::new(2.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 4.0), LAYER_STATIC));
        let mut tf = Transform::from_xyz(0.0, 0.0, 0.0);
        let mut body = CharacterBody::new(2.0, 0.4);
        KinematicMover::new(&mut tf, &mut body, &world).move_by(Vec3::new(3.0, -0.05, 0.5));
        // wall face at x = 1.5, body radius 0.4
        assert!(tf.translation.x <= 1.1 && tf.translation.x > 0.9, "x = {}", tf.translation.x);
        assert!((tf.translation.z - 0.5).abs() < 1e-6);
        assert!(body.grounded);
    }

    #[test]
    fn standing_up_under_a_low_ceiling_can_walk_out() {
        let mut world = floor_world();
        // underside at y = 1.5, ends at x = 2
        world.insert(Collider::cuboid(Vec3::new(0.0, 2.0, 0.0), Vec3::new(4.0, 1.0, 4.0), LAYER_STATIC));
        let mut tf = Transform::from_xyz(0.0, 0.0, 0.0);
        let mut body = CharacterBody::new(1.0, 0.4);
        KinematicMover::new(&mut tf, &mut body, &world).set_height(2.0);

        for _ in 0..100 {
            KinematicMover::new(&mut tf, &mut body, &world).move_by(Vec3::new(0.1, -0.01, 0.0));
        }
        assert!(tf.translation.x > 5.0, "x = {}", tf.translation.x);
        assert!(tf.translation.y.abs() < 1e-4, "y = {}", tf.translation.y);
        assert!(body.grounded);
        let (min, max) = body.bounds_at(tf.translation);
        assert!(!world.overlaps_any(min, max, LAYER_STATIC));
    }

    #[test]
    fn embedded_body_cannot_sink_deeper() {
        let mut world = floor_world();
        world.insert(Collider::cuboid(Vec3::new(0.0, 2.0, 0.0), Vec3::new(4.0, 1.0, 4.0), LAYER_STATIC));
        let mut tf = Transform::from_xyz(0.0, 0.0, 0.0);
        let mut body = CharacterBody::new(2.0, 0.4);
        KinematicMover::new(&mut tf, &mut body, &world).move_by(Vec3::new(0.0, 0.3, 0.0));
        assert_eq!(tf.translation.y, 0.0);
    }

    #[test]
    fn set_height_changes_bounds() {
        let world = ColliderWorld::new();
        let mut tf = Transform::default();
        let mut body = CharacterBody::new(2.0, 0.4);
        KinematicMover::new(&mut tf, &mut body, &world).set_height(1.0);
        let (_, max) = body.bounds_at(Vec3::ZERO);
        assert_eq!(max.y, 1.0);
    }
}
