//! Collision world: axis-aligned box colliders, ray queries and overlap tests.
//!
//! The character mover and the interaction ray both query this resource. Boxes
//! are static once added; entities that own a box are reported back by ray hits
//! so the caller can look up components on them.

use bevy::prelude::*;

/// Layer bit used by level geometry.
pub const LAYER_STATIC: u32 = 1 << 0;
/// Layer bit used by interactable props.
pub const LAYER_INTERACTABLE: u32 = 1 << 1;

const OVERLAP_SLACK: f32 = 1e-4;

/// One static axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub min: Vec3,
    pub max: Vec3,
    /// Layer bits this collider belongs to.
    pub layers: u32,
    /// Entity this collider belongs to, if any.
    pub owner: Option<Entity>,
}

impl Collider {
    /// Box centred on `center` with the given full `size`.
    #[must_use]
    pub fn cuboid(center: Vec3, size: Vec3, layers: u32) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
            layers,
            owner: None,
        }
    }

    #[must_use]
    pub fn with_owner(mut self, owner: Entity) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Strict overlap: touching faces do not count.
    #[must_use]
    pub fn overlaps(&self, min: Vec3, max: Vec3) -> bool {
        self.min.x < max.x
            && self.max.x > min.x
            && self.min.y < max.y
            && self.max.y > min.y
            && self.min.z < max.z
            && self.max.z > min.z
    }

    /// Volume shared with the box `min..max`, zero when they do not overlap.
    #[must_use]
    pub fn overlap_volume(&self, min: Vec3, max: Vec3) -> f32 {
        let extent = (self.max.min(max) - self.min.max(min)).max(Vec3::ZERO);
        extent.x * extent.y * extent.z
    }

    /// Slab test. Returns the entry distance along a normalized `dir`, or
    /// `0.0` when `origin` is inside the box.
    #[must_use]
    pub fn ray_distance(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

/// Nearest intersection returned by a ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
    pub owner: Option<Entity>,
}

/// Ray intersection query over some collision representation.
pub trait SpatialQuery {
    /// Nearest hit within `max_distance` along `direction` from `origin`.
    /// `layer_mask` of `None` considers every collider.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer_mask: Option<u32>,
    ) -> Option<RayHit>;
}

/// All static colliders in the level.
#[derive(Resource, Debug, Default, Clone)]
pub struct ColliderWorld {
    colliders: Vec<Collider>,
}

impl ColliderWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }

    /// Remove every collider owned by `owner` (e.g. after a despawn).
    pub fn remove_owner(&mut self, owner: Entity) {
        self.colliders.retain(|c| c.owner != Some(owner));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Whether any collider on `layer_mask` overlaps the box `min..max`.
    #[must_use]
    pub fn overlaps_any(&self, min: Vec3, max: Vec3, layer_mask: u32) -> bool {
        self.colliders
            .iter()
            .any(|c| c.layers & layer_mask != 0 && c.overlaps(min, max))
    }

    /// Whether moving a box from `from` to `to` digs deeper into any collider
    /// on `layer_mask`. A box that starts clear is blocked by any overlap; a
    /// box that is already embedded may slide or back out.
    #[must_use]
    pub fn deepens_overlap(&self, from: (Vec3, Vec3), to: (Vec3, Vec3), layer_mask: u32) -> bool {
        self.colliders
            .iter()
            .filter(|c| c.layers & layer_mask != 0 && c.overlaps(to.0, to.1))
            .any(|c| {
                let before = c.overlap_volume(from.0, from.1);
                // relative slack so sliding at constant depth survives rounding
                c.overlap_volume(to.0, to.1) > before * (1.0 + OVERLAP_SLACK)
            })
    }
}

impl SpatialQuery for ColliderWorld {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer_mask: Option<u32>,
    ) -> Option<RayHit> {
        let dir = direction.try_normalize()?;
        self.colliders
            .iter()
            .filter(|c| layer_mask.is_none_or(|mask| c.layers & mask != 0))
            .filter_map(|c| c.ray_distance(origin, dir).map(|t| (t, c)))
            .filter(|(t, _)| *t <= max_distance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(t, c)| RayHit {
                point: origin + dir * t,
                distance: t,
                owner: c.owner,
            })
    }
}
