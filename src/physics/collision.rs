//! Static collision field of axis-aligned rectangles
//!
//! Agents are circles in the XZ plane. Resolution pushes a circle center out
//! of every rectangle it overlaps along the axis of least penetration. A
//! single sweep can push an agent from one wall into another near corners,
//! so callers use [`CollisionField::resolve`], which runs [`RESOLVE_PASSES`]
//! sweeps. Tight multi-wall corners may still leave a sub-epsilon overlap.
//!
//! The field is immutable after construction and can be shared between any
//! number of agents without locking.

use glam::Vec3;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Number of push-out sweeps per movement step.
pub const RESOLVE_PASSES: usize = 2;

/// Penetration below this is treated as resting contact.
pub const PENETRATION_EPSILON: f32 = 1e-3;

/// Axis-aligned rectangle in the XZ plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Rect {
    /// Create a rectangle from its extents. Swapped bounds are reordered.
    #[must_use]
    pub fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x: min_x.min(max_x),
            max_x: min_x.max(max_x),
            min_z: min_z.min(max_z),
            max_z: min_z.max(max_z),
        }
    }

    /// Square of side `2 * half` centered on (x, z)
    #[must_use]
    pub fn square(x: f32, z: f32, half: f32) -> Self {
        Self::new(x - half, x + half, z - half, z + half)
    }

    /// Grow every side by `amount`
    #[must_use]
    pub fn inflated(&self, amount: f32) -> Self {
        Self {
            min_x: self.min_x - amount,
            max_x: self.max_x + amount,
            min_z: self.min_z - amount,
            max_z: self.max_z + amount,
        }
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn depth(&self) -> f32 {
        self.max_z - self.min_z
    }

    /// Strict interior test; points on the boundary are outside.
    #[must_use]
    pub fn contains(&self, x: f32, z: f32) -> bool {
        x > self.min_x && x < self.max_x && z > self.min_z && z < self.max_z
    }

    /// Smallest distance the point must travel to leave the rectangle (0 when outside).
    #[must_use]
    pub fn penetration(&self, x: f32, z: f32) -> f32 {
        if !self.contains(x, z) {
            return 0.0;
        }
        (x - self.min_x)
            .min(self.max_x - x)
            .min(z - self.min_z)
            .min(self.max_z - z)
    }

    /// Bounding rectangle of two rectangles
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_z: self.min_z.min(other.min_z),
            max_z: self.max_z.max(other.max_z),
        }
    }

    fn bit_key(&self) -> [u32; 4] {
        [
            self.min_x.to_bits(),
            self.max_x.to_bits(),
            self.min_z.to_bits(),
            self.max_z.to_bits(),
        ]
    }
}

/// Immutable set of collider rectangles
#[derive(Debug, Clone, Default)]
pub struct CollisionField {
    colliders: Vec<Rect>,
}

impl CollisionField {
    /// Build a field, dropping exact duplicates and degenerate rectangles.
    #[must_use]
    pub fn new(rects: impl IntoIterator<Item = Rect>) -> Self {
        let mut seen = FxHashSet::default();
        let mut colliders = Vec::new();

        for rect in rects {
            let finite = [rect.min_x, rect.max_x, rect.min_z, rect.max_z]
                .iter()
                .all(|v| v.is_finite());
            if !finite || rect.width() <= 0.0 || rect.depth() <= 0.0 {
                log::warn!("skipping degenerate collider {rect:?}");
                continue;
            }
            if seen.insert(rect.bit_key()) {
                colliders.push(rect);
            } else {
                log::debug!("dropping duplicate collider {rect:?}");
            }
        }

        Self { colliders }
    }

    /// All collider rectangles
    #[must_use]
    pub fn colliders(&self) -> &[Rect] {
        &self.colliders
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// One push-out sweep over every collider.
    ///
    /// Each rectangle is inflated by `radius`; a point inside is moved to the
    /// nearest inflated edge. The Y coordinate passes through untouched.
    #[must_use]
    pub fn push_out_circle(&self, point: Vec3, radius: f32) -> Vec3 {
        let mut p = point;

        for rect in &self.colliders {
            let grown = rect.inflated(radius);
            if !grown.contains(p.x, p.z) {
                continue;
            }

            let left = p.x - grown.min_x;
            let right = grown.max_x - p.x;
            let near = p.z - grown.min_z;
            let far = grown.max_z - p.z;
            let least = left.min(right).min(near).min(far);

            if least == left {
                p.x = grown.min_x;
            } else if least == right {
                p.x = grown.max_x;
            } else if least == near {
                p.z = grown.min_z;
            } else {
                p.z = grown.max_z;
            }
        }

        p
    }

    /// Full resolution: [`RESOLVE_PASSES`] push-out sweeps.
    #[must_use]
    pub fn resolve(&self, point: Vec3, radius: f32) -> Vec3 {
        (0..RESOLVE_PASSES).fold(point, |p, _| self.push_out_circle(p, radius))
    }

    /// Deepest overlap of a circle with any collider
    #[must_use]
    pub fn max_penetration(&self, point: Vec3, radius: f32) -> f32 {
        self.colliders
            .iter()
            .map(|rect| rect.inflated(radius).penetration(point.x, point.z))
            .fold(0.0, f32::max)
    }

    /// Whether a circle overlaps any collider beyond [`PENETRATION_EPSILON`]
    #[must_use]
    pub fn overlaps(&self, point: Vec3, radius: f32) -> bool {
        self.max_penetration(point, radius) > PENETRATION_EPSILON
    }
}

/// Push `pos` directly away from `other` until the two circles just touch.
///
/// Positions already far enough apart, or exactly coincident (no defined
/// direction), are returned unchanged. Only X and Z are considered.
#[must_use]
pub fn separate(pos: Vec3, other: Vec3, radius_a: f32, radius_b: f32) -> Vec3 {
    let min_distance = radius_a + radius_b;
    let dx = pos.x - other.x;
    let dz = pos.z - other.z;
    let distance = (dx * dx + dz * dz).sqrt();

    if distance >= min_distance || distance <= f32::EPSILON {
        return pos;
    }

    let scale = min_distance / distance;
    Vec3::new(other.x + dx * scale, pos.y, other.z + dz * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_field() -> CollisionField {
        CollisionField::new([Rect::new(0.0, 10.0, 0.0, 10.0)])
    }

    #[test]
    fn test_point_outside_is_untouched() {
        let field = unit_field();
        let p = Vec3::new(-3.0, 0.0, 5.0);
        assert_eq!(field.push_out_circle(p, 1.0), p);
    }

    #[test]
    fn test_push_out_exactly_radius_inside() {
        let field = unit_field();
        // One radius inside the inflated left edge (x = -1), far from the others.
        let p = Vec3::new(0.0, 0.0, 5.0);
        let out = field.push_out_circle(p, 1.0);

        assert_eq!(out, Vec3::new(-1.0, 0.0, 5.0));
        assert_eq!(field.max_penetration(out, 1.0), 0.0);
    }

    #[test]
    fn test_push_out_least_penetration_axis() {
        let field = unit_field();

        // Closest to the far Z edge.
        let out = field.push_out_circle(Vec3::new(5.0, 2.0, 9.5), 0.5);
        assert_eq!(out, Vec3::new(5.0, 2.0, 10.5));

        // Closest to the right edge.
        let out = field.push_out_circle(Vec3::new(9.0, 0.0, 4.0), 0.5);
        assert_eq!(out, Vec3::new(10.5, 0.0, 4.0));
    }

    #[test]
    fn test_boundary_contact_is_not_penetration() {
        let field = unit_field();
        let p = Vec3::new(-0.5, 0.0, 5.0);
        assert_eq!(field.push_out_circle(p, 0.5), p);
        assert!(!field.overlaps(p, 0.5));
    }

    #[test]
    fn test_resolve_corner_two_walls() {
        // L-shaped corner: wall along X at z in [0, 1], wall along Z at x in [0, 1].
        let field = CollisionField::new([
            Rect::new(0.0, 10.0, 0.0, 1.0),
            Rect::new(0.0, 1.0, 0.0, 10.0),
        ]);
        let radius = 0.5;
        let out = field.resolve(Vec3::new(1.3, 0.0, 1.2), radius);

        assert!(!field.overlaps(out, radius), "still overlapping at {out:?}");
    }

    #[test]
    fn test_duplicates_and_degenerates_dropped() {
        let rect = Rect::new(0.0, 1.0, 0.0, 1.0);
        let field = CollisionField::new([
            rect,
            rect,
            Rect::new(2.0, 2.0, 0.0, 1.0),
            Rect::new(0.0, f32::NAN, 0.0, 1.0),
        ]);

        assert_eq!(field.len(), 1);
    }

    #[test]
    fn test_rect_new_orders_bounds() {
        let rect = Rect::new(5.0, 1.0, 3.0, -2.0);
        assert_eq!(rect, Rect::new(1.0, 5.0, -2.0, 3.0));
        assert!((rect.width() - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_separate_pushes_to_contact() {
        let pos = Vec3::new(1.0, 0.0, 0.0);
        let other = Vec3::ZERO;
        let out = separate(pos, other, 0.5, 1.0);

        assert!((out.x - 1.5).abs() < 1e-5);
        assert_eq!(out.z, 0.0);
    }

    #[test]
    fn test_separate_far_apart_unchanged() {
        let pos = Vec3::new(5.0, 0.0, 5.0);
        assert_eq!(separate(pos, Vec3::ZERO, 1.0, 1.0), pos);
    }

    #[test]
    fn test_separate_coincident_passes_through() {
        let pos = Vec3::new(2.0, 0.0, 2.0);
        let out = separate(pos, pos, 1.0, 1.0);

        assert_eq!(out, pos);
        assert!(out.x.is_finite() && out.z.is_finite());
    }
}
