//! Collision module
//!
//! Circle-versus-rectangle push-out over a static field of colliders

mod collision;

pub use collision::{
    CollisionField, PENETRATION_EPSILON, RESOLVE_PASSES, Rect, separate,
};
