//! Identity and spatial types shared by every owner of instance data.
//!
//! Nothing here is authoritative simulation state: the host engine owns actor
//! transforms, and these types only carry the stable identities and bounds the
//! data layer and the actor manager need to reason about them.
mod common;
mod geometry;

pub use common::{EntityId, WorldKey};
pub use geometry::{Aabb, BoundingSphere, Ray, Shape, Vec3};
