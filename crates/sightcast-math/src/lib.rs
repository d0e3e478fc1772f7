#![warn(missing_docs)]

//! Math types for the sightcast occlusion index.
//!
//! Thin wrappers around nalgebra providing the value types the index is
//! built from: points, vectors, triangles, axis-aligned bounding boxes,
//! and the segment intersection tests on the latter two. All coordinates
//! are `f64`; source assets store `f32` and are promoted on load.

use nalgebra::Vector3;

mod bbox;
mod triangle;

pub use bbox::Aabb3;
pub use triangle::Triangle;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Tolerance for segment-triangle intersection: rejects near-parallel
/// configurations and intersections at the segment endpoints.
pub const INTERSECT_EPSILON: f64 = 1e-6;
