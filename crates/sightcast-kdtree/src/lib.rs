#![warn(missing_docs)]

//! Static kd-tree occlusion index over triangle soup.
//!
//! Built once from a flat triangle list, then queried arbitrarily often:
//! "does the straight path between two points pass through any triangle?"
//! Queries prune whole subtrees by an AABB slab test before running exact
//! segment-triangle tests on small leaves.
//!
//! The traversal is first-hit, not nearest-hit: when a segment crosses
//! triangles in both subtrees of a node, the one found by the fixed
//! left-first descent is reported. That is the intended contract for a
//! boolean occlusion signal.
//!
//! # Example
//!
//! ```
//! use sightcast_kdtree::KdTree;
//! use sightcast_math::{Point3, Triangle};
//!
//! let wall = Triangle::new(
//!     Point3::new(-1.0, -1.0, 0.0),
//!     Point3::new(1.0, -1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! );
//! let tree = KdTree::build(vec![wall]).unwrap();
//!
//! let eye = Point3::new(0.0, 0.0, -1.0);
//! let target = Point3::new(0.0, 0.0, 1.0);
//! assert!(tree.occludes(&eye, &target).is_some());
//! ```

mod error;
mod tree;

pub use error::{BuildError, Result};
pub use tree::{KdNode, KdTree, LEAF_SIZE};
