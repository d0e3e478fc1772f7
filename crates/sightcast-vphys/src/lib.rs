#![warn(missing_docs)]

//! Collision geometry ingestion for the sightcast occlusion index.
//!
//! Decodes the two on-disk representations the index is fed from and
//! hands the core an ordered, flat triangle list:
//!
//! - `.vphys` — a KeyValues-style text container holding a map's physics
//!   shapes: convex hulls as half-edge meshes and world geometry as
//!   indexed triangle meshes, with vertex data in hex blobs.
//! - `.tri` — a flat hex-text cache of extracted triangles (9 × f32 LE
//!   per record), cheap to reload.
//!
//! # Example
//!
//! ```no_run
//! use sightcast_vphys::{read_vphys, write_tri};
//!
//! let triangles = read_vphys("world_physics.vphys")?;
//! write_tri("world_physics.tri", &triangles)?;
//! # Ok::<(), sightcast_vphys::VphysError>(())
//! ```

mod error;
mod geometry;
mod parser;
mod tri;

pub use error::{Result, VphysError};
pub use geometry::{read_vphys, triangles_from_vphys};
pub use parser::{parse_vphys, KvValue};
pub use tri::{format_tri, parse_tri, read_tri, write_tri};
