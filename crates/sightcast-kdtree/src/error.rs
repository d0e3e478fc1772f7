//! Error types for tree construction.

use thiserror::Error;

/// Errors that can occur while building the index.
///
/// A query that finds nothing is not an error; it returns `None`.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The input triangle list was empty, so there are no points to seed
    /// a bounding box from.
    #[error("cannot build an index from an empty triangle list")]
    EmptyGeometry,
}

/// Result type for index construction.
pub type Result<T> = std::result::Result<T, BuildError>;
