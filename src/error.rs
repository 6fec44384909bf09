//! Error types for the triangulation engine and the navigation overlay.

use thiserror::Error;

use crate::VertIndex;

/// Errors raised by [`crate::Triangulation`] mutations.
///
/// Out-of-domain points are not represented here: `find_triangle` and
/// `insert_vertex` signal that case by returning `None` / a default
/// insertion record, per the engine's error-handling design.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CdtError {
    /// `insert_constraint` was given an index that does not name an
    /// existing vertex. Unlike a no-op (identical endpoints, or a
    /// constraint already present), this is a programming error: the
    /// caller handed the engine a dangling reference into its own vertex
    /// array.
    #[error("constraint endpoint {0} does not name an existing vertex")]
    InvalidConstraintEndpoint(VertIndex),
}

/// Errors raised by the navigation overlay's path queries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// Start and goal triangles lie in different connected components of
    /// the unconstrained dual graph: no corridor connects them.
    #[error("no path exists between the requested start and goal")]
    Unreachable,
}
