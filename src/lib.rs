//! Constrained Delaunay triangulation with point location, a reduced
//! navigation-graph overlay, and funnel-based shortest-path queries over
//! an axis-aligned rectangular domain.

pub mod config;
pub mod error;
pub mod geom;
pub mod grid;
pub mod nav;
pub mod triangle;
pub mod triangulation;

pub use config::GridConfig;
pub use error::{CdtError, PathError};
pub use geom::Vertex;
pub use nav::{find_path, Corridor, NodeId, ReducedGraph};
pub use triangle::{Triangle, TriIndex, VertIndex};
pub use triangulation::{Triangulation, VertexInsertionData};
