//! Navigation overlay built on top of a [`crate::Triangulation`]: the
//! reduced dual graph and the A*-plus-funnel path query over it.

pub mod funnel;
pub mod path_finder;
pub mod reduced_graph;

pub use path_finder::find_path;
pub use reduced_graph::{Corridor, NodeId, ReducedGraph, TriangleContext};
