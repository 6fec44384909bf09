//! Triangle record and the index types that address the triangulation's
//! arena of vertices and triangles.

use crate::geom::Vertex;

/// Index of a vertex in [`crate::Triangulation`]'s vertex arena. Stable for
/// the vertex's lifetime.
pub type VertIndex = usize;

/// Index of a triangle in [`crate::Triangulation`]'s triangle arena. Stable
/// from creation onward: triangles are only ever overwritten in place, never
/// freed, so an index handed out once stays valid.
pub type TriIndex = usize;

/// A triangle: three corner coordinates (a cache-local denormalization of
/// the vertex positions, kept in sync with the vertex-index map owned by
/// the triangulation), the neighbour opposite each corner, and whether the
/// edge opposite each corner is user-constrained.
///
/// Corners are always stored in counter-clockwise order; a triangle whose
/// three corners are collinear is never constructed.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// Corner coordinates, counter-clockwise.
    pub verts: [Vertex; 3],
    /// `neighbours[k]` is the triangle across the edge opposite corner `k`,
    /// or `None` at the outer boundary.
    pub neighbours: [Option<TriIndex>; 3],
    /// `is_constrained[k]` is whether the edge opposite corner `k` is a
    /// user-imposed constraint.
    pub is_constrained: [bool; 3],
}

impl Triangle {
    pub fn new(verts: [Vertex; 3]) -> Self {
        Triangle {
            verts,
            neighbours: [None, None, None],
            is_constrained: [false, false, false],
        }
    }

    /// Index in `[0, 3)` of `v` among this triangle's corners, if present.
    pub fn index_of(&self, v: Vertex) -> Option<usize> {
        self.verts.iter().position(|&corner| corner == v)
    }

    /// Index of `neighbour` among this triangle's neighbour slots, if this
    /// triangle actually borders it.
    pub fn index_of_neighbour(&self, neighbour: TriIndex) -> Option<usize> {
        self.neighbours.iter().position(|&n| n == Some(neighbour))
    }

    /// Centroid of the three corners, as an average (not area-weighted).
    pub fn centroid(&self) -> glam::Vec2 {
        (self.verts[0].as_vec2() + self.verts[1].as_vec2() + self.verts[2].as_vec2()) / 3.0
    }
}
