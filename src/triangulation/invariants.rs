//! Debug-only consistency checks for the seven invariants of the data
//! model. Cheap checks run after every structural mutation via
//! `debug_assert!`; the full Delaunay check is expensive (checks every
//! triangle against every neighbour's apex) and is only ever called
//! explicitly, from tests. Grounded on
//! `examples/original_source/src/Triangulation.cpp`
//! (`triangulationIsConsistent`, `allTrianglesValid`, `allAreDelaunay`).

use crate::geom;

use super::flip::needs_swap;
use super::Triangulation;

impl Triangulation {
    /// Neighbour tables are mutually symmetric (if `a` lists `b` as its
    /// neighbour across some edge, `b` lists `a` back across the matching
    /// edge with the same constrained flag), the coordinate cache matches
    /// the vertex-index map it denormalizes, and every triangle is
    /// non-degenerate and wound counter-clockwise.
    pub(crate) fn triangulation_is_consistent(&self) -> bool {
        for (t, tri) in self.triangles.iter().enumerate() {
            let vi = self.vert_of[t];
            for k in 0..3 {
                if self.vertices[vi[k]] != tri.verts[k] {
                    return false;
                }
            }
            if geom::orient(tri.verts[0], tri.verts[1], tri.verts[2]) <= 0 {
                return false;
            }
            for k in 0..3 {
                let Some(n) = tri.neighbours[k] else { continue };
                if n >= self.triangles.len() {
                    return false;
                }
                let Some(back) = self.triangles[n].index_of_neighbour(t) else {
                    return false;
                };
                if self.triangles[n].is_constrained[back] != tri.is_constrained[k] {
                    return false;
                }
            }
        }
        true
    }

    /// `true` iff no triangle's circumcircle strictly contains the apex
    /// vertex of any neighbour across an unconstrained edge. Constrained
    /// edges are exempt: forcing them is the entire point of a
    /// *constrained* Delaunay triangulation, and they are allowed to
    /// violate the empty-circumcircle property. Quadratic in triangle
    /// count; intended for tests on small triangulations, not runtime
    /// assertions.
    pub fn is_delaunay(&self) -> bool {
        for (t, tri) in self.triangles.iter().enumerate() {
            for k in 0..3 {
                if tri.is_constrained[k] {
                    continue;
                }
                let Some(n) = tri.neighbours[k] else { continue };
                let Some(apex_corner) = self.triangles[n].index_of_neighbour(t) else {
                    continue;
                };
                let apex = self.triangles[n].verts[apex_corner];
                if needs_swap(tri.verts[0], tri.verts[1], tri.verts[2], apex) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::geom::Vertex;
    use crate::triangulation::Triangulation;

    #[test]
    fn fresh_boundary_is_consistent_and_delaunay() {
        let cdt = Triangulation::new(100, 100);
        assert!(cdt.triangulation_is_consistent());
        assert!(cdt.is_delaunay());
    }

    #[test]
    fn stays_consistent_and_delaunay_after_interior_insertions() {
        let mut cdt = Triangulation::new(100, 100);
        for p in [(10, 10), (90, 10), (50, 80), (30, 40), (70, 60)] {
            cdt.insert_vertex(Vertex::new(p.0, p.1));
        }
        assert!(cdt.triangulation_is_consistent());
        assert!(cdt.is_delaunay());
    }
}
