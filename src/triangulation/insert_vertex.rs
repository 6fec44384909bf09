//! Vertex insertion: classifies a point against the triangle that
//! contains it (an existing vertex, a point on an existing edge, or a
//! genuinely interior point) and splits accordingly, then restores the
//! Delaunay property. Grounded on
//! `examples/original_source/src/Triangulation.cpp`
//! (`insertVertexAndGetData`, `insertVertexIntoSpace`, `insertVertexOnEdge`).

use crate::geom::{self, Vertex};
use crate::triangle::{Triangle, TriIndex, VertIndex};

use super::{Triangulation, UndirectedEdge, VertexInsertionData};

/// `true` iff `p` lies on the closed segment `a-b` (exact, since vertex
/// coordinates are integers: collinearity is an exact orientation test
/// and containment is an exact bounding-box check).
fn point_on_segment(p: Vertex, a: Vertex, b: Vertex) -> bool {
    geom::orient(a, b, p) == 0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

impl Triangulation {
    /// Inserts `point`, returning its vertex index and how it related to
    /// the existing triangulation. Returns `None` if `point` lies outside
    /// the triangulated domain.
    pub fn insert_vertex(&mut self, point: Vertex) -> Option<(VertIndex, VertexInsertionData)> {
        let containing = self.find_triangle(point.as_vec2(), false)?;

        if let Some(existing) = self.find_overlapping_vertex(containing, point) {
            return Some((
                existing,
                VertexInsertionData {
                    overlapping_vertex: Some(existing),
                    overlapping_edge: None,
                },
            ));
        }

        if let Some((a, b)) = self.find_overlapping_edge(containing, point) {
            let new_index = self.insert_vertex_on_edge(containing, point);
            return Some((
                new_index,
                VertexInsertionData {
                    overlapping_vertex: None,
                    overlapping_edge: Some((a, b)),
                },
            ));
        }

        let new_index = self.insert_vertex_into_space(containing, point);
        Some((
            new_index,
            VertexInsertionData {
                overlapping_vertex: None,
                overlapping_edge: None,
            },
        ))
    }

    /// Inserts every point in `points`, in order, ignoring points that
    /// fall outside the domain. Returns the assigned vertex index for each
    /// point that was (or already had been) inserted.
    pub fn insert_vertices(&mut self, points: &[Vertex]) -> Vec<VertIndex> {
        points
            .iter()
            .filter_map(|&p| self.insert_vertex(p).map(|(idx, _)| idx))
            .collect()
    }

    fn find_overlapping_vertex(&self, tri: TriIndex, point: Vertex) -> Option<VertIndex> {
        let vi = self.vert_of[tri];
        (0..3).find_map(|k| {
            if self.vertices[vi[k]] == point {
                Some(vi[k])
            } else {
                None
            }
        })
    }

    fn find_overlapping_edge(&self, tri: TriIndex, point: Vertex) -> Option<(VertIndex, VertIndex)> {
        let vi = self.vert_of[tri];
        (0..3).find_map(|k| {
            let n = geom::next(k);
            let (a, b) = (self.vertices[vi[k]], self.vertices[vi[n]]);
            if point_on_segment(point, a, b) {
                Some((vi[k], vi[n]))
            } else {
                None
            }
        })
    }

    /// Splits `tri` (which strictly contains `point`) into three new
    /// triangles fanned around `point`, reusing `tri`'s index for one of
    /// them, and restores the Delaunay property around the split.
    fn insert_vertex_into_space(&mut self, tri: TriIndex, point: Vertex) -> VertIndex {
        let vi = self.vertices.len();
        self.vertices.push(point);

        let old = self.triangles[tri];
        let old_vi = self.vert_of[tri];
        let (ia, ib, ic) = (old_vi[0], old_vi[1], old_vi[2]);

        let n_bc = old.neighbours[0];
        let c_bc = old.is_constrained[0];
        let n_ca = old.neighbours[1];
        let c_ca = old.is_constrained[1];
        let n_ab = old.neighbours[2];
        let c_ab = old.is_constrained[2];

        let t_ab = tri;
        let t_bc = self.triangles.len();
        let t_ca = t_bc + 1;

        let p = point;
        let (a, b, c) = (old.verts[0], old.verts[1], old.verts[2]);

        self.triangles[t_ab] = Triangle {
            verts: [p, a, b],
            neighbours: [n_ab, Some(t_bc), Some(t_ca)],
            is_constrained: [c_ab, false, false],
        };
        self.vert_of[t_ab] = [vi, ia, ib];

        self.triangles.push(Triangle {
            verts: [p, b, c],
            neighbours: [n_bc, Some(t_ca), Some(t_ab)],
            is_constrained: [c_bc, false, false],
        });
        self.vert_of.push([vi, ib, ic]);

        self.triangles.push(Triangle {
            verts: [p, c, a],
            neighbours: [n_ca, Some(t_ab), Some(t_bc)],
            is_constrained: [c_ca, false, false],
        });
        self.vert_of.push([vi, ic, ia]);

        if let Some(ext) = n_bc {
            if let Some(slot) = self.triangles[ext].index_of_neighbour(tri) {
                self.triangles[ext].neighbours[slot] = Some(t_bc);
            }
        }
        if let Some(ext) = n_ca {
            if let Some(slot) = self.triangles[ext].index_of_neighbour(tri) {
                self.triangles[ext].neighbours[slot] = Some(t_ca);
            }
        }

        let mut stack = Vec::with_capacity(3);
        if let Some(ext) = n_ab {
            stack.push((t_ab, ext));
        }
        if let Some(ext) = n_bc {
            stack.push((t_bc, ext));
        }
        if let Some(ext) = n_ca {
            stack.push((t_ca, ext));
        }
        self.restore_delaunay(stack);

        log::trace!("inserted interior vertex {vi} into triangle {tri}");
        debug_assert!(self.triangulation_is_consistent());
        vi
    }

    /// Splits the two triangles sharing the edge `point` lies on (`tri`
    /// and its neighbour across that edge) into four, preserving and
    /// propagating the edge's constrained status onto its two halves.
    fn insert_vertex_on_edge(&mut self, tri: TriIndex, point: Vertex) -> VertIndex {
        let vi = self.vertices.len();
        self.vertices.push(point);

        let vi1 = self.vert_of[tri];
        let c1 = (0..3)
            .find(|&k| point_on_segment(point, self.vertices[vi1[k]], self.vertices[vi1[geom::next(k)]]))
            .expect("caller already established the edge point lies on");
        let t1 = tri;
        let t2 = self.triangles[t1].neighbours[c1]
            .expect("an overlapping-edge point must have a neighbour across the edge");
        let c2 = self.triangles[t2]
            .index_of_neighbour(t1)
            .expect("triangles must be mutual neighbours");

        let a_idx = vi1[geom::next(c1)];
        let b_idx = vi1[geom::prev(c1)];
        let c_idx = vi1[c1];
        let vi2 = self.vert_of[t2];
        let d_idx = vi2[c2];

        let a = self.vertices[a_idx];
        let b = self.vertices[b_idx];
        let c = self.vertices[c_idx];
        let d = self.vertices[d_idx];
        let p = point;

        let edge_ab_constrained = self.triangles[t1].is_constrained[c1];

        let n1_bc = self.triangles[t1].neighbours[geom::next(c1)];
        let c1_bc = self.triangles[t1].is_constrained[geom::next(c1)];
        let n1_ca = self.triangles[t1].neighbours[geom::prev(c1)];
        let c1_ca = self.triangles[t1].is_constrained[geom::prev(c1)];
        let n2_db = self.triangles[t2].neighbours[geom::prev(c2)];
        let c2_db = self.triangles[t2].is_constrained[geom::prev(c2)];
        let n2_ad = self.triangles[t2].neighbours[geom::next(c2)];
        let c2_ad = self.triangles[t2].is_constrained[geom::next(c2)];

        let t1b = self.triangles.len();
        let t2b = t1b + 1;

        // T1a = (A, P, C), reuses t1.
        self.triangles[t1] = Triangle {
            verts: [a, p, c],
            neighbours: [Some(t1b), n1_ca, Some(t2b)],
            is_constrained: [false, c1_ca, edge_ab_constrained],
        };
        self.vert_of[t1] = [a_idx, vi, c_idx];

        // T1b = (P, B, C).
        self.triangles.push(Triangle {
            verts: [p, b, c],
            neighbours: [n1_bc, Some(t1), Some(t2)],
            is_constrained: [c1_bc, false, edge_ab_constrained],
        });
        self.vert_of.push([vi, b_idx, c_idx]);

        // T2a = (B, P, D), reuses t2.
        self.triangles[t2] = Triangle {
            verts: [b, p, d],
            neighbours: [Some(t2b), n2_db, Some(t1)],
            is_constrained: [false, c2_db, edge_ab_constrained],
        };
        self.vert_of[t2] = [b_idx, vi, d_idx];

        // T2b = (P, A, D).
        self.triangles.push(Triangle {
            verts: [p, a, d],
            neighbours: [n2_ad, Some(t2), Some(t1)],
            is_constrained: [c2_ad, false, edge_ab_constrained],
        });
        self.vert_of.push([vi, a_idx, d_idx]);

        if let Some(ext) = n1_bc {
            if let Some(slot) = self.triangles[ext].index_of_neighbour(t1) {
                self.triangles[ext].neighbours[slot] = Some(t1b);
            }
        }
        if let Some(ext) = n2_ad {
            if let Some(slot) = self.triangles[ext].index_of_neighbour(t2) {
                self.triangles[ext].neighbours[slot] = Some(t2b);
            }
        }

        if edge_ab_constrained {
            self.fixed_edges.remove(&UndirectedEdge::new(a, b));
            self.fixed_edges.insert(UndirectedEdge::new(a, p));
            self.fixed_edges.insert(UndirectedEdge::new(p, b));
        }

        let mut stack = Vec::with_capacity(4);
        if let Some(ext) = n1_ca {
            stack.push((t1, ext));
        }
        if let Some(ext) = n1_bc {
            stack.push((t1b, ext));
        }
        if let Some(ext) = n2_db {
            stack.push((t2, ext));
        }
        if let Some(ext) = n2_ad {
            stack.push((t2b, ext));
        }
        self.restore_delaunay(stack);

        log::trace!("inserted vertex {vi} on edge ({a_idx}, {b_idx})");
        debug_assert!(self.triangulation_is_consistent());
        vi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_insertion_increases_triangle_count_by_two() {
        let mut cdt = Triangulation::new(100, 100);
        let before = cdt.triangle_count();
        cdt.insert_vertex(Vertex::new(50, 50));
        assert_eq!(cdt.triangle_count(), before + 2);
    }

    #[test]
    fn re_inserting_the_same_point_does_not_mutate() {
        let mut cdt = Triangulation::new(100, 100);
        let (first, _) = cdt.insert_vertex(Vertex::new(50, 50)).unwrap();
        let before = cdt.triangle_count();
        let (second, data) = cdt.insert_vertex(Vertex::new(50, 50)).unwrap();
        assert_eq!(first, second);
        assert_eq!(cdt.triangle_count(), before);
        assert_eq!(data.overlapping_vertex, Some(first));
    }

    #[test]
    fn insertion_outside_the_domain_returns_none() {
        let mut cdt = Triangulation::new(100, 100);
        assert!(cdt.insert_vertex(Vertex::new(-5, -5)).is_none());
    }

    #[test]
    fn insertion_on_a_constrained_boundary_edge_splits_it_in_two() {
        let mut cdt = Triangulation::new(100, 100);
        let before_edges = cdt.fixed_edge_count();
        let (_, data) = cdt.insert_vertex(Vertex::new(50, 0)).unwrap();
        assert!(data.overlapping_edge.is_some());
        assert_eq!(cdt.fixed_edge_count(), before_edges + 1);
        assert!(cdt.is_fixed_edge(Vertex::new(0, 0), Vertex::new(50, 0)));
        assert!(cdt.is_fixed_edge(Vertex::new(50, 0), Vertex::new(100, 0)));
        assert!(!cdt.is_fixed_edge(Vertex::new(0, 0), Vertex::new(100, 0)));
    }
}
