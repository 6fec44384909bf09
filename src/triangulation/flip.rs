//! Delaunay restoration: the in-circle test and the single edge-flip
//! primitive every insertion path pushes onto a work stack after it cuts
//! the triangulation open. Grounded on
//! `examples/original_source/src/Triangulation.cpp` (`needSwap`,
//! `swapConnectingEdgeClockwise`/`CounterClockwise`).
//!
//! The original carries two chiral flip routines because it patches
//! neighbour slots by hand in whichever rotational order its caller
//! happens to be walking in. With a single triangle-corner convention
//! (corners always CCW, neighbour `k` opposite corner `k`) both cases are
//! the same edge rewrite, so this keeps one routine.

use crate::geom::{self, Vertex};
use crate::triangle::{Triangle, TriIndex};

use super::Triangulation;

/// `true` iff `d` lies strictly inside the circumcircle of `a, b, c`
/// (which must be given in counter-clockwise order). The standard
/// determinant form of the in-circle predicate: equivalent to, but free of
/// the sign ambiguity in, the trigonometric (Cline-Renka) formulation.
pub fn needs_swap(a: Vertex, b: Vertex, c: Vertex, d: Vertex) -> bool {
    let ax = a.x as f64 - d.x as f64;
    let ay = a.y as f64 - d.y as f64;
    let bx = b.x as f64 - d.x as f64;
    let by = b.y as f64 - d.y as f64;
    let cx = c.x as f64 - d.x as f64;
    let cy = c.y as f64 - d.y as f64;

    let a2 = ax * ax + ay * ay;
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;

    let det = ax * (by * c2 - b2 * cy) - ay * (bx * c2 - b2 * cx) + a2 * (bx * cy - by * cx);
    det > 0.0
}

impl Triangulation {
    /// Flips the diagonal shared by `t1` and its neighbour across the
    /// corner `apex_in_t1`, turning quad `C,P,D,Q` (traced as `t1 = C,P,Q`
    /// and its neighbour `t2 = D,Q,P`) into `t1' = C,P,D` / `t2' = C,D,Q`.
    /// Reuses `t1`/`t2`'s indices in place, as the rest of the engine
    /// assumes triangle indices never move once handed out.
    ///
    /// Caller must have already checked the edge is unconstrained and the
    /// quad is convex.
    pub(crate) fn flip_edge(&mut self, t1: TriIndex, apex_in_t1: usize) -> TriIndex {
        let t2 = self.triangles[t1].neighbours[apex_in_t1]
            .expect("flip_edge requires an existing neighbour across the flipped edge");
        let c2 = self.triangles[t2]
            .index_of_neighbour(t1)
            .expect("triangles must be mutual neighbours");

        let c1 = apex_in_t1;
        let next1 = geom::next(c1);
        let prev1 = geom::prev(c1);
        let next2 = geom::next(c2);
        let prev2 = geom::prev(c2);

        let vi1 = self.vert_of[t1];
        let vi2 = self.vert_of[t2];
        let c_idx = vi1[c1];
        let p_idx = vi1[next1];
        let q_idx = vi1[prev1];
        let d_idx = vi2[c2];

        let c_vert = self.vertices[c_idx];
        let p_vert = self.vertices[p_idx];
        let q_vert = self.vertices[q_idx];
        let d_vert = self.vertices[d_idx];

        let n_cp = self.triangles[t1].neighbours[prev1];
        let cons_cp = self.triangles[t1].is_constrained[prev1];
        let n_qc = self.triangles[t1].neighbours[next1];
        let cons_qc = self.triangles[t1].is_constrained[next1];
        let n_pd = self.triangles[t2].neighbours[next2];
        let cons_pd = self.triangles[t2].is_constrained[next2];
        let n_dq = self.triangles[t2].neighbours[prev2];
        let cons_dq = self.triangles[t2].is_constrained[prev2];

        // The P-D and Q-C edges change owning triangle; their external
        // neighbours' back-references must follow.
        if let Some(ext) = n_pd {
            if let Some(slot) = self.triangles[ext].index_of_neighbour(t2) {
                self.triangles[ext].neighbours[slot] = Some(t1);
            }
        }
        if let Some(ext) = n_qc {
            if let Some(slot) = self.triangles[ext].index_of_neighbour(t1) {
                self.triangles[ext].neighbours[slot] = Some(t2);
            }
        }

        self.triangles[t1] = Triangle {
            verts: [c_vert, p_vert, d_vert],
            neighbours: [n_pd, Some(t2), n_cp],
            is_constrained: [cons_pd, false, cons_cp],
        };
        self.vert_of[t1] = [c_idx, p_idx, d_idx];

        self.triangles[t2] = Triangle {
            verts: [c_vert, d_vert, q_vert],
            neighbours: [n_dq, n_qc, Some(t1)],
            is_constrained: [cons_dq, cons_qc, false],
        };
        self.vert_of[t2] = [c_idx, d_idx, q_idx];

        t2
    }

    /// Pops `(inner, outer)` pairs and flips the edge between them
    /// whenever it's unconstrained, the resulting quad is convex, and the
    /// in-circle test says the current diagonal is wrong; pushes the
    /// pairs bordering each flip so the fix propagates outward. Grounded
    /// on the original's Delaunay-restoration stack used by both vertex
    /// and constraint insertion.
    pub(crate) fn restore_delaunay(&mut self, mut stack: Vec<(TriIndex, TriIndex)>) {
        while let Some((t_inner, t_outer)) = stack.pop() {
            if t_inner >= self.triangles.len() || t_outer >= self.triangles.len() {
                continue;
            }
            let Some(c1) = self.triangles[t_inner].index_of_neighbour(t_outer) else {
                continue;
            };
            if self.triangles[t_inner].is_constrained[c1] {
                continue;
            }
            let Some(c2) = self.triangles[t_outer].index_of_neighbour(t_inner) else {
                continue;
            };

            let inner = self.triangles[t_inner];
            let outer = self.triangles[t_outer];
            let c_vert = inner.verts[c1];
            let p_vert = inner.verts[geom::next(c1)];
            let q_vert = inner.verts[geom::prev(c1)];
            let d_vert = outer.verts[c2];

            if !geom::is_convex(c_vert, p_vert, d_vert, q_vert) {
                continue;
            }
            if !needs_swap(inner.verts[0], inner.verts[1], inner.verts[2], d_vert) {
                continue;
            }

            let t1 = t_inner;
            let t2 = self.flip_edge(t1, c1);

            for &(owner, other) in &[(t1, t2), (t2, t1)] {
                for &slot in self.triangles[owner].neighbours.iter() {
                    if let Some(n) = slot {
                        if n != other {
                            stack.push((owner, n));
                        }
                    }
                }
            }
        }
    }
}
