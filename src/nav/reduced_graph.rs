//! Reduced navigation graph: collapses the dual graph of unconstrained
//! triangle adjacency down to its "crossroad" (3 open edges) and
//! "dead-end" (1 open edge) triangles, with the chains of "corridor" (2
//! open edges) triangles between them folded into single weighted edges.
//! Grounded on
//! `examples/original_source/src/PathFinding/ReducedTriangulationGraph.h`
//! (`ReducedVertex`, `Corridor`, `constructFromTriangulation`).

use std::collections::HashMap;

use glam::Vec2;

use crate::geom;
use crate::triangle::TriIndex;
use crate::triangulation::Triangulation;

use super::funnel;

/// Index of a node in a [`ReducedGraph`]. Not the same as a [`TriIndex`]:
/// a node's originating triangle is recovered via
/// [`ReducedGraph::node_triangle`].
pub type NodeId = usize;

/// One fold of 0 or more corridor triangles between two graph nodes,
/// directed from `from` to `to`. `portals` are the shared edges crossed
/// along the way, in travel order, each `(left, right)` relative to that
/// direction; `cum_length` is the running centroid-to-centroid distance
/// at each triangle in `tri_chain`, used to splice a path that starts or
/// ends partway down the corridor.
#[derive(Debug, Clone)]
pub struct Corridor {
    pub from: NodeId,
    pub to: NodeId,
    pub length: f32,
    pub min_width: f32,
    pub portals: Vec<(Vec2, Vec2)>,
    pub tri_chain: Vec<TriIndex>,
    pub cum_length: Vec<f32>,
}

/// Where a triangle sits relative to the reduced graph: either it *is* a
/// node, or it's partway down a named corridor.
#[derive(Debug, Clone, Copy)]
pub enum TriangleContext {
    Node(NodeId),
    InCorridor { corridor: usize, position: usize },
}

#[derive(Debug, Clone)]
pub struct ReducedGraph {
    node_triangles: Vec<TriIndex>,
    tri_to_node: HashMap<TriIndex, NodeId>,
    pub corridors: Vec<Corridor>,
    adjacency: Vec<Vec<usize>>,
}

impl ReducedGraph {
    /// Builds the reduced graph of `cdt`'s current triangulation. Call
    /// again any time the triangulation has since been mutated; this does
    /// not stay in sync automatically, matching the engine's policy of
    /// recomputing derived structures explicitly rather than observing
    /// mutations.
    pub fn build(cdt: &Triangulation) -> Self {
        let n = cdt.triangle_count();
        let nav_degree: Vec<u8> = (0..n)
            .map(|t| {
                let tri = cdt.triangle(t);
                (0..3)
                    .filter(|&k| !tri.is_constrained[k] && tri.neighbours[k].is_some())
                    .count() as u8
            })
            .collect();

        let node_triangles: Vec<TriIndex> = (0..n).filter(|&t| nav_degree[t] != 2).collect();
        let tri_to_node: HashMap<TriIndex, NodeId> = node_triangles
            .iter()
            .enumerate()
            .map(|(i, &t)| (t, i))
            .collect();

        let mut corridors = Vec::new();
        let mut adjacency = vec![Vec::new(); node_triangles.len()];

        for (node_id, &t) in node_triangles.iter().enumerate() {
            let tri = cdt.triangle(t);
            for k in 0..3 {
                if tri.is_constrained[k] || tri.neighbours[k].is_none() {
                    continue;
                }
                let trace = trace_corridor(cdt, t, k, &nav_degree);
                let Some(&to_node) = tri_to_node.get(&trace.end_tri) else {
                    log::warn!("reduced graph: corridor from node {node_id} did not end at a node triangle");
                    continue;
                };
                let min_width = trace
                    .portals
                    .iter()
                    .map(|(a, b)| a.distance(*b))
                    .fold(f32::MAX, f32::min);
                let idx = corridors.len();
                corridors.push(Corridor {
                    from: node_id,
                    to: to_node,
                    length: corridor_length(&trace.portals),
                    min_width,
                    portals: trace.portals,
                    tri_chain: trace.tri_chain,
                    cum_length: trace.cum_length,
                });
                adjacency[node_id].push(idx);
            }
        }

        log::debug!(
            "reduced graph built: {} nodes, {} corridors over {n} triangles",
            node_triangles.len(),
            corridors.len()
        );

        ReducedGraph {
            node_triangles,
            tri_to_node,
            corridors,
            adjacency,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_triangles.len()
    }

    pub fn node_triangle(&self, node: NodeId) -> TriIndex {
        self.node_triangles[node]
    }

    pub fn corridors_from(&self, node: NodeId) -> &[usize] {
        &self.adjacency[node]
    }

    /// Resolves a triangle to its place in the reduced graph: a node
    /// directly, or a position along exactly one corridor.
    pub fn locate(&self, tri: TriIndex) -> Option<TriangleContext> {
        if let Some(&node) = self.tri_to_node.get(&tri) {
            return Some(TriangleContext::Node(node));
        }
        for (idx, corridor) in self.corridors.iter().enumerate() {
            if let Some(position) = corridor.tri_chain.iter().position(|&t| t == tri) {
                return Some(TriangleContext::InCorridor {
                    corridor: idx,
                    position,
                });
            }
        }
        None
    }
}

struct Trace {
    end_tri: TriIndex,
    portals: Vec<(Vec2, Vec2)>,
    tri_chain: Vec<TriIndex>,
    cum_length: Vec<f32>,
}

/// A corridor's length is the funnel-algorithm (taut-string) path length
/// from its entry edge's midpoint to its exit edge's midpoint through the
/// portals crossed in between, not a cruder sum of straight-line
/// centroid-to-centroid hops.
fn corridor_length(portals: &[(Vec2, Vec2)]) -> f32 {
    let Some(&(first_l, first_r)) = portals.first() else {
        return 0.0;
    };
    let &(last_l, last_r) = portals.last().unwrap();
    let entry_mid = (first_l + first_r) / 2.0;
    let exit_mid = (last_l + last_r) / 2.0;
    let taut = funnel::string_pull(entry_mid, exit_mid, portals);
    taut.windows(2).map(|w| w[0].distance(w[1])).sum()
}

fn edge_endpoints(tri: &crate::triangle::Triangle, k: usize) -> (Vec2, Vec2) {
    (
        tri.verts[geom::next(k)].as_vec2(),
        tri.verts[geom::prev(k)].as_vec2(),
    )
}

fn trace_corridor(cdt: &Triangulation, start_tri: TriIndex, entry_edge: usize, nav_degree: &[u8]) -> Trace {
    let mut tri_chain = vec![start_tri];
    let mut cum_length = vec![0.0f32];
    let mut portals = Vec::new();

    let tri0 = cdt.triangle(start_tri);
    portals.push(edge_endpoints(tri0, entry_edge));
    let mut prev_centroid = tri0.centroid();

    let mut came_from = start_tri;
    let mut current = tri0.neighbours[entry_edge]
        .expect("caller only traces navigable edges, which always have a neighbour");

    loop {
        let cur_centroid = cdt.triangle(current).centroid();
        cum_length.push(cum_length.last().unwrap() + prev_centroid.distance(cur_centroid));
        prev_centroid = cur_centroid;
        tri_chain.push(current);

        if nav_degree[current] != 2 {
            return Trace {
                end_tri: current,
                portals,
                tri_chain,
                cum_length,
            };
        }

        let back = cdt.triangle(current)
            .index_of_neighbour(came_from)
            .expect("triangles must be mutual neighbours");
        let cur_tri = cdt.triangle(current);
        let exit = (0..3)
            .find(|&k| k != back && !cur_tri.is_constrained[k] && cur_tri.neighbours[k].is_some())
            .expect("a degree-2 triangle has exactly one navigable edge besides the one it was entered by");
        portals.push(edge_endpoints(cur_tri, exit));

        came_from = current;
        current = cur_tri.neighbours[exit].unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vertex;

    #[test]
    fn fresh_boundary_is_two_dead_end_nodes() {
        let cdt = Triangulation::new(100, 100);
        let graph = ReducedGraph::build(&cdt);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.corridors.len(), 2);
    }

    #[test]
    fn a_wall_down_the_middle_splits_traversal() {
        let mut cdt = Triangulation::new(100, 100);
        let (a, _) = cdt.insert_vertex(Vertex::new(50, 0)).unwrap();
        let (b, _) = cdt.insert_vertex(Vertex::new(50, 100)).unwrap();
        cdt.insert_constraint(a, b).unwrap();
        let graph = ReducedGraph::build(&cdt);
        // left and right halves are no longer connected by any navigable edge
        for corridor in &graph.corridors {
            let left_tri = cdt.triangle(graph.node_triangle(corridor.from)).centroid().x;
            let right_tri = cdt.triangle(graph.node_triangle(corridor.to)).centroid().x;
            assert_eq!(left_tri < 50.0, right_tri < 50.0);
        }
    }
}
