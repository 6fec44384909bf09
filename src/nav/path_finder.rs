//! A* search over the reduced graph, filtered by agent width, followed by
//! funnel string-pulling to turn the corridor chain into an actual point
//! path. Grounded on the `TriPathData`/`funnelDistance` vocabulary in
//! `examples/original_source/src/PathFinding/ReducedTriangulationGraph.h`;
//! the original's own `main.cpp` A* driver was not present in the filtered
//! source, so the search loop here follows the textbook formulation.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use glam::Vec2;

use crate::error::PathError;
use crate::geom::Vertex;
use crate::triangle::TriIndex;
use crate::triangulation::Triangulation;

use super::funnel;
use super::reduced_graph::{NodeId, ReducedGraph, TriangleContext};

#[derive(Debug, Clone, PartialEq)]
struct HeapEntry {
    priority: f32,
    node: NodeId,
    cost: f32,
}

impl Eq for HeapEntry {}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert so the lowest priority pops first.
        other.priority.partial_cmp(&self.priority).unwrap_or(Ordering::Equal)
    }
}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct StartCandidate {
    node: NodeId,
    prefix_len: f32,
    /// Portals from the query point's triangle up to (but not including)
    /// `node`'s own triangle, oriented start-to-node.
    prefix_portals: Vec<(Vec2, Vec2)>,
}

struct GoalCandidate {
    node: NodeId,
    suffix_len: f32,
    /// Portals from `node`'s triangle to the query point's triangle,
    /// oriented node-to-goal.
    suffix_portals: Vec<(Vec2, Vec2)>,
}

fn candidates(graph: &ReducedGraph, tri: TriIndex, as_start: bool) -> Vec<(NodeId, f32, Vec<(Vec2, Vec2)>)> {
    match graph.locate(tri) {
        Some(TriangleContext::Node(n)) => vec![(n, 0.0, Vec::new())],
        Some(TriangleContext::InCorridor { corridor, position }) => {
            let c = &graph.corridors[corridor];
            let to_from_len = c.cum_length[position];
            let to_to_len = c.cum_length.last().unwrap() - to_from_len;

            let mut prefix_to_from: Vec<(Vec2, Vec2)> = c.portals[..position].to_vec();
            prefix_to_from.reverse();
            let suffix_to_to: Vec<(Vec2, Vec2)> = c.portals[position..].to_vec();

            if as_start {
                vec![
                    (c.from, to_from_len, prefix_to_from),
                    (c.to, to_to_len, suffix_to_to),
                ]
            } else {
                // As a goal, the portal chain runs the other way: from the
                // node down to the query triangle.
                let mut from_to = c.portals[..position].to_vec();
                let mut to_from = c.portals[position..].to_vec();
                to_from.reverse();
                from_to.reverse();
                vec![(c.from, to_from_len, from_to), (c.to, to_to_len, to_from)]
            }
        }
        None => Vec::new(),
    }
}

/// Dijkstra from `start`, filtered to corridors at least `min_width`
/// wide, biased by a straight-line heuristic to `goal_point` (admissible:
/// a corridor's centroid-chain length is never shorter than the straight
/// line between its endpoints).
fn astar(
    graph: &ReducedGraph,
    cdt: &Triangulation,
    start: NodeId,
    goal_point: Vec2,
    min_width: f32,
) -> HashMap<NodeId, (f32, Option<usize>)> {
    let mut best: HashMap<NodeId, (f32, Option<usize>)> = HashMap::new();
    best.insert(start, (0.0, None));

    let heuristic = |n: NodeId| cdt.triangle(graph.node_triangle(n)).centroid().distance(goal_point);

    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry {
        priority: heuristic(start),
        node: start,
        cost: 0.0,
    });

    while let Some(HeapEntry { node, cost, .. }) = heap.pop() {
        if let Some(&(known_cost, _)) = best.get(&node) {
            if cost > known_cost {
                continue;
            }
        }
        for &edge in graph.corridors_from(node) {
            let corridor = &graph.corridors[edge];
            if corridor.min_width < min_width {
                continue;
            }
            let next_cost = cost + corridor.length;
            let better = best
                .get(&corridor.to)
                .map_or(true, |&(c, _)| next_cost < c);
            if better {
                best.insert(corridor.to, (next_cost, Some(edge)));
                heap.push(HeapEntry {
                    priority: next_cost + heuristic(corridor.to),
                    node: corridor.to,
                    cost: next_cost,
                });
            }
        }
    }

    best
}

fn reconstruct_portals(graph: &ReducedGraph, reached: &HashMap<NodeId, (f32, Option<usize>)>, goal_node: NodeId) -> Vec<(Vec2, Vec2)> {
    let mut edges = Vec::new();
    let mut current = goal_node;
    while let Some(&(_, Some(edge))) = reached.get(&current) {
        edges.push(edge);
        current = graph.corridors[edge].from;
    }
    edges.reverse();
    edges
        .into_iter()
        .flat_map(|e| graph.corridors[e].portals.clone())
        .collect()
}

/// Finds the shortest width-respecting path from the triangle/point pair
/// `(start_tri, start_point)` to `(goal_tri, goal_point)`.
///
/// `agent_diameter` filters out any corridor narrower than it: a corridor
/// whose tightest portal is narrower than the agent cannot be used, even
/// if it is otherwise the shortest route.
pub fn find_path(
    graph: &ReducedGraph,
    cdt: &Triangulation,
    start_tri: TriIndex,
    start_point: Vertex,
    goal_tri: TriIndex,
    goal_point: Vertex,
    agent_diameter: f32,
) -> Result<Vec<Vec2>, PathError> {
    let start_vec = start_point.as_vec2();
    let goal_vec = goal_point.as_vec2();

    let starts = candidates(graph, start_tri, true);
    let goals = candidates(graph, goal_tri, false);
    if starts.is_empty() || goals.is_empty() {
        return Err(PathError::Unreachable);
    }

    let mut best: Option<(f32, Vec<(Vec2, Vec2)>)> = None;

    for (start_node, prefix_len, prefix_portals) in &starts {
        let reached = astar(graph, cdt, *start_node, goal_vec, agent_diameter);
        for (goal_node, suffix_len, suffix_portals) in &goals {
            let Some(&(mid_cost, _)) = reached.get(goal_node) else {
                continue;
            };
            let total = prefix_len + mid_cost + suffix_len;
            if best.as_ref().map_or(true, |(c, _)| total < *c) {
                let mut portals = prefix_portals.clone();
                portals.extend(reconstruct_portals(graph, &reached, *goal_node));
                portals.extend(suffix_portals.clone());
                best = Some((total, portals));
            }
        }
    }

    let (_, portals) = best.ok_or(PathError::Unreachable)?;
    Ok(funnel::string_pull(start_vec, goal_vec, &portals))
}
