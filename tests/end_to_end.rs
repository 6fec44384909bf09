//! End-to-end scenarios exercising the full pipeline: boundary creation,
//! vertex/constraint insertion, invariant preservation, and pathfinding
//! around an obstacle.

use cdt_nav::{find_path, GridConfig, ReducedGraph, Triangulation, Vertex};

#[test]
fn fresh_triangulation_is_two_triangles_and_delaunay() {
    let _ = env_logger::try_init();
    let cdt = Triangulation::new(200, 100);
    assert_eq!(cdt.vertex_count(), 4);
    assert_eq!(cdt.triangle_count(), 2);
    assert_eq!(cdt.fixed_edge_count(), 4);
    assert!(cdt.is_delaunay());
}

#[test]
fn a_single_interior_vertex_stays_consistent() {
    let _ = env_logger::try_init();
    let mut cdt = Triangulation::new(200, 100);
    let (idx, data) = cdt.insert_vertex(Vertex::new(100, 50)).unwrap();
    assert_eq!(idx, 4);
    assert!(data.overlapping_vertex.is_none());
    assert!(data.overlapping_edge.is_none());
    assert_eq!(cdt.triangle_count(), 4);
    assert!(cdt.is_delaunay());
}

#[test]
fn constraint_between_already_connected_vertices_is_a_no_op_mutation() {
    let _ = env_logger::try_init();
    let mut cdt = Triangulation::new(200, 100);
    let before_tris = cdt.triangle_count();
    // (0,0)-(200,0) is already a boundary edge.
    cdt.insert_constraint(0, 1).unwrap();
    assert_eq!(cdt.triangle_count(), before_tris);
    assert!(cdt.is_fixed_edge(Vertex::new(0, 0), Vertex::new(200, 0)));
}

#[test]
fn constraint_with_no_collinear_vertices_forces_a_direct_edge() {
    let _ = env_logger::try_init();
    let mut cdt = Triangulation::new(200, 100);
    let (p, _) = cdt.insert_vertex(Vertex::new(30, 20)).unwrap();
    let (q, _) = cdt.insert_vertex(Vertex::new(170, 80)).unwrap();
    let (r, _) = cdt.insert_vertex(Vertex::new(170, 20)).unwrap();
    let (s, _) = cdt.insert_vertex(Vertex::new(30, 80)).unwrap();
    let _ = (r, s);

    cdt.insert_constraint(p, q).unwrap();
    assert!(cdt.is_fixed_edge(cdt.vertex(p), cdt.vertex(q)));
}

#[test]
fn constraint_through_a_collinear_vertex_produces_two_sub_edges() {
    let _ = env_logger::try_init();
    let mut cdt = Triangulation::new(200, 100);
    let (mid, _) = cdt.insert_vertex(Vertex::new(100, 50)).unwrap();
    let (left, _) = cdt.insert_vertex(Vertex::new(10, 50)).unwrap();
    let (right, _) = cdt.insert_vertex(Vertex::new(190, 50)).unwrap();

    let before = cdt.fixed_edge_count();
    cdt.insert_constraint(left, right).unwrap();

    assert!(cdt.is_fixed_edge(cdt.vertex(left), cdt.vertex(mid)));
    assert!(cdt.is_fixed_edge(cdt.vertex(mid), cdt.vertex(right)));
    assert!(!cdt.is_fixed_edge(cdt.vertex(left), cdt.vertex(right)));
    assert_eq!(cdt.fixed_edge_count(), before + 2);
}

#[test]
fn path_query_routes_around_a_wall_constraint() {
    let _ = env_logger::try_init();
    let mut cdt = Triangulation::with_grid_config(200, 100, GridConfig { cells_x: 8, cells_y: 4 });

    // A wall from the bottom edge up to y=70, leaving a 30-unit gap at the top.
    let (wall_bottom, _) = cdt.insert_vertex(Vertex::new(100, 0)).unwrap();
    let (wall_top, _) = cdt.insert_vertex(Vertex::new(100, 70)).unwrap();
    cdt.insert_constraint(wall_bottom, wall_top).unwrap();
    cdt.update_cell_grid();

    let graph = ReducedGraph::build(&cdt);

    let start_point = Vertex::new(20, 20);
    let goal_point = Vertex::new(180, 20);
    let start_tri = cdt
        .clone()
        .find_triangle(start_point.as_vec2(), false)
        .unwrap();
    let goal_tri = cdt
        .clone()
        .find_triangle(goal_point.as_vec2(), false)
        .unwrap();

    let path = find_path(&graph, &cdt, start_tri, start_point, goal_tri, goal_point, 0.0).unwrap();
    assert!(path.len() >= 2);
    assert_eq!(path.first().unwrap(), &start_point.as_vec2());
    assert_eq!(path.last().unwrap(), &goal_point.as_vec2());

    // The path must detour above the gap (y > 70 somewhere) rather than
    // cutting straight through the wall.
    assert!(path.iter().any(|p| p.y > 70.0));
}

#[test]
fn path_query_is_unreachable_when_no_gap_exists() {
    let _ = env_logger::try_init();
    let mut cdt = Triangulation::with_grid_config(200, 100, GridConfig { cells_x: 8, cells_y: 4 });
    let (wall_bottom, _) = cdt.insert_vertex(Vertex::new(100, 0)).unwrap();
    let (wall_top, _) = cdt.insert_vertex(Vertex::new(100, 100)).unwrap();
    cdt.insert_constraint(wall_bottom, wall_top).unwrap();
    cdt.update_cell_grid();

    let graph = ReducedGraph::build(&cdt);
    let start_point = Vertex::new(20, 20);
    let goal_point = Vertex::new(180, 20);
    let mut probe = cdt.clone();
    let start_tri = probe.find_triangle(start_point.as_vec2(), false).unwrap();
    let goal_tri = probe.find_triangle(goal_point.as_vec2(), false).unwrap();

    let result = find_path(&graph, &cdt, start_tri, start_point, goal_tri, goal_point, 0.0);
    assert!(result.is_err());
}
