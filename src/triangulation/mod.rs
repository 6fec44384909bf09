//! The triangulation store: vertex/triangle arenas, the constrained-edge
//! set, the spatial index, and the primitives every other component builds
//! on. Grounded on `examples/original_source/src/Triangulation.h`/`.cpp`
//! (`cdt::Triangulation<Vertex>`).

mod flip;
mod insert_constraint;
mod insert_vertex;
mod invariants;
mod locate;

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Write as _};
use std::path::Path;

use crate::config::GridConfig;
use crate::geom::Vertex;
use crate::grid::Grid;
use crate::triangle::{Triangle, TriIndex, VertIndex};

/// An edge identified by its two endpoint coordinates, order-independent.
/// Used for fixed-edge-set membership, per the spec's data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UndirectedEdge {
    a: Vertex,
    b: Vertex,
}

impl UndirectedEdge {
    pub fn new(a: Vertex, b: Vertex) -> Self {
        if (a.x, a.y) <= (b.x, b.y) {
            UndirectedEdge { a, b }
        } else {
            UndirectedEdge { a: b, b: a }
        }
    }
}

/// A directed edge identified by its two endpoint coordinates, used while
/// walking the triangulation (direction matters there: "from" is the
/// vertex we're walking away from).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordEdge {
    pub from: Vertex,
    pub to: Vertex,
}

impl CoordEdge {
    pub fn new(from: Vertex, to: Vertex) -> Self {
        CoordEdge { from, to }
    }
}

/// Result of [`Triangulation::insert_vertex`]: which, if any, kind of
/// overlap the inserted point had with the existing triangulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexInsertionData {
    /// Set when the point coincided with an existing vertex; no mutation
    /// happened and this is that vertex's index.
    pub overlapping_vertex: Option<VertIndex>,
    /// Set when the point landed exactly on an existing constrained edge;
    /// these are the edge's original endpoints (now superseded by the two
    /// half-edges created on either side of the new vertex).
    pub overlapping_edge: Option<(VertIndex, VertIndex)>,
}

/// The constrained Delaunay triangulation of an axis-aligned rectangular
/// domain.
///
/// All public mutations either leave the seven invariants of the data model
/// intact or (in debug builds) panic via a failed `debug_assert!` — there is
/// no partial-failure recovery, per the engine's error-handling design.
#[derive(Debug, Clone)]
pub struct Triangulation {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) triangles: Vec<Triangle>,
    /// Parallel to `triangles`: the vertex-arena index of each corner, in
    /// the same order as `triangles[i].verts`. This is the authoritative
    /// identity of a triangle's corners; `triangles[i].verts` is a
    /// denormalized cache of `vertices[vert_of[i][k]]` kept in sync by
    /// every mutation.
    pub(crate) vert_of: Vec<[VertIndex; 3]>,
    pub(crate) fixed_edges: HashSet<UndirectedEdge>,
    pub(crate) grid: Grid,
    pub(crate) grid_config: GridConfig,
    pub(crate) last_found: TriIndex,
    pub(crate) box_width: i32,
    pub(crate) box_height: i32,
}

impl Triangulation {
    /// Creates a triangulation over a `box_width x box_height` rectangle,
    /// seeded with the four corner vertices, the two triangles sharing the
    /// `(0,0)-(box_width,box_height)` diagonal, and the four constrained
    /// boundary edges.
    pub fn new(box_width: i32, box_height: i32) -> Self {
        Self::with_grid_config(box_width, box_height, GridConfig::default())
    }

    /// As [`Triangulation::new`], with an explicit spatial-index cell
    /// count instead of the default 20x20.
    pub fn with_grid_config(box_width: i32, box_height: i32, grid_config: GridConfig) -> Self {
        let grid = Grid::new(grid_config, box_width, box_height);
        let mut cdt = Triangulation {
            vertices: Vec::new(),
            triangles: Vec::new(),
            vert_of: Vec::new(),
            fixed_edges: HashSet::new(),
            grid,
            grid_config,
            last_found: 0,
            box_width,
            box_height,
        };
        cdt.create_boundary();
        cdt
    }

    /// Restores the triangulation to its freshly-constructed state: four
    /// boundary vertices, two triangles, four constrained edges, nothing
    /// else.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
        self.vert_of.clear();
        self.fixed_edges.clear();
        self.last_found = 0;
        self.grid = Grid::new(self.grid_config, self.box_width, self.box_height);
        self.create_boundary();
        log::debug!("triangulation reset to {}x{} boundary", self.box_width, self.box_height);
    }

    fn create_boundary(&mut self) {
        let v0 = Vertex::new(0, 0);
        let v1 = Vertex::new(self.box_width, 0);
        let v2 = Vertex::new(self.box_width, self.box_height);
        let v3 = Vertex::new(0, self.box_height);

        self.vertices.extend_from_slice(&[v0, v1, v2, v3]);

        let mut lower = Triangle::new([v0, v1, v2]);
        lower.neighbours = [None, Some(1), None];
        lower.is_constrained = [true, false, true];

        let mut upper = Triangle::new([v0, v2, v3]);
        upper.neighbours = [None, None, Some(0)];
        upper.is_constrained = [true, true, false];

        self.triangles.push(lower);
        self.triangles.push(upper);
        self.vert_of.push([0, 1, 2]);
        self.vert_of.push([0, 2, 3]);

        self.fixed_edges.insert(UndirectedEdge::new(v0, v1));
        self.fixed_edges.insert(UndirectedEdge::new(v1, v2));
        self.fixed_edges.insert(UndirectedEdge::new(v2, v3));
        self.fixed_edges.insert(UndirectedEdge::new(v3, v0));

        debug_assert!(self.triangulation_is_consistent());
    }

    /// Re-seeds the spatial grid by walking each cell centre, seeding each
    /// search from the previously located triangle (boustrophedon order)
    /// so successive locations stay close and the walk is effectively
    /// O(1) amortized. Call after any bulk mutation.
    pub fn update_cell_grid(&mut self) {
        self.grid.clear();
        let cells_x = self.grid.cell_count_x;
        let cells_y = self.grid.cell_count_y;

        let mut from_last_found = false;
        for row in 0..cells_y {
            let cols: Box<dyn Iterator<Item = u32>> = if row % 2 == 0 {
                Box::new(0..cells_x)
            } else {
                Box::new((0..cells_x).rev())
            };
            for col in cols {
                let center = self.grid.cell_center(col, row);
                if let Some(tri) = self.find_triangle(center, from_last_found) {
                    let cell = self.grid.cell_index(center);
                    self.grid.set_triangle_at(cell, tri);
                }
                from_last_found = true;
            }
        }
        log::debug!("spatial grid reseeded over {} cells", self.grid.n_cells());
    }

    /// Debug-only text dump: `Vertices:` then one `x y` per line, then
    /// `Triangles:` then one `n0 n1 n2` neighbour triple per line (`-1` for
    /// a missing neighbour).
    pub fn dump_to_file(&self, path: &Path) -> io::Result<()> {
        let mut file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                log::warn!("dump_to_file: could not create {}: {e}", path.display());
                return Err(e);
            }
        };
        writeln!(file, "Vertices:")?;
        for v in &self.vertices {
            writeln!(file, "{} {}", v.x, v.y)?;
        }
        writeln!(file, "Triangles:")?;
        for tri in &self.triangles {
            let n = |slot: Option<TriIndex>| slot.map_or(-1i64, |i| i as i64);
            writeln!(
                file,
                "{} {} {}",
                n(tri.neighbours[0]),
                n(tri.neighbours[1]),
                n(tri.neighbours[2])
            )?;
        }
        Ok(())
    }

    // -- read accessors -----------------------------------------------

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex(&self, index: VertIndex) -> Vertex {
        self.vertices[index]
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangle(&self, index: TriIndex) -> &Triangle {
        &self.triangles[index]
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// The three vertex-arena indices of a triangle's corners, in the same
    /// order as its coordinate copies.
    pub fn triangle_corner_indices(&self, index: TriIndex) -> [VertIndex; 3] {
        self.vert_of[index]
    }

    pub fn is_fixed_edge(&self, a: Vertex, b: Vertex) -> bool {
        self.fixed_edges.contains(&UndirectedEdge::new(a, b))
    }

    pub fn fixed_edge_count(&self) -> usize {
        self.fixed_edges.len()
    }

    pub(crate) fn opposite_index(&self, neighbour_of: TriIndex, tri: &Triangle) -> usize {
        tri.index_of_neighbour(neighbour_of)
            .expect("triangles must be mutual neighbours")
    }
}
