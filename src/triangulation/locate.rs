//! Point location: the walking algorithm that finds which triangle (if
//! any) contains a query point, seeded from the spatial grid or from the
//! previously found triangle. Grounded on
//! `examples/original_source/src/Triangulation.cpp` (`findTriangle`).

use glam::Vec2;

use crate::geom;
use crate::triangle::TriIndex;

use super::Triangulation;

/// Upper bound on walk steps before falling back to a linear scan. The
/// walk only fails to converge this fast on a degenerate or disconnected
/// triangulation; bounding it keeps `find_triangle` total.
const MAX_WALK_STEPS: usize = 1024;

impl Triangulation {
    /// Finds the triangle containing `point`, or `None` if `point` lies
    /// outside the triangulated domain.
    ///
    /// When `from_last_found` is `true` the walk starts at the triangle
    /// found by the previous call; otherwise it starts from whatever the
    /// spatial grid caches for `point`'s cell (falling back to the last
    /// found triangle, then to triangle 0, if the grid has nothing there
    /// yet). On success the last-found cache is updated so a subsequent
    /// nearby query starts from here.
    pub fn find_triangle(&mut self, point: Vec2, from_last_found: bool) -> Option<TriIndex> {
        let start = if from_last_found {
            self.last_found
        } else {
            let cell = self.grid.cell_index(point);
            self.grid
                .triangle_at(cell)
                .unwrap_or(self.last_found)
        };

        if let Some(found) = self.walk_from(start, point) {
            self.last_found = found;
            return Some(found);
        }

        log::trace!("find_triangle: walk did not converge, falling back to linear scan");
        self.linear_scan(point)
    }

    fn walk_from(&self, start: TriIndex, point: Vec2) -> Option<TriIndex> {
        let mut current = start;
        for _ in 0..MAX_WALK_STEPS {
            let tri = &self.triangles[current];
            let tri_verts = [
                tri.verts[0].as_vec2(),
                tri.verts[1].as_vec2(),
                tri.verts[2].as_vec2(),
            ];
            if geom::in_triangle(point, &tri_verts) {
                return Some(current);
            }

            let centroid = tri.centroid();
            let mut stepped = false;
            for k in 0..3 {
                let n = geom::next(k);
                if geom::segments_intersect_or_touch(
                    centroid,
                    point,
                    tri_verts[k],
                    tri_verts[n],
                ) {
                    match tri.neighbours[geom::prev(k)] {
                        Some(next_tri) => {
                            current = next_tri;
                            stepped = true;
                        }
                        None => return None, // walked off the boundary: point is outside
                    }
                    break;
                }
            }
            if !stepped {
                // Centroid-to-point ray didn't cross any edge: numerical
                // corner case. Bail to the linear-scan fallback.
                return None;
            }
        }
        None
    }

    fn linear_scan(&self, point: Vec2) -> Option<TriIndex> {
        self.triangles.iter().position(|tri| {
            let tri_verts = [
                tri.verts[0].as_vec2(),
                tri.verts[1].as_vec2(),
                tri.verts[2].as_vec2(),
            ];
            geom::in_triangle(point, &tri_verts)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_boundary_triangle_containing_a_point() {
        let mut cdt = Triangulation::new(100, 100);
        let found = cdt.find_triangle(Vec2::new(10.0, 10.0), false);
        assert!(found.is_some());
    }

    #[test]
    fn returns_none_outside_the_domain() {
        let mut cdt = Triangulation::new(100, 100);
        let found = cdt.find_triangle(Vec2::new(-10.0, -10.0), false);
        assert_eq!(found, None);
    }

    #[test]
    fn last_found_cache_is_updated_on_success() {
        let mut cdt = Triangulation::new(100, 100);
        let found = cdt.find_triangle(Vec2::new(90.0, 90.0), false).unwrap();
        assert_eq!(cdt.last_found, found);
    }
}
