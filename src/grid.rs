//! Uniform spatial index used to seed point-location walks.
//!
//! A fixed subdivision of the bounding box; each cell caches the index of a
//! triangle known to lie near the cell's centre (or `None` before the first
//! `update_cell_grid` pass). Grounded on the original's `Grid` type
//! (`examples/original_source/src/Triangulation.cpp`, `m_grid`/`m_cell2tri_ind`).

use glam::Vec2;

use crate::config::GridConfig;
use crate::triangle::TriIndex;

/// Cell index as `(column, row)`.
pub type CellIndex = usize;

#[derive(Debug, Clone)]
pub struct Grid {
    pub(crate) cell_count_x: u32,
    pub(crate) cell_count_y: u32,
    pub(crate) cell_size: Vec2,
    cell2tri: Vec<Option<TriIndex>>,
}

impl Grid {
    pub fn new(config: GridConfig, box_width: i32, box_height: i32) -> Self {
        let cell_size = Vec2::new(
            box_width as f32 / config.cells_x as f32,
            box_height as f32 / config.cells_y as f32,
        );
        let n_cells = (config.cells_x * config.cells_y) as usize;
        Grid {
            cell_count_x: config.cells_x,
            cell_count_y: config.cells_y,
            cell_size,
            cell2tri: vec![None; n_cells],
        }
    }

    pub fn n_cells(&self) -> usize {
        self.cell2tri.len()
    }

    /// Maps a point to its cell index, clamping to the boundary so a query
    /// that lands exactly on the far edge still resolves to a valid cell.
    pub fn cell_index(&self, point: Vec2) -> CellIndex {
        let col = ((point.x / self.cell_size.x) as i64)
            .clamp(0, self.cell_count_x as i64 - 1) as usize;
        let row = ((point.y / self.cell_size.y) as i64)
            .clamp(0, self.cell_count_y as i64 - 1) as usize;
        row * self.cell_count_x as usize + col
    }

    pub fn cell_center(&self, col: u32, row: u32) -> Vec2 {
        Vec2::new(
            col as f32 * self.cell_size.x + self.cell_size.x / 2.0,
            row as f32 * self.cell_size.y + self.cell_size.y / 2.0,
        )
    }

    pub fn triangle_at(&self, cell: CellIndex) -> Option<TriIndex> {
        self.cell2tri[cell]
    }

    pub fn set_triangle_at(&mut self, cell: CellIndex, tri: TriIndex) {
        self.cell2tri[cell] = Some(tri);
    }

    pub fn clear(&mut self) {
        self.cell2tri.iter_mut().for_each(|c| *c = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_index_maps_corners_to_boundary_cells() {
        let grid = Grid::new(GridConfig::default(), 100, 100);
        assert_eq!(grid.cell_index(Vec2::new(0.0, 0.0)), 0);
        let last_row_first_col = (grid.cell_count_y - 1) as usize * grid.cell_count_x as usize;
        assert_eq!(grid.cell_index(Vec2::new(0.0, 100.0)), last_row_first_col);
    }

    #[test]
    fn triangle_at_starts_empty() {
        let grid = Grid::new(GridConfig::default(), 100, 100);
        assert_eq!(grid.triangle_at(0), None);
    }
}
