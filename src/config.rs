//! Configuration knobs for the triangulation's spatial index.

/// Cell-count configuration for the [`crate::grid::Grid`] that seeds point
/// location. The spec's default is a 20x20 uniform subdivision of the
/// bounding box; this is exposed so callers triangulating unusually large
/// or small domains can trade seed-cache density for memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub cells_x: u32,
    pub cells_y: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            cells_x: 20,
            cells_y: 20,
        }
    }
}
