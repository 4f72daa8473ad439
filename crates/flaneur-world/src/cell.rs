use serde::Deserialize;

use crate::CELL_SIZE;

/// Address of one grid cell. Grid x runs along world x, grid y along world z;
/// the world-space center of a cell sits at integer coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Deserialize)]
pub struct CellCoord {
    pub gx: i32,
    pub gy: i32,
}

impl CellCoord {
    #[inline]
    pub const fn new(gx: i32, gy: i32) -> Self {
        Self { gx, gy }
    }

    /// Nearest cell to a world-space point.
    #[inline]
    pub fn from_world(x: f32, z: f32) -> Self {
        Self {
            gx: (x / CELL_SIZE).round() as i32,
            gy: (z / CELL_SIZE).round() as i32,
        }
    }

    /// World-space (x, z) center of this cell.
    #[inline]
    pub fn center(self) -> (f32, f32) {
        (self.gx as f32 * CELL_SIZE, self.gy as f32 * CELL_SIZE)
    }
}

impl core::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.gx, self.gy)
    }
}
