//! Grid-city world snapshot and the lookup structures derived from it.
#![forbid(unsafe_code)]

mod cell;
mod index;
mod snapshot;

pub use cell::CellCoord;
pub use index::{WorldIndex, building_volume};
pub use snapshot::{WorldCell, WorldSnapshot, load_snapshot};

/// Edge length of one grid cell in world units.
pub const CELL_SIZE: f32 = 1.0;

/// Vertical extent contributed by one building floor.
pub const FLOOR_HEIGHT: f32 = 1.2;

/// Fraction of a cell covered by a building footprint, centered on the cell.
pub const BUILDING_FOOTPRINT: f32 = 0.7;

/// Height of the walkable ground plane.
pub const GROUND_HEIGHT: f32 = 0.0;
