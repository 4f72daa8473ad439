use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// One grid cell of the snapshot. Immutable once the snapshot is taken.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct WorldCell {
    pub gx: i32,
    pub gy: i32,
    /// Traversable road; roads are faster to walk and never collide.
    #[serde(default)]
    pub road: bool,
    /// A finished building stands on the cell. Unfinished construction does
    /// not collide.
    #[serde(default)]
    pub built: bool,
    #[serde(default)]
    pub floors: u32,
}

/// Immutable description of a loaded world. The engine never mutates cells;
/// a changed world arrives as a whole new snapshot.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldSnapshot {
    #[serde(default = "default_half_extent")]
    pub half_extent: f32,
    /// Horizontal (x, z) spawn point.
    #[serde(default)]
    pub spawn: [f32; 2],
    #[serde(default)]
    pub cells: Vec<WorldCell>,
}

fn default_half_extent() -> f32 {
    24.0
}

impl Default for WorldSnapshot {
    fn default() -> Self {
        Self {
            half_extent: default_half_extent(),
            spawn: [0.0, 0.0],
            cells: Vec::new(),
        }
    }
}

pub fn load_snapshot(path: &Path) -> Result<WorldSnapshot, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let snapshot: WorldSnapshot = toml::from_str(&s)?;
    Ok(snapshot)
}
