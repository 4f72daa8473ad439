use flaneur_geom::{Aabb, Vec3};
use hashbrown::{HashMap, HashSet};

use crate::cell::CellCoord;
use crate::snapshot::WorldSnapshot;
use crate::{BUILDING_FOOTPRINT, CELL_SIZE, FLOOR_HEIGHT, GROUND_HEIGHT};

/// Collision box for a finished building on `coord`.
pub fn building_volume(coord: CellCoord, floors: u32) -> Aabb {
    let (cx, cz) = coord.center();
    let half = 0.5 * BUILDING_FOOTPRINT * CELL_SIZE;
    Aabb::upright(
        Vec3::new(cx, GROUND_HEIGHT, cz),
        half,
        floors as f32 * FLOOR_HEIGHT,
    )
}

/// Lookup structures derived from one [`WorldSnapshot`]: the road set and the
/// list of building collision volumes. Built once per snapshot and rebuilt
/// wholesale when the snapshot changes.
pub struct WorldIndex {
    half_extent: f32,
    roads: HashSet<CellCoord>,
    volumes: Vec<Aabb>,
    buildings: HashMap<CellCoord, usize>,
}

impl WorldIndex {
    pub fn build(snapshot: &WorldSnapshot) -> Self {
        let mut roads = HashSet::new();
        let mut volumes = Vec::new();
        let mut buildings: HashMap<CellCoord, usize> = HashMap::new();
        for cell in &snapshot.cells {
            let coord = CellCoord::new(cell.gx, cell.gy);
            if cell.road {
                roads.insert(coord);
            }
            // Only finished, non-road buildings block movement. A built cell
            // with zero floors is malformed input and gets no volume.
            if cell.built && !cell.road && cell.floors > 0 && !buildings.contains_key(&coord) {
                let vol = building_volume(coord, cell.floors);
                debug_assert!(vol.is_valid(), "inverted building volume at {coord}");
                buildings.insert(coord, volumes.len());
                volumes.push(vol);
            }
        }
        log::debug!(
            target: "world",
            "indexed {} cells: {} road, {} collidable buildings",
            snapshot.cells.len(),
            roads.len(),
            volumes.len()
        );
        Self {
            half_extent: snapshot.half_extent.max(0.0),
            roads,
            volumes,
            buildings,
        }
    }

    #[inline]
    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    #[inline]
    pub fn is_road(&self, coord: CellCoord) -> bool {
        self.roads.contains(&coord)
    }

    #[inline]
    pub fn volumes(&self) -> &[Aabb] {
        &self.volumes
    }

    #[inline]
    pub fn building_at(&self, coord: CellCoord) -> Option<&Aabb> {
        self.buildings.get(&coord).map(|&i| &self.volumes[i])
    }

    #[inline]
    pub fn road_count(&self) -> usize {
        self.roads.len()
    }
}
