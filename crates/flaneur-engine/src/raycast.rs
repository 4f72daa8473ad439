use flaneur_geom::Vec3;
use flaneur_world::{CELL_SIZE, CellCoord, GROUND_HEIGHT, WorldIndex};

use crate::locomotion::Pose;

pub const PICK_MAX_DISTANCE: f32 = 30.0;
pub const PICK_FOV_Y_DEGREES: f32 = 60.0;

/// Resolve the world cell under a pointer. `ndc` is the pointer position in
/// normalized device coordinates (x right, y up, both in [-1, 1]); pass
/// (0, 0) to aim through the screen center. Returns the nearest cell whose
/// surface (building face or ground square) the ray hits within range, and
/// `None` when nothing is in range or the nearest hit is a road — roads are
/// not selectable.
pub fn pick_cell(
    ndc: (f32, f32),
    pose: &Pose,
    aspect: f32,
    index: &WorldIndex,
) -> Option<CellCoord> {
    let tan_half = (PICK_FOV_Y_DEGREES.to_radians() * 0.5).tan();
    let dir = (pose.forward()
        + pose.right() * (ndc.0 * tan_half * aspect)
        + pose.up() * (ndc.1 * tan_half))
        .normalized();
    let origin = pose.position;

    // Ground-plane hit, when looking downward at all.
    let mut best: Option<(f32, CellCoord)> = None;
    if dir.y < -1e-6 {
        let t = (GROUND_HEIGHT - origin.y) / dir.y;
        if (0.0..=PICK_MAX_DISTANCE).contains(&t) {
            let p = origin + dir * t;
            best = Some((t, CellCoord::from_world(p.x, p.z)));
        }
    }

    // A building face can eclipse the ground hit.
    if let Some((t, coord)) = nearest_building_hit(origin, dir, index) {
        if best.is_none_or(|(bt, _)| t < bt) {
            best = Some((t, coord));
        }
    }

    let (_, coord) = best?;
    if index.is_road(coord) {
        None
    } else {
        Some(coord)
    }
}

/// Walk grid cells under the ray's horizontal track, nearest first, and
/// return the first building volume the ray enters. Footprints never leave
/// their cell, so the first hit found is the nearest one.
fn nearest_building_hit(origin: Vec3, dir: Vec3, index: &WorldIndex) -> Option<(f32, CellCoord)> {
    if index.volumes().is_empty() {
        return None;
    }
    #[inline]
    fn t_delta(v: f32) -> f32 {
        if v.abs() < 1e-8 {
            f32::MAX
        } else {
            (CELL_SIZE / v).abs()
        }
    }

    // Cell boundaries sit at half-integers in world space; shift by half a
    // cell so they land on integers and floor() names the cell.
    let ux = origin.x / CELL_SIZE + 0.5;
    let uz = origin.z / CELL_SIZE + 0.5;
    let mut gx = ux.floor() as i32;
    let mut gy = uz.floor() as i32;

    let step_x: i32 = if dir.x > 0.0 {
        1
    } else if dir.x < 0.0 {
        -1
    } else {
        0
    };
    let step_y: i32 = if dir.z > 0.0 {
        1
    } else if dir.z < 0.0 {
        -1
    } else {
        0
    };
    let td_x = t_delta(dir.x);
    let td_z = t_delta(dir.z);
    let fx = ux - ux.floor();
    let fz = uz - uz.floor();
    let mut tm_x = match step_x {
        1 => (1.0 - fx) * td_x,
        -1 => fx * td_x,
        _ => f32::MAX,
    };
    let mut tm_z = match step_y {
        1 => (1.0 - fz) * td_z,
        -1 => fz * td_z,
        _ => f32::MAX,
    };

    let mut t = 0.0_f32;
    for _ in 0..256 {
        if t > PICK_MAX_DISTANCE {
            break;
        }
        let coord = CellCoord::new(gx, gy);
        if let Some(vol) = index.building_at(coord) {
            if let Some(hit_t) = vol.ray_entry(origin, dir, PICK_MAX_DISTANCE) {
                return Some((hit_t, coord));
            }
        }
        if step_x == 0 && step_y == 0 {
            // Vertical ray: only the starting cell matters
            break;
        }
        if tm_x < tm_z {
            gx += step_x;
            t = tm_x;
            tm_x += td_x;
        } else {
            gy += step_y;
            t = tm_z;
            tm_z += td_z;
        }
    }
    None
}
