//! Player locomotion and collision engine for a grid-city world.
//!
//! Turns sampled input (held keys, drag / pointer-lock mouse deltas, teleport
//! commands) into a continuously updated camera pose: orientation smoothing,
//! terrain-dependent walk speed, axis-aligned collision against building
//! volumes, a Grounded/Airborne jump machine, camera bob, and a click-to-
//! select raycast. The engine renders nothing and owns no world data; it
//! reads a prebuilt [`flaneur_world::WorldIndex`] every tick.
#![forbid(unsafe_code)]

mod config;
mod input;
mod locomotion;
mod raycast;

pub use config::EngineConfig;
pub use input::{InputState, MouseButton, RotationMode};
pub use locomotion::{
    BOB_AMPLITUDE, BOB_FREQUENCY, Engine, FRAME_RATE_BASELINE, GRAVITY, HEIGHT_OFFSET_RATE,
    JUMP_SPEED, KEY_TURN_RATE, MAX_HEIGHT_OFFSET, MIN_HEIGHT_OFFSET, MOUSE_SENSITIVITY, Motion,
    OFF_ROAD_FACTOR, PLAYER_HEIGHT, PLAYER_RADIUS, Pose, SMOOTHING_RATE, VerticalState,
};
pub use raycast::{PICK_FOV_Y_DEGREES, PICK_MAX_DISTANCE, pick_cell};

use flaneur_world::{CellCoord, WorldIndex};

impl Engine {
    /// Pick through the pointer, or through the screen center while
    /// pointer-locked.
    pub fn pick(
        &self,
        input: &InputState,
        ndc: (f32, f32),
        aspect: f32,
        index: &WorldIndex,
    ) -> Option<CellCoord> {
        let ndc = if input.pointer_locked() {
            (0.0, 0.0)
        } else {
            ndc
        };
        pick_cell(ndc, &self.pose(), aspect, index)
    }
}
