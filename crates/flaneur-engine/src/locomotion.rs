use core::f32::consts::FRAC_PI_2;

use flaneur_geom::{Aabb, Vec3, wrap_angle};
use flaneur_world::{CellCoord, GROUND_HEIGHT, WorldIndex};

use crate::config::EngineConfig;
use crate::input::InputState;

// Tunables. Speed-like constants are per-frame units at the 60 Hz baseline
// (see FRAME_RATE_BASELINE); rates are per second.
pub const FRAME_RATE_BASELINE: f32 = 60.0;
pub const SMOOTHING_RATE: f32 = 15.0;
pub const KEY_TURN_RATE: f32 = 1.8; // rad/s
pub const MOUSE_SENSITIVITY: f32 = 0.003; // rad per pixel
pub const OFF_ROAD_FACTOR: f32 = 0.5;
pub const PLAYER_RADIUS: f32 = 0.2;
pub const PLAYER_HEIGHT: f32 = 1.75;
pub const GRAVITY: f32 = 18.0; // units/s^2
pub const JUMP_SPEED: f32 = 5.0; // units/s
pub const HEIGHT_OFFSET_RATE: f32 = 1.5; // units/s
pub const MIN_HEIGHT_OFFSET: f32 = -0.5;
pub const MAX_HEIGHT_OFFSET: f32 = 4.0;
pub const BOB_FREQUENCY: f32 = 8.0; // phase advance, rad/s
pub const BOB_AMPLITUDE: f32 = 0.035;

/// Vertical sub-machine. Jump eligibility is being `Grounded`; the vertical
/// velocity only exists while airborne.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VerticalState {
    Grounded,
    Airborne { velocity: f32 },
}

impl VerticalState {
    #[inline]
    pub fn is_grounded(self) -> bool {
        matches!(self, VerticalState::Grounded)
    }
}

/// Camera pose published every tick.
#[derive(Clone, Copy, Debug)]
pub struct Pose {
    pub position: Vec3,
    /// Heading around the vertical axis, radians, CCW; 0 faces -z.
    pub yaw: f32,
    /// Radians, positive looking up, within [-PI/2, PI/2].
    pub pitch: f32,
}

impl Pose {
    pub fn forward(&self) -> Vec3 {
        let cp = self.pitch.cos();
        Vec3::new(
            -self.yaw.sin() * cp,
            self.pitch.sin(),
            -self.yaw.cos() * cp,
        )
        .normalized()
    }

    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalized()
    }
}

/// Flags derived per tick for the audio/minimap consumers. Rotation-only
/// input does not count as moving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Motion {
    pub is_moving: bool,
    pub is_on_road: bool,
}

/// The per-tick locomotion state machine. Owns the whole mutable player
/// state; consumers read it through [`pose`](Engine::pose) and
/// [`motion`](Engine::motion) rather than ambient globals.
pub struct Engine {
    cfg: EngineConfig,
    /// Authoritative camera position.
    position: Vec3,
    /// Persistent pre-collision candidate the camera chases. Advancing this
    /// by speed * dt and following it exponentially keeps displacement over
    /// wall-clock time independent of the tick rate.
    target: Vec3,
    yaw: f32,
    pitch: f32,
    target_yaw: f32,
    target_pitch: f32,
    vertical: VerticalState,
    height_offset: f32,
    bob_phase: f32,
    motion: Motion,
}

impl Engine {
    /// State for a freshly loaded world; `spawn` is the horizontal spawn
    /// point, clamped into bounds.
    pub fn new(cfg: EngineConfig, index: &WorldIndex, spawn: (f32, f32)) -> Self {
        let he = index.half_extent();
        let position = Vec3::new(
            spawn.0.clamp(-he, he),
            GROUND_HEIGHT + cfg.eye_height,
            spawn.1.clamp(-he, he),
        );
        Self {
            cfg,
            position,
            target: position,
            yaw: 0.0,
            pitch: 0.0,
            target_yaw: 0.0,
            target_pitch: 0.0,
            vertical: VerticalState::Grounded,
            height_offset: 0.0,
            bob_phase: 0.0,
            motion: Motion::default(),
        }
    }

    pub fn pose(&self) -> Pose {
        let mut position = self.position;
        if self.cfg.camera_bob_enabled {
            position.y += self.bob_phase.sin() * BOB_AMPLITUDE;
        }
        Pose {
            position,
            yaw: self.yaw,
            pitch: self.pitch,
        }
    }

    #[inline]
    pub fn motion(&self) -> Motion {
        self.motion
    }

    #[inline]
    pub fn vertical(&self) -> VerticalState {
        self.vertical
    }

    #[inline]
    pub fn height_offset(&self) -> f32 {
        self.height_offset
    }

    /// Point the camera (and its smoothing target) at a heading directly.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = wrap_angle(yaw);
        self.pitch = pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
        self.target_yaw = self.yaw;
        self.target_pitch = self.pitch;
    }

    /// Out-of-band reposition in the horizontal plane. Keeps the operator
    /// height trim, lands the player immediately (no falling after a jump
    /// cut), and moves the chase target with the position so the next tick
    /// does not slide in from the old location.
    pub fn teleport(&mut self, x: f32, z: f32, index: &WorldIndex) {
        let he = index.half_extent();
        self.position.x = x.clamp(-he, he);
        self.position.z = z.clamp(-he, he);
        self.position.y = self.rest_height();
        self.target = self.position;
        self.vertical = VerticalState::Grounded;
        self.bob_phase = 0.0;
        log::debug!(
            target: "engine",
            "teleported to ({:.2}, {:.2})",
            self.position.x,
            self.position.z
        );
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, input: &mut InputState, index: &WorldIndex, dt: f32) {
        debug_assert!(dt.is_finite(), "non-finite dt");
        if !(dt > 0.0) {
            return;
        }
        let alpha = 1.0 - (-SMOOTHING_RATE * dt).exp();

        // Rotation intake: held turn keys, then accumulated pointer deltas.
        if input.rotate_left {
            self.target_yaw += KEY_TURN_RATE * dt;
        }
        if input.rotate_right {
            self.target_yaw -= KEY_TURN_RATE * dt;
        }
        let (dx, dy) = input.take_rotation();
        self.target_yaw -= dx * MOUSE_SENSITIVITY;
        self.target_pitch =
            (self.target_pitch - dy * MOUSE_SENSITIVITY).clamp(-FRAC_PI_2, FRAC_PI_2);

        // Smooth toward the targets, yaw along the shortest path so crossing
        // +-PI never spins the long way round.
        self.yaw = wrap_angle(self.yaw + wrap_angle(self.target_yaw - self.yaw) * alpha);
        self.pitch += (self.target_pitch - self.pitch) * alpha;

        // Horizontal direction from the smoothed yaw; opposing keys cancel
        // in the sum, which is the whole error handling story here.
        let mut axial = 0.0;
        if input.move_forward {
            axial += 1.0;
        }
        if input.move_backward {
            axial -= 1.0;
        }
        let dir = (self.forward_flat() * axial).normalized();

        // Terrain speed from the cell under the current position.
        let here = CellCoord::from_world(self.position.x, self.position.z);
        let on_road = index.is_road(here);
        let speed = self.cfg.base_speed * if on_road { 1.0 } else { OFF_ROAD_FACTOR };

        // Advance the chase target and keep it inside the world.
        let step_len = speed * dt * FRAME_RATE_BASELINE;
        let he = index.half_extent();
        self.target.x = (self.target.x + dir.x * step_len).clamp(-he, he);
        self.target.z = (self.target.z + dir.z * step_len).clamp(-he, he);

        // Collision: reject the whole move back to the last valid position.
        // No sliding along the obstacle face.
        if self.cfg.collision_enabled && self.hits_building(index, self.target.x, self.target.z) {
            self.target.x = self.position.x;
            self.target.z = self.position.z;
        }

        // Chase the target instead of snapping to it.
        self.position.x += (self.target.x - self.position.x) * alpha;
        self.position.z += (self.target.z - self.position.z) * alpha;

        // Operator height trim, independent of gravity.
        if input.move_up {
            self.height_offset += HEIGHT_OFFSET_RATE * dt;
        }
        if input.move_down {
            self.height_offset -= HEIGHT_OFFSET_RATE * dt;
        }
        self.height_offset = self.height_offset.clamp(MIN_HEIGHT_OFFSET, MAX_HEIGHT_OFFSET);

        // Vertical machine. The jump request is consumed exactly once per
        // tick; while airborne it simply evaporates.
        let rest = self.rest_height();
        let jump = input.take_jump();
        if self.vertical.is_grounded() && self.cfg.gravity_enabled && jump {
            self.vertical = VerticalState::Airborne {
                velocity: JUMP_SPEED,
            };
            log::trace!(
                target: "engine",
                "jump at ({:.2}, {:.2})",
                self.position.x,
                self.position.z
            );
        }
        match self.vertical {
            VerticalState::Grounded => {
                self.position.y = rest;
            }
            VerticalState::Airborne { mut velocity } => {
                velocity -= GRAVITY * dt;
                self.position.y += velocity * dt;
                if velocity <= 0.0 && self.position.y <= rest {
                    self.position.y = rest;
                    self.vertical = VerticalState::Grounded;
                    log::trace!(target: "engine", "landed");
                } else {
                    self.vertical = VerticalState::Airborne { velocity };
                }
            }
        }
        self.target.y = self.position.y;

        // Camera bob runs only while horizontally moving; the phase resets
        // the instant movement stops so the next move starts level.
        let moving = input.move_forward || input.move_backward;
        if moving && self.cfg.camera_bob_enabled {
            self.bob_phase += dt * BOB_FREQUENCY;
        } else {
            self.bob_phase = 0.0;
        }

        // World bounds clamp on the authoritative position.
        self.position.x = self.position.x.clamp(-he, he);
        self.position.z = self.position.z.clamp(-he, he);

        self.motion = Motion {
            is_moving: moving,
            is_on_road: on_road,
        };
    }

    #[inline]
    fn forward_flat(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    #[inline]
    fn rest_height(&self) -> f32 {
        GROUND_HEIGHT + self.cfg.eye_height + self.height_offset
    }

    fn hits_building(&self, index: &WorldIndex, x: f32, z: f32) -> bool {
        let feet_y = self.position.y - self.cfg.eye_height - self.height_offset;
        let body = Aabb::upright(Vec3::new(x, feet_y, z), PLAYER_RADIUS, PLAYER_HEIGHT);
        index.volumes().iter().any(|vol| body.intersects(vol))
    }
}
