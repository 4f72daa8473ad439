/// How mouse movement is currently interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RotationMode {
    /// Pointer moves freely; motion does not rotate the camera.
    #[default]
    Free,
    /// Relative-delta look-around (pointer lock); toggled by middle click.
    PointerLocked,
    /// Left button held; pointer motion drags the view.
    Dragging,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MouseButton {
    Left,
    Middle,
}

/// Sampled input the engine reads once per tick. Event handlers only set
/// flags and add to the rotation accumulator; the tick performs the single
/// read-and-clear, so fast mouse movement between ticks is never lost.
#[derive(Debug, Default)]
pub struct InputState {
    pub move_forward: bool,
    pub move_backward: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    jump_requested: bool,
    mode: RotationMode,
    pending_yaw: f32,
    pending_pitch: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mode(&self) -> RotationMode {
        self.mode
    }

    #[inline]
    pub fn pointer_locked(&self) -> bool {
        self.mode == RotationMode::PointerLocked
    }

    /// Edge-triggered jump; consumed by [`take_jump`](Self::take_jump).
    pub fn request_jump(&mut self) {
        self.jump_requested = true;
    }

    pub fn take_jump(&mut self) -> bool {
        core::mem::take(&mut self.jump_requested)
    }

    pub fn mouse_button_down(&mut self, button: MouseButton) {
        match button {
            // Left-drag rotation is inert while pointer-locked
            MouseButton::Left => {
                if self.mode == RotationMode::Free {
                    self.mode = RotationMode::Dragging;
                }
            }
            MouseButton::Middle => {
                self.mode = match self.mode {
                    RotationMode::PointerLocked => RotationMode::Free,
                    _ => RotationMode::PointerLocked,
                };
            }
        }
    }

    pub fn mouse_button_up(&mut self, button: MouseButton) {
        if button == MouseButton::Left && self.mode == RotationMode::Dragging {
            self.mode = RotationMode::Free;
        }
    }

    /// Accumulate a pointer movement (screen-space pixels). Additive across
    /// events so nothing is lost between ticks; ignored unless dragging or
    /// pointer-locked.
    pub fn mouse_moved(&mut self, dx: f32, dy: f32) {
        match self.mode {
            RotationMode::Dragging | RotationMode::PointerLocked => {
                self.pending_yaw += dx;
                self.pending_pitch += dy;
            }
            RotationMode::Free => {}
        }
    }

    /// Read and zero the accumulated (yaw, pitch) pointer deltas.
    pub fn take_rotation(&mut self) -> (f32, f32) {
        let d = (self.pending_yaw, self.pending_pitch);
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
        d
    }
}
