use serde::Deserialize;

/// Fixed engine options, supplied once at construction. Changing them means
/// constructing a new engine.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct EngineConfig {
    /// Walk speed in world units per frame at the 60 Hz baseline.
    #[serde(default = "default_base_speed")]
    pub base_speed: f32,
    /// Camera height above the feet.
    #[serde(default = "default_eye_height")]
    pub eye_height: f32,
    #[serde(default = "default_true")]
    pub gravity_enabled: bool,
    #[serde(default = "default_true")]
    pub collision_enabled: bool,
    #[serde(default = "default_true")]
    pub camera_bob_enabled: bool,
}

fn default_base_speed() -> f32 {
    0.05
}

fn default_eye_height() -> f32 {
    1.6
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_speed: default_base_speed(),
            eye_height: default_eye_height(),
            gravity_enabled: true,
            collision_enabled: true,
            camera_bob_enabled: true,
        }
    }
}
