use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::event::Event;

/// A reproducible input session: timed events replayed into the engine so a
/// full walk/jump/teleport/pick run works without any windowing host.
#[derive(Debug, Deserialize, Default)]
pub struct Script {
    #[serde(default)]
    pub events: Vec<TimedEvent>,
}

#[derive(Debug, Deserialize)]
pub struct TimedEvent {
    /// Seconds from simulation start.
    pub at: f32,
    #[serde(flatten)]
    pub event: Event,
}

impl Script {
    pub fn load_from_path(path: &Path) -> Result<Script, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        let script: Script = toml::from_str(&s)?;
        Ok(script)
    }
}
