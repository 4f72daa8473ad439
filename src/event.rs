use std::collections::{BTreeMap, VecDeque};

use serde::Deserialize;

/// Movement and trim keys the host can press into the engine's input state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Key {
    Forward,
    Backward,
    RotateLeft,
    RotateRight,
    Up,
    Down,
    Jump,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Button {
    Left,
    Middle,
}

/// Host events. Scripted ones carry their payload straight from the input
/// timeline; `ReloadWorld` also arrives from the file watcher and `Report`
/// re-arms itself when periodic reporting is on.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Event {
    KeyDown { key: Key },
    KeyUp { key: Key },
    MouseDown { button: Button },
    MouseUp { button: Button },
    MouseMove { dx: f32, dy: f32 },
    Teleport { x: f32, z: f32 },
    Pick { ndc: [f32; 2] },
    Report,
    ReloadWorld,
}

pub struct EventEnvelope {
    #[allow(dead_code)]
    pub id: u64,
    pub tick: u64,
    pub kind: Event,
}

/// Tick-bucketed FIFO: events scheduled for the current tick drain in order,
/// future ones wait for their bucket.
pub struct EventQueue {
    by_tick: BTreeMap<u64, VecDeque<EventEnvelope>>,
    pub now: u64,
    next_id: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self {
            by_tick: BTreeMap::new(),
            now: 0,
            next_id: 1,
        }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn emit_now(&mut self, kind: Event) -> u64 {
        self.emit_at(self.now, kind)
    }

    pub fn emit_at(&mut self, tick: u64, kind: Event) -> u64 {
        let id = self.alloc_id();
        // Late events land in the current bucket rather than a stale one
        let tick = tick.max(self.now);
        let env = EventEnvelope { id, tick, kind };
        self.by_tick.entry(tick).or_default().push_back(env);
        id
    }

    pub fn emit_after(&mut self, delta: u64, kind: Event) -> u64 {
        self.emit_at(self.now.saturating_add(delta), kind)
    }

    pub fn pop_ready(&mut self) -> Option<EventEnvelope> {
        if let Some(q) = self.by_tick.get_mut(&self.now) {
            if let Some(env) = q.pop_front() {
                return Some(env);
            }
        }
        None
    }

    pub fn advance_tick(&mut self) {
        if let Some(q) = self.by_tick.get(&self.now) {
            if q.is_empty() {
                self.by_tick.remove(&self.now);
            }
        }
        self.now = self.now.wrapping_add(1);
    }
}
