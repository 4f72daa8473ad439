use std::path::PathBuf;
use std::sync::mpsc::{Receiver, channel};

use flaneur_engine::{Engine, EngineConfig, InputState, MouseButton};
use flaneur_world::{WorldIndex, load_snapshot};

use crate::event::{Button, Event, EventQueue, Key};
use crate::script::Script;

pub struct AppOptions {
    pub world_path: PathBuf,
    pub engine: EngineConfig,
    pub tick_hz: f32,
    pub aspect: f32,
    /// Report the pose every this many ticks; 0 disables the cadence.
    pub report_every: u64,
    pub watch_world: bool,
}

/// The host shell: owns the engine, its input state, the world index, and
/// the event queue that feeds them. One `step` is one simulation tick.
pub struct App {
    pub engine: Engine,
    pub input: InputState,
    pub index: WorldIndex,
    pub queue: EventQueue,
    cfg: EngineConfig,
    spawn: (f32, f32),
    world_path: PathBuf,
    watcher_rx: Option<Receiver<()>>,
    report_every: u64,
    aspect: f32,
    dt: f32,
}

impl App {
    pub fn new(opts: AppOptions, index: WorldIndex, spawn: (f32, f32), script: Script) -> Self {
        let engine = Engine::new(opts.engine, &index, spawn);
        let mut queue = EventQueue::new();
        let tick_hz = opts.tick_hz.max(1.0);
        for timed in &script.events {
            let tick = (timed.at.max(0.0) * tick_hz).round() as u64;
            queue.emit_at(tick, timed.event);
        }
        if opts.report_every > 0 {
            queue.emit_at(opts.report_every, Event::Report);
        }
        let watcher_rx = if opts.watch_world {
            Some(spawn_world_watcher(opts.world_path.clone()))
        } else {
            None
        };
        Self {
            engine,
            input: InputState::new(),
            index,
            queue,
            cfg: opts.engine,
            spawn,
            world_path: opts.world_path,
            watcher_rx,
            report_every: opts.report_every,
            aspect: opts.aspect,
            dt: 1.0 / tick_hz,
        }
    }

    /// One simulation tick: drain the watcher, apply this tick's events,
    /// advance the engine.
    pub fn step(&mut self) {
        if let Some(rx) = &self.watcher_rx {
            if rx.try_iter().next().is_some() {
                self.queue.emit_now(Event::ReloadWorld);
            }
        }
        while let Some(env) = self.queue.pop_ready() {
            log_event(env.tick, &env.kind);
            self.apply(env.kind);
        }
        self.engine.step(&mut self.input, &self.index, self.dt);
        self.queue.advance_tick();
    }

    fn apply(&mut self, ev: Event) {
        match ev {
            Event::KeyDown { key } => self.set_key(key, true),
            Event::KeyUp { key } => self.set_key(key, false),
            Event::MouseDown { button } => self.input.mouse_button_down(map_button(button)),
            Event::MouseUp { button } => self.input.mouse_button_up(map_button(button)),
            Event::MouseMove { dx, dy } => self.input.mouse_moved(dx, dy),
            Event::Teleport { x, z } => self.engine.teleport(x, z, &self.index),
            Event::Pick { ndc } => {
                match self
                    .engine
                    .pick(&self.input, (ndc[0], ndc[1]), self.aspect, &self.index)
                {
                    Some(coord) => {
                        log::info!(target: "sim", "picked cell {}", coord)
                    }
                    None => log::info!(target: "sim", "picked nothing"),
                }
            }
            Event::Report => {
                self.report();
                if self.report_every > 0 {
                    self.queue.emit_after(self.report_every, Event::Report);
                }
            }
            Event::ReloadWorld => self.reload_world(),
        }
    }

    fn set_key(&mut self, key: Key, down: bool) {
        match key {
            Key::Forward => self.input.move_forward = down,
            Key::Backward => self.input.move_backward = down,
            Key::RotateLeft => self.input.rotate_left = down,
            Key::RotateRight => self.input.rotate_right = down,
            Key::Up => self.input.move_up = down,
            Key::Down => self.input.move_down = down,
            Key::Jump => {
                if down {
                    self.input.request_jump();
                }
            }
        }
    }

    pub fn report(&self) {
        let pose = self.engine.pose();
        let motion = self.engine.motion();
        log::info!(
            target: "sim",
            "pose ({:.2}, {:.2}, {:.2}) yaw={:.1} pitch={:.1} moving={} on_road={}",
            pose.position.x,
            pose.position.y,
            pose.position.z,
            pose.yaw.to_degrees(),
            pose.pitch.to_degrees(),
            motion.is_moving,
            motion.is_on_road
        );
    }

    /// Swap in a fresh snapshot: rebuild the index wholesale and re-seed the
    /// player at the spawn point. A failed read keeps the previous world.
    fn reload_world(&mut self) {
        match load_snapshot(&self.world_path) {
            Ok(snapshot) => {
                self.spawn = (snapshot.spawn[0], snapshot.spawn[1]);
                self.index = WorldIndex::build(&snapshot);
                self.engine = Engine::new(self.cfg, &self.index, self.spawn);
                self.input = InputState::new();
                log::info!(
                    target: "sim",
                    "reloaded world from {} ({} roads, {} buildings)",
                    self.world_path.display(),
                    self.index.road_count(),
                    self.index.volumes().len()
                );
            }
            Err(e) => log::warn!("world reload failed: {}", e),
        }
    }
}

fn map_button(button: Button) -> MouseButton {
    match button {
        Button::Left => MouseButton::Left,
        Button::Middle => MouseButton::Middle,
    }
}

fn log_event(tick: u64, ev: &Event) {
    use Event as E;
    match ev {
        E::KeyDown { key } => {
            log::debug!(target: "events", "[tick {}] KeyDown {:?}", tick, key);
        }
        E::KeyUp { key } => {
            log::debug!(target: "events", "[tick {}] KeyUp {:?}", tick, key);
        }
        E::MouseDown { button } => {
            log::debug!(target: "events", "[tick {}] MouseDown {:?}", tick, button);
        }
        E::MouseUp { button } => {
            log::debug!(target: "events", "[tick {}] MouseUp {:?}", tick, button);
        }
        E::MouseMove { dx, dy } => {
            log::trace!(target: "events", "[tick {}] MouseMove d=({:.1}, {:.1})", tick, dx, dy);
        }
        E::Teleport { x, z } => {
            log::info!(target: "events", "[tick {}] Teleport to ({:.2}, {:.2})", tick, x, z);
        }
        E::Pick { ndc } => {
            log::info!(target: "events", "[tick {}] Pick ndc=({:.2}, {:.2})", tick, ndc[0], ndc[1]);
        }
        E::Report => {
            log::trace!(target: "events", "[tick {}] Report", tick);
        }
        E::ReloadWorld => {
            log::info!(target: "events", "[tick {}] ReloadWorld", tick);
        }
    }
}

/// Watch the world file from a helper thread; each change pulses the
/// returned channel, drained at the top of the frame.
fn spawn_world_watcher(path: PathBuf) -> Receiver<()> {
    let (tx, rx) = channel::<()>();
    std::thread::spawn(move || {
        use notify::{EventKind, RecursiveMode, Watcher};
        match notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                match event.kind {
                    EventKind::Modify(_)
                    | EventKind::Create(_)
                    | EventKind::Remove(_)
                    | EventKind::Any => {
                        let _ = tx.send(());
                    }
                    _ => {}
                }
            }
        }) {
            Ok(mut watcher) => {
                if let Err(e) = watcher.watch(path.as_path(), RecursiveMode::NonRecursive) {
                    log::warn!("world watcher failed to start: {}", e);
                    return;
                }
                loop {
                    std::thread::sleep(std::time::Duration::from_secs(3600));
                }
            }
            Err(e) => log::warn!("world watcher unavailable: {}", e),
        }
    });
    rx
}
