//! Scriptable [`Animatable`] fake that records what the scheduler does to it.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use animdag::anim::{
    Animatable, AnimationListener, Interpolated, Interpolator, Lifecycle, ListenerId,
    ListenerSet, Target, Targetable,
};
use animdag::errors::Result;

/// Shared, ordered record of probe activity, e.g. `"start:fade"`.
#[derive(Debug, Clone, Default)]
pub struct ProbeLog(Arc<Mutex<Vec<String>>>);

impl ProbeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Entries starting with `prefix`, e.g. `"start:"`.
    pub fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.starts_with(prefix))
            .collect()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == entry)
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.position(entry).is_some()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeCommand {
    Finish,
    Cancel,
    Repeat,
}

type CommandQueue = Arc<Mutex<VecDeque<ProbeCommand>>>;

/// Remote control for a probe that has been moved into a scheduler.
/// Queued commands take effect on the probe's next tick.
#[derive(Debug, Clone)]
pub struct ProbeHandle {
    commands: CommandQueue,
}

impl ProbeHandle {
    pub fn finish(&self) {
        self.push(ProbeCommand::Finish);
    }

    pub fn cancel(&self) {
        self.push(ProbeCommand::Cancel);
    }

    pub fn repeat(&self) {
        self.push(ProbeCommand::Repeat);
    }

    fn push(&self, command: ProbeCommand) {
        self.commands.lock().unwrap().push_back(command);
    }
}

/// Animation that only moves when told to.
///
/// Log entries are `"<action>:<label>"`, where the label is the name for the
/// original and `"<name>@<generation>"` for clones.
pub struct ProbeAnimation {
    name: String,
    generation: u32,
    log: ProbeLog,
    commands: CommandQueue,
    duration: Option<Duration>,
    start_delay: Duration,
    started: bool,
    running: bool,
    target: Option<Target>,
    listeners: ListenerSet,
}

impl fmt::Debug for ProbeAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeAnimation")
            .field("label", &self.label())
            .field("started", &self.started)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

impl ProbeAnimation {
    pub fn new(name: &str, log: &ProbeLog) -> Self {
        Self {
            name: name.to_string(),
            generation: 0,
            log: log.clone(),
            commands: Arc::default(),
            duration: None,
            start_delay: Duration::ZERO,
            started: false,
            running: false,
            target: None,
            listeners: ListenerSet::default(),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn handle(&self) -> ProbeHandle {
        ProbeHandle {
            commands: Arc::clone(&self.commands),
        }
    }

    fn label(&self) -> String {
        if self.generation == 0 {
            self.name.clone()
        } else {
            format!("{}@{}", self.name, self.generation)
        }
    }

    fn record(&self, action: &str) {
        self.log.push(format!("{action}:{}", self.label()));
    }

    fn emit(&mut self, event: Lifecycle, events: &mut Vec<Lifecycle>) {
        let label = self.label();
        self.listeners.emit(&label, event, events);
    }

    fn finish(&mut self, events: &mut Vec<Lifecycle>) {
        self.record("end");
        self.started = false;
        self.running = false;
        self.emit(Lifecycle::Ended, events);
    }
}

impl Animatable for ProbeAnimation {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self, events: &mut Vec<Lifecycle>) -> Result<()> {
        self.record("start");
        self.started = true;
        self.running = true;
        self.emit(Lifecycle::Started, events);
        Ok(())
    }

    fn cancel(&mut self, events: &mut Vec<Lifecycle>) {
        if !self.started {
            return;
        }
        self.record("cancel");
        self.started = false;
        self.running = false;
        self.emit(Lifecycle::Canceled, events);
    }

    fn end(&mut self, events: &mut Vec<Lifecycle>) -> Result<()> {
        if !self.running {
            self.emit(Lifecycle::Started, events);
        }
        self.finish(events);
        Ok(())
    }

    fn tick(&mut self, _delta: Duration, events: &mut Vec<Lifecycle>) -> Result<()> {
        let pending: Vec<ProbeCommand> = self.commands.lock().unwrap().drain(..).collect();
        for command in pending {
            if !self.running {
                break;
            }
            match command {
                ProbeCommand::Finish => self.finish(events),
                ProbeCommand::Cancel => self.cancel(events),
                ProbeCommand::Repeat => {
                    self.record("repeat");
                    self.emit(Lifecycle::Repeated, events);
                }
            }
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn is_started(&self) -> bool {
        self.started
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn set_duration(&mut self, duration: Duration) {
        self.record(&format!("duration={}ms", duration.as_millis()));
        self.duration = Some(duration);
    }

    fn start_delay(&self) -> Duration {
        self.start_delay
    }

    fn set_start_delay(&mut self, delay: Duration) {
        self.start_delay = delay;
    }

    fn add_listener(&mut self, listener: Box<dyn AnimationListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn clone_box(&self) -> Box<dyn Animatable> {
        Box::new(ProbeAnimation {
            name: self.name.clone(),
            generation: self.generation + 1,
            log: self.log.clone(),
            commands: Arc::default(),
            duration: self.duration,
            start_delay: self.start_delay,
            started: false,
            running: false,
            target: self.target.clone(),
            listeners: ListenerSet::default(),
        })
    }

    fn as_targetable(&mut self) -> Option<&mut dyn Targetable> {
        Some(self)
    }

    fn as_interpolated(&mut self) -> Option<&mut dyn Interpolated> {
        Some(self)
    }
}

impl Targetable for ProbeAnimation {
    fn set_target(&mut self, target: &Target) {
        self.record(&format!("target={target}"));
        self.target = Some(target.clone());
    }
}

impl Interpolated for ProbeAnimation {
    fn set_interpolator(&mut self, _interpolator: &Interpolator) {
        self.record("interpolator");
    }
}
