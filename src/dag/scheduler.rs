// src/dag/scheduler.rs

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::anim::{
    Animatable, AnimationListener, Interpolated, Interpolator, Lifecycle, ListenerId,
    ListenerSet, Pause, Target, Targetable,
};
use crate::config::ConfigFile;
use crate::dag::builder::Builder;
use crate::dag::graph::DependencyGraph;
use crate::dag::node::{ChildInfo, DependencyEdge, NodeId};
use crate::dag::triggers::TriggerTable;
use crate::errors::{AnimdagError, Result};
use crate::types::Rule;

/// Start-delay window: a placeholder timer plus the roots it will release.
#[derive(Debug)]
struct DelayPhase {
    placeholder: Pause,
    roots: Vec<NodeId>,
}

/// Plays a set of animations in dependency order.
///
/// The scheduler owns its children. It is responsible for:
/// - building the dependency graph (`add_with`, `play`, `play_sequentially`, ...)
/// - sorting it (cycle-checked, cached between runs)
/// - starting roots, then starting each dependent once all its edges resolve
/// - forwarding cancel / end / frame ticks to the children
/// - turning child completions into one `Ended` for the whole set
///
/// A scheduler is itself [`Animatable`], so sets nest.
#[derive(Debug)]
pub struct Scheduler {
    name: String,
    graph: DependencyGraph,
    triggers: TriggerTable,
    /// Children started in this run that have not finished yet.
    playing: Vec<NodeId>,
    listeners: ListenerSet,
    started: bool,
    /// Set by `cancel` / `end`; suppresses triggers and aggregate completion.
    terminated: bool,
    duration: Option<Duration>,
    start_delay: Duration,
    delay: Option<DelayPhase>,
}

impl Scheduler {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph: DependencyGraph::default(),
            triggers: TriggerTable::default(),
            playing: Vec::new(),
            listeners: ListenerSet::default(),
            started: false,
            terminated: false,
            duration: None,
            start_delay: Duration::ZERO,
            delay: None,
        }
    }

    /// Take ownership of `animation` and return its handle.
    pub fn add(&mut self, animation: impl Animatable + 'static) -> NodeId {
        self.add_boxed(Box::new(animation))
    }

    pub fn add_boxed(&mut self, animation: Box<dyn Animatable>) -> NodeId {
        self.graph.add_node(animation)
    }

    /// Fluent edge declaration anchored at `id`.
    pub fn play(&mut self, id: NodeId) -> Result<Builder<'_>> {
        Builder::new(self, id)
    }

    pub(crate) fn add_edge(&mut self, dependent: NodeId, target: NodeId, rule: Rule) -> Result<()> {
        self.graph.add_edge(dependent, DependencyEdge { target, rule })
    }

    /// `a` starts when `b` starts.
    pub fn add_with(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        self.add_edge(a, b, Rule::With)
    }

    /// `a` starts when `b` ends.
    pub fn add_after(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        self.add_edge(a, b, Rule::After)
    }

    /// `b` starts when `a` ends.
    pub fn add_before(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        self.add_edge(b, a, Rule::After)
    }

    /// Every item starts together with the first one.
    pub fn play_together(&mut self, items: &[NodeId]) -> Result<()> {
        let Some((first, rest)) = items.split_first() else {
            return Ok(());
        };
        let mut builder = self.play(*first)?;
        for id in rest {
            builder = builder.with(*id)?;
        }
        Ok(())
    }

    /// Each item starts when the previous one ends.
    pub fn play_sequentially(&mut self, items: &[NodeId]) -> Result<()> {
        for pair in items.windows(2) {
            self.play(pair[0])?.before(pair[1])?;
        }
        if let [only] = items {
            self.play(*only)?;
        }
        Ok(())
    }

    /// Signed-millisecond variant of [`Animatable::set_duration`] for hosts
    /// that carry durations as integers. Negative values are rejected before
    /// any child is touched.
    pub fn set_duration_millis(&mut self, millis: i64) -> Result<()> {
        let millis = u64::try_from(millis).map_err(|_| {
            AnimdagError::InvalidArgument(format!(
                "duration must be a value of zero or greater (got {millis}ms)"
            ))
        })?;
        self.set_duration(Duration::from_millis(millis));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Snapshot of every child, in insertion order.
    pub fn children(&self) -> Vec<ChildInfo> {
        self.graph
            .ids()
            .map(|id| ChildInfo::from_node(id, self.graph.node(id)))
            .collect()
    }

    pub fn child(&self, id: NodeId) -> Option<&dyn Animatable> {
        if self.graph.contains(id) {
            Some(self.graph.node(id).animation.as_ref())
        } else {
            None
        }
    }

    /// Sorted play order (cached until the graph changes).
    pub fn sorted_order(&mut self) -> Result<Vec<NodeId>> {
        self.graph.sort()
    }

    /// Whether the start-delay placeholder is still pending.
    pub fn in_start_delay(&self) -> bool {
        self.delay.is_some()
    }

    fn emit(&mut self, event: Lifecycle, events: &mut Vec<Lifecycle>) {
        debug!(set = %self.name, %event, "animation set event");
        self.listeners.emit(&self.name, event, events);
    }

    fn start_node(&mut self, id: NodeId, events: &mut Vec<Lifecycle>) -> Result<()> {
        let mut emitted = Vec::new();
        let node = self.graph.node_mut(id);
        debug!(set = %self.name, animation = %node.name(), "starting child");
        let result = node.animation.start(&mut emitted);
        self.playing.push(id);
        // Whatever the child announced before failing still has to be routed.
        self.dispatch(id, emitted, events)?;
        result
    }

    fn dispatch(&mut self, id: NodeId, emitted: Vec<Lifecycle>, events: &mut Vec<Lifecycle>) -> Result<()> {
        for event in emitted {
            match event {
                Lifecycle::Started => self.fire_triggers(id, Rule::With, events)?,
                Lifecycle::Ended => {
                    self.on_child_finished(id, false, events);
                    self.fire_triggers(id, Rule::After, events)?;
                }
                // Cancel is not a dependency signal: AFTER dependents of a
                // canceled child stay unstarted.
                Lifecycle::Canceled => self.on_child_finished(id, true, events),
                Lifecycle::Repeated => {}
            }
        }
        Ok(())
    }

    fn fire_triggers(&mut self, dependency: NodeId, rule: Rule, events: &mut Vec<Lifecycle>) -> Result<()> {
        if self.terminated {
            return Ok(());
        }

        for listener in self.triggers.take_matching(dependency, rule) {
            let node = self.graph.node_mut(listener.owner);
            if node.satisfy(&listener.edge()) {
                debug!(
                    set = %self.name,
                    animation = %node.name(),
                    "dependencies satisfied; starting"
                );
                self.start_node(listener.owner, events)?;
            }
        }
        Ok(())
    }

    /// Completion listener: runs once per child per run.
    fn on_child_finished(&mut self, id: NodeId, canceled: bool, events: &mut Vec<Lifecycle>) {
        let node = self.graph.node_mut(id);
        if !node.tracked {
            return;
        }
        node.tracked = false;
        node.done = true;
        self.playing.retain(|p| *p != id);

        if self.terminated {
            // cancel() / end() notify the set's listeners themselves.
            return;
        }

        if canceled && self.playing.is_empty() {
            self.emit(Lifecycle::Canceled, events);
        }

        if self.graph.all_done() {
            info!(set = %self.name, "all children done; animation set ended");
            self.started = false;
            self.emit(Lifecycle::Ended, events);
        }
    }

    fn release_roots(&mut self, roots: Vec<NodeId>, events: &mut Vec<Lifecycle>) -> Result<()> {
        if self.terminated {
            return Ok(());
        }
        if self.graph.is_empty() {
            self.started = false;
            self.emit(Lifecycle::Ended, events);
            return Ok(());
        }
        for id in roots {
            self.start_node(id, events)?;
        }
        Ok(())
    }
}

impl Scheduler {
    /// Build a set from a validated choreography.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        Self::from_config_with(cfg, |_| {})
    }

    /// Like [`Scheduler::from_config`], but hands every animation to
    /// `decorate` before it is added (e.g. to attach listeners).
    pub fn from_config_with<F>(cfg: &ConfigFile, mut decorate: F) -> Result<Self>
    where
        F: FnMut(&mut dyn Animatable),
    {
        let mut set = Scheduler::new(cfg.timeline.name.clone());
        let mut ids: HashMap<&str, NodeId> = HashMap::new();

        for (name, spec) in cfg.animations.iter() {
            let mut animation = spec.build(name);
            decorate(animation.as_mut());
            ids.insert(name.as_str(), set.add_boxed(animation));
        }

        let lookup = |name: &str| {
            ids.get(name).copied().ok_or_else(|| {
                AnimdagError::ConfigError(format!("unknown animation '{}'", name))
            })
        };

        for (name, spec) in cfg.animations.iter() {
            let dependent = lookup(name)?;
            for dep in &spec.after {
                set.add_after(dependent, lookup(dep)?)?;
            }
            for dep in &spec.with {
                set.add_with(dependent, lookup(dep)?)?;
            }
        }

        if let Some(duration) = cfg.timeline.duration {
            set.set_duration(duration);
        }
        set.set_start_delay(cfg.timeline.start_delay);

        debug!(
            set = %set.name,
            nodes = set.len(),
            "built animation set from config"
        );
        Ok(set)
    }
}

/// Copies the graph, not the run: fresh nodes wrapping cloned animations,
/// edges remapped, no listeners, not started.
impl Clone for Scheduler {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            graph: self.graph.deep_clone(),
            triggers: TriggerTable::default(),
            playing: Vec::new(),
            listeners: ListenerSet::default(),
            started: false,
            terminated: false,
            duration: self.duration,
            start_delay: self.start_delay,
            delay: None,
        }
    }
}

impl Animatable for Scheduler {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self, events: &mut Vec<Lifecycle>) -> Result<()> {
        if self.started && !self.terminated && (self.delay.is_some() || !self.playing.is_empty()) {
            warn!(set = %self.name, "start() while a run is in flight; rejecting");
            return Err(AnimdagError::AlreadyRunning(self.name.clone()));
        }

        // Sort before touching any run state so a cycle leaves the set idle.
        let order = self.graph.sort()?;

        self.terminated = false;
        self.started = true;
        self.triggers.clear();
        self.playing.clear();
        self.delay = None;

        let mut roots = Vec::new();
        for id in &order {
            let node = self.graph.node_mut(*id);
            node.reset_for_run();
            if node.edges.is_empty() {
                roots.push(*id);
            } else {
                for edge in &node.edges {
                    self.triggers.install(*id, edge);
                }
            }
        }

        info!(
            set = %self.name,
            nodes = order.len(),
            roots = roots.len(),
            triggers = self.triggers.len(),
            start_delay_ms = u64::try_from(self.start_delay.as_millis()).unwrap_or(u64::MAX),
            "starting animation set"
        );

        self.emit(Lifecycle::Started, events);

        if !self.start_delay.is_zero() {
            let mut placeholder = Pause::new(format!("{}:start-delay", self.name), self.start_delay);
            placeholder.start(&mut Vec::new())?;
            self.delay = Some(DelayPhase { placeholder, roots });
            return Ok(());
        }

        if order.is_empty() {
            // Nothing will ever finish, so finish now.
            self.started = false;
            self.emit(Lifecycle::Ended, events);
            return Ok(());
        }

        for id in roots {
            self.start_node(id, events)?;
        }
        Ok(())
    }

    fn cancel(&mut self, events: &mut Vec<Lifecycle>) {
        self.terminated = true;
        if !self.started {
            return;
        }

        info!(set = %self.name, "canceling animation set");
        self.emit(Lifecycle::Canceled, events);

        if let Some(mut phase) = self.delay.take() {
            phase.placeholder.cancel(&mut Vec::new());
        } else {
            for id in self.graph.order_or_insertion() {
                let mut emitted = Vec::new();
                self.graph.node_mut(id).animation.cancel(&mut emitted);
                if let Err(err) = self.dispatch(id, emitted, events) {
                    warn!(set = %self.name, %err, "error while routing child cancel");
                }
            }
        }

        self.started = false;
        self.emit(Lifecycle::Ended, events);
    }

    fn end(&mut self, events: &mut Vec<Lifecycle>) -> Result<()> {
        let order = self.graph.sort()?;
        self.terminated = true;

        if !self.started {
            // No run in flight: attach completion tracking to whatever has
            // not finished yet, so a repeated end() finds nothing to do.
            for node in self.graph.nodes_mut() {
                node.tracked = !node.done;
            }
        }

        info!(set = %self.name, nodes = order.len(), "ending animation set");

        let mut forced = false;
        if let Some(mut phase) = self.delay.take() {
            // Terminated: the placeholder's end no longer releases roots.
            phase.placeholder.end(&mut Vec::new())?;
            forced = true;
        }

        for id in order {
            let node = self.graph.node_mut(id);
            if node.done {
                continue;
            }
            forced = true;
            let mut emitted = Vec::new();
            let result = node.animation.end(&mut emitted);
            self.dispatch(id, emitted, events)?;
            result?;
        }

        if self.started || forced {
            self.started = false;
            self.emit(Lifecycle::Ended, events);
        }
        Ok(())
    }

    fn tick(&mut self, delta: Duration, events: &mut Vec<Lifecycle>) -> Result<()> {
        if let Some(phase) = self.delay.as_mut() {
            let mut emitted = Vec::new();
            phase.placeholder.tick(delta, &mut emitted)?;
            if emitted.contains(&Lifecycle::Ended) {
                if let Some(phase) = self.delay.take() {
                    debug!(set = %self.name, "start delay elapsed; releasing roots");
                    self.release_roots(phase.roots, events)?;
                }
            }
            return Ok(());
        }

        // Children started during this frame get their first tick next frame.
        for id in self.playing.clone() {
            if !self.playing.contains(&id) {
                continue;
            }
            let mut emitted = Vec::new();
            let result = self.graph.node_mut(id).animation.tick(delta, &mut emitted);
            self.dispatch(id, emitted, events)?;
            result?;
        }
        Ok(())
    }

    /// True while any child is running. The start-delay window does not count.
    fn is_running(&self) -> bool {
        self.graph
            .ids()
            .any(|id| self.graph.node(id).animation.is_running())
    }

    fn is_started(&self) -> bool {
        self.started
    }

    /// `None` until a duration is set on the set itself.
    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn set_duration(&mut self, duration: Duration) {
        for node in self.graph.nodes_mut() {
            node.animation.set_duration(duration);
        }
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
        Box::new(self.clone())
    }

    fn as_targetable(&mut self) -> Option<&mut dyn Targetable> {
        Some(self)
    }

    fn as_interpolated(&mut self) -> Option<&mut dyn Interpolated> {
        Some(self)
    }
}

impl Targetable for Scheduler {
    fn set_target(&mut self, target: &Target) {
        for node in self.graph.nodes_mut() {
            if let Some(child) = node.animation.as_targetable() {
                child.set_target(target);
            }
        }
    }
}

impl Interpolated for Scheduler {
    fn set_interpolator(&mut self, interpolator: &Interpolator) {
        for node in self.graph.nodes_mut() {
            if let Some(child) = node.animation.as_interpolated() {
                child.set_interpolator(interpolator);
            }
        }
    }
}
