// src/anim/timed.rs

//! Clock-driven animation.
//!
//! A `TimedAnimation` never computes property values itself; it only tracks
//! where it is on its timeline and emits lifecycle events as it crosses the
//! start, repeat and end boundaries.

use std::time::Duration;

use tracing::trace;

use crate::errors::Result;
use crate::types::RepeatCount;

use super::{
    Animatable, AnimationListener, Interpolated, Interpolator, Lifecycle, ListenerId,
    ListenerSet, Target, Targetable,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Started, waiting out its own start delay.
    Delayed { remaining: Duration },
    Running { elapsed: Duration, iteration: u32 },
}

#[derive(Debug, Clone)]
pub struct TimedAnimation {
    name: String,
    duration: Duration,
    start_delay: Duration,
    repeat: RepeatCount,
    target: Option<Target>,
    interpolator: Option<Interpolator>,
    phase: Phase,
    started: bool,
    listeners: ListenerSet,
}

impl TimedAnimation {
    pub fn new(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            duration,
            start_delay: Duration::ZERO,
            repeat: RepeatCount::default(),
            target: None,
            interpolator: None,
            phase: Phase::Idle,
            started: false,
            listeners: ListenerSet::default(),
        }
    }

    pub fn with_repeat(mut self, repeat: RepeatCount) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    pub fn repeat(&self) -> RepeatCount {
        self.repeat
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn interpolator(&self) -> Option<&Interpolator> {
        self.interpolator.as_ref()
    }

    /// Progress through the current iteration, passed through the
    /// interpolator when one is set. `0.0` when not running.
    pub fn fraction(&self) -> f32 {
        let raw = match self.phase {
            Phase::Running { elapsed, .. } if !self.duration.is_zero() => {
                (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
            }
            _ => 0.0,
        };
        match &self.interpolator {
            Some(interpolator) => interpolator.apply(raw),
            None => raw,
        }
    }

    fn emit(&mut self, event: Lifecycle, events: &mut Vec<Lifecycle>) {
        trace!(animation = %self.name, %event, "timed animation event");
        self.listeners.emit(&self.name, event, events);
    }

    fn finish(&mut self, events: &mut Vec<Lifecycle>) {
        self.phase = Phase::Idle;
        self.started = false;
        self.emit(Lifecycle::Ended, events);
    }

    /// Move the running clock forward, emitting `Repeated` for every
    /// iteration boundary crossed and `Ended` at the last one.
    fn advance(&mut self, delta: Duration, events: &mut Vec<Lifecycle>) {
        let Phase::Running {
            mut elapsed,
            mut iteration,
        } = self.phase
        else {
            return;
        };

        elapsed += delta;
        while elapsed >= self.duration {
            if self.duration.is_zero() || !self.repeat.allows_another(iteration) {
                self.finish(events);
                return;
            }
            elapsed -= self.duration;
            iteration += 1;
            self.emit(Lifecycle::Repeated, events);
        }

        self.phase = Phase::Running { elapsed, iteration };
    }
}

impl Animatable for TimedAnimation {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self, events: &mut Vec<Lifecycle>) -> Result<()> {
        self.started = true;
        if self.start_delay.is_zero() {
            self.phase = Phase::Running {
                elapsed: Duration::ZERO,
                iteration: 0,
            };
            self.emit(Lifecycle::Started, events);
        } else {
            self.phase = Phase::Delayed {
                remaining: self.start_delay,
            };
        }
        Ok(())
    }

    fn cancel(&mut self, events: &mut Vec<Lifecycle>) {
        if !self.started {
            return;
        }
        self.phase = Phase::Idle;
        self.started = false;
        self.emit(Lifecycle::Canceled, events);
    }

    fn end(&mut self, events: &mut Vec<Lifecycle>) -> Result<()> {
        if !matches!(self.phase, Phase::Running { .. }) {
            // Never announced: pass through the start boundary first.
            self.emit(Lifecycle::Started, events);
        }
        self.finish(events);
        Ok(())
    }

    fn tick(&mut self, delta: Duration, events: &mut Vec<Lifecycle>) -> Result<()> {
        match self.phase {
            Phase::Idle => {}
            Phase::Delayed { remaining } if delta < remaining => {
                self.phase = Phase::Delayed {
                    remaining: remaining - delta,
                };
            }
            Phase::Delayed { remaining } => {
                self.phase = Phase::Running {
                    elapsed: Duration::ZERO,
                    iteration: 0,
                };
                self.emit(Lifecycle::Started, events);
                self.advance(delta - remaining, events);
            }
            Phase::Running { .. } => self.advance(delta, events),
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    fn is_started(&self) -> bool {
        self.started
    }

    fn duration(&self) -> Option<Duration> {
        Some(self.duration)
    }

    fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
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
        let mut copy = self.clone();
        copy.phase = Phase::Idle;
        copy.started = false;
        Box::new(copy)
    }

    fn as_targetable(&mut self) -> Option<&mut dyn Targetable> {
        Some(self)
    }

    fn as_interpolated(&mut self) -> Option<&mut dyn Interpolated> {
        Some(self)
    }
}

impl Targetable for TimedAnimation {
    fn set_target(&mut self, target: &Target) {
        self.target = Some(target.clone());
    }
}

impl Interpolated for TimedAnimation {
    fn set_interpolator(&mut self, interpolator: &Interpolator) {
        self.interpolator = Some(interpolator.clone());
    }
}
