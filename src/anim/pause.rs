// src/anim/pause.rs

//! A plain timer: starts, waits, ends.
//!
//! Used as the placeholder behind a set's start delay and for
//! `Builder::after_delay` gaps. It exposes no target or interpolator, so
//! capability fan-out skips it.

use std::time::Duration;

use crate::errors::Result;

use super::{Animatable, AnimationListener, Lifecycle, ListenerId, TimedAnimation};

#[derive(Debug, Clone)]
pub struct Pause(TimedAnimation);

impl Pause {
    pub fn new(name: impl Into<String>, length: Duration) -> Self {
        Pause(TimedAnimation::new(name, length))
    }
}

impl Animatable for Pause {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn start(&mut self, events: &mut Vec<Lifecycle>) -> Result<()> {
        self.0.start(events)
    }

    fn cancel(&mut self, events: &mut Vec<Lifecycle>) {
        self.0.cancel(events)
    }

    fn end(&mut self, events: &mut Vec<Lifecycle>) -> Result<()> {
        self.0.end(events)
    }

    fn tick(&mut self, delta: Duration, events: &mut Vec<Lifecycle>) -> Result<()> {
        self.0.tick(delta, events)
    }

    fn is_running(&self) -> bool {
        self.0.is_running()
    }

    fn is_started(&self) -> bool {
        self.0.is_started()
    }

    fn duration(&self) -> Option<Duration> {
        self.0.duration()
    }

    fn set_duration(&mut self, duration: Duration) {
        self.0.set_duration(duration)
    }

    fn start_delay(&self) -> Duration {
        self.0.start_delay()
    }

    fn set_start_delay(&mut self, delay: Duration) {
        self.0.set_start_delay(delay)
    }

    fn add_listener(&mut self, listener: Box<dyn AnimationListener>) -> ListenerId {
        self.0.add_listener(listener)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.0.remove_listener(id)
    }

    fn clone_box(&self) -> Box<dyn Animatable> {
        let fresh = TimedAnimation::new(self.name(), self.0.duration().unwrap_or_default())
            .with_start_delay(self.0.start_delay());
        Box::new(Pause(fresh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_no_optional_capabilities() {
        let mut pause = Pause::new("gap", Duration::from_millis(10));

        assert!(pause.as_targetable().is_none());
        assert!(pause.as_interpolated().is_none());
    }

    #[test]
    fn canceled_pause_never_ends() {
        let mut pause = Pause::new("gap", Duration::from_millis(10));
        let mut events = Vec::new();

        pause.start(&mut events).unwrap();
        pause.cancel(&mut events);
        pause.tick(Duration::from_millis(50), &mut events).unwrap();

        assert_eq!(events, vec![Lifecycle::Started, Lifecycle::Canceled]);
    }
}
