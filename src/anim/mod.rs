// src/anim/mod.rs

//! The schedulable unit of work and its concrete implementations.
//!
//! - [`Animatable`] is the capability set every unit exposes; the
//!   [`Scheduler`](crate::dag::Scheduler) implements it too, so sets nest.
//! - [`listeners`] holds the observer registry shared by all implementations.
//! - [`capability`] defines the optional target / interpolator capabilities.
//! - [`timed`] is a clock-driven animation; [`pause`] is a plain timer.

pub mod capability;
pub mod listeners;
pub mod pause;
pub mod timed;

use std::fmt;
use std::time::Duration;

use crate::errors::Result;

pub use capability::{Interpolated, Interpolator, Target, Targetable};
pub use listeners::{AnimationListener, ListenerId, ListenerSet};
pub use pause::Pause;
pub use timed::TimedAnimation;

/// Lifecycle notification emitted by an [`Animatable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Started,
    Ended,
    Canceled,
    Repeated,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Lifecycle::Started => "started",
            Lifecycle::Ended => "ended",
            Lifecycle::Canceled => "canceled",
            Lifecycle::Repeated => "repeated",
        };
        f.write_str(s)
    }
}

/// Opaque schedulable task.
///
/// Every lifecycle method takes an event sink. An implementation pushes each
/// event it emits into the sink, in order, and notifies its own listeners.
/// Whoever owns the animatable reads the sink right after the call returns;
/// that is how a [`Scheduler`](crate::dag::Scheduler) observes its children.
///
/// Canceling must emit `Canceled` only. `Ended` is reserved for a unit that
/// reached its end state, so AFTER dependents of a canceled unit never start.
pub trait Animatable: fmt::Debug + Send {
    /// Label used in logs and error messages.
    fn name(&self) -> &str;

    fn start(&mut self, events: &mut Vec<Lifecycle>) -> Result<()>;

    /// Stop early. No-op if not started.
    fn cancel(&mut self, events: &mut Vec<Lifecycle>);

    /// Jump to the end state.
    fn end(&mut self, events: &mut Vec<Lifecycle>) -> Result<()>;

    /// Advance by one frame of the host clock.
    fn tick(&mut self, delta: Duration, events: &mut Vec<Lifecycle>) -> Result<()>;

    fn is_running(&self) -> bool;

    fn is_started(&self) -> bool;

    fn duration(&self) -> Option<Duration>;

    fn set_duration(&mut self, duration: Duration);

    fn start_delay(&self) -> Duration;

    fn set_start_delay(&mut self, delay: Duration);

    fn add_listener(&mut self, listener: Box<dyn AnimationListener>) -> ListenerId;

    /// Returns `false` if no listener with that id was registered.
    fn remove_listener(&mut self, id: ListenerId) -> bool;

    /// Independent copy in its initial state, without listeners.
    fn clone_box(&self) -> Box<dyn Animatable>;

    fn as_targetable(&mut self) -> Option<&mut dyn Targetable> {
        None
    }

    fn as_interpolated(&mut self) -> Option<&mut dyn Interpolated> {
        None
    }
}

impl Clone for Box<dyn Animatable> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
