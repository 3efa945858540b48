// src/anim/listeners.rs

//! Observer registry for lifecycle notifications.

use std::fmt;

use super::Lifecycle;

/// Receives lifecycle notifications from an animatable.
///
/// Any `FnMut(&str, Lifecycle) + Send` closure is a listener.
pub trait AnimationListener: Send {
    /// `source` is the [`name`](super::Animatable::name) of the emitter.
    fn on_event(&mut self, source: &str, event: Lifecycle);
}

impl<F> AnimationListener for F
where
    F: FnMut(&str, Lifecycle) + Send,
{
    fn on_event(&mut self, source: &str, event: Lifecycle) {
        self(source, event)
    }
}

/// Handle returned by `add_listener`, used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered set of listeners owned by one animatable.
#[derive(Default)]
pub struct ListenerSet {
    next_id: u64,
    entries: Vec<(ListenerId, Box<dyn AnimationListener>)>,
}

impl ListenerSet {
    pub fn add(&mut self, listener: Box<dyn AnimationListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record `event` in the owner's sink, then tell every listener in
    /// registration order.
    pub fn emit(&mut self, source: &str, event: Lifecycle, events: &mut Vec<Lifecycle>) {
        events.push(event);
        for (_, listener) in self.entries.iter_mut() {
            listener.on_event(source, event);
        }
    }
}

/// Listeners are bound to one owner; a copy starts with none.
impl Clone for ListenerSet {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.entries.len())
            .finish()
    }
}
