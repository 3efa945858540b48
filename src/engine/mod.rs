// src/engine/mod.rs

//! Playback engine.
//!
//! The pure core state machine lives in [`core`]; the async shell that feeds
//! it frame ticks and host events is implemented in [`runtime`].

use std::time::Duration;

use crate::anim::Lifecycle;

/// Events flowing into the playback core from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// One frame of the host clock has elapsed.
    Frame(Duration),
    /// The host surface became visible (`true`) or hidden (`false`).
    /// Frames are dropped while hidden.
    HostVisibility(bool),
    /// Stop the set early (children emit `Canceled`).
    CancelRequested,
    /// Jump every child to its end state.
    EndRequested,
    /// Stop driving the set without touching it (e.g. process exit).
    ShutdownRequested,
}

/// Result of feeding one [`PlaybackEvent`] into the core.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackStep {
    /// Set-level lifecycle events emitted while handling the event.
    pub emitted: Vec<Lifecycle>,
    /// Whether the outer loop should keep driving the set.
    pub keep_running: bool,
}

pub mod core;
pub mod runtime;

pub use core::PlaybackCore;
pub use runtime::Runtime;
