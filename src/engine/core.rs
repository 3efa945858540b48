// src/engine/core.rs

//! Pure playback state machine.
//!
//! [`PlaybackCore`] consumes [`PlaybackEvent`]s and drives a [`Scheduler`]
//! synchronously. It has no channels, no Tokio types and no clock of its
//! own, so it can be unit tested frame by frame.

use tracing::{debug, trace};

use crate::anim::{Animatable, Lifecycle};
use crate::dag::Scheduler;
use crate::errors::Result;

use super::{PlaybackEvent, PlaybackStep};

#[derive(Debug)]
pub struct PlaybackCore {
    scheduler: Scheduler,
    visible: bool,
    frames: u64,
}

impl PlaybackCore {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler,
            visible: true,
            frames: 0,
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn into_scheduler(self) -> Scheduler {
        self.scheduler
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Frames actually delivered to the scheduler.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Start the set.
    pub fn begin(&mut self) -> Result<PlaybackStep> {
        let mut emitted = Vec::new();
        self.scheduler.start(&mut emitted)?;
        Ok(self.finish_step(emitted))
    }

    /// Handle a single event.
    pub fn step(&mut self, event: PlaybackEvent) -> Result<PlaybackStep> {
        let mut emitted = Vec::new();

        match event {
            PlaybackEvent::Frame(delta) => {
                if !self.visible {
                    trace!(
                        delta_ms = u64::try_from(delta.as_millis()).unwrap_or(u64::MAX),
                        "host hidden; dropping frame"
                    );
                } else {
                    self.frames += 1;
                    self.scheduler.tick(delta, &mut emitted)?;
                }
            }
            PlaybackEvent::HostVisibility(visible) => {
                debug!(visible, "host visibility changed");
                self.visible = visible;
            }
            PlaybackEvent::CancelRequested => self.scheduler.cancel(&mut emitted),
            PlaybackEvent::EndRequested => self.scheduler.end(&mut emitted)?,
            PlaybackEvent::ShutdownRequested => {
                return Ok(PlaybackStep {
                    emitted,
                    keep_running: false,
                });
            }
        }

        Ok(self.finish_step(emitted))
    }

    fn finish_step(&self, emitted: Vec<Lifecycle>) -> PlaybackStep {
        PlaybackStep {
            emitted,
            keep_running: self.scheduler.is_started(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::anim::TimedAnimation;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn two_step_core() -> PlaybackCore {
        let mut set = Scheduler::new("core");
        let a = set.add(TimedAnimation::new("a", ms(20)));
        let b = set.add(TimedAnimation::new("b", ms(20)));
        set.play_sequentially(&[a, b]).unwrap();
        PlaybackCore::new(set)
    }

    #[test]
    fn frames_drive_the_set_to_completion() {
        let mut core = two_step_core();
        let step = core.begin().unwrap();
        assert_eq!(step.emitted, vec![Lifecycle::Started]);
        assert!(step.keep_running);

        let step = core.step(PlaybackEvent::Frame(ms(20))).unwrap();
        assert!(step.keep_running);

        let step = core.step(PlaybackEvent::Frame(ms(20))).unwrap();
        assert_eq!(step.emitted, vec![Lifecycle::Ended]);
        assert!(!step.keep_running);
        assert_eq!(core.frames(), 2);
    }

    #[test]
    fn hidden_host_drops_frames() {
        let mut core = two_step_core();
        core.begin().unwrap();

        assert!(core.is_visible());
        core.step(PlaybackEvent::HostVisibility(false)).unwrap();
        assert!(!core.is_visible());
        for _ in 0..10 {
            let step = core.step(PlaybackEvent::Frame(ms(20))).unwrap();
            assert!(step.emitted.is_empty());
            assert!(step.keep_running);
        }
        assert_eq!(core.frames(), 0);

        core.step(PlaybackEvent::HostVisibility(true)).unwrap();
        core.step(PlaybackEvent::Frame(ms(20))).unwrap();
        assert_eq!(core.frames(), 1);
    }

    #[test]
    fn cancel_request_stops_playback() {
        let mut core = two_step_core();
        core.begin().unwrap();
        let step = core.step(PlaybackEvent::CancelRequested).unwrap();
        assert_eq!(step.emitted, vec![Lifecycle::Canceled, Lifecycle::Ended]);
        assert!(!step.keep_running);
    }

    #[test]
    fn end_request_finishes_playback() {
        let mut core = two_step_core();
        core.begin().unwrap();
        let step = core.step(PlaybackEvent::EndRequested).unwrap();
        assert_eq!(step.emitted, vec![Lifecycle::Ended]);
        assert!(!step.keep_running);
    }

    #[test]
    fn shutdown_leaves_the_set_alone() {
        let mut core = two_step_core();
        core.begin().unwrap();
        let step = core.step(PlaybackEvent::ShutdownRequested).unwrap();
        assert!(step.emitted.is_empty());
        assert!(!step.keep_running);
        assert!(core.scheduler().is_started());

        let mut set = core.into_scheduler();
        let mut events = Vec::new();
        set.cancel(&mut events);
        assert_eq!(events, vec![Lifecycle::Canceled, Lifecycle::Ended]);
    }

    #[test]
    fn scheduler_can_be_adjusted_before_begin() {
        let mut core = two_step_core();
        core.scheduler_mut().set_duration(ms(5));

        core.begin().unwrap();
        core.step(PlaybackEvent::Frame(ms(5))).unwrap();
        let step = core.step(PlaybackEvent::Frame(ms(5))).unwrap();
        assert_eq!(step.emitted, vec![Lifecycle::Ended]);
    }
}
