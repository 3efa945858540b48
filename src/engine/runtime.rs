// src/engine/runtime.rs

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::anim::{Animatable, Lifecycle};
use crate::errors::Result;

use super::core::PlaybackCore;
use super::PlaybackEvent;

/// Drives a [`PlaybackCore`] from a frame clock and a host event channel.
///
/// All playback semantics live in the core; this struct only turns
/// `tokio::time::interval` ticks into [`PlaybackEvent::Frame`]s and forwards
/// whatever arrives on `event_rx`.
#[derive(Debug)]
pub struct Runtime {
    core: PlaybackCore,
    event_rx: mpsc::Receiver<PlaybackEvent>,
    frame_period: Duration,
}

impl Runtime {
    pub fn new(
        core: PlaybackCore,
        event_rx: mpsc::Receiver<PlaybackEvent>,
        frame_period: Duration,
    ) -> Self {
        Self {
            core,
            event_rx,
            frame_period,
        }
    }

    /// Main loop.
    ///
    /// - Starts the set.
    /// - Feeds frame ticks (measured wall-clock deltas) and host events into
    ///   the core.
    /// - Stops once the core says the set is no longer playing.
    ///
    /// Returns every set-level lifecycle event in emission order.
    pub async fn run(mut self) -> Result<Vec<Lifecycle>> {
        info!(
            set = %self.core.scheduler().name(),
            frame_ms = u64::try_from(self.frame_period.as_millis()).unwrap_or(u64::MAX),
            "playback started"
        );

        let first = self.core.begin()?;
        let mut history = first.emitted;
        if !first.keep_running {
            info!("animation set finished on start");
            return Ok(history);
        }

        let mut ticker = time::interval(self.frame_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        let mut last_frame = Instant::now();
        let mut rx_open = true;

        loop {
            let event = tokio::select! {
                _ = ticker.tick() => {
                    let now = Instant::now();
                    let delta = now - last_frame;
                    last_frame = now;
                    PlaybackEvent::Frame(delta)
                }
                maybe = self.event_rx.recv(), if rx_open => match maybe {
                    Some(event) => {
                        debug!(?event, "playback received host event");
                        event
                    }
                    None => {
                        debug!("host event channel closed; frames only from now on");
                        rx_open = false;
                        continue;
                    }
                },
            };

            let step = self.core.step(event)?;
            history.extend(step.emitted);

            if !step.keep_running {
                info!(frames = self.core.frames(), "playback stopped");
                break;
            }
        }

        Ok(history)
    }
}
