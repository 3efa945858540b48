// tests/runtime_playback.rs

mod common;
use crate::common::{add_probe, init_tracing, with_timeout, ProbeLog};

use std::error::Error;
use std::time::Duration;

use tokio::sync::mpsc;

use animdag::anim::{Lifecycle, TimedAnimation};
use animdag::dag::Scheduler;
use animdag::engine::{PlaybackCore, PlaybackEvent, Runtime};

type TestResult = Result<(), Box<dyn Error>>;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// a (30ms) then b (30ms), with c starting alongside b.
fn chain() -> Scheduler {
    let mut set = Scheduler::new("chain");
    let a = set.add(TimedAnimation::new("a", ms(30)));
    let b = set.add(TimedAnimation::new("b", ms(30)));
    let c = set.add(TimedAnimation::new("c", ms(10)));
    set.play(a).unwrap().before(b).unwrap();
    set.play(b).unwrap().with(c).unwrap();
    set
}

#[tokio::test]
async fn runtime_plays_set_to_completion() -> TestResult {
    init_tracing();
    let (_tx, rx) = mpsc::channel(4);
    let runtime = Runtime::new(PlaybackCore::new(chain()), rx, ms(5));

    let history = with_timeout(runtime.run()).await?;

    assert_eq!(history, vec![Lifecycle::Started, Lifecycle::Ended]);
    Ok(())
}

#[tokio::test]
async fn cancel_request_stops_playback() -> TestResult {
    init_tracing();
    let log = ProbeLog::new();
    let mut set = Scheduler::new("never-ends");
    add_probe(&mut set, "stuck", &log);

    let (tx, rx) = mpsc::channel(4);
    let runtime = Runtime::new(PlaybackCore::new(set), rx, ms(5));
    let handle = tokio::spawn(runtime.run());

    tokio::time::sleep(ms(20)).await;
    tx.send(PlaybackEvent::CancelRequested).await?;

    let history = with_timeout(handle).await??;
    assert_eq!(
        history,
        vec![Lifecycle::Started, Lifecycle::Canceled, Lifecycle::Ended]
    );
    assert_eq!(log.entries(), vec!["start:stuck", "cancel:stuck"]);
    Ok(())
}

#[tokio::test]
async fn hidden_host_pauses_playback() -> TestResult {
    init_tracing();
    let (tx, rx) = mpsc::channel(4);
    // Queued before the loop starts, so the set never sees a frame.
    tx.send(PlaybackEvent::HostVisibility(false)).await?;

    let runtime = Runtime::new(PlaybackCore::new(chain()), rx, ms(5));
    let handle = tokio::spawn(runtime.run());

    tokio::time::sleep(ms(100)).await;
    assert!(!handle.is_finished(), "hidden set must not advance");

    tx.send(PlaybackEvent::HostVisibility(true)).await?;
    let history = with_timeout(handle).await??;
    assert_eq!(history.last(), Some(&Lifecycle::Ended));
    Ok(())
}

#[tokio::test]
async fn closed_channel_keeps_frames_flowing() -> TestResult {
    let (tx, rx) = mpsc::channel::<PlaybackEvent>(1);
    drop(tx);

    let runtime = Runtime::new(PlaybackCore::new(chain()), rx, ms(5));
    let history = with_timeout(runtime.run()).await?;
    assert_eq!(history, vec![Lifecycle::Started, Lifecycle::Ended]);
    Ok(())
}

#[tokio::test]
async fn empty_set_finishes_without_frames() -> TestResult {
    let (_tx, rx) = mpsc::channel(1);
    let runtime = Runtime::new(PlaybackCore::new(Scheduler::new("empty")), rx, ms(5));
    let history = with_timeout(runtime.run()).await?;
    assert_eq!(history, vec![Lifecycle::Started, Lifecycle::Ended]);
    Ok(())
}
