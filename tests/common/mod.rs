#![allow(dead_code)]

use std::time::Duration;

use animdag::anim::{Animatable, Lifecycle};
use animdag::dag::{NodeId, Scheduler};

pub use animdag_test_utils::builders;
pub use animdag_test_utils::{init_tracing, with_timeout, ProbeAnimation, ProbeHandle, ProbeLog};

/// Add a probe named `name` and return its id plus remote control.
pub fn add_probe(set: &mut Scheduler, name: &str, log: &ProbeLog) -> (NodeId, ProbeHandle) {
    let probe = ProbeAnimation::new(name, log);
    let handle = probe.handle();
    (set.add(probe), handle)
}

/// Deliver one 16ms frame and return the set-level events it produced.
pub fn frame(set: &mut Scheduler) -> Vec<Lifecycle> {
    let mut events = Vec::new();
    set.tick(Duration::from_millis(16), &mut events)
        .expect("tick should succeed");
    events
}

pub fn start(set: &mut Scheduler) -> Vec<Lifecycle> {
    let mut events = Vec::new();
    set.start(&mut events).expect("start should succeed");
    events
}

pub fn names_in_order(set: &mut Scheduler) -> Vec<String> {
    set.sorted_order()
        .expect("graph should sort")
        .into_iter()
        .map(|id| set.child(id).unwrap().name().to_string())
        .collect()
}
