// src/dag/mod.rs

//! Dependency graph and the animation-set scheduler.
//!
//! - [`node`] holds node / edge types and the read-only child view.
//! - [`graph`] owns the node arena and the cached, cycle-checked sort.
//! - [`triggers`] holds the per-edge listeners installed for one run.
//! - [`scheduler`] drives a run: roots, triggers, completion, cancel / end.
//! - [`builder`] declares edges fluently.

pub mod builder;
pub mod graph;
pub mod node;
pub mod scheduler;
pub(crate) mod triggers;

pub use builder::Builder;
pub use graph::DependencyGraph;
pub use node::{ChildInfo, DependencyEdge, NodeId};
pub use scheduler::Scheduler;
