// src/dag/node.rs

//! Node and edge types, plus the read-only child view handed to callers.

use std::fmt;

use crate::anim::Animatable;
use crate::types::Rule;

/// Handle to an animation added to a [`Scheduler`](super::Scheduler).
///
/// Ids are arena indices; a clone of a set keeps the same ids for the same
/// animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// "The owning node must satisfy `rule` with respect to `target`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DependencyEdge {
    pub target: NodeId,
    pub rule: Rule,
}

/// One animation plus its dependency bookkeeping.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) animation: Box<dyn Animatable>,
    /// Declared edges; survive across runs.
    pub(crate) edges: Vec<DependencyEdge>,
    /// Edges not yet satisfied in the current run.
    pub(crate) pending: Vec<DependencyEdge>,
    /// Distinct `edges[*].target`.
    pub(crate) predecessors: Vec<NodeId>,
    /// Distinct nodes whose `predecessors` contain this node.
    pub(crate) successors: Vec<NodeId>,
    pub(crate) done: bool,
    /// Whether the completion listener is attached for the current run.
    pub(crate) tracked: bool,
}

impl Node {
    pub(crate) fn new(animation: Box<dyn Animatable>) -> Self {
        Self {
            animation,
            edges: Vec::new(),
            pending: Vec::new(),
            predecessors: Vec::new(),
            successors: Vec::new(),
            done: false,
            tracked: false,
        }
    }

    pub(crate) fn name(&self) -> &str {
        self.animation.name()
    }

    pub(crate) fn reset_for_run(&mut self) {
        self.pending = self.edges.clone();
        self.done = false;
        self.tracked = true;
    }

    /// Drop one occurrence of `edge` from `pending`.
    ///
    /// Returns `true` only when this removal emptied `pending`, i.e. the node
    /// is ready to start. An edge that is no longer pending is ignored.
    pub(crate) fn satisfy(&mut self, edge: &DependencyEdge) -> bool {
        match self.pending.iter().position(|e| e == edge) {
            Some(pos) => {
                self.pending.remove(pos);
                self.pending.is_empty()
            }
            None => false,
        }
    }
}

/// Snapshot of one child, detached from the scheduler's node arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildInfo {
    pub id: NodeId,
    pub name: String,
    pub started: bool,
    pub running: bool,
    pub done: bool,
    pub edges: Vec<DependencyEdge>,
}

impl ChildInfo {
    pub(crate) fn from_node(id: NodeId, node: &Node) -> Self {
        Self {
            id,
            name: node.name().to_string(),
            started: node.animation.is_started(),
            running: node.animation.is_running(),
            done: node.done,
            edges: node.edges.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::anim::Pause;

    fn node_with_edges(edges: &[DependencyEdge]) -> Node {
        let mut node = Node::new(Box::new(Pause::new("n", Duration::ZERO)));
        node.edges = edges.to_vec();
        node.reset_for_run();
        node
    }

    #[test]
    fn satisfy_reports_ready_only_when_last_edge_clears() {
        let a = DependencyEdge { target: NodeId(0), rule: Rule::With };
        let b = DependencyEdge { target: NodeId(1), rule: Rule::After };
        let mut node = node_with_edges(&[a, b]);

        assert!(!node.satisfy(&b));
        assert!(node.satisfy(&a));
        // Already empty: a repeated notification never re-reports readiness.
        assert!(!node.satisfy(&a));
    }

    #[test]
    fn duplicate_edges_must_each_be_satisfied() {
        let a = DependencyEdge { target: NodeId(0), rule: Rule::After };
        let mut node = node_with_edges(&[a, a]);

        assert!(!node.satisfy(&a));
        assert!(node.satisfy(&a));
    }

    #[test]
    fn reset_restores_pending_from_edges() {
        let a = DependencyEdge { target: NodeId(0), rule: Rule::With };
        let mut node = node_with_edges(&[a]);
        node.satisfy(&a);
        node.done = true;

        node.reset_for_run();

        assert_eq!(node.pending, vec![a]);
        assert!(!node.done);
        assert!(node.tracked);
    }
}
