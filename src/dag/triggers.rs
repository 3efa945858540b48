// src/dag/triggers.rs

//! Per-edge trigger listeners installed for one run.

use super::node::{DependencyEdge, NodeId};
use crate::types::Rule;

/// Waits for `dependency` to emit the event matching `rule`, then resolves
/// one edge of `owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TriggerListener {
    pub(crate) owner: NodeId,
    pub(crate) dependency: NodeId,
    pub(crate) rule: Rule,
}

impl TriggerListener {
    pub(crate) fn edge(&self) -> DependencyEdge {
        DependencyEdge {
            target: self.dependency,
            rule: self.rule,
        }
    }
}

/// Trigger listeners of the current run, in installation order.
#[derive(Debug, Default)]
pub(crate) struct TriggerTable {
    listeners: Vec<TriggerListener>,
}

impl TriggerTable {
    pub(crate) fn clear(&mut self) {
        self.listeners.clear();
    }

    pub(crate) fn install(&mut self, owner: NodeId, edge: &DependencyEdge) {
        self.listeners.push(TriggerListener {
            owner,
            dependency: edge.target,
            rule: edge.rule,
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Detach and return every listener waiting on `dependency` for `rule`.
    /// Each listener fires at most once per run.
    pub(crate) fn take_matching(&mut self, dependency: NodeId, rule: Rule) -> Vec<TriggerListener> {
        let mut fired = Vec::new();
        self.listeners.retain(|l| {
            if l.dependency == dependency && l.rule == rule {
                fired.push(*l);
                false
            } else {
                true
            }
        });
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_matching_filters_by_dependency_and_rule() {
        let mut table = TriggerTable::default();
        let with_a = DependencyEdge { target: NodeId(0), rule: Rule::With };
        let after_a = DependencyEdge { target: NodeId(0), rule: Rule::After };

        table.install(NodeId(1), &with_a);
        table.install(NodeId(2), &after_a);
        table.install(NodeId(3), &with_a);

        let fired = table.take_matching(NodeId(0), Rule::With);

        assert_eq!(
            fired.iter().map(|l| l.owner).collect::<Vec<_>>(),
            vec![NodeId(1), NodeId(3)]
        );
        assert_eq!(table.len(), 1);
        assert!(table.take_matching(NodeId(0), Rule::With).is_empty());
    }
}
