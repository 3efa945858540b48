// src/dag/graph.rs

//! Node arena, edge bookkeeping and the cached topological sort.

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

use crate::anim::Animatable;
use crate::errors::{AnimdagError, Result};

use super::node::{DependencyEdge, Node, NodeId};

/// Owns every node of one animation set.
///
/// Nodes are stored in insertion order, which is also the sort tie-break.
/// The sorted order is cached until a node or an edge is added.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    sorted: Option<Vec<NodeId>>,
}

impl DependencyGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Whether the cached order is still valid.
    pub fn is_sorted(&self) -> bool {
        self.sorted.is_some()
    }

    pub fn add_node(&mut self, animation: Box<dyn Animatable>) -> NodeId {
        let id = NodeId(self.nodes.len());
        debug!(node = %id, animation = %animation.name(), "adding node");
        self.nodes.push(Node::new(animation));
        self.sorted = None;
        id
    }

    /// Declare that `dependent` must satisfy `edge` before it starts.
    pub fn add_edge(&mut self, dependent: NodeId, edge: DependencyEdge) -> Result<()> {
        for id in [dependent, edge.target] {
            if !self.contains(id) {
                return Err(AnimdagError::UnknownNode(id.0));
            }
        }
        self.link(dependent, edge);
        Ok(())
    }

    /// Record the edge and keep `predecessors` / `successors` consistent.
    /// Both ids must be valid.
    fn link(&mut self, dependent: NodeId, edge: DependencyEdge) {
        debug!(
            node = %self.nodes[dependent.0].name(),
            target = %self.nodes[edge.target.0].name(),
            rule = %edge.rule,
            "adding dependency edge"
        );

        let node = &mut self.nodes[dependent.0];
        node.edges.push(edge);
        if !node.predecessors.contains(&edge.target) {
            node.predecessors.push(edge.target);
        }

        let target = &mut self.nodes[edge.target.0];
        if !target.successors.contains(&dependent) {
            target.successors.push(dependent);
        }

        self.sorted = None;
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    /// Cached order, or insertion order if the cache has been invalidated.
    pub fn order_or_insertion(&self) -> Vec<NodeId> {
        match &self.sorted {
            Some(order) => order.clone(),
            None => self.ids().collect(),
        }
    }

    pub fn all_done(&self) -> bool {
        self.nodes.iter().all(|n| n.done)
    }

    /// Topologically sorted node ids, dependencies first.
    ///
    /// Reuses the cached order when nothing was added since the last
    /// successful sort. On a cycle nothing is cached and the error names the
    /// animations on the cycle.
    pub fn sort(&mut self) -> Result<Vec<NodeId>> {
        if let Some(order) = &self.sorted {
            return Ok(order.clone());
        }

        let order = self.kahn();
        if order.len() != self.nodes.len() {
            let involved = self.cycle_members(&order);
            warn!(?involved, "cycle detected while sorting animation set");
            return Err(AnimdagError::Cycle(involved));
        }

        debug!(nodes = order.len(), "sorted animation set");
        self.sorted = Some(order.clone());
        Ok(order)
    }

    /// Kahn's algorithm, processed frontier by frontier so that ties keep
    /// insertion / discovery order.
    fn kahn(&self) -> Vec<NodeId> {
        let mut remaining: Vec<Vec<NodeId>> =
            self.nodes.iter().map(|n| n.predecessors.clone()).collect();

        let mut frontier: Vec<NodeId> = self
            .ids()
            .filter(|id| self.nodes[id.0].predecessors.is_empty())
            .collect();
        let mut sorted = Vec::with_capacity(self.nodes.len());

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for id in frontier {
                sorted.push(id);
                for succ in &self.nodes[id.0].successors {
                    let preds = &mut remaining[succ.0];
                    preds.retain(|p| *p != id);
                    if preds.is_empty() {
                        next.push(*succ);
                    }
                }
            }
            frontier = next;
        }

        sorted
    }

    /// Names of nodes that sit on a cycle, in insertion order.
    ///
    /// Nodes that are merely downstream of a cycle are left out.
    fn cycle_members(&self, sorted: &[NodeId]) -> Vec<String> {
        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
        for id in self.ids().filter(|id| !sorted.contains(id)) {
            graph.add_node(id.0);
        }
        for idx in graph.nodes().collect::<Vec<_>>() {
            for pred in &self.nodes[idx].predecessors {
                if graph.contains_node(pred.0) {
                    graph.add_edge(pred.0, idx, ());
                }
            }
        }

        let mut members: Vec<usize> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .flatten()
            .collect();
        members.sort_unstable();

        members
            .into_iter()
            .map(|idx| self.nodes[idx].name().to_string())
            .collect()
    }

    /// Deep copy: every animation is cloned, then edges are re-linked
    /// through an old-to-new id table. Run state is not carried over.
    pub fn deep_clone(&self) -> DependencyGraph {
        let mut copy = DependencyGraph::default();

        let remap: Vec<NodeId> = self
            .nodes
            .iter()
            .map(|node| copy.add_node(node.animation.clone_box()))
            .collect();

        for (old, node) in self.nodes.iter().enumerate() {
            for edge in &node.edges {
                copy.link(
                    remap[old],
                    DependencyEdge {
                        target: remap[edge.target.0],
                        rule: edge.rule,
                    },
                );
            }
        }

        copy
    }
}
