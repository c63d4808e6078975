//! The dependency graph store.
//!
//! A [`Graph`] owns a deduplicated list of callables (the node arena)
//! plus one ordered input-index list per node. Node indices are assigned
//! at first insertion, stay valid for the graph's lifetime, and are
//! never reused or renumbered. The compiler only reads; [`Graph::insert`]
//! is the sole mutator and lives behind the builder.

use trenza_core::{CallableRef, same_callable};

/// Immutable-after-build store of nodes and their input edges.
///
/// Invariant: the node list and the edge list always have the same
/// length; `edges[i]` holds the node indices whose outputs form node
/// `i`'s input tuple, in declared positional order.
#[derive(Debug)]
pub struct Graph {
    nodes: Vec<CallableRef>,
    edges: Vec<Vec<usize>>,
}

impl Graph {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Inserts a callable, deduplicating by identity.
    ///
    /// Returns the existing index if the same callable (same allocation,
    /// not same signature) is already present; otherwise appends it with
    /// an empty edge slot and returns the new index. Idempotent.
    pub(crate) fn insert(&mut self, callable: &CallableRef) -> usize {
        if let Some(existing) = self.nodes.iter().position(|n| same_callable(n, callable)) {
            return existing;
        }
        self.nodes.push(CallableRef::clone(callable));
        self.edges.push(Vec::new());
        self.nodes.len() - 1
    }

    pub(crate) fn add_input(&mut self, node: usize, input: usize) {
        self.edges[node].push(input);
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ordered input node indices of node `index`.
    pub fn inputs(&self, index: usize) -> &[usize] {
        &self.edges[index]
    }

    /// The callable at `index`.
    pub fn node(&self, index: usize) -> &CallableRef {
        &self.nodes[index]
    }

    /// Order-preserving lookup of the callables at `indices`.
    pub fn nodes(&self, indices: &[usize]) -> Vec<CallableRef> {
        indices
            .iter()
            .map(|&i| CallableRef::clone(&self.nodes[i]))
            .collect()
    }

    /// Visits every node in index order with its input index list.
    pub fn for_each_node(&self, mut visit: impl FnMut(usize, &[usize])) {
        for (i, inputs) in self.edges.iter().enumerate() {
            visit(i, inputs);
        }
    }
}
