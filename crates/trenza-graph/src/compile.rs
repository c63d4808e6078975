//! Graph compilation — layering, glue synthesis, and the final fold.
//!
//! [`compile`] turns an immutable [`Graph`] into a single callable:
//!
//! 1. Topological layering: repeatedly collect the *ready* nodes (all
//!    inputs already calculated) into the next layer until every node is
//!    placed. A round that produces no ready nodes before completion
//!    means a dependency cycle — reported, never looped on.
//! 2. Each layer's callables are stacked into one layer callable.
//! 3. Between consecutive layers a glue callable is synthesized that
//!    routes each donor's output span to the positions each recipient
//!    declared, covering fan-out and arbitrary reordering.
//! 4. The alternating sequence `[layer₀, glue₀₁, layer₁, …]` is chained
//!    into the result.
//!
//! The compiler borrows the graph only during compilation; the returned
//! callable is independently owned and holds no back-reference.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use trenza_core::{Callable, CallableRef, ComposeError, Value, ValueKind};

use crate::graph::Graph;
use crate::ops::CompositionOps;

/// Errors reported while compiling a [`Graph`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    /// The graph has no nodes to compile.
    #[error("graph has no nodes")]
    EmptyGraph,

    /// A layering round completed without any node becoming ready.
    #[error(
        "dependency cycle: {remaining} of {total} nodes never became ready"
    )]
    Cycle {
        /// Nodes that could not be placed in any layer.
        remaining: usize,
        /// Total nodes in the graph.
        total: usize,
    },

    /// A recipient draws input from a node outside the preceding layer.
    #[error(
        "node {recipient} draws input from node {donor}, which is not in the preceding layer"
    )]
    InputOutsideDonorLayer {
        /// The node whose input could not be routed.
        recipient: usize,
        /// The input node missing from the donor layer.
        donor: usize,
    },

    /// Stacking one layer's callables failed.
    #[error("failed to stack layer {layer}: {source}")]
    Stack {
        /// Index of the failing layer.
        layer: usize,
        /// Underlying composition error.
        #[source]
        source: ComposeError,
    },

    /// Chaining the compiled layers failed.
    #[error("failed to chain {count} compiled layers: {source}")]
    Chain {
        /// Number of layers that were being chained.
        count: usize,
        /// Underlying composition error.
        #[source]
        source: ComposeError,
    },
}

/// Collects the indices of nodes that are ready: not yet calculated,
/// with every input already calculated. Recomputed from scratch each
/// layering round.
fn ready_nodes(graph: &Graph, calculated: &[bool]) -> Vec<usize> {
    let mut ready = Vec::new();
    graph.for_each_node(|i, inputs| {
        if calculated[i] {
            return;
        }
        if inputs.iter().all(|&input| calculated[input]) {
            ready.push(i);
        }
    });
    ready
}

/// Partitions the graph into topological layers.
///
/// Layer 0 holds every node without inputs; each later layer holds the
/// nodes whose inputs all live in earlier layers.
fn layering(graph: &Graph) -> Result<Vec<Vec<usize>>, CompileError> {
    let total = graph.node_count();
    let mut calculated = vec![false; total];
    let mut placed = 0usize;
    let mut layers = Vec::new();
    while placed < total {
        let ready = ready_nodes(graph, &calculated);
        if ready.is_empty() {
            return Err(CompileError::Cycle {
                remaining: total - placed,
                total,
            });
        }
        for &i in &ready {
            calculated[i] = true;
        }
        placed += ready.len();
        debug!(layer = layers.len(), nodes = ?ready, "layer ready");
        layers.push(ready);
    }
    Ok(layers)
}

/// Synthesized adapter routing donor-layer outputs into recipient-layer
/// inputs.
///
/// Inputs are the donor layer's flattened outputs; outputs are the
/// recipient layer's flattened inputs. Routing is precomputed as one
/// donor-output span per declared recipient input, so the same span can
/// feed several recipients (fan-out) and spans can appear in any order.
struct Glue {
    inputs: Vec<ValueKind>,
    outputs: Vec<ValueKind>,
    /// `(offset, len)` into the incoming argument list, one per routed
    /// span, in recipient-then-input order.
    spans: Vec<(usize, usize)>,
}

impl Callable for Glue {
    fn inputs(&self) -> &[ValueKind] {
        &self.inputs
    }

    fn outputs(&self) -> &[ValueKind] {
        &self.outputs
    }

    fn call(&self, args: Vec<Value>) -> Vec<Value> {
        let mut routed = Vec::with_capacity(self.outputs.len());
        for &(offset, len) in &self.spans {
            routed.extend_from_slice(&args[offset..offset + len]);
        }
        routed
    }
}

/// Builds the glue callable between a donor layer and a recipient
/// layer.
fn glue(
    graph: &Graph,
    donors: &[usize],
    recipients: &[usize],
) -> Result<CallableRef, CompileError> {
    // Each donor's output span in the flattened donor output.
    let mut donor_spans: HashMap<usize, (usize, usize)> = HashMap::with_capacity(donors.len());
    let mut inputs = Vec::new();
    for &donor in donors {
        let outputs = graph.node(donor).outputs();
        donor_spans.insert(donor, (inputs.len(), outputs.len()));
        inputs.extend_from_slice(outputs);
    }

    let mut outputs = Vec::new();
    let mut spans = Vec::new();
    for &recipient in recipients {
        outputs.extend_from_slice(graph.node(recipient).inputs());
        for &donor in graph.inputs(recipient) {
            let &(offset, len) =
                donor_spans
                    .get(&donor)
                    .ok_or(CompileError::InputOutsideDonorLayer { recipient, donor })?;
            spans.push((offset, len));
        }
    }

    debug!(
        donors = donors.len(),
        recipients = recipients.len(),
        routed = spans.len(),
        "glue synthesized"
    );
    Ok(Arc::new(Glue {
        inputs,
        outputs,
        spans,
    }))
}

/// Compiles the graph into a single callable.
///
/// The compiled callable's inputs are the flattened inputs of the first
/// layer (the nodes without dependencies) and its outputs are the
/// flattened outputs of the last layer. Every node is invoked exactly
/// once per call, regardless of how many downstream nodes consume it.
///
/// Any layering, stacking, gluing, or chaining failure aborts
/// compilation with the failing layer or node identified; compilation
/// never partially succeeds.
pub fn compile(graph: &Graph, ops: &dyn CompositionOps) -> Result<CallableRef, CompileError> {
    if graph.node_count() == 0 {
        return Err(CompileError::EmptyGraph);
    }
    let layers = layering(graph)?;

    let mut to_chain = Vec::with_capacity(layers.len() * 2 - 1);
    for (i, layer) in layers.iter().enumerate() {
        if i > 0 {
            to_chain.push(glue(graph, &layers[i - 1], layer)?);
        }
        let stacked = ops
            .stack(&graph.nodes(layer))
            .map_err(|source| CompileError::Stack { layer: i, source })?;
        to_chain.push(stacked);
    }

    let compiled = ops.chain(&to_chain).map_err(|source| CompileError::Chain {
        count: layers.len(),
        source,
    })?;
    debug!(
        nodes = graph.node_count(),
        layers = layers.len(),
        "graph compiled"
    );
    Ok(compiled)
}

/// [`compile`], with construction failure converted into a panic.
///
/// This is an explicit opt-in for callers that treat a malformed graph
/// as a programming error; the core API never aborts on its own.
///
/// # Panics
///
/// Panics with the compile error's message if compilation fails.
pub fn compile_or_abort(graph: &Graph, ops: &dyn CompositionOps) -> CallableRef {
    match compile(graph, ops) {
        Ok(compiled) => compiled,
        Err(err) => panic!("graph compilation failed: {err}"),
    }
}
