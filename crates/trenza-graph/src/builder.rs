//! Fluent graph construction.
//!
//! [`GraphBuilder`] accumulates node declarations in registration order;
//! [`GraphBuilder::try_build`] commits them into a fresh [`Graph`],
//! inserting every declared node and every declared input (inputs that
//! were never declared as top-level nodes become nodes too) with
//! identity deduplication. The whole commit fails on the first invalid
//! declaration — no partial graph is ever returned.
//!
//! ```rust
//! use trenza_core::{Value, ValueKind, native};
//! use trenza_graph::GraphBuilder;
//!
//! let src = native([], [ValueKind::Int], |_| vec![Value::Int(42)]);
//! let halve = native([ValueKind::Int], [ValueKind::Int], |args| {
//!     vec![Value::Int(args[0].as_int().unwrap() / 2)]
//! });
//!
//! let mut builder = GraphBuilder::new();
//! builder.node(halve).inputs([src]);
//! let graph = builder.build().unwrap();
//! assert_eq!(graph.node_count(), 2);
//! ```

use thiserror::Error;
use tracing::debug;
use trenza_core::{CallableRef, ValueKind, signature_of};

use crate::graph::Graph;

/// Errors reported while committing declarations into a [`Graph`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    /// A node's declared inputs supply the wrong number of values.
    #[error(
        "node {node} ({signature}) expects {expected} input values but its {inputs} declared inputs supply {supplied}"
    )]
    InputArity {
        /// Index of the offending node.
        node: usize,
        /// Rendered signature of the offending node.
        signature: String,
        /// Number of input values the node declares.
        expected: usize,
        /// Number of declared input nodes.
        inputs: usize,
        /// Total values those inputs produce.
        supplied: usize,
    },

    /// A node's declared inputs supply the wrong kind at one position.
    #[error(
        "node {node} input position {position}: supplied {supplied} does not match declared {declared}"
    )]
    InputKind {
        /// Index of the offending node.
        node: usize,
        /// Offending position in the node's input tuple.
        position: usize,
        /// Kind the input nodes supply at that position.
        supplied: ValueKind,
        /// Kind the node declares at that position.
        declared: ValueKind,
    },

    /// Wrapping variant added by [`GraphBuilder::build`]; carries no
    /// information beyond message context.
    #[error("failed to build the graph: {source}")]
    Build {
        /// Underlying cause.
        #[source]
        source: Box<GraphError>,
    },
}

struct NodeDecl {
    callable: CallableRef,
    inputs: Vec<CallableRef>,
}

/// Accumulates node declarations for committing into a [`Graph`].
#[derive(Default)]
pub struct GraphBuilder {
    decls: Vec<NodeDecl>,
}

/// Handle returned by [`GraphBuilder::node`] for declaring that node's
/// ordered input list.
pub struct NodeHandle<'a> {
    builder: &'a mut GraphBuilder,
    index: usize,
}

impl NodeHandle<'_> {
    /// Declares the ordered input callables of this node.
    ///
    /// The order given here is the positional order in which the inputs'
    /// outputs are concatenated to form the node's input tuple. Calling
    /// again replaces the previous declaration.
    pub fn inputs(self, inputs: impl IntoIterator<Item = CallableRef>) {
        self.builder.decls[self.index].inputs = inputs.into_iter().collect();
    }
}

impl GraphBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node and returns a handle for declaring its inputs.
    pub fn node(&mut self, callable: CallableRef) -> NodeHandle<'_> {
        debug!(node = self.decls.len(), signature = %signature_of(callable.as_ref()), "declare node");
        self.decls.push(NodeDecl {
            callable,
            inputs: Vec::new(),
        });
        let index = self.decls.len() - 1;
        NodeHandle {
            builder: self,
            index,
        }
    }

    /// Commits the declarations into a fresh [`Graph`].
    ///
    /// Walks declarations in registration order, inserting each node and
    /// each of its inputs with identity deduplication, then verifies
    /// that every node's declared inputs supply exactly the values the
    /// node expects. Any failure aborts the whole commit with node and
    /// input position context.
    pub fn try_build(&self) -> Result<Graph, GraphError> {
        let mut graph = Graph::new();
        for decl in &self.decls {
            let node = graph.insert(&decl.callable);
            for input in &decl.inputs {
                let supplier = graph.insert(input);
                graph.add_input(node, supplier);
            }
        }
        Self::check_supply(&graph)?;
        debug!(
            nodes = graph.node_count(),
            declarations = self.decls.len(),
            "graph built"
        );
        Ok(graph)
    }

    /// [`try_build`](Self::try_build) with one extra layer of message
    /// context on failure.
    pub fn build(&self) -> Result<Graph, GraphError> {
        self.try_build().map_err(|source| GraphError::Build {
            source: Box::new(source),
        })
    }

    /// Verifies, for every node with declared inputs, that the flattened
    /// outputs of those inputs match the node's declared input tuple in
    /// count and per-position kind.
    ///
    /// Nodes without declared inputs are leaves — their inputs (if any)
    /// come from the compiled callable's own arguments.
    fn check_supply(graph: &Graph) -> Result<(), GraphError> {
        let mut verdict = Ok(());
        graph.for_each_node(|node, inputs| {
            if verdict.is_err() || inputs.is_empty() {
                return;
            }
            let supplied: Vec<ValueKind> = inputs
                .iter()
                .flat_map(|&i| graph.node(i).outputs().iter().copied())
                .collect();
            let declared = graph.node(node).inputs();
            if supplied.len() != declared.len() {
                verdict = Err(GraphError::InputArity {
                    node,
                    signature: signature_of(graph.node(node).as_ref()),
                    expected: declared.len(),
                    inputs: inputs.len(),
                    supplied: supplied.len(),
                });
                return;
            }
            for (position, (s, d)) in supplied.iter().zip(declared.iter()).enumerate() {
                if s != d {
                    verdict = Err(GraphError::InputKind {
                        node,
                        position,
                        supplied: *s,
                        declared: *d,
                    });
                    return;
                }
            }
        });
        verdict
    }
}
