//! Graph-driven composition: declare callables and their data-flow
//! dependencies, then compile the whole graph into one callable.
//!
//! Built on top of [`trenza_core`]'s composition primitives. A
//! [`GraphBuilder`] collects nodes and their ordered inputs; the
//! committed [`Graph`] is immutable; [`compile`] partitions it into
//! topological layers, stacks each layer, synthesizes glue between
//! adjacent layers, and chains the result. The compiled callable owns
//! everything it needs and stays valid after the graph is dropped.
//!
//! ```
//! use trenza_core::{native, Value, ValueKind};
//! use trenza_graph::{compile, AllValues, GraphBuilder};
//!
//! let source = native([], [ValueKind::Int], |_| vec![Value::Int(21)]);
//! let double = native([ValueKind::Int], [ValueKind::Int], |args| {
//!     vec![Value::Int(args[0].as_int().unwrap() * 2)]
//! });
//!
//! let mut builder = GraphBuilder::new();
//! builder.node(double).inputs([source]);
//! let graph = builder.try_build().unwrap();
//!
//! let compiled = compile(&graph, &AllValues).unwrap();
//! assert_eq!(compiled.call(vec![]), vec![Value::Int(42)]);
//! ```

pub mod builder;
pub mod compile;
pub mod graph;
pub mod ops;

pub use builder::{GraphBuilder, GraphError, NodeHandle};
pub use compile::{compile, compile_or_abort, CompileError};
pub use graph::Graph;
pub use ops::{AllValues, CompositionOps, Propagate};
