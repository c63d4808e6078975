//! Builds a small arithmetic graph, compiles it, and runs it.
//!
//! Run with `RUST_LOG=debug` to watch the builder and compiler at work:
//!
//! ```sh
//! RUST_LOG=debug cargo run --example pipeline_demo
//! ```

use trenza_core::{Value, ValueKind, native, signature_of};
use trenza_graph::{AllValues, GraphBuilder, compile};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let source = native([], [ValueKind::Int], |_| vec![Value::Int(42)]);
    let halve = native([ValueKind::Int], [ValueKind::Int], |args| {
        vec![Value::Int(args[0].as_int().unwrap() / 2)]
    });
    let negate = native([ValueKind::Int], [ValueKind::Int], |args| {
        vec![Value::Int(-args[0].as_int().unwrap())]
    });

    // `source` feeds both consumers but runs once per invocation.
    let mut builder = GraphBuilder::new();
    builder.node(halve).inputs([source.clone()]);
    builder.node(negate).inputs([source]);
    let graph = builder.build().expect("declarations are well-typed");

    let compiled = compile(&graph, &AllValues).expect("graph is acyclic");
    println!("compiled: {}", signature_of(compiled.as_ref()));
    println!("result:   {:?}", compiled.call(vec![]));
}
