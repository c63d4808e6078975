//! End-to-end tests: build a graph through the public API, compile it,
//! and invoke the compiled callable.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use trenza_core::{native, CallableRef, Value, ValueKind};
use trenza_graph::{compile, AllValues, CompileError, GraphBuilder, GraphError, Propagate};

/// A source callable that counts how many times it is invoked.
fn counted_source(value: i64, counter: &Arc<AtomicUsize>) -> CallableRef {
    let counter = Arc::clone(counter);
    native([], [ValueKind::Int], move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        vec![Value::Int(value)]
    })
}

#[test]
fn shared_source_is_invoked_once_per_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = counted_source(42, &calls);
    let half = native([ValueKind::Int], [ValueKind::Int], |args| {
        vec![Value::Int(args[0].as_int().unwrap() / 2)]
    });
    let third = native([ValueKind::Int], [ValueKind::Int], |args| {
        vec![Value::Int(args[0].as_int().unwrap() / 3)]
    });

    let mut builder = GraphBuilder::new();
    builder.node(half).inputs([source.clone()]);
    builder.node(third).inputs([source]);
    let graph = builder.try_build().unwrap();

    let compiled = compile(&graph, &AllValues).unwrap();
    assert_eq!(
        compiled.call(vec![]),
        vec![Value::Int(21), Value::Int(14)]
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn linear_graph_runs_steps_in_dependency_order() {
    let subtract = native([ValueKind::Int, ValueKind::Int], [ValueKind::Int], |args| {
        vec![Value::Int(
            args[0].as_int().unwrap() - args[1].as_int().unwrap(),
        )]
    });
    let decrement = native([ValueKind::Int], [ValueKind::Int], |args| {
        vec![Value::Int(args[0].as_int().unwrap() - 1)]
    });

    let mut builder = GraphBuilder::new();
    builder.node(decrement).inputs([subtract]);
    let graph = builder.try_build().unwrap();

    let compiled = compile(&graph, &AllValues).unwrap();
    assert_eq!(compiled.inputs(), &[ValueKind::Int, ValueKind::Int]);
    assert_eq!(
        compiled.call(vec![Value::Int(6), Value::Int(3)]),
        vec![Value::Int(2)]
    );
}

#[test]
fn independent_nodes_keep_registration_order() {
    let increment = native([ValueKind::Int], [ValueKind::Int], |args| {
        vec![Value::Int(args[0].as_int().unwrap() + 1)]
    });
    let double = native([ValueKind::Int], [ValueKind::Int], |args| {
        vec![Value::Int(args[0].as_int().unwrap() * 2)]
    });

    let mut builder = GraphBuilder::new();
    builder.node(increment);
    builder.node(double);
    let graph = builder.try_build().unwrap();

    let compiled = compile(&graph, &AllValues).unwrap();
    assert_eq!(
        compiled.call(vec![Value::Int(5), Value::Int(5)]),
        vec![Value::Int(6), Value::Int(10)]
    );
}

#[test]
fn multi_output_donors_feed_recipients_in_declared_order() {
    let pair_calls = Arc::new(AtomicUsize::new(0));
    let single_calls = Arc::new(AtomicUsize::new(0));

    let pair = {
        let calls = Arc::clone(&pair_calls);
        native([], [ValueKind::Int, ValueKind::Float], move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            vec![Value::Int(13), Value::Float(5.5)]
        })
    };
    let single = {
        let calls = Arc::clone(&single_calls);
        native([], [ValueKind::Float], move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            vec![Value::Float(7.5)]
        })
    };
    let sum_forward = native(
        [ValueKind::Int, ValueKind::Float, ValueKind::Float],
        [ValueKind::Float],
        |args| {
            let total = args[0].as_int().unwrap() as f64
                + args[1].as_float().unwrap()
                + args[2].as_float().unwrap();
            vec![Value::Float(total)]
        },
    );
    let sum_reversed = native(
        [ValueKind::Float, ValueKind::Int, ValueKind::Float],
        [ValueKind::Float],
        |args| {
            let total = args[0].as_float().unwrap()
                + args[1].as_int().unwrap() as f64
                + args[2].as_float().unwrap();
            vec![Value::Float(total)]
        },
    );

    let mut builder = GraphBuilder::new();
    builder
        .node(sum_forward)
        .inputs([pair.clone(), single.clone()]);
    builder.node(sum_reversed).inputs([single, pair]);
    let graph = builder.try_build().unwrap();

    let compiled = compile(&graph, &AllValues).unwrap();
    assert_eq!(
        compiled.call(vec![]),
        vec![Value::Float(26.0), Value::Float(26.0)]
    );
    assert_eq!(pair_calls.load(Ordering::SeqCst), 1);
    assert_eq!(single_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn compiled_callable_outlives_the_graph() {
    let mut builder = GraphBuilder::new();
    builder.node(native([], [ValueKind::Int], |_| vec![Value::Int(7)]));
    let graph = builder.try_build().unwrap();

    let compiled = compile(&graph, &AllValues).unwrap();
    drop(graph);
    assert_eq!(compiled.call(vec![]), vec![Value::Int(7)]);
}

#[test]
fn cyclic_graph_is_rejected_without_hanging() {
    let a = native([ValueKind::Int], [ValueKind::Int], |args| args);
    let b = native([ValueKind::Int], [ValueKind::Int], |args| args);

    let mut builder = GraphBuilder::new();
    builder.node(a.clone()).inputs([b.clone()]);
    builder.node(b).inputs([a]);
    let graph = builder.try_build().unwrap();

    assert!(matches!(
        compile(&graph, &AllValues),
        Err(CompileError::Cycle {
            remaining: 2,
            total: 2,
        })
    ));
}

#[test]
fn skip_level_dependency_is_rejected() {
    // `source` feeds both `middle` and `sum`, but `middle` sits between
    // them in the layering, so `sum` would draw one input from a layer
    // two steps back.
    let source = native([], [ValueKind::Int], |_| vec![Value::Int(1)]);
    let middle = native([ValueKind::Int], [ValueKind::Int], |args| args);
    let sum = native([ValueKind::Int, ValueKind::Int], [ValueKind::Int], |args| {
        vec![Value::Int(
            args[0].as_int().unwrap() + args[1].as_int().unwrap(),
        )]
    });

    let mut builder = GraphBuilder::new();
    builder.node(middle.clone()).inputs([source.clone()]);
    builder.node(sum).inputs([source, middle]);
    let graph = builder.try_build().unwrap();

    // Nodes: 0 = middle, 1 = source, 2 = sum.
    assert_eq!(
        compile(&graph, &AllValues).err(),
        Some(CompileError::InputOutsideDonorLayer {
            recipient: 2,
            donor: 1,
        })
    );
}

#[test]
fn fallible_graph_short_circuits_on_a_raised_fault() {
    let risky = native(
        [ValueKind::Int],
        [ValueKind::Int, ValueKind::Fault],
        |args| {
            let n = args[0].as_int().unwrap();
            if n < 0 {
                vec![Value::Int(0), Value::fault("negative input")]
            } else {
                vec![Value::Int(n + 1), Value::Fault(None)]
            }
        },
    );

    let mut builder = GraphBuilder::new();
    builder.node(risky);
    let graph = builder.try_build().unwrap();
    let compiled = compile(&graph, &Propagate::last_fault()).unwrap();

    assert_eq!(
        compiled.call(vec![Value::Int(5)]),
        vec![Value::Int(6), Value::Fault(None)]
    );
    let failed = compiled.call(vec![Value::Int(-1)]);
    assert_eq!(failed[0], Value::Int(0));
    assert!(failed[1].is_raised());
}

#[test]
fn fallible_ops_reject_layers_without_a_fault_slot() {
    let source = native([], [ValueKind::Int], |_| vec![Value::Int(1)]);
    let sink = native([ValueKind::Int], [ValueKind::Int], |args| args);

    let mut builder = GraphBuilder::new();
    builder.node(sink).inputs([source]);
    let graph = builder.try_build().unwrap();

    assert!(matches!(
        compile(&graph, &Propagate::last_fault()),
        Err(CompileError::Chain { .. })
    ));
}

#[test]
fn builder_rejects_mismatched_input_kinds() {
    let float_source = native([], [ValueKind::Float], |_| vec![Value::Float(1.0)]);
    let wants_int = native([ValueKind::Int], [ValueKind::Int], |args| args);

    let mut builder = GraphBuilder::new();
    builder.node(wants_int).inputs([float_source]);
    assert!(matches!(
        builder.try_build(),
        Err(GraphError::InputKind { node: 0, .. })
    ));
}

#[test]
fn builder_rejects_undersupplied_inputs() {
    let source = native([], [ValueKind::Int], |_| vec![Value::Int(1)]);
    let wants_two = native([ValueKind::Int, ValueKind::Int], [ValueKind::Int], |args| {
        vec![Value::Int(
            args[0].as_int().unwrap() + args[1].as_int().unwrap(),
        )]
    });

    let mut builder = GraphBuilder::new();
    builder.node(wants_two).inputs([source]);
    assert!(matches!(
        builder.try_build(),
        Err(GraphError::InputArity {
            node: 0,
            expected: 2,
            supplied: 1,
            ..
        })
    ));
}
