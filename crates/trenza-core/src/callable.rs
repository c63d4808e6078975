//! The [`Callable`] abstraction and the [`NativeFn`] closure adapter.
//!
//! A callable is an opaque unit of computation with a fixed, declared
//! sequence of input kinds and output kinds. Composition primitives and
//! the graph compiler only ever see this interface; they never inspect
//! payloads.
//!
//! ## Identity
//!
//! Callables are handled as `Arc<dyn Callable>` and two handles refer to
//! the *same node* iff they point at the same allocation
//! ([`same_callable`]). Two separately constructed callables with
//! identical signatures remain distinct — identity is by value, never by
//! structural signature equality.

use std::sync::Arc;

use crate::value::{Value, ValueKind};

/// Shared handle to a callable. Clones share identity.
pub type CallableRef = Arc<dyn Callable>;

/// A unit of computation with a statically declared signature.
///
/// `call` receives exactly `inputs().len()` values whose kinds match the
/// declared input sequence, and must return exactly `outputs().len()`
/// values matching the declared output sequence. Composed callables
/// guarantee this by construction; hand-invoked callables are the
/// caller's responsibility.
pub trait Callable: Send + Sync {
    /// Ordered input kind sequence.
    fn inputs(&self) -> &[ValueKind];

    /// Ordered output kind sequence.
    fn outputs(&self) -> &[ValueKind];

    /// Invokes the computation.
    fn call(&self, args: Vec<Value>) -> Vec<Value>;
}

impl std::fmt::Debug for dyn Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Callable({})", signature_of(self))
    }
}

/// Returns `true` if two handles designate the same callable (same
/// allocation, not same signature).
pub fn same_callable(a: &CallableRef, b: &CallableRef) -> bool {
    Arc::ptr_eq(a, b)
}

/// Renders a callable's signature for error messages and logs,
/// e.g. `fn(int, float) -> (int, fault)`.
pub fn signature_of(callable: &dyn Callable) -> String {
    let join = |kinds: &[ValueKind]| {
        kinds
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "fn({}) -> ({})",
        join(callable.inputs()),
        join(callable.outputs())
    )
}

/// Adapter wrapping a plain closure plus its declared signature.
pub struct NativeFn<F> {
    inputs: Vec<ValueKind>,
    outputs: Vec<ValueKind>,
    f: F,
}

impl<F> Callable for NativeFn<F>
where
    F: Fn(Vec<Value>) -> Vec<Value> + Send + Sync,
{
    fn inputs(&self) -> &[ValueKind] {
        &self.inputs
    }

    fn outputs(&self) -> &[ValueKind] {
        &self.outputs
    }

    fn call(&self, args: Vec<Value>) -> Vec<Value> {
        debug_assert_eq!(
            args.len(),
            self.inputs.len(),
            "callable invoked with wrong arity"
        );
        let result = (self.f)(args);
        debug_assert_eq!(
            result.len(),
            self.outputs.len(),
            "callable returned wrong arity"
        );
        result
    }
}

/// Wraps a closure and its declared signature into a shared callable
/// handle.
///
/// Every call to `native` produces a callable with fresh identity, even
/// for byte-identical signatures and closures.
pub fn native<F>(
    inputs: impl Into<Vec<ValueKind>>,
    outputs: impl Into<Vec<ValueKind>>,
    f: F,
) -> CallableRef
where
    F: Fn(Vec<Value>) -> Vec<Value> + Send + Sync + 'static,
{
    Arc::new(NativeFn {
        inputs: inputs.into(),
        outputs: outputs.into(),
        f,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double() -> CallableRef {
        native([ValueKind::Int], [ValueKind::Int], |args| {
            vec![Value::Int(args[0].as_int().unwrap() * 2)]
        })
    }

    #[test]
    fn native_fn_reports_declared_signature() {
        let f = double();
        assert_eq!(f.inputs(), &[ValueKind::Int]);
        assert_eq!(f.outputs(), &[ValueKind::Int]);
    }

    #[test]
    fn native_fn_invokes_closure() {
        let f = double();
        assert_eq!(f.call(vec![Value::Int(21)]), vec![Value::Int(42)]);
    }

    #[test]
    fn clones_share_identity_but_fresh_wraps_do_not() {
        let f = double();
        let g = Arc::clone(&f);
        assert!(same_callable(&f, &g));

        // Same signature, same body — still a distinct node.
        let h = double();
        assert!(!same_callable(&f, &h));
    }

    #[test]
    fn signature_rendering() {
        let f = native(
            [ValueKind::Int, ValueKind::Float],
            [ValueKind::Fault],
            |_| vec![Value::Fault(None)],
        );
        assert_eq!(signature_of(f.as_ref()), "fn(int, float) -> (fault)");
    }
}
