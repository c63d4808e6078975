//! Independent, position-concatenating composition.
//!
//! `stack([p, q])` builds one callable whose input sequence is `p`'s
//! inputs followed by `q`'s inputs, and whose output sequence is `p`'s
//! outputs followed by `q`'s outputs. At call time the argument list is
//! sliced by declared arity and each member is invoked independently,
//! in step order; members are side-effect-independent by caller
//! contract, so invocation order is unobservable.

use std::sync::Arc;

use tracing::debug;

use crate::callable::{Callable, CallableRef};
use crate::error::ComposeError;
use crate::value::{Value, ValueKind};

struct Stacked {
    inputs: Vec<ValueKind>,
    outputs: Vec<ValueKind>,
    /// Input arity per member, for argument slicing.
    arities: Vec<usize>,
    steps: Vec<CallableRef>,
}

impl Callable for Stacked {
    fn inputs(&self) -> &[ValueKind] {
        &self.inputs
    }

    fn outputs(&self) -> &[ValueKind] {
        &self.outputs
    }

    fn call(&self, args: Vec<Value>) -> Vec<Value> {
        let mut results = Vec::with_capacity(self.outputs.len());
        let mut remaining = args;
        for (step, &arity) in self.steps.iter().zip(self.arities.iter()) {
            let rest = remaining.split_off(arity);
            results.extend(step.call(remaining));
            remaining = rest;
        }
        results
    }
}

/// Stacks callables into one callable over the concatenation of their
/// signatures.
///
/// Fails on an empty sequence; any well-typed members stack — there is
/// no compatibility requirement between them.
pub fn stack(steps: &[CallableRef]) -> Result<CallableRef, ComposeError> {
    if steps.is_empty() {
        return Err(ComposeError::Empty);
    }
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    let mut arities = Vec::with_capacity(steps.len());
    for step in steps {
        inputs.extend_from_slice(step.inputs());
        outputs.extend_from_slice(step.outputs());
        arities.push(step.inputs().len());
    }
    debug!(
        steps = steps.len(),
        inputs = inputs.len(),
        outputs = outputs.len(),
        "stacked"
    );
    Ok(Arc::new(Stacked {
        inputs,
        outputs,
        arities,
        steps: steps.to_vec(),
    }))
}
