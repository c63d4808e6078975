//! Sequential, type-checked composition.
//!
//! `chain([f, g, h])` behaves as `h(g(f(..)))`: the full output tuple of
//! each step becomes the full input tuple of the next. Construction runs
//! the signature matcher first and forwards its error; the composed
//! signature is the first step's inputs and the last step's outputs.

use std::sync::Arc;

use tracing::debug;

use crate::callable::{Callable, CallableRef};
use crate::error::ComposeError;
use crate::signature::can_chain;
use crate::value::{Value, ValueKind};

struct Chained {
    inputs: Vec<ValueKind>,
    outputs: Vec<ValueKind>,
    steps: Vec<CallableRef>,
}

impl Callable for Chained {
    fn inputs(&self) -> &[ValueKind] {
        &self.inputs
    }

    fn outputs(&self) -> &[ValueKind] {
        &self.outputs
    }

    fn call(&self, args: Vec<Value>) -> Vec<Value> {
        self.steps.iter().fold(args, |values, step| step.call(values))
    }
}

/// Chains callables sequentially into one callable.
///
/// Fails with the signature matcher's error if any adjacent pair is
/// incompatible, or with [`ComposeError::Empty`] on an empty sequence.
pub fn chain(steps: &[CallableRef]) -> Result<CallableRef, ComposeError> {
    can_chain(steps)?;
    let first = steps.first().ok_or(ComposeError::Empty)?;
    let last = steps.last().ok_or(ComposeError::Empty)?;
    debug!(steps = steps.len(), "chained");
    Ok(Arc::new(Chained {
        inputs: first.inputs().to_vec(),
        outputs: last.outputs().to_vec(),
        steps: steps.to_vec(),
    }))
}
