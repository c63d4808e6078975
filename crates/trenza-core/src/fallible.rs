//! Error-propagating sequential composition.
//!
//! `chain_with_error` is `chain` with a pluggable short-circuit policy:
//! some trailing output positions of each step are reserved to signal
//! failure. After each step the policy inspects the raw outputs; if
//! nothing was raised the propagated values feed the next step,
//! otherwise the chain short-circuits. Once a step signals, no further
//! steps execute;
//! the composed callable returns zero values in the real output
//! positions and the signal in the trailing position.
//!
//! The built-in [`LastFault`] policy designates the last output of every
//! step as the failure signal and requires it to be
//! [`ValueKind::Fault`].

use std::sync::Arc;

use tracing::debug;

use crate::callable::{Callable, CallableRef, signature_of};
use crate::error::ComposeError;
use crate::signature::match_adjacent;
use crate::value::{Value, ValueKind};

/// Pluggable failure-detection capability for error-propagating chains.
pub trait FailurePolicy: Send + Sync {
    /// Validates that a callable's signature carries the failure signal
    /// this policy knows how to read.
    fn check_signature(&self, callable: &dyn Callable) -> Result<(), ComposeError>;

    /// Number of leading outputs that are real, propagated values; the
    /// rest are reserved signal positions.
    fn propagated(&self, callable: &dyn Callable) -> usize;

    /// Inspects a step's raw outputs by reference; returns the raised
    /// signal if the step failed, `None` to continue.
    fn raised(&self, raw: &[Value]) -> Option<Value>;
}

/// Default policy: the last output of every step is the failure signal
/// and must be [`ValueKind::Fault`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LastFault;

impl FailurePolicy for LastFault {
    fn check_signature(&self, callable: &dyn Callable) -> Result<(), ComposeError> {
        match callable.outputs().last() {
            Some(ValueKind::Fault) => Ok(()),
            Some(other) => Err(ComposeError::FailureSignal {
                signature: signature_of(callable),
                reason: format!("last output must be fault, got {other}"),
            }),
            None => Err(ComposeError::FailureSignal {
                signature: signature_of(callable),
                reason: "callable declares no outputs".to_string(),
            }),
        }
    }

    fn propagated(&self, callable: &dyn Callable) -> usize {
        callable.outputs().len().saturating_sub(1)
    }

    fn raised(&self, raw: &[Value]) -> Option<Value> {
        raw.last().filter(|signal| signal.is_raised()).cloned()
    }
}

/// Verifies that the sequence can be chained under the policy: every
/// step's signature must carry the failure signal, and each step's
/// *propagated* outputs must match the next step's inputs.
pub fn can_chain_with_error<P: FailurePolicy>(
    policy: &P,
    steps: &[CallableRef],
) -> Result<(), ComposeError> {
    if steps.is_empty() {
        return Err(ComposeError::Empty);
    }
    for (i, step) in steps.iter().enumerate() {
        policy
            .check_signature(step.as_ref())
            .map_err(|err| err.at_step(i))?;
    }
    for (i, pair) in steps.windows(2).enumerate() {
        let propagated = policy.propagated(pair[0].as_ref());
        match_adjacent(i, i + 1, &pair[0].outputs()[..propagated], pair[1].inputs())?;
    }
    Ok(())
}

struct FallibleChain<P> {
    inputs: Vec<ValueKind>,
    outputs: Vec<ValueKind>,
    steps: Vec<CallableRef>,
    policy: P,
}

impl<P: FailurePolicy> FallibleChain<P> {
    /// Zero-filled real outputs plus the raised signal in the trailing
    /// position.
    fn short_circuit(&self, signal: Value) -> Vec<Value> {
        let real = self.outputs.len() - 1;
        let mut result: Vec<Value> = self.outputs[..real].iter().map(|&k| Value::zero(k)).collect();
        result.push(signal);
        result
    }
}

impl<P: FailurePolicy> Callable for FallibleChain<P> {
    fn inputs(&self) -> &[ValueKind] {
        &self.inputs
    }

    fn outputs(&self) -> &[ValueKind] {
        &self.outputs
    }

    fn call(&self, args: Vec<Value>) -> Vec<Value> {
        let mut next = args;
        let last = self.steps.len() - 1;
        for (i, step) in self.steps.iter().enumerate() {
            let mut raw = step.call(next);
            if let Some(signal) = self.policy.raised(&raw) {
                return self.short_circuit(signal);
            }
            if i == last {
                // The final step's raw outputs already have the result
                // shape: real values plus its own signal position.
                return raw;
            }
            raw.truncate(self.policy.propagated(step.as_ref()));
            next = raw;
        }
        unreachable!("empty chains are rejected at construction")
    }
}

/// Chains callables with short-circuiting failure propagation.
///
/// Construction fails unless every step (including the final one)
/// satisfies the policy's signature check and each adjacency matches on
/// the propagated outputs. The composed signature is the first step's
/// inputs and the last step's outputs — the trailing position of which
/// is the chain's own failure signal.
pub fn chain_with_error<P>(policy: P, steps: &[CallableRef]) -> Result<CallableRef, ComposeError>
where
    P: FailurePolicy + 'static,
{
    can_chain_with_error(&policy, steps)?;
    let first = steps.first().ok_or(ComposeError::Empty)?;
    let last = steps.last().ok_or(ComposeError::Empty)?;
    debug!(steps = steps.len(), "chained with failure propagation");
    Ok(Arc::new(FallibleChain {
        inputs: first.inputs().to_vec(),
        outputs: last.outputs().to_vec(),
        steps: steps.to_vec(),
        policy,
    }))
}
