//! Error type for composition construction failures.
//!
//! Every variant is a static, construction-time fault: the caller must
//! fix the offending callables and retry. Runtime failures travel as
//! [`Value::Fault`](crate::Value::Fault) data through error-propagating
//! chains and never surface here.

use thiserror::Error;

use crate::value::ValueKind;

/// Construction failures reported by the composition primitives and the
/// signature matcher.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ComposeError {
    /// An empty sequence of callables was given.
    #[error("cannot compose an empty sequence of callables")]
    Empty,

    /// Adjacent steps disagree on value count.
    #[error(
        "step {first} returns {produced} values but step {second} takes {expected}"
    )]
    ArityMismatch {
        /// Index of the producing step.
        first: usize,
        /// Index of the consuming step.
        second: usize,
        /// Number of values the producing step emits.
        produced: usize,
        /// Number of values the consuming step expects.
        expected: usize,
    },

    /// Adjacent steps disagree on a value kind at one position.
    #[error(
        "steps {first} and {second} disagree at position {position}: {produced} != {expected}"
    )]
    KindMismatch {
        /// Index of the producing step.
        first: usize,
        /// Index of the consuming step.
        second: usize,
        /// Offending position in the value sequence.
        position: usize,
        /// Kind the producing step emits at that position.
        produced: ValueKind,
        /// Kind the consuming step expects at that position.
        expected: ValueKind,
    },

    /// A callable's signature cannot carry the policy's failure signal.
    #[error("callable {signature} cannot signal failure: {reason}")]
    FailureSignal {
        /// Rendered signature of the offending callable.
        signature: String,
        /// Why the policy rejected it.
        reason: String,
    },

    /// Wraps an error with the index of the step it originated from.
    #[error("step {step}: {source}")]
    AtStep {
        /// Index of the offending step.
        step: usize,
        /// Underlying cause.
        #[source]
        source: Box<ComposeError>,
    },
}

impl ComposeError {
    /// Wraps `self` with the index of the step it originated from.
    pub fn at_step(self, step: usize) -> Self {
        Self::AtStep {
            step,
            source: Box::new(self),
        }
    }
}
