//! Composition capability handed to the compiler.
//!
//! The compiler folds layers with whatever [`CompositionOps`] it is
//! given, so error-propagating chaining can be substituted for plain
//! chaining without touching the compiler itself.

use trenza_core::{
    CallableRef, ComposeError, FailurePolicy, LastFault, chain, chain_with_error, stack,
};

/// The stacking and chaining operations the compiler composes layers
/// with.
pub trait CompositionOps {
    /// Independent, position-concatenating composition.
    fn stack(&self, steps: &[CallableRef]) -> Result<CallableRef, ComposeError>;

    /// Sequential composition.
    fn chain(&self, steps: &[CallableRef]) -> Result<CallableRef, ComposeError>;
}

/// Plain composition: all output values propagate unconditionally.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllValues;

impl CompositionOps for AllValues {
    fn stack(&self, steps: &[CallableRef]) -> Result<CallableRef, ComposeError> {
        stack(steps)
    }

    fn chain(&self, steps: &[CallableRef]) -> Result<CallableRef, ComposeError> {
        chain(steps)
    }
}

/// Error-propagating composition: chaining short-circuits on the
/// policy's failure signal.
#[derive(Clone, Copy, Debug, Default)]
pub struct Propagate<P> {
    policy: P,
}

impl<P: FailurePolicy + Clone + 'static> Propagate<P> {
    /// Wraps a failure policy into a composition capability.
    pub fn new(policy: P) -> Self {
        Self { policy }
    }
}

impl Propagate<LastFault> {
    /// The default policy: every step's last output is the failure
    /// signal.
    pub fn last_fault() -> Self {
        Self::new(LastFault)
    }
}

impl<P: FailurePolicy + Clone + 'static> CompositionOps for Propagate<P> {
    fn stack(&self, steps: &[CallableRef]) -> Result<CallableRef, ComposeError> {
        stack(steps)
    }

    fn chain(&self, steps: &[CallableRef]) -> Result<CallableRef, ComposeError> {
        chain_with_error(self.policy.clone(), steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trenza_core::{Value, ValueKind, native};

    #[test]
    fn all_values_chain_matches_plain_chain() {
        let inc = native([ValueKind::Int], [ValueKind::Int], |args| {
            vec![Value::Int(args[0].as_int().unwrap() + 1)]
        });
        let chained = AllValues.chain(&[inc.clone(), inc]).unwrap();
        assert_eq!(chained.call(vec![Value::Int(0)]), vec![Value::Int(2)]);
    }

    #[test]
    fn propagate_chain_requires_fault_signatures() {
        let inc = native([ValueKind::Int], [ValueKind::Int], |args| {
            vec![Value::Int(args[0].as_int().unwrap() + 1)]
        });
        let err = Propagate::last_fault().chain(&[inc]).unwrap_err();
        assert!(matches!(err, ComposeError::AtStep { step: 0, .. }));
    }

    #[test]
    fn propagate_chain_short_circuits() {
        let fails = native([], [ValueKind::Int, ValueKind::Fault], |_| {
            vec![Value::Int(7), Value::fault("nope")]
        });
        let never = native(
            [ValueKind::Int],
            [ValueKind::Int, ValueKind::Fault],
            |_| unreachable!("must be skipped"),
        );
        let chained = Propagate::last_fault().chain(&[fails, never]).unwrap();
        assert_eq!(
            chained.call(vec![]),
            vec![Value::Int(0), Value::fault("nope")]
        );
    }
}
