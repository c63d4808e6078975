//! Signature matcher: positional compatibility between callables.
//!
//! This is the static type-check gate every composition primitive runs
//! before synthesizing anything. It compares kind tags per position and
//! reports the first offending pair; it never mutates state.

use crate::callable::CallableRef;
use crate::error::ComposeError;
use crate::value::ValueKind;

/// Checks that one step's emitted kinds line up with the next step's
/// expected kinds, position by position.
pub(crate) fn match_adjacent(
    first: usize,
    second: usize,
    produced: &[ValueKind],
    expected: &[ValueKind],
) -> Result<(), ComposeError> {
    if produced.len() != expected.len() {
        return Err(ComposeError::ArityMismatch {
            first,
            second,
            produced: produced.len(),
            expected: expected.len(),
        });
    }
    for (position, (p, e)) in produced.iter().zip(expected.iter()).enumerate() {
        if p != e {
            return Err(ComposeError::KindMismatch {
                first,
                second,
                position,
                produced: *p,
                expected: *e,
            });
        }
    }
    Ok(())
}

/// Verifies that the sequence can be chained: each step's full output
/// kind sequence must match the next step's input kind sequence in
/// length and per-position kind.
///
/// Returns on the first mismatch, identifying the offending pair and
/// position. Rejects empty sequences.
pub fn can_chain(steps: &[CallableRef]) -> Result<(), ComposeError> {
    if steps.is_empty() {
        return Err(ComposeError::Empty);
    }
    for (i, pair) in steps.windows(2).enumerate() {
        match_adjacent(i, i + 1, pair[0].outputs(), pair[1].inputs())?;
    }
    Ok(())
}
