//! Tagged runtime values exchanged between callables.
//!
//! Trenza composes callables whose arities and types are only known at
//! graph-construction time, so values travel as a discriminated union with
//! a runtime kind tag. The signature matcher compares [`ValueKind`] tags
//! per position; actual payloads are only touched by the callables
//! themselves.

use std::fmt;

/// The kind tag of a [`Value`].
///
/// Positional compatibility between two callables compares kinds for
/// equality, one position at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// 64-bit signed integer.
    Int,
    /// 64-bit float.
    Float,
    /// 32-bit float.
    Float32,
    /// Boolean.
    Bool,
    /// Owned string.
    Str,
    /// Heterogeneous list of values.
    List,
    /// Failure-signal slot used by error-propagating chains.
    Fault,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Float32 => "float32",
            Self::Bool => "bool",
            Self::Str => "str",
            Self::List => "list",
            Self::Fault => "fault",
        };
        write!(f, "{name}")
    }
}

/// A runtime value carrying its own kind tag.
///
/// `Fault` is the failure-signal representation: `None` means "no failure"
/// (the empty signal appended on success), `Some(message)` means a step
/// has failed and the chain must short-circuit.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// 32-bit float.
    Float32(f32),
    /// Boolean.
    Bool(bool),
    /// Owned string.
    Str(String),
    /// Heterogeneous list of values.
    List(Vec<Value>),
    /// Failure signal: `None` = success, `Some(message)` = failure.
    Fault(Option<String>),
}

impl Value {
    /// Returns the kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Float32(_) => ValueKind::Float32,
            Self::Bool(_) => ValueKind::Bool,
            Self::Str(_) => ValueKind::Str,
            Self::List(_) => ValueKind::List,
            Self::Fault(_) => ValueKind::Fault,
        }
    }

    /// Returns the zero value for a kind.
    ///
    /// Used by error-propagating chains to fill the real output positions
    /// of a short-circuited result.
    pub fn zero(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Int => Self::Int(0),
            ValueKind::Float => Self::Float(0.0),
            ValueKind::Float32 => Self::Float32(0.0),
            ValueKind::Bool => Self::Bool(false),
            ValueKind::Str => Self::Str(String::new()),
            ValueKind::List => Self::List(Vec::new()),
            ValueKind::Fault => Self::Fault(None),
        }
    }

    /// Builds a raised failure signal with the given message.
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault(Some(message.into()))
    }

    /// Returns the integer payload, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the float payload, if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the 32-bit float payload, if this is a `Float32`.
    pub fn as_float32(&self) -> Option<f32> {
        match self {
            Self::Float32(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the list payload, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the failure message, if this is a raised `Fault`.
    pub fn fault_message(&self) -> Option<&str> {
        match self {
            Self::Fault(Some(msg)) => Some(msg),
            _ => None,
        }
    }

    /// Returns `true` if this value is a raised failure signal.
    pub fn is_raised(&self) -> bool {
        matches!(self, Self::Fault(Some(_)))
    }
}
