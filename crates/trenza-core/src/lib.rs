//! Trenza Core - callable model and composition primitives
//!
//! This crate provides the foundational building blocks for composing
//! independent units of computation into pipelines, checked positionally
//! at construction time.
//!
//! # Core Abstractions
//!
//! ## Values
//!
//! - [`Value`] - Tagged runtime value ([`ValueKind`] discriminant)
//!
//! ## Callables
//!
//! - [`Callable`] - Object-safe trait: declared input/output kind
//!   sequences plus `call(Vec<Value>) -> Vec<Value>`
//! - [`native`] - Wraps a closure and its signature into a [`CallableRef`]
//! - [`same_callable`] - Identity comparison (allocation, not signature)
//!
//! ## Composition
//!
//! - [`stack`] - Independent, position-concatenating composition
//! - [`chain`] - Sequential, type-checked composition
//! - [`chain_with_error`] - Sequential composition with short-circuiting
//!   failure propagation via a pluggable [`FailurePolicy`]
//! - [`can_chain`] / [`can_chain_with_error`] - Pre-flight validation
//!   without synthesis
//!
//! # Example
//!
//! ```rust
//! use trenza_core::{ValueKind, Value, chain, native};
//!
//! let double = native([ValueKind::Int], [ValueKind::Int], |args| {
//!     vec![Value::Int(args[0].as_int().unwrap() * 2)]
//! });
//! let add_one = native([ValueKind::Int], [ValueKind::Int], |args| {
//!     vec![Value::Int(args[0].as_int().unwrap() + 1)]
//! });
//!
//! let pipeline = chain(&[double, add_one]).unwrap();
//! assert_eq!(pipeline.call(vec![Value::Int(20)]), vec![Value::Int(41)]);
//! ```
//!
//! # Design Principles
//!
//! - **Construction-time checking**: signature mismatches surface when a
//!   composition is built, never mid-execution
//! - **Identity over structure**: two callables are the same node only if
//!   they share an allocation
//! - **Failures as data**: runtime failures travel as
//!   [`Value::Fault`] values through error-propagating chains, not as
//!   raised faults

pub mod callable;
pub mod chain;
pub mod error;
pub mod fallible;
pub mod signature;
pub mod stack;
pub mod value;

// Re-export main types at crate root
pub use callable::{Callable, CallableRef, NativeFn, native, same_callable, signature_of};
pub use chain::chain;
pub use error::ComposeError;
pub use fallible::{FailurePolicy, LastFault, can_chain_with_error, chain_with_error};
pub use signature::can_chain;
pub use stack::stack;
pub use value::{Value, ValueKind};
