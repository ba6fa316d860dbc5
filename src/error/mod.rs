//! Error types raised by the assertion helpers.
//!
//! Validators themselves never fail with an error value: they return `false`
//! and optionally push messages into the traversal state. Only the helpers in
//! [`crate::assert`] turn a rejection into a [`TypeAssertionError`].

mod assertion_error;

pub use assertion_error::TypeAssertionError;
