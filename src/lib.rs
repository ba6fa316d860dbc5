//! # Sentinel
//!
//! Composable runtime validators for untyped values, with path-qualified
//! error messages and reversible coercions.
//!
//! ## Overview
//!
//! A validator is a [`Predicate`] over a dynamic [`Value`]. Leaf validators
//! check primitives, composite validators recurse into arrays, tuples,
//! objects, records, sets and maps, and refinement predicates narrow values
//! that already have the right type. Composition is plain function calls:
//! every composite takes its children as [`IntoValidator`].
//!
//! A single call runs in one of three modes, selected by the [`State`] it
//! receives:
//!
//! - **fast-fail**: no error sink; validation stops at the first failure
//! - **error collection**: every failure is reported as `"<path>: <message>"`
//! - **coercion**: validators may propose reversible replacements (`"true"`
//!   becoming `true`, `"1,2"` becoming an array) that the caller commits
//!   once the whole tree has validated
//!
//! The helpers in [`assert`] wrap these modes into `Result`s.
//!
//! ## Example
//!
//! ```rust
//! use sentinel::{as_type, is_array, is_boolean, is_number, is_object, AsOptions, Predicate, Value};
//! use serde_json::json;
//!
//! let config = is_object()
//!     .field("port", is_number())
//!     .field("flags", is_array(is_boolean()));
//!
//! let input = Value::from(json!({"port": "8080", "flags": ["true", false]}));
//! assert_eq!(
//!     config.errors(&input),
//!     vec![
//!         r#".port: Expected a number (got "8080")"#,
//!         r#".flags[0]: Expected a boolean (got "true")"#,
//!     ]
//! );
//!
//! let options = AsOptions { coerce: true, errors: true };
//! let coerced = as_type(&input, &config, options).into_result().unwrap();
//! assert_eq!(coerced.to_json(), json!({"port": 8080, "flags": [true, false]}));
//! ```

pub mod assert;
pub mod coercion;
pub mod error;
pub mod path;
pub mod schema;
pub mod state;
pub mod value;

pub use assert::{
    as_type, assert_type, assert_with_errors, checked_fn, soft_assert, try_as_type, AsOptions,
    Rejection,
};
pub use coercion::{commit_all, Cell, Coercion, CoercionEntry, Slot};
pub use error::TypeAssertionError;
pub use path::PathKey;
pub use schema::*;
pub use state::State;
pub use value::{
    format_number, printable, printable_list, raw, Array, Map, Object, Set, Symbol, Value,
};
