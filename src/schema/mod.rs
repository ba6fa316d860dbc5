//! Validator factories.
//!
//! Every factory returns a concrete validator type implementing
//! [`Predicate`]. Composite validators accept anything implementing
//! [`IntoValidator`] and store it as a type-erased [`Validator`], so
//! validators of different types nest freely.
//!
//! Validators run in one of three modes, chosen by the [`State`] they are
//! given: fast-fail (no error sink), error collection, or coercion. In
//! coercion mode a validator may accept a value it would otherwise reject by
//! proposing a replacement; proposals are only applied once the whole tree
//! has validated.
//!
//! # Example
//!
//! ```rust
//! use sentinel::{is_array, is_number, is_object, is_string, Predicate, Value};
//! use serde_json::json;
//!
//! let user = is_object()
//!     .field("name", is_string())
//!     .field("scores", is_array(is_number()));
//!
//! assert!(user.check(&Value::from(json!({"name": "Alice", "scores": [1, 2]}))));
//! assert_eq!(
//!     user.errors(&Value::from(json!({"name": 1, "scores": [1, "x"]}))),
//!     vec![
//!         ".name: Expected a string (got 1)",
//!         r#".scores[1]: Expected a number (got "x")"#,
//!     ]
//! );
//! ```
//!
//! [`State`]: crate::state::State

mod array;
mod boolean;
mod cascade;
mod collections;
mod combinators;
mod date;
mod literal;
mod number;
mod object;
mod predicates;
mod record;
mod string;
mod traits;

pub use array::{is_array, is_tuple, ArrayValidator, Delimiter, TupleValidator};
pub use boolean::{is_boolean, BooleanValidator};
pub use cascade::{apply_cascade, cascade, CascadeValidator};
pub use collections::{is_map, is_set, MapValidator, SetValidator};
pub use combinators::{
    is_nullable, is_one_of, is_optional, is_unknown, NullableValidator, OneOfValidator,
    OptionalValidator, UnknownValidator,
};
pub use date::{is_date, DateValidator};
pub use literal::{is_enum_mapping, is_enum_values, is_literal, EnumValidator, LiteralValidator};
pub use number::{is_number, NumberValidator, MAX_SAFE_INTEGER};
pub use object::{is_object, is_partial, ObjectValidator};
pub use predicates::*;
pub use record::{is_dict, is_record, RecordValidator};
pub use string::{is_string, StringValidator};
pub use traits::{IntoValidator, Predicate, Validator};
