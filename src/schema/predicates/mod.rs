//! Refinement predicates.
//!
//! These validators narrow an already-typed value: bounds on numbers,
//! lengths of strings and collections, string formats and key presence on
//! objects. None of them coerces; they are typically chained after a type
//! validator with [`cascade`](super::cascade).

mod keys;
mod length;
mod number;
mod text;

pub use keys::{
    has_forbidden_keys, has_key_relationship, has_mutually_exclusive_keys, has_required_keys,
    KeyRelationship, KeyRelationshipValidator, KeysValidator,
};
pub use length::{
    has_exact_length, has_max_length, has_min_length, has_unique_items, LengthValidator,
    UniqueItemsValidator,
};
pub use number::{
    is_at_least, is_at_most, is_in_exclusive_range, is_in_inclusive_range, is_integer,
    is_negative, is_positive, IntegerValidator, NumberBound,
};
pub use text::{
    is_base64, is_hex_color, is_iso8601, is_json, is_lower_case, is_upper_case, is_uuid4,
    matches_regex, JsonValidator, StringFormat,
};
