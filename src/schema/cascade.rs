//! Sequential refinement.
//!
//! [`cascade`] validates a value with a primary validator, then checks the
//! result with refinement validators. In coercion mode the primary
//! validator's coercions are committed for as long as the refinements run, so
//! they observe the coerced value, and reverted afterwards. They only reach
//! the parent's coercion list once every refinement has passed.

use tracing::trace;

use crate::coercion::{Cell, CoercionEntry, ProvisionalCommit};
use crate::state::State;
use crate::value::Value;

use super::traits::{impl_into_validator, IntoValidator, Predicate, Validator};

/// A validator followed by refinements that never coerce.
///
/// # Example
///
/// ```rust
/// use sentinel::{as_type, cascade, is_at_least, is_number, AsOptions, IntoValidator, Value};
///
/// let port = cascade(is_number(), [is_at_least(1024.0).into_validator()]);
/// let options = AsOptions { coerce: true, errors: true };
///
/// let value = as_type(&Value::from("8080"), &port, options).into_result().unwrap();
/// assert_eq!(value, Value::from(8080));
///
/// let rejected = as_type(&Value::from("80"), &port, options).into_result();
/// assert!(rejected.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CascadeValidator {
    spec: Validator,
    followups: Vec<Validator>,
}

/// Creates a validator running `followups` on the value `spec` accepted.
pub fn cascade(
    spec: impl IntoValidator,
    followups: impl IntoIterator<Item = Validator>,
) -> CascadeValidator {
    CascadeValidator {
        spec: spec.into_validator(),
        followups: followups.into_iter().collect(),
    }
}

/// Alias of [`cascade`].
pub fn apply_cascade(
    spec: impl IntoValidator,
    followups: impl IntoIterator<Item = Validator>,
) -> CascadeValidator {
    cascade(spec, followups)
}

impl CascadeValidator {
    /// Runs every refinement in collect mode, stopping at the first failure
    /// otherwise.
    fn followups_pass(&self, value: &Value, state: &mut State<'_>) -> bool {
        let mut valid = true;
        for followup in &self.followups {
            valid = followup.test(value, state) && valid;
            if state.should_stop(valid) {
                break;
            }
        }
        valid
    }
}

impl Predicate for CascadeValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        if !state.is_coercing() {
            return self.spec.test(value, state) && self.followups_pass(value, state);
        }

        let scratch = Cell::new(value.clone());
        let mut staged: Vec<CoercionEntry> = Vec::new();
        if !self.spec.test(value, &mut state.stage(Some(scratch.slot()), &mut staged)) {
            return false;
        }

        let (resolved, passed) = {
            let _commit = ProvisionalCommit::apply(&staged);
            let resolved = scratch.get();
            let passed = self.followups_pass(&resolved, &mut state.readonly());
            (resolved, passed)
        };
        if !passed {
            trace!(staged = staged.len(), "refinement failed; discarding coercions");
            return false;
        }

        if !resolved.strict_eq(value) && !state.propose(resolved) {
            return false;
        }
        state.push_coercions(
            staged
                .into_iter()
                .filter(|entry| !entry.coercion.slot().targets_cell(&scratch)),
        );
        true
    }
}

impl_into_validator!(CascadeValidator);
