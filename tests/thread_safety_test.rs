//! Tests for sharing validators across threads.

use sentinel::{
    as_type, is_array, is_boolean, is_number, is_object, is_string, AsOptions, IntoValidator,
    Predicate, Validator, Value,
};
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn user() -> Validator {
    is_object()
        .field("name", is_string())
        .field("age", is_number())
        .field("flags", is_array(is_boolean()))
        .into_validator()
}

#[test]
fn test_concurrent_validation() {
    let validator = Arc::new(user());

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                let input = Value::from(json!({
                    "name": format!("User{}", i),
                    "age": 20 + i,
                    "flags": [true],
                }));
                assert!(validator.check(&input));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_coercion_on_independent_inputs() {
    let validator = user();
    let options = AsOptions {
        coerce: true,
        errors: true,
    };

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let validator = validator.clone();
            thread::spawn(move || {
                let input = Value::from(json!({
                    "name": "x",
                    "age": i.to_string(),
                    "flags": ["1", "0"],
                }));
                let value = as_type(&input, &validator, options).into_result().unwrap();
                assert_eq!(
                    value.to_json(),
                    json!({"name": "x", "age": i, "flags": [true, false]})
                );
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_check_batch() {
    let validator = is_number().into_validator();
    let values: Vec<Value> = (0..100)
        .map(|i| {
            if i % 3 == 0 {
                Value::from("x")
            } else {
                Value::from(i)
            }
        })
        .collect();

    let results = validator.check_batch(&values);
    assert_eq!(results.len(), 100);
    for (i, ok) in results.into_iter().enumerate() {
        assert_eq!(ok, i % 3 != 0);
    }
}

#[test]
fn test_validators_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Validator>();
    assert_send_sync::<Value>();
}
