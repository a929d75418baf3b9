//! Built-in demonstration actions.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::schema::{FieldKind, FieldSpec, Schema};
use crate::{NodeRegistry, RegistryError};

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FactorialInput {
    pub number: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FactorialOutput {
    pub result: u64,
}

pub fn factorial_input_schema() -> Schema {
    Schema::new().field(
        FieldSpec::required("number", FieldKind::Integer)
            .min(0.0)
            .describe("Non-negative integer to take the factorial of"),
    )
}

pub fn factorial_output_schema() -> Schema {
    Schema::new().field(FieldSpec::required("result", FieldKind::Integer))
}

/// `number!`, failing once the result no longer fits in a `u64` (from 21).
pub fn factorial(input: FactorialInput) -> anyhow::Result<FactorialOutput> {
    let result = (2..=input.number)
        .try_fold(1u64, |acc, k| acc.checked_mul(k))
        .ok_or_else(|| anyhow!("factorial of {} overflows a 64-bit integer", input.number))?;
    Ok(FactorialOutput { result })
}

/// Same computation, published under an explicit name.
pub fn factorial_node(input: FactorialInput) -> anyhow::Result<FactorialOutput> {
    factorial(input)
}

/// Register every built-in action: `compute_factorial` and `factorial`.
pub fn register_builtin(registry: &mut NodeRegistry) -> Result<(), RegistryError> {
    registry.register(
        Some("compute_factorial"),
        factorial_input_schema(),
        factorial_output_schema(),
        factorial_node,
    )?;
    registry.register(None, factorial_input_schema(), factorial_output_schema(), factorial)?;
    Ok(())
}

// ============================================================
// Unit tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeError;

    #[test]
    fn small_factorials() {
        let f = |n| factorial(FactorialInput { number: n }).unwrap().result;
        assert_eq!(f(0), 1);
        assert_eq!(f(1), 1);
        assert_eq!(f(5), 120);
        assert_eq!(f(20), 2_432_902_008_176_640_000);
    }

    #[test]
    fn overflow_is_an_error_not_a_wrap() {
        assert!(factorial(FactorialInput { number: 21 }).is_err());
    }

    #[test]
    fn both_names_are_published() {
        let mut reg = NodeRegistry::new();
        register_builtin(&mut reg).unwrap();
        assert_eq!(reg.names(), vec!["compute_factorial", "factorial"]);
    }

    #[test]
    fn negative_input_never_reaches_the_handler() {
        let mut reg = NodeRegistry::new();
        register_builtin(&mut reg).unwrap();
        let err = reg.get("factorial").unwrap().dispatch(br#"{"number":-3}"#).unwrap_err();
        assert!(matches!(err, NodeError::InvalidInput(_)));
    }

    #[test]
    fn float_input_is_coerced_before_the_handler() {
        let mut reg = NodeRegistry::new();
        register_builtin(&mut reg).unwrap();
        let out = reg.get("compute_factorial").unwrap().dispatch(br#"{"number":5.0}"#).unwrap();
        assert_eq!(out, serde_json::json!({ "result": 120 }));
    }
}
