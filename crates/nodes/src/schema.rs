//! Declarative input/output schemas.
//!
//! A [`Schema`] is a flat list of named fields, each with a kind, an
//! optional default and a set of constraints. Validation:
//! - rejects anything that is not a JSON object,
//! - fills defaults for absent fields,
//! - coerces integral floats (`5.0`) to integers for `Integer` fields,
//! - drops keys the schema does not declare,
//! - reports *every* failing field, not just the first.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Field kinds and constraints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Integer,
    Number,
    String,
    Boolean,
    Array,
    Object,
    Any,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::Number  => write!(f, "number"),
            Self::String  => write!(f, "string"),
            Self::Boolean => write!(f, "boolean"),
            Self::Array   => write!(f, "array"),
            Self::Object  => write!(f, "object"),
            Self::Any     => write!(f, "any"),
        }
    }
}

/// Bounds applied after the kind check. Numeric bounds are inclusive;
/// length bounds count characters for strings and items for arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Constraint {
    Minimum(f64),
    Maximum(f64),
    MinLength(usize),
    MaxLength(usize),
    OneOf(Vec<Value>),
}

impl Constraint {
    fn check(&self, value: &Value) -> Option<String> {
        match self {
            Self::Minimum(min) => match value.as_f64() {
                Some(n) if n < *min => Some(format!("must be greater than or equal to {min}")),
                _ => None,
            },
            Self::Maximum(max) => match value.as_f64() {
                Some(n) if n > *max => Some(format!("must be less than or equal to {max}")),
                _ => None,
            },
            Self::MinLength(min) => match length_of(value) {
                Some(len) if len < *min => Some(format!("length must be at least {min}")),
                _ => None,
            },
            Self::MaxLength(max) => match length_of(value) {
                Some(len) if len > *max => Some(format!("length must be at most {max}")),
                _ => None,
            },
            Self::OneOf(allowed) => {
                if allowed.contains(value) {
                    None
                } else {
                    Some(format!("must be one of {}", Value::Array(allowed.clone())))
                }
            }
        }
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// FieldSpec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: None,
            constraints: Vec::new(),
            description: None,
        }
    }

    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    /// Value used when the field is absent; makes the field optional.
    pub fn with_default(mut self, default: Value) -> Self {
        self.required = false;
        self.default = Some(default);
        self
    }

    pub fn min(self, min: f64) -> Self {
        self.constraint(Constraint::Minimum(min))
    }

    pub fn max(self, max: f64) -> Self {
        self.constraint(Constraint::Maximum(max))
    }

    pub fn min_length(self, len: usize) -> Self {
        self.constraint(Constraint::MinLength(len))
    }

    pub fn max_length(self, len: usize) -> Self {
        self.constraint(Constraint::MaxLength(len))
    }

    pub fn one_of(self, allowed: Vec<Value>) -> Self {
        self.constraint(Constraint::OneOf(allowed))
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Kind check with integer coercion. Returns the value to keep.
    fn coerce(&self, value: &Value) -> Result<Value, String> {
        let ok = match self.kind {
            FieldKind::Integer => {
                if value.is_i64() || value.is_u64() {
                    true
                } else if let Some(f) = value.as_f64() {
                    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                        return Ok(Value::from(f as i64));
                    }
                    false
                } else {
                    false
                }
            }
            FieldKind::Number  => value.is_number(),
            FieldKind::String  => value.is_string(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Array   => value.is_array(),
            FieldKind::Object  => value.is_object(),
            FieldKind::Any     => true,
        };
        if ok {
            Ok(value.clone())
        } else {
            Err(format!("expected {}, got {}", self.kind, type_name(value)))
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Validate `value` and return the normalized object.
    ///
    /// # Errors
    /// [`ValidationErrors`] listing every field that failed.
    pub fn validate(&self, value: &Value) -> Result<Map<String, Value>, ValidationErrors> {
        let Some(object) = value.as_object() else {
            return Err(ValidationErrors::single(
                "body",
                format!("expected object, got {}", type_name(value)),
            ));
        };

        let mut out = Map::new();
        let mut errors = Vec::new();

        for field in &self.fields {
            match object.get(&field.name).filter(|v| !v.is_null()) {
                None => {
                    if let Some(default) = &field.default {
                        out.insert(field.name.clone(), default.clone());
                    } else if field.required {
                        errors.push(FieldError::new(&field.name, "field required"));
                    }
                }
                Some(raw) => match field.coerce(raw) {
                    Ok(coerced) => {
                        let failures: Vec<String> =
                            field.constraints.iter().filter_map(|c| c.check(&coerced)).collect();
                        if failures.is_empty() {
                            out.insert(field.name.clone(), coerced);
                        } else {
                            errors.extend(failures.into_iter().map(|m| FieldError::new(&field.name, m)));
                        }
                    }
                    Err(message) => errors.push(FieldError::new(&field.name, message)),
                },
            }
        }

        if errors.is_empty() {
            Ok(out)
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field-level failure found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, message)])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================
// Unit tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number_schema() -> Schema {
        Schema::new().field(FieldSpec::required("number", FieldKind::Integer).min(0.0))
    }

    #[test]
    fn valid_input_passes_through() {
        let out = number_schema().validate(&json!({ "number": 5 })).unwrap();
        assert_eq!(Value::Object(out), json!({ "number": 5 }));
    }

    #[test]
    fn missing_required_field_is_reported() {
        let err = number_schema().validate(&json!({})).unwrap_err();
        assert_eq!(err.0, vec![FieldError::new("number", "field required")]);
    }

    #[test]
    fn null_counts_as_missing() {
        let err = number_schema().validate(&json!({ "number": null })).unwrap_err();
        assert_eq!(err.0[0].message, "field required");
    }

    #[test]
    fn wrong_kind_is_reported() {
        let err = number_schema().validate(&json!({ "number": "five" })).unwrap_err();
        assert_eq!(err.0[0].message, "expected integer, got string");
    }

    #[test]
    fn integral_float_is_coerced() {
        let out = number_schema().validate(&json!({ "number": 5.0 })).unwrap();
        assert_eq!(out["number"], json!(5));
        assert!(number_schema().validate(&json!({ "number": 5.5 })).is_err());
    }

    #[test]
    fn floats_outside_i64_are_not_integers() {
        let schema = Schema::new().field(FieldSpec::required("x", FieldKind::Integer));

        let err = schema.validate(&json!({ "x": 9223372036854775808.0 })).unwrap_err();
        assert_eq!(err.0[0].message, "expected integer, got number");

        let out = schema.validate(&json!({ "x": -9223372036854775808.0 })).unwrap();
        assert_eq!(out["x"], json!(i64::MIN));
    }

    #[test]
    fn minimum_is_inclusive() {
        assert!(number_schema().validate(&json!({ "number": 0 })).is_ok());
        let err = number_schema().validate(&json!({ "number": -1 })).unwrap_err();
        assert!(err.0[0].message.contains("greater than or equal to 0"));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = number_schema().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.0[0].field, "body");
    }

    #[test]
    fn defaults_fill_absent_fields_and_extras_are_dropped() {
        let schema = Schema::new()
            .field(FieldSpec::optional("greeting", FieldKind::String).with_default(json!("hi")))
            .field(FieldSpec::optional("loud", FieldKind::Boolean));
        let out = schema.validate(&json!({ "unknown": 1 })).unwrap();
        assert_eq!(Value::Object(out), json!({ "greeting": "hi" }));
    }

    #[test]
    fn all_failures_are_collected() {
        let schema = Schema::new()
            .field(FieldSpec::required("name", FieldKind::String).min_length(3))
            .field(FieldSpec::required("mode", FieldKind::String).one_of(vec![json!("a"), json!("b")]))
            .field(FieldSpec::required("count", FieldKind::Integer));
        let err = schema
            .validate(&json!({ "name": "ab", "mode": "c" }))
            .unwrap_err();
        let fields: Vec<&str> = err.fields().collect();
        assert_eq!(fields, vec!["name", "mode", "count"]);
        assert_eq!(err.to_string().matches("; ").count(), 2);
    }

    #[test]
    fn schema_serializes_for_discovery() {
        let json = serde_json::to_value(number_schema()).unwrap();
        assert_eq!(
            json,
            json!({ "fields": [{
                "name": "number",
                "kind": "integer",
                "required": true,
                "constraints": [{ "kind": "minimum", "value": 0.0 }]
            }] })
        );
    }
}
