//! Declarative shape validation for gateway config and call options.
//!
//! A [`Schema`] describes the fields a JSON value must carry. Validation is a
//! pure function of (shape, value): it returns a normalized copy of the value
//! (unknown fields stripped, unless the shape is marked pass-through) or a
//! [`ValidationError`] naming every offending field.

use serde_json::{Map, Value};

use crate::errors::{FieldIssue, ValidationError};

/// The type/constraint a declared field must satisfy.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Any string.
    Text,
    /// A whole number (floats and numeric strings are rejected).
    Integer,
    /// A whole number strictly greater than zero, e.g. an amount.
    PositiveInteger,
    Boolean,
    /// An absolute URL.
    Url,
    /// An object whose values are all strings, for free-form custom fields.
    TextMap,
    /// A nested object with its own shape.
    Object(Schema),
}

#[derive(Debug, Clone)]
struct Field {
    name: &'static str,
    kind: FieldKind,
    required: bool,
}

/// A declared shape: named, typed fields with explicit optionality.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
    passthrough: bool,
}

impl Schema {
    pub fn object() -> Self {
        Self::default()
    }

    /// Starts a shape from an existing base, so provider shapes add their own
    /// fields without re-declaring the shared ones.
    pub fn extending(base: &Schema) -> Self {
        base.clone()
    }

    pub fn field(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(Field {
            name,
            kind,
            required: true,
        });
        self
    }

    pub fn optional(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(Field {
            name,
            kind,
            required: false,
        });
        self
    }

    /// Marks this shape as accepting unknown fields, which are carried into
    /// the normalized value untouched. Only call options that forward
    /// provider-specific extras use this; config shapes stay strict.
    pub fn passthrough(mut self) -> Self {
        self.passthrough = true;
        self
    }

    pub fn validate(&self, value: &Value) -> Result<Value, ValidationError> {
        let mut issues = Vec::new();
        let normalized = self.check_object(None, value, &mut issues);
        if issues.is_empty() {
            Ok(normalized.unwrap_or(Value::Object(Map::new())))
        } else {
            Err(ValidationError::new(issues))
        }
    }

    fn check_object(
        &self,
        prefix: Option<&str>,
        value: &Value,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<Value> {
        let object = match value.as_object() {
            Some(object) => object,
            None => {
                issues.push(FieldIssue::new(
                    prefix.unwrap_or("(root)"),
                    "must be an object",
                ));
                return None;
            }
        };

        let mut out = Map::new();
        for field in &self.fields {
            let path = join_path(prefix, field.name);
            match object.get(field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        issues.push(FieldIssue::new(path, "is required"));
                    }
                }
                Some(value) => {
                    if let Some(normalized) = check_kind(&path, &field.kind, value, issues) {
                        out.insert(field.name.to_owned(), normalized);
                    }
                }
            }
        }

        for (name, value) in object {
            if self.fields.iter().any(|field| field.name == name) {
                continue;
            }
            if self.passthrough {
                out.insert(name.clone(), value.clone());
            } else {
                issues.push(FieldIssue::new(
                    join_path(prefix, name),
                    "is not a recognized field",
                ));
            }
        }

        Some(Value::Object(out))
    }
}

fn check_kind(
    path: &str,
    kind: &FieldKind,
    value: &Value,
    issues: &mut Vec<FieldIssue>,
) -> Option<Value> {
    match kind {
        FieldKind::Text => {
            if value.is_string() {
                return Some(value.clone());
            }
            issues.push(FieldIssue::new(path, "must be a string"));
        }
        FieldKind::Integer => {
            if value.as_i64().is_some() || value.as_u64().is_some() {
                return Some(value.clone());
            }
            issues.push(FieldIssue::new(path, "must be a whole number"));
        }
        FieldKind::PositiveInteger => match value.as_u64() {
            Some(n) if n > 0 => return Some(value.clone()),
            _ => issues.push(FieldIssue::new(path, "must be a positive integer")),
        },
        FieldKind::Boolean => {
            if value.is_boolean() {
                return Some(value.clone());
            }
            issues.push(FieldIssue::new(path, "must be a boolean"));
        }
        FieldKind::Url => match value.as_str().map(url::Url::parse) {
            Some(Ok(parsed)) if parsed.has_host() => return Some(value.clone()),
            _ => issues.push(FieldIssue::new(path, "must be an absolute URL")),
        },
        FieldKind::TextMap => match value.as_object() {
            Some(map) if map.values().all(Value::is_string) => return Some(value.clone()),
            _ => issues.push(FieldIssue::new(path, "must be a map of strings")),
        },
        FieldKind::Object(schema) => {
            return schema.check_object(Some(path), value, issues);
        }
    }
    None
}

fn join_path(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{name}"),
        None => name.to_owned(),
    }
}

/// Recursively merges `overrides` on top of `defaults`, with `overrides`
/// winning on conflicts. Objects merge key by key; everything else replaces.
pub fn merge_defaults(defaults: Value, overrides: Value) -> Value {
    match (defaults, overrides) {
        (Value::Object(mut base), Value::Object(over)) => {
            for (key, value) in over {
                let merged = match base.remove(&key) {
                    Some(existing) => merge_defaults(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, overrides) => overrides,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn credentials() -> Schema {
        Schema::object()
            .field("merchantId", FieldKind::Text)
            .optional("sandbox", FieldKind::Boolean)
    }

    #[test]
    fn accepts_matching_values_and_strips_nothing_declared() {
        let normalized = credentials()
            .validate(&json!({"merchantId": "1234", "sandbox": true}))
            .unwrap();
        assert_eq!(normalized, json!({"merchantId": "1234", "sandbox": true}));
    }

    #[test]
    fn reports_missing_required_fields_by_name() {
        let error = credentials().validate(&json!({"sandbox": false})).unwrap_err();
        assert_eq!(error.issues.len(), 1);
        assert_eq!(error.issues[0].path, "merchantId");
    }

    #[test]
    fn reports_type_mismatches_with_reasons() {
        let error = credentials()
            .validate(&json!({"merchantId": 1234}))
            .unwrap_err();
        assert_eq!(error.issues[0].reason, "must be a string");
    }

    #[test]
    fn rejects_unknown_fields_on_strict_shapes() {
        let error = credentials()
            .validate(&json!({"merchantId": "1234", "apiKey": "nope"}))
            .unwrap_err();
        assert_eq!(error.issues[0].path, "apiKey");
    }

    #[test]
    fn passthrough_shapes_keep_extras() {
        let shape = Schema::object()
            .field("amount", FieldKind::PositiveInteger)
            .passthrough();
        let normalized = shape
            .validate(&json!({"amount": 20000, "customField": "kept"}))
            .unwrap();
        assert_eq!(normalized["customField"], json!("kept"));
    }

    #[test]
    fn extending_keeps_base_fields() {
        let extended = Schema::extending(&credentials()).optional("mobile", FieldKind::Text);
        let error = extended.validate(&json!({"mobile": "0912"})).unwrap_err();
        assert_eq!(error.issues[0].path, "merchantId");
    }

    #[test]
    fn nested_failures_carry_dotted_paths() {
        let shape = Schema::object().field(
            "links",
            FieldKind::Object(Schema::object().field("request", FieldKind::Url)),
        );
        let error = shape
            .validate(&json!({"links": {"request": "not a url"}}))
            .unwrap_err();
        assert_eq!(error.issues[0].path, "links.request");
    }

    #[test]
    fn positive_integer_rejects_zero_and_floats() {
        let shape = Schema::object().field("amount", FieldKind::PositiveInteger);
        assert!(shape.validate(&json!({"amount": 0})).is_err());
        assert!(shape.validate(&json!({"amount": 20.5})).is_err());
        assert!(shape.validate(&json!({"amount": "20000"})).is_err());
        assert!(shape.validate(&json!({"amount": 20000})).is_ok());
    }

    #[test]
    fn merge_defaults_is_deep_and_caller_wins() {
        let merged = merge_defaults(
            json!({"links": {"request": "https://a/r", "verify": "https://a/v"}, "sandbox": false}),
            json!({"links": {"request": "https://b/r"}, "merchantId": "m"}),
        );
        assert_eq!(
            merged,
            json!({
                "links": {"request": "https://b/r", "verify": "https://a/v"},
                "sandbox": false,
                "merchantId": "m",
            })
        );
    }
}
