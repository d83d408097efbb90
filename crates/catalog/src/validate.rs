//! Validation layer.
//!
//! Checks a raw JSON body against an [`EntitySchema`] and produces either a
//! normalized object (strings trimmed, defaults applied, emails lowercased) or
//! the full ordered list of field violations. Purely structural: no storage
//! lookups, no cross-entity checks.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use pulse_core::{Email, FieldErrors};

use crate::schema::{EntitySchema, FieldKind, FieldRule, TextFormat};

// scheme ":" rest, as in RFC 3986 absolute URIs.
static URI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s]+$").expect("uri pattern is valid")
});

/// Validate `input` against `schema`.
///
/// Violations are collected in schema order, followed by one entry per unknown
/// key. Stored-only fields (such as a contact's status) count as unknown.
pub fn check(schema: &EntitySchema, input: &Value) -> Result<Map<String, Value>, FieldErrors> {
    let Some(object) = input.as_object() else {
        return Err(FieldErrors::single("\"value\" must be of type object"));
    };

    let mut errors = FieldErrors::new();
    let mut normalized = Map::new();

    for rule in schema.input_fields() {
        match object.get(rule.name) {
            None => {
                if let Some(default) = rule.default {
                    normalized.insert(rule.name.to_string(), Value::String(default.to_string()));
                } else if rule.required {
                    errors.push(format!("\"{}\" is required", rule.name));
                }
            }
            Some(value) => {
                if let Some(v) = check_field(rule, value, &mut errors) {
                    normalized.insert(rule.name.to_string(), v);
                }
            }
        }
    }

    for key in object.keys() {
        let accepted = schema.field(key).is_some_and(|f| f.accepts_input);
        if !accepted {
            errors.push(format!("\"{key}\" is not allowed"));
        }
    }

    errors.into_result(normalized)
}

fn check_field(rule: &FieldRule, value: &Value, errors: &mut FieldErrors) -> Option<Value> {
    match rule.kind {
        FieldKind::Text { min, max, format } => {
            check_text(rule.name, value, min, max, format, errors).map(Value::String)
        }
        FieldKind::PositiveNumber => {
            let Some(n) = value.as_f64() else {
                errors.push(format!("\"{}\" must be a number", rule.name));
                return None;
            };
            if n > 0.0 {
                Some(value.clone())
            } else {
                errors.push(format!("\"{}\" must be a positive number", rule.name));
                None
            }
        }
        FieldKind::TextList {
            max_items,
            max_item_len,
        } => {
            let Some(items) = value.as_array() else {
                errors.push(format!("\"{}\" must be an array", rule.name));
                return None;
            };
            let before = errors.len();
            if items.len() > max_items {
                errors.push(format!(
                    "\"{}\" must contain less than or equal to {max_items} items",
                    rule.name
                ));
            }
            let cleaned: Vec<Value> = items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    let label = format!("{}[{i}]", rule.name);
                    check_text(&label, item, 1, max_item_len, TextFormat::Plain, errors)
                })
                .map(Value::String)
                .collect();
            (errors.len() == before).then_some(Value::Array(cleaned))
        }
        FieldKind::Choice { .. } => {
            errors.push(format!("\"{}\" is not allowed", rule.name));
            None
        }
    }
}

fn check_text(
    label: &str,
    value: &Value,
    min: usize,
    max: usize,
    format: TextFormat,
    errors: &mut FieldErrors,
) -> Option<String> {
    let Some(raw) = value.as_str() else {
        errors.push(format!("\"{label}\" must be a string"));
        return None;
    };
    if raw.contains('\0') {
        errors.push(format!("\"{label}\" must not contain null characters"));
        return None;
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push(format!("\"{label}\" is not allowed to be empty"));
        return None;
    }

    let len = trimmed.chars().count();
    if len < min {
        errors.push(format!("\"{label}\" length must be at least {min} characters long"));
        return None;
    }
    if len > max {
        errors.push(format!(
            "\"{label}\" length must be less than or equal to {max} characters long"
        ));
        return None;
    }

    match format {
        TextFormat::Plain => Some(trimmed.to_string()),
        TextFormat::Email => match Email::parse(trimmed) {
            Ok(email) => Some(email.into()),
            Err(_) => {
                errors.push(format!("\"{label}\" must be a valid email"));
                None
            }
        },
        TextFormat::Uri => {
            if URI_PATTERN.is_match(trimmed) {
                Some(trimmed.to_string())
            } else {
                errors.push(format!("\"{label}\" must be a valid uri"));
                None
            }
        }
    }
}
