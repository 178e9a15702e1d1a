//! Configuration Binder
//!
//! Turns a [`ConfigSchema`] plus raw inputs into a [`BoundConfig`]. For
//! every field the first available source wins:
//!
//! ```text
//! file value  >  environment variable  >  default literal  >  zero value
//! ```
//!
//! Nested structures recurse field-by-field with the same rule. Values that
//! fail to parse produce a [`BindError`] naming the full field path, never a
//! silent zero. Binding is pure: the same three inputs always give the same
//! result.

use super::source::{Environment, RawConfig, lookup};
use hub_domain::error::{BindError, ValueOrigin};
use hub_domain::value_objects::{BoundConfig, ConfigSchema, Field, FieldKind, ScalarKind};
use serde_json::{Map, Number, Value, json};
use std::time::Duration;

/// Bind a schema against a component's configuration section and the environment
pub fn bind(
    schema: &ConfigSchema,
    raw: &RawConfig,
    env: &dyn Environment,
) -> Result<BoundConfig, BindError> {
    bind_table(schema, Some(raw.as_map()), env, "").map(BoundConfig::new)
}

fn bind_table(
    schema: &ConfigSchema,
    raw: Option<&Map<String, Value>>,
    env: &dyn Environment,
    prefix: &str,
) -> Result<Map<String, Value>, BindError> {
    let mut bound = Map::with_capacity(schema.len());
    for field in schema.fields() {
        let path = if prefix.is_empty() {
            field.key.to_string()
        } else {
            format!("{prefix}.{}", field.key)
        };
        let raw_value = raw.and_then(|table| lookup(table, field.key));

        let value = match &field.kind {
            FieldKind::Nested(nested) => {
                let table = match raw_value {
                    None => None,
                    Some(Value::Object(table)) => Some(table),
                    Some(other) => {
                        return Err(BindError::new(
                            path,
                            render(other),
                            ValueOrigin::File,
                            "expected a table",
                        ));
                    }
                };
                Value::Object(bind_table(nested, table, env, &path)?)
            }
            FieldKind::Scalar(_) | FieldKind::List(_) => bind_leaf(field, raw_value, env, &path)?,
        };
        bound.insert(field.key.to_string(), value);
    }
    Ok(bound)
}

fn bind_leaf(
    field: &Field,
    raw_value: Option<&Value>,
    env: &dyn Environment,
    path: &str,
) -> Result<Value, BindError> {
    if let Some(value) = raw_value {
        return parse_value(&field.kind, value)
            .map_err(|cause| BindError::new(path, render(value), ValueOrigin::File, cause));
    }

    if let Some(text) = field.env.and_then(|name| env.var(name)) {
        return parse_text(&field.kind, &text)
            .map_err(|cause| BindError::new(path, text.clone(), ValueOrigin::Environment, cause));
    }

    if let Some(literal) = field.default {
        return parse_text(&field.kind, literal)
            .map_err(|cause| BindError::new(path, literal, ValueOrigin::Default, cause));
    }

    Ok(zero_value(&field.kind))
}

/// Zero value of a field kind
pub fn zero_value(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::Scalar(ScalarKind::String) => Value::String(String::new()),
        FieldKind::Scalar(ScalarKind::Bool) => Value::Bool(false),
        FieldKind::Scalar(ScalarKind::Int | ScalarKind::UInt) => json!(0),
        FieldKind::Scalar(ScalarKind::Float) => json!(0.0),
        FieldKind::Scalar(ScalarKind::Duration) => duration_value(Duration::ZERO),
        FieldKind::List(_) => Value::Array(Vec::new()),
        FieldKind::Nested(schema) => Value::Object(
            schema
                .fields()
                .iter()
                .map(|field| (field.key.to_string(), zero_value(&field.kind)))
                .collect(),
        ),
    }
}

fn parse_value(kind: &FieldKind, value: &Value) -> Result<Value, String> {
    match (kind, value) {
        (FieldKind::List(item), Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item_value)| {
                parse_scalar_value(*item, item_value).map_err(|cause| format!("item {index}: {cause}"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        (FieldKind::List(_), Value::String(text)) => parse_text(kind, text),
        (FieldKind::List(_), _) => Err("expected a list or a comma-separated string".to_string()),
        (FieldKind::Scalar(scalar), _) => parse_scalar_value(*scalar, value),
        (FieldKind::Nested(_), _) => Err("expected a table".to_string()),
    }
}

fn parse_scalar_value(kind: ScalarKind, value: &Value) -> Result<Value, String> {
    match (kind, value) {
        (_, Value::String(text)) => parse_scalar_text(kind, text),
        (ScalarKind::String, Value::Number(n)) => Ok(Value::String(n.to_string())),
        (ScalarKind::String, Value::Bool(b)) => Ok(Value::String(b.to_string())),
        (ScalarKind::Bool, Value::Bool(b)) => Ok(Value::Bool(*b)),
        (ScalarKind::Int, Value::Number(n)) => n
            .as_i64()
            .map(Value::from)
            .ok_or_else(|| format!("{n} is not a signed 64-bit integer")),
        (ScalarKind::UInt, Value::Number(n)) => n
            .as_u64()
            .map(Value::from)
            .ok_or_else(|| format!("{n} is not an unsigned 64-bit integer")),
        (ScalarKind::Float, Value::Number(n)) => n
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| format!("{n} is not a finite number")),
        (ScalarKind::Duration, Value::Number(n)) => n
            .as_u64()
            .map(|nanos| duration_value(Duration::from_nanos(nanos)))
            .ok_or_else(|| format!("{n} is not a non-negative count of nanoseconds")),
        (_, other) => Err(format!("expected {}, found {}", describe(kind), kind_of(other))),
    }
}

fn parse_text(kind: &FieldKind, text: &str) -> Result<Value, String> {
    match kind {
        FieldKind::Scalar(scalar) => parse_scalar_text(*scalar, text),
        FieldKind::List(item) => text
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .enumerate()
            .map(|(index, segment)| {
                parse_scalar_text(*item, segment).map_err(|cause| format!("item {index}: {cause}"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        FieldKind::Nested(_) => Err("a table cannot be given as text".to_string()),
    }
}

fn parse_scalar_text(kind: ScalarKind, text: &str) -> Result<Value, String> {
    let trimmed = text.trim();
    match kind {
        ScalarKind::String => Ok(Value::String(text.to_string())),
        ScalarKind::Bool => parse_bool(trimmed).map(Value::Bool),
        ScalarKind::Int => trimmed
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| e.to_string()),
        ScalarKind::UInt => trimmed
            .parse::<u64>()
            .map(Value::from)
            .map_err(|e| e.to_string()),
        ScalarKind::Float => {
            let parsed = trimmed.parse::<f64>().map_err(|e| e.to_string())?;
            Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(|| format!("{trimmed} is not a finite number"))
        }
        ScalarKind::Duration => parse_duration(trimmed).map(duration_value),
    }
}

/// Parse a duration: a bare integer is nanoseconds, anything else is humantime (`"5s"`, `"1m 30s"`)
pub fn parse_duration(text: &str) -> Result<Duration, String> {
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        return text
            .parse::<u64>()
            .map(Duration::from_nanos)
            .map_err(|e| e.to_string());
    }
    humantime::parse_duration(text).map_err(|e| e.to_string())
}

fn parse_bool(text: &str) -> Result<bool, String> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(format!("`{text}` is not a boolean")),
    }
}

/// Serde shape of `std::time::Duration`
fn duration_value(duration: Duration) -> Value {
    json!({
        "secs": duration.as_secs(),
        "nanos": duration.subsec_nanos(),
    })
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn describe(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::String => "a string",
        ScalarKind::Bool => "a boolean",
        ScalarKind::Int => "a signed integer",
        ScalarKind::UInt => "an unsigned integer",
        ScalarKind::Float => "a number",
        ScalarKind::Duration => "a duration",
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a table",
    }
}
