//! Configuration schema and bound configuration values
//!
//! A [`ConfigSchema`] is the explicit, code-visible description of a
//! component's configuration: one [`Field`] per binding key, each with an
//! optional environment variable, an optional default literal and a
//! [`FieldKind`]. The binder turns a schema plus raw inputs into a
//! [`BoundConfig`], which deserializes into the component's own struct.

use crate::error::{BindError, ValueOrigin};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Scalar value kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    /// UTF-8 text
    String,
    /// Boolean flag
    Bool,
    /// Signed 64-bit integer
    Int,
    /// Unsigned 64-bit integer
    UInt,
    /// 64-bit float
    Float,
    /// Time span, bound to the `std::time::Duration` serde shape
    Duration,
}

/// Kind of a configuration field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A single scalar
    Scalar(ScalarKind),
    /// A list of scalars
    List(ScalarKind),
    /// A nested structure bound field-by-field
    Nested(ConfigSchema),
}

/// One configuration field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Binding key, relative to the enclosing structure
    pub key: &'static str,
    /// Environment variable consulted when the file lacks the key
    pub env: Option<&'static str>,
    /// Default literal consulted when neither file nor environment has a value
    pub default: Option<&'static str>,
    /// Value kind
    pub kind: FieldKind,
}

impl Field {
    /// Field of any kind
    pub fn new(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            env: None,
            default: None,
            kind,
        }
    }

    /// String field
    pub fn string(key: &'static str) -> Self {
        Self::new(key, FieldKind::Scalar(ScalarKind::String))
    }

    /// Boolean field
    pub fn bool(key: &'static str) -> Self {
        Self::new(key, FieldKind::Scalar(ScalarKind::Bool))
    }

    /// Signed integer field
    pub fn int(key: &'static str) -> Self {
        Self::new(key, FieldKind::Scalar(ScalarKind::Int))
    }

    /// Unsigned integer field
    pub fn uint(key: &'static str) -> Self {
        Self::new(key, FieldKind::Scalar(ScalarKind::UInt))
    }

    /// Float field
    pub fn float(key: &'static str) -> Self {
        Self::new(key, FieldKind::Scalar(ScalarKind::Float))
    }

    /// Duration field (`"5s"`, `"1m 30s"`, or a bare count of nanoseconds)
    pub fn duration(key: &'static str) -> Self {
        Self::new(key, FieldKind::Scalar(ScalarKind::Duration))
    }

    /// List of scalars
    pub fn list(key: &'static str, item: ScalarKind) -> Self {
        Self::new(key, FieldKind::List(item))
    }

    /// Nested structure
    pub fn nested(key: &'static str, schema: ConfigSchema) -> Self {
        Self::new(key, FieldKind::Nested(schema))
    }

    /// Declare the environment variable for this field
    pub fn env(mut self, name: &'static str) -> Self {
        self.env = Some(name);
        self
    }

    /// Declare the default literal for this field
    pub fn default(mut self, literal: &'static str) -> Self {
        self.default = Some(literal);
        self
    }
}

/// Ordered set of fields describing one configuration structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSchema {
    fields: Vec<Field>,
}

impl ConfigSchema {
    /// Empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field; a later field with the same key replaces the earlier one
    pub fn field(mut self, field: Field) -> Self {
        match self.fields.iter_mut().find(|f| f.key == field.key) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Output of the binder for one component
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundConfig {
    values: Map<String, Value>,
}

impl BoundConfig {
    /// Wrap a bound value map
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Look up a bound value by dotted path (`"tls.cert_file"`)
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.values.get(first)?, |value, segment| {
            value.as_object()?.get(segment)
        })
    }

    /// Bound values as a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }

    /// Deserialize into the component's configuration struct
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, BindError> {
        serde_json::from_value(self.to_value()).map_err(|e| {
            BindError::new("<root>", self.to_value().to_string(), ValueOrigin::Bound, e.to_string())
        })
    }
}
