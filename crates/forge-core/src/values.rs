//! Value representations for generated instances.
//!
//! A generated instance is first materialized as a [`Value`] tree and only
//! then converted into the caller's Rust type through [`Instance`] and
//! [`FromValue`]. `Value::Null` is the zero representation: it is what an
//! ignored slot holds.

use crate::schema::Instance;
use crate::types::FieldType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Error converting a generated value into a Rust type.
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    /// Value did not have the expected shape
    #[error("Field '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// Field absent from the generated object
    #[error("Field '{field}' missing from generated '{type_name}'")]
    MissingField { type_name: String, field: String },
}

/// Raw generated value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Unset value
    Null,

    /// Boolean value
    Bool(bool),

    /// 32-bit signed integer
    Int32(i32),

    /// 64-bit signed integer
    Int64(i64),

    /// 64-bit floating point
    Float64(f64),

    /// String value
    String(String),

    /// UUID value
    Uuid(Uuid),

    /// Date/time in UTC
    DateTime(DateTime<Utc>),

    /// Array of values
    Array(Vec<Value>),

    /// Nested object
    Object(ObjectValue),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(i) => Some(*i),
            Self::Int32(i) => Some(i64::from(*i)),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to get this value as an object.
    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages.
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Float64(_) => "float64",
            Self::String(_) => "string",
            Self::Uuid(_) => "uuid",
            Self::DateTime(_) => "date_time",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Convert this value so that it fits `target`.
    ///
    /// Only lossless conversions are performed. Returns `None` when the
    /// value cannot represent the target type.
    pub fn coerce(self, target: &FieldType) -> Option<Value> {
        match (self, target) {
            (Value::Null, _) => Some(Value::Null),
            (value, FieldType::Opaque { .. }) => Some(value),

            (Value::Bool(b), FieldType::Bool) => Some(Value::Bool(b)),

            (Value::Int32(i), FieldType::Int32) => Some(Value::Int32(i)),
            (Value::Int32(i), FieldType::Int64) => Some(Value::Int64(i64::from(i))),
            (Value::Int32(i), FieldType::Float64) => Some(Value::Float64(f64::from(i))),
            (Value::Int64(i), FieldType::Int32) => i32::try_from(i).ok().map(Value::Int32),
            (Value::Int64(i), FieldType::Int64) => Some(Value::Int64(i)),
            (Value::Int64(i), FieldType::Float64) => Some(Value::Float64(i as f64)),
            (Value::Float64(f), FieldType::Float64) => Some(Value::Float64(f)),

            (Value::String(s), FieldType::Text) => Some(Value::String(s)),
            (Value::String(s), FieldType::Uuid) => Uuid::parse_str(&s).ok().map(Value::Uuid),
            (Value::String(s), FieldType::DateTime) => DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc))),
            (Value::Uuid(u), FieldType::Uuid) => Some(Value::Uuid(u)),
            (Value::Uuid(u), FieldType::Text) => Some(Value::String(u.to_string())),
            (Value::DateTime(dt), FieldType::DateTime) => Some(Value::DateTime(dt)),
            (Value::DateTime(dt), FieldType::Text) => Some(Value::String(dt.to_rfc3339())),

            (Value::Array(items), FieldType::List { element }) => items
                .into_iter()
                .map(|item| item.coerce(element))
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),

            (Value::Object(obj), FieldType::Object(schema)) => {
                if obj.type_name.is_empty() || obj.type_name == schema.type_name() {
                    Some(Value::Object(ObjectValue {
                        type_name: schema.type_name().to_string(),
                        fields: obj.fields,
                    }))
                } else {
                    None
                }
            }

            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<ObjectValue> for Value {
    fn from(value: ObjectValue) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Convert a YAML value to a Value.
impl From<YamlValue> for Value {
    fn from(yaml: YamlValue) -> Self {
        match yaml {
            YamlValue::Null => Value::Null,
            YamlValue::Bool(b) => Value::Bool(b),
            YamlValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int64(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float64(f)
                } else {
                    Value::String(n.to_string())
                }
            }
            YamlValue::String(s) => Value::String(s),
            YamlValue::Sequence(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            YamlValue::Mapping(map) => {
                let fields = map
                    .into_iter()
                    .filter_map(|(k, v)| match k {
                        YamlValue::String(key) => Some((key, Value::from(v))),
                        _ => None,
                    })
                    .collect();
                Value::Object(ObjectValue {
                    type_name: String::new(),
                    fields,
                })
            }
            YamlValue::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        YamlValue::deserialize(deserializer).map(Value::from)
    }
}

/// A generated object: the values of one schema's fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectValue {
    /// Name of the schema this object was generated from
    pub type_name: String,

    /// Field values by name
    pub fields: BTreeMap<String, Value>,
}

impl ObjectValue {
    /// Create an empty object for the named type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a field value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Raw value of a field.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Replace a field value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Follow a dotted path of nested object fields.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.fields.get(segment)?;
        }
        Some(current)
    }

    /// Convert a field into a Rust value.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, ValueError> {
        let value = self.fields.get(name).ok_or_else(|| ValueError::MissingField {
            type_name: self.type_name.clone(),
            field: name.to_string(),
        })?;
        T::from_value(name, value)
    }

    /// Convert a nested object field into `T`; `None` when unset.
    pub fn nested<T: Instance>(&self, name: &str) -> Result<Option<T>, ValueError> {
        match self.fields.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(obj)) => T::from_object(obj).map(Some),
            Some(other) => Err(mismatch(name, "object", other)),
        }
    }

    /// Convert a list-of-objects field into `Vec<T>`; `None` when unset.
    pub fn nested_list<T: Instance>(&self, name: &str) -> Result<Option<Vec<T>>, ValueError> {
        match self.fields.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Object(obj) => T::from_object(obj),
                    other => Err(mismatch(name, "object", other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => Err(mismatch(name, "array", other)),
        }
    }
}

fn mismatch(field: &str, expected: &'static str, found: &Value) -> ValueError {
    ValueError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: found.type_label().to_string(),
    }
}

/// Conversion from a generated value into a Rust field type.
///
/// `Null` converts to the type's zero value, or to `None` for `Option`.
pub trait FromValue: Sized {
    fn from_value(field: &str, value: &Value) -> Result<Self, ValueError>;
}

impl FromValue for bool {
    fn from_value(field: &str, value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch(field, "bool", other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(field: &str, value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(0),
            Value::Int32(i) => Ok(*i),
            Value::Int64(i) => i32::try_from(*i).map_err(|_| mismatch(field, "int32", value)),
            other => Err(mismatch(field, "int32", other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(field: &str, value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(0),
            other => other.as_i64().ok_or_else(|| mismatch(field, "int64", other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(field: &str, value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(0.0),
            Value::Float64(f) => Ok(*f),
            Value::Int32(i) => Ok(f64::from(*i)),
            other => Err(mismatch(field, "float64", other)),
        }
    }
}

impl FromValue for String {
    fn from_value(field: &str, value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s.clone()),
            Value::Uuid(u) => Ok(u.to_string()),
            other => Err(mismatch(field, "string", other)),
        }
    }
}

impl FromValue for Uuid {
    fn from_value(field: &str, value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(Uuid::nil()),
            Value::Uuid(u) => Ok(*u),
            other => Err(mismatch(field, "uuid", other)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(field: &str, value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(DateTime::<Utc>::default()),
            Value::DateTime(dt) => Ok(*dt),
            other => Err(mismatch(field, "date_time", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(field: &str, value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(field, other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(field: &str, value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items.iter().map(|item| T::from_value(field, item)).collect(),
            other => Err(mismatch(field, "array", other)),
        }
    }
}
