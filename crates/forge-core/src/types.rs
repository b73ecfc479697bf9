//! Field types understood by the generation framework.
//!
//! `FieldType` is the declared type of one schema slot. `TypeKind` is its
//! element-agnostic discriminant, which is what type selectors and the
//! generator registry key on: a `TypeKind::List` selector matches every
//! list field no matter what it holds.

use crate::schema::SchemaRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a schema field.
///
/// # YAML Format
///
/// Type kinds are written as plain strings, nested objects by name:
/// ```yaml
/// type: text
/// type: list
/// type:
///   object: Address
/// ```
#[derive(Debug, Clone)]
pub enum FieldType {
    /// Boolean value
    Bool,

    /// 32-bit signed integer
    Int32,

    /// 64-bit signed integer
    Int64,

    /// 64-bit IEEE 754 floating point
    Float64,

    /// Unbounded text
    Text,

    /// UUID (128-bit)
    Uuid,

    /// Timestamp with timezone (UTC)
    DateTime,

    /// Homogeneous list
    List {
        /// Element type
        element: Box<FieldType>,
    },

    /// Nested structural type, described lazily
    Object(SchemaRef),

    /// Type with no visible structure; must be bound explicitly
    Opaque {
        /// Name used in error messages and type selectors
        type_name: String,
    },
}

impl FieldType {
    /// Create a list type.
    pub fn list(element: FieldType) -> Self {
        Self::List {
            element: Box::new(element),
        }
    }

    /// Create a nested object type for `T`.
    pub fn object<T: crate::schema::Instance>() -> Self {
        Self::Object(SchemaRef::of::<T>())
    }

    /// Create an opaque type.
    pub fn opaque(type_name: impl Into<String>) -> Self {
        Self::Opaque {
            type_name: type_name.into(),
        }
    }

    /// The discriminant used by type selectors.
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Bool => TypeKind::Bool,
            Self::Int32 => TypeKind::Int32,
            Self::Int64 => TypeKind::Int64,
            Self::Float64 => TypeKind::Float64,
            Self::Text => TypeKind::Text,
            Self::Uuid => TypeKind::Uuid,
            Self::DateTime => TypeKind::DateTime,
            Self::List { .. } => TypeKind::List,
            Self::Object(schema) => TypeKind::Object(schema.type_name().to_string()),
            Self::Opaque { type_name } => TypeKind::Opaque(type_name.clone()),
        }
    }

    /// Element type if this is a list.
    pub fn element(&self) -> Option<&FieldType> {
        match self {
            Self::List { element } => Some(element),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int32 | Self::Int64 | Self::Float64)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int32 | Self::Int64)
    }
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List { element: a }, Self::List { element: b }) => a == b,
            (Self::Object(a), Self::Object(b)) => a.type_name() == b.type_name(),
            (Self::Opaque { type_name: a }, Self::Opaque { type_name: b }) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List { element } => write!(f, "list<{element}>"),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// Element-agnostic type discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Bool,
    Int32,
    Int64,
    Float64,
    Text,
    Uuid,
    DateTime,
    List,
    /// A specific nested structural type, by name
    Object(String),
    /// A specific opaque type, by name
    Opaque(String),
}

impl TypeKind {
    /// Kind for the nested structural type `T`.
    pub fn object<T: crate::schema::Instance>() -> Self {
        Self::Object(T::NAME.to_string())
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int32 => f.write_str("int32"),
            Self::Int64 => f.write_str("int64"),
            Self::Float64 => f.write_str("float64"),
            Self::Text => f.write_str("text"),
            Self::Uuid => f.write_str("uuid"),
            Self::DateTime => f.write_str("date_time"),
            Self::List => f.write_str("list"),
            Self::Object(name) => write!(f, "object<{name}>"),
            Self::Opaque(name) => write!(f, "opaque<{name}>"),
        }
    }
}
