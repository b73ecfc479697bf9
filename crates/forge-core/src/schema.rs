//! Schema definitions and introspection.
//!
//! ## Type Hierarchy
//!
//! - `Instance` - implemented by every Rust type that can be generated
//! - `Schema` - ordered field list of one structural type
//! - `SchemaRef` - lazy reference to a nested structural type
//! - `SchemaGraph` - the root schema plus every schema reachable from it
//!
//! A `SchemaGraph` is built once per model and reused for every generated
//! instance. Nested types are described at most once, so self-referential
//! types introspect without recursing forever.

use crate::types::FieldType;
use crate::values::{ObjectValue, ValueError};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Two fields of one schema share a name
    #[error("Duplicate field '{field}' in type '{type_name}'")]
    DuplicateField { type_name: String, field: String },

    /// Two different schemas were registered under one name
    #[error("Type name '{0}' is used by two different schemas")]
    ConflictingType(String),

    /// Path does not name a field of the schema graph
    #[error("Field '{path}' not found in type '{type_name}'")]
    FieldNotFound { type_name: String, path: String },

    /// Error reading a configuration file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
}

// ============================================================================
// Instance Trait
// ============================================================================

/// A Rust type that can be generated from a schema.
///
/// ```rust
/// use forge_core::{FieldType, Instance, ObjectValue, Schema, ValueError};
///
/// struct Address {
///     city: Option<String>,
/// }
///
/// impl Instance for Address {
///     const NAME: &'static str = "Address";
///
///     fn schema() -> Schema {
///         Schema::new(Self::NAME).field("city", FieldType::Text)
///     }
///
///     fn from_object(object: &ObjectValue) -> Result<Self, ValueError> {
///         Ok(Self { city: object.get("city")? })
///     }
/// }
/// ```
pub trait Instance: Sized {
    /// Schema name; type selectors and error messages refer to it.
    const NAME: &'static str;

    /// Describe the fields of this type, in declaration order.
    fn schema() -> Schema;

    /// Build the Rust value from a generated object.
    fn from_object(object: &ObjectValue) -> Result<Self, ValueError>;
}

// ============================================================================
// Schema
// ============================================================================

/// One field of a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,

    /// Declared type
    pub field_type: FieldType,
}

/// Ordered field list of one structural type.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Type name
    pub name: String,

    /// Field definitions in declaration order
    pub fields: Vec<FieldDefinition>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldDefinition {
            name: name.into(),
            field_type,
        });
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Check the uniqueness of field names.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    type_name: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Lazy reference to a nested structural type.
#[derive(Clone, Copy)]
pub struct SchemaRef {
    type_name: &'static str,
    describe: fn() -> Schema,
}

impl SchemaRef {
    /// Reference the schema of `T`.
    pub fn of<T: Instance>() -> Self {
        Self {
            type_name: T::NAME,
            describe: T::schema,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Describe the referenced type.
    pub fn describe(&self) -> Schema {
        (self.describe)()
    }
}

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SchemaRef").field(&self.type_name).finish()
    }
}

// ============================================================================
// Schema Graph
// ============================================================================

/// Root schema plus every structural type reachable from it.
#[derive(Debug, Clone)]
pub struct SchemaGraph {
    root: String,
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaGraph {
    /// Introspect `T` and all nested structural types.
    pub fn introspect<T: Instance>() -> Result<Self, SchemaError> {
        Self::from_root(T::schema())
    }

    /// Build a graph from an already-described root schema.
    pub fn from_root(root: Schema) -> Result<Self, SchemaError> {
        let mut graph = Self {
            root: root.name.clone(),
            schemas: HashMap::new(),
        };
        let mut pending = vec![root];

        while let Some(schema) = pending.pop() {
            schema.validate()?;
            if let Some(known) = graph.schemas.get(&schema.name) {
                if **known != schema {
                    return Err(SchemaError::ConflictingType(schema.name));
                }
                continue;
            }
            let schema = Arc::new(schema);
            graph.schemas.insert(schema.name.clone(), Arc::clone(&schema));
            for field in &schema.fields {
                graph.collect_refs(&field.field_type, &mut pending)?;
            }
        }

        Ok(graph)
    }

    /// Queue every structural type referenced by `field_type`. A name seen
    /// before must describe the same schema.
    fn collect_refs(
        &self,
        field_type: &FieldType,
        pending: &mut Vec<Schema>,
    ) -> Result<(), SchemaError> {
        match field_type {
            FieldType::List { element } => self.collect_refs(element, pending),
            FieldType::Object(reference) => {
                let name = reference.type_name();
                let schema = reference.describe();
                if schema.name != name {
                    return Err(SchemaError::ConflictingType(name.to_string()));
                }

                let known = self
                    .schemas
                    .get(name)
                    .map(|known| known.as_ref())
                    .or_else(|| pending.iter().find(|queued| queued.name == name));
                match known {
                    Some(known) if *known != schema => {
                        Err(SchemaError::ConflictingType(name.to_string()))
                    }
                    Some(_) => Ok(()),
                    None => {
                        pending.push(schema);
                        Ok(())
                    }
                }
            }
            _ => Ok(()),
        }
    }

    /// The root schema.
    pub fn root(&self) -> &Schema {
        // The root is inserted by `from_root` before it returns.
        &self.schemas[&self.root]
    }

    /// Get a schema by type name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name).map(Arc::as_ref)
    }

    /// All type names in the graph.
    pub fn type_names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    /// Resolve a dotted field path (with `[]` list element segments)
    /// starting at the root.
    pub fn field_type_at(&self, path: &str) -> Result<&FieldType, SchemaError> {
        let not_found = || SchemaError::FieldNotFound {
            type_name: self.root.clone(),
            path: path.to_string(),
        };

        let mut schema = self.root();
        let mut current: Option<&FieldType> = None;

        for segment in path.split('.') {
            if let Some(FieldType::Object(reference)) = current {
                schema = self.get(reference.type_name()).ok_or_else(not_found)?;
            } else if current.is_some() {
                return Err(not_found());
            }

            let (name, depth) = split_element_suffix(segment);
            let mut field_type = &schema.get_field(name).ok_or_else(not_found)?.field_type;
            for _ in 0..depth {
                field_type = field_type.element().ok_or_else(not_found)?;
            }
            current = Some(field_type);
        }

        current.ok_or_else(not_found)
    }
}

/// Split `name[][]` into `("name", 2)`.
fn split_element_suffix(segment: &str) -> (&str, usize) {
    let mut name = segment;
    let mut depth = 0;
    while let Some(stripped) = name.strip_suffix("[]") {
        name = stripped;
        depth += 1;
    }
    (name, depth)
}

// ============================================================================
// Tests
// ============================================================================
