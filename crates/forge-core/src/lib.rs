//! Core types for the fixture-forge framework.
//!
//! This crate provides the foundational types used across the generation
//! framework, including:
//!
//! - [`FieldType`] / [`TypeKind`] - Declared slot types and their discriminants
//! - [`Schema`] / [`SchemaGraph`] - Structural type descriptions and introspection
//! - [`Instance`] - Bridge between a Rust type and its schema
//! - [`Value`] / [`ObjectValue`] - Generated values before conversion
//! - [`GeneratorConfig`] - How a slot is generated
//!
//! # Architecture
//!
//! ```text
//! forge-core (this crate)
//!    │
//!    ├─── forge-generator  (value generators and registry)
//!    │
//!    └─── fixture-forge    (selectors, models, object builder)
//! ```

pub mod generator;
pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use generator::{Case, ConfigError, GeneratorConfig};
pub use schema::{FieldDefinition, Instance, Schema, SchemaError, SchemaGraph, SchemaRef};
pub use types::{FieldType, TypeKind};
pub use values::{FromValue, ObjectValue, Value, ValueError};
