//! Fixture Forge Library
//!
//! Random, configurable test data for Rust structs.
//!
//! # Features
//!
//! - Default generation: every field of a type filled with random values
//! - Selectors: target one field path, every field of a type, or the root
//! - Models: reusable, immutable generation setups shared across threads
//! - Uniqueness: distinct values for chosen slots across a batch
//! - Conditional assignment: override a field when another one matches
//! - YAML model configuration
//!
//! # Crates
//!
//! - `forge_core` - schemas, the `Instance` trait, values and generator configs
//! - `forge_generator` - value generators and the generator registry
//!
//! # Usage
//!
//! ```rust,ignore
//! use fixture_forge::{field, given, types, Forge, TypeKind};
//!
//! let user: User = Forge::of::<User>()
//!     .set(field("name"), "Alex")
//!     .generate(types(TypeKind::Text), |gen| gen.string().upper_case().length(15))
//!     .ignore(field("id"))
//!     .create()?;
//!
//! let model = Forge::of::<User>()
//!     .generate(field("name"), |gen| gen.one_of(["Mark", "Alex", "Vlad"]))
//!     .assign(given(field("name")).is("Mark").set(field("age"), 2))
//!     .to_model()?;
//! let users = model.list(3).with_unique(field("name")).create()?;
//! ```

pub mod assign;
pub mod build;
pub mod config;
pub mod error;
pub mod fluent;
pub mod model;
pub mod select;

pub use assign::{given, AssignAction, AssignmentRule, Condition};
pub use build::{build, build_many};
pub use config::ModelConfig;
pub use error::{ForgeError, Result};
pub use fluent::Gen;
pub use model::{Blueprint, Forge, ListBuilder, Model, ModelBuilder, ModelSettings};
pub use select::{all, field, root, types, types_of, Action, Binding, Bindings, Selector};

pub use forge_core::{
    Case, FieldType, FromValue, GeneratorConfig, Instance, ObjectValue, Schema, SchemaGraph,
    TypeKind, Value, ValueError,
};
pub use forge_generator::GeneratorRegistry;
