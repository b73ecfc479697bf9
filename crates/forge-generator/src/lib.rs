//! Value generators for the fixture-forge framework.
//!
//! This crate turns a [`GeneratorConfig`](forge_core::GeneratorConfig) into
//! values using a caller-provided RNG, so the same seed always reproduces
//! the same data.
//!
//! # Example
//!
//! ```rust
//! use forge_core::{FieldType, Value};
//! use forge_generator::{generate_value, GeneratorRegistry};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let registry = GeneratorRegistry::new();
//! let config = registry.resolve("name", &FieldType::Text).unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let value = generate_value(config, &mut rng, 0).into_value().unwrap();
//! assert!(matches!(value, Value::String(_)));
//! ```
//!
//! # Generators
//!
//! - `text` - Random letters with length, case and charset options
//! - `word` - Lorem ipsum word
//! - `email` - Email address on an example domain
//! - `uuid_text` - UUID rendered as a string
//! - `pattern` - Pattern strings with placeholders (`{index}`, `{uuid}`, `{rand:N}`)
//! - `uuid_v4` - Random UUID v4
//! - `sequential` - Sequential integers
//! - `int_range` - Random integers in a range
//! - `float_range` - Random floats in a range
//! - `weighted_bool` - Boolean with configurable true probability
//! - `timestamp_range` - Random timestamps in a date range
//! - `one_of` - Random selection from a list
//! - `collection` - Collection size; elements are generated by the caller
//! - `static` - Static value

pub mod generators;
pub mod registry;

// Re-exports for convenience
pub use generators::{generate_value, Generated, ValueGenerator};
pub use registry::{GeneratorRegistry, RegistryError};
