//! Individual value generators for different data types.
//!
//! This module provides the generation logic for each type of value
//! based on the generator configuration.

pub mod choice;
pub mod collection;
pub mod numeric;
pub mod pattern;
pub mod text;
pub mod timestamp;
pub mod uuid;

use forge_core::{GeneratorConfig, Value};
use rand::Rng;

/// Output of a single generator invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    /// A finished value
    Value(Value),

    /// A collection of `size` elements; the caller generates each element
    /// for the slot's element type.
    Collection { size: usize },
}

impl Generated {
    /// The finished value, if this is not a collection.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Collection { .. } => None,
        }
    }
}

/// Trait for generating values.
pub trait ValueGenerator {
    /// Generate a value using the given RNG and instance index.
    fn generate<R: Rng>(&self, rng: &mut R, index: u64) -> Generated;
}

impl ValueGenerator for GeneratorConfig {
    fn generate<R: Rng>(&self, rng: &mut R, index: u64) -> Generated {
        generate_value(self, rng, index)
    }
}

/// Generate a value based on the generator configuration.
///
/// `index` is the position of the instance within its batch; only the
/// `sequential` and `pattern` generators read it.
pub fn generate_value<R: Rng>(config: &GeneratorConfig, rng: &mut R, index: u64) -> Generated {
    let value = match config {
        GeneratorConfig::Text {
            min_length,
            max_length,
            case,
            charset,
        } => text::generate_text(rng, *min_length, *max_length, *case, charset.as_deref()),

        GeneratorConfig::Word => text::generate_word(rng),

        GeneratorConfig::Email => text::generate_email(rng),

        GeneratorConfig::UuidText => Value::String(uuid::random_uuid(rng).to_string()),

        GeneratorConfig::Pattern { pattern } => pattern::generate_pattern(pattern, rng, index),

        GeneratorConfig::UuidV4 => uuid::generate_uuid_v4(rng),

        GeneratorConfig::Sequential { start } => {
            Value::Int64(start.wrapping_add(index as i64))
        }

        GeneratorConfig::IntRange { min, max } => numeric::generate_int_range(rng, *min, *max),

        GeneratorConfig::FloatRange { min, max } => numeric::generate_float_range(rng, *min, *max),

        GeneratorConfig::WeightedBool { true_weight } => {
            Value::Bool(rng.random_bool(true_weight.clamp(0.0, 1.0)))
        }

        GeneratorConfig::TimestampRange { start, end } => {
            timestamp::generate_timestamp_range(rng, start, end)
        }

        GeneratorConfig::OneOf { values } => choice::generate_one_of(rng, values),

        GeneratorConfig::Collection { min_size, max_size } => {
            return Generated::Collection {
                size: collection::draw_size(rng, *min_size, *max_size),
            };
        }

        GeneratorConfig::Static { value } => value.clone(),
    };

    Generated::Value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sequential_uses_index() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = GeneratorConfig::Sequential { start: 100 };

        assert_eq!(
            config.generate(&mut rng, 7),
            Generated::Value(Value::Int64(107))
        );
    }

    #[test]
    fn test_collection_returns_size() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = GeneratorConfig::Collection {
            min_size: 2,
            max_size: 2,
        };

        assert_eq!(
            generate_value(&config, &mut rng, 0),
            Generated::Collection { size: 2 }
        );
        assert_eq!(generate_value(&config, &mut rng, 0).into_value(), None);
    }

    #[test]
    fn test_static_value() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = GeneratorConfig::Static {
            value: Value::String("fixed".to_string()),
        };

        assert_eq!(
            generate_value(&config, &mut rng, 3).into_value(),
            Some(Value::String("fixed".to_string()))
        );
    }

    #[test]
    fn test_every_default_is_deterministic() {
        let configs = [
            GeneratorConfig::text(),
            GeneratorConfig::Word,
            GeneratorConfig::Email,
            GeneratorConfig::UuidText,
            GeneratorConfig::UuidV4,
            GeneratorConfig::IntRange { min: 1, max: 100 },
            GeneratorConfig::WeightedBool { true_weight: 0.5 },
        ];

        for config in configs {
            let mut rng1 = StdRng::seed_from_u64(7);
            let mut rng2 = StdRng::seed_from_u64(7);
            assert_eq!(
                generate_value(&config, &mut rng1, 0),
                generate_value(&config, &mut rng2, 0),
                "{config:?}"
            );
        }
    }
}
