//! Fluent generator configurators.
//!
//! `generate(selector, |gen| ...)` hands the closure a [`Gen`]; each
//! configurator it returns converts into a [`GeneratorConfig`].
//!
//! ```rust
//! use fixture_forge::fluent::Gen;
//! use fixture_forge::GeneratorConfig;
//!
//! let config: GeneratorConfig = Gen.string().mixed_case().max_length(10).into();
//! assert!(matches!(config, GeneratorConfig::Text { max_length: 10, .. }));
//! ```

use forge_core::generator::{DEFAULT_MAX_LENGTH, DEFAULT_MAX_SIZE, DEFAULT_MIN_LENGTH};
use forge_core::{Case, GeneratorConfig, Value};

/// Entry point of the fluent configurators.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gen;

impl Gen {
    /// Random strings.
    pub fn string(self) -> StringSpec {
        StringSpec::default()
    }

    /// Text-shaped strings: words, UUIDs, patterns.
    pub fn text(self) -> TextSpec {
        TextSpec
    }

    /// Network-shaped strings.
    pub fn net(self) -> NetSpec {
        NetSpec
    }

    /// Integers.
    pub fn ints(self) -> IntSpec {
        IntSpec {
            min: 1,
            max: 10_000,
        }
    }

    /// Floating point numbers.
    pub fn floats(self) -> FloatSpec {
        FloatSpec {
            min: 1.0,
            max: 10_000.0,
        }
    }

    /// Booleans.
    pub fn booleans(self) -> BoolSpec {
        BoolSpec { true_weight: 0.5 }
    }

    /// Timestamps.
    pub fn temporal(self) -> TemporalSpec {
        TemporalSpec
    }

    /// Random UUIDs.
    pub fn uuid(self) -> GeneratorConfig {
        GeneratorConfig::UuidV4
    }

    /// Integers counting up from `start` by instance index.
    pub fn sequential(self, start: i64) -> GeneratorConfig {
        GeneratorConfig::Sequential { start }
    }

    /// Collections.
    pub fn collection(self) -> CollectionSpec {
        CollectionSpec {
            min_size: 0,
            max_size: DEFAULT_MAX_SIZE,
        }
    }

    /// One of the given values, uniformly.
    pub fn one_of<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> GeneratorConfig {
        GeneratorConfig::OneOf {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Random string options.
///
/// Bounds stay consistent while chaining: lowering the maximum below the
/// minimum pulls the minimum down, and raising the minimum pushes the
/// maximum up.
#[derive(Debug, Clone, PartialEq)]
pub struct StringSpec {
    min_length: usize,
    max_length: usize,
    case: Case,
    charset: Option<String>,
}

impl Default for StringSpec {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            case: Case::Upper,
            charset: None,
        }
    }
}

impl StringSpec {
    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = length;
        self.max_length = self.max_length.max(length);
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = length;
        self.min_length = self.min_length.min(length);
        self
    }

    /// Exact length.
    pub fn length(mut self, length: usize) -> Self {
        self.min_length = length;
        self.max_length = length;
        self
    }

    pub fn upper_case(mut self) -> Self {
        self.case = Case::Upper;
        self
    }

    pub fn lower_case(mut self) -> Self {
        self.case = Case::Lower;
        self
    }

    pub fn mixed_case(mut self) -> Self {
        self.case = Case::Mixed;
        self
    }

    /// Draw characters from `charset` instead of letters.
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Digits only.
    pub fn digits(self) -> Self {
        self.charset("0123456789")
    }
}

impl From<StringSpec> for GeneratorConfig {
    fn from(spec: StringSpec) -> Self {
        GeneratorConfig::Text {
            min_length: spec.min_length,
            max_length: spec.max_length,
            case: spec.case,
            charset: spec.charset,
        }
    }
}

/// Text-shaped strings.
#[derive(Debug, Clone, Copy)]
pub struct TextSpec;

impl TextSpec {
    pub fn word(self) -> GeneratorConfig {
        GeneratorConfig::Word
    }

    pub fn uuid(self) -> GeneratorConfig {
        GeneratorConfig::UuidText
    }

    /// Pattern with `{index}`, `{uuid}` and `{rand:N}` placeholders.
    pub fn pattern(self, pattern: impl Into<String>) -> GeneratorConfig {
        GeneratorConfig::Pattern {
            pattern: pattern.into(),
        }
    }
}

/// Network-shaped strings.
#[derive(Debug, Clone, Copy)]
pub struct NetSpec;

impl NetSpec {
    pub fn email(self) -> GeneratorConfig {
        GeneratorConfig::Email
    }
}

/// Integer range, inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntSpec {
    min: i64,
    max: i64,
}

impl IntSpec {
    pub fn min(mut self, min: i64) -> Self {
        self.min = min;
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = max;
        self
    }

    pub fn range(self, min: i64, max: i64) -> Self {
        self.min(min).max(max)
    }
}

impl From<IntSpec> for GeneratorConfig {
    fn from(spec: IntSpec) -> Self {
        GeneratorConfig::IntRange {
            min: spec.min,
            max: spec.max,
        }
    }
}

/// Float range, inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatSpec {
    min: f64,
    max: f64,
}

impl FloatSpec {
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

impl From<FloatSpec> for GeneratorConfig {
    fn from(spec: FloatSpec) -> Self {
        GeneratorConfig::FloatRange {
            min: spec.min,
            max: spec.max,
        }
    }
}

/// Weighted booleans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoolSpec {
    true_weight: f64,
}

impl BoolSpec {
    /// Probability of `true`, within `0.0..=1.0`.
    pub fn probability(mut self, true_weight: f64) -> Self {
        self.true_weight = true_weight;
        self
    }
}

impl From<BoolSpec> for GeneratorConfig {
    fn from(spec: BoolSpec) -> Self {
        GeneratorConfig::WeightedBool {
            true_weight: spec.true_weight,
        }
    }
}

/// Timestamps.
#[derive(Debug, Clone, Copy)]
pub struct TemporalSpec;

impl TemporalSpec {
    /// Timestamps between two RFC 3339 timestamps or `YYYY-MM-DD` dates.
    pub fn between(self, start: impl Into<String>, end: impl Into<String>) -> GeneratorConfig {
        GeneratorConfig::TimestampRange {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Collection size bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionSpec {
    min_size: usize,
    max_size: usize,
}

impl CollectionSpec {
    pub fn min_size(mut self, size: usize) -> Self {
        self.min_size = size;
        self.max_size = self.max_size.max(size);
        self
    }

    pub fn max_size(mut self, size: usize) -> Self {
        self.max_size = size;
        self.min_size = self.min_size.min(size);
        self
    }

    /// Exact size.
    pub fn size(mut self, size: usize) -> Self {
        self.min_size = size;
        self.max_size = size;
        self
    }
}

impl From<CollectionSpec> for GeneratorConfig {
    fn from(spec: CollectionSpec) -> Self {
        GeneratorConfig::Collection {
            min_size: spec.min_size,
            max_size: spec.max_size,
        }
    }
}
