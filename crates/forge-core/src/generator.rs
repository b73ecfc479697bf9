//! Generator configuration.
//!
//! `GeneratorConfig` describes how one slot is generated. It is plain data:
//! it can be built through the fluent configurators of the root crate or
//! loaded from YAML.

use crate::types::{FieldType, TypeKind};
use crate::values::Value;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default minimum length of random strings.
pub const DEFAULT_MIN_LENGTH: usize = 1;

/// Default maximum length of random strings.
pub const DEFAULT_MAX_LENGTH: usize = 10;

/// Default maximum size of generated collections.
pub const DEFAULT_MAX_SIZE: usize = 5;

/// Error type for inconsistent generator options.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Lower bound above upper bound
    #[error("{option}: minimum {min} is greater than maximum {max}")]
    InvertedRange {
        option: &'static str,
        min: String,
        max: String,
    },

    /// Charset given but empty
    #[error("charset must not be empty")]
    EmptyCharset,

    /// `one_of` without any choice
    #[error("one_of requires at least one value")]
    EmptyChoices,

    /// Probability outside `0..=1`
    #[error("true_weight must be within 0.0..=1.0, got {0}")]
    InvalidWeight(f64),

    /// Range bound that is not a finite number
    #[error("{0} bounds must be finite")]
    NonFinite(&'static str),

    /// Timestamp that cannot be parsed
    #[error("invalid timestamp '{0}' (expected RFC 3339 or YYYY-MM-DD)")]
    InvalidTimestamp(String),
}

/// Letter case of random strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Case {
    #[default]
    Upper,
    Lower,
    Mixed,
}

fn default_min_length() -> usize {
    DEFAULT_MIN_LENGTH
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_max_size() -> usize {
    DEFAULT_MAX_SIZE
}

/// Generator configuration for a slot.
///
/// This enum defines the different types of value generators available
/// for producing test data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// Random string of letters (or of `charset` characters)
    Text {
        /// Minimum length (inclusive)
        #[serde(default = "default_min_length")]
        min_length: usize,
        /// Maximum length (inclusive)
        #[serde(default = "default_max_length")]
        max_length: usize,
        /// Letter case, ignored when `charset` is set
        #[serde(default)]
        case: Case,
        /// Characters to draw from
        #[serde(default, skip_serializing_if = "Option::is_none")]
        charset: Option<String>,
    },

    /// A lorem ipsum word
    Word,

    /// An email-shaped string
    Email,

    /// A UUID rendered as text
    UuidText,

    /// Values using a pattern with placeholders
    Pattern {
        /// Pattern string (supports {index}, {uuid}, {rand:N})
        pattern: String,
    },

    /// Random UUIDs (v4)
    UuidV4,

    /// Sequential integers starting at `start`, advanced by instance index
    Sequential {
        /// Starting value
        #[serde(default)]
        start: i64,
    },

    /// Random integers in a range
    IntRange {
        /// Minimum value (inclusive)
        min: i64,
        /// Maximum value (inclusive)
        max: i64,
    },

    /// Random floats in a range
    FloatRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Weighted boolean values
    WeightedBool {
        /// Weight for true value (0.0 to 1.0)
        true_weight: f64,
    },

    /// Timestamps in a range
    TimestampRange {
        /// Start timestamp (RFC 3339 or YYYY-MM-DD)
        start: String,
        /// End timestamp (RFC 3339 or YYYY-MM-DD)
        end: String,
    },

    /// Random selection from a set of values
    OneOf {
        /// Values to select from
        values: Vec<Value>,
    },

    /// Collections whose elements are generated for the element type
    Collection {
        /// Minimum number of elements
        #[serde(default)]
        min_size: usize,
        /// Maximum number of elements
        #[serde(default = "default_max_size")]
        max_size: usize,
    },

    /// A static value
    Static {
        /// The static value to use
        value: Value,
    },
}

impl GeneratorConfig {
    /// Random text with default options.
    pub fn text() -> Self {
        Self::Text {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            case: Case::Upper,
            charset: None,
        }
    }

    /// Collection with default size bounds.
    pub fn collection() -> Self {
        Self::Collection {
            min_size: 0,
            max_size: DEFAULT_MAX_SIZE,
        }
    }

    /// Check that the options are internally consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Text {
                min_length,
                max_length,
                charset,
                ..
            } => {
                check_order("length", min_length, max_length)?;
                if charset.as_deref() == Some("") {
                    return Err(ConfigError::EmptyCharset);
                }
                Ok(())
            }
            Self::IntRange { min, max } => check_order("int_range", min, max),
            Self::FloatRange { min, max } => {
                if !min.is_finite() || !max.is_finite() || !(max - min).is_finite() {
                    return Err(ConfigError::NonFinite("float_range"));
                }
                check_order("float_range", min, max)
            }
            Self::WeightedBool { true_weight } => {
                if (0.0..=1.0).contains(true_weight) {
                    Ok(())
                } else {
                    Err(ConfigError::InvalidWeight(*true_weight))
                }
            }
            Self::TimestampRange { start, end } => {
                let start_dt = parse_timestamp(start)
                    .ok_or_else(|| ConfigError::InvalidTimestamp(start.clone()))?;
                let end_dt = parse_timestamp(end)
                    .ok_or_else(|| ConfigError::InvalidTimestamp(end.clone()))?;
                check_order("timestamp_range", &start_dt, &end_dt)
            }
            Self::OneOf { values } if values.is_empty() => Err(ConfigError::EmptyChoices),
            Self::Collection { min_size, max_size } => check_order("size", min_size, max_size),
            _ => Ok(()),
        }
    }

    /// Whether this generator can produce values for `kind`.
    ///
    /// `one_of` and `static` accept any kind; their values are coerced to
    /// the slot type when generated.
    pub fn accepts(&self, kind: &TypeKind) -> bool {
        match self {
            Self::Text { .. }
            | Self::Word
            | Self::Email
            | Self::UuidText
            | Self::Pattern { .. } => matches!(kind, TypeKind::Text),
            Self::UuidV4 => matches!(kind, TypeKind::Uuid | TypeKind::Text),
            Self::Sequential { .. } | Self::IntRange { .. } => {
                matches!(kind, TypeKind::Int32 | TypeKind::Int64 | TypeKind::Float64)
            }
            Self::FloatRange { .. } => matches!(kind, TypeKind::Float64),
            Self::WeightedBool { .. } => matches!(kind, TypeKind::Bool),
            Self::TimestampRange { .. } => matches!(kind, TypeKind::DateTime),
            Self::Collection { .. } => matches!(kind, TypeKind::List),
            Self::OneOf { .. } | Self::Static { .. } => true,
        }
    }

    /// Whether this generator can produce values for the field type.
    pub fn accepts_type(&self, field_type: &FieldType) -> bool {
        self.accepts(&field_type.kind())
    }

    /// Built-in default generator for a type kind.
    ///
    /// Structural and opaque kinds have no default.
    pub fn default_for(kind: &TypeKind) -> Option<Self> {
        let config = match kind {
            TypeKind::Bool => Self::WeightedBool { true_weight: 0.5 },
            TypeKind::Int32 | TypeKind::Int64 => Self::IntRange { min: 1, max: 10_000 },
            TypeKind::Float64 => Self::FloatRange {
                min: 1.0,
                max: 10_000.0,
            },
            TypeKind::Text => Self::text(),
            TypeKind::Uuid => Self::UuidV4,
            TypeKind::DateTime => Self::TimestampRange {
                start: "2000-01-01T00:00:00Z".to_string(),
                end: "2030-12-31T23:59:59Z".to_string(),
            },
            TypeKind::List => Self::collection(),
            TypeKind::Object(_) | TypeKind::Opaque(_) => return None,
        };
        Some(config)
    }
}

fn check_order<T: PartialOrd + ToString>(
    option: &'static str,
    min: &T,
    max: &T,
) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvertedRange {
            option,
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Parse a timestamp string in RFC 3339 or date-only format.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_defaults_from_yaml() {
        let config: GeneratorConfig = serde_yaml::from_str("type: text").unwrap();
        assert_eq!(config, GeneratorConfig::text());

        let config: GeneratorConfig =
            serde_yaml::from_str("{ type: text, max_length: 4, case: mixed }").unwrap();
        assert!(matches!(
            config,
            GeneratorConfig::Text {
                min_length: 1,
                max_length: 4,
                case: Case::Mixed,
                charset: None
            }
        ));
    }

    #[test]
    fn test_one_of_from_yaml() {
        let config: GeneratorConfig =
            serde_yaml::from_str(r#"{ type: one_of, values: ["Mark", "Alex", "Vlad"] }"#).unwrap();
        let GeneratorConfig::OneOf { values } = config else {
            panic!("Expected OneOf");
        };
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], Value::String("Mark".to_string()));
    }

    #[test]
    fn test_validate_inverted_length() {
        let config = GeneratorConfig::Text {
            min_length: 8,
            max_length: 3,
            case: Case::Upper,
            charset: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { option: "length", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_inconsistent_options() {
        let empty_charset = GeneratorConfig::Text {
            min_length: 1,
            max_length: 3,
            case: Case::Upper,
            charset: Some(String::new()),
        };
        assert_eq!(empty_charset.validate(), Err(ConfigError::EmptyCharset));

        let no_choices = GeneratorConfig::OneOf { values: vec![] };
        assert_eq!(no_choices.validate(), Err(ConfigError::EmptyChoices));

        let weight = GeneratorConfig::WeightedBool { true_weight: 1.5 };
        assert_eq!(weight.validate(), Err(ConfigError::InvalidWeight(1.5)));

        let nan = GeneratorConfig::FloatRange {
            min: f64::NAN,
            max: 1.0,
        };
        assert_eq!(nan.validate(), Err(ConfigError::NonFinite("float_range")));

        let too_wide = GeneratorConfig::FloatRange {
            min: f64::MIN,
            max: f64::MAX,
        };
        assert_eq!(too_wide.validate(), Err(ConfigError::NonFinite("float_range")));

        let dates = GeneratorConfig::TimestampRange {
            start: "2024-01-01".to_string(),
            end: "2020-01-01".to_string(),
        };
        assert!(matches!(
            dates.validate(),
            Err(ConfigError::InvertedRange { .. })
        ));

        let garbage = GeneratorConfig::TimestampRange {
            start: "yesterday".to_string(),
            end: "2020-01-01".to_string(),
        };
        assert!(matches!(
            garbage.validate(),
            Err(ConfigError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_defaults_are_valid() {
        let kinds = [
            TypeKind::Bool,
            TypeKind::Int32,
            TypeKind::Int64,
            TypeKind::Float64,
            TypeKind::Text,
            TypeKind::Uuid,
            TypeKind::DateTime,
            TypeKind::List,
        ];
        for kind in kinds {
            let config = GeneratorConfig::default_for(&kind).unwrap();
            assert!(config.validate().is_ok(), "{kind}");
            assert!(config.accepts(&kind), "{kind}");
        }
        assert!(GeneratorConfig::default_for(&TypeKind::Object("User".into())).is_none());
    }

    #[test]
    fn test_accepts() {
        assert!(GeneratorConfig::Email.accepts(&TypeKind::Text));
        assert!(!GeneratorConfig::Email.accepts(&TypeKind::Int32));
        assert!(GeneratorConfig::UuidV4.accepts(&TypeKind::Text));
        assert!(GeneratorConfig::collection().accepts(&TypeKind::List));
        assert!(!GeneratorConfig::collection().accepts(&TypeKind::Text));
        assert!(GeneratorConfig::Static { value: Value::Null }.accepts(&TypeKind::List));
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2020-01-01T00:00:00Z").is_some());
        assert!(parse_timestamp("2020-01-01").is_some());
        assert!(parse_timestamp("01/01/2020").is_none());
    }
}
