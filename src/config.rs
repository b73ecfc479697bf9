//! YAML model configuration.
//!
//! A configuration file declares settings, bindings and assignment rules
//! for a model:
//!
//! ```yaml
//! seed: 42
//! max_unique_attempts: 200
//! bindings:
//!   - select: { field: name }
//!     generate: { type: one_of, values: [Mark, Alex, Vlad] }
//!   - select: [{ field: id }, { type: date_time }]
//!     ignore: true
//!   - select: { type: text }
//!     generate: { type: text, min_length: 15, max_length: 15 }
//! assign:
//!   - given: name
//!     when: { is: Mark }
//!     target: age
//!     set: 2
//! ```

use crate::assign::{AssignAction, AssignmentRule, Condition};
use crate::error::{ForgeError, Result};
use crate::select::{Action, Binding, Selector};
use forge_core::{GeneratorConfig, Value};
use serde::Deserialize;
use std::fs;
use std::path::Path;

fn default_version() -> u32 {
    1
}

/// A model configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Configuration format version
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub max_depth: Option<usize>,

    #[serde(default)]
    pub max_unique_attempts: Option<usize>,

    #[serde(default)]
    pub bindings: Vec<BindingConfig>,

    #[serde(default)]
    pub assign: Vec<RuleConfig>,
}

/// One selector, or several combined.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SelectConfig {
    One(Selector),
    Many(Vec<Selector>),
}

impl SelectConfig {
    fn selectors(&self) -> Vec<Selector> {
        match self {
            Self::One(selector) => vec![selector.clone()],
            Self::Many(selectors) => selectors.clone(),
        }
    }
}

/// A binding entry. Exactly one of `set`, `generate` or `ignore` is given.
#[derive(Debug, Clone, Deserialize)]
pub struct BindingConfig {
    pub select: SelectConfig,

    #[serde(default)]
    pub set: Option<Value>,

    #[serde(default)]
    pub generate: Option<GeneratorConfig>,

    #[serde(default)]
    pub ignore: bool,
}

impl BindingConfig {
    fn action(&self) -> Result<Action> {
        match (&self.set, &self.generate, self.ignore) {
            (Some(value), None, false) => Ok(Action::Set(value.clone())),
            (None, Some(config), false) => Ok(Action::Generate(config.clone())),
            (None, None, true) => Ok(Action::Ignore),
            _ => Err(ForgeError::invalid(format!(
                "binding for {:?} needs exactly one of set, generate or ignore",
                self.select
            ))),
        }
    }
}

/// An assignment rule entry. Exactly one of `set` or `generate` is given.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    /// Origin field path
    pub given: String,

    pub when: Condition,

    /// Target field path
    pub target: String,

    #[serde(default)]
    pub set: Option<Value>,

    #[serde(default)]
    pub generate: Option<GeneratorConfig>,
}

impl RuleConfig {
    fn to_rule(&self) -> Result<AssignmentRule> {
        let action = match (&self.set, &self.generate) {
            (Some(value), None) => AssignAction::Set(value.clone()),
            (None, Some(config)) => AssignAction::Generate(config.clone()),
            _ => {
                return Err(ForgeError::invalid(format!(
                    "rule on '{}' needs exactly one of set or generate",
                    self.target
                )))
            }
        };

        Ok(AssignmentRule {
            origin: Selector::Field(self.given.clone()),
            condition: self.when.clone(),
            target: Selector::Field(self.target.clone()),
            action,
        })
    }
}

impl ModelConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(forge_core::SchemaError::from)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ModelConfig = serde_yaml::from_str(yaml)?;
        if config.version != 1 {
            return Err(ForgeError::invalid(format!(
                "unsupported configuration version {}",
                config.version
            )));
        }
        Ok(config)
    }

    /// Bindings in declaration order.
    pub fn to_bindings(&self) -> Result<Vec<Binding>> {
        let mut bindings = Vec::new();
        for entry in &self.bindings {
            let action = entry.action()?;
            bindings.extend(
                entry
                    .select
                    .selectors()
                    .into_iter()
                    .map(|selector| Binding::new(selector, action.clone())),
            );
        }
        Ok(bindings)
    }

    /// Assignment rules in declaration order.
    pub fn to_rules(&self) -> Result<Vec<AssignmentRule>> {
        self.assign.iter().map(RuleConfig::to_rule).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::TypeKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CONFIG: &str = r#"
seed: 42
max_unique_attempts: 200
bindings:
  - select: { field: name }
    generate: { type: one_of, values: [Mark, Alex, Vlad] }
  - select: [{ field: id }, { type: date_time }]
    ignore: true
  - select: { type: text }
    generate: { type: text, min_length: 15, max_length: 15 }
  - select: { field: age }
    set: 30
assign:
  - given: name
    when: { is: Mark }
    target: age
    set: 2
  - given: nickname
    when: is_null
    target: nickname
    generate: { type: word }
"#;

    #[test]
    fn test_parse_config() {
        let config = ModelConfig::from_yaml(CONFIG).unwrap();

        assert_eq!(config.version, 1);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_unique_attempts, Some(200));
        assert_eq!(config.max_depth, None);

        let bindings = config.to_bindings().unwrap();
        assert_eq!(bindings.len(), 5);
        assert_eq!(bindings[1].selector, Selector::Field("id".into()));
        assert_eq!(bindings[2].selector, Selector::Type(TypeKind::DateTime));
        assert!(matches!(bindings[2].action, Action::Ignore));
        assert!(matches!(bindings[4].action, Action::Set(Value::Int64(30))));

        let rules = config.to_rules().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].condition, Condition::Is(Value::from("Mark")));
        assert_eq!(rules[1].condition, Condition::IsNull);
        assert_eq!(rules[1].action, AssignAction::Generate(GeneratorConfig::Word));
    }

    #[test]
    fn test_binding_needs_one_action() {
        let config = ModelConfig::from_yaml(
            r#"
bindings:
  - select: { field: name }
    set: Mark
    ignore: true
"#,
        )
        .unwrap();

        assert!(matches!(
            config.to_bindings(),
            Err(ForgeError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_unsupported_version() {
        assert!(matches!(
            ModelConfig::from_yaml("version: 2"),
            Err(ForgeError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let config = ModelConfig::from_file(file.path()).unwrap();
        assert_eq!(config.bindings.len(), 4);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ModelConfig::from_file("/nonexistent/model.yaml"),
            Err(ForgeError::Schema(_))
        ));
    }
}
