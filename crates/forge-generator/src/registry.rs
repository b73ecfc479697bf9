//! Generator registry: the fallback generator of every slot.
//!
//! The registry maps type kinds and field paths to generator
//! configurations. It starts with a built-in default for every scalar kind
//! and for lists; callers override entries per kind or per field path.
//! Field entries take precedence over kind entries.

use forge_core::{ConfigError, FieldType, GeneratorConfig, TypeKind};
use std::collections::HashMap;

/// Error type for registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Generator options are inconsistent
    #[error("Invalid generator: {0}")]
    Config(#[from] ConfigError),

    /// Generator cannot produce values of the registered kind
    #[error("Generator {generator} cannot produce values of kind {kind}")]
    Incompatible { kind: TypeKind, generator: String },
}

/// Default generators by type kind and field path.
#[derive(Debug, Clone)]
pub struct GeneratorRegistry {
    by_kind: HashMap<TypeKind, GeneratorConfig>,
    by_field: HashMap<String, GeneratorConfig>,
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        let by_kind = [
            TypeKind::Bool,
            TypeKind::Int32,
            TypeKind::Int64,
            TypeKind::Float64,
            TypeKind::Text,
            TypeKind::Uuid,
            TypeKind::DateTime,
            TypeKind::List,
        ]
        .into_iter()
        .filter_map(|kind| GeneratorConfig::default_for(&kind).map(|config| (kind, config)))
        .collect();

        Self {
            by_kind,
            by_field: HashMap::new(),
        }
    }
}

impl GeneratorRegistry {
    /// Create a registry holding the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the generator for every slot of `kind`.
    pub fn register_type(
        &mut self,
        kind: TypeKind,
        config: GeneratorConfig,
    ) -> Result<(), RegistryError> {
        config.validate()?;
        if !config.accepts(&kind) {
            return Err(RegistryError::Incompatible {
                kind,
                generator: format!("{config:?}"),
            });
        }
        self.by_kind.insert(kind, config);
        Ok(())
    }

    /// Override the generator for one field path.
    pub fn register_field(
        &mut self,
        path: impl Into<String>,
        config: GeneratorConfig,
    ) -> Result<(), RegistryError> {
        config.validate()?;
        self.by_field.insert(path.into(), config);
        Ok(())
    }

    /// Generator for a slot: field entry, then kind entry.
    pub fn resolve(&self, path: &str, field_type: &FieldType) -> Option<&GeneratorConfig> {
        self.by_field
            .get(path)
            .or_else(|| self.by_kind.get(&field_type.kind()))
    }

    /// Registered field paths with their generators.
    pub fn field_entries(&self) -> impl Iterator<Item = (&str, &GeneratorConfig)> {
        self.by_field.iter().map(|(path, config)| (path.as_str(), config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let registry = GeneratorRegistry::new();

        assert_eq!(
            registry.resolve("name", &FieldType::Text),
            Some(&GeneratorConfig::text())
        );
        assert_eq!(
            registry.resolve("id", &FieldType::Uuid),
            Some(&GeneratorConfig::UuidV4)
        );
        assert_eq!(
            registry.resolve("tags", &FieldType::list(FieldType::Text)),
            Some(&GeneratorConfig::collection())
        );
        assert_eq!(registry.resolve("blob", &FieldType::opaque("Blob")), None);
    }

    #[test]
    fn test_field_beats_kind() {
        let mut registry = GeneratorRegistry::new();
        registry
            .register_type(TypeKind::Text, GeneratorConfig::Word)
            .unwrap();
        registry
            .register_field("email", GeneratorConfig::Email)
            .unwrap();

        assert_eq!(
            registry.resolve("email", &FieldType::Text),
            Some(&GeneratorConfig::Email)
        );
        assert_eq!(
            registry.resolve("name", &FieldType::Text),
            Some(&GeneratorConfig::Word)
        );
        assert_eq!(registry.field_entries().count(), 1);
    }

    #[test]
    fn test_register_rejects_invalid() {
        let mut registry = GeneratorRegistry::new();

        let inverted = GeneratorConfig::IntRange { min: 10, max: 1 };
        assert!(matches!(
            registry.register_type(TypeKind::Int32, inverted),
            Err(RegistryError::Config(_))
        ));

        assert!(matches!(
            registry.register_type(TypeKind::Int32, GeneratorConfig::Email),
            Err(RegistryError::Incompatible { .. })
        ));
    }

    #[test]
    fn test_opaque_kind_can_be_registered() {
        let mut registry = GeneratorRegistry::new();
        let money = TypeKind::Opaque("Money".to_string());
        registry
            .register_type(
                money,
                GeneratorConfig::Static {
                    value: forge_core::Value::from("0.00 EUR"),
                },
            )
            .unwrap();

        assert!(registry.resolve("price", &FieldType::opaque("Money")).is_some());
    }
}
