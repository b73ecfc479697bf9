//! Models: reusable, immutable generation setups.
//!
//! A [`ModelBuilder`] accumulates bindings, assignment rules, a registry
//! and settings. [`ModelBuilder::to_model`] introspects the root type,
//! validates everything and freezes the result into a [`Model`], which is
//! cheap to clone and safe to share between threads.

use crate::assign::{AssignmentRule, RuleSet};
use crate::build::{build, build_many};
use crate::config::ModelConfig;
use crate::error::{ForgeError, Result};
use crate::fluent::Gen;
use crate::select::{Action, Binding, Bindings, Selector, SelectorSet};
use forge_core::{
    FieldType, GeneratorConfig, Instance, ObjectValue, SchemaGraph, TypeKind, Value, ValueError,
};
use forge_generator::GeneratorRegistry;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Default nesting bound for structural types.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Default regeneration bound for unique slots.
pub const DEFAULT_MAX_UNIQUE_ATTEMPTS: usize = 1000;

/// Settings of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Seed for every call; `None` draws fresh entropy per call
    pub seed: Option<u64>,

    /// Objects nested deeper than this are left null
    pub max_depth: usize,

    /// Attempts per unique slot before giving up
    pub max_unique_attempts: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            seed: None,
            max_depth: DEFAULT_MAX_DEPTH,
            max_unique_attempts: DEFAULT_MAX_UNIQUE_ATTEMPTS,
        }
    }
}

impl ModelSettings {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_unique_attempts(mut self, attempts: usize) -> Self {
        self.max_unique_attempts = attempts;
        self
    }

    /// A fresh RNG for one call.
    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

// ============================================================================
// Blueprint
// ============================================================================

/// The validated, type-erased contents of a model.
#[derive(Debug)]
pub struct Blueprint {
    pub(crate) graph: SchemaGraph,
    pub(crate) root_type: FieldType,
    pub(crate) bindings: Vec<Binding>,
    pub(crate) declared_rules: Vec<AssignmentRule>,
    pub(crate) rules: RuleSet,
    pub(crate) registry: GeneratorRegistry,
    pub(crate) settings: ModelSettings,
}

impl Blueprint {
    pub fn graph(&self) -> &SchemaGraph {
        &self.graph
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// Check a binding against the schema graph.
    pub(crate) fn check(&self, binding: &Binding) -> Result<()> {
        match &binding.selector {
            Selector::Field(path) => {
                let field_type = self.graph.field_type_at(path).map_err(|e| {
                    ForgeError::invalid(format!("{} selects nothing: {e}", binding.selector))
                })?;
                check_action(&binding.selector, &binding.action, field_type)
            }
            Selector::Type(kind) => match scalar_type(kind) {
                Some(field_type) => check_action(&binding.selector, &binding.action, &field_type),
                None => check_kind(&binding.selector, &binding.action, kind),
            },
            Selector::Root => match &binding.action {
                Action::Generate(config)
                    if !matches!(
                        config,
                        GeneratorConfig::Static { .. } | GeneratorConfig::OneOf { .. }
                    ) =>
                {
                    Err(ForgeError::invalid(format!(
                        "root() can only be generated from static or one_of values, got {config:?}"
                    )))
                }
                action => check_action(&binding.selector, action, &self.root_type),
            },
        }
    }
}

/// The field type of a scalar kind.
fn scalar_type(kind: &TypeKind) -> Option<FieldType> {
    let field_type = match kind {
        TypeKind::Bool => FieldType::Bool,
        TypeKind::Int32 => FieldType::Int32,
        TypeKind::Int64 => FieldType::Int64,
        TypeKind::Float64 => FieldType::Float64,
        TypeKind::Text => FieldType::Text,
        TypeKind::Uuid => FieldType::Uuid,
        TypeKind::DateTime => FieldType::DateTime,
        TypeKind::List | TypeKind::Object(_) | TypeKind::Opaque(_) => return None,
    };
    Some(field_type)
}

fn check_action(selector: &Selector, action: &Action, field_type: &FieldType) -> Result<()> {
    let fits = |value: &Value| value.clone().coerce(field_type).is_some();

    match action {
        Action::Set(value) if !fits(value) => Err(ForgeError::invalid(format!(
            "cannot set {} value on {selector} of type {field_type}",
            value.type_label()
        ))),
        Action::Generate(config) => {
            config.validate()?;
            if !config.accepts_type(field_type) {
                return Err(ForgeError::invalid(format!(
                    "generator {config:?} cannot produce {selector} of type {field_type}"
                )));
            }
            let values_fit = match config {
                GeneratorConfig::OneOf { values } => values.iter().all(fits),
                GeneratorConfig::Static { value } => fits(value),
                _ => true,
            };
            if !values_fit {
                return Err(ForgeError::invalid(format!(
                    "generator {config:?} holds values that do not fit {selector} of type {field_type}"
                )));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Type selectors over lists and structural types only check the
/// generator itself; values are coerced per slot when building.
fn check_kind(selector: &Selector, action: &Action, kind: &TypeKind) -> Result<()> {
    match action {
        Action::Generate(config) => {
            config.validate()?;
            if !config.accepts(kind) {
                return Err(ForgeError::invalid(format!(
                    "generator {config:?} cannot produce {selector}"
                )));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

// ============================================================================
// ModelBuilder
// ============================================================================

/// Accumulates the configuration of a [`Model`].
pub struct ModelBuilder<T> {
    bindings: Bindings,
    rules: Vec<AssignmentRule>,
    registry: GeneratorRegistry,
    settings: ModelSettings,
    _marker: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for ModelBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBuilder")
            .field("bindings", &self.bindings)
            .field("rules", &self.rules)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<T: Instance> Default for ModelBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Instance> ModelBuilder<T> {
    pub fn new() -> Self {
        Self {
            bindings: Bindings::new(),
            rules: Vec::new(),
            registry: GeneratorRegistry::new(),
            settings: ModelSettings::default(),
            _marker: PhantomData,
        }
    }

    /// Use `value` for every selected slot.
    pub fn set(mut self, selectors: impl Into<SelectorSet>, value: impl Into<Value>) -> Self {
        self.bindings = self.bindings.set(selectors, value);
        self
    }

    /// Generate selected slots with the configurator built by `configure`.
    ///
    /// ```rust,ignore
    /// builder.generate(field("name"), |gen| gen.string().mixed_case().max_length(10))
    /// ```
    pub fn generate<F, C>(mut self, selectors: impl Into<SelectorSet>, configure: F) -> Self
    where
        F: FnOnce(Gen) -> C,
        C: Into<GeneratorConfig>,
    {
        self.bindings = self.bindings.generate(selectors, configure);
        self
    }

    /// Fill selected slots from a caller-supplied function of the RNG.
    pub fn supply<F, V>(mut self, selectors: impl Into<SelectorSet>, supply: F) -> Self
    where
        F: Fn(&mut StdRng) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        self.bindings = self.bindings.supply(selectors, supply);
        self
    }

    /// Leave selected slots at their zero value.
    pub fn ignore(mut self, selectors: impl Into<SelectorSet>) -> Self {
        self.bindings = self.bindings.ignore(selectors);
        self
    }

    /// Add a conditional assignment rule.
    pub fn assign(mut self, rule: AssignmentRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.settings.seed = Some(seed);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.settings.max_depth = max_depth;
        self
    }

    pub fn with_max_unique_attempts(mut self, attempts: usize) -> Self {
        self.settings.max_unique_attempts = attempts;
        self
    }

    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the fallback generators.
    pub fn with_registry(mut self, registry: GeneratorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Apply a parsed YAML configuration on top of this builder.
    pub fn with_config(mut self, config: ModelConfig) -> Result<Self> {
        if let Some(seed) = config.seed {
            self.settings.seed = Some(seed);
        }
        if let Some(max_depth) = config.max_depth {
            self.settings.max_depth = max_depth;
        }
        if let Some(attempts) = config.max_unique_attempts {
            self.settings.max_unique_attempts = attempts;
        }
        self.bindings.extend(config.to_bindings()?);
        self.rules.extend(config.to_rules()?);
        Ok(self)
    }

    /// Validate and freeze the configuration.
    pub fn to_model(self) -> Result<Model<T>> {
        if self.settings.max_unique_attempts == 0 {
            return Err(ForgeError::invalid("max_unique_attempts must be at least 1"));
        }

        let graph = SchemaGraph::introspect::<T>()?;
        let rules = RuleSet::compile(&self.rules, &graph)?;
        let blueprint = Blueprint {
            graph,
            root_type: FieldType::object::<T>(),
            bindings: self.bindings.as_slice().to_vec(),
            declared_rules: self.rules,
            rules,
            registry: self.registry,
            settings: self.settings,
        };
        for binding in &blueprint.bindings {
            blueprint.check(binding)?;
        }

        debug!(
            type_name = T::NAME,
            types = blueprint.graph.type_names().len(),
            bindings = blueprint.bindings.len(),
            rules = blueprint.rules.len(),
            "Model finalized"
        );

        Ok(Model {
            blueprint: Arc::new(blueprint),
            _marker: PhantomData,
        })
    }

    /// Finalize and create one instance.
    pub fn create(self) -> Result<T> {
        self.to_model()?.create()
    }

    /// Create `count` instances once finalized.
    pub fn list(self, count: usize) -> ListBuilder<T> {
        ListBuilder::new(Source::Builder(self), count)
    }
}

// ============================================================================
// Model
// ============================================================================

/// A frozen, shareable generation setup for `T`.
pub struct Model<T> {
    blueprint: Arc<Blueprint>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Model<T> {
    fn clone(&self) -> Self {
        Self {
            blueprint: Arc::clone(&self.blueprint),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("blueprint", &self.blueprint)
            .finish()
    }
}

impl<T: Instance> Model<T> {
    pub fn builder() -> ModelBuilder<T> {
        ModelBuilder::new()
    }

    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.blueprint.settings
    }

    /// Create one instance.
    pub fn create(&self) -> Result<T> {
        let mut rng = self.settings().rng();
        self.create_with(&Bindings::new(), &mut rng)
    }

    /// Create one instance from an explicit seed.
    pub fn create_with_seed(&self, seed: u64) -> Result<T> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.create_with(&Bindings::new(), &mut rng)
    }

    /// Create one instance with per-call overrides layered on top of the
    /// model's bindings.
    pub fn build_with(&self, overrides: Bindings) -> Result<T> {
        let mut rng = self.settings().rng();
        self.create_with(&overrides, &mut rng)
    }

    /// Create `count` instances.
    pub fn list(&self, count: usize) -> ListBuilder<T> {
        ListBuilder::new(Source::Model(self.clone()), count)
    }

    /// A builder starting from this model's configuration.
    pub fn customize(&self) -> ModelBuilder<T> {
        let blueprint = &self.blueprint;
        ModelBuilder {
            bindings: Bindings::from(blueprint.bindings.clone()),
            rules: blueprint.declared_rules.clone(),
            registry: blueprint.registry.clone(),
            settings: blueprint.settings.clone(),
            _marker: PhantomData,
        }
    }

    fn create_with(&self, overrides: &Bindings, rng: &mut StdRng) -> Result<T> {
        let value = build(self, overrides.as_slice(), rng, 0)?;
        self.instance(value)
    }

    /// Convert a built value into `T`. A null root (ignored) becomes the
    /// instance with every field at its zero value.
    pub(crate) fn instance(&self, value: Value) -> Result<T> {
        match value {
            Value::Object(object) => Ok(T::from_object(&object)?),
            Value::Null => {
                let empty = self
                    .blueprint
                    .graph
                    .root()
                    .fields
                    .iter()
                    .fold(ObjectValue::new(T::NAME), |object, field| {
                        object.with(field.name.clone(), Value::Null)
                    });
                Ok(T::from_object(&empty)?)
            }
            other => Err(ValueError::TypeMismatch {
                field: T::NAME.to_string(),
                expected: "object",
                found: other.type_label().to_string(),
            }
            .into()),
        }
    }
}

// ============================================================================
// Lists
// ============================================================================

enum Source<T> {
    Builder(ModelBuilder<T>),
    Model(Model<T>),
}

/// Creates a batch of instances, optionally unique on some slots.
pub struct ListBuilder<T> {
    source: Source<T>,
    count: usize,
    unique_on: Vec<Selector>,
    overrides: Bindings,
    seed: Option<u64>,
}

impl<T: Instance> ListBuilder<T> {
    fn new(source: Source<T>, count: usize) -> Self {
        Self {
            source,
            count,
            unique_on: Vec::new(),
            overrides: Bindings::new(),
            seed: None,
        }
    }

    /// Require pairwise-distinct values in the selected slots.
    pub fn with_unique(mut self, selectors: impl Into<SelectorSet>) -> Self {
        self.unique_on.extend(selectors.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn set(mut self, selectors: impl Into<SelectorSet>, value: impl Into<Value>) -> Self {
        self.overrides = self.overrides.set(selectors, value);
        self
    }

    pub fn generate<F, C>(mut self, selectors: impl Into<SelectorSet>, configure: F) -> Self
    where
        F: FnOnce(Gen) -> C,
        C: Into<GeneratorConfig>,
    {
        self.overrides = self.overrides.generate(selectors, configure);
        self
    }

    pub fn supply<F, V>(mut self, selectors: impl Into<SelectorSet>, supply: F) -> Self
    where
        F: Fn(&mut StdRng) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        self.overrides = self.overrides.supply(selectors, supply);
        self
    }

    pub fn ignore(mut self, selectors: impl Into<SelectorSet>) -> Self {
        self.overrides = self.overrides.ignore(selectors);
        self
    }

    pub fn create(self) -> Result<Vec<T>> {
        let model = match self.source {
            Source::Builder(builder) => builder.to_model()?,
            Source::Model(model) => model,
        };
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => model.settings().rng(),
        };

        build_many(
            &model,
            self.count,
            &self.unique_on,
            self.overrides.as_slice(),
            &mut rng,
        )?
        .into_iter()
        .map(|value| model.instance(value))
        .collect()
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Entry points for one-off creation and model building.
///
/// ```rust,ignore
/// let user: User = Forge::create()?;
/// let users = Forge::of_list::<User>(10).create()?;
/// let model = Forge::of::<User>().ignore(field("id")).to_model()?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Forge;

impl Forge {
    /// One instance with default generation.
    pub fn create<T: Instance>() -> Result<T> {
        ModelBuilder::<T>::new().create()
    }

    /// A builder for `T`.
    pub fn of<T: Instance>() -> ModelBuilder<T> {
        ModelBuilder::new()
    }

    /// A batch of `count` instances.
    pub fn of_list<T: Instance>(count: usize) -> ListBuilder<T> {
        ModelBuilder::new().list(count)
    }

    /// A builder starting from an existing model.
    pub fn of_model<T: Instance>(model: &Model<T>) -> ModelBuilder<T> {
        model.customize()
    }

    /// One instance from an existing model.
    pub fn create_from<T: Instance>(model: &Model<T>) -> Result<T> {
        model.create()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::given;
    use crate::select::{field, root, types};
    use forge_core::Schema;

    #[derive(Debug, PartialEq)]
    struct Pair {
        label: String,
        weight: i64,
    }

    impl Instance for Pair {
        const NAME: &'static str = "Pair";

        fn schema() -> Schema {
            Schema::new(Self::NAME)
                .field("label", FieldType::Text)
                .field("weight", FieldType::Int64)
        }

        fn from_object(object: &ObjectValue) -> Result<Self, ValueError> {
            Ok(Self {
                label: object.get("label")?,
                weight: object.get("weight")?,
            })
        }
    }

    fn assert_invalid<T: fmt::Debug>(result: Result<T>) {
        assert!(
            matches!(result, Err(ForgeError::InvalidConfiguration(_))),
            "{result:?}"
        );
    }

    #[test]
    fn test_default_settings() {
        let settings = ModelSettings::default();
        assert_eq!(settings.seed, None);
        assert_eq!(settings.max_depth, 8);
        assert_eq!(settings.max_unique_attempts, 1000);
    }

    #[test]
    fn test_model_is_send_sync() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<Model<Pair>>();
    }

    #[test]
    fn test_seeded_model_repeats() {
        let model = Forge::of::<Pair>().with_seed(11).to_model().unwrap();
        assert_eq!(model.create().unwrap(), model.create().unwrap());
        assert_eq!(
            model.create_with_seed(3).unwrap(),
            model.create_with_seed(3).unwrap()
        );
    }

    #[test]
    fn test_reject_unknown_field() {
        assert_invalid(Forge::of::<Pair>().set(field("colour"), "red").to_model());
    }

    #[test]
    fn test_reject_mismatched_set() {
        assert_invalid(Forge::of::<Pair>().set(field("weight"), "heavy").to_model());
        assert_invalid(Forge::of::<Pair>().set(types(TypeKind::Int64), true).to_model());
    }

    #[test]
    fn test_reject_inverted_length() {
        assert_invalid(
            Forge::of::<Pair>()
                .generate(field("label"), |_| GeneratorConfig::Text {
                    min_length: 9,
                    max_length: 5,
                    case: Default::default(),
                    charset: None,
                })
                .to_model(),
        );
    }

    #[test]
    fn test_reject_incompatible_generator() {
        assert_invalid(
            Forge::of::<Pair>()
                .generate(field("weight"), |gen| gen.net().email())
                .to_model(),
        );
    }

    #[test]
    fn test_reject_zero_attempts() {
        assert_invalid(Forge::of::<Pair>().with_max_unique_attempts(0).to_model());
    }

    #[test]
    fn test_root_set_and_ignore() {
        let fixed = ObjectValue::new("Pair").with("label", "x").with("weight", 4i64);
        let pair = Forge::of::<Pair>().set(root(), fixed).create().unwrap();
        assert_eq!(pair, Pair { label: "x".into(), weight: 4 });

        let empty = Forge::of::<Pair>().ignore(root()).create().unwrap();
        assert_eq!(empty, Pair { label: String::new(), weight: 0 });

        assert_invalid(
            Forge::of::<Pair>()
                .generate(root(), |gen| gen.ints())
                .to_model(),
        );
    }

    #[test]
    fn test_customize_keeps_configuration() {
        let base = Forge::of::<Pair>()
            .set(field("label"), "base")
            .assign(given(field("label")).is("base").set(field("weight"), 9i64))
            .to_model()
            .unwrap();

        let derived = Forge::of_model(&base).set(field("label"), "other").to_model().unwrap();

        assert_eq!(base.create().unwrap(), Pair { label: "base".into(), weight: 9 });
        assert_eq!(derived.create().unwrap().label, "other");
        assert_eq!(derived.blueprint().bindings().len(), 2);
    }

    #[test]
    fn test_build_with_overrides() {
        let model = Forge::of::<Pair>().set(field("label"), "model").to_model().unwrap();

        let pair = model
            .build_with(Bindings::new().set(field("label"), "call"))
            .unwrap();
        assert_eq!(pair.label, "call");
        assert_eq!(model.create().unwrap().label, "model");
    }
}
