//! Selectors and bindings.
//!
//! A [`Binding`] pairs a [`Selector`] with an [`Action`]. The model keeps
//! its bindings in declaration order and [`resolve`] picks the one that
//! applies to a slot:
//!
//! 1. any matching `ignore` binding wins outright
//! 2. otherwise the last matching field binding
//! 3. otherwise the last matching type binding
//! 4. otherwise the registry default
//!
//! Root bindings never match a field; they are resolved separately by
//! [`resolve_root`] and apply to the whole instance.

use crate::fluent::Gen;
use forge_core::{FieldType, GeneratorConfig, Instance, TypeKind, Value};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifies the slots a binding applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// Exact field path from the root, e.g. `address.city` or
    /// `statistic_logins_list[].count`
    Field(String),

    /// Every slot of this kind anywhere in the object graph
    Type(TypeKind),

    /// The generated instance itself
    Root,
}

impl Selector {
    /// Whether this selector targets the slot.
    pub fn matches(&self, slot: &Slot<'_>) -> bool {
        match self {
            Self::Field(path) => path == slot.path,
            Self::Type(kind) => *kind == slot.field_type.kind(),
            Self::Root => false,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(path) => write!(f, "field({path})"),
            Self::Type(kind) => write!(f, "types({kind})"),
            Self::Root => f.write_str("root()"),
        }
    }
}

/// Select one field by path.
pub fn field(path: impl Into<String>) -> Selector {
    Selector::Field(path.into())
}

/// Select every slot of a kind.
pub fn types(kind: TypeKind) -> Selector {
    Selector::Type(kind)
}

/// Select every slot holding the nested structural type `T`.
pub fn types_of<T: Instance>() -> Selector {
    Selector::Type(TypeKind::object::<T>())
}

/// Select the generated instance.
pub fn root() -> Selector {
    Selector::Root
}

/// Combine selectors; the set matches a slot when any member does.
pub fn all(selectors: impl IntoIterator<Item = Selector>) -> SelectorSet {
    SelectorSet(selectors.into_iter().collect())
}

/// Several selectors combined with logical OR.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorSet(pub Vec<Selector>);

impl SelectorSet {
    pub fn iter(&self) -> impl Iterator<Item = &Selector> {
        self.0.iter()
    }
}

impl From<Selector> for SelectorSet {
    fn from(selector: Selector) -> Self {
        Self(vec![selector])
    }
}

impl IntoIterator for SelectorSet {
    type Item = Selector;
    type IntoIter = std::vec::IntoIter<Selector>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Caller-supplied generator function.
#[derive(Clone)]
pub struct Supplier(Arc<dyn Fn(&mut StdRng) -> Value + Send + Sync>);

impl Supplier {
    pub fn new<F, V>(supply: F) -> Self
    where
        F: Fn(&mut StdRng) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        Self(Arc::new(move |rng| supply(rng).into()))
    }

    pub fn supply(&self, rng: &mut StdRng) -> Value {
        (self.0)(rng)
    }
}

impl fmt::Debug for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Supplier(..)")
    }
}

/// What a binding does to the slots it selects.
#[derive(Debug, Clone)]
pub enum Action {
    /// Use this literal value
    Set(Value),

    /// Invoke this generator
    Generate(GeneratorConfig),

    /// Invoke a caller-supplied function
    Supply(Supplier),

    /// Leave the slot unset
    Ignore,
}

/// A selector with its action.
#[derive(Debug, Clone)]
pub struct Binding {
    pub selector: Selector,
    pub action: Action,
}

impl Binding {
    pub fn new(selector: Selector, action: Action) -> Self {
        Self { selector, action }
    }

    /// One binding per member of the set, sharing the action.
    pub fn expand(selectors: SelectorSet, action: Action) -> Vec<Binding> {
        selectors
            .into_iter()
            .map(|selector| Binding::new(selector, action.clone()))
            .collect()
    }
}

/// An ordered list of bindings with builder-style setters.
///
/// Used for per-call overrides and as the binding store of
/// [`ModelBuilder`](crate::ModelBuilder).
#[derive(Debug, Clone, Default)]
pub struct Bindings(Vec<Binding>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `value` for every selected slot.
    pub fn set(self, selectors: impl Into<SelectorSet>, value: impl Into<Value>) -> Self {
        self.bind(selectors, Action::Set(value.into()))
    }

    /// Generate selected slots with the configurator built by `configure`.
    pub fn generate<F, C>(self, selectors: impl Into<SelectorSet>, configure: F) -> Self
    where
        F: FnOnce(Gen) -> C,
        C: Into<GeneratorConfig>,
    {
        let config = configure(Gen).into();
        self.bind(selectors, Action::Generate(config))
    }

    /// Fill selected slots from a caller-supplied function.
    pub fn supply<F, V>(self, selectors: impl Into<SelectorSet>, supply: F) -> Self
    where
        F: Fn(&mut StdRng) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        self.bind(selectors, Action::Supply(Supplier::new(supply)))
    }

    /// Leave selected slots unset.
    pub fn ignore(self, selectors: impl Into<SelectorSet>) -> Self {
        self.bind(selectors, Action::Ignore)
    }

    pub fn bind(mut self, selectors: impl Into<SelectorSet>, action: Action) -> Self {
        self.0.extend(Binding::expand(selectors.into(), action));
        self
    }

    pub fn push(&mut self, binding: Binding) {
        self.0.push(binding);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Binding] {
        &self.0
    }
}

impl From<Vec<Binding>> for Bindings {
    fn from(bindings: Vec<Binding>) -> Self {
        Self(bindings)
    }
}

impl Extend<Binding> for Bindings {
    fn extend<I: IntoIterator<Item = Binding>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

/// A slot of the object graph being generated.
#[derive(Debug, Clone, Copy)]
pub struct Slot<'a> {
    pub path: &'a str,
    pub field_type: &'a FieldType,
}

/// The binding that applies to a slot.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
    /// Leave the slot at its zero value
    Ignore,

    /// Apply this action
    Bound(&'a Action),

    /// Fall back to the registry
    Default,
}

/// Resolve the binding for a slot. Bindings are in declaration order;
/// later ones override earlier ones of equal precedence.
pub fn resolve<'a>(
    bindings: impl IntoIterator<Item = &'a Binding>,
    slot: &Slot<'_>,
) -> Resolution<'a> {
    let mut by_field = None;
    let mut by_type = None;

    for binding in bindings {
        if !binding.selector.matches(slot) {
            continue;
        }
        if matches!(binding.action, Action::Ignore) {
            return Resolution::Ignore;
        }
        match binding.selector {
            Selector::Field(_) => by_field = Some(&binding.action),
            Selector::Type(_) => by_type = Some(&binding.action),
            Selector::Root => {}
        }
    }

    by_field
        .or(by_type)
        .map_or(Resolution::Default, Resolution::Bound)
}

/// Resolve the binding for the instance itself.
pub fn resolve_root<'a>(bindings: impl IntoIterator<Item = &'a Binding>) -> Resolution<'a> {
    let mut bound = None;

    for binding in bindings {
        if binding.selector != Selector::Root {
            continue;
        }
        if matches!(binding.action, Action::Ignore) {
            return Resolution::Ignore;
        }
        bound = Some(&binding.action);
    }

    bound.map_or(Resolution::Default, Resolution::Bound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(selector: Selector, config: GeneratorConfig) -> Binding {
        Binding::new(selector, Action::Generate(config))
    }

    fn set(selector: Selector, value: impl Into<Value>) -> Binding {
        Binding::new(selector, Action::Set(value.into()))
    }

    fn slot<'a>(path: &'a str, field_type: &'a FieldType) -> Slot<'a> {
        Slot { path, field_type }
    }

    #[test]
    fn test_field_beats_type_regardless_of_order() {
        let bindings = vec![
            set(field("email"), "a@b.c"),
            generate(types(TypeKind::Text), GeneratorConfig::Word),
        ];

        let resolved = resolve(&bindings, &slot("email", &FieldType::Text));
        assert!(matches!(resolved, Resolution::Bound(Action::Set(Value::String(s))) if s == "a@b.c"));

        let resolved = resolve(&bindings, &slot("name", &FieldType::Text));
        assert!(matches!(
            resolved,
            Resolution::Bound(Action::Generate(GeneratorConfig::Word))
        ));
    }

    #[test]
    fn test_last_declared_wins() {
        let bindings = vec![set(field("age"), 1), set(field("age"), 2)];

        let resolved = resolve(&bindings, &slot("age", &FieldType::Int32));
        assert!(matches!(
            resolved,
            Resolution::Bound(Action::Set(Value::Int32(2)))
        ));
    }

    #[test]
    fn test_ignore_wins_over_everything() {
        let bindings = vec![
            Binding::new(types(TypeKind::Uuid), Action::Ignore),
            set(field("id"), uuid::Uuid::nil()),
        ];

        let resolved = resolve(&bindings, &slot("id", &FieldType::Uuid));
        assert!(matches!(resolved, Resolution::Ignore));
    }

    #[test]
    fn test_no_match_defaults() {
        let bindings = vec![set(field("address.city"), "Paris")];

        assert!(matches!(
            resolve(&bindings, &slot("city", &FieldType::Text)),
            Resolution::Default
        ));
        assert!(matches!(
            resolve(&bindings, &slot("address.city", &FieldType::Text)),
            Resolution::Bound(_)
        ));
    }

    #[test]
    fn test_type_selector_matches_any_list() {
        let bindings = vec![generate(types(TypeKind::List), GeneratorConfig::collection())];

        let strings = FieldType::list(FieldType::Text);
        let numbers = FieldType::list(FieldType::Int64);
        assert!(matches!(resolve(&bindings, &slot("a", &strings)), Resolution::Bound(_)));
        assert!(matches!(resolve(&bindings, &slot("b", &numbers)), Resolution::Bound(_)));
    }

    #[test]
    fn test_root_is_resolved_separately() {
        let bindings = vec![Binding::new(root(), Action::Ignore)];

        assert!(matches!(
            resolve(&bindings, &slot("name", &FieldType::Text)),
            Resolution::Default
        ));
        assert!(matches!(resolve_root(&bindings), Resolution::Ignore));
        assert!(matches!(resolve_root(&[]), Resolution::Default));
    }

    #[test]
    fn test_expand_selector_set() {
        let bindings = Binding::expand(all([field("id"), field("name")]), Action::Ignore);

        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[1].selector, field("name"));
    }

    #[test]
    fn test_bindings_builder() {
        let bindings = Bindings::new()
            .set(field("age"), 30)
            .generate(types(TypeKind::Text), |gen| gen.string().length(15))
            .ignore(all([field("id"), field("email")]));

        assert_eq!(bindings.len(), 4);
        let resolved = resolve(bindings.as_slice(), &slot("name", &FieldType::Text));
        assert!(matches!(
            resolved,
            Resolution::Bound(Action::Generate(GeneratorConfig::Text { min_length: 15, max_length: 15, .. }))
        ));
        assert!(matches!(
            resolve(bindings.as_slice(), &slot("email", &FieldType::Text)),
            Resolution::Ignore
        ));
    }

    #[test]
    fn test_selector_yaml() {
        let selectors: Vec<Selector> =
            serde_yaml::from_str("[{ field: address.city }, { type: text }, root]").unwrap();

        assert_eq!(
            selectors,
            vec![field("address.city"), types(TypeKind::Text), root()]
        );
    }
}
