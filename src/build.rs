//! Object builder.
//!
//! Walks the schema graph of a model depth-first, in field declaration
//! order. Every slot is resolved against the model's bindings followed by
//! the per-call overrides; unbound slots fall back to the registry, and
//! unbound structural slots recurse. Assignment rules run on each object
//! once all of its fields exist.

use crate::assign::AssignAction;
use crate::error::{ForgeError, Result};
use crate::model::{Blueprint, Model};
use crate::select::{resolve, resolve_root, Action, Binding, Resolution, Selector, Slot};
use forge_core::{FieldType, GeneratorConfig, Instance, ObjectValue, Schema, Value};
use forge_generator::{generate_value, Generated};
use rand::rngs::StdRng;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

/// Build one instance as a value tree.
///
/// `index` is the position of the instance within its batch. Returns
/// `Value::Null` when the root is ignored.
pub fn build<T: Instance>(
    model: &Model<T>,
    overrides: &[Binding],
    rng: &mut StdRng,
    index: u64,
) -> Result<Value> {
    let blueprint = model.blueprint();
    check_overrides(blueprint, overrides)?;

    let mut builder = ObjectBuilder::new(blueprint, overrides, &[]);
    builder.build_root(rng, index)
}

/// Build `count` instances, keeping slots selected by `unique_on`
/// pairwise distinct across the batch.
pub fn build_many<T: Instance>(
    model: &Model<T>,
    count: usize,
    unique_on: &[Selector],
    overrides: &[Binding],
    rng: &mut StdRng,
) -> Result<Vec<Value>> {
    let blueprint = model.blueprint();
    check_overrides(blueprint, overrides)?;
    if unique_on.contains(&Selector::Root) {
        return Err(ForgeError::invalid("uniqueness cannot be requested on root()"));
    }

    let mut builder = ObjectBuilder::new(blueprint, overrides, unique_on);
    let instances = (0..count)
        .map(|index| builder.build_root(rng, index as u64))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        type_name = blueprint.graph.root().name.as_str(),
        count = instances.len(),
        unique = unique_on.len(),
        "Batch generated"
    );
    Ok(instances)
}

fn check_overrides(blueprint: &Blueprint, overrides: &[Binding]) -> Result<()> {
    overrides.iter().try_for_each(|binding| blueprint.check(binding))
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn mismatch(path: &str, value: &Value, field_type: &FieldType) -> ForgeError {
    ForgeError::invalid(format!(
        "{} value does not fit '{path}' of type {field_type}",
        value.type_label()
    ))
}

/// Values already accepted per unique path in the current batch.
#[derive(Debug, Default, Clone)]
struct UniqueTracker {
    seen: HashMap<String, HashSet<String>>,
}

impl UniqueTracker {
    /// Record the value; false if it was seen before.
    fn accept(&mut self, path: &str, value: &Value) -> Result<bool> {
        let key = serde_json::to_string(value)?;
        Ok(self.seen.entry(path.to_string()).or_default().insert(key))
    }
}

struct ObjectBuilder<'m> {
    blueprint: &'m Blueprint,
    overrides: &'m [Binding],
    unique_on: &'m [Selector],
    unique: UniqueTracker,
    index: u64,
}

impl<'m> ObjectBuilder<'m> {
    fn new(blueprint: &'m Blueprint, overrides: &'m [Binding], unique_on: &'m [Selector]) -> Self {
        Self {
            blueprint,
            overrides,
            unique_on,
            unique: UniqueTracker::default(),
            index: 0,
        }
    }

    /// Model bindings, then overrides; later entries win.
    fn bindings(&self) -> impl Iterator<Item = &'m Binding> + 'm {
        let (blueprint, overrides) = (self.blueprint, self.overrides);
        blueprint.bindings.iter().chain(overrides.iter())
    }

    fn build_root(&mut self, rng: &mut StdRng, index: u64) -> Result<Value> {
        self.index = index;
        let blueprint = self.blueprint;
        let root_type = &blueprint.root_type;

        match resolve_root(self.bindings()) {
            Resolution::Ignore => Ok(Value::Null),
            Resolution::Bound(action) => self.apply("", root_type, action, 0, rng),
            Resolution::Default => self
                .build_object(blueprint.graph.root(), "", 0, rng)
                .map(Value::Object),
        }
    }

    fn build_object(
        &mut self,
        schema: &'m Schema,
        prefix: &str,
        depth: usize,
        rng: &mut StdRng,
    ) -> Result<ObjectValue> {
        let mut object = ObjectValue::new(schema.name.clone());

        for field in &schema.fields {
            let path = join(prefix, &field.name);
            let value = self.build_slot(&path, &field.field_type, depth, rng)?;
            object.insert(field.name.clone(), value);
        }

        self.apply_rules(prefix, &mut object, depth, rng)?;
        Ok(object)
    }

    fn build_slot(
        &mut self,
        path: &str,
        field_type: &FieldType,
        depth: usize,
        rng: &mut StdRng,
    ) -> Result<Value> {
        let slot = Slot { path, field_type };
        let resolution = resolve(self.bindings(), &slot);

        let unique = !matches!(resolution, Resolution::Ignore)
            && self.unique_on.iter().any(|selector| selector.matches(&slot));
        if !unique {
            return self.produce(resolution, path, field_type, depth, rng);
        }

        // Unique slots nested in a rejected attempt must not stay recorded.
        let nested = matches!(field_type, FieldType::Object(_) | FieldType::List { .. });
        let attempts = self.blueprint.settings.max_unique_attempts;
        for attempt in 1..=attempts {
            let snapshot = nested.then(|| self.unique.clone());
            let value = self.produce(resolution, path, field_type, depth, rng)?;
            if self.unique.accept(path, &value)? {
                return Ok(value);
            }
            if let Some(snapshot) = snapshot {
                self.unique = snapshot;
            }
            trace!(path, attempt, index = self.index, "Duplicate value, regenerating");
        }

        Err(ForgeError::UniquenessExhausted {
            path: path.to_string(),
            attempts,
        })
    }

    fn produce(
        &mut self,
        resolution: Resolution<'m>,
        path: &str,
        field_type: &FieldType,
        depth: usize,
        rng: &mut StdRng,
    ) -> Result<Value> {
        match resolution {
            Resolution::Ignore => Ok(Value::Null),
            Resolution::Bound(action) => self.apply(path, field_type, action, depth, rng),
            Resolution::Default => self.fallback(path, field_type, depth, rng),
        }
    }

    fn apply(
        &mut self,
        path: &str,
        field_type: &FieldType,
        action: &Action,
        depth: usize,
        rng: &mut StdRng,
    ) -> Result<Value> {
        match action {
            Action::Ignore => Ok(Value::Null),
            Action::Set(value) => value
                .clone()
                .coerce(field_type)
                .ok_or_else(|| mismatch(path, value, field_type)),
            Action::Generate(config) => self.generate(config, path, field_type, depth, rng),
            Action::Supply(supplier) => {
                let value = supplier.supply(rng);
                let label = value.type_label();
                value.coerce(field_type).ok_or_else(|| {
                    ForgeError::invalid(format!(
                        "supplied {label} value does not fit '{path}' of type {field_type}"
                    ))
                })
            }
        }
    }

    /// Unbound slot: recurse into structures, otherwise use the registry.
    /// Opaque types resolve only through registry entries.
    fn fallback(
        &mut self,
        path: &str,
        field_type: &FieldType,
        depth: usize,
        rng: &mut StdRng,
    ) -> Result<Value> {
        let blueprint = self.blueprint;

        match field_type {
            FieldType::Object(reference) => {
                if depth >= blueprint.settings.max_depth {
                    warn!(
                        path,
                        type_name = reference.type_name(),
                        max_depth = blueprint.settings.max_depth,
                        "Maximum depth reached, leaving object null"
                    );
                    return Ok(Value::Null);
                }
                let schema = blueprint.graph.get(reference.type_name()).ok_or_else(|| {
                    ForgeError::UnsupportedType {
                        path: path.to_string(),
                        type_name: reference.type_name().to_string(),
                    }
                })?;
                self.build_object(schema, path, depth + 1, rng)
                    .map(Value::Object)
            }
            _ => match blueprint.registry.resolve(path, field_type) {
                Some(config) => self.generate(config, path, field_type, depth, rng),
                None => Err(ForgeError::UnsupportedType {
                    path: path.to_string(),
                    type_name: match field_type {
                        FieldType::Opaque { type_name } => type_name.clone(),
                        other => other.to_string(),
                    },
                }),
            },
        }
    }

    fn generate(
        &mut self,
        config: &GeneratorConfig,
        path: &str,
        field_type: &FieldType,
        depth: usize,
        rng: &mut StdRng,
    ) -> Result<Value> {
        match generate_value(config, rng, self.index) {
            Generated::Value(value) => {
                let label = value.type_label();
                value.coerce(field_type).ok_or_else(|| {
                    ForgeError::invalid(format!(
                        "generated {label} value does not fit '{path}' of type {field_type}"
                    ))
                })
            }
            Generated::Collection { size } => {
                let element = field_type.element().ok_or_else(|| {
                    ForgeError::invalid(format!(
                        "collection generator on '{path}' of non-list type {field_type}"
                    ))
                })?;
                let element_path = format!("{path}[]");
                (0..size)
                    .map(|_| self.build_slot(&element_path, element, depth, rng))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            }
        }
    }

    /// Run the rules anchored at this object, in declaration order. The
    /// first matching rule per target wins; ignored targets stay unset.
    fn apply_rules(
        &mut self,
        prefix: &str,
        object: &mut ObjectValue,
        depth: usize,
        rng: &mut StdRng,
    ) -> Result<()> {
        let blueprint = self.blueprint;
        let mut assigned: HashSet<&str> = HashSet::new();

        for rule in blueprint.rules.for_anchor(prefix) {
            if assigned.contains(rule.target.as_str()) {
                continue;
            }
            let origin = object.lookup(&rule.origin).cloned().unwrap_or(Value::Null);
            if !rule.condition.test(&origin) {
                continue;
            }

            let path = join(prefix, &rule.target);
            let slot = Slot {
                path: &path,
                field_type: &rule.target_type,
            };
            assigned.insert(rule.target.as_str());
            if matches!(resolve(self.bindings(), &slot), Resolution::Ignore) {
                continue;
            }

            let value = match &rule.action {
                AssignAction::Set(value) => value.clone(),
                AssignAction::Generate(config) => {
                    self.generate(config, &path, &rule.target_type, depth, rng)?
                }
            };
            trace!(path = path.as_str(), origin = rule.origin.as_str(), "Assignment applied");
            object.insert(rule.target.clone(), value);
        }

        Ok(())
    }
}
