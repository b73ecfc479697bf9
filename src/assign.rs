//! Conditional assignment rules.
//!
//! A rule reads a field after primary generation and, when its condition
//! holds, overrides another field of the same object:
//!
//! ```rust
//! use fixture_forge::assign::given;
//! use fixture_forge::select::field;
//!
//! let rule = given(field("name")).is("Mark").set(field("age"), 2);
//! ```
//!
//! Rules are anchored at the object enclosing their target. They run after
//! that object's fields (nested ones included) are generated, in
//! declaration order, and only the first matching rule per target applies.

use crate::error::{ForgeError, Result};
use crate::select::Selector;
use forge_core::{FieldType, GeneratorConfig, SchemaGraph, Value};
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Predicate over an already-generated field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Is(Value),
    IsIn(Vec<Value>),
    IsNot(Value),
    IsNull,
    IsNotNull,
}

impl Condition {
    pub fn test(&self, value: &Value) -> bool {
        match self {
            Self::Is(expected) => value == expected,
            Self::IsIn(choices) => choices.contains(value),
            Self::IsNot(expected) => value != expected,
            Self::IsNull => value.is_null(),
            Self::IsNotNull => !value.is_null(),
        }
    }

    /// Coerce the compared values to the origin field type.
    fn coerce(self, origin_type: &FieldType) -> Option<Self> {
        let condition = match self {
            Self::Is(value) => Self::Is(value.coerce(origin_type)?),
            Self::IsNot(value) => Self::IsNot(value.coerce(origin_type)?),
            Self::IsIn(values) => Self::IsIn(
                values
                    .into_iter()
                    .map(|value| value.coerce(origin_type))
                    .collect::<Option<Vec<_>>>()?,
            ),
            other => other,
        };
        Some(condition)
    }
}

/// What a matching rule does to its target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignAction {
    Set(Value),
    Generate(GeneratorConfig),
}

/// A conditional field override.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentRule {
    pub origin: Selector,
    pub condition: Condition,
    pub target: Selector,
    pub action: AssignAction,
}

/// Start a rule reading `origin`.
pub fn given(origin: Selector) -> Given {
    Given { origin }
}

/// A rule with its origin chosen.
#[derive(Debug, Clone)]
pub struct Given {
    origin: Selector,
}

impl Given {
    pub fn is(self, value: impl Into<Value>) -> When {
        self.when(Condition::Is(value.into()))
    }

    pub fn is_in<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> When {
        self.when(Condition::IsIn(values.into_iter().map(Into::into).collect()))
    }

    pub fn is_not(self, value: impl Into<Value>) -> When {
        self.when(Condition::IsNot(value.into()))
    }

    pub fn is_null(self) -> When {
        self.when(Condition::IsNull)
    }

    pub fn is_not_null(self) -> When {
        self.when(Condition::IsNotNull)
    }

    pub fn when(self, condition: Condition) -> When {
        When {
            origin: self.origin,
            condition,
        }
    }
}

/// A rule with origin and condition chosen.
#[derive(Debug, Clone)]
pub struct When {
    origin: Selector,
    condition: Condition,
}

impl When {
    /// Set `target` to a literal value.
    pub fn set(self, target: Selector, value: impl Into<Value>) -> AssignmentRule {
        self.then(target, AssignAction::Set(value.into()))
    }

    /// Regenerate `target` with another generator.
    pub fn generate(
        self,
        target: Selector,
        config: impl Into<GeneratorConfig>,
    ) -> AssignmentRule {
        self.then(target, AssignAction::Generate(config.into()))
    }

    fn then(self, target: Selector, action: AssignAction) -> AssignmentRule {
        AssignmentRule {
            origin: self.origin,
            condition: self.condition,
            target,
            action,
        }
    }
}

// ============================================================================
// Compiled rules
// ============================================================================

/// A validated rule, with paths relative to its anchor object.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    /// Origin path relative to the anchor
    pub origin: String,
    pub condition: Condition,
    /// Target field name within the anchor
    pub target: String,
    pub target_type: FieldType,
    pub action: AssignAction,
}

/// Validated rules grouped by anchor path, declaration order preserved.
#[derive(Debug, Clone, Default)]
pub(crate) struct RuleSet {
    by_anchor: HashMap<String, Vec<CompiledRule>>,
}

impl RuleSet {
    /// Validate rules against the schema graph and check for cycles.
    pub fn compile(rules: &[AssignmentRule], graph: &SchemaGraph) -> Result<Self> {
        check_acyclic(rules)?;

        let mut by_anchor: HashMap<String, Vec<CompiledRule>> = HashMap::new();
        for rule in rules {
            let (anchor, compiled) = compile_rule(rule, graph)?;
            by_anchor.entry(anchor).or_default().push(compiled);
        }

        Ok(Self { by_anchor })
    }

    /// Rules anchored at the object at `path` (`""` for the root).
    pub fn for_anchor(&self, path: &str) -> &[CompiledRule] {
        self.by_anchor.get(path).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_anchor.values().map(Vec::len).sum()
    }
}

fn field_path<'a>(selector: &'a Selector, role: &str) -> Result<&'a str> {
    match selector {
        Selector::Field(path) => Ok(path),
        other => Err(ForgeError::invalid(format!(
            "assignment {role} must be a field selector, got {other}"
        ))),
    }
}

fn compile_rule(rule: &AssignmentRule, graph: &SchemaGraph) -> Result<(String, CompiledRule)> {
    let origin = field_path(&rule.origin, "origin")?;
    let target = field_path(&rule.target, "target")?;

    let origin_type = graph
        .field_type_at(origin)
        .map_err(|e| ForgeError::invalid(format!("assignment origin: {e}")))?;
    let target_type = graph
        .field_type_at(target)
        .map_err(|e| ForgeError::invalid(format!("assignment target: {e}")))?;

    let (anchor, target_name) = match target.rsplit_once('.') {
        Some((anchor, name)) => (anchor, name),
        None => ("", target),
    };
    if target_name.ends_with("[]") {
        return Err(ForgeError::invalid(format!(
            "assignment target '{target}' must be a field, not a list element"
        )));
    }

    let relative_origin = if anchor.is_empty() {
        origin
    } else {
        origin
            .strip_prefix(anchor)
            .and_then(|rest| rest.strip_prefix('.'))
            .ok_or_else(|| {
                ForgeError::invalid(format!(
                    "assignment origin '{origin}' is outside the object of target '{target}'"
                ))
            })?
    };
    if relative_origin.contains("[]") {
        return Err(ForgeError::invalid(format!(
            "assignment origin '{origin}' reads inside a list of the target's object"
        )));
    }

    let condition = rule.condition.clone().coerce(origin_type).ok_or_else(|| {
        ForgeError::invalid(format!(
            "assignment condition on '{origin}' does not match type {origin_type}"
        ))
    })?;

    let action = match &rule.action {
        AssignAction::Set(value) => {
            let value = value.clone().coerce(target_type).ok_or_else(|| {
                ForgeError::invalid(format!(
                    "cannot assign {} to '{target}' of type {target_type}",
                    value.type_label()
                ))
            })?;
            AssignAction::Set(value)
        }
        AssignAction::Generate(config) => {
            config.validate()?;
            if !config.accepts_type(target_type) {
                return Err(ForgeError::invalid(format!(
                    "generator {config:?} cannot produce '{target}' of type {target_type}"
                )));
            }
            AssignAction::Generate(config.clone())
        }
    };

    let compiled = CompiledRule {
        origin: relative_origin.to_string(),
        condition,
        target: target_name.to_string(),
        target_type: target_type.clone(),
        action,
    };
    Ok((anchor.to_string(), compiled))
}

/// Fail when rule dependencies (origin -> target) form a cycle.
fn check_acyclic(rules: &[AssignmentRule]) -> Result<()> {
    let mut graph: DiGraph<String, ()> = DiGraph::new();
    let mut nodes: HashMap<String, NodeIndex> = HashMap::new();

    let mut node = |graph: &mut DiGraph<String, ()>, path: &str| {
        *nodes
            .entry(path.to_string())
            .or_insert_with(|| graph.add_node(path.to_string()))
    };

    for rule in rules {
        let origin = field_path(&rule.origin, "origin")?;
        let target = field_path(&rule.target, "target")?;
        let from = node(&mut graph, origin);
        let to = node(&mut graph, target);
        graph.add_edge(from, to, ());
    }

    let Err(cycle) = toposort(&graph, None) else {
        return Ok(());
    };

    let culprit = cycle.node_id();
    let mut members: Vec<String> = tarjan_scc(&graph)
        .into_iter()
        .find(|component| component.contains(&culprit))
        .unwrap_or_else(|| vec![culprit])
        .into_iter()
        .map(|index| graph[index].clone())
        .collect();
    members.sort();
    if let Some(first) = members.first().cloned() {
        members.push(first);
    }

    Err(ForgeError::CyclicAssignment { cycle: members })
}
