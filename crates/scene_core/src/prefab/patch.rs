//! Sparse per-instance overrides and the merge that applies them.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::components::PayloadError;
use crate::diagnostics::{Diagnostic, DiagnosticCode};

use super::PrefabEntity;

const CHILDREN_KEY: &str = "children";

/// Component overrides for one template node plus overrides for its children
/// by position. Anything absent inherits from the template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverridePatch {
    pub components: Map<String, Value>,
    pub children: BTreeMap<usize, OverridePatch>,
}

impl OverridePatch {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.children.is_empty()
    }

    /// Parses an authored patch.
    ///
    /// `children` may be an array (position is the index, `null` skips) or an
    /// object keyed by decimal index. Every other key names a component kind.
    pub fn from_value(value: &Value) -> Result<Self, PayloadError> {
        Self::parse_at(value, "")
    }

    fn parse_at(value: &Value, path: &str) -> Result<Self, PayloadError> {
        let Value::Object(entries) = value else {
            return Err(PayloadError::at(
                display_path(path),
                "override patch must be an object",
            ));
        };

        let mut patch = Self::default();
        for (key, entry) in entries {
            if key == CHILDREN_KEY {
                patch.children = parse_children(entry, &join(path, CHILDREN_KEY))?;
            } else {
                patch.components.insert(key.clone(), entry.clone());
            }
        }
        Ok(patch)
    }
}

fn parse_children(value: &Value, path: &str) -> Result<BTreeMap<usize, OverridePatch>, PayloadError> {
    let mut children = BTreeMap::new();
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if item.is_null() {
                    continue;
                }
                let child = OverridePatch::parse_at(item, &join(path, &index.to_string()))?;
                children.insert(index, child);
            }
        }
        Value::Object(items) => {
            for (key, item) in items {
                let item_path = join(path, key);
                let index = key.parse::<usize>().map_err(|_| {
                    PayloadError::at(&item_path, "child override key must be a decimal index")
                })?;
                children.insert(index, OverridePatch::parse_at(item, &item_path)?);
            }
        }
        _ => {
            return Err(PayloadError::at(
                path,
                "children overrides must be an array or an index-keyed object",
            ))
        }
    }
    Ok(children)
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "."
    } else {
        path
    }
}

/// Merges `patch` into a copy of `template`.
///
/// Per component the merge is shallow: each top-level field named in the
/// patch replaces the template's field; fields the patch omits keep their
/// template value. Template key order is kept and patch-only keys follow.
/// Child overrides whose index has no template child are reported and
/// ignored. Neither input is modified.
pub fn apply(template: &PrefabEntity, patch: &OverridePatch) -> (PrefabEntity, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let merged = apply_at(template, patch, &mut diagnostics);
    (merged, diagnostics)
}

fn apply_at(
    template: &PrefabEntity,
    patch: &OverridePatch,
    diagnostics: &mut Vec<Diagnostic>,
) -> PrefabEntity {
    let mut components = Map::new();
    for (kind, value) in &template.components {
        let merged = match patch.components.get(kind) {
            Some(overrides) => merge_component(value, overrides),
            None => value.clone(),
        };
        components.insert(kind.clone(), merged);
    }
    for (kind, value) in &patch.components {
        if !template.components.contains_key(kind) {
            components.insert(kind.clone(), value.clone());
        }
    }

    let children = template
        .children
        .iter()
        .enumerate()
        .map(|(index, child)| match patch.children.get(&index) {
            Some(child_patch) => apply_at(child, child_patch, diagnostics),
            None => child.clone(),
        })
        .collect::<Vec<_>>();

    for index in patch.children.keys().filter(|index| **index >= children.len()) {
        diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::ChildOverrideOutOfRange,
                format!(
                    "child override {index} ignored; template node has {} children",
                    children.len()
                ),
            )
            .with_entity(template.name.clone()),
        );
    }

    PrefabEntity {
        name: template.name.clone(),
        tags: template.tags.clone(),
        components,
        children,
    }
}

fn merge_component(template: &Value, overrides: &Value) -> Value {
    match (template, overrides) {
        (Value::Object(base), Value::Object(fields)) => {
            let mut merged = base.clone();
            for (field, value) in fields {
                merged.insert(field.clone(), value.clone());
            }
            Value::Object(merged)
        }
        _ => overrides.clone(),
    }
}
