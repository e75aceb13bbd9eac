use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::components::decode_payload;
use crate::diagnostics::{Diagnostic, DiagnosticCode};

/// Deepest template tree an instantiation will walk.
pub const MAX_PREFAB_DEPTH: usize = 64;

/// One node of a template tree. Components stay undecoded until instantiation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrefabEntity {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub components: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PrefabEntity>,
}

impl PrefabEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_component(mut self, kind: impl Into<String>, value: Value) -> Self {
        self.components.insert(kind.into(), value);
        self
    }

    pub fn with_child(mut self, child: PrefabEntity) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Levels in this subtree; a lone node has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        deepest
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefabDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    pub root: PrefabEntity,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_version() -> u32 {
    1
}

impl PrefabDefinition {
    pub fn new(id: impl Into<String>, root: PrefabEntity) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            version: 1,
            root,
            metadata: Map::new(),
            dependencies: Vec::new(),
            tags: Vec::new(),
            description: None,
        }
    }

    pub fn with_dependency(mut self, prefab_id: impl Into<String>) -> Self {
        self.dependencies.push(prefab_id.into());
        self
    }
}

/// Parses authored templates. A template that fails to parse is skipped with
/// a `MalformedPrefab` diagnostic; the rest are returned in authored order.
pub fn parse_prefabs(values: &[Value]) -> (Vec<PrefabDefinition>, Vec<Diagnostic>) {
    let mut definitions = Vec::with_capacity(values.len());
    let mut diagnostics = Vec::new();

    for (index, value) in values.iter().enumerate() {
        let label = value
            .get("id")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("prefabs[{index}]"));

        match decode_payload::<PrefabDefinition>(value) {
            Ok(definition) if definition.id.trim().is_empty() => {
                diagnostics.push(
                    Diagnostic::new(DiagnosticCode::MalformedPrefab, "prefab id is empty")
                        .with_entity(label),
                );
            }
            Ok(definition) => {
                debug!(
                    prefab_id = %definition.id,
                    version = definition.version,
                    nodes = definition.root.node_count(),
                    "prefab_parsed"
                );
                definitions.push(definition);
            }
            Err(error) => {
                diagnostics.push(
                    Diagnostic::new(DiagnosticCode::MalformedPrefab, error.to_string())
                        .with_entity(label),
                );
            }
        }
    }

    (definitions, diagnostics)
}
