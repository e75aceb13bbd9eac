use std::borrow::Cow;
use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::components::{
    DecoderRegistry, PrefabInstance, PERSISTENT_ID_KIND, PREFAB_INSTANCE_KIND,
};
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, EntityScope};
use crate::scene::{EntityId, EntityIdAllocator, EntityRecord};

use super::{apply, OverridePatch, PrefabEntity, PrefabRegistry, MAX_PREFAB_DEPTH};

/// What to stamp out and where to anchor it.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceRequest {
    pub prefab_id: String,
    pub seed_persistent_id: String,
    /// Stable instance key; a fresh one is generated per call when absent.
    pub instance_uuid: Option<String>,
    pub override_patch: Option<Value>,
}

impl InstanceRequest {
    pub fn new(prefab_id: impl Into<String>, seed_persistent_id: impl Into<String>) -> Self {
        Self {
            prefab_id: prefab_id.into(),
            seed_persistent_id: seed_persistent_id.into(),
            instance_uuid: None,
            override_patch: None,
        }
    }

    pub fn from_marker(marker: &PrefabInstance, seed_persistent_id: impl Into<String>) -> Self {
        Self {
            prefab_id: marker.prefab_id.clone(),
            seed_persistent_id: seed_persistent_id.into(),
            instance_uuid: marker.instance_uuid.clone(),
            override_patch: marker.override_patch.clone(),
        }
    }

    pub fn with_instance_uuid(mut self, instance_uuid: impl Into<String>) -> Self {
        self.instance_uuid = Some(instance_uuid.into());
        self
    }

    pub fn with_override_patch(mut self, patch: Value) -> Self {
        self.override_patch = Some(patch);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstantiateError {
    #[error("prefab '{prefab_id}' is not registered (seed '{seed}')")]
    PrefabNotFound { prefab_id: String, seed: String },
    #[error("runtime entity ids are exhausted while instantiating '{prefab_id}' (seed '{seed}')")]
    EntityIdsExhausted { prefab_id: String, seed: String },
}

impl InstantiateError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::PrefabNotFound { .. } => DiagnosticCode::PrefabNotFound,
            Self::EntityIdsExhausted { .. } => DiagnosticCode::EntityIdsExhausted,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::PrefabNotFound { seed, .. } | Self::EntityIdsExhausted { seed, .. } => {
                Diagnostic::new(self.code(), self.to_string()).with_entity(seed.clone())
            }
        }
    }
}

/// Expands prefab templates into entity records.
///
/// Holds read-only handles to both registries; one instantiator can serve
/// every seed of a load pass.
#[derive(Debug, Clone, Copy)]
pub struct PrefabInstantiator<'a> {
    prefabs: &'a PrefabRegistry,
    decoders: &'a DecoderRegistry,
    max_depth: usize,
}

struct PendingNode<'t> {
    node: &'t PrefabEntity,
    parent: String,
    depth: usize,
}

impl<'a> PrefabInstantiator<'a> {
    pub fn new(prefabs: &'a PrefabRegistry, decoders: &'a DecoderRegistry) -> Self {
        Self {
            prefabs,
            decoders,
            max_depth: MAX_PREFAB_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Instantiates one prefab under its seed.
    ///
    /// Records come out depth-first, parents before children. The template
    /// root is parented to the seed. Every node gets a fresh runtime id from
    /// `allocator` and the persistent id `"{instance_key}-{n}"`, `n` being its
    /// pre-order position. Per-component and per-subtree problems go to
    /// `sink`; only a missing prefab or an exhausted allocator fails the call.
    pub fn instantiate(
        &self,
        request: &InstanceRequest,
        allocator: &mut EntityIdAllocator,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<EntityRecord>, InstantiateError> {
        let Some(definition) = self.prefabs.get(&request.prefab_id) else {
            return Err(InstantiateError::PrefabNotFound {
                prefab_id: request.prefab_id.clone(),
                seed: request.seed_persistent_id.clone(),
            });
        };

        let root = self.patched_root(&definition.root, request, sink);
        let instance_key = match request.instance_uuid.as_deref() {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => Uuid::new_v4().to_string(),
        };

        let mut records = Vec::with_capacity(root.node_count());
        let mut stack = vec![PendingNode {
            node: root.as_ref(),
            parent: request.seed_persistent_id.clone(),
            depth: 1,
        }];

        while let Some(PendingNode {
            node,
            parent,
            depth,
        }) = stack.pop()
        {
            if depth > self.max_depth {
                sink.emit(
                    Diagnostic::new(
                        DiagnosticCode::DepthExceeded,
                        format!(
                            "prefab '{}' exceeds depth {} at node '{}'; subtree skipped",
                            definition.id, self.max_depth, node.name
                        ),
                    )
                    .with_entity(parent),
                );
                continue;
            }

            if node.components.contains_key(PREFAB_INSTANCE_KIND) {
                sink.emit(
                    Diagnostic::new(
                        DiagnosticCode::NestedPrefabInstance,
                        format!(
                            "nested prefab instance in '{}' at node '{}' is not supported; subtree skipped",
                            definition.id, node.name
                        ),
                    )
                    .with_entity(parent)
                    .with_component(
                        self.decoders
                            .kind_id(PREFAB_INSTANCE_KIND)
                            .unwrap_or_else(|| PREFAB_INSTANCE_KIND.into()),
                    ),
                );
                continue;
            }

            let Some(runtime_id) = allocator.try_allocate() else {
                return Err(InstantiateError::EntityIdsExhausted {
                    prefab_id: definition.id.clone(),
                    seed: request.seed_persistent_id.clone(),
                });
            };
            let persistent_id = format!("{instance_key}-{}", records.len());
            let record = self.build_record(node, runtime_id, persistent_id, parent, sink);
            for child in node.children.iter().rev() {
                stack.push(PendingNode {
                    node: child,
                    parent: record.persistent_id.clone(),
                    depth: depth + 1,
                });
            }
            records.push(record);
        }

        info!(
            prefab_id = %definition.id,
            seed = %request.seed_persistent_id,
            instance_key = %instance_key,
            records = records.len(),
            "prefab_instantiated"
        );
        Ok(records)
    }

    fn patched_root<'t>(
        &self,
        template: &'t PrefabEntity,
        request: &InstanceRequest,
        sink: &mut dyn DiagnosticSink,
    ) -> Cow<'t, PrefabEntity> {
        let Some(raw) = &request.override_patch else {
            return Cow::Borrowed(template);
        };
        match OverridePatch::from_value(raw) {
            Ok(patch) if patch.is_empty() => Cow::Borrowed(template),
            Ok(patch) => {
                let (merged, diagnostics) = apply(template, &patch);
                for diagnostic in diagnostics {
                    sink.emit(diagnostic);
                }
                Cow::Owned(merged)
            }
            Err(error) => {
                sink.emit(
                    Diagnostic::new(
                        DiagnosticCode::MalformedOverridePatch,
                        format!("{error}; instantiating '{}' unpatched", request.prefab_id),
                    )
                    .with_entity(request.seed_persistent_id.clone()),
                );
                Cow::Borrowed(template)
            }
        }
    }

    fn build_record(
        &self,
        node: &PrefabEntity,
        runtime_id: EntityId,
        persistent_id: String,
        parent: String,
        sink: &mut dyn DiagnosticSink,
    ) -> EntityRecord {
        let mut components = BTreeMap::new();
        {
            let mut scoped = EntityScope::new(sink, &persistent_id);
            for (kind, value) in &node.components {
                if kind == PERSISTENT_ID_KIND {
                    debug!(
                        entity = %persistent_id,
                        node = %node.name,
                        "template_persistent_id_dropped"
                    );
                    continue;
                }
                match self.decoders.decode_with(kind, value, &mut scoped) {
                    Ok(decoded) => {
                        components.insert(decoded.kind().clone(), decoded);
                    }
                    Err(error) => scoped.emit(error.to_diagnostic()),
                }
            }
        }

        EntityRecord {
            runtime_id,
            persistent_id,
            name: node.name.clone(),
            parent_persistent_id: Some(parent),
            tags: node.tags.clone(),
            components,
        }
    }
}
