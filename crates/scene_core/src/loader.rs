//! One scene-load pass: register templates, then decode and expand entities.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::components::{
    ComponentKindId, DecodedComponent, DecoderRegistry, PersistentId, PrefabInstance,
    PERSISTENT_ID_KIND,
    PREFAB_INSTANCE_KIND,
};
use crate::config::LoadConfig;
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, EntityScope};
use crate::prefab::{parse_prefabs, InstanceRequest, PrefabInstantiator, PrefabRegistry};
use crate::scene::{EntityIdAllocator, EntityRecord, SceneEntity};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub entities: Vec<SceneEntity>,
    #[serde(default)]
    pub prefabs: Vec<Value>,
}

impl SceneDocument {
    pub fn from_json(raw: &str) -> Result<Self, SceneLoadError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            SceneLoadError::InvalidDocument {
                path: error.path().to_string(),
                message: error.into_inner().to_string(),
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneLoadError {
    #[error("scene document is invalid at {path}: {message}")]
    InvalidDocument { path: String, message: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneLoadReport {
    pub records: Vec<EntityRecord>,
    pub registered_prefabs: Vec<String>,
    pub instantiated_seeds: usize,
    pub skipped_seeds: Vec<String>,
}

impl SceneLoadReport {
    pub fn render_human_readable(&self) -> String {
        let mut output = format!(
            "records={} prefabs={} instantiated_seeds={} skipped_seeds={}",
            self.records.len(),
            self.registered_prefabs.len(),
            self.instantiated_seeds,
            self.skipped_seeds.len()
        );
        for record in &self.records {
            output.push('\n');
            output.push_str(&format!(
                "entity={} runtime={} name={:?} parent={} components=[{}]",
                record.persistent_id,
                record.runtime_id,
                record.name,
                record.parent_persistent_id.as_deref().unwrap_or("-"),
                record.component_kinds().collect::<Vec<_>>().join(",")
            ));
        }
        for seed in &self.skipped_seeds {
            output.push('\n');
            output.push_str(&format!("skipped_seed={seed}"));
        }
        output
    }
}

pub struct SceneLoader<'a> {
    decoders: &'a DecoderRegistry,
    config: LoadConfig,
}

impl<'a> SceneLoader<'a> {
    pub fn new(decoders: &'a DecoderRegistry, config: LoadConfig) -> Self {
        Self { decoders, config }
    }

    pub fn config(&self) -> LoadConfig {
        self.config
    }

    /// Parses the document's templates and registers them in authored order.
    pub fn register_prefabs(
        &self,
        document: &SceneDocument,
        sink: &mut dyn DiagnosticSink,
    ) -> PrefabRegistry {
        let (definitions, diagnostics) = parse_prefabs(&document.prefabs);
        for diagnostic in diagnostics {
            sink.emit(diagnostic);
        }
        let mut registry = PrefabRegistry::new();
        registry.register_all(definitions, sink);
        registry
    }

    pub fn load_json(
        &self,
        raw: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<SceneLoadReport, SceneLoadError> {
        let document = SceneDocument::from_json(raw)?;
        Ok(self.load(&document, sink))
    }

    /// Runs the pass. All templates are registered before the first entity
    /// is looked at; after that the prefab registry is only read.
    pub fn load(&self, document: &SceneDocument, sink: &mut dyn DiagnosticSink) -> SceneLoadReport {
        self.load_with_allocator(document, EntityIdAllocator::new(), sink)
    }

    /// Like [`load`](Self::load), but continues an existing runtime id space.
    pub fn load_with_allocator(
        &self,
        document: &SceneDocument,
        mut allocator: EntityIdAllocator,
        sink: &mut dyn DiagnosticSink,
    ) -> SceneLoadReport {
        let prefabs = self.register_prefabs(document, sink);
        let instantiator = PrefabInstantiator::new(&prefabs, self.decoders)
            .with_max_depth(self.config.max_prefab_depth);

        let mut report = SceneLoadReport {
            registered_prefabs: prefabs.ids().into_iter().map(ToString::to_string).collect(),
            ..SceneLoadReport::default()
        };
        let mut seen = HashSet::new();
        let mut instance_keys = HashSet::new();

        for entity in &document.entities {
            let persistent_id = self.resolve_persistent_id(entity);
            if !seen.insert(persistent_id.clone()) {
                sink.emit(
                    Diagnostic::new(
                        DiagnosticCode::DuplicatePersistentId,
                        format!("persistent id '{persistent_id}' is used by more than one entity"),
                    )
                    .with_entity(persistent_id.clone()),
                );
            }

            let components = self.decode_components(entity, &persistent_id, sink);
            let marker = components
                .get(PREFAB_INSTANCE_KIND)
                .and_then(DecodedComponent::downcast_ref::<PrefabInstance>)
                .cloned();

            if self.config.emit_seed_records {
                let Some(runtime_id) = allocator.try_allocate() else {
                    sink.emit(
                        Diagnostic::new(
                            DiagnosticCode::EntityIdsExhausted,
                            "runtime entity ids are exhausted; remaining entities skipped",
                        )
                        .with_entity(persistent_id),
                    );
                    break;
                };
                report.records.push(EntityRecord {
                    runtime_id,
                    persistent_id: persistent_id.clone(),
                    name: entity.name.clone().unwrap_or_default(),
                    parent_persistent_id: entity.parent_persistent_id.clone(),
                    tags: entity.tags.clone(),
                    components,
                });
            }

            let Some(marker) = marker else {
                continue;
            };
            let mut request = InstanceRequest::from_marker(&marker, persistent_id);
            if let Some(key) = request.instance_uuid.clone().filter(|key| !key.is_empty()) {
                if !instance_keys.insert(key.clone()) {
                    sink.emit(
                        Diagnostic::new(
                            DiagnosticCode::DuplicatePersistentId,
                            format!(
                                "instance uuid '{key}' is used by more than one seed; generating a fresh key"
                            ),
                        )
                        .with_entity(request.seed_persistent_id.clone()),
                    );
                    request.instance_uuid = None;
                }
            }
            match instantiator.instantiate(&request, &mut allocator, sink) {
                Ok(records) => {
                    report.instantiated_seeds += 1;
                    for record in &records {
                        if !seen.insert(record.persistent_id.clone()) {
                            sink.emit(
                                Diagnostic::new(
                                    DiagnosticCode::DuplicatePersistentId,
                                    format!(
                                        "instantiated id '{}' collides with an earlier entity",
                                        record.persistent_id
                                    ),
                                )
                                .with_entity(record.persistent_id.clone()),
                            );
                        }
                    }
                    report.records.extend(records);
                }
                Err(error) => {
                    warn!(
                        prefab_id = %request.prefab_id,
                        seed = %request.seed_persistent_id,
                        code = error.code().as_str(),
                        "seed_skipped"
                    );
                    sink.emit(error.to_diagnostic());
                    report.skipped_seeds.push(request.seed_persistent_id);
                }
            }
        }

        info!(
            entities = document.entities.len(),
            records = report.records.len(),
            prefabs = report.registered_prefabs.len(),
            instantiated_seeds = report.instantiated_seeds,
            skipped_seeds = report.skipped_seeds.len(),
            "scene_loaded"
        );
        report
    }

    fn resolve_persistent_id(&self, entity: &SceneEntity) -> String {
        if let Some(id) = entity.persistent_id.as_deref().filter(|id| !id.is_empty()) {
            return id.to_string();
        }
        let component_id = entity
            .components
            .get(PERSISTENT_ID_KIND)
            .and_then(|value| self.decoders.decode(PERSISTENT_ID_KIND, value).ok())
            .and_then(|decoded| decoded.downcast_ref::<PersistentId>().map(|id| id.id.clone()));
        if let Some(id) = component_id {
            return id;
        }
        match &entity.id {
            Some(id) => format!("entity-{id}"),
            None => Uuid::new_v4().to_string(),
        }
    }

    fn decode_components(
        &self,
        entity: &SceneEntity,
        persistent_id: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> BTreeMap<ComponentKindId, DecodedComponent> {
        let mut scoped = EntityScope::new(sink, persistent_id);
        let mut components = BTreeMap::new();
        for (kind, value) in &entity.components {
            match self.decoders.decode_with(kind, value, &mut scoped) {
                Ok(decoded) => {
                    components.insert(decoded.kind().clone(), decoded);
                }
                Err(error) => scoped.emit(error.to_diagnostic()),
            }
        }
        components
    }
}
