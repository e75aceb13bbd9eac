use std::fmt;

use tracing::warn;

use crate::components::ComponentKindId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    UnknownComponentKind,
    MalformedComponentPayload,
    PrefabNotFound,
    CyclicDependency,
    DepthExceeded,
    InvalidTransformArity,
    MalformedPrefab,
    MalformedOverridePatch,
    ChildOverrideOutOfRange,
    NestedPrefabInstance,
    DuplicatePersistentId,
    EntityIdsExhausted,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownComponentKind => "unknown_component_kind",
            Self::MalformedComponentPayload => "malformed_component_payload",
            Self::PrefabNotFound => "prefab_not_found",
            Self::CyclicDependency => "cyclic_dependency",
            Self::DepthExceeded => "depth_exceeded",
            Self::InvalidTransformArity => "invalid_transform_arity",
            Self::MalformedPrefab => "malformed_prefab",
            Self::MalformedOverridePatch => "malformed_override_patch",
            Self::ChildOverrideOutOfRange => "child_override_out_of_range",
            Self::NestedPrefabInstance => "nested_prefab_instance",
            Self::DuplicatePersistentId => "duplicate_persistent_id",
            Self::EntityIdsExhausted => "entity_ids_exhausted",
        }
    }
}

/// A recoverable problem found while decoding or instantiating.
///
/// `entity` names the node the problem belongs to (persistent id for scene
/// entities, node name for template nodes) when one is known.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    pub entity: Option<String>,
    pub component: Option<ComponentKindId>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            entity: None,
            component: None,
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_component(mut self, component: ComponentKindId) -> Self {
        self.component = Some(component);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)?;
        if let Some(entity) = &self.entity {
            write!(f, " (entity={entity}")?;
            if let Some(component) = &self.component {
                write!(f, ", component={component}")?;
            }
            write!(f, ")")?;
        } else if let Some(component) = &self.component {
            write!(f, " (component={component})")?;
        }
        Ok(())
    }
}

pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to the host's `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        trace_diagnostic(&diagnostic);
    }
}

/// Keeps diagnostics in memory and also forwards them to `tracing`.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, code: DiagnosticCode) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.code == code)
            .count()
    }

    pub fn contains(&self, code: DiagnosticCode) -> bool {
        self.entries.iter().any(|entry| entry.code == code)
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn emit(&mut self, diagnostic: Diagnostic) {
        trace_diagnostic(&diagnostic);
        self.entries.push(diagnostic);
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Fills in `entity` on diagnostics that arrive without one.
pub struct EntityScope<'a> {
    inner: &'a mut dyn DiagnosticSink,
    entity: &'a str,
}

impl<'a> EntityScope<'a> {
    pub fn new(inner: &'a mut dyn DiagnosticSink, entity: &'a str) -> Self {
        Self { inner, entity }
    }
}

impl DiagnosticSink for EntityScope<'_> {
    fn emit(&mut self, mut diagnostic: Diagnostic) {
        if diagnostic.entity.is_none() {
            diagnostic.entity = Some(self.entity.to_string());
        }
        self.inner.emit(diagnostic);
    }
}

fn trace_diagnostic(diagnostic: &Diagnostic) {
    warn!(
        code = diagnostic.code.as_str(),
        entity = diagnostic.entity.as_deref().unwrap_or("-"),
        component = diagnostic
            .component
            .as_ref()
            .map(ComponentKindId::as_str)
            .unwrap_or("-"),
        message = %diagnostic.message,
        "scene_diagnostic"
    );
}
