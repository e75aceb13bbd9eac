//! Runtime identities, authored scene entities and decoded entity records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::components::{ComponentKindId, DecodedComponent};

/// Dense, engine-local entity handle. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out runtime ids for one load pass. Ids are never reused: once
/// `u64::MAX` has been handed out the allocator is exhausted and
/// [`try_allocate`](Self::try_allocate) returns `None` from then on.
#[derive(Debug)]
pub struct EntityIdAllocator {
    first: u64,
    next: Option<u64>,
}

impl Default for EntityIdAllocator {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

impl EntityIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continues an id space that already handed out everything below `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            first,
            next: Some(first),
        }
    }

    pub fn try_allocate(&mut self) -> Option<EntityId> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(EntityId(id))
    }

    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }

    /// Number of ids handed out by this allocator.
    pub fn allocated(&self) -> u64 {
        match self.next {
            Some(next) => next - self.first,
            None => (u64::MAX - self.first).saturating_add(1),
        }
    }
}

/// Authored entity id; scene files use both numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthoredEntityId {
    Number(u64),
    Text(String),
}

impl fmt::Display for AuthoredEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// One entity as it appears in a scene document, components undecoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AuthoredEntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_persistent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub components: Map<String, Value>,
}

/// A decoded entity handed to the scene-graph builder.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub runtime_id: EntityId,
    pub persistent_id: String,
    pub name: String,
    pub parent_persistent_id: Option<String>,
    pub tags: Vec<String>,
    pub components: BTreeMap<ComponentKindId, DecodedComponent>,
}

impl EntityRecord {
    pub fn component(&self, kind: &str) -> Option<&DecodedComponent> {
        self.components.get(kind)
    }

    /// Typed view of the component stored under `kind`.
    pub fn get<T: 'static>(&self, kind: &str) -> Option<&T> {
        self.component(kind)
            .and_then(DecodedComponent::downcast_ref::<T>)
    }

    pub fn has_component(&self, kind: &str) -> bool {
        self.components.contains_key(kind)
    }

    pub fn component_kinds(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(ComponentKindId::as_str)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::components::{DecoderRegistry, Transform};

    #[test]
    fn allocator_hands_out_dense_increasing_ids() {
        let mut allocator = EntityIdAllocator::new();
        assert_eq!(allocator.try_allocate(), Some(EntityId(0)));
        assert_eq!(allocator.try_allocate(), Some(EntityId(1)));
        assert_eq!(allocator.try_allocate(), Some(EntityId(2)));
        assert_eq!(allocator.allocated(), 3);
    }

    #[test]
    fn allocator_never_reuses_the_last_id() {
        let mut allocator = EntityIdAllocator::starting_at(u64::MAX - 1);
        assert_eq!(allocator.try_allocate(), Some(EntityId(u64::MAX - 1)));
        assert_eq!(allocator.try_allocate(), Some(EntityId(u64::MAX)));
        assert!(allocator.is_exhausted());
        assert_eq!(allocator.try_allocate(), None);
        assert_eq!(allocator.try_allocate(), None);
        assert_eq!(allocator.allocated(), 2);
    }

    #[test]
    fn scene_entity_accepts_numeric_and_string_ids() {
        let numeric: SceneEntity = serde_json::from_value(json!({ "id": 7 })).expect("numeric");
        assert_eq!(numeric.id, Some(AuthoredEntityId::Number(7)));

        let text: SceneEntity = serde_json::from_value(json!({
            "id": "door",
            "parentPersistentId": "house",
            "components": { "Transform": {} }
        }))
        .expect("text");
        assert_eq!(text.id.as_ref().map(ToString::to_string).as_deref(), Some("door"));
        assert_eq!(text.parent_persistent_id.as_deref(), Some("house"));
        assert!(text.components.contains_key("Transform"));
    }

    #[test]
    fn record_gives_typed_access_by_kind() {
        let registry = DecoderRegistry::with_default_decoders();
        let transform = registry
            .decode("Transform", &json!({ "position": [0, 2, 0] }))
            .expect("decode");
        let mut components = BTreeMap::new();
        components.insert(transform.kind().clone(), transform);

        let record = EntityRecord {
            runtime_id: EntityId(0),
            persistent_id: "pillar".to_string(),
            name: "Pillar".to_string(),
            parent_persistent_id: None,
            tags: Vec::new(),
            components,
        };

        assert!(record.has_component("Transform"));
        assert_eq!(
            record.get::<Transform>("Transform").map(|t| t.position.y),
            Some(2.0)
        );
        assert!(record.get::<Transform>("Light").is_none());
        assert_eq!(record.component_kinds().collect::<Vec<_>>(), vec!["Transform"]);
    }
}
