use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, TracingSink};

use super::decoders;
use super::{ComponentCapabilities, ComponentKindId};

/// Typed component value produced by a decoder.
///
/// Implemented for every `Clone + PartialEq + Debug` type so decoders only
/// need to return their own structs.
pub trait ComponentData: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn clone_boxed(&self) -> Box<dyn ComponentData>;
    fn eq_dyn(&self, other: &dyn ComponentData) -> bool;
}

impl<T> ComponentData for T
where
    T: Any + fmt::Debug + Clone + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn ComponentData> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn ComponentData) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// A decoded component, owned by exactly one entity record.
#[derive(Debug)]
pub struct DecodedComponent {
    kind: ComponentKindId,
    value: Box<dyn ComponentData>,
}

impl DecodedComponent {
    pub fn new(kind: ComponentKindId, value: Box<dyn ComponentData>) -> Self {
        Self { kind, value }
    }

    pub fn kind(&self) -> &ComponentKindId {
        &self.kind
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.as_ref().as_any().downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

impl Clone for DecodedComponent {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            value: self.value.as_ref().clone_boxed(),
        }
    }
}

impl PartialEq for DecodedComponent {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value.as_ref().eq_dyn(other.value.as_ref())
    }
}

/// Structural validation failure inside a single payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadError {
    pub path: String,
    pub message: String,
}

impl PayloadError {
    pub fn at(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.path)
    }
}

/// Deserializes a payload, reporting the JSON path of the first bad field.
pub fn decode_payload<T: DeserializeOwned>(value: &Value) -> Result<T, PayloadError> {
    serde_path_to_error::deserialize(value).map_err(|error| {
        let path = error.path().to_string();
        PayloadError::at(path, error.into_inner().to_string())
    })
}

pub trait ComponentDecoder: Send + Sync {
    /// Every kind name this decoder claims.
    fn kinds(&self) -> &'static [&'static str];

    fn capabilities(&self) -> ComponentCapabilities;

    /// Decodes one payload. Problems that still leave a usable value are
    /// reported to `sink`; structural failures are returned as errors.
    fn decode(
        &self,
        value: &Value,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("no decoder registered for component kind '{kind}'")]
    UnknownComponentKind { kind: String },
    #[error("malformed {kind} payload: {source}")]
    MalformedComponentPayload {
        kind: ComponentKindId,
        source: PayloadError,
    },
}

impl std::error::Error for PayloadError {}

impl DecodeError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::UnknownComponentKind { .. } => DiagnosticCode::UnknownComponentKind,
            Self::MalformedComponentPayload { .. } => DiagnosticCode::MalformedComponentPayload,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::new(self.code(), self.to_string());
        match self {
            Self::UnknownComponentKind { kind } => {
                diagnostic.with_component(ComponentKindId::new(kind))
            }
            Self::MalformedComponentPayload { kind, .. } => diagnostic.with_component(kind.clone()),
        }
    }
}

/// Maps component kind names to decoders.
///
/// Built once at startup, then shared read-only (`&DecoderRegistry` or
/// `Arc<DecoderRegistry>`) by any number of load passes.
#[derive(Default)]
pub struct DecoderRegistry {
    decoders: Vec<Arc<dyn ComponentDecoder>>,
    by_kind: HashMap<ComponentKindId, usize>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_decoders() -> Self {
        let mut registry = Self::new();
        registry.register(decoders::TransformDecoder);
        registry.register(decoders::MeshRendererDecoder);
        registry.register(decoders::LightDecoder);
        registry.register(decoders::CameraDecoder);
        registry.register(decoders::RigidBodyDecoder);
        registry.register(decoders::MeshColliderDecoder);
        registry.register(decoders::MaterialDecoder);
        registry.register(decoders::CustomShapeDecoder);
        registry.register(decoders::GeometryAssetDecoder);
        registry.register(decoders::InstancedDecoder);
        registry.register(decoders::TerrainDecoder);
        registry.register(decoders::LodDecoder);
        registry.register(decoders::CharacterControllerDecoder);
        registry.register(decoders::SoundDecoder);
        registry.register(decoders::ScriptDecoder);
        registry.register(decoders::PrefabInstanceDecoder);
        registry.register(decoders::PersistentIdDecoder);
        registry
    }

    pub fn register<D: ComponentDecoder + 'static>(&mut self, decoder: D) {
        let slot = self.decoders.len();
        for kind in decoder.kinds() {
            if let Some(previous) = self.by_kind.insert(ComponentKindId::new(kind), slot) {
                warn!(
                    kind = *kind,
                    previous_slot = previous,
                    slot,
                    "decoder_kind_replaced"
                );
            } else {
                debug!(kind = *kind, slot, "decoder_kind_registered");
            }
        }
        self.decoders.push(Arc::new(decoder));
    }

    /// The registry's shared id for `kind`, if any decoder claims it.
    pub fn kind_id(&self, kind: &str) -> Option<ComponentKindId> {
        self.by_kind.get_key_value(kind).map(|(id, _)| id.clone())
    }

    pub fn has_decoder(&self, kind: &str) -> bool {
        self.by_kind.contains_key(kind)
    }

    pub fn capabilities(&self, kind: &str) -> Option<ComponentCapabilities> {
        self.by_kind
            .get(kind)
            .map(|slot| self.decoders[*slot].capabilities())
    }

    pub fn registered_kinds(&self) -> Vec<ComponentKindId> {
        let mut kinds = self.by_kind.keys().cloned().collect::<Vec<_>>();
        kinds.sort();
        kinds
    }

    pub fn decode(&self, kind: &str, value: &Value) -> Result<DecodedComponent, DecodeError> {
        self.decode_with(kind, value, &mut TracingSink)
    }

    pub fn decode_with(
        &self,
        kind: &str,
        value: &Value,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<DecodedComponent, DecodeError> {
        let Some((kind_id, slot)) = self.by_kind.get_key_value(kind) else {
            return Err(DecodeError::UnknownComponentKind {
                kind: kind.to_string(),
            });
        };
        let value = self.decoders[*slot].decode(value, sink).map_err(|source| {
            DecodeError::MalformedComponentPayload {
                kind: kind_id.clone(),
                source,
            }
        })?;
        Ok(DecodedComponent::new(kind_id.clone(), value))
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("decoders", &self.decoders.len())
            .field("kinds", &self.registered_kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Health {
        max: u32,
    }

    struct HealthDecoder;

    impl ComponentDecoder for HealthDecoder {
        fn kinds(&self) -> &'static [&'static str] {
            &["Health", "Hitpoints"]
        }

        fn capabilities(&self) -> ComponentCapabilities {
            ComponentCapabilities::none().unstable()
        }

        fn decode(
            &self,
            value: &Value,
            _sink: &mut dyn DiagnosticSink,
        ) -> Result<Box<dyn ComponentData>, PayloadError> {
            Ok(Box::new(decode_payload::<Health>(value)?))
        }
    }

    struct OtherHealthDecoder;

    impl ComponentDecoder for OtherHealthDecoder {
        fn kinds(&self) -> &'static [&'static str] {
            &["Health"]
        }

        fn capabilities(&self) -> ComponentCapabilities {
            ComponentCapabilities::rendering("overlay")
        }

        fn decode(
            &self,
            _value: &Value,
            _sink: &mut dyn DiagnosticSink,
        ) -> Result<Box<dyn ComponentData>, PayloadError> {
            Ok(Box::new(0u32))
        }
    }

    #[test]
    fn decoder_is_registered_for_every_declared_kind() {
        let mut registry = DecoderRegistry::new();
        registry.register(HealthDecoder);

        assert!(registry.has_decoder("Health"));
        assert!(registry.has_decoder("Hitpoints"));
        assert!(!registry.has_decoder("Mana"));

        let decoded = registry
            .decode("Hitpoints", &json!({ "max": 40 }))
            .expect("decode");
        assert_eq!(decoded.kind().as_str(), "Hitpoints");
        assert_eq!(decoded.downcast_ref::<Health>(), Some(&Health { max: 40 }));
    }

    #[test]
    fn unknown_kind_is_reported() {
        let registry = DecoderRegistry::new();
        let err = registry
            .decode("Mana", &json!({}))
            .expect_err("no decoder");
        assert_eq!(
            err,
            DecodeError::UnknownComponentKind {
                kind: "Mana".to_string()
            }
        );
        assert_eq!(err.code(), DiagnosticCode::UnknownComponentKind);
    }

    #[test]
    fn malformed_payload_reports_field_path() {
        let mut registry = DecoderRegistry::new();
        registry.register(HealthDecoder);

        let err = registry
            .decode("Health", &json!({ "max": "lots" }))
            .expect_err("bad type");
        match &err {
            DecodeError::MalformedComponentPayload { kind, source } => {
                assert_eq!(kind.as_str(), "Health");
                assert_eq!(source.path, "max");
            }
            other => panic!("unexpected error {other:?}"),
        }
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.code, DiagnosticCode::MalformedComponentPayload);
        assert_eq!(diagnostic.component, Some(ComponentKindId::new("Health")));
    }

    #[test]
    fn capabilities_lookup_is_per_kind() {
        let mut registry = DecoderRegistry::new();
        registry.register(HealthDecoder);

        let caps = registry.capabilities("Health").expect("caps");
        assert!(!caps.affects_rendering);
        assert!(!caps.stable);
        assert!(registry.capabilities("Mana").is_none());
    }

    #[test]
    fn later_registration_replaces_claim() {
        let mut registry = DecoderRegistry::new();
        registry.register(HealthDecoder);
        registry.register(OtherHealthDecoder);

        let caps = registry.capabilities("Health").expect("caps");
        assert_eq!(caps.required_pass, Some("overlay"));
        let still_first = registry.capabilities("Hitpoints").expect("caps");
        assert!(!still_first.affects_rendering);
    }

    #[test]
    fn decoded_components_compare_by_kind_and_value() {
        let mut registry = DecoderRegistry::new();
        registry.register(HealthDecoder);

        let a = registry.decode("Health", &json!({ "max": 5 })).expect("a");
        let b = a.clone();
        let c = registry.decode("Health", &json!({ "max": 6 })).expect("c");
        let d = registry.decode("Hitpoints", &json!({ "max": 5 })).expect("d");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert!(a.is::<Health>());
        assert!(!a.is::<u32>());
    }

    #[test]
    fn registered_kinds_are_sorted() {
        let mut registry = DecoderRegistry::new();
        registry.register(HealthDecoder);
        let kinds = registry
            .registered_kinds()
            .into_iter()
            .map(|kind| kind.as_str().to_string())
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec!["Health".to_string(), "Hitpoints".to_string()]);
    }

    #[test]
    fn default_decoders_cover_every_builtin_kind() {
        let registry = DecoderRegistry::with_default_decoders();
        for kind in [
            "Transform",
            "MeshRenderer",
            "Light",
            "Camera",
            "RigidBody",
            "MeshCollider",
            "Material",
            "CustomShape",
            "GeometryAsset",
            "Instanced",
            "Terrain",
            "LOD",
            "LodComponent",
            "CharacterController",
            "Sound",
            "Script",
            "PrefabInstance",
            "PersistentId",
        ] {
            assert!(registry.has_decoder(kind), "{kind}");
        }
        assert_eq!(registry.registered_kinds().len(), 18);

        let short = registry
            .decode("LOD", &json!({ "originalPath": "models/tree.glb" }))
            .expect("short kind");
        let long = registry
            .decode("LodComponent", &json!({ "originalPath": "models/tree.glb" }))
            .expect("long kind");
        assert!(short.is::<decoders::Lod>() && long.is::<decoders::Lod>());

        let sound = registry.capabilities("Sound").expect("sound");
        assert_eq!(sound.required_pass, Some("audio"));
        assert!(!sound.affects_rendering);
        assert_eq!(
            registry.capabilities("Light").expect("light").required_pass,
            Some("shadow")
        );
    }

    #[test]
    fn kind_id_is_shared_with_decoded_components() {
        let registry = DecoderRegistry::with_default_decoders();
        let kind = registry.kind_id("Transform").expect("kind");
        let decoded = registry.decode("Transform", &json!({})).expect("decode");
        assert_eq!(decoded.kind(), &kind);
        assert!(registry.kind_id("Nope").is_none());
    }

    #[test]
    fn registry_decodes_from_many_threads() {
        let registry = DecoderRegistry::with_default_decoders();
        let payload = json!({ "position": [1.0, 2.0, 3.0] });
        let expected = registry.decode("Transform", &payload).expect("decode");

        std::thread::scope(|scope| {
            let handles = (0..4)
                .map(|_| scope.spawn(|| registry.decode("Transform", &payload)))
                .collect::<Vec<_>>();
            for handle in handles {
                let decoded = handle.join().expect("join").expect("decode");
                assert_eq!(decoded, expected);
            }
        });
    }
}
