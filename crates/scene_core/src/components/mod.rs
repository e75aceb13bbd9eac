mod decoders;
mod registry;

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

pub use decoders::{
    Camera, CameraColor, CameraDecoder, CharacterController, CharacterControllerDecoder,
    ColliderSize, ColliderType, CustomShape, CustomShapeDecoder, GeometryAsset,
    GeometryAssetDecoder, GeometryAssetOptions, InputMapping, InstanceData, Instanced,
    InstancedDecoder, Light, LightColor, LightDecoder, LightType, Lod, LodDecoder, LodQuality,
    Material, MaterialDecoder, MeshCollider, MeshColliderDecoder, MeshRenderer,
    MeshRendererDecoder, PersistentId, PersistentIdDecoder, PhysicsMaterial, PrefabInstance,
    PrefabInstanceDecoder, ProjectionType, RigidBody, RigidBodyDecoder, RigidBodyType, Script,
    ScriptDecoder, ScriptRef, Sound, SoundDecoder, Terrain, TerrainDecoder, Transform,
    TransformDecoder, ViewportRect, PERSISTENT_ID_KIND, PREFAB_INSTANCE_KIND, TRANSFORM_KIND,
};
pub use registry::{
    decode_payload, ComponentData, ComponentDecoder, DecodeError, DecodedComponent,
    DecoderRegistry, PayloadError,
};

/// Name of a component kind, e.g. `"Transform"`.
///
/// Cloning is a reference-count bump; the registry hands out one shared
/// allocation per registered kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKindId(Arc<str>);

impl ComponentKindId {
    pub fn new(kind: impl AsRef<str>) -> Self {
        Self(Arc::from(kind.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ComponentKindId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentKindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentKindId {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

/// What a component kind affects. Read by external render-pass schedulers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentCapabilities {
    pub affects_rendering: bool,
    pub required_pass: Option<&'static str>,
    pub stable: bool,
}

impl ComponentCapabilities {
    pub const fn none() -> Self {
        Self {
            affects_rendering: false,
            required_pass: None,
            stable: true,
        }
    }

    pub const fn rendering(pass: &'static str) -> Self {
        Self {
            affects_rendering: true,
            required_pass: Some(pass),
            stable: true,
        }
    }

    /// Non-rendering component that still needs a dedicated pass, e.g. audio.
    pub const fn with_pass(self, pass: &'static str) -> Self {
        Self {
            required_pass: Some(pass),
            ..self
        }
    }

    pub const fn unstable(self) -> Self {
        Self {
            stable: false,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn kind_ids_compare_by_name() {
        let a = ComponentKindId::new("Transform");
        let b = ComponentKindId::from("Transform");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "Transform");
        assert_ne!(a, ComponentKindId::new("Light"));
    }

    #[test]
    fn kind_ids_look_up_by_str() {
        let mut map = BTreeMap::new();
        map.insert(ComponentKindId::new("Light"), 1);
        assert_eq!(map.get("Light"), Some(&1));
        assert_eq!(map.get("Camera"), None);
    }

    #[test]
    fn capability_constructors() {
        let none = ComponentCapabilities::none();
        assert!(!none.affects_rendering);
        assert!(none.required_pass.is_none());
        assert!(none.stable);

        let geometry = ComponentCapabilities::rendering("geometry");
        assert!(geometry.affects_rendering);
        assert_eq!(geometry.required_pass, Some("geometry"));

        let unstable = ComponentCapabilities::none().unstable();
        assert!(!unstable.stable);
        assert!(!unstable.affects_rendering);

        let audio = ComponentCapabilities::none().with_pass("audio");
        assert!(!audio.affects_rendering);
        assert_eq!(audio.required_pass, Some("audio"));
        assert!(audio.stable);
    }
}
