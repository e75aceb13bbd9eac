pub mod components;
pub mod config;
pub mod diagnostics;
pub mod loader;
pub mod prefab;
pub mod scene;
pub mod transform;

pub use components::{
    ComponentCapabilities, ComponentData, ComponentDecoder, ComponentKindId, DecodeError,
    DecodedComponent, DecoderRegistry, PayloadError,
};
pub use config::LoadConfig;
pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticLog, DiagnosticSink, TracingSink};
pub use loader::{SceneDocument, SceneLoadError, SceneLoadReport, SceneLoader};
pub use prefab::{
    apply, parse_prefabs, InstanceRequest, InstantiateError, OverridePatch, PrefabDefinition,
    PrefabEntity, PrefabInstantiator, PrefabRegistry, PrefabRegistryError,
};
pub use scene::{EntityId, EntityIdAllocator, EntityRecord, SceneEntity};
pub use transform::{euler_degrees_to_quat, position_from, rotation_from, scale_from};
