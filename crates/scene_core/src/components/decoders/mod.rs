mod camera;
mod character_controller;
mod common;
mod custom_shape;
mod geometry_asset;
mod instanced;
mod light;
mod lod;
mod material;
mod mesh_collider;
mod mesh_renderer;
mod persistent_id;
mod prefab_instance;
mod rigid_body;
mod script;
mod sound;
mod terrain;
mod transform;

pub use camera::{Camera, CameraColor, CameraDecoder, ProjectionType, ViewportRect};
pub use character_controller::{CharacterController, CharacterControllerDecoder, InputMapping};
pub use custom_shape::{CustomShape, CustomShapeDecoder};
pub use geometry_asset::{GeometryAsset, GeometryAssetDecoder, GeometryAssetOptions};
pub use instanced::{InstanceData, Instanced, InstancedDecoder};
pub use light::{Light, LightColor, LightDecoder, LightType};
pub use lod::{Lod, LodDecoder, LodQuality};
pub use material::{Material, MaterialDecoder};
pub use mesh_collider::{ColliderSize, ColliderType, MeshCollider, MeshColliderDecoder};
pub use mesh_renderer::{MeshRenderer, MeshRendererDecoder};
pub use persistent_id::{PersistentId, PersistentIdDecoder, PERSISTENT_ID_KIND};
pub use prefab_instance::{PrefabInstance, PrefabInstanceDecoder, PREFAB_INSTANCE_KIND};
pub use rigid_body::{PhysicsMaterial, RigidBody, RigidBodyDecoder, RigidBodyType};
pub use script::{Script, ScriptDecoder, ScriptRef};
pub use sound::{Sound, SoundDecoder};
pub use terrain::{Terrain, TerrainDecoder};
pub use transform::{TransformDecoder, TRANSFORM_KIND};

pub use crate::transform::Transform;
