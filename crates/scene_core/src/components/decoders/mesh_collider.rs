use glam::Vec3;
use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

use super::common::{default_true, vec3_field};
use super::rigid_body::PhysicsMaterial;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColliderType {
    #[default]
    Box,
    Sphere,
    Capsule,
    Convex,
    Mesh,
    Heightfield,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColliderSize {
    #[serde(default = "unit")]
    pub width: f32,
    #[serde(default = "unit")]
    pub height: f32,
    #[serde(default = "unit")]
    pub depth: f32,
    #[serde(default = "half")]
    pub radius: f32,
    #[serde(default = "half")]
    pub capsule_radius: f32,
    #[serde(default = "double")]
    pub capsule_height: f32,
}

impl Default for ColliderSize {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            radius: 0.5,
            capsule_radius: 0.5,
            capsule_height: 2.0,
        }
    }
}

fn unit() -> f32 {
    1.0
}

fn half() -> f32 {
    0.5
}

fn double() -> f32 {
    2.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthoredCollider {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default, alias = "type")]
    collider_type: ColliderType,
    #[serde(default)]
    is_trigger: bool,
    #[serde(default)]
    size: ColliderSize,
    #[serde(default)]
    center: [f32; 3],
    #[serde(default)]
    physics_material: Option<PhysicsMaterial>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshCollider {
    pub enabled: bool,
    pub collider_type: ColliderType,
    pub is_trigger: bool,
    pub size: ColliderSize,
    pub center: Vec3,
    pub physics_material: PhysicsMaterial,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MeshColliderDecoder;

impl ComponentDecoder for MeshColliderDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &["MeshCollider"]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::none()
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let authored: AuthoredCollider = decode_payload(value)?;
        Ok(Box::new(MeshCollider {
            enabled: authored.enabled,
            collider_type: authored.collider_type,
            is_trigger: authored.is_trigger,
            size: authored.size,
            center: vec3_field(authored.center),
            physics_material: authored.physics_material.unwrap_or_default(),
        }))
    }
}
