use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

use super::common::{default_one, default_true};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RigidBodyType {
    #[default]
    Dynamic,
    Kinematic,
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PhysicsMaterial {
    #[serde(default = "default_friction")]
    pub friction: f32,
    #[serde(default = "default_restitution")]
    pub restitution: f32,
    #[serde(default = "default_one")]
    pub density: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: default_friction(),
            restitution: default_restitution(),
            density: 1.0,
        }
    }
}

fn default_friction() -> f32 {
    0.7
}

fn default_restitution() -> f32 {
    0.3
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthoredRigidBody {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default)]
    body_type: Option<RigidBodyType>,
    /// Older scenes spell the body type as `type`.
    #[serde(default, rename = "type")]
    legacy_type: Option<RigidBodyType>,
    #[serde(default = "default_one")]
    mass: f32,
    #[serde(default = "default_one")]
    gravity_scale: f32,
    #[serde(default = "default_true")]
    can_sleep: bool,
    #[serde(default)]
    material: Option<PhysicsMaterial>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub enabled: bool,
    pub body_type: RigidBodyType,
    pub mass: f32,
    pub gravity_scale: f32,
    pub can_sleep: bool,
    pub material: PhysicsMaterial,
}

impl From<AuthoredRigidBody> for RigidBody {
    fn from(authored: AuthoredRigidBody) -> Self {
        Self {
            enabled: authored.enabled,
            body_type: authored
                .body_type
                .or(authored.legacy_type)
                .unwrap_or_default(),
            mass: authored.mass,
            gravity_scale: authored.gravity_scale,
            can_sleep: authored.can_sleep,
            material: authored.material.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RigidBodyDecoder;

impl ComponentDecoder for RigidBodyDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &["RigidBody"]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::none()
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let authored: AuthoredRigidBody = decode_payload(value)?;
        Ok(Box::new(RigidBody::from(authored)))
    }
}
