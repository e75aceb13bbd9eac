use glam::Vec3;
use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

use super::common::{default_true, vec3_field};

/// One copy of the base mesh. Unset rotation, scale and color fall back to
/// identity, one and the material color respectively.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceData {
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: Option<[f32; 3]>,
    #[serde(default)]
    pub scale: Option<[f32; 3]>,
    #[serde(default)]
    pub color: Option<[f32; 3]>,
    #[serde(default)]
    pub user_data: Option<Value>,
}

impl InstanceData {
    pub fn position(&self) -> Vec3 {
        vec3_field(self.position)
    }

    pub fn scale(&self) -> Vec3 {
        self.scale.map_or(Vec3::ONE, vec3_field)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instanced {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default)]
    pub base_mesh_id: String,
    #[serde(default)]
    pub base_material_id: String,
    #[serde(default)]
    pub instances: Vec<InstanceData>,
    #[serde(default = "default_true")]
    pub cast_shadows: bool,
    #[serde(default = "default_true")]
    pub receive_shadows: bool,
    #[serde(default = "default_true", rename = "frustum_culled", alias = "frustumCulled")]
    pub frustum_culled: bool,
}

fn default_capacity() -> u32 {
    100
}

#[derive(Debug, Default, Clone, Copy)]
pub struct InstancedDecoder;

impl ComponentDecoder for InstancedDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &["Instanced"]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::rendering("geometry")
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let instanced: Instanced = decode_payload(value)?;
        Ok(Box::new(instanced))
    }
}
