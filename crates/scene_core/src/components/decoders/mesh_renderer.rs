use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

use super::common::default_true;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshRenderer {
    #[serde(default, alias = "mesh_id")]
    pub mesh_id: Option<String>,
    #[serde(default, alias = "material_id")]
    pub material_id: Option<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default, alias = "model_path")]
    pub model_path: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true", alias = "cast_shadows")]
    pub cast_shadows: bool,
    #[serde(default = "default_true", alias = "receive_shadows")]
    pub receive_shadows: bool,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MeshRendererDecoder;

impl ComponentDecoder for MeshRendererDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &["MeshRenderer"]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::rendering("geometry")
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let renderer: MeshRenderer = decode_payload(value)?;
        Ok(Box::new(renderer))
    }
}
