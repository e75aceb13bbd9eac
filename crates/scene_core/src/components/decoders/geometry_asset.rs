use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

use super::common::{default_one, default_true};

/// Import-time processing applied to a geometry file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryAssetOptions {
    #[serde(default)]
    pub recompute_normals: bool,
    #[serde(default)]
    pub recompute_tangents: bool,
    #[serde(default)]
    pub recenter: bool,
    #[serde(default = "default_true")]
    pub compute_bounds: bool,
    #[serde(default)]
    pub flip_normals: bool,
    #[serde(default = "default_one")]
    pub scale: f32,
}

impl Default for GeometryAssetOptions {
    fn default() -> Self {
        Self {
            recompute_normals: false,
            recompute_tangents: false,
            recenter: false,
            compute_bounds: true,
            flip_normals: false,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryAsset {
    pub path: String,
    #[serde(default)]
    pub geometry_id: Option<String>,
    #[serde(default)]
    pub material_id: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub cast_shadows: bool,
    #[serde(default = "default_true")]
    pub receive_shadows: bool,
    #[serde(default)]
    pub options: Option<GeometryAssetOptions>,
}

impl GeometryAsset {
    pub fn options(&self) -> GeometryAssetOptions {
        self.options.unwrap_or_default()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GeometryAssetDecoder;

impl ComponentDecoder for GeometryAssetDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &["GeometryAsset"]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::rendering("geometry")
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let asset: GeometryAsset = decode_payload(value)?;
        Ok(Box::new(asset))
    }
}
