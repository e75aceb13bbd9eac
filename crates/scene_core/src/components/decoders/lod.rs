use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LodQuality {
    #[default]
    Original,
    HighFidelity,
    LowFidelity,
}

/// Per-entity level-of-detail overrides. Variant paths left unset are derived
/// from `original_path` by the asset pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lod {
    pub original_path: String,
    #[serde(default)]
    pub high_fidelity_path: Option<String>,
    #[serde(default)]
    pub low_fidelity_path: Option<String>,
    /// `[high, low]` switch distances.
    #[serde(default)]
    pub distance_thresholds: Option<[f32; 2]>,
    #[serde(default)]
    pub override_quality: Option<LodQuality>,
    #[serde(default)]
    pub current_quality: Option<LodQuality>,
}

/// Claims both the short and the long kind name.
#[derive(Debug, Default, Clone, Copy)]
pub struct LodDecoder;

impl ComponentDecoder for LodDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &["LOD", "LodComponent"]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::rendering("geometry")
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let lod: Lod = decode_payload(value)?;
        Ok(Box::new(lod))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn thresholds_and_override() {
        let lod: Lod = decode_payload(&json!({
            "originalPath": "models/tree.glb",
            "distanceThresholds": [25.0, 60.0],
            "overrideQuality": "LowFidelity"
        }))
        .expect("decode");
        assert_eq!(lod.distance_thresholds, Some([25.0, 60.0]));
        assert_eq!(lod.override_quality, Some(LodQuality::LowFidelity));
        assert!(lod.high_fidelity_path.is_none());
    }

    #[test]
    fn unknown_quality_is_rejected() {
        let err = decode_payload::<Lod>(&json!({
            "originalPath": "models/tree.glb",
            "overrideQuality": "ultra"
        }))
        .expect_err("enum");
        assert_eq!(err.path, "overrideQuality");
    }
}
