use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

use super::common::ensure;

pub const PREFAB_INSTANCE_KIND: &str = "PrefabInstance";

/// Marker placed on a scene entity that should be expanded from a prefab.
///
/// `override_patch` is kept as raw JSON and parsed when the instance is
/// expanded, so a bad patch does not stop the marker itself from loading.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefabInstance {
    pub prefab_id: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub instance_uuid: Option<String>,
    #[serde(default)]
    pub override_patch: Option<Value>,
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PrefabInstanceDecoder;

impl ComponentDecoder for PrefabInstanceDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &[PREFAB_INSTANCE_KIND]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::none()
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let marker: PrefabInstance = decode_payload(value)?;
        ensure(!marker.prefab_id.is_empty(), "prefabId", "must not be empty")?;
        Ok(Box::new(marker))
    }
}
