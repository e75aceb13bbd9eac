use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

/// Procedural shape reference. `params` is opaque to the loader and handed to
/// whichever generator owns `shape_id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomShape {
    #[serde(default)]
    pub shape_id: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CustomShapeDecoder;

impl ComponentDecoder for CustomShapeDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &["CustomShape"]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::rendering("geometry")
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let shape: CustomShape = decode_payload(value)?;
        Ok(Box::new(shape))
    }
}
