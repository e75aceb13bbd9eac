use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

/// Entity-level material binding; `id` names an entry in the material library.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Material {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialDecoder;

impl ComponentDecoder for MaterialDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &["Material"]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::rendering("geometry")
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let material: Material = decode_payload(value)?;
        Ok(Box::new(material))
    }
}
