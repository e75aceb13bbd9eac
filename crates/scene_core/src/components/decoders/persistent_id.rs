use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

use super::common::ensure;

pub const PERSISTENT_ID_KIND: &str = "PersistentId";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct PersistentId {
    pub id: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PersistentIdDecoder;

impl ComponentDecoder for PersistentIdDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &[PERSISTENT_ID_KIND]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::none()
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let id: PersistentId = decode_payload(value)?;
        ensure(!id.id.trim().is_empty(), "id", "must not be empty")?;
        Ok(Box::new(id))
    }
}
