use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, ComponentKindId,
    PayloadError,
};
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use crate::transform::{
    try_position_from, try_rotation_from, try_scale_from, Transform, TransformArityError,
};

use super::common::VectorInput;

pub const TRANSFORM_KIND: &str = "Transform";

#[derive(Debug, Default, Deserialize)]
struct AuthoredTransform {
    #[serde(default)]
    position: Option<VectorInput>,
    #[serde(default)]
    rotation: Option<VectorInput>,
    #[serde(default)]
    scale: Option<VectorInput>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TransformDecoder;

impl ComponentDecoder for TransformDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &[TRANSFORM_KIND]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::rendering("geometry")
    }

    fn decode(
        &self,
        value: &Value,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let authored: AuthoredTransform = decode_payload(value)?;
        let position = authored.position.map(VectorInput::into_components);
        let rotation = authored.rotation.map(VectorInput::into_components);
        let scale = authored.scale.map(VectorInput::into_components);

        let mut report = |error: TransformArityError| {
            sink.emit(
                Diagnostic::new(DiagnosticCode::InvalidTransformArity, error.to_string())
                    .with_component(ComponentKindId::new(TRANSFORM_KIND)),
            );
        };

        let defaults = Transform::IDENTITY;
        let transform = Transform {
            position: try_position_from(position.as_deref()).unwrap_or_else(|error| {
                report(error);
                defaults.position
            }),
            rotation: try_rotation_from(rotation.as_deref()).unwrap_or_else(|error| {
                report(error);
                defaults.rotation
            }),
            scale: try_scale_from(scale.as_deref()).unwrap_or_else(|error| {
                report(error);
                defaults.scale
            }),
        };
        Ok(Box::new(transform))
    }
}
