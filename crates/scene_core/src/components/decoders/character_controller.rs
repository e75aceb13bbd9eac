use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

use super::common::{default_one, default_true};

/// Key bindings, named the way the input layer reports keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputMapping {
    #[serde(default = "key_forward")]
    pub forward: String,
    #[serde(default = "key_backward")]
    pub backward: String,
    #[serde(default = "key_left")]
    pub left: String,
    #[serde(default = "key_right")]
    pub right: String,
    #[serde(default = "key_jump")]
    pub jump: String,
}

impl Default for InputMapping {
    fn default() -> Self {
        Self {
            forward: key_forward(),
            backward: key_backward(),
            left: key_left(),
            right: key_right(),
            jump: key_jump(),
        }
    }
}

fn key_forward() -> String {
    "w".to_owned()
}

fn key_backward() -> String {
    "s".to_owned()
}

fn key_left() -> String {
    "a".to_owned()
}

fn key_right() -> String {
    "d".to_owned()
}

fn key_jump() -> String {
    "space".to_owned()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterController {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Steepest walkable slope in degrees.
    #[serde(default = "default_slope_limit")]
    pub slope_limit: f32,
    #[serde(default = "default_step_offset")]
    pub step_offset: f32,
    #[serde(default = "default_skin_width")]
    pub skin_width: f32,
    #[serde(default = "default_one")]
    pub gravity_scale: f32,
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
    #[serde(default = "default_jump_strength")]
    pub jump_strength: f32,
    #[serde(default = "default_control_mode")]
    pub control_mode: String,
    #[serde(default)]
    pub input_mapping: Option<InputMapping>,
    #[serde(default)]
    pub is_grounded: bool,
}

impl CharacterController {
    pub fn input_mapping(&self) -> InputMapping {
        self.input_mapping.clone().unwrap_or_default()
    }
}

fn default_slope_limit() -> f32 {
    45.0
}

fn default_step_offset() -> f32 {
    0.3
}

fn default_skin_width() -> f32 {
    0.08
}

fn default_max_speed() -> f32 {
    6.0
}

fn default_jump_strength() -> f32 {
    6.5
}

fn default_control_mode() -> String {
    "auto".to_owned()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CharacterControllerDecoder;

impl ComponentDecoder for CharacterControllerDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &["CharacterController"]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::none()
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let controller: CharacterController = decode_payload(value)?;
        Ok(Box::new(controller))
    }
}
