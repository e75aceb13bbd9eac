use std::f32::consts::FRAC_PI_6;

use glam::Vec3;
use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

use super::common::{default_one, default_true};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightType {
    #[default]
    Directional,
    Point,
    Spot,
    Ambient,
    Hemisphere,
}

/// Linear RGB. Channels above one are kept for HDR lighting.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LightColor {
    #[serde(default = "default_one")]
    pub r: f32,
    #[serde(default = "default_one")]
    pub g: f32,
    #[serde(default = "default_one")]
    pub b: f32,
}

impl Default for LightColor {
    fn default() -> Self {
        Self {
            r: 1.0,
            g: 1.0,
            b: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Light {
    #[serde(default, alias = "type")]
    pub light_type: LightType,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub color: LightColor,
    #[serde(default = "default_one")]
    pub intensity: f32,
    #[serde(default = "default_range")]
    pub range: f32,
    #[serde(default = "default_one")]
    pub decay: f32,
    #[serde(default = "default_angle")]
    pub angle: f32,
    #[serde(default = "default_penumbra")]
    pub penumbra: f32,
    #[serde(default = "default_true")]
    pub cast_shadow: bool,
    #[serde(default)]
    pub direction_x: f32,
    #[serde(default = "default_direction_y")]
    pub direction_y: f32,
    #[serde(default)]
    pub direction_z: f32,
    #[serde(default = "default_shadow_map_size")]
    pub shadow_map_size: u32,
    #[serde(default = "default_shadow_bias")]
    pub shadow_bias: f32,
    #[serde(default = "default_shadow_radius")]
    pub shadow_radius: f32,
}

impl Light {
    pub fn direction(&self) -> Vec3 {
        Vec3::new(self.direction_x, self.direction_y, self.direction_z)
    }
}

fn default_range() -> f32 {
    10.0
}

fn default_angle() -> f32 {
    FRAC_PI_6
}

fn default_penumbra() -> f32 {
    0.1
}

fn default_direction_y() -> f32 {
    -1.0
}

fn default_shadow_map_size() -> u32 {
    2048
}

fn default_shadow_bias() -> f32 {
    -0.0001
}

fn default_shadow_radius() -> f32 {
    2.0
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LightDecoder;

impl ComponentDecoder for LightDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &["Light"]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::rendering("shadow")
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let light: Light = decode_payload(value)?;
        Ok(Box::new(light))
    }
}
