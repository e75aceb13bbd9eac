use glam::{UVec2, Vec2};
use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

use super::common::default_true;

/// Heightfield terrain generated from fractal noise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terrain {
    /// World-space width and depth.
    #[serde(default = "default_size")]
    pub size: [f32; 2],
    /// Vertex counts along each axis.
    #[serde(default = "default_segments")]
    pub segments: [u32; 2],
    #[serde(default = "default_height_scale")]
    pub height_scale: f32,
    #[serde(default = "default_true")]
    pub noise_enabled: bool,
    #[serde(default = "default_noise_seed")]
    pub noise_seed: u32,
    #[serde(default = "default_noise_frequency")]
    pub noise_frequency: f32,
    #[serde(default = "default_noise_octaves")]
    pub noise_octaves: u8,
    #[serde(default = "default_noise_persistence")]
    pub noise_persistence: f32,
    #[serde(default = "default_noise_lacunarity")]
    pub noise_lacunarity: f32,
}

impl Terrain {
    pub fn size(&self) -> Vec2 {
        Vec2::from_array(self.size)
    }

    pub fn segments(&self) -> UVec2 {
        UVec2::from_array(self.segments)
    }
}

fn default_size() -> [f32; 2] {
    [20.0, 20.0]
}

fn default_segments() -> [u32; 2] {
    [129, 129]
}

fn default_height_scale() -> f32 {
    2.0
}

fn default_noise_seed() -> u32 {
    1337
}

fn default_noise_frequency() -> f32 {
    4.0
}

fn default_noise_octaves() -> u8 {
    4
}

fn default_noise_persistence() -> f32 {
    0.5
}

fn default_noise_lacunarity() -> f32 {
    2.0
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TerrainDecoder;

impl ComponentDecoder for TerrainDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &["Terrain"]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::rendering("geometry")
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let terrain: Terrain = decode_payload(value)?;
        Ok(Box::new(terrain))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_describe_a_noisy_grid() {
        let terrain: Terrain = decode_payload(&json!({})).expect("decode");
        assert_eq!(terrain.size(), Vec2::splat(20.0));
        assert_eq!(terrain.segments(), UVec2::splat(129));
        assert!(terrain.noise_enabled);
        assert_eq!(terrain.noise_seed, 1337);
        assert_eq!(terrain.noise_octaves, 4);
    }

    #[test]
    fn octaves_must_fit_a_byte() {
        let err = decode_payload::<Terrain>(&json!({ "noiseOctaves": 300 })).expect_err("u8");
        assert_eq!(err.path, "noiseOctaves");
    }
}
