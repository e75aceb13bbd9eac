use glam::{Vec2, Vec3};
use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

use super::common::{default_one, optional_vec2, optional_vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionType {
    #[default]
    Perspective,
    Orthographic,
}

/// Clear color; channels default to black with full alpha.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CameraColor {
    #[serde(default)]
    pub r: f32,
    #[serde(default)]
    pub g: f32,
    #[serde(default)]
    pub b: f32,
    #[serde(default = "default_one")]
    pub a: f32,
}

/// Normalized viewport rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ViewportRect {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default = "default_one")]
    pub width: f32,
    #[serde(default = "default_one")]
    pub height: f32,
}

impl Default for ViewportRect {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default)]
    pub projection_type: ProjectionType,
    #[serde(default = "default_orthographic_size")]
    pub orthographic_size: f32,
    /// Render order among cameras; lower draws first.
    #[serde(default)]
    pub depth: i32,

    #[serde(default)]
    pub clear_flags: Option<String>,
    #[serde(default)]
    pub background_color: Option<CameraColor>,
    #[serde(default)]
    pub skybox_texture: Option<String>,

    #[serde(default)]
    pub control_mode: Option<String>,
    #[serde(default)]
    pub enable_smoothing: bool,
    #[serde(default)]
    pub follow_target: Option<u32>,
    #[serde(default, deserialize_with = "optional_vec3")]
    pub follow_offset: Option<Vec3>,
    #[serde(default = "default_smoothing")]
    pub smoothing_speed: f32,
    #[serde(default = "default_smoothing")]
    pub rotation_smoothing: f32,

    #[serde(default)]
    pub viewport_rect: Option<ViewportRect>,

    #[serde(default)]
    pub hdr: bool,
    #[serde(default)]
    pub tone_mapping: Option<String>,
    #[serde(default = "default_one")]
    pub tone_mapping_exposure: f32,
    #[serde(default)]
    pub enable_post_processing: bool,
    #[serde(default)]
    pub post_processing_preset: Option<String>,

    #[serde(default, deserialize_with = "optional_vec3")]
    pub skybox_scale: Option<Vec3>,
    #[serde(default, deserialize_with = "optional_vec3")]
    pub skybox_rotation: Option<Vec3>,
    #[serde(default, deserialize_with = "optional_vec2")]
    pub skybox_repeat: Option<Vec2>,
    #[serde(default, deserialize_with = "optional_vec2")]
    pub skybox_offset: Option<Vec2>,
    #[serde(default = "default_one")]
    pub skybox_intensity: f32,
    #[serde(default)]
    pub skybox_blur: f32,
}

impl Camera {
    pub fn viewport(&self) -> ViewportRect {
        self.viewport_rect.unwrap_or_default()
    }
}

fn default_fov() -> f32 {
    60.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    100.0
}

fn default_orthographic_size() -> f32 {
    10.0
}

fn default_smoothing() -> f32 {
    5.0
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CameraDecoder;

impl ComponentDecoder for CameraDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &["Camera"]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::rendering("geometry")
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let camera: Camera = decode_payload(value)?;
        Ok(Box::new(camera))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::diagnostics::DiagnosticLog;

    fn decode(value: Value) -> Result<Camera, PayloadError> {
        CameraDecoder
            .decode(&value, &mut DiagnosticLog::new())
            .map(|boxed| {
                boxed
                    .as_ref()
                    .as_any()
                    .downcast_ref::<Camera>()
                    .cloned()
                    .expect("camera")
            })
    }

    #[test]
    fn defaults_describe_a_perspective_camera() {
        let camera = decode(json!({ "isMain": true })).expect("decode");
        assert!(camera.is_main);
        assert_eq!(camera.projection_type, ProjectionType::Perspective);
        assert_eq!(camera.fov, 60.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 100.0);
        assert_eq!(camera.depth, 0);
        assert_eq!(camera.smoothing_speed, 5.0);
        assert_eq!(camera.viewport(), ViewportRect::default());
        assert!(camera.follow_offset.is_none());
    }

    #[test]
    fn out_of_range_planes_and_fov_are_kept() {
        let camera = decode(json!({ "fov": 190.0, "near": 5.0, "far": 5.0 })).expect("decode");
        assert_eq!(camera.fov, 190.0);
        assert_eq!(camera.far, camera.near);
    }

    #[test]
    fn follow_and_skybox_vectors_accept_both_forms() {
        let camera = decode(json!({
            "followTarget": 7,
            "followOffset": { "x": 0, "y": 2, "z": -6 },
            "skyboxScale": [1, 1, 1],
            "skyboxRepeat": { "u": 2, "v": 4 },
            "skyboxOffset": [0.5, 0.0],
            "backgroundColor": { "r": 0.2 },
            "viewportRect": { "width": 0.5 }
        }))
        .expect("decode");
        assert_eq!(camera.follow_target, Some(7));
        assert_eq!(camera.follow_offset, Some(Vec3::new(0.0, 2.0, -6.0)));
        assert_eq!(camera.skybox_scale, Some(Vec3::ONE));
        assert_eq!(camera.skybox_repeat, Some(Vec2::new(2.0, 4.0)));
        assert_eq!(camera.skybox_offset, Some(Vec2::new(0.5, 0.0)));
        let background = camera.background_color.expect("background");
        assert_eq!((background.r, background.g, background.a), (0.2, 0.0, 1.0));
        assert_eq!(camera.viewport().width, 0.5);
        assert_eq!(camera.viewport().height, 1.0);
    }

    #[test]
    fn unknown_projection_is_rejected() {
        let err = decode(json!({ "projectionType": "fisheye" })).expect_err("enum");
        assert_eq!(err.path, "projectionType");
    }

    #[test]
    fn camera_renders_in_geometry_pass() {
        assert_eq!(CameraDecoder.capabilities().required_pass, Some("geometry"));
    }
}
