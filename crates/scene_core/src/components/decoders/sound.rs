use serde::Deserialize;
use serde_json::Value;

use crate::components::{
    decode_payload, ComponentCapabilities, ComponentData, ComponentDecoder, PayloadError,
};
use crate::diagnostics::DiagnosticSink;

use super::common::{default_one, default_true};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sound {
    /// Empty when the clip has not been assigned yet.
    #[serde(default, alias = "audio_path")]
    pub audio_path: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default, rename = "loop")]
    pub looping: bool,
    #[serde(default = "default_one")]
    pub volume: f32,
    #[serde(default = "default_one")]
    pub pitch: f32,
    #[serde(default = "default_one")]
    pub playback_rate: f32,
    #[serde(default)]
    pub muted: bool,

    #[serde(default = "default_true", rename = "is3D", alias = "is3d")]
    pub is_3d: bool,
    #[serde(default = "default_one")]
    pub min_distance: f32,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
    #[serde(default = "default_one")]
    pub rolloff_factor: f32,
    #[serde(default = "default_cone_angle")]
    pub cone_inner_angle: f32,
    #[serde(default = "default_cone_angle")]
    pub cone_outer_angle: f32,
    #[serde(default)]
    pub cone_outer_gain: f32,

    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub current_time: f32,
    #[serde(default)]
    pub duration: f32,
    #[serde(default)]
    pub format: Option<String>,
}

impl Sound {
    pub fn has_clip(&self) -> bool {
        !self.audio_path.trim().is_empty()
    }
}

fn default_max_distance() -> f32 {
    10_000.0
}

fn default_cone_angle() -> f32 {
    360.0
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SoundDecoder;

impl ComponentDecoder for SoundDecoder {
    fn kinds(&self) -> &'static [&'static str] {
        &["Sound"]
    }

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::none().with_pass("audio")
    }

    fn decode(
        &self,
        value: &Value,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Box<dyn ComponentData>, PayloadError> {
        let sound: Sound = decode_payload(value)?;
        Ok(Box::new(sound))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::diagnostics::DiagnosticLog;

    fn decode(value: Value) -> Result<Sound, PayloadError> {
        SoundDecoder
            .decode(&value, &mut DiagnosticLog::new())
            .map(|boxed| {
                boxed
                    .as_ref()
                    .as_any()
                    .downcast_ref::<Sound>()
                    .cloned()
                    .expect("sound payload")
            })
    }

    #[test]
    fn sounds_are_spatial_by_default() {
        let sound = decode(json!({ "audioPath": "sfx/door.ogg" })).expect("decode");
        assert!(sound.is_3d);
        assert!(!sound.autoplay);
        assert_eq!(sound.max_distance, 10_000.0);
        assert_eq!(sound.cone_inner_angle, 360.0);
        assert_eq!(sound.pitch, 1.0);
    }

    #[test]
    fn volume_above_one_is_kept() {
        let sound = decode(json!({ "audioPath": "sfx/door.ogg", "volume": 1.5 })).expect("decode");
        assert_eq!(sound.volume, 1.5);
    }

    #[test]
    fn missing_audio_path_decodes_as_unassigned() {
        let sound = decode(json!({ "volume": 0.5 })).expect("decode");
        assert_eq!(sound.audio_path, "");
        assert!(!sound.has_clip());
        assert_eq!(sound.volume, 0.5);
    }

    #[test]
    fn loop_and_spatial_flags() {
        let sound = decode(json!({
            "audioPath": "sfx/wind.ogg",
            "loop": true,
            "is3D": false,
            "coneOuterGain": 0.25
        }))
        .expect("decode");
        assert!(sound.looping);
        assert!(!sound.is_3d);
        assert!(sound.has_clip());
        assert_eq!(sound.volume, 1.0);
        assert_eq!(sound.cone_outer_gain, 0.25);
    }

    #[test]
    fn sound_needs_audio_pass_without_rendering() {
        let caps = SoundDecoder.capabilities();
        assert!(!caps.affects_rendering);
        assert_eq!(caps.required_pass, Some("audio"));
        assert!(caps.stable);
    }
}
