use glam::{Vec2, Vec3};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::components::PayloadError;

/// A vector authored either as `[x, y, z(, w)]` or as `{ "x": .., "y": .., "z": .. }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum VectorInput {
    Array(Vec<f32>),
    Object {
        x: f32,
        y: f32,
        z: f32,
        #[serde(default)]
        w: Option<f32>,
    },
}

impl VectorInput {
    pub(super) fn into_components(self) -> Vec<f32> {
        match self {
            Self::Array(values) => values,
            Self::Object { x, y, z, w: None } => vec![x, y, z],
            Self::Object {
                x,
                y,
                z,
                w: Some(w),
            } => vec![x, y, z, w],
        }
    }
}

pub(super) fn ensure(condition: bool, path: &str, message: &str) -> Result<(), PayloadError> {
    if condition {
        Ok(())
    } else {
        Err(PayloadError::at(path, message))
    }
}

/// Texture-space pair authored as `[u, v]` or `{ "u": .., "v": .. }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Vec2Input {
    Array([f32; 2]),
    Object { u: f32, v: f32 },
}

/// `deserialize_with` target for optional three-component vectors.
pub(super) fn optional_vec3<'de, D>(deserializer: D) -> Result<Option<Vec3>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(input) = Option::<VectorInput>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match input.into_components().as_slice() {
        [x, y, z] => Ok(Some(Vec3::new(*x, *y, *z))),
        other => Err(D::Error::invalid_length(other.len(), &"3 components")),
    }
}

pub(super) fn optional_vec2<'de, D>(deserializer: D) -> Result<Option<Vec2>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<Vec2Input>::deserialize(deserializer)?.map(|input| match input {
            Vec2Input::Array([u, v]) | Vec2Input::Object { u, v } => Vec2::new(u, v),
        }),
    )
}

pub(super) fn vec3_field(value: [f32; 3]) -> Vec3 {
    Vec3::from_array(value)
}

pub(super) fn default_true() -> bool {
    true
}

pub(super) fn default_one() -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn vector_input_accepts_array_and_object_forms() {
        let array: VectorInput = serde_json::from_value(json!([1, 2, 3])).expect("array");
        assert_eq!(array.into_components(), vec![1.0, 2.0, 3.0]);

        let object: VectorInput =
            serde_json::from_value(json!({ "x": 1.0, "y": 2.0, "z": 3.0 })).expect("object");
        assert_eq!(object.into_components(), vec![1.0, 2.0, 3.0]);

        let quat: VectorInput =
            serde_json::from_value(json!({ "x": 0, "y": 0, "z": 0, "w": 1 })).expect("quat");
        assert_eq!(quat.into_components(), vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "optional_vec3")]
        offset: Option<Vec3>,
        #[serde(default, deserialize_with = "optional_vec2")]
        repeat: Option<Vec2>,
    }

    #[test]
    fn optional_vectors_accept_both_forms() {
        let holder: Holder = serde_json::from_value(json!({
            "offset": { "x": 0, "y": 2, "z": -4 },
            "repeat": { "u": 2, "v": 3 }
        }))
        .expect("object forms");
        assert_eq!(holder.offset, Some(Vec3::new(0.0, 2.0, -4.0)));
        assert_eq!(holder.repeat, Some(Vec2::new(2.0, 3.0)));

        let holder: Holder =
            serde_json::from_value(json!({ "offset": [1, 1, 1], "repeat": [1, 2] }))
                .expect("array forms");
        assert_eq!(holder.offset, Some(Vec3::ONE));
        assert_eq!(holder.repeat, Some(Vec2::new(1.0, 2.0)));

        let empty: Holder = serde_json::from_value(json!({})).expect("absent");
        assert!(empty.offset.is_none() && empty.repeat.is_none());
    }

    #[test]
    fn optional_vec3_rejects_wrong_arity() {
        let err = serde_json::from_value::<Holder>(json!({ "offset": [1, 2] }))
            .expect_err("two components");
        assert!(err.to_string().contains("3 components"));
    }

    #[test]
    fn ensure_reports_path() {
        assert!(ensure(true, "id", "must not be empty").is_ok());
        let err = ensure(false, "id", "must not be empty").expect_err("false");
        assert_eq!(err.path, "id");
    }
}
