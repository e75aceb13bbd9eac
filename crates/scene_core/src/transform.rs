//! Canonical local transforms.
//!
//! Authored rotations with three elements are Euler angles in degrees; the
//! runtime math works in radians. Every rotation coming from authored data
//! goes through [`rotation_from`] (or [`try_rotation_from`]) so the conversion
//! happens in exactly one place.

use glam::{EulerRot, Quat, Vec3};
use thiserror::Error;
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field} has {actual} elements; expected {expected}")]
pub struct TransformArityError {
    pub field: &'static str,
    pub expected: &'static str,
    pub actual: usize,
}

/// Local-space position, orientation and scale, stored as authored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

pub fn try_position_from(position: Option<&[f32]>) -> Result<Vec3, TransformArityError> {
    vec3_or(position, Vec3::ZERO, "position")
}

pub fn try_scale_from(scale: Option<&[f32]>) -> Result<Vec3, TransformArityError> {
    vec3_or(scale, Vec3::ONE, "scale")
}

pub fn try_rotation_from(rotation: Option<&[f32]>) -> Result<Quat, TransformArityError> {
    match rotation {
        None => Ok(Quat::IDENTITY),
        Some(&[x, y, z]) => Ok(euler_degrees_to_quat([x, y, z])),
        Some(&[x, y, z, w]) => {
            trace!(x, y, z, w, "rotation_quaternion_passthrough");
            Ok(Quat::from_xyzw(x, y, z, w))
        }
        Some(other) => Err(TransformArityError {
            field: "rotation",
            expected: "3 (Euler degrees) or 4 (quaternion x,y,z,w)",
            actual: other.len(),
        }),
    }
}

/// Position, defaulting to the origin. A wrong arity logs and yields the default.
pub fn position_from(position: Option<&[f32]>) -> Vec3 {
    try_position_from(position).unwrap_or_else(|error| {
        warn!(error = %error, "invalid_transform_arity");
        Vec3::ZERO
    })
}

/// Scale, defaulting to one. A wrong arity logs and yields the default.
pub fn scale_from(scale: Option<&[f32]>) -> Vec3 {
    try_scale_from(scale).unwrap_or_else(|error| {
        warn!(error = %error, "invalid_transform_arity");
        Vec3::ONE
    })
}

/// Orientation from an authored rotation array.
///
/// - 3 elements: Euler angles in degrees, converted to radians and composed
///   in XYZ order.
/// - 4 elements: quaternion `[x, y, z, w]`, passed through unchanged.
/// - absent: identity.
/// - anything else: identity, with a warning.
pub fn rotation_from(rotation: Option<&[f32]>) -> Quat {
    try_rotation_from(rotation).unwrap_or_else(|error| {
        warn!(error = %error, "invalid_transform_arity");
        Quat::IDENTITY
    })
}

pub fn euler_degrees_to_quat(degrees: [f32; 3]) -> Quat {
    let [x, y, z] = degrees.map(f32::to_radians);
    let quat = Quat::from_euler(EulerRot::XYZ, x, y, z);
    trace!(
        x_deg = degrees[0],
        y_deg = degrees[1],
        z_deg = degrees[2],
        x_rad = x,
        y_rad = y,
        z_rad = z,
        "rotation_euler_degrees_converted"
    );
    quat
}

fn vec3_or(
    value: Option<&[f32]>,
    default: Vec3,
    field: &'static str,
) -> Result<Vec3, TransformArityError> {
    match value {
        None => Ok(default),
        Some(&[x, y, z]) => Ok(Vec3::new(x, y, z)),
        Some(other) => Err(TransformArityError {
            field,
            expected: "3",
            actual: other.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use proptest::prelude::*;

    use super::*;

    fn assert_quat_close(actual: Quat, expected: Quat) {
        assert!(
            actual.abs_diff_eq(expected, 1e-5),
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn absent_inputs_use_defaults() {
        assert_eq!(position_from(None), Vec3::ZERO);
        assert_eq!(scale_from(None), Vec3::ONE);
        assert_eq!(rotation_from(None), Quat::IDENTITY);
    }

    #[test]
    fn negative_ninety_degrees_is_a_quarter_turn_not_radians() {
        let rotation = rotation_from(Some(&[-90.0, 0.0, 0.0]));
        assert_quat_close(rotation, Quat::from_euler(EulerRot::XYZ, -FRAC_PI_2, 0.0, 0.0));

        let misread_as_radians = Quat::from_euler(EulerRot::XYZ, -90.0, 0.0, 0.0);
        assert!(!rotation.abs_diff_eq(misread_as_radians, 1e-3));
    }

    #[test]
    fn floor_rotated_by_negative_ninety_faces_up() {
        let rotation = rotation_from(Some(&[-90.0, 0.0, 0.0]));
        // A plane authored facing +Z ends up facing +Y.
        let normal = rotation * Vec3::Z;
        assert!(normal.abs_diff_eq(Vec3::Y, 1e-5), "normal was {normal:?}");
    }

    #[test]
    fn euler_angles_compose_in_xyz_order() {
        let rotation = rotation_from(Some(&[90.0, 45.0, 30.0]));
        let expected = Quat::from_rotation_x(FRAC_PI_2)
            * Quat::from_rotation_y(PI / 4.0)
            * Quat::from_rotation_z(PI / 6.0);
        assert_quat_close(rotation, expected);
    }

    #[test]
    fn quaternion_is_passed_through_unchanged() {
        let rotation = rotation_from(Some(&[0.0, 0.707, 0.0, 0.707]));
        assert_eq!(rotation, Quat::from_xyzw(0.0, 0.707, 0.0, 0.707));
    }

    #[test]
    fn wrong_rotation_arity_is_identity_and_error() {
        assert_eq!(rotation_from(Some(&[1.0, 2.0])), Quat::IDENTITY);
        let err = try_rotation_from(Some(&[1.0, 2.0, 3.0, 4.0, 5.0])).expect_err("arity");
        assert_eq!(err.field, "rotation");
        assert_eq!(err.actual, 5);
    }

    #[test]
    fn wrong_vector_arity_falls_back_to_defaults() {
        assert_eq!(position_from(Some(&[1.0, 2.0])), Vec3::ZERO);
        assert_eq!(scale_from(Some(&[])), Vec3::ONE);
        let err = try_scale_from(Some(&[2.0; 4])).expect_err("arity");
        assert_eq!(err.field, "scale");
        assert_eq!(err.actual, 4);
    }

    #[test]
    fn vectors_are_taken_as_authored() {
        assert_eq!(position_from(Some(&[1.0, -2.0, 3.5])), Vec3::new(1.0, -2.0, 3.5));
        assert_eq!(scale_from(Some(&[0.5, 2.0, 0.5])), Vec3::new(0.5, 2.0, 0.5));
    }

    proptest! {
        #[test]
        fn three_elements_match_radian_euler(
            x in -360.0f32..360.0,
            y in -360.0f32..360.0,
            z in -360.0f32..360.0,
        ) {
            let actual = rotation_from(Some(&[x, y, z]));
            let expected = Quat::from_euler(
                EulerRot::XYZ,
                x.to_radians(),
                y.to_radians(),
                z.to_radians(),
            );
            prop_assert!(actual.abs_diff_eq(expected, 1e-5));
        }

        #[test]
        fn four_elements_pass_through(
            x in -1.0f32..1.0,
            y in -1.0f32..1.0,
            z in -1.0f32..1.0,
            w in -1.0f32..1.0,
        ) {
            let actual = rotation_from(Some(&[x, y, z, w]));
            prop_assert_eq!(actual, Quat::from_xyzw(x, y, z, w));
        }

        #[test]
        fn other_arities_are_identity(values in proptest::collection::vec(-10.0f32..10.0, 0..8)) {
            prop_assume!(values.len() != 3 && values.len() != 4);
            prop_assert_eq!(rotation_from(Some(values.as_slice())), Quat::IDENTITY);
        }
    }
}
