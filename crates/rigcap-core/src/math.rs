//! Mathematical utilities and type definitions.
//!
//! This module provides the fundamental types used throughout the toolkit and
//! the pose arithmetic behind the calibration export: rebuilding a
//! rotation+translation-only transform from an evaluated world affine,
//! composing reference-relative poses, and applying the axis-convention
//! conversion for downstream SfM tooling.

use nalgebra::{
    Isometry3, Matrix3, Matrix4, Quaternion, Rotation3, Translation3, UnitQuaternion, Vector3,
};
use serde::{Deserialize, Serialize};

/// Scalar type used throughout the toolkit (currently `f64`).
pub type Real = f64;

/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// 4×4 matrix with [`Real`] entries.
pub type Mat4 = Matrix4<Real>;
/// Unit quaternion with [`Real`] components.
pub type Quat = UnitQuaternion<Real>;
/// 3D rigid transform (SE(3)) using [`Real`].
pub type Iso3 = Isometry3<Real>;

/// Rebuild a rotation+translation-only transform from a world affine.
///
/// The linear part of `world` may carry scale or shear (e.g. inherited from a
/// scaled parent in the scene graph); the closest proper rotation is recovered
/// and the translation column is kept as-is.
pub fn rigid_from_affine(world: &Mat4) -> Iso3 {
    let linear = world.fixed_view::<3, 3>(0, 0).into_owned();
    let rotation = Rotation3::from_matrix(&linear);
    let translation = Vec3::new(world[(0, 3)], world[(1, 3)], world[(2, 3)]);
    Iso3::from_parts(
        Translation3::from(translation),
        UnitQuaternion::from_rotation_matrix(&rotation),
    )
}

/// Pose of `sensor` expressed in the local frame of `reference`.
///
/// Both inputs are world-space rigid transforms of the same instant.
pub fn relative_pose(reference: &Iso3, sensor: &Iso3) -> Iso3 {
    reference.inverse() * sensor
}

/// Axis-convention conversion applied to every relative pose of an export.
///
/// The authoring scene is +Y-up; COLMAP-style pipelines expect +Y-down. The
/// conversion is one uniform basis change per export, never a per-sensor
/// decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandednessPolicy {
    /// Flip the Y axis: conjugation by `diag(1, -1, 1)`.
    #[default]
    FlipY,
    /// Keep the scene's native axes untouched.
    SceneNative,
}

/// Convert a relative pose under the given handedness policy.
///
/// The Y flip is the proper-rotation basis change `T' = F * T * F` with
/// `F = diag(1, -1, 1)`: quaternion `(w, x, y, z)` maps to `(w, -x, y, -z)`
/// and the translation's Y component is negated.
pub fn convert_pose(policy: HandednessPolicy, pose: &Iso3) -> Iso3 {
    match policy {
        HandednessPolicy::SceneNative => *pose,
        HandednessPolicy::FlipY => {
            let q = pose.rotation.quaternion();
            let rotation = UnitQuaternion::from_quaternion(Quaternion::new(q.w, -q.i, q.j, -q.k));
            let t = pose.translation.vector;
            Iso3::from_parts(Translation3::new(t.x, -t.y, t.z), rotation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_pose() -> Iso3 {
        Iso3::from_parts(
            Translation3::new(0.3, -1.2, 2.5),
            UnitQuaternion::from_euler_angles(0.2, -0.4, 1.1),
        )
    }

    #[test]
    fn rigid_from_affine_strips_scale() {
        let pose = sample_pose();
        let scale = Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 0.5, 3.0));
        let affine = pose.to_homogeneous() * scale;

        let rebuilt = rigid_from_affine(&affine);

        assert_relative_eq!(rebuilt.rotation.angle_to(&pose.rotation), 0.0, epsilon = 1e-9);
        assert_relative_eq!(
            rebuilt.translation.vector,
            pose.translation.vector,
            epsilon = 1e-9
        );
    }

    #[test]
    fn relative_pose_round_trip() {
        let reference = sample_pose();
        let sensor = Iso3::from_parts(
            Translation3::new(-0.1, 0.8, 0.0),
            UnitQuaternion::from_euler_angles(-0.7, 0.1, 0.3),
        );

        let relative = relative_pose(&reference, &sensor);
        let recovered = reference * relative;

        assert_relative_eq!(recovered.rotation.angle_to(&sensor.rotation), 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            recovered.translation.vector,
            sensor.translation.vector,
            epsilon = 1e-12
        );
    }

    #[test]
    fn reference_relative_to_itself_is_identity() {
        let reference = sample_pose();
        let relative = relative_pose(&reference, &reference);
        assert_relative_eq!(relative.rotation.angle(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(relative.translation.vector.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn flip_y_is_an_involution() {
        let pose = sample_pose();
        let twice = convert_pose(
            HandednessPolicy::FlipY,
            &convert_pose(HandednessPolicy::FlipY, &pose),
        );
        assert_relative_eq!(twice.rotation.angle_to(&pose.rotation), 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            twice.translation.vector,
            pose.translation.vector,
            epsilon = 1e-12
        );
    }

    #[test]
    fn flip_y_reverses_rotation_about_z() {
        let pose = Iso3::from_parts(
            Translation3::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_axis_angle(&Vec3::z_axis(), 0.6),
        );
        let flipped = convert_pose(HandednessPolicy::FlipY, &pose);

        let expected = UnitQuaternion::from_axis_angle(&Vec3::z_axis(), -0.6);
        assert_relative_eq!(flipped.rotation.angle_to(&expected), 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            flipped.translation.vector,
            Vec3::new(1.0, -2.0, 3.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn scene_native_is_identity() {
        let pose = sample_pose();
        let converted = convert_pose(HandednessPolicy::SceneNative, &pose);
        assert_eq!(converted, pose);
    }
}
