//! Integration tests for the calibration export.
//!
//! Checks the on-disk JSON against the documented shape, the determinism
//! guarantee, and the pose round-trip law `T_ref * relative == T_cam`.

use std::fs;

use nalgebra::{Translation3, UnitQuaternion};
use rigcap_core::{
    relative_pose, rigid_from_affine, HandednessPolicy, Iso3, Rig, RigKind, Sensor, Vec3,
};
use rigcap_pipeline::{export_rig_poses, SceneDescription, TransformResolver};

fn rig_pose(tx: f64, yaw: f64) -> Iso3 {
    Iso3::from_parts(
        Translation3::new(tx, 0.2, -1.0),
        UnitQuaternion::from_axis_angle(&Vec3::y_axis(), yaw),
    )
}

fn stereo_scene() -> SceneDescription {
    let mut scene = SceneDescription::default();
    let mut rig = Rig::new("StereoRig", RigKind::Perspective);
    rig.sensors.push(Sensor::new("Left"));
    rig.sensors.push(Sensor::new("Right"));
    scene.set_static_pose("Left", rig_pose(0.0, 0.0));
    scene.set_static_pose("Right", rig_pose(0.24, 0.05));
    scene.rigs.push(rig);
    scene
}

#[test]
fn exporting_twice_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let scene = stereo_scene();

    let first = export_rig_poses(
        &scene,
        &scene.rigs,
        dir.path(),
        1,
        HandednessPolicy::FlipY,
    )
    .unwrap();
    let first_bytes = fs::read(&first.path).unwrap();

    let second = export_rig_poses(
        &scene,
        &scene.rigs,
        dir.path(),
        1,
        HandednessPolicy::FlipY,
    )
    .unwrap();
    let second_bytes = fs::read(&second.path).unwrap();

    assert_eq!(first.rigs_exported, 1);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn written_json_matches_the_documented_shape() {
    let dir = tempfile::tempdir().unwrap();
    let scene = stereo_scene();

    let report = export_rig_poses(
        &scene,
        &scene.rigs,
        dir.path(),
        1,
        HandednessPolicy::FlipY,
    )
    .unwrap();
    assert_eq!(report.path, dir.path().join("rig_config.json"));

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report.path).unwrap())
        .unwrap();
    let cameras = doc[0]["cameras"].as_array().unwrap();
    assert_eq!(cameras.len(), 2);

    let reference = &cameras[0];
    assert_eq!(reference["image_prefix"], "StereoRig/Left/");
    assert_eq!(reference["ref_sensor"], true);
    assert!(reference.get("cam_from_rig_rotation").is_none());
    assert!(reference.get("cam_from_rig_translation").is_none());

    let relative = &cameras[1];
    assert_eq!(relative["image_prefix"], "StereoRig/Right/");
    assert!(relative.get("ref_sensor").is_none());
    assert_eq!(relative["cam_from_rig_rotation"].as_array().unwrap().len(), 4);
    assert_eq!(
        relative["cam_from_rig_translation"].as_array().unwrap().len(),
        3
    );
}

#[test]
fn relative_poses_recover_the_sensor_transform() {
    // Round-trip law, checked in the scene's native axes.
    let scene = stereo_scene();
    let t_ref = rigid_from_affine(&scene.resolve_world_transform("Left", 1).unwrap());
    let t_cam = rigid_from_affine(&scene.resolve_world_transform("Right", 1).unwrap());

    let relative = relative_pose(&t_ref, &t_cam);
    let recovered = t_ref * relative;

    assert!(recovered.rotation.angle_to(&t_cam.rotation) < 1e-12);
    assert!((recovered.translation.vector - t_cam.translation.vector).norm() < 1e-12);
}

#[test]
fn rigs_with_no_included_sensors_produce_no_entry() {
    let dir = tempfile::tempdir().unwrap();
    let mut scene = stereo_scene();

    let mut empty = Rig::new("EmptyRig", RigKind::Spherical);
    let mut hidden = Sensor::new("Hidden");
    hidden.include_in_render = false;
    empty.sensors.push(hidden);
    scene.rigs.push(empty);

    let report = export_rig_poses(
        &scene,
        &scene.rigs,
        dir.path(),
        1,
        HandednessPolicy::FlipY,
    )
    .unwrap();
    assert_eq!(report.rigs_exported, 1);

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report.path).unwrap()).unwrap();
    assert_eq!(doc.as_array().unwrap().len(), 1);
}

#[test]
fn export_creates_nested_output_directories() {
    let dir = tempfile::tempdir().unwrap();
    let scene = stereo_scene();
    let nested = dir.path().join("a").join("b");

    let report =
        export_rig_poses(&scene, &scene.rigs, &nested, 1, HandednessPolicy::FlipY).unwrap();
    assert!(report.path.exists());
}
