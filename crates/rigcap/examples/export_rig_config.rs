//! Build a synthetic two-rig scene and export its calibration JSON.
//!
//! Writes `rig_config.json` into `./rig_export` and prints it.

use anyhow::Result;
use nalgebra::{Translation3, UnitQuaternion};
use rigcap::core::{HandednessPolicy, Iso3, Rig, RigKind, Sensor, Vec3};
use rigcap::pipeline::{export_rig_poses, SceneDescription};

fn pose(tx: f64, yaw_deg: f64) -> Iso3 {
    Iso3::from_parts(
        Translation3::new(tx, 0.0, 0.0),
        UnitQuaternion::from_axis_angle(&Vec3::y_axis(), yaw_deg.to_radians()),
    )
}

fn main() -> Result<()> {
    let mut scene = SceneDescription::default();

    // A 360° rig: two back-to-back fisheyes 6cm apart.
    let mut equirect = Rig::new("EquirectRig", RigKind::Spherical);
    equirect.sensors.push(Sensor::new("Cam_Front"));
    equirect.sensors.push(Sensor::new("Cam_Back"));
    scene.set_static_pose("Cam_Front", pose(0.0, 0.0));
    scene.set_static_pose("Cam_Back", pose(0.06, 180.0));
    scene.rigs.push(equirect);

    // A stereo pair with a 24cm baseline.
    let mut stereo = Rig::new("StereoRig", RigKind::Perspective);
    stereo.sensors.push(Sensor::new("Cam_Left"));
    stereo.sensors.push(Sensor::new("Cam_Right"));
    scene.set_static_pose("Cam_Left", pose(-0.12, 0.0));
    scene.set_static_pose("Cam_Right", pose(0.12, 0.0));
    scene.rigs.push(stereo);

    let report = export_rig_poses(
        &scene,
        &scene.rigs,
        "rig_export".as_ref(),
        1,
        HandednessPolicy::FlipY,
    )?;

    println!(
        "exported {} rigs to {}\n",
        report.rigs_exported,
        report.path.display()
    );
    println!("{}", std::fs::read_to_string(&report.path)?);
    Ok(())
}
