//! Calibration JSON export.
//!
//! Writes the COLMAP-style rig configuration: for every eligible rig, the
//! reference sensor (first included, rig order) is a marker entry and every
//! other included sensor carries `cam_from_rig` rotation/translation in the
//! reference sensor's local frame. Entry prefixes use the same layout helpers
//! as the batch renderer, so calibration rows and image folders line up.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use rigcap_core::{
    convert_pose, image_prefix, relative_pose, rigid_from_affine, HandednessPolicy, Iso3, Real,
    Rig,
};

use crate::host::TransformResolver;

/// File name of the calibration export.
pub const RIG_CONFIG_FILE: &str = "rig_config.json";

/// One rig in the calibration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigEntry {
    pub cameras: Vec<CameraEntry>,
}

/// One sensor in the calibration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CameraEntry {
    /// The rig's reference sensor: marker only, no relative transform.
    Reference {
        image_prefix: String,
        ref_sensor: bool,
    },
    /// Any other included sensor, posed relative to the reference sensor.
    Relative {
        image_prefix: String,
        /// Unit quaternion `[w, x, y, z]`.
        cam_from_rig_rotation: [Real; 4],
        /// Translation `[x, y, z]`.
        cam_from_rig_translation: [Real; 3],
    },
}

/// Outcome of a calibration export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub rigs_exported: usize,
    /// Path of the written JSON file.
    pub path: PathBuf,
}

/// Export eligible rigs as `rig_config.json` under `out_dir`.
///
/// Transforms are resolved at `frame` and converted by one uniform
/// handedness `policy`. The file is written atomically (temp file + rename)
/// after the target directory is created; when no eligible rig exists,
/// nothing is written.
pub fn export_rig_poses<R: TransformResolver>(
    resolver: &R,
    rigs: &[Rig],
    out_dir: &Path,
    frame: i32,
    policy: HandednessPolicy,
) -> Result<ExportReport> {
    let entries = build_rig_entries(resolver, rigs, frame, policy)?;
    ensure!(
        !entries.is_empty(),
        "no rigs eligible for export (included in export, with at least one included sensor)"
    );

    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating export directory {}", out_dir.display()))?;
    let json = serde_json::to_string_pretty(&entries)?;

    let path = out_dir.join(RIG_CONFIG_FILE);
    let staging = out_dir.join(".rig_config.json.tmp");
    fs::write(&staging, json).with_context(|| format!("writing {}", staging.display()))?;
    fs::rename(&staging, &path).with_context(|| format!("renaming into {}", path.display()))?;

    info!(rigs = entries.len(), path = %path.display(), "exported rig calibration");
    Ok(ExportReport {
        rigs_exported: entries.len(),
        path,
    })
}

/// Build the calibration entries without touching the filesystem.
///
/// Rigs excluded from export or with zero included sensors contribute no
/// entry. Resolver failures abort the export; calibration with silently
/// missing sensors would be worse than no file.
pub fn build_rig_entries<R: TransformResolver>(
    resolver: &R,
    rigs: &[Rig],
    frame: i32,
    policy: HandednessPolicy,
) -> Result<Vec<RigEntry>> {
    let mut entries = Vec::new();
    for rig in rigs.iter().filter(|r| r.include_in_export) {
        let Some(reference) = rig.reference_sensor() else {
            continue;
        };
        let ref_world = resolve_rigid(resolver, &reference.name, frame)?;

        let mut cameras = Vec::new();
        for sensor in rig.included_sensors() {
            let prefix = image_prefix(&rig.name, &sensor.name);
            if sensor.name == reference.name {
                cameras.push(CameraEntry::Reference {
                    image_prefix: prefix,
                    ref_sensor: true,
                });
                continue;
            }
            let world = resolve_rigid(resolver, &sensor.name, frame)?;
            let relative = convert_pose(policy, &relative_pose(&ref_world, &world));
            let q = relative.rotation.quaternion();
            cameras.push(CameraEntry::Relative {
                image_prefix: prefix,
                cam_from_rig_rotation: [q.w, q.i, q.j, q.k],
                cam_from_rig_translation: relative.translation.vector.into(),
            });
        }
        entries.push(RigEntry { cameras });
    }
    Ok(entries)
}

fn resolve_rigid<R: TransformResolver>(resolver: &R, sensor: &str, frame: i32) -> Result<Iso3> {
    let world = resolver
        .resolve_world_transform(sensor, frame)
        .with_context(|| format!("resolving world transform of sensor '{sensor}'"))?;
    Ok(rigid_from_affine(&world))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneDescription;
    use nalgebra::{Translation3, UnitQuaternion};
    use rigcap_core::{RigKind, Sensor, Vec3};

    fn two_sensor_scene() -> SceneDescription {
        let mut scene = SceneDescription::default();
        let mut rig = Rig::new("StereoRig", RigKind::Perspective);
        rig.sensors.push(Sensor::new("Left"));
        rig.sensors.push(Sensor::new("Right"));
        scene.set_static_pose("Left", Iso3::identity());
        scene.set_static_pose(
            "Right",
            Iso3::from_parts(
                Translation3::new(0.2, 0.0, 0.0),
                UnitQuaternion::from_axis_angle(&Vec3::y_axis(), 0.1),
            ),
        );
        scene.rigs.push(rig);
        scene
    }

    #[test]
    fn reference_entry_carries_only_marker() {
        let scene = two_sensor_scene();
        let entries =
            build_rig_entries(&scene, &scene.rigs, 1, HandednessPolicy::SceneNative).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].cameras.len(), 2);

        match &entries[0].cameras[0] {
            CameraEntry::Reference {
                image_prefix,
                ref_sensor,
            } => {
                assert_eq!(image_prefix, "StereoRig/Left/");
                assert!(ref_sensor);
            }
            other => panic!("reference sensor exported as {other:?}"),
        }
        assert!(matches!(
            entries[0].cameras[1],
            CameraEntry::Relative { .. }
        ));
    }

    #[test]
    fn identity_rig_exports_identity_relative_pose() {
        let mut scene = SceneDescription::default();
        let mut rig = Rig::new("Rig", RigKind::Spherical);
        rig.sensors.push(Sensor::new("A"));
        rig.sensors.push(Sensor::new("B"));
        let pose = Iso3::from_parts(
            Translation3::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_axis_angle(&Vec3::x_axis(), 0.5),
        );
        scene.set_static_pose("A", pose);
        scene.set_static_pose("B", pose);
        scene.rigs.push(rig);

        let entries = build_rig_entries(&scene, &scene.rigs, 1, HandednessPolicy::FlipY).unwrap();
        let CameraEntry::Relative {
            cam_from_rig_rotation: q,
            cam_from_rig_translation: t,
            ..
        } = &entries[0].cameras[1]
        else {
            panic!("expected relative entry");
        };
        // Identity is identity under either handedness policy.
        assert!((q[0].abs() - 1.0).abs() < 1e-12);
        assert!(q[1].abs() + q[2].abs() + q[3].abs() < 1e-12);
        assert!(t.iter().all(|c| c.abs() < 1e-12));
    }

    #[test]
    fn excluded_rigs_and_sensorless_rigs_are_omitted() {
        let mut scene = two_sensor_scene();

        let mut skipped = Rig::new("Skipped", RigKind::Perspective);
        skipped.sensors.push(Sensor::new("S"));
        skipped.include_in_export = false;
        scene.set_static_pose("S", Iso3::identity());
        scene.rigs.push(skipped);

        let mut empty = Rig::new("Empty", RigKind::Spherical);
        let mut hidden = Sensor::new("Hidden");
        hidden.include_in_render = false;
        empty.sensors.push(hidden);
        scene.rigs.push(empty);

        let entries =
            build_rig_entries(&scene, &scene.rigs, 1, HandednessPolicy::FlipY).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].cameras.len(), 2);
    }

    #[test]
    fn untagged_entries_round_trip_through_json() {
        let scene = two_sensor_scene();
        let entries = build_rig_entries(&scene, &scene.rigs, 1, HandednessPolicy::FlipY).unwrap();

        let json = serde_json::to_string(&entries).unwrap();
        assert!(json.contains("\"ref_sensor\":true"));
        assert!(json.contains("cam_from_rig_rotation"));

        let back: Vec<RigEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entries);
    }

    #[test]
    fn export_without_eligible_rigs_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let scene = SceneDescription::default();
        let out = dir.path().join("export");

        let result = export_rig_poses(&scene, &scene.rigs, &out, 1, HandednessPolicy::FlipY);
        assert!(result.is_err());
        assert!(!out.join(RIG_CONFIG_FILE).exists());
    }
}
