use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use rigcap_core::HandednessPolicy;
use rigcap_pipeline::{export_rig_poses, SceneDescription};

/// Rig calibration export and render planning.
#[derive(Debug, Parser)]
#[command(author, version, about = "Multi-camera rig calibration export and render planning")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Export the COLMAP rig calibration JSON for a scene description.
    Export {
        /// Path to a JSON scene description (rigs + pose tracks).
        #[arg(long)]
        scene: PathBuf,

        /// Directory to write rig_config.json into.
        #[arg(long)]
        out: PathBuf,

        /// Frame at which sensor transforms are resolved.
        #[arg(long, default_value_t = 1)]
        frame: i32,

        /// Keep the scene's native axes instead of the COLMAP Y flip.
        #[arg(long)]
        native_axes: bool,
    },
    /// Show the work a batch render would queue, per rig.
    Plan {
        /// Path to a JSON scene description.
        #[arg(long)]
        scene: PathBuf,
    },
}

fn main() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    match Args::parse().command {
        Command::Export {
            scene,
            out,
            frame,
            native_axes,
        } => {
            let policy = if native_axes {
                HandednessPolicy::SceneNative
            } else {
                HandednessPolicy::FlipY
            };
            let summary = run_export(&scene, &out, frame, policy)?;
            println!("{summary}");
        }
        Command::Plan { scene } => {
            print!("{}", run_plan(&scene)?);
        }
    }
    Ok(())
}

fn run_export(
    scene_path: &Path,
    out: &Path,
    frame: i32,
    policy: HandednessPolicy,
) -> Result<String> {
    let scene = SceneDescription::from_json_file(scene_path)?;
    let report = export_rig_poses(&scene, &scene.rigs, out, frame, policy)?;
    Ok(format!(
        "exported {} rigs to {}",
        report.rigs_exported,
        report.path.display()
    ))
}

fn run_plan(scene_path: &Path) -> Result<String> {
    let scene = SceneDescription::from_json_file(scene_path)?;

    let mut out = String::new();
    let mut total = 0usize;
    for rig in &scene.rigs {
        let queued = rig.queued_frames();
        total += queued;
        out.push_str(&format!(
            "{:<24} {:?} sensors={} frames={} queued={}{}\n",
            rig.name,
            rig.kind,
            rig.included_count(),
            rig.frames.frame_count(),
            queued,
            if rig.enabled_for_render {
                ""
            } else {
                " (render disabled)"
            },
        ));
    }
    out.push_str(&format!("total queued frames: {total}\n"));
    if total == 0 {
        out.push_str("nothing to render\n");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Translation3;
    use rigcap_core::{Iso3, Rig, RigKind, Sensor};
    use std::fs;

    fn sample_scene() -> SceneDescription {
        let mut scene = SceneDescription::default();
        let mut rig = Rig::new("StereoRig", RigKind::Perspective);
        rig.sensors.push(Sensor::new("Left"));
        rig.sensors.push(Sensor::new("Right"));
        rig.frames = rigcap_core::FrameRange::new(1, 10, 1);
        scene.set_static_pose("Left", Iso3::identity());
        scene.set_static_pose(
            "Right",
            Iso3::from_parts(Translation3::new(0.2, 0.0, 0.0), Default::default()),
        );
        scene.rigs.push(rig);
        scene
    }

    fn write_scene(scene: &SceneDescription, path: &Path) {
        fs::write(path, serde_json::to_string_pretty(scene).unwrap()).unwrap();
    }

    #[test]
    fn export_writes_rig_config_from_scene_file() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = dir.path().join("scene.json");
        write_scene(&sample_scene(), &scene_path);

        let out = dir.path().join("export");
        let summary = run_export(&scene_path, &out, 1, HandednessPolicy::FlipY).unwrap();

        assert!(summary.starts_with("exported 1 rigs"));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("rig_config.json")).unwrap())
                .unwrap();
        assert_eq!(json[0]["cameras"][0]["ref_sensor"], true);
    }

    #[test]
    fn plan_reports_queued_work_per_rig() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = dir.path().join("scene.json");
        write_scene(&sample_scene(), &scene_path);

        let plan = run_plan(&scene_path).unwrap();
        assert!(plan.contains("StereoRig"));
        assert!(plan.contains("queued=20"));
        assert!(plan.contains("total queued frames: 20"));
    }

    #[test]
    fn plan_flags_an_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = dir.path().join("scene.json");
        let mut scene = sample_scene();
        scene.rigs[0].enabled_for_render = false;
        write_scene(&scene, &scene_path);

        let plan = run_plan(&scene_path).unwrap();
        assert!(plan.contains("nothing to render"));
        assert!(plan.contains("(render disabled)"));
    }
}
