//! Pose export and batch rendering for multi-camera rigs.
//!
//! The host 3D engine is reached through three trait seams ([`host`]):
//! [`TransformResolver`] for evaluated world transforms, [`FrameRenderer`]
//! for pixel production, and [`RenderHost`] for the global render,
//! environment and compositor state the batch mutates.
//!
//! Two independent operations sit on top:
//!
//! - [`export::export_rig_poses`] writes the COLMAP-style `rig_config.json`
//!   with every sensor's pose relative to its rig's reference sensor.
//! - [`orchestrate::RenderBatch`] renders rigs × frames × sensors into the
//!   matching `<rig>/<sensor>/` image tree, switching environment strategy
//!   per rig type and restoring all captured host state on every exit path.
//!
//! ```no_run
//! use rigcap_core::{Rig, RigKind, Sensor, HandednessPolicy};
//! use rigcap_pipeline::{export_rig_poses, SceneDescription};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut scene = SceneDescription::default();
//! let mut rig = Rig::new("EquirectRig", RigKind::Spherical);
//! rig.sensors.push(Sensor::new("Cam_A"));
//! scene.set_static_pose("Cam_A", Default::default());
//! scene.rigs.push(rig);
//!
//! let report = export_rig_poses(
//!     &scene,
//!     &scene.rigs,
//!     "out".as_ref(),
//!     1,
//!     HandednessPolicy::FlipY,
//! )?;
//! println!("exported {} rigs to {}", report.rigs_exported, report.path.display());
//! # Ok(())
//! # }
//! ```

/// Environment and background-plate strategy per rig type.
pub mod environment;
/// Calibration JSON export.
pub mod export;
/// Trait boundary to the host 3D engine.
pub mod host;
/// Capture metadata embedding.
pub mod metadata;
/// Batch render state machine.
pub mod orchestrate;
/// Synchronization of rig-derived resources.
pub mod resources;
/// Serializable scene description (CLI input, test fixtures).
pub mod scene;
/// Render state snapshot/restore.
pub mod snapshot;
/// In-memory host for tests and examples.
pub mod testing;

pub use environment::{apply_environment, map_media_frame, sequence_frame_path};
pub use export::{build_rig_entries, export_rig_poses, CameraEntry, ExportReport, RigEntry};
pub use host::{
    BackgroundPlate, EnvironmentBinding, FrameRenderer, HostError, RenderHost, RenderSettings,
    TransformResolver,
};
pub use metadata::{requires_metadata, write_capture_metadata};
pub use orchestrate::{
    BatchError, BatchOutcome, CancelToken, NullProgress, ProgressSink, RenderBatch, RenderPhase,
    RenderReport,
};
pub use resources::{on_media_path_changed, on_rig_renamed, reclaim_orphan_environments};
pub use scene::{PoseSample, SceneDescription, SensorTrack};
pub use snapshot::RenderStateSnapshot;
