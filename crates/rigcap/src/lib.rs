//! High-level entry crate for the `rigcap` toolkit.
//!
//! Manages multi-camera rigs, exports their reference-sensor-relative poses
//! as a COLMAP-style `rig_config.json`, and batch-renders per-rig image
//! sequences into the matching `<rig>/<sensor>/` directory tree.
//!
//! ## Calibration export
//!
//! ```no_run
//! use rigcap::core::{HandednessPolicy, Rig, RigKind, Sensor};
//! use rigcap::pipeline::{export_rig_poses, SceneDescription};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut scene = SceneDescription::default();
//! let mut rig = Rig::new("EquirectRig", RigKind::Spherical);
//! rig.sensors.push(Sensor::new("Cam_A"));
//! rig.sensors.push(Sensor::new("Cam_B"));
//! scene.set_static_pose("Cam_A", Default::default());
//! scene.set_static_pose("Cam_B", Default::default());
//! scene.rigs.push(rig);
//!
//! let report = export_rig_poses(
//!     &scene,
//!     &scene.rigs,
//!     "export".as_ref(),
//!     1,
//!     HandednessPolicy::FlipY,
//! )?;
//! println!("wrote {}", report.path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Batch render
//!
//! ```no_run
//! use rigcap::pipeline::{CancelToken, RenderBatch};
//! # use rigcap::pipeline::testing::MemoryHost;
//! # fn main() -> anyhow::Result<()> {
//! # let rigs = vec![];
//! # let mut host = MemoryHost::new();
//! let cancel = CancelToken::new();
//! let report = RenderBatch::new(&mut host)
//!     .with_cancel(cancel.clone())
//!     .run(&rigs)?;
//! println!("rendered {} frames", report.frames_rendered);
//! # Ok(())
//! # }
//! ```

/// Data model and pose math.
pub use rigcap_core as core;
/// Export and batch-render pipeline.
pub use rigcap_pipeline as pipeline;

pub use rigcap_core::{
    FrameRange, HandednessPolicy, ImageFormat, MediaKind, MediaSource, Resolution, Rig, RigKind,
    Sensor,
};
pub use rigcap_pipeline::{
    export_rig_poses, BatchError, BatchOutcome, CancelToken, ExportReport, RenderBatch,
    RenderReport, SceneDescription,
};
