//! Trait boundary to the host 3D engine.
//!
//! Everything the pipeline needs from the engine — evaluated transforms,
//! frame rendering, and the global render/environment/compositor state —
//! goes through these traits. The batch orchestrator holds exclusive logical
//! ownership of the [`RenderHost`] for the duration of a run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rigcap_core::{ImageFormat, Mat4, MediaSource, Resolution};

/// Errors surfaced by host-engine collaborators.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("unknown sensor '{0}'")]
    UnknownSensor(String),
    #[error("no pose available for sensor '{0}'")]
    MissingPose(String),
    #[error("media unavailable: {0}")]
    MediaUnavailable(String),
    #[error("render failed for sensor '{sensor}': {reason}")]
    RenderFailed { sensor: String, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A spherical environment texture bound as the scene backdrop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentBinding {
    /// Name of the environment resource (`env::<rig>`).
    pub resource: String,
    /// Media sampled by the environment texture.
    pub media: MediaSource,
    /// Media frame to sample, already mapped into the media's own range.
    pub media_frame: i32,
    /// Azimuthal rotation of the environment mapping, degrees.
    pub azimuth_deg: f64,
}

/// A background plate wired into the compositing graph's final output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundPlate {
    /// Resolved media file for this frame (exact sequence file for
    /// image sequences).
    pub path: PathBuf,
    /// Media frame the plate shows.
    pub frame: i32,
}

/// Global render configuration touched by the batch pipeline.
///
/// This is exactly the field set the snapshot captures; nothing else on the
/// host is mutated during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub active_sensor: Option<String>,
    /// Base directory rendered frames are written under.
    pub output_path: Option<PathBuf>,
    pub frame_start: i32,
    pub frame_end: i32,
    pub frame_step: i32,
    pub current_frame: i32,
    pub resolution: Resolution,
    pub image_format: ImageFormat,
    /// Bound spherical environment, if any.
    pub environment: Option<EnvironmentBinding>,
    /// Background plate wired into the final output, if any.
    pub background: Option<BackgroundPlate>,
    /// Viewport camera-follow toggle.
    pub follow_active_camera: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            active_sensor: None,
            output_path: None,
            frame_start: 1,
            frame_end: 250,
            frame_step: 1,
            current_frame: 1,
            resolution: Resolution::default(),
            image_format: ImageFormat::default(),
            environment: None,
            background: None,
            follow_active_camera: false,
        }
    }
}

/// Evaluated world transforms from the host scene graph.
///
/// Implementations must reflect parent and constraint evaluation at the
/// requested frame, not just the authored local transform. The returned
/// affine may carry scale/shear; callers strip it.
pub trait TransformResolver {
    fn resolve_world_transform(&self, sensor: &str, frame: i32) -> Result<Mat4, HostError>;
}

/// Synchronous frame production.
///
/// One call writes exactly one image file at `output` for the currently
/// configured scene state.
pub trait FrameRenderer {
    fn render_frame(&mut self, sensor: &str, output: &Path) -> Result<(), HostError>;
}

/// Global render, environment and compositor state of the host engine.
pub trait RenderHost {
    /// Current value of every field the pipeline touches.
    fn settings(&self) -> RenderSettings;
    /// Overwrite every captured field (snapshot restore).
    fn apply_settings(&mut self, settings: RenderSettings);

    fn set_active_sensor(&mut self, sensor: Option<&str>);
    fn set_resolution(&mut self, resolution: Resolution);
    fn set_current_frame(&mut self, frame: i32);

    /// Bind a spherical environment, creating the named resource if needed.
    fn bind_environment(&mut self, binding: EnvironmentBinding);
    fn clear_environment(&mut self);
    fn set_background(&mut self, plate: BackgroundPlate);
    fn clear_background(&mut self);

    /// Names of all environment resources currently alive on the host.
    fn environment_resources(&self) -> Vec<String>;
    /// Rename a resource; returns false when `old` does not exist.
    fn rename_environment_resource(&mut self, old: &str, new: &str) -> bool;
    fn remove_environment_resource(&mut self, name: &str);
}
