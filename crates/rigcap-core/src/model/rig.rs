//! Rig: a named group of sensors on a rigid mount.

use serde::{Deserialize, Serialize};

use super::{MediaSource, Sensor};

/// Minimum output resolution along either axis.
pub const MIN_RESOLUTION: u32 = 64;

/// Rig type, driving environment handling and metadata policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RigKind {
    /// 360° rig backed by a spherical environment texture.
    Spherical,
    /// Flat-plate rig, optionally compositing its media into the output.
    Perspective,
}

/// Inclusive frame range with a positive step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    /// First frame.
    pub start: i32,
    /// Last frame (inclusive).
    pub end: i32,
    /// Step between frames; values below 1 are treated as 1.
    pub step: i32,
}

impl FrameRange {
    pub fn new(start: i32, end: i32, step: i32) -> Self {
        Self {
            start,
            end,
            step: step.max(1),
        }
    }

    /// Number of frames visited: `(end - start) / step + 1`, 0 when empty.
    pub fn frame_count(&self) -> usize {
        if self.end < self.start {
            return 0;
        }
        ((self.end - self.start) / self.step.max(1)) as usize + 1
    }

    /// Frames in ascending order: `start, start+step, ... <= end`.
    pub fn frames(&self) -> impl Iterator<Item = i32> {
        (self.start..=self.end).step_by(self.step.max(1) as usize)
    }
}

impl Default for FrameRange {
    fn default() -> Self {
        Self::new(1, 250, 1)
    }
}

/// Target output resolution, clamped to [`MIN_RESOLUTION`] per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(MIN_RESOLUTION),
            height: height.max(MIN_RESOLUTION),
        }
    }

    /// Copy with both axes clamped to the minimum.
    ///
    /// Deserialized values bypass [`Resolution::new`], so consumers clamp at
    /// the point of use.
    pub fn clamped(self) -> Self {
        Self::new(self.width, self.height)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

/// A named group of sensors treated as a rigid multi-camera unit.
///
/// Sensor order is significant: the first included sensor is the reference
/// sensor for calibration export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rig {
    /// Name, unique across the project. Derived resources (environment
    /// texture, output folders) are named after it.
    pub name: String,
    pub kind: RigKind,
    pub sensors: Vec<Sensor>,
    pub frames: FrameRange,
    pub resolution: Resolution,
    /// Media sampled for the environment (spherical) or background plate
    /// (perspective).
    pub media: MediaSource,
    /// Include this rig in the calibration JSON.
    pub include_in_export: bool,
    /// Include this rig in batch renders.
    pub enabled_for_render: bool,
    /// Embed capture metadata into rendered images (where the format
    /// supports it).
    pub write_metadata: bool,
    /// Perspective only: composite the media directly behind the render.
    pub composite_media: bool,
}

impl Rig {
    /// New rig with kind-dependent defaults; spherical rigs embed capture
    /// metadata by default, perspective rigs do not.
    pub fn new(name: impl Into<String>, kind: RigKind) -> Self {
        Self {
            name: name.into(),
            kind,
            sensors: Vec::new(),
            frames: FrameRange::default(),
            resolution: Resolution::default(),
            media: MediaSource::default(),
            include_in_export: true,
            enabled_for_render: true,
            write_metadata: kind == RigKind::Spherical,
            composite_media: false,
        }
    }

    /// Sensors participating in export and render, in rig order.
    pub fn included_sensors(&self) -> impl Iterator<Item = &Sensor> {
        self.sensors.iter().filter(|s| s.include_in_render)
    }

    /// Number of included sensors.
    pub fn included_count(&self) -> usize {
        self.included_sensors().count()
    }

    /// Reference sensor: the first included sensor in rig order.
    pub fn reference_sensor(&self) -> Option<&Sensor> {
        self.included_sensors().next()
    }

    /// Units of work a batch render queues for this rig:
    /// `included sensors × frames`, 0 when the rig is disabled.
    pub fn queued_frames(&self) -> usize {
        if !self.enabled_for_render {
            return 0;
        }
        self.included_count() * self.frames.frame_count()
    }
}
