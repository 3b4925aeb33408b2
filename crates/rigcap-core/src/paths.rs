//! Output image layout and derived-resource naming.
//!
//! The calibration JSON's `image_prefix` entries and the batch renderer's
//! output tree are built from the same helpers, so calibration entries always
//! line up with the image folders downstream tooling walks.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Prefix of environment texture resources owned by rigs.
pub const ENV_RESOURCE_PREFIX: &str = "env::";

/// Configured output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    #[default]
    Png,
    OpenExr,
    Tiff,
}

impl ImageFormat {
    /// File extension used in output paths.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::OpenExr => "exr",
            ImageFormat::Tiff => "tif",
        }
    }

    /// Whether files of this format carry embedded capture metadata.
    pub fn supports_metadata(self) -> bool {
        self == ImageFormat::Jpeg
    }
}

/// Name of the environment texture resource owned by a rig.
pub fn env_resource_name(rig_name: &str) -> String {
    format!("{ENV_RESOURCE_PREFIX}{rig_name}")
}

/// Calibration-entry prefix for a sensor: `<rig>/<sensor>/`.
///
/// Always slash-separated, matching the JSON consumed downstream.
pub fn image_prefix(rig_name: &str, sensor_name: &str) -> String {
    format!("{rig_name}/{sensor_name}/")
}

/// File name of one rendered frame: `<rig>_image<frame:04>.<ext>`.
pub fn frame_image_name(rig_name: &str, frame: i32, format: ImageFormat) -> String {
    format!("{rig_name}_image{frame:04}.{}", format.extension())
}

/// Full output path of one rendered frame:
/// `<out>/<rig>/<sensor>/<rig>_image<frame:04>.<ext>`.
pub fn frame_image_path(
    out_base: &Path,
    rig_name: &str,
    sensor_name: &str,
    frame: i32,
    format: ImageFormat,
) -> PathBuf {
    out_base
        .join(rig_name)
        .join(sensor_name)
        .join(frame_image_name(rig_name, frame, format))
}
