//! Capture metadata embedding.
//!
//! Rigs that require it get capture parameters (focal length, 35mm
//! equivalent, pixel dimensions) embedded into their rendered images so the
//! downstream SfM solve can seed intrinsics. Only JPEG output carries
//! embedded metadata; embedding failures never invalidate the rendered file.

use std::path::Path;

use anyhow::{Context, Result};
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use little_exif::rational::uR64;

use rigcap_core::{ImageFormat, Resolution, Rig, Sensor};

/// `Model` tag embedded into output images.
pub const DEVICE_MODEL: &str = "rigcap virtual rig";
/// `Software` tag embedded into output images.
pub const SOFTWARE: &str = concat!("rigcap ", env!("CARGO_PKG_VERSION"));

/// Whether a rendered frame of `rig` gets metadata embedded.
///
/// True only when the rig asks for it and the output format supports
/// embedded metadata.
pub fn requires_metadata(rig: &Rig, format: ImageFormat) -> bool {
    rig.write_metadata && format.supports_metadata()
}

/// Embed capture parameters into the image at `output`.
///
/// Focal length is written as a rational in centi-millimeters over 100; the
/// 35mm equivalent is `round(focal / sensor_width * 36)`.
pub fn write_capture_metadata(
    output: &Path,
    sensor: &Sensor,
    resolution: Resolution,
) -> Result<()> {
    let mut metadata = Metadata::new();
    metadata.set_tag(ExifTag::Model(DEVICE_MODEL.to_string()));
    metadata.set_tag(ExifTag::Software(SOFTWARE.to_string()));

    let focal_centi = (sensor.focal_length_mm * 100.0).round() as u32;
    metadata.set_tag(ExifTag::FocalLength(vec![uR64 {
        nominator: focal_centi,
        denominator: 100,
    }]));
    metadata.set_tag(ExifTag::FocalLengthIn35mmFormat(vec![
        sensor.focal_35mm_equiv() as u16,
    ]));

    let resolution = resolution.clamped();
    metadata.set_tag(ExifTag::ExifImageWidth(vec![resolution.width]));
    metadata.set_tag(ExifTag::ExifImageHeight(vec![resolution.height]));

    metadata
        .write_to_file(output)
        .with_context(|| format!("embedding capture metadata into {}", output.display()))?;
    Ok(())
}
