//! Environment and background-plate strategy.
//!
//! Applied once per (rig, frame) before the rig's sensors render at that
//! frame. Spherical rigs bind their environment texture; perspective rigs
//! either wire a background plate into the compositor or get an explicit
//! clear, so stale bindings from a previous rig never leak into this rig's
//! frames. Resource-resolution failures degrade to a cleared binding with a
//! warning; they never abort the batch.

use std::path::{Path, PathBuf};

use tracing::warn;

use rigcap_core::{env_resource_name, split_numeric_suffix, MediaKind, MediaSource, Rig, RigKind};

use crate::host::{BackgroundPlate, EnvironmentBinding, RenderHost};

/// Fixed azimuthal offset of the spherical environment mapping, degrees.
///
/// Calibration constant of the capture setup, not user-configurable.
pub const SPHERICAL_AZIMUTH_OFFSET_DEG: f64 = 90.0;

/// Apply the rig's environment strategy for one frame.
pub fn apply_environment<H: RenderHost>(host: &mut H, rig: &Rig, frame: i32) {
    match rig.kind {
        RigKind::Spherical => apply_spherical(host, rig, frame),
        RigKind::Perspective if rig.composite_media => apply_plate(host, rig, frame),
        RigKind::Perspective => {
            host.clear_environment();
            host.clear_background();
        }
    }
}

fn apply_spherical<H: RenderHost>(host: &mut H, rig: &Rig, frame: i32) {
    host.clear_background();
    if rig.media.kind == MediaKind::None {
        warn!(rig = %rig.name, "spherical rig has no media source, clearing environment");
        host.clear_environment();
        return;
    }
    host.bind_environment(EnvironmentBinding {
        resource: env_resource_name(&rig.name),
        media: rig.media.clone(),
        media_frame: map_media_frame(&rig.media, frame),
        azimuth_deg: SPHERICAL_AZIMUTH_OFFSET_DEG,
    });
}

fn apply_plate<H: RenderHost>(host: &mut H, rig: &Rig, frame: i32) {
    host.clear_environment();
    let path = match plate_frame_path(&rig.media, frame) {
        Some(path) if path.exists() => path,
        Some(path) => {
            warn!(
                rig = %rig.name,
                path = %path.display(),
                "background plate frame missing, clearing plate"
            );
            host.clear_background();
            return;
        }
        None => {
            warn!(rig = %rig.name, "perspective rig has no usable media source, clearing plate");
            host.clear_background();
            return;
        }
    };
    host.set_background(BackgroundPlate {
        path,
        frame: map_media_frame(&rig.media, frame),
    });
}

/// Map a scene frame into the media's own frame range.
///
/// Policy is clamp-to-last-frame: stills always show frame 1, sequences and
/// movies clamp into `[1, frames]`. Media of unknown length passes the scene
/// frame through (floored to 1).
pub fn map_media_frame(media: &MediaSource, frame: i32) -> i32 {
    match media.frame_count() {
        Some(frames) if frames > 0 => frame.clamp(1, frames as i32),
        _ => frame.max(1),
    }
}

/// Media file backing the plate at `frame`, before existence checks.
fn plate_frame_path(media: &MediaSource, frame: i32) -> Option<PathBuf> {
    match media.kind {
        MediaKind::None => None,
        MediaKind::Still | MediaKind::Movie { .. } => Some(media.path.clone()),
        MediaKind::Sequence { .. } => {
            sequence_frame_path(&media.path, map_media_frame(media, frame))
        }
    }
}

/// Build the sequence file for `frame` next to the configured first file.
///
/// The padding width is recovered from the first file's own numeric suffix
/// (`<base><N digits>.<ext>`). `None` when the name carries no suffix.
pub fn sequence_frame_path(first: &Path, frame: i32) -> Option<PathBuf> {
    let stem = first.file_stem()?.to_str()?;
    let ext = first.extension()?.to_str()?;
    let (base, pad, _) = split_numeric_suffix(stem)?;
    Some(first.with_file_name(format!("{base}{frame:0pad$}.{ext}")))
}
