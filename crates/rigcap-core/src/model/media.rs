//! Source media backing a rig's environment or background plate.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Kind of media a rig samples for its environment or background.
///
/// `frames: 0` on [`MediaKind::Movie`] means the length could not be probed;
/// frame mapping then passes the scene frame through unclamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MediaKind {
    /// No media configured.
    #[default]
    None,
    /// A single still image.
    Still,
    /// A numbered image sequence (`<base><digits>.<ext>`).
    Sequence {
        /// Number of files in the sequence.
        frames: u32,
    },
    /// A movie clip.
    Movie {
        /// Length in frames, 0 when unknown.
        frames: u32,
    },
}

/// Reference to the media backing a rig.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaSource {
    /// Path to the media file (first file for sequences).
    pub path: PathBuf,
    /// Detected or user-supplied media kind.
    pub kind: MediaKind,
}

impl MediaSource {
    /// Length of the media in frames, if it has one.
    pub fn frame_count(&self) -> Option<u32> {
        match self.kind {
            MediaKind::None => None,
            MediaKind::Still => Some(1),
            MediaKind::Sequence { frames } => Some(frames),
            MediaKind::Movie { frames } if frames > 0 => Some(frames),
            MediaKind::Movie { .. } => None,
        }
    }

    /// Probe `path` and classify it as still, sequence or movie.
    ///
    /// An image file whose stem ends in digits and that has same-named,
    /// same-extension siblings on disk is classified as a sequence; movie
    /// lengths are not probed (`frames: 0`). This is the synchronization
    /// point to call after a rig's media path changed.
    pub fn detect(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: probe_kind(path),
        }
    }
}

fn probe_kind(path: &Path) -> MediaKind {
    let ext = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg" | "png" | "exr" | "tif" | "tiff" | "bmp") => {
            match count_sequence_frames(path) {
                Some(frames) if frames > 1 => MediaKind::Sequence { frames },
                _ => MediaKind::Still,
            }
        }
        Some("mp4" | "mov" | "avi" | "mkv" | "webm") => MediaKind::Movie { frames: 0 },
        _ => MediaKind::None,
    }
}

/// Count on-disk siblings of `first` sharing its base name and extension
/// with a purely numeric suffix.
fn count_sequence_frames(first: &Path) -> Option<u32> {
    let stem = first.file_stem()?.to_str()?;
    let ext = first.extension()?.to_str()?.to_ascii_lowercase();
    let (base, _, _) = split_numeric_suffix(stem)?;
    let dir = first.parent().filter(|p| !p.as_os_str().is_empty())?;

    let mut count = 0u32;
    for entry in fs::read_dir(dir).ok()?.flatten() {
        let name = entry.file_name();
        let candidate = Path::new(&name);
        let same_ext = candidate
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|e| e.eq_ignore_ascii_case(&ext));
        if !same_ext {
            continue;
        }
        let Some(candidate_stem) = candidate.file_stem().and_then(OsStr::to_str) else {
            continue;
        };
        if split_numeric_suffix(candidate_stem).is_some_and(|(b, _, _)| b == base) {
            count += 1;
        }
    }
    Some(count)
}

/// Split a trailing run of ASCII digits off a file stem.
///
/// Returns `(base, padding_width, value)`, e.g. `"shot_0042"` yields
/// `("shot_", 4, 42)`. `None` when the stem has no numeric suffix.
pub fn split_numeric_suffix(stem: &str) -> Option<(&str, usize, u32)> {
    let digits = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    let split = stem.len() - digits;
    let value = stem[split..].parse().ok()?;
    Some((&stem[..split], digits, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn numeric_suffix_recovers_base_and_padding() {
        assert_eq!(split_numeric_suffix("plate_0042"), Some(("plate_", 4, 42)));
        assert_eq!(split_numeric_suffix("bg1"), Some(("bg", 1, 1)));
        assert_eq!(split_numeric_suffix("plain"), None);
        assert_eq!(split_numeric_suffix(""), None);
    }

    #[test]
    fn detect_classifies_sequence_from_siblings() {
        let dir = tempfile::tempdir().unwrap();
        for i in 1..=3 {
            File::create(dir.path().join(format!("plate_{i:04}.png"))).unwrap();
        }
        let media = MediaSource::detect(&dir.path().join("plate_0001.png"));
        assert_eq!(media.kind, MediaKind::Sequence { frames: 3 });
        assert_eq!(media.frame_count(), Some(3));
    }

    #[test]
    fn detect_classifies_lone_image_as_still() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("pano.jpg")).unwrap();
        let media = MediaSource::detect(&dir.path().join("pano.jpg"));
        assert_eq!(media.kind, MediaKind::Still);
    }

    #[test]
    fn detect_classifies_movie_with_unknown_length() {
        let media = MediaSource::detect(Path::new("clips/drive.mp4"));
        assert_eq!(media.kind, MediaKind::Movie { frames: 0 });
        assert_eq!(media.frame_count(), None);
    }

    #[test]
    fn unknown_extension_yields_no_media() {
        let media = MediaSource::detect(Path::new("notes.txt"));
        assert_eq!(media.kind, MediaKind::None);
    }
}
