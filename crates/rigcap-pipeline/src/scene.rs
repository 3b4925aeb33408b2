//! Serializable scene description.
//!
//! A minimal, JSON-loadable stand-in for the host scene graph: rigs plus one
//! pose track per sensor. This is the CLI's input format and the fixture
//! format for tests; pose tracks hold their value between samples, the way a
//! stepped keyframe would.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use nalgebra::{Quaternion, Translation3, UnitQuaternion};
use serde::{Deserialize, Serialize};

use rigcap_core::{Iso3, Mat4, Real, Rig};

use crate::host::{HostError, TransformResolver};

/// One posed keyframe of a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseSample {
    pub frame: i32,
    /// Unit quaternion `[w, x, y, z]` (normalized on use).
    pub rotation: [Real; 4],
    /// Translation `[x, y, z]`.
    pub translation: [Real; 3],
}

impl PoseSample {
    pub fn to_isometry(&self) -> Iso3 {
        let [w, x, y, z] = self.rotation;
        let [tx, ty, tz] = self.translation;
        Iso3::from_parts(
            Translation3::new(tx, ty, tz),
            UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z)),
        )
    }

    pub fn from_isometry(frame: i32, pose: &Iso3) -> Self {
        let q = pose.rotation.quaternion();
        Self {
            frame,
            rotation: [q.w, q.i, q.j, q.k],
            translation: pose.translation.vector.into(),
        }
    }
}

/// Pose samples of one sensor, ascending by frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorTrack {
    pub samples: Vec<PoseSample>,
}

impl SensorTrack {
    /// Track holding one pose forever.
    pub fn fixed(pose: &Iso3) -> Self {
        Self {
            samples: vec![PoseSample::from_isometry(0, pose)],
        }
    }

    /// Sample in effect at `frame`: the last sample at or before it, or the
    /// first sample when `frame` precedes the track.
    pub fn sample_at(&self, frame: i32) -> Option<&PoseSample> {
        self.samples
            .iter()
            .rev()
            .find(|s| s.frame <= frame)
            .or_else(|| self.samples.first())
    }
}

/// Rigs plus per-sensor pose tracks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    pub rigs: Vec<Rig>,
    /// Pose track per sensor name.
    pub tracks: BTreeMap<String, SensorTrack>,
}

impl SceneDescription {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading scene description {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("parsing scene description {}", path.display()))
    }

    /// Give `sensor` one static pose for all frames.
    pub fn set_static_pose(&mut self, sensor: impl Into<String>, pose: Iso3) {
        self.tracks.insert(sensor.into(), SensorTrack::fixed(&pose));
    }
}

impl TransformResolver for SceneDescription {
    fn resolve_world_transform(&self, sensor: &str, frame: i32) -> Result<Mat4, HostError> {
        let track = self
            .tracks
            .get(sensor)
            .ok_or_else(|| HostError::UnknownSensor(sensor.to_string()))?;
        let sample = track
            .sample_at(frame)
            .ok_or_else(|| HostError::MissingPose(sensor.to_string()))?;
        Ok(sample.to_isometry().to_homogeneous())
    }
}
