//! Single camera within a rig.

use serde::{Deserialize, Serialize};

use crate::math::Real;

/// One camera of a rig.
///
/// Sensors are owned by exactly one [`Rig`](super::Rig) and identified by a
/// name unique within it. The world transform of a sensor is not stored here;
/// it is resolved through the host scene graph at a given frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    /// Name, unique within the owning rig.
    pub name: String,
    /// Excluded sensors are skipped entirely by export and render.
    pub include_in_render: bool,
    /// Physical focal length in millimeters.
    pub focal_length_mm: Real,
    /// Sensor width in millimeters.
    pub sensor_width_mm: Real,
}

impl Sensor {
    /// Sensor with the host engine's default optics (50mm lens, 36mm sensor).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            include_in_render: true,
            focal_length_mm: 50.0,
            sensor_width_mm: 36.0,
        }
    }

    /// 35mm-equivalent focal length, rounded to the nearest millimeter.
    pub fn focal_35mm_equiv(&self) -> u32 {
        (self.focal_length_mm / self.sensor_width_mm * 36.0).round() as u32
    }
}
