//! Rig and sensor data model.
//!
//! Rigs are named groups of sensors sharing a rigid mount. They are edited
//! interactively in the host scene; export and render outputs are derived
//! artifacts recomputed from current scene state on each invocation.

mod media;
mod rig;
mod sensor;

pub use media::{split_numeric_suffix, MediaKind, MediaSource};
pub use rig::{FrameRange, Resolution, Rig, RigKind, MIN_RESOLUTION};
pub use sensor::Sensor;
