//! Core data model and pose math for the `rigcap` toolkit.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, `Iso3`, ...),
//! - rigid-transform reconstruction and reference-relative pose math,
//! - the rig/sensor data model (rigs, frame ranges, media sources),
//! - deterministic naming of derived resources and the output image layout.
//!
//! Pose convention:
//! `cam_from_rig = inverse(T_reference) * T_sensor`, optionally converted by a
//! single uniform handedness policy ([`HandednessPolicy`]) before export.

/// Linear algebra type aliases and pose math.
pub mod math;
/// Rig and sensor data model.
pub mod model;
/// Output layout and derived-resource naming.
pub mod paths;

pub use math::*;
pub use model::*;
pub use paths::*;
