//! In-memory host engine for tests and examples.
//!
//! [`MemoryHost`] implements the full host boundary: render settings,
//! environment resources, and a renderer that writes [`PLACEHOLDER_JPEG`] so
//! output-layout and metadata-embedding behavior can be exercised on a real
//! filesystem. Renders can be scripted to fail per (sensor, frame) to drive
//! the best-effort batch semantics.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use rigcap_core::Resolution;

use crate::host::{
    BackgroundPlate, EnvironmentBinding, FrameRenderer, HostError, RenderHost, RenderSettings,
};

/// Bytes written by the in-memory renderer for every frame.
///
/// A complete baseline JPEG (1x1 grey pixel) rather than arbitrary filler,
/// so the metadata writer can embed EXIF into rendered output exactly as it
/// does against a real engine.
#[rustfmt::skip]
pub const PLACEHOLDER_JPEG: &[u8] = &[
    // SOI
    0xFF, 0xD8,
    // DQT: table 0, all ones
    0xFF, 0xDB, 0x00, 0x43, 0x00,
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
    // SOF0: 8-bit, 1x1, one greyscale component
    0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00,
    // DHT: DC table 0, single 1-bit code for symbol 0
    0xFF, 0xC4, 0x00, 0x14, 0x00,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00,
    // DHT: AC table 0, single 1-bit code for EOB
    0xFF, 0xC4, 0x00, 0x14, 0x10,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00,
    // SOS
    0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00,
    // scan: DC diff 0, EOB, padded with ones
    0x3F,
    // EOI
    0xFF, 0xD9,
];

/// One frame produced by the in-memory renderer, with the host state it saw.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub sensor: String,
    pub path: PathBuf,
    pub frame: i32,
    pub resolution: Resolution,
    pub environment: Option<EnvironmentBinding>,
    pub background: Option<BackgroundPlate>,
}

/// In-memory stand-in for the host engine.
#[derive(Debug, Default)]
pub struct MemoryHost {
    settings: RenderSettings,
    env_resources: BTreeSet<String>,
    rendered: Vec<RenderedFrame>,
    fail_renders: BTreeSet<(String, i32)>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_output_path(&mut self, path: impl Into<PathBuf>) {
        self.settings.output_path = Some(path.into());
    }

    pub fn set_image_format(&mut self, format: rigcap_core::ImageFormat) {
        self.settings.image_format = format;
    }

    /// Script the render of `sensor` at `frame` to fail.
    pub fn fail_render_of(&mut self, sensor: &str, frame: i32) {
        self.fail_renders.insert((sensor.to_string(), frame));
    }

    /// Seed an environment resource, e.g. an orphan for reclamation tests.
    pub fn add_environment_resource(&mut self, name: &str) {
        self.env_resources.insert(name.to_string());
    }

    /// Frames produced so far, in render order.
    pub fn rendered(&self) -> &[RenderedFrame] {
        &self.rendered
    }
}

impl RenderHost for MemoryHost {
    fn settings(&self) -> RenderSettings {
        self.settings.clone()
    }

    fn apply_settings(&mut self, settings: RenderSettings) {
        self.settings = settings;
    }

    fn set_active_sensor(&mut self, sensor: Option<&str>) {
        self.settings.active_sensor = sensor.map(str::to_string);
    }

    fn set_resolution(&mut self, resolution: Resolution) {
        self.settings.resolution = resolution;
    }

    fn set_current_frame(&mut self, frame: i32) {
        self.settings.current_frame = frame;
    }

    fn bind_environment(&mut self, binding: EnvironmentBinding) {
        self.env_resources.insert(binding.resource.clone());
        self.settings.environment = Some(binding);
    }

    fn clear_environment(&mut self) {
        self.settings.environment = None;
    }

    fn set_background(&mut self, plate: BackgroundPlate) {
        self.settings.background = Some(plate);
    }

    fn clear_background(&mut self) {
        self.settings.background = None;
    }

    fn environment_resources(&self) -> Vec<String> {
        self.env_resources.iter().cloned().collect()
    }

    fn rename_environment_resource(&mut self, old: &str, new: &str) -> bool {
        if !self.env_resources.remove(old) {
            return false;
        }
        self.env_resources.insert(new.to_string());
        if let Some(env) = &mut self.settings.environment {
            if env.resource == old {
                env.resource = new.to_string();
            }
        }
        true
    }

    fn remove_environment_resource(&mut self, name: &str) {
        self.env_resources.remove(name);
        if let Some(env) = &self.settings.environment {
            if env.resource == name {
                self.settings.environment = None;
            }
        }
    }
}

impl FrameRenderer for MemoryHost {
    fn render_frame(&mut self, sensor: &str, output: &Path) -> Result<(), HostError> {
        let frame = self.settings.current_frame;
        if self.fail_renders.contains(&(sensor.to_string(), frame)) {
            return Err(HostError::RenderFailed {
                sensor: sensor.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        fs::write(output, PLACEHOLDER_JPEG)?;
        self.rendered.push(RenderedFrame {
            sensor: sensor.to_string(),
            path: output.to_path_buf(),
            frame,
            resolution: self.settings.resolution,
            environment: self.settings.environment.clone(),
            background: self.settings.background.clone(),
        });
        Ok(())
    }
}
