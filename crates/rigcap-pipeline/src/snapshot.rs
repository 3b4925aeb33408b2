//! Render state snapshot/restore.
//!
//! The orchestrator pairs [`RenderStateSnapshot::capture`] at entry with
//! [`RenderStateSnapshot::restore`] on every exit path — completion,
//! cancellation and failure — so batch rendering never leaves the scene in a
//! mutated configuration.

use crate::host::{RenderHost, RenderSettings};

/// Captured copy of the global render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStateSnapshot {
    settings: RenderSettings,
}

impl RenderStateSnapshot {
    /// Capture the host's current configuration.
    pub fn capture<H: RenderHost + ?Sized>(host: &H) -> Self {
        Self {
            settings: host.settings(),
        }
    }

    /// Return every captured field to its pre-run value.
    pub fn restore<H: RenderHost + ?Sized>(&self, host: &mut H) {
        host.apply_settings(self.settings.clone());
    }

    /// The captured configuration.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }
}
