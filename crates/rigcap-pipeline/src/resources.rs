//! Synchronization of rig-derived resources.
//!
//! Derived resources (the environment texture, the media classification) are
//! named after the rig. Rather than implicit observer callbacks, the caller
//! invokes these functions after mutating a rig, keeping causality explicit
//! and testable.

use std::collections::BTreeSet;

use tracing::debug;

use rigcap_core::{env_resource_name, MediaSource, Rig, ENV_RESOURCE_PREFIX};

use crate::host::RenderHost;

/// Call after renaming a rig: carry its environment resource over to the new
/// name instead of leaking one resource per rename.
pub fn on_rig_renamed<H: RenderHost>(host: &mut H, rig: &Rig, old_name: &str) {
    if old_name == rig.name {
        return;
    }
    let old = env_resource_name(old_name);
    let new = env_resource_name(&rig.name);
    if host.rename_environment_resource(&old, &new) {
        debug!(%old, %new, "renamed rig environment resource");
    }
}

/// Call after changing a rig's media path: re-probe kind and sequence length.
pub fn on_media_path_changed(rig: &mut Rig) {
    rig.media = MediaSource::detect(&rig.media.path);
}

/// Sweep environment resources not owned by any live rig name.
///
/// Returns the number of resources reclaimed. Resources outside the `env::`
/// namespace are never touched.
pub fn reclaim_orphan_environments<H: RenderHost>(host: &mut H, rigs: &[Rig]) -> usize {
    let owned: BTreeSet<String> = rigs.iter().map(|r| env_resource_name(&r.name)).collect();
    let mut reclaimed = 0;
    for resource in host.environment_resources() {
        if resource.starts_with(ENV_RESOURCE_PREFIX) && !owned.contains(&resource) {
            debug!(%resource, "reclaiming orphaned environment resource");
            host.remove_environment_resource(&resource);
            reclaimed += 1;
        }
    }
    reclaimed
}
