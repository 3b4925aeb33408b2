//! Batch render state machine.
//!
//! Drives rigs × frames × sensors through the host renderer:
//! `Idle → Precomputing → Rendering(rig, frame, sensor) → Restoring →
//! Done | Cancelled | Failed`. Configuration errors abort before any host
//! state is touched; per-unit render failures are logged and counted but the
//! batch continues; the captured snapshot is restored on every exit path.

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use rigcap_core::{frame_image_path, Rig};

use crate::environment::apply_environment;
use crate::host::{FrameRenderer, RenderHost};
use crate::metadata::{requires_metadata, write_capture_metadata};
use crate::snapshot::RenderStateSnapshot;

/// Configuration errors detected before any host mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("no render output path configured")]
    NoOutputPath,
    #[error("nothing to render: no enabled rig has included sensors and a non-empty frame range")]
    NothingToRender,
}

/// Cooperative cancellation flag, polled between units of work.
///
/// Clones share one flag, so a UI thread may hold a clone and cancel a
/// running batch; the orchestrator itself is single-threaded and only stops
/// issuing new render calls, then restores.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Receiver for batch progress, one update per unit of work.
///
/// Stands in for the host's progress UI; all methods default to no-ops.
pub trait ProgressSink {
    fn begin(&mut self, _total: usize) {}
    fn update(&mut self, _done: usize, _total: usize) {}
    fn end(&mut self) {}
}

/// Progress sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {}

/// Where the batch state machine currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderPhase {
    Idle,
    Precomputing,
    Rendering {
        rig: String,
        frame: i32,
        sensor: String,
    },
    Restoring,
    Done,
    Cancelled,
    Failed,
}

/// How a batch run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchOutcome {
    /// Every queued unit was attempted.
    Completed,
    /// Cancellation observed; remaining units skipped, state restored.
    Cancelled,
}

/// Result of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderReport {
    /// Frames successfully produced by the renderer.
    pub frames_rendered: usize,
    /// Per-unit render failures (logged and skipped).
    pub render_failures: usize,
    /// Non-fatal metadata embedding failures.
    pub metadata_failures: usize,
    /// Rigs whose full range was processed.
    pub rigs_processed: usize,
    pub outcome: BatchOutcome,
}

/// The batch render orchestrator.
///
/// Holds exclusive logical ownership of the host for the duration of
/// [`RenderBatch::run`]; rigs, frames and sensors are processed strictly
/// sequentially so the snapshot/restore and environment-switch invariants
/// hold.
pub struct RenderBatch<'a, H: RenderHost + FrameRenderer> {
    host: &'a mut H,
    cancel: CancelToken,
    phase: RenderPhase,
}

impl<'a, H: RenderHost + FrameRenderer> RenderBatch<'a, H> {
    pub fn new(host: &'a mut H) -> Self {
        Self {
            host,
            cancel: CancelToken::new(),
            phase: RenderPhase::Idle,
        }
    }

    /// Attach a cancellation token shared with the caller.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn phase(&self) -> &RenderPhase {
        &self.phase
    }

    /// Render every enabled rig without progress reporting.
    pub fn run(&mut self, rigs: &[Rig]) -> Result<RenderReport, BatchError> {
        self.run_with_progress(rigs, &mut NullProgress)
    }

    /// Render every enabled rig, reporting one progress update per unit.
    pub fn run_with_progress(
        &mut self,
        rigs: &[Rig],
        progress: &mut dyn ProgressSink,
    ) -> Result<RenderReport, BatchError> {
        self.phase = RenderPhase::Precomputing;

        let settings = self.host.settings();
        let Some(out_base) = settings.output_path else {
            self.phase = RenderPhase::Failed;
            return Err(BatchError::NoOutputPath);
        };
        let format = settings.image_format;

        let enabled: Vec<&Rig> = rigs
            .iter()
            .filter(|r| r.enabled_for_render && r.included_count() > 0)
            .collect();
        let total: usize = enabled.iter().map(|r| r.queued_frames()).sum();
        if total == 0 {
            self.phase = RenderPhase::Failed;
            return Err(BatchError::NothingToRender);
        }
        debug!(rigs = enabled.len(), units = total, "starting batch render");

        let snapshot = RenderStateSnapshot::capture(self.host);
        progress.begin(total);

        let mut report = RenderReport {
            frames_rendered: 0,
            render_failures: 0,
            metadata_failures: 0,
            rigs_processed: 0,
            outcome: BatchOutcome::Completed,
        };
        let mut done = 0usize;

        'rigs: for rig in &enabled {
            self.host.set_resolution(rig.resolution.clamped());
            for frame in rig.frames.frames() {
                self.host.set_current_frame(frame);
                apply_environment(self.host, rig, frame);
                for sensor in rig.included_sensors() {
                    if self.cancel.is_cancelled() {
                        info!(rig = %rig.name, frame, "cancellation observed, stopping batch");
                        report.outcome = BatchOutcome::Cancelled;
                        break 'rigs;
                    }
                    self.phase = RenderPhase::Rendering {
                        rig: rig.name.clone(),
                        frame,
                        sensor: sensor.name.clone(),
                    };

                    self.host.set_active_sensor(Some(&sensor.name));
                    let output =
                        frame_image_path(&out_base, &rig.name, &sensor.name, frame, format);
                    debug!(path = %output.display(), "rendering frame");

                    done += 1;
                    if let Some(parent) = output.parent() {
                        if let Err(err) = fs::create_dir_all(parent) {
                            warn!(
                                path = %parent.display(),
                                error = %err,
                                "could not create output directory, skipping frame"
                            );
                            report.render_failures += 1;
                            progress.update(done, total);
                            continue;
                        }
                    }

                    match self.host.render_frame(&sensor.name, &output) {
                        Ok(()) => {
                            report.frames_rendered += 1;
                            if requires_metadata(rig, format) {
                                if let Err(err) =
                                    write_capture_metadata(&output, sensor, rig.resolution)
                                {
                                    warn!(
                                        path = %output.display(),
                                        error = %err,
                                        "metadata embedding failed, keeping frame"
                                    );
                                    report.metadata_failures += 1;
                                }
                            }
                        }
                        Err(err) => {
                            warn!(
                                rig = %rig.name,
                                sensor = %sensor.name,
                                frame,
                                error = %err,
                                "frame render failed, continuing batch"
                            );
                            report.render_failures += 1;
                        }
                    }
                    progress.update(done, total);
                }
            }
            report.rigs_processed += 1;
        }

        self.phase = RenderPhase::Restoring;
        snapshot.restore(self.host);
        progress.end();

        self.phase = match report.outcome {
            BatchOutcome::Completed => RenderPhase::Done,
            BatchOutcome::Cancelled => RenderPhase::Cancelled,
        };
        info!(
            rendered = report.frames_rendered,
            failed = report.render_failures,
            rigs = report.rigs_processed,
            outcome = ?report.outcome,
            "batch render finished"
        );
        Ok(report)
    }
}
