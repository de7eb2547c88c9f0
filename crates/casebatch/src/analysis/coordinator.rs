//! Analysis coordination.
//!
//! Bridges the asynchronous analysis engine into synchronous control
//! flow: starts a job for an acquired data source and blocks the
//! pipeline thread until the job reports a terminal event.

use std::path::Path;

use tracing::{error, info, warn};

use crate::error::AnalysisError;
use crate::ingest::DataSource;

use super::engine::{AnalysisEngine, JobEventKind, ListenerId};
use super::settings::{AnalysisSettings, BATCH_CONTEXT};

/// Unregisters the job event listener on every exit path.
struct ListenerGuard<'a> {
    engine: &'a dyn AnalysisEngine,
    id: ListenerId,
}

impl Drop for ListenerGuard<'_> {
    fn drop(&mut self) {
        self.engine.remove_job_event_listener(self.id);
    }
}

/// Runs the configured ingest modules over the data source's content
/// and returns once the job has completed or been cancelled.
///
/// Settings warnings are fatal here: an unattended run has no user to
/// confirm a questionable configuration.
pub fn analyze(
    data_source: &DataSource,
    engine: &dyn AnalysisEngine,
    settings_dir: &Path,
) -> Result<(), AnalysisError> {
    let path = data_source.path().to_path_buf();
    info!(path = %path.display(), "Starting ingest modules analysis");

    let (listener_id, events) = engine.add_job_event_listener();
    let _guard = ListenerGuard {
        engine,
        id: listener_id,
    };

    let settings = AnalysisSettings::load(BATCH_CONTEXT, settings_dir, &engine.module_names());
    if !settings.warnings().is_empty() {
        for warning in settings.warnings() {
            error!(path = %path.display(), warning = %warning, "Ingest job settings error");
        }
        error!(path = %path.display(), "Failed to analyze data source due to settings errors");
        return Err(AnalysisError::Settings {
            path,
            warnings: settings.warnings().join("; "),
        });
    }

    let start = engine.begin_job(data_source.content(), &settings);
    let Some(job) = start.job else {
        if !start.module_errors.is_empty() {
            for module_error in &start.module_errors {
                error!(
                    path = %path.display(),
                    module = %module_error.module_name,
                    message = %module_error.message,
                    "Ingest module startup error"
                );
            }
            error!(path = %path.display(), "Failed to analyze data source due to ingest job startup error");
            return Err(AnalysisError::ModuleStartup {
                path,
                errors: start
                    .module_errors
                    .iter()
                    .map(|e| format!("{}: {}", e.module_name, e.message))
                    .collect::<Vec<_>>()
                    .join("; "),
            });
        }
        let reason = start
            .startup_error
            .unwrap_or_else(|| "unknown engine error".to_string());
        error!(path = %path.display(), reason = %reason, "Error starting analysis job");
        return Err(AnalysisError::JobStart { path, reason });
    };

    // Block until a completed-or-cancelled job event arrives. Any
    // terminal event unblocks the wait, even though child jobs spawned
    // by the engine may still be running.
    loop {
        match events.recv() {
            Ok(event) if matches!(event.kind, JobEventKind::Completed | JobEventKind::Cancelled) => {
                break;
            }
            Ok(_) => continue,
            Err(_) => return Err(AnalysisError::EventStreamClosed { path }),
        }
    }
    info!(path = %path.display(), "Finished ingest modules analysis");

    let snapshot = job.snapshot();
    for ds_snapshot in &snapshot.data_source_snapshots {
        if !ds_snapshot.cancelled {
            for module in &ds_snapshot.cancelled_modules {
                warn!(path = %path.display(), module = %module, "Ingest module cancelled");
            }
            info!(data_source = %ds_snapshot.data_source, "Analysis of data source completed");
        } else {
            warn!(data_source = %ds_snapshot.data_source, "Analysis of data source cancelled");
            let reason = ds_snapshot.cancellation_reason;
            if !matches!(
                reason,
                super::engine::CancellationReason::NotCancelled
                    | super::engine::CancellationReason::UserCancelled
            ) {
                return Err(AnalysisError::Cancelled {
                    path,
                    reason: reason.display_name().to_string(),
                });
            }
        }
    }

    Ok(())
}
