//! Data source acquisition.
//!
//! Turns a filesystem path into case content by trying ranked
//! candidate processors in order until one succeeds. Each attempt
//! bridges the processor's asynchronous completion callback into
//! synchronous control flow with a one-shot channel.

use std::sync::Arc;

use crossbeam_channel::bounded;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::case::Case;
use crate::error::AcquisitionError;

use super::data_source::DataSource;
use super::processor::{ProcessorOutput, ProcessorRegistry, ProcessorResult};
use super::progress::SilentProgress;

/// Runs `data_source` through the ranked candidate processors for its
/// path, populating the handle from the first acceptable outcome.
///
/// A candidate outcome is rejected when it reports critical errors or
/// produced no content; the next candidate is then tried. Exhausting
/// every candidate is fatal.
pub fn run_data_source_processor(
    case: &Case,
    data_source: &mut DataSource,
    registry: &ProcessorRegistry,
) -> Result<(), AcquisitionError> {
    info!(path = %data_source.path().display(), "Adding data source");

    let candidates = registry.ordered_candidates(data_source.path())?;
    if candidates.is_empty() {
        error!(path = %data_source.path().display(), "Unsupported data source");
        return Err(AcquisitionError::NoSupportedProcessor(
            data_source.path().to_path_buf(),
        ));
    }

    let progress = Arc::new(SilentProgress);
    // Try each processor in decreasing order of confidence.
    for candidate in candidates {
        let task_id = Uuid::new_v4();
        notify_adding(case, task_id);
        notify_adding(case, task_id);

        info!(
            path = %data_source.path().display(),
            processor = candidate.data_source_type(),
            "Identified data source type"
        );

        let (tx, rx) = bounded::<ProcessorOutput>(1);
        candidate.process(
            data_source.device_id().to_string(),
            data_source.path().to_path_buf(),
            case.db().clone(),
            progress.clone(),
            Box::new(move |output| {
                let _ = tx.send(output);
            }),
        );

        // Block until the completion callback fires, exactly once per
        // attempt.
        let output = rx.recv().map_err(|_| {
            AcquisitionError::CallbackDisconnected(data_source.path().to_path_buf())
        })?;
        data_source.set_processor_output(output.result, output.errors, output.content);

        let accepted = data_source.result() != Some(ProcessorResult::CriticalErrors)
            && !data_source.content().is_empty();
        if accepted {
            if let Err(e) = case.notify_data_source_added(task_id) {
                warn!(task = %task_id, error = %e, "Failed to record data-source-added event");
            }
        } else if let Err(e) = case.notify_failed_adding_data_source(task_id) {
            warn!(task = %task_id, error = %e, "Failed to record failed-adding event");
        }

        log_processor_result(data_source);
        if accepted {
            return Ok(());
        }
        // Move on to the next processor that can handle this path.
    }

    error!(path = %data_source.path().display(), "All data source processors failed");
    Err(AcquisitionError::AllProcessorsFailed(
        data_source.path().to_path_buf(),
    ))
}

fn notify_adding(case: &Case, task_id: Uuid) {
    if let Err(e) = case.notify_adding_data_source(task_id) {
        warn!(task = %task_id, error = %e, "Failed to record adding-data-source event");
    }
}

/// Logs the outcome of the most recent processor attempt.
fn log_processor_result(data_source: &DataSource) {
    let path = data_source.path().display();
    match data_source.result() {
        Some(ProcessorResult::NoErrors) => {
            info!(path = %path, "Added data source to case");
            if data_source.content().is_empty() {
                error!(path = %path, "Data source failed to produce content");
            }
        }
        Some(ProcessorResult::NonCriticalErrors) => {
            for message in data_source.errors() {
                warn!(path = %path, message = %message, "Non-critical error running data source processor");
            }
            info!(path = %path, "Added data source to case");
            if data_source.content().is_empty() {
                error!(path = %path, "Data source failed to produce content");
            }
        }
        Some(ProcessorResult::CriticalErrors) => {
            for message in data_source.errors() {
                error!(path = %path, message = %message, "Critical error running data source processor");
            }
            error!(path = %path, "Failed to add data source to case");
        }
        None => {
            warn!(path = %path, "No result code for data source processor");
        }
    }
}
