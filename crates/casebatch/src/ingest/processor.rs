//! Data source processor trait and registry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::db::{ContentRow, Database};
use crate::error::ProcessorError;

use super::progress::ProgressMonitor;

/// Terminal outcome reported by a processor attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorResult {
    NoErrors,
    NonCriticalErrors,
    CriticalErrors,
}

/// Everything a processor reports back through its completion callback.
#[derive(Debug)]
pub struct ProcessorOutput {
    pub result: ProcessorResult,
    pub errors: Vec<String>,
    pub content: Vec<ContentRow>,
}

/// One-shot completion callback. Processors must invoke it exactly
/// once per `process` call, from whichever thread finishes the work.
pub type CompletionCallback = Box<dyn FnOnce(ProcessorOutput) + Send + 'static>;

/// A pluggable strategy that attempts to turn a filesystem path into
/// case content.
pub trait DataSourceProcessor: Send + Sync {
    /// Short name of the data source type this processor handles.
    fn data_source_type(&self) -> &'static str;

    /// How confident this processor is that it can handle `path`,
    /// on a 0–100 scale. Zero means "cannot process".
    fn confidence(&self, path: &Path) -> Result<u8, ProcessorError>;

    /// Starts processing asynchronously. Reports the outcome through
    /// `on_complete`; progress goes to `progress`.
    fn process(
        &self,
        device_id: String,
        path: PathBuf,
        db: Database,
        progress: Arc<dyn ProgressMonitor>,
        on_complete: CompletionCallback,
    );
}

/// The set of available processors, queried per path for a ranked
/// candidate list.
pub struct ProcessorRegistry {
    processors: Vec<Arc<dyn DataSourceProcessor>>,
}

impl ProcessorRegistry {
    /// Production registry with the built-in processors.
    pub fn new() -> Self {
        Self::with_processors(vec![
            Arc::new(super::processors::DiskImageProcessor::new()),
            Arc::new(super::processors::LogicalFilesProcessor::new()),
        ])
    }

    pub fn with_processors(processors: Vec<Arc<dyn DataSourceProcessor>>) -> Self {
        Self { processors }
    }

    /// Returns the processors able to handle `path`, ordered by
    /// descending confidence. Registration order breaks ties.
    pub fn ordered_candidates(
        &self,
        path: &Path,
    ) -> Result<Vec<Arc<dyn DataSourceProcessor>>, ProcessorError> {
        let mut ranked: Vec<(u8, Arc<dyn DataSourceProcessor>)> = Vec::new();
        for processor in &self.processors {
            let confidence = processor.confidence(path)?;
            if confidence > 0 {
                ranked.push((confidence, Arc::clone(processor)));
            }
        }
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(ranked.into_iter().map(|(_, p)| p).collect())
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
