//! Logical files processor.
//!
//! Low-confidence fallback that accepts any existing path (a single
//! file or a directory tree) and adds it to the case as one logical
//! data source.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::db::{content_repo, Database};
use crate::error::ProcessorError;
use crate::ingest::processor::{
    CompletionCallback, DataSourceProcessor, ProcessorOutput, ProcessorResult,
};
use crate::ingest::progress::ProgressMonitor;

pub struct LogicalFilesProcessor;

impl LogicalFilesProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogicalFilesProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSourceProcessor for LogicalFilesProcessor {
    fn data_source_type(&self) -> &'static str {
        "Logical Files"
    }

    fn confidence(&self, path: &Path) -> Result<u8, ProcessorError> {
        Ok(if path.exists() { 10 } else { 0 })
    }

    fn process(
        &self,
        device_id: String,
        path: PathBuf,
        db: Database,
        _progress: Arc<dyn ProgressMonitor>,
        on_complete: CompletionCallback,
    ) {
        thread::spawn(move || {
            if !path.exists() {
                on_complete(ProcessorOutput {
                    result: ProcessorResult::CriticalErrors,
                    errors: vec![format!("Data source path does not exist: {}", path.display())],
                    content: vec![],
                });
                return;
            }

            // Walk errors (unreadable subtrees) are non-critical; the
            // data source itself is still added.
            let mut errors = Vec::new();
            let mut file_count: u64 = 0;
            if path.is_dir() {
                for entry in WalkDir::new(&path) {
                    match entry {
                        Ok(e) if e.file_type().is_file() => file_count += 1,
                        Ok(_) => {}
                        Err(e) => errors.push(e.to_string()),
                    }
                }
            } else {
                file_count = 1;
            }

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());

            let output = match content_repo::insert(
                &db,
                &name,
                &path.to_string_lossy(),
                &device_id,
            ) {
                Ok(id) => {
                    info!(
                        path = %path.display(),
                        content_id = id,
                        files = file_count,
                        "Added logical files data source to case"
                    );
                    match content_repo::find_by_id(&db, id) {
                        Ok(Some(row)) => ProcessorOutput {
                            result: if errors.is_empty() {
                                ProcessorResult::NoErrors
                            } else {
                                ProcessorResult::NonCriticalErrors
                            },
                            errors,
                            content: vec![row],
                        },
                        Ok(None) => ProcessorOutput {
                            result: ProcessorResult::CriticalErrors,
                            errors: vec![format!("Inserted content {} disappeared", id)],
                            content: vec![],
                        },
                        Err(e) => ProcessorOutput {
                            result: ProcessorResult::CriticalErrors,
                            errors: vec![e.to_string()],
                            content: vec![],
                        },
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to add logical files");
                    ProcessorOutput {
                        result: ProcessorResult::CriticalErrors,
                        errors: vec![e.to_string()],
                        content: vec![],
                    }
                }
            };

            on_complete(output);
        });
    }
}
