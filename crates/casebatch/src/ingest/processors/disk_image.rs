//! Disk image processor.
//!
//! Claims paths that look like raw or forensic disk images and adds
//! the image file to the case content database.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use tracing::{info, warn};

use crate::db::{content_repo, Database};
use crate::error::ProcessorError;
use crate::ingest::processor::{
    CompletionCallback, DataSourceProcessor, ProcessorOutput, ProcessorResult,
};
use crate::ingest::progress::ProgressMonitor;

const IMAGE_EXTENSIONS: &[&str] = &["img", "dd", "raw", "e01", "001", "vhd", "vmdk", "iso"];

pub struct DiskImageProcessor;

impl DiskImageProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DiskImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSourceProcessor for DiskImageProcessor {
    fn data_source_type(&self) -> &'static str {
        "Disk Image"
    }

    fn confidence(&self, path: &Path) -> Result<u8, ProcessorError> {
        let is_image_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)));
        if !is_image_extension {
            return Ok(0);
        }

        let metadata = std::fs::metadata(path).map_err(|e| ProcessorError::Probe {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(if metadata.is_file() { 90 } else { 0 })
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
                    info!(image = %path.display(), content_id = id, "Added disk image to case");
                    match content_repo::find_by_id(&db, id) {
                        Ok(Some(row)) => ProcessorOutput {
                            result: ProcessorResult::NoErrors,
                            errors: vec![],
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
                    warn!(image = %path.display(), error = %e, "Failed to add disk image");
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
