//! The data-source handle threaded through the pipeline.

use std::path::{Path, PathBuf};

use crate::db::ContentRow;

use super::processor::ProcessorResult;

/// A data source being attached to, or loaded from, a case.
///
/// Created empty when a command first needs a data source and
/// populated once per run: either by the acquisition loop or directly
/// from an existing content row.
#[derive(Debug)]
pub struct DataSource {
    device_id: String,
    path: PathBuf,
    content: Vec<ContentRow>,
    result: Option<ProcessorResult>,
    errors: Vec<String>,
}

impl DataSource {
    pub fn new(device_id: &str, path: PathBuf) -> Self {
        Self {
            device_id: device_id.to_string(),
            path,
            content: Vec::new(),
            result: None,
            errors: Vec::new(),
        }
    }

    /// Builds an already-populated handle from known case content,
    /// bypassing acquisition.
    pub fn from_content(row: ContentRow) -> Self {
        let path = PathBuf::from(&row.path);
        let device_id = row.device_id.clone();
        Self {
            device_id,
            path,
            content: vec![row],
            result: Some(ProcessorResult::NoErrors),
            errors: Vec::new(),
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &[ContentRow] {
        &self.content
    }

    pub fn result(&self) -> Option<ProcessorResult> {
        self.result
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Stores the output of a processor attempt.
    pub fn set_processor_output(
        &mut self,
        result: ProcessorResult,
        errors: Vec<String>,
        content: Vec<ContentRow>,
    ) {
        self.result = Some(result);
        self.errors = errors;
        self.content = content;
    }
}
