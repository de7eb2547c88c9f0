//! Ingest modules run by the local analysis engine.

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::db::ContentRow;

/// A unit of analysis applied to each data source of a job.
pub trait IngestModule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Called once before the job starts. A startup failure keeps the
    /// whole job from starting.
    fn startup(&self) -> Result<(), String> {
        Ok(())
    }

    /// Analyzes one content row. Failures are reported per module and
    /// do not abort the job.
    fn process(&self, content: &ContentRow) -> Result<(), String>;
}

/// Walks a data source and records how many files and bytes it holds.
pub struct FileInventoryModule;

impl FileInventoryModule {
    pub const NAME: &'static str = "file_inventory";

    pub fn new() -> Self {
        Self
    }
}

impl Default for FileInventoryModule {
    fn default() -> Self {
        Self::new()
    }
}

impl IngestModule for FileInventoryModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn process(&self, content: &ContentRow) -> Result<(), String> {
        let path = std::path::Path::new(&content.path);
        if !path.exists() {
            return Err(format!("Content path does not exist: {}", content.path));
        }

        let mut files: u64 = 0;
        let mut bytes: u64 = 0;
        for entry in WalkDir::new(path) {
            match entry {
                Ok(e) if e.file_type().is_file() => {
                    files += 1;
                    bytes += e.metadata().map(|m| m.len()).unwrap_or(0);
                }
                Ok(_) => {}
                Err(e) => warn!(content = %content.name, error = %e, "Inventory walk error"),
            }
        }

        info!(
            content = %content.name,
            files,
            bytes,
            "File inventory complete"
        );
        Ok(())
    }
}
