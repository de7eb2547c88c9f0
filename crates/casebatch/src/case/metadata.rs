//! Case metadata file.
//!
//! A case directory contains exactly one metadata file named after the
//! case with the [`CASE_METADATA_EXTENSION`] extension. The file is a
//! small JSON document identifying the case.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::CaseError;

/// File extension of case metadata files (without the leading dot).
pub const CASE_METADATA_EXTENSION: &str = "case";

const METADATA_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseMetadata {
    pub schema_version: String,
    pub name: String,
    pub display_name: String,
    pub created_at: String,
}

impl CaseMetadata {
    /// Creates metadata for a brand-new case.
    pub fn new(name: &str) -> Self {
        Self {
            schema_version: METADATA_SCHEMA_VERSION.to_string(),
            name: name.to_string(),
            display_name: name.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// The metadata file path for this case inside `case_directory`.
    pub fn file_path(&self, case_directory: &Path) -> PathBuf {
        case_directory.join(format!("{}.{}", self.name, CASE_METADATA_EXTENSION))
    }

    /// Writes the metadata file into the case directory and returns its path.
    pub fn write(&self, case_directory: &Path) -> Result<PathBuf, CaseError> {
        let path = self.file_path(case_directory);
        let json =
            serde_json::to_string_pretty(self).map_err(|e| CaseError::SerializeMetadata {
                path: path.clone(),
                source: e,
            })?;
        std::fs::write(&path, json).map_err(|e| CaseError::WriteMetadata {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    /// Reads and validates a metadata file.
    pub fn read(path: &Path) -> Result<Self, CaseError> {
        let content = std::fs::read_to_string(path).map_err(|e| CaseError::ReadMetadata {
            path: path.to_path_buf(),
            source: e,
        })?;

        let metadata: CaseMetadata =
            serde_json::from_str(&content).map_err(|e| CaseError::ParseMetadata {
                path: path.to_path_buf(),
                source: e,
            })?;

        if metadata.schema_version != METADATA_SCHEMA_VERSION {
            return Err(CaseError::UnsupportedMetadataVersion(
                metadata.schema_version,
            ));
        }

        Ok(metadata)
    }
}
