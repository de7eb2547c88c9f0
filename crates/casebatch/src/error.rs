use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaseError {
    #[error("Invalid case name '{0}'")]
    InvalidName(String),

    #[error("Case '{0}' already exists. Case name must be unique")]
    NameNotUnique(String),

    #[error("Case directory was not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("No case metadata file found in case directory: {0}")]
    MetadataNotFound(PathBuf),

    #[error("Failed to create case directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read case metadata '{path}': {source}")]
    ReadMetadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write case metadata '{path}': {source}")]
    WriteMetadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize case metadata for '{path}': {source}")]
    SerializeMetadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse case metadata '{path}': {source}")]
    ParseMetadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported case metadata version '{0}'")]
    UnsupportedMetadataVersion(String),

    #[error("Case database error: {0}")]
    Database(#[from] crate::db::DatabaseError),
}

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Failed to examine data source '{path}': {source}")]
    Probe {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("No data source processor supports '{0}'")]
    NoSupportedProcessor(PathBuf),

    #[error(transparent)]
    Processor(#[from] ProcessorError),

    #[error("Failed to process '{0}' with all data source processors")]
    AllProcessorsFailed(PathBuf),

    #[error("Data source processor completion callback disconnected for '{0}'")]
    CallbackDisconnected(PathBuf),
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Error(s) in ingest job settings for '{path}': {warnings}")]
    Settings { path: PathBuf, warnings: String },

    #[error("Error(s) during ingest module startup for '{path}': {errors}")]
    ModuleStartup { path: PathBuf, errors: String },

    #[error("Error starting analysis job for '{path}': {reason}")]
    JobStart { path: PathBuf, reason: String },

    #[error("Analysis cancelled due to {reason} for '{path}'")]
    Cancelled { path: PathBuf, reason: String },

    #[error("Analysis event stream closed while waiting for '{path}'")]
    EventStreamClosed { path: PathBuf },
}
