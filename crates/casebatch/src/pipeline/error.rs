use thiserror::Error;

use crate::db::DatabaseError;
use crate::error::{AcquisitionError, AnalysisError, CaseError};

/// Everything that can abort a pipeline run. Any of these stops the
/// remaining commands; there is no skip-and-continue.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No command line commands specified")]
    NoCommands,

    #[error("Missing required input '{key}' for '{command}' command")]
    MissingInput {
        command: &'static str,
        key: &'static str,
    },

    #[error(transparent)]
    Case(#[from] CaseError),

    #[error("Invalid data source id '{0}'")]
    InvalidDataSourceId(String),

    #[error("Unable to find data source with id {0}")]
    DataSourceNotFound(i64),

    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Failed to write command output: {0}")]
    Report(#[from] std::io::Error),

    #[error("Unexpected error during command dispatch: {0}")]
    Unexpected(String),
}
