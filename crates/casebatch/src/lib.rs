pub mod analysis;
pub mod case;
pub mod cli;
pub mod db;
pub mod error;
pub mod ingest;
pub mod pipeline;

pub use analysis::{AnalysisEngine, LocalAnalysisEngine};
pub use case::{Case, CaseMetadata};
pub use cli::{build_commands, CliArgs};
pub use error::{AcquisitionError, AnalysisError, CaseError, ProcessorError};
pub use ingest::{DataSource, DataSourceProcessor, ProcessorRegistry};
pub use pipeline::{Command, CommandPipeline, CommandType, InputKey, PipelineContext, PipelineError};
