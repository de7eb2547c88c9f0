pub mod acquisition;
pub mod data_source;
pub mod processor;
pub mod processors;
pub mod progress;

pub use acquisition::run_data_source_processor;
pub use data_source::DataSource;
pub use processor::{
    CompletionCallback, DataSourceProcessor, ProcessorOutput, ProcessorRegistry, ProcessorResult,
};
pub use progress::{ProgressMonitor, SilentProgress};
