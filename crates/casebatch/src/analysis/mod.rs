pub mod coordinator;
pub mod engine;
pub mod modules;
pub mod settings;

pub use coordinator::analyze;
pub use engine::{
    AnalysisEngine, AnalysisJob, CancellationReason, DataSourceSnapshot, JobEvent, JobEventKind,
    JobSnapshot, JobStartResult, ListenerId, LocalAnalysisEngine, ModuleError,
};
pub use modules::{FileInventoryModule, IngestModule};
pub use settings::{AnalysisSettings, BATCH_CONTEXT};
