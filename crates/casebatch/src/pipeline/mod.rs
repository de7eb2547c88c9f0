pub mod command;
pub mod context;
pub mod error;
pub mod output;
pub mod runner;

pub use command::{Command, CommandType, InputKey};
pub use context::{PipelineContext, PipelineState};
pub use error::PipelineError;
pub use runner::{CommandPipeline, HostLifecycle, ProcessHost};
