//! The command pipeline.
//!
//! Executes an ordered command list to completion or first failure on
//! a dedicated thread, then closes any open case and shuts the host
//! process down. Both cleanup steps run on every exit path, including
//! panics during command dispatch.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{error, info};

use crate::analysis::{self, AnalysisEngine};
use crate::case::resolver;
use crate::db::content_repo;
use crate::ingest::{acquisition, DataSource, ProcessorRegistry};

use super::command::{Command, CommandType, InputKey};
use super::context::{PipelineContext, PipelineState};
use super::error::PipelineError;
use super::output;

/// How the pipeline shuts the hosting process down when the run ends.
pub trait HostLifecycle: Send + Sync {
    fn exit(&self, code: i32);
}

/// Production lifecycle: terminate the process.
pub struct ProcessHost;

impl HostLifecycle for ProcessHost {
    fn exit(&self, code: i32) {
        std::process::exit(code);
    }
}

/// Top-level batch orchestrator.
pub struct CommandPipeline {
    registry: ProcessorRegistry,
    engine: Arc<dyn AnalysisEngine>,
    settings_dir: PathBuf,
    lifecycle: Arc<dyn HostLifecycle>,
}

impl CommandPipeline {
    pub fn new(
        registry: ProcessorRegistry,
        engine: Arc<dyn AnalysisEngine>,
        settings_dir: PathBuf,
    ) -> Self {
        Self::with_lifecycle(registry, engine, settings_dir, Arc::new(ProcessHost))
    }

    /// Pipeline with an injected host lifecycle, for tests and embedders.
    pub fn with_lifecycle(
        registry: ProcessorRegistry,
        engine: Arc<dyn AnalysisEngine>,
        settings_dir: PathBuf,
        lifecycle: Arc<dyn HostLifecycle>,
    ) -> Self {
        Self {
            registry,
            engine,
            settings_dir,
            lifecycle,
        }
    }

    /// Runs the pipeline on a dedicated background thread.
    pub fn start(self, commands: Vec<Command>) -> JoinHandle<()> {
        thread::spawn(move || self.run(commands))
    }

    /// Executes the command list, then unconditionally closes any open
    /// case and terminates the host.
    pub fn run(self, commands: Vec<Command>) {
        info!("Batch pipeline started");
        println!("Batch pipeline started");

        let mut ctx = PipelineContext::new();
        let status = if commands.is_empty() {
            error!("No command line commands specified");
            eprintln!("No command line commands specified");
            PipelineState::Failed
        } else {
            // Unexpected-failure firewall: a panic during dispatch must
            // not bypass case closure or host shutdown.
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| self.execute_commands(&mut ctx, &commands)));
            match outcome {
                Ok(Ok(())) => PipelineState::Done,
                Ok(Err(_)) => PipelineState::Failed,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(message = %message, "Unexpected error during command dispatch");
                    eprintln!("Unexpected error. Exiting...");
                    PipelineState::Failed
                }
            }
        };
        ctx.state = status;

        if let Some(case) = ctx.case.take() {
            case.close();
        }

        let code = if status == PipelineState::Done { 0 } else { 1 };
        info!(exit_code = code, "Batch pipeline finished");
        println!("Batch pipeline finished");
        self.lifecycle.exit(code);
    }

    fn execute_commands(
        &self,
        ctx: &mut PipelineContext,
        commands: &[Command],
    ) -> Result<(), PipelineError> {
        for command in commands {
            let name = command.command_type().display_name();
            info!(command = name, "Processing command");
            println!("Processing '{}' command", name);

            let result = match command.command_type() {
                CommandType::CreateCase => self.create_case(ctx, command),
                CommandType::AddDataSource => self.add_data_source(ctx, command),
                CommandType::RunIngest => self.run_ingest(ctx, command),
                CommandType::ListAllDataSources => self.list_all_data_sources(ctx, command),
            };

            if let Err(e) = result {
                error!(command = name, error = %e, "Command failed");
                eprintln!("{}: {}", failure_context(command), e);
                // Do not process any other commands.
                return Err(e);
            }
        }
        Ok(())
    }

    fn create_case(
        &self,
        ctx: &mut PipelineContext,
        command: &Command,
    ) -> Result<(), PipelineError> {
        let case_name = command.require_input(InputKey::CaseName)?;
        let base_dir = command.require_input(InputKey::CasesBaseDirPath)?;

        let case = resolver::create_case(Path::new(base_dir), case_name)?;
        output::save_create_case_output(&case)?;
        println!("Created case: {}", case.directory().display());
        ctx.attach_case(case);
        Ok(())
    }

    /// Opens the case by folder path unless an earlier command already
    /// opened one.
    fn ensure_case_open(
        &self,
        ctx: &mut PipelineContext,
        command: &Command,
    ) -> Result<(), PipelineError> {
        if ctx.case.is_some() {
            return Ok(());
        }
        let case_dir = command.require_input(InputKey::CaseFolderPath)?;
        let case = resolver::open_case(Path::new(case_dir))?;
        ctx.attach_case(case);
        Ok(())
    }

    fn add_data_source(
        &self,
        ctx: &mut PipelineContext,
        command: &Command,
    ) -> Result<(), PipelineError> {
        self.ensure_case_open(ctx, command)?;
        let path = command.require_input(InputKey::DataSourcePath)?.to_string();

        let case = ctx.case.as_ref().expect("case opened above");
        let mut data_source = DataSource::new("", PathBuf::from(&path));
        acquisition::run_data_source_processor(case, &mut data_source, &self.registry)?;
        output::save_add_data_source_output(case, &data_source)?;
        println!("Added data source: {}", path);
        ctx.attach_data_source(data_source);
        Ok(())
    }

    fn run_ingest(
        &self,
        ctx: &mut PipelineContext,
        command: &Command,
    ) -> Result<(), PipelineError> {
        self.ensure_case_open(ctx, command)?;

        // Resolve the data source from the case database when no
        // earlier command attached one.
        if ctx.data_source.is_none() {
            let raw_id = command.require_input(InputKey::DataSourceId)?;
            let id: i64 = raw_id
                .parse()
                .map_err(|_| PipelineError::InvalidDataSourceId(raw_id.to_string()))?;

            let case = ctx.case.as_ref().expect("case opened above");
            let row = content_repo::find_by_id(case.db(), id)?
                .ok_or(PipelineError::DataSourceNotFound(id))?;
            ctx.attach_data_source(DataSource::from_content(row));
        }

        ctx.state = PipelineState::AnalysisRunning;
        let data_source = ctx.data_source.as_ref().expect("data source resolved above");
        analysis::analyze(data_source, self.engine.as_ref(), &self.settings_dir)?;
        println!(
            "Finished analysis of data source: {}",
            data_source.path().display()
        );
        Ok(())
    }

    fn list_all_data_sources(
        &self,
        ctx: &mut PipelineContext,
        command: &Command,
    ) -> Result<(), PipelineError> {
        self.ensure_case_open(ctx, command)?;
        let case = ctx.case.as_ref().expect("case opened above");
        let report = output::list_all_data_sources(case)?;
        println!("Saved data source listing: {}", report.display());
        Ok(())
    }
}

/// Status-stream context for a failed command, naming what it was
/// working on.
fn failure_context(command: &Command) -> String {
    match command.command_type() {
        CommandType::CreateCase => format!(
            "Error creating or opening case {}",
            command.input(InputKey::CaseName).unwrap_or("<unknown>")
        ),
        CommandType::AddDataSource => format!(
            "Error adding data source {}",
            command.input(InputKey::DataSourcePath).unwrap_or("<unknown>")
        ),
        CommandType::RunIngest => format!(
            "Error running ingest on data source {}",
            command
                .input(InputKey::DataSourceId)
                .or_else(|| command.input(InputKey::DataSourcePath))
                .unwrap_or("<current>")
        ),
        CommandType::ListAllDataSources => format!(
            "Error listing data sources in case directory {}",
            command.input(InputKey::CaseFolderPath).unwrap_or("<current>")
        ),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
