//! Command line options.
//!
//! Flags select which pipeline commands run; the resulting command
//! list always follows the fixed order create-case, add-data-source,
//! run-ingest, list-all-data-sources. Each command's required inputs
//! are validated here, before the pipeline starts.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::pipeline::{Command, CommandType, InputKey};

#[derive(Parser, Debug)]
#[command(
    name = "casebatch",
    about = "Run an unattended case pipeline: create a case, add a data source, run analysis, list data sources"
)]
pub struct CliArgs {
    /// Create a new case.
    #[arg(long)]
    pub create_case: bool,

    /// Name of the case to create.
    #[arg(long)]
    pub case_name: Option<String>,

    /// Base directory under which case directories are created.
    #[arg(long)]
    pub case_base_dir: Option<PathBuf>,

    /// Add a data source to the case.
    #[arg(long)]
    pub add_data_source: bool,

    /// Path of the data source to add.
    #[arg(long)]
    pub data_source_path: Option<PathBuf>,

    /// Run ingest modules over the data source.
    #[arg(long)]
    pub run_ingest: bool,

    /// Numeric identifier of an already-ingested data source.
    #[arg(long)]
    pub data_source_id: Option<String>,

    /// Write a listing of every data source in the case.
    #[arg(long)]
    pub list_all_data_sources: bool,

    /// Directory of an existing case (required when the run does not
    /// start by creating one).
    #[arg(long)]
    pub case_dir: Option<PathBuf>,

    /// Directory holding ingest settings files.
    #[arg(long, default_value = "settings")]
    pub settings_dir: PathBuf,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CliError {
    #[error("--{flag} is required by --{command}")]
    MissingArgument {
        command: &'static str,
        flag: &'static str,
    },
}

fn require<'a, T>(
    value: &'a Option<T>,
    command: &'static str,
    flag: &'static str,
) -> Result<&'a T, CliError> {
    value
        .as_ref()
        .ok_or(CliError::MissingArgument { command, flag })
}

/// Builds the ordered command list from parsed options.
///
/// Returns an empty list when no command flag was given; the pipeline
/// treats that as a fail-fast error of its own.
pub fn build_commands(args: &CliArgs) -> Result<Vec<Command>, CliError> {
    let mut commands = Vec::new();
    let mut case_will_be_open = false;

    if args.create_case {
        let name = require(&args.case_name, "create-case", "case-name")?;
        let base_dir = require(&args.case_base_dir, "create-case", "case-base-dir")?;
        commands.push(
            Command::new(CommandType::CreateCase)
                .with_input(InputKey::CaseName, name)
                .with_input(InputKey::CasesBaseDirPath, base_dir.display().to_string()),
        );
        case_will_be_open = true;
    }

    if args.add_data_source {
        let path = require(&args.data_source_path, "add-data-source", "data-source-path")?;
        let mut command = Command::new(CommandType::AddDataSource)
            .with_input(InputKey::DataSourcePath, path.display().to_string());
        if !case_will_be_open {
            let case_dir = require(&args.case_dir, "add-data-source", "case-dir")?;
            command = command.with_input(InputKey::CaseFolderPath, case_dir.display().to_string());
            case_will_be_open = true;
        }
        commands.push(command);
    }

    if args.run_ingest {
        let mut command = Command::new(CommandType::RunIngest);
        if !case_will_be_open {
            let case_dir = require(&args.case_dir, "run-ingest", "case-dir")?;
            command = command.with_input(InputKey::CaseFolderPath, case_dir.display().to_string());
            case_will_be_open = true;
        }
        if !args.add_data_source {
            let id = require(&args.data_source_id, "run-ingest", "data-source-id")?;
            command = command.with_input(InputKey::DataSourceId, id);
        }
        commands.push(command);
    }

    if args.list_all_data_sources {
        let mut command = Command::new(CommandType::ListAllDataSources);
        if !case_will_be_open {
            let case_dir = require(&args.case_dir, "list-all-data-sources", "case-dir")?;
            command = command.with_input(InputKey::CaseFolderPath, case_dir.display().to_string());
        }
        commands.push(command);
    }

    Ok(commands)
}
