//! Pipeline commands.
//!
//! A command is a type tag plus a map of named string inputs. Commands
//! are immutable once constructed and executed strictly in list order.

use std::collections::HashMap;

use super::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    CreateCase,
    AddDataSource,
    RunIngest,
    ListAllDataSources,
}

impl CommandType {
    /// Human-readable name used in status lines and error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CreateCase => "Create Case",
            Self::AddDataSource => "Add Data Source",
            Self::RunIngest => "Run Ingest",
            Self::ListAllDataSources => "List All Data Sources",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKey {
    CaseName,
    CasesBaseDirPath,
    CaseFolderPath,
    DataSourcePath,
    DataSourceId,
}

impl InputKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CaseName => "CASE_NAME",
            Self::CasesBaseDirPath => "CASES_BASE_DIR_PATH",
            Self::CaseFolderPath => "CASE_FOLDER_PATH",
            Self::DataSourcePath => "DATA_SOURCE_PATH",
            Self::DataSourceId => "DATA_SOURCE_ID",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Command {
    command_type: CommandType,
    inputs: HashMap<InputKey, String>,
}

impl Command {
    pub fn new(command_type: CommandType) -> Self {
        Self {
            command_type,
            inputs: HashMap::new(),
        }
    }

    pub fn with_input(mut self, key: InputKey, value: impl Into<String>) -> Self {
        self.inputs.insert(key, value.into());
        self
    }

    pub fn command_type(&self) -> CommandType {
        self.command_type
    }

    pub fn input(&self, key: InputKey) -> Option<&str> {
        self.inputs.get(&key).map(String::as_str)
    }

    /// Fetches a required input, failing with the command and key name.
    pub fn require_input(&self, key: InputKey) -> Result<&str, PipelineError> {
        self.input(key).ok_or(PipelineError::MissingInput {
            command: self.command_type.display_name(),
            key: key.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_round_trip() {
        let command = Command::new(CommandType::CreateCase)
            .with_input(InputKey::CaseName, "CaseA")
            .with_input(InputKey::CasesBaseDirPath, "/cases");

        assert_eq!(command.command_type(), CommandType::CreateCase);
        assert_eq!(command.input(InputKey::CaseName), Some("CaseA"));
        assert_eq!(command.require_input(InputKey::CasesBaseDirPath).unwrap(), "/cases");
    }

    #[test]
    fn test_require_missing_input_names_command_and_key() {
        let command = Command::new(CommandType::RunIngest);
        let err = command.require_input(InputKey::DataSourceId).unwrap_err();

        match err {
            PipelineError::MissingInput { command, key } => {
                assert_eq!(command, "Run Ingest");
                assert_eq!(key, "DATA_SOURCE_ID");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
