//! Command output reports.
//!
//! Every successful case-affecting command leaves a textual report in
//! the `Command Output` subdirectory of the case directory. Reports
//! are overwritten in place, so re-running a command on an unchanged
//! case reproduces identical output.

use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;

use tracing::info;

use crate::case::Case;
use crate::db::content_repo;
use crate::ingest::DataSource;

use super::error::PipelineError;

/// Fixed output sub-directory under the case directory.
pub const COMMAND_OUTPUT_DIR: &str = "Command Output";

const CREATE_CASE_FILE: &str = "create_case.txt";
const ADD_DATA_SOURCE_FILE: &str = "add_data_source.txt";
const LIST_ALL_DATA_SOURCES_FILE: &str = "list_all_data_sources.txt";

fn write_report(case: &Case, file_name: &str, content: &str) -> io::Result<PathBuf> {
    let dir = case.directory().join(COMMAND_OUTPUT_DIR);
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, content)?;
    info!(report = %path.display(), "Wrote command output");
    Ok(path)
}

/// Report for a successful create-case command.
pub fn save_create_case_output(case: &Case) -> io::Result<PathBuf> {
    let mut report = String::new();
    let _ = writeln!(report, "Case: {}", case.display_name());
    let _ = writeln!(report, "Directory: {}", case.directory().display());
    let _ = writeln!(report, "Created: {}", case.metadata().created_at);
    write_report(case, CREATE_CASE_FILE, &report)
}

/// Report for a successful add-data-source command.
pub fn save_add_data_source_output(case: &Case, data_source: &DataSource) -> io::Result<PathBuf> {
    let mut report = String::new();
    let _ = writeln!(report, "Data source: {}", data_source.path().display());
    for row in data_source.content() {
        let _ = writeln!(report, "Content id: {}", row.id);
    }
    for error in data_source.errors() {
        let _ = writeln!(report, "Error: {}", error);
    }
    write_report(case, ADD_DATA_SOURCE_FILE, &report)
}

/// Enumeration of every data source known to the case.
pub fn list_all_data_sources(case: &Case) -> Result<PathBuf, PipelineError> {
    let rows = content_repo::list_all(case.db())?;

    let mut report = String::new();
    let _ = writeln!(report, "Data sources in case {}: {}", case.name(), rows.len());
    for row in rows {
        let _ = writeln!(
            report,
            "{}\t{}\t{}\t{}\t{}",
            row.id, row.name, row.path, row.device_id, row.added_at
        );
    }
    Ok(write_report(case, LIST_ALL_DATA_SOURCES_FILE, &report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::content_repo;
    use crate::ingest::DataSource;
    use tempfile::TempDir;

    fn test_case() -> (TempDir, Case) {
        let dir = TempDir::new().unwrap();
        let case = Case::create(dir.path(), "CaseA").unwrap();
        (dir, case)
    }

    #[test]
    fn test_create_case_report_contents() {
        let (_dir, case) = test_case();
        let path = save_create_case_output(&case).unwrap();

        let report = std::fs::read_to_string(&path).unwrap();
        assert!(report.contains("Case: CaseA"));
        assert!(report.contains("Directory:"));
        assert!(path.parent().unwrap().ends_with(COMMAND_OUTPUT_DIR));
    }

    #[test]
    fn test_add_data_source_report_lists_content() {
        let (_dir, case) = test_case();
        let id = content_repo::insert(case.db(), "disk.img", "/evidence/disk.img", "").unwrap();
        let row = content_repo::find_by_id(case.db(), id).unwrap().unwrap();
        let ds = DataSource::from_content(row);

        let path = save_add_data_source_output(&case, &ds).unwrap();
        let report = std::fs::read_to_string(&path).unwrap();
        assert!(report.contains("/evidence/disk.img"));
        assert!(report.contains(&format!("Content id: {}", id)));
    }

    #[test]
    fn test_list_report_is_idempotent() {
        let (_dir, case) = test_case();
        content_repo::insert(case.db(), "a.img", "/tmp/a.img", "dev").unwrap();
        content_repo::insert(case.db(), "b.img", "/tmp/b.img", "dev").unwrap();

        let first_path = list_all_data_sources(&case).unwrap();
        let first = std::fs::read_to_string(&first_path).unwrap();

        let second_path = list_all_data_sources(&case).unwrap();
        let second = std::fs::read_to_string(&second_path).unwrap();

        assert_eq!(first_path, second_path);
        assert_eq!(first, second);
        assert!(first.contains("Data sources in case CaseA: 2"));
        assert!(first.contains("a.img"));
        assert!(first.contains("b.img"));
    }

    #[test]
    fn test_list_report_for_empty_case() {
        let (_dir, case) = test_case();
        let path = list_all_data_sources(&case).unwrap();
        let report = std::fs::read_to_string(&path).unwrap();
        assert!(report.contains("Data sources in case CaseA: 0"));
    }
}
