//! End-to-end tests for the batch case pipeline.
//!
//! Each scenario drives a full pipeline run (real processors, the
//! local analysis engine, a recording host lifecycle) against
//! temporary directories, then inspects the case directory, content
//! database and exit code.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use casebatch::case::resolver;
use casebatch::db::content_repo;
use casebatch::pipeline::output::COMMAND_OUTPUT_DIR;
use casebatch::pipeline::HostLifecycle;
use casebatch::{
    Command, CommandPipeline, CommandType, InputKey, LocalAnalysisEngine, ProcessorRegistry,
};

struct RecordingHost {
    exits: Mutex<Vec<i32>>,
}

impl RecordingHost {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            exits: Mutex::new(Vec::new()),
        })
    }

    fn exit_code(&self) -> i32 {
        let exits = self.exits.lock().unwrap();
        assert_eq!(exits.len(), 1, "host must be shut down exactly once");
        exits[0]
    }
}

impl HostLifecycle for RecordingHost {
    fn exit(&self, code: i32) {
        self.exits.lock().unwrap().push(code);
    }
}

struct Workspace {
    _tmp: TempDir,
    base_dir: PathBuf,
    evidence_dir: PathBuf,
    settings_dir: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let base_dir = tmp.path().join("cases");
        let evidence_dir = tmp.path().join("evidence");
        let settings_dir = tmp.path().join("settings");
        std::fs::create_dir_all(&evidence_dir).unwrap();
        std::fs::create_dir_all(&settings_dir).unwrap();
        std::fs::write(evidence_dir.join("report.txt"), "quarterly report").unwrap();
        std::fs::write(evidence_dir.join("notes.txt"), "meeting notes").unwrap();
        Self {
            _tmp: tmp,
            base_dir,
            evidence_dir,
            settings_dir,
        }
    }

    fn run(&self, commands: Vec<Command>) -> i32 {
        let host = RecordingHost::new();
        let pipeline = CommandPipeline::with_lifecycle(
            ProcessorRegistry::new(),
            Arc::new(LocalAnalysisEngine::with_standard_modules()),
            self.settings_dir.clone(),
            host.clone(),
        );
        pipeline.start(commands).join().unwrap();
        host.exit_code()
    }

    fn case_dir(&self, name: &str) -> PathBuf {
        resolver::find_case_directory(&self.base_dir, name).expect("case directory exists")
    }

    fn create_case(&self, name: &str) -> Command {
        Command::new(CommandType::CreateCase)
            .with_input(InputKey::CaseName, name)
            .with_input(InputKey::CasesBaseDirPath, self.base_dir.display().to_string())
    }

    fn add_data_source(&self, path: &Path) -> Command {
        Command::new(CommandType::AddDataSource)
            .with_input(InputKey::DataSourcePath, path.display().to_string())
    }
}

#[test]
fn full_run_creates_analyzes_and_lists() {
    let ws = Workspace::new();

    let code = ws.run(vec![
        ws.create_case("CaseA"),
        ws.add_data_source(&ws.evidence_dir),
        Command::new(CommandType::RunIngest),
        Command::new(CommandType::ListAllDataSources),
    ]);
    assert_eq!(code, 0);

    let case_dir = ws.case_dir("CaseA");
    assert!(case_dir.join("CaseA.case").exists());

    // All three command reports were written.
    let output_dir = case_dir.join(COMMAND_OUTPUT_DIR);
    assert!(output_dir.join("create_case.txt").exists());
    assert!(output_dir.join("add_data_source.txt").exists());
    assert!(output_dir.join("list_all_data_sources.txt").exists());

    // The evidence directory became one logical data source.
    let case = resolver::open_case(&case_dir).unwrap();
    let rows = content_repo::list_all(case.db()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "evidence");

    let listing =
        std::fs::read_to_string(output_dir.join("list_all_data_sources.txt")).unwrap();
    assert!(listing.contains("Data sources in case CaseA: 1"));
    assert!(listing.contains("evidence"));
}

#[test]
fn disk_image_outranks_logical_files() {
    let ws = Workspace::new();
    let image = ws.evidence_dir.join("drive.img");
    std::fs::write(&image, b"raw image bytes").unwrap();

    let code = ws.run(vec![ws.create_case("ImageCase"), ws.add_data_source(&image)]);
    assert_eq!(code, 0);

    let case = resolver::open_case(&ws.case_dir("ImageCase")).unwrap();
    let rows = content_repo::list_all(case.db()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "drive.img");
}

#[test]
fn duplicate_case_name_aborts_run() {
    let ws = Workspace::new();

    assert_eq!(ws.run(vec![ws.create_case("CaseA")]), 0);
    // Second run reuses the name: uniqueness failure, nothing after it.
    let code = ws.run(vec![
        ws.create_case("CaseA"),
        Command::new(CommandType::ListAllDataSources),
    ]);
    assert_eq!(code, 1);

    let output_dir = ws.case_dir("CaseA").join(COMMAND_OUTPUT_DIR);
    assert!(!output_dir.join("list_all_data_sources.txt").exists());
}

#[test]
fn second_run_reopens_case_by_folder_path() {
    let ws = Workspace::new();
    assert_eq!(
        ws.run(vec![
            ws.create_case("CaseA"),
            ws.add_data_source(&ws.evidence_dir),
        ]),
        0
    );
    let case_dir = ws.case_dir("CaseA");

    // Separate run: open the existing case, ingest content id 1, list.
    let code = ws.run(vec![
        Command::new(CommandType::RunIngest)
            .with_input(InputKey::CaseFolderPath, case_dir.display().to_string())
            .with_input(InputKey::DataSourceId, "1"),
        Command::new(CommandType::ListAllDataSources),
    ]);
    assert_eq!(code, 0);
    assert!(case_dir
        .join(COMMAND_OUTPUT_DIR)
        .join("list_all_data_sources.txt")
        .exists());
}

#[test]
fn run_ingest_with_unknown_id_fails() {
    let ws = Workspace::new();
    assert_eq!(ws.run(vec![ws.create_case("CaseA")]), 0);
    let case_dir = ws.case_dir("CaseA");

    let code = ws.run(vec![Command::new(CommandType::RunIngest)
        .with_input(InputKey::CaseFolderPath, case_dir.display().to_string())
        .with_input(InputKey::DataSourceId, "404")]);
    assert_eq!(code, 1);
}

#[test]
fn settings_warnings_abort_ingest() {
    let ws = Workspace::new();
    std::fs::write(
        ws.settings_dir.join("batch.json"),
        r#"{"version":"1.0","enabled_modules":["module_that_does_not_exist"]}"#,
    )
    .unwrap();

    let code = ws.run(vec![
        ws.create_case("CaseA"),
        ws.add_data_source(&ws.evidence_dir),
        Command::new(CommandType::RunIngest),
    ]);
    assert_eq!(code, 1);
}

#[test]
fn listing_twice_is_idempotent() {
    let ws = Workspace::new();
    assert_eq!(
        ws.run(vec![
            ws.create_case("CaseA"),
            ws.add_data_source(&ws.evidence_dir),
        ]),
        0
    );
    let case_dir = ws.case_dir("CaseA");
    let list_command = || {
        Command::new(CommandType::ListAllDataSources)
            .with_input(InputKey::CaseFolderPath, case_dir.display().to_string())
    };

    assert_eq!(ws.run(vec![list_command()]), 0);
    let first = std::fs::read_to_string(
        case_dir
            .join(COMMAND_OUTPUT_DIR)
            .join("list_all_data_sources.txt"),
    )
    .unwrap();

    assert_eq!(ws.run(vec![list_command()]), 0);
    let second = std::fs::read_to_string(
        case_dir
            .join(COMMAND_OUTPUT_DIR)
            .join("list_all_data_sources.txt"),
    )
    .unwrap();

    assert_eq!(first, second);
}

#[test]
fn empty_command_list_exits_with_failure() {
    let ws = Workspace::new();
    assert_eq!(ws.run(vec![]), 1);
}
