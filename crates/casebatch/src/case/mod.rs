//! Case model.
//!
//! A case is a named, directory-backed analysis unit: a metadata file,
//! a SQLite content database and generated command output. Cases are
//! opened exclusively by the pipeline and closed by it when the run
//! ends.

pub mod metadata;
pub mod resolver;
pub mod timestamp;

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use uuid::Uuid;

use crate::db::{event_repo, Database, DB_FILE_NAME};
use crate::error::CaseError;

pub use metadata::{CaseMetadata, CASE_METADATA_EXTENSION};

/// Case event kinds recorded in the content database.
pub const EVENT_ADDING_DATA_SOURCE: &str = "adding_data_source";
pub const EVENT_DATA_SOURCE_ADDED: &str = "data_source_added";
pub const EVENT_FAILED_ADDING_DATA_SOURCE: &str = "failed_adding_data_source";

/// An open case.
pub struct Case {
    metadata: CaseMetadata,
    directory: PathBuf,
    db: Database,
}

impl Case {
    /// Creates a brand-new case rooted at `directory`: writes the
    /// metadata file and opens a fresh content database.
    ///
    /// The directory must already exist (the resolver creates it).
    pub fn create(directory: &Path, name: &str) -> Result<Self, CaseError> {
        let metadata = CaseMetadata::new(name);
        metadata.write(directory)?;

        let db = Database::open(&directory.join(DB_FILE_NAME))?;

        info!(case = name, directory = %directory.display(), "Created case");
        Ok(Self {
            metadata,
            directory: directory.to_path_buf(),
            db,
        })
    }

    /// Opens an existing case from its metadata file.
    pub fn open(metadata_path: &Path) -> Result<Self, CaseError> {
        let metadata = CaseMetadata::read(metadata_path)?;
        let directory = metadata_path
            .parent()
            .ok_or_else(|| CaseError::DirectoryNotFound(metadata_path.to_path_buf()))?
            .to_path_buf();

        let db = Database::open(&directory.join(DB_FILE_NAME))?;

        info!(case = %metadata.name, directory = %directory.display(), "Opened case");
        Ok(Self {
            metadata,
            directory,
            db,
        })
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn display_name(&self) -> &str {
        &self.metadata.display_name
    }

    pub fn metadata(&self) -> &CaseMetadata {
        &self.metadata
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Notifies the case that a data source is being added under `task_id`.
    pub fn notify_adding_data_source(&self, task_id: Uuid) -> Result<(), CaseError> {
        debug!(case = %self.metadata.name, task = %task_id, "Adding data source");
        event_repo::insert(&self.db, EVENT_ADDING_DATA_SOURCE, &task_id.to_string())?;
        Ok(())
    }

    /// Notifies the case that the data source for `task_id` was added.
    pub fn notify_data_source_added(&self, task_id: Uuid) -> Result<(), CaseError> {
        debug!(case = %self.metadata.name, task = %task_id, "Data source added");
        event_repo::insert(&self.db, EVENT_DATA_SOURCE_ADDED, &task_id.to_string())?;
        Ok(())
    }

    /// Notifies the case that adding the data source for `task_id` failed.
    pub fn notify_failed_adding_data_source(&self, task_id: Uuid) -> Result<(), CaseError> {
        debug!(case = %self.metadata.name, task = %task_id, "Failed adding data source");
        event_repo::insert(&self.db, EVENT_FAILED_ADDING_DATA_SOURCE, &task_id.to_string())?;
        Ok(())
    }

    /// Closes the case. The underlying database connection is released
    /// when the handle drops.
    pub fn close(self) {
        info!(case = %self.metadata.name, "Closed case");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::content_repo;
    use tempfile::TempDir;

    #[test]
    fn test_create_writes_metadata_and_database() {
        let dir = TempDir::new().unwrap();
        let case = Case::create(dir.path(), "CaseA").unwrap();

        assert_eq!(case.name(), "CaseA");
        assert_eq!(case.directory(), dir.path());
        assert!(dir.path().join("CaseA.case").exists());
        assert!(dir.path().join(DB_FILE_NAME).exists());
    }

    #[test]
    fn test_open_round_trip() {
        let dir = TempDir::new().unwrap();
        {
            let case = Case::create(dir.path(), "CaseA").unwrap();
            content_repo::insert(case.db(), "disk.img", "/tmp/disk.img", "dev").unwrap();
            case.close();
        }

        let case = Case::open(&dir.path().join("CaseA.case")).unwrap();
        assert_eq!(case.name(), "CaseA");
        let rows = content_repo::list_all(case.db()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "disk.img");
    }

    #[test]
    fn test_notifications_are_recorded() {
        let dir = TempDir::new().unwrap();
        let case = Case::create(dir.path(), "CaseA").unwrap();

        let task = Uuid::new_v4();
        case.notify_adding_data_source(task).unwrap();
        case.notify_data_source_added(task).unwrap();

        let events = event_repo::list_by_task(case.db(), &task.to_string()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EVENT_ADDING_DATA_SOURCE);
        assert_eq!(events[1].kind, EVENT_DATA_SOURCE_ADDED);
    }
}
