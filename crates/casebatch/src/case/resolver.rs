//! Case directory resolution.
//!
//! Case directories live under a base directory as
//! `<caseName>_<timestamp>`. Creation enforces case-name uniqueness by
//! searching for an existing directory first; opening locates the
//! single metadata file directly inside a case directory.
//!
//! The search-then-create uniqueness check is not atomic against
//! concurrent external case creation; the base directory is not
//! locked.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::info;

use super::timestamp;
use super::{Case, CASE_METADATA_EXTENSION};
use crate::error::CaseError;

/// Creates a brand-new case under `base_dir`.
///
/// Fails with [`CaseError::NameNotUnique`] if any case directory for
/// `case_name` already exists under `base_dir`.
pub fn create_case(base_dir: &Path, case_name: &str) -> Result<Case, CaseError> {
    validate_case_name(case_name)?;

    info!(case = case_name, base_dir = %base_dir.display(), "Creating case");

    if find_case_directory(base_dir, case_name).is_some() {
        return Err(CaseError::NameNotUnique(case_name.to_string()));
    }

    let folder_name = format!("{}_{}", case_name, timestamp::create_time_stamp());
    let case_dir = base_dir.join(folder_name);
    std::fs::create_dir_all(&case_dir).map_err(|e| CaseError::CreateDirectory {
        path: case_dir.clone(),
        source: e,
    })?;

    Case::create(&case_dir, case_name)
}

/// Opens an existing case from its directory.
pub fn open_case(case_dir: &Path) -> Result<Case, CaseError> {
    info!(directory = %case_dir.display(), "Opening case");

    let metadata_path = find_metadata_file(case_dir)?;
    Case::open(&metadata_path)
}

/// Finds the case-metadata file directly inside `case_dir`.
///
/// Picks the first file whose extension matches the case-metadata
/// extension, compared case-insensitively. Directory entries are
/// sorted by name so the choice is deterministic.
pub fn find_metadata_file(case_dir: &Path) -> Result<PathBuf, CaseError> {
    if !case_dir.is_dir() {
        return Err(CaseError::DirectoryNotFound(case_dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(case_dir).map_err(|e| CaseError::ReadMetadata {
        path: case_dir.to_path_buf(),
        source: e,
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_metadata_extension(path))
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| CaseError::MetadataNotFound(case_dir.to_path_buf()))
}

/// Searches `base_dir` for the most recently modified case directory
/// belonging to `case_name`.
///
/// A qualifying directory is an immediate subdirectory named
/// `<caseName>_<timestamp>` that contains at least one metadata file.
/// Returns `None` when no prior case exists; that is not an error.
pub fn find_case_directory(base_dir: &Path, case_name: &str) -> Option<PathBuf> {
    let entries = std::fs::read_dir(base_dir).ok()?;

    let mut found: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(folder_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !timestamp::ends_with_time_stamp(folder_name)
            || timestamp::strip_time_stamp(folder_name) != case_name
            || !has_case_metadata_file(&path)
        {
            continue;
        }

        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        match &found {
            Some((best, _)) if modified < *best => {}
            _ => found = Some((modified, path)),
        }
    }

    found.map(|(_, path)| path)
}

fn validate_case_name(case_name: &str) -> Result<(), CaseError> {
    if case_name.is_empty()
        || case_name.contains(std::path::MAIN_SEPARATOR)
        || case_name.contains('/')
    {
        return Err(CaseError::InvalidName(case_name.to_string()));
    }
    Ok(())
}

fn has_metadata_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(CASE_METADATA_EXTENSION))
}

fn has_case_metadata_file(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .any(|e| e.path().is_file() && has_metadata_extension(&e.path()))
        })
        .unwrap_or(false)
}
