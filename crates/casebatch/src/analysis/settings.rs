//! Ingest job settings.
//!
//! Settings are loaded from a per-context JSON file. Problems found
//! while loading accumulate as warnings instead of hard errors; the
//! batch pipeline treats any warning as fatal before a job starts,
//! unlike an interactive run which would surface them to the user.

use std::path::Path;

use serde::Deserialize;

/// Execution context of unattended batch runs.
pub const BATCH_CONTEXT: &str = "batch";

const SETTINGS_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Deserialize)]
struct SettingsFile {
    version: String,
    #[serde(default)]
    enabled_modules: Vec<String>,
}

/// Resolved ingest job settings for one execution context.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    context: String,
    enabled_modules: Vec<String>,
    warnings: Vec<String>,
}

impl AnalysisSettings {
    /// Loads settings for `context` from `<settings_dir>/<context>.json`.
    ///
    /// A missing file is not a problem: every known module is enabled
    /// by default. An unreadable or invalid file, an unknown module
    /// name, or an explicitly empty module list each add a warning.
    pub fn load(context: &str, settings_dir: &Path, known_modules: &[String]) -> Self {
        let mut warnings = Vec::new();
        let path = settings_dir.join(format!("{}.json", context));

        let enabled_modules = if path.is_file() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str::<SettingsFile>(&content) {
                    Ok(file) => {
                        if file.version != SETTINGS_SCHEMA_VERSION {
                            warnings.push(format!(
                                "Unsupported settings version '{}' in {}",
                                file.version,
                                path.display()
                            ));
                        }
                        for module in &file.enabled_modules {
                            if !known_modules.contains(module) {
                                warnings.push(format!("Unknown ingest module '{}'", module));
                            }
                        }
                        if file.enabled_modules.is_empty() {
                            warnings.push("No ingest modules enabled".to_string());
                        }
                        file.enabled_modules
                    }
                    Err(e) => {
                        warnings.push(format!(
                            "Failed to parse settings file {}: {}",
                            path.display(),
                            e
                        ));
                        Vec::new()
                    }
                },
                Err(e) => {
                    warnings.push(format!(
                        "Failed to read settings file {}: {}",
                        path.display(),
                        e
                    ));
                    Vec::new()
                }
            }
        } else {
            known_modules.to_vec()
        };

        Self {
            context: context.to_string(),
            enabled_modules,
            warnings,
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn enabled_modules(&self) -> &[String] {
        &self.enabled_modules
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}
