//! Analysis engine capability interface and the local thread-backed
//! implementation.
//!
//! The engine is a black box to the pipeline: it starts an
//! asynchronous job over case content and reports completion or
//! cancellation through registered listeners.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info, warn};

use crate::db::ContentRow;

use super::modules::IngestModule;
use super::settings::AnalysisSettings;

/// Identifier handed out when a listener registers.
pub type ListenerId = u64;

/// Terminal and non-terminal job events broadcast to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobEventKind {
    Started,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
pub struct JobEvent {
    pub job_id: u64,
    pub kind: JobEventKind,
}

/// Why a job, or one of its data sources, was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationReason {
    NotCancelled,
    UserCancelled,
    IngestModulesStartupFailed,
    ResourcesUnavailable,
    OutOfDiskSpace,
    ServicesDown,
    CaseClosed,
}

impl CancellationReason {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NotCancelled => "not cancelled",
            Self::UserCancelled => "cancelled by user",
            Self::IngestModulesStartupFailed => "ingest modules startup failed",
            Self::ResourcesUnavailable => "resources unavailable",
            Self::OutOfDiskSpace => "out of disk space",
            Self::ServicesDown => "services down",
            Self::CaseClosed => "case closed",
        }
    }
}

/// Per-data-source outcome inside a job snapshot.
#[derive(Debug, Clone)]
pub struct DataSourceSnapshot {
    pub data_source: String,
    pub cancelled: bool,
    pub cancellation_reason: CancellationReason,
    pub cancelled_modules: Vec<String>,
}

/// Snapshot of a job's progress, taken after a terminal event.
#[derive(Debug, Clone, Default)]
pub struct JobSnapshot {
    pub data_source_snapshots: Vec<DataSourceSnapshot>,
}

/// A module that failed to start.
#[derive(Debug, Clone)]
pub struct ModuleError {
    pub module_name: String,
    pub message: String,
}

/// A running (or finished) analysis job.
pub struct AnalysisJob {
    id: u64,
    snapshot: Mutex<JobSnapshot>,
}

impl AnalysisJob {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            snapshot: Mutex::new(JobSnapshot::default()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn snapshot(&self) -> JobSnapshot {
        self.snapshot
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn set_snapshot(&self, snapshot: JobSnapshot) {
        if let Ok(mut guard) = self.snapshot.lock() {
            *guard = snapshot;
        }
    }
}

/// Result of asking the engine to start a job.
pub struct JobStartResult {
    pub job: Option<Arc<AnalysisJob>>,
    pub module_errors: Vec<ModuleError>,
    pub startup_error: Option<String>,
}

/// The asynchronous analysis subsystem, consumed through a narrow
/// interface: start a job, observe terminal events via listeners.
pub trait AnalysisEngine: Send + Sync {
    /// Names of every registered ingest module.
    fn module_names(&self) -> Vec<String>;

    /// Registers a job event listener; events arrive on the returned
    /// channel until the listener is removed.
    fn add_job_event_listener(&self) -> (ListenerId, Receiver<JobEvent>);

    fn remove_job_event_listener(&self, id: ListenerId);

    /// Starts a job over `content`. A job may fail to start: either
    /// with per-module startup errors or with an engine-level failure.
    fn begin_job(&self, content: &[ContentRow], settings: &AnalysisSettings) -> JobStartResult;
}

/// Thread-backed engine running registered ingest modules in-process.
pub struct LocalAnalysisEngine {
    modules: Vec<Arc<dyn IngestModule>>,
    listeners: Arc<Mutex<HashMap<ListenerId, Sender<JobEvent>>>>,
    next_listener_id: AtomicU64,
    next_job_id: AtomicU64,
}

impl LocalAnalysisEngine {
    pub fn new(modules: Vec<Arc<dyn IngestModule>>) -> Self {
        Self {
            modules,
            listeners: Arc::new(Mutex::new(HashMap::new())),
            next_listener_id: AtomicU64::new(1),
            next_job_id: AtomicU64::new(1),
        }
    }

    /// Engine with the standard module set.
    pub fn with_standard_modules() -> Self {
        Self::new(vec![Arc::new(super::modules::FileInventoryModule::new())])
    }

    fn broadcast(listeners: &Mutex<HashMap<ListenerId, Sender<JobEvent>>>, event: JobEvent) {
        if let Ok(guard) = listeners.lock() {
            for sender in guard.values() {
                // A listener that went away is not an error.
                let _ = sender.send(event);
            }
        }
    }
}

impl AnalysisEngine for LocalAnalysisEngine {
    fn module_names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name().to_string()).collect()
    }

    fn add_job_event_listener(&self) -> (ListenerId, Receiver<JobEvent>) {
        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = unbounded();
        if let Ok(mut guard) = self.listeners.lock() {
            guard.insert(id, tx);
        }
        debug!(listener = id, "Registered job event listener");
        (id, rx)
    }

    fn remove_job_event_listener(&self, id: ListenerId) {
        if let Ok(mut guard) = self.listeners.lock() {
            guard.remove(&id);
        }
        debug!(listener = id, "Removed job event listener");
    }

    fn begin_job(&self, content: &[ContentRow], settings: &AnalysisSettings) -> JobStartResult {
        let enabled: Vec<Arc<dyn IngestModule>> = self
            .modules
            .iter()
            .filter(|m| settings.enabled_modules().contains(&m.name().to_string()))
            .map(Arc::clone)
            .collect();

        let mut module_errors = Vec::new();
        for module in &enabled {
            if let Err(message) = module.startup() {
                module_errors.push(ModuleError {
                    module_name: module.name().to_string(),
                    message,
                });
            }
        }
        if !module_errors.is_empty() {
            return JobStartResult {
                job: None,
                module_errors,
                startup_error: None,
            };
        }

        let job_id = self.next_job_id.fetch_add(1, Ordering::SeqCst);
        let job = Arc::new(AnalysisJob::new(job_id));
        info!(job = job_id, modules = enabled.len(), "Starting analysis job");

        let worker_job = Arc::clone(&job);
        let listeners = Arc::clone(&self.listeners);
        let rows: Vec<ContentRow> = content.to_vec();
        thread::spawn(move || {
            Self::broadcast(
                &listeners,
                JobEvent {
                    job_id,
                    kind: JobEventKind::Started,
                },
            );

            let mut snapshots = Vec::with_capacity(rows.len());
            for row in &rows {
                for module in &enabled {
                    if let Err(message) = module.process(row) {
                        warn!(
                            module = module.name(),
                            content = %row.name,
                            message = %message,
                            "Ingest module reported an error"
                        );
                    }
                }
                snapshots.push(DataSourceSnapshot {
                    data_source: row.name.clone(),
                    cancelled: false,
                    cancellation_reason: CancellationReason::NotCancelled,
                    cancelled_modules: Vec::new(),
                });
            }

            worker_job.set_snapshot(JobSnapshot {
                data_source_snapshots: snapshots,
            });
            info!(job = job_id, "Analysis job completed");
            Self::broadcast(
                &listeners,
                JobEvent {
                    job_id,
                    kind: JobEventKind::Completed,
                },
            );
        });

        JobStartResult {
            job: Some(job),
            module_errors: Vec::new(),
            startup_error: None,
        }
    }
}
