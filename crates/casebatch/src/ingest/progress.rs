//! Data source processor progress reporting.

/// Progress sink handed to data source processors.
pub trait ProgressMonitor: Send + Sync {
    fn set_indeterminate(&self, indeterminate: bool);
    fn set_progress(&self, progress: i32);
    fn set_progress_text(&self, text: &str);
}

/// Inert monitor for batch runs; there is no mechanism for showing
/// processor progress without an interactive user.
pub struct SilentProgress;

impl ProgressMonitor for SilentProgress {
    fn set_indeterminate(&self, _indeterminate: bool) {}

    fn set_progress(&self, _progress: i32) {}

    fn set_progress_text(&self, _text: &str) {}
}
