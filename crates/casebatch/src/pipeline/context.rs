//! Mutable state threaded through one pipeline run.

use crate::case::Case;
use crate::ingest::DataSource;

/// Where the pipeline currently is. Transitions are forward-only and
/// driven solely by the command being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    CaseOpen,
    DataSourceResolved,
    AnalysisRunning,
    Done,
    Failed,
}

/// The "current case" / "current data source" context.
///
/// Once a case is attached it is never replaced within a run; once a
/// data source is attached, later commands reuse it instead of
/// re-resolving.
pub struct PipelineContext {
    pub state: PipelineState,
    pub case: Option<Case>,
    pub data_source: Option<DataSource>,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self {
            state: PipelineState::Idle,
            case: None,
            data_source: None,
        }
    }

    pub fn attach_case(&mut self, case: Case) {
        debug_assert!(self.case.is_none(), "case is never replaced within a run");
        self.case = Some(case);
        if self.state == PipelineState::Idle {
            self.state = PipelineState::CaseOpen;
        }
    }

    pub fn attach_data_source(&mut self, data_source: DataSource) {
        self.data_source = Some(data_source);
        self.state = PipelineState::DataSourceResolved;
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new()
    }
}
