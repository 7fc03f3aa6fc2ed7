//! Orchestration phases and the hooks that observe them.

use std::time::Duration;

use lcommon::SessionId;

use crate::{ChatError, StopCondition};

/// States of one orchestration run, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrchestrationPhase {
    AwaitingModel,
    ModelResponded,
    HasToolCalls,
    ExecutingTools,
    Final,
    Done,
}

impl OrchestrationPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingModel => "awaiting_model",
            Self::ModelResponded => "model_responded",
            Self::HasToolCalls => "has_tool_calls",
            Self::ExecutingTools => "executing_tools",
            Self::Final => "final",
            Self::Done => "done",
        }
    }
}

pub trait OrchestratorHooks: Send + Sync {
    fn on_phase(&self, _phase: OrchestrationPhase, _session_id: &SessionId, _round: u32) {}

    fn on_run_complete(
        &self,
        _session_id: &SessionId,
        _stop: StopCondition,
        _model_calls: u32,
        _tool_rounds: u32,
        _elapsed: Duration,
    ) {
    }

    fn on_run_failure(&self, _session_id: &SessionId, _error: &ChatError, _elapsed: Duration) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOrchestratorHooks;

impl OrchestratorHooks for NoopOrchestratorHooks {}
