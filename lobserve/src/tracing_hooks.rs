//! Structured `tracing` events for provider attempts, tool runs, and orchestration.
//!
//! ```rust
//! use lchat::OrchestratorHooks;
//! use lobserve::TracingObservabilityHooks;
//!
//! fn accepts_orchestrator_hooks(_hooks: &dyn OrchestratorHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_orchestrator_hooks(&hooks);
//! ```

use std::time::Duration;

use lchat::{ChatError, OrchestrationPhase, OrchestratorHooks, StopCondition};
use lcommon::SessionId;
use lprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCallRequest};
use ltooling::{ToolError, ToolExecutionContext, ToolOutput, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, attempt: u32) {
        tracing::info!(
            phase = "provider",
            event = "attempt_start",
            provider = %provider,
            operation,
            attempt
        );
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        tracing::warn!(
            phase = "provider",
            event = "retry_scheduled",
            provider = %provider,
            operation,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        tracing::info!(
            phase = "provider",
            event = "success",
            provider = %provider,
            operation,
            attempts
        );
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        tracing::error!(
            phase = "provider",
            event = "failure",
            provider = %provider,
            operation,
            attempts,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }
}

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCallRequest, context: &ToolExecutionContext) {
        tracing::info!(
            phase = "tool",
            event = "execution_start",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            session_id = %context.session_id,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str())
        );
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCallRequest,
        context: &ToolExecutionContext,
        output: &ToolOutput,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "tool",
            event = "execution_success",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            session_id = %context.session_id,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
            source_count = output.sources.len(),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCallRequest,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "tool",
            event = "execution_failure",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            session_id = %context.session_id,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }
}

impl OrchestratorHooks for TracingObservabilityHooks {
    fn on_phase(&self, phase: OrchestrationPhase, session_id: &SessionId, round: u32) {
        tracing::debug!(
            phase = "orchestrator",
            event = "phase",
            orchestration_phase = phase.as_str(),
            session_id = %session_id,
            round
        );
    }

    fn on_run_complete(
        &self,
        session_id: &SessionId,
        stop: StopCondition,
        model_calls: u32,
        tool_rounds: u32,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "orchestrator",
            event = "run_complete",
            session_id = %session_id,
            stop = stop.as_str(),
            model_calls,
            tool_rounds,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_run_failure(&self, session_id: &SessionId, error: &ChatError, elapsed: Duration) {
        tracing::error!(
            phase = "orchestrator",
            event = "run_failure",
            session_id = %session_id,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }
}
