//! `metrics` counters and histograms for provider, tool, and orchestration events.
//!
//! ```rust
//! use lobserve::MetricsObservabilityHooks;
//! use lprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_provider_hooks(&hooks);
//! ```

use std::time::Duration;

use lchat::{ChatError, OrchestrationPhase, OrchestratorHooks, StopCondition};
use lcommon::SessionId;
use lprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCallRequest};
use ltooling::{ToolError, ToolExecutionContext, ToolOutput, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, _attempt: u32) {
        metrics::counter!(
            "lectern_provider_attempt_start_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        _attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "lectern_provider_retry_scheduled_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "lectern_provider_retry_delay_seconds",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(delay.as_secs_f64());
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        metrics::counter!(
            "lectern_provider_success_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "lectern_provider_attempts_per_success",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "lectern_provider_failure_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "lectern_provider_attempts_per_failure",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }
}

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCallRequest, _context: &ToolExecutionContext) {
        metrics::counter!(
            "lectern_tool_execution_start_total",
            "tool_name" => tool_call.name.clone()
        )
        .increment(1);
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCallRequest,
        _context: &ToolExecutionContext,
        output: &ToolOutput,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "lectern_tool_execution_success_total",
            "tool_name" => tool_call.name.clone()
        )
        .increment(1);
        metrics::histogram!(
            "lectern_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
        metrics::histogram!(
            "lectern_tool_sources_per_execution",
            "tool_name" => tool_call.name.clone()
        )
        .record(output.sources.len() as f64);
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCallRequest,
        _context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "lectern_tool_execution_failure_total",
            "tool_name" => tool_call.name.clone(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "lectern_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}

impl OrchestratorHooks for MetricsObservabilityHooks {
    fn on_phase(&self, phase: OrchestrationPhase, _session_id: &SessionId, _round: u32) {
        metrics::counter!("lectern_orchestrator_phase_total", "phase" => phase.as_str())
            .increment(1);
    }

    fn on_run_complete(
        &self,
        _session_id: &SessionId,
        stop: StopCondition,
        model_calls: u32,
        tool_rounds: u32,
        elapsed: Duration,
    ) {
        metrics::counter!("lectern_orchestrator_run_total", "stop" => stop.as_str())
            .increment(1);
        metrics::histogram!("lectern_orchestrator_model_calls_per_run")
            .record(model_calls as f64);
        metrics::histogram!("lectern_orchestrator_tool_rounds_per_run")
            .record(tool_rounds as f64);
        metrics::histogram!(
            "lectern_orchestrator_run_duration_seconds",
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_run_failure(&self, _session_id: &SessionId, error: &ChatError, elapsed: Duration) {
        metrics::counter!(
            "lectern_orchestrator_run_failure_total",
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "lectern_orchestrator_run_duration_seconds",
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}
