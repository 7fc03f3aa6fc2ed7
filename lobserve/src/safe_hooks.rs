use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use lchat::{ChatError, OrchestrationPhase, OrchestratorHooks, StopCondition};
use lcommon::SessionId;
use lprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCallRequest};
use ltooling::{ToolError, ToolExecutionContext, ToolOutput, ToolRuntimeHooks};

pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ProviderOperationHooks for SafeProviderHooks<H>
where
    H: ProviderOperationHooks,
{
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, attempt: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_attempt_start(provider, operation, attempt)
        }));
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_retry_scheduled(provider, operation, attempt, delay, error)
        }));
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_success(provider, operation, attempts)
        }));
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_failure(provider, operation, attempts, error)
        }));
    }
}

pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ToolRuntimeHooks for SafeToolHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_execution_start(&self, tool_call: &ToolCallRequest, context: &ToolExecutionContext) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_execution_start(tool_call, context)
        }));
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCallRequest,
        context: &ToolExecutionContext,
        output: &ToolOutput,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_success(tool_call, context, output, elapsed)
        }));
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCallRequest,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_failure(tool_call, context, error, elapsed)
        }));
    }
}

pub struct SafeOrchestratorHooks<H> {
    inner: H,
}

impl<H> SafeOrchestratorHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> OrchestratorHooks for SafeOrchestratorHooks<H>
where
    H: OrchestratorHooks,
{
    fn on_phase(&self, phase: OrchestrationPhase, session_id: &SessionId, round: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_phase(phase, session_id, round)
        }));
    }

    fn on_run_complete(
        &self,
        session_id: &SessionId,
        stop: StopCondition,
        model_calls: u32,
        tool_rounds: u32,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_run_complete(session_id, stop, model_calls, tool_rounds, elapsed)
        }));
    }

    fn on_run_failure(&self, session_id: &SessionId, error: &ChatError, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_run_failure(session_id, error, elapsed)
        }));
    }
}
