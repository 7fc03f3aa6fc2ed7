//! Bounded tool-calling loop between a model client and a tool registry.
//!
//! One run sends the query, dispatches every tool call the model asks for,
//! feeds the results back, and stops on a text-only response, after
//! `max_tool_rounds` dispatch rounds, or one model call after a round in
//! which any tool failed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_timer::Delay;
use futures_util::future::{Either, join_all, select};
use lcommon::{SessionId, TraceId};
use lprovider::{
    ModelClient, ModelRequest, ModelResponse, ToolCallRequest, ToolCallResult, ToolChoice,
    ToolSpec,
};
use ltooling::{
    NoopToolRuntimeHooks, SourceRecord, ToolError, ToolExecutionContext, ToolOutput,
    ToolRegistry, ToolRuntimeHooks, ToolSession,
};

use crate::{
    ChatError, ConversationContext, NoopOrchestratorHooks, OrchestrationPhase, OrchestratorHooks,
    OrchestratorPolicy,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestrationRequest {
    pub session_id: SessionId,
    pub query: String,
    pub history: Option<String>,
    pub trace_id: Option<TraceId>,
}

impl OrchestrationRequest {
    pub fn new(session_id: impl Into<SessionId>, query: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            query: query.into(),
            history: None,
            trace_id: None,
        }
    }

    pub fn with_history(mut self, history: impl Into<String>) -> Self {
        self.history = Some(history.into());
        self
    }

    pub fn with_optional_history(mut self, history: Option<String>) -> Self {
        self.history = history;
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCondition {
    /// The model answered without requesting tools.
    FinalAnswer,
    /// The model still wanted tools after the last allowed round.
    RoundLimit,
    /// A tool failed; the model got one call to respond to the error.
    ToolFailure,
}

impl StopCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FinalAnswer => "final_answer",
            Self::RoundLimit => "round_limit",
            Self::ToolFailure => "tool_failure",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestrationOutcome {
    pub text: String,
    pub model_calls: u32,
    pub tool_rounds: u32,
    pub stop: StopCondition,
    pub context: ConversationContext,
    pub sources: Vec<SourceRecord>,
}

pub struct ToolCallOrchestrator {
    client: Arc<dyn ModelClient>,
    registry: Arc<ToolRegistry>,
    tool_specs: Vec<ToolSpec>,
    model: String,
    system_prompt: String,
    policy: OrchestratorPolicy,
    hooks: Arc<dyn OrchestratorHooks>,
    tool_hooks: Arc<dyn ToolRuntimeHooks>,
}

impl ToolCallOrchestrator {
    pub fn builder(
        client: Arc<dyn ModelClient>,
        registry: Arc<ToolRegistry>,
        model: impl Into<String>,
    ) -> ToolCallOrchestratorBuilder {
        ToolCallOrchestratorBuilder::new(client, registry, model)
    }

    pub fn policy(&self) -> &OrchestratorPolicy {
        &self.policy
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// A fresh per-query session carrying the configured tool timeout and hooks.
    pub fn session(&self) -> ToolSession {
        self.registry
            .session()
            .with_optional_timeout(self.policy.tool_timeout)
            .with_hooks(Arc::clone(&self.tool_hooks))
    }

    /// Runs one query in its own session; sources are harvested and the
    /// session cleared before returning.
    pub async fn run(
        &self,
        request: OrchestrationRequest,
    ) -> Result<OrchestrationOutcome, ChatError> {
        let session = self.session();
        let outcome = self.run_with_session(request, &session).await;
        session.clear_sources();
        outcome
    }

    /// Runs one query against a caller-owned session. `outcome.sources` is
    /// a snapshot of `session.collect_sources()`; the session is not cleared.
    pub async fn run_with_session(
        &self,
        request: OrchestrationRequest,
        session: &ToolSession,
    ) -> Result<OrchestrationOutcome, ChatError> {
        let started_at = Instant::now();
        let session_id = request.session_id.clone();

        match self.drive(request, session).await {
            Ok(outcome) => {
                self.hooks.on_run_complete(
                    &session_id,
                    outcome.stop,
                    outcome.model_calls,
                    outcome.tool_rounds,
                    started_at.elapsed(),
                );
                Ok(outcome)
            }
            Err(error) => {
                self.hooks
                    .on_run_failure(&session_id, &error, started_at.elapsed());
                Err(error)
            }
        }
    }

    async fn drive(
        &self,
        request: OrchestrationRequest,
        session: &ToolSession,
    ) -> Result<OrchestrationOutcome, ChatError> {
        if request.query.trim().is_empty() {
            return Err(ChatError::invalid_request("query must not be empty"));
        }

        let OrchestrationRequest {
            session_id,
            query,
            history,
            trace_id,
        } = request;

        let mut context = ConversationContext::new(self.system_prompt.clone());
        if let Some(history) = history {
            context = context.with_history(history);
        }
        context.push_user(query);

        let mut tool_context = ToolExecutionContext::new(session_id.clone());
        if let Some(trace_id) = trace_id {
            tool_context = tool_context.with_trace_id(trace_id);
        }

        let mut round = 0;
        let mut model_calls = 1;
        let mut response = self.call_model(&context, &session_id, round).await?;

        let stop = loop {
            if !response.has_tool_calls() {
                break StopCondition::FinalAnswer;
            }

            if round >= self.policy.max_tool_rounds {
                break StopCondition::RoundLimit;
            }

            round += 1;
            self.hooks
                .on_phase(OrchestrationPhase::HasToolCalls, &session_id, round);

            let calls = response.tool_calls().cloned().collect::<Vec<_>>();
            context.push_assistant(response.content.clone());

            self.hooks
                .on_phase(OrchestrationPhase::ExecutingTools, &session_id, round);
            let (results, any_failed) = self.dispatch_round(session, &calls, &tool_context).await;
            context.push_tool_results(results);

            response = self.call_model(&context, &session_id, round).await?;
            model_calls += 1;

            if any_failed {
                break StopCondition::ToolFailure;
            }
        };

        self.hooks
            .on_phase(OrchestrationPhase::Final, &session_id, round);
        let text = response.first_text().unwrap_or_default().to_string();
        self.hooks
            .on_phase(OrchestrationPhase::Done, &session_id, round);

        Ok(OrchestrationOutcome {
            text,
            model_calls,
            tool_rounds: round,
            stop,
            context,
            sources: session.collect_sources(),
        })
    }

    async fn call_model(
        &self,
        context: &ConversationContext,
        session_id: &SessionId,
        round: u32,
    ) -> Result<ModelResponse, ChatError> {
        self.hooks
            .on_phase(OrchestrationPhase::AwaitingModel, session_id, round);

        let request = self.build_request(context)?;
        let invocation = self.client.invoke(request);
        let response = match self.policy.model_timeout {
            Some(timeout) => match select(invocation, Delay::new(timeout)).await {
                Either::Left((result, _)) => result?,
                Either::Right(_) => {
                    return Err(ChatError::timeout(format!(
                        "model call did not finish within {}ms",
                        timeout.as_millis()
                    )));
                }
            },
            None => invocation.await?,
        };

        self.hooks
            .on_phase(OrchestrationPhase::ModelResponded, session_id, round);
        Ok(response)
    }

    fn build_request(&self, context: &ConversationContext) -> Result<ModelRequest, ChatError> {
        let mut builder = ModelRequest::builder(self.model.clone())
            .turns(context.turns().to_vec())
            .temperature(self.policy.temperature)
            .max_tokens(self.policy.max_tokens);

        let system = context.system_text();
        if !system.trim().is_empty() {
            builder = builder.system(system);
        }

        // Tools stay available on every call, including follow-ups.
        if !self.tool_specs.is_empty() {
            builder = builder
                .tools(self.tool_specs.clone())
                .tool_choice(ToolChoice::Auto);
        }

        builder
            .build()
            .map_err(|error| ChatError::invalid_request(error.message))
    }

    async fn dispatch_round(
        &self,
        session: &ToolSession,
        calls: &[ToolCallRequest],
        context: &ToolExecutionContext,
    ) -> (Vec<ToolCallResult>, bool) {
        let outcomes: Vec<Result<ToolOutput, ToolError>> = if self.policy.parallel_tool_calls {
            join_all(calls.iter().map(|call| session.dispatch(call, context))).await
        } else {
            let mut outcomes = Vec::with_capacity(calls.len());
            for call in calls {
                outcomes.push(session.dispatch(call, context).await);
            }
            outcomes
        };

        let mut any_failed = false;
        let mut results = Vec::with_capacity(calls.len());
        for (call, outcome) in calls.iter().zip(outcomes) {
            match outcome {
                Ok(output) => results.push(ToolCallResult::success(call.id.clone(), output.text)),
                Err(error) => {
                    any_failed = true;
                    results.push(ToolCallResult::failure(
                        call.id.clone(),
                        format!("Error: {}", error.message),
                    ));
                }
            }
        }

        (results, any_failed)
    }
}

impl std::fmt::Debug for ToolCallOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolCallOrchestrator")
            .field("provider", &self.client.id())
            .field("model", &self.model)
            .field("registry", &self.registry)
            .field("policy", &self.policy)
            .finish()
    }
}

pub struct ToolCallOrchestratorBuilder {
    client: Arc<dyn ModelClient>,
    registry: Arc<ToolRegistry>,
    model: String,
    system_prompt: String,
    policy: OrchestratorPolicy,
    hooks: Arc<dyn OrchestratorHooks>,
    tool_hooks: Arc<dyn ToolRuntimeHooks>,
}

impl ToolCallOrchestratorBuilder {
    pub fn new(
        client: Arc<dyn ModelClient>,
        registry: Arc<ToolRegistry>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            registry,
            model: model.into(),
            system_prompt: String::new(),
            policy: OrchestratorPolicy::default(),
            hooks: Arc::new(NoopOrchestratorHooks),
            tool_hooks: Arc::new(NoopToolRuntimeHooks),
        }
    }

    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn policy(mut self, policy: OrchestratorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn max_tool_rounds(mut self, max_tool_rounds: u32) -> Self {
        self.policy.max_tool_rounds = max_tool_rounds;
        self
    }

    pub fn model_timeout(mut self, timeout: Duration) -> Self {
        self.policy.model_timeout = Some(timeout);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn OrchestratorHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn tool_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.tool_hooks = hooks;
        self
    }

    pub fn build(self) -> Result<ToolCallOrchestrator, ChatError> {
        self.policy.validate()?;
        if self.model.trim().is_empty() {
            return Err(ChatError::invalid_request("model must not be empty"));
        }

        Ok(ToolCallOrchestrator {
            client: self.client,
            tool_specs: self.registry.specs(),
            registry: self.registry,
            model: self.model,
            system_prompt: self.system_prompt,
            policy: self.policy,
            hooks: self.hooks,
            tool_hooks: self.tool_hooks,
        })
    }
}
