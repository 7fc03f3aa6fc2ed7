//! Per-query flow: history in, bounded tool loop, sources out, exchange recorded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lchat::{OrchestrationRequest, StopCondition, ToolCallOrchestrator};
use lcommon::SessionId;
use lmemory::SessionStore;
use ltooling::SourceRecord;

use crate::AssistantError;
use crate::prompt::{DEFAULT_QUERY_PREFIX, frame_query};

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerResult {
    pub answer: String,
    /// Sources cited by this query's tools only.
    pub sources: Vec<SourceRecord>,
    pub session_id: SessionId,
    pub stop: StopCondition,
    pub model_calls: u32,
    pub tool_rounds: u32,
    /// History load or save failures. The answer is still returned; the
    /// exchange may be missing from the session.
    pub session_errors: Vec<AssistantError>,
}

pub struct Assistant {
    orchestrator: ToolCallOrchestrator,
    sessions: Arc<dyn SessionStore>,
    query_prefix: String,
    queries: AtomicU64,
}

impl Assistant {
    pub fn new(orchestrator: ToolCallOrchestrator, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            orchestrator,
            sessions,
            query_prefix: DEFAULT_QUERY_PREFIX.to_string(),
            queries: AtomicU64::new(0),
        }
    }

    pub fn with_query_prefix(mut self, query_prefix: impl Into<String>) -> Self {
        self.query_prefix = query_prefix.into();
        self
    }

    pub fn orchestrator(&self) -> &ToolCallOrchestrator {
        &self.orchestrator
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Answers `query` within `session_id`, creating a session when none is
    /// given. Sources are harvested from a session private to this call and
    /// cleared before returning, whether or not the run succeeded.
    ///
    /// Only a blank query, a failed session creation, or a failed model run
    /// is an error. History that cannot be loaded or saved is reported in
    /// [`AnswerResult::session_errors`].
    pub async fn answer(
        &self,
        query: &str,
        session_id: Option<SessionId>,
    ) -> Result<AnswerResult, AssistantError> {
        if query.trim().is_empty() {
            return Err(AssistantError::invalid_request("query must not be empty"));
        }

        let session_id = match session_id {
            Some(session_id) => session_id,
            None => self.sessions.create_session().await?,
        };
        let mut session_errors = Vec::new();
        let history = match self.sessions.get_history(&session_id).await {
            Ok(history) => history,
            Err(error) => {
                session_errors.push(AssistantError::from(error));
                None
            }
        };

        let sequence = self.queries.fetch_add(1, Ordering::Relaxed) + 1;
        let request =
            OrchestrationRequest::new(session_id.clone(), frame_query(&self.query_prefix, query))
                .with_optional_history(history)
                .with_trace_id(format!("{session_id}-q{sequence}"));

        let tool_session = self.orchestrator.session();
        let outcome = self
            .orchestrator
            .run_with_session(request, &tool_session)
            .await;
        let sources = tool_session.collect_sources();
        tool_session.clear_sources();
        let outcome = outcome?;

        if let Err(error) = self
            .sessions
            .append_exchange(&session_id, query, &outcome.text)
            .await
        {
            session_errors.push(AssistantError::from(error));
        }

        Ok(AnswerResult {
            answer: outcome.text,
            sources,
            session_id,
            stop: outcome.stop,
            model_calls: outcome.model_calls,
            tool_rounds: outcome.tool_rounds,
            session_errors,
        })
    }
}
