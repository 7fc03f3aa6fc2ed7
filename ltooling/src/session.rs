//! Per-query tool session: dispatch with timeout and hooks, plus the
//! per-tool "last sources" slots a single answer is built from.
//!
//! A session is created for one query and dropped after it, so concurrent
//! queries sharing a registry never see each other's sources.
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use lprovider::ToolSpec;
//! use ltooling::{ToolOutput, ToolRegistry};
//!
//! let mut registry = ToolRegistry::new();
//! registry
//!     .register_sync_fn(ToolSpec::new("ping", "Replies pong"), |_args, _ctx| {
//!         Ok(ToolOutput::text("pong"))
//!     })
//!     .expect("register");
//!
//! let session = Arc::new(registry)
//!     .session()
//!     .with_timeout(Duration::from_secs(10));
//!
//! assert!(session.collect_sources().is_empty());
//! session.clear_sources();
//! session.clear_sources();
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use futures_timer::Delay;
use futures_util::future::{Either, select};
use lprovider::ToolCallRequest;

use crate::{
    NoopToolRuntimeHooks, SourceRecord, ToolError, ToolExecutionContext, ToolOutput,
    ToolRegistry, ToolRuntimeHooks,
};

pub struct ToolSession {
    registry: Arc<ToolRegistry>,
    slots: Mutex<Vec<(String, Vec<SourceRecord>)>>,
    timeout: Option<Duration>,
    hooks: Arc<dyn ToolRuntimeHooks>,
}

impl ToolSession {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        let slots = registry
            .names()
            .map(|name| (name.to_string(), Vec::new()))
            .collect();

        Self {
            registry,
            slots: Mutex::new(slots),
            timeout: None,
            hooks: Arc::new(NoopToolRuntimeHooks),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_optional_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Dispatches one model-requested call.
    ///
    /// On success the tool's source slot is overwritten with the output's
    /// sources; failures leave every slot untouched.
    pub async fn dispatch(
        &self,
        call: &ToolCallRequest,
        context: &ToolExecutionContext,
    ) -> Result<ToolOutput, ToolError> {
        let context = context.clone().with_tool_call_id(call.id.clone());
        self.hooks.on_execution_start(call, &context);
        let started_at = Instant::now();

        let execution = Box::pin(self.registry.dispatch(&call.name, &call.arguments, &context));
        let result = match self.timeout {
            Some(timeout) => match select(execution, Delay::new(timeout)).await {
                Either::Left((result, _)) => result,
                Either::Right(_) => Err(ToolError::timeout(format!(
                    "tool '{}' did not finish within {}ms",
                    call.name,
                    timeout.as_millis()
                ))
                .with_tool_name(call.name.clone())),
            },
            None => execution.await,
        };

        let elapsed = started_at.elapsed();
        match result {
            Ok(output) => {
                self.record_sources(&call.name, &output.sources);
                self.hooks
                    .on_execution_success(call, &context, &output, elapsed);
                Ok(output)
            }
            Err(error) => {
                let error = error.with_tool_call_id(call.id.clone());
                self.hooks
                    .on_execution_failure(call, &context, &error, elapsed);
                Err(error)
            }
        }
    }

    /// Sources from the first tool, in registration order, whose slot is
    /// non-empty. Slots are not merged: if two tools both recorded sources
    /// during a query, only the earlier-registered tool's are returned.
    pub fn collect_sources(&self) -> Vec<SourceRecord> {
        self.slots()
            .iter()
            .find(|(_, sources)| !sources.is_empty())
            .map(|(_, sources)| sources.clone())
            .unwrap_or_default()
    }

    /// Empties every slot. Safe to call repeatedly.
    pub fn clear_sources(&self) {
        for (_, sources) in self.slots().iter_mut() {
            sources.clear();
        }
    }

    fn record_sources(&self, tool_name: &str, sources: &[SourceRecord]) {
        if let Some((_, slot)) = self
            .slots()
            .iter_mut()
            .find(|(name, _)| name == tool_name)
        {
            *slot = sources.to_vec();
        }
    }

    // Slots hold plain data; a panic mid-update cannot leave them invalid.
    fn slots(&self) -> MutexGuard<'_, Vec<(String, Vec<SourceRecord>)>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ToolSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSession")
            .field("registry", &self.registry)
            .field("timeout", &self.timeout)
            .finish()
    }
}
