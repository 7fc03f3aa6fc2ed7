//! Tool registry: name-keyed, registration-ordered tool lookup and dispatch.
//!
//! ```rust
//! use lprovider::ToolSpec;
//! use ltooling::{ToolErrorKind, ToolOutput, ToolRegistry};
//!
//! let mut registry = ToolRegistry::new();
//! registry
//!     .register_sync_fn(ToolSpec::new("ping", "Replies pong"), |_args, _ctx| {
//!         Ok(ToolOutput::text("pong"))
//!     })
//!     .expect("first registration succeeds");
//!
//! let duplicate = registry
//!     .register_sync_fn(ToolSpec::new("ping", "Again"), |_args, _ctx| Ok(ToolOutput::default()))
//!     .expect_err("duplicate names are rejected by default");
//! assert_eq!(duplicate.kind, ToolErrorKind::Configuration);
//! ```

use std::future::Future;
use std::sync::Arc;

use lcommon::Registry;
use lprovider::ToolSpec;
use serde_json::{Map, Value};

use crate::args::ensure_required;
use crate::{FunctionTool, Tool, ToolError, ToolExecutionContext, ToolOutput, ToolSession};

/// What `register` does when a name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationPolicy {
    #[default]
    RejectDuplicates,
    /// Last registration wins; the replaced tool keeps its position.
    ReplaceExisting,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Registry<String, Arc<dyn Tool>>,
    policy: RegistrationPolicy,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: RegistrationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RegistrationPolicy {
        self.policy
    }

    pub fn register<T>(&mut self, tool: T) -> Result<(), ToolError>
    where
        T: Tool + 'static,
    {
        self.register_arc(Arc::new(tool))
    }

    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.describe().name;
        if name.trim().is_empty() {
            return Err(ToolError::configuration("tool name must not be empty"));
        }

        if self.policy == RegistrationPolicy::RejectDuplicates && self.tools.contains_key(&name) {
            return Err(ToolError::configuration(format!(
                "tool '{name}' is already registered"
            ))
            .with_tool_name(name));
        }

        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn register_fn<F, Fut>(&mut self, spec: ToolSpec, handler: F) -> Result<(), ToolError>
    where
        F: Fn(Map<String, Value>, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutput, ToolError>> + Send + 'static,
    {
        self.register(FunctionTool::new(spec, handler))
    }

    pub fn register_sync_fn<F>(&mut self, spec: ToolSpec, handler: F) -> Result<(), ToolError>
    where
        F: Fn(Map<String, Value>, ToolExecutionContext) -> Result<ToolOutput, ToolError>
            + Send
            + Sync
            + 'static,
    {
        self.register_fn(spec, move |args, context| {
            let output = handler(args, context);
            async move { output }
        })
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tool names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Specs in registration order, ready to advertise to the model.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|tool| tool.describe()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Runs the named tool.
    ///
    /// An unregistered name is not an error: the model gets the text
    /// `Tool '<name>' not found` back and may recover. Missing required
    /// parameters fail with `InvalidArguments` before the tool runs.
    pub async fn dispatch(
        &self,
        name: &str,
        args: &Map<String, Value>,
        context: &ToolExecutionContext,
    ) -> Result<ToolOutput, ToolError> {
        let Some(tool) = self.get(name) else {
            return Ok(ToolOutput::text(format!("Tool '{name}' not found")));
        };

        ensure_required(&tool.describe(), args)?;

        tool.execute(args, context).await.map_err(|error| {
            if error.tool_name.is_some() {
                error
            } else {
                error.with_tool_name(name)
            }
        })
    }

    /// Starts a per-query session holding this query's source slots.
    pub fn session(self: &Arc<Self>) -> ToolSession {
        ToolSession::new(Arc::clone(self))
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names().collect::<Vec<_>>())
            .field("policy", &self.policy)
            .finish()
    }
}
