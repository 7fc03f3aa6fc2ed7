//! Tool-calling orchestration over a model client and a tool registry.
//!
//! ```rust
//! use lchat::{OrchestrationRequest, StopCondition};
//!
//! let request = OrchestrationRequest::new("session_1", "Outline the MCP course")
//!     .with_history("User: hi\nAssistant: hello");
//!
//! assert_eq!(request.session_id.as_str(), "session_1");
//! assert_eq!(StopCondition::RoundLimit.as_str(), "round_limit");
//! ```

mod context;
mod error;
mod hooks;
mod orchestrator;
mod policy;

pub mod prelude {
    pub use crate::{
        ChatError, ChatErrorKind, ConversationContext, OrchestrationOutcome, OrchestrationPhase,
        OrchestrationRequest, OrchestratorHooks, OrchestratorPolicy, StopCondition,
        ToolCallOrchestrator, ToolCallOrchestratorBuilder,
    };
    pub use lcommon::{MetadataMap, SessionId, TraceId};
    pub use ltooling::{
        SourceRecord, Tool, ToolError, ToolErrorKind, ToolExecutionContext, ToolOutput,
        ToolRegistry, ToolSession,
    };
}

pub use context::ConversationContext;
pub use error::{ChatError, ChatErrorKind};
pub use hooks::{NoopOrchestratorHooks, OrchestrationPhase, OrchestratorHooks};
pub use orchestrator::{
    OrchestrationOutcome, OrchestrationRequest, StopCondition, ToolCallOrchestrator,
    ToolCallOrchestratorBuilder,
};
pub use policy::{DEFAULT_MAX_TOOL_ROUNDS, MAX_TOOL_ROUNDS, OrchestratorPolicy};
