//! Course-materials assistant over the lectern workspace crates.
//!
//! This crate is the single dependency for most applications. It re-exports
//! the workspace crates and wires a model client, the course tools, a session
//! store and observability hooks into an [`Assistant`].
//!
//! ```rust
//! use lectern::{AssistantConfig, course_store};
//! use lectern::lcourse::{Course, CourseCatalog, Lesson};
//!
//! let catalog = CourseCatalog::new(vec![
//!     Course::new("Intro to MCP")
//!         .lesson(Lesson::new(1, "Servers").with_content("Servers expose tools.")),
//! ]);
//! let store = course_store(&AssistantConfig::default(), catalog)?;
//! assert_eq!(store.course_titles(), ["Intro to MCP"]);
//! # Ok::<(), lectern::AssistantError>(())
//! ```

mod assistant;
mod config;
mod error;

pub mod prelude;
pub mod prompt;
pub mod providers;
pub mod runtime;

pub use lchat;
pub use lcommon;
pub use lcourse;
pub use lmemory;
pub use lobserve;
pub use lprovider;
pub use ltooling;

pub use assistant::{AnswerResult, Assistant};
pub use config::{
    AssistantConfig, DEFAULT_MODEL, ENV_API_KEY, ENV_MAX_HISTORY, ENV_MAX_RESULTS,
    ENV_MAX_TOOL_ROUNDS, ENV_MODEL, ENV_MODEL_TIMEOUT_SECS, ENV_OBSERVABILITY, ENV_SESSION_DB,
    ENV_TOOL_TIMEOUT_SECS, ObservabilityMode,
};
pub use error::{AssistantError, AssistantErrorKind};
pub use prompt::{DEFAULT_QUERY_PREFIX, DEFAULT_SYSTEM_PROMPT};
pub use providers::build_client;
pub use runtime::{
    ObservabilityHooks, build_assistant, build_assistant_with, build_assistant_with_sessions,
    course_store,
};

pub use lchat::{
    ChatError, ChatErrorKind, ConversationContext, OrchestrationOutcome, OrchestrationRequest,
    OrchestratorPolicy, StopCondition, ToolCallOrchestrator,
};
pub use lcommon::{BoxFuture, SessionId, TraceId};
pub use lcourse::{
    Course, CourseCatalog, CourseOutline, CourseStore, InMemoryCourseStore, Lesson, StoreError,
};
pub use lmemory::{
    InMemorySessionStore, MemoryError, SessionStore, SessionStoreConfig, SqliteSessionStore,
};
pub use lprovider::{ModelClient, ProviderError, ProviderErrorKind, ProviderId};
pub use ltooling::{SourceRecord, ToolError, ToolRegistry};
