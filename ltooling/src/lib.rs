//! Capability layer for registering, describing, and dispatching tools.

mod args;
mod error;
mod hooks;
mod registry;
mod session;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        FunctionTool, RegistrationPolicy, SourceRecord, Tool, ToolError, ToolErrorKind,
        ToolExecutionContext, ToolFuture, ToolOutput, ToolRegistry, ToolRuntimeHooks,
        ToolSession,
    };
}

pub use args::{missing_required, optional_string, optional_u32, required_string};
pub use error::{ToolError, ToolErrorKind};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use registry::{RegistrationPolicy, ToolRegistry};
pub use session::ToolSession;
pub use tool::{FunctionTool, Tool, ToolFuture};
pub use types::{SourceRecord, ToolExecutionContext, ToolOutput};
