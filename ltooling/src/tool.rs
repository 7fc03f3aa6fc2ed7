//! Tool trait contract for registry-managed capabilities.
//!
//! ```rust
//! use lprovider::{ParameterKind, ParameterSpec, ToolSpec};
//! use ltooling::{FunctionTool, Tool, ToolOutput, required_string};
//!
//! let tool = FunctionTool::new(
//!     ToolSpec::new("echo", "Echoes the query").parameter(ParameterSpec::required(
//!         "query",
//!         ParameterKind::String,
//!         "Text to echo",
//!     )),
//!     |args, _ctx| async move { Ok(ToolOutput::text(required_string(&args, "query")?)) },
//! );
//!
//! assert_eq!(tool.describe().name, "echo");
//! ```

use std::future::Future;
use std::sync::Arc;

use lcommon::BoxFuture;
use lprovider::ToolSpec;
use serde_json::{Map, Value};

use crate::{ToolError, ToolExecutionContext, ToolOutput};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

/// A named capability the model may request.
///
/// Problems the model can correct (an unknown course, no matching content)
/// should come back as `Ok` text so the model can read them. `Err` is for
/// faults the tool could not handle.
pub trait Tool: Send + Sync {
    fn describe(&self) -> ToolSpec;

    fn execute<'a>(
        &'a self,
        args: &'a Map<String, Value>,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolOutput, ToolError>>;
}

type ToolHandler = dyn Fn(
        Map<String, Value>,
        ToolExecutionContext,
    ) -> ToolFuture<'static, Result<ToolOutput, ToolError>>
    + Send
    + Sync;

pub struct FunctionTool {
    spec: ToolSpec,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    pub fn new<F, Fut>(spec: ToolSpec, handler: F) -> Self
    where
        F: Fn(Map<String, Value>, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutput, ToolError>> + Send + 'static,
    {
        let handler: Arc<ToolHandler> =
            Arc::new(move |args, context| Box::pin(handler(args, context)));

        Self { spec, handler }
    }
}

impl Tool for FunctionTool {
    fn describe(&self) -> ToolSpec {
        self.spec.clone()
    }

    fn execute<'a>(
        &'a self,
        args: &'a Map<String, Value>,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolOutput, ToolError>> {
        (self.handler)(args.clone(), context.clone())
    }
}
