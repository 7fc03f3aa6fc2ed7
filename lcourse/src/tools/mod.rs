//! The course tools exposed to the model.

mod outline;
mod search;

use std::sync::Arc;

use ltooling::{ToolError, ToolRegistry};

use crate::store::CourseStore;

pub use outline::{CourseOutlineTool, OUTLINE_TOOL_NAME, format_outline};
pub use search::{CourseSearchTool, SEARCH_TOOL_NAME};

/// Registers the search tool, then the outline tool.
///
/// Registration order decides which tool's sources win when both cite.
pub fn register_course_tools(
    registry: &mut ToolRegistry,
    store: Arc<dyn CourseStore>,
) -> Result<(), ToolError> {
    registry.register(CourseSearchTool::new(store.clone()))?;
    registry.register(CourseOutlineTool::new(store))?;
    Ok(())
}
