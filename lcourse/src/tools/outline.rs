use std::sync::Arc;

use lprovider::{ParameterKind, ParameterSpec, ToolSpec};
use ltooling::{
    SourceRecord, Tool, ToolError, ToolExecutionContext, ToolFuture, ToolOutput, required_string,
};
use serde_json::{Map, Value};

use crate::catalog::CourseOutline;
use crate::store::CourseStore;

pub const OUTLINE_TOOL_NAME: &str = "get_course_outline";

const NO_LINK: &str = "No link available";

/// Course title, link, and numbered lesson list for a loosely named course.
pub struct CourseOutlineTool {
    store: Arc<dyn CourseStore>,
}

impl CourseOutlineTool {
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }

    pub fn spec() -> ToolSpec {
        ToolSpec::new(
            OUTLINE_TOOL_NAME,
            "Get the complete outline of a course including course title, course link, and all \
             lessons with their numbers and titles. Use this tool when the user asks about what \
             a course covers, its structure, lessons, or outline.",
        )
        .parameter(ParameterSpec::required(
            "course_title",
            ParameterKind::String,
            "The course title to look up (partial matches work, e.g. 'MCP', 'Introduction')",
        ))
    }

    async fn run(&self, course_title: &str) -> ToolOutput {
        let resolved = match self.store.resolve_course_name(course_title).await {
            Ok(Some(title)) => title,
            Ok(None) => {
                return ToolOutput::text(format!("No course found matching '{course_title}'"));
            }
            Err(error) => return outline_error(&error.message),
        };

        match self.store.course_outline(&resolved).await {
            Ok(Some(outline)) => ToolOutput::text(format_outline(&outline)).with_source(
                SourceRecord::new(outline.title.clone()).with_optional_link(outline.link.clone()),
            ),
            Ok(None) => ToolOutput::text(format!(
                "Could not retrieve metadata for course '{resolved}'"
            )),
            Err(error) => outline_error(&error.message),
        }
    }
}

fn outline_error(message: &str) -> ToolOutput {
    ToolOutput::text(format!("Error retrieving course outline: {message}"))
}

impl Tool for CourseOutlineTool {
    fn describe(&self) -> ToolSpec {
        Self::spec()
    }

    fn execute<'a>(
        &'a self,
        args: &'a Map<String, Value>,
        _context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolOutput, ToolError>> {
        Box::pin(async move {
            let course_title = required_string(args, "course_title")?;
            Ok(self.run(&course_title).await)
        })
    }
}

pub fn format_outline(outline: &CourseOutline) -> String {
    let mut lines = vec![
        format!("Course Title: {}", outline.title),
        format!("Course Link: {}", outline.link.as_deref().unwrap_or(NO_LINK)),
        String::new(),
        format!("Lessons ({} total):", outline.lessons.len()),
    ];
    lines.extend(
        outline
            .lessons
            .iter()
            .map(|lesson| format!("  Lesson {}: {}", lesson.number, lesson.title)),
    );
    lines.join("\n")
}
