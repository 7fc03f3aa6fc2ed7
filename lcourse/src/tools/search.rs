use std::sync::Arc;

use lprovider::{ParameterKind, ParameterSpec, ToolSpec};
use ltooling::{
    SourceRecord, Tool, ToolError, ToolExecutionContext, ToolFuture, ToolOutput, optional_string,
    optional_u32, required_string,
};
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::store::{CourseStore, SearchQuery, SearchResults};

pub const SEARCH_TOOL_NAME: &str = "search_course_content";

/// Content search over course material with optional course and lesson filters.
pub struct CourseSearchTool {
    store: Arc<dyn CourseStore>,
}

impl CourseSearchTool {
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }

    pub fn spec() -> ToolSpec {
        ToolSpec::new(
            SEARCH_TOOL_NAME,
            "Search course materials with smart course name matching and lesson filtering",
        )
        .parameter(ParameterSpec::required(
            "query",
            ParameterKind::String,
            "What to search for in the course content",
        ))
        .parameter(ParameterSpec::optional(
            "course_name",
            ParameterKind::String,
            "Course title (partial matches work, e.g. 'MCP', 'Introduction')",
        ))
        .parameter(ParameterSpec::optional(
            "lesson_number",
            ParameterKind::Integer,
            "Specific lesson number to search within (e.g. 1, 2, 3)",
        ))
    }

    async fn run(&self, query: SearchQuery) -> Result<ToolOutput, ToolError> {
        let results = match self.store.search(&query).await {
            Ok(results) => results,
            Err(error) => return Ok(ToolOutput::text(error.message)),
        };

        if results.is_empty() {
            return Ok(ToolOutput::text(no_results_message(&query)));
        }

        self.format_results(results).await
    }

    async fn format_results(&self, results: SearchResults) -> Result<ToolOutput, ToolError> {
        let mut blocks = Vec::with_capacity(results.len());
        let mut sources = Vec::with_capacity(results.len());

        for hit in results.hits {
            let label = match hit.lesson_number {
                Some(number) => format!("{} - Lesson {number}", hit.course_title),
                None => hit.course_title.clone(),
            };

            let link = match hit.lesson_number {
                Some(number) => self
                    .store
                    .resolve_lesson_link(&hit.course_title, number)
                    .await
                    .map_err(store_fault)?,
                None => None,
            };

            blocks.push(format!("[{label}]\n{}", hit.content));
            sources.push(SourceRecord::new(label).with_optional_link(link));
        }

        Ok(ToolOutput::text(blocks.join("\n\n")).with_sources(sources))
    }
}

impl Tool for CourseSearchTool {
    fn describe(&self) -> ToolSpec {
        Self::spec()
    }

    fn execute<'a>(
        &'a self,
        args: &'a Map<String, Value>,
        _context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolOutput, ToolError>> {
        Box::pin(async move {
            let query = SearchQuery::new(required_string(args, "query")?)
                .with_course_name(optional_string(args, "course_name")?)
                .with_lesson_number(optional_u32(args, "lesson_number")?);
            self.run(query).await
        })
    }
}

fn no_results_message(query: &SearchQuery) -> String {
    let mut message = String::from("No relevant content found");
    if let Some(course) = &query.course_name {
        message.push_str(&format!(" in course '{course}'"));
    }
    if let Some(lesson) = query.lesson_number {
        message.push_str(&format!(" in lesson {lesson}"));
    }
    message.push('.');
    message
}

pub(crate) fn store_fault(error: StoreError) -> ToolError {
    ToolError::execution(error.message)
}
