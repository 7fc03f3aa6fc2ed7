use std::sync::{Arc, Mutex};

use lcommon::BoxFuture;
use lcourse::{
    Course, CourseCatalog, CourseOutline, CourseOutlineTool, CourseSearchTool, CourseStore,
    InMemoryCourseStore, Lesson, SearchQuery, SearchResults, StoreError, register_course_tools,
};
use lprovider::ToolCallRequest;
use ltooling::{SourceRecord, Tool, ToolErrorKind, ToolExecutionContext, ToolRegistry};
use serde_json::{Map, Value, json};

const CATALOG: &str = r#"{
    "courses": [
        {
            "title": "MCP: Build Rich-Context AI Apps with Anthropic",
            "link": "https://example.com/mcp",
            "instructor": "Elie Schoppik",
            "lessons": [
                {"number": 0, "title": "Introduction", "link": "https://example.com/mcp/0",
                 "content": "Welcome to the course. MCP connects models to tools."},
                {"number": 1, "title": "Why MCP", "link": "https://example.com/mcp/1",
                 "content": "Servers expose tools and resources. Clients discover servers."}
            ]
        },
        {
            "title": "Advanced Retrieval for AI with Chroma",
            "link": "https://example.com/chroma",
            "lessons": [
                {"number": 1, "title": "Overview",
                 "content": "Retrieval quality depends on embeddings. Query expansion helps retrieval."}
            ]
        }
    ]
}"#;

fn store() -> Arc<InMemoryCourseStore> {
    let catalog = CourseCatalog::from_json_str(CATALOG).expect("catalog should parse");
    Arc::new(InMemoryCourseStore::from_catalog(catalog).expect("catalog should load"))
}

fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("arguments should be an object")
}

fn context() -> ToolExecutionContext {
    ToolExecutionContext::new("session_1")
}

#[tokio::test]
async fn search_formats_hits_with_headers_and_links() {
    let tool = CourseSearchTool::new(store());

    let output = tool
        .execute(&args(json!({"query": "retrieval embeddings"})), &context())
        .await
        .expect("search should succeed");

    assert_eq!(
        output.text,
        "[Advanced Retrieval for AI with Chroma - Lesson 1]\n\
         Retrieval quality depends on embeddings. Query expansion helps retrieval."
    );
    assert_eq!(
        output.sources,
        [SourceRecord::new("Advanced Retrieval for AI with Chroma - Lesson 1")]
    );
}

#[tokio::test]
async fn search_cites_lesson_links_and_honours_filters() {
    let tool = CourseSearchTool::new(store());

    let output = tool
        .execute(
            &args(json!({"query": "tools", "course_name": "MCP", "lesson_number": 1})),
            &context(),
        )
        .await
        .expect("search should succeed");

    assert!(output.text.starts_with("[MCP: Build Rich-Context AI Apps with Anthropic - Lesson 1]\n"));
    assert_eq!(
        output.sources,
        [SourceRecord::new("MCP: Build Rich-Context AI Apps with Anthropic - Lesson 1")
            .with_link("https://example.com/mcp/1")]
    );
}

#[tokio::test]
async fn search_blocks_are_separated_by_blank_lines() {
    let tool = CourseSearchTool::new(store());

    let output = tool
        .execute(&args(json!({"query": "tools", "course_name": "mcp"})), &context())
        .await
        .expect("search should succeed");

    assert_eq!(output.text.matches("\n\n").count(), 1);
    assert_eq!(output.sources.len(), 2);
}

#[tokio::test]
async fn search_reports_missing_content_with_filters() {
    let tool = CourseSearchTool::new(store());

    let output = tool
        .execute(
            &args(json!({"query": "kubernetes", "course_name": "Chroma", "lesson_number": 1})),
            &context(),
        )
        .await
        .expect("search should succeed");

    assert_eq!(
        output.text,
        "No relevant content found in course 'Chroma' in lesson 1."
    );
    assert!(output.sources.is_empty());
}

#[tokio::test]
async fn search_reports_unknown_course_as_text() {
    let tool = CourseSearchTool::new(store());

    let output = tool
        .execute(
            &args(json!({"query": "tools", "course_name": "Underwater Basket Weaving"})),
            &context(),
        )
        .await
        .expect("search should succeed");

    assert_eq!(output.text, "No course found matching 'Underwater Basket Weaving'");
}

#[tokio::test]
async fn search_rejects_malformed_lesson_number() {
    let tool = CourseSearchTool::new(store());

    let error = tool
        .execute(
            &args(json!({"query": "tools", "lesson_number": "first"})),
            &context(),
        )
        .await
        .expect_err("non-numeric lesson should fail");

    assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
}

#[tokio::test]
async fn outline_lists_course_and_cites_course_link() {
    let tool = CourseOutlineTool::new(store());

    let output = tool
        .execute(&args(json!({"course_title": "mcp"})), &context())
        .await
        .expect("outline should succeed");

    assert_eq!(
        output.text,
        "Course Title: MCP: Build Rich-Context AI Apps with Anthropic\n\
         Course Link: https://example.com/mcp\n\
         \n\
         Lessons (2 total):\n  Lesson 0: Introduction\n  Lesson 1: Why MCP"
    );
    assert_eq!(
        output.sources,
        [SourceRecord::new("MCP: Build Rich-Context AI Apps with Anthropic")
            .with_link("https://example.com/mcp")]
    );
}

#[tokio::test]
async fn outline_without_course_link_cites_title_only() {
    let store = InMemoryCourseStore::new();
    store
        .add_course(Course::new("Prompt Basics").lesson(Lesson::new(1, "Roles")))
        .expect("course should load");
    let tool = CourseOutlineTool::new(Arc::new(store));

    let output = tool
        .execute(&args(json!({"course_title": "prompt"})), &context())
        .await
        .expect("outline should succeed");

    assert!(output.text.contains("Course Link: No link available\n"));
    assert_eq!(output.sources, [SourceRecord::new("Prompt Basics")]);
    assert_eq!(output.sources[0].link, None);
}

#[tokio::test]
async fn outline_for_unknown_course_is_text() {
    let tool = CourseOutlineTool::new(store());

    let output = tool
        .execute(&args(json!({"course_title": "Cooking"})), &context())
        .await
        .expect("outline should succeed");

    assert_eq!(output.text, "No course found matching 'Cooking'");
    assert!(output.sources.is_empty());
}

#[derive(Default)]
struct OfflineStore {
    searches: Mutex<Vec<SearchQuery>>,
}

impl CourseStore for OfflineStore {
    fn search<'a>(
        &'a self,
        query: &'a SearchQuery,
    ) -> BoxFuture<'a, Result<SearchResults, StoreError>> {
        Box::pin(async move {
            self.searches.lock().expect("searches lock").push(query.clone());
            Err(StoreError::unavailable("Database connection failed"))
        })
    }

    fn resolve_course_name<'a>(
        &'a self,
        _name: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        Box::pin(async move { Err(StoreError::unavailable("catalog offline")) })
    }

    fn resolve_lesson_link<'a>(
        &'a self,
        _course_title: &'a str,
        _lesson_number: u32,
    ) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        Box::pin(async move { Ok(None) })
    }

    fn course_outline<'a>(
        &'a self,
        _course_title: &'a str,
    ) -> BoxFuture<'a, Result<Option<CourseOutline>, StoreError>> {
        Box::pin(async move { Ok(None) })
    }
}

#[tokio::test]
async fn store_failures_come_back_as_readable_text() {
    let store = Arc::new(OfflineStore::default());
    let search = CourseSearchTool::new(store.clone());
    let outline = CourseOutlineTool::new(store.clone());

    let searched = search
        .execute(
            &args(json!({"query": "test", "course_name": "ML Course", "lesson_number": 2})),
            &context(),
        )
        .await
        .expect("search should not fail");
    assert_eq!(searched.text, "Database connection failed");

    let searches = store.searches.lock().expect("searches lock").clone();
    assert_eq!(
        searches,
        [SearchQuery::new("test")
            .with_course_name(Some("ML Course".to_string()))
            .with_lesson_number(Some(2))]
    );

    let outlined = outline
        .execute(&args(json!({"course_title": "MCP"})), &context())
        .await
        .expect("outline should not fail");
    assert_eq!(outlined.text, "Error retrieving course outline: catalog offline");
}

#[tokio::test]
async fn session_prefers_search_sources_when_both_tools_cite() {
    let shared: Arc<dyn CourseStore> = store();
    let mut registry = ToolRegistry::new();
    register_course_tools(&mut registry, shared).expect("tools should register");
    let session = Arc::new(registry).session();

    session
        .dispatch(
            &ToolCallRequest::new(
                "toolu_outline",
                "get_course_outline",
                args(json!({"course_title": "Chroma"})),
            ),
            &context(),
        )
        .await
        .expect("outline should dispatch");
    session
        .dispatch(
            &ToolCallRequest::new(
                "toolu_search",
                "search_course_content",
                args(json!({"query": "servers", "course_name": "MCP"})),
            ),
            &context(),
        )
        .await
        .expect("search should dispatch");

    assert_eq!(
        session.collect_sources(),
        [SourceRecord::new("MCP: Build Rich-Context AI Apps with Anthropic - Lesson 1")
            .with_link("https://example.com/mcp/1")]
    );

    session.clear_sources();
    assert!(session.collect_sources().is_empty());
}

#[test]
fn duplicate_course_tool_registration_is_rejected() {
    let shared: Arc<dyn CourseStore> = store();
    let mut registry = ToolRegistry::new();
    register_course_tools(&mut registry, shared.clone()).expect("tools should register");

    let error = register_course_tools(&mut registry, shared).expect_err("duplicates should fail");
    assert_eq!(error.kind, ToolErrorKind::Configuration);
    assert_eq!(registry.len(), 2);
}

#[tokio::test]
async fn courses_built_in_code_are_searchable() {
    let store = InMemoryCourseStore::new().with_chunk_size(40);
    store
        .add_course(
            Course::new("Intro").lesson(
                Lesson::new(1, "Start")
                    .with_link("https://example.com/1")
                    .with_content("Agents call tools. Tools return text. Models read the text."),
            ),
        )
        .expect("course should load");
    assert_eq!(store.chunk_count(), 2);

    let tool = CourseSearchTool::new(Arc::new(store));
    let output = tool
        .execute(&args(json!({"query": "agents"})), &context())
        .await
        .expect("search should succeed");
    assert_eq!(output.text, "[Intro - Lesson 1]\nAgents call tools. Tools return text.");
    assert_eq!(
        output.sources,
        [SourceRecord::new("Intro - Lesson 1").with_link("https://example.com/1")]
    );
}
