//! Course catalog storage and the search/outline tools built on it.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use lcourse::{Course, CourseStore, InMemoryCourseStore, Lesson, register_course_tools};
//! use ltooling::ToolRegistry;
//!
//! let store = InMemoryCourseStore::new();
//! store
//!     .add_course(
//!         Course::new("Advanced Retrieval for AI with Chroma")
//!             .lesson(Lesson::new(1, "Overview").with_content("Embeddings power retrieval.")),
//!     )
//!     .expect("course should load");
//!
//! let store: Arc<dyn CourseStore> = Arc::new(store);
//! let mut registry = ToolRegistry::new();
//! register_course_tools(&mut registry, store).expect("tools should register");
//!
//! let names = registry.names().collect::<Vec<_>>();
//! assert_eq!(names, ["search_course_content", "get_course_outline"]);
//! ```

mod catalog;
mod error;
mod store;
mod tools;

pub mod prelude {
    pub use crate::{
        Course, CourseCatalog, CourseOutline, CourseOutlineTool, CourseSearchTool, CourseStore,
        InMemoryCourseStore, Lesson, SearchQuery, SearchResults, StoreError, StoreErrorKind,
        register_course_tools,
    };
}

pub use catalog::{
    Course, CourseCatalog, CourseChunk, CourseOutline, DEFAULT_CHUNK_SIZE, Lesson, LessonSummary,
    chunk_text,
};
pub use error::{StoreError, StoreErrorKind};
pub use store::{
    CourseStore, DEFAULT_MAX_RESULTS, InMemoryCourseStore, SearchHit, SearchQuery, SearchResults,
};
pub use tools::{
    CourseOutlineTool, CourseSearchTool, OUTLINE_TOOL_NAME, SEARCH_TOOL_NAME, format_outline,
    register_course_tools,
};
