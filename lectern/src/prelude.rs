//! Common imports for most lectern applications.

pub use crate::{
    AnswerResult, Assistant, AssistantConfig, AssistantError, AssistantErrorKind,
    ObservabilityMode, build_assistant, build_assistant_with, build_assistant_with_sessions,
    build_client, course_store,
};
pub use crate::{
    Course, CourseCatalog, CourseStore, InMemoryCourseStore, InMemorySessionStore, Lesson,
    ModelClient, SessionId, SessionStore, SessionStoreConfig, SourceRecord, StopCondition,
};
