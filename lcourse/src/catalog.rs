//! Course catalog model and lesson chunking.
//!
//! Catalogs load from JSON shaped like:
//!
//! ```rust
//! use lcourse::CourseCatalog;
//!
//! let catalog = CourseCatalog::from_json_str(r#"{
//!     "courses": [{
//!         "title": "MCP: Build Rich-Context AI Apps",
//!         "link": "https://example.com/mcp",
//!         "lessons": [
//!             {"number": 1, "title": "Why MCP", "content": "MCP standardizes tool access."}
//!         ]
//!     }]
//! }"#).expect("catalog should parse");
//!
//! assert_eq!(catalog.courses[0].lessons[0].title, "Why MCP");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub const DEFAULT_CHUNK_SIZE: usize = 800;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CourseCatalog {
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl CourseCatalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_path(path: impl AsRef<std::path::Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|error| {
            StoreError::load(format!(
                "failed to read course catalog '{}': {error}",
                path.display()
            ))
        })?;
        Self::from_json_str(&raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Course {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: None,
            instructor: None,
            lessons: Vec::new(),
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    pub fn lesson(mut self, lesson: Lesson) -> Self {
        self.lessons.push(lesson);
        self
    }

    pub fn find_lesson(&self, number: u32) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.number == number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub number: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub content: String,
}

impl Lesson {
    pub fn new(number: u32, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            link: None,
            content: String::new(),
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

/// Searchable slice of lesson text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseChunk {
    pub course_title: String,
    pub lesson_number: Option<u32>,
    pub chunk_index: usize,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonSummary {
    pub number: u32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseOutline {
    pub title: String,
    pub link: Option<String>,
    pub lessons: Vec<LessonSummary>,
}

impl From<&Course> for CourseOutline {
    fn from(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            link: course.link.clone(),
            lessons: course
                .lessons
                .iter()
                .map(|lesson| LessonSummary {
                    number: lesson.number,
                    title: lesson.title.clone(),
                })
                .collect(),
        }
    }
}

/// Groups whole sentences into chunks of at most `chunk_size` characters.
///
/// A single sentence longer than `chunk_size` becomes a chunk on its own.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        let extra = if current.is_empty() {
            sentence.chars().count()
        } else {
            sentence.chars().count() + 1
        };

        if !current.is_empty() && current.chars().count() + extra > chunk_size {
            chunks.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(sentence);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        let at_boundary = matches!(ch, '.' | '!' | '?')
            && chars.peek().is_none_or(|(_, next)| next.is_whitespace());
        if at_boundary {
            let end = index + ch.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}
