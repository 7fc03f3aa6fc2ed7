//! Course store contract and the in-memory lexical store.

use std::collections::HashSet;
use std::sync::RwLock;

use lcommon::BoxFuture;

use crate::catalog::{
    Course, CourseCatalog, CourseChunk, CourseOutline, DEFAULT_CHUNK_SIZE, chunk_text,
};
use crate::error::StoreError;

pub const DEFAULT_MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub content: String,
    pub course_title: String,
    pub lesson_number: Option<u32>,
    pub score: f32,
}

/// Ranked hits, best first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self { hits }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub text: String,
    pub course_name: Option<String>,
    pub lesson_number: Option<u32>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            course_name: None,
            lesson_number: None,
        }
    }

    pub fn with_course_name(mut self, course_name: Option<String>) -> Self {
        self.course_name = course_name;
        self
    }

    pub fn with_lesson_number(mut self, lesson_number: Option<u32>) -> Self {
        self.lesson_number = lesson_number;
        self
    }
}

/// Read side of the course corpus used by the course tools.
pub trait CourseStore: Send + Sync {
    /// Ranked search with optional course and lesson filters.
    ///
    /// A course filter that resolves to no course is a `CourseNotFound` error.
    fn search<'a>(
        &'a self,
        query: &'a SearchQuery,
    ) -> BoxFuture<'a, Result<SearchResults, StoreError>>;

    /// Canonical course title for a loosely written name.
    fn resolve_course_name<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, StoreError>>;

    fn resolve_lesson_link<'a>(
        &'a self,
        course_title: &'a str,
        lesson_number: u32,
    ) -> BoxFuture<'a, Result<Option<String>, StoreError>>;

    fn course_outline<'a>(
        &'a self,
        course_title: &'a str,
    ) -> BoxFuture<'a, Result<Option<CourseOutline>, StoreError>>;
}

#[derive(Debug)]
pub struct InMemoryCourseStore {
    state: RwLock<StoreState>,
    max_results: usize,
    chunk_size: usize,
}

#[derive(Debug, Default)]
struct StoreState {
    courses: Vec<Course>,
    chunks: Vec<CourseChunk>,
}

impl Default for InMemoryCourseStore {
    fn default() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            max_results: DEFAULT_MAX_RESULTS,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl InMemoryCourseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `0` makes every search come back empty.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn from_catalog(catalog: CourseCatalog) -> Result<Self, StoreError> {
        let store = Self::new();
        store.add_catalog(catalog)?;
        Ok(store)
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn add_catalog(&self, catalog: CourseCatalog) -> Result<(), StoreError> {
        for course in catalog.courses {
            self.add_course(course)?;
        }
        Ok(())
    }

    /// Adds a course and chunks its lesson content. Re-adding a title replaces it.
    pub fn add_course(&self, course: Course) -> Result<(), StoreError> {
        if course.title.trim().is_empty() {
            return Err(StoreError::load("course title must not be empty"));
        }

        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::unavailable("course store lock poisoned"))?;

        state.chunks.retain(|chunk| chunk.course_title != course.title);
        let mut chunk_index = 0;
        for lesson in &course.lessons {
            for content in chunk_text(&lesson.content, self.chunk_size) {
                state.chunks.push(CourseChunk {
                    course_title: course.title.clone(),
                    lesson_number: Some(lesson.number),
                    chunk_index,
                    content,
                });
                chunk_index += 1;
            }
        }

        match state
            .courses
            .iter_mut()
            .find(|existing| existing.title == course.title)
        {
            Some(existing) => *existing = course,
            None => state.courses.push(course),
        }
        Ok(())
    }

    pub fn course_titles(&self) -> Vec<String> {
        self.state
            .read()
            .map(|state| state.courses.iter().map(|course| course.title.clone()).collect())
            .unwrap_or_default()
    }

    pub fn chunk_count(&self) -> usize {
        self.state.read().map(|state| state.chunks.len()).unwrap_or(0)
    }

    fn read_state(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::unavailable("course store lock poisoned"))
    }
}

impl CourseStore for InMemoryCourseStore {
    fn search<'a>(
        &'a self,
        query: &'a SearchQuery,
    ) -> BoxFuture<'a, Result<SearchResults, StoreError>> {
        Box::pin(async move {
            let terms = tokenize(&query.text);
            if terms.is_empty() {
                return Err(StoreError::invalid_query("search query must not be empty"));
            }

            let state = self.read_state()?;
            let course_filter = match query.course_name.as_deref() {
                Some(name) => Some(
                    resolve_title(&state.courses, name)
                        .ok_or_else(|| StoreError::course_not_found(name))?,
                ),
                None => None,
            };

            let mut hits = state
                .chunks
                .iter()
                .filter(|chunk| {
                    course_filter
                        .as_deref()
                        .is_none_or(|title| chunk.course_title == title)
                })
                .filter(|chunk| {
                    query
                        .lesson_number
                        .is_none_or(|number| chunk.lesson_number == Some(number))
                })
                .filter_map(|chunk| {
                    let score = score_chunk(&terms, &chunk.content);
                    (score > 0.0).then(|| SearchHit {
                        content: chunk.content.clone(),
                        course_title: chunk.course_title.clone(),
                        lesson_number: chunk.lesson_number,
                        score,
                    })
                })
                .collect::<Vec<_>>();

            hits.sort_by(|left, right| right.score.total_cmp(&left.score));
            hits.truncate(self.max_results);
            Ok(SearchResults::new(hits))
        })
    }

    fn resolve_course_name<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        Box::pin(async move {
            let state = self.read_state()?;
            Ok(resolve_title(&state.courses, name))
        })
    }

    fn resolve_lesson_link<'a>(
        &'a self,
        course_title: &'a str,
        lesson_number: u32,
    ) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        Box::pin(async move {
            let state = self.read_state()?;
            Ok(state
                .courses
                .iter()
                .find(|course| course.title == course_title)
                .and_then(|course| course.find_lesson(lesson_number))
                .and_then(|lesson| lesson.link.clone()))
        })
    }

    fn course_outline<'a>(
        &'a self,
        course_title: &'a str,
    ) -> BoxFuture<'a, Result<Option<CourseOutline>, StoreError>> {
        Box::pin(async move {
            let state = self.read_state()?;
            Ok(state
                .courses
                .iter()
                .find(|course| course.title.eq_ignore_ascii_case(course_title))
                .map(CourseOutline::from))
        })
    }
}

/// Exact (case-insensitive) title, then substring, then best token overlap.
fn resolve_title(courses: &[Course], name: &str) -> Option<String> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    if let Some(course) = courses
        .iter()
        .find(|course| course.title.to_lowercase() == needle)
    {
        return Some(course.title.clone());
    }

    if let Some(course) = courses
        .iter()
        .find(|course| course.title.to_lowercase().contains(&needle))
    {
        return Some(course.title.clone());
    }

    let wanted = tokenize(&needle);
    courses
        .iter()
        .map(|course| {
            let title_terms = tokenize(&course.title).into_iter().collect::<HashSet<_>>();
            let overlap = wanted.iter().filter(|term| title_terms.contains(*term)).count();
            (overlap, course)
        })
        .filter(|(overlap, _)| *overlap > 0)
        .fold(None, |best: Option<(usize, &Course)>, candidate| match best {
            Some((score, _)) if score >= candidate.0 => best,
            _ => Some(candidate),
        })
        .map(|(_, course)| course.title.clone())
}

fn tokenize(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .filter(|term| seen.insert(term.clone()))
        .collect()
}

// Distinct matched terms dominate; repeated mentions break ties.
fn score_chunk(terms: &[String], content: &str) -> f32 {
    let words = content
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>();

    let mut matched = 0usize;
    let mut occurrences = 0usize;
    for term in terms {
        let count = words.iter().filter(|word| *word == term).count();
        if count > 0 {
            matched += 1;
            occurrences += count;
        }
    }

    if matched == 0 {
        return 0.0;
    }
    matched as f32 + (occurrences as f32 / (words.len() as f32 + 1.0))
}
