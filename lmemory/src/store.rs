//! Session store trait, backend selection, and the in-memory store.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use lcommon::{BoxFuture, SessionId};

use crate::backends::sqlite::default_sqlite_path;
use crate::error::MemoryError;
use crate::types::{DEFAULT_MAX_HISTORY, HistoryMessage, format_history, trim_to_window};

pub use crate::backends::sqlite::SqliteSessionStore;

pub(crate) const SESSION_ID_PREFIX: &str = "session_";

pub(crate) fn numbered_session_id(sequence: u64) -> SessionId {
    SessionId::new(format!("{SESSION_ID_PREFIX}{sequence}"))
}

/// Rolling per-session conversation history.
///
/// Appending to a session that was never created creates it. Reading an
/// unknown or empty session yields no history rather than an error.
pub trait SessionStore: Send + Sync {
    fn create_session<'a>(&'a self) -> BoxFuture<'a, Result<SessionId, MemoryError>>;

    fn load_messages<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<Vec<HistoryMessage>, MemoryError>>;

    fn append_messages<'a>(
        &'a self,
        session_id: &'a SessionId,
        messages: Vec<HistoryMessage>,
    ) -> BoxFuture<'a, Result<(), MemoryError>>;

    fn clear_session<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<(), MemoryError>>;

    /// Formatted history for prompt injection, `None` when the session has none.
    fn get_history<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<Option<String>, MemoryError>> {
        Box::pin(async move {
            let messages = self.load_messages(session_id).await?;
            Ok(format_history(&messages))
        })
    }

    fn append_exchange<'a>(
        &'a self,
        session_id: &'a SessionId,
        query: &'a str,
        answer: &'a str,
    ) -> BoxFuture<'a, Result<(), MemoryError>> {
        self.append_messages(session_id, HistoryMessage::exchange(query, answer))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStoreConfig {
    #[default]
    InMemory,
    Sqlite {
        path: PathBuf,
    },
}

impl SessionStoreConfig {
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self::Sqlite { path: path.into() }
    }

    pub fn default_sqlite() -> Self {
        Self::Sqlite {
            path: default_sqlite_path(),
        }
    }
}

pub fn create_session_store(
    config: SessionStoreConfig,
    max_history: usize,
) -> Result<Arc<dyn SessionStore>, MemoryError> {
    match config {
        SessionStoreConfig::InMemory => Ok(Arc::new(
            InMemorySessionStore::new().with_max_history(max_history),
        )),
        SessionStoreConfig::Sqlite { path } => Ok(Arc::new(
            SqliteSessionStore::new(path)?.with_max_history(max_history),
        )),
    }
}

#[derive(Debug)]
pub struct InMemorySessionStore {
    state: Mutex<InMemoryState>,
    max_history: usize,
}

#[derive(Debug, Default)]
struct InMemoryState {
    counter: u64,
    sessions: HashMap<SessionId, Vec<HistoryMessage>>,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self {
            state: Mutex::new(InMemoryState::default()),
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    fn state(&self) -> Result<std::sync::MutexGuard<'_, InMemoryState>, MemoryError> {
        self.state
            .lock()
            .map_err(|_| MemoryError::storage("session store lock poisoned"))
    }
}

impl SessionStore for InMemorySessionStore {
    fn create_session<'a>(&'a self) -> BoxFuture<'a, Result<SessionId, MemoryError>> {
        Box::pin(async move {
            let mut state = self.state()?;
            loop {
                state.counter += 1;
                let session_id = numbered_session_id(state.counter);
                if !state.sessions.contains_key(&session_id) {
                    state.sessions.insert(session_id.clone(), Vec::new());
                    return Ok(session_id);
                }
            }
        })
    }

    fn load_messages<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<Vec<HistoryMessage>, MemoryError>> {
        Box::pin(async move {
            let state = self.state()?;
            Ok(state.sessions.get(session_id).cloned().unwrap_or_default())
        })
    }

    fn append_messages<'a>(
        &'a self,
        session_id: &'a SessionId,
        messages: Vec<HistoryMessage>,
    ) -> BoxFuture<'a, Result<(), MemoryError>> {
        Box::pin(async move {
            let mut state = self.state()?;
            let stored = state.sessions.entry(session_id.clone()).or_default();
            stored.extend(messages);
            trim_to_window(stored, self.max_history);
            Ok(())
        })
    }

    fn clear_session<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<(), MemoryError>> {
        Box::pin(async move {
            let mut state = self.state()?;
            if let Some(stored) = state.sessions.get_mut(session_id) {
                stored.clear();
            }
            Ok(())
        })
    }
}
