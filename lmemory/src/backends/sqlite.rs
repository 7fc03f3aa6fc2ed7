use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use lcommon::{BoxFuture, SessionId};
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::MemoryError;
use crate::store::{SessionStore, numbered_session_id};
use crate::types::{DEFAULT_MAX_HISTORY, HistoryMessage, MessageRole, message_capacity};

#[derive(Debug)]
pub struct SqliteSessionStore {
    connection: Mutex<Connection>,
    max_history: usize,
}

impl SqliteSessionStore {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|error| {
                MemoryError::storage(format!(
                    "failed to create sqlite parent directory: {error}"
                ))
            })?;
        }

        let connection = Connection::open(path).map_err(|error| {
            MemoryError::storage(format!("failed to open sqlite database: {error}"))
        })?;
        Self::from_connection(connection)
    }

    pub fn new_in_memory() -> Result<Self, MemoryError> {
        let connection = Connection::open_in_memory().map_err(|error| {
            MemoryError::storage(format!("failed to open in-memory sqlite database: {error}"))
        })?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self, MemoryError> {
        connection
            .busy_timeout(Duration::from_secs(5))
            .map_err(|error| {
                MemoryError::storage(format!("failed to configure sqlite busy timeout: {error}"))
            })?;
        let store = Self {
            connection: Mutex::new(connection),
            max_history: DEFAULT_MAX_HISTORY,
        };
        store.initialize_schema()?;
        Ok(store)
    }

    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, MemoryError> {
        self.connection
            .lock()
            .map_err(|_| MemoryError::storage("sqlite session store lock poisoned"))
    }

    fn initialize_schema(&self) -> Result<(), MemoryError> {
        let conn = self.connection()?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            CREATE TABLE IF NOT EXISTS sessions (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS session_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_session_messages_session
                ON session_messages (session_id, id);
            ",
        )
        .map_err(|error| MemoryError::storage(format!("failed to initialize schema: {error}")))
    }
}

impl SessionStore for SqliteSessionStore {
    fn create_session<'a>(&'a self) -> BoxFuture<'a, Result<SessionId, MemoryError>> {
        Box::pin(async move {
            let conn = self.connection()?;
            let last: i64 = conn
                .query_row("SELECT COALESCE(MAX(seq), 0) FROM sessions", [], |row| {
                    row.get(0)
                })
                .map_err(|error| {
                    MemoryError::storage(format!("failed to read session counter: {error}"))
                })?;

            // Ids written by callers may already occupy a numbered slot.
            let mut sequence = u64::try_from(last).unwrap_or(0);
            loop {
                sequence += 1;
                let session_id = numbered_session_id(sequence);
                let inserted = conn
                    .execute(
                        "INSERT OR IGNORE INTO sessions (session_id) VALUES (?1)",
                        params![session_id.as_str()],
                    )
                    .map_err(|error| {
                        MemoryError::storage(format!("failed to create session: {error}"))
                    })?;
                if inserted == 1 {
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
            let conn = self.connection()?;
            let mut statement = conn
                .prepare(
                    "
                    SELECT role, content
                    FROM session_messages
                    WHERE session_id = ?1
                    ORDER BY id ASC
                    ",
                )
                .map_err(|error| {
                    MemoryError::storage(format!("failed to prepare history query: {error}"))
                })?;

            let rows = statement
                .query_map(params![session_id.as_str()], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })
                .map_err(|error| {
                    MemoryError::storage(format!("failed to query history: {error}"))
                })?;

            let mut messages = Vec::new();
            for row in rows {
                let (role, content) = row?;
                messages.push(HistoryMessage::new(MessageRole::parse(&role)?, content));
            }
            Ok(messages)
        })
    }

    fn append_messages<'a>(
        &'a self,
        session_id: &'a SessionId,
        messages: Vec<HistoryMessage>,
    ) -> BoxFuture<'a, Result<(), MemoryError>> {
        Box::pin(async move {
            let mut conn = self.connection()?;
            let tx = conn.transaction().map_err(|error| {
                MemoryError::storage(format!("failed to begin transaction: {error}"))
            })?;

            tx.execute(
                "INSERT OR IGNORE INTO sessions (session_id) VALUES (?1)",
                params![session_id.as_str()],
            )?;

            for message in messages {
                tx.execute(
                    "
                    INSERT INTO session_messages (session_id, role, content)
                    VALUES (?1, ?2, ?3)
                    ",
                    params![session_id.as_str(), message.role.as_str(), message.content],
                )
                .map_err(|error| {
                    MemoryError::storage(format!("failed to append history message: {error}"))
                })?;
            }

            let keep = i64::try_from(message_capacity(self.max_history)).unwrap_or(i64::MAX);
            tx.execute(
                "
                DELETE FROM session_messages
                WHERE session_id = ?1
                  AND id NOT IN (
                    SELECT id FROM session_messages
                    WHERE session_id = ?1
                    ORDER BY id DESC
                    LIMIT ?2
                  )
                ",
                params![session_id.as_str(), keep],
            )
            .map_err(|error| {
                MemoryError::storage(format!("failed to trim session history: {error}"))
            })?;

            tx.commit().map_err(|error| {
                MemoryError::storage(format!("failed to commit history append: {error}"))
            })
        })
    }

    fn clear_session<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<(), MemoryError>> {
        Box::pin(async move {
            let conn = self.connection()?;
            conn.execute(
                "DELETE FROM session_messages WHERE session_id = ?1",
                params![session_id.as_str()],
            )
            .map_err(|error| {
                MemoryError::storage(format!("failed to clear session history: {error}"))
            })?;
            Ok(())
        })
    }
}

impl SqliteSessionStore {
    pub fn session_exists(&self, session_id: &SessionId) -> Result<bool, MemoryError> {
        let conn = self.connection()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM sessions WHERE session_id = ?1",
                params![session_id.as_str()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

pub(crate) fn default_sqlite_path() -> PathBuf {
    if let Some(explicit) = std::env::var_os("LECTERN_SESSION_DB") {
        return PathBuf::from(explicit);
    }

    if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        return PathBuf::from(home).join(".lectern").join("sessions.sqlite3");
    }

    PathBuf::from("lectern-sessions.sqlite3")
}
