//! Conversation session storage with in-memory and SQLite backends.
//!
//! ```rust
//! use lmemory::{InMemorySessionStore, SessionStore};
//!
//! # async fn demo() -> Result<(), lmemory::MemoryError> {
//! let store = InMemorySessionStore::new();
//! let session = store.create_session().await?;
//! store.append_exchange(&session, "What is MCP?", "A protocol.").await?;
//! assert_eq!(
//!     store.get_history(&session).await?.as_deref(),
//!     Some("User: What is MCP?\nAssistant: A protocol.")
//! );
//! # Ok(())
//! # }
//! ```

mod backends;
mod error;
mod store;
mod types;

pub mod prelude {
    pub use crate::{
        DEFAULT_MAX_HISTORY, HistoryMessage, InMemorySessionStore, MemoryError, MemoryErrorKind,
        MessageRole, SessionStore, SessionStoreConfig, SqliteSessionStore, create_session_store,
        format_history,
    };
}

pub use error::{MemoryError, MemoryErrorKind};
pub use store::{
    InMemorySessionStore, SessionStore, SessionStoreConfig, SqliteSessionStore,
    create_session_store,
};
pub use types::{
    DEFAULT_MAX_HISTORY, HistoryMessage, MessageRole, format_history, message_capacity,
    trim_to_window,
};

#[cfg(test)]
mod tests {
    use lcommon::SessionId;

    use crate::{
        InMemorySessionStore, SessionStore, SessionStoreConfig, SqliteSessionStore,
        create_session_store,
    };

    fn temp_dir(prefix: &str) -> std::path::PathBuf {
        let unique = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("lmemory-{prefix}-{unique}"))
    }

    async fn exercise_rolling_window(store: &dyn SessionStore) {
        let session = store.create_session().await.expect("session should be created");
        assert_eq!(session.as_str(), "session_1");
        assert_eq!(
            store.get_history(&session).await.expect("history should load"),
            None
        );

        for turn in 1..=3 {
            store
                .append_exchange(&session, &format!("q{turn}"), &format!("a{turn}"))
                .await
                .expect("exchange should append");
        }

        assert_eq!(
            store
                .get_history(&session)
                .await
                .expect("history should load")
                .as_deref(),
            Some("User: q2\nAssistant: a2\nUser: q3\nAssistant: a3")
        );

        let second = store.create_session().await.expect("session should be created");
        assert_eq!(second.as_str(), "session_2");
        assert_eq!(
            store.get_history(&second).await.expect("history should load"),
            None
        );

        store.clear_session(&session).await.expect("clear should succeed");
        assert_eq!(
            store.get_history(&session).await.expect("history should load"),
            None
        );
    }

    #[tokio::test]
    async fn in_memory_store_keeps_rolling_window() {
        exercise_rolling_window(&InMemorySessionStore::new()).await;
    }

    #[tokio::test]
    async fn sqlite_store_keeps_rolling_window() {
        let store = SqliteSessionStore::new_in_memory().expect("sqlite store should open");
        exercise_rolling_window(&store).await;
    }

    #[tokio::test]
    async fn appending_to_unknown_session_creates_it() {
        let store = InMemorySessionStore::new();
        let session = SessionId::from("session_1");

        store
            .append_exchange(&session, "hi", "hello")
            .await
            .expect("exchange should append");

        let created = store.create_session().await.expect("session should be created");
        assert_eq!(created.as_str(), "session_2");
        assert_eq!(
            store
                .get_history(&session)
                .await
                .expect("history should load")
                .as_deref(),
            Some("User: hi\nAssistant: hello")
        );
    }

    #[tokio::test]
    async fn sqlite_store_skips_caller_claimed_ids() {
        let store = SqliteSessionStore::new_in_memory().expect("sqlite store should open");
        store
            .append_exchange(&SessionId::from("session_1"), "hi", "hello")
            .await
            .expect("exchange should append");

        let created = store.create_session().await.expect("session should be created");
        assert_eq!(created.as_str(), "session_2");
        assert!(store.session_exists(&created).expect("lookup should succeed"));
        assert!(
            !store
                .session_exists(&SessionId::from("session_9"))
                .expect("lookup should succeed")
        );
    }

    #[tokio::test]
    async fn custom_window_size_is_respected() {
        let store = InMemorySessionStore::new().with_max_history(1);
        let session = store.create_session().await.expect("session should be created");
        store
            .append_exchange(&session, "old", "old answer")
            .await
            .expect("exchange should append");
        store
            .append_exchange(&session, "new", "new answer")
            .await
            .expect("exchange should append");

        assert_eq!(
            store
                .get_history(&session)
                .await
                .expect("history should load")
                .as_deref(),
            Some("User: new\nAssistant: new answer")
        );
    }

    #[tokio::test]
    async fn sqlite_history_survives_reopen() {
        let root = temp_dir("reopen");
        let path = root.join("sessions.sqlite3");

        let session = {
            let store = create_session_store(SessionStoreConfig::sqlite(&path), 2)
                .expect("sqlite store should open");
            let session = store.create_session().await.expect("session should be created");
            store
                .append_exchange(&session, "What is RAG?", "Retrieval augmented generation.")
                .await
                .expect("exchange should append");
            session
        };

        let reopened = SqliteSessionStore::new(&path).expect("sqlite store should reopen");
        assert_eq!(
            reopened
                .get_history(&session)
                .await
                .expect("history should load")
                .as_deref(),
            Some("User: What is RAG?\nAssistant: Retrieval augmented generation.")
        );
        let next = reopened.create_session().await.expect("session should be created");
        assert_eq!(next.as_str(), "session_2");

        drop(reopened);
        let _ = std::fs::remove_dir_all(root);
    }
}
