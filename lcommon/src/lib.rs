//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use lcommon::{GenerationOptions, MetadataMap, SessionId, TraceId};
//!
//! let session = SessionId::from("session_1");
//! let trace = TraceId::new("trace-1");
//! let mut metadata = MetadataMap::new();
//! metadata.insert("course".to_string(), "mcp".to_string());
//!
//! let options = GenerationOptions::default().with_temperature(0.0).with_max_tokens(800);
//! assert_eq!(session.as_str(), "session_1");
//! assert_eq!(trace.to_string(), "trace-1");
//! assert_eq!(options.max_tokens, Some(800));
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use lcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Shared metadata and cross-crate identifier newtypes.

    use std::collections::HashMap;
    use std::fmt::{Display, Formatter};

    pub type MetadataMap = HashMap<String, String>;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct SessionId(String);

    impl SessionId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for SessionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for SessionId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for SessionId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct TraceId(String);

    impl TraceId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for TraceId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for TraceId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for TraceId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod model {
    //! Shared generation settings used by request types.

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct GenerationOptions {
        pub temperature: Option<f32>,
        pub max_tokens: Option<u32>,
    }

    impl GenerationOptions {
        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = Some(temperature);
            self
        }

        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.max_tokens = Some(max_tokens);
            self
        }
    }
}

pub mod registry {
    //! Insertion-ordered registry map used by runtime registries.
    //!
    //! Iteration follows first-insertion order. Replacing a value keeps the
    //! key's original position.
    //!
    //! ```rust
    //! use lcommon::Registry;
    //!
    //! let mut registry = Registry::new();
    //! registry.insert("beta".to_string(), 2_u32);
    //! registry.insert("alpha".to_string(), 1_u32);
    //!
    //! assert_eq!(registry.get("alpha"), Some(&1));
    //! assert_eq!(registry.keys().collect::<Vec<_>>(), ["beta", "alpha"]);
    //! ```

    use std::borrow::Borrow;
    use std::collections::HashMap;
    use std::hash::Hash;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        index: HashMap<K, usize>,
        entries: Vec<(K, V)>,
    }

    impl<K, V> Default for Registry<K, V>
    where
        K: Eq + Hash,
    {
        fn default() -> Self {
            Self {
                index: HashMap::new(),
                entries: Vec::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Eq + Hash + Clone,
    {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            if let Some(&position) = self.index.get(&key) {
                return Some(std::mem::replace(&mut self.entries[position].1, value));
            }

            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
            None
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.index
                .get(key)
                .map(|&position| &self.entries[position].1)
        }

        pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            let position = self.index.remove(key)?;
            let (_, value) = self.entries.remove(position);
            for slot in self.index.values_mut() {
                if *slot > position {
                    *slot -= 1;
                }
            }

            Some(value)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.index.contains_key(key)
        }

        pub fn keys(&self) -> impl Iterator<Item = &K> {
            self.entries.iter().map(|(key, _)| key)
        }

        pub fn values(&self) -> impl Iterator<Item = &V> {
            self.entries.iter().map(|(_, value)| value)
        }

        pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
            self.entries.iter().map(|(key, value)| (key, value))
        }

        pub fn len(&self) -> usize {
            self.entries.len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }
    }
}

pub use context::{MetadataMap, SessionId, TraceId};
pub use future::BoxFuture;
pub use model::GenerationOptions;
pub use registry::Registry;

#[cfg(test)]
mod tests {
    use super::{GenerationOptions, Registry, SessionId, TraceId};

    #[test]
    fn id_newtypes_round_trip_strings() {
        let session = SessionId::new("session_1");
        let trace = TraceId::from("trace-1");

        assert_eq!(session.as_str(), "session_1");
        assert_eq!(trace.as_str(), "trace-1");
        assert_eq!(session.to_string(), "session_1");
        assert_eq!(trace.to_string(), "trace-1");
    }

    #[test]
    fn generation_options_builder_helpers_set_values() {
        let options = GenerationOptions::default()
            .with_temperature(0.0)
            .with_max_tokens(800);

        assert_eq!(options.temperature, Some(0.0));
        assert_eq!(options.max_tokens, Some(800));
    }

    #[test]
    fn registry_iterates_in_insertion_order() {
        let mut registry = Registry::new();
        registry.insert("search".to_string(), 1_u32);
        registry.insert("outline".to_string(), 2_u32);
        registry.insert("lookup".to_string(), 3_u32);

        let keys = registry.keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, ["search", "outline", "lookup"]);
        assert_eq!(registry.values().copied().collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn registry_replacement_keeps_position() {
        let mut registry = Registry::new();
        registry.insert("search".to_string(), 1_u32);
        registry.insert("outline".to_string(), 2_u32);

        let previous = registry.insert("search".to_string(), 10_u32);
        assert_eq!(previous, Some(1));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.iter().next(), Some((&"search".to_string(), &10)));
    }

    #[test]
    fn registry_remove_reindexes_later_entries() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        registry.insert("a".to_string(), 1_u32);
        registry.insert("b".to_string(), 2_u32);
        registry.insert("c".to_string(), 3_u32);

        assert_eq!(registry.remove("a"), Some(1));
        assert_eq!(registry.get("c"), Some(&3));
        assert!(!registry.contains_key("a"));
        assert_eq!(registry.len(), 2);
    }
}
