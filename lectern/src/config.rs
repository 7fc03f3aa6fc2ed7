//! Assistant configuration: defaults, builder setters, environment loading.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use lectern::AssistantConfig;
//!
//! let config = AssistantConfig::new("sk-ant-test")
//!     .with_max_results(3)
//!     .with_request_timeout(Duration::from_secs(30));
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.orchestrator_policy().max_tool_rounds, 2);
//! ```

use std::str::FromStr;
use std::time::Duration;

use lchat::{DEFAULT_MAX_TOOL_ROUNDS, OrchestratorPolicy};
use lcourse::DEFAULT_MAX_RESULTS;
use lmemory::{DEFAULT_MAX_HISTORY, SessionStoreConfig};

use crate::AssistantError;
use crate::prompt::{DEFAULT_QUERY_PREFIX, DEFAULT_SYSTEM_PROMPT};

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

pub const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_MODEL: &str = "ANTHROPIC_MODEL";
pub const ENV_MAX_RESULTS: &str = "LECTERN_MAX_RESULTS";
pub const ENV_MAX_HISTORY: &str = "LECTERN_MAX_HISTORY";
pub const ENV_MAX_TOOL_ROUNDS: &str = "LECTERN_MAX_TOOL_ROUNDS";
pub const ENV_MODEL_TIMEOUT_SECS: &str = "LECTERN_MODEL_TIMEOUT_SECS";
pub const ENV_TOOL_TIMEOUT_SECS: &str = "LECTERN_TOOL_TIMEOUT_SECS";
pub const ENV_SESSION_DB: &str = "LECTERN_SESSION_DB";
pub const ENV_OBSERVABILITY: &str = "LECTERN_OBSERVABILITY";

/// Which hook set is attached to the provider, tool runtime and orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObservabilityMode {
    #[default]
    Tracing,
    Metrics,
    Disabled,
}

impl ObservabilityMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tracing" | "logs" => Some(Self::Tracing),
            "metrics" => Some(Self::Metrics),
            "off" | "none" | "disabled" => Some(Self::Disabled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Search hits returned per tool call. Zero is rejected by `validate`.
    pub max_results: usize,
    /// Exchanges kept per session; `0` keeps none.
    pub max_history: usize,
    pub max_tool_rounds: u32,
    pub model_timeout: Option<Duration>,
    pub tool_timeout: Option<Duration>,
    /// Whole-request timeout on the HTTP client.
    pub request_timeout: Duration,
    pub parallel_tool_calls: bool,
    pub system_prompt: String,
    pub query_prefix: String,
    pub session_store: SessionStoreConfig,
    pub observability: ObservabilityMode,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        let policy = OrchestratorPolicy::default();
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: policy.max_tokens,
            temperature: policy.temperature,
            max_results: DEFAULT_MAX_RESULTS,
            max_history: DEFAULT_MAX_HISTORY,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            model_timeout: policy.model_timeout,
            tool_timeout: policy.tool_timeout,
            request_timeout: Duration::from_secs(90),
            parallel_tool_calls: policy.parallel_tool_calls,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            query_prefix: DEFAULT_QUERY_PREFIX.to_string(),
            session_store: SessionStoreConfig::default(),
            observability: ObservabilityMode::default(),
        }
    }
}

impl AssistantConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, AssistantError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AssistantConfig::from_env`] over an arbitrary key lookup.
    /// Unset and blank values keep their defaults; the result is validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AssistantError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(api_key) = read(ENV_API_KEY) {
            config.api_key = api_key;
        }
        if let Some(model) = read(ENV_MODEL) {
            config.model = model;
        }
        if let Some(value) = read(ENV_MAX_RESULTS) {
            config.max_results = parse_number(ENV_MAX_RESULTS, &value)?;
        }
        if let Some(value) = read(ENV_MAX_HISTORY) {
            config.max_history = parse_number(ENV_MAX_HISTORY, &value)?;
        }
        if let Some(value) = read(ENV_MAX_TOOL_ROUNDS) {
            config.max_tool_rounds = parse_number(ENV_MAX_TOOL_ROUNDS, &value)?;
        }
        if let Some(value) = read(ENV_MODEL_TIMEOUT_SECS) {
            config.model_timeout = parse_timeout(ENV_MODEL_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = read(ENV_TOOL_TIMEOUT_SECS) {
            config.tool_timeout = parse_timeout(ENV_TOOL_TIMEOUT_SECS, &value)?;
        }
        if let Some(path) = read(ENV_SESSION_DB) {
            config.session_store = SessionStoreConfig::sqlite(path);
        }
        if let Some(value) = read(ENV_OBSERVABILITY) {
            config.observability = ObservabilityMode::parse(&value).ok_or_else(|| {
                AssistantError::configuration(format!(
                    "{ENV_OBSERVABILITY} must be one of tracing, metrics, off; got '{value}'"
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn with_max_tool_rounds(mut self, max_tool_rounds: u32) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = Some(timeout);
        self
    }

    pub fn without_model_timeout(mut self) -> Self {
        self.model_timeout = None;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = Some(timeout);
        self
    }

    pub fn without_tool_timeout(mut self) -> Self {
        self.tool_timeout = None;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_parallel_tool_calls(mut self, parallel: bool) -> Self {
        self.parallel_tool_calls = parallel;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_query_prefix(mut self, query_prefix: impl Into<String>) -> Self {
        self.query_prefix = query_prefix.into();
        self
    }

    pub fn with_session_store(mut self, session_store: SessionStoreConfig) -> Self {
        self.session_store = session_store;
        self
    }

    pub fn with_observability(mut self, observability: ObservabilityMode) -> Self {
        self.observability = observability;
        self
    }

    /// Checks everything except the API key, which only matters once a real
    /// client is built.
    pub fn validate(&self) -> Result<(), AssistantError> {
        if self.model.trim().is_empty() {
            return Err(AssistantError::configuration("model must not be empty"));
        }
        if self.max_results == 0 {
            return Err(AssistantError::configuration(
                "max_results must be greater than zero",
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(AssistantError::configuration(
                "request_timeout must be greater than zero",
            ));
        }

        self.orchestrator_policy()
            .validate()
            .map_err(|err| AssistantError::configuration(err.message))
    }

    pub fn orchestrator_policy(&self) -> OrchestratorPolicy {
        let mut policy = OrchestratorPolicy::default()
            .with_max_tool_rounds(self.max_tool_rounds)
            .with_parallel_tool_calls(self.parallel_tool_calls)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);
        policy.model_timeout = self.model_timeout;
        policy.tool_timeout = self.tool_timeout;
        policy
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, AssistantError> {
    value.parse().map_err(|_| {
        AssistantError::configuration(format!(
            "{key} must be a non-negative integer; got '{value}'"
        ))
    })
}

/// `0` disables the timeout.
fn parse_timeout(key: &str, value: &str) -> Result<Option<Duration>, AssistantError> {
    let seconds: u64 = parse_number(key, value)?;
    Ok((seconds > 0).then(|| Duration::from_secs(seconds)))
}
