//! Orchestration limits and generation settings.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use lchat::OrchestratorPolicy;
//!
//! let policy = OrchestratorPolicy::default()
//!     .with_max_tool_rounds(1)
//!     .with_model_timeout(Duration::from_secs(30));
//! assert!(policy.validate().is_ok());
//!
//! let invalid = OrchestratorPolicy::default().with_max_tool_rounds(0);
//! assert!(invalid.validate().is_err());
//! ```

use std::time::Duration;

use crate::ChatError;

/// Hard ceiling on dispatch rounds per run, so at most three model calls.
pub const MAX_TOOL_ROUNDS: u32 = 2;

pub const DEFAULT_MAX_TOOL_ROUNDS: u32 = MAX_TOOL_ROUNDS;

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorPolicy {
    /// Tool-dispatch rounds allowed per run; model calls are capped at this plus one.
    pub max_tool_rounds: u32,
    pub model_timeout: Option<Duration>,
    pub tool_timeout: Option<Duration>,
    /// Dispatch the calls of one round concurrently. Results keep request order either way.
    pub parallel_tool_calls: bool,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for OrchestratorPolicy {
    fn default() -> Self {
        Self {
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            model_timeout: Some(Duration::from_secs(60)),
            tool_timeout: Some(Duration::from_secs(30)),
            parallel_tool_calls: true,
            temperature: 0.0,
            max_tokens: 800,
        }
    }
}

impl OrchestratorPolicy {
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

    pub fn with_parallel_tool_calls(mut self, parallel: bool) -> Self {
        self.parallel_tool_calls = parallel;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        if self.max_tool_rounds == 0 {
            return Err(ChatError::invalid_request(
                "max_tool_rounds must be at least 1",
            ));
        }

        if self.max_tool_rounds > MAX_TOOL_ROUNDS {
            return Err(ChatError::invalid_request(format!(
                "max_tool_rounds must be at most {MAX_TOOL_ROUNDS}"
            )));
        }

        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ChatError::invalid_request(
                "temperature must be in the inclusive range 0.0..=1.0",
            ));
        }

        if self.max_tokens == 0 {
            return Err(ChatError::invalid_request(
                "max_tokens must be greater than zero",
            ));
        }

        if self.model_timeout.is_some_and(|timeout| timeout.is_zero())
            || self.tool_timeout.is_some_and(|timeout| timeout.is_zero())
        {
            return Err(ChatError::invalid_request("timeouts must be non-zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatErrorKind;

    #[test]
    fn defaults_match_course_assistant_settings() {
        let policy = OrchestratorPolicy::default();
        assert_eq!(policy.max_tool_rounds, 2);
        assert_eq!(policy.temperature, 0.0);
        assert_eq!(policy.max_tokens, 800);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn round_limits_up_to_the_cap_are_accepted() {
        for rounds in 1..=MAX_TOOL_ROUNDS {
            assert!(
                OrchestratorPolicy::default()
                    .with_max_tool_rounds(rounds)
                    .validate()
                    .is_ok()
            );
        }
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let cases = [
            OrchestratorPolicy::default().with_max_tool_rounds(3),
            OrchestratorPolicy::default().with_max_tool_rounds(10),
            OrchestratorPolicy::default().with_temperature(1.5),
            OrchestratorPolicy::default().with_max_tokens(0),
            OrchestratorPolicy::default().with_tool_timeout(Duration::ZERO),
        ];

        for policy in cases {
            let error = policy.validate().expect_err("policy should be invalid");
            assert_eq!(error.kind, ChatErrorKind::InvalidRequest);
        }
    }
}
