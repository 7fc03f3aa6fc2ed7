//! Provider-agnostic request, response, turn, and tool schema types.
//!
//! ```rust
//! use lprovider::{ModelRequest, ProviderErrorKind, ToolChoice, Turn};
//!
//! let ok = ModelRequest::builder("claude-sonnet-4-20250514")
//!     .system("You answer questions about courses.")
//!     .turn(Turn::user("What is MCP?"))
//!     .build();
//! assert!(ok.is_ok());
//!
//! let err = ModelRequest::builder("claude-sonnet-4-20250514")
//!     .turn(Turn::user("hi"))
//!     .tool_choice(ToolChoice::Auto)
//!     .build()
//!     .err()
//!     .expect("tool choice without tools should fail");
//! assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
//! ```

use std::fmt::{Display, Formatter};

use lcommon::{GenerationOptions, MetadataMap};
use serde_json::{Map, Value, json};

use crate::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Anthropic,
    Custom(&'static str),
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anthropic => f.write_str("anthropic"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// Who produced a turn in the conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Assistant,
    ToolResults,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallResult {
    pub tool_call_id: String,
    pub content: String,
    pub is_error: bool,
}

impl ToolCallResult {
    pub fn success(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn failure(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
            is_error: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentItem {
    Text(String),
    ToolCall(ToolCallRequest),
    ToolResult(ToolCallResult),
}

impl ContentItem {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_tool_call(&self) -> Option<&ToolCallRequest> {
        match self {
            Self::ToolCall(call) => Some(call),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub origin: Origin,
    pub content: Vec<ContentItem>,
}

impl Turn {
    pub fn new(origin: Origin, content: Vec<ContentItem>) -> Self {
        Self { origin, content }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Origin::User, vec![ContentItem::text(text)])
    }

    pub fn assistant(content: Vec<ContentItem>) -> Self {
        Self::new(Origin::Assistant, content)
    }

    pub fn tool_results(results: Vec<ToolCallResult>) -> Self {
        Self::new(
            Origin::ToolResults,
            results.into_iter().map(ContentItem::ToolResult).collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParameterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParameterKind,
    pub description: String,
    pub required: bool,
}

impl ParameterSpec {
    pub fn required(
        name: impl Into<String>,
        kind: ParameterKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: true,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        kind: ParameterKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }
}

/// Name, description, and parameter schema a model sees for one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(|parameter| parameter.required)
    }

    /// JSON-schema object describing the parameters.
    pub fn input_schema(&self) -> Value {
        let properties = self
            .parameters
            .iter()
            .map(|parameter| {
                (
                    parameter.name.clone(),
                    json!({
                        "type": parameter.kind.as_str(),
                        "description": parameter.description,
                    }),
                )
            })
            .collect::<Map<_, _>>();

        let required = self
            .required_parameters()
            .map(|parameter| Value::String(parameter.name.clone()))
            .collect::<Vec<_>>();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
    /// The model decides whether to call a tool.
    Auto,
    Any,
    Tool(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ToolUse,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    pub provider: ProviderId,
    pub model: String,
    pub content: Vec<ContentItem>,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

impl ModelResponse {
    pub fn new(provider: ProviderId, model: impl Into<String>, content: Vec<ContentItem>) -> Self {
        let stop_reason = if content.iter().any(|item| item.as_tool_call().is_some()) {
            StopReason::ToolUse
        } else {
            StopReason::EndTurn
        };

        Self {
            provider,
            model: model.into(),
            content,
            stop_reason,
            usage: TokenUsage::default(),
        }
    }

    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCallRequest> {
        self.content.iter().filter_map(ContentItem::as_tool_call)
    }

    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls().next().is_some()
    }

    /// First content item carrying text, in response order.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(ContentItem::as_text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub model: String,
    pub system: Option<String>,
    pub turns: Vec<Turn>,
    pub tools: Vec<ToolSpec>,
    pub tool_choice: Option<ToolChoice>,
    pub options: GenerationOptions,
    pub metadata: MetadataMap,
}

impl ModelRequest {
    pub fn builder(model: impl Into<String>) -> ModelRequestBuilder {
        ModelRequestBuilder::new(model)
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model.trim().is_empty() {
            return Err(ProviderError::invalid_request("model must not be empty"));
        }

        if self.turns.is_empty() {
            return Err(ProviderError::invalid_request("at least one turn is required"));
        }

        if self.turns[0].origin != Origin::User {
            return Err(ProviderError::invalid_request(
                "the first turn must come from the user",
            ));
        }

        if let Some(max_tokens) = self.options.max_tokens
            && max_tokens == 0
        {
            return Err(ProviderError::invalid_request(
                "max_tokens must be greater than zero",
            ));
        }

        if let Some(temperature) = self.options.temperature
            && !(0.0..=1.0).contains(&temperature)
        {
            return Err(ProviderError::invalid_request(
                "temperature must be in the inclusive range 0.0..=1.0",
            ));
        }

        if self.tool_choice.is_some() && self.tools.is_empty() {
            return Err(ProviderError::invalid_request(
                "tool_choice requires at least one tool",
            ));
        }

        if let Some(ToolChoice::Tool(name)) = &self.tool_choice
            && !self.tools.iter().any(|tool| &tool.name == name)
        {
            return Err(ProviderError::invalid_request(format!(
                "tool_choice names unknown tool '{name}'"
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequestBuilder {
    model: String,
    system: Option<String>,
    turns: Vec<Turn>,
    tools: Vec<ToolSpec>,
    tool_choice: Option<ToolChoice>,
    options: GenerationOptions,
    metadata: MetadataMap,
}

impl ModelRequestBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            turns: Vec::new(),
            tools: Vec::new(),
            tool_choice: None,
            options: GenerationOptions::default(),
            metadata: MetadataMap::new(),
        }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn turn(mut self, turn: Turn) -> Self {
        self.turns.push(turn);
        self
    }

    pub fn turns(mut self, turns: Vec<Turn>) -> Self {
        self.turns.extend(turns);
        self
    }

    pub fn tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    pub fn tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = Some(max_tokens);
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<ModelRequest, ProviderError> {
        let request = ModelRequest {
            model: self.model,
            system: self.system,
            turns: self.turns,
            tools: self.tools,
            tool_choice: self.tool_choice,
            options: self.options,
            metadata: self.metadata,
        };

        request.validate()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_spec() -> ToolSpec {
        ToolSpec::new("search_course_content", "Search course materials")
            .parameter(ParameterSpec::required(
                "query",
                ParameterKind::String,
                "What to search for",
            ))
            .parameter(ParameterSpec::optional(
                "lesson_number",
                ParameterKind::Integer,
                "Lesson to search within",
            ))
    }

    #[test]
    fn input_schema_lists_properties_and_required_names() {
        let schema = search_spec().input_schema();

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(schema["properties"]["lesson_number"]["type"], "integer");
        assert_eq!(schema["required"], json!(["query"]));
    }

    #[test]
    fn response_helpers_find_tool_calls_and_first_text() {
        let response = ModelResponse::new(
            ProviderId::Anthropic,
            "model",
            vec![
                ContentItem::ToolCall(ToolCallRequest::new("call_1", "lookup", Map::new())),
                ContentItem::text("first"),
                ContentItem::text("second"),
            ],
        );

        assert!(response.has_tool_calls());
        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert_eq!(response.first_text(), Some("first"));
        assert_eq!(response.tool_calls().count(), 1);
    }

    #[test]
    fn response_without_text_has_no_first_text() {
        let response = ModelResponse::new(ProviderId::Anthropic, "model", Vec::new());
        assert_eq!(response.first_text(), None);
        assert_eq!(response.stop_reason, StopReason::EndTurn);
    }

    #[test]
    fn builder_rejects_leading_assistant_turn_and_bad_temperature() {
        let leading_assistant = ModelRequest::builder("model")
            .turn(Turn::assistant(vec![ContentItem::text("hello")]))
            .build();
        assert!(leading_assistant.is_err());

        let hot = ModelRequest::builder("model")
            .turn(Turn::user("hello"))
            .temperature(1.5)
            .build();
        assert!(hot.is_err());
    }

    #[test]
    fn builder_accepts_tools_with_auto_choice() {
        let request = ModelRequest::builder("model")
            .turn(Turn::user("hello"))
            .tools(vec![search_spec()])
            .tool_choice(ToolChoice::Auto)
            .max_tokens(800)
            .build()
            .expect("request should build");

        assert_eq!(request.tools.len(), 1);
        assert_eq!(request.tool_choice, Some(ToolChoice::Auto));
    }

    #[test]
    fn tool_results_turn_preserves_result_order() {
        let turn = Turn::tool_results(vec![
            ToolCallResult::success("call_a", "a"),
            ToolCallResult::failure("call_b", "Error: b"),
        ]);

        assert_eq!(turn.origin, Origin::ToolResults);
        let ids = turn
            .content
            .iter()
            .filter_map(|item| match item {
                ContentItem::ToolResult(result) => Some(result.tool_call_id.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(ids, ["call_a", "call_b"]);
    }
}
