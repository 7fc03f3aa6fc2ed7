//! Anthropic Messages HTTP payload serde models and conversion helpers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    ContentItem, ModelRequest, ModelResponse, Origin, ProviderError, ProviderId, StopReason,
    TokenUsage, ToolCallRequest, ToolChoice, ToolSpec, Turn,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnthropicApiRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<AnthropicApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<AnthropicApiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<AnthropicApiToolChoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnthropicApiMessage {
    pub role: String,
    pub content: Vec<AnthropicApiBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicApiBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnthropicApiTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl From<&ToolSpec> for AnthropicApiTool {
    fn from(value: &ToolSpec) -> Self {
        Self {
            name: value.name.clone(),
            description: value.description.clone(),
            input_schema: value.input_schema(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicApiToolChoice {
    Auto,
    Any,
    Tool { name: String },
}

impl From<ToolChoice> for AnthropicApiToolChoice {
    fn from(value: ToolChoice) -> Self {
        match value {
            ToolChoice::Auto => Self::Auto,
            ToolChoice::Any => Self::Any,
            ToolChoice::Tool(name) => Self::Tool { name },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnthropicApiResponse {
    #[serde(default)]
    pub id: String,
    pub model: String,
    pub content: Vec<AnthropicApiBlock>,
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: AnthropicApiUsage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct AnthropicApiUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicApiErrorEnvelope {
    pub error: AnthropicApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicApiError {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<AnthropicApiErrorEnvelope>(body).ok()?;
    Some(format!("{}: {}", parsed.error.kind, parsed.error.message))
}

pub(crate) fn build_api_request(
    request: ModelRequest,
    fallback_model: &str,
    default_max_tokens: u32,
) -> Result<AnthropicApiRequest, ProviderError> {
    let model = if request.model.trim().is_empty() {
        fallback_model.to_string()
    } else {
        request.model
    };

    let messages = request
        .turns
        .into_iter()
        .map(AnthropicApiMessage::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let tools = request
        .tools
        .iter()
        .map(AnthropicApiTool::from)
        .collect::<Vec<_>>();

    let tool_choice = if tools.is_empty() {
        None
    } else {
        request.tool_choice.map(AnthropicApiToolChoice::from)
    };

    Ok(AnthropicApiRequest {
        model,
        max_tokens: request.options.max_tokens.unwrap_or(default_max_tokens),
        messages,
        system: request.system.filter(|system| !system.trim().is_empty()),
        temperature: request.options.temperature,
        tools,
        tool_choice,
    })
}

impl TryFrom<Turn> for AnthropicApiMessage {
    type Error = ProviderError;

    fn try_from(value: Turn) -> Result<Self, Self::Error> {
        let role = match value.origin {
            Origin::Assistant => "assistant",
            Origin::User | Origin::ToolResults => "user",
        };

        let content = value
            .content
            .into_iter()
            .filter_map(|item| match item {
                ContentItem::Text(text) if text.trim().is_empty() => None,
                ContentItem::Text(text) => Some(AnthropicApiBlock::Text { text }),
                ContentItem::ToolCall(call) => Some(AnthropicApiBlock::ToolUse {
                    id: call.id,
                    name: call.name,
                    input: Value::Object(call.arguments),
                }),
                ContentItem::ToolResult(result) => Some(AnthropicApiBlock::ToolResult {
                    tool_use_id: result.tool_call_id,
                    content: result.content,
                    is_error: result.is_error,
                }),
            })
            .collect::<Vec<_>>();

        if content.is_empty() {
            return Err(ProviderError::invalid_request(format!(
                "{role} turn has no sendable content"
            )));
        }

        Ok(Self {
            role: role.to_string(),
            content,
        })
    }
}

pub(crate) fn parse_stop_reason(value: Option<&str>) -> StopReason {
    match value {
        Some("end_turn") => StopReason::EndTurn,
        Some("max_tokens") => StopReason::MaxTokens,
        Some("stop_sequence") => StopReason::StopSequence,
        Some("tool_use") => StopReason::ToolUse,
        _ => StopReason::Other,
    }
}

impl TryFrom<AnthropicApiResponse> for ModelResponse {
    type Error = ProviderError;

    fn try_from(value: AnthropicApiResponse) -> Result<Self, Self::Error> {
        let mut content = Vec::with_capacity(value.content.len());

        for block in value.content {
            match block {
                AnthropicApiBlock::Text { text } => content.push(ContentItem::Text(text)),
                AnthropicApiBlock::ToolUse { id, name, input } => {
                    let arguments = match input {
                        Value::Object(map) => map,
                        Value::Null => serde_json::Map::new(),
                        _ => {
                            return Err(ProviderError::transport(format!(
                                "tool_use block '{id}' carried non-object input"
                            )));
                        }
                    };
                    content.push(ContentItem::ToolCall(ToolCallRequest::new(id, name, arguments)));
                }
                AnthropicApiBlock::ToolResult { .. } | AnthropicApiBlock::Unsupported => {}
            }
        }

        Ok(ModelResponse {
            provider: ProviderId::Anthropic,
            model: value.model,
            content,
            stop_reason: parse_stop_reason(value.stop_reason.as_deref()),
            usage: TokenUsage {
                input_tokens: value.usage.input_tokens,
                output_tokens: value.usage.output_tokens,
            },
        })
    }
}
