//! Tool execution context, output, and source record types.
//!
//! ```rust
//! use ltooling::{SourceRecord, ToolOutput};
//!
//! let output = ToolOutput::text("[MCP - Lesson 1]\nServers expose tools.")
//!     .with_source(SourceRecord::new("MCP - Lesson 1").with_link("https://example.com/mcp/1"));
//!
//! assert_eq!(output.sources.len(), 1);
//! assert_eq!(output.sources[0].link.as_deref(), Some("https://example.com/mcp/1"));
//! ```

use lcommon::{MetadataMap, SessionId, TraceId};

/// Citation for material a tool consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub text: String,
    pub link: Option<String>,
}

impl SourceRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_optional_link(mut self, link: Option<String>) -> Self {
        self.link = link;
        self
    }
}

/// Text handed back to the model, plus the sources behind it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolOutput {
    pub text: String,
    pub sources: Vec<SourceRecord>,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: SourceRecord) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_sources(mut self, sources: Vec<SourceRecord>) -> Self {
        self.sources.extend(sources);
        self
    }
}

impl From<String> for ToolOutput {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<&str> for ToolOutput {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutionContext {
    pub session_id: SessionId,
    pub trace_id: Option<TraceId>,
    pub tool_call_id: Option<String>,
    pub metadata: MetadataMap,
}

impl ToolExecutionContext {
    pub fn new(session_id: impl Into<SessionId>) -> Self {
        Self {
            session_id: session_id.into(),
            trace_id: None,
            tool_call_id: None,
            metadata: MetadataMap::new(),
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_tool_call_id(mut self, tool_call_id: impl Into<String>) -> Self {
        self.tool_call_id = Some(tool_call_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
