//! Command input value object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Where a command came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandSource {
    Voice,
    #[default]
    Text,
    Scheduled,
}

impl CommandSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandSource::Voice => "voice",
            CommandSource::Text => "text",
            CommandSource::Scheduled => "scheduled",
        }
    }
}

impl std::str::FromStr for CommandSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "voice" => Ok(CommandSource::Voice),
            "text" => Ok(CommandSource::Text),
            "scheduled" => Ok(CommandSource::Scheduled),
            _ => Err(format!("Invalid CommandSource: {}", s)),
        }
    }
}

impl std::fmt::Display for CommandSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single natural-language directive submitted to the orchestrator.
///
/// Fields are private; the value is immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandInput {
    text: String,
    source: CommandSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_context: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Map<String, Value>>,
}

impl CommandInput {
    pub fn new(text: impl Into<String>, source: CommandSource) -> Self {
        Self {
            text: text.into(),
            source,
            user_context: None,
            metadata: None,
        }
    }

    pub fn with_user_context(mut self, context: Map<String, Value>) -> Self {
        self.user_context = Some(context);
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> CommandSource {
        self.source
    }

    pub fn user_context(&self) -> Option<&Map<String, Value>> {
        self.user_context.as_ref()
    }

    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.metadata.as_ref()
    }

    /// True when the text carries nothing to classify.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Metadata recorded on the audit entry: the source plus caller metadata.
    pub fn audit_metadata(&self) -> Value {
        let mut map = Map::new();
        map.insert("source".to_string(), Value::from(self.source.as_str()));
        if let Some(extra) = &self.metadata {
            for (k, v) in extra {
                map.insert(k.clone(), v.clone());
            }
        }
        Value::Object(map)
    }
}
