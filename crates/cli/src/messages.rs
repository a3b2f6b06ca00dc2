//! Messages exchanged between the chat surface and the assistant.
//!
//! Inbound messages come from the chat panel, outbound messages go back to it.
//! Both travel as JSON objects tagged by `type`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InboundMessageType {
    UserMessage,
    GetChatModel,
    ChangeChatModel,
}

impl InboundMessageType {
    const NAMES: [&'static str; 3] = ["UserMessage", "GetChatModel", "ChangeChatModel"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutboundMessageType {
    BotThinking,
    BotMessage,
    ChatModel,
}

impl OutboundMessageType {
    const NAMES: [&'static str; 3] = ["BotThinking", "BotMessage", "ChatModel"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "type")]
    pub message_type: InboundMessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl InboundMessage {
    /// Accepts only values passing [`is_inbound_message`]; unknown extra
    /// fields are ignored.
    pub fn parse(value: &Value) -> Option<Self> {
        if !is_inbound_message(value) {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    #[serde(rename = "type")]
    pub message_type: OutboundMessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl OutboundMessage {
    pub fn bot_thinking() -> Self {
        Self {
            message_type: OutboundMessageType::BotThinking,
            id: None,
            content: None,
        }
    }

    /// Bot reply with a fresh message id.
    pub fn bot_message(content: impl Into<String>) -> Self {
        Self {
            message_type: OutboundMessageType::BotMessage,
            id: Some(Uuid::new_v4().to_string()),
            content: Some(content.into()),
        }
    }

    pub fn chat_model(model: impl Into<String>) -> Self {
        Self {
            message_type: OutboundMessageType::ChatModel,
            id: None,
            content: Some(model.into()),
        }
    }
}

fn has_known_type(value: &Value, names: &[&str]) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    let type_ok = object
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| names.contains(&t));
    // absent is fine, null is not
    let content_ok = object.get("content").map_or(true, Value::is_string);
    type_ok && content_ok
}

/// An object with a known inbound `type` and, if present, string `content`.
pub fn is_inbound_message(value: &Value) -> bool {
    has_known_type(value, &InboundMessageType::NAMES)
}

pub fn is_outbound_message(value: &Value) -> bool {
    has_known_type(value, &OutboundMessageType::NAMES)
}
