//! Wire types for the chat endpoint and the health surface.

use crate::triage::Intent;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One turn of a conversation. Role is "user" or "assistant".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    pub fn is_user(&self) -> bool {
        self.role.eq_ignore_ascii_case("user")
    }
}

/// Request body for POST /chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Response body for POST /chat. The booking backend reads `intent` and
/// the `specialty`/`symptoms` entries out of `entities`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub intent: Intent,
    pub entities: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// Response body for GET /.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub status: String,
    pub model_loaded: bool,
}

/// Response body for GET /health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_status: String,
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_without_user_id() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"messages":[{"role":"user","content":"hi"}]}"#).unwrap();
        assert_eq!(req.messages.len(), 1);
        assert!(req.user_id.is_none());
        assert!(req.messages[0].is_user());
    }

    #[test]
    fn test_chat_response_omits_empty_raw() {
        let resp = ChatResponse {
            reply: "hello".to_string(),
            intent: Intent::GeneralChat,
            entities: Map::new(),
            raw_response: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("raw_response"));
        assert!(json.contains(r#""intent":"general_chat""#));
    }
}
