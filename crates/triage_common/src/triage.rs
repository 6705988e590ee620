//! Triage domain types: intents, fallback levels, and the result bag.

use crate::chat::ChatResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The closed set of specialty names a recommendation may carry.
pub const SPECIALTIES: [&str; 10] = [
    "Cardiology",
    "Dermatology",
    "Pulmonology",
    "Gastroenterology",
    "Orthopedics",
    "Psychiatry",
    "Ophthalmology",
    "ENT",
    "Gynecology",
    "General Medicine",
];

/// Classified purpose of a user utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    SymptomCheck,
    BookAppointment,
    Clarification,
    GeneralChat,
}

impl Intent {
    /// Tolerant mapping for intent strings coming back from the model.
    /// Unknown strings read as `SymptomCheck`.
    pub fn from_model_str(s: &str) -> Self {
        match s {
            "book_appointment" => Intent::BookAppointment,
            "clarification" => Intent::Clarification,
            "general_chat" => Intent::GeneralChat,
            _ => Intent::SymptomCheck,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::SymptomCheck => "symptom_check",
            Intent::BookAppointment => "book_appointment",
            Intent::Clarification => "clarification",
            Intent::GeneralChat => "general_chat",
        }
    }
}

/// Which tier of the triage pipeline produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackLevel {
    Static,
    Dynamic,
    Clarification,
}

impl FallbackLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackLevel::Static => "static",
            FallbackLevel::Dynamic => "dynamic",
            FallbackLevel::Clarification => "clarification",
        }
    }
}

/// Outcome of one triage run.
///
/// `entities` is a loosely typed bag; the read helpers below are total and
/// fall back to safe defaults on any shape surprise, so a malformed bag can
/// never accept a recommendation it should have rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageResult {
    pub reply: String,
    pub intent: Intent,
    pub entities: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_model_output: Option<String>,
}

impl TriageResult {
    pub fn new(reply: impl Into<String>, intent: Intent) -> Self {
        Self {
            reply: reply.into(),
            intent,
            entities: Map::new(),
            raw_model_output: None,
        }
    }

    /// Self-reported certainty, 0.0 when absent or malformed.
    pub fn confidence(&self) -> f64 {
        self.entities
            .get("confidence")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    pub fn requires_clarification(&self) -> bool {
        self.entities
            .get("requires_clarification")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Recommended specialty; None when absent, null, or empty.
    pub fn specialty(&self) -> Option<&str> {
        self.entities
            .get("specialty")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn into_chat_response(self) -> ChatResponse {
        ChatResponse {
            reply: self.reply,
            intent: self.intent,
            entities: self.entities,
            raw_response: self.raw_model_output,
        }
    }
}
