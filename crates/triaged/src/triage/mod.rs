//! Three-tier triage pipeline.
//!
//! Decision order is strict: the static mapper always wins when it matches,
//! the generative analyzer only sees genuinely novel inputs, and the fixed
//! clarification payload is the floor nothing falls past.

pub mod analyzer;
pub mod confidence;
pub mod fallback;
pub mod prompts;
pub mod static_map;

use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use triage_common::{ChatMessage, FallbackLevel, Intent, TriageResult};

use crate::llm::{SamplingParams, TextGenerator};

/// Confidence forced onto a dynamic result rescued by the clear-symptom
/// override.
const OVERRIDE_CONFIDENCE: f64 = 0.8;

/// The fixed clarification questions, in the order they are returned.
pub const CLARIFICATION_QUESTIONS: [&str; 4] = [
    "Where exactly do you feel the discomfort?",
    "What kind of discomfort is it (sharp, dull, burning, pressure)?",
    "When did it start?",
    "Does anything make it better or worse?",
];

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("message history is empty")]
    EmptyHistory,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Top-level orchestrator. Stateless across requests; holds only the
/// injected model capability and its sampling configuration.
pub struct TriageEngine {
    generator: Arc<dyn TextGenerator>,
    sampling: SamplingParams,
}

impl TriageEngine {
    pub fn new(generator: Arc<dyn TextGenerator>, sampling: SamplingParams) -> Self {
        Self {
            generator,
            sampling,
        }
    }

    pub fn generator(&self) -> &dyn TextGenerator {
        self.generator.as_ref()
    }

    /// Run one request through the decision sequence.
    pub async fn triage(&self, history: &[ChatMessage]) -> Result<TriageResult, TriageError> {
        if history.is_empty() {
            return Err(TriageError::EmptyHistory);
        }

        let latest = latest_user_content(history);

        // Tier 1: static mapping. Deterministic, zero latency, always wins.
        if let Some(m) = static_map::lookup(latest) {
            info!("Static mapping matched '{}' -> {}", m.phrase, m.specialty);
            return Ok(static_result(m));
        }

        // Tier 2: generative analysis behind the confidence gate.
        match analyzer::analyze(self.generator.as_ref(), self.sampling, history).await {
            None => {
                warn!("Model unavailable, answering from the keyword fallback");
                Ok(fallback::keyword_response(latest))
            }
            Some(mut result) => {
                if confidence::is_confident(&result) {
                    info!("Dynamic result accepted (confidence {:.2})", result.confidence());
                    return Ok(result);
                }

                // The user may have just supplied an unambiguous symptom;
                // don't ask them to clarify again.
                if confidence::has_clear_symptoms(latest) {
                    info!("Clear-symptom override applied to low-confidence result");
                    result
                        .entities
                        .insert("confidence".into(), json!(OVERRIDE_CONFIDENCE));
                    result
                        .entities
                        .insert("requires_clarification".into(), json!(false));
                    return Ok(result);
                }

                // Tier 3: ask for more detail.
                Ok(clarification_result())
            }
        }
    }
}

/// Content of the most recent user turn ("" when the history has none).
fn latest_user_content(history: &[ChatMessage]) -> &str {
    history
        .iter()
        .rev()
        .find(|m| m.is_user())
        .map(|m| m.content.as_str())
        .unwrap_or("")
}

fn static_result(m: static_map::StaticMatch) -> TriageResult {
    let mut result = TriageResult::new(
        format!(
            "Based on your symptoms, I recommend seeing a {specialty} specialist. \
             These symptoms are commonly treated by {specialty} doctors. \
             Would you like me to help you find available doctors and book an appointment?",
            specialty = m.specialty
        ),
        Intent::SymptomCheck,
    );
    result.entities.insert("specialty".into(), json!(m.specialty));
    result.entities.insert("symptoms".into(), json!([m.phrase]));
    result.entities.insert("confidence".into(), json!(1.0));
    result
        .entities
        .insert("requires_clarification".into(), json!(false));
    result
        .entities
        .insert("fallback_level".into(), json!(FallbackLevel::Static.as_str()));
    result
}

fn clarification_result() -> TriageResult {
    let mut result = TriageResult::new(
        "I'd like to help you find the right specialist. Could you provide more detail \
         about what you're experiencing?",
        Intent::Clarification,
    );
    result
        .entities
        .insert("requires_clarification".into(), json!(true));
    result.entities.insert(
        "fallback_level".into(),
        json!(FallbackLevel::Clarification.as_str()),
    );
    result.entities.insert(
        "clarification_questions".into(),
        json!(CLARIFICATION_QUESTIONS),
    );
    result
}
