//! Dynamic analysis - the second triage tier.
//!
//! Sends the conversation to the text model and extracts a structured result
//! from whatever comes back. Malformed output degrades into a keyword-sniffed
//! fallback object; only an unreachable model yields None.

use serde_json::{json, Map, Value};
use tracing::{info, warn};
use triage_common::{ChatMessage, FallbackLevel, Intent, TriageResult};

use crate::llm::{SamplingParams, TextGenerator};
use crate::triage::prompts::{build_conversation_prompt, PromptMode};

/// Reply used when the parsed JSON carries no "reply" field.
const DEFAULT_REPLY: &str = "I'm here to help you find doctors and book appointments.";

/// Confidence stamped onto keyword-sniffed fallback objects.
const SNIFFED_CONFIDENCE: f64 = 0.5;

/// Run the model over the conversation and shape its output.
///
/// Returns None only when the generator call itself fails; every other
/// condition produces a structurally valid result.
pub async fn analyze(
    generator: &dyn TextGenerator,
    params: SamplingParams,
    history: &[ChatMessage],
) -> Option<TriageResult> {
    let prompt = build_conversation_prompt(history, PromptMode::Dynamic);
    info!("Sending prompt to model ({} chars)", prompt.len());

    let raw = match generator.generate(&prompt, params).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Model generation failed: {}", e);
            return None;
        }
    };

    let mut result = match parse_model_output(&raw) {
        Some(result) => result,
        None => {
            warn!("No parseable JSON in model output, keyword-sniffing instead");
            sniff_fallback(&raw)
        }
    };

    result
        .entities
        .insert("fallback_level".to_string(), json!(FallbackLevel::Dynamic.as_str()));
    result.raw_model_output = Some(raw);

    Some(result)
}

/// Slice from the first '{' to the last '}' and parse strictly.
fn parse_model_output(raw: &str) -> Option<TriageResult> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }

    let parsed: Value = serde_json::from_str(&raw[start..=end]).ok()?;

    let reply = parsed
        .get("reply")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_REPLY)
        .to_string();
    let intent = parsed
        .get("intent")
        .and_then(Value::as_str)
        .map(Intent::from_model_str)
        .unwrap_or(Intent::SymptomCheck);
    let entities = parsed
        .get("entities")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);

    let mut result = TriageResult::new(reply, intent);
    result.entities = entities;
    Some(result)
}

/// Secondary keyword sniffing over the raw text when JSON extraction fails.
fn sniff_fallback(raw: &str) -> TriageResult {
    let lower = raw.to_lowercase();

    let specialty = if ["gastro", "stomach", "nausea"].iter().any(|k| lower.contains(k)) {
        "Gastroenterology"
    } else if ["cardio", "heart"].iter().any(|k| lower.contains(k)) {
        "Cardiology"
    } else if ["ortho", "joint"].iter().any(|k| lower.contains(k)) {
        "Orthopedics"
    } else {
        "General Medicine"
    };

    let mut result = TriageResult::new(
        format!("Based on your symptoms, I recommend seeing a {specialty} specialist."),
        Intent::SymptomCheck,
    );
    result.entities.insert("specialty".into(), json!(specialty));
    result.entities.insert("symptoms".into(), json!(["general symptoms"]));
    result.entities.insert("confidence".into(), json!(SNIFFED_CONFIDENCE));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedGenerator;

    fn history() -> Vec<ChatMessage> {
        vec![ChatMessage::user("I have sharp stomach pain after eating")]
    }

    #[tokio::test]
    async fn test_valid_json_with_surrounding_prose() {
        let gen = ScriptedGenerator::with_responses([concat!(
            "Sure, here is the analysis:\n",
            r#"{"reply": "See a gastroenterologist.", "intent": "symptom_check", "#,
            r#""entities": {"specialty": "Gastroenterology", "symptoms": ["stomach pain"], "confidence": 0.85}}"#,
            "\nHope that helps!"
        )]);

        let result = analyze(&gen, SamplingParams::default(), &history()).await.unwrap();
        assert_eq!(result.reply, "See a gastroenterologist.");
        assert_eq!(result.intent, Intent::SymptomCheck);
        assert_eq!(result.specialty(), Some("Gastroenterology"));
        assert_eq!(result.confidence(), 0.85);
        assert_eq!(result.entities.get("fallback_level"), Some(&json!("dynamic")));
        assert!(result.raw_model_output.as_deref().unwrap().contains("Hope that helps!"));
    }

    #[tokio::test]
    async fn test_missing_fields_get_defaults() {
        let gen = ScriptedGenerator::with_responses([r#"{"entities": {"confidence": 0.9}}"#]);

        let result = analyze(&gen, SamplingParams::default(), &history()).await.unwrap();
        assert_eq!(result.reply, DEFAULT_REPLY);
        assert_eq!(result.intent, Intent::SymptomCheck);
        assert_eq!(result.confidence(), 0.9);
    }

    #[tokio::test]
    async fn test_garbage_output_sniffs_keywords() {
        let gen = ScriptedGenerator::with_responses([
            "The patient clearly has some kind of stomach trouble, maybe gastritis.",
        ]);

        let result = analyze(&gen, SamplingParams::default(), &history()).await.unwrap();
        assert_eq!(result.intent, Intent::SymptomCheck);
        assert_eq!(result.specialty(), Some("Gastroenterology"));
        assert_eq!(result.confidence(), SNIFFED_CONFIDENCE);
        assert_eq!(result.entities.get("fallback_level"), Some(&json!("dynamic")));
    }

    #[tokio::test]
    async fn test_garbage_without_keywords_sniffs_general_medicine() {
        let gen = ScriptedGenerator::with_responses(["I am not sure what to say here."]);

        let result = analyze(&gen, SamplingParams::default(), &history()).await.unwrap();
        assert_eq!(result.specialty(), Some("General Medicine"));
    }

    #[tokio::test]
    async fn test_reversed_braces_sniff() {
        let gen = ScriptedGenerator::with_responses(["} weird heart text {"]);

        let result = analyze(&gen, SamplingParams::default(), &history()).await.unwrap();
        assert_eq!(result.specialty(), Some("Cardiology"));
    }

    #[tokio::test]
    async fn test_unreachable_model_yields_none() {
        let gen = ScriptedGenerator::unavailable();
        assert!(analyze(&gen, SamplingParams::default(), &history()).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_intent_degrades_to_symptom_check() {
        let gen = ScriptedGenerator::with_responses([
            r#"{"reply": "ok", "intent": "buy_groceries", "entities": {}}"#,
        ]);

        let result = analyze(&gen, SamplingParams::default(), &history()).await.unwrap();
        assert_eq!(result.intent, Intent::SymptomCheck);
    }
}
