//! Confidence gate and the clear-symptom override.

use triage_common::TriageResult;

/// Minimum confidence when a specialty is already attached (Rule A).
const SPECIALTY_SHORTCUT_THRESHOLD: f64 = 0.6;

/// Minimum confidence without a specialty (Rule B).
const STRICT_THRESHOLD: f64 = 0.7;

/// Whether a dynamic result is trustworthy enough to return directly.
///
/// Rule A accepts any result that names a specialty with confidence >= 0.6,
/// even when the model also flagged requires_clarification. Rule B demands
/// >= 0.7 and no clarification flag. Everything else is rejected, so a
/// malformed entity bag reads as zero confidence and falls toward
/// clarification rather than a possibly-wrong recommendation.
pub fn is_confident(result: &TriageResult) -> bool {
    let confidence = result.confidence();

    if result.specialty().is_some() && confidence >= SPECIALTY_SHORTCUT_THRESHOLD {
        return true;
    }

    confidence >= STRICT_THRESHOLD && !result.requires_clarification()
}

/// Unambiguous symptom phrases that bypass clarification outright.
const CLEAR_SYMPTOM_PHRASES: &[&str] = &[
    "dizzy and nauseous",
    "joint stiffness",
    "chest tightness",
    "vision problems",
    "shortness of breath",
    "stomach cramps",
    "skin rash",
    "sore throat",
    "ear ache",
    "blurred vision",
];

const SYMPTOM_WORDS: &[&str] = &["pain", "hurt", "ache", "feeling", "tired", "dizzy", "nauseous"];

const DURATION_WORDS: &[&str] = &["for", "since", "days", "weeks", "hours"];

/// Escape hatch for utterances that plainly describe a symptom.
///
/// Used to avoid re-asking for clarification when the user has just supplied
/// an unambiguous symptom, typically right after being asked to clarify.
pub fn has_clear_symptoms(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }

    let lower = text.to_lowercase();

    if CLEAR_SYMPTOM_PHRASES.iter().any(|p| lower.contains(p)) {
        return true;
    }

    let has_symptom_word = SYMPTOM_WORDS.iter().any(|w| lower.contains(w));
    // Duration words are short ("for"), so match whole tokens only --
    // "discomfort" must not count as a duration signal.
    let has_duration_word = lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| DURATION_WORDS.contains(&token));

    has_symptom_word && has_duration_word
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use triage_common::{Intent, TriageResult};

    fn result_with(entities: serde_json::Value) -> TriageResult {
        let mut result = TriageResult::new("r", Intent::SymptomCheck);
        result.entities = entities.as_object().cloned().unwrap();
        result
    }

    #[test]
    fn test_rule_a_specialty_shortcut() {
        let r = result_with(json!({"specialty": "Cardiology", "confidence": 0.65}));
        assert!(is_confident(&r));
    }

    #[test]
    fn test_rule_a_ignores_clarification_flag_in_band() {
        // Accepted via Rule A even though the model asked to clarify;
        // deliberate preservation of the source behavior.
        let r = result_with(json!({
            "specialty": "Orthopedics",
            "confidence": 0.6,
            "requires_clarification": true
        }));
        assert!(is_confident(&r));
    }

    #[test]
    fn test_rule_b_strict_threshold() {
        let r = result_with(json!({"confidence": 0.75, "requires_clarification": false}));
        assert!(is_confident(&r));
    }

    #[test]
    fn test_rule_b_rejects_clarification_flag() {
        let r = result_with(json!({"confidence": 0.75, "requires_clarification": true}));
        assert!(!is_confident(&r));
    }

    #[test]
    fn test_low_confidence_rejected() {
        let r = result_with(json!({"confidence": 0.5}));
        assert!(!is_confident(&r));
    }

    #[test]
    fn test_specialty_below_shortcut_rejected() {
        let r = result_with(json!({"specialty": "Cardiology", "confidence": 0.55}));
        assert!(!is_confident(&r));
    }

    #[test]
    fn test_empty_bag_rejected() {
        let r = TriageResult::new("r", Intent::SymptomCheck);
        assert!(!is_confident(&r));
    }

    #[test]
    fn test_clear_phrase_matches() {
        assert!(has_clear_symptoms("I've been dizzy and nauseous all morning"));
        assert!(has_clear_symptoms("some chest tightness when climbing stairs"));
    }

    #[test]
    fn test_symptom_plus_duration_matches() {
        assert!(has_clear_symptoms("my knees hurt for 3 days"));
        assert!(has_clear_symptoms("back ache since last week and it got worse")); // "since"
    }

    #[test]
    fn test_symptom_without_duration_rejected() {
        assert!(!has_clear_symptoms("not feeling good"));
        assert!(!has_clear_symptoms("feeling some discomfort")); // "for" inside "discomfort" is not a token
    }

    #[test]
    fn test_duration_without_symptom_rejected() {
        assert!(!has_clear_symptoms("I have been here for two days"));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(!has_clear_symptoms(""));
        assert!(!has_clear_symptoms("   "));
    }
}
