//! Prompt templates for the generative tiers.

use triage_common::ChatMessage;

/// Which instruction template to attach to the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    Dynamic,
    Clarification,
}

/// Instruction template for dynamic symptom analysis.
pub const DYNAMIC_ANALYSIS_PROMPT: &str = r#"You are a medical assistant. Analyze the patient's symptoms and respond ONLY in valid JSON format.

REQUIRED JSON FORMAT:
{
  "reply": "Your response to the patient",
  "intent": "symptom_check",
  "entities": {
    "specialty": "SPECIALTY_NAME",
    "symptoms": ["list of symptoms"],
    "confidence": 0.8
  }
}

SPECIALTIES (choose one):
Cardiology, Dermatology, Pulmonology, Gastroenterology, Orthopedics, Psychiatry, Ophthalmology, ENT, Gynecology, General Medicine

STRICT CONFIDENCE RULES:
- Use 0.8-1.0 ONLY for specific, clear symptoms (e.g., "chest pain", "stomach pain after eating")
- Use 0.4-0.6 for vague or unclear statements (e.g., "not feeling good", "something is wrong")
- If confidence < 0.7, you MUST add "requires_clarification": true

CLEAR SYMPTOM EXAMPLES (High Confidence 0.8-1.0):
Patient: "chest pain" -> {"reply": "I recommend seeing a Cardiology specialist for your chest pain.", "intent": "symptom_check", "entities": {"specialty": "Cardiology", "symptoms": ["chest pain"], "confidence": 0.9}}

Patient: "stomach pain after eating" -> {"reply": "Based on your digestive symptoms, I recommend a Gastroenterology specialist.", "intent": "symptom_check", "entities": {"specialty": "Gastroenterology", "symptoms": ["stomach pain", "digestive issues"], "confidence": 0.8}}

VAGUE INPUT EXAMPLES (Low Confidence 0.4-0.6):
Patient: "not feeling good" -> {"reply": "I understand you're not feeling well. Can you describe specific symptoms you're experiencing?", "intent": "symptom_check", "entities": {"symptoms": ["general discomfort"], "confidence": 0.4, "requires_clarification": true}}

Patient: "something is wrong" -> {"reply": "I'd like to help you find the right specialist. What specific symptoms are you experiencing?", "intent": "symptom_check", "entities": {"symptoms": ["unclear"], "confidence": 0.3, "requires_clarification": true}}

IMPORTANT: Never assign high confidence (>0.7) to vague statements like "not feeling good", "something is wrong", "feel weird", etc.

Respond with ONLY valid JSON, no other text."#;

/// Instruction template for asking clarification questions.
pub const CLARIFICATION_PROMPT: &str = r#"You are a medical appointment assistant. The user has provided symptoms that are unclear or ambiguous.
Your job is to ask specific follow-up questions to clarify the symptoms so you can recommend the right medical specialty.

You must respond in JSON format with these fields:
- "reply": Your conversational response asking for clarification
- "intent": "clarification"
- "entities": {"requires_clarification": true, "clarification_questions": [list of specific questions]}

Ask specific, helpful questions about:
- Location of symptoms
- Type of pain/discomfort (sharp, dull, burning, etc.)
- When symptoms occur (after eating, during activity, etc.)
- Duration and severity
- Associated symptoms

Keep questions simple and easy to understand."#;

/// Serialize the history and attach the mode's instruction template.
///
/// Turns become `"<Role>: <content>\n"` lines, role capitalized, original
/// order preserved.
pub fn build_conversation_prompt(history: &[ChatMessage], mode: PromptMode) -> String {
    let mut transcript = String::new();
    for msg in history {
        transcript.push_str(&capitalize(&msg.role));
        transcript.push_str(": ");
        transcript.push_str(&msg.content);
        transcript.push('\n');
    }

    let base = match mode {
        PromptMode::Dynamic => DYNAMIC_ANALYSIS_PROMPT,
        PromptMode::Clarification => CLARIFICATION_PROMPT,
    };

    format!("{base}\n\nConversation so far:\n{transcript}\nRespond in valid JSON format only.")
}

fn capitalize(role: &str) -> String {
    let mut chars = role.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_roles_capitalized_in_order() {
        let history = vec![
            ChatMessage::user("my head hurts"),
            ChatMessage::assistant("since when?"),
            ChatMessage::user("two days"),
        ];
        let prompt = build_conversation_prompt(&history, PromptMode::Dynamic);
        let expected = "User: my head hurts\nAssistant: since when?\nUser: two days\n";
        assert!(prompt.contains(expected));
    }

    #[test]
    fn test_dynamic_mode_carries_calibration_rules() {
        let prompt = build_conversation_prompt(&[ChatMessage::user("hi")], PromptMode::Dynamic);
        assert!(prompt.contains("STRICT CONFIDENCE RULES"));
        assert!(prompt.contains("Gynecology"));
        assert!(prompt.ends_with("Respond in valid JSON format only."));
    }

    #[test]
    fn test_clarification_mode_selects_other_template() {
        let prompt =
            build_conversation_prompt(&[ChatMessage::user("I feel weird")], PromptMode::Clarification);
        assert!(prompt.contains("clarification_questions"));
        assert!(!prompt.contains("STRICT CONFIDENCE RULES"));
    }

    #[test]
    fn test_empty_history() {
        let prompt = build_conversation_prompt(&[], PromptMode::Dynamic);
        assert!(prompt.contains("Conversation so far:\n\n"));
    }
}
