//! Rule-based responder used when the text model is unreachable.
//!
//! This keyword table predates the static mapper and is deliberately kept
//! separate from it: this list is the last resort when no model answers,
//! while the static mapper is the first tier of the normal pipeline.

use serde_json::json;
use triage_common::{Intent, TriageResult};

/// Legacy symptom keyword list. Plain substring containment, first hit wins.
const SYMPTOM_KEYWORDS: &[(&str, &str)] = &[
    ("chest pain", "Cardiology"),
    ("heart", "Cardiology"),
    ("skin", "Dermatology"),
    ("rash", "Dermatology"),
    ("cough", "Pulmonology"),
    ("breathing", "Pulmonology"),
    ("stomach", "Gastroenterology"),
    ("nausea", "Gastroenterology"),
    ("joint pain", "Orthopedics"),
    ("back pain", "Orthopedics"),
    ("eye", "Ophthalmology"),
    ("vision", "Ophthalmology"),
    ("ear", "ENT"),
    ("throat", "ENT"),
];

const BOOKING_KEYWORDS: &[&str] = &["book", "appointment", "schedule", "reserve"];

/// Answer a message with keywords only. Always succeeds.
pub fn keyword_response(user_message: &str) -> TriageResult {
    let lower = user_message.to_lowercase();

    if BOOKING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        let mut result = TriageResult::new(
            "I'll help you book an appointment. Let me process your request.",
            Intent::BookAppointment,
        );
        result.entities.insert("action".into(), json!("book"));
        return result;
    }

    for &(symptom, specialty) in SYMPTOM_KEYWORDS {
        if lower.contains(symptom) {
            let mut result = TriageResult::new(
                format!(
                    "Based on your symptoms, I recommend seeing a {specialty} specialist. \
                     Would you like me to help you book an appointment?"
                ),
                Intent::SymptomCheck,
            );
            result.entities.insert("specialty".into(), json!(specialty));
            result.entities.insert("symptoms".into(), json!([symptom]));
            return result;
        }
    }

    TriageResult::new(
        "I'm here to help you find doctors based on your symptoms or book appointments. \
         You can tell me about your symptoms or ask to book with a specific type of doctor.",
        Intent::GeneralChat,
    )
}
