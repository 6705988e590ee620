//! Static symptom-to-specialty mapping - the first triage tier.
//!
//! Fixed table, loaded once, never mutated at runtime. Longer phrases are
//! tested first so "chest pain" wins over any shorter overlapping entry;
//! single words of four letters or fewer only match at word boundaries so
//! "ear" cannot match inside "early".

use once_cell::sync::Lazy;
use regex::Regex;

/// Known symptom phrasings and the specialty that treats them.
///
/// The legacy fallback table in `fallback.rs` is a separate, smaller list
/// used only when the model is unreachable; the two are intentionally not
/// merged.
const STATIC_SYMPTOM_MAP: &[(&str, &str)] = &[
    ("chest pain", "Cardiology"),
    ("heart problems", "Cardiology"),
    ("heart pain", "Cardiology"),
    ("high blood pressure", "Cardiology"),
    ("shortness of breath", "Cardiology"),
    ("skin issues", "Dermatology"),
    ("rashes", "Dermatology"),
    ("acne", "Dermatology"),
    ("moles", "Dermatology"),
    ("skin rash", "Dermatology"),
    ("cough", "Pulmonology"),
    ("breathing issues", "Pulmonology"),
    ("asthma", "Pulmonology"),
    ("lung problems", "Pulmonology"),
    ("breathing problems", "Pulmonology"),
    ("stomach pain", "Gastroenterology"),
    ("digestion", "Gastroenterology"),
    ("nausea", "Gastroenterology"),
    ("stomach issues", "Gastroenterology"),
    ("joint pain", "Orthopedics"),
    ("muscle pain", "Orthopedics"),
    ("arthritis", "Orthopedics"),
    ("back pain", "Orthopedics"),
    ("mental health", "Psychiatry"),
    ("anxiety", "Psychiatry"),
    ("depression", "Psychiatry"),
    ("stress", "Psychiatry"),
    ("eye problems", "Ophthalmology"),
    ("vision", "Ophthalmology"),
    ("eye pain", "Ophthalmology"),
    ("ear", "ENT"),
    ("nose", "ENT"),
    ("throat", "ENT"),
    ("ear pain", "ENT"),
    ("throat pain", "ENT"),
    ("women's health", "Gynecology"),
    ("pregnancy", "Gynecology"),
    ("general checkup", "General Medicine"),
    ("fever", "General Medicine"),
    ("common cold", "General Medicine"),
    ("cold", "General Medicine"),
];

/// Entries sorted by phrase length descending, computed once at first use.
static SORTED_ENTRIES: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut entries = STATIC_SYMPTOM_MAP.to_vec();
    entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    entries
});

/// Single-token phrases up to this length require a word-boundary match.
const WORD_BOUNDARY_MAX_LEN: usize = 4;

/// A successful static lookup: the phrase that matched and its specialty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticMatch {
    pub phrase: &'static str,
    pub specialty: &'static str,
}

/// Find the most specific known symptom phrase in `text`, case-insensitive.
pub fn lookup(text: &str) -> Option<StaticMatch> {
    if text.trim().is_empty() {
        return None;
    }

    let lower = text.to_lowercase();

    for &(phrase, specialty) in SORTED_ENTRIES.iter() {
        let matched = if !phrase.contains(' ') && phrase.len() <= WORD_BOUNDARY_MAX_LEN {
            let pattern = format!(r"\b{}\b", regex::escape(phrase));
            Regex::new(&pattern)
                .map(|re| re.is_match(&lower))
                .unwrap_or(false)
        } else {
            lower.contains(phrase)
        };

        if matched {
            return Some(StaticMatch { phrase, specialty });
        }
    }

    None
}
