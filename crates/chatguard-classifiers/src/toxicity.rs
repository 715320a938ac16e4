//! Toxicity signal (lexicon based)

use crate::classifier::{Classifier, SignalMetadata, SignalResult};
use aho_corasick::AhoCorasick;
use chatguard_core::Result;
use std::time::Instant;

const TOXIC_TERMS: &[&str] = &[
    "idiot", "stupid", "dumb", "trash", "garbage", "loser", "hate", "shut up", "uninstall",
    "worst", "sucks", "noob team", "retard", "moron",
];

/// Score added per distinct term found
const SCORE_PER_TERM: f32 = 0.35;

/// Toxicity classifier.
///
/// Lexicon-only, deterministic, and case-insensitive. Each distinct term
/// found adds [`SCORE_PER_TERM`]; the score is capped at 0.95.
pub struct ToxicityClassifier {
    name: String,
    terms: AhoCorasick,
}

impl ToxicityClassifier {
    /// Create a new toxicity classifier.
    pub fn new() -> Result<Self> {
        let terms = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(TOXIC_TERMS)
            .map_err(|e| {
                chatguard_core::Error::classifier(format!(
                    "Failed to build toxicity matcher: {e}"
                ))
            })?;

        Ok(Self {
            name: "toxicity".to_string(),
            terms,
        })
    }
}

impl Classifier for ToxicityClassifier {
    fn classify(&self, text: &str) -> Result<SignalResult> {
        let start = Instant::now();

        let mut seen = [false; TOXIC_TERMS.len()];
        let mut spans = Vec::new();
        for m in self.terms.find_iter(text) {
            seen[m.pattern().as_usize()] = true;
            spans.push((m.start(), m.end()));
        }
        let distinct = seen.iter().filter(|hit| **hit).count() as f32;

        let score = (distinct * SCORE_PER_TERM).clamp(0.0, 0.95);
        let label = if score >= 0.5 { "toxic" } else { "safe" };

        Ok(SignalResult {
            label: label.to_string(),
            score,
            metadata: SignalMetadata {
                spans,
                model: Some("toxicity-lexicon".to_string()),
            },
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
