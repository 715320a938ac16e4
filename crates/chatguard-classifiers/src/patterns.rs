//! Blocked-phrase signal
//!
//! Phrases match whole words, ASCII case-insensitive. A trailing `*` turns
//! the last word into a prefix: `cheat*` matches "cheats" and "cheater",
//! while `lag` matches "lag" but not "flag".

use crate::classifier::{Classifier, SignalMetadata, SignalResult};
use aho_corasick::AhoCorasick;
use chatguard_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A labelled phrase, as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseSpec {
    /// Label reported when the phrase matches
    pub label: String,

    /// Phrase to match, optionally ending in `*`
    pub pattern: String,
}

impl PhraseSpec {
    /// Check the pattern syntax: non-empty, `*` only as the last character
    pub fn validate(&self) -> Result<()> {
        self.parse().map(|_| ())
    }

    /// Matched text and whether the phrase ends in a prefix wildcard
    fn parse(&self) -> Result<(&str, bool)> {
        let (text, prefix) = match self.pattern.strip_suffix('*') {
            Some(stem) => (stem, true),
            None => (self.pattern.as_str(), false),
        };

        if text.trim().is_empty() {
            return Err(Error::config(format!(
                "blocked phrase '{}' has an empty pattern",
                self.label
            )));
        }
        if text.contains('*') {
            return Err(Error::config(format!(
                "blocked phrase '{}': '*' is only allowed at the end of '{}'",
                self.label, self.pattern
            )));
        }

        Ok((text, prefix))
    }
}

struct CompiledPhrase {
    label: String,
    prefix: bool,
}

/// Fast phrase matcher using the Aho-Corasick algorithm
pub struct PatternClassifier {
    name: String,
    patterns: AhoCorasick,
    phrases: Vec<CompiledPhrase>,
}

impl PatternClassifier {
    /// Create a new pattern classifier
    pub fn new(name: impl Into<String>, phrases: &[PhraseSpec]) -> Result<Self> {
        let parsed = phrases
            .iter()
            .map(PhraseSpec::parse)
            .collect::<Result<Vec<_>>>()?;

        let ac = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(parsed.iter().map(|(text, _)| *text))
            .map_err(|e| Error::classifier(format!("Failed to build phrase matcher: {}", e)))?;

        Ok(Self {
            name: name.into(),
            patterns: ac,
            phrases: phrases
                .iter()
                .zip(&parsed)
                .map(|(spec, (_, prefix))| CompiledPhrase {
                    label: spec.label.clone(),
                    prefix: *prefix,
                })
                .collect(),
        })
    }

    /// Whether a raw match sits on word boundaries
    fn on_word_boundaries(&self, text: &str, start: usize, end: usize, prefix: bool) -> bool {
        let matched = &text[start..end];

        let starts_word = matched.chars().next().is_some_and(is_word_char);
        if starts_word && text[..start].chars().next_back().is_some_and(is_word_char) {
            return false;
        }

        let ends_word = matched.chars().next_back().is_some_and(is_word_char);
        prefix || !ends_word || !text[end..].chars().next().is_some_and(is_word_char)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Classifier for PatternClassifier {
    fn classify(&self, text: &str) -> Result<SignalResult> {
        let start = Instant::now();

        let matches: Vec<_> = self
            .patterns
            .find_overlapping_iter(text)
            .filter(|m| {
                let prefix = self.phrases[m.pattern().as_usize()].prefix;
                self.on_word_boundaries(text, m.start(), m.end(), prefix)
            })
            .collect();

        let result = match matches.first() {
            None => SignalResult {
                label: "clean".to_string(),
                score: 0.0,
                metadata: SignalMetadata::default(),
                latency_us: start.elapsed().as_micros() as u64,
            },
            Some(first) => SignalResult {
                label: self.phrases[first.pattern().as_usize()].label.clone(),
                score: 1.0, // Phrase matches are binary
                metadata: SignalMetadata {
                    spans: matches.iter().map(|m| (m.start(), m.end())).collect(),
                    model: None,
                },
                latency_us: start.elapsed().as_micros() as u64,
            },
        };

        Ok(result)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
