use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

/// Targets, thresholds and probabilities used by the rewriting phases.
///
/// Every field has a default, so a JSON override only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    // Lexical
    pub diversify_ratio: f64,
    pub diversify_pair_probability: f64,

    // Structural
    pub rhetorical_answer_max_words: usize,
    pub uniform_heading_min: usize,

    // Noise injection
    pub colloquial_target: usize,
    pub uncertainty_target: usize,
    pub connector_target: usize,
    pub connector_min_words: usize,
    pub imperfection_min_sentences: usize,
    pub abrupt_transition_probability: f64,

    // Burstiness
    pub long_sentence_words: usize,
    pub split_window: usize,
    pub interjection_min_words: usize,
    pub interjection_max_words: usize,
    pub interjection_probability: f64,
    pub che_comma_min_words: usize,
    pub che_comma_probability: f64,
    pub colon_dash_probability: f64,
    pub and_semicolon_probability: f64,
    pub but_semicolon_probability: f64,
    pub heading_variation_min: usize,
    pub heading_demote_probability: f64,
    pub heading_strip_probability: f64,
    pub heading_question_probability: f64,

    // Analyzer
    pub short_sentence_max_words: usize,
    pub long_sentence_min_words: usize,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            diversify_ratio: 0.6,
            diversify_pair_probability: 0.5,
            rhetorical_answer_max_words: 8,
            colloquial_target: 6,
            uncertainty_target: 4,
            connector_target: 6,
            connector_min_words: 5,
            imperfection_min_sentences: 6,
            abrupt_transition_probability: 0.4,
            long_sentence_words: 45,
            split_window: 5,
            interjection_min_words: 15,
            interjection_max_words: 35,
            interjection_probability: 0.25,
            che_comma_min_words: 20,
            che_comma_probability: 0.3,
            colon_dash_probability: 0.2,
            and_semicolon_probability: 0.2,
            but_semicolon_probability: 0.15,
            heading_variation_min: 3,
            uniform_heading_min: 3,
            heading_demote_probability: 0.25,
            heading_strip_probability: 0.2,
            heading_question_probability: 0.2,
            short_sentence_max_words: 5,
            long_sentence_min_words: 40,
        }
    }
}

impl Hyperparameters {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}
