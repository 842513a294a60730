use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::catalog::{Catalog, PatternKind};
use crate::error::{Error, Result};
use crate::hyperparameters::Hyperparameters;
use crate::segment::Document;
use crate::structural::{
    closers_before_headings, connective_runs, enumerations, rhetorical_pairs, uniform_heading_count,
};
use crate::text::word_count;

static PARENTHETICAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^()\n]*\)").unwrap());

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Observational metrics for one text. Never fed back into rewriting.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub word_count: usize,
    pub sentence_count: usize,
    /// Coefficient of variation of sentence lengths in words.
    pub burstiness: f64,
    pub blacklist_hits: usize,
    pub pattern_counts: HashMap<String, usize>,
    pub markers: HashMap<String, usize>,
}

const MARKERS: [&str; 8] = [
    "colloquialisms",
    "uncertainty",
    "connector_openers",
    "short_sentences",
    "long_sentences",
    "parentheticals",
    "dashes",
    "semicolons",
];

fn initial_counts<'a>(keys: impl IntoIterator<Item = &'a str>) -> HashMap<String, usize> {
    keys.into_iter().map(|k| (k.to_string(), 0)).collect()
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Population standard deviation over mean; 0 with fewer than two sentences.
pub fn burstiness(lengths: &[usize]) -> f64 {
    if lengths.len() < 2 {
        return 0.0;
    }
    let values: Vec<f64> = lengths.iter().map(|&l| l as f64).collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt() / mean
}

fn pattern_counts(
    text: &str,
    doc: &Document,
    catalog: &Catalog,
    hp: &Hyperparameters,
) -> HashMap<String, usize> {
    let mut counts = initial_counts(PatternKind::ALL.iter().map(|k| k.name()));
    for kind in PatternKind::ALL {
        let n = match kind {
            PatternKind::RhetoricalQa => catalog
                .rules_of(kind)
                .map(|r| rhetorical_pairs(doc, &r.pattern, hp.rhetorical_answer_max_words).len())
                .sum(),
            PatternKind::MaskedEnumeration => catalog
                .rules_of(kind)
                .map(|r| enumerations(text, &r.pattern).len())
                .sum(),
            PatternKind::ConnectiveRun => connective_runs(doc, catalog).len(),
            PatternKind::UniformHeading => uniform_heading_count(text, catalog),
            PatternKind::ClosingBeforeHeading => closers_before_headings(doc, catalog).len(),
            _ => catalog
                .rules_of(kind)
                .map(|r| r.pattern.find_iter(text).count())
                .sum(),
        };
        counts.insert(kind.name().to_string(), n);
    }
    counts
}

fn marker_counts(
    text: &str,
    lengths: &[usize],
    doc: &Document,
    catalog: &Catalog,
    hp: &Hyperparameters,
) -> HashMap<String, usize> {
    let mut m = initial_counts(MARKERS);
    let connector_openers = doc
        .segments
        .iter()
        .filter(|s| s.is_prose())
        .filter(|s| {
            s.text
                .split_whitespace()
                .next()
                .is_some_and(|w| catalog.is_connector(w))
        })
        .count();

    let values = [
        ("colloquialisms", catalog.colloquial_pattern().find_iter(text).count()),
        ("uncertainty", catalog.uncertainty_pattern().find_iter(text).count()),
        ("connector_openers", connector_openers),
        (
            "short_sentences",
            lengths.iter().filter(|&&l| l <= hp.short_sentence_max_words).count(),
        ),
        (
            "long_sentences",
            lengths.iter().filter(|&&l| l > hp.long_sentence_min_words).count(),
        ),
        ("parentheticals", PARENTHETICAL_RE.find_iter(text).count()),
        ("dashes", text.chars().filter(|c| matches!(c, '—' | '–')).count()),
        ("semicolons", text.matches(';').count()),
    ];
    for (key, n) in values {
        m.insert(key.to_string(), n);
    }
    m
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze `text` against the built-in catalog and default thresholds.
pub fn analyze(text: &str) -> Result<DiagnosticReport> {
    analyze_with(text, &Catalog::builtin(), &Hyperparameters::default())
}

pub fn analyze_with(
    text: &str,
    catalog: &Catalog,
    hp: &Hyperparameters,
) -> Result<DiagnosticReport> {
    if text.trim().is_empty() {
        return Err(Error::EmptyInput);
    }

    let doc = Document::parse(text);
    let lengths: Vec<usize> = doc
        .segments
        .iter()
        .filter(|s| s.is_prose())
        .map(|s| s.word_count())
        .collect();

    let blacklist_hits = catalog
        .blacklist()
        .iter()
        .map(|e| e.pattern.find_iter(text).count())
        .sum();

    Ok(DiagnosticReport {
        word_count: word_count(text),
        sentence_count: lengths.len(),
        burstiness: burstiness(&lengths),
        blacklist_hits,
        pattern_counts: pattern_counts(text, &doc, catalog, hp),
        markers: marker_counts(text, &lengths, &doc, catalog, hp),
    })
}
