//! Human-noise injection.
//!
//! Each step counts what the text already has and only adds enough to reach its
//! target, so running a step twice never piles up markers. Positions are drawn
//! from interior prose sentences; separators are never touched.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::Catalog;
use crate::hyperparameters::Hyperparameters;
use crate::segment::Document;
use crate::text::{
    bare_word, chance, choose, ends_alphanumeric, is_content_word, soften_initial,
};

/// Vocabulary items in random order, cycling once exhausted.
fn deck<'a>(items: &'a [String], rng: &mut StdRng) -> impl Iterator<Item = &'a str> {
    let mut shuffled: Vec<&str> = items.iter().map(String::as_str).collect();
    shuffled.shuffle(rng);
    shuffled.into_iter().cycle()
}

fn pick<T: Copy>(pool: &[T], n: usize, rng: &mut StdRng) -> Vec<T> {
    pool.choose_multiple(rng, n).copied().collect()
}

// ---------------------------------------------------------------------------
// Colloquialisms
// ---------------------------------------------------------------------------

pub fn colloquialisms(
    text: &str,
    catalog: &Catalog,
    hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let present = catalog.colloquial_pattern().find_iter(text).count();
    let Some(need) = hp.colloquial_target.checked_sub(present).filter(|n| *n > 0) else {
        return text.to_string();
    };

    let mut doc = Document::parse(text);
    let eligible: Vec<usize> = doc
        .interior_indices()
        .into_iter()
        .filter(|&i| doc.segments[i].word_count() >= 4)
        .filter(|&i| !catalog.colloquial_pattern().is_match(&doc.segments[i].text))
        .collect();

    let mut words = deck(&catalog.vocabularies().colloquialisms, rng);
    let mut added = 0;
    for i in pick(&eligible, need, rng) {
        let seg = &mut doc.segments[i];
        let mut tokens = seg.tokens();
        let slots: Vec<usize> = [1, 2]
            .into_iter()
            .filter(|&a| tokens.len() >= a + 3 && ends_alphanumeric(&tokens[a]))
            .collect();
        let Some(&after) = slots.choose(rng) else {
            continue;
        };
        let Some(word) = words.next() else { break };
        tokens[after].push(',');
        tokens.insert(after + 1, format!("{word},"));
        seg.set_tokens(&tokens);
        added += 1;
    }
    tracing::debug!(present, added, "colloquialisms");
    doc.render()
}

// ---------------------------------------------------------------------------
// Uncertainty markers
// ---------------------------------------------------------------------------

pub fn uncertainty(
    text: &str,
    catalog: &Catalog,
    hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let present = catalog.uncertainty_pattern().find_iter(text).count();
    let Some(need) = hp.uncertainty_target.checked_sub(present).filter(|n| *n > 0) else {
        return text.to_string();
    };

    let mut doc = Document::parse(text);
    let eligible: Vec<usize> = doc
        .interior_indices()
        .into_iter()
        .filter(|&i| {
            let t = &doc.segments[i].text;
            t.ends_with('.') && !t.ends_with("..") && !t.contains('—') && word_count_ok(t)
        })
        .collect();

    let mut markers = deck(&catalog.vocabularies().uncertainty, rng);
    let mut added = 0;
    for i in pick(&eligible, need, rng) {
        let Some(marker) = markers.next() else { break };
        let seg = &mut doc.segments[i];
        let body = seg.text.trim_end_matches('.').trim_end();
        seg.text = if chance(rng, 0.5) {
            format!("{body} — {marker}.")
        } else {
            format!("{body} ({marker}).")
        };
        added += 1;
    }
    tracing::debug!(present, added, "uncertainty markers");
    doc.render()
}

fn word_count_ok(text: &str) -> bool {
    crate::text::word_count(text) >= 4
}

// ---------------------------------------------------------------------------
// Sentence-initial connectors
// ---------------------------------------------------------------------------

fn opens_with_connector(catalog: &Catalog, text: &str) -> bool {
    text.split_whitespace()
        .next()
        .is_some_and(|w| catalog.is_connector(w))
}

pub fn connectors(
    text: &str,
    catalog: &Catalog,
    hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut doc = Document::parse(text);
    let prose = doc.prose_indices();
    let present = prose
        .iter()
        .filter(|&&i| opens_with_connector(catalog, &doc.segments[i].text))
        .count();
    let Some(need) = hp.connector_target.checked_sub(present).filter(|n| *n > 0) else {
        return text.to_string();
    };

    let eligible: Vec<usize> = prose
        .iter()
        .skip(1)
        .copied()
        .filter(|&i| {
            let seg = &doc.segments[i];
            seg.word_count() > hp.connector_min_words
                && !opens_with_connector(catalog, &seg.text)
                && seg.text.chars().next().is_some_and(char::is_alphabetic)
        })
        .collect();

    let mut added = 0;
    for i in pick(&eligible, need, rng) {
        let Some(connector) = choose(&catalog.vocabularies().connectors, rng) else {
            break;
        };
        let seg = &mut doc.segments[i];
        let rest = soften_initial(&seg.text);
        let connector = if connector == "E" && rest.starts_with(['e', 'è', 'é', 'E', 'È']) {
            "Ed"
        } else {
            connector
        };
        seg.text = format!("{connector} {rest}");
        added += 1;
    }
    tracing::debug!(present, added, "sentence-initial connectors");
    doc.render()
}

// ---------------------------------------------------------------------------
// Deliberate imperfections
// ---------------------------------------------------------------------------

/// One word repetition, one self-correction, one throwaway parenthetical and, now
/// and then, an abrupt short transition. Only on texts long enough to carry them.
pub fn imperfections(
    text: &str,
    catalog: &Catalog,
    hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut doc = Document::parse(text);
    if doc.prose_indices().len() < hp.imperfection_min_sentences {
        return text.to_string();
    }
    let interior = doc.interior_indices();
    let vocab = catalog.vocabularies();
    let mut used: HashSet<usize> = HashSet::new();

    let mut order = interior.clone();
    order.shuffle(rng);
    let repeated = order.iter().copied().find(|&i| repeat_word(&mut doc, i, rng));
    used.extend(repeated);

    order.shuffle(rng);
    let correction = choose(&vocab.self_corrections, rng).unwrap_or_default();
    let corrected = order
        .iter()
        .copied()
        .filter(|i| !used.contains(i))
        .find(|&i| self_correct(&mut doc, i, correction, rng));
    used.extend(corrected);

    order.shuffle(rng);
    let aside = choose(&vocab.asides, rng).unwrap_or_default();
    let annotated = order
        .iter()
        .copied()
        .filter(|i| !used.contains(i))
        .find(|&i| add_parenthetical(&mut doc, i, aside));
    used.extend(annotated);

    if chance(rng, hp.abrupt_transition_probability) {
        if let (Some(&i), Some(transition)) = (
            interior.choose(rng),
            choose(&vocab.abrupt_transitions, rng),
        ) {
            doc.insert_after(i, transition);
        }
    }

    tracing::debug!(touched = used.len(), "imperfections");
    doc.render()
}

fn repeat_word(doc: &mut Document, i: usize, rng: &mut StdRng) -> bool {
    let seg = &mut doc.segments[i];
    let mut tokens = seg.tokens();
    let candidates: Vec<usize> = (0..tokens.len().saturating_sub(3))
        .filter(|&t| is_content_word(&tokens[t]))
        .collect();
    let Some(&t) = candidates.choose(rng) else {
        return false;
    };
    let offset = rng.gen_range(2..=3).min(tokens.len() - 1 - t);
    let word = bare_word(&tokens[t]);
    tokens.insert(t + offset, word);
    seg.set_tokens(&tokens);
    true
}

fn self_correct(doc: &mut Document, i: usize, correction: &str, rng: &mut StdRng) -> bool {
    if correction.is_empty() {
        return false;
    }
    let seg = &mut doc.segments[i];
    let mut tokens = seg.tokens();
    if tokens.len() < 6 {
        return false;
    }
    let slots: Vec<usize> = (2..tokens.len() - 2)
        .filter(|&t| ends_alphanumeric(&tokens[t]))
        .collect();
    let Some(&t) = slots.choose(rng) else {
        return false;
    };
    tokens[t] = format!("{}, {correction},", tokens[t]);
    seg.set_tokens(&tokens);
    true
}

fn add_parenthetical(doc: &mut Document, i: usize, aside: &str) -> bool {
    let seg = &mut doc.segments[i];
    if aside.is_empty() || seg.text.contains('(') || seg.word_count() < 4 {
        return false;
    }
    let Some(stop) = seg.text.chars().last().filter(|c| matches!(c, '.' | '!')) else {
        return false;
    };
    let body = seg.text.trim_end_matches(stop).trim_end();
    seg.text = format!("{body} ({aside}){stop}");
    true
}
