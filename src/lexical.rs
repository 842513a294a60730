//! Phrase- and word-level substitution driven by the catalog tables.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::index::sample;

use crate::catalog::{Catalog, CompiledEntry};
use crate::hyperparameters::Hyperparameters;
use crate::text::{chance, choose, match_case, rewrite_matches, tidy_punctuation};

/// Replace every occurrence of each high-frequency phrase, longest phrase first.
pub fn substitute_phrases(
    text: &str,
    catalog: &Catalog,
    _hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut out = text.to_string();
    let mut total = 0;
    for entry in catalog.phrases() {
        let (next, n) = rewrite_matches(&out, &entry.pattern, |caps| {
            let alt = choose(&entry.alternatives, rng)?;
            Some(match_case(&caps[0], alt))
        });
        out = next;
        total += n;
    }
    tracing::debug!(replaced = total, "phrase substitution");
    out
}

/// Swap stock sentence openers ("Nel contesto attuale", ...) for plainer ones.
pub fn substitute_openers(
    text: &str,
    catalog: &Catalog,
    _hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut out = text.to_string();
    for entry in catalog.formal_openers() {
        let (next, _) = rewrite_matches(&out, &entry.pattern, |caps| {
            let alt = choose(&entry.alternatives, rng)?;
            Some(format!("{}{}", &caps["lead"], match_case(&caps["word"], alt)))
        });
        out = next;
    }
    out
}

/// Rewrite the first occurrence of each blacklist term. Terms without alternatives
/// are deleted together with the punctuation that framed them.
pub fn substitute_blacklist(
    text: &str,
    catalog: &Catalog,
    _hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut out = text.to_string();
    let mut total = 0;
    for entry in catalog.blacklist() {
        let (next, n) = rewrite_first(&out, entry, rng);
        out = next;
        total += n;
    }
    tracing::debug!(replaced = total, "blacklist substitution");
    tidy_punctuation(&out)
}

fn rewrite_first(text: &str, entry: &CompiledEntry, rng: &mut StdRng) -> (String, usize) {
    let mut done = false;
    rewrite_matches(text, &entry.pattern, |caps| {
        if done {
            return None;
        }
        done = true;
        if entry.alternatives.is_empty() {
            return Some(deletion_gap(&caps[0]));
        }
        let alt = choose(&entry.alternatives, rng)?;
        Some(match_case(&caps[0], alt))
    })
}

/// What a deleted match collapses to: a space when it sat between commas.
pub(crate) fn deletion_gap(matched: &str) -> String {
    if matched.starts_with(',') {
        " ".to_string()
    } else {
        String::new()
    }
}

/// Break up repeated catalog words: more than two occurrences get a share of the
/// repeats after the first replaced, exactly two get the second replaced on a coin
/// flip.
pub fn diversify_repetitions(
    text: &str,
    catalog: &Catalog,
    hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut out = text.to_string();
    for entry in catalog.repetitive() {
        let n = entry.pattern.find_iter(&out).count();
        let targets = repeat_targets(n, hp, rng);
        if targets.is_empty() {
            continue;
        }

        let mut index = 0;
        let (next, replaced) = rewrite_matches(&out, &entry.pattern, |caps| {
            let current = index;
            index += 1;
            if !targets.contains(&current) {
                return None;
            }
            let alt = choose(&entry.alternatives, rng)?;
            Some(match_case(&caps[0], alt))
        });
        tracing::trace!(term = %entry.term, occurrences = n, replaced, "diversified");
        out = next;
    }
    out
}

fn repeat_targets(n: usize, hp: &Hyperparameters, rng: &mut StdRng) -> HashSet<usize> {
    match n {
        0 | 1 => HashSet::new(),
        2 => {
            if chance(rng, hp.diversify_pair_probability) {
                HashSet::from([1])
            } else {
                HashSet::new()
            }
        }
        _ => {
            let repeats = n - 1;
            let ratio = hp.diversify_ratio.clamp(0.0, 1.0);
            let k = ((repeats as f64 * ratio).round() as usize).clamp(1, repeats);
            sample(rng, repeats, k).into_iter().map(|i| i + 1).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn setup() -> (std::sync::Arc<Catalog>, Hyperparameters, StdRng) {
        (
            Catalog::builtin(),
            Hyperparameters::default(),
            StdRng::seed_from_u64(7),
        )
    }

    #[test]
    fn phrase_keeps_leading_capital() {
        let (catalog, hp, mut rng) = setup();
        let out = substitute_phrases("Al giorno d'oggi si legge poco.", &catalog, &hp, &mut rng);
        assert!(!out.to_lowercase().contains("al giorno d'oggi"));
        assert!(out.chars().next().is_some_and(char::is_uppercase));
    }

    #[test]
    fn phrase_respects_word_boundaries() {
        let (catalog, hp, mut rng) = setup();
        let text = "Il fine di tutto è chiaro.";
        assert_eq!(substitute_phrases(text, &catalog, &hp, &mut rng), text);
    }

    #[test]
    fn blacklist_rewrites_first_occurrence_only() {
        let (catalog, hp, mut rng) = setup();
        let out = substitute_blacklist(
            "Il punto è cruciale. Anche il resto è cruciale.",
            &catalog,
            &hp,
            &mut rng,
        );
        assert_eq!(out.matches("cruciale").count(), 1);
        assert!(out.ends_with("è cruciale."));
    }

    #[test]
    fn blacklist_deletes_term_without_alternatives() {
        let (catalog, hp, mut rng) = setup();
        let out = substitute_blacklist("Il piano, indubbiamente, regge.", &catalog, &hp, &mut rng);
        assert_eq!(out, "Il piano regge.");
        let out = substitute_blacklist("Indubbiamente, il piano regge.", &catalog, &hp, &mut rng);
        assert_eq!(out, "Il piano regge.");
    }

    #[test]
    fn repeat_targets_follow_ratio() {
        let (_, hp, mut rng) = setup();
        let targets = repeat_targets(6, &hp, &mut rng);
        assert_eq!(targets.len(), 3);
        assert!(!targets.contains(&0));
        assert!(targets.iter().all(|&i| i < 6));
        assert!(repeat_targets(1, &hp, &mut rng).is_empty());
    }

    #[test]
    fn diversification_never_touches_the_first_occurrence() {
        let (catalog, hp, mut rng) = setup();
        let text = "Molto bene. Molto meglio. Molto chiaro. Molto vero.";
        let out = diversify_repetitions(text, &catalog, &hp, &mut rng);
        assert!(out.starts_with("Molto bene."));
        assert_eq!(out.matches("Molto").count(), 2);
    }
}
