//! Sentence-length and punctuation texture.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::{Captures, Regex};

use crate::catalog::Catalog;
use crate::hyperparameters::Hyperparameters;
use crate::segment::{Document, Segment};
use crate::text::{
    bare_word, capitalize_first, chance, choose, ends_alphanumeric, fill, rewrite_matches,
    soften_initial,
};

/// Words a long sentence may be split in front of.
const SPLIT_WORDS: &[&str] = &[
    "e", "ma", "però", "perché", "mentre", "poiché", "sebbene", "quando", "dove", "benché",
    "quindi", "oppure",
];

/// Verbs after which a comma before "che" would break the clause.
const REPORTING_VERBS: &[&str] = &[
    "dicono", "sostengono", "affermano", "ritengono", "osservano", "sostiene", "afferma",
    "ritiene", "osserva", "pensano", "credono", "sappiamo", "sembra", "significa",
];

static CHE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?P<word>\p{L}{7,}) che\b").unwrap());

static COLON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r":[ \t]+(?P<next>\p{Ll})").unwrap());

static COMMA_E_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r", e ").unwrap());

static COMMA_MA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r", ma ").unwrap());

static NUMBERED_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+(?:\.\d+)*[.)]?|[IVXLC]+\.)[ \t]").unwrap());

static HEADING_PARTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<hashes>#{1,6})[ \t]+(?P<title>.*?)[ \t:.]*$").unwrap());

// ---------------------------------------------------------------------------
// Sentence length
// ---------------------------------------------------------------------------

/// Where to cut `tokens`: the conjunction or comma closest to the midpoint inside
/// the window, otherwise the midpoint itself.
fn split_point(tokens: &[String], window: usize) -> usize {
    let mid = tokens.len() / 2;
    let lo = mid.saturating_sub(window).max(2);
    let hi = (mid + window).min(tokens.len() - 2);
    (lo..=hi)
        .filter(|&p| {
            SPLIT_WORDS.contains(&bare_word(&tokens[p]).as_str())
                || tokens[p - 1].ends_with([',', ';'])
        })
        .min_by_key(|&p| p.abs_diff(mid))
        .unwrap_or(mid)
}

fn split_segment(seg: &Segment, window: usize) -> (String, String) {
    let tokens = seg.tokens();
    let p = split_point(&tokens, window);
    let mut first = tokens[..p].join(" ");
    let trimmed = first.trim_end_matches([',', ';', ':']).len();
    first.truncate(trimmed);
    if !first.ends_with(['.', '!', '?']) {
        first.push('.');
    }
    let second = capitalize_first(&tokens[p..].join(" "));
    (first, second)
}

/// Split overlong sentences and drop dash asides into some mid-length ones.
pub fn vary_lengths(
    text: &str,
    catalog: &Catalog,
    hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut doc = Document::parse(text);
    let mut splits = 0;
    let mut i = 0;
    while i < doc.segments.len() {
        let seg = &doc.segments[i];
        if seg.is_prose() && seg.word_count() > hp.long_sentence_words.max(4) {
            let (first, second) = split_segment(seg, hp.split_window);
            doc.segments[i].text = first;
            doc.insert_after(i, second);
            splits += 1;
            // both halves are checked again
            continue;
        }
        i += 1;
    }

    let mut asides = 0;
    for seg in doc.segments.iter_mut().filter(|s| s.is_prose()) {
        let words = seg.word_count();
        if words < hp.interjection_min_words
            || words > hp.interjection_max_words
            || seg.text.contains('—')
            || !chance(rng, hp.interjection_probability)
        {
            continue;
        }
        let mut tokens = seg.tokens();
        let slots: Vec<usize> = (2..tokens.len() - 1)
            .filter(|&p| ends_alphanumeric(&tokens[p - 1]))
            .collect();
        let (Some(&p), Some(aside)) = (
            slots.choose(rng),
            choose(&catalog.vocabularies().dash_insertions, rng),
        ) else {
            continue;
        };
        tokens.insert(p, format!("— {aside} —"));
        seg.set_tokens(&tokens);
        asides += 1;
    }

    tracing::debug!(splits, asides, "sentence lengths");
    doc.render()
}

// ---------------------------------------------------------------------------
// Punctuation
// ---------------------------------------------------------------------------

fn vary_sentence(text: &str, hp: &Hyperparameters, rng: &mut StdRng) -> String {
    let mut out = text.to_string();

    if crate::text::word_count(&out) >= hp.che_comma_min_words {
        out = rewrite_matches(&out, &CHE_RE, |caps: &Captures| {
            let word = &caps["word"];
            if REPORTING_VERBS.contains(&word.to_lowercase().as_str())
                || !chance(rng, hp.che_comma_probability)
            {
                return None;
            }
            Some(format!("{word}, che"))
        })
        .0;
    }

    out = rewrite_matches(&out, &COLON_RE, |caps| {
        chance(rng, hp.colon_dash_probability).then(|| format!(" — {}", &caps["next"]))
    })
    .0;
    out = rewrite_matches(&out, &COMMA_E_RE, |_| {
        chance(rng, hp.and_semicolon_probability).then(|| "; ".to_string())
    })
    .0;
    rewrite_matches(&out, &COMMA_MA_RE, |_| {
        chance(rng, hp.but_semicolon_probability).then(|| "; ma ".to_string())
    })
    .0
}

/// Commas before "che", colons turned into dashes, some ", e" / ", ma" joins turned
/// into semicolons. Prose sentences only.
pub fn vary_punctuation(
    text: &str,
    _catalog: &Catalog,
    hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut doc = Document::parse(text);
    for seg in doc.segments.iter_mut().filter(|s| s.is_prose()) {
        seg.text = vary_sentence(&seg.text, hp, rng);
    }
    doc.render()
}

// ---------------------------------------------------------------------------
// Headings
// ---------------------------------------------------------------------------

enum HeadingMove {
    Demote,
    Strip,
    Question,
    Keep,
}

fn heading_move(hp: &Hyperparameters, rng: &mut StdRng) -> HeadingMove {
    let roll: f64 = rng.gen();
    let demote = hp.heading_demote_probability;
    let strip = demote + hp.heading_strip_probability;
    let question = strip + hp.heading_question_probability;
    if roll < demote {
        HeadingMove::Demote
    } else if roll < strip {
        HeadingMove::Strip
    } else if roll < question {
        HeadingMove::Question
    } else {
        HeadingMove::Keep
    }
}

/// With enough headings, demote, strip or rephrase as questions some of those after
/// the first.
pub fn vary_headings(
    text: &str,
    catalog: &Catalog,
    hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut doc = Document::parse(text);
    let headings: Vec<usize> = (0..doc.segments.len())
        .filter(|&i| doc.segments[i].is_heading())
        .collect();
    if headings.len() < hp.heading_variation_min.max(1) {
        return text.to_string();
    }

    let questions = &catalog.templates().heading_question;
    let mut changed = 0;
    for &i in &headings[1..] {
        let seg = &mut doc.segments[i];
        let Some(caps) = HEADING_PARTS_RE.captures(&seg.text) else {
            continue;
        };
        let hashes = caps["hashes"].to_string();
        let title = caps["title"].to_string();
        if title.is_empty() {
            continue;
        }
        let rewritten = match heading_move(hp, rng) {
            HeadingMove::Demote if hashes.len() < 6 => format!("#{hashes} {title}"),
            HeadingMove::Strip => title,
            HeadingMove::Question
                if !title.ends_with('?') && !NUMBERED_TITLE_RE.is_match(&title) =>
            {
                let Some(template) = choose(questions, rng) else {
                    continue;
                };
                let question = fill(
                    template,
                    &[
                        ("title", title.as_str()),
                        ("title_lower", soften_initial(&title).as_str()),
                    ],
                );
                format!("{hashes} {question}")
            }
            _ => continue,
        };
        seg.text = rewritten;
        changed += 1;
    }
    tracing::debug!(headings = headings.len(), changed, "heading variation");
    doc.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn long_sentence() -> String {
        let mut words: Vec<String> = (0..30).map(|i| format!("parola{i}")).collect();
        words[24].push(',');
        words.extend((30..56).map(|i| format!("voce{i}")));
        format!("Inizio {}.", words.join(" "))
    }

    #[test]
    fn long_sentences_are_split_near_the_middle() {
        let text = format!("Breve frase qui. {}\n\nAltro paragrafo.", long_sentence());
        let hp = Hyperparameters {
            interjection_probability: 0.0,
            ..Hyperparameters::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let out = vary_lengths(&text, &Catalog::builtin(), &hp, &mut rng);
        let doc = Document::parse(&out);
        assert!(doc.segments.iter().all(|s| s.word_count() <= 45), "{out}");
        assert!(out.contains("parola24."), "split should land on the comma: {out}");
        assert_eq!(doc.paragraph_breaks(), 1);
        assert!(out.ends_with("\n\nAltro paragrafo."));
    }

    #[test]
    fn very_long_sentences_are_split_until_every_fragment_fits() {
        let words: Vec<String> = (0..130).map(|i| format!("termine{i}")).collect();
        let text = format!("Apertura breve. Inizio {}.\n\nChiusura.", words.join(" "));
        let hp = Hyperparameters {
            interjection_probability: 0.0,
            ..Hyperparameters::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let out = vary_lengths(&text, &Catalog::builtin(), &hp, &mut rng);
        let doc = Document::parse(&out);
        let counts: Vec<usize> = doc.segments.iter().map(Segment::word_count).collect();
        assert!(counts.iter().all(|&n| n <= 45), "{counts:?}");
        assert!(counts.len() >= 5, "{counts:?}");
        assert_eq!(counts.iter().sum::<usize>(), 2 + 131 + 1);
        assert_eq!(doc.paragraph_breaks(), 1);
    }

    #[test]
    fn split_prefers_conjunctions() {
        let tokens: Vec<String> = "a b c d e f g h ma i j k l m n o p q r s"
            .split(' ')
            .map(str::to_string)
            .collect();
        assert_eq!(split_point(&tokens, 5), 8);
    }

    #[test]
    fn punctuation_variation_only_touches_prose() {
        let hp = Hyperparameters {
            colon_dash_probability: 1.0,
            ..Hyperparameters::default()
        };
        let mut rng = StdRng::seed_from_u64(2);
        let text = "## Nota: titolo\nIl punto è questo: serve tempo.";
        let out = vary_punctuation(text, &Catalog::builtin(), &hp, &mut rng);
        assert!(out.starts_with("## Nota: titolo\n"));
        assert!(out.ends_with("Il punto è questo — serve tempo."));
    }

    #[test]
    fn reporting_verbs_keep_their_che() {
        let hp = Hyperparameters {
            che_comma_min_words: 1,
            che_comma_probability: 1.0,
            ..Hyperparameters::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let out = vary_sentence("Gli studiosi sostengono che il modello regge.", &hp, &mut rng);
        assert_eq!(out, "Gli studiosi sostengono che il modello regge.");
        let out = vary_sentence("È un risultato importante che cambia tutto.", &hp, &mut rng);
        assert_eq!(out, "È un risultato importante, che cambia tutto.");
    }

    #[test]
    fn headings_vary_after_the_first() {
        let text = "# Inizio\nTesto.\n\n## Metodo\nTesto.\n\n## Dati\nTesto.\n\n## Esito\nTesto.";
        let hp = Hyperparameters {
            heading_demote_probability: 1.0,
            ..Hyperparameters::default()
        };
        let mut rng = StdRng::seed_from_u64(4);
        let out = vary_headings(text, &Catalog::builtin(), &hp, &mut rng);
        assert!(out.starts_with("# Inizio\n"));
        assert!(out.contains("### Metodo\n") && out.contains("### Esito\n"), "{out}");
    }

    #[test]
    fn few_headings_are_left_alone() {
        let text = "# Uno\nTesto.\n\n# Due\nTesto.";
        let mut rng = StdRng::seed_from_u64(4);
        let hp = Hyperparameters::default();
        assert_eq!(vary_headings(text, &Catalog::builtin(), &hp, &mut rng), text);
    }
}
