use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::{Captures, Regex};

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

static PUNCT_STRIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\w]+|[^\w]+$").unwrap());

static SENTENCE_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?][ \t]+)(\p{Ll})").unwrap());

static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\S)[ \t]{2,}").unwrap());

static SPACE_BEFORE_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+([,.;:!?])").unwrap());

static DOUBLE_COMMA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",(?:[ \t]*,)+").unwrap());

static COMMA_BEFORE_STOP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",[ \t]*([.!?;:])").unwrap());

static LINE_START_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^ (\S)").unwrap());

static TRAILING_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)[ \t]+$").unwrap());

static EXTRA_NEWLINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

static ITALIAN_STOPWORDS: Lazy<std::collections::HashSet<&'static str>> = Lazy::new(|| {
    [
        "il", "lo", "la", "i", "gli", "le", "un", "uno", "una", "di", "del", "della", "dei",
        "degli", "delle", "a", "al", "alla", "ai", "agli", "alle", "da", "dal", "dalla", "in",
        "nel", "nella", "nei", "negli", "nelle", "con", "su", "sul", "sulla", "per", "tra",
        "fra", "e", "ed", "o", "ma", "che", "chi", "cui", "non", "si", "ci", "ne", "se",
        "come", "anche", "più", "meno", "molto", "poco", "questo", "questa", "questi",
        "queste", "quello", "quella", "quelli", "quelle", "sono", "essere", "stato", "stata",
        "hanno", "avere", "aveva", "erano", "sempre", "ancora", "quando", "dove", "mentre",
        "perché", "quindi", "però", "tutto", "tutti", "tutte", "ogni", "altro", "altri",
        "altra", "altre", "stesso", "stessa", "loro", "nostro", "nostra", "suoi", "sue",
    ]
    .into_iter()
    .collect()
});

// ---------------------------------------------------------------------------
// Words and case
// ---------------------------------------------------------------------------

pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercased token with leading and trailing punctuation removed.
pub(crate) fn bare_word(token: &str) -> String {
    PUNCT_STRIP_RE.replace_all(token, "").to_lowercase()
}

pub(crate) fn is_content_word(token: &str) -> bool {
    token.chars().count() >= 5
        && token.chars().all(char::is_alphabetic)
        && !ITALIAN_STOPWORDS.contains(token.to_lowercase().as_str())
}

pub(crate) fn ends_alphanumeric(token: &str) -> bool {
    token.chars().last().is_some_and(char::is_alphanumeric)
}

pub(crate) fn starts_uppercase(s: &str) -> bool {
    s.chars()
        .find(|c| c.is_alphabetic())
        .is_some_and(char::is_uppercase)
}

pub(crate) fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first letter unless the leading word is an acronym.
pub(crate) fn soften_initial(s: &str) -> String {
    let first_word = s.split_whitespace().next().unwrap_or("");
    let letters: Vec<char> = first_word.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return s.to_string();
    }
    lowercase_first(s)
}

/// Give `replacement` the case of `original`'s first letter.
pub(crate) fn match_case(original: &str, replacement: &str) -> String {
    if starts_uppercase(original) {
        capitalize_first(replacement)
    } else {
        replacement.to_string()
    }
}

/// Uppercase the first letter after every sentence stop inside a generated fragment.
pub(crate) fn capitalize_sentence_starts(s: &str) -> String {
    SENTENCE_START_RE
        .replace_all(s, |caps: &Captures| {
            format!("{}{}", &caps[1], caps[2].to_uppercase())
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Randomness
// ---------------------------------------------------------------------------

pub(crate) fn choose<'a>(items: &'a [String], rng: &mut StdRng) -> Option<&'a str> {
    items.choose(rng).map(String::as_str)
}

/// Bernoulli draw that tolerates out-of-range probabilities from user config.
pub(crate) fn chance(rng: &mut StdRng, probability: f64) -> bool {
    rng.gen::<f64>() < probability
}

// ---------------------------------------------------------------------------
// Templates and rewriting
// ---------------------------------------------------------------------------

pub(crate) fn fill(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in slots {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

/// Rewrite every match of `re` for which `decide` returns a replacement.
///
/// A blank replacement counts as a deletion: when the deleted text started with an
/// uppercase letter, the next letter in the output is capitalized so the sentence
/// still opens correctly. Returns the new text and the number of rewritten matches.
pub(crate) fn rewrite_matches<F>(text: &str, re: &Regex, mut decide: F) -> (String, usize)
where
    F: FnMut(&Captures<'_>) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut edits = 0;
    let mut capitalize = false;

    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_capitalized(&mut out, &text[last..whole.start()], &mut capitalize);
        match decide(&caps) {
            Some(replacement) => {
                edits += 1;
                if replacement.trim().is_empty() {
                    out.push_str(&replacement);
                    capitalize = capitalize || starts_uppercase(whole.as_str());
                } else {
                    push_capitalized(&mut out, &replacement, &mut capitalize);
                }
            }
            None => push_capitalized(&mut out, whole.as_str(), &mut capitalize),
        }
        last = whole.end();
    }
    push_capitalized(&mut out, &text[last..], &mut capitalize);
    (out, edits)
}

fn push_capitalized(out: &mut String, piece: &str, capitalize: &mut bool) {
    let trimmed = piece.trim_start();
    if !*capitalize || trimmed.is_empty() {
        out.push_str(piece);
        return;
    }
    out.push_str(&piece[..piece.len() - trimmed.len()]);
    out.push_str(&capitalize_first(trimmed));
    *capitalize = false;
}

// ---------------------------------------------------------------------------
// Whitespace
// ---------------------------------------------------------------------------

/// Collapse the spacing and comma debris that deletions leave behind.
pub(crate) fn tidy_punctuation(text: &str) -> String {
    let out = MULTI_SPACE_RE.replace_all(text, "${1} ");
    let out = SPACE_BEFORE_PUNCT_RE.replace_all(&out, "${1}");
    let out = DOUBLE_COMMA_RE.replace_all(&out, ",");
    let out = COMMA_BEFORE_STOP_RE.replace_all(&out, "${1}");
    LINE_START_SPACE_RE.replace_all(&out, "${1}").into_owned()
}

/// Final layout pass: tidy punctuation, drop trailing blanks, keep at most one empty
/// line between paragraphs.
pub(crate) fn normalize_layout(text: &str) -> String {
    let out = tidy_punctuation(text);
    let out = TRAILING_SPACE_RE.replace_all(&out, "");
    let out = EXTRA_NEWLINES_RE.replace_all(&out, "\n\n");
    out.trim().to_string()
}
