//! Detection and rewriting of sentence- and paragraph-level templates.
//!
//! Every sub-phase is driven by the catalog's rule table: the rule's pattern finds
//! the construction and its [`Strategy`] says how to replace it. Sub-phases that
//! need sentence context (question/answer pairs, connective runs, closers before a
//! heading) work on a [`Document`] so separators come back untouched.

use std::collections::HashMap;
use std::ops::Range;

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use regex::{Captures, Regex};

use crate::catalog::{Catalog, PatternKind, StructuralRule, Strategy};
use crate::hyperparameters::Hyperparameters;
use crate::segment::Document;
use crate::text::{
    capitalize_first, capitalize_sentence_starts, choose, fill, lowercase_first, match_case,
    rewrite_matches, soften_initial,
};

static HASH_HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(#{1,6})[ \t]").unwrap());

fn fixed(rule: &StructuralRule) -> &[String] {
    match &rule.strategy {
        Strategy::Fixed(alternatives) => alternatives,
        Strategy::Template(_) => &[],
    }
}

fn templates(rule: &StructuralRule) -> &[String] {
    match &rule.strategy {
        Strategy::Template(templates) => templates,
        Strategy::Fixed(_) => &[],
    }
}

/// Apply non-overlapping edits back to front so earlier offsets stay valid.
fn splice_reverse(text: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by_key(|(range, _)| range.start);
    let mut out = text.to_string();
    for (range, replacement) in edits.into_iter().rev() {
        out.replace_range(range, &replacement);
    }
    out
}

// ---------------------------------------------------------------------------
// Text-level rules
// ---------------------------------------------------------------------------

pub fn strip_separators(
    text: &str,
    catalog: &Catalog,
    _hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut out = text.to_string();
    for rule in catalog.rules_of(PatternKind::VisualSeparator) {
        let (next, n) = rewrite_matches(&out, &rule.pattern, |_| {
            choose(fixed(rule), rng).map(str::to_string)
        });
        if n > 0 {
            tracing::debug!(removed = n, "visual separators");
        }
        out = next;
    }
    out
}

/// "Cinquecento. È il problema." → "Parliamo di Cinquecento: è il problema."
pub fn numeric_openers(
    text: &str,
    catalog: &Catalog,
    _hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut out = text.to_string();
    for rule in catalog.rules_of(PatternKind::NumericOpener) {
        let (next, _) = rewrite_matches(&out, &rule.pattern, |caps| {
            let template = choose(templates(rule), rng)?;
            let verb = lowercase_first(&caps["verb"]);
            let body = fill(template, &[("num", &caps["num"]), ("verb", verb.as_str())]);
            Some(format!("{}{}", &caps["lead"], capitalize_first(&body)))
        });
        out = next;
    }
    out
}

pub fn meta_asides(
    text: &str,
    catalog: &Catalog,
    _hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut out = text.to_string();
    for rule in catalog.rules_of(PatternKind::MetaAside) {
        let (next, _) = rewrite_matches(&out, &rule.pattern, |caps| {
            let alt = choose(fixed(rule), rng)?;
            let pre = caps.name("pre").map_or("", |m| m.as_str());
            let tail = &caps["tail"];
            if alt.trim().is_empty() {
                let between_commas = !pre.is_empty() && tail.contains(',');
                return Some(if between_commas { " " } else { "" }.to_string());
            }
            Some(format!("{pre}{}{tail}", match_case(&caps["term"], alt)))
        });
        out = next;
    }
    out
}

/// "Sulla carta X, ma in pratica Y" recast with a different pair of frames.
pub fn antitheses(
    text: &str,
    catalog: &Catalog,
    _hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut out = text.to_string();
    for rule in catalog.rules_of(PatternKind::Antithesis) {
        let (next, _) = rewrite_matches(&out, &rule.pattern, |caps| {
            let template = choose(templates(rule), rng)?;
            let ma = caps.name("ma").map_or("", |m| m.as_str());
            let body = fill(
                template,
                &[("middle", &caps["middle"]), ("joint", &caps["joint"]), ("ma", ma)],
            );
            Some(capitalize_sentence_starts(&match_case(&caps[0], &body)))
        });
        out = next;
    }
    out
}

fn at_sentence_start(text: &str, pos: usize) -> bool {
    let before = &text[..pos];
    let trimmed = before.trim_end_matches([' ', '\t']);
    trimmed.is_empty()
        || trimmed.ends_with('\n')
        || (trimmed.len() < before.len() && trimmed.ends_with(['.', '!', '?']))
}

/// Enumeration matches that open a sentence. Adjacent enumerations are found too,
/// since the lead is checked on the text rather than consumed by the pattern.
pub(crate) fn enumerations<'t>(text: &'t str, re: &Regex) -> Vec<Captures<'t>> {
    let mut found = Vec::new();
    let mut pos = 0;
    while let Some(caps) = re.captures_at(text, pos) {
        let whole = caps.get(0).map_or(pos..pos, |m| m.range());
        if at_sentence_start(text, whole.start) {
            pos = whole.end.max(whole.start + 1);
            found.push(caps);
        } else {
            pos = whole.start + text[whole.start..].chars().next().map_or(1, char::len_utf8);
        }
        if pos >= text.len() {
            break;
        }
    }
    found
}

/// "C'è X. C'è anche Y. E poi c'è Z." folded into one non-parallel sentence.
pub fn masked_enumerations(
    text: &str,
    catalog: &Catalog,
    _hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut out = text.to_string();
    for rule in catalog.rules_of(PatternKind::MaskedEnumeration) {
        let mut edits = Vec::new();
        for caps in enumerations(&out, &rule.pattern) {
            let Some(body) = caps.name("body") else { continue };
            let z = caps.name("z").map(|m| m.as_str().trim());
            let fitting: Vec<String> = templates(rule)
                .iter()
                .filter(|t| t.contains("{z}") == z.is_some())
                .cloned()
                .collect();
            let Some(template) = choose(&fitting, rng) else { continue };
            let rewritten = fill(
                template,
                &[
                    ("x", caps["x"].trim()),
                    ("y", caps["y"].trim()),
                    ("z", z.unwrap_or("")),
                ],
            );
            edits.push((body.range(), capitalize_first(&rewritten)));
        }
        if !edits.is_empty() {
            tracing::debug!(rewritten = edits.len(), "masked enumerations");
        }
        out = splice_reverse(&out, edits);
    }
    out
}

fn contract_a(subject: &str) -> String {
    const ARTICLES: [(&str, &str); 6] = [
        ("il ", "al "),
        ("lo ", "allo "),
        ("la ", "alla "),
        ("i ", "ai "),
        ("gli ", "agli "),
        ("le ", "alle "),
    ];
    for (article, contracted) in ARTICLES {
        if let Some(rest) = subject.strip_prefix(article) {
            return format!("{contracted}{rest}");
        }
    }
    for apostrophe in ["l'", "l’"] {
        if let Some(rest) = subject.strip_prefix(apostrophe) {
            return format!("all'{rest}");
        }
    }
    format!("a {subject}")
}

/// "X dicono che … Y dicono che …": the first attribution stays, later ones are
/// recast so the chain loses its parallel shape.
pub fn authority_chains(
    text: &str,
    catalog: &Catalog,
    _hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut out = text.to_string();
    for rule in catalog.rules_of(PatternKind::AuthorityChain) {
        let all = templates(rule);
        let mut edits = Vec::new();
        let mut last: Option<String> = None;
        for caps in rule.pattern.captures_iter(&out).skip(1) {
            let (Some(whole), Some(subject)) = (caps.get(0), caps.name("subject")) else {
                continue;
            };
            let fresh: Vec<String> = all
                .iter()
                .filter(|t| Some(*t) != last.as_ref() || all.len() == 1)
                .cloned()
                .collect();
            let Some(template) = choose(&fresh, rng).map(str::to_string) else {
                continue;
            };
            let softened = soften_initial(subject.as_str());
            let rewritten = fill(
                &template,
                &[
                    ("subject", softened.as_str()),
                    ("a_subject", contract_a(&softened).as_str()),
                ],
            );
            edits.push((subject.start()..whole.end(), capitalize_first(&rewritten)));
            last = Some(template);
        }
        if !edits.is_empty() {
            tracing::debug!(rewritten = edits.len(), "authority chain");
        }
        out = splice_reverse(&out, edits);
    }
    out
}

/// Index of a hash heading level used by most headings, or `##`.
fn dominant_heading_level(text: &str) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for caps in HASH_HEADING_RE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            *counts.entry(m.as_str()).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.len().cmp(&a.0.len())))
        .map_or_else(|| "##".to_string(), |(level, _)| level.to_string())
}

pub(crate) fn uniform_heading_count(text: &str, catalog: &Catalog) -> usize {
    catalog
        .rules_of(PatternKind::UniformHeading)
        .map(|rule| rule.pattern.find_iter(text).count())
        .sum()
}

/// Numbered or bold pseudo-headings become plain markdown headings once there are
/// enough of them to read as a template.
pub fn uniform_headings(
    text: &str,
    catalog: &Catalog,
    hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    if uniform_heading_count(text, catalog) < hp.uniform_heading_min.max(1) {
        return text.to_string();
    }
    let level = dominant_heading_level(text);
    let mut out = text.to_string();
    for rule in catalog.rules_of(PatternKind::UniformHeading) {
        let (next, _) = rewrite_matches(&out, &rule.pattern, |caps| {
            let template = choose(templates(rule), rng)?;
            let hashes = caps.name("hashes").map_or(level.as_str(), |m| m.as_str());
            Some(fill(template, &[("hashes", hashes), ("title", caps["title"].trim())]))
        });
        out = next;
    }
    out
}

// ---------------------------------------------------------------------------
// Sentence-level rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub(crate) struct QaPair {
    pub question: usize,
    pub q: String,
    pub a: String,
    pub end: String,
}

/// Questions answered by a short sentence in the same paragraph.
pub(crate) fn rhetorical_pairs(doc: &Document, re: &Regex, max_words: usize) -> Vec<QaPair> {
    let mut pairs = Vec::new();
    let mut i = 0;
    while i + 1 < doc.segments.len() {
        let (q, a) = (&doc.segments[i], &doc.segments[i + 1]);
        let candidate = q.is_prose()
            && a.is_prose()
            && q.text.ends_with('?')
            && !q.ends_paragraph()
            && a.word_count() <= max_words;
        if candidate {
            let joined = format!("{} {}", q.text, a.text);
            if let Some(caps) = re.captures(&joined) {
                pairs.push(QaPair {
                    question: i,
                    q: caps["q"].to_string(),
                    a: caps["a"].to_string(),
                    end: caps["end"].to_string(),
                });
                i += 2;
                continue;
            }
        }
        i += 1;
    }
    pairs
}

pub fn rhetorical_qa(
    text: &str,
    catalog: &Catalog,
    hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let Some(rule) = catalog.rules_of(PatternKind::RhetoricalQa).next() else {
        return text.to_string();
    };
    let mut doc = Document::parse(text);
    let pairs = rhetorical_pairs(&doc, &rule.pattern, hp.rhetorical_answer_max_words);
    if pairs.is_empty() {
        return text.to_string();
    }
    for pair in pairs.iter().rev() {
        let Some(template) = choose(templates(rule), rng) else { continue };
        let rewritten = fill(
            template,
            &[
                ("question", soften_initial(&pair.q).as_str()),
                ("Question", pair.q.as_str()),
                ("answer", soften_initial(&pair.a).as_str()),
                ("end", pair.end.as_str()),
            ],
        );
        let answer = doc.segments.remove(pair.question + 1);
        let question = &mut doc.segments[pair.question];
        question.text = capitalize_first(&rewritten);
        question.sep = answer.sep;
    }
    tracing::debug!(rewritten = pairs.len(), "rhetorical questions");
    doc.render()
}

/// The first rule of `kind` whose pattern opens `text`.
fn leading_rule<'c>(
    catalog: &'c Catalog,
    kind: PatternKind,
    text: &str,
) -> Option<&'c StructuralRule> {
    catalog.rules_of(kind).find(|r| r.pattern.is_match(text))
}

/// Replace or drop the sentence-initial term matched by `rule`.
fn swap_leading(text: &str, rule: &StructuralRule, rng: &mut StdRng) -> Option<String> {
    let m = rule.pattern.find(text)?;
    let rest = text[m.end()..].trim_start();
    if rest.is_empty() {
        return None;
    }
    let alt = choose(fixed(rule), rng)?;
    if alt.trim().is_empty() {
        Some(capitalize_first(rest))
    } else {
        Some(format!("{alt} {}", soften_initial(rest)))
    }
}

/// Runs of three or more consecutive prose sentences that each open with a stock
/// connective, as segment indices.
pub(crate) fn connective_runs(doc: &Document, catalog: &Catalog) -> Vec<Vec<usize>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for i in doc.prose_indices() {
        if leading_rule(catalog, PatternKind::ConnectiveRun, &doc.segments[i].text).is_some() {
            current.push(i);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    runs.push(current);
    runs.retain(|run| run.len() >= 3);
    runs
}

pub fn connective_run_breaks(
    text: &str,
    catalog: &Catalog,
    _hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut doc = Document::parse(text);
    let runs = connective_runs(&doc, catalog);
    if runs.is_empty() {
        return text.to_string();
    }
    for &i in runs.iter().flat_map(|run| run.iter().skip(1)) {
        let seg = &mut doc.segments[i];
        let Some(rule) = leading_rule(catalog, PatternKind::ConnectiveRun, &seg.text) else {
            continue;
        };
        if let Some(rewritten) = swap_leading(&seg.text, rule, rng) {
            seg.text = rewritten;
        }
    }
    tracing::debug!(runs = runs.len(), "connective runs");
    doc.render()
}

/// Prose sentences that open with a summary formula right before a heading.
pub(crate) fn closers_before_headings(doc: &Document, catalog: &Catalog) -> Vec<usize> {
    doc.segments
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0].is_prose() && pair[1].is_heading())
        .filter(|(_, pair)| {
            leading_rule(catalog, PatternKind::ClosingBeforeHeading, &pair[0].text).is_some()
        })
        .map(|(i, _)| i)
        .collect()
}

pub fn closers(
    text: &str,
    catalog: &Catalog,
    _hp: &Hyperparameters,
    rng: &mut StdRng,
) -> String {
    let mut doc = Document::parse(text);
    let found = closers_before_headings(&doc, catalog);
    for i in found {
        let seg = &mut doc.segments[i];
        let Some(rule) = leading_rule(catalog, PatternKind::ClosingBeforeHeading, &seg.text)
        else {
            continue;
        };
        if let Some(rewritten) = swap_leading(&seg.text, rule, rng) {
            seg.text = rewritten;
        }
    }
    doc.render()
}
