//! Signature catalog: the static knowledge every rewriting phase reads.
//!
//! The catalog is plain serializable data ([`CatalogData`]) compiled once into
//! regexes and a structural rule table ([`Catalog`]). The compiled form is
//! immutable and shared across calls behind an [`Arc`].

mod builtin;

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Data
// ---------------------------------------------------------------------------

/// A term and the human-register alternatives it may be rewritten to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub term: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

/// A hedging cluster and the single hedge it collapses to (empty: removed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hedge {
    pub cluster: String,
    #[serde(default)]
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Templates {
    pub numeric_opener: Vec<String>,
    pub rhetorical_answer: Vec<String>,
    pub antithesis: Vec<String>,
    pub enumeration: Vec<String>,
    pub authority: Vec<String>,
    pub heading_question: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabularies {
    pub colloquialisms: Vec<String>,
    pub uncertainty: Vec<String>,
    pub connectors: Vec<String>,
    pub self_corrections: Vec<String>,
    pub asides: Vec<String>,
    pub dash_insertions: Vec<String>,
    pub abrupt_transitions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogData {
    pub blacklist: Vec<Entry>,
    pub phrases: Vec<Entry>,
    pub repetitive: Vec<Entry>,
    pub formal_openers: Vec<Entry>,
    pub hedges: Vec<Hedge>,
    pub meta_asides: Vec<Entry>,
    pub connective_swaps: Vec<Entry>,
    pub summary_closers: Vec<Entry>,
    pub templates: Templates,
    pub vocabularies: Vocabularies,
}

impl CatalogData {
    /// The shipped Italian catalog.
    pub fn builtin() -> Self {
        builtin::data()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ---------------------------------------------------------------------------
// Structural rule table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    VisualSeparator,
    NumericOpener,
    MetaAside,
    RhetoricalQa,
    Antithesis,
    MaskedEnumeration,
    AuthorityChain,
    ConnectiveRun,
    UniformHeading,
    ClosingBeforeHeading,
}

impl PatternKind {
    pub const ALL: [PatternKind; 10] = [
        PatternKind::VisualSeparator,
        PatternKind::NumericOpener,
        PatternKind::MetaAside,
        PatternKind::RhetoricalQa,
        PatternKind::Antithesis,
        PatternKind::MaskedEnumeration,
        PatternKind::AuthorityChain,
        PatternKind::ConnectiveRun,
        PatternKind::UniformHeading,
        PatternKind::ClosingBeforeHeading,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PatternKind::VisualSeparator => "visual_separator",
            PatternKind::NumericOpener => "numeric_opener",
            PatternKind::MetaAside => "meta_aside",
            PatternKind::RhetoricalQa => "rhetorical_qa",
            PatternKind::Antithesis => "antithesis",
            PatternKind::MaskedEnumeration => "masked_enumeration",
            PatternKind::AuthorityChain => "authority_chain",
            PatternKind::ConnectiveRun => "connective_run",
            PatternKind::UniformHeading => "uniform_heading",
            PatternKind::ClosingBeforeHeading => "closing_before_heading",
        }
    }
}

/// How a structural rule rewrites what its pattern finds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Swap the match for one of these (an empty alternative drops it).
    Fixed(Vec<String>),
    /// Recompose the match from its named captures through one of these templates.
    Template(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct StructuralRule {
    pub kind: PatternKind,
    pub pattern: Regex,
    pub strategy: Strategy,
}

const SEPARATOR_PATTERN: &str =
    r"(?m)^[ \t]*(?:-{3,}|\*{3,}|_{3,}|={3,}|(?:[-*_][ \t]+){2,}[-*_])[ \t]*(?:\n|$)";

const NUMERIC_OPENER_PATTERN: &str = concat!(
    r"(?m)(?P<lead>^|[.!?][ \t]+)",
    r"(?P<num>\d+(?:[.,]\d+)*%?|(?i:(?:un|uno|due|tre|tré|quattro|cinque|sei|sette|otto|nove",
    r"|dieci|undici|dodici|tredici|quattordici|quindici|sedici|diciassette|diciotto|diciannove",
    r"|venti?|trenta?|quaranta?|cinquanta?|sessanta?|settanta?|ottanta?|novanta?",
    r"|cento|mille|mila|milioni|miliardi)+))",
    r"\.[ \t]+(?P<verb>È|Sono|Era|Erano|Fu|Furono|Sarà|Saranno)\b",
);

const RHETORICAL_PATTERN: &str =
    r"^(?P<q>\p{Lu}[^?\n]*?)\?[ \t]+(?P<a>[^\s?][^?\n]*?)(?P<end>[.!]+)$";

const ANTITHESIS_PATTERN: &str = concat!(
    r"(?i)\b(?:sulla carta|in teoria)\b(?P<middle>[^.!?\n]{1,200}?)",
    r"(?P<joint>[,;.][ \t]*|[ \t]+)(?P<ma>ma[ \t]+)?",
    r"(?:in pratica|nella pratica|nei fatti|in realtà)\b",
);

const ENUMERATION_PATTERN: &str = concat!(
    r"(?P<body>",
    r"(?:C[’']è|Ci sono) (?P<x>[^.!?\n]{2,160})\.[ \t]+",
    r"(?:C[’']è|Ci sono) anche (?P<y>[^.!?\n]{2,160})\.",
    r"(?:[ \t]+(?:E poi c[’']è|C[’']è poi|Infine c[’']è|E c[’']è anche) (?P<z>[^.!?\n]{2,160})\.)?",
    r")",
);

const AUTHORITY_PATTERN: &str = concat!(
    r"(?m)(?:^|[.!?][ \t]+)(?P<subject>\p{Lu}[^.!?,;:\n]{0,60}?)[ \t]+",
    r"(?P<verb>dicono|sostengono|affermano|ritengono|osservano|dice|sostiene|afferma|ritiene|osserva)",
    r"[ \t]+che[ \t]+",
);

const NUMBERED_HEADING_PATTERN: &str =
    r"(?m)^(?P<hashes>#{1,6})[ \t]+(?:\d+(?:\.\d+)+\.?|\d+[.)]|[IVXLC]+\.)[ \t]+(?P<title>\S[^\n]*)$";

const BOLD_HEADING_PATTERN: &str = r"(?m)^\*\*(?P<title>[^*\n]{1,80}?)[:.]?\*\*[ \t]*$";

const HEADING_TEMPLATE: &str = "{hashes} {title}";

// ---------------------------------------------------------------------------
// Compiled catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CompiledEntry {
    pub term: String,
    pub alternatives: Vec<String>,
    pub pattern: Regex,
}

#[derive(Debug)]
pub struct Catalog {
    data: CatalogData,
    blacklist: Vec<CompiledEntry>,
    phrases: Vec<CompiledEntry>,
    repetitive: Vec<CompiledEntry>,
    formal_openers: Vec<CompiledEntry>,
    hedges: Vec<CompiledEntry>,
    rules: Vec<StructuralRule>,
    colloquial_pattern: Regex,
    uncertainty_pattern: Regex,
    connectors: Vec<String>,
}

static BUILTIN: Lazy<Arc<Catalog>> = Lazy::new(|| {
    Arc::new(Catalog::compile(CatalogData::builtin()).expect("built-in catalog is valid"))
});

impl Catalog {
    /// The shared built-in catalog, compiled on first use.
    pub fn builtin() -> Arc<Catalog> {
        Arc::clone(&BUILTIN)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::compile(CatalogData::from_json(&raw)?)
    }

    pub fn compile(data: CatalogData) -> Result<Self> {
        validate(&data)?;

        let mut phrases = compile_entries(&data.phrases, word_pattern)?;
        phrases.sort_by(|a, b| b.term.len().cmp(&a.term.len()));

        let blacklist = data
            .blacklist
            .iter()
            .map(|e| {
                let pattern = if e.alternatives.is_empty() {
                    deletion_pattern(&e.term)?
                } else {
                    word_pattern(&e.term)?
                };
                Ok(CompiledEntry {
                    term: e.term.clone(),
                    alternatives: e.alternatives.clone(),
                    pattern,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let hedges = data
            .hedges
            .iter()
            .map(|h| {
                let (pattern, alternatives) = if h.replacement.trim().is_empty() {
                    (deletion_pattern(&h.cluster)?, Vec::new())
                } else {
                    (word_pattern(&h.cluster)?, vec![h.replacement.clone()])
                };
                Ok(CompiledEntry {
                    term: h.cluster.clone(),
                    alternatives,
                    pattern,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let catalog = Catalog {
            blacklist,
            phrases,
            repetitive: compile_entries(&data.repetitive, word_pattern)?,
            formal_openers: compile_entries(&data.formal_openers, opener_pattern)?,
            hedges,
            rules: compile_rules(&data)?,
            colloquial_pattern: alternation_pattern(&data.vocabularies.colloquialisms)?,
            uncertainty_pattern: alternation_pattern(&data.vocabularies.uncertainty)?,
            connectors: data
                .vocabularies
                .connectors
                .iter()
                .map(|c| c.to_lowercase())
                .chain(std::iter::once("ed".to_string()))
                .collect(),
            data,
        };
        Ok(catalog)
    }

    pub fn data(&self) -> &CatalogData {
        &self.data
    }

    pub fn vocabularies(&self) -> &Vocabularies {
        &self.data.vocabularies
    }

    pub fn templates(&self) -> &Templates {
        &self.data.templates
    }

    pub fn blacklist(&self) -> &[CompiledEntry] {
        &self.blacklist
    }

    /// High-frequency phrases, longest first.
    pub fn phrases(&self) -> &[CompiledEntry] {
        &self.phrases
    }

    pub fn repetitive(&self) -> &[CompiledEntry] {
        &self.repetitive
    }

    pub fn formal_openers(&self) -> &[CompiledEntry] {
        &self.formal_openers
    }

    pub fn hedges(&self) -> &[CompiledEntry] {
        &self.hedges
    }

    pub fn rules(&self) -> &[StructuralRule] {
        &self.rules
    }

    pub fn rules_of(&self, kind: PatternKind) -> impl Iterator<Item = &StructuralRule> {
        self.rules.iter().filter(move |r| r.kind == kind)
    }

    /// The first template-driven rule of `kind`, with its templates.
    pub fn template_rule(&self, kind: PatternKind) -> Option<(&Regex, &[String])> {
        self.rules_of(kind).find_map(|r| match &r.strategy {
            Strategy::Template(templates) => Some((&r.pattern, templates.as_slice())),
            Strategy::Fixed(_) => None,
        })
    }

    pub fn colloquial_pattern(&self) -> &Regex {
        &self.colloquial_pattern
    }

    pub fn uncertainty_pattern(&self) -> &Regex {
        &self.uncertainty_pattern
    }

    /// Whether `word` (any case, punctuation ignored) is a coordinating connector.
    pub fn is_connector(&self, word: &str) -> bool {
        let bare = crate::text::bare_word(word);
        self.connectors.iter().any(|c| *c == bare)
    }
}

// ---------------------------------------------------------------------------
// Compilation helpers
// ---------------------------------------------------------------------------

fn word_pattern(term: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term)))?)
}

/// Matches the term with an optional leading comma and its trailing punctuation, so
/// the whole aside disappears when it is removed.
fn deletion_pattern(term: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"(?i)(?:,[ \t]*)?\b{}\b[,;:]?[ \t]*",
        regex::escape(term)
    ))?)
}

fn opener_pattern(term: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"(?m)(?P<lead>^|[.!?][ \t]+)(?P<word>(?i:{}))\b",
        regex::escape(term)
    ))?)
}

/// Anchored at the start of a sentence; swallows the comma and spacing after the term.
fn leading_pattern(term: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(r"^(?i:{})\b,?[ \t]*", regex::escape(term)))?)
}

fn alternation_pattern(items: &[String]) -> Result<Regex> {
    let mut sorted: Vec<&String> = items.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));
    let alt = sorted
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Ok(Regex::new(&format!(r"(?i)\b(?:{alt})\b"))?)
}

fn compile_entries(
    entries: &[Entry],
    pattern: fn(&str) -> Result<Regex>,
) -> Result<Vec<CompiledEntry>> {
    entries
        .iter()
        .map(|e| {
            Ok(CompiledEntry {
                term: e.term.clone(),
                alternatives: e.alternatives.clone(),
                pattern: pattern(&e.term)?,
            })
        })
        .collect()
}

fn compile_rules(data: &CatalogData) -> Result<Vec<StructuralRule>> {
    let t = &data.templates;
    let mut rules = vec![
        StructuralRule {
            kind: PatternKind::VisualSeparator,
            pattern: Regex::new(SEPARATOR_PATTERN)?,
            strategy: Strategy::Fixed(vec![String::new()]),
        },
        StructuralRule {
            kind: PatternKind::NumericOpener,
            pattern: Regex::new(NUMERIC_OPENER_PATTERN)?,
            strategy: Strategy::Template(t.numeric_opener.clone()),
        },
    ];

    for e in &data.meta_asides {
        rules.push(StructuralRule {
            kind: PatternKind::MetaAside,
            pattern: Regex::new(&format!(
                r"(?i)(?P<pre>,[ \t]*)?\b(?P<term>{})\b(?P<tail>,?[ \t]*)",
                regex::escape(&e.term)
            ))?,
            strategy: Strategy::Fixed(e.alternatives.clone()),
        });
    }

    rules.extend([
        StructuralRule {
            kind: PatternKind::RhetoricalQa,
            pattern: Regex::new(RHETORICAL_PATTERN)?,
            strategy: Strategy::Template(t.rhetorical_answer.clone()),
        },
        StructuralRule {
            kind: PatternKind::Antithesis,
            pattern: Regex::new(ANTITHESIS_PATTERN)?,
            strategy: Strategy::Template(t.antithesis.clone()),
        },
        StructuralRule {
            kind: PatternKind::MaskedEnumeration,
            pattern: Regex::new(ENUMERATION_PATTERN)?,
            strategy: Strategy::Template(t.enumeration.clone()),
        },
        StructuralRule {
            kind: PatternKind::AuthorityChain,
            pattern: Regex::new(AUTHORITY_PATTERN)?,
            strategy: Strategy::Template(t.authority.clone()),
        },
    ]);

    for e in &data.connective_swaps {
        rules.push(StructuralRule {
            kind: PatternKind::ConnectiveRun,
            pattern: leading_pattern(&e.term)?,
            strategy: Strategy::Fixed(e.alternatives.clone()),
        });
    }

    for pattern in [NUMBERED_HEADING_PATTERN, BOLD_HEADING_PATTERN] {
        rules.push(StructuralRule {
            kind: PatternKind::UniformHeading,
            pattern: Regex::new(pattern)?,
            strategy: Strategy::Template(vec![HEADING_TEMPLATE.to_string()]),
        });
    }

    for e in &data.summary_closers {
        rules.push(StructuralRule {
            kind: PatternKind::ClosingBeforeHeading,
            pattern: leading_pattern(&e.term)?,
            strategy: Strategy::Fixed(e.alternatives.clone()),
        });
    }

    Ok(rules)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Alternatives {
    /// At least one non-blank alternative.
    Required,
    /// Possibly none (the term is deleted), never blank.
    Optional,
    /// At least one, blanks allowed (a blank drops the match).
    Droppable,
}

fn validate(data: &CatalogData) -> Result<()> {
    check_entries("blacklist", &data.blacklist, Alternatives::Optional)?;
    check_entries("phrases", &data.phrases, Alternatives::Required)?;
    check_entries("repetitive", &data.repetitive, Alternatives::Required)?;
    check_entries("formal_openers", &data.formal_openers, Alternatives::Required)?;
    check_entries("meta_asides", &data.meta_asides, Alternatives::Droppable)?;
    check_entries("connective_swaps", &data.connective_swaps, Alternatives::Droppable)?;
    check_entries("summary_closers", &data.summary_closers, Alternatives::Droppable)?;

    if let Some(h) = data.hedges.iter().find(|h| h.cluster.trim().is_empty()) {
        return Err(Error::InvalidCatalog(format!(
            "hedges: empty cluster (replacement '{}')",
            h.replacement
        )));
    }

    let t = &data.templates;
    let v = &data.vocabularies;
    let lists: [(&str, &[String]); 13] = [
        ("templates.numeric_opener", &t.numeric_opener),
        ("templates.rhetorical_answer", &t.rhetorical_answer),
        ("templates.antithesis", &t.antithesis),
        ("templates.enumeration", &t.enumeration),
        ("templates.authority", &t.authority),
        ("templates.heading_question", &t.heading_question),
        ("vocabularies.colloquialisms", &v.colloquialisms),
        ("vocabularies.uncertainty", &v.uncertainty),
        ("vocabularies.connectors", &v.connectors),
        ("vocabularies.self_corrections", &v.self_corrections),
        ("vocabularies.asides", &v.asides),
        ("vocabularies.dash_insertions", &v.dash_insertions),
        ("vocabularies.abrupt_transitions", &v.abrupt_transitions),
    ];
    for (name, items) in lists {
        if items.is_empty() {
            return Err(Error::InvalidCatalog(format!("{name}: list is empty")));
        }
        if items.iter().any(|s| s.trim().is_empty()) {
            return Err(Error::InvalidCatalog(format!("{name}: blank entry")));
        }
    }
    Ok(())
}

fn check_entries(table: &str, entries: &[Entry], rule: Alternatives) -> Result<()> {
    for e in entries {
        if e.term.trim().is_empty() {
            return Err(Error::InvalidCatalog(format!("{table}: empty term")));
        }
        let blank = e.alternatives.iter().any(|a| a.trim().is_empty());
        let problem = match rule {
            Alternatives::Required if e.alternatives.is_empty() => Some("no alternatives"),
            Alternatives::Required | Alternatives::Optional if blank => Some("blank alternative"),
            Alternatives::Droppable if e.alternatives.is_empty() => Some("no alternatives"),
            _ => None,
        };
        if let Some(problem) = problem {
            return Err(Error::InvalidCatalog(format!(
                "{table}: {problem} for '{}'",
                e.term
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_compiles() {
        let catalog = Catalog::builtin();
        assert!(!catalog.blacklist().is_empty());
        for kind in PatternKind::ALL {
            assert!(
                catalog.rules_of(kind).next().is_some(),
                "no rule for {}",
                kind.name()
            );
        }
    }

    #[test]
    fn phrases_are_sorted_longest_first() {
        let catalog = Catalog::builtin();
        let lens: Vec<usize> = catalog.phrases().iter().map(|p| p.term.len()).collect();
        assert!(lens.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn numeric_opener_matches_number_words() {
        let re = Regex::new(NUMERIC_OPENER_PATTERN).unwrap();
        let caps = re.captures("Cinquecento. È il problema.").unwrap();
        assert_eq!(&caps["num"], "Cinquecento");
        assert_eq!(&caps["verb"], "È");
        assert!(re.is_match("Il dato è chiaro. 1500. Sono tanti."));
        assert!(!re.is_match("Il problema. È vero."));
    }

    #[test]
    fn separator_pattern_ignores_bullets() {
        let re = Regex::new(SEPARATOR_PATTERN).unwrap();
        assert!(re.is_match("testo\n---\naltro"));
        assert!(re.is_match("* * *\n"));
        assert!(!re.is_match("- una voce\n- un'altra"));
    }
}
