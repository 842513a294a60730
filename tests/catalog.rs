use std::sync::Arc;

use regex::Regex;
use slop_scrub::catalog::Entry;
use slop_scrub::{Catalog, CatalogData, Error, Humanizer, Mode};

/// Every string the pipeline can write into the text.
fn generated_strings(data: &CatalogData) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut push = |table: &str, items: &[String]| {
        out.extend(items.iter().map(|s| (table.to_string(), s.clone())));
    };
    for (table, entries) in [
        ("blacklist", &data.blacklist),
        ("phrases", &data.phrases),
        ("repetitive", &data.repetitive),
        ("formal_openers", &data.formal_openers),
        ("meta_asides", &data.meta_asides),
        ("connective_swaps", &data.connective_swaps),
        ("summary_closers", &data.summary_closers),
    ] {
        for e in entries {
            push(table, &e.alternatives);
        }
    }
    let hedges: Vec<String> = data.hedges.iter().map(|h| h.replacement.clone()).collect();
    push("hedges", &hedges);

    let t = &data.templates;
    for (table, items) in [
        ("numeric_opener", &t.numeric_opener),
        ("rhetorical_answer", &t.rhetorical_answer),
        ("antithesis", &t.antithesis),
        ("enumeration", &t.enumeration),
        ("authority", &t.authority),
        ("heading_question", &t.heading_question),
    ] {
        push(table, items);
    }

    let v = &data.vocabularies;
    for (table, items) in [
        ("colloquialisms", &v.colloquialisms),
        ("uncertainty", &v.uncertainty),
        ("connectors", &v.connectors),
        ("self_corrections", &v.self_corrections),
        ("asides", &v.asides),
        ("dash_insertions", &v.dash_insertions),
        ("abrupt_transitions", &v.abrupt_transitions),
    ] {
        push(table, items);
    }
    out
}

#[test]
fn builtin_catalog_compiles() {
    assert!(Catalog::compile(CatalogData::builtin()).is_ok());
}

#[test]
fn no_entry_is_empty() {
    let data = CatalogData::builtin();
    for e in data.blacklist.iter().chain(&data.phrases).chain(&data.repetitive) {
        assert!(!e.term.trim().is_empty());
    }
    for e in data.phrases.iter().chain(&data.repetitive).chain(&data.formal_openers) {
        assert!(!e.alternatives.is_empty(), "{} has no alternatives", e.term);
    }
}

#[test]
fn generated_text_never_reintroduces_blacklist_terms() {
    let data = CatalogData::builtin();
    let terms: Vec<(String, Regex)> = data
        .blacklist
        .iter()
        .map(|e| {
            let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&e.term))).unwrap();
            (e.term.clone(), re)
        })
        .collect();
    for (table, s) in generated_strings(&data) {
        for (term, re) in &terms {
            assert!(!re.is_match(&s), "{table}: '{s}' contains blacklisted '{term}'");
        }
    }
}

#[test]
fn dumped_catalog_loads_back() {
    let data = CatalogData::builtin();
    let json = serde_json::to_string_pretty(&data).unwrap();
    let back = CatalogData::from_json(&json).unwrap();
    assert_eq!(back, data);
}

#[test]
fn blank_phrase_alternative_is_rejected() {
    let mut data = CatalogData::builtin();
    data.phrases[0].alternatives.push("   ".to_string());
    assert!(matches!(
        Catalog::compile(data),
        Err(Error::InvalidCatalog(_))
    ));
}

#[test]
fn empty_vocabulary_is_rejected() {
    let mut data = CatalogData::builtin();
    data.vocabularies.colloquialisms.clear();
    let err = Catalog::compile(data).unwrap_err();
    assert!(err.to_string().contains("colloquialisms"), "{err}");
}

#[test]
fn custom_catalog_drives_the_pipeline() {
    let mut data = CatalogData::builtin();
    data.blacklist = vec![Entry {
        term: "mobilità".to_string(),
        alternatives: vec!["circolazione".to_string()],
    }];
    let catalog = Arc::new(Catalog::compile(data).unwrap());
    let out = Humanizer::new(Some(1))
        .with_catalog(catalog)
        .with_mode(Mode::Conservative)
        .process("La mobilità urbana cambia. La mobilità resta un tema.");
    assert_eq!(out, "La circolazione urbana cambia. La mobilità resta un tema.");
}
