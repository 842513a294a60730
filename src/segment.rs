//! Sentence segmentation that keeps every separator.
//!
//! A [`Document`] is the text split into `(sentence, trailing separator)` pairs.
//! Phases that reason about sentences edit the pairs and render them back, so
//! paragraph breaks survive exactly as they were found.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::word_count;

static BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[.!?…]+["'\u{201D}\u{2019}»)\]]*\s+|[ \t]*\n\s*"#).unwrap()
});

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s").unwrap());

static LIST_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*+]\s|\d+[.)]\s|>)").unwrap());

fn is_block_line(line: &str) -> bool {
    HEADING_RE.is_match(line) || LIST_LINE_RE.is_match(line)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub sep: String,
}

impl Segment {
    pub fn new(text: impl Into<String>, sep: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sep: sep.into(),
        }
    }

    pub fn is_heading(&self) -> bool {
        HEADING_RE.is_match(&self.text)
    }

    pub fn is_list_line(&self) -> bool {
        LIST_LINE_RE.is_match(&self.text)
    }

    /// A running sentence, as opposed to a heading, list line or separator.
    pub fn is_prose(&self) -> bool {
        !self.is_heading()
            && !self.is_list_line()
            && self.text.chars().any(char::is_alphabetic)
    }

    pub fn ends_paragraph(&self) -> bool {
        self.sep.matches('\n').count() >= 2
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.text)
    }

    pub fn tokens(&self) -> Vec<String> {
        self.text.split_whitespace().map(str::to_string).collect()
    }

    pub fn set_tokens(&mut self, tokens: &[String]) {
        self.text = tokens.join(" ");
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub lead: String,
    pub segments: Vec<Segment>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let body = text.trim_start();
        let body_start = text.len() - body.len();
        let mut lead = text[..body_start].to_string();

        let mut segments = Vec::new();
        let mut start = body_start;
        for m in BOUNDARY_RE.find_iter(text) {
            if m.start() < body_start {
                continue;
            }
            // headings and list lines end only at a line break
            if !m.as_str().contains('\n') && is_block_line(&text[start..]) {
                continue;
            }
            let ws = m
                .as_str()
                .find(char::is_whitespace)
                .map_or(m.end(), |i| m.start() + i);
            if ws > start {
                segments.push(Segment::new(&text[start..ws], &text[ws..m.end()]));
            } else if let Some(prev) = segments.last_mut() {
                prev.sep.push_str(&text[start..m.end()]);
            } else {
                lead.push_str(&text[start..m.end()]);
            }
            start = m.end();
        }
        if start < text.len() {
            let rest = &text[start..];
            let trimmed = rest.trim_end();
            segments.push(Segment::new(trimmed, &rest[trimmed.len()..]));
        }

        Self { lead, segments }
    }

    pub fn render(&self) -> String {
        let mut out = self.lead.clone();
        for seg in &self.segments {
            out.push_str(&seg.text);
            out.push_str(&seg.sep);
        }
        out
    }

    /// Indices of the prose segments, in document order.
    pub fn prose_indices(&self) -> Vec<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_prose())
            .map(|(i, _)| i)
            .collect()
    }

    /// Prose indices without the first and last sentence.
    pub fn interior_indices(&self) -> Vec<usize> {
        let prose = self.prose_indices();
        if prose.len() < 3 {
            return Vec::new();
        }
        prose[1..prose.len() - 1].to_vec()
    }

    pub fn paragraph_breaks(&self) -> usize {
        self.segments.iter().filter(|s| s.ends_paragraph()).count()
    }

    /// Insert a new sentence right after `index`. The new sentence takes over the
    /// separator of `index`, which becomes a single space.
    pub fn insert_after(&mut self, index: usize, text: impl Into<String>) {
        let Some(seg) = self.segments.get_mut(index) else {
            return;
        };
        let sep = std::mem::replace(&mut seg.sep, " ".to_string());
        self.segments.insert(index + 1, Segment::new(text, sep));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_lossless() {
        let samples = [
            "",
            "   ",
            "Una frase sola",
            "  Prima. Seconda!  Terza?\n\n## Titolo\nTesto   finale.  \n",
            "- voce uno\n- voce due\n\nChiusura... davvero.",
            "Citazione \u{E000}0\u{E001}. Poi (nota). E «virgolette.» Fine",
        ];
        for s in samples {
            assert_eq!(Document::parse(s).render(), s, "round trip failed for {s:?}");
        }
    }

    #[test]
    fn splits_sentences_and_keeps_separators() {
        let doc = Document::parse("Uno due. Tre quattro?\n\nCinque.");
        let texts: Vec<&str> = doc.segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["Uno due.", "Tre quattro?", "Cinque."]);
        assert!(doc.segments[1].ends_paragraph());
        assert_eq!(doc.paragraph_breaks(), 1);
    }

    #[test]
    fn headings_are_not_prose() {
        let doc = Document::parse("## Metodi\nIl campione è ampio.");
        assert!(doc.segments[0].is_heading());
        assert!(!doc.segments[0].is_prose());
        assert!(doc.segments[1].is_prose());
    }

    #[test]
    fn numbered_headings_and_list_lines_stay_whole() {
        let text = "## 1. Introduzione al traffico\nIl tema è vasto. Serve tempo.\n\n\
                    - 2. voce della lista. Con seguito\n### 2.1 Dati raccolti";
        let doc = Document::parse(text);
        let texts: Vec<&str> = doc.segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            texts,
            [
                "## 1. Introduzione al traffico",
                "Il tema è vasto.",
                "Serve tempo.",
                "- 2. voce della lista. Con seguito",
                "### 2.1 Dati raccolti",
            ]
        );
        assert!(doc.segments[0].is_heading());
        assert_eq!(doc.prose_indices(), [1, 2]);
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn insert_after_moves_the_paragraph_break() {
        let mut doc = Document::parse("Uno.\n\nDue.");
        doc.insert_after(0, "Ecco.");
        assert_eq!(doc.render(), "Uno. Ecco.\n\nDue.");
    }
}
