//! Citation guard: swaps `[n]` markers for opaque placeholders before rewriting and
//! puts them back afterwards.

use once_cell::sync::Lazy;
use regex::Regex;

static CITATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d+\]").unwrap());

/// Private-use code points are never produced by the catalog, so a pair the input
/// does not already contain cannot be forged by any phase.
const PRIVATE_USE: std::ops::Range<u32> = 0xE000..0xF8FF;

/// Placeholder-bearing text plus the placeholder → marker map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Protected {
    pub text: String,
    pub map: Vec<(String, String)>,
}

impl Protected {
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of placeholders that do not occur exactly once in `text`.
    pub fn missing(&self, text: &str) -> usize {
        self.map
            .iter()
            .filter(|(token, _)| text.matches(token.as_str()).count() != 1)
            .count()
    }

    pub fn restore(&self, text: &str) -> String {
        restore(text, self)
    }
}

fn sentinels(text: &str) -> Option<(char, char)> {
    PRIVATE_USE
        .step_by(2)
        .filter_map(|cp| Some((char::from_u32(cp)?, char::from_u32(cp + 1)?)))
        .find(|(open, close)| !text.contains(*open) && !text.contains(*close))
}

pub fn protect(text: &str) -> Protected {
    if !CITATION_RE.is_match(text) {
        return Protected {
            text: text.to_string(),
            map: Vec::new(),
        };
    }
    let Some((open, close)) = sentinels(text) else {
        tracing::warn!("no free placeholder sentinels; citations left unprotected");
        return Protected {
            text: text.to_string(),
            map: Vec::new(),
        };
    };

    let mut map = Vec::new();
    let protected = CITATION_RE
        .replace_all(text, |caps: &regex::Captures| {
            let token = format!("{open}{}{close}", map.len());
            map.push((token.clone(), caps[0].to_string()));
            token
        })
        .into_owned();

    tracing::debug!(citations = map.len(), "protected citation markers");
    Protected {
        text: protected,
        map,
    }
}

pub fn restore(text: &str, protected: &Protected) -> String {
    let mut out = text.to_string();
    for (token, original) in &protected.map {
        debug_assert_eq!(
            out.matches(token.as_str()).count(),
            1,
            "placeholder for {original} lost or duplicated"
        );
        out = out.replace(token.as_str(), original);
    }
    out
}
