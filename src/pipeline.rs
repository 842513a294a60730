//! The orchestrator: a fixed table of phases run between citation protection and
//! restoration.

use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::analyzer::{analyze_with, DiagnosticReport};
use crate::catalog::Catalog;
use crate::citation;
use crate::error::Result;
use crate::hyperparameters::Hyperparameters;
use crate::text::normalize_layout;
use crate::{burstiness, hedging, lexical, noise, structural};

/// Signature shared by every rewriting phase.
pub type PhaseFn = fn(&str, &Catalog, &Hyperparameters, &mut StdRng) -> String;

fn normalize(text: &str, _catalog: &Catalog, _hp: &Hyperparameters, _rng: &mut StdRng) -> String {
    normalize_layout(text)
}

const FULL: &[(&str, PhaseFn)] = &[
    ("separators", structural::strip_separators),
    ("phrases", lexical::substitute_phrases),
    ("formal_openers", lexical::substitute_openers),
    ("numeric_openers", structural::numeric_openers),
    ("meta_asides", structural::meta_asides),
    ("rhetorical_qa", structural::rhetorical_qa),
    ("antitheses", structural::antitheses),
    ("enumerations", structural::masked_enumerations),
    ("authority_chains", structural::authority_chains),
    ("connective_runs", structural::connective_run_breaks),
    ("uniform_headings", structural::uniform_headings),
    ("closers", structural::closers),
    ("blacklist", lexical::substitute_blacklist),
    ("diversify", lexical::diversify_repetitions),
    ("hedging", hedging::reduce),
    ("colloquialisms", noise::colloquialisms),
    ("uncertainty", noise::uncertainty),
    ("connectors", noise::connectors),
    ("imperfections", noise::imperfections),
    ("lengths", burstiness::vary_lengths),
    ("punctuation", burstiness::vary_punctuation),
    ("headings", burstiness::vary_headings),
    ("normalize", normalize),
];

const CONSERVATIVE: &[(&str, PhaseFn)] = &[
    ("separators", structural::strip_separators),
    ("blacklist", lexical::substitute_blacklist),
    ("hedging", hedging::reduce),
    ("normalize", normalize),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Every phase: lexical, structural, noise and burstiness.
    #[default]
    Full,
    /// Light correction that leaves most of the text as it was.
    Conservative,
}

impl Mode {
    pub fn phases(self) -> &'static [(&'static str, PhaseFn)] {
        match self {
            Mode::Full => FULL,
            Mode::Conservative => CONSERVATIVE,
        }
    }
}

/// Rewrites text through the phase table.
///
/// The catalog is shared and read-only. With a seed every call starts from the same
/// random state, so equal inputs give equal outputs on any thread; without one a
/// per-call seed is drawn from an entropy-seeded generator under a short lock.
#[derive(Debug)]
pub struct Humanizer {
    catalog: Arc<Catalog>,
    hp: Hyperparameters,
    mode: Mode,
    seed: Option<u64>,
    entropy: Mutex<StdRng>,
}

impl Default for Humanizer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Humanizer {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            catalog: Catalog::builtin(),
            hp: Hyperparameters::default(),
            mode: Mode::default(),
            seed,
            entropy: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_hyperparameters(mut self, hp: Hyperparameters) -> Self {
        self.hp = hp;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hp
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn call_rng(&self) -> StdRng {
        let seed = match self.seed {
            Some(seed) => seed,
            None => self
                .entropy
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .gen(),
        };
        StdRng::seed_from_u64(seed)
    }

    /// Rewrite `text`. Empty or blank input comes back unchanged; citation markers
    /// always come back exactly as they went in.
    pub fn process(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        let mut rng = self.call_rng();
        let protected = citation::protect(text);
        let mut current = protected.text.clone();

        for &(name, phase) in self.mode.phases() {
            let next = phase(&current, &self.catalog, &self.hp, &mut rng);
            match protected.missing(&next) {
                0 => {
                    tracing::debug!(phase = name, changed = next != current, "phase done");
                    current = next;
                }
                lost => {
                    tracing::warn!(phase = name, lost, "phase damaged citation placeholders, skipped");
                }
            }
        }

        protected.restore(&current)
    }

    pub fn analyze(&self, text: &str) -> Result<DiagnosticReport> {
        analyze_with(text, &self.catalog, &self.hp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanizer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Humanizer>();
    }

    #[test]
    fn blank_input_is_returned_unchanged() {
        let h = Humanizer::new(Some(1));
        assert_eq!(h.process(""), "");
        assert_eq!(h.process("  \n\t"), "  \n\t");
    }

    #[test]
    fn conservative_mode_runs_a_subset() {
        let full: Vec<&str> = Mode::Full.phases().iter().map(|(n, _)| *n).collect();
        for (name, _) in Mode::Conservative.phases() {
            assert!(full.contains(name));
        }
        assert_eq!(Mode::Full.phases().last().map(|(n, _)| *n), Some("normalize"));
    }

    #[test]
    fn mode_defaults_to_full() {
        assert_eq!(Humanizer::new(None).mode(), Mode::Full);
        let h = Humanizer::new(None).with_mode(Mode::Conservative);
        assert_eq!(h.mode().phases().len(), CONSERVATIVE.len());
    }

    #[test]
    fn unseeded_calls_still_protect_citations() {
        let h = Humanizer::default();
        let out = h.process("Il dato è fondamentale [4]. Pertanto regge [5].");
        assert_eq!(out.matches("[4]").count(), 1);
        assert_eq!(out.matches("[5]").count(), 1);
    }
}
