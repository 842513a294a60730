use rand::rngs::StdRng;

use crate::catalog::Catalog;
use crate::hyperparameters::Hyperparameters;
use crate::lexical::deletion_gap;
use crate::text::{match_case, rewrite_matches, tidy_punctuation};

/// Remove hedging clusters or collapse them to a single hedge word.
pub fn reduce(text: &str, catalog: &Catalog, _hp: &Hyperparameters, _rng: &mut StdRng) -> String {
    let mut out = text.to_string();
    let mut total = 0;
    for hedge in catalog.hedges() {
        let (next, n) = rewrite_matches(&out, &hedge.pattern, |caps| {
            Some(match hedge.alternatives.first() {
                Some(single) => match_case(&caps[0], single),
                None => deletion_gap(&caps[0]),
            })
        });
        out = next;
        total += n;
    }
    tracing::debug!(reduced = total, "hedging");
    tidy_punctuation(&out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn run(text: &str) -> String {
        let mut rng = StdRng::seed_from_u64(1);
        reduce(text, &Catalog::builtin(), &Hyperparameters::default(), &mut rng)
    }

    #[test]
    fn drops_empty_hedges() {
        assert_eq!(run("Il metodo, in un certo senso, funziona."), "Il metodo funziona.");
        assert_eq!(run("Per così dire, è finita."), "È finita.");
    }

    #[test]
    fn collapses_doubled_uncertainty() {
        assert_eq!(run("Forse probabilmente piove."), "Forse piove.");
        assert_eq!(run("Il dato potrebbe forse cambiare."), "Il dato potrebbe cambiare.");
    }

    #[test]
    fn leaves_plain_text_alone() {
        let text = "Il senso del lavoro è chiaro.";
        assert_eq!(run(text), text);
    }
}
