use crate::config::EngineConfig;

use super::filter::{FilterSpec, filtered_indices};
use super::model::Catalog;
use super::score::{ScoredProduct, score};

/// Order scored rows by score descending, then molecular weight ascending.
/// The sort is stable, so remaining ties keep their filtered order.
pub fn rank(mut scored: Vec<ScoredProduct<'_>>) -> Vec<ScoredProduct<'_>> {
    scored.sort_by(|a, b| {
        b.score.cmp(&a.score).then_with(|| {
            a.product
                .molecular_weight
                .total_cmp(&b.product.molecular_weight)
        })
    });
    scored
}

/// Highest score among the rows, `None` when there are none.
pub fn top_score(scored: &[ScoredProduct<'_>]) -> Option<u32> {
    scored.iter().map(|row| row.score).max()
}

/// Outcome of one filter → score → rank pass over a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<'a> {
    /// Rows in display order.
    pub rows: Vec<ScoredProduct<'a>>,
    /// Score of the recommended tier; `None` when empty or unscored.
    pub top_score: Option<u32>,
}

impl<'a> Evaluation<'a> {
    /// Whether the row belongs to the recommended tier. Every row tied at the
    /// top score is recommended.
    pub fn is_recommended(&self, row: &ScoredProduct<'_>) -> bool {
        self.top_score == Some(row.score)
    }

    pub fn recommended(&self) -> impl Iterator<Item = &ScoredProduct<'a>> + '_ {
        self.rows.iter().filter(|row| self.is_recommended(row))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Run the full pipeline. With scoring disabled, rows keep their filtered
/// order and carry no score.
pub fn evaluate<'a>(catalog: &'a Catalog, spec: &FilterSpec, config: &EngineConfig) -> Evaluation<'a> {
    let rows = filtered_indices(catalog, spec, config)
        .into_iter()
        .map(|i| &catalog.products[i]);

    if !config.scoring_enabled {
        let rows: Vec<_> = rows.map(ScoredProduct::unscored).collect();
        log::debug!("evaluated {} unscored rows", rows.len());
        return Evaluation { rows, top_score: None };
    }

    let scored = rows
        .map(|p| ScoredProduct::new(p, score(p, spec, config)))
        .collect();
    let rows = rank(scored);
    let top = top_score(&rows);
    log::debug!("evaluated {} rows, top score {top:?}", rows.len());
    Evaluation { rows, top_score: top }
}
