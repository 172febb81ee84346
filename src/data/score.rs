use crate::config::EngineConfig;

use super::filter::{FilterSpec, admits};
use super::model::{Dimension, PegProduct};

pub const FUNCTIONAL_GROUP_LABEL: &str = "Matches functional group";
pub const ARCHITECTURE_LABEL: &str = "Matches polymer architecture";
pub const APPLICATION_LABEL: &str = "Matches intended application";
pub const SOLUBILITY_LABEL: &str = "Matches solubility";

/// Scored dimensions with their weight and label, in explanation order.
/// Commercial Partner is filterable but never scored.
const SCORING_RULES: [(Dimension, u32, &str); 4] = [
    (Dimension::FunctionalGroup, 2, FUNCTIONAL_GROUP_LABEL),
    (Dimension::Architecture, 1, ARCHITECTURE_LABEL),
    (Dimension::Application, 2, APPLICATION_LABEL),
    (Dimension::Solubility, 1, SOLUBILITY_LABEL),
];

/// Highest attainable score.
pub const MAX_SCORE: u32 = 6;

/// Relevance of one product against a filter spec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recommendation {
    pub score: u32,
    /// Matched criterion labels in fixed rule order.
    pub explanation: Vec<&'static str>,
}

impl Recommendation {
    /// Labels joined for display, e.g. `"Matches functional group, Matches solubility"`.
    pub fn explanation_text(&self) -> String {
        self.explanation.join(", ")
    }
}

/// Score a product: each matching dimension adds its weight and label.
pub fn score(product: &PegProduct, spec: &FilterSpec, config: &EngineConfig) -> Recommendation {
    let mut rec = Recommendation::default();
    for (dim, weight, label) in SCORING_RULES {
        if admits(
            spec.selected(dim),
            dim.value_of(product),
            config.empty_selection_scores_as_match,
        ) {
            rec.score += weight;
            rec.explanation.push(label);
        }
    }
    rec
}

/// A filtered product annotated with its recommendation. Borrows the catalog
/// row; nothing is written back.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProduct<'a> {
    pub product: &'a PegProduct,
    pub score: u32,
    pub explanation: Vec<&'static str>,
}

impl<'a> ScoredProduct<'a> {
    pub fn new(product: &'a PegProduct, rec: Recommendation) -> Self {
        Self {
            product,
            score: rec.score,
            explanation: rec.explanation,
        }
    }

    /// A row produced with scoring disabled.
    pub fn unscored(product: &'a PegProduct) -> Self {
        Self::new(product, Recommendation::default())
    }

    pub fn explanation_text(&self) -> String {
        self.explanation.join(", ")
    }
}
