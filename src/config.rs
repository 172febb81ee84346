use serde::{Deserialize, Serialize};

/// Initial state of the categorical multi-selects after a catalog is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultSelection {
    /// Every domain value preselected.
    All,
    /// Nothing selected.
    #[default]
    Empty,
}

/// Policy knobs of the filter & score engine.
///
/// Filter semantics and score semantics of an empty selection are kept as
/// two independent flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// An empty categorical selection places no constraint on that dimension.
    /// When false, an empty selection excludes every record.
    pub empty_selection_means_all: bool,
    /// An empty categorical selection still counts as a match when scoring,
    /// contributing the dimension's full weight to every record.
    pub empty_selection_scores_as_match: bool,
    /// When false, results are returned in filtered order without scores.
    pub scoring_enabled: bool,
    /// Selection state the viewer starts from after loading a catalog.
    pub default_selection: DefaultSelection,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            empty_selection_means_all: true,
            empty_selection_scores_as_match: true,
            scoring_enabled: true,
            default_selection: DefaultSelection::Empty,
        }
    }
}

impl EngineConfig {
    /// Every value preselected and an empty selection hides everything.
    pub fn strict() -> Self {
        Self {
            empty_selection_means_all: false,
            default_selection: DefaultSelection::All,
            ..Self::default()
        }
    }

    /// Parse a config from JSON. Missing fields fall back to [`Default`].
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
