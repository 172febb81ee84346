use std::path::Path;

use peg_selector::data::export;
use peg_selector::data::filter::FilterSpec;
use peg_selector::data::model::{Catalog, Dimension};
use peg_selector::data::rank::{Evaluation, evaluate};
use peg_selector::EngineConfig;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. The catalog, the current
/// filter spec and the engine config are explicit values; results are
/// recomputed from them on demand.
pub struct AppState {
    /// Loaded catalog (None until a file loads).
    pub catalog: Option<Catalog>,

    /// Current user constraints.
    pub spec: FilterSpec,

    /// Engine policy knobs.
    pub config: EngineConfig,

    /// Colours for the functional groups of the loaded catalog.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Row count of the last evaluation, shown in the top bar.
    pub match_count: Option<usize>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            catalog: None,
            spec: FilterSpec::new(0.0, 0.0),
            config: EngineConfig::default(),
            color_map: None,
            status_message: None,
            match_count: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded catalog and initialise filters and colours.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.spec = FilterSpec::for_catalog(&catalog, self.config.default_selection);
        self.color_map = Some(ColorMap::new(catalog.unique_values(Dimension::FunctionalGroup)));
        self.catalog = Some(catalog);
        self.status_message = None;
    }

    /// Drop the current catalog after a failed load so no stale results show.
    pub fn fail_load(&mut self, message: String) {
        self.catalog = None;
        self.color_map = None;
        self.match_count = None;
        self.status_message = Some(message);
    }

    /// Run filter → score → rank over the whole catalog.
    pub fn evaluation(&self) -> Option<Evaluation<'_>> {
        self.catalog
            .as_ref()
            .map(|catalog| evaluate(catalog, &self.spec, &self.config))
    }

    /// Remember the row count of this frame's evaluation. Returns true when
    /// it changed, so the caller can repaint with the new count.
    pub fn record_match_count(&mut self, count: Option<usize>) -> bool {
        let changed = self.match_count != count;
        self.match_count = count;
        changed
    }

    /// Restore the post-load filter state.
    pub fn reset_filters(&mut self) {
        if let Some(catalog) = &self.catalog {
            self.spec = FilterSpec::for_catalog(catalog, self.config.default_selection);
        }
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle_value(&mut self, dim: Dimension, value: &str) {
        let selected = self.spec.selected_mut(dim);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    /// Select every domain value of a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        if let Some(catalog) = &self.catalog {
            *self.spec.selected_mut(dim) = catalog.unique_values(dim).clone();
        }
    }

    /// Clear a dimension's selection.
    pub fn select_none(&mut self, dim: Dimension) {
        self.spec.selected_mut(dim).clear();
    }

    /// Write the current results (display order, no score columns) to `path`.
    pub fn export_to(&self, path: &Path) -> anyhow::Result<usize> {
        let (Some(catalog), Some(evaluation)) = (&self.catalog, self.evaluation()) else {
            anyhow::bail!("no catalog loaded");
        };
        export::export_file(
            path,
            &catalog.columns,
            evaluation.rows.iter().map(|row| row.product),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peg_selector::data::loader::load_csv_reader;
    use peg_selector::DefaultSelection;

    const CATALOG: &str = "\
Product Name,Molecular Weight (kDa),Functional Group / Reactivity,Polymer Architecture,Intended Application,Solubility,Commercial Partner,Polydispersity Index (PDI),Vendor Product Page
mPEG-NHS 5k,5,NHS ester,Linear,Bioconjugation,Water,Acme,1.03,
PEG-Amine 10k,10,Amine,4-arm,Hydrogel,Water,Biopeg,1.05,
";

    fn loaded(config: EngineConfig) -> AppState {
        let mut state = AppState { config, ..AppState::default() };
        state.set_catalog(load_csv_reader(CATALOG.as_bytes()).unwrap());
        state
    }

    #[test]
    fn fresh_catalog_shows_everything() {
        let state = loaded(EngineConfig::default());
        assert_eq!(state.evaluation().unwrap().len(), 2);
        assert!(state.spec.selected(Dimension::FunctionalGroup).is_empty());
    }

    #[test]
    fn strict_config_starts_fully_selected() {
        let state = loaded(EngineConfig::strict());
        assert_eq!(state.config.default_selection, DefaultSelection::All);
        assert_eq!(state.spec.selected(Dimension::Partner).len(), 2);
        assert_eq!(state.evaluation().unwrap().len(), 2);
    }

    #[test]
    fn match_count_tracks_the_last_evaluation() {
        let mut state = loaded(EngineConfig::default());
        let count = state.evaluation().map(|e| e.len());
        assert!(state.record_match_count(count));
        assert_eq!(state.match_count, Some(2));
        assert!(!state.record_match_count(Some(2)));

        state.toggle_value(Dimension::FunctionalGroup, "Amine");
        let count = state.evaluation().map(|e| e.len());
        assert!(state.record_match_count(count));
        assert_eq!(state.match_count, Some(1));

        state.fail_load("Error: bad file".into());
        assert_eq!(state.match_count, None);
    }

    #[test]
    fn toggling_values_narrows_and_widens() {
        let mut state = loaded(EngineConfig::default());
        state.toggle_value(Dimension::FunctionalGroup, "Amine");
        assert_eq!(state.evaluation().unwrap().len(), 1);
        state.toggle_value(Dimension::FunctionalGroup, "Amine");
        assert_eq!(state.evaluation().unwrap().len(), 2);
    }

    #[test]
    fn select_none_under_strict_config_hides_everything() {
        let mut state = loaded(EngineConfig::strict());
        state.select_none(Dimension::Solubility);
        assert!(state.evaluation().unwrap().is_empty());
        state.select_all(Dimension::Solubility);
        assert_eq!(state.evaluation().unwrap().len(), 2);
    }

    #[test]
    fn failed_load_clears_results() {
        let mut state = loaded(EngineConfig::default());
        state.fail_load("Error: missing required column 'Solubility'".into());
        assert!(state.evaluation().is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn export_writes_current_results() {
        let mut state = loaded(EngineConfig::default());
        state.spec.mw_max = 6.0;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(export::DEFAULT_EXPORT_FILE_NAME);
        assert_eq!(state.export_to(&path).unwrap(), 1);
    }
}
