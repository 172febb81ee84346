use std::collections::BTreeSet;

use crate::config::{DefaultSelection, EngineConfig};

use super::model::{Catalog, Dimension, PegProduct};

// ---------------------------------------------------------------------------
// FilterSpec: molecular weight range plus one selection set per dimension
// ---------------------------------------------------------------------------

/// The user's constraints on the catalog.
///
/// How an empty selection set is read is decided by [`EngineConfig`], not by
/// the spec itself.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    /// Inclusive lower molecular weight bound (kDa).
    pub mw_min: f64,
    /// Inclusive upper molecular weight bound (kDa).
    pub mw_max: f64,
    selections: [BTreeSet<String>; Dimension::COUNT],
}

impl FilterSpec {
    /// A spec over `[mw_min, mw_max]` with every selection empty.
    pub fn new(mw_min: f64, mw_max: f64) -> Self {
        Self {
            mw_min,
            mw_max,
            selections: Default::default(),
        }
    }

    /// Initial spec for a freshly loaded catalog: the full molecular weight
    /// range (widened to whole kDa) and either every value or nothing selected.
    pub fn for_catalog(catalog: &Catalog, default_selection: DefaultSelection) -> Self {
        let (lo, hi) = catalog
            .mw_bounds()
            .map(|(lo, hi)| (lo.floor(), hi.ceil()))
            .unwrap_or((0.0, 0.0));
        let mut spec = Self::new(lo, hi);
        if default_selection == DefaultSelection::All {
            for dim in Dimension::ALL {
                spec.selections[dim.index()] = catalog.unique_values(dim).clone();
            }
        }
        spec
    }

    /// Builder-style selection of `values` for `dim`, replacing any previous set.
    pub fn with_selection<I, S>(mut self, dim: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections[dim.index()] = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn selected(&self, dim: Dimension) -> &BTreeSet<String> {
        &self.selections[dim.index()]
    }

    pub fn selected_mut(&mut self, dim: Dimension) -> &mut BTreeSet<String> {
        &mut self.selections[dim.index()]
    }

    /// Whether `mw` lies inside the inclusive range.
    pub fn mw_contains(&self, mw: f64) -> bool {
        self.mw_min <= mw && mw <= self.mw_max
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Sorted distinct non-null values of `dim` present in the catalog.
pub fn domain_values(catalog: &Catalog, dim: Dimension) -> &BTreeSet<String> {
    catalog.unique_values(dim)
}

/// Whether a categorical value passes a selection set under the given policy.
///
/// A null value is never a member of a selection set.
pub fn admits(selected: &BTreeSet<String>, value: Option<&str>, empty_means_all: bool) -> bool {
    if selected.is_empty() {
        return empty_means_all;
    }
    value.is_some_and(|v| selected.contains(v))
}

/// Whether a single product satisfies every constraint of the spec.
pub fn matches(product: &PegProduct, spec: &FilterSpec, config: &EngineConfig) -> bool {
    spec.mw_contains(product.molecular_weight)
        && Dimension::ALL.iter().all(|&dim| {
            admits(
                spec.selected(dim),
                dim.value_of(product),
                config.empty_selection_means_all,
            )
        })
}

/// Return indices of products that pass all constraints, in source order.
pub fn filtered_indices(catalog: &Catalog, spec: &FilterSpec, config: &EngineConfig) -> Vec<usize> {
    catalog
        .products
        .iter()
        .enumerate()
        .filter(|(_, p)| matches(p, spec, config))
        .map(|(i, _)| i)
        .collect()
}

/// The sub-catalog of products that pass all constraints, in source order.
pub fn filter(catalog: &Catalog, spec: &FilterSpec, config: &EngineConfig) -> Catalog {
    let indices = filtered_indices(catalog, spec, config);
    log::debug!("filter kept {} of {} products", indices.len(), catalog.len());
    catalog.subset(&indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{product, standard_columns};

    fn catalog() -> Catalog {
        Catalog::from_products(
            standard_columns(),
            vec![
                product("mPEG-NHS 5k", 5.0, "NHS ester", "Linear", "Bioconjugation", "Water", "Acme"),
                product("4-arm PEG-Amine 10k", 10.0, "Amine", "4-arm", "Hydrogel", "Water", "Biopeg"),
                product("PEG-Maleimide 2k", 2.0, "Maleimide", "Linear", "Bioconjugation", "DMSO", "Acme"),
                product("PEG-Thiol 20k", 20.0, "Thiol", "8-arm", "Drug delivery", "Water", "Nanocs"),
                product("Unlabelled PEG 3k", 3.0, "", "Linear", "", "Water", "Acme"),
            ],
        )
    }

    fn full_range() -> FilterSpec {
        FilterSpec::new(0.0, 100.0)
    }

    fn names(catalog: &Catalog) -> Vec<&str> {
        catalog.products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn all_empty_selections_with_full_range_is_identity() {
        let cat = catalog();
        let out = filter(&cat, &full_range(), &EngineConfig::default());
        assert_eq!(out, cat);
    }

    #[test]
    fn empty_selection_excludes_all_under_strict_policy() {
        let cat = catalog();
        let out = filter(&cat, &full_range(), &EngineConfig::strict());
        assert!(out.is_empty());
    }

    #[test]
    fn strict_policy_with_everything_selected_keeps_non_null_rows() {
        let cat = catalog();
        let spec = FilterSpec::for_catalog(&cat, DefaultSelection::All);
        let out = filter(&cat, &spec, &EngineConfig::strict());
        // the unlabelled product has null functional group and application
        assert_eq!(out.len(), 4);
        assert!(!names(&out).contains(&"Unlabelled PEG 3k"));
    }

    #[test]
    fn range_is_inclusive() {
        let cat = catalog();
        let spec = FilterSpec::new(5.0, 10.0);
        let out = filter(&cat, &spec, &EngineConfig::default());
        assert_eq!(names(&out), ["mPEG-NHS 5k", "4-arm PEG-Amine 10k"]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let cat = catalog();
        let spec = FilterSpec::new(10.0, 5.0);
        assert!(filtered_indices(&cat, &spec, &EngineConfig::default()).is_empty());
    }

    #[test]
    fn empty_catalog_filters_to_empty() {
        let cat = Catalog::from_products(standard_columns(), Vec::new());
        assert!(filter(&cat, &full_range(), &EngineConfig::default()).is_empty());
    }

    #[test]
    fn selection_acts_as_allow_list_and_preserves_order() {
        let cat = catalog();
        let spec = full_range()
            .with_selection(Dimension::Solubility, ["Water"])
            .with_selection(Dimension::Partner, ["Acme", "Nanocs"]);
        let out = filter(&cat, &spec, &EngineConfig::default());
        assert_eq!(names(&out), ["mPEG-NHS 5k", "PEG-Thiol 20k", "Unlabelled PEG 3k"]);
    }

    #[test]
    fn null_value_never_matches_a_non_empty_selection() {
        let cat = catalog();
        let spec = full_range().with_selection(Dimension::Application, ["Bioconjugation", "Hydrogel", "Drug delivery"]);
        let out = filter(&cat, &spec, &EngineConfig::default());
        assert!(!names(&out).contains(&"Unlabelled PEG 3k"));
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn filter_is_idempotent() {
        let cat = catalog();
        let spec = FilterSpec::new(2.0, 10.0).with_selection(Dimension::Architecture, ["Linear"]);
        let cfg = EngineConfig::default();
        let once = filter(&cat, &spec, &cfg);
        let twice = filter(&once, &spec, &cfg);
        assert_eq!(once, twice);
    }

    #[test]
    fn result_is_exactly_the_matching_rows() {
        let cat = catalog();
        let spec = FilterSpec::new(3.0, 20.0).with_selection(Dimension::Solubility, ["Water"]);
        let cfg = EngineConfig::default();
        let out = filter(&cat, &spec, &cfg);
        for p in &out.products {
            assert!(cat.products.contains(p));
            assert!(matches(p, &spec, &cfg));
        }
        let expected = cat.products.iter().filter(|p| matches(p, &spec, &cfg)).count();
        assert_eq!(out.len(), expected);
    }

    #[test]
    fn widening_a_selection_never_shrinks_the_result() {
        let cat = catalog();
        let cfg = EngineConfig::default();
        let narrow = full_range().with_selection(Dimension::FunctionalGroup, ["Amine"]);
        let wide = full_range().with_selection(Dimension::FunctionalGroup, ["Amine", "Thiol"]);
        let narrow_out = filtered_indices(&cat, &narrow, &cfg);
        let wide_out = filtered_indices(&cat, &wide, &cfg);
        assert!(narrow_out.iter().all(|i| wide_out.contains(i)));
        assert!(wide_out.len() >= narrow_out.len());
    }

    #[test]
    fn narrowing_the_range_never_grows_the_result() {
        let cat = catalog();
        let cfg = EngineConfig::default();
        let wide_out = filtered_indices(&cat, &FilterSpec::new(0.0, 20.0), &cfg);
        let narrow_out = filtered_indices(&cat, &FilterSpec::new(3.0, 10.0), &cfg);
        assert!(narrow_out.iter().all(|i| wide_out.contains(i)));
        assert!(narrow_out.len() <= wide_out.len());
    }

    #[test]
    fn for_catalog_covers_observed_range() {
        let cat = Catalog::from_products(
            standard_columns(),
            vec![product("a", 2.5, "Amine", "Linear", "Hydrogel", "Water", "Acme"), product("b", 20.4, "Amine", "Linear", "Hydrogel", "Water", "Acme")],
        );
        let spec = FilterSpec::for_catalog(&cat, DefaultSelection::Empty);
        assert_eq!((spec.mw_min, spec.mw_max), (2.0, 21.0));
        assert!(Dimension::ALL.iter().all(|&d| spec.selected(d).is_empty()));
        assert_eq!(filter(&cat, &spec, &EngineConfig::default()).len(), 2);
    }

    #[test]
    fn domain_values_lists_distinct_sorted_values() {
        let cat = catalog();
        let archs: Vec<&str> = domain_values(&cat, Dimension::Architecture)
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(archs, ["4-arm", "8-arm", "Linear"]);
    }
}
