use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};
use peg_selector::data::export::DEFAULT_EXPORT_FILE_NAME;
use peg_selector::data::loader::load_file;
use peg_selector::data::model::{COL_MOLECULAR_WEIGHT, Dimension};
use peg_selector::DefaultSelection;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter PEG Properties");
    ui.separator();

    let catalog = match &state.catalog {
        Some(catalog) => catalog,
        None => {
            ui.label("No catalog loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let bounds = catalog.mw_bounds();
    let domains: Vec<(Dimension, BTreeSet<String>)> = Dimension::ALL
        .iter()
        .map(|&dim| (dim, catalog.unique_values(dim).clone()))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Molecular weight range ----
            ui.strong(COL_MOLECULAR_WEIGHT);
            if let Some((lo, hi)) = bounds {
                let range = lo.floor()..=hi.ceil();
                ui.add(Slider::new(&mut state.spec.mw_min, range.clone()).integer().text("min"));
                ui.add(Slider::new(&mut state.spec.mw_max, range).integer().text("max"));
                if state.spec.mw_min > state.spec.mw_max {
                    ui.label(RichText::new("min is above max").color(Color32::YELLOW));
                }
            }
            ui.separator();

            // ---- Per-dimension multi-selects (collapsible) ----
            for (dim, all_values) in &domains {
                let dim = *dim;
                let n_selected = state.spec.selected(dim).len();
                let n_total = all_values.len();
                let header_text = if n_selected == 0 {
                    let meaning = if state.config.empty_selection_means_all { "any" } else { "none" };
                    format!("{dim}  ({meaning})")
                } else {
                    format!("{dim}  ({n_selected}/{n_total})")
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.column())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(dim);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(dim);
                            }
                        });

                        for value in all_values {
                            let mut checked = state.spec.selected(dim).contains(value);
                            if ui.checkbox(&mut checked, value.as_str()).changed() {
                                state.toggle_value(dim, value);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_catalog = state.catalog.is_some();
            if ui
                .add_enabled(has_catalog, egui::Button::new("Export results…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.menu_button("Settings", |ui: &mut Ui| {
            ui.checkbox(
                &mut state.config.empty_selection_means_all,
                "Empty selection means all",
            );
            ui.checkbox(
                &mut state.config.empty_selection_scores_as_match,
                "Empty selection scores as match",
            );
            ui.checkbox(&mut state.config.scoring_enabled, "Recommendation scoring");
            ui.separator();
            ui.label("Selection after loading");
            ui.radio_value(
                &mut state.config.default_selection,
                DefaultSelection::Empty,
                "Nothing selected",
            );
            ui.radio_value(
                &mut state.config.default_selection,
                DefaultSelection::All,
                "Everything selected",
            );
            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(catalog) = &state.catalog {
            let matching = state.match_count.unwrap_or(0);
            ui.label(format!(
                "{} products loaded, {matching} matching",
                catalog.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open PEG catalog")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match load_file(&path) {
            Ok(catalog) => state.set_catalog(catalog),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                state.fail_load(format!("Error: {e}"));
            }
        }
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download filtered results")
        .set_file_name(DEFAULT_EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export_to(&path) {
            Ok(_) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export results: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
