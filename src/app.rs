use std::path::Path;

use eframe::egui;
use peg_selector::data::loader::{DEFAULT_CATALOG_FILE, load_file};

use crate::state::AppState;
use crate::ui::{panels, plot, results};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PegSelectorApp {
    pub state: AppState,
}

impl PegSelectorApp {
    /// Start with the default catalog from the working directory when present.
    pub fn with_default_catalog() -> Self {
        let mut state = AppState::default();
        let default_path = Path::new(DEFAULT_CATALOG_FILE);
        if default_path.exists() {
            match load_file(default_path) {
                Ok(catalog) => state.set_catalog(catalog),
                Err(e) => {
                    log::error!("Failed to load {DEFAULT_CATALOG_FILE}: {e}");
                    state.fail_load(format!("Error: {e}"));
                }
            }
        } else {
            log::info!("{DEFAULT_CATALOG_FILE} not found, waiting for File → Open");
        }
        Self { state }
    }
}

impl eframe::App for PegSelectorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // Every control change above feeds a single re-evaluation here.
        let match_count = {
            let evaluation = self.state.evaluation();

            // ---- Bottom panel: MW vs PDI scatter ----
            if let Some(evaluation) = &evaluation {
                egui::TopBottomPanel::bottom("plot_panel")
                    .default_height(260.0)
                    .resizable(true)
                    .show(ctx, |ui| {
                        plot::results_plot(ui, &self.state, evaluation);
                    });
            }

            // ---- Central panel: ranked results ----
            egui::CentralPanel::default().show(ctx, |ui| {
                results::results_table(ui, evaluation.as_ref());
            });

            evaluation.map(|e| e.len())
        };

        // The top bar was drawn before this frame's changes; redraw it with
        // the fresh count.
        if self.state.record_match_count(match_count) {
            ctx.request_repaint();
        }
    }
}
