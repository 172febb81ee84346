use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use peg_selector::data::rank::Evaluation;

const TOP_COLOR: Color32 = Color32::from_rgb(0xE0, 0xA8, 0x00);

const HEADERS: [&str; 12] = [
    "",
    "Product Name",
    "Score",
    "Why this PEG is recommended",
    "MW (kDa)",
    "Functional Group / Reactivity",
    "Polymer Architecture",
    "Intended Application",
    "Solubility",
    "Commercial Partner",
    "PDI",
    "Vendor Product Page",
];

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Ranked results (central panel)
// ---------------------------------------------------------------------------

/// Render the ranked results table. The recommended tier is badged.
pub fn results_table(ui: &mut Ui, evaluation: Option<&Evaluation<'_>>) {
    let evaluation = match evaluation {
        Some(evaluation) => evaluation,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a catalog to select PEGs  (File → Open…)");
            });
            return;
        }
    };

    ui.heading(format!("Filtered Results ({} PEGs)", evaluation.len()));
    if evaluation.is_empty() {
        ui.label("No products match the current filters.");
        return;
    }
    let scored = evaluation.top_score.is_some();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto())
        .column(Column::initial(180.0).at_least(80.0).clip(true))
        .column(Column::auto())
        .column(Column::initial(280.0).clip(true))
        .columns(Column::auto(), 7)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in &evaluation.rows {
                let product = row.product;
                let recommended = evaluation.is_recommended(row);
                body.row(22.0, |mut cells| {
                    cells.col(|ui| {
                        if recommended {
                            ui.label(RichText::new("🏆 Recommended").color(TOP_COLOR).strong());
                        }
                    });
                    cells.col(|ui| {
                        ui.label(product.name.as_str());
                    });
                    cells.col(|ui| {
                        if scored {
                            ui.label(row.score.to_string());
                        } else {
                            ui.weak("–");
                        }
                    });
                    cells.col(|ui| {
                        ui.label(row.explanation_text());
                    });
                    cells.col(|ui| {
                        ui.label(product.molecular_weight.to_string());
                    });
                    cells.col(|ui| {
                        ui.label(text(&product.functional_group));
                    });
                    cells.col(|ui| {
                        ui.label(text(&product.architecture));
                    });
                    cells.col(|ui| {
                        ui.label(text(&product.application));
                    });
                    cells.col(|ui| {
                        ui.label(text(&product.solubility));
                    });
                    cells.col(|ui| {
                        ui.label(text(&product.partner));
                    });
                    cells.col(|ui| {
                        ui.label(product.pdi.to_string());
                    });
                    cells.col(|ui| {
                        // No link without a page.
                        if let Some(url) = &product.vendor_page {
                            ui.hyperlink_to("🔗 Vendor page", url);
                        }
                    });
                });
            }
        });
}
