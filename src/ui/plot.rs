use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoints, Points};
use peg_selector::data::model::Dimension;
use peg_selector::data::rank::Evaluation;

use crate::state::AppState;

/// Points of one functional group, split by recommendation tier.
#[derive(Default)]
struct GroupPoints {
    regular: Vec<[f64; 2]>,
    recommended: Vec<[f64; 2]>,
}

// ---------------------------------------------------------------------------
// MW vs PDI scatter (bottom panel)
// ---------------------------------------------------------------------------

/// Scatter the matching products by molecular weight and PDI, coloured by
/// functional group. Recommended products are drawn as larger diamonds.
pub fn results_plot(ui: &mut Ui, state: &AppState, evaluation: &Evaluation<'_>) {
    let mut groups: BTreeMap<Option<String>, GroupPoints> = BTreeMap::new();
    for row in &evaluation.rows {
        let group = Dimension::FunctionalGroup
            .value_of(row.product)
            .map(str::to_string);
        let point = [row.product.molecular_weight, row.product.pdi];
        let entry = groups.entry(group).or_default();
        if evaluation.is_recommended(row) {
            entry.recommended.push(point);
        } else {
            entry.regular.push(point);
        }
    }

    Plot::new("results_plot")
        .legend(Legend::default())
        .x_axis_label("Molecular Weight (kDa)")
        .y_axis_label("PDI")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (group, points) in groups {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(group.as_deref()))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let name = group.unwrap_or_else(|| "(none)".to_string());

                if !points.regular.is_empty() {
                    let series: PlotPoints = points.regular.into_iter().collect();
                    plot_ui.points(
                        Points::new(name.as_str(), series)
                            .color(color)
                            .radius(3.0)
                            .shape(MarkerShape::Circle),
                    );
                }
                if !points.recommended.is_empty() {
                    let series: PlotPoints = points.recommended.into_iter().collect();
                    plot_ui.points(
                        Points::new(name.as_str(), series)
                            .color(color)
                            .radius(6.0)
                            .shape(MarkerShape::Diamond)
                            .filled(true),
                    );
                }
            }
        });
}
