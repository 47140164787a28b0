use eframe::egui::Ui;
use egui_plot::{Line, Plot, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Processed-spectra plot (central panel)
// ---------------------------------------------------------------------------

/// Render the processed rows over the common axis.
pub fn spectral_plot(ui: &mut Ui, state: &AppState) {
    let result = match &state.result {
        Some(r) if !r.rows.is_empty() => r,
        Some(_) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("No spectrum could be processed – see the skipped list");
            });
            return;
        }
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a ZIP or folder, then press PROCESS SPECTRA");
            });
            return;
        }
    };

    let axis = result.axis.points();

    Plot::new("spectral_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("Wavenumber (cm⁻¹)")
        .y_axis_label("Normalised absorbance")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for idx in state.visible_indices() {
                let Some(row) = result.rows.get(idx) else {
                    continue;
                };

                let points: PlotPoints = axis
                    .iter()
                    .zip(row.values.iter())
                    .map(|(&xi, &yi)| [xi, yi])
                    .collect();

                let line = Line::new(points)
                    .name(&row.name)
                    .color(state.palette.color(idx))
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}
