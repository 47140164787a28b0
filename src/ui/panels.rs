use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – settings, rows, skipped files and log
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Conversion");
    ui.separator();

    let input = state
        .input_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "no ZIP or folder selected".to_string());
    ui.label(RichText::new(input).monospace());
    ui.label(format!("Output: {}", state.config.output.display()));
    ui.add_space(4.0);

    settings(ui, state);
    ui.separator();

    let rows: Vec<String> = state
        .result
        .as_ref()
        .map(|r| r.rows.iter().map(|row| row.name.clone()).collect())
        .unwrap_or_default();

    egui::CollapsingHeader::new(RichText::new(format!("Spectra ({})", rows.len())).strong())
        .id_salt("rows")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.set_all_visible(true);
                }
                if ui.small_button("None").clicked() {
                    state.set_all_visible(false);
                }
            });
            ScrollArea::vertical()
                .id_salt("row_list")
                .max_height(220.0)
                .auto_shrink([false, true])
                .show(ui, |ui: &mut Ui| {
                    for (i, name) in rows.iter().enumerate() {
                        let text = RichText::new(name).color(state.palette.color(i));
                        if let Some(shown) = state.visible.get_mut(i) {
                            ui.checkbox(shown, text);
                        }
                    }
                });
        });

    skipped_table(ui, state);

    egui::CollapsingHeader::new(RichText::new("Log").strong())
        .id_salt("log")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ScrollArea::vertical()
                .id_salt("log_lines")
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui: &mut Ui| {
                    for line in &state.log {
                        ui.label(RichText::new(line).monospace());
                    }
                });
        });
}

/// Axis and smoothing parameters, locked while a batch runs.
fn settings(ui: &mut Ui, state: &mut AppState) {
    let pipeline = &mut state.config.pipeline;
    ui.add_enabled_ui(!state.running, |ui: &mut Ui| {
        egui::Grid::new("settings_grid")
            .num_columns(2)
            .show(ui, |ui: &mut Ui| {
                ui.label("Axis start (cm⁻¹)");
                ui.add(egui::DragValue::new(&mut pipeline.axis.start).speed(10.0));
                ui.end_row();

                ui.label("Axis end (cm⁻¹)");
                ui.add(egui::DragValue::new(&mut pipeline.axis.end).speed(10.0));
                ui.end_row();

                ui.label("Axis points");
                ui.add(egui::DragValue::new(&mut pipeline.axis.points).range(2..=100_000));
                ui.end_row();

                ui.label("Smoothing window");
                ui.add(egui::DragValue::new(&mut pipeline.smoothing.window).range(1..=201));
                ui.end_row();

                ui.label("Polynomial order");
                ui.add(egui::DragValue::new(&mut pipeline.smoothing.order).range(0..=10));
                ui.end_row();
            });
        ui.checkbox(&mut pipeline.parallel, "Process in parallel");
    });
}

fn skipped_table(ui: &mut Ui, state: &AppState) {
    let Some(result) = &state.result else { return };
    if result.skipped.is_empty() {
        return;
    }

    egui::CollapsingHeader::new(
        RichText::new(format!("Skipped ({})", result.skipped.len()))
            .strong()
            .color(Color32::YELLOW),
    )
    .id_salt("skipped")
    .default_open(false)
    .show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto())
            .column(Column::remainder())
            .header(18.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("File");
                });
                header.col(|ui: &mut Ui| {
                    ui.strong("Reason");
                });
            })
            .body(|mut body| {
                for skip in &result.skipped {
                    body.row(18.0, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(&skip.name);
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(&skip.reason);
                        });
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open ZIP…").clicked() {
                open_zip_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Save matrix as…").clicked() {
                save_as_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let button = egui::Button::new(RichText::new("PROCESS SPECTRA").strong())
            .fill(Color32::from_rgb(0x4C, 0xAF, 0x50));
        if ui
            .add_enabled(!state.running && state.input_path.is_some(), button)
            .clicked()
        {
            state.start_processing(ui.ctx());
        }

        if state.running {
            ui.spinner();
            ui.label("Processing… this may take a few seconds");
        } else if let Some(result) = &state.result {
            ui.label(format!(
                "{} spectra processed, {} skipped",
                result.processed(),
                result.skipped_count()
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

pub fn open_zip_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Select a ZIP of JCAMP-DX spectra")
        .add_filter("ZIP files", &["zip"])
        .add_filter("JCAMP-DX", &["jdx", "dx", "JDX", "DX"])
        .pick_file();
    if let Some(path) = file {
        log::info!("Selected input {}", path.display());
        state.input_path = Some(path);
        state.status_message = None;
    }
}

pub fn open_folder_dialog(state: &mut AppState) {
    if let Some(path) = rfd::FileDialog::new()
        .set_title("Select a folder with .jdx files")
        .pick_folder()
    {
        log::info!("Selected input folder {}", path.display());
        state.input_path = Some(path);
        state.status_message = None;
    }
}

pub fn save_as_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save processed matrix")
        .set_file_name(rusty_jcamp::config::DEFAULT_OUTPUT)
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet"])
        .add_filter("JSON", &["json"])
        .save_file();
    if let Some(path) = file {
        state.config.output = path;
    }
}
