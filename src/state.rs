use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use eframe::egui;
use rusty_jcamp::batch::{self, Progress};
use rusty_jcamp::config::RunConfig;
use rusty_jcamp::data::model::BatchResult;

use crate::color::RowPalette;

// ---------------------------------------------------------------------------
// Worker → UI messages
// ---------------------------------------------------------------------------

/// Sent by the background conversion thread.
pub enum WorkerEvent {
    Log(String),
    Finished(Result<BatchResult, String>),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// ZIP archive, folder or single file chosen by the user.
    pub input_path: Option<PathBuf>,

    /// Axis, smoothing and output settings handed to the batch.
    pub config: RunConfig,

    /// Progress log shown in the side panel.
    pub log: Vec<String>,

    /// Last finished batch (None until a run completes).
    pub result: Option<BatchResult>,

    /// Per-row plot visibility, parallel to `result.rows`.
    pub visible: Vec<bool>,

    /// Colours of the plotted rows.
    pub palette: RowPalette,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a conversion is running in the background.
    pub running: bool,

    events: Option<Receiver<WorkerEvent>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            input_path: None,
            config: RunConfig::default(),
            log: Vec::new(),
            result: None,
            visible: Vec::new(),
            palette: RowPalette::new(0),
            status_message: None,
            running: false,
            events: None,
        }
    }
}

impl AppState {
    /// Start converting `input_path` on a background thread.
    pub fn start_processing(&mut self, ctx: &egui::Context) {
        let Some(input) = self.input_path.clone() else {
            self.status_message = Some("Select a ZIP file or a folder first.".to_string());
            return;
        };
        if !input.exists() {
            self.status_message = Some(format!("{} does not exist.", input.display()));
            return;
        }

        let config = self.config.clone();
        let (tx, rx) = mpsc::channel();
        let ctx = ctx.clone();

        self.log.push(format!("Processing: {}", input.display()));
        self.status_message = None;
        self.running = true;
        self.events = Some(rx);

        std::thread::spawn(move || {
            let progress = |p: Progress<'_>| {
                let line = match p {
                    Progress::Processed { name } => format!("Processed {name}"),
                    Progress::Skipped { name, reason } => format!("Skipped {name}: {reason}"),
                };
                // The receiver only disappears when the app is closing.
                let _ = tx.send(WorkerEvent::Log(line));
                ctx.request_repaint();
            };
            let outcome = batch::run(&input, &config, progress).map_err(|e| format!("{e:#}"));
            let _ = tx.send(WorkerEvent::Finished(outcome));
            ctx.request_repaint();
        });
    }

    /// Drain messages from the worker, if one is running.
    pub fn poll_worker(&mut self) {
        let Some(rx) = &self.events else { return };
        let mut finished = None;
        loop {
            match rx.try_recv() {
                Ok(WorkerEvent::Log(line)) => self.log.push(line),
                Ok(WorkerEvent::Finished(outcome)) => {
                    finished = Some(outcome);
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    finished = Some(Err("conversion thread stopped unexpectedly".to_string()));
                    break;
                }
            }
        }

        match finished {
            Some(Ok(result)) => {
                log::info!(
                    "Batch finished: {} processed, {} skipped",
                    result.processed(),
                    result.skipped_count()
                );
                self.log.push(format!(
                    "Done: {} spectra saved to {} ({} skipped)",
                    result.processed(),
                    self.config.output.display(),
                    result.skipped_count()
                ));
                self.set_result(result);
            }
            Some(Err(message)) => {
                log::error!("Batch failed: {message}");
                self.log.push(format!("ERROR: {message}"));
                self.status_message = Some(format!("Error: {message}"));
                self.running = false;
                self.events = None;
            }
            None => {}
        }
    }

    /// Ingest a finished batch and show every row.
    pub fn set_result(&mut self, result: BatchResult) {
        self.visible = vec![true; result.rows.len()];
        self.palette = RowPalette::new(result.rows.len());
        self.result = Some(result);
        self.running = false;
        self.events = None;
    }

    /// Indices of rows currently drawn in the plot.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, shown)| **shown)
            .map(|(i, _)| i)
            .collect()
    }

    /// Show or hide every row.
    pub fn set_all_visible(&mut self, shown: bool) {
        self.visible.iter_mut().for_each(|v| *v = shown);
    }
}
