//! Name Trends Main Application
//! Main window with the name picker and the chart viewer.

use crate::charts::{ChartSpec, StaticChartRenderer};
use crate::config::AppConfig;
use crate::data::{DataProcessor, PresentError, Presentation, WideTable};
use crate::export::{Artifact, CsvExport, FetchError, RemoteDataset};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, StatusKind, ViewState};
use egui::SidePanel;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

const PNG_SIZE: (u32, u32) = (1400, 800);

/// Derived views for the current selection.
struct Derived {
    presentation: Presentation,
    spec: ChartSpec,
}

/// Main application window.
pub struct NameTrendsApp {
    config: AppConfig,
    table: Arc<WideTable>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    derived: Result<Derived, PresentError>,

    // Background download of the full dataset
    fetch_rx: Option<Receiver<Result<Artifact, FetchError>>>,
}

impl NameTrendsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, table: Arc<WideTable>) -> Self {
        let mut control_panel = ControlPanel::new();
        control_panel.update_names(table.names().to_vec(), &config.default_names);
        control_panel.set_status(
            StatusKind::Info,
            &format!(
                "Loaded {} names across {} years",
                table.names().len(),
                table.height()
            ),
        );

        let chart_viewer = ChartViewer::new(config.help_image.clone());
        let derived = Self::derive(&table, &control_panel.selected);
        control_panel.exports_enabled = derived.is_ok();

        Self {
            config,
            table,
            control_panel,
            chart_viewer,
            derived,
            fetch_rx: None,
        }
    }

    /// Recompute both views and the chart spec for a selection.
    fn derive(table: &WideTable, selection: &[String]) -> Result<Derived, PresentError> {
        let presentation = DataProcessor::narrow_and_reshape(table, selection)?;
        let spec = ChartSpec::name_frequency(presentation.long.clone());
        Ok(Derived { presentation, spec })
    }

    fn handle_selection_changed(&mut self) {
        self.derived = Self::derive(&self.table, &self.control_panel.selected);
        self.control_panel.exports_enabled = self.derived.is_ok();
    }

    /// Ask where to save and write the artifact there.
    fn save_artifact(&mut self, artifact: &Artifact, filter_name: &str, extensions: &[&str]) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter(filter_name, extensions)
            .set_file_name(&artifact.file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        match artifact.write_to(&path) {
            Ok(()) => self
                .control_panel
                .set_status(StatusKind::Success, &format!("Saved {}", path.display())),
            Err(e) => self
                .control_panel
                .set_status(StatusKind::Error, &format!("Error: {}", e)),
        }
    }

    fn handle_download_csv(&mut self) {
        let Ok(derived) = &self.derived else {
            return;
        };

        match CsvExport::selection_artifact(&derived.presentation.export) {
            Ok(artifact) => self.save_artifact(&artifact, "CSV Files", &["csv"]),
            Err(e) => self
                .control_panel
                .set_status(StatusKind::Error, &format!("Error: {}", e)),
        }
    }

    /// Start the full dataset download in a background thread
    fn handle_download_all(&mut self) {
        if self.fetch_rx.is_some() {
            return; // Already fetching
        }

        let (tx, rx) = channel();
        self.fetch_rx = Some(rx);
        self.control_panel.is_fetching = true;
        self.control_panel
            .set_status(StatusKind::Info, "Downloading full dataset...");

        let remote = RemoteDataset::new(self.config.all_data_url.clone(), self.config.fetch_timeout);
        thread::spawn(move || {
            let _ = tx.send(remote.fetch_artifact());
        });
    }

    /// Check for the background download result
    fn check_fetch_results(&mut self) {
        let Some(rx) = self.fetch_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(artifact)) => {
                self.control_panel.is_fetching = false;
                self.control_panel.set_status(
                    StatusKind::Info,
                    &format!("Fetched {} bytes", artifact.bytes.len()),
                );
                self.save_artifact(&artifact, "CSV Files", &["csv"]);
            }
            Ok(Err(e)) => {
                self.control_panel.is_fetching = false;
                self.control_panel
                    .set_status(StatusKind::Error, &format!("Error: {}", e));
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.fetch_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.control_panel.is_fetching = false;
                self.control_panel
                    .set_status(StatusKind::Error, "Error: download worker stopped");
            }
        }
    }

    fn handle_save_png(&mut self) {
        let Ok(derived) = &self.derived else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("name_frequencies.png")
            .save_file()
        else {
            return;
        };

        let status = match StaticChartRenderer::render_png(&derived.spec, &path, PNG_SIZE) {
            Ok(()) => (StatusKind::Success, format!("Saved {}", path.display())),
            Err(e) => (StatusKind::Error, format!("Error: {}", e)),
        };
        self.control_panel.set_status(status.0, &status.1);
    }

    pub fn data_path(&self) -> &Path {
        &self.config.data_path
    }
}

impl eframe::App for NameTrendsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_fetch_results();

        // Request repaint while fetching
        if self.fetch_rx.is_some() {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new(format!("Data: {}", self.data_path().display()))
                        .size(11.0)
                        .color(egui::Color32::GRAY),
                );
                ui.add_space(8.0);

                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::SelectionChanged => self.handle_selection_changed(),
                        ControlPanelAction::DownloadCsv => self.handle_download_csv(),
                        ControlPanelAction::DownloadAll => self.handle_download_all(),
                        ControlPanelAction::SaveChartPng => self.handle_save_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                let state = match &self.derived {
                    Ok(derived) => ViewState::Chart {
                        spec: &derived.spec,
                        export: &derived.presentation.export,
                        dropped: &derived.presentation.dropped,
                    },
                    Err(e) => ViewState::Invalid(e.to_string()),
                };
                self.chart_viewer.show(ctx, ui, state);
            });
        });
    }
}
