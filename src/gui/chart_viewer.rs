//! Chart Viewer Widget
//! Central panel: the frequency chart (or the validation message) and the
//! collapsible help section.

use crate::charts::{ChartPlotter, ChartSpec};
use crate::data::ExportView;
use egui::{Color32, RichText, TextureHandle};
use std::path::PathBuf;

const CHART_HEIGHT: f32 = 420.0;
const HELP_IMAGE_MAX_WIDTH: f32 = 520.0;
const PREVIEW_ROWS: usize = 5;

const HELP_TEXT: &str = "This chart displays how many newborns were given the selected name(s) \
within each year since 1910. Add multiple names to compare trends over time!\n\n\
Click the \"Download CSV\" button to get a CSV with the data for the selected name(s).\n\n\
Example:";

/// What the central panel should show for the current selection.
pub enum ViewState<'a> {
    Chart {
        spec: &'a ChartSpec,
        export: &'a ExportView,
        dropped: &'a [String],
    },
    Invalid(String),
}

/// Central chart area with the "More Information" expander.
pub struct ChartViewer {
    help_image_path: PathBuf,
    help_image: Option<TextureHandle>,
    help_image_loaded: bool,
}

impl ChartViewer {
    pub fn new(help_image_path: PathBuf) -> Self {
        Self {
            help_image_path,
            help_image: None,
            help_image_loaded: false,
        }
    }

    /// Draw the chart viewer
    pub fn show(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, state: ViewState<'_>) {
        ui.heading(RichText::new("Historical Name Popularity").size(28.0).strong());
        ui.label(RichText::new("by Conner Drake").color(Color32::GRAY));
        ui.add_space(12.0);

        match state {
            ViewState::Invalid(message) => {
                egui::Frame::none()
                    .fill(Color32::from_rgb(255, 230, 230))
                    .rounding(6.0)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(message)
                                .size(14.0)
                                .color(Color32::from_rgb(156, 0, 6)),
                        );
                    });
            }
            ViewState::Chart {
                spec,
                export,
                dropped,
            } => {
                if !dropped.is_empty() {
                    ui.label(
                        RichText::new(format!("Not in dataset, skipped: {}", dropped.join(", ")))
                            .color(Color32::from_rgb(243, 156, 18)),
                    );
                    ui.add_space(6.0);
                }

                ChartPlotter::draw_bar_chart(ui, spec, CHART_HEIGHT);

                ui.add_space(12.0);
                egui::CollapsingHeader::new("More Information")
                    .default_open(false)
                    .show(ui, |ui| {
                        ui.label(HELP_TEXT);
                        ui.add_space(6.0);
                        self.show_example(ctx, ui, export);
                    });
            }
        }
    }

    /// Example image, or a preview of the current CSV when no image ships.
    fn show_example(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, export: &ExportView) {
        if !self.help_image_loaded {
            self.help_image_loaded = true;
            self.help_image = self.load_help_image(ctx);
        }

        if let Some(texture) = &self.help_image {
            ui.add(
                egui::Image::new(egui::load::SizedTexture::new(
                    texture.id(),
                    texture.size_vec2(),
                ))
                .max_width(HELP_IMAGE_MAX_WIDTH),
            );
            ui.label(
                RichText::new("Downloadable CSV with selected data")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
            return;
        }

        egui::Grid::new("csv_preview")
            .striped(true)
            .show(ui, |ui| {
                for header in export.columns() {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();

                for (year, counts) in export.rows().take(PREVIEW_ROWS) {
                    ui.label(year);
                    for count in counts {
                        ui.label(count.to_string());
                    }
                    ui.end_row();
                }
            });
        ui.label(
            RichText::new(format!(
                "Downloadable CSV with selected data ({} rows)",
                export.height()
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );
    }

    fn load_help_image(&self, ctx: &egui::Context) -> Option<TextureHandle> {
        let img = match image::open(&self.help_image_path) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                tracing::debug!(
                    path = %self.help_image_path.display(),
                    error = %e,
                    "help image unavailable, using table preview"
                );
                return None;
            }
        };

        let size = [img.width() as usize, img.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw());
        Some(ctx.load_texture("csv-example", color_image, egui::TextureOptions::LINEAR))
    }
}
