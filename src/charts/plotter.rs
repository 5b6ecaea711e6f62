//! Chart Plotter Module
//! Draws a [`ChartSpec`] as an interactive egui_plot bar chart.

use crate::charts::ChartSpec;
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Plot};

/// Color palette for name series
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(31, 119, 180),  // Blue
    Color32::from_rgb(255, 127, 14),  // Orange
    Color32::from_rgb(44, 160, 44),   // Green
    Color32::from_rgb(214, 39, 40),   // Red
    Color32::from_rgb(148, 103, 189), // Purple
    Color32::from_rgb(140, 86, 75),   // Brown
    Color32::from_rgb(227, 119, 194), // Pink
    Color32::from_rgb(127, 127, 127), // Grey
    Color32::from_rgb(188, 189, 34),  // Olive
    Color32::from_rgb(23, 190, 207),  // Cyan
];

/// Width of one year slot taken by a bar.
const BAR_WIDTH: f64 = 0.8;

/// Creates the interactive frequency chart using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for the series at `index`.
    pub fn get_series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw overlaid (non-stacked) bars, one translucent series per name.
    /// X-axis: years as categories, Y-axis: count
    pub fn draw_bar_chart(ui: &mut egui::Ui, spec: &ChartSpec, height: f32) {
        let categories: Vec<String> = spec.categories().to_vec();
        let interactive = spec.is_interactive();

        Plot::new("name_frequency_chart")
            .height(height)
            .legend(Legend::default())
            .allow_zoom(interactive)
            .allow_drag(interactive)
            .allow_scroll(interactive)
            .allow_boxed_zoom(interactive)
            .include_y(0.0)
            .x_axis_label(spec.x().label())
            .y_axis_label(spec.y().label())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                categories.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for (series_idx, name) in spec.series().iter().enumerate() {
                    let color = Self::get_series_color(series_idx);
                    let fill = color.gamma_multiply(spec.opacity());

                    let bars: Vec<Bar> = spec
                        .series_rows(name)
                        .map(|(x, row)| {
                            Bar::new(x as f64, row.count as f64)
                                .width(BAR_WIDTH)
                                .name(spec.tooltip_text(row))
                                .fill(fill)
                                .stroke(egui::Stroke::new(1.0, color))
                        })
                        .collect();

                    let chart = BarChart::new(bars)
                        .name(name)
                        .color(color)
                        .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| bar.name.clone()));

                    plot_ui.bar_chart(chart);
                }
            });
    }
}
