//! Static Chart Renderer
//! Renders a [`ChartSpec`] to a PNG file with plotters.
//!
//! Layout mirrors the interactive chart: one slot per year on the x axis,
//! translucent overlaid bars per name, legend in the upper right.

use crate::charts::ChartSpec;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::path::Path;
use thiserror::Error;

// Same hues as the on-screen palette
const SERIES_COLORS: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

const BAR_HALF_WIDTH: f64 = 0.4;
const MAX_X_LABELS: usize = 24;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to draw: the chart has no data")]
    Empty,
    #[error("Drawing failed: {0}")]
    Drawing(String),
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Write the chart as a PNG of `size` pixels.
    pub fn render_png(spec: &ChartSpec, path: &Path, size: (u32, u32)) -> Result<(), RenderError> {
        if spec.data().is_empty() {
            return Err(RenderError::Empty);
        }

        Self::draw(spec, path, size).map_err(|e| RenderError::Drawing(e.to_string()))?;
        tracing::info!(path = %path.display(), "chart image written");
        Ok(())
    }

    /// Upper bound for the y axis with some headroom; never zero.
    pub fn y_extent(max_count: i64) -> f64 {
        ((max_count.max(0) as f64) * 1.1).max(1.0)
    }

    fn draw(
        spec: &ChartSpec,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let categories = spec.categories();
        let n = categories.len();
        let y_max = Self::y_extent(spec.data().max_count());

        let mut chart = ChartBuilder::on(&root)
            .margin(25)
            .set_label_area_size(LabelAreaPosition::Left, 70)
            .set_label_area_size(LabelAreaPosition::Bottom, 50)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

        let label_formatter = |v: &f64| {
            let idx = v.round();
            if (v - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            categories.get(idx as usize).cloned().unwrap_or_default()
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n.min(MAX_X_LABELS))
            .x_label_formatter(&label_formatter)
            .y_label_formatter(&|v| format!("{:.0}", v))
            .x_desc(spec.x().label())
            .y_desc(spec.y().label())
            .label_style(FontDesc::new(FontFamily::SansSerif, 16.0, FontStyle::Normal))
            .draw()?;

        let opacity = f64::from(spec.opacity());
        for (series_idx, name) in spec.series().iter().enumerate() {
            let color = SERIES_COLORS[series_idx % SERIES_COLORS.len()];
            let fill = color.mix(opacity).filled();

            chart
                .draw_series(spec.series_rows(name).map(|(x, row)| {
                    let x = x as f64;
                    Rectangle::new(
                        [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, row.count as f64)],
                        fill,
                    )
                }))?
                .label(name.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.mix(opacity).filled())
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}
