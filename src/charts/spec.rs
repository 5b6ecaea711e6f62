//! Declarative chart description.
//!
//! A [`ChartSpec`] says *what* to draw (mark, channel encodings, tooltip);
//! the egui plotter, the static PNG renderer and the Vega-Lite export all
//! read the same spec.

use crate::data::{LongRow, LongView};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Bar,
}

/// Vega-Lite measurement types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Ordinal,
    Quantitative,
    Nominal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Encoding {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Encoding {
    pub fn new(field: &str, field_type: FieldType) -> Self {
        Self {
            field: field.to_string(),
            field_type,
            title: None,
        }
    }

    pub fn titled(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Axis/legend caption: explicit title, else the field name.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.field)
    }
}

/// Immutable chart description bound to one long view.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    mark: Mark,
    opacity: f32,
    x: Encoding,
    y: Encoding,
    color: Encoding,
    tooltip: Vec<Encoding>,
    interactive: bool,
    data: LongView,
}

impl ChartSpec {
    /// Start a bar chart over `data`.
    pub fn bar(data: LongView) -> ChartSpecBuilder {
        ChartSpecBuilder::new(Mark::Bar, data)
    }

    /// The chart used by the app: overlaid bars per name over ordinal years.
    pub fn name_frequency(data: LongView) -> ChartSpec {
        Self::bar(data)
            .opacity(0.3)
            .x(Encoding::new("year", FieldType::Ordinal))
            .y(Encoding::new("n", FieldType::Quantitative).titled("Frequency"))
            .color(Encoding::new("name", FieldType::Nominal))
            .tooltip(vec![
                Encoding::new("name", FieldType::Nominal),
                Encoding::new("n", FieldType::Quantitative),
                Encoding::new("year", FieldType::Ordinal),
            ])
            .interactive(true)
            .build()
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn x(&self) -> &Encoding {
        &self.x
    }

    pub fn y(&self) -> &Encoding {
        &self.y
    }

    pub fn color(&self) -> &Encoding {
        &self.color
    }

    pub fn tooltip(&self) -> &[Encoding] {
        &self.tooltip
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn data(&self) -> &LongView {
        &self.data
    }

    /// Category labels along x.
    pub fn categories(&self) -> &[String] {
        self.data.years()
    }

    /// One entry per color series.
    pub fn series(&self) -> &[String] {
        self.data.names()
    }

    /// Rows of a single series, in category order.
    pub fn series_rows<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (usize, &'a LongRow)> {
        let years = self.data.years();
        self.data
            .rows()
            .iter()
            .filter(move |row| row.name == name)
            .filter_map(move |row| {
                years
                    .iter()
                    .position(|y| y == &row.year)
                    .map(|idx| (idx, row))
            })
    }

    /// Tooltip text for one datum, fields in tooltip order.
    pub fn tooltip_text(&self, row: &LongRow) -> String {
        self.tooltip
            .iter()
            .map(|enc| {
                let value = match enc.field.as_str() {
                    "year" => row.year.clone(),
                    "name" => row.name.clone(),
                    _ => row.count.to_string(),
                };
                format!("{}: {}", enc.field, value)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Equivalent Vega-Lite v5 document with the data inlined.
    pub fn to_vega_lite(&self) -> Value {
        let values: Vec<Value> = self
            .data
            .rows()
            .iter()
            .map(|r| json!({ "year": r.year, "name": r.name, "n": r.count }))
            .collect();

        let mut y = serde_json::to_value(&self.y).unwrap_or(Value::Null);
        // Bars share a slot per year and must overlap rather than stack.
        if let Value::Object(map) = &mut y {
            map.insert("stack".to_string(), Value::Null);
        }

        let mut spec = json!({
            "$schema": "https://vega.github.io/schema/vega-lite/v5.json",
            "data": { "values": values },
            "mark": { "type": self.mark, "opacity": self.opacity },
            "encoding": {
                "x": self.x,
                "y": y,
                "color": self.color,
                "tooltip": self.tooltip,
            },
        });
        if self.interactive {
            spec["params"] = json!([{
                "name": "grid",
                "select": "interval",
                "bind": "scales",
            }]);
        }
        spec
    }
}

/// Builder for [`ChartSpec`].
pub struct ChartSpecBuilder {
    mark: Mark,
    opacity: f32,
    x: Encoding,
    y: Encoding,
    color: Encoding,
    tooltip: Vec<Encoding>,
    interactive: bool,
    data: LongView,
}

impl ChartSpecBuilder {
    fn new(mark: Mark, data: LongView) -> Self {
        Self {
            mark,
            opacity: 1.0,
            x: Encoding::new("year", FieldType::Ordinal),
            y: Encoding::new("n", FieldType::Quantitative),
            color: Encoding::new("name", FieldType::Nominal),
            tooltip: Vec::new(),
            interactive: false,
            data,
        }
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn x(mut self, enc: Encoding) -> Self {
        self.x = enc;
        self
    }

    pub fn y(mut self, enc: Encoding) -> Self {
        self.y = enc;
        self
    }

    pub fn color(mut self, enc: Encoding) -> Self {
        self.color = enc;
        self
    }

    pub fn tooltip(mut self, fields: Vec<Encoding>) -> Self {
        self.tooltip = fields;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn build(self) -> ChartSpec {
        ChartSpec {
            mark: self.mark,
            opacity: self.opacity,
            x: self.x,
            y: self.y,
            color: self.color,
            tooltip: self.tooltip,
            interactive: self.interactive,
            data: self.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{aggregate, DataProcessor, RawRecord};

    fn long_view() -> LongView {
        let wide = aggregate(&[
            RawRecord::new(1910, "Harry", 5),
            RawRecord::new(1910, "Gertrude", 3),
            RawRecord::new(1911, "Harry", 7),
        ])
        .unwrap();
        DataProcessor::narrow_and_reshape(&wide, &["Harry", "Gertrude"])
            .unwrap()
            .long
    }

    #[test]
    fn test_name_frequency_encodings() {
        let spec = ChartSpec::name_frequency(long_view());

        assert_eq!(spec.mark(), Mark::Bar);
        assert!((spec.opacity() - 0.3).abs() < f32::EPSILON);
        assert_eq!(spec.x().field_type, FieldType::Ordinal);
        assert_eq!(spec.y().label(), "Frequency");
        assert_eq!(spec.color().field, "name");
        assert!(spec.is_interactive());
        assert_eq!(spec.categories(), &["1910", "1911"]);
        assert_eq!(spec.series(), &["Harry", "Gertrude"]);
    }

    #[test]
    fn test_series_rows_follow_categories() {
        let spec = ChartSpec::name_frequency(long_view());
        let gertrude: Vec<(usize, i64)> = spec
            .series_rows("Gertrude")
            .map(|(idx, row)| (idx, row.count))
            .collect();
        assert_eq!(gertrude, vec![(0, 3), (1, 0)]);
    }

    #[test]
    fn test_tooltip_text() {
        let spec = ChartSpec::name_frequency(long_view());
        let row = &spec.data().rows()[0];
        assert_eq!(spec.tooltip_text(row), "name: Harry\nn: 5\nyear: 1910");
    }

    #[test]
    fn test_vega_lite_document() {
        let vega = ChartSpec::name_frequency(long_view()).to_vega_lite();

        assert_eq!(vega["mark"]["type"], "bar");
        assert_eq!(vega["encoding"]["x"]["type"], "ordinal");
        assert_eq!(vega["encoding"]["y"]["title"], "Frequency");
        let y = vega["encoding"]["y"].as_object().unwrap();
        assert!(y.contains_key("stack") && y["stack"].is_null());
        assert_eq!(vega["encoding"]["tooltip"].as_array().unwrap().len(), 3);
        assert_eq!(vega["data"]["values"].as_array().unwrap().len(), 4);
        assert_eq!(vega["params"][0]["bind"], "scales");
    }

    #[test]
    fn test_builder_clamps_opacity() {
        let spec = ChartSpec::bar(long_view()).opacity(4.0).build();
        assert_eq!(spec.opacity(), 1.0);
        assert!(!spec.is_interactive());
    }
}
