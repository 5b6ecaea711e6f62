//! Data Processor Module
//! Narrows the aggregated table to the selected names and reshapes it for
//! charting (long format) and for download (suffixed wide format).

use crate::data::aggregator::WideTable;
use crate::data::loader::YEAR_COL;
use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

/// Appended to every name column of the export view.
pub const EXPORT_SUFFIX: &str = "_count";

#[derive(Error, Debug)]
pub enum PresentError {
    #[error("Please select at least one name.")]
    EmptySelection,
    #[error("None of the selected names exist in the dataset: {}", .0.join(", "))]
    NoKnownNames(Vec<String>),
}

/// The selected slice of the wide table with years already rendered as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrowTable {
    pub years: Vec<String>,
    pub names: Vec<String>,
    /// `rows[year_idx][name_idx]`
    pub rows: Vec<Vec<i64>>,
}

/// One `(year, name, n)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongRow {
    pub year: String,
    pub name: String,
    pub count: i64,
}

/// Long (tidy) view used for the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongView {
    years: Vec<String>,
    names: Vec<String>,
    rows: Vec<LongRow>,
}

impl LongView {
    pub fn rows(&self) -> &[LongRow] {
        &self.rows
    }

    /// Year categories in axis order.
    pub fn years(&self) -> &[String] {
        &self.years
    }

    /// Series names in legend order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn max_count(&self) -> i64 {
        self.rows.iter().map(|r| r.count).max().unwrap_or(0)
    }

    /// Pivot back to one row per year, one column per name.
    pub fn repivot(&self) -> NarrowTable {
        let year_idx: HashMap<&str, usize> = self
            .years
            .iter()
            .enumerate()
            .map(|(i, y)| (y.as_str(), i))
            .collect();
        let name_idx: HashMap<&str, usize> = self
            .names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect();

        let mut rows = vec![vec![0i64; self.names.len()]; self.years.len()];
        for row in &self.rows {
            if let (Some(&y), Some(&n)) = (
                year_idx.get(row.year.as_str()),
                name_idx.get(row.name.as_str()),
            ) {
                rows[y][n] += row.count;
            }
        }

        NarrowTable {
            years: self.years.clone(),
            names: self.names.clone(),
            rows,
        }
    }
}

/// Suffixed wide view offered as the "Download CSV" artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportView {
    columns: Vec<String>,
    years: Vec<String>,
    rows: Vec<Vec<i64>>,
}

impl ExportView {
    fn from_narrow(table: NarrowTable) -> Self {
        let mut columns = Vec::with_capacity(table.names.len() + 1);
        columns.push(YEAR_COL.to_string());
        columns.extend(
            table
                .names
                .iter()
                .map(|name| format!("{name}{EXPORT_SUFFIX}")),
        );

        Self {
            columns,
            years: table.years,
            rows: table.rows,
        }
    }

    /// Header names, `year` first.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn height(&self) -> usize {
        self.years.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Iterate `(year, counts)` pairs in row order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[i64])> {
        self.years
            .iter()
            .map(String::as_str)
            .zip(self.rows.iter().map(Vec::as_slice))
    }

    pub fn frame(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.columns.len());
        columns.push(Column::new(
            YEAR_COL.into(),
            self.years.iter().map(String::as_str).collect::<Vec<_>>(),
        ));
        for (idx, header) in self.columns.iter().skip(1).enumerate() {
            let values: Vec<i64> = self.rows.iter().map(|row| row[idx]).collect();
            columns.push(Column::new(header.as_str().into(), values));
        }
        DataFrame::new(columns)
    }
}

/// Both derived views plus any selected names that had to be dropped.
#[derive(Debug, Clone)]
pub struct Presentation {
    pub long: LongView,
    pub export: ExportView,
    pub dropped: Vec<String>,
}

/// Handles narrowing and reshaping of the aggregated table.
pub struct DataProcessor;

impl DataProcessor {
    /// Build the chart and export views for a selection.
    ///
    /// Blank and repeated names are ignored. Names that are not columns of
    /// `wide` are dropped with a warning and returned in
    /// [`Presentation::dropped`]; the view is still produced for the rest.
    pub fn narrow_and_reshape<S: AsRef<str>>(
        wide: &WideTable,
        selection: &[S],
    ) -> Result<Presentation, PresentError> {
        let requested = Self::normalize_selection(selection);
        if requested.is_empty() {
            return Err(PresentError::EmptySelection);
        }

        let (known, dropped): (Vec<String>, Vec<String>) =
            requested.into_iter().partition(|name| wide.contains(name));
        if !dropped.is_empty() {
            tracing::warn!(names = ?dropped, "selected names not found in dataset, dropping");
        }
        if known.is_empty() {
            return Err(PresentError::NoKnownNames(dropped));
        }

        let narrow = Self::narrow(wide, &known);
        let long = Self::melt(&narrow);
        let export = ExportView::from_narrow(long.repivot());

        Ok(Presentation {
            long,
            export,
            dropped,
        })
    }

    /// Drop blank entries and de-duplicate while keeping first-seen order.
    /// Names are matched exactly, surrounding whitespace included.
    pub fn normalize_selection<S: AsRef<str>>(selection: &[S]) -> Vec<String> {
        let mut seen: Vec<String> = Vec::with_capacity(selection.len());
        for name in selection {
            let name = name.as_ref();
            if !name.trim().is_empty() && !seen.iter().any(|s| s == name) {
                seen.push(name.to_string());
            }
        }
        seen
    }

    /// Keep `year` plus the given columns, with years rendered as strings so
    /// the chart treats them as ordinal categories.
    pub fn narrow(wide: &WideTable, names: &[String]) -> NarrowTable {
        let selected: Vec<&[i64]> = names
            .iter()
            .filter_map(|name| wide.column(name))
            .collect();

        let rows = (0..wide.height())
            .map(|year_idx| selected.iter().map(|col| col[year_idx]).collect())
            .collect();

        NarrowTable {
            years: wide.years().iter().map(|y| y.to_string()).collect(),
            names: names
                .iter()
                .filter(|name| wide.contains(name))
                .cloned()
                .collect(),
            rows,
        }
    }

    /// Unpivot to `(year, name, n)` rows, year-major.
    pub fn melt(table: &NarrowTable) -> LongView {
        let mut rows = Vec::with_capacity(table.years.len() * table.names.len());
        for (year, counts) in table.years.iter().zip(&table.rows) {
            for (name, &count) in table.names.iter().zip(counts) {
                rows.push(LongRow {
                    year: year.clone(),
                    name: name.clone(),
                    count,
                });
            }
        }

        LongView {
            years: table.years.clone(),
            names: table.names.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregator::{aggregate, RawRecord};

    fn scenario() -> WideTable {
        aggregate(&[
            RawRecord::new(1910, "Harry", 5),
            RawRecord::new(1910, "Gertrude", 3),
            RawRecord::new(1911, "Harry", 7),
        ])
        .unwrap()
    }

    fn row(year: &str, name: &str, count: i64) -> LongRow {
        LongRow {
            year: year.to_string(),
            name: name.to_string(),
            count,
        }
    }

    #[test]
    fn test_scenario_long_view() {
        let p = DataProcessor::narrow_and_reshape(&scenario(), &["Harry", "Gertrude"]).unwrap();

        assert_eq!(
            p.long.rows(),
            &[
                row("1910", "Harry", 5),
                row("1910", "Gertrude", 3),
                row("1911", "Harry", 7),
                row("1911", "Gertrude", 0),
            ]
        );
        assert!(p.dropped.is_empty());
    }

    #[test]
    fn test_scenario_export_view() {
        let p = DataProcessor::narrow_and_reshape(&scenario(), &["Harry", "Gertrude"]).unwrap();

        assert_eq!(p.export.columns(), &["year", "Harry_count", "Gertrude_count"]);
        let rows: Vec<(&str, &[i64])> = p.export.rows().collect();
        assert_eq!(rows, vec![("1910", &[5, 3][..]), ("1911", &[7, 0][..])]);
    }

    #[test]
    fn test_view_sizes() {
        let wide = scenario();
        for selection in [vec!["Harry"], vec!["Gertrude", "Harry"]] {
            let p = DataProcessor::narrow_and_reshape(&wide, selection.as_slice()).unwrap();
            assert_eq!(p.long.len(), wide.height() * selection.len());
            assert_eq!(p.export.height(), wide.height());
            assert_eq!(p.export.width(), selection.len() + 1);

            let frame = p.export.frame().unwrap();
            assert_eq!(frame.shape(), (wide.height(), selection.len() + 1));
        }
    }

    #[test]
    fn test_repivot_round_trip() {
        let wide = scenario();
        let names = vec!["Gertrude".to_string(), "Harry".to_string()];
        let narrow = DataProcessor::narrow(&wide, &names);
        let long = DataProcessor::melt(&narrow);

        assert_eq!(long.repivot(), narrow);
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let empty: [&str; 0] = [];
        let err = DataProcessor::narrow_and_reshape(&scenario(), &empty).unwrap_err();
        assert!(matches!(err, PresentError::EmptySelection));
        assert_eq!(err.to_string(), "Please select at least one name.");

        let blanks = DataProcessor::narrow_and_reshape(&scenario(), &["  ", ""]).unwrap_err();
        assert!(matches!(blanks, PresentError::EmptySelection));
    }

    #[test]
    fn test_unknown_names_are_dropped() {
        let p = DataProcessor::narrow_and_reshape(&scenario(), &["Zelda", "Harry", "Harry"])
            .unwrap();

        assert_eq!(p.dropped, vec!["Zelda".to_string()]);
        assert_eq!(p.long.names(), &["Harry".to_string()]);
        assert_eq!(p.export.columns(), &["year", "Harry_count"]);

        let err = DataProcessor::narrow_and_reshape(&scenario(), &["Zelda"]).unwrap_err();
        assert!(matches!(err, PresentError::NoKnownNames(ref names) if names == &["Zelda"]));
    }

    #[test]
    fn test_all_zero_name_keeps_its_series() {
        let wide = aggregate(&[
            RawRecord::new(1910, "Harry", 5),
            RawRecord::new(1911, "Harry", 7),
            RawRecord::new(1911, "Ghost", 0),
        ])
        .unwrap();

        let p = DataProcessor::narrow_and_reshape(&wide, &["Harry", "Ghost"]).unwrap();
        let ghost: Vec<i64> = p
            .long
            .rows()
            .iter()
            .filter(|r| r.name == "Ghost")
            .map(|r| r.count)
            .collect();
        assert_eq!(ghost, vec![0, 0]);
    }

    #[test]
    fn test_name_called_year_gets_suffixed() {
        let wide = aggregate(&[
            RawRecord::new(1910, "year", 2),
            RawRecord::new(1910, "Harry", 1),
        ])
        .unwrap();

        let p = DataProcessor::narrow_and_reshape(&wide, &["year", "Harry"]).unwrap();
        assert_eq!(p.export.columns(), &["year", "year_count", "Harry_count"]);
        assert_eq!(p.long.names(), &["year", "Harry"]);

        let frame = p.export.frame().unwrap();
        assert_eq!(frame.shape(), (1, 3));
    }

    #[test]
    fn test_normalize_selection_keeps_order() {
        let names = DataProcessor::normalize_selection(&["Harry", "Alberta", "Harry", "", "  "]);
        assert_eq!(names, vec!["Harry", "Alberta"]);
    }

    #[test]
    fn test_padded_dataset_name_is_matched_exactly() {
        let wide = aggregate(&[
            RawRecord::new(1910, " Harry ", 4),
            RawRecord::new(1910, "Harry", 5),
        ])
        .unwrap();

        let p = DataProcessor::narrow_and_reshape(&wide, &[" Harry "]).unwrap();
        assert!(p.dropped.is_empty());
        assert_eq!(p.export.columns(), &["year", " Harry _count"]);
        let rows: Vec<(&str, &[i64])> = p.export.rows().collect();
        assert_eq!(rows, vec![("1910", &[4][..])]);
    }
}
