//! Aggregator Module
//! Sums raw `(year, name, n)` records and pivots them into a year x name table.

use crate::data::loader::{COUNT_COL, NAME_COL, YEAR_COL};
use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One row of the raw long-format dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub year: i64,
    pub name: String,
    pub count: i64,
}

impl RawRecord {
    pub fn new(year: i64, name: impl Into<String>, count: i64) -> Self {
        Self {
            year,
            name: name.into(),
            count,
        }
    }
}

/// Pivoted table: one row per year, one column per name.
///
/// Years are unique and ascending, names are sorted, and every cell holds the
/// summed count for its `(year, name)` pair (zero when the pair never occurs).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WideTable {
    years: Vec<i64>,
    names: Vec<String>,
    /// `columns[name_idx][year_idx]`
    columns: Vec<Vec<i64>>,
}

impl WideTable {
    pub fn years(&self) -> &[i64] {
        &self.years
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn height(&self) -> usize {
        self.years.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_index(name).is_some()
    }

    /// Counts for one name, aligned with [`WideTable::years`].
    pub fn column(&self, name: &str) -> Option<&[i64]> {
        self.name_index(name).map(|idx| self.columns[idx].as_slice())
    }

    /// Summed count for a `(year, name)` pair, `None` when either key is absent.
    pub fn count(&self, year: i64, name: &str) -> Option<i64> {
        let year_idx = self.years.binary_search(&year).ok()?;
        let name_idx = self.name_index(name)?;
        Some(self.columns[name_idx][year_idx])
    }

    fn name_index(&self, name: &str) -> Option<usize> {
        self.names
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()
    }
}

/// Aggregate in-memory records.
pub fn aggregate(records: &[RawRecord]) -> Result<WideTable, AggregateError> {
    let years: Vec<i64> = records.iter().map(|r| r.year).collect();
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    let counts: Vec<i64> = records.iter().map(|r| r.count).collect();

    let df = DataFrame::new(vec![
        Column::new(YEAR_COL.into(), years),
        Column::new(NAME_COL.into(), names),
        Column::new(COUNT_COL.into(), counts),
    ])?;

    aggregate_frame(df)
}

/// Aggregate a frame shaped like the output of `load_records`.
pub fn aggregate_frame(df: DataFrame) -> Result<WideTable, AggregateError> {
    if df.height() == 0 {
        return Ok(WideTable::default());
    }

    let summed = df
        .lazy()
        .group_by([col(YEAR_COL), col(NAME_COL)])
        .agg([col(COUNT_COL).sum()])
        .collect()?;

    let year_ca = summed.column(YEAR_COL)?.i64()?;
    let name_ca = summed.column(NAME_COL)?.str()?;
    let count_ca = summed.column(COUNT_COL)?.i64()?;

    let mut years: BTreeSet<i64> = BTreeSet::new();
    let mut names: BTreeSet<String> = BTreeSet::new();
    let mut cells: HashMap<(i64, String), i64> = HashMap::with_capacity(summed.height());

    for ((year, name), count) in year_ca
        .into_iter()
        .zip(name_ca.into_iter())
        .zip(count_ca.into_iter())
    {
        let (Some(year), Some(name)) = (year, name) else {
            continue;
        };
        years.insert(year);
        names.insert(name.to_string());
        *cells.entry((year, name.to_string())).or_insert(0) += count.unwrap_or(0);
    }

    let years: Vec<i64> = years.into_iter().collect();
    let names: Vec<String> = names.into_iter().collect();
    let columns = names
        .iter()
        .map(|name| {
            years
                .iter()
                .map(|&year| cells.get(&(year, name.clone())).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    tracing::debug!(
        years = years.len(),
        names = names.len(),
        "aggregated name table"
    );

    Ok(WideTable {
        years,
        names,
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<RawRecord> {
        vec![
            RawRecord::new(1911, "Harry", 7),
            RawRecord::new(1910, "Harry", 5),
            RawRecord::new(1910, "Gertrude", 3),
            RawRecord::new(1910, "Harry", 2),
            RawRecord::new(1912, "Alberta", 1),
        ]
    }

    #[test]
    fn test_aggregate_sums_duplicates_and_fills_zero() {
        let wide = aggregate(&sample()).unwrap();

        assert_eq!(wide.years(), &[1910, 1911, 1912]);
        assert_eq!(wide.names(), &["Alberta", "Gertrude", "Harry"]);

        assert_eq!(wide.count(1910, "Harry"), Some(7));
        assert_eq!(wide.count(1911, "Harry"), Some(7));
        assert_eq!(wide.count(1910, "Gertrude"), Some(3));
        assert_eq!(wide.count(1911, "Gertrude"), Some(0));
        assert_eq!(wide.count(1910, "Alberta"), Some(0));
        assert_eq!(wide.count(1912, "Alberta"), Some(1));
        assert_eq!(wide.count(1909, "Harry"), None);
        assert_eq!(wide.count(1910, "Zelda"), None);
    }

    #[test]
    fn test_aggregate_ignores_row_order() {
        let forward = aggregate(&sample()).unwrap();

        let mut reversed = sample();
        reversed.reverse();
        let mut rotated = sample();
        rotated.rotate_left(2);

        assert_eq!(forward, aggregate(&reversed).unwrap());
        assert_eq!(forward, aggregate(&rotated).unwrap());
    }

    #[test]
    fn test_aggregate_shape() {
        let wide = aggregate(&sample()).unwrap();

        assert_eq!(wide.height(), 3);
        assert_eq!(wide.names().len(), 3);
        assert!(wide
            .names()
            .iter()
            .all(|n| wide.column(n).unwrap().len() == wide.height()));
        let totals: i64 = wide
            .names()
            .iter()
            .map(|n| wide.column(n).unwrap().iter().sum::<i64>())
            .sum();
        assert_eq!(totals, 18);
    }

    #[test]
    fn test_name_called_year_is_an_ordinary_column() {
        let wide = aggregate(&[
            RawRecord::new(1910, "year", 2),
            RawRecord::new(1910, "Harry", 1),
        ])
        .unwrap();

        assert_eq!(wide.names(), &["Harry", "year"]);
        assert_eq!(wide.count(1910, "year"), Some(2));
    }

    #[test]
    fn test_aggregate_empty_input() {
        let wide = aggregate(&[]).unwrap();
        assert_eq!(wide.height(), 0);
        assert!(wide.names().is_empty());
    }
}
