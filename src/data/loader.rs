//! CSV Data Loader Module
//! Reads the raw name-frequency file with Polars and checks its shape.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// Column holding the birth year.
pub const YEAR_COL: &str = "year";
/// Column holding the given name.
pub const NAME_COL: &str = "name";
/// Column holding the number of births.
pub const COUNT_COL: &str = "n";

const REQUIRED_COLUMNS: [&str; 3] = [YEAR_COL, NAME_COL, COUNT_COL];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Missing column '{column}' in {path}")]
    MissingColumn { column: String, path: PathBuf },
}

/// Identity of a data file on disk, used as the aggregate cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFingerprint {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceFingerprint {
    pub fn of(path: &Path) -> Result<Self, LoaderError> {
        let io_err = |source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        };
        let canonical = path.canonicalize().map_err(io_err)?;
        let meta = std::fs::metadata(&canonical).map_err(io_err)?;

        Ok(Self {
            path: canonical,
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// Load the raw `(year, name, n)` records.
///
/// The returned frame always has exactly the three required columns, typed
/// `Int64`, `String`, `Int64`. Rows without a year or name are discarded and
/// missing counts become zero.
pub fn load_records(path: &Path) -> Result<DataFrame, LoaderError> {
    if !path.exists() {
        return Err(LoaderError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }

    let raw = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .finish()?
        .collect()?;

    let present: Vec<String> = raw
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for required in REQUIRED_COLUMNS {
        if !present.iter().any(|c| c == required) {
            return Err(LoaderError::MissingColumn {
                column: required.to_string(),
                path: path.to_path_buf(),
            });
        }
    }

    let df = raw
        .lazy()
        .select([
            col(YEAR_COL).cast(DataType::Int64),
            col(NAME_COL).cast(DataType::String),
            col(COUNT_COL).cast(DataType::Int64).fill_null(lit(0i64)),
        ])
        .filter(
            col(YEAR_COL)
                .is_not_null()
                .and(col(NAME_COL).is_not_null())
                .and(col(NAME_COL).neq(lit(""))),
        )
        .collect()?;

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        "loaded name records"
    );

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_records_keeps_required_columns() {
        let file = csv_file("year,sex,name,n,prop\n1910,F,Gertrude,3,0.1\n1910,M,Harry,5,0.2\n");
        let df = load_records(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["year", "name", "n"]);
        assert_eq!(df.column("year").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_blank_cells_are_dropped_or_zeroed() {
        // Missing year, missing name, missing count.
        let file = csv_file("year,name,n\n1910,Harry,5\n,Ghost,4\n1911,,2\n1911,Harry,\n");
        let df = load_records(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        let years: Vec<Option<i64>> = df.column("year").unwrap().i64().unwrap().into_iter().collect();
        let names: Vec<Option<&str>> =
            df.column("name").unwrap().str().unwrap().into_iter().collect();
        let counts: Vec<Option<i64>> = df.column("n").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(years, vec![Some(1910), Some(1911)]);
        assert_eq!(names, vec![Some("Harry"), Some("Harry")]);
        assert_eq!(counts, vec![Some(5), Some(0)]);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let file = csv_file("year,name\n1910,Harry\n");
        let err = load_records(file.path()).unwrap_err();

        match err {
            LoaderError::MissingColumn { column, .. } => assert_eq!(column, "n"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_records(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn test_fingerprint_tracks_size() {
        let file = csv_file("year,name,n\n1910,Harry,5\n");
        let first = SourceFingerprint::of(file.path()).unwrap();
        let again = SourceFingerprint::of(file.path()).unwrap();
        assert_eq!(first, again);

        let mut handle = file.reopen().unwrap();
        use std::io::Seek;
        handle.seek(std::io::SeekFrom::End(0)).unwrap();
        handle.write_all(b"1911,Harry,7\n").unwrap();
        handle.flush().unwrap();

        let changed = SourceFingerprint::of(file.path()).unwrap();
        assert_ne!(first.len, changed.len);
    }
}
