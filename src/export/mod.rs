//! Export module - downloadable artifacts

mod csv;
mod remote;

pub use csv::CsvExport;
pub use remote::{FetchError, RemoteDataset, DEFAULT_ALL_DATA_URL};

use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// MIME type of both CSV downloads.
pub const CSV_MIME: &str = "text/csv";
/// File name offered for the selected-names CSV.
pub const SELECTION_FILE_NAME: &str = "name_frequencies.csv";
/// File name offered for the full dataset.
pub const ALL_DATA_FILE_NAME: &str = "all_name_data.csv";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] polars::prelude::PolarsError),
    #[error("CSV output is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("Cannot write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A file the user can download: name, MIME type and exact bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(file_name: &str, mime: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            mime,
            bytes,
        }
    }

    /// Write the bytes unchanged to `path`, or to stdout when `path` is `-`.
    pub fn write_to(&self, path: &Path) -> Result<(), ExportError> {
        let io_err = |source| ExportError::Io {
            path: path.display().to_string(),
            source,
        };

        if path.as_os_str() == "-" {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&self.bytes).map_err(io_err)?;
            stdout.flush().map_err(io_err)?;
        } else {
            std::fs::write(path, &self.bytes).map_err(io_err)?;
        }

        tracing::info!(
            path = %path.display(),
            bytes = self.bytes.len(),
            mime = self.mime,
            "artifact written"
        );
        Ok(())
    }
}
