//! Selected-names CSV export.

use super::{Artifact, ExportError, CSV_MIME, SELECTION_FILE_NAME};
use crate::data::ExportView;
use polars::prelude::*;

pub struct CsvExport;

impl CsvExport {
    /// Serialize the export view: header row, no index column, integer cells.
    pub fn selection_csv(view: &ExportView) -> Result<String, ExportError> {
        let mut df = view.frame()?;
        let mut buf: Vec<u8> = Vec::new();
        CsvWriter::new(&mut buf)
            .include_header(true)
            .finish(&mut df)?;
        Ok(String::from_utf8(buf)?)
    }

    pub fn selection_artifact(view: &ExportView) -> Result<Artifact, ExportError> {
        let csv = Self::selection_csv(view)?;
        Ok(Artifact::new(SELECTION_FILE_NAME, CSV_MIME, csv.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{aggregate, DataProcessor, RawRecord};

    #[test]
    fn test_scenario_csv_text() {
        let wide = aggregate(&[
            RawRecord::new(1910, "Harry", 5),
            RawRecord::new(1910, "Gertrude", 3),
            RawRecord::new(1911, "Harry", 7),
        ])
        .unwrap();
        let p = DataProcessor::narrow_and_reshape(&wide, &["Harry", "Gertrude"]).unwrap();

        let csv = CsvExport::selection_csv(&p.export).unwrap();
        assert_eq!(csv, "year,Harry_count,Gertrude_count\n1910,5,3\n1911,7,0\n");
    }

    #[test]
    fn test_selection_artifact_metadata() {
        let wide = aggregate(&[RawRecord::new(2000, "Alberta", 12)]).unwrap();
        let p = DataProcessor::narrow_and_reshape(&wide, &["Alberta"]).unwrap();

        let artifact = CsvExport::selection_artifact(&p.export).unwrap();
        assert_eq!(artifact.file_name, "name_frequencies.csv");
        assert_eq!(artifact.mime, "text/csv");
        assert_eq!(artifact.bytes, b"year,Alberta_count\n2000,12\n".to_vec());
    }

    #[test]
    fn test_name_called_year_csv_header() {
        let wide = aggregate(&[
            RawRecord::new(1910, "year", 2),
            RawRecord::new(1910, "Harry", 1),
        ])
        .unwrap();
        let p = DataProcessor::narrow_and_reshape(&wide, &["year", "Harry"]).unwrap();

        let csv = CsvExport::selection_csv(&p.export).unwrap();
        assert_eq!(csv, "year,year_count,Harry_count\n1910,2,1\n");
    }
}
