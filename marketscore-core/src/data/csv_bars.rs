//! CSV bar import: `date,open,high,low,close,volume` with a header row.

use super::provider::DataError;
use crate::domain::PriceBar;
use std::io::Read;
use std::path::Path;

/// Read bars from any CSV source, returned ascending by date.
///
/// Rows that fail the OHLC sanity check are rejected rather than skipped.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<PriceBar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();
    for (row, record) in rdr.deserialize::<PriceBar>().enumerate() {
        let bar = record?;
        if !bar.is_sane() {
            return Err(DataError::Other(format!(
                "row {}: inconsistent OHLC for {}",
                row + 1,
                bar.date
            )));
        }
        bars.push(bar);
    }
    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

pub fn load_bars_csv(path: &Path) -> Result<Vec<PriceBar>, DataError> {
    let file = std::fs::File::open(path)?;
    read_bars(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "date,open,high,low,close,volume
2024-01-03,101.0,103.0,100.0,102.5,1200
2024-01-02,100.0,102.0,99.0,101.0,1000
";

    #[test]
    fn reads_and_sorts_by_date() {
        let bars = read_bars(SAMPLE.as_bytes()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date.to_string(), "2024-01-02");
        assert_eq!(bars[1].close, 102.5);
        assert_eq!(bars[1].volume, 1200);
    }

    #[test]
    fn rejects_insane_rows() {
        let csv = "date,open,high,low,close,volume\n2024-01-02,100.0,90.0,99.0,101.0,1000\n";
        let err = read_bars(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("inconsistent OHLC"));
    }

    #[test]
    fn malformed_row_is_csv_error() {
        let csv = "date,open,high,low,close,volume\nnot-a-date,1,2,0.5,1.5,10\n";
        assert!(matches!(read_bars(csv.as_bytes()), Err(DataError::Csv(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let bars = load_bars_csv(file.path()).unwrap();
        assert_eq!(bars.len(), 2);

        let missing = load_bars_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(missing, DataError::Io(_)));
    }
}
