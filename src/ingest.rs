//! CSV ingestion: locating the order-date and sales columns and turning
//! rows into raw records for aggregation.

use crate::core::RawRecord;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use std::path::Path;
use tracing::debug;

/// Accepted header spellings for the order-date column.
const DATE_ALIASES: [&str; 3] = ["order date", "order_date", "orderdate"];

/// Date formats tried in order when parsing row values.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Read raw sales records from a CSV file.
///
/// The date column is resolved among `Order Date` spellings and the
/// amount column matches `Sales`, both case-insensitively. Rows whose
/// date or amount fails to parse are dropped, not errored; a missing
/// column is a configuration error.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| ForecastError::Configuration(format!("open {}: {e}", path.display())))?;

    let headers = reader
        .headers()
        .map_err(|e| ForecastError::Configuration(format!("read headers: {e}")))?
        .clone();

    let date_idx = headers
        .iter()
        .position(|h| DATE_ALIASES.contains(&h.trim().to_lowercase().as_str()))
        .ok_or_else(|| ForecastError::Configuration("Order Date column missing".to_string()))?;
    let sales_idx = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("sales"))
        .ok_or_else(|| ForecastError::Configuration("Sales column missing".to_string()))?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in reader.records() {
        let row = row.map_err(|e| ForecastError::Configuration(format!("read row: {e}")))?;
        let parsed = row
            .get(date_idx)
            .and_then(parse_date)
            .zip(row.get(sales_idx).and_then(|s| s.trim().parse::<f64>().ok()));

        match parsed {
            Some((date, amount)) => records.push(RawRecord::new(date, amount)),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, kept = records.len(), "dropped unparseable rows");
    }

    Ok(records)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_records_with_canonical_headers() {
        let file = csv_file("Order Date,Sales\n2017-01-05,100.5\n2017-02-01,200\n");
        let records = read_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].amount, 100.5);
    }

    #[test]
    fn header_aliases_are_case_insensitive() {
        let file = csv_file("order_date,SALES\n01/15/2017,10\n");
        let records = read_records(file.path()).unwrap();
        assert_eq!(
            records[0].date,
            NaiveDate::from_ymd_opt(2017, 1, 15).unwrap()
        );
    }

    #[test]
    fn unparseable_rows_are_dropped_not_errored() {
        let file = csv_file("Order Date,Sales\nnot-a-date,10\n2017-03-01,abc\n2017-03-01,30\n");
        let records = read_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, 30.0);
    }

    #[test]
    fn missing_date_column_is_a_configuration_error() {
        let file = csv_file("Ship Date,Sales\n2017-01-01,10\n");
        let err = read_records(file.path()).unwrap_err();
        assert!(matches!(err, ForecastError::Configuration(_)));
    }

    #[test]
    fn missing_sales_column_is_a_configuration_error() {
        let file = csv_file("Order Date,Profit\n2017-01-01,10\n");
        let err = read_records(file.path()).unwrap_err();
        assert!(matches!(err, ForecastError::Configuration(_)));
    }
}
