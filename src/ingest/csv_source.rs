use crate::data::{RawTransaction, Transaction, TransactionSet};
use crate::ingest::TransactionSource;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Sale records from a CSV file with a header row.
///
/// Expected columns: `property_id,address,sale_date,sale_price,buyer,seller,county`.
/// Extra columns are ignored.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    name: String,
}

impl CsvSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransactionSource for CsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<TransactionSet> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open CSV file {}", self.path.display()))?;
        read_transactions(file).with_context(|| format!("Failed to load {}", self.path.display()))
    }
}

/// Parse CSV sale records, stopping at the first malformed row
pub fn read_transactions<R: Read>(reader: R) -> Result<TransactionSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut transactions = Vec::new();
    for (index, result) in rdr.deserialize::<RawTransaction>().enumerate() {
        // Header is line 1
        let line = index + 2;
        let raw = result.with_context(|| format!("Failed to deserialize row at line {}", line))?;
        let transaction = Transaction::try_from(raw).with_context(|| format!("Invalid row at line {}", line))?;
        transactions.push(transaction);
    }

    Ok(TransactionSet::new(transactions)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlipError;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "\
property_id,address,sale_date,sale_price,buyer,seller,county,recording_date
P1,\"12 Oak St, Atlanta, GA 30301\",2023-01-01,300000,Acme LLC,Jane Doe,Fulton,2023-01-03
P1,\"12 Oak St, Atlanta, GA 30301\",2023-05-01,\"$400,000\",John Roe,Acme LLC,Fulton,2023-05-02
";

    #[test]
    fn test_reads_records_and_ignores_extra_columns() {
        let set = read_transactions(SAMPLE.as_bytes()).unwrap();
        assert_eq!(set.len(), 2);
        let second = &set.transactions()[1];
        assert_eq!(second.address, "12 Oak St, Atlanta, GA 30301");
        assert_eq!(second.sale_price, dec!(400000));
        assert_eq!(second.seller, "Acme LLC");
    }

    #[test]
    fn test_missing_column_reports_field_and_line() {
        let data = "property_id,address,sale_date,sale_price,buyer,seller\n\
                    P1,1 Main St,2023-01-01,100,A,B\n";
        let err = read_transactions(data.as_bytes()).unwrap_err();

        assert!(format!("{:#}", err).contains("line 2"));
        let cause = err.downcast_ref::<FlipError>().unwrap();
        assert_eq!(cause.field(), Some("county"));
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        let data = "property_id,sale_date,sale_price,buyer,seller,county\n\
                    P1,2023-01-01,100,A,B,Fulton\n\
                    P2,yesterday,100,A,B,Fulton\n";
        let err = read_transactions(data.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("line 3"));
        assert!(matches!(
            err.downcast_ref::<FlipError>(),
            Some(FlipError::Parse { field: "sale_date", .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let source = CsvSource::new("does/not/exist.csv");
        assert!(source.load().is_err());
        assert_eq!(source.name(), "does/not/exist.csv");
    }
}
