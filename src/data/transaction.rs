use crate::error::{FlipError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Date layouts accepted for `sale_date`, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// A recorded property sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable key across the property's sale history
    pub property_id: String,
    pub address: String,
    pub sale_date: NaiveDate,
    pub sale_price: Decimal,
    pub buyer: String,
    pub seller: String,
    pub county: String,
}

impl Transaction {
    /// Check required fields and the price domain
    pub fn validate(&self) -> Result<()> {
        let record = self.record_label();
        for (field, value) in [
            ("property_id", &self.property_id),
            ("buyer", &self.buyer),
            ("seller", &self.seller),
            ("county", &self.county),
        ] {
            if value.trim().is_empty() {
                return Err(FlipError::missing(record, field));
            }
        }

        if self.sale_price.is_sign_negative() && !self.sale_price.is_zero() {
            return Err(FlipError::Validation {
                record: record.to_string(),
                field: "sale_price",
                message: format!("must not be negative (got {})", self.sale_price),
            });
        }

        Ok(())
    }

    fn record_label(&self) -> &str {
        if self.property_id.trim().is_empty() {
            "<unknown>"
        } else {
            &self.property_id
        }
    }
}

/// Sale record as delivered by a data source, before validation.
///
/// Every column is optional text so that absent and malformed values can be
/// reported precisely instead of failing inside the deserializer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTransaction {
    pub property_id: Option<String>,
    pub address: Option<String>,
    pub sale_date: Option<String>,
    pub sale_price: Option<String>,
    pub buyer: Option<String>,
    pub seller: Option<String>,
    pub county: Option<String>,
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = FlipError;

    fn try_from(raw: RawTransaction) -> Result<Self> {
        let property_id = non_blank(raw.property_id);
        let record = property_id.clone().unwrap_or_else(|| "<unknown>".to_string());
        let required = |value: Option<String>, field: &'static str| {
            non_blank(value).ok_or_else(|| FlipError::missing(&record, field))
        };

        let property_id = required(property_id, "property_id")?;
        let sale_date = parse_sale_date(&required(raw.sale_date, "sale_date")?)?;
        let sale_price = parse_price(&required(raw.sale_price, "sale_price")?)?;
        let buyer = required(raw.buyer, "buyer")?;
        let seller = required(raw.seller, "seller")?;
        let county = required(raw.county, "county")?;

        let transaction = Transaction {
            property_id,
            address: raw.address.map(|a| a.trim().to_string()).unwrap_or_default(),
            sale_date,
            sale_price,
            buyer,
            seller,
            county,
        };
        transaction.validate()?;
        Ok(transaction)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a sale date in any of the layouts county exports use
pub fn parse_sale_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.date_naive());
    }

    Err(FlipError::parse("sale_date", value, "unrecognised date format"))
}

/// Parse a price such as `300000`, `300000.00` or `$300,000`
pub fn parse_price(value: &str) -> Result<Decimal> {
    let cleaned: String = value
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|e| FlipError::parse("sale_price", value, e.to_string()))
}

/// Validated, combined input collection for one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionSet {
    transactions: Vec<Transaction>,
}

impl TransactionSet {
    /// Build a set from already-typed transactions, rejecting the first malformed one
    pub fn new(transactions: Vec<Transaction>) -> Result<Self> {
        for transaction in &transactions {
            transaction.validate()?;
        }
        Ok(Self { transactions })
    }

    /// Convert raw source records, failing on the first malformed record
    pub fn from_raw<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = RawTransaction>,
    {
        let transactions = records
            .into_iter()
            .map(Transaction::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { transactions })
    }

    /// Append another batch (e.g. a second county)
    pub fn merge(&mut self, other: TransactionSet) {
        self.transactions.extend(other.transactions);
    }

    /// Keep only sales in the named counties (case-insensitive). An empty list keeps everything.
    pub fn retain_counties(&mut self, counties: &[String]) {
        if counties.is_empty() {
            return;
        }
        let wanted: HashSet<String> = counties.iter().map(|c| c.trim().to_lowercase()).collect();
        self.transactions
            .retain(|t| wanted.contains(&t.county.trim().to_lowercase()));
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Number of distinct properties
    pub fn property_count(&self) -> usize {
        self.transactions
            .iter()
            .map(|t| t.property_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn into_inner(self) -> Vec<Transaction> {
        self.transactions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(property_id: &str, date: &str, price: &str) -> RawTransaction {
        RawTransaction {
            property_id: Some(property_id.to_string()),
            address: Some("12 Oak St, Atlanta, GA 30301".to_string()),
            sale_date: Some(date.to_string()),
            sale_price: Some(price.to_string()),
            buyer: Some("Acme LLC".to_string()),
            seller: Some("Jane Doe".to_string()),
            county: Some("Fulton".to_string()),
        }
    }

    #[test]
    fn test_raw_conversion() {
        let tx = Transaction::try_from(raw("P1", "2023-01-01", "$300,000")).unwrap();
        assert_eq!(tx.property_id, "P1");
        assert_eq!(tx.sale_date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(tx.sale_price, dec!(300000));
    }

    #[test]
    fn test_alternate_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        for value in ["05/01/2023", "2023-05-01 00:00:00", "2023-05-01T00:00:00", "2023-05-01T00:00:00Z"] {
            assert_eq!(parse_sale_date(value).unwrap(), expected, "layout {}", value);
        }
    }

    #[test]
    fn test_missing_field_is_validation_error() {
        let mut record = raw("P1", "2023-01-01", "300000");
        record.buyer = None;
        let err = Transaction::try_from(record).unwrap_err();
        assert!(matches!(err, FlipError::Validation { field: "buyer", .. }));

        let mut record = raw("P1", "2023-01-01", "300000");
        record.county = Some("   ".to_string());
        let err = Transaction::try_from(record).unwrap_err();
        assert_eq!(err.field(), Some("county"));
    }

    #[test]
    fn test_missing_property_id_reports_unknown_record() {
        let mut record = raw("P1", "2023-01-01", "300000");
        record.property_id = None;
        match Transaction::try_from(record).unwrap_err() {
            FlipError::Validation { record, field, .. } => {
                assert_eq!(record, "<unknown>");
                assert_eq!(field, "property_id");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_values_are_parse_errors() {
        let err = Transaction::try_from(raw("P1", "sometime in May", "300000")).unwrap_err();
        match err {
            FlipError::Parse { field, value, .. } => {
                assert_eq!(field, "sale_date");
                assert_eq!(value, "sometime in May");
            }
            other => panic!("unexpected error {:?}", other),
        }

        let err = Transaction::try_from(raw("P1", "2023-01-01", "three hundred")).unwrap_err();
        assert!(matches!(err, FlipError::Parse { field: "sale_price", .. }));
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = Transaction::try_from(raw("P1", "2023-01-01", "-5")).unwrap_err();
        assert!(matches!(err, FlipError::Validation { field: "sale_price", .. }));
    }

    #[test]
    fn test_from_raw_fails_fast() {
        let mut bad = raw("P2", "2023-01-01", "300000");
        bad.seller = None;
        let records = vec![raw("P1", "2023-01-01", "300000"), bad];
        assert!(TransactionSet::from_raw(records).is_err());
    }

    #[test]
    fn test_merge_and_county_filter() {
        let mut set = TransactionSet::from_raw(vec![raw("P1", "2023-01-01", "1")]).unwrap();
        let mut other = raw("P2", "2023-01-02", "2");
        other.county = Some("DeKalb".to_string());
        set.merge(TransactionSet::from_raw(vec![other]).unwrap());
        assert_eq!(set.len(), 2);
        assert_eq!(set.property_count(), 2);

        set.retain_counties(&["dekalb".to_string()]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.transactions()[0].property_id, "P2");

        set.retain_counties(&[]);
        assert_eq!(set.len(), 1);
    }
}
