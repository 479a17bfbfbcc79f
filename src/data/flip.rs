use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A buy/sell pair on one property that satisfied the hold-period and profit criteria.
///
/// Produced only by the flip matcher, so `hold_days` and `profit` always lie inside
/// the configured ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flip {
    pub property_id: String,
    pub address: String,
    pub buy_date: NaiveDate,
    pub buy_price: Decimal,
    pub buyer: String,
    pub sell_date: NaiveDate,
    pub sell_price: Decimal,
    pub seller: String,
    pub hold_days: i64,
    pub profit: Decimal,
    /// Profit as a percentage of the buy price
    pub roi: f64,
    pub county: String,
}

impl Flip {
    /// Whether this flip was bought by `investor`
    pub fn bought_by(&self, investor: &str) -> bool {
        self.buyer == investor
    }
}
