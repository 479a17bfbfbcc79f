use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Per-investor flip statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorProfile {
    pub investor_name: String,
    pub total_flips: usize,
    pub total_profit: Decimal,
    pub avg_profit_per_flip: Decimal,
    pub avg_hold_days: f64,
    /// Mean of per-flip ROI percentages
    pub avg_roi: f64,
}

/// Entity kind inferred from an investor's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessType {
    #[serde(rename = "Business Entity")]
    BusinessEntity,
    #[serde(rename = "Trust/Entity")]
    TrustOrEstate,
    #[serde(rename = "Individual Investor")]
    Individual,
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BusinessType::BusinessEntity => "Business Entity",
            BusinessType::TrustOrEstate => "Trust/Entity",
            BusinessType::Individual => "Individual Investor",
        };
        f.write_str(label)
    }
}

/// Rough bridge-loan demand tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoanNeed {
    High,
    Medium,
}

/// Ranked outreach entry: investor statistics plus derived and inferred metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactProfile {
    pub investor_name: String,
    pub total_flips: usize,
    pub total_profit: Decimal,
    pub avg_profit_per_flip: Decimal,
    pub avg_hold_days: f64,
    pub avg_roi: f64,
    pub estimated_yearly_volume: Decimal,
    pub priority_score: f64,
    pub business_type: BusinessType,
    pub likely_location: String,
    #[serde(serialize_with = "join_counties")]
    pub flip_counties: BTreeSet<String>,
    pub first_flip_date: Option<NaiveDate>,
    pub last_flip_date: Option<NaiveDate>,
    pub recent_property_count: usize,
    pub likely_loan_needs: LoanNeed,
}

// Tabular exports need a flat cell
fn join_counties<S>(counties: &BTreeSet<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let joined = counties.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
    serializer.serialize_str(&joined)
}
