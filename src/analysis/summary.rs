use crate::data::{Flip, InvestorProfile};
use crate::utils::config::ReportConfig;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Flip totals for one county
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyStats {
    pub flips: usize,
    pub total_profit: Decimal,
    pub avg_roi: f64,
}

impl CountyStats {
    /// `group` is never empty
    fn from_flips(group: &[&Flip]) -> Self {
        Self {
            flips: group.len(),
            total_profit: group.iter().map(|f| f.profit).sum(),
            avg_roi: group.iter().map(|f| f.roi).collect::<Vec<f64>>().mean(),
        }
    }
}

/// Headline numbers for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_flips_identified: usize,
    pub total_investors: usize,
    pub total_profit: Decimal,
    pub avg_hold_days: f64,
    pub avg_roi: f64,
    pub by_county: BTreeMap<String, CountyStats>,
    pub generated_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn from_results(flips: &[Flip], investors: &[InvestorProfile]) -> Self {
        let mut groups: BTreeMap<&str, Vec<&Flip>> = BTreeMap::new();
        for flip in flips {
            groups.entry(flip.county.as_str()).or_default().push(flip);
        }
        let by_county = groups
            .into_iter()
            .map(|(county, group)| (county.to_string(), CountyStats::from_flips(&group)))
            .collect();

        let (avg_hold_days, avg_roi) = if flips.is_empty() {
            (0.0, 0.0)
        } else {
            let hold_days: Vec<f64> = flips.iter().map(|f| f.hold_days as f64).collect();
            let rois: Vec<f64> = flips.iter().map(|f| f.roi).collect();
            (hold_days.iter().mean(), rois.iter().mean())
        };

        Self {
            total_flips_identified: flips.len(),
            total_investors: investors.len(),
            total_profit: flips.iter().map(|f| f.profit).sum(),
            avg_hold_days,
            avg_roi,
            by_county,
            generated_at: Utc::now(),
        }
    }

    /// Print results summary
    pub fn print_summary(&self) {
        println!("\n╔════════════════════════════════════════════════╗");
        println!("║         FLIP DETECTION SUMMARY                 ║");
        println!("╠════════════════════════════════════════════════╣");
        println!("║ Flips Found: {:<35} ║", self.total_flips_identified);
        println!("║ Investors: {:<37} ║", self.total_investors);
        println!("║ Total Profit: ${:<32} ║", self.total_profit.round_dp(2));
        println!("║ Average ROI: {:<34.1}% ║", self.avg_roi);
        println!("║ Average Hold Days: {:<29.0} ║", self.avg_hold_days);
        println!("╠════════════════════════════════════════════════╣");
        if self.by_county.is_empty() {
            println!("║ No flips in any county                         ║");
        }
        for (county, stats) in &self.by_county {
            println!("║ {:<30} {:>15} ║", county, stats.flips);
        }
        println!("╚════════════════════════════════════════════════╝\n");
    }
}

/// Summary plus the head of the flip and investor tables, as consumed by dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub summary: RunSummary,
    pub recent_flips: Vec<Flip>,
    pub top_investors: Vec<InvestorProfile>,
}

impl DashboardSnapshot {
    pub fn new(
        summary: RunSummary,
        flips: &[Flip],
        investors: &[InvestorProfile],
        report: &ReportConfig,
    ) -> Self {
        Self {
            summary,
            recent_flips: flips.iter().take(report.recent_flips).cloned().collect(),
            top_investors: investors.iter().take(report.top_investors).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn flip(county: &str, profit: Decimal, hold_days: i64, roi: f64) -> Flip {
        let buy_date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        Flip {
            property_id: format!("{}-{}", county, hold_days),
            address: String::new(),
            buy_date,
            buy_price: dec!(250000),
            buyer: "Acme LLC".to_string(),
            sell_date: buy_date + chrono::Duration::days(hold_days),
            sell_price: dec!(250000) + profit,
            seller: "Acme LLC".to_string(),
            hold_days,
            profit,
            roi,
            county: county.to_string(),
        }
    }

    #[test]
    fn test_summary_statistics() {
        let flips = vec![
            flip("Fulton", dec!(80000), 100, 32.0),
            flip("Fulton", dec!(100000), 200, 40.0),
            flip("Cobb", dec!(75000), 60, 30.0),
        ];
        let summary = RunSummary::from_results(&flips, &[]);

        assert_eq!(summary.total_flips_identified, 3);
        assert_eq!(summary.total_profit, dec!(255000));
        assert!((summary.avg_hold_days - 120.0).abs() < 1e-9);
        assert!((summary.avg_roi - 34.0).abs() < 1e-9);
        let fulton = &summary.by_county["Fulton"];
        assert_eq!(fulton.flips, 2);
        assert_eq!(fulton.total_profit, dec!(180000));
        assert!((fulton.avg_roi - 36.0).abs() < 1e-9);
        let cobb = &summary.by_county["Cobb"];
        assert_eq!(cobb.flips, 1);
        assert_eq!(cobb.total_profit, dec!(75000));
        assert!((cobb.avg_roi - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_run_summary() {
        let summary = RunSummary::from_results(&[], &[]);
        assert_eq!(summary.total_flips_identified, 0);
        assert_eq!(summary.total_profit, Decimal::ZERO);
        assert_eq!(summary.avg_roi, 0.0);
        assert!(summary.by_county.is_empty());
    }

    #[test]
    fn test_snapshot_truncates_tables() {
        let flips: Vec<Flip> = (0..5).map(|i| flip("Fulton", dec!(80000), 40 + i, 32.0)).collect();
        let report = ReportConfig { recent_flips: 2, top_investors: 1 };
        let snapshot = DashboardSnapshot::new(RunSummary::from_results(&flips, &[]), &flips, &[], &report);

        assert_eq!(snapshot.recent_flips.len(), 2);
        assert_eq!(snapshot.recent_flips[0].hold_days, 40);
        assert!(snapshot.top_investors.is_empty());
    }
}
