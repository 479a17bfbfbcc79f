use crate::analysis::{DashboardSnapshot, InvestorAggregator, RunSummary};
use crate::data::{ContactProfile, Flip, InvestorProfile, TransactionSet};
use crate::error::Result;
use crate::matching::{FlipMatcher, StrategyRegistry};
use crate::outreach::OutreachScorer;
use crate::pipeline::sink::EventSink;
use crate::utils::config::{Config, ReportConfig};
use serde::Serialize;

/// Everything one run produces
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub flips: Vec<Flip>,
    pub investors: Vec<InvestorProfile>,
    pub contacts: Vec<ContactProfile>,
    pub summary: RunSummary,
}

impl PipelineOutput {
    pub fn dashboard(&self, report: &ReportConfig) -> DashboardSnapshot {
        DashboardSnapshot::new(self.summary.clone(), &self.flips, &self.investors, report)
    }
}

/// Matching -> aggregation -> scoring over one combined transaction set.
///
/// Holds only configuration, so one pipeline can serve concurrent runs.
pub struct FlipPipeline {
    matcher: FlipMatcher,
    aggregator: InvestorAggregator,
    scorer: OutreachScorer,
}

impl FlipPipeline {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_registry(config, &StrategyRegistry::with_defaults())
    }

    pub fn with_registry(config: &Config, registry: &StrategyRegistry) -> Result<Self> {
        Ok(Self {
            matcher: FlipMatcher::with_registry(config.matching.clone(), registry)?,
            aggregator: InvestorAggregator::new(),
            scorer: OutreachScorer::new(config.outreach.clone()),
        })
    }

    pub fn matcher(&self) -> &FlipMatcher {
        &self.matcher
    }

    pub fn run(&self, transactions: &TransactionSet, sink: &dyn EventSink) -> Result<PipelineOutput> {
        let flips = self.matcher.identify_flips(transactions.transactions(), sink)?;
        let investors = self.aggregator.aggregate(&flips, sink);
        let contacts = self.scorer.rank(&investors, &flips, sink);
        let summary = RunSummary::from_results(&flips, &investors);

        Ok(PipelineOutput {
            flips,
            investors,
            contacts,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RawTransaction;
    use crate::pipeline::sink::{PipelineEvent, RecordingSink, Stage};

    fn raw(property_id: &str, date: &str, price: &str, buyer: &str, seller: &str) -> RawTransaction {
        RawTransaction {
            property_id: Some(property_id.to_string()),
            address: Some(format!("{} Ponce de Leon Ave, Atlanta, GA 30308", property_id)),
            sale_date: Some(date.to_string()),
            sale_price: Some(price.to_string()),
            buyer: Some(buyer.to_string()),
            seller: Some(seller.to_string()),
            county: Some("Fulton".to_string()),
        }
    }

    #[test]
    fn test_end_to_end_run() {
        let set = TransactionSet::from_raw(vec![
            raw("P1", "2023-01-01", "300000", "Acme LLC", "Owner 1"),
            raw("P1", "2023-05-01", "400000", "Buyer 1", "Acme LLC"),
            raw("P2", "2023-02-01", "150000", "Acme LLC", "Owner 2"),
            raw("P2", "2023-07-01", "230000", "Buyer 2", "Acme LLC"),
            raw("P3", "2023-03-01", "500000", "Jane Doe", "Owner 3"),
            raw("P3", "2023-12-01", "590000", "Buyer 3", "Jane Doe"),
            raw("P4", "2023-03-01", "500000", "Nobody", "Owner 4"),
        ])
        .unwrap();

        let sink = RecordingSink::new();
        let output = FlipPipeline::new(&Config::default()).unwrap().run(&set, &sink).unwrap();

        assert_eq!(output.flips.len(), 3);
        assert_eq!(output.investors.len(), 2);
        assert_eq!(output.investors[0].investor_name, "Acme LLC");
        assert_eq!(output.contacts[0].investor_name, "Acme LLC");
        assert_eq!(output.contacts[0].likely_location, "Atlanta");
        assert_eq!(output.summary.total_flips_identified, 3);
        assert_eq!(output.summary.by_county["Fulton"].flips, 3);

        let stages: Vec<Stage> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                PipelineEvent::StageCompleted { stage, .. } => Some(stage),
                _ => None,
            })
            .collect();
        assert_eq!(stages, vec![Stage::Matching, Stage::Aggregation, Stage::Scoring]);

        let snapshot = output.dashboard(&ReportConfig { recent_flips: 1, top_investors: 1 });
        assert_eq!(snapshot.recent_flips.len(), 1);
        assert_eq!(snapshot.top_investors.len(), 1);
    }

    #[test]
    fn test_empty_run() {
        let output = FlipPipeline::new(&Config::default())
            .unwrap()
            .run(&TransactionSet::default(), &RecordingSink::new())
            .unwrap();
        assert!(output.flips.is_empty());
        assert!(output.investors.is_empty());
        assert!(output.contacts.is_empty());
        assert_eq!(output.summary.total_investors, 0);
    }
}
