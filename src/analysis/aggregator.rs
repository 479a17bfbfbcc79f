use crate::data::{Flip, InvestorProfile};
use crate::pipeline::sink::{EventSink, PipelineEvent, Stage, TracingSink};
use rust_decimal::Decimal;
use statrs::statistics::Statistics;
use std::collections::HashMap;

/// Groups flips by buyer and summarises each investor's track record
#[derive(Debug, Clone, Copy, Default)]
pub struct InvestorAggregator;

impl InvestorAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Build one profile per buyer.
    ///
    /// Sorted by flip count, then total profit (both descending), then name.
    pub fn aggregate(&self, flips: &[Flip], sink: &dyn EventSink) -> Vec<InvestorProfile> {
        let mut groups: HashMap<&str, Vec<&Flip>> = HashMap::new();
        for flip in flips {
            groups.entry(flip.buyer.as_str()).or_default().push(flip);
        }

        let mut profiles: Vec<InvestorProfile> = groups
            .into_iter()
            .map(|(investor, group)| Self::profile(investor, &group))
            .collect();

        profiles.sort_by(|a, b| {
            b.total_flips
                .cmp(&a.total_flips)
                .then_with(|| b.total_profit.cmp(&a.total_profit))
                .then_with(|| a.investor_name.cmp(&b.investor_name))
        });

        sink.emit(PipelineEvent::StageCompleted {
            stage: Stage::Aggregation,
            input: flips.len(),
            output: profiles.len(),
        });

        profiles
    }

    /// `group` is never empty
    fn profile(investor: &str, group: &[&Flip]) -> InvestorProfile {
        let total_flips = group.len();
        let total_profit: Decimal = group.iter().map(|f| f.profit).sum();

        let hold_days: Vec<f64> = group.iter().map(|f| f.hold_days as f64).collect();
        let rois: Vec<f64> = group.iter().map(|f| f.roi).collect();

        InvestorProfile {
            investor_name: investor.to_string(),
            total_flips,
            total_profit,
            avg_profit_per_flip: total_profit / Decimal::from(total_flips),
            avg_hold_days: hold_days.iter().mean(),
            avg_roi: rois.iter().mean(),
        }
    }
}

/// Aggregate flips per investor, reporting through `tracing`
pub fn aggregate(flips: &[Flip]) -> Vec<InvestorProfile> {
    InvestorAggregator::new().aggregate(flips, &TracingSink)
}
