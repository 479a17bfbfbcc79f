use crate::data::{ContactProfile, Flip, InvestorProfile, LoanNeed};
use crate::outreach::inference::{infer_business_type, infer_location};
use crate::pipeline::sink::{EventSink, PipelineEvent, Stage, TracingSink};
use crate::utils::config::OutreachConfig;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};

/// Priority score weights
pub const FLIP_COUNT_WEIGHT: f64 = 0.4;
pub const PROFIT_WEIGHT: f64 = 0.3;
pub const VOLUME_WEIGHT: f64 = 0.3;

/// Annualised profit run-rate: `total_profit * 12 / avg_hold_days`, zero without a positive hold period
pub fn estimated_yearly_volume(total_profit: Decimal, avg_hold_days: f64) -> Decimal {
    if avg_hold_days.is_nan() || avg_hold_days <= 0.0 {
        return Decimal::ZERO;
    }

    Decimal::from_f64(avg_hold_days)
        .and_then(|hold| (total_profit * Decimal::from(12)).checked_div(hold))
        .unwrap_or(Decimal::ZERO)
}

/// Weighted composite used to order outreach targets
pub fn priority_score(total_flips: usize, total_profit: Decimal, yearly_volume: Decimal) -> f64 {
    total_flips as f64 * FLIP_COUNT_WEIGHT
        + total_profit.to_f64().unwrap_or(0.0) * PROFIT_WEIGHT
        + yearly_volume.to_f64().unwrap_or(0.0) * VOLUME_WEIGHT
}

/// Turns investor statistics into a ranked contact list
#[derive(Debug, Clone, Default)]
pub struct OutreachScorer {
    config: OutreachConfig,
}

impl OutreachScorer {
    pub fn new(config: OutreachConfig) -> Self {
        Self { config }
    }

    /// Enrich and rank investors.
    ///
    /// Sorted by priority score descending, ties by investor name.
    pub fn rank(
        &self,
        investors: &[InvestorProfile],
        flips: &[Flip],
        sink: &dyn EventSink,
    ) -> Vec<ContactProfile> {
        let mut by_buyer: HashMap<&str, Vec<&Flip>> = HashMap::new();
        for flip in flips {
            by_buyer.entry(flip.buyer.as_str()).or_default().push(flip);
        }

        let mut contacts: Vec<ContactProfile> = investors
            .iter()
            .map(|investor| {
                let own = by_buyer
                    .get(investor.investor_name.as_str())
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                if own.is_empty() {
                    sink.emit(PipelineEvent::InvestorWithoutFlips {
                        investor_name: investor.investor_name.clone(),
                    });
                }
                self.contact(investor, own)
            })
            .collect();

        contacts.sort_by(|a, b| {
            b.priority_score
                .total_cmp(&a.priority_score)
                .then_with(|| a.investor_name.cmp(&b.investor_name))
        });

        sink.emit(PipelineEvent::StageCompleted {
            stage: Stage::Scoring,
            input: investors.len(),
            output: contacts.len(),
        });

        contacts
    }

    fn contact(&self, investor: &InvestorProfile, flips: &[&Flip]) -> ContactProfile {
        let estimated_yearly_volume =
            estimated_yearly_volume(investor.total_profit, investor.avg_hold_days);

        let likely_loan_needs = if investor.total_flips >= self.config.high_need_min_flips {
            LoanNeed::High
        } else {
            LoanNeed::Medium
        };

        ContactProfile {
            investor_name: investor.investor_name.clone(),
            total_flips: investor.total_flips,
            total_profit: investor.total_profit,
            avg_profit_per_flip: investor.avg_profit_per_flip,
            avg_hold_days: investor.avg_hold_days,
            avg_roi: investor.avg_roi,
            estimated_yearly_volume,
            priority_score: priority_score(
                investor.total_flips,
                investor.total_profit,
                estimated_yearly_volume,
            ),
            business_type: infer_business_type(&investor.investor_name),
            likely_location: infer_location(flips.iter().map(|f| f.address.as_str())),
            flip_counties: flips.iter().map(|f| f.county.clone()).collect::<BTreeSet<_>>(),
            first_flip_date: flips.iter().map(|f| f.buy_date).min(),
            last_flip_date: flips.iter().map(|f| f.sell_date).max(),
            recent_property_count: flips.len(),
            likely_loan_needs,
        }
    }
}

/// Rank investors with default outreach settings, reporting through `tracing`
pub fn rank(investors: &[InvestorProfile], flips: &[Flip]) -> Vec<ContactProfile> {
    OutreachScorer::default().rank(investors, flips, &TracingSink)
}
