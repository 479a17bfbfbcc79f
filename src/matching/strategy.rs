use crate::data::{Flip, Transaction};
use crate::error::{FlipError, Result};
use crate::pipeline::sink::{EventSink, PipelineEvent, RejectReason};
use crate::utils::config::MatchingConfig;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Pairing policy applied to one property's sale history.
///
/// `history` is sorted ascending by sale date and holds at least two sales.
pub trait MatchStrategy: Send + Sync {
    /// Identifier used to select this strategy from configuration
    fn id(&self) -> &'static str;

    fn match_history(
        &self,
        history: &[&Transaction],
        criteria: &MatchingConfig,
        sink: &dyn EventSink,
    ) -> Vec<Flip>;
}

/// Every ordered (earlier, later) pair. A purchase may back several flips.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPairs;

impl MatchStrategy for AllPairs {
    fn id(&self) -> &'static str {
        "all_pairs"
    }

    fn match_history(
        &self,
        history: &[&Transaction],
        criteria: &MatchingConfig,
        sink: &dyn EventSink,
    ) -> Vec<Flip> {
        let mut flips = Vec::new();
        for (i, buy) in history.iter().enumerate() {
            for sell in &history[i + 1..] {
                if let Some(flip) = try_pair(buy, sell, criteria, sink) {
                    flips.push(flip);
                }
            }
        }
        flips
    }
}

/// Each purchase pairs with its earliest qualifying resale only
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstQualifying;

impl MatchStrategy for FirstQualifying {
    fn id(&self) -> &'static str {
        "first_qualifying"
    }

    fn match_history(
        &self,
        history: &[&Transaction],
        criteria: &MatchingConfig,
        sink: &dyn EventSink,
    ) -> Vec<Flip> {
        history
            .iter()
            .enumerate()
            .filter_map(|(i, buy)| {
                history[i + 1..]
                    .iter()
                    .find_map(|sell| try_pair(buy, sell, criteria, sink))
            })
            .collect()
    }
}

/// Consecutive sales only
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjacentPairs;

impl MatchStrategy for AdjacentPairs {
    fn id(&self) -> &'static str {
        "adjacent_pairs"
    }

    fn match_history(
        &self,
        history: &[&Transaction],
        criteria: &MatchingConfig,
        sink: &dyn EventSink,
    ) -> Vec<Flip> {
        history
            .windows(2)
            .filter_map(|pair| try_pair(pair[0], pair[1], criteria, sink))
            .collect()
    }
}

fn try_pair(
    buy: &Transaction,
    sell: &Transaction,
    criteria: &MatchingConfig,
    sink: &dyn EventSink,
) -> Option<Flip> {
    match evaluate_pair(buy, sell, criteria) {
        Ok(flip) => {
            sink.emit(PipelineEvent::FlipDetected {
                property_id: flip.property_id.clone(),
                buyer: flip.buyer.clone(),
                hold_days: flip.hold_days,
                profit: flip.profit,
            });
            Some(flip)
        }
        Err(reason) => {
            sink.emit(PipelineEvent::PairRejected {
                property_id: buy.property_id.clone(),
                reason,
            });
            None
        }
    }
}

/// Test a purchase/resale pair against the flip criteria
pub fn evaluate_pair(
    buy: &Transaction,
    sell: &Transaction,
    criteria: &MatchingConfig,
) -> std::result::Result<Flip, RejectReason> {
    if buy.sale_price <= Decimal::ZERO {
        return Err(RejectReason::NonPositiveBuyPrice);
    }

    if criteria.require_same_party && !same_party(&buy.buyer, &sell.seller) {
        return Err(RejectReason::DifferentParty);
    }

    let hold_days = (sell.sale_date - buy.sale_date).num_days();
    if !criteria.hold_in_range(hold_days) {
        return Err(RejectReason::HoldOutOfRange(hold_days));
    }

    let profit = sell.sale_price - buy.sale_price;
    if !criteria.profit_in_range(profit) {
        return Err(RejectReason::ProfitOutOfRange(profit));
    }

    let roi = profit
        .checked_div(buy.sale_price)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(RejectReason::RoiOverflow)?
        .to_f64()
        .unwrap_or_default();

    Ok(Flip {
        property_id: buy.property_id.clone(),
        address: buy.address.clone(),
        buy_date: buy.sale_date,
        buy_price: buy.sale_price,
        buyer: buy.buyer.clone(),
        sell_date: sell.sale_date,
        sell_price: sell.sale_price,
        seller: sell.seller.clone(),
        hold_days,
        profit,
        roi,
        county: buy.county.clone(),
    })
}

fn same_party(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Strategies addressable by configuration id
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: BTreeMap<&'static str, Arc<dyn MatchStrategy>>,
}

impl StrategyRegistry {
    pub fn empty() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// Registry holding the built-in strategies
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(AllPairs));
        registry.register(Arc::new(FirstQualifying));
        registry.register(Arc::new(AdjacentPairs));
        registry
    }

    /// Add a strategy, replacing any with the same id
    pub fn register(&mut self, strategy: Arc<dyn MatchStrategy>) {
        self.strategies.insert(strategy.id(), strategy);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn MatchStrategy>> {
        self.strategies.get(id.trim()).cloned()
    }

    /// Look up a strategy, failing with the list of known ids
    pub fn resolve(&self, id: &str) -> Result<Arc<dyn MatchStrategy>> {
        self.get(id).ok_or_else(|| {
            FlipError::Config(format!(
                "unknown matching strategy {:?} (known: {})",
                id,
                self.ids().join(", ")
            ))
        })
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.strategies.keys().copied().collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
