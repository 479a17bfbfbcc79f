use crate::data::{Flip, Transaction};
use crate::error::Result;
use crate::matching::strategy::{MatchStrategy, StrategyRegistry};
use crate::pipeline::sink::{EventSink, PipelineEvent, Stage, TracingSink};
use crate::utils::config::MatchingConfig;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Flip detector
///
/// Algorithm:
/// 1. Validate every transaction (fail fast on the first malformed one)
/// 2. Partition by property id so pairing cost stays within one property's history
/// 3. Sort each history by sale date (stable, so same-day sales keep input order)
/// 4. Run the strategy configured for the property's county over the history
pub struct FlipMatcher {
    criteria: MatchingConfig,
    default_strategy: Arc<dyn MatchStrategy>,
    /// Keyed by lower-cased county name
    county_strategies: HashMap<String, Arc<dyn MatchStrategy>>,
}

impl FlipMatcher {
    /// Create a matcher using the built-in strategies
    pub fn new(criteria: MatchingConfig) -> Result<Self> {
        Self::with_registry(criteria, &StrategyRegistry::with_defaults())
    }

    /// Create a matcher resolving strategy ids against `registry`
    pub fn with_registry(criteria: MatchingConfig, registry: &StrategyRegistry) -> Result<Self> {
        criteria.validate()?;

        let default_strategy = registry.resolve(&criteria.strategy)?;
        let county_strategies = criteria
            .county_strategies
            .iter()
            .map(|(county, id)| -> Result<(String, Arc<dyn MatchStrategy>)> {
                Ok((county.trim().to_lowercase(), registry.resolve(id)?))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            criteria,
            default_strategy,
            county_strategies,
        })
    }

    pub fn criteria(&self) -> &MatchingConfig {
        &self.criteria
    }

    /// Strategy applied to properties in `county`
    pub fn strategy_for(&self, county: &str) -> &dyn MatchStrategy {
        self.county_strategies
            .get(&county.trim().to_lowercase())
            .unwrap_or(&self.default_strategy)
            .as_ref()
    }

    /// Find every qualifying flip in `transactions`.
    ///
    /// Output is grouped by ascending property id and, within a property, follows
    /// the strategy's pair order, so identical input always yields identical output.
    pub fn identify_flips(
        &self,
        transactions: &[Transaction],
        sink: &dyn EventSink,
    ) -> Result<Vec<Flip>> {
        for transaction in transactions {
            transaction.validate()?;
        }

        let mut partitions: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
        for transaction in transactions {
            partitions
                .entry(transaction.property_id.as_str())
                .or_default()
                .push(transaction);
        }

        sink.emit(PipelineEvent::Partitioned {
            transactions: transactions.len(),
            properties: partitions.len(),
        });

        let mut flips = Vec::new();
        for (_, mut history) in partitions {
            if history.len() < 2 {
                continue;
            }
            history.sort_by_key(|t| t.sale_date);

            let strategy = self.strategy_for(&history[0].county);
            flips.extend(strategy.match_history(&history, &self.criteria, sink));
        }

        sink.emit(PipelineEvent::StageCompleted {
            stage: Stage::Matching,
            input: transactions.len(),
            output: flips.len(),
        });

        Ok(flips)
    }
}

/// Detect flips with the configured strategy, reporting through `tracing`
pub fn identify_flips(transactions: &[Transaction], config: &MatchingConfig) -> Result<Vec<Flip>> {
    FlipMatcher::new(config.clone())?.identify_flips(transactions, &TracingSink)
}
