use rust_decimal::Decimal;
use std::fmt;
use std::sync::Mutex;
use tracing::{debug, info, trace, warn};

/// Pipeline stage that emitted an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Matching,
    Aggregation,
    Scoring,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Matching => "matching",
            Stage::Aggregation => "aggregation",
            Stage::Scoring => "scoring",
        };
        f.write_str(name)
    }
}

/// Why a candidate buy/sell pair did not become a flip
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// ROI is undefined for a zero or negative buy price
    NonPositiveBuyPrice,
    /// Buyer on the purchase is not the seller on the resale
    DifferentParty,
    HoldOutOfRange(i64),
    ProfitOutOfRange(Decimal),
    /// Profit relative to a tiny buy price exceeds the decimal range
    RoiOverflow,
}

/// Observable things that happen while the engine runs
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Partitioned {
        transactions: usize,
        properties: usize,
    },
    FlipDetected {
        property_id: String,
        buyer: String,
        hold_days: i64,
        profit: Decimal,
    },
    PairRejected {
        property_id: String,
        reason: RejectReason,
    },
    /// An investor profile had no matching flips in the supplied collection
    InvestorWithoutFlips {
        investor_name: String,
    },
    StageCompleted {
        stage: Stage,
        input: usize,
        output: usize,
    },
}

/// Destination for engine events.
///
/// Every stage receives its sink explicitly; the engine never touches a global logger.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: PipelineEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::Partitioned { transactions, properties } => {
                debug!(transactions, properties, "Partitioned transactions by property");
            }
            PipelineEvent::FlipDetected { property_id, buyer, hold_days, profit } => {
                debug!(%property_id, %buyer, hold_days, %profit, "Flip detected");
            }
            PipelineEvent::PairRejected { property_id, reason } => {
                trace!(%property_id, ?reason, "Pair rejected");
            }
            PipelineEvent::InvestorWithoutFlips { investor_name } => {
                warn!(%investor_name, "Investor has no flips in the supplied collection");
            }
            PipelineEvent::StageCompleted { stage, input, output } => {
                info!(%stage, input, output, "Stage completed");
            }
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: PipelineEvent) {}
}

/// Keeps events in memory for inspection
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<PipelineEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&PipelineEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: PipelineEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.emit(PipelineEvent::Partitioned { transactions: 4, properties: 2 });
        sink.emit(PipelineEvent::StageCompleted { stage: Stage::Matching, input: 4, output: 1 });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], PipelineEvent::Partitioned { transactions: 4, properties: 2 });
        assert_eq!(sink.count(|e| matches!(e, PipelineEvent::StageCompleted { .. })), 1);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Aggregation.to_string(), "aggregation");
    }
}
