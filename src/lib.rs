pub mod data;
pub mod error;
pub mod matching;
pub mod analysis;
pub mod outreach;
pub mod pipeline;
pub mod ingest;
pub mod export;
pub mod utils;


// Re-export commonly used types
pub use data::{
    BusinessType, ContactProfile, Flip, InvestorProfile, LoanNeed, RawTransaction, Transaction,
    TransactionSet,
};
pub use error::{FlipError, Result};
pub use matching::{identify_flips, FlipMatcher, MatchStrategy, StrategyRegistry};
pub use analysis::{aggregate, DashboardSnapshot, InvestorAggregator, RunSummary};
pub use outreach::{rank, OutreachScorer};
pub use pipeline::{EventSink, FlipPipeline, PipelineEvent, PipelineOutput, TracingSink};
pub use ingest::{load_all, CsvSource, TransactionSource};
pub use export::{Exporter, FileExporter};
pub use utils::Config;
