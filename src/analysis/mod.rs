pub mod aggregator;
pub mod summary;

pub use aggregator::{aggregate, InvestorAggregator};
pub use summary::{CountyStats, DashboardSnapshot, RunSummary};
