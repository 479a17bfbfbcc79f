pub mod config;
pub mod logger;

pub use config::{Config, LoggingConfig, MatchingConfig, OutreachConfig, ReportConfig};
pub use logger::{init_logger, init_from_config};
