pub mod csv_source;
pub mod synthetic;

pub use csv_source::{read_transactions, CsvSource};
pub use synthetic::{generate_sales, SyntheticConfig};

use crate::data::TransactionSet;
use anyhow::{anyhow, Result};
use tracing::{info, warn};

/// Producer of sale records for one batch (a county export, a file, an API window)
pub trait TransactionSource: Send + Sync {
    fn name(&self) -> &str;

    fn load(&self) -> Result<TransactionSet>;
}

/// Result of loading several sources
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Combined records from every source that loaded
    pub transactions: TransactionSet,
    pub loaded: Vec<String>,
    /// (source name, error) for sources that failed
    pub failures: Vec<(String, String)>,
}

/// Sources loaded at the same time by [`load_all`]
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Load all sources in parallel and merge the successful ones in source order.
///
/// A failing source is logged and skipped; the call only fails when nothing loaded.
pub fn load_all(sources: &[Box<dyn TransactionSource>]) -> Result<LoadOutcome> {
    load_all_with(sources, DEFAULT_MAX_WORKERS)
}

/// [`load_all`] with at most `max_workers` sources loading at once (minimum 1)
pub fn load_all_with(
    sources: &[Box<dyn TransactionSource>],
    max_workers: usize,
) -> Result<LoadOutcome> {
    let mut results = Vec::with_capacity(sources.len());
    for batch in sources.chunks(max_workers.max(1)) {
        let loaded = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|source| scope.spawn(move |_| (source.name().to_string(), source.load())))
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        })
        .map_err(|_| anyhow!("Source loader thread panicked"))?;
        results.extend(loaded);
    }

    let mut outcome = LoadOutcome::default();
    for result in results {
        let (name, loaded) = result.map_err(|_| anyhow!("Source loader thread panicked"))?;
        match loaded {
            Ok(set) => {
                info!(source = %name, records = set.len(), "Loaded source");
                outcome.transactions.merge(set);
                outcome.loaded.push(name);
            }
            Err(e) => {
                let message = format!("{:#}", e);
                warn!(source = %name, error = %message, "Skipping source that failed to load");
                outcome.failures.push((name, message));
            }
        }
    }

    if outcome.loaded.is_empty() && !sources.is_empty() {
        return Err(anyhow!(
            "No source loaded successfully ({} failed)",
            outcome.failures.len()
        ));
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Transaction;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct FixedSource {
        name: String,
        county: Option<String>,
    }

    impl TransactionSource for FixedSource {
        fn name(&self) -> &str {
            &self.name
        }

        fn load(&self) -> Result<TransactionSet> {
            let county = self
                .county
                .clone()
                .ok_or_else(|| anyhow!("portal unavailable"))?;
            Ok(TransactionSet::new(vec![Transaction {
                property_id: format!("{}-1", county),
                address: String::new(),
                sale_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                sale_price: dec!(100000),
                buyer: "A".to_string(),
                seller: "B".to_string(),
                county,
            }])?)
        }
    }

    fn source(name: &str, county: Option<&str>) -> Box<dyn TransactionSource> {
        Box::new(FixedSource {
            name: name.to_string(),
            county: county.map(str::to_string),
        })
    }

    #[test]
    fn test_partial_failure_keeps_successful_sources() {
        let sources = vec![
            source("fulton", Some("Fulton")),
            source("dekalb", None),
            source("cobb", Some("Cobb")),
        ];
        let outcome = load_all(&sources).unwrap();

        assert_eq!(outcome.transactions.len(), 2);
        assert_eq!(outcome.loaded, vec!["fulton", "cobb"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, "dekalb");
        assert!(outcome.failures[0].1.contains("portal unavailable"));
        // Source order is preserved
        assert_eq!(outcome.transactions.transactions()[0].county, "Fulton");
    }

    #[test]
    fn test_all_sources_failing_is_an_error() {
        let sources = vec![source("dekalb", None)];
        assert!(load_all(&sources).is_err());
    }

    struct SlowSource {
        name: String,
        running: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl TransactionSource for SlowSource {
        fn name(&self) -> &str {
            &self.name
        }

        fn load(&self) -> Result<TransactionSet> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            self.running.fetch_sub(1, Ordering::SeqCst);
            Ok(TransactionSet::default())
        }
    }

    #[test]
    fn test_worker_limit_bounds_concurrent_loads() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let sources: Vec<Box<dyn TransactionSource>> = (0..6)
            .map(|i| {
                Box::new(SlowSource {
                    name: format!("county-{}", i),
                    running: Arc::clone(&running),
                    peak: Arc::clone(&peak),
                }) as Box<dyn TransactionSource>
            })
            .collect();

        let outcome = load_all_with(&sources, 2).unwrap();

        assert_eq!(outcome.loaded.len(), 6);
        assert_eq!(outcome.loaded[5], "county-5");
        assert!(peak.load(Ordering::SeqCst) <= 2);

        // Zero is treated as one worker
        peak.store(0, Ordering::SeqCst);
        load_all_with(&sources, 0).unwrap();
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_sources_is_empty() {
        let outcome = load_all(&[]).unwrap();
        assert!(outcome.transactions.is_empty());
    }
}
