use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// A single search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Short label (e.g. "C106Aa")
    pub name: String,
    /// Long identifier, unique within a result set; used as the display key
    pub address: String,
}

impl SearchRecord {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Boxed future returned by a search backend
pub type SearchFuture = Pin<Box<dyn Future<Output = Result<Vec<SearchRecord>, SearchError>> + Send>>;

/// The seam to a search backend.
///
/// Implementations receive the query exactly as typed and return records in
/// display order.
pub trait SearchClient: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Run a search for `query`
    fn search(&self, query: &str) -> SearchFuture;
}

/// Inclusive bounds for the artificial latency of [`FixtureClient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    /// An inverted range collapses to `min`.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min > max {
            tracing::warn!("Delay range {:?}..{:?} is inverted, using {:?}", min, max, min);
            return Self { min, max: min };
        }
        Self { min, max }
    }

    pub fn fixed(delay: Duration) -> Self {
        Self {
            min: delay,
            max: delay,
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Pick a delay uniformly within the range
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let millis = rand::thread_rng()
            .gen_range(self.min.as_millis() as u64..=self.max.as_millis() as u64);
        Duration::from_millis(millis)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(1000),
            max: Duration::from_millis(10000),
        }
    }
}

/// Stand-in backend: answers every query with the same records after a
/// random delay. Never fails.
pub struct FixtureClient {
    records: Arc<Vec<SearchRecord>>,
    delay: DelayRange,
}

impl FixtureClient {
    pub fn new(records: Vec<SearchRecord>, delay: DelayRange) -> Self {
        Self {
            records: Arc::new(records),
            delay,
        }
    }

    /// The four built-in records
    pub fn builtin(delay: DelayRange) -> Self {
        Self::new(builtin_records(), delay)
    }

    pub fn records(&self) -> &[SearchRecord] {
        &self.records
    }
}

impl SearchClient for FixtureClient {
    fn name(&self) -> &str {
        "fixture"
    }

    fn search(&self, query: &str) -> SearchFuture {
        let delay = self.delay.sample();
        let records = Arc::clone(&self.records);
        tracing::debug!("fixture search '{}' answering in {:?}", query, delay);
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Ok(records.as_ref().clone())
        })
    }
}

pub fn builtin_records() -> Vec<SearchRecord> {
    vec![
        SearchRecord::new("06908e", "0x1234567890123456789012345678901234567890"),
        SearchRecord::new("6067c7", "0xabcdefabcdefabcdefabcdefabcdefabcdefabcdef"),
        SearchRecord::new("C106Aa", "0x9876543210987654321098765432109876543210"),
        SearchRecord::new("CFB06C", "0xdCD57c947C4BFe00B84fECFFd4d4956f85C23552"),
    ]
}

/// Read records from a JSONL file, one `{"name": .., "address": ..}` per line.
/// Blank and malformed lines are skipped.
pub fn load_records(path: &Path) -> std::io::Result<Vec<SearchRecord>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(parse_records(&contents))
}

fn parse_records(contents: &str) -> Vec<SearchRecord> {
    let mut records = Vec::new();
    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<SearchRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::debug!("Failed to parse record line: {}", e);
            }
        }
    }
    records
}

/// Run one search on behalf of the controller, tagging the outcome with its
/// generation. A `timeout` of `None` waits indefinitely.
pub async fn dispatch(
    client: Arc<dyn SearchClient>,
    generation: u64,
    query: String,
    timeout: Option<Duration>,
) -> (u64, Result<Vec<SearchRecord>, SearchError>) {
    tracing::debug!(
        "dispatch: gen={}, client={}, query='{}'",
        generation,
        client.name(),
        query
    );
    let search = client.search(&query);
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, search).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("Search for '{}' timed out after {:?}", query, limit);
                Err(SearchError::Timeout(limit))
            }
        },
        None => search.await,
    };
    (generation, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unreachable;

    impl SearchClient for Unreachable {
        fn name(&self) -> &str {
            "unreachable"
        }

        fn search(&self, _query: &str) -> SearchFuture {
            Box::pin(async { Err(SearchError::Network("connection refused".to_string())) })
        }
    }

    #[test]
    fn builtin_records_have_unique_addresses() {
        let records = builtin_records();
        assert_eq!(records.len(), 4);
        let mut addresses: Vec<_> = records.iter().map(|r| &r.address).collect();
        addresses.sort();
        addresses.dedup();
        assert_eq!(addresses.len(), 4);
    }

    #[test]
    fn delay_range_samples_within_bounds() {
        let range = DelayRange::new(Duration::from_millis(1000), Duration::from_millis(10000));
        for _ in 0..100 {
            let delay = range.sample();
            assert!(delay >= range.min() && delay <= range.max(), "{delay:?}");
        }
    }

    #[test]
    fn inverted_delay_range_collapses_to_min() {
        let range = DelayRange::new(Duration::from_millis(900), Duration::from_millis(100));
        assert_eq!(range.max(), Duration::from_millis(900));
        assert_eq!(range.sample(), Duration::from_millis(900));
    }

    #[test]
    fn parse_records_skips_bad_lines() {
        let contents = r#"{"name": "06908e", "address": "0x12"}

not json
{"name": "C106Aa"}
{"name": "CFB06C", "address": "0xdc"}
"#;
        let records = parse_records(contents);
        assert_eq!(
            records,
            vec![
                SearchRecord::new("06908e", "0x12"),
                SearchRecord::new("CFB06C", "0xdc"),
            ]
        );
    }

    #[test]
    fn load_records_reports_missing_file() {
        let path = std::env::temp_dir().join("addrbox-no-such-records.jsonl");
        assert!(load_records(&path).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn fixture_ignores_query_and_waits_for_delay() {
        let client = FixtureClient::builtin(DelayRange::fixed(Duration::from_millis(1500)));
        let started = tokio::time::Instant::now();
        let records = client.search("anything at all").await.unwrap();
        assert_eq!(records, builtin_records());
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_tags_result_with_generation() {
        let client: Arc<dyn SearchClient> =
            Arc::new(FixtureClient::builtin(DelayRange::fixed(Duration::from_millis(10))));
        let (generation, result) = dispatch(client, 7, "c1".to_string(), None).await;
        assert_eq!(generation, 7);
        assert_eq!(result.unwrap().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_times_out_slow_backends() {
        let client: Arc<dyn SearchClient> =
            Arc::new(FixtureClient::builtin(DelayRange::fixed(Duration::from_secs(30))));
        let limit = Duration::from_secs(2);
        let (_, result) = dispatch(client, 1, "c1".to_string(), Some(limit)).await;
        assert_eq!(result, Err(SearchError::Timeout(limit)));
    }

    #[tokio::test]
    async fn dispatch_passes_backend_errors_through() {
        let client: Arc<dyn SearchClient> = Arc::new(Unreachable);
        let (_, result) = dispatch(client, 3, "c1".to_string(), None).await;
        assert!(matches!(result, Err(SearchError::Network(_))));
    }
}
