//! Search box state machine.
//!
//! The controller owns the query, the current result set and the search
//! status. It never touches a clock or a backend itself: every transition
//! returns what the host has to do next (arm a debounce timer, start a
//! search), and the host reports back when that happened. Debounce timers
//! and searches are tagged so that only the most recent one is honoured.

use std::collections::HashSet;

use crate::error::SearchError;
use crate::search::SearchRecord;

/// Whether a search is currently considered in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Searching,
}

/// A search the host must start. Its outcome is reported back with the
/// same `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub query: String,
}

#[derive(Debug)]
pub struct Controller {
    query: String,
    results: Vec<SearchRecord>,
    status: SearchStatus,
    /// User-visible message from the last failed search
    notice: Option<String>,
    /// Ticket of the most recently armed debounce timer
    debounce_ticket: u64,
    /// Generation of the most recently issued search
    generation: u64,
    mounted: bool,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            status: SearchStatus::Idle,
            notice: None,
            debounce_ticket: 0,
            generation: 0,
            mounted: true,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchRecord] {
        &self.results
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Record a text-input event. Returns the ticket of the debounce timer
    /// the host must (re)arm, or `None` once torn down.
    pub fn input(&mut self, text: impl Into<String>) -> Option<u64> {
        if !self.mounted {
            tracing::debug!("input after teardown ignored");
            return None;
        }
        self.query = text.into();
        self.debounce_ticket += 1;
        tracing::debug!("input: query='{}', ticket={}", self.query, self.debounce_ticket);
        Some(self.debounce_ticket)
    }

    /// The debounce timer with `ticket` fired. Stale tickets are ignored.
    ///
    /// An empty query clears the results on the spot and returns `None`;
    /// anything else switches to `Searching` and returns the search to start.
    pub fn debounce_elapsed(&mut self, ticket: u64) -> Option<SearchRequest> {
        if !self.mounted || ticket != self.debounce_ticket {
            tracing::debug!(
                "debounce: stale ticket {} (current {})",
                ticket,
                self.debounce_ticket
            );
            return None;
        }

        // Supersedes whatever is still in flight.
        self.generation += 1;
        self.notice = None;

        if self.query.is_empty() {
            self.results.clear();
            self.status = SearchStatus::Idle;
            return None;
        }

        self.status = SearchStatus::Searching;
        Some(SearchRequest {
            generation: self.generation,
            query: self.query.clone(),
        })
    }

    /// A search finished. Returns whether its outcome was applied; results of
    /// superseded searches, or of any search after teardown, are dropped.
    pub fn search_finished(
        &mut self,
        generation: u64,
        outcome: Result<Vec<SearchRecord>, SearchError>,
    ) -> bool {
        if !self.mounted {
            tracing::debug!("search gen={} finished after teardown, dropped", generation);
            return false;
        }
        if generation != self.generation {
            tracing::debug!(
                "search gen={} superseded by gen={}, dropped",
                generation,
                self.generation
            );
            return false;
        }

        match outcome {
            Ok(records) => {
                self.results = dedup_by_address(records);
                self.notice = None;
            }
            Err(e) => {
                tracing::warn!("Search for '{}' failed: {}", self.query, e);
                self.results.clear();
                self.notice = Some(e.to_string());
            }
        }
        self.status = SearchStatus::Idle;
        true
    }

    /// Tear the widget down. Later timer firings and search outcomes are ignored.
    pub fn teardown(&mut self) {
        if self.mounted {
            tracing::debug!("teardown: ticket={}, gen={}", self.debounce_ticket, self.generation);
        }
        self.mounted = false;
    }
}

/// Keep the first record for each address so the display key stays unique.
fn dedup_by_address(records: Vec<SearchRecord>) -> Vec<SearchRecord> {
    let mut seen = HashSet::new();
    let total = records.len();
    let unique: Vec<SearchRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.address.clone()))
        .collect();
    if unique.len() != total {
        tracing::warn!(
            "Backend returned {} records with duplicate addresses; dropped",
            total - unique.len()
        );
    }
    unique
}
