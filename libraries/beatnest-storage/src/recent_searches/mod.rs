//! Recent search queries

use serde::{Deserialize, Serialize};

/// Most recent searches kept
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Recent queries, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentSearches {
    queries: Vec<String>,
}

impl RecentSearches {
    /// Queries, most recent first
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    /// Most recent query
    pub fn latest(&self) -> Option<&str> {
        self.queries.first().map(String::as_str)
    }

    /// Record a query
    ///
    /// A query already in the list keeps its position. Blank queries are
    /// ignored. Returns `true` if the list changed.
    pub fn record(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() || self.queries.iter().any(|q| q == query) {
            return false;
        }

        self.queries.insert(0, query.to_string());
        self.queries.truncate(MAX_RECENT_SEARCHES);
        true
    }

    /// Forget a query; returns `true` if it was present
    pub fn forget(&mut self, query: &str) -> bool {
        let before = self.queries.len();
        self.queries.retain(|q| q != query);
        self.queries.len() != before
    }
}
