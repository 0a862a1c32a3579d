//! Session-owned documents
//!
//! The session keeps history, the duration ledger, the user level and the
//! recommendation cache in memory and marks them dirty when they change. The
//! service writes dirty documents back through the `DocumentStore`.

use crate::history::ListeningHistory;
use crate::ledger::DurationLedger;
use crate::level::UserLevel;
use crate::recommend::RecommendationCache;
use beatnest_core::documents::{load_or_default, save_as};
use beatnest_core::{DocumentName, DocumentStore, PersistenceError};
use serde::de::DeserializeOwned;
use tracing::warn;

/// Documents owned by the playback session
pub const SESSION_DOCUMENTS: [DocumentName; 4] = [
    DocumentName::History,
    DocumentName::DurationLedger,
    DocumentName::UserLevel,
    DocumentName::Recommendations,
];

/// Persisted session state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionDocuments {
    pub history: ListeningHistory,
    pub ledger: DurationLedger,
    pub level: UserLevel,
    pub recommendations: RecommendationCache,
}

impl SessionDocuments {
    /// Load every session document
    ///
    /// A missing or malformed document starts empty; the others still load.
    pub async fn load(store: &dyn DocumentStore) -> Self {
        Self {
            history: load_logged(store, DocumentName::History).await,
            ledger: load_logged(store, DocumentName::DurationLedger).await,
            level: load_logged(store, DocumentName::UserLevel).await,
            recommendations: load_logged(store, DocumentName::Recommendations).await,
        }
    }

    /// Save every session document, returning the failures
    pub async fn save(&self, store: &dyn DocumentStore) -> Vec<PersistenceError> {
        let results = [
            save_as(store, DocumentName::History, &self.history).await,
            save_as(store, DocumentName::DurationLedger, &self.ledger).await,
            save_as(store, DocumentName::UserLevel, &self.level).await,
            save_as(store, DocumentName::Recommendations, &self.recommendations).await,
        ];
        results.into_iter().filter_map(Result::err).collect()
    }
}

async fn load_logged<T>(store: &dyn DocumentStore, name: DocumentName) -> T
where
    T: DeserializeOwned + Default,
{
    match load_or_default(store, name).await {
        Ok(value) => value,
        Err(e) => {
            warn!(document = %name, error = %e, "Failed to load document, starting empty");
            T::default()
        }
    }
}

/// Write already-serialized documents, returning the failures
pub async fn save_batch(
    store: &dyn DocumentStore,
    batch: Vec<Result<(DocumentName, serde_json::Value), PersistenceError>>,
) -> Vec<PersistenceError> {
    let mut failures = Vec::new();
    for entry in batch {
        let outcome = match entry {
            Ok((name, value)) => store.save(name, value).await,
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            warn!(document = %e.document(), error = %e, "Failed to save document");
            failures.push(e);
        }
    }
    failures
}
