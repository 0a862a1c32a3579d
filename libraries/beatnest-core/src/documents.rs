//! Typed access to the document store
use crate::error::PersistenceError;
use crate::traits::DocumentStore;
use crate::types::DocumentName;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Load a document and deserialize it, falling back to `T::default()` when absent
pub async fn load_or_default<T>(
    store: &dyn DocumentStore,
    name: DocumentName,
) -> Result<T, PersistenceError>
where
    T: DeserializeOwned + Default,
{
    match store.load(name).await? {
        Some(value) => {
            serde_json::from_value(value).map_err(|e| PersistenceError::serialization(name, e))
        }
        None => Ok(T::default()),
    }
}

/// Serialize a value and save it under `name`
pub async fn save_as<T>(
    store: &dyn DocumentStore,
    name: DocumentName,
    value: &T,
) -> Result<(), PersistenceError>
where
    T: Serialize + ?Sized + Sync,
{
    let json = serde_json::to_value(value).map_err(|e| PersistenceError::serialization(name, e))?;
    store.save(name, json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore {
        docs: Mutex<HashMap<DocumentName, serde_json::Value>>,
    }

    #[async_trait]
    impl DocumentStore for MapStore {
        async fn load(
            &self,
            name: DocumentName,
        ) -> Result<Option<serde_json::Value>, PersistenceError> {
            Ok(self.docs.lock().unwrap().get(&name).cloned())
        }

        async fn save(
            &self,
            name: DocumentName,
            value: serde_json::Value,
        ) -> Result<(), PersistenceError> {
            self.docs.lock().unwrap().insert(name, value);
            Ok(())
        }
    }

    #[tokio::test]
    async fn absent_document_yields_default() {
        let store = MapStore::default();
        let recent: Vec<String> = load_or_default(&store, DocumentName::RecentSearches)
            .await
            .unwrap();
        assert!(recent.is_empty());
    }

    #[tokio::test]
    async fn saved_value_loads_back() {
        let store = MapStore::default();
        let recent = vec!["abba".to_string(), "queen".to_string()];
        save_as(&store, DocumentName::RecentSearches, &recent)
            .await
            .unwrap();

        let loaded: Vec<String> = load_or_default(&store, DocumentName::RecentSearches)
            .await
            .unwrap();
        assert_eq!(loaded, recent);
    }

    #[tokio::test]
    async fn malformed_document_is_a_serialization_error() {
        let store = MapStore::default();
        store
            .save(DocumentName::History, serde_json::json!({"not": "a list"}))
            .await
            .unwrap();

        let err = load_or_default::<Vec<String>>(&store, DocumentName::History)
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Serialization { .. }));
        assert_eq!(err.document(), DocumentName::History);
    }
}
