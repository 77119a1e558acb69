use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;

use crate::collection::errors::CollectionError;
use crate::collection::types::{DocumentPool, validate_identifier};

use super::postgres::*;
use super::sqlite::*;

/// A named collection of JSON documents of type `T`.
///
/// Each collection is one table, `{prefix}{name}`, holding the serialized
/// documents. Lookups match a top-level string field.
pub struct DocumentCollection<T> {
    pool: DocumentPool,
    table_name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for DocumentCollection<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            table_name: self.table_name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for DocumentCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCollection")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl<T> DocumentCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(pool: DocumentPool, prefix: &str, name: &str) -> Result<Self, CollectionError> {
        let table_name = format!("{prefix}{name}");
        validate_identifier("collection", &table_name)?;
        Ok(Self {
            pool,
            table_name,
            _marker: PhantomData,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Create the backing table if it does not exist yet.
    pub async fn init(&self) -> Result<(), CollectionError> {
        match &self.pool {
            DocumentPool::Sqlite(pool) => create_table_sqlite(pool, &self.table_name).await,
            DocumentPool::Postgres(pool) => create_table_postgres(pool, &self.table_name).await,
        }
    }

    /// Insert one document and return its row id.
    #[tracing::instrument(skip(self, document), fields(collection = %self.table_name))]
    pub async fn insert_one(&self, document: &T) -> Result<i64, CollectionError> {
        let body = serde_json::to_value(document)?;

        let result = match &self.pool {
            DocumentPool::Sqlite(pool) => {
                insert_document_sqlite(pool, &self.table_name, &body).await
            }
            DocumentPool::Postgres(pool) => {
                insert_document_postgres(pool, &self.table_name, &body).await
            }
        };

        match &result {
            Ok(id) => tracing::info!(document_id = id, "Document inserted"),
            Err(e) => tracing::error!(error = %e, "Document insert failed"),
        }
        result
    }

    /// First document (in insertion order) whose top-level `field` equals
    /// `value`.
    #[tracing::instrument(skip(self), fields(collection = %self.table_name))]
    pub async fn find_one_by(&self, field: &str, value: &str) -> Result<Option<T>, CollectionError> {
        validate_identifier("field", field)?;

        let body = match &self.pool {
            DocumentPool::Sqlite(pool) => {
                find_one_by_sqlite(pool, &self.table_name, field, value).await?
            }
            DocumentPool::Postgres(pool) => {
                find_one_by_postgres(pool, &self.table_name, field, value).await?
            }
        };

        tracing::debug!(found = body.is_some(), "Document lookup completed");
        body.map(|b| serde_json::from_value(b).map_err(CollectionError::from))
            .transpose()
    }

    pub async fn count(&self) -> Result<i64, CollectionError> {
        match &self.pool {
            DocumentPool::Sqlite(pool) => count_sqlite(pool, &self.table_name).await,
            DocumentPool::Postgres(pool) => count_postgres(pool, &self.table_name).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentStoreConfig;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Jedi {
        name: String,
        age: i32,
    }

    fn jedi(name: &str, age: i32) -> Jedi {
        Jedi {
            name: name.to_string(),
            age,
        }
    }

    async fn collection() -> DocumentCollection<Jedi> {
        let pool = DocumentPool::connect(&DocumentStoreConfig::sqlite_memory()).unwrap();
        let collection = DocumentCollection::new(pool, "test_", "jedi").unwrap();
        collection.init().await.unwrap();
        collection
    }

    #[tokio::test]
    async fn test_insert_and_find_one_by() {
        // Given a collection holding one document
        let collection = collection().await;
        collection
            .insert_one(&jedi("Luke Skywalker", 19))
            .await
            .unwrap();

        // When looking it up by name
        let found = collection
            .find_one_by("name", "Luke Skywalker")
            .await
            .unwrap();

        // Then the whole document comes back
        assert_eq!(found, Some(jedi("Luke Skywalker", 19)));
    }

    #[tokio::test]
    async fn test_find_one_by_missing() {
        let collection = collection().await;
        collection.insert_one(&jedi("Yoda", 900)).await.unwrap();

        let found = collection
            .find_one_by("name", "Luke Skywalker")
            .await
            .unwrap();

        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_find_one_by_returns_first_inserted() {
        let collection = collection().await;
        collection
            .insert_one(&jedi("Luke Skywalker", 19))
            .await
            .unwrap();
        collection
            .insert_one(&jedi("Luke Skywalker", 53))
            .await
            .unwrap();

        let found = collection
            .find_one_by("name", "Luke Skywalker")
            .await
            .unwrap();

        assert_eq!(found.map(|j| j.age), Some(19));
        assert_eq!(collection.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_insert_returns_increasing_ids() {
        let collection = collection().await;

        let first = collection.insert_one(&jedi("Obi-Wan", 57)).await.unwrap();
        let second = collection.insert_one(&jedi("Anakin", 22)).await.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_find_one_by_treats_value_as_data() {
        // Given a value that would break out of a quoted SQL string
        let collection = collection().await;
        collection.insert_one(&jedi("Yoda", 900)).await.unwrap();

        // When using it as the lookup value
        let found = collection
            .find_one_by("name", "' OR '1'='1")
            .await
            .unwrap();

        // Then it matches nothing rather than every row
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_find_one_by_rejects_bad_field() {
        let collection = collection().await;

        let result = collection.find_one_by("name') OR 1=1 --", "x").await;

        assert!(matches!(result, Err(CollectionError::InvalidName(_))));
    }

    #[tokio::test]
    async fn test_new_rejects_bad_collection_name() {
        let pool = DocumentPool::connect(&DocumentStoreConfig::sqlite_memory()).unwrap();

        let result = DocumentCollection::<Jedi>::new(pool.clone(), "sandbox_", "jedi; DROP TABLE x");

        assert!(matches!(result, Err(CollectionError::InvalidName(_))));
        assert!(DocumentCollection::<Jedi>::new(pool, "sandbox_", "jedi").is_ok());
    }
}
