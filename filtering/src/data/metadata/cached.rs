use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use super::error::MetadataError;
use super::provider::MetadataService;
use super::types::{EntityMetadata, Record};

/// TTL cache in front of a remote metadata service
///
/// Entity metadata and record lookups (hits and misses) are cached; errors
/// are never cached so a transient failure is retried on the next call.
#[derive(Debug)]
pub struct CachedMetadataService {
    inner: Arc<dyn MetadataService>,
    entities: Cache<String, EntityMetadata>,
    records: Cache<String, Option<Record>>,
}

impl CachedMetadataService {
    pub fn new(inner: Arc<dyn MetadataService>, ttl: Duration, max_entries: u64) -> Self {
        let entities = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        let records = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self {
            inner,
            entities,
            records,
        }
    }
}

fn record_key(entity: &str, id: &str, columns: &[String]) -> String {
    format!(
        "{}/{}?{}",
        entity,
        id.trim_matches(|c| c == '{' || c == '}').to_ascii_lowercase(),
        columns.join(",")
    )
}

#[async_trait]
impl MetadataService for CachedMetadataService {
    async fn entity_metadata(&self, entity: &str) -> Result<EntityMetadata, MetadataError> {
        if let Some(cached) = self.entities.get(entity).await {
            return Ok(cached);
        }
        let metadata = self.inner.entity_metadata(entity).await?;
        self.entities
            .insert(entity.to_string(), metadata.clone())
            .await;
        Ok(metadata)
    }

    async fn retrieve_record(
        &self,
        entity: &EntityMetadata,
        id: &str,
        columns: &[String],
    ) -> Result<Option<Record>, MetadataError> {
        let cache_key = record_key(&entity.logical_name, id, columns);
        if let Some(cached) = self.records.get(&cache_key).await {
            tracing::trace!(key = %cache_key, "Record cache hit");
            return Ok(cached);
        }
        let result = self.inner.retrieve_record(entity, id, columns).await?;
        self.records.insert(cache_key, result.clone()).await;
        Ok(result)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::metadata::memory::MemoryMetadataService;

    const ID: &str = "6f0d3c1e-2a4b-4c5d-8e9f-0a1b2c3d4e5f";

    fn make_cached() -> (Arc<MemoryMetadataService>, CachedMetadataService) {
        let inner = Arc::new(MemoryMetadataService::new());
        let cached = CachedMetadataService::new(inner.clone(), Duration::from_secs(60), 100);
        (inner, cached)
    }

    #[tokio::test]
    async fn test_cache_hit_skips_inner() {
        let (inner, cached) = make_cached();
        let mut record = Record::new();
        record.insert("name".into(), "Contoso".into());
        inner.add_record("account", ID, record);

        let first = cached.lookup_record("account", ID).await.unwrap().unwrap();
        let second = cached.lookup_record("account", ID).await.unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(inner.retrieval_count(), 1);
    }

    #[tokio::test]
    async fn test_negative_caching() {
        let (inner, cached) = make_cached();
        inner.add_entity(EntityMetadata::conventional("account"));

        assert!(cached.lookup_record("account", ID).await.unwrap().is_none());

        // Added behind the cache's back
        inner.add_record("account", ID, Record::new());
        assert!(cached.lookup_record("account", ID).await.unwrap().is_none());
        assert_eq!(inner.retrieval_count(), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let (inner, cached) = make_cached();
        assert!(cached.entity_metadata("contact").await.is_err());

        inner.add_entity(EntityMetadata::conventional("contact"));
        let metadata = cached.entity_metadata("contact").await.unwrap();
        assert_eq!(metadata.primary_id_attribute, "contactid");
    }

    #[test]
    fn test_record_key_normalizes_id() {
        let cols = vec!["name".to_string()];
        assert_eq!(
            record_key("account", "{ABC}", &cols),
            record_key("account", "abc", &cols)
        );
    }
}
