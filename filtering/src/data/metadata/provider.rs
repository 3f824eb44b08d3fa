use async_trait::async_trait;

use super::error::MetadataError;
use super::types::{EntityMetadata, Record, ResolvedRecord};

#[async_trait]
pub trait MetadataService: Send + Sync + std::fmt::Debug {
    /// Describe an entity
    async fn entity_metadata(&self, entity: &str) -> Result<EntityMetadata, MetadataError>;

    /// Retrieve one record of `entity` by id, selecting the given attributes
    async fn retrieve_record(
        &self,
        entity: &EntityMetadata,
        id: &str,
        columns: &[String],
    ) -> Result<Option<Record>, MetadataError>;

    /// Point lookup selecting the primary name (default: metadata + retrieve)
    async fn lookup_record(
        &self,
        entity: &str,
        id: &str,
    ) -> Result<Option<ResolvedRecord>, MetadataError> {
        let metadata = self.entity_metadata(entity).await?;
        let columns = [metadata.primary_name_attribute.clone()];
        let record = self.retrieve_record(&metadata, id, &columns).await?;
        Ok(record.map(|record| ResolvedRecord {
            id: id.to_string(),
            entity_type: entity.to_string(),
            primary_name: record
                .get(&metadata.primary_name_attribute)
                .and_then(|v| v.as_str())
                .map(str::to_string),
        }))
    }

    /// Human-readable backend name
    fn name(&self) -> &'static str;
}
