//! In-memory metadata backend
//!
//! Backs lookups with a fixed set of entities and records, loaded from a JSON
//! fixture or registered directly. Used by the CLI `--records` option and by
//! tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;

use super::error::MetadataError;
use super::provider::MetadataService;
use super::types::{EntityMetadata, Record};

/// Fixture file layout
#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    entities: Vec<FixtureEntity>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureEntity {
    #[serde(flatten)]
    metadata: EntityMetadata,
    #[serde(default)]
    records: Vec<Record>,
}

#[derive(Debug, Default)]
pub struct MemoryMetadataService {
    entities: RwLock<HashMap<String, EntityMetadata>>,
    records: RwLock<HashMap<(String, String), Record>>,
    latency: Option<Duration>,
    retrievals: AtomicUsize,
}

impl MemoryMetadataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call, to exercise concurrent resolution
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Load entities and records from a JSON fixture file
    pub fn load_fixture(path: &Path) -> Result<Self, MetadataError> {
        tracing::debug!(path = %path.display(), "Loading metadata fixture");
        let content = std::fs::read_to_string(path)?;
        Self::from_fixture_str(&content)
    }

    pub fn from_fixture_str(json: &str) -> Result<Self, MetadataError> {
        let fixture: Fixture =
            serde_json::from_str(json).map_err(|e| MetadataError::Serialization(e.to_string()))?;
        let service = Self::new();
        for entity in fixture.entities {
            let id_attribute = entity.metadata.primary_id_attribute.clone();
            let logical_name = entity.metadata.logical_name.clone();
            service.add_entity(entity.metadata);
            for record in entity.records {
                let Some(id) = record.get(&id_attribute).and_then(|v| v.as_str()) else {
                    tracing::warn!(
                        entity = %logical_name,
                        "Fixture record without primary id skipped"
                    );
                    continue;
                };
                let id = id.to_string();
                service.add_record(&logical_name, &id, record);
            }
        }
        tracing::debug!(
            entities = service.entities.read().len(),
            records = service.records.read().len(),
            "Metadata fixture loaded"
        );
        Ok(service)
    }

    pub fn add_entity(&self, metadata: EntityMetadata) {
        self.entities
            .write()
            .insert(metadata.logical_name.clone(), metadata);
    }

    /// Register a record, describing its entity conventionally if unknown
    pub fn add_record(&self, entity: &str, id: &str, record: Record) {
        self.entities
            .write()
            .entry(entity.to_string())
            .or_insert_with(|| EntityMetadata::conventional(entity));
        self.records
            .write()
            .insert((entity.to_string(), normalize_id(id)), record);
    }

    /// Number of record retrievals served so far
    pub fn retrieval_count(&self) -> usize {
        self.retrievals.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn normalize_id(id: &str) -> String {
    id.trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .to_ascii_lowercase()
}

#[async_trait]
impl MetadataService for MemoryMetadataService {
    async fn entity_metadata(&self, entity: &str) -> Result<EntityMetadata, MetadataError> {
        self.simulate_latency().await;
        self.entities
            .read()
            .get(entity)
            .cloned()
            .ok_or_else(|| MetadataError::UnknownEntity(entity.to_string()))
    }

    async fn retrieve_record(
        &self,
        entity: &EntityMetadata,
        id: &str,
        columns: &[String],
    ) -> Result<Option<Record>, MetadataError> {
        self.simulate_latency().await;
        self.retrievals.fetch_add(1, Ordering::SeqCst);
        let entity = entity.logical_name.as_str();
        if !self.entities.read().contains_key(entity) {
            return Err(MetadataError::UnknownEntity(entity.to_string()));
        }
        let records = self.records.read();
        let Some(record) = records.get(&(entity.to_string(), normalize_id(id))) else {
            return Ok(None);
        };
        if columns.is_empty() {
            return Ok(Some(record.clone()));
        }
        Ok(Some(
            record
                .iter()
                .filter(|(key, _)| columns.contains(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
