//! Entity metadata and record lookup
//!
//! Backs lookup reference resolution. Backends: an in-memory fixture store
//! and the OData Web API, optionally behind a TTL cache.

mod cached;
mod error;
mod memory;
mod provider;
mod types;
mod webapi;

pub use cached::CachedMetadataService;
pub use error::MetadataError;
pub use memory::MemoryMetadataService;
pub use provider::MetadataService;
pub use types::{EntityMetadata, Record, ResolvedRecord};
pub use webapi::WebApiMetadataService;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::core::config::{AppConfig, LookupConfig};

/// Build the metadata service for the configured source
///
/// A record fixture wins over the Web API. Without either, lookups stay
/// unresolved and `None` is returned.
pub fn init_metadata_service(
    config: &AppConfig,
    records: Option<&Path>,
) -> Result<Option<Arc<dyn MetadataService>>> {
    let service: Arc<dyn MetadataService> = if let Some(path) = records {
        Arc::new(
            MemoryMetadataService::load_fixture(path)
                .with_context(|| format!("Failed to load record fixture: {}", path.display()))?,
        )
    } else if let Some(webapi) = &config.webapi {
        let service = WebApiMetadataService::new(&webapi.url, webapi.token.as_deref())?;
        with_cache(Arc::new(service), &config.lookup)
    } else {
        tracing::debug!("No metadata source configured, lookups stay unresolved");
        return Ok(None);
    };

    tracing::debug!(backend = service.name(), "Metadata service initialized");
    Ok(Some(service))
}

fn with_cache(inner: Arc<dyn MetadataService>, config: &LookupConfig) -> Arc<dyn MetadataService> {
    if !config.cache_enabled {
        return inner;
    }
    Arc::new(CachedMetadataService::new(
        inner,
        Duration::from_secs(config.cache_ttl_secs),
        config.cache_max_entries,
    ))
}
