//! Lookup reference resolution against the metadata service

use std::collections::HashMap;

use futures::future::join_all;

use super::value::LookupReference;
use crate::data::MetadataService;

/// Resolve ids concurrently, probing targets in declared order
///
/// Ids no target yields a record for are left out of the result.
pub(crate) async fn resolve_references(
    service: &dyn MetadataService,
    targets: &[String],
    ids: &[String],
) -> HashMap<String, LookupReference> {
    if targets.is_empty() {
        tracing::debug!(ids = ids.len(), "Lookup column has no targets, nothing to resolve");
        return HashMap::new();
    }

    let lookups = ids.iter().map(|id| resolve_one(service, targets, id));
    join_all(lookups)
        .await
        .into_iter()
        .flatten()
        .map(|reference| (reference.id.clone(), reference))
        .collect()
}

async fn resolve_one(
    service: &dyn MetadataService,
    targets: &[String],
    id: &str,
) -> Option<LookupReference> {
    for target in targets {
        match service.lookup_record(target, id).await {
            Ok(Some(record)) => {
                tracing::trace!(id, entity = %target, "Lookup reference resolved");
                return Some(LookupReference::resolved(
                    id,
                    record.entity_type,
                    record.primary_name,
                ));
            }
            Ok(None) => {
                tracing::trace!(id, entity = %target, "No record in target");
            }
            Err(e) => {
                tracing::warn!(
                    id,
                    entity = %target,
                    backend = service.name(),
                    error = %e,
                    "Lookup probe failed"
                );
            }
        }
    }
    tracing::debug!(id, "Lookup reference unresolved");
    None
}
