//! Shared settings and collaborators of a filtering session

use std::sync::Arc;

use crate::core::constants::{DEFAULT_NAME_SUFFIX, DEFAULT_WILDCARD};
use crate::data::MetadataService;

/// Serialization-boundary conventions of the receiving query layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSettings {
    /// Suffix of the text-searchable shadow attribute
    pub name_suffix: String,
    /// Marker wrapped around pattern operator values
    pub wildcard: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            name_suffix: DEFAULT_NAME_SUFFIX.to_string(),
            wildcard: DEFAULT_WILDCARD.to_string(),
        }
    }
}

/// Settings plus the optional metadata service used to resolve lookups
#[derive(Debug, Clone, Default)]
pub struct FilterContext {
    pub settings: Arc<FilterSettings>,
    pub metadata: Option<Arc<dyn MetadataService>>,
}

impl FilterContext {
    pub fn new(settings: FilterSettings) -> Self {
        Self {
            settings: Arc::new(settings),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Arc<dyn MetadataService>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
