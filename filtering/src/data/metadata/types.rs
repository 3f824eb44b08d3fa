use serde::{Deserialize, Serialize};

/// Attribute values of one record, keyed by attribute logical name
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Entity description needed for point lookups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    pub logical_name: String,
    /// Collection name used in Web API urls
    pub entity_set_name: String,
    pub primary_id_attribute: String,
    pub primary_name_attribute: String,
}

impl EntityMetadata {
    /// Conventional metadata: `accounts`, `accountid`, `name`
    pub fn conventional(logical_name: &str) -> Self {
        Self {
            logical_name: logical_name.to_string(),
            entity_set_name: format!("{}s", logical_name),
            primary_id_attribute: format!("{}id", logical_name),
            primary_name_attribute: "name".to_string(),
        }
    }
}

/// Record found by a point lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecord {
    pub id: String,
    pub entity_type: String,
    pub primary_name: Option<String>,
}
