use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;

use super::error::MetadataError;
use super::provider::MetadataService;
use super::types::{EntityMetadata, Record};

const WEBAPI_TIMEOUT_SECS: u64 = 30;
const WEBAPI_VERSION: &str = "v9.2";
const ENTITY_DEFINITION_SELECT: &str =
    "LogicalName,EntitySetName,PrimaryIdAttribute,PrimaryNameAttribute";

/// Entity definition as returned by the Web API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EntityDefinition {
    logical_name: String,
    entity_set_name: Option<String>,
    primary_id_attribute: Option<String>,
    primary_name_attribute: Option<String>,
}

impl From<EntityDefinition> for EntityMetadata {
    fn from(def: EntityDefinition) -> Self {
        let fallback = EntityMetadata::conventional(&def.logical_name);
        Self {
            entity_set_name: def.entity_set_name.unwrap_or(fallback.entity_set_name),
            primary_id_attribute: def
                .primary_id_attribute
                .unwrap_or(fallback.primary_id_attribute),
            primary_name_attribute: def
                .primary_name_attribute
                .unwrap_or(fallback.primary_name_attribute),
            logical_name: def.logical_name,
        }
    }
}

/// OData Web API metadata backend
#[derive(Debug)]
pub struct WebApiMetadataService {
    client: reqwest::Client,
    base_url: String,
}

impl WebApiMetadataService {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, MetadataError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("OData-MaxVersion", HeaderValue::from_static("4.0"));
        headers.insert("OData-Version", HeaderValue::from_static("4.0"));
        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| MetadataError::Config(format!("invalid web api token: {}", e)))?,
            );
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(WEBAPI_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .map_err(|e| MetadataError::Config(format!("failed to build HTTP client: {}", e)))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!(url = %base_url, "Web API metadata service initialized");
        Ok(Self { client, base_url })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/data/{}/{}", self.base_url, WEBAPI_VERSION, path)
    }
}

#[async_trait]
impl MetadataService for WebApiMetadataService {
    async fn entity_metadata(&self, entity: &str) -> Result<EntityMetadata, MetadataError> {
        let url = self.api_url(&format!(
            "EntityDefinitions(LogicalName='{}')?$select={}",
            entity, ENTITY_DEFINITION_SELECT
        ));
        let resp = self.client.get(&url).send().await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::UnknownEntity(entity.to_string()));
        }
        if !resp.status().is_success() {
            return Err(MetadataError::backend(
                "webapi",
                format!("GET {} returned {}", url, resp.status()),
            ));
        }

        let body: serde_json::Value = resp.json().await?;
        let definition: EntityDefinition = serde_json::from_value(body)
            .map_err(|e| MetadataError::Serialization(e.to_string()))?;
        Ok(definition.into())
    }

    async fn retrieve_record(
        &self,
        entity: &EntityMetadata,
        id: &str,
        columns: &[String],
    ) -> Result<Option<Record>, MetadataError> {
        let id = id.trim_matches(|c| c == '{' || c == '}');
        let mut path = format!("{}({})", entity.entity_set_name, id);
        if !columns.is_empty() {
            path.push_str("?$select=");
            path.push_str(&columns.join(","));
        }
        let url = self.api_url(&path);
        let resp = self.client.get(&url).send().await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(MetadataError::backend(
                "webapi",
                format!("GET {} returned {}", url, resp.status()),
            ));
        }

        let body: serde_json::Value = resp.json().await?;
        let serde_json::Value::Object(mut record) = body else {
            return Err(MetadataError::Serialization(format!(
                "GET {} did not return an object",
                url
            )));
        };
        // OData annotations (@odata.etag, ...) are not attributes
        record.retain(|key, _| !key.starts_with('@'));
        Ok(Some(record))
    }

    fn name(&self) -> &'static str {
        "webapi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use httpmock::prelude::*;
    use serde_json::json;

    use crate::data::metadata::CachedMetadataService;

    const ID: &str = "6f0d3c1e-2a4b-4c5d-8e9f-0a1b2c3d4e5f";

    async fn mock_account_definition(server: &MockServer) {
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/data/v9.2/EntityDefinitions(LogicalName='account')");
                then.status(200).json_body(json!({
                    "@odata.context": "$metadata#EntityDefinitions",
                    "LogicalName": "account",
                    "EntitySetName": "accounts",
                    "PrimaryIdAttribute": "accountid",
                    "PrimaryNameAttribute": "name"
                }));
            })
            .await;
    }

    #[tokio::test]
    async fn test_lookup_record() {
        let server = MockServer::start_async().await;
        mock_account_definition(&server).await;
        let record_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(format!("/api/data/v9.2/accounts({})", ID))
                    .query_param("$select", "name")
                    .header("authorization", "Bearer secret");
                then.status(200).json_body(json!({
                    "@odata.etag": "W/\"1\"",
                    "accountid": ID,
                    "name": "Contoso"
                }));
            })
            .await;

        let service = WebApiMetadataService::new(&server.base_url(), Some("secret")).unwrap();
        let found = service.lookup_record("account", ID).await.unwrap().unwrap();
        assert_eq!(found.entity_type, "account");
        assert_eq!(found.primary_name.as_deref(), Some("Contoso"));
        record_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_cached_lookups_fetch_definition_once() {
        let server = MockServer::start_async().await;
        let definition_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/data/v9.2/EntityDefinitions(LogicalName='account')");
                then.status(200).json_body(json!({
                    "LogicalName": "account",
                    "EntitySetName": "accounts",
                    "PrimaryIdAttribute": "accountid",
                    "PrimaryNameAttribute": "name"
                }));
            })
            .await;
        let records_mock = server
            .mock_async(|when, then| {
                when.method(GET).path_includes("/api/data/v9.2/accounts(");
                then.status(200).json_body(json!({"name": "Contoso"}));
            })
            .await;

        let service = WebApiMetadataService::new(&server.base_url(), None).unwrap();
        let cached = CachedMetadataService::new(Arc::new(service), Duration::from_secs(60), 100);
        let other = "0a1b2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d";
        assert!(cached.lookup_record("account", ID).await.unwrap().is_some());
        assert!(cached.lookup_record("account", other).await.unwrap().is_some());
        assert!(cached.lookup_record("account", ID).await.unwrap().is_some());

        definition_mock.assert_calls_async(1).await;
        records_mock.assert_calls_async(2).await;
    }

    #[tokio::test]
    async fn test_missing_record_is_none() {
        let server = MockServer::start_async().await;
        mock_account_definition(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(format!("/api/data/v9.2/accounts({})", ID));
                then.status(404);
            })
            .await;

        let service = WebApiMetadataService::new(&server.base_url(), None).unwrap();
        let braced = format!("{{{}}}", ID);
        assert!(service.lookup_record("account", &braced).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_entity_and_server_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/data/v9.2/EntityDefinitions(LogicalName='invoice')");
                then.status(404);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/data/v9.2/EntityDefinitions(LogicalName='contact')");
                then.status(500);
            })
            .await;

        let service = WebApiMetadataService::new(&server.base_url(), None).unwrap();
        assert!(matches!(
            service.entity_metadata("invoice").await,
            Err(MetadataError::UnknownEntity(_))
        ));
        assert!(matches!(
            service.entity_metadata("contact").await,
            Err(MetadataError::Backend { backend: "webapi", .. })
        ));
    }

    #[test]
    fn test_definition_falls_back_to_conventions() {
        let def: EntityDefinition =
            serde_json::from_value(json!({"LogicalName": "contact"})).unwrap();
        let metadata = EntityMetadata::from(def);
        assert_eq!(metadata.entity_set_name, "contacts");
        assert_eq!(metadata.primary_id_attribute, "contactid");
    }

    #[test]
    fn test_invalid_token_is_config_error() {
        let result = WebApiMetadataService::new("http://localhost", Some("bad\ntoken"));
        assert!(matches!(result, Err(MetadataError::Config(_))));
    }
}
