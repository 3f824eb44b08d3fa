use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::filters::FilterSettings;
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_LOOKUP_CACHE_MAX_ENTRIES,
    DEFAULT_LOOKUP_CACHE_TTL_SECS, DEFAULT_NAME_SUFFIX, DEFAULT_WILDCARD,
};

// =============================================================================
// File Config (JSON, all fields optional)
// =============================================================================

/// Filter conventions section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FilterFileConfig {
    pub name_suffix: Option<String>,
    pub wildcard: Option<String>,
}

/// Lookup resolution section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LookupFileConfig {
    pub cache_enabled: Option<bool>,
    pub cache_ttl_secs: Option<u64>,
    pub cache_max_entries: Option<u64>,
}

/// Web API section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct WebApiFileConfig {
    pub url: Option<String>,
    pub token: Option<String>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub filter: Option<FilterFileConfig>,
    pub lookup: Option<LookupFileConfig>,
    pub webapi: Option<WebApiFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(filter) = other.filter {
            let current = self.filter.get_or_insert_with(FilterFileConfig::default);
            if filter.name_suffix.is_some() {
                tracing::trace!(name_suffix = ?filter.name_suffix, "Merging filter.name_suffix");
                current.name_suffix = filter.name_suffix;
            }
            if filter.wildcard.is_some() {
                tracing::trace!(wildcard = ?filter.wildcard, "Merging filter.wildcard");
                current.wildcard = filter.wildcard;
            }
        }

        if let Some(lookup) = other.lookup {
            let current = self.lookup.get_or_insert_with(LookupFileConfig::default);
            if lookup.cache_enabled.is_some() {
                tracing::trace!(enabled = ?lookup.cache_enabled, "Merging lookup.cache_enabled");
                current.cache_enabled = lookup.cache_enabled;
            }
            if lookup.cache_ttl_secs.is_some() {
                tracing::trace!(ttl = ?lookup.cache_ttl_secs, "Merging lookup.cache_ttl_secs");
                current.cache_ttl_secs = lookup.cache_ttl_secs;
            }
            if lookup.cache_max_entries.is_some() {
                tracing::trace!(
                    max_entries = ?lookup.cache_max_entries,
                    "Merging lookup.cache_max_entries"
                );
                current.cache_max_entries = lookup.cache_max_entries;
            }
        }

        // Token is secret; never traced
        if let Some(webapi) = other.webapi {
            let current = self.webapi.get_or_insert_with(WebApiFileConfig::default);
            if webapi.url.is_some() {
                tracing::trace!(url = ?webapi.url, "Merging webapi.url");
                current.url = webapi.url;
            }
            if webapi.token.is_some() {
                current.token = webapi.token;
            }
        }
    }
}

// =============================================================================
// Resolved Config
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    pub cache_enabled: bool,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebApiConfig {
    pub url: String,
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub filter: FilterSettings,
    pub lookup: LookupConfig,
    pub webapi: Option<WebApiConfig>,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.tabula/tabula.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(
            config = ?cli.config,
            name_suffix = ?cli.name_suffix,
            wildcard = ?cli.wildcard,
            "CLI config"
        );

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Profile dir (~/.tabula/tabula.json), skipped if missing
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::resolve(cli, file_config);
        config.validate()?;
        Ok(config)
    }

    /// Layer defaults -> file config -> CLI/env overrides
    fn resolve(cli: &CliConfig, file_config: FileConfig) -> Self {
        let file_filter = file_config.filter.unwrap_or_default();
        let file_lookup = file_config.lookup.unwrap_or_default();
        let file_webapi = file_config.webapi.unwrap_or_default();

        let filter = FilterSettings {
            name_suffix: cli
                .name_suffix
                .clone()
                .or(file_filter.name_suffix)
                .unwrap_or_else(|| DEFAULT_NAME_SUFFIX.to_string()),
            wildcard: cli
                .wildcard
                .clone()
                .or(file_filter.wildcard)
                .unwrap_or_else(|| DEFAULT_WILDCARD.to_string()),
        };

        let lookup = LookupConfig {
            cache_enabled: cli
                .lookup_cache
                .or(file_lookup.cache_enabled)
                .unwrap_or(true),
            cache_ttl_secs: cli
                .lookup_cache_ttl
                .or(file_lookup.cache_ttl_secs)
                .unwrap_or(DEFAULT_LOOKUP_CACHE_TTL_SECS),
            cache_max_entries: cli
                .lookup_cache_max_entries
                .or(file_lookup.cache_max_entries)
                .unwrap_or(DEFAULT_LOOKUP_CACHE_MAX_ENTRIES),
        };

        // webapi: present only when a url is configured somewhere
        let webapi = cli
            .webapi_url
            .clone()
            .or(file_webapi.url)
            .map(|url| WebApiConfig {
                url,
                token: cli.webapi_token.clone().or(file_webapi.token),
            });

        tracing::debug!(
            name_suffix = %filter.name_suffix,
            wildcard = %filter.wildcard,
            lookup_cache = lookup.cache_enabled,
            webapi = webapi.is_some(),
            "Configuration resolved"
        );

        Self {
            filter,
            lookup,
            webapi,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.filter.name_suffix.trim().is_empty() {
            anyhow::bail!("filter.name_suffix must not be empty");
        }
        if self.filter.wildcard.is_empty() {
            anyhow::bail!("filter.wildcard must not be empty");
        }
        if self.lookup.cache_enabled && self.lookup.cache_max_entries == 0 {
            anyhow::bail!(
                "lookup.cache_max_entries must be greater than 0 when caching is enabled"
            );
        }
        if let Some(webapi) = &self.webapi
            && !(webapi.url.starts_with("http://") || webapi.url.starts_with("https://"))
        {
            anyhow::bail!(
                "webapi.url must start with http:// or https:// (got '{}')",
                webapi.url
            );
        }
        Ok(())
    }
}

/// Get the profile config path (~/.tabula/tabula.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "filter": { "name_suffix": "label", "wildcard": "*" },
            "lookup": { "cache_enabled": false, "cache_ttl_secs": 60, "cache_max_entries": 5 },
            "webapi": { "url": "https://org.example.com", "token": "t" }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let filter = config.filter.as_ref().unwrap();
        assert_eq!(filter.name_suffix.as_deref(), Some("label"));
        assert_eq!(filter.wildcard.as_deref(), Some("*"));
        let lookup = config.lookup.as_ref().unwrap();
        assert_eq!(lookup.cache_enabled, Some(false));
        assert_eq!(lookup.cache_ttl_secs, Some(60));
        assert_eq!(
            config.webapi.as_ref().unwrap().url.as_deref(),
            Some("https://org.example.com")
        );
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();
        assert!(config.filter.is_none());
        assert!(config.lookup.is_none());
        assert!(config.webapi.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "filter": { "wildcard": "*" }, "unknown_field": 123 }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.extra.get("unknown_field").unwrap(), 123);
    }

    #[test]
    fn test_file_config_merge() {
        let mut base = FileConfig {
            filter: Some(FilterFileConfig {
                name_suffix: Some("label".into()),
                wildcard: Some("*".into()),
            }),
            lookup: Some(LookupFileConfig {
                cache_enabled: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = FileConfig {
            filter: Some(FilterFileConfig {
                name_suffix: None,
                wildcard: Some("%".into()),
            }),
            webapi: Some(WebApiFileConfig {
                url: Some("https://org.example.com".into()),
                token: None,
            }),
            ..Default::default()
        };
        base.merge(overlay);

        let filter = base.filter.unwrap();
        assert_eq!(filter.name_suffix.as_deref(), Some("label"));
        assert_eq!(filter.wildcard.as_deref(), Some("%"));
        assert_eq!(base.lookup.unwrap().cache_enabled, Some(false));
        assert!(base.webapi.unwrap().url.is_some());
    }

    #[test]
    fn test_resolve_defaults() {
        let config = AppConfig::resolve(&CliConfig::default(), FileConfig::default());
        assert_eq!(config.filter, FilterSettings::default());
        assert!(config.lookup.cache_enabled);
        assert_eq!(config.lookup.cache_ttl_secs, DEFAULT_LOOKUP_CACHE_TTL_SECS);
        assert_eq!(config.lookup.cache_max_entries, DEFAULT_LOOKUP_CACHE_MAX_ENTRIES);
        assert!(config.webapi.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file: FileConfig = serde_json::from_str(
            r#"{ "filter": { "wildcard": "*" }, "webapi": { "url": "https://a", "token": "f" } }"#,
        )
        .unwrap();
        let cli = CliConfig {
            wildcard: Some("?".into()),
            webapi_token: Some("c".into()),
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli, file);
        assert_eq!(config.filter.wildcard, "?");
        let webapi = config.webapi.unwrap();
        assert_eq!(webapi.url, "https://a");
        assert_eq!(webapi.token.as_deref(), Some("c"));
    }

    #[test]
    fn test_load_from_cli_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{ "filter": { "name_suffix": "label" } }"#).unwrap();

        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.filter.name_suffix, "label");
    }

    #[test]
    fn test_load_missing_cli_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cli = CliConfig {
            config: Some(dir.path().join("missing.json")),
            ..Default::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_invalid_json_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::resolve(&CliConfig::default(), FileConfig::default());
        config.filter.wildcard.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::resolve(&CliConfig::default(), FileConfig::default());
        config.webapi = Some(WebApiConfig {
            url: "ftp://x".into(),
            token: None,
        });
        assert!(config.validate().is_err());
    }
}
