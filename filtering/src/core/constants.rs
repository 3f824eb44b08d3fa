// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "tabula";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".tabula";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "tabula.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "TABULA_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TABULA_LOG";

// =============================================================================
// Environment Variables - Filtering
// =============================================================================

/// Environment variable for the name-shadow attribute suffix
pub const ENV_NAME_SUFFIX: &str = "TABULA_NAME_SUFFIX";

/// Environment variable for the pattern wildcard marker
pub const ENV_WILDCARD: &str = "TABULA_WILDCARD";

// =============================================================================
// Environment Variables - Lookup
// =============================================================================

/// Environment variable to enable or disable the lookup cache
pub const ENV_LOOKUP_CACHE: &str = "TABULA_LOOKUP_CACHE";

/// Environment variable for lookup cache TTL in seconds
pub const ENV_LOOKUP_CACHE_TTL_SECS: &str = "TABULA_LOOKUP_CACHE_TTL_SECS";

/// Environment variable for lookup cache capacity
pub const ENV_LOOKUP_CACHE_MAX_ENTRIES: &str = "TABULA_LOOKUP_CACHE_MAX_ENTRIES";

/// Environment variable for the Web API base url
pub const ENV_WEBAPI_URL: &str = "TABULA_WEBAPI_URL";

/// Environment variable for the Web API bearer token
pub const ENV_WEBAPI_TOKEN: &str = "TABULA_WEBAPI_TOKEN";

// =============================================================================
// Defaults
// =============================================================================

/// Suffix of the text-searchable shadow attribute of lookup and option columns
pub const DEFAULT_NAME_SUFFIX: &str = "name";

/// Wildcard marker of pattern operators
pub const DEFAULT_WILDCARD: &str = "%";

/// Lookup cache TTL (5 minutes)
pub const DEFAULT_LOOKUP_CACHE_TTL_SECS: u64 = 300;

/// Lookup cache capacity
pub const DEFAULT_LOOKUP_CACHE_MAX_ENTRIES: u64 = 10_000;
