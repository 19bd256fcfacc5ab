//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;
use tracker_core::value_objects::{DEFAULT_IMAGE_EXTENSIONS, DEFAULT_MAX_IMAGE_BYTES};
use tracker_core::ImagePolicy;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub pagination: PaginationConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on request bodies, multipart uploads included
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
    /// Whole-request deadline; kept above the database deadline
    #[serde(default = "default_http_timeout")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Deadline applied to every repository call
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_reaper_interval")]
    pub token_reaper_interval_secs: u64,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn token_reaper_interval(&self) -> Duration {
        Duration::from_secs(self.token_reaper_interval_secs)
    }
}

/// JWT configuration
///
/// Tokens are signed with RS256; the key pair is read from PEM files.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Scheme expected in the `Authorization` header
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default = "default_private_key_path")]
    pub private_key_path: String,
    #[serde(default = "default_public_key_path")]
    pub public_key_path: String,
    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    /// Refresh token (and token record) lifetime in seconds
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    /// Read the private key PEM
    ///
    /// # Errors
    /// Returns an error if the file cannot be read
    pub fn read_private_key(&self) -> Result<String, ConfigError> {
        read_key_file(&self.private_key_path)
    }

    /// Read the public key PEM
    ///
    /// # Errors
    /// Returns an error if the file cannot be read
    pub fn read_public_key(&self) -> Result<String, ConfigError> {
        read_key_file(&self.public_key_path)
    }
}

fn read_key_file(path: &str) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_string(),
        source,
    })
}

/// Object storage (S3-compatible) configuration
#[derive(Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack)
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_image_extensions")]
    pub allowed_image_extensions: Vec<String>,
}

impl StorageConfig {
    /// Upload policy for workspace images
    #[must_use]
    pub fn image_policy(&self) -> ImagePolicy {
        ImagePolicy::new(self.max_upload_bytes, self.allowed_image_extensions.clone())
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("force_path_style", &self.force_path_style)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("allowed_image_extensions", &self.allowed_image_extensions)
            .finish_non_exhaustive()
    }
}

/// List pagination configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,
    #[serde(default = "default_max_items")]
    pub max_items: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "tracker".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_body_limit() -> usize {
    1024 * 1024 * 1024 // 1 GiB
}

fn default_http_timeout() -> u64 {
    300
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_request_timeout() -> u64 {
    180
}

fn default_reaper_interval() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn default_private_key_path() -> String {
    "certs/private.pem".to_string()
}

fn default_public_key_path() -> String {
    "certs/public.pem".to_string()
}

/// Upper bound for token lifetimes: ten years
const MAX_TOKEN_EXPIRY_SECS: i64 = 10 * 365 * 24 * 60 * 60;

fn default_access_token_expiry() -> i64 {
    3600 // 1 hour
}

fn default_refresh_token_expiry() -> i64 {
    7200 // 2 hours
}

fn default_bucket() -> String {
    "tracker".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_IMAGE_BYTES
}

fn default_image_extensions() -> Vec<String> {
    DEFAULT_IMAGE_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect()
}

fn default_page_size() -> i64 {
    10
}

fn default_max_items() -> i64 {
    50
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Returns an error if required keys are missing or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        Ok(Self {
            app: AppSettings {
                name: vars.string("APP_NAME").unwrap_or_else(default_app_name),
                env: vars
                    .string("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: vars.string("API_HOST").unwrap_or_else(default_host),
                port: vars.parse("API_PORT")?.unwrap_or_else(default_port),
                body_limit_bytes: vars
                    .parse("API_BODY_LIMIT_SIZE")?
                    .unwrap_or_else(default_body_limit),
                request_timeout_secs: vars
                    .parse("API_REQUEST_TIMEOUT_SECS")?
                    .unwrap_or_else(default_http_timeout),
            },
            database: DatabaseConfig {
                url: vars
                    .string("DATABASE_URL")
                    .ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: vars
                    .parse("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: vars
                    .parse("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
                request_timeout_secs: vars
                    .parse("DATABASE_REQUEST_TIMEOUT_SECS")?
                    .unwrap_or_else(default_request_timeout),
                token_reaper_interval_secs: vars
                    .parse("TOKEN_REAPER_INTERVAL_SECS")?
                    .unwrap_or_else(default_reaper_interval),
                run_migrations: vars
                    .parse("DATABASE_RUN_MIGRATIONS")?
                    .unwrap_or_else(default_true),
            },
            jwt: JwtConfig {
                token_type: vars.string("JWT_TOKEN_TYPE").unwrap_or_else(default_token_type),
                private_key_path: vars
                    .string("JWT_PRIVATE_KEY_PATH")
                    .unwrap_or_else(default_private_key_path),
                public_key_path: vars
                    .string("JWT_PUBLIC_KEY_PATH")
                    .unwrap_or_else(default_public_key_path),
                access_token_expiry: vars
                    .parse_in_range("JWT_ACCESS_TOKEN_EXPIRY", 1..=MAX_TOKEN_EXPIRY_SECS)?
                    .unwrap_or_else(default_access_token_expiry),
                refresh_token_expiry: vars
                    .parse_in_range("JWT_REFRESH_TOKEN_EXPIRY", 1..=MAX_TOKEN_EXPIRY_SECS)?
                    .unwrap_or_else(default_refresh_token_expiry),
            },
            storage: StorageConfig {
                bucket: vars.string("S3_BUCKET").unwrap_or_else(default_bucket),
                region: vars.string("AWS_REGION").unwrap_or_else(default_region),
                endpoint: vars.string("AWS_ENDPOINT_URL"),
                access_key_id: vars.string("AWS_ACCESS_KEY_ID"),
                secret_access_key: vars.string("AWS_SECRET_ACCESS_KEY"),
                force_path_style: vars.parse("S3_FORCE_PATH_STYLE")?.unwrap_or_default(),
                max_upload_bytes: vars
                    .parse("UPLOAD_MAX_BYTES")?
                    .unwrap_or_else(default_max_upload_bytes),
                allowed_image_extensions: vars
                    .string("UPLOAD_IMAGE_EXTENSIONS")
                    .map(|s| split_list(&s))
                    .unwrap_or_else(default_image_extensions),
            },
            pagination: PaginationConfig {
                default_page_size: vars
                    .parse_in_range("PAGINATION_DEFAULT_PAGE_SIZE", 1..=i64::from(u32::MAX))?
                    .unwrap_or_else(default_page_size),
                max_items: vars
                    .parse_in_range("PAGINATION_MAX_ITEM", 1..=i64::from(u32::MAX))?
                    .unwrap_or_else(default_max_items),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parse("RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .unwrap_or_else(default_requests_per_second),
                burst: vars.parse("RATE_LIMIT_BURST")?.unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .string("CORS_ALLOWED_ORIGINS")
                    .map(|s| split_list(&s))
                    .unwrap_or_default(),
            },
        })
    }
}

/// Typed access over a key lookup. Empty values count as unset.
struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn parse<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError> {
        self.string(key)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(key, raw))
            })
            .transpose()
    }

    fn parse_in_range<T>(
        &self,
        key: &'static str,
        range: RangeInclusive<T>,
    ) -> Result<Option<T>, ConfigError>
    where
        T: FromStr + PartialOrd + ToString,
    {
        match self.parse::<T>(key)? {
            Some(value) if !range.contains(&value) => {
                Err(ConfigError::InvalidValue(key, value.to_string()))
            }
            value => Ok(value),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
