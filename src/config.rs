use crate::constants::*;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub geocoder: GeocoderConfig,
    pub geocode_cache_ttl: u64,
    pub geocode_cache_max_entries: u64,
    pub columns: ColumnKeywords,
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Search endpoint accepting `q`, `format` and `limit` query parameters
    pub base_url: String,

    /// Client identification sent as `User-Agent` on every request
    pub user_agent: String,

    /// Upper bound on a single HTTP request
    pub timeout: Duration,

    /// Retries after the first attempt (0 = single attempt)
    pub max_retries: usize,

    /// Backoff before the first retry, doubled for each following retry
    pub retry_base: Duration,

    /// Maximum number of lookups in flight during one build
    pub concurrency: usize,

    /// Upper bound on one lookup including its retries
    pub lookup_deadline: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODER_BASE_URL.to_string(),
            user_agent: default_user_agent(),
            timeout: Duration::from_secs(DEFAULT_GEOCODER_TIMEOUT_SECONDS),
            max_retries: DEFAULT_GEOCODER_MAX_RETRIES,
            retry_base: Duration::from_millis(DEFAULT_GEOCODER_RETRY_BASE_MS),
            concurrency: DEFAULT_GEOCODER_CONCURRENCY,
            lookup_deadline: Duration::from_secs(DEFAULT_GEOCODER_LOOKUP_DEADLINE_SECONDS),
        }
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

impl GeocoderConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let user_agent = env::var("GEOCODER_USER_AGENT").unwrap_or(defaults.user_agent);
        if user_agent.trim().is_empty() {
            return Err("GEOCODER_USER_AGENT must not be empty".to_string());
        }

        let timeout_secs: u64 = env::var("GEOCODER_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_GEOCODER_TIMEOUT_SECONDS.to_string())
            .parse()
            .map_err(|_| "Invalid GEOCODER_TIMEOUT_SECS")?;
        if timeout_secs == 0 {
            return Err("GEOCODER_TIMEOUT_SECS must be greater than 0".to_string());
        }

        let concurrency: usize = env::var("GEOCODER_CONCURRENCY")
            .unwrap_or_else(|_| defaults.concurrency.to_string())
            .parse()
            .map_err(|_| "Invalid GEOCODER_CONCURRENCY")?;
        if !(1..=MAX_GEOCODER_CONCURRENCY).contains(&concurrency) {
            return Err(format!(
                "GEOCODER_CONCURRENCY must be between 1 and {}",
                MAX_GEOCODER_CONCURRENCY
            ));
        }

        let lookup_deadline_secs: u64 = env::var("GEOCODER_LOOKUP_DEADLINE_SECS")
            .unwrap_or_else(|_| DEFAULT_GEOCODER_LOOKUP_DEADLINE_SECONDS.to_string())
            .parse()
            .map_err(|_| "Invalid GEOCODER_LOOKUP_DEADLINE_SECS")?;
        if lookup_deadline_secs == 0 {
            return Err("GEOCODER_LOOKUP_DEADLINE_SECS must be greater than 0".to_string());
        }

        Ok(Self {
            base_url: env::var("GEOCODER_BASE_URL").unwrap_or(defaults.base_url),
            user_agent,
            timeout: Duration::from_secs(timeout_secs),
            max_retries: env::var("GEOCODER_MAX_RETRIES")
                .unwrap_or_else(|_| defaults.max_retries.to_string())
                .parse()
                .map_err(|_| "Invalid GEOCODER_MAX_RETRIES")?,
            retry_base: Duration::from_millis(
                env::var("GEOCODER_RETRY_BASE_MS")
                    .unwrap_or_else(|_| DEFAULT_GEOCODER_RETRY_BASE_MS.to_string())
                    .parse()
                    .map_err(|_| "Invalid GEOCODER_RETRY_BASE_MS")?,
            ),
            concurrency,
            lookup_deadline: Duration::from_secs(lookup_deadline_secs),
        })
    }
}

/// Keyword sets used to discover the address and institute columns of a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnKeywords {
    pub address: Vec<String>,
    pub institute: Vec<String>,
}

impl Default for ColumnKeywords {
    fn default() -> Self {
        Self {
            address: to_owned_list(DEFAULT_ADDRESS_COLUMN_KEYWORDS),
            institute: to_owned_list(DEFAULT_INSTITUTE_COLUMN_KEYWORDS),
        }
    }
}

fn to_owned_list(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|k| k.to_string()).collect()
}

/// Split a comma-separated keyword list, dropping blanks and lowercasing.
fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

impl ColumnKeywords {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let address = match env::var("ADDRESS_COLUMN_KEYWORDS") {
            Ok(raw) => parse_keywords(&raw),
            Err(_) => defaults.address,
        };
        let institute = match env::var("INSTITUTE_COLUMN_KEYWORDS") {
            Ok(raw) => parse_keywords(&raw),
            Err(_) => defaults.institute,
        };

        if address.is_empty() {
            return Err("ADDRESS_COLUMN_KEYWORDS must contain at least one keyword".to_string());
        }
        if institute.is_empty() {
            return Err("INSTITUTE_COLUMN_KEYWORDS must contain at least one keyword".to_string());
        }

        Ok(Self { address, institute })
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            geocoder: GeocoderConfig::from_env()?,
            geocode_cache_ttl: env::var("GEOCODE_CACHE_TTL")
                .unwrap_or_else(|_| DEFAULT_GEOCODE_CACHE_TTL_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid GEOCODE_CACHE_TTL")?,
            geocode_cache_max_entries: env::var("GEOCODE_CACHE_MAX_ENTRIES")
                .unwrap_or_else(|_| DEFAULT_GEOCODE_CACHE_MAX_ENTRIES.to_string())
                .parse()
                .map_err(|_| "Invalid GEOCODE_CACHE_MAX_ENTRIES")?,
            columns: ColumnKeywords::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
