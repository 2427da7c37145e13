//! Process configuration loaded from the environment

use crate::cache::CacheConfig;
use crate::error::{CoreError, Result};
use crate::rotator::{Credential, RotatorConfig};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Upper bound on numbered credential entries scanned
const MAX_NUMBERED_CREDENTIALS: usize = 64;

/// Everything needed to build a [`CoreContext`](crate::context::CoreContext)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Vec<Credential>,
    pub rotator: RotatorConfig,
    pub cache: CacheConfig,
    pub user_data_dir: PathBuf,
}

impl AppConfig {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            debug!("Loaded environment from {:?}", path);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    ///
    /// Credentials come from `CREDENTIAL_1..CREDENTIAL_n` (stopping at the
    /// first missing index). When none are numbered, a single `CREDENTIAL`
    /// entry is used, then `GOOGLE_API_KEY`. An empty credential list is
    /// accepted here and rejected when the rotator is built.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = load_credentials(&lookup);

        let hard_limit = parse_or(&lookup, "RATE_LIMIT_PER_MINUTE", 15u32)?;
        let safe_ratio = parse_or(&lookup, "RATE_LIMIT_SAFE_RATIO", 0.8f64)?;
        let rotator = RotatorConfig::builder()
            .hard_limit(hard_limit)
            .safe_ratio(safe_ratio)
            .build();
        rotator.validate().map_err(CoreError::ConfigError)?;

        let ttl_secs = parse_or(&lookup, "CACHE_TTL_SECONDS", 300u64)?;
        let cache = CacheConfig::builder().ttl(Duration::from_secs(ttl_secs)).build();
        cache.validate().map_err(CoreError::ConfigError)?;

        let user_data_dir = non_empty(&lookup, "USER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("user_data"));

        Ok(Self {
            credentials,
            rotator,
            cache,
            user_data_dir,
        })
    }
}

fn load_credentials<F>(lookup: &F) -> Vec<Credential>
where
    F: Fn(&str) -> Option<String>,
{
    let mut credentials = vec![];
    for i in 1..=MAX_NUMBERED_CREDENTIALS {
        match lookup(&format!("CREDENTIAL_{}", i)) {
            Some(token) if !token.trim().is_empty() => {
                credentials.push(Credential::new(format!("credential_{}", i), token.trim()));
            }
            Some(_) => continue,
            None => break,
        }
    }

    if credentials.is_empty() {
        let fallback =
            non_empty(lookup, "CREDENTIAL").or_else(|| non_empty(lookup, "GOOGLE_API_KEY"));
        if let Some(token) = fallback {
            credentials.push(Credential::new("default", token));
        }
    }

    debug!("Loaded {} credential(s)", credentials.len());
    credentials
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match non_empty(lookup, key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| CoreError::ConfigError(format!("invalid value for {}: {:?}", key, raw))),
        None => Ok(default),
    }
}
