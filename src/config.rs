use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{ApplicationThresholds, MatchWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub tables: TableSettings,
    pub auth: AuthSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub application: ApplicationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Hosted backend REST endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    pub url: String,
    pub api_key: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_profiles_table")]
    pub profiles: String,
    #[serde(default = "default_applications_table")]
    pub provider_applications: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            profiles: default_profiles_table(),
            provider_applications: default_applications_table(),
        }
    }
}

fn default_profiles_table() -> String { "profiles".to_string() }
fn default_applications_table() -> String { "provider_applications".to_string() }

/// Hosted auth provider token settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub audience: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    pub max_limit: Option<u16>,
    /// Providers fetched from the profile store per ranking request
    pub candidate_pool: Option<usize>,
    pub min_score: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_industry_weight")]
    pub industry_match: f64,
    #[serde(default = "default_platform_weight")]
    pub platform_match: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
    #[serde(default = "default_revenue_weight")]
    pub revenue_match: f64,
    #[serde(default = "default_goal_weight")]
    pub goal_match: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            industry_match: default_industry_weight(),
            platform_match: default_platform_weight(),
            experience: default_experience_weight(),
            revenue_match: default_revenue_weight(),
            goal_match: default_goal_weight(),
        }
    }
}

impl From<&WeightsConfig> for MatchWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            industry_match: config.industry_match,
            platform_match: config.platform_match,
            experience: config.experience,
            revenue_match: config.revenue_match,
            goal_match: config.goal_match,
        }
    }
}

fn default_industry_weight() -> f64 { 40.0 }
fn default_platform_weight() -> f64 { 20.0 }
fn default_experience_weight() -> f64 { 15.0 }
fn default_revenue_weight() -> f64 { 15.0 }
fn default_goal_weight() -> f64 { 10.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    #[serde(default = "default_auto_approve")]
    pub auto_approve: u8,
    #[serde(default = "default_premium")]
    pub premium: u8,
    #[serde(default = "default_verified")]
    pub verified: u8,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            auto_approve: default_auto_approve(),
            premium: default_premium(),
            verified: default_verified(),
        }
    }
}

impl From<&ApplicationSettings> for ApplicationThresholds {
    fn from(config: &ApplicationSettings) -> Self {
        Self {
            auto_approve: config.auto_approve,
            premium: config.premium,
            verified: config.verified,
        }
    }
}

fn default_auto_approve() -> u8 { 85 }
fn default_premium() -> u8 { 85 }
fn default_verified() -> u8 { 70 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CONNECT_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CONNECT__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CONNECT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("CONNECT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject secrets that are empty or still hold a `${VAR}` placeholder
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("auth.jwt_secret", &self.auth.jwt_secret),
            ("backend.api_key", &self.backend.api_key),
        ] {
            let value = value.trim();
            if value.is_empty() || value.contains("${") {
                return Err(ConfigError::Message(format!(
                    "{} is not set; provide it through the environment",
                    key
                )));
            }
        }

        Ok(())
    }
}

/// Apply the conventional unprefixed variables used by the deployment
///
/// `DATABASE_URL`, `REDIS_URL`, `BACKEND_URL`, `BACKEND_API_KEY` and
/// `AUTH_JWT_SECRET` take precedence over file values when set.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("DATABASE_URL", "database.url"),
        ("REDIS_URL", "cache.redis_url"),
        ("BACKEND_URL", "backend.url"),
        ("BACKEND_API_KEY", "backend.api_key"),
        ("AUTH_JWT_SECRET", "auth.jwt_secret"),
    ];

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
