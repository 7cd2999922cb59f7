//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Listing search configuration.
    #[serde(default)]
    pub search: SearchConfig,
    /// Outbound email configuration. Email is disabled when absent.
    #[serde(default)]
    pub email: Option<EmailConfig>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of the marketplace front end (used in email links).
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// What the listing search does with a category slug that does not resolve
/// to an active category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategoryPolicy {
    /// Drop the category constraint and search all published listings.
    #[default]
    Ignore,
    /// Return an empty result set.
    MatchNothing,
}

/// Listing search configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Page size used when the caller does not supply one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Handling of unresolvable category slugs.
    #[serde(default)]
    pub unknown_category: UnknownCategoryPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            unknown_category: UnknownCategoryPolicy::default(),
        }
    }
}

/// Hosted email API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Endpoint that accepts a JSON send request.
    #[serde(default = "default_email_endpoint")]
    pub api_url: String,
    /// Bearer API key.
    pub api_key: String,
    /// Sender address.
    pub from_address: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_page_size() -> u64 {
    12
}

fn default_email_endpoint() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_from_name() -> String {
    "bizlist".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (via dotenvy, if present)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `BIZLIST_ENV`)
    /// 4. Environment variables with `BIZLIST__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("BIZLIST_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BIZLIST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("BIZLIST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = from_toml(
            r#"
            [server]
            url = "https://bizlist.example"

            [database]
            url = "postgres://localhost/bizlist"
            "#,
        );

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.search.default_page_size, 12);
        assert_eq!(config.search.unknown_category, UnknownCategoryPolicy::Ignore);
        assert!(config.email.is_none());
    }

    #[test]
    fn test_unknown_category_policy_parses() {
        let config = from_toml(
            r#"
            [server]
            url = "https://bizlist.example"

            [database]
            url = "postgres://localhost/bizlist"

            [search]
            unknown_category = "match_nothing"

            [email]
            api_key = "key"
            from_address = "noreply@bizlist.example"
            "#,
        );

        assert_eq!(
            config.search.unknown_category,
            UnknownCategoryPolicy::MatchNothing
        );
        let email = config.email.unwrap();
        assert_eq!(email.api_url, "https://api.resend.com/emails");
        assert_eq!(email.from_name, "bizlist");
    }
}
