use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    /// Simulated delivery vendor wiring
    pub delivery: DeliveryConfig,
    /// Text-generation (AI assist) configuration
    #[serde(default)]
    pub ai: AiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Where outbound messages go and where the vendor reports outcomes.
///
/// Both endpoints point back at this service by default: the vendor is a
/// simulation hosted under `/api/v1/vendor`. A real vendor integration would
/// swap `vendor_url` and keep `receipt_url` as its callback target.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "default_vendor_url")]
    pub vendor_url: String,

    #[serde(default = "default_receipt_url")]
    pub receipt_url: String,

    /// Timeout for vendor acceptance calls and the receipt callback.
    #[serde(default = "default_delivery_timeout")]
    pub request_timeout_secs: u64,
}

/// Gemini-style text generation. Disabled unless an API key is configured.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_ai_model")]
    pub model: String,

    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_ai_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            model: default_ai_model(),
            endpoint: default_ai_endpoint(),
            request_timeout_secs: default_ai_timeout(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_vendor_url() -> String {
    "http://127.0.0.1:8080/api/v1/vendor/send-message".to_string()
}
fn default_receipt_url() -> String {
    "http://127.0.0.1:8080/api/v1/delivery-receipts".to_string()
}
fn default_delivery_timeout() -> u64 {
    10
}
fn default_ai_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_ai_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_ai_timeout() -> u64 {
    20
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with CRM__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("CRM").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// The socket address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], self.server.port)))
    }

    /// Database pool configuration for the persistence layer.
    pub fn database_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            connect_timeout_secs: self.database.connect_timeout_secs,
            idle_timeout_secs: self.database.idle_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_toml(toml: &str) -> Config {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap();
        cfg.try_deserialize().unwrap()
    }

    #[test]
    fn test_minimal_config_applies_defaults() {
        let cfg = parse_toml(
            r#"
            [server]
            [database]
            url = "postgres://localhost/minicrm"
            [logging]
            [security]
            [delivery]
            "#,
        );
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.database.max_connections, 20);
        assert_eq!(cfg.logging.format, "json");
        assert!(cfg.delivery.vendor_url.contains("/api/v1/vendor/send-message"));
        assert!(!cfg.ai.enabled);
        assert_eq!(cfg.ai.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_socket_addr() {
        let cfg = parse_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000
            [database]
            url = "postgres://localhost/minicrm"
            [logging]
            [security]
            [delivery]
            "#,
        );
        assert_eq!(cfg.socket_addr().to_string(), "127.0.0.1:9000");
    }
}
