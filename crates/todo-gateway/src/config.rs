//! Gateway configuration

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of environment variables that override configuration
pub const ENV_PREFIX: &str = "TODO";

/// Gateway server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Use in-memory storage (for testing/development)
    pub use_memory_store: bool,
    /// Enable authentication
    pub auth_enabled: bool,
    /// PEM certificate used instead of the embedded one
    pub jwt_certificate_path: Option<PathBuf>,
    /// Required token issuer
    pub jwt_issuer: Option<String>,
    /// Required token audience
    pub jwt_audience: Option<String>,
    /// DynamoDB table holding todo items
    pub todos_table: String,
    /// S3 bucket receiving attachments
    pub attachments_bucket: String,
    /// Custom S3 endpoint (MinIO, LocalStack)
    pub attachments_endpoint: Option<String>,
    /// AWS region; the SDK default chain is used when unset
    pub aws_region: Option<String>,
    /// Lifetime of attachment upload URLs (seconds)
    pub upload_url_expiry_secs: u64,
    /// Rate limit (requests per second per user)
    pub rate_limit_rps: u32,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
    /// Enable CORS
    pub cors_enabled: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            use_memory_store: false,
            jwt_certificate_path: None,
            jwt_issuer: None,
            jwt_audience: None,
            auth_enabled: true,
            todos_table: "Todos".to_string(),
            attachments_bucket: "todo-attachments".to_string(),
            attachments_endpoint: None,
            aws_region: None,
            upload_url_expiry_secs: 300,
            rate_limit_rps: 100,
            max_body_size: 64 * 1024, // 64 KB
            cors_enabled: true,
        }
    }
}

impl GatewayConfig {
    /// Load configuration: defaults, then an optional TOML file, then
    /// `TODO_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Lifetime of attachment upload URLs
    pub fn upload_url_expiry(&self) -> Duration {
        Duration::from_secs(self.upload_url_expiry_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();

        assert!(config.auth_enabled);
        assert!(!config.use_memory_store);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.upload_url_expiry(), Duration::from_secs(300));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
port = 8080
todos_table = "Todos-dev"
use_memory_store = true
jwt_issuer = "https://issuer.example/"
"#
        )
        .unwrap();

        let config = GatewayConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.todos_table, "Todos-dev");
        assert!(config.use_memory_store);
        assert_eq!(config.jwt_issuer.as_deref(), Some("https://issuer.example/"));
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = GatewayConfig::load(Some(Path::new("/nonexistent/todo-gateway.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_environment_overrides() {
        std::env::set_var("TODO_UPLOAD_URL_EXPIRY_SECS", "900");
        let config = GatewayConfig::load(None).unwrap();
        std::env::remove_var("TODO_UPLOAD_URL_EXPIRY_SECS");

        assert_eq!(config.upload_url_expiry_secs, 900);
    }
}
