// Configuration module entry point
// Layered settings (defaults, config file, environment) and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::ServerError;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, CorsConfig, HealthConfig, HttpConfig, LogFormat, LoggingConfig, PerformanceConfig,
    ServerConfig,
};

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "NMBK_CONFIG";
/// Prefix for environment overrides, e.g. `NMBK_SERVER__PORT=9090`
pub const ENV_PREFIX: &str = "NMBK";

impl Config {
    /// Load configuration from `$NMBK_CONFIG`, falling back to `config.toml`
    pub fn load() -> Result<Self, ServerError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config".to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (extension optional)
    /// A missing file is not an error; defaults and environment still apply
    pub fn load_from(config_path: &str) -> Result<Self, ServerError> {
        Self::load_layered(config_path, None)
    }

    fn load_layered(
        config_path: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ServerError> {
        // Values stay strings; typed fields convert on deserialize and CORS
        // lists split on commas
        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .source(env);

        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.shutdown_grace_period", 10)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "text")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", concat!("nmbk-backend/", env!("CARGO_PKG_VERSION")))?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("cors.path_pattern", "/api/**")?
            .set_default(
                "cors.allowed_origins",
                vec!["http://localhost:5173", "http://localhost:3000"],
            )?
            .set_default(
                "cors.allowed_methods",
                vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"],
            )?
            .set_default("cors.allowed_headers", vec!["*"])?
            .set_default("cors.allow_credentials", true)?
            .set_default("cors.max_age", 1800)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(environment)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let address = format!("{}:{}", self.server.host, self.server.port);
        address
            .parse()
            .map_err(|source| ServerError::InvalidAddress { address, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::load_layered("does-not-exist", env(&[])).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.server.shutdown_grace_period, 10);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.format, LogFormat::Text);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.performance.keep_alive_timeout, 75);
        assert_eq!(cfg.performance.read_timeout, 30);
        assert_eq!(cfg.performance.write_timeout, 30);
        assert_eq!(cfg.performance.max_connections, None);
        assert!(cfg.http.server_name.starts_with("nmbk-backend/"));
        assert_eq!(cfg.http.max_body_size, 1_048_576);
        assert_eq!(cfg.cors.max_age, 1800);
        assert_eq!(
            cfg.cors.allowed_origins,
            ["http://localhost:5173", "http://localhost:3000"]
        );
        assert_eq!(
            cfg.cors.allowed_methods,
            ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
        );
        assert_eq!(cfg.cors.allowed_headers, ["*"]);
        assert!(cfg.cors.allow_credentials);
        assert_eq!(cfg.cors.path_pattern, "/api/**");
        assert!(cfg.health.enabled);
        assert_eq!(cfg.health.liveness_path, "/healthz");
    }

    #[test]
    fn test_environment_overrides() {
        let cfg = Config::load_layered(
            "does-not-exist",
            env(&[
                ("NMBK_SERVER__PORT", "9090"),
                ("NMBK_SERVER__WORKERS", "4"),
                ("NMBK_LOGGING__FORMAT", "json"),
                ("NMBK_CORS__ALLOW_CREDENTIALS", "false"),
                (
                    "NMBK_CORS__ALLOWED_ORIGINS",
                    "https://nmbk.example, https://www.nmbk.example",
                ),
                ("NMBK_CORS__ALLOWED_METHODS", "GET"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.workers, Some(4));
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert!(!cfg.cors.allow_credentials);
        assert_eq!(
            cfg.cors.allowed_origins,
            ["https://nmbk.example", "https://www.nmbk.example"]
        );
        assert_eq!(cfg.cors.allowed_methods, ["GET"]);
    }

    #[test]
    fn test_numeric_looking_strings_survive() {
        let cfg = Config::load_layered(
            "does-not-exist",
            env(&[
                ("NMBK_HTTP__SERVER_NAME", "1.0"),
                ("NMBK_LOGGING__LEVEL", "1"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.http.server_name, "1.0");
        assert_eq!(cfg.logging.level, "1");
    }

    #[test]
    fn test_file_overrides() {
        let path = std::env::temp_dir().join(format!("nmbk-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nport = 7070\nworkers = 2\n\n[health]\nenabled = false").unwrap();
        drop(file);

        let cfg = Config::load_layered(path.to_str().unwrap(), env(&[])).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(cfg.server.port, 7070);
        assert_eq!(cfg.server.workers, Some(2));
        assert!(!cfg.health.enabled);
        assert_eq!(cfg.health.liveness_path, "/healthz");
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load_layered("does-not-exist", env(&[])).unwrap();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8080);

        cfg.server.host = "not a host".to_string();
        assert!(matches!(
            cfg.get_socket_addr(),
            Err(ServerError::InvalidAddress { .. })
        ));
    }
}
