use std::io::ErrorKind;

use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    /// Run pending migrations when the server starts.
    #[serde(default = "default_true")]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            auto_migrate: true,
        }
    }
}

/// Read-through cache settings for recipe list/detail results.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true, ttl_secs: default_cache_ttl(), max_capacity: default_cache_capacity() }
    }
}

/// Where recipe images live on disk; `recipe_image` paths are relative to `root`.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_root")]
    pub root: String,
}

impl Default for MediaConfig {
    fn default() -> Self { Self { root: default_media_root() } }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { format: default_log_format() } }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_true() -> bool { true }
fn default_cache_ttl() -> u64 { 300 }
fn default_cache_capacity() -> u64 { 10_000 }
fn default_media_root() -> String { "media".into() }
fn default_log_format() -> String { "compact".into() }

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

/// Parse the file at `path`; a missing file yields defaults overlaid with environment variables.
/// A file that exists but cannot be read or parsed is an error.
pub fn read_or_default(path: &str) -> Result<AppConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content).map_err(|e| anyhow!("invalid config file {path}: {e}")),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let mut cfg = AppConfig::default();
            cfg.server.apply_env();
            Ok(cfg)
        }
        Err(e) => Err(anyhow!("cannot read config file {path}: {e}")),
    }
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file if present, otherwise defaults overlaid with environment variables.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = read_or_default(&config_path())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        // URL may come from DATABASE_URL
        self.database.normalize_from_env();
        self.database.validate()?;
        self.cache.validate()?;
        if self.media.root.trim().is_empty() {
            self.media.root = default_media_root();
        }
        Ok(())
    }
}

impl ServerConfig {
    fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.worker_threads = Some(w);
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.ttl_secs == 0 {
            return Err(anyhow!("cache.ttl_secs must be > 0 when the cache is enabled"));
        }
        if self.enabled && self.max_capacity == 0 {
            return Err(anyhow!("cache.max_capacity must be > 0 when the cache is enabled"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [server]
        host = "0.0.0.0"
        port = 9000

        [database]
        url = "postgres://u:p@localhost:5432/recipes"
        max_connections = 5
        min_connections = 1

        [cache]
        ttl_secs = 60
    "#;

    #[test]
    fn parses_sections_and_fills_defaults() {
        let cfg = parse(SAMPLE).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.database.acquire_timeout_secs, 30);
        assert!(cfg.database.auto_migrate);
        assert!(cfg.cache.enabled);
        assert_eq!(cfg.cache.ttl_secs, 60);
        assert_eq!(cfg.cache.max_capacity, 10_000);
        assert_eq!(cfg.media.root, "media");
        assert_eq!(cfg.logging.format, "compact");
    }

    #[test]
    fn validation_accepts_sample() {
        let mut cfg = parse(SAMPLE).unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn rejects_non_postgres_url() {
        let mut cfg = parse(&SAMPLE.replace("postgres://u:p@localhost:5432/recipes", "mysql://x")).unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn rejects_inverted_pool_bounds() {
        let mut db = parse(SAMPLE).unwrap().database;
        db.min_connections = 8;
        db.max_connections = 2;
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_zero_ttl_only_when_enabled() {
        let mut cache = CacheConfig { ttl_secs: 0, ..CacheConfig::default() };
        assert!(cache.validate().is_err());
        cache.enabled = false;
        assert!(cache.validate().is_ok());
    }

    fn temp_config(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("recipe-config-{}-{}.toml", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("recipe-config-{}-absent.toml", std::process::id()));
        let cfg = read_or_default(&path.to_string_lossy()).unwrap();
        assert_eq!(cfg.cache.ttl_secs, 300);
        assert_eq!(cfg.media.root, "media");
    }

    #[test]
    fn unparsable_file_is_an_error_not_defaults() {
        // `[server]` without the required port
        let path = temp_config("broken", "[server]\nhost = \"0.0.0.0\"\n\n[cache]\nttl_secs = 60\n");
        let err = read_or_default(&path.to_string_lossy()).unwrap_err();
        assert!(err.to_string().contains("invalid config file"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn existing_file_values_are_kept() {
        let path = temp_config("valid", "[server]\nhost = \"0.0.0.0\"\nport = 9100\n\n[cache]\nttl_secs = 60\n");
        let cfg = read_or_default(&path.to_string_lossy()).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.cache.ttl_secs, 60);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn example_config_is_valid() {
        let mut cfg = parse(include_str!("../../../config.example.toml")).unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.logging.format, "compact");
    }
}
