use anyhow::Result;
use serde::Deserialize;
use anyhow::{anyhow, Context};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
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
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Settings for the AMap geocoding client.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self { base_url: default_geocoder_base_url(), key: String::new(), timeout_secs: default_geocoder_timeout() }
    }
}

fn default_geocoder_base_url() -> String { "https://restapi.amap.com".into() }
fn default_geocoder_timeout() -> u64 { 5 }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `CONFIG_PATH` (default `config.toml`), normalize and validate.
    /// Only a missing file falls back to defaults plus environment.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => load_from_str(&content).with_context(|| format!("parsing {path}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
            Err(e) => return Err(anyhow!("reading {path}: {e}")),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.geocoder.normalize_from_env();
        self.geocoder.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
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
        // TOML wins; DATABASE_URL only fills an empty url
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

impl GeocoderConfig {
    pub fn normalize_from_env(&mut self) {
        if self.key.trim().is_empty() {
            if let Ok(key) = std::env::var("AMAP_KEY") {
                self.key = key;
            }
        }
        let trimmed = self.base_url.trim().trim_end_matches('/');
        self.base_url = if trimmed.is_empty() { default_geocoder_base_url() } else { trimmed.to_string() };
    }

    pub fn validate(&self) -> Result<()> {
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("geocoder.base_url must be an http(s) url"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("geocoder.timeout_secs must be positive"));
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
        url = "postgres://app:secret@db:5432/customer"
        max_connections = 16

        [geocoder]
        base_url = "http://geo.local/"
        key = "k-123"
    "#;

    #[test]
    fn parses_sections_and_fills_defaults() {
        let cfg = load_from_str(SAMPLE).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.worker_threads, None);
        assert_eq!(cfg.database.max_connections, 16);
        assert_eq!(cfg.database.min_connections, 2);
        assert_eq!(cfg.geocoder.timeout_secs, 5);
    }

    #[test]
    fn normalize_trims_base_url_and_defaults_threads() {
        let mut cfg = load_from_str(SAMPLE).unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.geocoder.base_url, "http://geo.local");
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn rejects_non_postgres_url() {
        let db = DatabaseConfig { url: "mysql://x".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_inverted_pool_bounds() {
        let db = DatabaseConfig {
            url: "postgres://localhost/x".into(),
            min_connections: 5,
            max_connections: 2,
            ..DatabaseConfig::default()
        };
        assert!(db.validate().is_err());
    }

    #[test]
    fn geocoder_requires_http_scheme() {
        let g = GeocoderConfig { base_url: "ftp://geo".into(), ..GeocoderConfig::default() };
        assert!(g.validate().is_err());
        assert!(GeocoderConfig::default().validate().is_ok());
    }

    fn scratch_file(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("address-book-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn malformed_file_is_an_error_not_defaults() {
        let path = scratch_file("malformed", "[server]\nport = \"not a number\"\n");
        let res = AppConfig::load_or_env_from(&path);
        let _ = std::fs::remove_file(&path);
        let err = res.unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }

    #[test]
    fn file_values_are_used_when_present() {
        let path = scratch_file("valid", SAMPLE);
        let res = AppConfig::load_or_env_from(&path);
        let _ = std::fs::remove_file(&path);
        let cfg = res.unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.geocoder.key, "k-123");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("address-book-definitely-absent.toml");
        let res = AppConfig::load_or_env_from(&path.to_string_lossy());
        // database.url may be absent from the environment; only the fallback matters here
        match res {
            Ok(cfg) => assert_eq!(cfg.server.port, 8080),
            Err(e) => assert!(e.to_string().contains("database.url"), "unexpected: {e:#}"),
        }
    }
}
