use std::io;
use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub suggestions: SuggestionsConfig,
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

/// Where the slot files live and how much they may hold in total.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self { Self { data_dir: default_data_dir(), quota_bytes: default_quota_bytes() } }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionsConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_suggestion_timeout")]
    pub timeout_secs: u64,
}

impl Default for SuggestionsConfig {
    fn default() -> Self { Self { endpoint: None, timeout_secs: default_suggestion_timeout() } }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// `compact` or `json`
    #[serde(default)]
    pub format: Option<String>,
}

fn default_data_dir() -> PathBuf { PathBuf::from("data/slots") }
fn default_quota_bytes() -> usize { 5 * 1024 * 1024 }
fn default_suggestion_timeout() -> u64 { 20 }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

/// `Ok(None)` only when the file does not exist; unreadable or malformed files are errors.
pub fn load_optional(path: &str) -> Result<Option<AppConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content).map(Some).map_err(|e| anyhow!("{path}: {e}")),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow!("cannot read {path}: {e}")),
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file if present, otherwise defaults overridden by environment variables.
    pub fn load_and_validate() -> Result<Self> { Self::load_and_validate_from(&config_path()) }

    pub fn load_and_validate_from(path: &str) -> Result<Self> {
        // 仅当文件不存在时回退到环境变量；格式错误直接返回错误
        let mut cfg = match load_optional(path)? {
            Some(cfg) => cfg,
            None => Self::from_env(),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Defaults plus `SERVER_HOST`, `SERVER_PORT`, `DATA_DIR`, `SUGGESTIONS_URL`, `LOG_FORMAT`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Ok(dir) = std::env::var("DATA_DIR") {
            cfg.storage.data_dir = PathBuf::from(dir);
        }
        cfg.logging.format = std::env::var("LOG_FORMAT").ok();
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        self.suggestions.normalize_from_env();
        self.suggestions.validate()?;
        Ok(())
    }
}

impl ServerConfig {
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

    pub fn bind_addr(&self) -> String { format!("{}:{}", self.host, self.port) }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        if self.quota_bytes == 0 {
            return Err(anyhow!("storage.quota_bytes must be > 0"));
        }
        Ok(())
    }
}

impl SuggestionsConfig {
    pub fn normalize_from_env(&mut self) {
        // 配置文件未指定时，从环境变量 SUGGESTIONS_URL 读取
        let missing = self.endpoint.as_deref().map_or(true, |e| e.trim().is_empty());
        if missing {
            self.endpoint = std::env::var("SUGGESTIONS_URL").ok().filter(|u| !u.trim().is_empty());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            let lower = endpoint.to_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                return Err(anyhow!("suggestions.endpoint must start with http:// or https://"));
            }
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("suggestions.timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}
