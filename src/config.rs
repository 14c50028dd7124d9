use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::storage::{config_dir, default_log_path, default_presets_path, expand_tilde, project_dir};

// ---------------------------------------------------------------------------
// Top-level Config. All fields have defaults, unknown keys silently ignored.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub proxy: ProxyConfig,
    pub ssl: SslConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Timeout in seconds. 0 = no timeout.
    pub timeout: u64,
    pub follow_redirects: bool,
    pub max_redirects: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub url: Option<String>,
    pub no_proxy: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub verify: bool,
    pub ca_cert: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub presets_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            follow_redirects: true,
            max_redirects: 10,
        }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self {
            verify: true,
            ca_cert: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Overlay config: partial deserialization for field-level merging.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct OverlayConfig {
    http: OverlayHttpConfig,
    proxy: ProxyConfig,
    ssl: OverlaySslConfig,
    storage: StorageConfig,
    log: OverlayLogConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct OverlayHttpConfig {
    timeout: Option<u64>,
    follow_redirects: Option<bool>,
    max_redirects: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct OverlaySslConfig {
    verify: Option<bool>,
    ca_cert: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct OverlayLogConfig {
    file: Option<PathBuf>,
    level: Option<String>,
}

impl Config {
    /// Apply overlay values over self. Only `Some` fields are overridden.
    fn merge(mut self, overlay: OverlayConfig) -> Self {
        if let Some(v) = overlay.http.timeout {
            self.http.timeout = v;
        }
        if let Some(v) = overlay.http.follow_redirects {
            self.http.follow_redirects = v;
        }
        if let Some(v) = overlay.http.max_redirects {
            self.http.max_redirects = v;
        }
        if let Some(v) = overlay.proxy.url {
            self.proxy.url = Some(v);
        }
        if let Some(v) = overlay.proxy.no_proxy {
            self.proxy.no_proxy = Some(v);
        }
        if let Some(v) = overlay.ssl.verify {
            self.ssl.verify = v;
        }
        if let Some(v) = overlay.ssl.ca_cert {
            self.ssl.ca_cert = Some(v);
        }
        if let Some(v) = overlay.storage.presets_file {
            self.storage.presets_file = Some(v);
        }
        if let Some(v) = overlay.log.file {
            self.log.file = Some(v);
        }
        if let Some(v) = overlay.log.level {
            self.log.level = v;
        }
        self
    }

    pub fn presets_path(&self) -> Option<PathBuf> {
        self.storage.presets_file.clone().or_else(default_presets_path)
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log.file.clone().or_else(default_log_path)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ConfigError {
    pub messages: Vec<String>,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for msg in &self.messages {
            writeln!(f, "{}", msg)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.http.timeout > 600 {
            errors.push(format!(
                "config error: http.timeout = {} is out of range (0..=600)",
                self.http.timeout
            ));
        }
        if self.http.max_redirects > 100 {
            errors.push(format!(
                "config error: http.max_redirects = {} is out of range (0..=100)",
                self.http.max_redirects
            ));
        }

        if let Some(ref url) = self.proxy.url {
            if reqwest::Url::parse(url).is_err() {
                errors.push(format!(
                    "config error: proxy.url = \"{}\" is not a valid URL",
                    url
                ));
            }
        }

        if let Some(ref path) = self.ssl.ca_cert {
            if !path.exists() {
                errors.push(format!(
                    "config error: ssl.ca_cert = \"{}\": file not found",
                    path.display()
                ));
            }
        }

        if tracing_subscriber::EnvFilter::try_new(&self.log.level).is_err() {
            errors.push(format!(
                "config error: log.level = \"{}\" is not a valid filter",
                self.log.level
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError { messages: errors })
        }
    }

    /// Expand tilde in all path fields. Called after merging, before validation.
    fn expand_paths(&mut self) {
        for path in [
            &mut self.ssl.ca_cert,
            &mut self.storage.presets_file,
            &mut self.log.file,
        ]
        .into_iter()
        .flatten()
        {
            *path = expand_tilde(path);
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

const CONFIG_FILE_NAME: &str = "config.toml";

fn load_overlay(path: &Path) -> Result<OverlayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError {
        messages: vec![format!(
            "config error: could not read \"{}\": {}",
            path.display(),
            e
        )],
    })?;
    toml::from_str(&content).map_err(|e| ConfigError {
        messages: vec![format!(
            "config error: failed to parse \"{}\": {}",
            path.display(),
            e
        )],
    })
}

/// Load configuration from global and project config files.
/// Missing files are silently skipped (all defaults apply).
pub fn load_config() -> Result<Config, ConfigError> {
    let layers = [
        config_dir().map(|dir| dir.join(CONFIG_FILE_NAME)),
        project_dir().map(|dir| dir.join(CONFIG_FILE_NAME)),
    ];
    load_layers(layers.iter().flatten().map(PathBuf::as_path))
}

fn load_layers<'a>(paths: impl Iterator<Item = &'a Path>) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    for path in paths {
        if path.exists() {
            config = config.merge(load_overlay(path)?);
        }
    }
    config.expand_paths();
    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
