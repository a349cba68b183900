//! Server configuration, loadable from TOML with environment overrides.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Snapshot file holding the whole fleet state.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Only reports from this channel are ingested. None accepts all.
    #[serde(default)]
    pub channel_id: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./data.json")
}

impl ServerConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from the optional file, then apply environment overrides.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `PM_HOST`, `PM_PORT`, `PM_DATA_FILE` and `CHANNEL_ID` from `lookup`.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        if let Some(host) = lookup("PM_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PM_PORT") {
            self.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PM_PORT '{port}': {e}"))?;
        }
        if let Some(data_file) = lookup("PM_DATA_FILE") {
            self.data_file = PathBuf::from(data_file);
        }
        if let Some(channel_id) = lookup("CHANNEL_ID").filter(|c| !c.is_empty()) {
            self.channel_id = Some(channel_id);
        }
        Ok(self)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_file: default_data_file(),
            channel_id: None,
        }
    }
}
