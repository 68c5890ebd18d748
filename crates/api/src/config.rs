use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use umls::{UmlsEndpoints, DEFAULT_BASE_URL, DEFAULT_VERSION};

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub umls: UmlsConfig,
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UmlsConfig {
    pub base_url: String,
    pub version: String,
    /// Used when the page leaves the key field blank.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            umls: UmlsConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                version: DEFAULT_VERSION.to_string(),
                api_key: None,
            },
            server: ServerConfig {
                bind_addr: "0.0.0.0:3000".to_string(),
            },
            http: HttpConfig {
                request_timeout_secs: 30,
            },
            log: LogConfig {
                format: LogFormat::Pretty,
            },
        }
    }
}

impl AppConfig {
    /// Read `UMLS_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        config.umls.api_key = get("UMLS_API_KEY");
        if let Some(base_url) = get("UMLS_BASE_URL") {
            config.umls.base_url = base_url;
        }
        if let Some(version) = get("UMLS_VERSION") {
            config.umls.version = version;
        }
        if let Some(bind_addr) = get("UMLS_BIND_ADDR") {
            config.server.bind_addr = bind_addr;
        }
        if let Some(timeout) = get("UMLS_REQUEST_TIMEOUT_SECS") {
            config.http.request_timeout_secs = timeout
                .parse()
                .with_context(|| format!("UMLS_REQUEST_TIMEOUT_SECS is not a number: {}", timeout))?;
        }
        if let Some(format) = get("UMLS_LOG_FORMAT") {
            config.log.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" | "text" => LogFormat::Pretty,
                other => anyhow::bail!("UMLS_LOG_FORMAT must be json or pretty, got {}", other),
            };
        }

        Ok(config)
    }

    pub fn endpoints(&self) -> UmlsEndpoints {
        UmlsEndpoints::new(&self.umls.base_url, &self.umls.version)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.request_timeout_secs)
    }
}
