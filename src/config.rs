use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

/// Command line options for the relay server.
#[derive(Parser, Debug, Default)]
pub struct Cli {
    /// Override bind address (host:port).
    #[arg(long)]
    pub bind: Option<String>,
    /// Override server port.
    #[arg(long)]
    pub port: Option<u16>,
    /// Enable or disable logging (true/false).
    #[arg(long)]
    pub logging: Option<bool>,
    /// Path to configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Settings for the AI suggestion relay.
#[derive(Clone)]
pub struct SuggestConfig {
    /// Upstream API key. The relay answers with the fallback string when
    /// it is absent.
    pub api_key: Option<String>,
    /// Base URL of the generateContent endpoint.
    pub api_url: String,
    /// Model identifier sent upstream.
    pub model: String,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
        }
    }
}

impl std::fmt::Debug for SuggestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Runtime configuration resolved from file, env and CLI.
#[derive(Clone, Debug)]
pub struct Config {
    /// Address to bind the HTTP server to.
    pub bind: String,
    /// Whether verbose logging is enabled.
    pub logging_enabled: bool,
    /// AI suggestion relay settings.
    pub suggest: SuggestConfig,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    server: FileServer,
    #[serde(default)]
    logging: FileLogging,
    #[serde(default)]
    suggest: FileSuggest,
}

#[derive(Deserialize)]
struct FileServer {
    #[serde(default = "default_port")]
    port: u16,
}

#[derive(Deserialize)]
struct FileLogging {
    #[serde(default = "default_logging")]
    enabled: bool,
}

#[derive(Deserialize, Default)]
struct FileSuggest {
    api_key: Option<String>,
    api_url: Option<String>,
    model: Option<String>,
}

fn default_port() -> u16 {
    4000
}

fn default_logging() -> bool {
    true
}

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

impl Default for FileServer {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for FileLogging {
    fn default() -> Self {
        Self {
            enabled: default_logging(),
        }
    }
}

impl Config {
    /// Resolve configuration from CLI, environment variables, config file
    /// and defaults, in that order of precedence.
    pub fn load(cli: &Cli) -> Result<Self> {
        // built-in defaults
        let mut port = default_port();
        let mut logging = default_logging();
        let mut suggest = SuggestConfig::default();

        // config file path precedence: CLI -> ENV -> default
        let config_path = cli
            .config
            .clone()
            .or_else(|| std::env::var("CODECOLLAB_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("config/codecollab.toml"));

        if let Ok(bytes) = fs::read(&config_path) {
            let contents = String::from_utf8_lossy(&bytes);
            let file_cfg: FileConfig = toml::from_str(&contents).context("invalid config file")?;
            port = file_cfg.server.port;
            logging = file_cfg.logging.enabled;
            if let Some(key) = file_cfg.suggest.api_key {
                suggest.api_key = Some(key);
            }
            if let Some(url) = file_cfg.suggest.api_url {
                suggest.api_url = url;
            }
            if let Some(model) = file_cfg.suggest.model {
                suggest.model = model;
            }
        }

        // environment overrides
        if let Ok(p) = std::env::var("PORT") {
            if let Ok(p) = p.parse::<u16>() {
                port = p;
            }
        }
        if let Ok(l) = std::env::var("CODECOLLAB_LOGGING") {
            if let Ok(l) = l.parse::<bool>() {
                logging = l;
            }
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            suggest.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("GEMINI_API_URL") {
            suggest.api_url = url;
        }

        // CLI overrides
        if let Some(p) = cli.port {
            port = p;
        }
        if let Some(l) = cli.logging {
            logging = l;
        }

        // validate port range
        if !(1024..=65535).contains(&port) {
            anyhow::bail!("invalid_port");
        }

        // bind address precedence for host override
        let bind = if let Some(b) = &cli.bind {
            b.clone()
        } else if let Ok(b) = std::env::var("BIND") {
            b
        } else {
            format!("127.0.0.1:{}", port)
        };

        Ok(Self {
            bind,
            logging_enabled: logging,
            suggest,
        })
    }
}
