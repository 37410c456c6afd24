//! TOML configuration for the gateway and the engine.
//!
//! Every field has a default, so an absent file or an empty one is valid.
//! Command-line flags are applied on top via [`Config::with_overrides`].
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0"
//! port = 5000
//! request_timeout_secs = 30
//!
//! [engine]
//! max_end = 50000000
//! max_end_division = 5000000
//! ```

use crate::engine::{
    PrimeEngine, DEFAULT_MAX_END, DEFAULT_MAX_END_DIVISION, MAX_END_CEILING,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// The `[server]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout_secs: 30,
        }
    }
}

/// The `[engine]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Largest accepted range end for the sieves.
    pub max_end: u64,
    /// Largest accepted range end for trial division and the wheel.
    pub max_end_division: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_end: DEFAULT_MAX_END,
            max_end_division: DEFAULT_MAX_END_DIVISION,
        }
    }
}

/// CLI values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub max_end: Option<u64>,
    pub max_end_division: Option<u64>,
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("invalid config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                Self::parse(&text).with_context(|| format!("loading config {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("engine.max_end", self.engine.max_end),
            ("engine.max_end_division", self.engine.max_end_division),
        ] {
            if value < 2 {
                anyhow::bail!("{} must be at least 2 (got {})", key, value);
            }
            if value > MAX_END_CEILING {
                anyhow::bail!(
                    "{} must be at most {} (got {})",
                    key,
                    MAX_END_CEILING,
                    value
                );
            }
        }
        if self.server.request_timeout_secs == 0 {
            anyhow::bail!("server.request_timeout_secs must be positive");
        }
        if self.server.bind.trim().is_empty() {
            anyhow::bail!("server.bind must not be empty");
        }
        Ok(())
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(bind) = overrides.bind {
            self.server.bind = bind;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(max_end) = overrides.max_end {
            self.engine.max_end = max_end;
        }
        if let Some(max_end_division) = overrides.max_end_division {
            self.engine.max_end_division = max_end_division;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn engine(&self) -> PrimeEngine {
        PrimeEngine::new(self.engine.max_end)
            .with_division_limit(self.engine.max_end_division)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.engine.max_end, DEFAULT_MAX_END);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = Config::parse("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.engine.max_end, DEFAULT_MAX_END);
    }

    #[test]
    fn full_document() {
        let config = Config::parse(
            r#"
            [server]
            bind = "127.0.0.1"
            port = 7001
            request_timeout_secs = 5

            [engine]
            max_end = 1000000
            max_end_division = 20000
            "#,
        )
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:7001");
        assert_eq!(config.server.request_timeout_secs, 5);
        assert_eq!(config.engine().max_end(), 1_000_000);
        assert_eq!(config.engine().max_end_division(), 20_000);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("[server]\nprot = 1\n").is_err());
        assert!(Config::parse("[database]\nurl = \"x\"\n").is_err());
    }

    #[test]
    fn validation_rejects_degenerate_values() {
        assert!(Config::parse("[engine]\nmax_end = 1\n").is_err());
        assert!(Config::parse("[engine]\nmax_end_division = 0\n").is_err());
        assert!(Config::parse("[server]\nrequest_timeout_secs = 0\n").is_err());
        assert!(Config::parse("[server]\nbind = \"  \"\n").is_err());
    }

    #[test]
    fn validation_caps_limits() {
        let err = Config::parse("[engine]\nmax_end = 10000000000\n").unwrap_err();
        assert!(format!("{:#}", err).contains("at most"));
        let result = Config::default().with_overrides(Overrides {
            max_end_division: Some(MAX_END_CEILING + 1),
            ..Default::default()
        });
        assert!(result.is_err());
        let config =
            Config::parse(&format!("[engine]\nmax_end = {}\n", MAX_END_CEILING)).unwrap();
        assert_eq!(config.engine().max_end(), MAX_END_CEILING);
    }

    #[test]
    fn default_division_limit_is_lower() {
        let engine = Config::default().engine();
        assert_eq!(engine.max_end(), DEFAULT_MAX_END);
        assert_eq!(engine.max_end_division(), DEFAULT_MAX_END_DIVISION);
    }

    #[test]
    fn overrides_take_precedence() {
        let config = Config::parse("[server]\nport = 8080\n[engine]\nmax_end = 500\n")
            .unwrap()
            .with_overrides(Overrides {
                port: Some(9000),
                max_end: Some(10_000),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.engine.max_end, 10_000);
        assert_eq!(config.server.bind, "0.0.0.0");
    }

    #[test]
    fn overrides_are_validated() {
        let result = Config::default().with_overrides(Overrides {
            max_end: Some(0),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nmax_end = 12345").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.engine.max_end, 12_345);
    }

    #[test]
    fn load_without_path_is_default() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(Config::load(Some(Path::new("/nonexistent/primegen.toml"))).is_err());
    }
}
