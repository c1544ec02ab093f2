use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::codec::DecodeMode;
use crate::constants::{
    CONFIG_PATH_ENV, DECODE_MODE_ENV, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TARGET_EVENT,
    PUBLISH_URL_ENV, REQUEST_TIMEOUT_ENV, TARGET_EVENT_ENV,
};
use crate::error::{Result, RouterError};

/// Runtime settings, read once at process start.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Sink endpoint. `None` is a legitimate state: the probe reports it.
    pub publish_url: Option<String>,
    pub target_event: String,
    pub request_timeout_secs: u64,
    pub decode_mode: DecodeMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            publish_url: None,
            target_event: DEFAULT_TARGET_EVENT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            decode_mode: DecodeMode::Strict,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    router: RouterSection,
}

#[derive(Debug, Default, Deserialize)]
struct RouterSection {
    publish_url: Option<String>,
    target_event: Option<String>,
    request_timeout_secs: Option<u64>,
    decode_mode: Option<String>,
}

impl Config {
    /// Loads `.env`, the optional TOML file named by `ROUTER_CONFIG`, then
    /// environment overrides.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        let file = std::env::var(CONFIG_PATH_ENV).ok().filter(|p| !p.trim().is_empty());
        Self::from_sources(file.as_deref().map(Path::new), |key| std::env::var(key).ok())
    }

    /// Builds a config from an optional file and an environment lookup.
    /// Later sources win: defaults, then file, then environment.
    pub fn from_sources<F>(file: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = file {
            let content = fs::read_to_string(path).map_err(|e| {
                RouterError::Config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            let parsed: ConfigFile = toml::from_str(&content)?;
            config.apply(
                parsed.router.publish_url,
                parsed.router.target_event,
                parsed.router.request_timeout_secs.map(|v| v.to_string()),
                parsed.router.decode_mode,
            )?;
        }

        config.apply(
            env(PUBLISH_URL_ENV),
            env(TARGET_EVENT_ENV),
            env(REQUEST_TIMEOUT_ENV),
            env(DECODE_MODE_ENV),
        )?;

        Ok(config)
    }

    fn apply(
        &mut self,
        publish_url: Option<String>,
        target_event: Option<String>,
        request_timeout_secs: Option<String>,
        decode_mode: Option<String>,
    ) -> Result<()> {
        if let Some(url) = non_blank(publish_url) {
            self.publish_url = Some(url);
        }
        if let Some(target) = non_blank(target_event) {
            self.target_event = target;
        }
        if let Some(raw) = non_blank(request_timeout_secs) {
            let secs: u64 = raw.parse().map_err(|_| {
                RouterError::Config(format!("invalid request timeout '{}'", raw))
            })?;
            if secs == 0 {
                return Err(RouterError::Config(
                    "request timeout must be at least one second".to_string(),
                ));
            }
            self.request_timeout_secs = secs;
        }
        if let Some(raw) = non_blank(decode_mode) {
            self.decode_mode = raw.parse()?;
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = Config::from_sources(None, env_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.publish_url, None);
        assert_eq!(config.target_event, "booking_completed");
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[router]\npublish_url = \"http://file.example/hook\"\ntarget_event = \"booking_requested\"\nrequest_timeout_secs = 3\ndecode_mode = \"lenient\""
        )
        .unwrap();

        let config = Config::from_sources(
            Some(file.path()),
            env_from(&[("PUBLISH_URL", "http://env.example/hook")]),
        )
        .unwrap();

        assert_eq!(config.publish_url.as_deref(), Some("http://env.example/hook"));
        assert_eq!(config.target_event, "booking_requested");
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.decode_mode, DecodeMode::Lenient);
    }

    #[test]
    fn test_blank_url_counts_as_unset() {
        let config =
            Config::from_sources(None, env_from(&[("PUBLISH_URL", "   ")])).unwrap();
        assert_eq!(config.publish_url, None);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let err = Config::from_sources(None, env_from(&[("ROUTER_REQUEST_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, RouterError::Config(_)));

        let err = Config::from_sources(None, env_from(&[("ROUTER_DECODE_MODE", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, RouterError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("router.toml");
        let err = Config::from_sources(Some(missing.as_path()), env_from(&[])).unwrap_err();
        assert!(matches!(err, RouterError::Config(_)));
    }
}
