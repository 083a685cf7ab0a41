use std::{env, path::PathBuf};

use crate::error::{Error, Result};

const DEFAULT_PORT: u16 = 5020;
const DEFAULT_BODY_LIMIT_MB: usize = 5;
const DEFAULT_MODEL_PATH: &str = "./model/frozen_graph.pb";
const DEFAULT_INPUT_OP: &str = "x";
const DEFAULT_OUTPUT_OP: &str = "Identity";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub body_limit_bytes: usize,
    pub model_path: PathBuf,
    /// Where to fetch the frozen graph from when `model_path` does not exist yet.
    pub model_url: Option<String>,
    pub input_op: String,
    pub output_op: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let body_limit_bytes = match lookup("BODY_LIMIT_MB") {
            Some(raw) => {
                let mb = raw.parse::<usize>().map_err(|_| {
                    Error::Config(format!("BODY_LIMIT_MB must be a valid integer, got {raw:?}"))
                })?;
                mb.checked_mul(1024 * 1024).ok_or_else(|| {
                    Error::Config(format!("BODY_LIMIT_MB is too large, got {raw:?}"))
                })?
            }
            None => DEFAULT_BODY_LIMIT_MB * 1024 * 1024,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                Error::Config(format!(
                    "PORT must be a valid number between 0 and 65535, got {raw:?}"
                ))
            })?,
            None => DEFAULT_PORT,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(Error::Config(format!(
                    "LOG_FORMAT must be \"pretty\" or \"json\", got {other:?}"
                )))
            }
        };

        Ok(Config {
            port,
            body_limit_bytes,
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            model_url: lookup("MODEL_URL").filter(|url| !url.is_empty()),
            input_op: lookup("MODEL_INPUT_OP").unwrap_or_else(|| DEFAULT_INPUT_OP.into()),
            output_op: lookup("MODEL_OUTPUT_OP").unwrap_or_else(|| DEFAULT_OUTPUT_OP.into()),
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 5020);
        assert_eq!(config.body_limit_bytes, 5 * 1024 * 1024);
        assert_eq!(config.model_path, PathBuf::from("./model/frozen_graph.pb"));
        assert!(config.model_url.is_none());
        assert_eq!(config.input_op, "x");
        assert_eq!(config.output_op, "Identity");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("BODY_LIMIT_MB", "12"),
            ("MODEL_PATH", "/srv/resnet18.pb"),
            ("MODEL_URL", "https://example.com/resnet18.pb"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.body_limit_bytes, 12 * 1024 * 1024);
        assert_eq!(config.model_path, PathBuf::from("/srv/resnet18.pb"));
        assert_eq!(
            config.model_url.as_deref(),
            Some("https://example.com/resnet18.pb")
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(matches!(
            config_from(&[("PORT", "99999")]),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            config_from(&[("BODY_LIMIT_MB", "lots")]),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            config_from(&[("BODY_LIMIT_MB", "18446744073709551615")]),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            config_from(&[("LOG_FORMAT", "xml")]),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn empty_model_url_counts_as_unset() {
        let config = config_from(&[("MODEL_URL", "")]).unwrap();
        assert!(config.model_url.is_none());
    }
}
