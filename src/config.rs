//! Process configuration read from the environment (and `.env` via `dotenvy`).

use crate::service::draft::CatalogRules;
use common_http_server_rs::{ConfigError, LogFormat};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite://snippets.db?mode=rwc";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub(crate) struct CatalogSettings {
    pub(crate) database_url: String,
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) request_timeout: Duration,
    pub(crate) db_connect_timeout: Duration,
    pub(crate) seed_route_enabled: bool,
    pub(crate) log_format: LogFormat,
    pub(crate) log_file: Option<String>,
    pub(crate) rules: CatalogRules,
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { key, value: raw }),
    }
}

fn label_list(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Vec<String>> {
    let labels: Vec<String> = lookup(key)?
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect();

    (!labels.is_empty()).then_some(labels)
}

impl CatalogSettings {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnv {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            db_connect_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DB_CONNECT_TIMEOUT_SECS",
                DEFAULT_DB_CONNECT_TIMEOUT_SECS,
            )?),
            seed_route_enabled: parse_or(&lookup, "SEED_ROUTE_ENABLED", true)?,
            log_format,
            log_file: lookup("LOG_FILE").filter(|path| !path.trim().is_empty()),
            rules: CatalogRules {
                languages: label_list(&lookup, "SNIPPET_LANGUAGES"),
                categories: label_list(&lookup, "SNIPPET_CATEGORIES"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<CatalogSettings, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CatalogSettings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = settings(&[]).unwrap();

        assert_eq!(settings.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert!(settings.seed_route_enabled);
        assert!(matches!(settings.log_format, LogFormat::Pretty));
        assert!(settings.rules.languages.is_none());
        assert!(settings.rules.categories.is_none());
    }

    #[test]
    fn reads_overrides_and_label_lists() {
        let settings = settings(&[
            ("PORT", "8080"),
            ("SEED_ROUTE_ENABLED", "false"),
            ("LOG_FORMAT", "json"),
            ("SNIPPET_LANGUAGES", "Python, Go ,,Rust"),
            ("SNIPPET_CATEGORIES", " "),
        ])
        .unwrap();

        assert_eq!(settings.port, 8080);
        assert!(!settings.seed_route_enabled);
        assert!(matches!(settings.log_format, LogFormat::Json));
        assert_eq!(
            settings.rules.languages,
            Some(vec!["Python".to_string(), "Go".to_string(), "Rust".to_string()])
        );
        assert!(settings.rules.categories.is_none());
    }

    #[test]
    fn rejects_malformed_values() {
        let error = settings(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidEnv { key: "PORT", .. }));

        let error = settings(&[("LOG_FORMAT", "xml")]).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidEnv { key: "LOG_FORMAT", .. }));
    }
}
