use std::path::PathBuf;
use std::time::Duration;

use jobflow_client::config::{ClientConfig, DEFAULT_BASE_URL};
use jobflow_engine::EngineOptions;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Runner configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Base URL of the job-application API.
    pub api_url: String,
    /// JSON file mapping field ids to answers.
    pub answers_file: PathBuf,
    pub request_timeout_secs: u64,
    pub realtime_validation: bool,
    pub cross_field_validation: bool,
}

impl RunnerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                          | Default                                       |
    /// |----------------------------------|-----------------------------------------------|
    /// | `JOBFLOW_API_URL`                | `http://localhost:8080/api/job-applications`  |
    /// | `JOBFLOW_ANSWERS_FILE`           | required                                      |
    /// | `JOBFLOW_REQUEST_TIMEOUT_SECS`   | `30`                                          |
    /// | `JOBFLOW_REALTIME_VALIDATION`    | `false`                                       |
    /// | `JOBFLOW_CROSS_FIELD_VALIDATION` | `false`                                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("JOBFLOW_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let answers_file = lookup("JOBFLOW_ANSWERS_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("JOBFLOW_ANSWERS_FILE"))?;

        let request_timeout_secs = match lookup("JOBFLOW_REQUEST_TIMEOUT_SECS") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "JOBFLOW_REQUEST_TIMEOUT_SECS",
                expected: "a whole number of seconds",
                value,
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url,
            answers_file,
            request_timeout_secs,
            realtime_validation: flag(&lookup, "JOBFLOW_REALTIME_VALIDATION")?,
            cross_field_validation: flag(&lookup, "JOBFLOW_CROSS_FIELD_VALIDATION")?,
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_url)
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            realtime_validation: self.realtime_validation,
            cross_field_validation: self.cross_field_validation,
            today: None,
        }
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<bool, ConfigError> {
    let Some(value) = lookup(name) else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "a boolean",
            value,
        }),
    }
}
