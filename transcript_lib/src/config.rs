//! Run configuration, read from an optional TOML file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use transcript_api::endpoints::{DEFAULT_APP_BASE_URL, DEFAULT_AUTH_BASE_URL};
use transcript_api::{Endpoints, PeriodId};

use crate::error::TranscriptError;

/// Periods requested when the config file does not list any, newest first.
pub const DEFAULT_PERIODS: &[PeriodId] = &[469, 467, 465, 464, 444, 425, 404, 426, 387, 385];

pub const AUTH_BASE_URL_ENV: &str = "TRANSCRIPT_AUTH_BASE_URL";
pub const APP_BASE_URL_ENV: &str = "TRANSCRIPT_APP_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub auth_base_url: String,
    pub app_base_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            app_base_url: DEFAULT_APP_BASE_URL.to_string(),
        }
    }
}

/// Where the dataset and reports are written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub raw: PathBuf,
    pub html: PathBuf,
    pub markdown: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            raw: PathBuf::from("grades.json"),
            html: PathBuf::from("grades_report.html"),
            markdown: PathBuf::from("grades_report.md"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoints: EndpointConfig,
    /// Ordered period identifiers; requests are issued in this order.
    pub periods: Vec<PeriodId>,
    pub output: OutputPaths,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: EndpointConfig::default(),
            periods: DEFAULT_PERIODS.to_vec(),
            output: OutputPaths::default(),
        }
    }
}

impl Config {
    /// Reads the file at `path`, or the defaults when no path is given,
    /// then applies the base URL environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, TranscriptError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| TranscriptError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        let config = config.with_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, TranscriptError> {
        toml::from_str(text).map_err(|e| TranscriptError::Config(e.to_string()))
    }

    /// Replaces base URLs with values from `lookup`, keyed by the
    /// `TRANSCRIPT_*_BASE_URL` variable names.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(AUTH_BASE_URL_ENV) {
            self.endpoints.auth_base_url = url;
        }
        if let Some(url) = lookup(APP_BASE_URL_ENV) {
            self.endpoints.app_base_url = url;
        }
        self
    }

    pub fn validate(&self) -> Result<(), TranscriptError> {
        if self.periods.is_empty() {
            return Err(TranscriptError::InvalidInput(
                "at least one period must be configured".into(),
            ));
        }
        self.endpoints()?;
        Ok(())
    }

    pub fn endpoints(&self) -> Result<Endpoints, TranscriptError> {
        Ok(Endpoints::new(
            &self.endpoints.auth_base_url,
            &self.endpoints.app_base_url,
        )?)
    }
}
