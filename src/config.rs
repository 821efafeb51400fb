use crate::status::DEFAULT_DUE_SOON_WINDOW_DAYS;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

pub const WINDOW_ENV: &str = "MAINTENANCE_DUE_SOON_WINDOW";
pub const HTTP_ADDR_ENV: &str = "MAINTENANCE_HTTP_ADDR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value '{value}' for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Lookahead, in days, for flagging a due date as due soon.
    pub due_soon_window_days: u32,
    pub http_addr: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            due_soon_window_days: DEFAULT_DUE_SOON_WINDOW_DAYS,
            http_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env()
    }

    /// Overlay `MAINTENANCE_*` environment variables on top of `self`.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(WINDOW_ENV) {
            self.due_soon_window_days = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: WINDOW_ENV,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(HTTP_ADDR_ENV) {
            self.http_addr = value;
        }
        Ok(self)
    }
}
