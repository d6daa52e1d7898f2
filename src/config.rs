//! Service configuration: optional TOML file, then environment overrides.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8080"
//! max_upload_bytes = 10485760
//!
//! [auth]
//! api_key = "change-me"
//!
//! [csv]
//! column_index = 1
//!
//! [filter]
//! name_substring = "John"
//! min_age = 30
//! ```

use std::fmt::Display;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchOptions;
use crate::error::ServiceError;
use crate::transform::{CsvOptions, PersonFilter};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub csv: CsvSettings,
    pub filter: FilterSettings,
}

/// Listener and request limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address the HTTP listener binds to.
    pub bind: SocketAddr,
    /// Largest accepted request body in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// API-key gate settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Key expected in the `X-Api-Key` header. Required to start the server.
    pub api_key: Option<String>,
}

/// CSV aggregation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvSettings {
    /// Zero-based column averaged in every CSV upload.
    pub column_index: usize,
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            column_index: CsvOptions::default().column_index,
        }
    }
}

/// JSON filter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub name_substring: String,
    pub min_age: i64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        let f = PersonFilter::default();
        Self {
            name_substring: f.name_substring,
            min_age: f.min_age,
        }
    }
}

impl ServiceConfig {
    /// Load from `path` (if any), then apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ServiceError> {
        let mut cfg = match path {
            Some(p) => Self::from_toml_str(&fs::read_to_string(p)?)?,
            None => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Parse a TOML document. Missing sections and keys take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ServiceError> {
        Ok(toml::from_str(input)?)
    }

    /// Override settings from environment-style variables looked up through `lookup`.
    ///
    /// Recognized: `BIND_ADDR`, `MAX_UPLOAD_BYTES`, `API_KEY`, `CSV_COLUMN_INDEX`,
    /// `FILTER_NAME_SUBSTRING`, `FILTER_MIN_AGE`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BIND_ADDR") {
            self.server.bind = parse_var("BIND_ADDR", &v)?;
        }
        if let Some(v) = lookup("MAX_UPLOAD_BYTES") {
            self.server.max_upload_bytes = parse_var("MAX_UPLOAD_BYTES", &v)?;
        }
        if let Some(v) = lookup("API_KEY") {
            self.auth.api_key = Some(v);
        }
        if let Some(v) = lookup("CSV_COLUMN_INDEX") {
            self.csv.column_index = parse_var("CSV_COLUMN_INDEX", &v)?;
        }
        if let Some(v) = lookup("FILTER_NAME_SUBSTRING") {
            self.filter.name_substring = v;
        }
        if let Some(v) = lookup("FILTER_MIN_AGE") {
            self.filter.min_age = parse_var("FILTER_MIN_AGE", &v)?;
        }
        Ok(())
    }

    /// Dispatch options derived from this config. No observer is attached.
    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            csv: CsvOptions {
                column_index: self.csv.column_index,
                ..Default::default()
            },
            filter: PersonFilter {
                name_substring: self.filter.name_substring.clone(),
                min_age: self.filter.min_age,
            },
            ..Default::default()
        }
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ServiceError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ServiceError::Config(format!("invalid {key} '{raw}': {e}")))
}
