#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConnectionProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_header_name, validate_positive_number, validate_required_field, validate_url, Validate,
};
use std::collections::BTreeMap;
use toml_config::TomlConfig;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Effective connection settings after merging the TOML profile with explicit overrides.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSettings {
    pub site_url: Option<String>,
    pub access_token: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub timeout_seconds: Option<u64>,
}

impl ConnectionSettings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        Self {
            site_url: config.connection.site_url.clone(),
            access_token: config.connection.access_token.clone(),
            headers: config.connection.headers.clone().unwrap_or_default(),
            timeout_seconds: config.connection.timeout_seconds,
        }
    }

    /// Values given here win over the profile.
    pub fn with_overrides(
        mut self,
        site_url: Option<String>,
        access_token: Option<String>,
        timeout_seconds: Option<u64>,
    ) -> Self {
        if site_url.is_some() {
            self.site_url = site_url;
        }
        if access_token.is_some() {
            self.access_token = access_token;
        }
        if timeout_seconds.is_some() {
            self.timeout_seconds = timeout_seconds;
        }
        self
    }
}

impl Validate for ConnectionSettings {
    fn validate(&self) -> Result<()> {
        let site_url = validate_required_field("site_url", &self.site_url)?;
        validate_url("site_url", site_url)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number("timeout_seconds", timeout, 1)?;
        }
        for name in self.headers.keys() {
            validate_header_name("headers", name)?;
        }
        Ok(())
    }
}

impl ConnectionProvider for ConnectionSettings {
    fn site_url(&self) -> &str {
        self.site_url.as_deref().unwrap_or_default()
    }

    fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    fn extra_headers(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}
