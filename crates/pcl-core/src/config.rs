//! Configuration file loading.
//!
//! The config is a JSON object; which keys are required depends on the
//! action, so presence is checked by [`Config::validate_for_ai`] and
//! [`Config::validate_for_jira`] rather than at load time.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::domain::error::{PclError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-5";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_JIRA_TIMEOUT_SECS: u64 = 8;

#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub jira_api_key: String,
    #[serde(default)]
    pub jira_host: String,
    #[serde(default)]
    pub jira_email: String,
    #[serde(default)]
    pub jira_project: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_jira_timeout_secs")]
    pub jira_timeout_secs: u64,
}

fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.to_string()
}

fn default_openai_base_url() -> String {
    std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string())
}

fn default_jira_timeout_secs() -> u64 {
    DEFAULT_JIRA_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            openai_api_key: String::new(),
            jira_api_key: String::new(),
            jira_host: String::new(),
            jira_email: String::new(),
            jira_project: String::new(),
            openai_model: default_openai_model(),
            openai_base_url: default_openai_base_url(),
            jira_timeout_secs: default_jira_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| PclError::Config(format!("read {}: {e}", path.display())))?;
        Self::from_json(&data)
            .map_err(|e| PclError::Config(format!("parse {}: {e}", path.display())))
    }

    pub fn from_json(data: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Keys needed to call the generation service.
    pub fn validate_for_ai(&self) -> Result<()> {
        require(&[("openai_api_key", &self.openai_api_key)])
    }

    /// Keys needed for the full issue flow.
    pub fn validate_for_jira(&self) -> Result<()> {
        require(&[
            ("openai_api_key", &self.openai_api_key),
            ("jira_api_key", &self.jira_api_key),
            ("jira_host", &self.jira_host),
            ("jira_email", &self.jira_email),
            ("jira_project", &self.jira_project),
        ])
    }
}

fn require(keys: &[(&str, &String)]) -> Result<()> {
    let missing: Vec<&str> = keys
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PclError::Config(format!(
            "missing required keys: {}",
            missing.join(", ")
        )))
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("jira_api_key", &redact(&self.jira_api_key))
            .field("jira_host", &self.jira_host)
            .field("jira_email", &self.jira_email)
            .field("jira_project", &self.jira_project)
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("jira_timeout_secs", &self.jira_timeout_secs)
            .finish()
    }
}
