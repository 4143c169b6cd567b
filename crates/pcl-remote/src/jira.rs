//! Jira Cloud REST client (API v3)
//!
//! Implements [`IssueTracker`] with Basic auth built from the account email
//! and API token.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use pcl_core::config::Config;
use pcl_core::{CreatedIssue, IssuePayload, IssueTracker, PclError, Result, Service};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{endpoint, status_error, transport};

const MYSELF_PATH: &str = "/rest/api/3/myself";
const ISSUE_PATH: &str = "/rest/api/3/issue";
const JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct JiraConfig {
    /// Site root, e.g. `https://acme.atlassian.net`.
    pub host: String,
    pub email: String,
    pub api_token: String,
    /// Upper bound for issue creation.
    pub timeout: Duration,
}

impl From<&Config> for JiraConfig {
    fn from(cfg: &Config) -> Self {
        JiraConfig {
            host: cfg.jira_host.clone(),
            email: cfg.jira_email.clone(),
            api_token: cfg.jira_api_key.clone(),
            timeout: Duration::from_secs(cfg.jira_timeout_secs),
        }
    }
}

/// `Authorization` header value for Jira Basic auth.
pub fn basic_auth_header(email: &str, api_token: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{email}:{api_token}")))
}

pub struct JiraClient {
    config: JiraConfig,
    http_client: reqwest::Client,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("pcl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport(Service::Tracker))?;

        Ok(JiraClient {
            config,
            http_client,
        })
    }

    fn auth(&self) -> String {
        basic_auth_header(&self.config.email, &self.config.api_token)
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn current_account_id(&self) -> Result<String> {
        let url = endpoint(&self.config.host, MYSELF_PATH);
        debug!(url = %url, "looking up current account");

        let response = self
            .http_client
            .get(&url)
            .header(ACCEPT, JSON)
            .header(AUTHORIZATION, self.auth())
            .send()
            .await
            .map_err(transport(Service::Tracker))?;

        if !response.status().is_success() {
            return Err(status_error(Service::Tracker, response).await);
        }

        let text = response.text().await.map_err(transport(Service::Tracker))?;
        account_id_from(&text)
    }

    async fn create_issue(&self, payload: &IssuePayload) -> Result<CreatedIssue> {
        let url = endpoint(&self.config.host, ISSUE_PATH);
        let body = serde_json::to_vec(payload)?;

        let response = self
            .http_client
            .post(&url)
            .timeout(self.config.timeout)
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON)
            .header(AUTHORIZATION, self.auth())
            .body(body)
            .send()
            .await
            .map_err(transport(Service::Tracker))?;

        if !response.status().is_success() {
            return Err(status_error(Service::Tracker, response).await);
        }

        // Jira answers 201 with {id, key, self}; tolerate missing fields.
        let text = response.text().await.map_err(transport(Service::Tracker))?;
        let created: CreatedIssue = match serde_json::from_str(&text) {
            Ok(created) => created,
            Err(e) => {
                warn!(error = %e, body = %text, "unreadable issue creation response");
                CreatedIssue::default()
            }
        };
        info!(key = %created.key, id = %created.id, "jira issue created");
        Ok(created)
    }
}

/// Pull a non-blank string `accountId` out of a `/myself` body.
fn account_id_from(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    match value.get("accountId").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => Ok(id.to_string()),
        _ => Err(PclError::Identity("missing accountId field".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_is_base64_of_email_and_token() {
        assert_eq!(
            basic_auth_header("user@example.com", "secret"),
            "Basic dXNlckBleGFtcGxlLmNvbTpzZWNyZXQ="
        );
    }

    #[test]
    fn account_id_must_be_a_non_blank_string() {
        assert_eq!(account_id_from(r#"{"accountId": "acc-1"}"#).unwrap(), "acc-1");

        for body in [
            r#"{"accountId": 12345}"#,
            r#"{"accountId": {"id": "acc-1"}}"#,
            r#"{"accountId": null}"#,
            r#"{"accountId": " "}"#,
            r#"{"displayName": "Dev"}"#,
            "<html>login</html>",
        ] {
            let err = account_id_from(body).unwrap_err();
            assert!(matches!(err, PclError::Identity(_)), "{body}: {err}");
        }
    }

    #[test]
    fn config_maps_timeout_seconds() {
        let cfg = Config {
            jira_host: "https://acme.atlassian.net".to_string(),
            jira_timeout_secs: 8,
            ..Config::default()
        };
        let jira = JiraConfig::from(&cfg);
        assert_eq!(jira.timeout, Duration::from_secs(8));
        assert_eq!(jira.host, "https://acme.atlassian.net");
    }
}
