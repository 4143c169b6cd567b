//! In-memory fakes for the external service traits (testing only)
//!
//! `ScriptedGenerator` answers every request with a canned completion and
//! records what it was asked; `MemoryTracker` hands out a fixed account id and
//! keeps created issues in a `Vec`.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::error::{PclError, Result, Service};
use crate::domain::issue::{CreatedIssue, IssuePayload};
use crate::domain::request::GenerationRequest;
use crate::pipeline::{GenerationService, IssueTracker};

// ---------------------------------------------------------------------------
// ScriptedGenerator
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ScriptedGenerator {
    completion: std::result::Result<String, String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    /// Always answer with `completion`.
    pub fn replying(completion: impl Into<String>) -> Self {
        Self {
            completion: Ok(completion.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with a transport error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            completion: Err(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationService for ScriptedGenerator {
    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.completion
            .clone()
            .map_err(|message| PclError::Transport {
                service: Service::Generation,
                message,
            })
    }
}

// ---------------------------------------------------------------------------
// MemoryTracker
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryTracker {
    account_id: Option<String>,
    identity_calls: Mutex<usize>,
    created: Mutex<Vec<IssuePayload>>,
}

impl MemoryTracker {
    pub fn with_account(account_id: impl Into<String>) -> Self {
        Self {
            account_id: Some(account_id.into()),
            ..Self::default()
        }
    }

    /// Tracker whose identity endpoint answers without an account id.
    pub fn without_account() -> Self {
        Self::default()
    }

    pub fn identity_calls(&self) -> usize {
        *self.identity_calls.lock().unwrap()
    }

    pub fn created(&self) -> Vec<IssuePayload> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueTracker for MemoryTracker {
    async fn current_account_id(&self) -> Result<String> {
        *self.identity_calls.lock().unwrap() += 1;
        self.account_id
            .clone()
            .ok_or_else(|| PclError::Identity("missing accountId field".to_string()))
    }

    async fn create_issue(&self, payload: &IssuePayload) -> Result<CreatedIssue> {
        let mut created = self.created.lock().unwrap();
        created.push(payload.clone());
        let n = created.len();
        Ok(CreatedIssue {
            id: format!("{}", 10_000 + n),
            key: format!("{}-{n}", payload.fields.project.key),
            self_url: None,
        })
    }
}
