//! End-to-end pipeline: base resolution → diff → request → generation →
//! validation → submission.
//!
//! External calls go through [`GenerationService`] and [`IssueTracker`] so
//! the pipeline can be driven by the HTTP clients in `pcl-remote` or by the
//! in-memory fakes in [`crate::fakes`]. Stages run strictly one after another.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::compose::{compose_commit_message_request, compose_issue_request};
use crate::domain::change_set::BaseReference;
use crate::domain::error::Result;
use crate::domain::issue::{CreatedIssue, IssueDraft, IssuePayload};
use crate::domain::request::GenerationRequest;
use crate::git::{extract_change_set, resolve_base_reference};
use crate::validate::{validate_plain_completion, ResponseValidator};

/// Chat-completion style text generator.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Send the request and return the text of the first completion.
    async fn complete(&self, request: &GenerationRequest) -> Result<String>;
}

/// Issue tracker operations the pipeline needs.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Account id of the authenticated caller. Fails with `PclError::Identity`
    /// when the tracker answers without one.
    async fn current_account_id(&self) -> Result<String>;

    /// Create an issue from an already validated payload.
    async fn create_issue(&self, payload: &IssuePayload) -> Result<CreatedIssue>;
}

/// Inputs of one issue run.
#[derive(Debug, Clone)]
pub struct IssueRun {
    pub repo_dir: PathBuf,
    pub candidate_base: String,
    pub project_key: String,
    /// Validate but do not call issue creation.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IssueOutcome {
    /// Nothing differs from the base; no external call was made.
    NoChanges { base: BaseReference },
    /// The generator judged the change set not worth an issue.
    NoIssue { base: BaseReference },
    /// Validated payload, not submitted because of `dry_run`.
    Drafted {
        base: BaseReference,
        payload: IssuePayload,
    },
    Created {
        base: BaseReference,
        payload: IssuePayload,
        issue: CreatedIssue,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitMessageOutcome {
    NoChanges { base: BaseReference },
    Message { base: BaseReference, message: String },
}

/// Run the issue pipeline once.
///
/// The identity lookup happens after the empty-diff short circuit and before
/// generation, because the assignee id is part of the request.
pub async fn run_issue_pipeline<G, T>(
    run: &IssueRun,
    generator: &G,
    tracker: &T,
) -> Result<IssueOutcome>
where
    G: GenerationService + ?Sized,
    T: IssueTracker + ?Sized,
{
    let base = resolve_base_reference(&run.repo_dir, &run.candidate_base)?;
    let change_set = extract_change_set(&run.repo_dir, &base)?;
    if change_set.is_empty() {
        info!(base = %base, "no changes against base, skipping generation");
        return Ok(IssueOutcome::NoChanges { base });
    }

    let account_id = tracker.current_account_id().await?;
    let request = compose_issue_request(&change_set, &run.project_key, &account_id);

    let raw = generator.complete(&request).await?;
    let validator = ResponseValidator::new()
        .expect_project_key(run.project_key.as_str())
        .expect_account_id(account_id.as_str());

    let payload = match validator.validate(&raw)? {
        IssueDraft::NoIssue => {
            info!("generator returned null, no issue warranted");
            return Ok(IssueOutcome::NoIssue { base });
        }
        IssueDraft::Issue(payload) => payload,
    };

    info!(
        issue_type = %payload.issue_type(),
        summary = payload.summary(),
        "generated issue passed validation"
    );

    if run.dry_run {
        return Ok(IssueOutcome::Drafted { base, payload });
    }

    let issue = tracker.create_issue(&payload).await?;
    info!(key = %issue.key, "issue created");
    Ok(IssueOutcome::Created {
        base,
        payload,
        issue,
    })
}

/// Generate a commit message for the working tree against `candidate_base`.
pub async fn run_commit_message_pipeline<G>(
    repo_dir: &Path,
    candidate_base: &str,
    generator: &G,
) -> Result<CommitMessageOutcome>
where
    G: GenerationService + ?Sized,
{
    let base = resolve_base_reference(repo_dir, candidate_base)?;
    let change_set = extract_change_set(repo_dir, &base)?;
    if change_set.is_empty() {
        return Ok(CommitMessageOutcome::NoChanges { base });
    }

    let request = compose_commit_message_request(&change_set);
    let raw = generator.complete(&request).await?;
    let message = validate_plain_completion(&raw)?;
    Ok(CommitMessageOutcome::Message { base, message })
}
