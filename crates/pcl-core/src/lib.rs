//! PCL Core Library
//!
//! Turns a local change set into a validated Jira issue payload:
//! base resolution and diff extraction ([`git`]), request composition
//! ([`compose`]), response validation ([`validate`]) and the driver that
//! wires them to the external services ([`pipeline`]).

pub mod compose;
pub mod config;
pub mod domain;
pub mod fakes;
pub mod git;
pub mod pipeline;
pub mod telemetry;
pub mod validate;

pub use compose::{compose_commit_message_request, compose_issue_request, SUMMARY_MAX_CHARS};
pub use config::Config;
pub use domain::{
    AdfDocument, BaseOrigin, BaseReference, BlockNode, ChangeSet, ChatMessage, CreatedIssue,
    GenerationRequest, InlineNode, IssueDraft, IssueFields, IssuePayload, IssueType, PclError,
    Result, Role, Service, TaskState, ValidationError, GENERATION_SEED,
};
pub use git::{extract_change_set, list_branches, resolve_base_reference};
pub use pipeline::{
    run_commit_message_pipeline, run_issue_pipeline, CommitMessageOutcome, GenerationService,
    IssueOutcome, IssueRun, IssueTracker,
};
pub use telemetry::init_tracing;
pub use validate::{validate_response, ResponseValidator};
