//! Domain models for PCL.
//!
//! - `BaseReference` / `ChangeSet`: what the working tree is compared against, and the diff
//! - `GenerationRequest`: the three-message prompt sent to the generator
//! - `IssuePayload` / `IssueDraft`: the validated Jira submission
//! - `AdfDocument`: the restricted description document

pub mod adf;
pub mod change_set;
pub mod error;
pub mod issue;
pub mod request;

pub use adf::{AdfDocument, BlockNode, InlineNode, TaskState};
pub use change_set::{BaseOrigin, BaseReference, ChangeSet};
pub use error::{PclError, Result, Service, ValidationError};
pub use issue::{
    AssigneeRef, CreatedIssue, IssueDraft, IssueFields, IssuePayload, IssueType, IssueTypeRef,
    ProjectRef,
};
pub use request::{ChatMessage, GenerationRequest, Role, GENERATION_SEED};
