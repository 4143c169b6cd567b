//! Issue payloads as submitted to Jira, and the draft the validator produces.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::adf::AdfDocument;

/// The two issue categories a change set can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueType {
    /// User- or client-visible capability change.
    Story,
    /// Refactor, fix, infrastructure, tests, performance.
    Task,
}

impl IssueType {
    pub const ALL: [IssueType; 2] = [IssueType::Story, IssueType::Task];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Story => "Story",
            IssueType::Task => "Task",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTypeRef {
    pub name: IssueType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeRef {
    pub account_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueFields {
    pub project: ProjectRef,
    pub summary: String,
    pub issuetype: IssueTypeRef,
    pub assignee: AssigneeRef,
    pub description: AdfDocument,
}

/// Body of `POST /rest/api/3/issue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuePayload {
    pub fields: IssueFields,
}

impl IssuePayload {
    pub fn issue_type(&self) -> IssueType {
        self.fields.issuetype.name
    }

    pub fn summary(&self) -> &str {
        &self.fields.summary
    }
}

/// Validated generation outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueDraft {
    /// The generator answered `null`: nothing worth tracking.
    NoIssue,
    Issue(IssuePayload),
}

/// Tracker response to a successful issue creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default, rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_url: Option<String>,
}
