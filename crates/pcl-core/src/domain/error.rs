//! Domain-level error taxonomy for PCL.

use std::fmt;

/// Reasons a generated response is refused before it can reach the tracker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("response is not a single JSON value: {reason}")]
    NotJson { reason: String },

    #[error("response is neither null nor an issue object")]
    NotAnObject,

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("issuetype.name must be Story or Task, got {name:?}")]
    InvalidIssueType { name: String },

    #[error("invalid summary: {reason}")]
    InvalidSummary { reason: String },

    #[error("{field} must be {expected:?}, got {actual:?}")]
    FieldMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("description is not an ADF document: {reason}")]
    InvalidDocument { reason: String },

    #[error("node type {node_type:?} is not allowed at {path}")]
    DisallowedNode { node_type: String, path: String },

    #[error("{node_type} at {path} is missing attrs.localId")]
    MissingLocalId { node_type: String, path: String },

    #[error("localId {local_id:?} appears more than once")]
    DuplicateLocalId { local_id: String },

    #[error("taskItem at {path} is missing attrs.state")]
    MissingTaskState { path: String },

    #[error("document does not match the issue schema: {reason}")]
    MalformedNode { reason: String },

    #[error("completion is empty")]
    EmptyCompletion,
}

impl ValidationError {
    /// Stable reason code, suitable for logs and exit reporting.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::NotJson { .. } => "not_json",
            ValidationError::NotAnObject => "not_an_object",
            ValidationError::MissingField { .. } => "missing_field",
            ValidationError::InvalidIssueType { .. } => "invalid_issue_type",
            ValidationError::InvalidSummary { .. } => "invalid_summary",
            ValidationError::FieldMismatch { .. } => "field_mismatch",
            ValidationError::InvalidDocument { .. } => "invalid_document",
            ValidationError::DisallowedNode { .. } => "disallowed_node",
            ValidationError::MissingLocalId { .. } => "missing_local_id",
            ValidationError::DuplicateLocalId { .. } => "duplicate_local_id",
            ValidationError::MissingTaskState { .. } => "missing_task_state",
            ValidationError::MalformedNode { .. } => "malformed_node",
            ValidationError::EmptyCompletion => "empty_completion",
        }
    }
}

/// External service a transport failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Generation,
    Tracker,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Generation => f.write_str("generation service"),
            Service::Tracker => f.write_str("issue tracker"),
        }
    }
}

/// PCL domain errors.
#[derive(Debug, thiserror::Error)]
pub enum PclError {
    #[error("cannot resolve a base reference: {0}")]
    Resolution(String),

    #[error("cannot extract change set: {0}")]
    Extraction(String),

    #[error("git error: {0}")]
    Git(String),

    #[error("generation contract violated ({}): {0}", .0.code())]
    Contract(#[from] ValidationError),

    #[error("{service} request failed: {message}")]
    Transport { service: Service, message: String },

    #[error("{service} returned status {status}: {body}")]
    Status {
        service: Service,
        status: u16,
        body: String,
    },

    #[error("identity lookup failed: {0}")]
    Identity(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for PCL operations.
pub type Result<T> = std::result::Result<T, PclError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_error_display_carries_reason_code() {
        let err = PclError::from(ValidationError::DuplicateLocalId {
            local_id: "abc".to_string(),
        });
        let msg = err.to_string();
        assert!(msg.contains("duplicate_local_id"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn status_error_names_service_and_code() {
        let err = PclError::Status {
            service: Service::Tracker,
            status: 400,
            body: "{\"error\":\"invalid payload\"}".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("issue tracker"));
        assert!(msg.contains("status 400"));
        assert!(msg.contains("invalid payload"));
    }

    #[test]
    fn identity_error_is_distinct_from_transport() {
        let identity = PclError::Identity("missing accountId field".to_string());
        assert!(identity.to_string().contains("identity lookup failed"));

        let transport = PclError::Transport {
            service: Service::Tracker,
            message: "connection refused".to_string(),
        };
        assert!(!transport.to_string().contains("identity"));
    }
}
