//! Response validation for generator output.
//!
//! Generator output is untrusted. Every completion goes through
//! [`ResponseValidator::validate`] before anything is sent to the tracker.
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. the text is exactly one JSON value;
//! 2. `null` is the "no issue" sentinel and is accepted immediately;
//! 3. the value is an issue object with a `Story`/`Task` type, a usable
//!    summary, the expected project/assignee and an ADF document header;
//! 4. every node type is allow-listed;
//! 5. task lists and task items carry unique `localId`s (and items a `state`);
//! 6. the whole value deserializes into [`IssuePayload`].
//!
//! Nothing is repaired.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use crate::compose::SUMMARY_MAX_CHARS;
use crate::domain::error::ValidationError;
use crate::domain::issue::{IssueDraft, IssuePayload, IssueType};

/// Block node types a description may contain.
pub const ALLOWED_BLOCK_NODES: &[&str] = &[
    "heading",
    "paragraph",
    "bulletList",
    "listItem",
    "taskList",
    "taskItem",
    "codeBlock",
];

/// Inline node types allowed under [`INLINE_PARENTS`].
pub const ALLOWED_INLINE_NODES: &[&str] = &["text"];

/// Nodes whose children are inline content rather than blocks.
pub const INLINE_PARENTS: &[&str] = &["paragraph", "heading", "taskItem", "codeBlock"];

/// Leading `[Feat]`, `【Fix】` or `(chore)` style tags.
static TAG_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\[[^\]]*\]|【[^】]*】|\([A-Za-z]+\))").expect("tag prefix pattern compiles")
});

#[derive(Debug, Clone, Default)]
pub struct ResponseValidator {
    expected_project_key: Option<String>,
    expected_account_id: Option<String>,
}

impl ResponseValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `fields.project.key` to equal `key`.
    pub fn expect_project_key(mut self, key: impl Into<String>) -> Self {
        self.expected_project_key = Some(key.into());
        self
    }

    /// Require `fields.assignee.accountId` to equal `account_id`.
    pub fn expect_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.expected_account_id = Some(account_id.into());
        self
    }

    pub fn validate(&self, raw: &str) -> Result<IssueDraft, ValidationError> {
        let result = self.check(raw);
        if let Err(e) = &result {
            warn!(reason = e.code(), error = %e, "generated response rejected");
        }
        result
    }

    fn check(&self, raw: &str) -> Result<IssueDraft, ValidationError> {
        let value: Value = serde_json::from_str(raw.trim()).map_err(|e| ValidationError::NotJson {
            reason: e.to_string(),
        })?;

        if value.is_null() {
            return Ok(IssueDraft::NoIssue);
        }

        let root = value.as_object().ok_or(ValidationError::NotAnObject)?;
        let fields = root
            .get("fields")
            .and_then(Value::as_object)
            .ok_or_else(|| missing("fields"))?;

        let type_name = str_at(fields, &["issuetype", "name"])
            .ok_or_else(|| missing("fields.issuetype.name"))?;
        if IssueType::parse(type_name).is_none() {
            return Err(ValidationError::InvalidIssueType {
                name: type_name.to_string(),
            });
        }

        let summary = str_at(fields, &["summary"]).ok_or_else(|| missing("fields.summary"))?;
        check_summary(summary)?;

        let project_key =
            str_at(fields, &["project", "key"]).ok_or_else(|| missing("fields.project.key"))?;
        check_expected("fields.project.key", self.expected_project_key.as_deref(), project_key)?;

        let account_id = str_at(fields, &["assignee", "accountId"])
            .ok_or_else(|| missing("fields.assignee.accountId"))?;
        check_expected(
            "fields.assignee.accountId",
            self.expected_account_id.as_deref(),
            account_id,
        )?;

        let description = fields
            .get("description")
            .ok_or_else(|| missing("fields.description"))?;
        let content = check_document_header(description)?;

        check_node_types(content, "doc", "description.content")?;

        {
            let mut seen = HashSet::new();
            check_local_ids(content, "description.content", &mut seen)?;
        }

        let payload: IssuePayload =
            serde_json::from_value(value).map_err(|e| ValidationError::MalformedNode {
                reason: e.to_string(),
            })?;

        Ok(IssueDraft::Issue(payload))
    }
}

/// Validate with no project/assignee expectations.
pub fn validate_response(raw: &str) -> Result<IssueDraft, ValidationError> {
    ResponseValidator::new().validate(raw)
}

/// Accept a plain-text completion (commit messages) if it is not blank.
pub fn validate_plain_completion(raw: &str) -> Result<String, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyCompletion);
    }
    Ok(text.to_string())
}

fn missing(field: &str) -> ValidationError {
    ValidationError::MissingField {
        field: field.to_string(),
    }
}

fn str_at<'a>(obj: &'a Map<String, Value>, path: &[&str]) -> Option<&'a str> {
    let (last, parents) = path.split_last()?;
    let mut current = obj;
    for key in parents {
        current = current.get(*key)?.as_object()?;
    }
    current.get(*last)?.as_str()
}

fn check_summary(summary: &str) -> Result<(), ValidationError> {
    let trimmed = summary.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidSummary {
            reason: "summary is blank".to_string(),
        });
    }

    let len = trimmed.chars().count();
    if len > SUMMARY_MAX_CHARS {
        return Err(ValidationError::InvalidSummary {
            reason: format!("{len} characters, limit is {SUMMARY_MAX_CHARS}"),
        });
    }

    if TAG_PREFIX.is_match(trimmed) {
        return Err(ValidationError::InvalidSummary {
            reason: format!("starts with a tag prefix: {trimmed:?}"),
        });
    }

    Ok(())
}

fn check_expected(field: &str, expected: Option<&str>, actual: &str) -> Result<(), ValidationError> {
    match expected {
        Some(expected) if expected != actual => Err(ValidationError::FieldMismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
        _ => Ok(()),
    }
}

fn check_document_header(description: &Value) -> Result<&[Value], ValidationError> {
    let doc = description
        .as_object()
        .ok_or_else(|| invalid_document("description is not an object"))?;

    if doc.get("type").and_then(Value::as_str) != Some("doc") {
        return Err(invalid_document("type must be \"doc\""));
    }
    if doc.get("version").and_then(Value::as_u64) != Some(1) {
        return Err(invalid_document("version must be 1"));
    }

    doc.get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| invalid_document("content must be an array"))
}

fn invalid_document(reason: &str) -> ValidationError {
    ValidationError::InvalidDocument {
        reason: reason.to_string(),
    }
}

fn node_type<'a>(node: &'a Value, path: &str) -> Result<&'a str, ValidationError> {
    node.get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::MalformedNode {
            reason: format!("node at {path} has no type"),
        })
}

fn children<'a>(node: &'a Value, path: &str) -> Result<&'a [Value], ValidationError> {
    match node.get("content") {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(ValidationError::MalformedNode {
            reason: format!("{path}.content is not an array"),
        }),
    }
}

fn check_node_types(nodes: &[Value], parent: &str, path: &str) -> Result<(), ValidationError> {
    let allowed = if INLINE_PARENTS.contains(&parent) {
        ALLOWED_INLINE_NODES
    } else {
        ALLOWED_BLOCK_NODES
    };

    for (i, node) in nodes.iter().enumerate() {
        let node_path = format!("{path}[{i}]");
        let kind = node_type(node, &node_path)?;
        if !allowed.contains(&kind) {
            return Err(ValidationError::DisallowedNode {
                node_type: kind.to_string(),
                path: node_path,
            });
        }
        let content = children(node, &node_path)?;
        check_node_types(content, kind, &format!("{node_path}.content"))?;
    }

    Ok(())
}

fn check_local_ids<'a>(
    nodes: &'a [Value],
    path: &str,
    seen: &mut HashSet<&'a str>,
) -> Result<(), ValidationError> {
    for (i, node) in nodes.iter().enumerate() {
        let node_path = format!("{path}[{i}]");
        let kind = node_type(node, &node_path)?;

        if kind == "taskList" || kind == "taskItem" {
            let attrs = node.get("attrs");
            let local_id = attrs
                .and_then(|a| a.get("localId"))
                .and_then(Value::as_str)
                .filter(|id| !id.trim().is_empty())
                .ok_or_else(|| ValidationError::MissingLocalId {
                    node_type: kind.to_string(),
                    path: node_path.clone(),
                })?;

            if !seen.insert(local_id) {
                return Err(ValidationError::DuplicateLocalId {
                    local_id: local_id.to_string(),
                });
            }

            if kind == "taskItem" && attrs.and_then(|a| a.get("state")).is_none() {
                return Err(ValidationError::MissingTaskState { path: node_path });
            }
        }

        let content = children(node, &node_path)?;
        check_local_ids(content, &format!("{node_path}.content"), seen)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue(issue_type: &str, content: Value) -> String {
        json!({
            "fields": {
                "project": {"key": "PCL"},
                "summary": "Add retry logic to the order creation API",
                "issuetype": {"name": issue_type},
                "assignee": {"accountId": "acc-123"},
                "description": {"type": "doc", "version": 1, "content": content}
            }
        })
        .to_string()
    }

    fn paragraph(text: &str) -> Value {
        json!({"type": "paragraph", "content": [{"type": "text", "text": text}]})
    }

    fn task_item(id: &str) -> Value {
        json!({
            "type": "taskItem",
            "attrs": {"localId": id, "state": "TODO"},
            "content": [{"type": "text", "text": "check"}]
        })
    }

    #[test]
    fn null_is_the_no_issue_sentinel() {
        assert_eq!(validate_response("null").unwrap(), IssueDraft::NoIssue);
        assert_eq!(validate_response("  null\n").unwrap(), IssueDraft::NoIssue);
    }

    #[test]
    fn quoted_null_is_not_the_sentinel() {
        let err = validate_response("\"null\"").unwrap_err();
        assert_eq!(err.code(), "not_an_object");
    }

    #[test]
    fn prose_is_rejected() {
        let err = validate_response("Here is your issue: {}").unwrap_err();
        assert_eq!(err.code(), "not_json");
    }

    #[test]
    fn code_fenced_json_is_rejected() {
        let raw = format!("```json\n{}\n```", issue("Task", json!([])));
        assert_eq!(validate_response(&raw).unwrap_err().code(), "not_json");
    }

    #[test]
    fn multiple_values_are_rejected() {
        let err = validate_response("null null").unwrap_err();
        assert_eq!(err.code(), "not_json");
    }

    #[test]
    fn valid_task_passes() {
        let raw = issue("Task", json!([paragraph("Refactor retry handling")]));
        let IssueDraft::Issue(payload) = validate_response(&raw).unwrap() else {
            panic!("expected an issue");
        };
        assert_eq!(payload.issue_type(), IssueType::Task);
        assert_eq!(payload.fields.project.key, "PCL");
    }

    #[test]
    fn unknown_issue_type_is_rejected() {
        let err = validate_response(&issue("Bug", json!([]))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidIssueType {
                name: "Bug".to_string()
            }
        );
    }

    #[test]
    fn issue_type_is_checked_before_nodes() {
        let raw = issue("Epic", json!([{"type": "table"}]));
        assert_eq!(validate_response(&raw).unwrap_err().code(), "invalid_issue_type");
    }

    #[test]
    fn missing_fields_object_is_reported() {
        let err = validate_response("{\"summary\": \"x\"}").unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "fields".to_string()
            }
        );
    }

    #[test]
    fn table_node_is_rejected() {
        let raw = issue(
            "Story",
            json!([paragraph("ok"), {"type": "table", "content": []}]),
        );
        let err = validate_response(&raw).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DisallowedNode {
                node_type: "table".to_string(),
                path: "description.content[1]".to_string()
            }
        );
    }

    #[test]
    fn nested_disallowed_node_is_rejected() {
        let raw = issue(
            "Task",
            json!([{
                "type": "bulletList",
                "content": [{"type": "listItem", "content": [{"type": "mediaSingle"}]}]
            }]),
        );
        let err = validate_response(&raw).unwrap_err();
        assert_eq!(err.code(), "disallowed_node");
    }

    #[test]
    fn block_node_inside_paragraph_is_rejected() {
        let raw = issue(
            "Task",
            json!([{"type": "paragraph", "content": [paragraph("nested")]}]),
        );
        assert_eq!(validate_response(&raw).unwrap_err().code(), "disallowed_node");
    }

    #[test]
    fn text_at_block_level_is_rejected() {
        let raw = issue("Task", json!([{"type": "text", "text": "loose"}]));
        assert_eq!(validate_response(&raw).unwrap_err().code(), "disallowed_node");
    }

    #[test]
    fn duplicate_task_item_ids_are_rejected() {
        let raw = issue(
            "Task",
            json!([{
                "type": "taskList",
                "attrs": {"localId": "list-1"},
                "content": [task_item("item-1"), task_item("item-1")]
            }]),
        );
        assert_eq!(
            validate_response(&raw).unwrap_err(),
            ValidationError::DuplicateLocalId {
                local_id: "item-1".to_string()
            }
        );
    }

    #[test]
    fn list_and_item_ids_share_one_namespace() {
        let raw = issue(
            "Task",
            json!([{
                "type": "taskList",
                "attrs": {"localId": "same"},
                "content": [task_item("same")]
            }]),
        );
        assert_eq!(validate_response(&raw).unwrap_err().code(), "duplicate_local_id");
    }

    #[test]
    fn task_list_without_local_id_is_rejected() {
        let raw = issue(
            "Task",
            json!([{"type": "taskList", "content": [task_item("item-1")]}]),
        );
        let err = validate_response(&raw).unwrap_err();
        assert_eq!(err.code(), "missing_local_id");
    }

    #[test]
    fn blank_local_id_is_rejected() {
        let raw = issue(
            "Task",
            json!([{"type": "taskList", "attrs": {"localId": "list"}, "content": [task_item("  ")]}]),
        );
        assert_eq!(validate_response(&raw).unwrap_err().code(), "missing_local_id");
    }

    #[test]
    fn task_item_without_state_is_rejected() {
        let raw = issue(
            "Task",
            json!([{
                "type": "taskList",
                "attrs": {"localId": "list"},
                "content": [{"type": "taskItem", "attrs": {"localId": "i"}, "content": []}]
            }]),
        );
        assert_eq!(validate_response(&raw).unwrap_err().code(), "missing_task_state");
    }

    #[test]
    fn document_header_is_checked() {
        let raw = json!({
            "fields": {
                "project": {"key": "PCL"},
                "summary": "Add endpoint",
                "issuetype": {"name": "Story"},
                "assignee": {"accountId": "acc"},
                "description": {"type": "doc", "version": 2, "content": []}
            }
        })
        .to_string();
        assert_eq!(validate_response(&raw).unwrap_err().code(), "invalid_document");
    }

    #[test]
    fn long_summary_is_rejected() {
        let raw = json!({
            "fields": {
                "project": {"key": "PCL"},
                "summary": "x".repeat(SUMMARY_MAX_CHARS + 1),
                "issuetype": {"name": "Task"},
                "assignee": {"accountId": "acc"},
                "description": {"type": "doc", "version": 1, "content": []}
            }
        })
        .to_string();
        assert_eq!(validate_response(&raw).unwrap_err().code(), "invalid_summary");
    }

    #[test]
    fn summary_length_counts_characters_not_bytes() {
        assert!(check_summary(&"주".repeat(SUMMARY_MAX_CHARS)).is_ok());
    }

    #[test]
    fn bracket_prefixed_summary_is_rejected() {
        assert!(check_summary("[Feat] Add endpoint").is_err());
        assert!(check_summary("【Fix】 Handle timeout").is_err());
        assert!(check_summary("Add [optional] flag").is_ok());
    }

    #[test]
    fn tag_prefix_pattern_always_applies() {
        assert!(TAG_PREFIX.is_match("  (chore) bump deps"));
        let err = check_summary("(chore) bump deps").unwrap_err();
        assert_eq!(err.code(), "invalid_summary");
    }

    #[test]
    fn project_and_assignee_must_match_expectations() {
        let raw = issue("Task", json!([]));
        let validator = ResponseValidator::new()
            .expect_project_key("PCL")
            .expect_account_id("someone-else");
        let err = validator.validate(&raw).unwrap_err();
        assert_eq!(err.code(), "field_mismatch");

        let ok = ResponseValidator::new()
            .expect_project_key("PCL")
            .expect_account_id("acc-123");
        assert!(ok.validate(&raw).is_ok());
    }

    #[test]
    fn heading_without_level_is_malformed() {
        let raw = issue(
            "Story",
            json!([{"type": "heading", "content": [{"type": "text", "text": "x"}]}]),
        );
        assert_eq!(validate_response(&raw).unwrap_err().code(), "malformed_node");
    }

    #[test]
    fn plain_completion_must_not_be_blank() {
        assert_eq!(
            validate_plain_completion(" \n").unwrap_err(),
            ValidationError::EmptyCompletion
        );
        assert_eq!(validate_plain_completion(" Fix x\n").unwrap(), "Fix x");
    }
}
