//! Generation request composition.
//!
//! The instruction text is fixed; only the project key and assignee are
//! substituted into the output schema. The change set is passed through
//! untouched as the last message.

use crate::domain::change_set::ChangeSet;
use crate::domain::request::GenerationRequest;

/// Longest summary the instructions ask for and the validator accepts.
pub const SUMMARY_MAX_CHARS: usize = 80;

const PROJECT_KEY_SLOT: &str = "{{project_key}}";
const ACCOUNT_ID_SLOT: &str = "{{account_id}}";

pub const ISSUE_SYSTEM_PROMPT: &str = "\
You are an expert code reviewer and experienced project manager who reads changes to large \
codebases and turns their intent into work items.
Your goal is to read a git diff, summarize its business and technical context, and produce \
a Jira issue (Story or Task) as an exact JSON payload.
JSON validity, ADF conformance and concise, concrete wording take priority over everything else.
";

const ISSUE_INSTRUCTIONS_TEMPLATE: &str = r#"Analyze the git diff in the next message and produce the JSON used to create a Jira issue.

Output requirements:
- Output JSON only: no explanations, no code fences, no comments, no trailing commas.
- Fill in the schema below as-is; do not rename keys or change the structure.
- Stay factual: base every statement on the diff, no exaggeration or assumptions.

Issue rules:
1) Filter trivial changes
   - If every change is a comment edit, formatting, a plain variable/function rename or a
     test snapshot refresh, do not create an issue: return the bare JSON value null.
2) Issue type (exactly one of Story | Task)
   - Story: new behaviour that gives value to users or clients, a new public API or endpoint,
     a UI change, or a data model change that creates a functional requirement.
   - Task: refactoring, performance or stability work, dependency/build/infrastructure changes,
     additional tests, bug fixes (classified as Task because of the type restriction).
3) Summary
   - No prefix or tag (for example "[Feat]" is forbidden), at most 80 characters, specific,
     imperative mood, present tense.
   - Example: "Add retry logic to the order creation API to reduce timeouts"
4) Description (ADF)
   - Use only these nodes: doc, heading, paragraph, bulletList, listItem, taskList, taskItem, codeBlock.
     Inline content inside paragraph, heading, taskItem and codeBlock is limited to text nodes.
   - No large code blocks; codeBlock only for short illustrative snippets (optional).
   - taskList and taskItem must have exactly this shape. Every localId is a UUID and is unique
     within the document; taskList needs attrs.localId as well:
     {
       "type": "taskList",
       "attrs": { "localId": "b9d8a8a6-9b3a-4b4a-9e9b-3b4b1d2f3a4c" },
       "content": [
         {
           "type": "taskItem",
           "attrs": { "localId": "c1b2d3e4-f567-489a-9abc-0123456789ab", "state": "TODO" },
           "content": [{ "type": "text", "text": "Verify behaviour without an upstream, without origin/main and with a detached HEAD" }]
         }
       ]
     }
5) Other
   - Do not list every file path or identifier; mention meaningful categories or examples only.
   - Be as specific as possible about numbers, versions and endpoints.
   - Never expose personal data, secrets, tokens or internal URLs.

Self-check before answering:
- The output parses as JSON.
- issuetype.name is either Story or Task.
- description has "type": "doc" and "version": 1 at the top level and contains only allowed nodes.
- When the changes are trivial, the output is the bare value null.

Schema (fill in the values only; project.key and assignee.accountId are given, copy them verbatim):
{
  "fields": {
    "project": { "key": "{{project_key}}" },
    "summary": "<title>",
    "issuetype": { "name": "<Story|Task>" },
    "assignee": { "accountId": "{{account_id}}" },
    "description": {
      "type": "doc",
      "version": 1,
      "content": []
    }
  }
}
The description content array above is where the ADF nodes go."#;

pub const COMMIT_SYSTEM_PROMPT: &str = "\
You are a senior engineer who writes clear, conventional git commit messages from diffs.
";

pub const COMMIT_INSTRUCTIONS: &str = "\
Write a git commit message for the diff in the next message.

- First line: imperative mood, at most 72 characters, no trailing period.
- Leave one blank line, then a short body explaining what changed and why, wrapped at 72 columns.
- Base everything on the diff; do not invent context.
- Output the commit message only: no code fences, no quotes, no commentary.";

/// Build the issue generation request for `change_set`.
///
/// `project_key` and `account_id` are placed verbatim into the schema the
/// generator must fill; they are never left for the generator to invent.
pub fn compose_issue_request(
    change_set: &ChangeSet,
    project_key: &str,
    account_id: &str,
) -> GenerationRequest {
    GenerationRequest::new(
        ISSUE_SYSTEM_PROMPT.to_string(),
        issue_instructions(project_key, account_id),
        change_set.as_str().to_string(),
    )
}

/// Build the commit message request for `change_set`.
pub fn compose_commit_message_request(change_set: &ChangeSet) -> GenerationRequest {
    GenerationRequest::new(
        COMMIT_SYSTEM_PROMPT.to_string(),
        COMMIT_INSTRUCTIONS.to_string(),
        change_set.as_str().to_string(),
    )
}

/// Instruction text with the project key and assignee substituted.
pub fn issue_instructions(project_key: &str, account_id: &str) -> String {
    ISSUE_INSTRUCTIONS_TEMPLATE
        .replace(PROJECT_KEY_SLOT, &json_string_body(project_key))
        .replace(ACCOUNT_ID_SLOT, &json_string_body(account_id))
}

/// Escape `s` for placement between the quotes of a JSON string.
fn json_string_body(s: &str) -> String {
    let quoted = serde_json::Value::String(s.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}
