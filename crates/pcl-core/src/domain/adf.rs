//! Typed subset of the Atlassian Document Format used for issue descriptions.
//!
//! Only the allow-listed block nodes are representable; inline content is
//! limited to `text` nodes. Serialization produces the wire shape Jira
//! expects (`{"type":"doc","version":1,"content":[...]}`).

use serde::{Deserialize, Serialize};

/// Version written into every document.
pub const ADF_VERSION: u32 = 1;

/// Marker for the top-level `"type": "doc"` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocKind {
    #[serde(rename = "doc")]
    Doc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfDocument {
    #[serde(rename = "type")]
    pub kind: DocKind,
    pub version: u32,
    pub content: Vec<BlockNode>,
}

impl AdfDocument {
    pub fn new(content: Vec<BlockNode>) -> Self {
        Self {
            kind: DocKind::Doc,
            version: ADF_VERSION,
            content,
        }
    }

    /// All `localId`s of task lists and task items, in document order.
    pub fn local_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for node in &self.content {
            node.collect_local_ids(&mut ids);
        }
        ids
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockNode {
    Heading {
        attrs: HeadingAttrs,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        content: Vec<InlineNode>,
    },
    Paragraph {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        content: Vec<InlineNode>,
    },
    BulletList {
        content: Vec<BlockNode>,
    },
    ListItem {
        content: Vec<BlockNode>,
    },
    TaskList {
        attrs: TaskListAttrs,
        content: Vec<BlockNode>,
    },
    TaskItem {
        attrs: TaskItemAttrs,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        content: Vec<InlineNode>,
    },
    CodeBlock {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attrs: Option<CodeBlockAttrs>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        content: Vec<InlineNode>,
    },
}

impl BlockNode {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        BlockNode::Heading {
            attrs: HeadingAttrs { level },
            content: vec![InlineNode::text(text)],
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        BlockNode::Paragraph {
            content: vec![InlineNode::text(text)],
        }
    }

    /// Bullet list with one paragraph per item.
    pub fn bullet_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BlockNode::BulletList {
            content: items
                .into_iter()
                .map(|text| BlockNode::ListItem {
                    content: vec![BlockNode::paragraph(text)],
                })
                .collect(),
        }
    }

    pub fn task_list(local_id: impl Into<String>, items: Vec<BlockNode>) -> Self {
        BlockNode::TaskList {
            attrs: TaskListAttrs {
                local_id: local_id.into(),
            },
            content: items,
        }
    }

    pub fn task_item(local_id: impl Into<String>, state: TaskState, text: impl Into<String>) -> Self {
        BlockNode::TaskItem {
            attrs: TaskItemAttrs {
                local_id: local_id.into(),
                state,
            },
            content: vec![InlineNode::text(text)],
        }
    }

    /// Wire name of the node type.
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockNode::Heading { .. } => "heading",
            BlockNode::Paragraph { .. } => "paragraph",
            BlockNode::BulletList { .. } => "bulletList",
            BlockNode::ListItem { .. } => "listItem",
            BlockNode::TaskList { .. } => "taskList",
            BlockNode::TaskItem { .. } => "taskItem",
            BlockNode::CodeBlock { .. } => "codeBlock",
        }
    }

    fn collect_local_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            BlockNode::TaskList { attrs, content } => {
                out.push(&attrs.local_id);
                for child in content {
                    child.collect_local_ids(out);
                }
            }
            BlockNode::TaskItem { attrs, .. } => out.push(&attrs.local_id),
            BlockNode::BulletList { content } | BlockNode::ListItem { content } => {
                for child in content {
                    child.collect_local_ids(out);
                }
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InlineNode {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
}

impl InlineNode {
    pub fn text(text: impl Into<String>) -> Self {
        InlineNode::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }
}

/// Text decoration (`strong`, `code`, `link`, ...). Marks are not nodes and
/// are carried through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingAttrs {
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListAttrs {
    pub local_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItemAttrs {
    pub local_id: String,
    pub state: TaskState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    Todo,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlockAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}
