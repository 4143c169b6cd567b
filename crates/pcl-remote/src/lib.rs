//! HTTP adapters for the `pcl-core` service traits.
//!
//! - [`openai::OpenAiClient`] implements `GenerationService`
//! - [`jira::JiraClient`] implements `IssueTracker`

mod error;
pub mod jira;
pub mod openai;

pub use jira::{basic_auth_header, JiraClient, JiraConfig};
pub use openai::{OpenAiClient, OpenAiConfig};
