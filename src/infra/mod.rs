pub mod github;
pub mod http;
pub mod jira;
pub mod llm;
