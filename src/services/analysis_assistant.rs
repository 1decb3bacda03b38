use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::AppResult;

/// Free-form text generator. Whatever comes back is unverified and must be
/// treated as a proposal, never as known-good code.
#[async_trait]
pub trait AnalysisAssistant: Send + Sync {
    async fn summarize_codebase(&self, files: &BTreeMap<String, String>) -> AppResult<String>;
    async fn propose_fix(&self, issue_description: &str, current_content: &str)
    -> AppResult<String>;
}
