use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::branch::BranchName;
use crate::domain::change::ChangeSet;
use crate::domain::repository::PullRequestHandle;
use crate::error::AppResult;

pub const CHANGE_REQUEST_PATH: &str = "manual_update.txt";

#[derive(Debug, Clone)]
pub struct ChangeRequest {
    pub ticket_id: String,
    pub repo_name: String,
    pub title: String,
    pub body: String,
    pub change_description: String,
}

/// One-shot variant of the ticket pipeline for callers that already know the
/// pull request text: no ticket fetch, no analysis, no review gate. A failed
/// file write is logged and the pull request is still attempted.
pub async fn open_change_request(
    ctx: &AppContext,
    request: &ChangeRequest,
) -> AppResult<PullRequestHandle> {
    let repo = ctx.repositories.verify_access(request.repo_name.trim()).await?;
    let branch = BranchName::for_ticket(&request.ticket_id);
    ctx.repositories.create_branch(&repo, &branch).await?;

    let content = format!("Change Request: {}", request.change_description);
    if let Err(err) = ctx
        .repositories
        .write_file_idempotent(
            &repo,
            &branch,
            CHANGE_REQUEST_PATH,
            &content,
            &ChangeSet::commit_message_for(request.ticket_id.trim()),
        )
        .await
    {
        warn!(%branch, error = %err, "change request file was not written");
    }

    let pull_request = ctx
        .repositories
        .open_pull_request(&repo, &branch, &request.title, &request.body)
        .await?;
    info!(url = %pull_request.url, "change request opened");
    Ok(pull_request)
}
