use async_trait::async_trait;

use crate::domain::branch::BranchName;
use crate::domain::change::FileWrite;
use crate::domain::repository::{
    CheckRunResult, DirectoryEntry, FileContent, PullRequestHandle, RepositoryHandle,
};
use crate::error::AppResult;

#[async_trait]
pub trait RepositoryService: Send + Sync {
    async fn verify_access(&self, name: &str) -> AppResult<RepositoryHandle>;

    /// Lists a directory on the default branch. `""` is the repository root.
    async fn list_directory(
        &self,
        repo: &RepositoryHandle,
        path: &str,
    ) -> AppResult<Vec<DirectoryEntry>>;

    async fn read_file(
        &self,
        repo: &RepositoryHandle,
        path: &str,
        git_ref: &str,
    ) -> AppResult<FileContent>;

    /// Creates `branch` at the tip of the repository's default branch.
    async fn create_branch(&self, repo: &RepositoryHandle, branch: &BranchName) -> AppResult<()>;

    /// `identity` is required to replace an existing file and must be absent
    /// to create a new one.
    async fn write_file(
        &self,
        repo: &RepositoryHandle,
        branch: &BranchName,
        path: &str,
        content: &str,
        message: &str,
        identity: Option<&str>,
    ) -> AppResult<()>;

    async fn open_pull_request(
        &self,
        repo: &RepositoryHandle,
        branch: &BranchName,
        title: &str,
        body: &str,
    ) -> AppResult<PullRequestHandle>;

    async fn pull_request_head(
        &self,
        repo: &RepositoryHandle,
        pull_request: &PullRequestHandle,
    ) -> AppResult<String>;

    async fn check_runs(
        &self,
        repo: &RepositoryHandle,
        commit_sha: &str,
    ) -> AppResult<Vec<CheckRunResult>>;

    /// Update-if-present, create-otherwise. Only a missing file selects the
    /// create path; any other read failure is returned as is.
    async fn write_file_idempotent(
        &self,
        repo: &RepositoryHandle,
        branch: &BranchName,
        path: &str,
        content: &str,
        message: &str,
    ) -> AppResult<FileWrite> {
        match self.read_file(repo, path, branch.as_str()).await {
            Ok(existing) => {
                self.write_file(repo, branch, path, content, message, Some(&existing.identity))
                    .await?;
                Ok(FileWrite::Updated)
            }
            Err(err) if err.is_not_found() => {
                self.write_file(repo, branch, path, content, message, None)
                    .await?;
                Ok(FileWrite::Created)
            }
            Err(err) => Err(err),
        }
    }
}
