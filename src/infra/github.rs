use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client, RequestBuilder,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::config::{GithubSettings, WorkflowSettings};
use crate::domain::branch::BranchName;
use crate::domain::repository::{
    CheckRunResult, DirectoryEntry, EntryKind, FileContent, PullRequestHandle, RepositoryHandle,
};
use crate::error::{AppError, AppResult};
use crate::infra::http::{Service, ensure_success};
use crate::services::RepositoryService;

const API_VERSION: &str = "2022-11-28";

pub struct GithubClient {
    http: Client,
    api_url: String,
    base_branch: String,
}

impl GithubClient {
    pub fn new(settings: &GithubSettings, workflow: &WorkflowSettings) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("ticketpilot"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        let auth = HeaderValue::from_str(&format!("Bearer {}", settings.token.trim()))
            .map_err(|_| AppError::Configuration("GitHub token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| Service::RepositoryHost.transport(err))?;

        Ok(Self {
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            base_branch: workflow.base_branch.clone(),
        })
    }

    fn repo_url(&self, full_name: &str, suffix: &str) -> String {
        format!("{}/repos/{full_name}{suffix}", self.api_url)
    }

    fn contents_url(&self, full_name: &str, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            self.repo_url(full_name, "/contents")
        } else {
            self.repo_url(full_name, &format!("/contents/{path}"))
        }
    }

    async fn send(&self, request: RequestBuilder, subject: &str) -> AppResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|err| Service::RepositoryHost.transport(err))?;
        ensure_success(response, Service::RepositoryHost, subject).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        subject: &str,
    ) -> AppResult<T> {
        self.send(request, subject)
            .await?
            .json()
            .await
            .map_err(|err| Service::RepositoryHost.decode(err))
    }
}

#[async_trait]
impl RepositoryService for GithubClient {
    async fn verify_access(&self, name: &str) -> AppResult<RepositoryHandle> {
        let name = name.trim();
        if name.split('/').filter(|part| !part.is_empty()).count() != 2 {
            return Err(AppError::Validation(format!(
                "repository must be given as owner/repo, got '{name}'"
            )));
        }
        let repo: RepoResponse = self
            .send_json(
                self.http.get(self.repo_url(name, "")),
                &format!("repository {name}"),
            )
            .await?;
        Ok(RepositoryHandle {
            full_name: repo.full_name,
            language: repo.language,
            default_branch: self.base_branch.clone(),
        })
    }

    async fn list_directory(
        &self,
        repo: &RepositoryHandle,
        path: &str,
    ) -> AppResult<Vec<DirectoryEntry>> {
        let entries: Vec<ContentEntry> = self
            .send_json(
                self.http.get(self.contents_url(&repo.full_name, path)),
                &format!("directory '{path}' in {}", repo.full_name),
            )
            .await?;
        Ok(entries
            .into_iter()
            .map(|entry| DirectoryEntry {
                kind: EntryKind::from_api(&entry.kind),
                name: entry.name,
                path: entry.path,
            })
            .collect())
    }

    async fn read_file(
        &self,
        repo: &RepositoryHandle,
        path: &str,
        git_ref: &str,
    ) -> AppResult<FileContent> {
        let file: FileResponse = self
            .send_json(
                self.http
                    .get(self.contents_url(&repo.full_name, path))
                    .query(&[("ref", git_ref)]),
                &format!("file {path} at {git_ref}"),
            )
            .await?;
        let content = decode_content(path, file.content.as_deref().unwrap_or_default())?;
        Ok(FileContent {
            content,
            identity: file.sha,
        })
    }

    async fn create_branch(&self, repo: &RepositoryHandle, branch: &BranchName) -> AppResult<()> {
        let base = &repo.default_branch;
        let reference: RefResponse = self
            .send_json(
                self.http
                    .get(self.repo_url(&repo.full_name, &format!("/git/ref/heads/{base}"))),
                &format!("branch {base}"),
            )
            .await?;
        debug!(%base, sha = %reference.object.sha, "resolved base branch");

        let request = self
            .http
            .post(self.repo_url(&repo.full_name, "/git/refs"))
            .json(&CreateRefRequest {
                reference: format!("refs/heads/{branch}"),
                sha: &reference.object.sha,
            });
        match self.send(request, &format!("branch {branch}")).await {
            Ok(_) => Ok(()),
            Err(AppError::Validation(detail)) => Err(AppError::AlreadyExists(detail)),
            Err(err) => Err(err),
        }
    }

    async fn write_file(
        &self,
        repo: &RepositoryHandle,
        branch: &BranchName,
        path: &str,
        content: &str,
        message: &str,
        identity: Option<&str>,
    ) -> AppResult<()> {
        let request = self
            .http
            .put(self.contents_url(&repo.full_name, path))
            .json(&WriteFileRequest {
                message,
                content: BASE64_STANDARD.encode(content),
                branch: branch.as_str(),
                sha: identity,
            });
        self.send(request, &format!("file {path} on {branch}"))
            .await?;
        Ok(())
    }

    async fn open_pull_request(
        &self,
        repo: &RepositoryHandle,
        branch: &BranchName,
        title: &str,
        body: &str,
    ) -> AppResult<PullRequestHandle> {
        let pull: PullResponse = self
            .send_json(
                self.http
                    .post(self.repo_url(&repo.full_name, "/pulls"))
                    .json(&CreatePullRequest {
                        title,
                        body,
                        head: branch.as_str(),
                        base: &repo.default_branch,
                    }),
                &format!("pull request from {branch}"),
            )
            .await?;
        Ok(PullRequestHandle {
            url: pull.html_url,
            number: pull.number,
        })
    }

    async fn pull_request_head(
        &self,
        repo: &RepositoryHandle,
        pull_request: &PullRequestHandle,
    ) -> AppResult<String> {
        let number = pull_request.number;
        let pull: PullResponse = self
            .send_json(
                self.http
                    .get(self.repo_url(&repo.full_name, &format!("/pulls/{number}"))),
                &format!("pull request #{number}"),
            )
            .await?;
        Ok(pull.head.sha)
    }

    async fn check_runs(
        &self,
        repo: &RepositoryHandle,
        commit_sha: &str,
    ) -> AppResult<Vec<CheckRunResult>> {
        let runs: CheckRunsResponse = self
            .send_json(
                self.http.get(
                    self.repo_url(&repo.full_name, &format!("/commits/{commit_sha}/check-runs")),
                ),
                &format!("check runs for {commit_sha}"),
            )
            .await?;
        Ok(runs
            .check_runs
            .into_iter()
            .map(|run| CheckRunResult {
                name: run.name,
                status: run.status,
                conclusion: run.conclusion,
            })
            .collect())
    }
}

/// The contents API wraps base64 at 60 columns, so whitespace is dropped
/// before decoding.
fn decode_content(path: &str, encoded: &str) -> AppResult<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64_STANDARD
        .decode(compact)
        .map_err(|err| AppError::Decode(format!("{path}: {err}")))?;
    String::from_utf8(bytes).map_err(|_| AppError::Decode(format!("{path} is not valid UTF-8")))
}

#[derive(Deserialize)]
struct RepoResponse {
    full_name: String,
    language: Option<String>,
}

#[derive(Deserialize)]
struct ContentEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct FileResponse {
    sha: String,
    content: Option<String>,
}

#[derive(Deserialize)]
struct RefResponse {
    object: RefObject,
}

#[derive(Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Serialize)]
struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    reference: String,
    sha: &'a str,
}

#[derive(Serialize)]
struct WriteFileRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Serialize)]
struct CreatePullRequest<'a> {
    title: &'a str,
    body: &'a str,
    head: &'a str,
    base: &'a str,
}

#[derive(Deserialize)]
struct PullResponse {
    html_url: String,
    number: u64,
    head: PullHead,
}

#[derive(Deserialize)]
struct PullHead {
    sha: String,
}

#[derive(Deserialize)]
struct CheckRunsResponse {
    check_runs: Vec<CheckRunEntry>,
}

#[derive(Deserialize)]
struct CheckRunEntry {
    name: String,
    status: String,
    conclusion: Option<String>,
}
