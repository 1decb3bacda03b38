//! In-memory collaborators that record every call for assertions.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{AppConfig, GithubSettings, JiraSettings, WorkflowSettings};
use crate::context::AppContext;
use crate::domain::branch::BranchName;
use crate::domain::repository::{
    CheckRunResult, DirectoryEntry, FileContent, PullRequestHandle, RepositoryHandle,
};
use crate::domain::ticket::Ticket;
use crate::error::{AppError, AppResult};
use crate::services::{AnalysisAssistant, RepositoryService, TicketService};
use crate::workflow::review::ReviewGate;

pub fn app_config() -> AppConfig {
    AppConfig {
        jira: JiraSettings {
            base_url: "https://example.atlassian.net".to_string(),
            email: "dev@example.com".to_string(),
            token: "jira-token".to_string(),
        },
        github: GithubSettings {
            api_url: "https://api.github.com".to_string(),
            token: "gh-token".to_string(),
        },
        assistant: None,
        workflow: WorkflowSettings {
            base_branch: "main".to_string(),
            check_delay: Duration::ZERO,
        },
    }
}

pub fn context(
    tickets: &Arc<FakeTicketService>,
    repositories: &Arc<FakeRepositoryService>,
    assistant: Option<&Arc<FakeAssistant>>,
    review_gate: Arc<dyn ReviewGate>,
) -> AppContext {
    AppContext::new(
        app_config(),
        tickets.clone(),
        repositories.clone(),
        assistant.map(|assistant| assistant.clone() as Arc<dyn AnalysisAssistant>),
        review_gate,
    )
}

pub fn ticket(id: &str, summary: &str, description: &str) -> Ticket {
    Ticket {
        id: id.to_string(),
        summary: summary.to_string(),
        description: description.to_string(),
        status: "Open".to_string(),
    }
}

pub fn repository(full_name: &str) -> RepositoryHandle {
    RepositoryHandle {
        full_name: full_name.to_string(),
        language: Some("Python".to_string()),
        default_branch: "main".to_string(),
    }
}

#[derive(Default)]
pub struct FakeTicketService {
    tickets: HashMap<String, Ticket>,
    fail_comments: bool,
    fetches: Mutex<Vec<String>>,
    comments: Mutex<Vec<(String, String)>>,
}

impl FakeTicketService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticket(mut self, ticket: Ticket) -> Self {
        self.tickets.insert(ticket.id.clone(), ticket);
        self
    }

    pub fn failing_comments(mut self) -> Self {
        self.fail_comments = true;
        self
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn comments(&self) -> Vec<(String, String)> {
        self.comments.lock().unwrap().clone()
    }
}

#[async_trait]
impl TicketService for FakeTicketService {
    async fn fetch(&self, id: &str) -> AppResult<Ticket> {
        self.fetches.lock().unwrap().push(id.to_string());
        self.tickets
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("ticket {id}")))
    }

    async fn comment(&self, id: &str, text: &str) -> AppResult<()> {
        self.comments
            .lock()
            .unwrap()
            .push((id.to_string(), text.to_string()));
        if self.fail_comments {
            return Err(AppError::IssueTracker("comment rejected".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoCall {
    VerifyAccess(String),
    ListDirectory(String),
    ReadFile { path: String, git_ref: String },
    CreateBranch(String),
    WriteFile {
        branch: String,
        path: String,
        content: String,
        identity: Option<String>,
    },
    OpenPullRequest { branch: String, title: String, body: String },
    PullRequestHead(u64),
    CheckRuns(String),
}

#[derive(Default)]
pub struct FakeRepositoryService {
    repos: HashMap<String, RepositoryHandle>,
    root: Option<Vec<DirectoryEntry>>,
    workflows: Option<Vec<DirectoryEntry>>,
    files: Mutex<HashMap<String, FileContent>>,
    undecodable: HashSet<String>,
    existing_branches: Mutex<HashSet<String>>,
    fail_writes: bool,
    fail_pull_requests: bool,
    fail_check_runs: bool,
    check_runs: Vec<CheckRunResult>,
    calls: Mutex<Vec<RepoCall>>,
}

impl FakeRepositoryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(mut self, repo: RepositoryHandle) -> Self {
        self.repos.insert(repo.full_name.clone(), repo);
        self
    }

    pub fn with_root(mut self, names: &[&str]) -> Self {
        self.root = Some(names.iter().map(|name| DirectoryEntry::file(name)).collect());
        self
    }

    pub fn with_root_entries(mut self, entries: Vec<DirectoryEntry>) -> Self {
        self.root = Some(entries);
        self
    }

    pub fn with_workflows(mut self, names: &[&str]) -> Self {
        self.workflows = Some(
            names
                .iter()
                .map(|name| DirectoryEntry {
                    name: name.to_string(),
                    path: format!(".github/workflows/{name}"),
                    kind: crate::domain::repository::EntryKind::File,
                })
                .collect(),
        );
        self
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files.lock().unwrap().insert(
            path.to_string(),
            FileContent {
                content: content.to_string(),
                identity: format!("sha-{path}"),
            },
        );
        self
    }

    pub fn with_undecodable(mut self, path: &str) -> Self {
        self.undecodable.insert(path.to_string());
        self
    }

    pub fn with_existing_branch(self, branch: &str) -> Self {
        self.existing_branches
            .lock()
            .unwrap()
            .insert(branch.to_string());
        self
    }

    pub fn with_check_runs(mut self, runs: Vec<CheckRunResult>) -> Self {
        self.check_runs = runs;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn failing_pull_requests(mut self) -> Self {
        self.fail_pull_requests = true;
        self
    }

    pub fn failing_check_runs(mut self) -> Self {
        self.fail_check_runs = true;
        self
    }

    pub fn calls(&self) -> Vec<RepoCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<RepoCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, RepoCall::WriteFile { .. }))
            .collect()
    }

    fn record(&self, call: RepoCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RepositoryService for FakeRepositoryService {
    async fn verify_access(&self, name: &str) -> AppResult<RepositoryHandle> {
        self.record(RepoCall::VerifyAccess(name.to_string()));
        self.repos
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("repository {name}")))
    }

    async fn list_directory(
        &self,
        _repo: &RepositoryHandle,
        path: &str,
    ) -> AppResult<Vec<DirectoryEntry>> {
        self.record(RepoCall::ListDirectory(path.to_string()));
        let listing = match path {
            "" => self.root.clone(),
            ".github/workflows" => self.workflows.clone(),
            _ => None,
        };
        listing.ok_or_else(|| AppError::NotFound(format!("directory '{path}'")))
    }

    async fn read_file(
        &self,
        _repo: &RepositoryHandle,
        path: &str,
        git_ref: &str,
    ) -> AppResult<FileContent> {
        self.record(RepoCall::ReadFile {
            path: path.to_string(),
            git_ref: git_ref.to_string(),
        });
        if self.undecodable.contains(path) {
            return Err(AppError::Decode(format!("{path} is not valid UTF-8")));
        }
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("file {path}")))
    }

    async fn create_branch(&self, _repo: &RepositoryHandle, branch: &BranchName) -> AppResult<()> {
        self.record(RepoCall::CreateBranch(branch.to_string()));
        let mut branches = self.existing_branches.lock().unwrap();
        if !branches.insert(branch.to_string()) {
            return Err(AppError::AlreadyExists(format!("reference {branch}")));
        }
        Ok(())
    }

    async fn write_file(
        &self,
        _repo: &RepositoryHandle,
        branch: &BranchName,
        path: &str,
        content: &str,
        _message: &str,
        identity: Option<&str>,
    ) -> AppResult<()> {
        self.record(RepoCall::WriteFile {
            branch: branch.to_string(),
            path: path.to_string(),
            content: content.to_string(),
            identity: identity.map(str::to_string),
        });
        if self.fail_writes {
            return Err(AppError::WriteConflict(format!("{path} changed upstream")));
        }
        self.files.lock().unwrap().insert(
            path.to_string(),
            FileContent {
                content: content.to_string(),
                identity: format!("sha-{path}-next"),
            },
        );
        Ok(())
    }

    async fn open_pull_request(
        &self,
        repo: &RepositoryHandle,
        branch: &BranchName,
        title: &str,
        body: &str,
    ) -> AppResult<PullRequestHandle> {
        self.record(RepoCall::OpenPullRequest {
            branch: branch.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });
        if self.fail_pull_requests {
            return Err(AppError::Validation("no commits between main and branch".to_string()));
        }
        Ok(PullRequestHandle {
            url: format!("https://github.com/{}/pull/7", repo.full_name),
            number: 7,
        })
    }

    async fn pull_request_head(
        &self,
        _repo: &RepositoryHandle,
        pull_request: &PullRequestHandle,
    ) -> AppResult<String> {
        self.record(RepoCall::PullRequestHead(pull_request.number));
        Ok("headsha".to_string())
    }

    async fn check_runs(
        &self,
        _repo: &RepositoryHandle,
        commit_sha: &str,
    ) -> AppResult<Vec<CheckRunResult>> {
        self.record(RepoCall::CheckRuns(commit_sha.to_string()));
        if self.fail_check_runs {
            return Err(AppError::RepositoryHost("check runs unavailable".to_string()));
        }
        Ok(self.check_runs.clone())
    }
}

#[derive(Default)]
pub struct FakeAssistant {
    summary: String,
    fix: String,
    fail: bool,
    summaries: Mutex<Vec<BTreeMap<String, String>>>,
    fixes: Mutex<Vec<(String, String)>>,
}

impl FakeAssistant {
    pub fn new(summary: &str, fix: &str) -> Self {
        Self {
            summary: summary.to_string(),
            fix: fix.to_string(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn summaries(&self) -> Vec<BTreeMap<String, String>> {
        self.summaries.lock().unwrap().clone()
    }

    pub fn fixes(&self) -> Vec<(String, String)> {
        self.fixes.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisAssistant for FakeAssistant {
    async fn summarize_codebase(&self, files: &BTreeMap<String, String>) -> AppResult<String> {
        self.summaries.lock().unwrap().push(files.clone());
        if self.fail {
            return Err(AppError::LanguageModel("upstream timeout".to_string()));
        }
        Ok(self.summary.clone())
    }

    async fn propose_fix(
        &self,
        issue_description: &str,
        current_content: &str,
    ) -> AppResult<String> {
        self.fixes
            .lock()
            .unwrap()
            .push((issue_description.to_string(), current_content.to_string()));
        if self.fail {
            return Err(AppError::LanguageModel("upstream timeout".to_string()));
        }
        Ok(self.fix.clone())
    }
}
