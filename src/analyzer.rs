use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::domain::report::{
    AnalysisReport, LLM_FINDING_PREFIX, NO_SUSPICIOUS_FILES, NO_WORKFLOW_DIRECTORY,
};
use crate::domain::repository::{DirectoryEntry, EntryKind, RepositoryHandle};
use crate::error::AppError;
use crate::services::{AnalysisAssistant, RepositoryService};

pub const WORKFLOW_DIRECTORY: &str = ".github/workflows";
const MAX_ASSISTANT_FILES: usize = 3;
const SUSPICIOUS_MARKERS: [&str; 2] = ["password", "secret"];
const SOURCE_EXTENSIONS: [&str; 16] = [
    "py", "rs", "js", "jsx", "ts", "tsx", "go", "java", "kt", "rb", "php", "c", "cpp", "h", "cs",
    "swift",
];
const DOCUMENTATION_FILES: [&str; 3] = ["README.md", "README.rst", "README.txt"];

/// Inspects a repository without ever failing: collaborator errors end up
/// as findings in the returned report.
pub struct RepositoryAnalyzer<'a> {
    repositories: &'a dyn RepositoryService,
    assistant: Option<&'a dyn AnalysisAssistant>,
}

impl<'a> RepositoryAnalyzer<'a> {
    pub fn new(
        repositories: &'a dyn RepositoryService,
        assistant: Option<&'a dyn AnalysisAssistant>,
    ) -> Self {
        Self {
            repositories,
            assistant,
        }
    }

    pub async fn analyze(&self, repo: &RepositoryHandle) -> AnalysisReport {
        let findings = match self.assistant {
            Some(assistant) => match self.assistant_findings(repo, assistant).await {
                Some(findings) => findings,
                None => self.heuristic_findings(repo).await,
            },
            None => self.heuristic_findings(repo).await,
        };

        AnalysisReport {
            detected_language: repo.language.clone(),
            findings,
            workflow_files: self.workflow_files(repo).await,
        }
    }

    async fn heuristic_findings(&self, repo: &RepositoryHandle) -> Vec<String> {
        let entries = match self.repositories.list_directory(repo, "").await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(repo = %repo.full_name, error = %err, "root listing failed");
                return vec![format!("Error scanning files: {err}")];
            }
        };

        let findings = entries
            .iter()
            .filter(|entry| is_suspicious(&entry.name))
            .map(|entry| format!("Suspicious file name found: {}", entry.name))
            .collect::<Vec<_>>();

        if findings.is_empty() {
            vec![NO_SUSPICIOUS_FILES.to_string()]
        } else {
            findings
        }
    }

    /// `None` means the assistant had nothing to look at and the heuristic
    /// scan should run instead.
    async fn assistant_findings(
        &self,
        repo: &RepositoryHandle,
        assistant: &dyn AnalysisAssistant,
    ) -> Option<Vec<String>> {
        let entries = match self.repositories.list_directory(repo, "").await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(repo = %repo.full_name, error = %err, "root listing failed, skipping assistant");
                return None;
            }
        };

        let mut files = BTreeMap::new();
        for entry in entries.iter().filter(|e| qualifies_for_assistant(e)).take(MAX_ASSISTANT_FILES) {
            match self
                .repositories
                .read_file(repo, &entry.path, &repo.default_branch)
                .await
            {
                Ok(file) => {
                    files.insert(entry.name.clone(), file.content);
                }
                Err(err) => debug!(file = %entry.path, error = %err, "skipping unreadable file"),
            }
        }

        if files.is_empty() {
            return None;
        }

        let text = assistant
            .summarize_codebase(&files)
            .await
            .unwrap_or_else(|err| degraded_assistant_text(&err));
        Some(vec![format!("{LLM_FINDING_PREFIX}{text}")])
    }

    async fn workflow_files(&self, repo: &RepositoryHandle) -> Vec<String> {
        match self.repositories.list_directory(repo, WORKFLOW_DIRECTORY).await {
            Ok(entries) => entries.into_iter().map(|entry| entry.name).collect(),
            Err(err) => {
                debug!(repo = %repo.full_name, error = %err, "no workflow directory");
                vec![NO_WORKFLOW_DIRECTORY.to_string()]
            }
        }
    }
}

pub fn degraded_assistant_text(err: &AppError) -> String {
    warn!(error = %err, "assistant call failed");
    format!("Error calling LLM: {err}")
}

fn is_suspicious(name: &str) -> bool {
    let lowered = name.to_lowercase();
    SUSPICIOUS_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

fn qualifies_for_assistant(entry: &DirectoryEntry) -> bool {
    if entry.kind != EntryKind::File {
        return false;
    }
    if DOCUMENTATION_FILES.contains(&entry.name.as_str()) {
        return true;
    }
    entry
        .name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| SOURCE_EXTENSIONS.contains(&ext))
}
