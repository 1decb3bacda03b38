#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    pub full_name: String,
    pub language: Option<String>,
    pub default_branch: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

impl EntryKind {
    pub fn from_api(value: &str) -> Self {
        match value {
            "file" => EntryKind::File,
            "dir" => EntryKind::Directory,
            _ => EntryKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
}

impl DirectoryEntry {
    #[cfg(test)]
    pub fn file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: name.to_string(),
            kind: EntryKind::File,
        }
    }
}

/// Decoded file content together with the blob identity the host needs to
/// accept an update of the same path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub content: String,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestHandle {
    pub url: String,
    pub number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRunResult {
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
}

impl CheckRunResult {
    pub fn render(&self) -> String {
        format!(
            "{}: {} - {}",
            self.name,
            self.status,
            self.conclusion.as_deref().unwrap_or("none")
        )
    }
}

pub const NO_CHECK_RUNS: &str = "No check runs found.";

pub fn render_check_runs(runs: &[CheckRunResult]) -> String {
    if runs.is_empty() {
        return NO_CHECK_RUNS.to_string();
    }
    runs.iter()
        .map(CheckRunResult::render)
        .collect::<Vec<_>>()
        .join("\n")
}
