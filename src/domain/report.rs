pub const NO_SUSPICIOUS_FILES: &str = "No obvious suspicious filenames found in root.";
pub const NO_WORKFLOW_DIRECTORY: &str = "No .github/workflows directory found.";
pub const LLM_FINDING_PREFIX: &str = "LLM Analysis:\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub detected_language: Option<String>,
    pub findings: Vec<String>,
    pub workflow_files: Vec<String>,
}

impl AnalysisReport {
    pub fn language_label(&self) -> &str {
        self.detected_language.as_deref().unwrap_or("Unknown")
    }

    /// Jira wiki markup, posted as the first ticket comment of a run.
    pub fn to_ticket_comment(&self, repo_name: &str) -> String {
        format!(
            "h2. Automated Repository Analysis for {repo_name}\n\n\
             *Language:* {}\n\
             *Potential Vulnerabilities:* {}\n\
             *Existing Workflows:* {}",
            self.language_label(),
            self.findings.join(", "),
            self.workflow_files.join(", ")
        )
    }

    pub fn to_plain_text(&self) -> String {
        format!(
            "Language: {}\nVulnerabilities: {}\nWorkflows: {}",
            self.language_label(),
            self.findings.join(", "),
            self.workflow_files.join(", ")
        )
    }
}
