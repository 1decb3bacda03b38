use std::fmt;

/// What a failed stage does to the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// Stop the run and report the failure.
    Halt,
    /// Log the failure and move on to the next stage.
    BestEffort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchTicket,
    VerifyRepository,
    AnalyzeAndReport,
    CreateBranch,
    PrepareChange,
    CommitChange,
    OpenPullRequest,
    AnnouncePullRequest,
    AwaitReview,
    PollChecks,
    ReportChecks,
    Completed,
}

impl Stage {
    pub const FIRST: Stage = Stage::FetchTicket;

    pub fn next(self) -> Stage {
        match self {
            Stage::FetchTicket => Stage::VerifyRepository,
            Stage::VerifyRepository => Stage::AnalyzeAndReport,
            Stage::AnalyzeAndReport => Stage::CreateBranch,
            Stage::CreateBranch => Stage::PrepareChange,
            Stage::PrepareChange => Stage::CommitChange,
            Stage::CommitChange => Stage::OpenPullRequest,
            Stage::OpenPullRequest => Stage::AnnouncePullRequest,
            Stage::AnnouncePullRequest => Stage::AwaitReview,
            Stage::AwaitReview => Stage::PollChecks,
            Stage::PollChecks => Stage::ReportChecks,
            Stage::ReportChecks => Stage::Completed,
            Stage::Completed => Stage::Completed,
        }
    }

    pub fn policy(self) -> StepPolicy {
        match self {
            Stage::FetchTicket
            | Stage::VerifyRepository
            | Stage::CreateBranch
            | Stage::OpenPullRequest
            | Stage::AwaitReview => StepPolicy::Halt,
            Stage::AnalyzeAndReport
            | Stage::PrepareChange
            | Stage::CommitChange
            | Stage::AnnouncePullRequest
            | Stage::PollChecks
            | Stage::ReportChecks
            | Stage::Completed => StepPolicy::BestEffort,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::FetchTicket => "fetch-ticket",
            Stage::VerifyRepository => "verify-repository",
            Stage::AnalyzeAndReport => "analyze-and-report",
            Stage::CreateBranch => "create-branch",
            Stage::PrepareChange => "prepare-change",
            Stage::CommitChange => "commit-change",
            Stage::OpenPullRequest => "open-pull-request",
            Stage::AnnouncePullRequest => "announce-pull-request",
            Stage::AwaitReview => "await-review",
            Stage::PollChecks => "poll-checks",
            Stage::ReportChecks => "report-checks",
            Stage::Completed => "completed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
