use tracing::{debug, info, warn};

use crate::analyzer::{RepositoryAnalyzer, degraded_assistant_text};
use crate::context::AppContext;
use crate::domain::branch::BranchName;
use crate::domain::change::ChangeSet;
use crate::domain::repository::{PullRequestHandle, RepositoryHandle, render_check_runs};
use crate::domain::ticket::Ticket;
use crate::error::{AppError, AppResult};
use crate::workflow::stage::{Stage, StepPolicy};

pub const CONTEXT_FILE: &str = "README.md";
pub const ASSISTANT_FALLBACK_PATH: &str = "ai_generated_fix.txt";
pub const PLACEHOLDER_PATH: &str = "automated_update.txt";
pub const NO_CONTEXT_PLACEHOLDER: &str = "No context file available.";
const AI_MARKER: &str = "_AI generated change; review carefully._";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed {
        pull_request: PullRequestHandle,
        ci_report: String,
    },
    Halted {
        stage: Stage,
        reason: String,
    },
}

#[derive(Default)]
struct RunState {
    ticket: Option<Ticket>,
    repo: Option<RepositoryHandle>,
    branch: Option<BranchName>,
    change: Option<ChangeSet>,
    pull_request: Option<PullRequestHandle>,
    ci_report: Option<String>,
}

/// Drives one ticket from fetch to the final CI report. Each stage runs
/// only after the previous one returned, and a failure is handled according
/// to [`Stage::policy`]. Nothing is retried.
pub struct TicketPipeline<'a> {
    ctx: &'a AppContext,
    ticket_id: String,
    repo_name: String,
    state: RunState,
}

impl<'a> TicketPipeline<'a> {
    pub fn new(ctx: &'a AppContext, ticket_id: &str, repo_name: &str) -> Self {
        Self {
            ctx,
            ticket_id: ticket_id.trim().to_string(),
            repo_name: repo_name.trim().to_string(),
            state: RunState::default(),
        }
    }

    pub async fn run(mut self) -> RunOutcome {
        let mut stage = Stage::FIRST;
        while stage != Stage::Completed {
            debug!(ticket = %self.ticket_id, %stage, "entering stage");
            if let Err(err) = self.execute(stage).await {
                match stage.policy() {
                    StepPolicy::Halt => {
                        warn!(ticket = %self.ticket_id, %stage, error = %err, "run halted");
                        return RunOutcome::Halted {
                            stage,
                            reason: err.to_string(),
                        };
                    }
                    StepPolicy::BestEffort => {
                        warn!(ticket = %self.ticket_id, %stage, error = %err, "continuing after failure");
                    }
                }
            }
            stage = stage.next();
        }

        match (self.state.pull_request, self.state.ci_report) {
            (Some(pull_request), Some(ci_report)) => RunOutcome::Completed {
                pull_request,
                ci_report,
            },
            _ => RunOutcome::Halted {
                stage: Stage::Completed,
                reason: "run ended without a pull request".to_string(),
            },
        }
    }

    async fn execute(&mut self, stage: Stage) -> AppResult<()> {
        match stage {
            Stage::FetchTicket => self.fetch_ticket().await,
            Stage::VerifyRepository => self.verify_repository().await,
            Stage::AnalyzeAndReport => self.analyze_and_report().await,
            Stage::CreateBranch => self.create_branch().await,
            Stage::PrepareChange => self.prepare_change().await,
            Stage::CommitChange => self.commit_change().await,
            Stage::OpenPullRequest => self.open_pull_request().await,
            Stage::AnnouncePullRequest => self.announce_pull_request().await,
            Stage::AwaitReview => self.await_review().await,
            Stage::PollChecks => self.poll_checks().await,
            Stage::ReportChecks => self.report_checks().await,
            Stage::Completed => Ok(()),
        }
    }

    async fn fetch_ticket(&mut self) -> AppResult<()> {
        if self.ticket_id.is_empty() {
            return Err(AppError::NotFound("ticket id is required".to_string()));
        }
        let ticket = self.ctx.tickets.fetch(&self.ticket_id).await?;
        info!(ticket = %ticket.id, summary = %ticket.summary, "fetched ticket");
        self.state.ticket = Some(ticket);
        Ok(())
    }

    async fn verify_repository(&mut self) -> AppResult<()> {
        let repo = self.ctx.repositories.verify_access(&self.repo_name).await?;
        info!(repo = %repo.full_name, "repository accessible");
        self.state.repo = Some(repo);
        Ok(())
    }

    async fn analyze_and_report(&mut self) -> AppResult<()> {
        let repo = required(&self.state.repo, "repository")?;
        let analyzer =
            RepositoryAnalyzer::new(self.ctx.repositories.as_ref(), self.ctx.assistant.as_deref());
        let report = analyzer.analyze(repo).await;
        info!(repo = %repo.full_name, findings = report.findings.len(), "analysis finished");

        self.ctx
            .tickets
            .comment(&self.ticket_id, &report.to_ticket_comment(&self.repo_name))
            .await
    }

    async fn create_branch(&mut self) -> AppResult<()> {
        let repo = required(&self.state.repo, "repository")?;
        let branch = BranchName::for_ticket(&self.ticket_id);
        self.ctx.repositories.create_branch(repo, &branch).await?;
        info!(%branch, "branch created");
        self.state.branch = Some(branch);
        Ok(())
    }

    async fn prepare_change(&mut self) -> AppResult<()> {
        let repo = required(&self.state.repo, "repository")?;
        let branch = required(&self.state.branch, "branch")?;
        let ticket = required(&self.state.ticket, "ticket")?;

        let (file_path, content, ai_generated) = match self.ctx.assistant.as_deref() {
            Some(assistant) => {
                let (path, context) = match self
                    .ctx
                    .repositories
                    .read_file(repo, CONTEXT_FILE, branch.as_str())
                    .await
                {
                    Ok(file) => (CONTEXT_FILE, file.content),
                    Err(err) => {
                        debug!(error = %err, "no context file, generating standalone fix");
                        (ASSISTANT_FALLBACK_PATH, NO_CONTEXT_PLACEHOLDER.to_string())
                    }
                };
                let content = assistant
                    .propose_fix(&ticket.description, &context)
                    .await
                    .unwrap_or_else(|err| degraded_assistant_text(&err));
                (path, content, true)
            }
            None => (
                PLACEHOLDER_PATH,
                format!("Automated update for ticket {}", self.ticket_id),
                false,
            ),
        };

        self.state.change = Some(ChangeSet {
            branch: branch.clone(),
            file_path: file_path.to_string(),
            content,
            commit_message: ChangeSet::commit_message_for(&self.ticket_id),
            ai_generated,
        });
        Ok(())
    }

    async fn commit_change(&mut self) -> AppResult<()> {
        let repo = required(&self.state.repo, "repository")?;
        let change = required(&self.state.change, "change set")?;
        let outcome = self
            .ctx
            .repositories
            .write_file_idempotent(
                repo,
                &change.branch,
                &change.file_path,
                &change.content,
                &change.commit_message,
            )
            .await?;
        info!(path = %change.file_path, outcome = outcome.as_str(), "committed change");
        Ok(())
    }

    async fn open_pull_request(&mut self) -> AppResult<()> {
        let repo = required(&self.state.repo, "repository")?;
        let ticket = required(&self.state.ticket, "ticket")?;
        let branch = required(&self.state.branch, "branch")?;
        let ai_generated = self
            .state
            .change
            .as_ref()
            .is_some_and(|change| change.ai_generated);

        let title = format!("{}: {}", self.ticket_id, ticket.summary);
        let mut body = format!(
            "Automated PR for Jira Ticket: {}\n\n{}",
            self.ticket_id, ticket.description
        );
        if ai_generated {
            body.push_str("\n\n");
            body.push_str(AI_MARKER);
        }

        let pull_request = self
            .ctx
            .repositories
            .open_pull_request(repo, branch, &title, &body)
            .await?;
        info!(url = %pull_request.url, "pull request opened");
        self.state.pull_request = Some(pull_request);
        Ok(())
    }

    async fn announce_pull_request(&mut self) -> AppResult<()> {
        let pull_request = required(&self.state.pull_request, "pull request")?;
        self.ctx
            .tickets
            .comment(
                &self.ticket_id,
                &format!("Pull Request created: {}", pull_request.url),
            )
            .await
    }

    async fn await_review(&mut self) -> AppResult<()> {
        let pull_request = required(&self.state.pull_request, "pull request")?;
        info!(url = %pull_request.url, "waiting for review");
        self.ctx.review_gate.wait_for_review(pull_request).await
    }

    async fn poll_checks(&mut self) -> AppResult<()> {
        match self.snapshot_checks().await {
            Ok(report) => {
                self.state.ci_report = Some(report);
                Ok(())
            }
            Err(err) => {
                self.state.ci_report = Some(format!("Unable to fetch workflow status: {err}"));
                Err(err)
            }
        }
    }

    async fn snapshot_checks(&self) -> AppResult<String> {
        let repo = required(&self.state.repo, "repository")?;
        let pull_request = required(&self.state.pull_request, "pull request")?;
        let head = self
            .ctx
            .repositories
            .pull_request_head(repo, pull_request)
            .await?;
        tokio::time::sleep(self.ctx.config.workflow.check_delay).await;
        let runs = self.ctx.repositories.check_runs(repo, &head).await?;
        info!(commit = %head, runs = runs.len(), "collected check runs");
        Ok(render_check_runs(&runs))
    }

    async fn report_checks(&mut self) -> AppResult<()> {
        let report = required(&self.state.ci_report, "CI report")?;
        self.ctx
            .tickets
            .comment(
                &self.ticket_id,
                &format!("h2. Post-Approval Workflow Status\n\n{report}"),
            )
            .await
    }
}

fn required<'s, T>(value: &'s Option<T>, what: &str) -> AppResult<&'s T> {
    value
        .as_ref()
        .ok_or_else(|| AppError::Validation(format!("{what} not available at this stage")))
}

pub async fn run_ticket_workflow(ctx: &AppContext, ticket_id: &str, repo_name: &str) -> RunOutcome {
    TicketPipeline::new(ctx, ticket_id, repo_name).run().await
}
