use std::io::{self, Write};

use clap::Args;

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::workflow::pipeline::{RunOutcome, run_ticket_workflow};

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Jira ticket to work on; prompted for when omitted.
    #[arg(short, long)]
    pub ticket: Option<String>,
    /// Target repository as owner/repo; prompted for when omitted.
    #[arg(short, long)]
    pub repo: Option<String>,
    /// Skip the language model even when an API key is configured.
    #[arg(long)]
    pub no_assistant: bool,
}

pub async fn run(ctx: &AppContext, args: RunArgs) -> AppResult<RunOutcome> {
    let ticket_id = match args.ticket {
        Some(id) => id,
        None => ask("Enter Jira Ticket ID (e.g., PROJ-123)")?,
    };
    let repo_name = match args.repo {
        Some(repo) => repo,
        None => ask("Enter GitHub Repository (owner/repo)")?,
    };

    let outcome = run_ticket_workflow(ctx, &ticket_id, &repo_name).await;
    match &outcome {
        RunOutcome::Completed {
            pull_request,
            ci_report,
        } => {
            println!("Pull request: {}", pull_request.url);
            println!("Workflow status:\n{ci_report}");
        }
        RunOutcome::Halted { stage, reason } => {
            return Err(AppError::Validation(format!(
                "run stopped at {stage}: {reason}"
            )));
        }
    }
    Ok(outcome)
}

fn ask(label: &str) -> AppResult<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{label}: ")?;
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
