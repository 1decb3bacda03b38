use clap::Args;

use crate::context::AppContext;
use crate::domain::repository::PullRequestHandle;
use crate::error::AppResult;
use crate::workflow::change_request::{ChangeRequest, open_change_request};

#[derive(Args, Debug, Clone)]
pub struct OpenPrArgs {
    /// Ticket the branch name is derived from.
    #[arg(long)]
    pub ticket: String,
    /// Target repository as owner/repo.
    #[arg(long)]
    pub repo: String,
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub body: String,
    /// Text recorded in the committed change file.
    #[arg(long)]
    pub change: String,
}

impl From<OpenPrArgs> for ChangeRequest {
    fn from(args: OpenPrArgs) -> Self {
        Self {
            ticket_id: args.ticket,
            repo_name: args.repo,
            title: args.title,
            body: args.body,
            change_description: args.change,
        }
    }
}

pub async fn run(ctx: &AppContext, args: OpenPrArgs) -> AppResult<PullRequestHandle> {
    let pull_request = open_change_request(ctx, &args.into()).await?;
    println!("Pull Request created: {}", pull_request.url);
    Ok(pull_request)
}
