use clap::Args;

use crate::analyzer::RepositoryAnalyzer;
use crate::context::AppContext;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Repository to scan, as owner/repo.
    pub repo: String,
}

pub async fn run(ctx: &AppContext, args: AnalyzeArgs) -> AppResult<String> {
    let repo = ctx.repositories.verify_access(args.repo.trim()).await?;
    let analyzer = RepositoryAnalyzer::new(ctx.repositories.as_ref(), ctx.assistant.as_deref());
    let report = analyzer.analyze(&repo).await.to_plain_text();
    println!("{report}");
    Ok(report)
}
