mod analyzer;
mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
#[cfg(test)]
mod testing;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cmd::analyze::{self, AnalyzeArgs};
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::open_pr::{self, OpenPrArgs};
use crate::cmd::run::{self as run_cmd, RunArgs};
use crate::cmd::ticket::{self, TicketArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::github::GithubClient;
use crate::infra::jira::JiraClient;
use crate::infra::llm::OpenRouterClient;
use crate::services::AnalysisAssistant;
use crate::workflow::review::StdinReviewGate;

#[derive(Parser)]
#[command(
    name = "ticketpilot",
    author,
    version,
    about = "Turns a Jira ticket into a reviewed GitHub pull request"
)]
struct Cli {
    /// Log debug output from every stage.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze, branch, commit and open a PR for a ticket, then report CI.
    Run(RunArgs),
    /// Read or comment on a Jira ticket.
    Ticket(TicketArgs),
    /// Scan a repository and print the findings.
    Analyze(AnalyzeArgs),
    /// Open a pull request carrying a described change.
    OpenPr(OpenPrArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(cli.command).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(command: Commands) -> AppResult<()> {
    match command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Run(args) => {
            let context = build_context(!args.no_assistant)?;
            run_cmd::run(&context, args).await?;
            Ok(())
        }
        Commands::Ticket(args) => {
            let context = build_context(false)?;
            ticket::run(&context, args.command).await
        }
        Commands::Analyze(args) => {
            let context = build_context(true)?;
            analyze::run(&context, args).await?;
            Ok(())
        }
        Commands::OpenPr(args) => {
            let context = build_context(false)?;
            open_pr::run(&context, args).await?;
            Ok(())
        }
    }
}

fn build_context(use_assistant: bool) -> AppResult<AppContext> {
    let config = AppConfig::load()?;

    let tickets = Arc::new(JiraClient::new(&config.jira));
    let repositories = Arc::new(GithubClient::new(&config.github, &config.workflow)?);
    let assistant = match (&config.assistant, use_assistant) {
        (Some(settings), true) => {
            info!(model = %settings.model, "language model assistance enabled");
            Some(Arc::new(OpenRouterClient::new(settings)) as Arc<dyn AnalysisAssistant>)
        }
        _ => {
            debug!("running without language model assistance");
            None
        }
    };

    Ok(AppContext::new(
        config,
        tickets,
        repositories,
        assistant,
        Arc::new(StdinReviewGate),
    ))
}
