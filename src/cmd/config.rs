use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{
    DEFAULT_BASE_BRANCH, DEFAULT_CHECK_DELAY_SECS, DEFAULT_GITHUB_API_URL,
    DEFAULT_OPENROUTER_MODEL, StoredConfig, config_file_path,
};
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring ticketpilot.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Secrets are stored in the local config file; protect your filesystem accordingly.");
    println!();

    apply_prompt(
        "Jira base URL (e.g., https://company.atlassian.net)",
        &mut cfg.jira_base_url,
        false,
    )?;
    apply_prompt("Jira email", &mut cfg.jira_email, false)?;
    apply_prompt("Jira API token", &mut cfg.jira_token, true)?;

    apply_prompt("GitHub token", &mut cfg.github_token, true)?;
    apply_prompt(
        "GitHub API URL (blank for api.github.com)",
        &mut cfg.github_api_url,
        false,
    )?;
    apply_prompt("Base branch for new work", &mut cfg.base_branch, false)?;
    apply_delay_prompt(&mut cfg.check_delay_secs)?;

    apply_prompt("OpenRouter API key (optional)", &mut cfg.openrouter_api_key, true)?;
    apply_prompt("OpenRouter model", &mut cfg.openrouter_model, false)?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("Jira base URL: {}", display_value(&cfg.jira_base_url));
    println!("Jira email: {}", display_value(&cfg.jira_email));
    println!("Jira API token: {}", mask_secret(&cfg.jira_token));
    println!("GitHub token: {}", mask_secret(&cfg.github_token));
    println!(
        "GitHub API URL: {}",
        cfg.github_api_url.as_deref().unwrap_or(DEFAULT_GITHUB_API_URL)
    );
    println!(
        "Base branch: {}",
        cfg.base_branch.as_deref().unwrap_or(DEFAULT_BASE_BRANCH)
    );
    println!(
        "Check delay: {}s",
        cfg.check_delay_secs.unwrap_or(DEFAULT_CHECK_DELAY_SECS)
    );
    println!("OpenRouter API key: {}", mask_secret(&cfg.openrouter_api_key));
    println!(
        "OpenRouter model: {}",
        cfg.openrouter_model
            .as_deref()
            .unwrap_or(DEFAULT_OPENROUTER_MODEL)
    );

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn apply_delay_prompt(target: &mut Option<u64>) -> AppResult<()> {
    let current = target.map(|secs| secs.to_string());
    match prompt("Seconds to wait before reading CI status", current.as_deref(), false)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => {
            let secs = value.parse::<u64>().map_err(|err| {
                AppError::Configuration(format!("check delay must be a whole number: {err}"))
            })?;
            *target = Some(secs);
        }
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim();

    if trimmed.is_empty() {
        Ok(PromptAction::Keep)
    } else if trimmed == "-" {
        Ok(PromptAction::Clear)
    } else {
        Ok(PromptAction::Set(trimmed.to_string()))
    }
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

enum PromptAction {
    Keep,
    Clear,
    Set(String),
}
