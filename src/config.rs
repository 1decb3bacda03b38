use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = "ticketpilot";
const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_OPENROUTER_MODEL: &str = "z-ai/glm-4.5-air:free";
pub const DEFAULT_BASE_BRANCH: &str = "main";
pub const DEFAULT_CHECK_DELAY_SECS: u64 = 10;

/// What `config init` writes to disk. Every field is optional; environment
/// variables fill in or override whatever is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_token: Option<String>,
    pub github_token: Option<String>,
    pub github_api_url: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: Option<String>,
    pub base_branch: Option<String>,
    pub check_delay_secs: Option<u64>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn with_env_overrides<F>(mut self, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text_fields: [(&str, &mut Option<String>); 8] = [
            ("JIRA_BASE_URL", &mut self.jira_base_url),
            ("JIRA_USER_EMAIL", &mut self.jira_email),
            ("JIRA_API_TOKEN", &mut self.jira_token),
            ("GITHUB_TOKEN", &mut self.github_token),
            ("GITHUB_API_URL", &mut self.github_api_url),
            ("OPENROUTER_API_KEY", &mut self.openrouter_api_key),
            ("OPENROUTER_MODEL", &mut self.openrouter_model),
            ("TICKETPILOT_BASE_BRANCH", &mut self.base_branch),
        ];
        for (key, target) in text_fields {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *target = Some(value.trim().to_string());
            }
        }

        if let Some(raw) = lookup("TICKETPILOT_CHECK_DELAY_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|err| {
                AppError::Configuration(format!(
                    "TICKETPILOT_CHECK_DELAY_SECS must be a whole number of seconds: {err}"
                ))
            })?;
            self.check_delay_secs = Some(secs);
        }

        Ok(self)
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| AppError::Configuration("unable to locate a config directory".to_string()))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jira: JiraSettings,
    pub github: GithubSettings,
    pub assistant: Option<AssistantSettings>,
    pub workflow: WorkflowSettings,
}

#[derive(Debug, Clone)]
pub struct JiraSettings {
    pub base_url: String,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct GithubSettings {
    pub api_url: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    pub base_branch: String,
    /// Fixed pause before the single check-run snapshot so CI can register.
    pub check_delay: Duration,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            check_delay: Duration::from_secs(DEFAULT_CHECK_DELAY_SECS),
        }
    }
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?.with_env_overrides(|key| env::var(key).ok())?;
        Self::from_stored(stored)
    }

    pub fn from_stored(stored: StoredConfig) -> AppResult<Self> {
        let jira = JiraSettings {
            base_url: required(stored.jira_base_url, "Jira base URL (JIRA_BASE_URL)")?,
            email: required(stored.jira_email, "Jira email (JIRA_USER_EMAIL)")?,
            token: required(stored.jira_token, "Jira API token (JIRA_API_TOKEN)")?,
        };
        let github = GithubSettings {
            api_url: stored
                .github_api_url
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            token: required(stored.github_token, "GitHub token (GITHUB_TOKEN)")?,
        };
        let assistant = stored
            .openrouter_api_key
            .filter(|key| !key.is_empty())
            .map(|api_key| AssistantSettings {
                api_key,
                model: stored
                    .openrouter_model
                    .unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
            });
        let workflow = WorkflowSettings {
            base_branch: stored
                .base_branch
                .unwrap_or_else(|| DEFAULT_BASE_BRANCH.to_string()),
            check_delay: Duration::from_secs(
                stored.check_delay_secs.unwrap_or(DEFAULT_CHECK_DELAY_SECS),
            ),
        };

        Ok(Self {
            jira,
            github,
            assistant,
            workflow,
        })
    }
}

fn required(value: Option<String>, what: &str) -> AppResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Configuration(format!("{what} not configured")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn complete() -> StoredConfig {
        StoredConfig {
            jira_base_url: Some("https://example.atlassian.net".to_string()),
            jira_email: Some("dev@example.com".to_string()),
            jira_token: Some("jira-token".to_string()),
            github_token: Some("gh-token".to_string()),
            ..StoredConfig::default()
        }
    }

    #[test]
    fn applies_defaults() {
        let config = AppConfig::from_stored(complete()).unwrap();
        assert_eq!(config.github.api_url, DEFAULT_GITHUB_API_URL);
        assert_eq!(config.workflow.base_branch, "main");
        assert_eq!(config.workflow.check_delay, Duration::from_secs(10));
        assert!(config.assistant.is_none());
    }

    #[test]
    fn assistant_enabled_by_api_key() {
        let mut stored = complete();
        stored.openrouter_api_key = Some("or-key".to_string());
        let config = AppConfig::from_stored(stored).unwrap();
        let assistant = config.assistant.unwrap();
        assert_eq!(assistant.model, DEFAULT_OPENROUTER_MODEL);
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let mut stored = complete();
        stored.github_token = None;
        let err = AppConfig::from_stored(stored).unwrap_err();
        assert!(matches!(err, AppError::Configuration(msg) if msg.contains("GITHUB_TOKEN")));
    }

    #[test]
    fn environment_overrides_stored_values() {
        let env = HashMap::from([
            ("GITHUB_TOKEN", "from-env"),
            ("TICKETPILOT_CHECK_DELAY_SECS", "0"),
            ("OPENROUTER_MODEL", "  "),
        ]);
        let stored = complete()
            .with_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(stored.github_token.as_deref(), Some("from-env"));
        assert_eq!(stored.check_delay_secs, Some(0));
        assert_eq!(stored.openrouter_model, None);
        assert_eq!(stored.jira_token.as_deref(), Some("jira-token"));
    }

    #[test]
    fn rejects_non_numeric_delay() {
        let err = complete()
            .with_env_overrides(|key| {
                (key == "TICKETPILOT_CHECK_DELAY_SECS").then(|| "soon".to_string())
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        assert_eq!(StoredConfig::load_from(&path).unwrap(), StoredConfig::default());

        complete().save_to(&path).unwrap();
        assert_eq!(StoredConfig::load_from(&path).unwrap(), complete());
    }
}
