use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AssistantSettings;
use crate::error::AppResult;
use crate::infra::http::{Service, ensure_success};
use crate::services::AnalysisAssistant;

const COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

pub struct OpenRouterClient {
    http: Client,
    api_key: String,
    model: String,
}

impl OpenRouterClient {
    pub fn new(settings: &AssistantSettings) -> Self {
        Self {
            http: Client::new(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        }
    }

    async fn complete(&self, prompt: String) -> AppResult<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "requesting completion");
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let response = self
            .http
            .post(COMPLETIONS_URL)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|err| Service::LanguageModel.transport(err))?;
        let response = ensure_success(response, Service::LanguageModel, "chat completion").await?;
        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|err| Service::LanguageModel.decode(err))?;
        payload.into_text()
    }
}

#[async_trait]
impl AnalysisAssistant for OpenRouterClient {
    async fn summarize_codebase(&self, files: &BTreeMap<String, String>) -> AppResult<String> {
        self.complete(summary_prompt(files)).await
    }

    async fn propose_fix(
        &self,
        issue_description: &str,
        current_content: &str,
    ) -> AppResult<String> {
        self.complete(fix_prompt(issue_description, current_content))
            .await
    }
}

fn summary_prompt(files: &BTreeMap<String, String>) -> String {
    let mut prompt = String::from(
        "Review these source files for likely security vulnerabilities and suggest improvements.\n\n",
    );
    for (name, content) in files {
        prompt.push_str(&format!("--- {name} ---\n{content}\n"));
    }
    prompt
}

fn fix_prompt(issue_description: &str, current_content: &str) -> String {
    format!(
        "Rewrite the file below so that it resolves the described issue.\n\
         Issue: {issue_description}\n\n\
         Current content:\n{current_content}\n\n\
         Reply with the full corrected file content only, without markdown fences."
    )
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> AppResult<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Service::LanguageModel.error("completion had no content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn summary_prompt_lists_files_in_order() {
        let files = BTreeMap::from([
            ("b.py".to_string(), "print(2)".to_string()),
            ("a.py".to_string(), "print(1)".to_string()),
        ]);
        let prompt = summary_prompt(&files);
        let a = prompt.find("--- a.py ---\nprint(1)").unwrap();
        let b = prompt.find("--- b.py ---\nprint(2)").unwrap();
        assert!(a < b);
    }

    #[test]
    fn fix_prompt_carries_issue_and_content() {
        let prompt = fix_prompt("login fails", "def login(): pass");
        assert!(prompt.contains("Issue: login fails"));
        assert!(prompt.contains("def login(): pass"));
    }

    #[test]
    fn extracts_first_choice() {
        let payload: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Generated Text"}}]}"#,
        )
        .unwrap();
        assert_eq!(payload.into_text().unwrap(), "Generated Text");
    }

    #[test]
    fn empty_choices_are_an_error() {
        let payload: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            payload.into_text(),
            Err(AppError::LanguageModel(_))
        ));
    }
}
