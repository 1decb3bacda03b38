use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};

use crate::config::JiraSettings;
use crate::domain::ticket::Ticket;
use crate::error::AppResult;
use crate::infra::http::{Service, ensure_success};
use crate::services::TicketService;

pub struct JiraClient {
    http: Client,
    base_url: String,
    email: String,
    token: String,
}

impl JiraClient {
    pub fn new(settings: &JiraSettings) -> Self {
        Self {
            http: Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            email: settings.email.clone(),
            token: settings.token.clone(),
        }
    }

    fn auth_header(email: &str, token: &str) -> String {
        let credentials = format!("{email}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn issue_endpoint(base_url: &str, id: &str) -> String {
        format!("{base_url}/rest/api/2/issue/{id}")
    }

    fn comment_endpoint(base_url: &str, id: &str) -> String {
        format!("{}/comment", Self::issue_endpoint(base_url, id))
    }
}

#[async_trait]
impl TicketService for JiraClient {
    async fn fetch(&self, id: &str) -> AppResult<Ticket> {
        let response = self
            .http
            .get(Self::issue_endpoint(&self.base_url, id))
            .query(&[("fields", "summary,description,status")])
            .header(AUTHORIZATION, Self::auth_header(&self.email, &self.token))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| Service::IssueTracker.transport(err))?;
        let response =
            ensure_success(response, Service::IssueTracker, &format!("ticket {id}")).await?;

        let payload: JiraIssueResponse = response
            .json()
            .await
            .map_err(|err| Service::IssueTracker.decode(err))?;
        Ok(payload.into_ticket())
    }

    async fn comment(&self, id: &str, text: &str) -> AppResult<()> {
        let response = self
            .http
            .post(Self::comment_endpoint(&self.base_url, id))
            .header(AUTHORIZATION, Self::auth_header(&self.email, &self.token))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&JiraCommentRequest { body: text })
            .send()
            .await
            .map_err(|err| Service::IssueTracker.transport(err))?;
        ensure_success(response, Service::IssueTracker, &format!("comment on {id}")).await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JiraCommentRequest<'a> {
    body: &'a str,
}

#[derive(Deserialize)]
struct JiraIssueResponse {
    key: String,
    fields: JiraIssueFields,
}

#[derive(Deserialize)]
struct JiraIssueFields {
    summary: String,
    description: Option<String>,
    status: JiraStatus,
}

#[derive(Deserialize)]
struct JiraStatus {
    name: String,
}

impl JiraIssueResponse {
    fn into_ticket(self) -> Ticket {
        Ticket {
            id: self.key,
            summary: self.fields.summary,
            description: self.fields.description.unwrap_or_default(),
            status: self.fields.status.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_auth_header() {
        assert_eq!(
            JiraClient::auth_header("dev@example.com", "token"),
            "Basic ZGV2QGV4YW1wbGUuY29tOnRva2Vu"
        );
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client = JiraClient::new(&JiraSettings {
            base_url: "https://example.atlassian.net/".to_string(),
            email: "dev@example.com".to_string(),
            token: "token".to_string(),
        });
        assert_eq!(
            JiraClient::comment_endpoint(&client.base_url, "ABC-1"),
            "https://example.atlassian.net/rest/api/2/issue/ABC-1/comment"
        );
    }

    #[test]
    fn parses_issue_with_missing_description() {
        let payload: JiraIssueResponse = serde_json::from_str(
            r#"{"key":"ABC-1","fields":{"summary":"Fix login bug","description":null,"status":{"name":"To Do"}}}"#,
        )
        .unwrap();
        let ticket = payload.into_ticket();
        assert_eq!(ticket.id, "ABC-1");
        assert_eq!(ticket.summary, "Fix login bug");
        assert_eq!(ticket.description, "");
        assert_eq!(ticket.status, "To Do");
    }
}
