use reqwest::{Response, StatusCode};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    IssueTracker,
    RepositoryHost,
    LanguageModel,
}

impl Service {
    fn name(self) -> &'static str {
        match self {
            Service::IssueTracker => "Jira",
            Service::RepositoryHost => "GitHub",
            Service::LanguageModel => "OpenRouter",
        }
    }

    pub fn error(self, message: String) -> AppError {
        match self {
            Service::IssueTracker => AppError::IssueTracker(message),
            Service::RepositoryHost => AppError::RepositoryHost(message),
            Service::LanguageModel => AppError::LanguageModel(message),
        }
    }

    pub fn transport(self, err: reqwest::Error) -> AppError {
        self.error(format!("failed to call {}: {err}", self.name()))
    }

    pub fn decode(self, err: reqwest::Error) -> AppError {
        self.error(format!("failed to parse {} response: {err}", self.name()))
    }
}

pub fn classify(service: Service, status: StatusCode, subject: &str, body: &str) -> AppError {
    let detail = format!("{subject} ({} responded with {status}: {body})", service.name());
    match status {
        StatusCode::NOT_FOUND => AppError::NotFound(detail),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Authentication(detail),
        StatusCode::CONFLICT => AppError::WriteConflict(detail),
        StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(detail),
        _ => service.error(detail),
    }
}

/// Passes successful responses through and turns everything else into a
/// typed error carrying the response body.
pub async fn ensure_success(
    response: Response,
    service: Service,
    subject: &str,
) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unable to read response>".to_string());
    Err(classify(service, status, subject, body.trim()))
}
