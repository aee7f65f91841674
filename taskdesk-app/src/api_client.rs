use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use taskdesk_models::{
    AiAnswer, AiQuestion, CreateProjectRequest, CreateTaskRequest, CreateTeamMemberRequest,
    PrioritizedTask, Project, ProjectReport, Task, TaskSuggestions, TeamMember,
};
use tracing::debug;

use crate::config::ApiSettings;
use crate::error::ApiError;

/// Thin client over the project-management REST API.
///
/// Every call is a single request: there is no retry and no caching, callers
/// decide whether to fetch again.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self, ApiError> {
        if settings.timeout_secs == 0 {
            return Err(ApiError::Build {
                message: "timeout_secs must be greater than zero".to_string(),
            });
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ApiError::Build {
                message: e.to_string(),
            })?;
        Ok(Self::with_http_client(settings.base_url.clone(), http))
    }

    fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let parsed = reqwest::Url::parse(&url).map_err(|e| ApiError::InvalidUrl {
            message: format!("{url}: {e}"),
        })?;
        let mut request = self.http.request(method, parsed);
        if let Some(body) = body {
            // Sets Content-Type: application/json
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network { source: e })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                debug!("Failed to read error body from {}: {}", url, e);
                String::new()
            }
        };
        let body = serde_json::from_str::<Value>(&error_text).ok();
        debug!("{} answered {}: {}", url, status, error_text);
        Err(ApiError::Http {
            status: status.as_u16(),
            body,
        })
    }

    /// Perform one request and decode its JSON body.
    pub async fn request_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, body).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network { source: e })?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::decode(e.to_string()))
    }

    /// Perform one request and return the raw body.
    pub async fn request_bytes(&self, method: Method, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.send::<Value>(method, path, None).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network { source: e })?;
        Ok(bytes.to_vec())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json::<T, Value>(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json::<T, Value>(Method::POST, path, None).await
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json(Method::POST, path, Some(body)).await
    }

    // Projects

    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get("/projects/").await
    }

    pub async fn get_project(&self, project_id: i64) -> Result<Project, ApiError> {
        self.get(&format!("/projects/{}", project_id)).await
    }

    pub async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project, ApiError> {
        self.post_json("/projects/", request).await
    }

    // Tasks

    pub async fn list_tasks(&self, project_id: i64) -> Result<Vec<Task>, ApiError> {
        self.get(&format!("/projects/{}/tasks/", project_id)).await
    }

    pub async fn create_task(
        &self,
        project_id: i64,
        request: &CreateTaskRequest,
    ) -> Result<Task, ApiError> {
        self.post_json(&format!("/projects/{}/tasks/", project_id), request)
            .await
    }

    pub async fn prioritize_task(
        &self,
        project_id: i64,
        task_id: i64,
    ) -> Result<PrioritizedTask, ApiError> {
        self.post(&format!(
            "/projects/{}/tasks/{}/prioritize/",
            project_id, task_id
        ))
        .await
    }

    pub async fn suggest_for_task(
        &self,
        project_id: i64,
        task_id: i64,
    ) -> Result<TaskSuggestions, ApiError> {
        self.post(&format!("/projects/{}/tasks/{}/suggest/", project_id, task_id))
            .await
    }

    // Team members

    pub async fn list_team_members(&self) -> Result<Vec<TeamMember>, ApiError> {
        self.get("/team-members/").await
    }

    pub async fn create_team_member(
        &self,
        request: &CreateTeamMemberRequest,
    ) -> Result<TeamMember, ApiError> {
        self.post_json("/team-members/", request).await
    }

    /// The server answers with the updated project; it is returned as-is.
    pub async fn assign_team_member(
        &self,
        project_id: i64,
        member_id: i64,
    ) -> Result<Value, ApiError> {
        self.post(&format!("/projects/{}/team-members/{}", project_id, member_id))
            .await
    }

    // AI

    pub async fn ask_ai(&self, project_id: i64, question: &AiQuestion) -> Result<AiAnswer, ApiError> {
        self.post_json(&format!("/projects/{}/ai-chat/", project_id), question)
            .await
    }

    pub async fn generate_report(&self, project_id: i64) -> Result<ProjectReport, ApiError> {
        self.post(&format!("/projects/{}/report/", project_id)).await
    }

    pub async fn generate_report_pdf(&self, project_id: i64) -> Result<Vec<u8>, ApiError> {
        self.request_bytes(Method::POST, &format!("/projects/{}/report/?pdf=true", project_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/api/v1/");
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(
            client.url("/projects/"),
            "http://localhost:8000/api/v1/projects/"
        );
    }

    #[test]
    fn test_zero_timeout_is_a_build_error() {
        let settings = ApiSettings {
            base_url: "http://localhost:8000/api/v1".to_string(),
            timeout_secs: 0,
        };
        let err = ApiClient::from_settings(&settings).unwrap_err();
        assert!(matches!(err, ApiError::Build { .. }));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_from_settings_keeps_base_url() {
        let settings = ApiSettings {
            base_url: "http://tasks.internal/api/v1/".to_string(),
            timeout_secs: 5,
        };
        let client = ApiClient::from_settings(&settings).unwrap();
        assert_eq!(client.base_url(), "http://tasks.internal/api/v1");
    }

    #[tokio::test]
    async fn test_invalid_base_url_fails_before_sending() {
        let client = ApiClient::new("not a url");
        let err = client.list_projects().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }
}
