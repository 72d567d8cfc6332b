use async_trait::async_trait;
use camp_core::member::AddMember;
use camp_core::note::Note;
use camp_core::project::{Project, UpdateProject};
use camp_core::role::RoleResponse;
use camp_core::task::{CreateTask, Status, Task, UpdateTaskStatus};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::{ProjectService, ServiceError};

/// Success envelope returned by every API route. Only `data` is used.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    data: T,
}

/// Async HTTP client implementation of ProjectService.
/// Connects to a running Project Camp API server.
pub struct HttpService {
    base_url: String,
    client: Client,
    api_key: Option<String>,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
            api_key: None,
        }
    }

    pub fn with_api_key(base_url: &str, key: String) -> Self {
        let mut svc = Self::new(base_url);
        svc.api_key = Some(key);
        svc
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {key}")),
            None => builder,
        }
    }

    /// Check if the server is reachable.
    /// Health endpoint is NOT authenticated.
    pub async fn health_check(&self) -> Result<(), ServiceError> {
        let resp = self
            .client
            .get(format!("{}/api/v1/healthcheck", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ServiceError::Internal(format!(
                "health check failed: {}",
                resp.status()
            )))
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, ServiceError> {
        self.with_auth(builder)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        debug!(path, "GET");
        let resp = self
            .send(self.client.get(format!("{}{path}", self.base_url)))
            .await?;
        handle_response(resp).await
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        debug!(path, "POST");
        let builder = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body);
        handle_response(self.send(builder).await?).await
    }

    async fn post_no_content<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ServiceError> {
        debug!(path, "POST");
        let builder = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body);
        expect_success(self.send(builder).await?).await
    }

    async fn put_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        debug!(path, "PUT");
        let builder = self
            .client
            .put(format!("{}{path}", self.base_url))
            .json(body);
        handle_response(self.send(builder).await?).await
    }

    async fn patch_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        debug!(path, "PATCH");
        let builder = self
            .client
            .patch(format!("{}{path}", self.base_url))
            .json(body);
        handle_response(self.send(builder).await?).await
    }

    async fn delete_req(&self, path: &str) -> Result<(), ServiceError> {
        debug!(path, "DELETE");
        let resp = self
            .send(self.client.delete(format!("{}{path}", self.base_url)))
            .await?;
        expect_success(resp).await
    }
}

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<ApiResponse<T>>()
            .await
            .map(|envelope| envelope.data)
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

async fn expect_success(resp: reqwest::Response) -> Result<(), ServiceError> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

async fn parse_error_with_status(status: StatusCode, resp: reqwest::Response) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    error_from_body(status, &body)
}

/// Map an error response to a ServiceError, pulling the human-readable
/// message out of a JSON body when there is one.
fn error_from_body(status: StatusCode, body: &str) -> ServiceError {
    let msg = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v["message"]
                .as_str()
                .or_else(|| v["error"].as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string());

    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(msg),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ServiceError::InvalidInput(msg)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::Forbidden(msg),
        _ => ServiceError::Internal(msg),
    }
}

#[async_trait]
impl ProjectService for HttpService {
    async fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        self.get_json("/api/v1/projects").await
    }

    async fn get_project(&self, id: &str) -> Result<Project, ServiceError> {
        self.get_json(&format!("/api/v1/projects/{id}")).await
    }

    async fn get_my_role(&self, project_id: &str) -> Result<RoleResponse, ServiceError> {
        self.get_json(&format!("/api/v1/projects/{project_id}/role"))
            .await
    }

    async fn update_project(
        &self,
        id: &str,
        update: &UpdateProject,
    ) -> Result<Project, ServiceError> {
        self.put_json(&format!("/api/v1/projects/{id}"), update)
            .await
    }

    async fn delete_project(&self, id: &str) -> Result<(), ServiceError> {
        self.delete_req(&format!("/api/v1/projects/{id}")).await
    }

    async fn add_member(&self, project_id: &str, input: &AddMember) -> Result<(), ServiceError> {
        self.post_no_content(&format!("/api/v1/projects/{project_id}/members"), input)
            .await
    }

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, ServiceError> {
        self.get_json(&format!("/api/v1/projects/{project_id}/tasks"))
            .await
    }

    async fn get_task(&self, id: &str) -> Result<Task, ServiceError> {
        self.get_json(&format!("/api/v1/tasks/{id}")).await
    }

    async fn create_task(
        &self,
        project_id: &str,
        input: &CreateTask,
    ) -> Result<Task, ServiceError> {
        self.post_json(&format!("/api/v1/projects/{project_id}/tasks"), input)
            .await
    }

    async fn update_task_status(&self, id: &str, status: Status) -> Result<Task, ServiceError> {
        self.patch_json(
            &format!("/api/v1/tasks/{id}/status"),
            &UpdateTaskStatus { status },
        )
        .await
    }

    async fn delete_task(&self, id: &str) -> Result<(), ServiceError> {
        self.delete_req(&format!("/api/v1/tasks/{id}")).await
    }

    async fn list_notes(&self, project_id: &str) -> Result<Vec<Note>, ServiceError> {
        self.get_json(&format!("/api/v1/projects/{project_id}/notes"))
            .await
    }
}
