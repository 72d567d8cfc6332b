use async_trait::async_trait;
use camp_core::member::AddMember;
use camp_core::note::Note;
use camp_core::project::{Project, UpdateProject};
use camp_core::role::RoleResponse;
use camp_core::task::{CreateTask, Status, Task};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// The server-provided message, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            ServiceError::NotFound(m)
            | ServiceError::InvalidInput(m)
            | ServiceError::Forbidden(m)
            | ServiceError::Internal(m) => m,
        }
    }

    /// The server message if there is one, otherwise `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        let msg = self.message().trim();
        if msg.is_empty() {
            fallback.to_string()
        } else {
            msg.to_string()
        }
    }
}

/// Remote project-management operations consumed by the client.
///
/// `HttpService` talks to the real API. `MemoryService` keeps everything in
/// process and backs the tests.
#[async_trait]
pub trait ProjectService: Send + Sync {
    // -- Projects --
    async fn list_projects(&self) -> Result<Vec<Project>, ServiceError>;
    async fn get_project(&self, id: &str) -> Result<Project, ServiceError>;
    async fn get_my_role(&self, project_id: &str) -> Result<RoleResponse, ServiceError>;
    async fn update_project(
        &self,
        id: &str,
        update: &UpdateProject,
    ) -> Result<Project, ServiceError>;
    async fn delete_project(&self, id: &str) -> Result<(), ServiceError>;
    async fn add_member(&self, project_id: &str, input: &AddMember) -> Result<(), ServiceError>;

    // -- Tasks --
    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, ServiceError>;
    async fn get_task(&self, id: &str) -> Result<Task, ServiceError>;
    async fn create_task(&self, project_id: &str, input: &CreateTask)
        -> Result<Task, ServiceError>;
    async fn update_task_status(&self, id: &str, status: Status) -> Result<Task, ServiceError>;
    async fn delete_task(&self, id: &str) -> Result<(), ServiceError>;

    // -- Notes --
    async fn list_notes(&self, project_id: &str) -> Result<Vec<Note>, ServiceError>;
}
