use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use camp_core::member::AddMember;
use camp_core::note::Note;
use camp_core::project::{Project, ProjectStatus, UpdateProject};
use camp_core::role::{Role, RoleResponse};
use camp_core::task::{CreateTask, Status, Task};

use crate::{ProjectService, ServiceError};

#[derive(Default)]
struct State {
    projects: Vec<Project>,
    /// project id -> tasks in creation order
    tasks: HashMap<String, Vec<Task>>,
    notes: HashMap<String, Vec<Note>>,
    roles: HashMap<String, Role>,
    members: HashMap<String, Vec<AddMember>>,
    /// Emails the invite endpoint accepts. Empty means any.
    known_users: Vec<String>,
    /// operation name -> error returned by its next call
    failures: HashMap<&'static str, ServiceError>,
    calls: Vec<&'static str>,
}

/// In-process implementation of ProjectService.
///
/// Holds all records behind a mutex, records every call by operation name,
/// and can be told to fail the next call of an operation.
#[derive(Default)]
pub struct MemoryService {
    state: Mutex<State>,
}

impl MemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // a poisoned lock only means another test thread panicked mid-call
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the call and return the injected failure for it, if any.
    fn enter(&self, op: &'static str) -> Result<MutexGuard<'_, State>, ServiceError> {
        let mut state = self.lock();
        state.calls.push(op);
        match state.failures.remove(op) {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }

    pub fn insert_project(&self, name: &str, description: &str, status: ProjectStatus) -> Project {
        let project = Project {
            id: new_id(),
            name: name.to_string(),
            description: description.to_string(),
            status,
        };
        let mut state = self.lock();
        state.projects.push(project.clone());
        state.tasks.entry(project.id.clone()).or_default();
        project
    }

    pub fn insert_task(&self, project_id: &str, title: &str, status: Status) -> Task {
        let task = Task {
            id: new_id(),
            title: title.to_string(),
            description: String::new(),
            status,
        };
        self.lock()
            .tasks
            .entry(project_id.to_string())
            .or_default()
            .push(task.clone());
        task
    }

    pub fn insert_note(&self, project_id: &str, content: &str) -> Note {
        let note = Note {
            id: new_id(),
            content: content.to_string(),
            created_at: None,
        };
        self.lock()
            .notes
            .entry(project_id.to_string())
            .or_default()
            .push(note.clone());
        note
    }

    pub fn set_role(&self, project_id: &str, role: Role) {
        self.lock().roles.insert(project_id.to_string(), role);
    }

    pub fn add_known_user(&self, email: &str) {
        self.lock().known_users.push(email.to_string());
    }

    /// Make the next call to `op` (a trait method name) fail with `err`.
    pub fn fail_next(&self, op: &'static str, err: ServiceError) {
        self.lock().failures.insert(op, err);
    }

    /// Operation names in call order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.lock().calls.iter().filter(|c| **c == op).count()
    }

    pub fn members(&self, project_id: &str) -> Vec<AddMember> {
        self.lock()
            .members
            .get(project_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Rename a task server-side, as if another client had edited it.
    pub fn rename_stored_task(&self, id: &str, title: &str) {
        if let Some(task) = find_task_mut(&mut self.lock(), id) {
            task.title = title.to_string();
        }
    }

    pub fn stored_task(&self, id: &str) -> Option<Task> {
        self.lock()
            .tasks
            .values()
            .flat_map(|tasks| tasks.iter())
            .find(|t| t.id == id)
            .cloned()
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn find_task_mut<'a>(state: &'a mut State, id: &str) -> Option<&'a mut Task> {
    state
        .tasks
        .values_mut()
        .flat_map(|tasks| tasks.iter_mut())
        .find(|t| t.id == id)
}

#[async_trait]
impl ProjectService for MemoryService {
    async fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        let state = self.enter("list_projects")?;
        Ok(state.projects.clone())
    }

    async fn get_project(&self, id: &str) -> Result<Project, ServiceError> {
        let state = self.enter("get_project")?;
        state
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("Project {id} not found")))
    }

    async fn get_my_role(&self, project_id: &str) -> Result<RoleResponse, ServiceError> {
        let state = self.enter("get_my_role")?;
        state
            .roles
            .get(project_id)
            .map(|role| RoleResponse {
                role: role.as_str().to_string(),
            })
            .ok_or_else(|| ServiceError::Forbidden("Not a member of this project".into()))
    }

    async fn update_project(
        &self,
        id: &str,
        update: &UpdateProject,
    ) -> Result<Project, ServiceError> {
        let mut state = self.enter("update_project")?;
        update
            .validate()
            .map_err(|e| ServiceError::InvalidInput(e.to_string()))?;
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Project {id} not found")))?;
        if let Some(ref name) = update.name {
            project.name = name.clone();
        }
        if let Some(ref description) = update.description {
            project.description = description.clone();
        }
        if let Some(status) = update.status {
            project.status = status;
        }
        Ok(project.clone())
    }

    async fn delete_project(&self, id: &str) -> Result<(), ServiceError> {
        let mut state = self.enter("delete_project")?;
        let before = state.projects.len();
        state.projects.retain(|p| p.id != id);
        if state.projects.len() == before {
            return Err(ServiceError::NotFound(format!("Project {id} not found")));
        }
        state.tasks.remove(id);
        state.notes.remove(id);
        state.roles.remove(id);
        Ok(())
    }

    async fn add_member(&self, project_id: &str, input: &AddMember) -> Result<(), ServiceError> {
        let mut state = self.enter("add_member")?;
        if !state.known_users.is_empty() && !state.known_users.contains(&input.email) {
            return Err(ServiceError::NotFound("User does not exist".into()));
        }
        state
            .members
            .entry(project_id.to_string())
            .or_default()
            .push(input.clone());
        Ok(())
    }

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, ServiceError> {
        let state = self.enter("list_tasks")?;
        Ok(state.tasks.get(project_id).cloned().unwrap_or_default())
    }

    async fn get_task(&self, id: &str) -> Result<Task, ServiceError> {
        let mut state = self.enter("get_task")?;
        find_task_mut(&mut state, id)
            .map(|t| t.clone())
            .ok_or_else(|| ServiceError::NotFound(format!("Task {id} not found")))
    }

    async fn create_task(
        &self,
        project_id: &str,
        input: &CreateTask,
    ) -> Result<Task, ServiceError> {
        let mut state = self.enter("create_task")?;
        if input.title.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Title is required".into()));
        }
        let tasks = state
            .tasks
            .get_mut(project_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Project {project_id} not found")))?;
        let task = Task {
            id: new_id(),
            title: input.title.clone(),
            description: String::new(),
            status: Status::Todo,
        };
        tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task_status(&self, id: &str, status: Status) -> Result<Task, ServiceError> {
        let mut state = self.enter("update_task_status")?;
        let task = find_task_mut(&mut state, id)
            .ok_or_else(|| ServiceError::NotFound(format!("Task {id} not found")))?;
        task.status = status;
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &str) -> Result<(), ServiceError> {
        let mut state = self.enter("delete_task")?;
        let mut removed = false;
        for tasks in state.tasks.values_mut() {
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            removed |= tasks.len() != before;
        }
        if removed {
            Ok(())
        } else {
            Err(ServiceError::NotFound(format!("Task {id} not found")))
        }
    }

    async fn list_notes(&self, project_id: &str) -> Result<Vec<Note>, ServiceError> {
        let state = self.enter("list_notes")?;
        Ok(state.notes.get(project_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn injected_failure_fires_once() {
        let svc = MemoryService::new();
        let p = svc.insert_project("Camp", "", ProjectStatus::Active);
        svc.fail_next("get_project", ServiceError::Internal("boom".into()));

        assert!(svc.get_project(&p.id).await.is_err());
        assert!(svc.get_project(&p.id).await.is_ok());
        assert_eq!(svc.call_count("get_project"), 2);
    }

    #[tokio::test]
    async fn role_is_forbidden_for_non_members() {
        let svc = MemoryService::new();
        let p = svc.insert_project("Camp", "", ProjectStatus::Active);
        assert!(matches!(
            svc.get_my_role(&p.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        svc.set_role(&p.id, Role::ProjectAdmin);
        assert_eq!(svc.get_my_role(&p.id).await.unwrap().role, "project_admin");
    }

    #[tokio::test]
    async fn invite_rejects_unknown_users_when_directory_is_set() {
        let svc = MemoryService::new();
        let p = svc.insert_project("Camp", "", ProjectStatus::Active);
        svc.add_known_user("ann@camp.dev");
        let ok = AddMember::new("ann@camp.dev", Default::default()).unwrap();
        let missing = AddMember::new("zed@camp.dev", Default::default()).unwrap();

        assert!(svc.add_member(&p.id, &ok).await.is_ok());
        let err = svc.add_member(&p.id, &missing).await.unwrap_err();
        assert_eq!(err.message(), "User does not exist");
        assert_eq!(svc.members(&p.id).len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_project_drops_its_tasks() {
        let svc = MemoryService::new();
        let p = svc.insert_project("Camp", "", ProjectStatus::Completed);
        let t = svc.insert_task(&p.id, "one", Status::Todo);
        svc.delete_project(&p.id).await.unwrap();
        assert!(svc.stored_task(&t.id).is_none());
        assert!(svc.get_project(&p.id).await.is_err());
    }
}
