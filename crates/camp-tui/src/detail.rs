use std::sync::Arc;

use camp_core::member::{AddMember, InviteRole};
use camp_core::note::Note;
use camp_core::project::{Project, UpdateProject};
use camp_core::role::{self, Role};
use camp_core::task::{CreateTask, Status, Task};
use camp_service::{ProjectService, ServiceError};
use tracing::{error, info};

use crate::components::add_member_modal::AddMemberModal;
use crate::components::add_task_modal::AddTaskModal;
use crate::components::edit_project_modal::EditProjectModal;
use crate::notify::Notifications;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Tasks,
    Files,
    Notes,
}

impl Tab {
    pub const ALL: &[Tab] = &[Tab::Tasks, Tab::Files, Tab::Notes];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Tasks => "Tasks",
            Tab::Files => "Files",
            Tab::Notes => "Notes",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Tasks => Tab::Files,
            Tab::Files => Tab::Notes,
            Tab::Notes => Tab::Tasks,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Tasks => 0,
            Tab::Files => 1,
            Tab::Notes => 2,
        }
    }
}

/// What the page body shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageView {
    Loading,
    NotFound,
    Loaded,
}

/// Independent overlay flags. Several may be set at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalFlags {
    pub add_task: bool,
    pub invite: bool,
    pub edit_project: bool,
    pub video_demo: bool,
    /// Never set: the upload control is rendered disabled.
    pub upload_file: bool,
}

/// Header and toolbar controls whose visibility depends on role or state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    DeleteProject,
    EditDescription,
    EditProject,
    /// Extra delete shortcut shown only on completed projects.
    DeleteCompletedProject,
    Invite,
    AddTask,
    ViewDemo,
    /// Shown on the Files tab, always disabled.
    UploadFile,
}

impl Control {
    pub const ALL: &[Control] = &[
        Control::ViewDemo,
        Control::UploadFile,
        Control::EditProject,
        Control::DeleteCompletedProject,
        Control::Invite,
        Control::AddTask,
        Control::DeleteProject,
        Control::EditDescription,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Control::DeleteProject => "Delete Project",
            Control::EditDescription => "Edit Description",
            Control::EditProject => "Edit",
            Control::DeleteCompletedProject => "Delete",
            Control::Invite => "Invite",
            Control::AddTask => "Add Task",
            Control::ViewDemo => "View Demo",
            Control::UploadFile => "Upload File (Coming Soon)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteProject,
}

/// A yes/no question that must be answered before `action` runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub prompt: String,
    pub action: ConfirmAction,
}

/// One project, its tasks and the caller's role. Each action makes one
/// remote call, then patches local state from the server's answer or routes
/// the failure to a notification.
pub struct ProjectDetail<S: ProjectService> {
    service: Arc<S>,
    project_id: Option<String>,
    project: Option<Project>,
    tasks: Vec<Task>,
    role: Option<String>,
    loading: bool,
    tab: Tab,
    pub modals: ModalFlags,
    /// `Some` while the description is being edited inline.
    description_draft: Option<String>,
    pub edit_form: EditProjectModal,
    pub add_task_form: AddTaskModal,
    pub invite_form: AddMemberModal,
    notes: Option<Vec<Note>>,
    selected_task: Option<Task>,
    notifications: Notifications,
    confirmation: Option<Confirmation>,
    navigation: Option<Route>,
}

impl<S: ProjectService> ProjectDetail<S> {
    pub fn new(service: Arc<S>, project_id: Option<String>) -> Self {
        Self {
            service,
            loading: project_id.is_some(),
            project_id,
            project: None,
            tasks: Vec::new(),
            role: None,
            tab: Tab::Tasks,
            modals: ModalFlags::default(),
            description_draft: None,
            edit_form: EditProjectModal::default(),
            add_task_form: AddTaskModal::default(),
            invite_form: AddMemberModal::default(),
            notes: None,
            selected_task: None,
            notifications: Notifications::default(),
            confirmation: None,
            navigation: None,
        }
    }

    // -- Lifecycle --

    /// Fetch project, tasks and role concurrently. All three must succeed
    /// for the page to populate; any failure leaves it empty.
    pub async fn load(&mut self) {
        let Some(project_id) = self.project_id.clone() else {
            self.loading = false;
            return;
        };
        self.loading = true;

        let service = &self.service;
        let result = tokio::try_join!(
            service.get_project(&project_id),
            service.list_tasks(&project_id),
            service.get_my_role(&project_id),
        );

        match result {
            Ok((project, tasks, role)) => {
                info!(%project_id, tasks = tasks.len(), role = %role.role, "project loaded");
                self.edit_form.sync(&project);
                self.project = Some(project);
                self.tasks = tasks;
                self.role = Some(role.role);
            }
            Err(e) => error!(%project_id, "failed to load project data: {e}"),
        }
        self.loading = false;
    }

    /// Point the page at another project and start a fresh load cycle.
    pub async fn navigate(&mut self, project_id: &str) {
        *self = Self::new(self.service.clone(), Some(project_id.to_string()));
        self.load().await;
    }

    pub fn view(&self) -> PageView {
        if self.loading {
            PageView::Loading
        } else if self.project.is_none() {
            PageView::NotFound
        } else {
            PageView::Loaded
        }
    }

    // -- Accessors --

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn notes(&self) -> Option<&[Note]> {
        self.notes.as_deref()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_task.as_ref()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn description_draft(&self) -> Option<&str> {
        self.description_draft.as_deref()
    }

    pub fn description_draft_mut(&mut self) -> Option<&mut String> {
        self.description_draft.as_mut()
    }

    /// Pending navigation requested by an action, consumed by the caller.
    pub fn take_navigation(&mut self) -> Option<Route> {
        self.navigation.take()
    }

    // -- Role gates --

    /// Whether a control is drawn. Advisory only; the server decides what
    /// the caller may actually do.
    pub fn visible(&self, control: Control) -> bool {
        let role = self.role.as_deref();
        let completed = self.project.as_ref().is_some_and(|p| p.is_completed());
        match control {
            Control::DeleteProject | Control::EditDescription => {
                role::allowed(role, Role::ADMIN_ONLY)
            }
            Control::EditProject | Control::Invite => role::allowed(role, Role::MANAGERS),
            Control::DeleteCompletedProject => completed && role::allowed(role, Role::ADMIN_ONLY),
            Control::AddTask => self.tab == Tab::Tasks && role::allowed(role, Role::MANAGERS),
            Control::ViewDemo => true,
            Control::UploadFile => self.tab == Tab::Files,
        }
    }

    pub fn visible_controls(&self) -> Vec<Control> {
        Control::ALL
            .iter()
            .copied()
            .filter(|c| self.visible(*c))
            .collect()
    }

    // -- Tabs --

    /// Switch tabs. Notes are fetched the first time their tab opens.
    pub async fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        if tab == Tab::Notes && self.notes.is_none() {
            self.load_notes().await;
        }
    }

    async fn load_notes(&mut self) {
        let Some(project_id) = self.project_id.clone() else {
            return;
        };
        match self.service.list_notes(&project_id).await {
            Ok(notes) => self.notes = Some(notes),
            Err(e) => {
                error!(%project_id, "failed to load notes: {e}");
                self.notes = Some(Vec::new());
            }
        }
    }

    // -- Tasks --

    /// Create a task and append it. Returns true on success.
    pub async fn add_task(&mut self, title: &str) -> bool {
        let Some(project_id) = self.project_id.clone() else {
            return false;
        };
        let input = match CreateTask::new(title) {
            Ok(input) => input,
            Err(e) => {
                self.add_task_form.error = Some(e.message().to_string());
                return false;
            }
        };

        match self.service.create_task(&project_id, &input).await {
            Ok(task) => {
                info!(task_id = %task.id, "task created");
                self.tasks.push(task);
                true
            }
            Err(e) => {
                error!(%project_id, "create task failed: {e}");
                self.notifications
                    .alert(&e.message_or("Failed to create task"));
                false
            }
        }
    }

    /// Delete a task remotely, then drop it from the local list. The
    /// local list is only touched once the server confirmed the delete.
    pub async fn delete_task(&mut self, task_id: &str) -> Result<(), ServiceError> {
        self.service.delete_task(task_id).await?;
        self.tasks.retain(|t| t.id != task_id);
        if self.selected_task.as_ref().is_some_and(|t| t.id == task_id) {
            self.selected_task = None;
        }
        Ok(())
    }

    /// Change a task's status and replace the local entry with the record
    /// the server returned.
    pub async fn change_task_status(
        &mut self,
        task_id: &str,
        status: Status,
    ) -> Result<(), ServiceError> {
        let updated = self.service.update_task_status(task_id, status).await?;
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == updated.id) {
            *slot = updated.clone();
        }
        if let Some(selected) = self.selected_task.as_mut().filter(|t| t.id == updated.id) {
            *selected = updated;
        }
        Ok(())
    }

    pub async fn open_task(&mut self, task_id: &str) {
        match self.service.get_task(task_id).await {
            Ok(task) => self.selected_task = Some(task),
            Err(e) => {
                error!(%task_id, "failed to load task: {e}");
                self.notifications
                    .error_toast(&e.message_or("Failed to load task"));
            }
        }
    }

    pub fn close_task(&mut self) {
        self.selected_task = None;
    }

    // -- Members --

    /// Invite someone by email. Returns true on success.
    pub async fn invite_member(&mut self, email: &str, role: InviteRole) -> bool {
        let Some(project_id) = self.project_id.clone() else {
            return false;
        };
        let input = match AddMember::new(email, role) {
            Ok(input) => input,
            Err(e) => {
                self.invite_form.error = Some(e.message().to_string());
                return false;
            }
        };

        match self.service.add_member(&project_id, &input).await {
            Ok(()) => {
                self.notifications.toast(
                    "Member Invited",
                    Some(&format!("{} has been added as {}.", input.email, input.role)),
                );
                true
            }
            Err(e) => {
                error!(%project_id, "add member failed: {e}");
                self.notifications
                    .alert(&e.message_or("Failed to add member. Ensure user exists."));
                false
            }
        }
    }

    // -- Project --

    /// Apply a partial update and adopt the server's copy of the project.
    pub async fn update_project(
        &mut self,
        id: &str,
        update: &UpdateProject,
    ) -> Result<(), ServiceError> {
        let updated = self.service.update_project(id, update).await?;
        self.adopt_project(updated);
        self.notifications.toast("Project Updated", None);
        Ok(())
    }

    fn adopt_project(&mut self, project: Project) {
        self.edit_form.sync(&project);
        self.project = Some(project);
    }

    pub fn open_edit_modal(&mut self) {
        self.edit_form.prepare();
        self.modals.edit_project = true;
    }

    /// Submit the edit form. Failures stay inside the form so the user
    /// can correct and retry.
    pub async fn submit_edit_modal(&mut self) {
        let Some((id, update)) = self.edit_form.begin_submit() else {
            return;
        };
        let result = match self.update_project(&id, &update).await {
            Ok(()) => Ok(()),
            Err(e) => {
                error!(project_id = %id, "edit project failed: {e}");
                Err(e.message_or("Failed to update project"))
            }
        };
        if self.edit_form.finish_submit(result) {
            self.modals.edit_project = false;
        }
    }

    pub fn start_description_edit(&mut self) {
        if let Some(ref project) = self.project {
            self.description_draft = Some(project.description.clone());
        }
    }

    pub fn cancel_description_edit(&mut self) {
        self.description_draft = None;
    }

    /// Save the inline description draft. The current name is re-sent
    /// with it.
    pub async fn update_description(&mut self) {
        let (Some(project_id), Some(project)) = (self.project_id.clone(), self.project.as_ref())
        else {
            return;
        };
        let update = UpdateProject {
            name: Some(project.name.clone()),
            description: Some(self.description_draft.clone().unwrap_or_default()),
            status: None,
        };

        match self.service.update_project(&project_id, &update).await {
            Ok(updated) => {
                self.adopt_project(updated);
                self.description_draft = None;
                self.notifications.toast(
                    "Project Updated",
                    Some("Description has been updated successfully."),
                );
            }
            Err(e) => {
                error!(%project_id, "update description failed: {e}");
                self.notifications
                    .error_toast(&e.message_or("Failed to update project"));
            }
        }
    }

    /// Ask for confirmation before deleting the project. Nothing is sent
    /// until `resolve_confirmation(true)`.
    pub fn request_delete_project(&mut self) {
        if self.project_id.is_none() {
            return;
        }
        if let Some(ref project) = self.project {
            self.confirmation = Some(Confirmation {
                prompt: project.delete_prompt(),
                action: ConfirmAction::DeleteProject,
            });
        }
    }

    pub async fn resolve_confirmation(&mut self, accepted: bool) {
        let Some(confirmation) = self.confirmation.take() else {
            return;
        };
        if !accepted {
            return;
        }
        match confirmation.action {
            ConfirmAction::DeleteProject => self.delete_project().await,
        }
    }

    async fn delete_project(&mut self) {
        let Some(project_id) = self.project_id.clone() else {
            return;
        };
        match self.service.delete_project(&project_id).await {
            Ok(()) => {
                info!(%project_id, "project deleted");
                self.notifications.toast(
                    "Project Deleted",
                    Some("Project has been successfully deleted."),
                );
                self.navigation = Some(Route::Dashboard);
            }
            Err(e) => {
                error!(%project_id, "delete project failed: {e}");
                self.notifications
                    .error_toast(&e.message_or("Failed to delete project"));
            }
        }
    }
}
