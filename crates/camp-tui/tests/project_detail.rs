//! Behaviour tests for the project detail page against the in-memory
//! service.

use std::sync::Arc;

use camp_core::member::InviteRole;
use camp_core::project::{ProjectStatus, UpdateProject};
use camp_core::role::Role;
use camp_core::task::Status;
use camp_service::{MemoryService, ServiceError};
use camp_tui::detail::{Control, PageView, ProjectDetail, Route, Tab};
use camp_tui::notify::ToastVariant;

struct Fixture {
    svc: Arc<MemoryService>,
    project_id: String,
}

fn fixture(role: Option<Role>, status: ProjectStatus) -> Fixture {
    let svc = Arc::new(MemoryService::new());
    let project = svc.insert_project("Apollo", "Moon landing", status);
    svc.insert_task(&project.id, "Build rocket", Status::Todo);
    svc.insert_task(&project.id, "Train crew", Status::InProgress);
    if let Some(role) = role {
        svc.set_role(&project.id, role);
    }
    Fixture {
        svc,
        project_id: project.id,
    }
}

async fn loaded(f: &Fixture) -> ProjectDetail<MemoryService> {
    let mut page = ProjectDetail::new(f.svc.clone(), Some(f.project_id.clone()));
    assert_eq!(page.view(), PageView::Loading);
    page.load().await;
    page
}

// ---- Loading ----

#[tokio::test]
async fn load_populates_project_tasks_and_role() {
    let f = fixture(Some(Role::Member), ProjectStatus::Active);
    let page = loaded(&f).await;

    assert_eq!(page.view(), PageView::Loaded);
    assert_eq!(page.project().unwrap().name, "Apollo");
    assert_eq!(page.tasks().len(), 2);
    assert_eq!(page.role(), Some("member"));
    assert_eq!(page.tab(), Tab::Tasks);
    for op in ["get_project", "list_tasks", "get_my_role"] {
        assert_eq!(f.svc.call_count(op), 1, "{op}");
    }
}

#[tokio::test]
async fn failed_role_fetch_leaves_page_empty_and_controls_hidden() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    f.svc
        .fail_next("get_my_role", ServiceError::Internal("boom".into()));
    let page = loaded(&f).await;

    assert_eq!(page.view(), PageView::NotFound);
    assert!(page.role().is_none());
    for control in [
        Control::DeleteProject,
        Control::EditDescription,
        Control::EditProject,
        Control::Invite,
        Control::AddTask,
    ] {
        assert!(!page.visible(control), "{control:?}");
    }
}

#[tokio::test]
async fn unknown_project_shows_not_found() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let mut page = ProjectDetail::new(f.svc.clone(), Some("nope".into()));
    page.load().await;
    assert_eq!(page.view(), PageView::NotFound);
}

#[tokio::test]
async fn missing_project_id_skips_loading() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let mut page = ProjectDetail::new(f.svc.clone(), None);
    assert_eq!(page.view(), PageView::NotFound);
    page.load().await;
    assert!(f.svc.calls().is_empty());
}

#[tokio::test]
async fn navigate_resets_state_for_the_new_project() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let other = f.svc.insert_project("Gemini", "", ProjectStatus::Completed);
    f.svc.set_role(&other.id, Role::Member);

    let mut page = loaded(&f).await;
    page.select_tab(Tab::Files).await;
    page.navigate(&other.id).await;

    assert_eq!(page.project().unwrap().name, "Gemini");
    assert!(page.tasks().is_empty());
    assert_eq!(page.role(), Some("member"));
    assert_eq!(page.tab(), Tab::Tasks);
    assert_eq!(page.edit_form.name, "Gemini");
}

// ---- Role gating ----

#[tokio::test]
async fn member_sees_only_ungated_controls() {
    let f = fixture(Some(Role::Member), ProjectStatus::Active);
    let page = loaded(&f).await;
    assert_eq!(page.visible_controls(), vec![Control::ViewDemo]);
}

#[tokio::test]
async fn project_admin_can_manage_but_not_delete() {
    let f = fixture(Some(Role::ProjectAdmin), ProjectStatus::Active);
    let page = loaded(&f).await;

    assert!(page.visible(Control::EditProject));
    assert!(page.visible(Control::Invite));
    assert!(page.visible(Control::AddTask));
    assert!(!page.visible(Control::DeleteProject));
    assert!(!page.visible(Control::EditDescription));
}

#[tokio::test]
async fn admin_on_completed_project_gets_extra_delete() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Completed);
    let page = loaded(&f).await;

    assert!(page.visible(Control::DeleteProject));
    assert!(page.visible(Control::EditDescription));
    assert!(page.visible(Control::DeleteCompletedProject));

    let active = fixture(Some(Role::Admin), ProjectStatus::Active);
    let page = loaded(&active).await;
    assert!(!page.visible(Control::DeleteCompletedProject));
}

#[tokio::test]
async fn add_task_and_upload_follow_the_tab() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let mut page = loaded(&f).await;
    assert!(!page.visible(Control::UploadFile));

    page.select_tab(Tab::Files).await;
    assert!(!page.visible(Control::AddTask));
    assert!(page.visible(Control::UploadFile));
    assert!(!page.modals.upload_file);
}

// ---- Tabs ----

#[tokio::test]
async fn notes_load_once_on_first_visit() {
    let f = fixture(Some(Role::Member), ProjectStatus::Active);
    f.svc.insert_note(&f.project_id, "Kickoff on Monday");
    let mut page = loaded(&f).await;
    assert!(page.notes().is_none());

    page.select_tab(Tab::Notes).await;
    page.select_tab(Tab::Tasks).await;
    page.select_tab(Tab::Notes).await;

    assert_eq!(page.notes().unwrap()[0].content, "Kickoff on Monday");
    assert_eq!(f.svc.call_count("list_notes"), 1);
}

#[tokio::test]
async fn notes_failure_shows_empty_list() {
    let f = fixture(Some(Role::Member), ProjectStatus::Active);
    f.svc
        .fail_next("list_notes", ServiceError::Internal("down".into()));
    let mut page = loaded(&f).await;
    page.select_tab(Tab::Notes).await;
    assert_eq!(page.notes().map(|n| n.len()), Some(0));
}

// ---- Tasks ----

#[tokio::test]
async fn add_task_appends_server_record() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let mut page = loaded(&f).await;

    assert!(page.add_task("  Launch  ").await);
    assert_eq!(page.tasks().len(), 3);
    let created = page.tasks().last().unwrap();
    assert_eq!(created.title, "  Launch  ");
    assert_eq!(created.status, Status::Todo);
    assert_eq!(f.svc.call_count("create_task"), 1);
}

#[tokio::test]
async fn empty_task_title_is_rejected_locally() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let mut page = loaded(&f).await;

    assert!(!page.add_task("").await);
    assert_eq!(page.add_task_form.error.as_deref(), Some("Task title is required"));
    assert_eq!(f.svc.call_count("create_task"), 0);
}

#[tokio::test]
async fn add_task_failure_raises_alert() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    f.svc
        .fail_next("create_task", ServiceError::Forbidden("Only admins can add tasks".into()));
    let mut page = loaded(&f).await;

    assert!(!page.add_task("Launch").await);
    assert_eq!(page.tasks().len(), 2);
    assert_eq!(
        page.notifications().current_alert(),
        Some("Only admins can add tasks")
    );
}

#[tokio::test]
async fn delete_task_removes_only_after_success() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let mut page = loaded(&f).await;
    let id = page.tasks()[0].id.clone();

    f.svc
        .fail_next("delete_task", ServiceError::Internal("locked".into()));
    assert!(page.delete_task(&id).await.is_err());
    assert_eq!(page.tasks().len(), 2);

    page.delete_task(&id).await.unwrap();
    assert_eq!(page.tasks().len(), 1);
    assert!(page.tasks().iter().all(|t| t.id != id));
    assert_eq!(f.svc.call_count("delete_task"), 2);
}

#[tokio::test]
async fn status_change_adopts_server_record() {
    let f = fixture(Some(Role::Member), ProjectStatus::Active);
    let mut page = loaded(&f).await;
    let id = page.tasks()[0].id.clone();

    f.svc.rename_stored_task(&id, "Build bigger rocket");
    page.change_task_status(&id, Status::Done).await.unwrap();

    let task = &page.tasks()[0];
    assert_eq!(task.status, Status::Done);
    assert_eq!(task.title, "Build bigger rocket");
    assert_eq!(page.tasks()[1].title, "Train crew");
}

#[tokio::test]
async fn status_change_failure_keeps_list() {
    let f = fixture(Some(Role::Member), ProjectStatus::Active);
    let mut page = loaded(&f).await;
    let id = page.tasks()[0].id.clone();

    f.svc
        .fail_next("update_task_status", ServiceError::Forbidden("nope".into()));
    assert!(page.change_task_status(&id, Status::Done).await.is_err());
    assert_eq!(page.tasks()[0].status, Status::Todo);
}

#[tokio::test]
async fn open_task_fetches_detail_and_tracks_status_changes() {
    let f = fixture(Some(Role::Member), ProjectStatus::Active);
    let mut page = loaded(&f).await;
    let id = page.tasks()[1].id.clone();

    page.open_task(&id).await;
    assert_eq!(page.selected_task().unwrap().title, "Train crew");

    page.change_task_status(&id, Status::Done).await.unwrap();
    assert_eq!(page.selected_task().unwrap().status, Status::Done);

    page.close_task();
    assert!(page.selected_task().is_none());
}

// ---- Members ----

#[tokio::test]
async fn invite_success_shows_toast() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let mut page = loaded(&f).await;

    assert!(page.invite_member("ada@camp.dev", InviteRole::ProjectAdmin).await);
    let toast = page.notifications().current_toast().unwrap();
    assert_eq!(toast.title, "Member Invited");
    assert_eq!(
        toast.description.as_deref(),
        Some("ada@camp.dev has been added as project_admin.")
    );
    assert_eq!(f.svc.members(&f.project_id).len(), 1);
}

#[tokio::test]
async fn invite_unknown_user_raises_alert() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    f.svc.add_known_user("ada@camp.dev");
    let mut page = loaded(&f).await;

    assert!(!page.invite_member("ghost@camp.dev", InviteRole::Member).await);
    assert_eq!(page.notifications().current_alert(), Some("User does not exist"));
    assert!(f.svc.members(&f.project_id).is_empty());

    // no server message: generic hint
    page.notifications_mut().dismiss_alert();
    f.svc.fail_next("add_member", ServiceError::Internal(String::new()));
    assert!(!page.invite_member("ada@camp.dev", InviteRole::Member).await);
    assert_eq!(
        page.notifications().current_alert(),
        Some("Failed to add member. Ensure user exists.")
    );
}

#[tokio::test]
async fn empty_email_never_reaches_the_server() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let mut page = loaded(&f).await;

    assert!(!page.invite_member("", InviteRole::Member).await);
    assert_eq!(page.invite_form.error.as_deref(), Some("Email is required"));
    assert_eq!(f.svc.call_count("add_member"), 0);
}

#[tokio::test]
async fn email_is_sent_as_typed() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let mut page = loaded(&f).await;

    // the server decides what an address looks like
    assert!(page.invite_member("bob", InviteRole::Member).await);
    assert_eq!(f.svc.call_count("add_member"), 1);
    assert_eq!(f.svc.members(&f.project_id)[0].email, "bob");
}

// ---- Edit project ----

#[tokio::test]
async fn edit_form_is_prefilled_and_resynced() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let mut page = loaded(&f).await;
    assert_eq!(page.edit_form.name, "Apollo");
    assert_eq!(page.edit_form.description, "Moon landing");

    let update = UpdateProject {
        name: Some("Apollo 11".into()),
        description: None,
        status: Some(ProjectStatus::Completed),
    };
    page.update_project(&f.project_id, &update).await.unwrap();

    assert_eq!(page.project().unwrap().name, "Apollo 11");
    assert_eq!(page.edit_form.name, "Apollo 11");
    assert_eq!(page.edit_form.status, ProjectStatus::Completed);
    assert_eq!(
        page.notifications().current_toast().unwrap().title,
        "Project Updated"
    );
}

#[tokio::test]
async fn submit_edit_modal_sends_form_values_once() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let mut page = loaded(&f).await;

    page.open_edit_modal();
    assert!(page.modals.edit_project);
    page.edit_form.name = "Artemis".into();
    page.edit_form.description = "Back to the moon".into();
    page.edit_form.status = ProjectStatus::Completed;
    page.submit_edit_modal().await;

    assert_eq!(f.svc.call_count("update_project"), 1);
    assert!(!page.modals.edit_project);
    let project = page.project().unwrap();
    assert_eq!(project.name, "Artemis");
    assert_eq!(project.description, "Back to the moon");
    assert!(project.is_completed());
}

#[tokio::test]
async fn failed_edit_keeps_modal_open_with_error() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    f.svc.fail_next(
        "update_project",
        ServiceError::InvalidInput("Name already taken".into()),
    );
    let mut page = loaded(&f).await;

    page.open_edit_modal();
    page.edit_form.name = "Gemini".into();
    page.submit_edit_modal().await;

    assert!(page.modals.edit_project);
    assert!(!page.edit_form.is_loading());
    assert_eq!(page.edit_form.error(), Some("Name already taken"));
    assert_eq!(page.project().unwrap().name, "Apollo");
}

#[tokio::test]
async fn empty_name_in_edit_form_sends_nothing() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let mut page = loaded(&f).await;

    page.open_edit_modal();
    page.edit_form.name.clear();
    page.submit_edit_modal().await;

    assert_eq!(f.svc.call_count("update_project"), 0);
    assert_eq!(page.edit_form.error(), Some("Project name is required"));
}

#[tokio::test]
async fn whitespace_name_is_submitted_unchanged() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let mut page = loaded(&f).await;

    page.open_edit_modal();
    page.edit_form.name = "  ".into();
    page.submit_edit_modal().await;

    assert_eq!(f.svc.call_count("update_project"), 1);
    assert_eq!(page.project().unwrap().name, "  ");
}

#[tokio::test]
async fn description_update_resends_name() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let mut page = loaded(&f).await;

    page.start_description_edit();
    assert_eq!(page.description_draft(), Some("Moon landing"));
    page.description_draft_mut().unwrap().push_str(" in 1969");
    page.update_description().await;

    assert!(page.description_draft().is_none());
    let project = page.project().unwrap();
    assert_eq!(project.name, "Apollo");
    assert_eq!(project.description, "Moon landing in 1969");
    assert_eq!(
        page.notifications().current_toast().unwrap().text(),
        "Project Updated: Description has been updated successfully."
    );
}

#[tokio::test]
async fn description_failure_shows_error_toast() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    f.svc
        .fail_next("update_project", ServiceError::Internal(String::new()));
    let mut page = loaded(&f).await;

    page.start_description_edit();
    page.update_description().await;

    let toast = page.notifications().current_toast().unwrap();
    assert_eq!(toast.variant, ToastVariant::Destructive);
    assert_eq!(toast.description.as_deref(), Some("Failed to update project"));
    assert_eq!(page.description_draft(), Some("Moon landing"));
}

// ---- Delete project ----

#[tokio::test]
async fn declined_confirmation_sends_nothing() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    let mut page = loaded(&f).await;

    page.request_delete_project();
    assert_eq!(
        page.confirmation().unwrap().prompt,
        "Are you sure you want to delete project \"Apollo\"? This action cannot be undone."
    );
    page.resolve_confirmation(false).await;

    assert!(page.confirmation().is_none());
    assert_eq!(f.svc.call_count("delete_project"), 0);
    assert!(page.take_navigation().is_none());
}

#[tokio::test]
async fn confirmed_delete_navigates_to_dashboard() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Completed);
    let mut page = loaded(&f).await;

    page.request_delete_project();
    page.resolve_confirmation(true).await;

    assert_eq!(f.svc.call_count("delete_project"), 1);
    assert_eq!(page.take_navigation(), Some(Route::Dashboard));
    assert_eq!(
        page.notifications().current_toast().unwrap().title,
        "Project Deleted"
    );
}

#[tokio::test]
async fn failed_delete_stays_on_page() {
    let f = fixture(Some(Role::Admin), ProjectStatus::Active);
    f.svc
        .fail_next("delete_project", ServiceError::Forbidden(String::new()));
    let mut page = loaded(&f).await;

    page.request_delete_project();
    page.resolve_confirmation(true).await;

    assert!(page.take_navigation().is_none());
    let toast = page.notifications().current_toast().unwrap();
    assert_eq!(toast.variant, ToastVariant::Destructive);
    assert_eq!(toast.description.as_deref(), Some("Failed to delete project"));
}
