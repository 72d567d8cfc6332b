use std::sync::Arc;

use anyhow::{Context, Result};
use camp_core::task::{Status, Task};
use camp_core::Project;
use camp_service::ProjectService;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use tokio::runtime::Runtime;
use tracing::error;

use crate::components::task_list::{status_style, TaskList};
use crate::components::{centered_rect, note_list, FormAction};
use crate::detail::{Control, PageView, ProjectDetail, Route, Tab};
use crate::notify::ToastVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Project picker
    Dashboard,
    /// One project's detail page
    Detail,
}

/// Which layer of the detail page receives keys. Derived from page state,
/// topmost overlay first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Blocking error popup
    Alert,
    /// Yes/no question
    Confirm,
    EditProject,
    AddTask,
    Invite,
    /// Inline description editor
    EditDescription,
    TaskDetail,
    Demo,
}

pub struct App<S: ProjectService> {
    rt: Runtime,
    service: Arc<S>,
    screen: Screen,
    projects: Vec<Project>,
    project_list: ListState,
    detail: ProjectDetail<S>,
    task_list: TaskList,
    status_message: Option<String>,
    demo_link: String,
}

impl<S: ProjectService> App<S> {
    pub fn new(service: Arc<S>, project_id: Option<String>, demo_link: String) -> Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let mut app = Self {
            rt,
            detail: ProjectDetail::new(service.clone(), None),
            service,
            screen: Screen::Dashboard,
            projects: Vec::new(),
            project_list: ListState::default(),
            task_list: TaskList::default(),
            status_message: None,
            demo_link,
        };
        match project_id {
            Some(id) => app.open_project(&id),
            None => app.refresh_projects(),
        }
        Ok(app)
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn detail(&self) -> &ProjectDetail<S> {
        &self.detail
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// The highlighted task on the Tasks tab.
    pub fn selected_task(&self) -> Option<&Task> {
        self.task_list.selected(self.detail.tasks())
    }

    pub fn mode(&self) -> Mode {
        if self.screen == Screen::Dashboard {
            return Mode::Normal;
        }
        let detail = &self.detail;
        if detail.notifications().current_alert().is_some() {
            Mode::Alert
        } else if detail.confirmation().is_some() {
            Mode::Confirm
        } else if detail.modals.edit_project {
            Mode::EditProject
        } else if detail.modals.add_task {
            Mode::AddTask
        } else if detail.modals.invite {
            Mode::Invite
        } else if detail.description_draft().is_some() {
            Mode::EditDescription
        } else if detail.selected_task().is_some() {
            Mode::TaskDetail
        } else if detail.modals.video_demo {
            Mode::Demo
        } else {
            Mode::Normal
        }
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(
            self.mode(),
            Mode::EditProject | Mode::AddTask | Mode::Invite | Mode::EditDescription
        )
    }

    fn open_project(&mut self, project_id: &str) {
        self.rt.block_on(self.detail.navigate(project_id));
        self.screen = Screen::Detail;
        self.task_list = TaskList::default();
        self.task_list.clamp(self.detail.tasks().len());
    }

    fn refresh_projects(&mut self) {
        match self.rt.block_on(self.service.list_projects()) {
            Ok(projects) => {
                let selected = self
                    .project_list
                    .selected()
                    .filter(|i| *i < projects.len())
                    .or(if projects.is_empty() { None } else { Some(0) });
                self.project_list.select(selected);
                self.projects = projects;
            }
            Err(e) => {
                error!("failed to list projects: {e}");
                self.status_message =
                    Some(format!("Error: {}", e.message_or("Failed to load projects")));
            }
        }
    }

    fn go_to_dashboard(&mut self) {
        self.screen = Screen::Dashboard;
        self.refresh_projects();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match self.screen {
            Screen::Dashboard => self.handle_dashboard(key),
            Screen::Detail => {
                self.detail.notifications_mut().clear_toast();
                match self.mode() {
                    Mode::Normal => self.handle_normal(key),
                    Mode::Alert => self.detail.notifications_mut().dismiss_alert(),
                    Mode::Confirm => {
                        let accepted = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
                        self.rt.block_on(self.detail.resolve_confirmation(accepted));
                    }
                    Mode::EditProject => self.handle_edit_project(key),
                    Mode::AddTask => self.handle_add_task(key),
                    Mode::Invite => self.handle_invite(key),
                    Mode::EditDescription => self.handle_edit_description(key),
                    Mode::TaskDetail => self.handle_task_detail(key),
                    Mode::Demo => self.detail.modals.video_demo = false,
                }

                if let Some(Route::Dashboard) = self.detail.take_navigation() {
                    self.status_message = self
                        .detail
                        .notifications()
                        .current_toast()
                        .map(|t| t.text());
                    self.go_to_dashboard();
                }
            }
        }
    }

    fn handle_dashboard(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let current = self.project_list.selected().unwrap_or(0);
                if current + 1 < self.projects.len() {
                    self.project_list.select(Some(current + 1));
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let current = self.project_list.selected().unwrap_or(0);
                if current > 0 {
                    self.project_list.select(Some(current - 1));
                }
            }
            KeyCode::Enter => {
                let id = self
                    .project_list
                    .selected()
                    .and_then(|i| self.projects.get(i))
                    .map(|p| p.id.clone());
                if let Some(id) = id {
                    self.open_project(&id);
                }
            }
            KeyCode::Char('r') => self.refresh_projects(),
            _ => {}
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') => {
                self.go_to_dashboard();
                return;
            }
            KeyCode::Char('r') => {
                if let Some(id) = self.detail.project_id().map(String::from) {
                    self.open_project(&id);
                }
                return;
            }
            _ => {}
        }

        if self.detail.view() != PageView::Loaded {
            return;
        }

        match key.code {
            KeyCode::Tab => {
                let next = self.detail.tab().next();
                self.rt.block_on(self.detail.select_tab(next));
            }
            KeyCode::Char('1') => self.rt.block_on(self.detail.select_tab(Tab::Tasks)),
            KeyCode::Char('2') => self.rt.block_on(self.detail.select_tab(Tab::Files)),
            KeyCode::Char('3') => self.rt.block_on(self.detail.select_tab(Tab::Notes)),
            KeyCode::Char('v') => self.detail.modals.video_demo = true,
            KeyCode::Char('n') if self.detail.visible(Control::AddTask) => {
                self.detail.add_task_form.reset();
                self.detail.modals.add_task = true;
            }
            KeyCode::Char('i') if self.detail.visible(Control::Invite) => {
                self.detail.invite_form.reset();
                self.detail.modals.invite = true;
            }
            KeyCode::Char('e') if self.detail.visible(Control::EditProject) => {
                self.detail.open_edit_modal();
            }
            KeyCode::Char('E') if self.detail.visible(Control::EditDescription) => {
                self.detail.start_description_edit();
            }
            KeyCode::Char('D') if self.detail.visible(Control::DeleteProject) => {
                self.detail.request_delete_project();
            }
            KeyCode::Char('x') if self.detail.visible(Control::DeleteCompletedProject) => {
                self.detail.request_delete_project();
            }
            _ if self.detail.tab() == Tab::Tasks => self.handle_task_keys(key),
            _ => {}
        }
    }

    fn handle_task_keys(&mut self, key: KeyEvent) {
        let Some(task) = self.selected_task().cloned() else {
            return;
        };
        match key.code {
            KeyCode::Enter => self.rt.block_on(self.detail.open_task(&task.id)),
            KeyCode::Char('m') => self.move_task(&task, task.status.next()),
            KeyCode::Char('M') => self.move_task(&task, task.status.prev()),
            KeyCode::Char('d') => {
                if let Err(e) = self.rt.block_on(self.detail.delete_task(&task.id)) {
                    error!(task_id = %task.id, "delete task failed: {e}");
                    self.detail
                        .notifications_mut()
                        .error_toast(&e.message_or("Failed to delete task"));
                }
                self.task_list.clamp(self.detail.tasks().len());
            }
            _ => self.task_list.handle_key(key, self.detail.tasks().len()),
        }
    }

    fn move_task(&mut self, task: &Task, status: Option<Status>) {
        let Some(status) = status else {
            return;
        };
        if let Err(e) = self
            .rt
            .block_on(self.detail.change_task_status(&task.id, status))
        {
            error!(task_id = %task.id, "status change failed: {e}");
            self.detail
                .notifications_mut()
                .error_toast(&e.message_or("Failed to update task status"));
        }
    }

    fn handle_edit_project(&mut self, key: KeyEvent) {
        match self.detail.edit_form.handle_key(key) {
            FormAction::Submit => self.rt.block_on(self.detail.submit_edit_modal()),
            FormAction::Cancel => self.detail.modals.edit_project = false,
            FormAction::Editing => {}
        }
    }

    fn handle_add_task(&mut self, key: KeyEvent) {
        match self.detail.add_task_form.handle_key(key) {
            FormAction::Submit => {
                let title = self.detail.add_task_form.title.clone();
                if self.rt.block_on(self.detail.add_task(&title)) {
                    self.detail.modals.add_task = false;
                    let len = self.detail.tasks().len();
                    self.task_list.clamp(len);
                    if let Some(task) = self.detail.tasks().last() {
                        let id = task.id.clone();
                        self.task_list.select_task_by_id(self.detail.tasks(), &id);
                    }
                }
            }
            FormAction::Cancel => self.detail.modals.add_task = false,
            FormAction::Editing => {}
        }
    }

    fn handle_invite(&mut self, key: KeyEvent) {
        match self.detail.invite_form.handle_key(key) {
            FormAction::Submit => {
                let email = self.detail.invite_form.email.clone();
                let role = self.detail.invite_form.role;
                if self.rt.block_on(self.detail.invite_member(&email, role)) {
                    self.detail.modals.invite = false;
                }
            }
            FormAction::Cancel => self.detail.modals.invite = false,
            FormAction::Editing => {}
        }
    }

    fn handle_edit_description(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.rt.block_on(self.detail.update_description()),
            KeyCode::Esc => self.detail.cancel_description_edit(),
            KeyCode::Backspace => {
                if let Some(draft) = self.detail.description_draft_mut() {
                    draft.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(draft) = self.detail.description_draft_mut() {
                    draft.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_task_detail(&mut self, key: KeyEvent) {
        let Some(task) = self.detail.selected_task().cloned() else {
            return;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.detail.close_task(),
            KeyCode::Char('m') => self.move_task(&task, task.status.next()),
            KeyCode::Char('M') => self.move_task(&task, task.status.prev()),
            _ => {}
        }
    }

    // -- Rendering --

    pub fn render(&self, frame: &mut Frame) {
        match self.screen {
            Screen::Dashboard => self.render_dashboard(frame),
            Screen::Detail => self.render_detail(frame),
        }
    }

    fn render_dashboard(&self, frame: &mut Frame) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let title = Line::from(vec![
            Span::styled(" camp ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("| "),
            Span::styled("Projects", Style::default().fg(Color::Yellow)),
        ]);
        frame.render_widget(title, layout[0]);

        let items: Vec<ListItem> = self
            .projects
            .iter()
            .map(|p| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<11}", p.status.display_name()), project_status_style(p)),
                    Span::styled(p.name.as_str(), Style::default().bold()),
                    Span::styled(format!("  {}", p.description), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" Projects ({}) ", self.projects.len()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
            .highlight_symbol("> ");
        let mut state = self.project_list.clone();
        frame.render_stateful_widget(list, layout[1], &mut state);

        self.render_status_bar(
            frame,
            layout[2],
            &[("q", "quit"), ("j/k", "nav"), ("Enter", "open"), ("r", "refresh")],
        );
    }

    fn render_detail(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let project = match (self.detail.view(), self.detail.project()) {
            (PageView::Loaded, Some(project)) => project,
            (view, _) => {
                let text = if view == PageView::Loading {
                    "Loading..."
                } else {
                    "Project not found"
                };
                frame.render_widget(Paragraph::new(format!(" {text}")), layout[0]);
                self.render_status_bar(frame, layout[4], &[("b", "back"), ("r", "retry"), ("q", "quit")]);
                return;
            }
        };

        self.render_title_bar(frame, project, layout[0]);
        self.render_header(frame, project, layout[1]);

        let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
        let tabs = Tabs::new(titles)
            .select(self.detail.tab().index())
            .highlight_style(Style::default().fg(Color::Cyan).bold().underlined());
        frame.render_widget(tabs, layout[2]);

        match self.detail.tab() {
            Tab::Tasks => self.task_list.render(frame, layout[3], self.detail.tasks()),
            Tab::Files => {
                let placeholder = Paragraph::new("File management coming soon.")
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center)
                    .block(Block::default().title(" Files ").borders(Borders::ALL));
                frame.render_widget(placeholder, layout[3]);
            }
            Tab::Notes => note_list::render(frame, layout[3], self.detail.notes()),
        }

        self.render_status_bar(frame, layout[4], &self.mode_hints());

        match self.mode() {
            Mode::Normal => {}
            Mode::Alert => {
                let msg = self.detail.notifications().current_alert().unwrap_or_default();
                render_dialog(frame, " Alert ", &format!("{msg}\n\n(any key) OK"), Color::Red, area);
            }
            Mode::Confirm => {
                if let Some(c) = self.detail.confirmation() {
                    let text = format!("{}\n\n(y)es / (any key) cancel", c.prompt);
                    render_dialog(frame, " Confirm ", &text, Color::Red, area);
                }
            }
            Mode::EditProject => self.detail.edit_form.render(frame, area),
            Mode::AddTask => self.detail.add_task_form.render(frame, area),
            Mode::Invite => self.detail.invite_form.render(frame, area),
            Mode::EditDescription => {}
            Mode::TaskDetail => {
                if let Some(task) = self.detail.selected_task() {
                    render_task_detail(frame, task, area);
                }
            }
            Mode::Demo => {
                let text = format!("Demo video:\n{}\n\n(any key) close", self.demo_link);
                render_dialog(frame, " View Demo ", &text, Color::Cyan, area);
            }
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, project: &Project, area: Rect) {
        let mut spans = vec![
            Span::styled(" camp ", Style::default().bold().fg(Color::Cyan)),
            Span::styled("| \u{2190} Projects (b) | ", Style::default().fg(Color::DarkGray)),
            Span::styled(project.name.as_str(), Style::default().fg(Color::Yellow).bold()),
            Span::raw(" "),
            Span::styled(
                format!("[{}]", project.status.display_name()),
                project_status_style(project),
            ),
        ];
        if let Some(role) = self.detail.role() {
            spans.push(Span::styled(
                format!("  as {role}"),
                Style::default().fg(Color::Magenta),
            ));
        }
        frame.render_widget(Line::from(spans), area);
    }

    fn render_header(&self, frame: &mut Frame, project: &Project, area: Rect) {
        let description = match self.detail.description_draft() {
            Some(draft) => Line::from(vec![
                Span::styled(" Description: ", Style::default().fg(Color::Cyan)),
                Span::raw(draft),
                Span::styled("_", Style::default().fg(Color::Cyan)),
                Span::styled("  (Enter save, Esc cancel)", Style::default().fg(Color::DarkGray)),
            ]),
            None => Line::from(Span::styled(
                format!(" {}", project.description),
                Style::default().fg(Color::Gray),
            )),
        };

        let controls: Vec<Span> = self
            .detail
            .visible_controls()
            .into_iter()
            .flat_map(|c| {
                let (key_style, label_style) = match c {
                    Control::UploadFile => (
                        Style::default().fg(Color::DarkGray),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Control::DeleteProject | Control::DeleteCompletedProject => (
                        Style::default().fg(Color::Red).bold(),
                        Style::default().fg(Color::Red),
                    ),
                    _ => (Style::default().fg(Color::Yellow).bold(), Style::default()),
                };
                vec![
                    Span::styled(format!(" {}", control_key(c)), key_style),
                    Span::styled(format!(" {} ", c.label()), label_style),
                ]
            })
            .collect();

        let paragraph = Paragraph::new(vec![description, Line::from(controls)]);
        frame.render_widget(paragraph, area);
    }

    fn mode_hints(&self) -> Vec<(&'static str, &'static str)> {
        match self.mode() {
            Mode::Normal => {
                let mut hints = vec![("q", "quit"), ("b", "back"), ("Tab", "tabs")];
                if self.detail.tab() == Tab::Tasks {
                    hints.extend([
                        ("j/k", "tasks"),
                        ("Enter", "detail"),
                        ("m/M", "status"),
                        ("d", "del"),
                    ]);
                }
                hints.push(("r", "reload"));
                hints
            }
            Mode::Alert | Mode::Demo => vec![("any", "close")],
            Mode::Confirm => vec![("y", "confirm"), ("any", "cancel")],
            Mode::EditProject => vec![
                ("Tab", "field"),
                ("Space", "status"),
                ("Enter", "save"),
                ("Esc", "cancel"),
            ],
            Mode::AddTask | Mode::EditDescription => vec![("Enter", "save"), ("Esc", "cancel")],
            Mode::Invite => vec![("Tab", "field"), ("Enter", "invite"), ("Esc", "cancel")],
            Mode::TaskDetail => vec![("m/M", "status"), ("Esc", "back")],
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
        let toast = if self.screen == Screen::Detail {
            self.detail.notifications().current_toast()
        } else {
            None
        };
        if let Some(toast) = toast {
            let color = match toast.variant {
                ToastVariant::Default => Color::Green,
                ToastVariant::Destructive => Color::Red,
            };
            let line = Line::from(Span::styled(
                format!(" {}", toast.text()),
                Style::default().fg(color),
            ));
            frame.render_widget(line, area);
            return;
        }
        if let Some(ref msg) = self.status_message {
            let line = Line::from(Span::styled(
                format!(" {msg}"),
                Style::default().fg(Color::Green),
            ));
            frame.render_widget(line, area);
            return;
        }

        let spans: Vec<Span> = hints
            .iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(
                        format!(" {key}"),
                        Style::default().fg(Color::Yellow).bold(),
                    ),
                    Span::raw(format!(" {desc} ")),
                ]
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }
}

fn control_key(control: Control) -> &'static str {
    match control {
        Control::DeleteProject => "D",
        Control::EditDescription => "E",
        Control::EditProject => "e",
        Control::DeleteCompletedProject => "x",
        Control::Invite => "i",
        Control::AddTask => "n",
        Control::ViewDemo => "v",
        Control::UploadFile => "u",
    }
}

fn project_status_style(project: &Project) -> Style {
    if project.is_completed() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Blue)
    }
}

fn render_dialog(frame: &mut Frame, title: &str, text: &str, border: Color, area: Rect) {
    let popup = centered_rect(50, 25, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, popup);
}

fn render_task_detail(frame: &mut Frame, task: &Task, area: Rect) {
    let popup = centered_rect(60, 50, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {} ", task.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let description = if task.description.trim().is_empty() {
        "(no description)"
    } else {
        task.description.as_str()
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(Color::DarkGray)),
            Span::styled(task.status.display_name(), status_style(task.status)),
        ]),
        Line::from(vec![
            Span::styled("ID:     ", Style::default().fg(Color::DarkGray)),
            Span::raw(task.id.as_str()),
        ]),
        Line::default(),
        Line::raw(description),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}
