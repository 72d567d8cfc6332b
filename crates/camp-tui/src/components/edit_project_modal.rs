use camp_core::project::{Project, ProjectStatus, UpdateProject};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::{centered_rect, error_line, field_line, FormAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    Description,
    Status,
}

impl EditField {
    fn next(self) -> Self {
        match self {
            EditField::Name => EditField::Description,
            EditField::Description => EditField::Status,
            EditField::Status => EditField::Name,
        }
    }
}

/// Draft state of the "Edit Project" form.
///
/// Visibility is owned by the page; this only holds the draft fields, the
/// in-flight flag and the last submit error.
#[derive(Debug, Clone)]
pub struct EditProjectModal {
    project_id: String,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    field: EditField,
    loading: bool,
    error: Option<String>,
}

impl Default for EditProjectModal {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            name: String::new(),
            description: String::new(),
            status: ProjectStatus::Active,
            field: EditField::Name,
            loading: false,
            error: None,
        }
    }
}

impl EditProjectModal {
    pub fn new(project: &Project) -> Self {
        let mut modal = Self::default();
        modal.sync(project);
        modal
    }

    /// Re-fill the draft from a fresh project snapshot.
    pub fn sync(&mut self, project: &Project) {
        self.project_id = project.id.clone();
        self.name = project.name.clone();
        self.description = project.description.clone();
        self.status = project.status;
    }

    /// Reset focus and stale errors before the form is shown.
    pub fn prepare(&mut self) {
        self.field = EditField::Name;
        self.error = None;
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn field(&self) -> EditField {
        self.field
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            "Saving..."
        } else {
            "Save Changes"
        }
    }

    /// Start a submission. Returns the request to send, or `None` when the
    /// submit control is disabled (already saving) or the name is blank.
    pub fn begin_submit(&mut self) -> Option<(String, UpdateProject)> {
        if self.loading {
            return None;
        }
        let update = UpdateProject {
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
            status: Some(self.status),
        };
        if let Err(e) = update.validate() {
            self.error = Some(e.message().to_string());
            return None;
        }
        self.loading = true;
        self.error = None;
        Some((self.project_id.clone(), update))
    }

    /// Finish a submission. Returns true when the form should close.
    pub fn finish_submit(&mut self, result: Result<(), String>) -> bool {
        self.loading = false;
        match result {
            Ok(()) => true,
            Err(msg) => {
                self.error = Some(msg);
                false
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab => self.field = self.field.next(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                if self.field == EditField::Status =>
            {
                self.status = self.status.toggled();
            }
            KeyCode::Backspace => match self.field {
                EditField::Name => {
                    self.name.pop();
                }
                EditField::Description => {
                    self.description.pop();
                }
                EditField::Status => {}
            },
            KeyCode::Char(c) => match self.field {
                EditField::Name => self.name.push(c),
                EditField::Description => self.description.push(c),
                EditField::Status => {}
            },
            _ => {}
        }
        FormAction::Editing
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Edit Project ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let status_value = ProjectStatus::ALL
            .iter()
            .map(|s| {
                if *s == self.status {
                    format!("[{}]", s.display_name())
                } else {
                    format!(" {} ", s.display_name())
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        let submit_style = if self.loading {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green).bold()
        };

        let lines = vec![
            field_line("Project Name", &self.name, self.field == EditField::Name),
            Line::default(),
            field_line(
                "Description",
                &self.description,
                self.field == EditField::Description,
            ),
            Line::default(),
            field_line("Status", &status_value, self.field == EditField::Status),
            Line::default(),
            error_line(self.error.as_deref()),
            Line::from(vec![
                Span::styled(" Esc ", Style::default().fg(Color::Yellow).bold()),
                Span::raw("Cancel   "),
                Span::styled(" Enter ", Style::default().fg(Color::Yellow).bold()),
                Span::styled(self.submit_label(), submit_style),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup);
    }
}
