use camp_core::member::InviteRole;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::{centered_rect, error_line, field_line, FormAction};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MemberField {
    #[default]
    Email,
    Role,
}

/// Draft for the "Invite Member" form: an email and the role to grant.
#[derive(Debug, Clone, Default)]
pub struct AddMemberModal {
    pub email: String,
    pub role: InviteRole,
    pub field: MemberField,
    pub error: Option<String>,
}

impl AddMemberModal {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab => {
                self.field = match self.field {
                    MemberField::Email => MemberField::Role,
                    MemberField::Role => MemberField::Email,
                };
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                if self.field == MemberField::Role =>
            {
                self.role = self.role.toggled();
            }
            KeyCode::Backspace if self.field == MemberField::Email => {
                self.email.pop();
            }
            KeyCode::Char(c) if self.field == MemberField::Email => self.email.push(c),
            _ => {}
        }
        FormAction::Editing
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Invite Member ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let role = format!("< {} >", self.role.display_name());
        let lines = vec![
            field_line("Email", &self.email, self.field == MemberField::Email),
            field_line("Role", &role, self.field == MemberField::Role),
            Line::default(),
            error_line(self.error.as_deref()),
            Line::from(vec![
                Span::styled(" Tab ", Style::default().fg(Color::Yellow).bold()),
                Span::raw("field  "),
                Span::styled(" Enter ", Style::default().fg(Color::Yellow).bold()),
                Span::raw("invite  "),
                Span::styled(" Esc ", Style::default().fg(Color::Yellow).bold()),
                Span::raw("cancel"),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}
