use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::{error_line, FormAction};

/// Draft for the single-field "Add Task" form.
#[derive(Debug, Clone, Default)]
pub struct AddTaskModal {
    pub title: String,
    pub error: Option<String>,
}

impl AddTaskModal {
    pub fn reset(&mut self) {
        self.title.clear();
        self.error = None;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Backspace => {
                self.title.pop();
            }
            KeyCode::Char(c) => self.title.push(c),
            _ => {}
        }
        FormAction::Editing
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let height = if self.error.is_some() { 4 } else { 3 };
        let input_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(height),
            width: area.width,
            height,
        };
        frame.render_widget(Clear, input_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" New task (Enter create, Esc cancel) ");
        let mut lines = vec![Line::raw(self.title.as_str())];
        if self.error.is_some() {
            lines.push(error_line(self.error.as_deref()));
        }
        frame.render_widget(Paragraph::new(lines).block(block), input_area);
    }
}
