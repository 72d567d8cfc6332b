use camp_core::task::{Status, Task};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Cursor over the page's task list. The tasks themselves stay owned by
/// the page so there is one copy to keep in sync with the server.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    list_state: ListState,
}

impl TaskList {
    /// Returns the currently highlighted task, if any.
    pub fn selected<'a>(&self, tasks: &'a [Task]) -> Option<&'a Task> {
        tasks.get(self.list_state.selected()?)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Keep the cursor on a valid row after the list changed length.
    pub fn clamp(&mut self, len: usize) {
        match (len, self.list_state.selected()) {
            (0, _) => self.list_state.select(None),
            (_, None) => self.list_state.select(Some(0)),
            (len, Some(i)) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    /// Select the task with the given ID. Returns `false` (cursor
    /// unchanged) when no such task exists.
    pub fn select_task_by_id(&mut self, tasks: &[Task], task_id: &str) -> bool {
        match tasks.iter().position(|t| t.id == task_id) {
            Some(idx) => {
                self.list_state.select(Some(idx));
                true
            }
            None => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, len: usize) {
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if current + 1 < len {
                    self.list_state.select(Some(current + 1));
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if current > 0 {
                    self.list_state.select(Some(current - 1));
                }
            }
            // Jump to first/last
            KeyCode::Char('g') => self.list_state.select(Some(0)),
            KeyCode::Char('G') => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, tasks: &[Task]) {
        let block = Block::default()
            .title(format!(" Tasks ({}) ", tasks.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        if tasks.is_empty() {
            let empty = Paragraph::new("No tasks yet.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = tasks
            .iter()
            .map(|task| {
                let badge = Span::styled(
                    format!("{:<12}", task.status.display_name()),
                    status_style(task.status),
                );
                ListItem::new(Line::from(vec![badge, Span::raw(task.title.as_str())]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .bold(),
            )
            .highlight_symbol("> ");

        let mut state = self.list_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}

pub fn status_style(status: Status) -> Style {
    match status {
        Status::Todo => Style::default().fg(Color::Blue),
        Status::InProgress => Style::default().fg(Color::Yellow),
        Status::Done => Style::default().fg(Color::Green),
    }
}
