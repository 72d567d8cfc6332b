pub mod add_member_modal;
pub mod add_task_modal;
pub mod edit_project_modal;
pub mod note_list;
pub mod task_list;

use ratatui::prelude::*;

/// What a form wants after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Editing,
    Submit,
    Cancel,
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// One labelled input line inside a form popup.
pub(crate) fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{label}: "), label_style),
        Span::raw(value),
    ])
}

pub(crate) fn error_line(error: Option<&str>) -> Line<'_> {
    match error {
        Some(msg) => Line::from(Span::styled(msg, Style::default().fg(Color::Red))),
        None => Line::default(),
    }
}
