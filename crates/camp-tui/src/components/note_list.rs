use camp_core::note::Note;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

/// Notes tab body. `None` means the notes are still being fetched.
pub fn render(frame: &mut Frame, area: Rect, notes: Option<&[Note]>) {
    let block = Block::default()
        .title(" Notes ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let notes = match notes {
        None => {
            frame.render_widget(Paragraph::new("Loading notes...").block(block), area);
            return;
        }
        Some(notes) if notes.is_empty() => {
            let empty = Paragraph::new("No notes yet.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }
        Some(notes) => notes,
    };

    let items: Vec<ListItem> = notes
        .iter()
        .map(|note| {
            let stamp = note
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M ").to_string())
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(stamp, Style::default().fg(Color::DarkGray)),
                Span::raw(note.content.as_str()),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
