use ratatui::{
    prelude::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{state::View, ui::styles};

fn hints(view: View) -> Vec<(&'static str, String)> {
    let mut hints = vec![
        ("/", t!("Keyboard.Search")),
        ("l/c", t!("Keyboard.Mode")),
        ("1-5", t!("Keyboard.Range")),
    ];
    match view {
        View::Single => hints.push(("n", t!("Keyboard.News"))),
        View::Compare => hints.push(("a/b", t!("Keyboard.Slot"))),
    }
    hints.extend([
        ("p", t!("Keyboard.Compare")),
        ("r", t!("Keyboard.Refresh")),
        ("q", t!("Keyboard.Quit")),
    ]);
    hints
}

/// Key hints on the left, latest announcement on the right
pub fn render(frame: &mut Frame, rect: Rect, view: View, announcement: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rect);

    let spans: Vec<Span> = hints(view)
        .into_iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(format!("[{key}]"), styles::keyboard()),
                Span::styled(format!(" {label}  "), styles::dark_gray()),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    if let Some(message) = announcement {
        frame.render_widget(
            Paragraph::new(Span::styled(message.to_string(), styles::text()))
                .alignment(Alignment::Right),
            chunks[1],
        );
    }
}
