use ratatui::{
    prelude::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
    Frame,
};

use crate::ui::{styles, text};

const KEYS: [(&str, &str); 13] = [
    ("/", "Help.Search"),
    ("l / c", "Help.Mode"),
    ("1-5", "Help.Range"),
    ("n", "Help.News"),
    ("p", "Help.Compare"),
    ("a / b", "Help.Slot"),
    ("r", "Help.Refresh"),
    ("L", "Help.Language"),
    ("C", "Help.Palette"),
    ("?", "Help.Help"),
    ("`", "Help.Console"),
    ("Esc", "Help.Close"),
    ("q", "Help.Quit"),
];

pub fn render(frame: &mut Frame, rect: Rect, first_visit: bool) {
    let rect = crate::ui::rect::centered(64, 24, rect);

    let mut lines = vec![
        Line::styled(
            concat!("tickerdash v", env!("CARGO_PKG_VERSION")),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::default(),
    ];
    if first_visit {
        lines.push(Line::from(Span::styled(t!("Help.Welcome"), styles::warning())));
        lines.push(Line::default());
    }
    lines.extend(KEYS.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(format!("{}  ", text::align_right(key, 7)), styles::keyboard()),
            Span::styled(t!(*desc), styles::text()),
        ])
    }));

    let paragraph = Paragraph::new(lines)
        .style(styles::popup())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border())
                .padding(Padding::horizontal(2))
                .title(Span::styled(format!(" {} ", t!("Help.Title")), styles::title())),
        );
    frame.render_widget(Clear, rect);
    frame.render_widget(paragraph, rect);
}
