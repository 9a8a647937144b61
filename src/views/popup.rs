use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::{events::Target, ui::styles, widgets::TickerInput};

fn safe_cursor_x(chunk_x: u16, visual_cursor: usize) -> u16 {
    let offset = u16::try_from(visual_cursor).unwrap_or(u16::MAX - 1);
    chunk_x.saturating_add(offset).saturating_add(1)
}

fn title(target: Target) -> String {
    match target {
        Target::Main => t!("Search.Title"),
        Target::Slot(slot) => t!("Search.SlotTitle", slot = slot.label()),
    }
}

/// Ticker search box with recent searches below it
pub fn render(frame: &mut Frame, rect: Rect, input: &TickerInput) {
    let rect = crate::ui::rect::centered(50, 16, rect);
    frame.render_widget(Clear, rect);

    let chunks = Layout::default()
        .margin(1)
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(rect);

    let paragraph = Paragraph::new(input.value()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border())
            .title(Span::styled(format!(" {} ", title(input.target())), styles::title())),
    );
    frame.render_widget(paragraph, chunks[0]);
    frame.set_cursor(
        safe_cursor_x(chunks[0].x, input.visual_cursor()),
        chunks[0].y + 1,
    );

    let hint = input.error().map_or_else(
        || Span::styled(t!("Search.Hint"), styles::dark_gray()),
        |error| Span::styled(error.to_string(), styles::error()),
    );
    frame.render_widget(Paragraph::new(Line::from(hint)), chunks[1]);

    let items: Vec<ListItem> = input
        .history()
        .iter()
        .map(|ticker| ListItem::new(Span::styled(ticker.to_string(), styles::popup())))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border())
                .title(Span::styled(format!(" {} ", t!("Search.History")), styles::label())),
        )
        .highlight_style(styles::text_selected());
    let mut state = ListState::default();
    state.select(input.selected());
    frame.render_stateful_widget(list, chunks[2], &mut state);
}
