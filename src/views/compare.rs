use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use strum::IntoEnumIterator;

use crate::{
    compare::{SlotId, Verdict},
    state::Dashboard,
    ui::styles,
};

pub fn render(frame: &mut Frame, rect: Rect, dashboard: &Dashboard) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(12),
            Constraint::Length(3),
        ])
        .split(rect);

    super::dashboard::chart_tabs(frame, rows[0], dashboard.mode(), dashboard.range());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    for (slot, column) in SlotId::iter().zip(columns.iter()) {
        slot_pane(frame, *column, dashboard, slot);
    }

    verdict(frame, rows[2], dashboard);
}

fn slot_pane(frame: &mut Frame, rect: Rect, dashboard: &Dashboard, slot: SlotId) {
    let pane = dashboard.compare().slot(slot);
    let key = slot.label().to_ascii_lowercase();
    let title = pane.ticker().map_or_else(
        || format!(" [{}] ", slot.label()),
        |ticker| format!(" [{}] {ticker} ", slot.label()),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .title(Span::styled(title, styles::title()));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    if pane.ticker().is_none() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                t!("Compare.EmptySlot", key = key),
                styles::dark_gray(),
            ))
            .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    if let Some(not_found) = pane.not_found() {
        super::not_found::render_compact(frame, inner, not_found);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(6),
            Constraint::Length(9),
        ])
        .split(inner);
    super::dashboard::info_panel(frame, rows[0], pane);
    pane.chart().render(frame, rows[1]);
    super::dashboard::sentiment(frame, rows[2], pane);
}

fn ticker_of(dashboard: &Dashboard, slot: SlotId) -> String {
    dashboard
        .compare()
        .slot(slot)
        .ticker()
        .map_or_else(|| slot.label().to_string(), ToString::to_string)
}

fn verdict(frame: &mut Frame, rect: Rect, dashboard: &Dashboard) {
    let line = match dashboard.compare().verdict() {
        Some(Verdict::Winner {
            slot,
            score_a,
            score_b,
        }) => Line::from(vec![
            Span::styled(
                t!("Compare.Winner", ticker = ticker_of(dashboard, slot)),
                styles::up(std::cmp::Ordering::Greater),
            ),
            Span::styled(
                format!(
                    "  (A {} · B {})",
                    score_a.round_dp(2),
                    score_b.round_dp(2)
                ),
                styles::dark_gray(),
            ),
        ]),
        Some(Verdict::Tie { score }) => Line::from(Span::styled(
            t!("Compare.Tie", score = score.round_dp(2)),
            styles::warning(),
        )),
        None => Line::from(Span::styled(t!("Compare.Waiting"), styles::dark_gray())),
    };

    frame.render_widget(
        Paragraph::new(vec![
            line,
            Line::from(Span::styled(t!("Compare.Formula"), styles::dark_gray())),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(styles::border()),
        ),
        rect,
    );
}
