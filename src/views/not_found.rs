use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    data::Ticker,
    pane::{NotFound, NotFoundReason},
    ui::{content::Content, styles},
};

/// Offered on the not-found view, picked with keys 1-4
pub const SUGGESTIONS: [&str; 4] = ["AAPL", "MSFT", "GOOGL", "AMZN"];

pub fn suggestion(index: usize) -> Option<Ticker> {
    SUGGESTIONS.get(index).copied().and_then(Ticker::parse)
}

fn reason_text(reason: NotFoundReason) -> String {
    match reason {
        NotFoundReason::Unknown => t!("NotFound.Reason.Unknown"),
        NotFoundReason::NoData => t!("NotFound.Reason.NoData"),
        NotFoundReason::Malformed => t!("NotFound.Reason.Malformed"),
        NotFoundReason::Corrupt => t!("NotFound.Reason.Corrupt"),
    }
}

fn suggestion_line() -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{} ", t!("NotFound.Try")),
        styles::label(),
    )];
    for (idx, symbol) in SUGGESTIONS.iter().enumerate() {
        spans.push(Span::styled(format!("[{}] ", idx + 1), styles::keyboard()));
        spans.push(Span::styled(format!("{symbol}  "), styles::title()));
    }
    Line::from(spans)
}

pub fn render(frame: &mut Frame, rect: Rect, not_found: &NotFound) {
    let heading = Text::from(vec![
        Line::from("🔍"),
        Line::from(Span::styled(
            t!("NotFound.Title", ticker = not_found.ticker),
            styles::title(),
        )),
    ]);
    let body = Text::from(vec![
        Line::from(Span::styled(reason_text(not_found.reason), styles::dark_gray())),
        Line::default(),
        suggestion_line(),
        Line::default(),
        Line::from(Span::styled(t!("NotFound.Search"), styles::dark_gray())),
    ]);
    frame.render_widget(Content::new(heading, body), rect);
}

/// Short form used inside a comparison slot
pub fn render_compact(frame: &mut Frame, rect: Rect, not_found: &NotFound) {
    let lines = vec![
        Line::from(Span::styled(
            t!("NotFound.Title", ticker = not_found.ticker),
            styles::warning(),
        )),
        Line::from(Span::styled(reason_text(not_found.reason), styles::dark_gray())),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), rect);
}
