use ratatui::{
    prelude::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};

use crate::{state::View, ui::styles};

pub fn render(frame: &mut Frame, rect: Rect, view: View, loading: Option<String>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rect);

    let tabs = vec![
        Line::from(format!(" {} ", t!("Tabs.Dashboard"))),
        Line::from(format!(" {} [p] ", t!("Tabs.Compare"))),
    ];
    let tabs = Tabs::new(tabs)
        .style(styles::text())
        .highlight_style(styles::text_selected())
        .divider("|")
        .select(match view {
            View::Single => 0,
            View::Compare => 1,
        });
    frame.render_widget(tabs, chunks[0]);

    let dark_gray = styles::dark_gray();
    let mut spans = vec![];
    if let Some(loading) = loading {
        spans.push(Span::styled(format!("{loading}  "), dark_gray));
    }
    spans.extend([
        Span::styled(rust_i18n::locale().to_string(), styles::label()),
        Span::styled(" [L] · ", dark_gray),
        Span::styled(styles::palette().label(), styles::label()),
        Span::styled(" [C] | ", dark_gray),
        Span::styled(t!("Keyboard.Help"), dark_gray),
        Span::styled(" ", dark_gray),
        Span::styled(t!("Keyboard.Console"), dark_gray),
    ]);
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
        chunks[1],
    );
}
