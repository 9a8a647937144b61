use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Clear,
    Frame,
};
use strum::IntoEnumIterator;

use crate::{
    compare::SlotId,
    state::{Dashboard, View},
    widgets::{LoadingWidget, LogPanel, TickerInput},
};

mod compare;
mod dashboard;
mod footer;
mod header;
mod help;
pub mod not_found;
mod popup;
mod toasts;

/// Everything one frame needs besides the log panel
pub struct Screen<'a> {
    pub dashboard: &'a Dashboard,
    pub input: &'a TickerInput,
    pub announcement: Option<&'a str>,
    pub help: bool,
    pub first_visit: bool,
    pub loading: LoadingWidget,
}

pub fn render(frame: &mut Frame, screen: &Screen<'_>, log_panel: &mut LogPanel) {
    let area = frame.size();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let dashboard = screen.dashboard;
    let loading = dashboard.is_loading().then(|| screen.loading.text());
    header::render(frame, rows[0], dashboard.view(), loading);

    match dashboard.view() {
        View::Single => match dashboard.main().not_found() {
            Some(not_found) => not_found::render(frame, rows[1], not_found),
            None => dashboard::render(frame, rows[1], dashboard),
        },
        View::Compare => compare::render(frame, rows[1], dashboard),
    }

    if dashboard.is_loading() && !has_data(dashboard) {
        let area = crate::ui::rect::centered(24, 3, rows[1]);
        frame.render_widget(Clear, area);
        frame.render_widget(screen.loading, area);
    }

    footer::render(frame, rows[2], dashboard.view(), screen.announcement);
    toasts::render(frame, rows[1], dashboard.toasts());

    if screen.input.is_visible() {
        popup::render(frame, rows[1], screen.input);
    } else if screen.help {
        help::render(frame, rows[1], screen.first_visit);
    }

    log_panel.render(frame, log_area(rows[1]));
}

fn has_data(dashboard: &Dashboard) -> bool {
    match dashboard.view() {
        View::Single => dashboard.main().series().is_some(),
        View::Compare => SlotId::iter().any(|slot| dashboard.compare().slot(slot).series().is_some()),
    }
}

/// Lower half of the body
fn log_area(body: Rect) -> Rect {
    crate::ui::rect::bottom(body.height / 2, body)
}
