use ratatui::{
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    toast::{ToastLevel, Toasts},
    ui::styles,
};

const WIDTH: u16 = 48;
const HEIGHT: u16 = 3;

/// Stack toasts in the top-right corner of `rect`
pub fn render(frame: &mut Frame, rect: Rect, toasts: &Toasts) {
    let width = WIDTH.min(rect.width);
    let mut y = rect.y;
    for toast in toasts.iter() {
        if y + HEIGHT > rect.bottom() {
            break;
        }
        let area = Rect::new(rect.right() - width, y, width, HEIGHT);
        let style = match toast.level {
            ToastLevel::Info => styles::text(),
            ToastLevel::Warning => styles::warning(),
            ToastLevel::Error => styles::error(),
        };
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(Span::styled(toast.message.as_str(), style))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).border_style(style)),
            area,
        );
        y += HEIGHT;
    }
}
