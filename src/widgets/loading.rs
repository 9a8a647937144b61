use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Span,
    widgets::{Paragraph, Widget},
};

use crate::ui::styles;

const FRAMES: [&str; 6] = ["◰", "◳", "◲", "◲", "◱", "◰"];
const FRAME_TIME: Duration = Duration::from_millis(120);

/// Spinner whose frame follows wall time, so redraw rate doesn't matter
#[derive(Clone, Copy, Debug)]
pub struct Loading {
    started: Instant,
}

impl Default for Loading {
    fn default() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Loading {
    pub fn widget(&self, now: Instant) -> LoadingWidget {
        let elapsed = now.saturating_duration_since(self.started);
        let index = (elapsed.as_millis() / FRAME_TIME.as_millis()) as usize % FRAMES.len();
        LoadingWidget { index }
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct LoadingWidget {
    index: usize,
}

impl LoadingWidget {
    pub fn text(self) -> String {
        let dots = self.index % 4;
        format!(
            "{} {}{}{}",
            FRAMES[self.index % FRAMES.len()],
            t!("Loading"),
            ".".repeat(dots),
            " ".repeat(3 - dots)
        )
    }
}

impl Widget for LoadingWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.text();
        let width = u16::try_from(unicode_width::UnicodeWidthStr::width(text.as_str()))
            .unwrap_or(area.width);
        let area = crate::ui::rect::centered(width, 1, area);
        Paragraph::new(Span::styled(text, styles::dark_gray())).render(area, buf);
    }
}
