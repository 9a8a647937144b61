use std::fs;
use std::path::{Path, PathBuf};

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const TAIL_LINES: usize = 200;

/// Newest `tickerdash*.log` in `dir`
fn latest_log_file(dir: &Path) -> Option<PathBuf> {
    fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(crate::logger::LOG_PREFIX) && n.ends_with(".log"))
        })
        .max_by_key(|path| fs::metadata(path).and_then(|m| m.modified()).ok())
}

fn read_last_lines(path: &Path, count: usize) -> Vec<String> {
    let Ok(content) = fs::read_to_string(path) else {
        return vec![];
    };
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].iter().map(ToString::to_string).collect()
}

fn level_style(line: &str) -> Style {
    if line.contains("ERROR") {
        Style::default().fg(Color::Red)
    } else if line.contains("WARN") {
        Style::default().fg(Color::Yellow)
    } else if line.contains("INFO") {
        Style::default().fg(Color::Green)
    } else if line.contains("DEBUG") {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Overlay tailing the active log file
#[derive(Debug)]
pub struct LogPanel {
    dir: PathBuf,
    lines: Vec<String>,
    visible: bool,
}

impl Default for LogPanel {
    fn default() -> Self {
        Self::new(crate::logger::active_log_dir())
    }
}

impl LogPanel {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            lines: Vec::new(),
            visible: false,
        }
    }

    pub fn refresh(&mut self) {
        if let Some(file) = latest_log_file(&self.dir) {
            self.lines = read_last_lines(&file, TAIL_LINES);
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        if self.visible {
            self.refresh();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }
        self.refresh();

        frame.render_widget(Clear, area);
        let block = Block::default()
            .title(format!(" {} ", t!("Keyboard.Console")))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .style(Style::default().bg(Color::Black));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let skip = self.lines.len().saturating_sub(usize::from(inner.height));
        let lines: Vec<Line> = self.lines[skip..]
            .iter()
            .map(|line| Line::from(Span::styled(line.as_str(), level_style(line))))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
