use crossterm::event::{Event, KeyEvent};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::{data::Ticker, events::Target, helper::cycle};

const HISTORY_LIMIT: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// Still editing
    Pending,
    Cancelled,
    Submitted { target: Target, ticker: Ticker },
}

/// Search box for a ticker symbol, with recent-search history
#[derive(Debug)]
pub struct TickerInput {
    input: Input,
    history: Vec<Ticker>,
    selected: Option<usize>,
    target: Target,
    error: Option<String>,
    visible: bool,
}

impl Default for TickerInput {
    fn default() -> Self {
        Self {
            input: Input::default(),
            history: vec![],
            selected: None,
            target: Target::Main,
            error: None,
            visible: false,
        }
    }
}

impl TickerInput {
    pub fn open(&mut self, target: Target) {
        self.target = target;
        self.visible = true;
        self.selected = None;
        self.error = None;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.input.reset();
        self.selected = None;
        self.error = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn visual_cursor(&self) -> usize {
        self.input.visual_cursor()
    }

    pub fn history(&self) -> &[Ticker] {
        &self.history
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Most recent first, no duplicates
    pub fn remember(&mut self, ticker: Ticker) {
        self.history.retain(|t| t != &ticker);
        self.history.insert(0, ticker);
        self.history.truncate(HISTORY_LIMIT);
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> InputOutcome {
        match event {
            key!(Esc) => {
                self.close();
                return InputOutcome::Cancelled;
            }
            key!(Enter) => return self.submit(),
            key!(Up) => self.selected = cycle::prev_opt(self.selected, self.history.len()),
            key!(Down) => self.selected = cycle::next_opt(self.selected, self.history.len()),
            _ => {
                if self.input.handle_event(&Event::Key(event)).is_some() {
                    self.selected = None;
                    self.error = None;
                }
            }
        }
        InputOutcome::Pending
    }

    fn submit(&mut self) -> InputOutcome {
        let ticker = match self.selected.and_then(|idx| self.history.get(idx)) {
            Some(ticker) => Some(ticker.clone()),
            None => Ticker::parse(self.input.value()),
        };
        let Some(ticker) = ticker else {
            self.error = Some(t!("Search.Invalid", input = self.input.value().trim()));
            return InputOutcome::Pending;
        };

        let target = self.target;
        self.remember(ticker.clone());
        self.close();
        InputOutcome::Submitted { target, ticker }
    }
}
