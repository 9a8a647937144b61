use std::ops::{Deref, DerefMut};

use ratatui::backend::CrosstermBackend;

type Backend = CrosstermBackend<std::io::Stdout>;

pub struct Terminal(ratatui::Terminal<Backend>);

impl Deref for Terminal {
    type Target = ratatui::Terminal<Backend>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Terminal {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Terminal {
    pub fn new() -> std::io::Result<Self> {
        let mut stdout = std::io::stdout();
        crossterm::execute!(
            stdout,
            crossterm::terminal::Clear(crossterm::terminal::ClearType::All)
        )?;
        ratatui::Terminal::new(CrosstermBackend::new(stdout)).map(Self)
    }

    pub fn enter_full_screen() -> std::io::Result<()> {
        use crossterm::{cursor, terminal};

        terminal::enable_raw_mode()?;
        crossterm::execute!(
            std::io::stdout(),
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
            cursor::Hide
        )
    }

    /// Safe to call more than once, also from the panic hook
    pub fn exit_full_screen() {
        use crossterm::{cursor, terminal};

        _ = crossterm::execute!(
            std::io::stdout(),
            cursor::Show,
            terminal::LeaveAlternateScreen,
        );
        _ = terminal::disable_raw_mode();
    }
}
