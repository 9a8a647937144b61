mod loading;
mod log_panel;
mod terminal;
mod ticker_input;

pub use loading::{Loading, LoadingWidget};
pub use log_panel::LogPanel;
pub use terminal::Terminal;
pub use ticker_input::{InputOutcome, TickerInput};
