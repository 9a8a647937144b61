mod candles;
mod controller;
mod range;
mod widget;

pub use controller::{ChartOutcome, ChartSlot, ModeController};
pub use range::filter_window;
pub use widget::{
    CandleChart, ChartFactory, ChartWidget, LineChart, Placeholder, TerminalChartFactory,
};

#[cfg(test)]
pub(crate) use controller::tests::CountingFactory;
