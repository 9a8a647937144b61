pub mod series;
pub mod types;

pub use series::{PriceRecord, TickerSeries};
pub use types::*;
