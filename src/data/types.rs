use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::EnumIter;
use time::{Date, Duration};

use crate::error::InvalidTicker;

/// Stock symbol, always trimmed and upper-cased (e.g. AAPL / BRK.B)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker {
    inner: String,
}

impl Ticker {
    const MAX_LEN: usize = 12;

    /// Normalize user input into a ticker, `None` when it can't be one
    pub fn parse(input: &str) -> Option<Self> {
        let symbol = input.trim().to_ascii_uppercase();
        let valid = !symbol.is_empty()
            && symbol.len() <= Self::MAX_LEN
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        valid.then_some(Self { inner: symbol })
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Ticker {
    type Err = InvalidTicker;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidTicker(s.to_string()))
    }
}

impl TryFrom<String> for Ticker {
    type Error = InvalidTicker;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.inner
    }
}

/// One trading day
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PricePoint {
    pub date: Date,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Line,
    Candlestick,
}

impl DisplayMode {
    pub fn label(self) -> String {
        match self {
            Self::Line => t!("DisplayMode.Line"),
            Self::Candlestick => t!("DisplayMode.Candlestick"),
        }
    }
}

/// Trailing window of calendar days ending today
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct TimeRange(u32);

impl From<u32> for TimeRange {
    fn from(days: u32) -> Self {
        Self::new(days)
    }
}

impl From<TimeRange> for u32 {
    fn from(range: TimeRange) -> Self {
        range.0
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self(Self::DEFAULT_DAYS)
    }
}

impl TimeRange {
    pub const DEFAULT_DAYS: u32 = 90;
    pub const PRESETS: [TimeRange; 5] = [
        TimeRange(7),
        TimeRange(30),
        TimeRange(90),
        TimeRange(180),
        TimeRange(365),
    ];

    /// A zero-day window is treated as "no selection"
    pub fn new(days: u32) -> Self {
        if days == 0 {
            Self::default()
        } else {
            Self(days)
        }
    }

    /// Parse a raw selection, falling back to 90 days when missing or not a number
    pub fn from_input(input: Option<&str>) -> Self {
        input
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .map_or_else(Self::default, Self::new)
    }

    pub fn preset(index: usize) -> Option<Self> {
        Self::PRESETS.get(index).copied()
    }

    pub fn preset_index(self) -> Option<usize> {
        Self::PRESETS.iter().position(|preset| *preset == self)
    }

    pub const fn days(self) -> u32 {
        self.0
    }

    /// First date still inside the window
    pub fn start_date(self, today: Date) -> Date {
        today
            .checked_sub(Duration::days(i64::from(self.0)))
            .unwrap_or(Date::MIN)
    }

    pub fn label(self) -> String {
        match self.0 {
            7 => "1W".to_string(),
            30 => "1M".to_string(),
            90 => "3M".to_string(),
            180 => "6M".to_string(),
            365 => "1Y".to_string(),
            days => format!("{days}D"),
        }
    }
}

/// Colour scheme for price movement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// Green up, red down
    #[default]
    Standard,
    /// Red up, green down
    RedUp,
    /// Blue up, orange down
    ColorBlind,
}

impl Palette {
    pub fn label(self) -> String {
        match self {
            Self::Standard => t!("Palette.Standard"),
            Self::RedUp => t!("Palette.RedUp"),
            Self::ColorBlind => t!("Palette.ColorBlind"),
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Standard => Self::RedUp,
            Self::RedUp => Self::ColorBlind,
            Self::ColorBlind => Self::Standard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn ticker_parse() {
        assert_eq!(Ticker::parse(" aapl ").unwrap().as_str(), "AAPL");
        assert_eq!(Ticker::parse("brk.b").unwrap().as_str(), "BRK.B");
        assert!(Ticker::parse("").is_none());
        assert!(Ticker::parse("   ").is_none());
        assert!(Ticker::parse("AA PL").is_none());
        assert!(Ticker::parse("THISISWAYTOOLONG").is_none());
        assert!("$$$".parse::<Ticker>().is_err());
    }

    #[test]
    fn ticker_serde_normalizes() {
        let ticker: Ticker = serde_json::from_str("\"msft\"").unwrap();
        assert_eq!(ticker.as_str(), "MSFT");
        assert!(serde_json::from_str::<Ticker>("\"\"").is_err());
        assert_eq!(serde_json::to_string(&ticker).unwrap(), "\"MSFT\"");
    }

    #[test]
    fn time_range_from_input() {
        assert_eq!(TimeRange::from_input(None).days(), 90);
        assert_eq!(TimeRange::from_input(Some("abc")).days(), 90);
        assert_eq!(TimeRange::from_input(Some("")).days(), 90);
        assert_eq!(TimeRange::from_input(Some("0")).days(), 90);
        assert_eq!(TimeRange::from_input(Some("-5")).days(), 90);
        assert_eq!(TimeRange::from_input(Some("30")).days(), 30);
        assert_eq!(TimeRange::from_input(Some(" 365 ")).days(), 365);
        assert_eq!(TimeRange::from_input(Some("45")).days(), 45);
    }

    #[test]
    fn time_range_presets() {
        assert_eq!(TimeRange::default().preset_index(), Some(2));
        assert_eq!(TimeRange::preset(0), Some(TimeRange::new(7)));
        assert_eq!(TimeRange::preset(5), None);
        assert_eq!(TimeRange::new(45).preset_index(), None);
        assert_eq!(TimeRange::new(45).label(), "45D");
        assert_eq!(TimeRange::new(365).label(), "1Y");
    }

    #[test]
    fn time_range_start_date() {
        let today = date!(2024 - 03 - 31);
        assert_eq!(TimeRange::new(30).start_date(today), date!(2024 - 03 - 01));
        assert_eq!(TimeRange::new(7).start_date(today), date!(2024 - 03 - 24));
    }

    #[test]
    fn cycles() {
        assert_eq!(Palette::ColorBlind.next(), Palette::Standard);
    }
}
