use std::{path::PathBuf, str::FromStr, time::Duration};

use rust_decimal::Decimal;

use crate::{cli::Args, data::DisplayMode, panel::DEFAULT_PRICE_CEILING};

pub const ENV_API: &str = "TICKERDASH_API";
pub const ENV_TIMEOUT: &str = "TICKERDASH_TIMEOUT_SECS";
pub const ENV_PRICE_CEILING: &str = "TICKERDASH_PRICE_CEILING";
pub const ENV_CHARTS: &str = "TICKERDASH_CHARTS";
pub const ENV_LOCALE: &str = "TICKERDASH_LOCALE";
pub const ENV_DATA_DIR: &str = "TICKERDASH_DATA_DIR";

pub const DEFAULT_API: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Chart renderers that may be built
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChartModes {
    line: bool,
    candle: bool,
}

impl Default for ChartModes {
    fn default() -> Self {
        Self {
            line: true,
            candle: true,
        }
    }
}

impl ChartModes {
    /// Comma separated list, e.g. `line,candle`
    pub fn parse(raw: &str) -> Self {
        let mut modes = Self {
            line: false,
            candle: false,
        };
        for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token.to_ascii_lowercase().as_str() {
                "line" => modes.line = true,
                "candle" | "candlestick" => modes.candle = true,
                other => tracing::warn!(mode = other, "ignoring unknown chart mode"),
            }
        }
        modes
    }

    pub fn allows(self, mode: DisplayMode) -> bool {
        match mode {
            DisplayMode::Line => self.line,
            DisplayMode::Candlestick => self.candle,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub timeout: Duration,
    pub price_ceiling: Decimal,
    pub charts: ChartModes,
    pub locale: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API.to_string(),
            timeout: DEFAULT_TIMEOUT,
            price_ceiling: DEFAULT_PRICE_CEILING,
            charts: ChartModes::default(),
            locale: None,
            data_dir: None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Log and preference directory, read on its own so logging can start before the rest
    pub fn data_dir_from_env() -> Option<PathBuf> {
        Self::data_dir_from(|key| std::env::var(key).ok())
    }

    pub fn data_dir_from(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
        non_empty(lookup(ENV_DATA_DIR)).map(PathBuf::from)
    }

    /// Build from any key lookup; unparseable values keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| non_empty(lookup(key));
        let mut config = Self::default();

        if let Some(api) = get(ENV_API) {
            config.api_base = api;
        }
        if let Some(raw) = get(ENV_TIMEOUT) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "invalid {ENV_TIMEOUT}, using default"),
            }
        }
        if let Some(raw) = get(ENV_PRICE_CEILING) {
            match Decimal::from_str(&raw) {
                Ok(ceiling) if ceiling > Decimal::ZERO => config.price_ceiling = ceiling,
                _ => tracing::warn!(value = %raw, "invalid {ENV_PRICE_CEILING}, using default"),
            }
        }
        if let Some(raw) = get(ENV_CHARTS) {
            config.charts = ChartModes::parse(&raw);
        }
        config.locale = get(ENV_LOCALE);
        config.data_dir = Self::data_dir_from(&lookup);
        config
    }

    /// Command line flags win over the environment
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(api) = non_empty(args.api.clone()) {
            self.api_base = api;
        }
    }
}
