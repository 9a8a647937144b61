//! Info panel: latest price, daily change and key metrics for the cached series.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use time::Date;

use crate::{
    chart::filter_window,
    data::{PricePoint, Ticker, TickerSeries, TimeRange},
    helper::DecimalExt,
};

/// Closes above this are treated as corrupt data
pub const DEFAULT_PRICE_CEILING: Decimal = dec!(1000000);

const YEAR: TimeRange = TimeRange::PRESETS[4];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    Positive,
    Negative,
}

/// Day-over-day move between the two most recent closes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceChange {
    pub change: Decimal,
    pub percent: Decimal,
}

impl PriceChange {
    /// `None` when the previous close can't be used as a base
    pub fn between(latest: &PricePoint, previous: &PricePoint) -> Option<Self> {
        if previous.close <= Decimal::ZERO {
            return None;
        }
        let change = latest.close - previous.close;
        let percent = change.checked_div(previous.close)?.checked_mul(dec!(100))?;
        Some(Self { change, percent })
    }

    pub fn trend(&self) -> Trend {
        if self.change >= Decimal::ZERO {
            Trend::Positive
        } else {
            Trend::Negative
        }
    }

    /// `+50.00 (+50.00%)`
    pub fn display(&self) -> String {
        format!(
            "{} ({})",
            self.change.format_signed(),
            self.percent.format_signed_percent()
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelMetrics {
    pub ticker: Ticker,
    pub company: String,
    pub as_of: Date,
    pub price: Decimal,
    pub change: Option<PriceChange>,
    pub high_52w: Option<Decimal>,
    pub low_52w: Option<Decimal>,
    pub volume: u64,
    pub avg_volume: Option<u64>,
}

impl PanelMetrics {
    pub fn price_display(&self) -> String {
        self.price.format_price()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorruptReason {
    AboveCeiling,
    NotPositive,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Empty,
    Ready(Box<PanelMetrics>),
    Corrupt {
        ticker: Ticker,
        reason: CorruptReason,
    },
}

pub struct InfoPanel {
    ceiling: Decimal,
    state: PanelState,
}

impl InfoPanel {
    pub fn new(ceiling: Decimal) -> Self {
        Self {
            ceiling,
            state: PanelState::Empty,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn metrics(&self) -> Option<&PanelMetrics> {
        match &self.state {
            PanelState::Ready(metrics) => Some(metrics),
            _ => None,
        }
    }

    pub fn update(&mut self, series: &TickerSeries, today: Date) -> &PanelState {
        self.state = Self::derive(series, self.ceiling, today);
        &self.state
    }

    pub fn clear(&mut self) {
        self.state = PanelState::Empty;
    }

    /// Pure derivation of the panel from a series
    pub fn derive(series: &TickerSeries, ceiling: Decimal, today: Date) -> PanelState {
        let Some(latest) = series.latest() else {
            return PanelState::Empty;
        };
        let ticker = series.symbol().clone();

        let reason = if latest.close > ceiling {
            Some(CorruptReason::AboveCeiling)
        } else if latest.close <= Decimal::ZERO {
            Some(CorruptReason::NotPositive)
        } else {
            None
        };
        if let Some(reason) = reason {
            tracing::warn!(%ticker, close = %latest.close, ?reason, "latest close failed sanity check");
            return PanelState::Corrupt { ticker, reason };
        }

        let change = series
            .previous()
            .and_then(|previous| PriceChange::between(latest, previous));

        let year = filter_window(series.points(), YEAR, today);
        let avg_volume = u64::try_from(year.len())
            .ok()
            .filter(|len| *len > 0)
            .map(|len| year.iter().map(|p| p.volume).sum::<u64>() / len);

        PanelState::Ready(Box::new(PanelMetrics {
            company: company_name(&ticker),
            ticker,
            as_of: latest.date,
            price: latest.close,
            change,
            high_52w: year.iter().map(|p| p.high).max(),
            low_52w: year.iter().map(|p| p.low).min(),
            volume: latest.volume,
            avg_volume,
        }))
    }
}

/// Display name for well-known tickers
pub fn company_name(ticker: &Ticker) -> String {
    let name = match ticker.as_str() {
        "AAPL" => "Apple Inc.",
        "MSFT" => "Microsoft Corporation",
        "GOOGL" => "Alphabet Inc.",
        "AMZN" => "Amazon.com, Inc.",
        "META" => "Meta Platforms, Inc.",
        "TSLA" => "Tesla, Inc.",
        "NFLX" => "Netflix, Inc.",
        "NVDA" => "NVIDIA Corporation",
        "PYPL" => "PayPal Holdings, Inc.",
        "INTC" => "Intel Corporation",
        other => return format!("{other} Stock"),
    };
    name.to_string()
}
