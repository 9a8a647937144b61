use std::rc::Rc;

use rust_decimal::Decimal;
use time::Date;

use crate::{
    chart::{ChartFactory, ChartOutcome, ModeController},
    data::{DisplayMode, PriceRecord, Ticker, TickerSeries, TimeRange},
    error::{ApiError, DataError},
    panel::{InfoPanel, PanelState},
    sentiment::SentimentSnapshot,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotFoundReason {
    /// Backend says the symbol doesn't exist
    Unknown,
    /// No usable price records
    NoData,
    /// Latest close missing or not numeric
    Malformed,
    /// Latest close outside the sane range
    Corrupt,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotFound {
    pub ticker: Ticker,
    pub reason: NotFoundReason,
}

/// What a fetch result did to the pane
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaneUpdate {
    /// Result belongs to an older search
    Stale,
    /// Ticker already resolved as not found
    Skipped,
    Validated,
    Loaded { points: usize, chart: ChartOutcome },
    SentimentLoaded,
    NotFound(NotFoundReason),
    Failed(String),
}

/// One ticker's worth of state: cached series, chart, info panel and sentiment
pub struct TickerPane {
    ticker: Option<Ticker>,
    generation: u64,
    pending: usize,
    series: Option<TickerSeries>,
    chart: ModeController,
    panel: InfoPanel,
    sentiment: Option<SentimentSnapshot>,
    not_found: Option<NotFound>,
}

impl TickerPane {
    pub fn new(
        factory: Rc<dyn ChartFactory>,
        mode: DisplayMode,
        range: TimeRange,
        ceiling: Decimal,
    ) -> Self {
        Self {
            ticker: None,
            generation: 0,
            pending: 0,
            series: None,
            chart: ModeController::new(factory, mode, range),
            panel: InfoPanel::new(ceiling),
            sentiment: None,
            not_found: None,
        }
    }

    /// Start a new search, returns the generation its results must carry
    pub fn begin(&mut self, ticker: Ticker, requests: usize) -> u64 {
        self.generation += 1;
        tracing::debug!(%ticker, generation = self.generation, "search started");
        self.ticker = Some(ticker);
        self.pending = requests;
        self.sentiment = None;
        self.not_found = None;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation && self.ticker.is_some()
    }

    /// Common gate for every incoming result
    fn accept(&mut self, generation: u64, what: &str) -> Option<PaneUpdate> {
        if !self.is_current(generation) {
            tracing::debug!(
                what,
                generation,
                current = self.generation,
                "dropping stale response"
            );
            return Some(PaneUpdate::Stale);
        }
        self.pending = self.pending.saturating_sub(1);
        if self.not_found.is_some() {
            return Some(PaneUpdate::Skipped);
        }
        None
    }

    fn invalidate(&mut self, reason: NotFoundReason) -> PaneUpdate {
        if let Some(ticker) = self.ticker.clone() {
            tracing::info!(%ticker, ?reason, "ticker not found");
            self.not_found = Some(NotFound { ticker, reason });
        }
        self.series = None;
        self.sentiment = None;
        self.pending = 0;
        self.chart.reset();
        self.panel.clear();
        PaneUpdate::NotFound(reason)
    }

    pub fn apply_validation(
        &mut self,
        generation: u64,
        result: Result<bool, ApiError>,
    ) -> PaneUpdate {
        if let Some(update) = self.accept(generation, "validation") {
            return update;
        }
        match result {
            Ok(true) => PaneUpdate::Validated,
            Ok(false) => self.invalidate(NotFoundReason::Unknown),
            Err(err) => {
                tracing::warn!(error = %err, "ticker validation failed, continuing");
                PaneUpdate::Failed(err.to_string())
            }
        }
    }

    pub fn apply_stock_data(
        &mut self,
        generation: u64,
        result: Result<Vec<PriceRecord>, ApiError>,
        today: Date,
    ) -> PaneUpdate {
        if let Some(update) = self.accept(generation, "stock_data") {
            return update;
        }
        let Some(ticker) = self.ticker.clone() else {
            return PaneUpdate::Stale;
        };

        let records = match result {
            Ok(records) => records,
            Err(err) => {
                tracing::error!(%ticker, error = %err, "failed to fetch stock data");
                // last-known-good data for the same ticker stays on screen
                if self.series.as_ref().map(TickerSeries::symbol) != Some(&ticker) {
                    self.series = None;
                    self.chart.reset();
                    self.panel.clear();
                }
                return PaneUpdate::Failed(err.to_string());
            }
        };

        let series = match TickerSeries::from_records(ticker, records) {
            Ok(series) => series,
            Err(DataError::EmptySeries { .. }) => return self.invalidate(NotFoundReason::NoData),
            Err(err @ DataError::MalformedClose { .. }) => {
                tracing::warn!(error = %err, "rejecting series");
                return self.invalidate(NotFoundReason::Malformed);
            }
        };

        if let PanelState::Corrupt { .. } = self.panel.update(&series, today) {
            return self.invalidate(NotFoundReason::Corrupt);
        }
        let chart = self.chart.load(&series, today);
        let points = series.len();
        self.series = Some(series);
        PaneUpdate::Loaded { points, chart }
    }

    pub fn apply_sentiment(
        &mut self,
        generation: u64,
        result: Result<SentimentSnapshot, ApiError>,
    ) -> PaneUpdate {
        if let Some(update) = self.accept(generation, "sentiment") {
            return update;
        }
        match result {
            Ok(snapshot) => {
                self.sentiment = Some(snapshot);
                PaneUpdate::SentimentLoaded
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch sentiment");
                self.sentiment = None;
                PaneUpdate::Failed(err.to_string())
            }
        }
    }

    /// Count a result that carries no pane data (news)
    pub fn settle(&mut self, generation: u64) -> bool {
        if self.is_current(generation) {
            self.pending = self.pending.saturating_sub(1);
            true
        } else {
            false
        }
    }

    pub fn set_mode(&mut self, mode: DisplayMode, today: Date) -> ChartOutcome {
        self.chart.set_mode(mode, self.series.as_ref(), today)
    }

    pub fn set_range(&mut self, range: TimeRange, today: Date) -> ChartOutcome {
        self.chart.set_range(range, self.series.as_ref(), today)
    }

    pub fn ticker(&self) -> Option<&Ticker> {
        self.ticker.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    pub fn series(&self) -> Option<&TickerSeries> {
        self.series.as_ref()
    }

    pub fn chart(&self) -> &ModeController {
        &self.chart
    }

    pub fn panel(&self) -> &InfoPanel {
        &self.panel
    }

    pub fn sentiment(&self) -> Option<&SentimentSnapshot> {
        self.sentiment.as_ref()
    }

    pub fn not_found(&self) -> Option<&NotFound> {
        self.not_found.as_ref()
    }

    /// Percent change and bullish percent, once both are known
    pub fn score_inputs(&self) -> Option<(Decimal, Decimal)> {
        if self.not_found.is_some() {
            return None;
        }
        let percent = self.panel.metrics()?.change?.percent;
        let sentiment = self.sentiment?.bullish_percent();
        Some((percent, sentiment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{chart::CountingFactory, panel::DEFAULT_PRICE_CEILING};
    use rust_decimal_macros::dec;
    use time::macros::date;

    const TODAY: Date = date!(2024 - 06 - 30);

    fn pane() -> TickerPane {
        TickerPane::new(
            Rc::new(CountingFactory::new()),
            DisplayMode::Line,
            TimeRange::default(),
            DEFAULT_PRICE_CEILING,
        )
    }

    fn records(closes: &[(&str, Decimal)]) -> Vec<PriceRecord> {
        closes
            .iter()
            .map(|(date, close)| PriceRecord {
                date: (*date).to_string(),
                close: Some(*close),
                ..PriceRecord::default()
            })
            .collect()
    }

    fn aapl() -> Ticker {
        Ticker::parse("AAPL").unwrap()
    }

    #[test]
    fn loads_series() {
        let mut pane = pane();
        let generation = pane.begin(aapl(), 3);
        assert!(pane.is_loading());

        let update = pane.apply_stock_data(
            generation,
            Ok(records(&[("2024-06-27", dec!(100)), ("2024-06-28", dec!(105))])),
            TODAY,
        );
        assert_eq!(
            update,
            PaneUpdate::Loaded {
                points: 2,
                chart: ChartOutcome::Updated { points: 2 }
            }
        );
        assert!(pane.chart().is_active());
        assert_eq!(pane.panel().metrics().unwrap().price, dec!(105));
        assert_eq!(pane.score_inputs(), None);

        pane.apply_sentiment(
            generation,
            Ok(SentimentSnapshot {
                sentiment_score: 0.8,
                ..SentimentSnapshot::default()
            }),
        );
        assert_eq!(pane.score_inputs(), Some((dec!(5), dec!(80))));
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut pane = pane();
        let old = pane.begin(aapl(), 3);
        let new = pane.begin(Ticker::parse("MSFT").unwrap(), 3);
        assert_ne!(old, new);

        let update = pane.apply_stock_data(
            old,
            Ok(records(&[("2024-06-28", dec!(100))])),
            TODAY,
        );
        assert_eq!(update, PaneUpdate::Stale);
        assert!(pane.series().is_none());
        assert!(pane.is_loading());
        assert!(!pane.settle(old));
    }

    #[test]
    fn invalid_ticker_shows_not_found() {
        let mut pane = pane();
        let generation = pane.begin(aapl(), 3);
        assert_eq!(
            pane.apply_validation(generation, Ok(false)),
            PaneUpdate::NotFound(NotFoundReason::Unknown)
        );
        assert_eq!(pane.not_found().unwrap().ticker, aapl());
        assert!(!pane.is_loading());

        // later data for the same search can't override the verdict
        let update = pane.apply_stock_data(
            generation,
            Ok(records(&[("2024-06-28", dec!(100))])),
            TODAY,
        );
        assert_eq!(update, PaneUpdate::Skipped);
        assert!(pane.series().is_none());
    }

    #[test]
    fn bad_data_shows_not_found() {
        let mut pane = pane();
        let generation = pane.begin(aapl(), 1);
        assert_eq!(
            pane.apply_stock_data(generation, Ok(vec![]), TODAY),
            PaneUpdate::NotFound(NotFoundReason::NoData)
        );

        let generation = pane.begin(aapl(), 1);
        let update = pane.apply_stock_data(
            generation,
            Ok(records(&[("2024-06-28", dec!(2000000))])),
            TODAY,
        );
        assert_eq!(update, PaneUpdate::NotFound(NotFoundReason::Corrupt));
        assert!(!pane.chart().is_active());

        let generation = pane.begin(aapl(), 1);
        let mut rows = records(&[("2024-06-27", dec!(100))]);
        rows.push(PriceRecord {
            date: "2024-06-28".into(),
            ..PriceRecord::default()
        });
        assert_eq!(
            pane.apply_stock_data(generation, Ok(rows), TODAY),
            PaneUpdate::NotFound(NotFoundReason::Malformed)
        );
    }

    fn unavailable() -> Result<Vec<PriceRecord>, ApiError> {
        Err(ApiError::Status {
            endpoint: "/api/stock_data",
            status: 503,
        })
    }

    #[test]
    fn failure_for_new_ticker_discards_previous_series() {
        let mut pane = pane();
        let generation = pane.begin(aapl(), 1);
        pane.apply_stock_data(generation, Ok(records(&[("2024-06-28", dec!(100))])), TODAY);
        assert!(pane.series().is_some());

        let generation = pane.begin(Ticker::parse("MSFT").unwrap(), 1);
        let update = pane.apply_stock_data(generation, unavailable(), TODAY);
        assert!(matches!(update, PaneUpdate::Failed(_)));
        assert!(pane.series().is_none());
        assert!(pane.panel().metrics().is_none());
        assert!(!pane.chart().is_active());
        assert!(pane.not_found().is_none());
    }

    #[test]
    fn refresh_failure_keeps_last_known_good() {
        let mut pane = pane();
        let generation = pane.begin(aapl(), 1);
        pane.apply_stock_data(generation, Ok(records(&[("2024-06-28", dec!(100))])), TODAY);

        let generation = pane.begin(aapl(), 1);
        let update = pane.apply_stock_data(generation, unavailable(), TODAY);
        assert!(matches!(update, PaneUpdate::Failed(_)));
        assert_eq!(pane.series().map(TickerSeries::len), Some(1));
        assert_eq!(pane.panel().metrics().unwrap().price, dec!(100));
        assert!(pane.chart().is_active());
        assert!(!pane.is_loading());
    }
}
