use std::rc::Rc;

use ratatui::{
    layout::{Alignment, Rect},
    widgets::Paragraph,
    Frame,
};
use time::Date;

use super::{filter_window, ChartFactory, ChartWidget, Placeholder};
use crate::{
    data::{DisplayMode, TickerSeries, TimeRange},
    ui::styles,
};

/// Whatever currently occupies the chart area
pub enum ChartSlot {
    Empty,
    Active(Box<dyn ChartWidget>),
    Placeholder(Placeholder),
}

/// Result of pushing data through the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartOutcome {
    /// The live widget now shows `points` points
    Updated { points: usize },
    /// Nothing to do
    Unchanged,
    /// The range selected no points, the previous drawing stays
    EmptyRange,
    /// The widget could not be built, a placeholder is shown instead
    Fallback,
    /// No series cached yet, the widget is built on the next load
    NoData,
}

/// Owns the single chart widget of a pane and keeps mode and range in sync with it
pub struct ModeController {
    factory: Rc<dyn ChartFactory>,
    mode: DisplayMode,
    range: TimeRange,
    slot: ChartSlot,
}

impl ModeController {
    pub fn new(factory: Rc<dyn ChartFactory>, mode: DisplayMode, range: TimeRange) -> Self {
        Self {
            factory,
            mode,
            range,
            slot: ChartSlot::Empty,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn slot(&self) -> &ChartSlot {
        &self.slot
    }

    pub fn is_active(&self) -> bool {
        matches!(self.slot, ChartSlot::Active(_))
    }

    /// Feed a freshly fetched series
    pub fn load(&mut self, series: &TickerSeries, today: Date) -> ChartOutcome {
        if !self.is_active() && self.construct().is_err() {
            return ChartOutcome::Fallback;
        }
        self.push(series, today)
    }

    /// Swap the widget for another mode, the old one is destroyed first
    pub fn set_mode(
        &mut self,
        mode: DisplayMode,
        series: Option<&TickerSeries>,
        today: Date,
    ) -> ChartOutcome {
        if mode == self.mode {
            return ChartOutcome::Unchanged;
        }
        tracing::debug!(from = ?self.mode, to = ?mode, "switching chart mode");
        self.mode = mode;
        self.teardown();

        let Some(series) = series else {
            return ChartOutcome::NoData;
        };
        if self.construct().is_err() {
            return ChartOutcome::Fallback;
        }
        self.push(series, today)
    }

    /// Re-filter the current widget, never rebuilds it
    pub fn set_range(
        &mut self,
        range: TimeRange,
        series: Option<&TickerSeries>,
        today: Date,
    ) -> ChartOutcome {
        self.range = range;
        match series {
            Some(series) => self.push(series, today),
            None => ChartOutcome::NoData,
        }
    }

    pub fn reset(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let ChartSlot::Active(widget) = std::mem::replace(&mut self.slot, ChartSlot::Empty) {
            widget.destroy();
        }
    }

    fn construct(&mut self) -> Result<(), crate::error::ChartError> {
        self.teardown();
        match self.factory.build(self.mode) {
            Ok(widget) => {
                self.slot = ChartSlot::Active(widget);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "falling back to chart placeholder");
                self.slot = ChartSlot::Placeholder(Placeholder::unavailable(self.mode));
                Err(err)
            }
        }
    }

    fn push(&mut self, series: &TickerSeries, today: Date) -> ChartOutcome {
        let ChartSlot::Active(widget) = &mut self.slot else {
            return if matches!(self.slot, ChartSlot::Placeholder(_)) {
                ChartOutcome::Fallback
            } else {
                ChartOutcome::NoData
            };
        };

        let window = filter_window(series.points(), self.range, today);
        if window.is_empty() {
            tracing::warn!(
                ticker = %series.symbol(),
                days = self.range.days(),
                "no data points in selected range"
            );
            return ChartOutcome::EmptyRange;
        }
        widget.set_series(window);
        ChartOutcome::Updated {
            points: window.len(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match &self.slot {
            ChartSlot::Active(widget) => widget.render(frame, area),
            ChartSlot::Placeholder(placeholder) => placeholder.render(frame, area),
            ChartSlot::Empty => frame.render_widget(
                Paragraph::new(t!("Chart.Empty"))
                    .style(styles::dark_gray())
                    .alignment(Alignment::Center),
                area,
            ),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::{
        data::{PricePoint, PriceRecord, Ticker},
        error::ChartError,
    };
    use rust_decimal::Decimal;
    use time::{macros::date, Duration};

    /// Tracks how many widgets exist and what they were last fed
    #[derive(Default)]
    pub(crate) struct Counters {
        pub live: Cell<usize>,
        pub built: Cell<usize>,
        pub last_points: Cell<usize>,
        pub built_modes: RefCell<Vec<DisplayMode>>,
    }

    pub(crate) struct CountingFactory {
        pub counters: Rc<Counters>,
        pub unavailable: Option<DisplayMode>,
    }

    impl CountingFactory {
        pub fn new() -> Self {
            Self {
                counters: Rc::new(Counters::default()),
                unavailable: None,
            }
        }
    }

    struct CountingWidget {
        mode: DisplayMode,
        counters: Rc<Counters>,
    }

    impl ChartWidget for CountingWidget {
        fn mode(&self) -> DisplayMode {
            self.mode
        }

        fn set_series(&mut self, points: &[PricePoint]) {
            self.counters.last_points.set(points.len());
        }

        fn render(&self, _frame: &mut Frame, _area: Rect) {}
    }

    impl Drop for CountingWidget {
        fn drop(&mut self) {
            self.counters.live.set(self.counters.live.get() - 1);
        }
    }

    impl ChartFactory for CountingFactory {
        fn build(&self, mode: DisplayMode) -> Result<Box<dyn ChartWidget>, ChartError> {
            if self.unavailable == Some(mode) {
                return Err(ChartError::Unavailable(mode));
            }
            let c = &self.counters;
            c.live.set(c.live.get() + 1);
            c.built.set(c.built.get() + 1);
            c.built_modes.borrow_mut().push(mode);
            Ok(Box::new(CountingWidget {
                mode,
                counters: c.clone(),
            }))
        }
    }

    pub(crate) fn series(symbol: &str, today: Date, days: i64) -> TickerSeries {
        let records = (0..days)
            .rev()
            .map(|ago| PriceRecord {
                date: (today - Duration::days(ago)).to_string(),
                close: Some(Decimal::from(100 + ago)),
                volume: Some(1_000),
                ..PriceRecord::default()
            })
            .collect();
        TickerSeries::from_records(Ticker::parse(symbol).unwrap(), records).unwrap()
    }

    const TODAY: Date = date!(2024 - 06 - 30);

    fn controller(factory: CountingFactory, mode: DisplayMode, range: TimeRange) -> ModeController {
        ModeController::new(Rc::new(factory), mode, range)
    }

    #[test]
    fn first_load_builds_line_widget() {
        let factory = CountingFactory::new();
        let counters = factory.counters.clone();
        let mut ctrl = controller(factory, DisplayMode::default(), TimeRange::default());
        assert!(!ctrl.is_active());

        let data = series("AAPL", TODAY, 200);
        assert_eq!(ctrl.load(&data, TODAY), ChartOutcome::Updated { points: 91 });
        assert_eq!(counters.built_modes.borrow().as_slice(), &[DisplayMode::Line]);

        // reloading reuses the widget
        assert_eq!(ctrl.load(&data, TODAY), ChartOutcome::Updated { points: 91 });
        assert_eq!(counters.built.get(), 1);
        assert_eq!(counters.live.get(), 1);
    }

    #[test]
    fn mode_switch_keeps_single_widget() {
        let factory = CountingFactory::new();
        let counters = factory.counters.clone();
        let mut ctrl = controller(factory, DisplayMode::Line, TimeRange::new(30));
        let data = series("AAPL", TODAY, 200);
        ctrl.load(&data, TODAY);

        for mode in [
            DisplayMode::Candlestick,
            DisplayMode::Line,
            DisplayMode::Candlestick,
            DisplayMode::Line,
        ] {
            let outcome = ctrl.set_mode(mode, Some(&data), TODAY);
            assert_eq!(outcome, ChartOutcome::Updated { points: 31 });
            assert_eq!(counters.live.get(), 1);
            assert_eq!(ctrl.mode(), mode);
        }
        assert_eq!(counters.built.get(), 5);

        assert_eq!(
            ctrl.set_mode(DisplayMode::Line, Some(&data), TODAY),
            ChartOutcome::Unchanged
        );
        assert_eq!(counters.built.get(), 5);
    }

    #[test]
    fn mode_switch_without_data() {
        let factory = CountingFactory::new();
        let counters = factory.counters.clone();
        let mut ctrl = controller(factory, DisplayMode::Line, TimeRange::default());

        assert_eq!(
            ctrl.set_mode(DisplayMode::Candlestick, None, TODAY),
            ChartOutcome::NoData
        );
        assert_eq!(counters.built.get(), 0);

        ctrl.load(&series("AAPL", TODAY, 10), TODAY);
        assert_eq!(
            counters.built_modes.borrow().as_slice(),
            &[DisplayMode::Candlestick]
        );
    }

    #[test]
    fn range_change_does_not_rebuild() {
        let factory = CountingFactory::new();
        let counters = factory.counters.clone();
        let mut ctrl = controller(factory, DisplayMode::Line, TimeRange::default());
        let data = series("AAPL", TODAY, 400);
        ctrl.load(&data, TODAY);

        assert_eq!(
            ctrl.set_range(TimeRange::new(7), Some(&data), TODAY),
            ChartOutcome::Updated { points: 8 }
        );
        assert_eq!(counters.last_points.get(), 8);
        assert_eq!(counters.built.get(), 1);
        assert_eq!(ctrl.range(), TimeRange::new(7));
    }

    #[test]
    fn empty_range_leaves_previous_drawing() {
        let factory = CountingFactory::new();
        let counters = factory.counters.clone();
        let mut ctrl = controller(factory, DisplayMode::Line, TimeRange::new(30));
        ctrl.load(&series("AAPL", TODAY, 60), TODAY);
        assert_eq!(counters.last_points.get(), 31);

        let stale = series("MSFT", date!(2023 - 01 - 31), 20);
        assert_eq!(ctrl.load(&stale, TODAY), ChartOutcome::EmptyRange);
        assert_eq!(counters.last_points.get(), 31);
        assert!(ctrl.is_active());
    }

    #[test]
    fn unavailable_library_falls_back() {
        let mut factory = CountingFactory::new();
        factory.unavailable = Some(DisplayMode::Candlestick);
        let counters = factory.counters.clone();
        let mut ctrl = controller(factory, DisplayMode::Line, TimeRange::default());
        let data = series("AAPL", TODAY, 30);
        ctrl.load(&data, TODAY);

        assert_eq!(
            ctrl.set_mode(DisplayMode::Candlestick, Some(&data), TODAY),
            ChartOutcome::Fallback
        );
        assert!(matches!(
            ctrl.slot(),
            ChartSlot::Placeholder(p) if p.mode() == DisplayMode::Candlestick
        ));
        assert_eq!(counters.live.get(), 0);

        // range changes still succeed quietly while in fallback
        assert_eq!(
            ctrl.set_range(TimeRange::new(7), Some(&data), TODAY),
            ChartOutcome::Fallback
        );
        assert_eq!(ctrl.range(), TimeRange::new(7));

        // the new widget picks up the 7-day window chosen during fallback
        assert_eq!(
            ctrl.set_mode(DisplayMode::Line, Some(&data), TODAY),
            ChartOutcome::Updated { points: 8 }
        );
        assert_eq!(counters.live.get(), 1);
    }

    #[test]
    fn reset_destroys_widget() {
        let factory = CountingFactory::new();
        let counters = factory.counters.clone();
        let mut ctrl = controller(factory, DisplayMode::Line, TimeRange::default());
        ctrl.load(&series("AAPL", TODAY, 30), TODAY);
        ctrl.reset();
        assert_eq!(counters.live.get(), 0);
        assert!(matches!(ctrl.slot(), ChartSlot::Empty));
    }
}
