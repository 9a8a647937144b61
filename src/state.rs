use std::rc::Rc;

use rust_decimal::Decimal;
use time::Date;

use crate::{
    chart::{ChartFactory, ChartOutcome},
    compare::{ComparisonController, SlotId},
    data::{DisplayMode, Ticker, TimeRange},
    events::{AppEvent, EventBus, Notification, Target},
    fetch::FetchRequest,
    news::NewsFeed,
    pane::{PaneUpdate, TickerPane},
    render::DirtyFlags,
    toast::{ToastLevel, Toasts},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Single,
    Compare,
}

#[derive(Clone, Copy, Debug)]
pub struct DashboardSettings {
    pub mode: DisplayMode,
    pub range: TimeRange,
    pub ceiling: Decimal,
}

/// All dashboard state; mutated only through the methods below
pub struct Dashboard {
    view: View,
    mode: DisplayMode,
    range: TimeRange,
    main: TickerPane,
    news: NewsFeed,
    compare: ComparisonController,
    toasts: Toasts,
    bus: EventBus,
}

impl Dashboard {
    pub fn new(factory: Rc<dyn ChartFactory>, settings: DashboardSettings) -> Self {
        let DashboardSettings {
            mode,
            range,
            ceiling,
        } = settings;
        Self {
            view: View::Single,
            mode,
            range,
            compare: ComparisonController::new(&factory, mode, range, ceiling),
            main: TickerPane::new(factory, mode, range, ceiling),
            news: NewsFeed::default(),
            toasts: Toasts::default(),
            bus: EventBus::default(),
        }
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn main(&self) -> &TickerPane {
        &self.main
    }

    pub fn news(&self) -> &NewsFeed {
        &self.news
    }

    pub fn compare(&self) -> &ComparisonController {
        &self.compare
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut Toasts {
        &mut self.toasts
    }

    pub fn pane(&self, target: Target) -> &TickerPane {
        match target {
            Target::Main => &self.main,
            Target::Slot(slot) => self.compare.slot(slot),
        }
    }

    fn pane_mut(&mut self, target: Target) -> &mut TickerPane {
        match target {
            Target::Main => &mut self.main,
            Target::Slot(slot) => self.compare.slot_mut(slot),
        }
    }

    /// Whether anything in the current view is still waiting on the backend
    pub fn is_loading(&self) -> bool {
        match self.view {
            View::Single => self.main.is_loading(),
            View::Compare => self.compare.is_loading(),
        }
    }

    /// Start a search, the returned request must be handed to the fetcher
    pub fn search(&mut self, target: Target, ticker: Ticker) -> FetchRequest {
        let include_news = target == Target::Main;
        let mut request = FetchRequest {
            target,
            ticker: ticker.clone(),
            generation: 0,
            include_news,
        };
        let expected = request.expected_events();
        request.generation = self.pane_mut(target).begin(ticker, expected);

        if include_news {
            self.news.begin();
        }
        if matches!(target, Target::Slot(_)) {
            self.refresh_verdict();
        }
        request
    }

    /// Search again for every ticker shown in the current view
    pub fn refresh(&mut self) -> Vec<FetchRequest> {
        let targets: Vec<Target> = match self.view {
            View::Single => vec![Target::Main],
            View::Compare => vec![Target::Slot(SlotId::A), Target::Slot(SlotId::B)],
        };
        targets
            .into_iter()
            .filter_map(|target| {
                let ticker = self.pane(target).ticker()?.clone();
                Some(self.search(target, ticker))
            })
            .collect()
    }

    pub fn apply(&mut self, event: AppEvent, today: Date) -> DirtyFlags {
        match event {
            AppEvent::Validation {
                target,
                generation,
                result,
            } => {
                let update = self.pane_mut(target).apply_validation(generation, result);
                self.after_update(target, update, "validation")
            }
            AppEvent::StockData {
                target,
                generation,
                result,
            } => {
                let update = self
                    .pane_mut(target)
                    .apply_stock_data(generation, result, today);
                self.after_update(target, update, "stock_data")
            }
            AppEvent::Sentiment {
                target,
                generation,
                result,
            } => {
                let update = self.pane_mut(target).apply_sentiment(generation, result);
                self.after_update(target, update, "sentiment")
            }
            AppEvent::News {
                target,
                generation,
                result,
            } => {
                if target != Target::Main || !self.main.settle(generation) {
                    tracing::debug!(?target, generation, "dropping stale news");
                    return DirtyFlags::NONE;
                }
                if self.main.not_found().is_some() {
                    tracing::debug!(generation, "dropping news for a ticker that was not found");
                    return DirtyFlags::LOADING;
                }
                match result {
                    Ok(articles) => {
                        self.news.replace(articles);
                        self.publish_news();
                        DirtyFlags::NEWS | DirtyFlags::LOADING | DirtyFlags::FOOTER
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "failed to fetch news");
                        self.news.fail(err.to_string());
                        self.fetch_failed(target, "company_news", err.to_string());
                        (DirtyFlags::NEWS | DirtyFlags::LOADING).mark_notice()
                    }
                }
            }
        }
    }

    fn after_update(&mut self, target: Target, update: PaneUpdate, what: &'static str) -> DirtyFlags {
        let ticker = self.pane(target).ticker().cloned();
        let dirty = match update {
            PaneUpdate::Stale => return DirtyFlags::NONE,
            PaneUpdate::Skipped | PaneUpdate::Validated => DirtyFlags::LOADING,
            PaneUpdate::Loaded { points, chart } => {
                if let Some(ticker) = ticker {
                    self.bus.publish(&Notification::DataLoaded {
                        target,
                        ticker,
                        points,
                    });
                }
                self.report_chart(target, chart);
                DirtyFlags::NONE.mark_series_update().mark_notice()
            }
            PaneUpdate::SentimentLoaded => {
                if let Some(ticker) = ticker {
                    self.bus
                        .publish(&Notification::SentimentUpdated { target, ticker });
                }
                DirtyFlags::NONE.mark_sentiment_update()
            }
            PaneUpdate::NotFound(reason) => {
                if let Some(ticker) = ticker {
                    self.bus.publish(&Notification::TickerNotFound {
                        target,
                        ticker,
                        reason,
                    });
                }
                if target == Target::Main {
                    self.news.begin();
                }
                DirtyFlags::ALL
            }
            PaneUpdate::Failed(message) => {
                self.fetch_failed(target, what, message);
                DirtyFlags::NONE
                    .mark_series_update()
                    .mark_sentiment_update()
                    .mark_notice()
            }
        };

        if matches!(target, Target::Slot(_)) {
            self.refresh_verdict();
        }
        dirty
    }

    fn refresh_verdict(&mut self) {
        if self.compare.refresh_verdict() {
            self.bus
                .publish(&Notification::VerdictChanged(self.compare.verdict()));
        }
    }

    fn fetch_failed(&mut self, target: Target, what: &'static str, message: String) {
        self.toasts.push(
            ToastLevel::Error,
            t!("Toast.FetchFailed", what = what, message = message),
        );
        self.bus.publish(&Notification::FetchFailed {
            target,
            what,
            message,
        });
    }

    fn publish_news(&mut self) {
        let shown = self.news.visible().count();
        let total = self.news.total();
        self.bus
            .publish(&Notification::NewsDisplayed { shown, total });
    }

    fn report_chart(&mut self, target: Target, outcome: ChartOutcome) {
        match outcome {
            ChartOutcome::Updated { points } => {
                if let Some(ticker) = self.pane(target).ticker().cloned() {
                    self.bus.publish(&Notification::ChartUpdated {
                        target,
                        ticker,
                        days: self.range.days(),
                        points,
                    });
                }
            }
            ChartOutcome::EmptyRange => {
                let days = self.range.days();
                self.toasts
                    .push(ToastLevel::Warning, t!("Toast.EmptyRange", days = days));
                self.bus.publish(&Notification::EmptyRange { target, days });
            }
            ChartOutcome::Fallback => {
                self.bus.publish(&Notification::ChartUnavailable { target });
            }
            ChartOutcome::Unchanged | ChartOutcome::NoData => {}
        }
    }

    fn targets() -> [Target; 3] {
        [
            Target::Main,
            Target::Slot(SlotId::A),
            Target::Slot(SlotId::B),
        ]
    }

    /// Switch every pane to `mode`
    pub fn set_mode(&mut self, mode: DisplayMode, today: Date) -> DirtyFlags {
        if mode == self.mode {
            return DirtyFlags::NONE;
        }
        self.mode = mode;
        for target in Self::targets() {
            let outcome = self.pane_mut(target).set_mode(mode, today);
            self.report_chart(target, outcome);
        }
        DirtyFlags::CHART | DirtyFlags::COMPARE | DirtyFlags::HEADER | DirtyFlags::TOAST
    }

    /// Re-filter every pane to `range`
    pub fn set_range(&mut self, range: TimeRange, today: Date) -> DirtyFlags {
        self.range = range;
        for target in Self::targets() {
            let outcome = self.pane_mut(target).set_range(range, today);
            self.report_chart(target, outcome);
        }
        DirtyFlags::CHART | DirtyFlags::COMPARE | DirtyFlags::TOAST | DirtyFlags::FOOTER
    }

    pub fn cycle_news_filter(&mut self) -> DirtyFlags {
        let filter = self.news.cycle_filter();
        tracing::debug!(?filter, "news filter changed");
        self.publish_news();
        DirtyFlags::NEWS | DirtyFlags::FOOTER
    }

    pub fn toggle_view(&mut self) -> DirtyFlags {
        self.view = match self.view {
            View::Single => View::Compare,
            View::Compare => View::Single,
        };
        DirtyFlags::ALL
    }

    pub fn show_view(&mut self, view: View) -> DirtyFlags {
        if self.view == view {
            return DirtyFlags::NONE;
        }
        self.view = view;
        DirtyFlags::ALL
    }
}
