use crate::{
    compare::{SlotId, Verdict},
    data::{PriceRecord, Ticker},
    error::ApiError,
    news::NewsArticle,
    pane::NotFoundReason,
    sentiment::SentimentSnapshot,
};

/// Which pane a request belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Main,
    Slot(SlotId),
}

/// Completion of a backend request, tagged with the search generation that issued it
#[derive(Debug)]
pub enum AppEvent {
    Validation {
        target: Target,
        generation: u64,
        result: Result<bool, ApiError>,
    },
    StockData {
        target: Target,
        generation: u64,
        result: Result<Vec<PriceRecord>, ApiError>,
    },
    Sentiment {
        target: Target,
        generation: u64,
        result: Result<SentimentSnapshot, ApiError>,
    },
    News {
        target: Target,
        generation: u64,
        result: Result<Vec<NewsArticle>, ApiError>,
    },
}

impl AppEvent {
    pub fn target(&self) -> Target {
        match self {
            Self::Validation { target, .. }
            | Self::StockData { target, .. }
            | Self::Sentiment { target, .. }
            | Self::News { target, .. } => *target,
        }
    }
}

/// Things other parts of the app may want to react to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    DataLoaded {
        target: Target,
        ticker: Ticker,
        points: usize,
    },
    ChartUpdated {
        target: Target,
        ticker: Ticker,
        days: u32,
        points: usize,
    },
    NewsDisplayed {
        shown: usize,
        total: usize,
    },
    SentimentUpdated {
        target: Target,
        ticker: Ticker,
    },
    TickerNotFound {
        target: Target,
        ticker: Ticker,
        reason: NotFoundReason,
    },
    FetchFailed {
        target: Target,
        what: &'static str,
        message: String,
    },
    EmptyRange {
        target: Target,
        days: u32,
    },
    ChartUnavailable {
        target: Target,
    },
    VerdictChanged(Option<Verdict>),
}

pub type SubscriptionId = usize;

type Subscriber = Box<dyn FnMut(&Notification)>;

/// App-scoped publish/subscribe for notifications
#[derive(Default)]
pub struct EventBus {
    next_id: SubscriptionId,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl EventBus {
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Notification) + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn publish(&mut self, notification: &Notification) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(notification);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

/// Subscriber that writes every notification to the log
pub fn log_notification(notification: &Notification) {
    match notification {
        Notification::FetchFailed {
            target,
            what,
            message,
        } => tracing::warn!(?target, what, message, "fetch failed"),
        Notification::TickerNotFound {
            target,
            ticker,
            reason,
        } => tracing::info!(?target, %ticker, ?reason, "ticker not found"),
        other => tracing::debug!(notification = ?other, "notification"),
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[test]
    fn publish_reaches_subscribers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::default();

        let sink = seen.clone();
        bus.subscribe(move |n| sink.borrow_mut().push(("first", n.clone())));
        let sink = seen.clone();
        bus.subscribe(move |n| sink.borrow_mut().push(("second", n.clone())));
        assert_eq!(bus.len(), 2);

        let shown = Notification::NewsDisplayed { shown: 2, total: 5 };
        bus.publish(&shown);
        assert_eq!(seen.borrow().len(), 2);

        let seen = seen.borrow();
        assert_eq!(seen[0], ("first", shown.clone()));
        assert_eq!(seen[1], ("second", shown));
    }
}
