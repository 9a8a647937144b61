use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    api::MarketApi,
    data::Ticker,
    events::{AppEvent, Target},
};

/// A search to run against the backend
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub target: Target,
    pub ticker: Ticker,
    pub generation: u64,
    pub include_news: bool,
}

impl FetchRequest {
    /// Number of `AppEvent`s the request produces when the ticker is valid
    pub fn expected_events(&self) -> usize {
        if self.include_news {
            4
        } else {
            3
        }
    }
}

/// Spawns backend requests and reports every completion as an `AppEvent`
#[derive(Clone)]
pub struct Fetcher {
    api: Arc<dyn MarketApi>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl Fetcher {
    pub fn new(api: Arc<dyn MarketApi>, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { api, tx }
    }

    /// Validate first, then fetch price, sentiment and news concurrently
    pub fn dispatch(&self, request: FetchRequest) -> tokio::task::JoinHandle<()> {
        let api = self.api.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let FetchRequest {
                target,
                ticker,
                generation,
                include_news,
            } = request;

            let result = api.validate_ticker(&ticker).await;
            let invalid = matches!(result, Ok(false));
            if tx
                .send(AppEvent::Validation {
                    target,
                    generation,
                    result,
                })
                .is_err()
                || invalid
            {
                return;
            }

            let stock = api.stock_data(&ticker);
            let sentiment = api.stock_sentiment(&ticker);
            let news = include_news.then(|| api.company_news(&ticker));

            let mut tasks = vec![
                tokio::spawn({
                    let tx = tx.clone();
                    async move {
                        let result = stock.await;
                        _ = tx.send(AppEvent::StockData {
                            target,
                            generation,
                            result,
                        });
                    }
                }),
                tokio::spawn({
                    let tx = tx.clone();
                    async move {
                        let result = sentiment.await;
                        _ = tx.send(AppEvent::Sentiment {
                            target,
                            generation,
                            result,
                        });
                    }
                }),
            ];
            if let Some(news) = news {
                tasks.push(tokio::spawn(async move {
                    let result = news.await;
                    _ = tx.send(AppEvent::News {
                        target,
                        generation,
                        result,
                    });
                }));
            }

            for task in tasks {
                if let Err(err) = task.await {
                    tracing::error!(%ticker, error = %err, "fetch task failed");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::MockMarketApi,
        compare::SlotId,
        data::PriceRecord,
        error::ApiError,
        sentiment::SentimentSnapshot,
    };
    use futures::FutureExt;

    fn request(target: Target, include_news: bool) -> FetchRequest {
        FetchRequest {
            target,
            ticker: Ticker::parse("AAPL").unwrap(),
            generation: 7,
            include_news,
        }
    }

    async fn drain(mut rx: mpsc::UnboundedReceiver<AppEvent>) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn valid_ticker_fetches_everything() {
        let mut api = MockMarketApi::new();
        api.expect_validate_ticker()
            .times(1)
            .returning(|_| async { Ok(true) }.boxed());
        api.expect_stock_data().times(1).returning(|_| {
            async {
                Ok(vec![PriceRecord {
                    date: "2024-06-28".into(),
                    ..PriceRecord::default()
                }])
            }
            .boxed()
        });
        api.expect_stock_sentiment()
            .times(1)
            .returning(|_| async { Ok(SentimentSnapshot::default()) }.boxed());
        api.expect_company_news()
            .times(1)
            .returning(|_| async { Ok(vec![]) }.boxed());

        let (tx, rx) = mpsc::unbounded_channel();
        let fetcher = Fetcher::new(Arc::new(api), tx);
        let req = request(Target::Main, true);
        assert_eq!(req.expected_events(), 4);
        fetcher.dispatch(req).await.unwrap();
        drop(fetcher);

        let events = drain(rx).await;
        assert_eq!(events.len(), 4);
        assert!(matches!(
            events[0],
            AppEvent::Validation {
                generation: 7,
                result: Ok(true),
                ..
            }
        ));
        assert!(events.iter().all(|e| e.target() == Target::Main));
        assert!(events
            .iter()
            .any(|e| matches!(e, AppEvent::StockData { result: Ok(rows), .. } if rows.len() == 1)));
    }

    #[tokio::test]
    async fn invalid_ticker_stops_after_validation() {
        let mut api = MockMarketApi::new();
        api.expect_validate_ticker()
            .returning(|_| async { Ok(false) }.boxed());
        api.expect_stock_data().never();
        api.expect_stock_sentiment().never();
        api.expect_company_news().never();

        let (tx, rx) = mpsc::unbounded_channel();
        let fetcher = Fetcher::new(Arc::new(api), tx);
        fetcher.dispatch(request(Target::Main, true)).await.unwrap();
        drop(fetcher);

        let events = drain(rx).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            AppEvent::Validation {
                result: Ok(false),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn validation_failure_still_fetches() {
        let mut api = MockMarketApi::new();
        api.expect_validate_ticker().returning(|_| {
            async {
                Err(ApiError::Status {
                    endpoint: "/api/validate_ticker",
                    status: 502,
                })
            }
            .boxed()
        });
        api.expect_stock_data()
            .returning(|_| async { Ok(vec![]) }.boxed());
        api.expect_stock_sentiment()
            .returning(|_| async { Ok(SentimentSnapshot::default()) }.boxed());
        api.expect_company_news().never();

        let (tx, rx) = mpsc::unbounded_channel();
        let fetcher = Fetcher::new(Arc::new(api), tx);
        let req = request(Target::Slot(SlotId::B), false);
        assert_eq!(req.expected_events(), 3);
        fetcher.dispatch(req).await.unwrap();
        drop(fetcher);

        let events = drain(rx).await;
        assert_eq!(events.len(), 3);
        assert!(events
            .iter()
            .all(|e| e.target() == Target::Slot(SlotId::B)));
        assert!(!events.iter().any(|e| matches!(e, AppEvent::News { .. })));
    }
}
