mod http;

pub use http::{endpoint_url, HttpMarketApi};

use futures::future::BoxFuture;

use crate::{
    data::{PriceRecord, Ticker},
    error::ApiError,
    news::NewsArticle,
    sentiment::SentimentSnapshot,
};

/// The four read-only endpoints of the stock backend
#[cfg_attr(test, mockall::automock)]
pub trait MarketApi: Send + Sync {
    fn stock_data(&self, ticker: &Ticker) -> BoxFuture<'static, Result<Vec<PriceRecord>, ApiError>>;

    fn company_news(&self, ticker: &Ticker)
        -> BoxFuture<'static, Result<Vec<NewsArticle>, ApiError>>;

    fn stock_sentiment(&self, ticker: &Ticker)
        -> BoxFuture<'static, Result<SentimentSnapshot, ApiError>>;

    fn validate_ticker(&self, ticker: &Ticker) -> BoxFuture<'static, Result<bool, ApiError>>;
}
