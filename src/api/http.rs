use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use serde::{de::DeserializeOwned, Deserialize};

use super::MarketApi;
use crate::{
    data::{PriceRecord, Ticker},
    error::ApiError,
    news::NewsArticle,
    sentiment::SentimentSnapshot,
};

const STOCK_DATA: &str = "/api/stock_data";
const COMPANY_NEWS: &str = "/api/company_news";
const STOCK_SENTIMENT: &str = "/api/stock_sentiment";
const VALIDATE_TICKER: &str = "/api/validate_ticker";

#[derive(Deserialize)]
struct Validation {
    #[serde(default)]
    valid: bool,
}

/// Join the configured base URL and an endpoint path
pub fn endpoint_url(base: &str, endpoint: &str) -> String {
    format!("{}{endpoint}", base.trim().trim_end_matches('/'))
}

/// `MarketApi` over HTTP+JSON
#[derive(Clone)]
pub struct HttpMarketApi {
    client: reqwest::Client,
    base: String,
}

impl HttpMarketApi {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tickerdash/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base: base.to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn get<T>(&self, endpoint: &'static str, ticker: &Ticker) -> BoxFuture<'static, Result<T, ApiError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let request = self
            .client
            .get(endpoint_url(&self.base, endpoint))
            .query(&[("ticker", ticker.as_str())]);
        let ticker = ticker.clone();

        Box::pin(async move {
            let started = Instant::now();
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                tracing::warn!(endpoint, %ticker, %status, "backend returned an error");
                return Err(ApiError::Status {
                    endpoint,
                    status: status.as_u16(),
                });
            }
            let body = response.bytes().await?;
            tracing::debug!(
                endpoint,
                %ticker,
                bytes = body.len(),
                elapsed_ms = started.elapsed().as_millis(),
                "backend request finished"
            );
            serde_json::from_slice(&body).map_err(|source| ApiError::Decode { endpoint, source })
        })
    }
}

impl MarketApi for HttpMarketApi {
    fn stock_data(&self, ticker: &Ticker) -> BoxFuture<'static, Result<Vec<PriceRecord>, ApiError>> {
        self.get(STOCK_DATA, ticker)
    }

    fn company_news(
        &self,
        ticker: &Ticker,
    ) -> BoxFuture<'static, Result<Vec<NewsArticle>, ApiError>> {
        self.get(COMPANY_NEWS, ticker)
    }

    fn stock_sentiment(
        &self,
        ticker: &Ticker,
    ) -> BoxFuture<'static, Result<SentimentSnapshot, ApiError>> {
        self.get(STOCK_SENTIMENT, ticker)
    }

    fn validate_ticker(&self, ticker: &Ticker) -> BoxFuture<'static, Result<bool, ApiError>> {
        let validation = self.get::<Validation>(VALIDATE_TICKER, ticker);
        Box::pin(async move { validation.await.map(|v| v.valid) })
    }
}
