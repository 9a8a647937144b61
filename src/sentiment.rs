use rust_decimal::{prelude::FromPrimitive, Decimal};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Response of `/api/stock_sentiment`, every score is a 0-1 fraction
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    #[serde(default)]
    pub buzz: f64,
    #[serde(default)]
    pub sentiment_score: f64,
    #[serde(default)]
    pub sector_sentiment: f64,
}

fn percent(fraction: f64) -> Decimal {
    if !fraction.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(fraction)
        .and_then(|value| value.checked_mul(dec!(100)))
        .map(|value| value.round_dp(4))
        .unwrap_or_default()
}

impl SentimentSnapshot {
    /// Bullish share in percent, used for scoring and the gauge
    pub fn bullish_percent(&self) -> Decimal {
        percent(self.sentiment_score)
    }

    pub fn sector_percent(&self) -> Decimal {
        percent(self.sector_sentiment)
    }

    pub fn buzz_percent(&self) -> Decimal {
        percent(self.buzz)
    }

    pub fn bucket(&self) -> SentimentBucket {
        SentimentBucket::classify(self.bullish_percent())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SentimentBucket {
    Positive,
    Neutral,
    Negative,
}

impl SentimentBucket {
    pub fn classify(percent: Decimal) -> Self {
        if percent > dec!(60) {
            Self::Positive
        } else if percent > dec!(40) {
            Self::Neutral
        } else {
            Self::Negative
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::Positive => t!("Sentiment.Positive"),
            Self::Neutral => t!("Sentiment.Neutral"),
            Self::Negative => t!("Sentiment.Negative"),
        }
    }
}

/// Whole percent for display, e.g. `70%`
pub fn display_percent(value: Decimal) -> String {
    format!("{}%", value.round())
}
