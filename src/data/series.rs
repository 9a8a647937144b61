use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::{macros::format_description, Date};

use super::{PricePoint, Ticker};
use crate::error::DataError;

/// Daily record as returned by `/api/stock_data`
///
/// Every field is optional on the wire; numbers may arrive as JSON numbers or strings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub open: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub high: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub low: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub close: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_volume")]
    pub volume: Option<u64>,
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_value))
}

fn lenient_volume<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(decimal_from_value)
        .filter(|v| !v.is_sign_negative())
        .and_then(|v| u64::try_from(v.trunc()).ok()))
}

/// Accepts `2024-03-01` as well as timestamps that start with a date
fn parse_date(raw: &str) -> Option<Date> {
    let day = raw.trim().get(..10)?;
    Date::parse(day, format_description!("[year]-[month]-[day]")).ok()
}

/// Cached price history for one ticker, ordered by date without duplicates
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickerSeries {
    symbol: Ticker,
    points: Vec<PricePoint>,
}

impl TickerSeries {
    /// Build a series from wire records
    ///
    /// Records are sorted by date and the later of two records for the same day wins.
    /// Undated records and records without a close are dropped, except that a bad close on
    /// the newest day fails the whole series: that value drives the info panel.
    pub fn from_records(symbol: Ticker, records: Vec<PriceRecord>) -> Result<Self, DataError> {
        let mut dated: Vec<(Date, PriceRecord)> = Vec::with_capacity(records.len());
        for record in records {
            match parse_date(&record.date) {
                Some(date) => dated.push((date, record)),
                None => {
                    tracing::warn!(ticker = %symbol, date = %record.date, "dropping record with invalid date");
                }
            }
        }
        // stable sort keeps arrival order for equal dates
        dated.sort_by_key(|(date, _)| *date);

        let mut unique: Vec<(Date, PriceRecord)> = Vec::with_capacity(dated.len());
        for (date, record) in dated {
            match unique.last_mut() {
                Some(last) if last.0 == date => *last = (date, record),
                _ => unique.push((date, record)),
            }
        }

        if let Some((date, record)) = unique.last() {
            if record.close.is_none() {
                return Err(DataError::MalformedClose {
                    symbol: symbol.to_string(),
                    date: *date,
                });
            }
        }

        let points: Vec<PricePoint> = unique
            .into_iter()
            .filter_map(|(date, record)| {
                let Some(close) = record.close else {
                    tracing::warn!(ticker = %symbol, %date, "dropping record without close");
                    return None;
                };
                Some(PricePoint {
                    date,
                    open: record.open.unwrap_or(close),
                    high: record.high.unwrap_or(close),
                    low: record.low.unwrap_or(close),
                    close,
                    volume: record.volume.unwrap_or_default(),
                })
            })
            .collect();

        if points.is_empty() {
            return Err(DataError::EmptySeries {
                symbol: symbol.to_string(),
            });
        }

        Ok(Self { symbol, points })
    }

    pub fn symbol(&self) -> &Ticker {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The point before the latest one
    pub fn previous(&self) -> Option<&PricePoint> {
        self.points.len().checked_sub(2).map(|idx| &self.points[idx])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::date;

    fn ticker() -> Ticker {
        Ticker::parse("AAPL").unwrap()
    }

    fn record(date: &str, close: Option<Decimal>) -> PriceRecord {
        PriceRecord {
            date: date.to_string(),
            close,
            ..PriceRecord::default()
        }
    }

    #[test]
    fn decode_lenient_fields() {
        let json = r#"[
            {"date": "2024-03-01", "open": 1.5, "high": "2.25", "low": null, "close": 2, "volume": 1200},
            {"date": "2024-03-02T00:00:00", "close": "oops", "volume": "3.4e3"},
            {"close": 5}
        ]"#;
        let records: Vec<PriceRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].open, Some(dec!(1.5)));
        assert_eq!(records[0].high, Some(dec!(2.25)));
        assert_eq!(records[0].low, None);
        assert_eq!(records[0].close, Some(dec!(2)));
        assert_eq!(records[0].volume, Some(1200));
        assert_eq!(records[1].close, None);
        assert_eq!(records[1].volume, Some(3400));
        assert_eq!(records[2].date, "");
    }

    #[test]
    fn sorts_and_dedups() {
        let series = TickerSeries::from_records(
            ticker(),
            vec![
                record("2024-03-03", Some(dec!(3))),
                record("2024-03-01", Some(dec!(1))),
                record("2024-03-02", Some(dec!(2))),
                record("2024-03-01", Some(dec!(11))),
            ],
        )
        .unwrap();

        let dates: Vec<Date> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![date!(2024 - 03 - 01), date!(2024 - 03 - 02), date!(2024 - 03 - 03)]
        );
        assert_eq!(series.points()[0].close, dec!(11));
        assert_eq!(series.latest().unwrap().close, dec!(3));
        assert_eq!(series.previous().unwrap().close, dec!(2));
    }

    #[test]
    fn drops_bad_records() {
        let series = TickerSeries::from_records(
            ticker(),
            vec![
                record("not a date", Some(dec!(9))),
                record("2024-03-01", None),
                record("2024-03-02", Some(dec!(2))),
            ],
        )
        .unwrap();
        assert_eq!(series.len(), 1);
        let point = series.latest().unwrap();
        assert_eq!(point.open, dec!(2));
        assert_eq!(point.volume, 0);
        assert!(series.previous().is_none());
    }

    #[test]
    fn malformed_latest_close() {
        let err = TickerSeries::from_records(
            ticker(),
            vec![record("2024-03-01", Some(dec!(1))), record("2024-03-02", None)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            DataError::MalformedClose {
                symbol: "AAPL".to_string(),
                date: date!(2024 - 03 - 02),
            }
        );
    }

    #[test]
    fn empty_series() {
        let err = TickerSeries::from_records(ticker(), vec![]).unwrap_err();
        assert!(matches!(err, DataError::EmptySeries { .. }));

        let err = TickerSeries::from_records(ticker(), vec![record("bad", Some(dec!(1)))])
            .unwrap_err();
        assert!(matches!(err, DataError::EmptySeries { .. }));
    }
}
