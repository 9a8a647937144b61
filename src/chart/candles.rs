use itertools::{Itertools, MinMaxResult};
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

use crate::data::PricePoint;

/// Columns reserved on the right for the price and volume labels
const LABEL_WIDTH: u16 = 10;

const BODY: &str = "┃";
const WICK: &str = "│";
const VOLUME: &str = "█";

/// One OHLC bar, volume in millions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn is_bull(&self) -> bool {
        self.close >= self.open
    }
}

/// Convert points into candles, skipping bars that don't form a valid candle
pub fn to_candles(points: &[PricePoint]) -> Vec<Candle> {
    points
        .iter()
        .filter_map(|point| {
            let open = f64::try_from(point.open).ok()?;
            let high = f64::try_from(point.high).ok()?;
            let low = f64::try_from(point.low).ok()?;
            let close = f64::try_from(point.close).ok()?;

            if open <= 0.0 || high <= 0.0 || low <= 0.0 || close <= 0.0 {
                return None;
            }
            if high < low || high < open || high < close || low > open || low > close {
                return None;
            }

            #[allow(clippy::cast_precision_loss)]
            let volume = point.volume as f64 / 1_000_000.0;

            Some(Candle {
                open,
                high,
                low,
                close,
                volume,
            })
        })
        .collect()
}

/// Maps prices onto the rows of the price pane
struct Scale {
    top: u16,
    rows: u16,
    low: f64,
    high: f64,
}

impl Scale {
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn row(&self, price: f64) -> u16 {
        let last = f64::from(self.rows.saturating_sub(1));
        let offset = ((self.high - price) / (self.high - self.low) * last).round();
        self.top + offset.clamp(0.0, last) as u16
    }
}

/// Draws candles one column each, newest on the right, with a volume pane below
pub struct CandleBars<'a> {
    candles: &'a [Candle],
    bull: Style,
    bear: Style,
    labels: Style,
}

impl<'a> CandleBars<'a> {
    pub fn new(candles: &'a [Candle], bull: Style, bear: Style, labels: Style) -> Self {
        Self {
            candles,
            bull,
            bear,
            labels,
        }
    }
}

impl Widget for CandleBars<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let plot_width = area.width.saturating_sub(LABEL_WIDTH);
        let volume_rows = area.height / 5;
        let price_rows = area.height - volume_rows;
        if plot_width == 0 || price_rows < 2 {
            return;
        }

        let skip = self.candles.len().saturating_sub(usize::from(plot_width));
        let visible = &self.candles[skip..];

        let (low, high) = match visible
            .iter()
            .flat_map(|c| [c.low, c.high])
            .minmax_by(f64::total_cmp)
        {
            MinMaxResult::NoElements => return,
            MinMaxResult::OneElement(p) => (p - 1.0, p + 1.0),
            MinMaxResult::MinMax(low, high) if high - low < f64::EPSILON => {
                (low - 1.0, high + 1.0)
            }
            MinMaxResult::MinMax(low, high) => (low, high),
        };
        let scale = Scale {
            top: area.y,
            rows: price_rows,
            low,
            high,
        };
        let max_volume = visible.iter().map(|c| c.volume).fold(0.0, f64::max);
        let volume_bottom = area.bottom().saturating_sub(1);

        for (x, candle) in (area.x..).zip(visible) {
            let style = if candle.is_bull() { self.bull } else { self.bear };

            for y in scale.row(candle.high)..=scale.row(candle.low) {
                buf.get_mut(x, y).set_symbol(WICK).set_style(style);
            }
            let (open, close) = (scale.row(candle.open), scale.row(candle.close));
            for y in open.min(close)..=open.max(close) {
                buf.get_mut(x, y).set_symbol(BODY).set_style(style);
            }

            if volume_rows == 0 || max_volume <= 0.0 {
                continue;
            }
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            let height = (candle.volume / max_volume * f64::from(volume_rows))
                .ceil()
                .clamp(0.0, f64::from(volume_rows)) as u16;
            for y in (0..height).map(|row| volume_bottom - row) {
                buf.get_mut(x, y).set_symbol(VOLUME).set_style(style);
            }
        }

        let label_x = area.x + plot_width + 1;
        let room = usize::from(LABEL_WIDTH - 1);
        buf.set_stringn(label_x, area.y, format!("{high:.2}"), room, self.labels);
        buf.set_stringn(
            label_x,
            area.y + price_rows - 1,
            format!("{low:.2}"),
            room,
            self.labels,
        );
        if volume_rows > 0 {
            buf.set_stringn(
                label_x,
                area.y + price_rows,
                format!("{max_volume:.1}M"),
                room,
                self.labels,
            );
        }
    }
}
