use std::cmp::Ordering;

use itertools::{Itertools, MinMaxResult};
use ratatui::{
    layout::{Alignment, Rect},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use time::Date;

use super::candles::{to_candles, CandleBars};
use crate::{
    config::ChartModes,
    data::{DisplayMode, PricePoint},
    error::ChartError,
    ui::styles,
};

/// A live chart instance bound to the chart area
pub trait ChartWidget {
    fn mode(&self) -> DisplayMode;

    /// Replace the plotted points, `points` is already filtered to the active range
    fn set_series(&mut self, points: &[PricePoint]);

    fn render(&self, frame: &mut Frame, area: Rect);

    /// Release the instance, called before another widget takes the chart area
    fn destroy(self: Box<Self>) {
        tracing::trace!(mode = ?self.mode(), "chart widget destroyed");
    }
}

pub trait ChartFactory {
    fn build(&self, mode: DisplayMode) -> Result<Box<dyn ChartWidget>, ChartError>;
}

/// Builds the terminal renderers, honouring the modes enabled in config
pub struct TerminalChartFactory {
    modes: ChartModes,
}

impl TerminalChartFactory {
    pub fn new(modes: ChartModes) -> Self {
        Self { modes }
    }
}

impl ChartFactory for TerminalChartFactory {
    fn build(&self, mode: DisplayMode) -> Result<Box<dyn ChartWidget>, ChartError> {
        if !self.modes.allows(mode) {
            return Err(ChartError::Unavailable(mode));
        }
        tracing::trace!(?mode, "chart widget built");
        Ok(match mode {
            DisplayMode::Line => Box::<LineChart>::default(),
            DisplayMode::Candlestick => Box::<CandleChart>::default(),
        })
    }
}

/// Smallest area the candle renderer can lay out axes and bars in
const MIN_CANDLE_AREA: (u16, u16) = (20, 8);

pub fn check_candle_area(area: Rect) -> Result<(), ChartError> {
    if area.width < MIN_CANDLE_AREA.0 || area.height < MIN_CANDLE_AREA.1 {
        return Err(ChartError::TooSmall {
            width: area.width,
            height: area.height,
        });
    }
    Ok(())
}

fn no_points(frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Paragraph::new(t!("Chart.NoPoints"))
            .style(styles::dark_gray())
            .alignment(Alignment::Center),
        area,
    );
}

/// Closing prices as a braille line
pub struct LineChart {
    data: Vec<(f64, f64)>,
    dates: Option<(Date, Date)>,
    y_bounds: [f64; 2],
    trend: Ordering,
}

impl Default for LineChart {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            dates: None,
            y_bounds: [0.0, 1.0],
            trend: Ordering::Equal,
        }
    }
}

impl LineChart {
    pub fn y_bounds(&self) -> [f64; 2] {
        self.y_bounds
    }

    pub fn trend(&self) -> Ordering {
        self.trend
    }
}

impl ChartWidget for LineChart {
    fn mode(&self) -> DisplayMode {
        DisplayMode::Line
    }

    fn set_series(&mut self, points: &[PricePoint]) {
        #[allow(clippy::cast_precision_loss)]
        let data: Vec<(f64, f64)> = points
            .iter()
            .enumerate()
            .filter_map(|(idx, point)| Some((idx as f64, f64::try_from(point.close).ok()?)))
            .collect();

        self.y_bounds = match data.iter().map(|(_, close)| *close).minmax() {
            MinMaxResult::NoElements => [0.0, 1.0],
            MinMaxResult::OneElement(close) => [close - 1.0, close + 1.0],
            MinMaxResult::MinMax(low, high) => {
                let pad = ((high - low) * 0.05).max(0.01);
                [low - pad, high + pad]
            }
        };
        self.dates = points.first().zip(points.last()).map(|(a, b)| (a.date, b.date));
        self.trend = match (points.first(), points.last()) {
            (Some(first), Some(last)) => last.close.cmp(&first.close),
            _ => Ordering::Equal,
        };
        self.data = data;
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if self.data.is_empty() {
            no_points(frame, area);
            return;
        }

        let dataset = Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(styles::up(self.trend))
            .data(&self.data);

        let x_labels = self
            .dates
            .map(|(first, last)| {
                vec![
                    Span::styled(first.to_string(), styles::dark_gray()),
                    Span::styled(last.to_string(), styles::dark_gray()),
                ]
            })
            .unwrap_or_default();
        let [low, high] = self.y_bounds;
        let y_labels = vec![
            Span::styled(format!("{low:.2}"), styles::dark_gray()),
            Span::styled(format!("{:.2}", (low + high) / 2.0), styles::dark_gray()),
            Span::styled(format!("{high:.2}"), styles::dark_gray()),
        ];

        #[allow(clippy::cast_precision_loss)]
        let x_max = (self.data.len().saturating_sub(1)).max(1) as f64;
        let chart = Chart::new(vec![dataset])
            .x_axis(
                Axis::default()
                    .style(styles::border())
                    .bounds([0.0, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(styles::border())
                    .bounds(self.y_bounds)
                    .labels(y_labels),
            );
        frame.render_widget(chart, area);
    }
}

/// OHLC candles with a volume pane
#[derive(Default)]
pub struct CandleChart {
    points: Vec<PricePoint>,
}

impl ChartWidget for CandleChart {
    fn mode(&self) -> DisplayMode {
        DisplayMode::Candlestick
    }

    fn set_series(&mut self, points: &[PricePoint]) {
        self.points = points.to_vec();
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let candles = to_candles(&self.points);
        if candles.is_empty() {
            no_points(frame, area);
            return;
        }
        if let Err(err) = check_candle_area(area) {
            tracing::trace!(%err, "skipping candle render");
            frame.render_widget(
                Paragraph::new(t!("Chart.TooSmall"))
                    .style(styles::dark_gray())
                    .alignment(Alignment::Center),
                area,
            );
            return;
        }

        let (bull, bear) = styles::bull_bear();
        frame.render_widget(
            CandleBars::new(&candles, bull, bear, styles::dark_gray()),
            area,
        );
    }
}

/// Static stand-in drawn when no chart widget could be built
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placeholder {
    mode: DisplayMode,
}

impl Placeholder {
    pub fn unavailable(mode: DisplayMode) -> Self {
        Self { mode }
    }

    pub fn mode(self) -> DisplayMode {
        self.mode
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let top = area.height.saturating_sub(4) / 2;
        let mut lines: Vec<Line> = (0..top).map(|_| Line::default()).collect();
        lines.push(Line::from("📈"));
        lines.push(Line::from(Span::styled(
            t!("Chart.Placeholder.Title"),
            styles::title(),
        )));
        lines.push(Line::from(Span::styled(
            t!("Chart.Placeholder.Unavailable", mode = self.mode.label()),
            styles::dark_gray(),
        )));
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::NONE)),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::macros::date;

    #[test]
    fn candle_area_minimum() {
        assert!(check_candle_area(Rect::new(0, 0, 80, 20)).is_ok());
        assert_eq!(
            check_candle_area(Rect::new(0, 0, 19, 20)),
            Err(ChartError::TooSmall {
                width: 19,
                height: 20
            })
        );
    }

    fn point(date: Date, open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> PricePoint {
        PricePoint {
            date,
            open,
            high,
            low,
            close,
            volume: 2_000_000,
        }
    }

    #[test]
    fn factory_respects_config() {
        let factory = TerminalChartFactory::new(ChartModes::parse("line"));
        assert_eq!(
            factory.build(DisplayMode::Line).unwrap().mode(),
            DisplayMode::Line
        );
        assert_eq!(
            factory.build(DisplayMode::Candlestick).err(),
            Some(ChartError::Unavailable(DisplayMode::Candlestick))
        );
    }

    #[test]
    fn line_chart_bounds_and_trend() {
        let mut chart = LineChart::default();
        chart.set_series(&[
            point(date!(2024 - 01 - 01), dec!(1), dec!(1), dec!(1), dec!(100)),
            point(date!(2024 - 01 - 02), dec!(1), dec!(1), dec!(1), dec!(120)),
            point(date!(2024 - 01 - 03), dec!(1), dec!(1), dec!(1), dec!(90)),
        ]);
        let [low, high] = chart.y_bounds();
        assert!(low < 90.0 && low > 88.0);
        assert!(high > 120.0 && high < 122.0);
        assert_eq!(chart.trend(), Ordering::Less);

        chart.set_series(&[]);
        assert_eq!(chart.y_bounds(), [0.0, 1.0]);
        assert_eq!(chart.trend(), Ordering::Equal);
    }
}
