use std::cmp::Ordering;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Tabs},
    Frame,
};
use rust_decimal::Decimal;
use strum::IntoEnumIterator;

use crate::{
    data::{DisplayMode, TimeRange},
    helper::{format_volume, DecimalExt},
    news::{FeedStatus, NewsFeed},
    panel::{CorruptReason, PanelState, Trend},
    pane::TickerPane,
    sentiment::{display_percent, SentimentBucket},
    state::Dashboard,
    ui::{styles, text},
};

pub fn render(frame: &mut Frame, rect: Rect, dashboard: &Dashboard) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(10),
        ])
        .split(rect);

    info_panel(frame, rows[0], dashboard.main());
    chart_tabs(frame, rows[1], dashboard.mode(), dashboard.range());
    dashboard.main().chart().render(frame, rows[2]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[3]);
    news(frame, bottom[0], dashboard.news());
    sentiment(frame, bottom[1], dashboard.main());
}

fn trend_style(trend: Trend) -> ratatui::style::Style {
    styles::up(match trend {
        Trend::Positive => Ordering::Greater,
        Trend::Negative => Ordering::Less,
    })
}

fn or_placeholder(value: Option<Decimal>) -> String {
    value.map_or_else(|| text::EMPTY_PLACEHOLDER.to_string(), |v| v.format_price())
}

/// Price, change and key metrics for one pane
pub(super) fn info_panel(frame: &mut Frame, rect: Rect, pane: &TickerPane) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .title(Span::styled(format!(" {} ", t!("Info.Title")), styles::title()));

    let lines: Vec<Line> = match (pane.ticker(), pane.panel().state()) {
        (None, _) => vec![Line::from(Span::styled(
            t!("Info.Empty"),
            styles::dark_gray(),
        ))],
        (Some(_), PanelState::Ready(metrics)) => {
            let change = metrics.change.map_or_else(
                || Span::styled(t!("Info.NotAvailable"), styles::dark_gray()),
                |change| Span::styled(change.display(), trend_style(change.trend())),
            );
            let avg_volume = metrics
                .avg_volume
                .map_or_else(|| text::EMPTY_PLACEHOLDER.to_string(), format_volume);
            vec![
                Line::from(vec![
                    Span::styled(metrics.ticker.to_string(), styles::title()),
                    Span::raw("  "),
                    Span::styled(metrics.company.clone(), styles::label()),
                    Span::styled(
                        format!("  {}", t!("Info.AsOf", date = metrics.as_of)),
                        styles::dark_gray(),
                    ),
                ]),
                Line::from(vec![
                    Span::styled(metrics.price_display(), styles::title()),
                    Span::raw("  "),
                    change,
                ]),
                Line::from(vec![
                    Span::styled(format!("{}: ", t!("Info.High52w")), styles::label()),
                    Span::styled(or_placeholder(metrics.high_52w), styles::text()),
                    Span::styled(format!("  {}: ", t!("Info.Low52w")), styles::label()),
                    Span::styled(or_placeholder(metrics.low_52w), styles::text()),
                    Span::styled(format!("  {}: ", t!("Info.Volume")), styles::label()),
                    Span::styled(format_volume(metrics.volume), styles::text()),
                    Span::styled(format!("  {}: ", t!("Info.AvgVolume")), styles::label()),
                    Span::styled(avg_volume, styles::text()),
                ]),
            ]
        }
        (Some(_), PanelState::Corrupt { ticker, reason }) => {
            let why = match reason {
                CorruptReason::AboveCeiling => t!("Info.Corrupt.AboveCeiling"),
                CorruptReason::NotPositive => t!("Info.Corrupt.NotPositive"),
            };
            vec![
                Line::from(Span::styled(ticker.to_string(), styles::title())),
                Line::from(Span::styled(t!("Info.NotAvailable"), styles::title())),
                Line::from(Span::styled(why, styles::warning())),
            ]
        }
        (Some(ticker), PanelState::Empty) => {
            let status = if pane.is_loading() {
                Span::styled(t!("Loading"), styles::dark_gray())
            } else {
                Span::styled(t!("Info.NotAvailable"), styles::title())
            };
            vec![
                Line::from(Span::styled(ticker.to_string(), styles::title())),
                Line::from(status),
            ]
        }
    };

    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

/// Mode tabs on the left, range presets on the right
pub(super) fn chart_tabs(frame: &mut Frame, rect: Rect, mode: DisplayMode, range: TimeRange) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rect);

    let modes: Vec<Line> = DisplayMode::iter()
        .zip(['l', 'c'])
        .map(|(mode, key)| Line::from(format!(" {} [{key}] ", mode.label())))
        .collect();
    let selected = DisplayMode::iter().position(|m| m == mode).unwrap_or(0);
    frame.render_widget(
        Tabs::new(modes)
            .style(styles::text())
            .highlight_style(styles::text_selected())
            .divider("|")
            .select(selected),
        halves[0],
    );

    let mut presets: Vec<Line> = TimeRange::PRESETS
        .iter()
        .enumerate()
        .map(|(idx, preset)| Line::from(format!(" {} [{}] ", preset.label(), idx + 1)))
        .collect();
    let selected = range.preset_index().unwrap_or_else(|| {
        presets.push(Line::from(format!(" {} ", range.label())));
        presets.len() - 1
    });
    frame.render_widget(
        Tabs::new(presets)
            .style(styles::dark_gray())
            .highlight_style(styles::text_selected())
            .divider("|")
            .select(selected),
        halves[1],
    );
}

fn news(frame: &mut Frame, rect: Rect, feed: &NewsFeed) {
    let shown = feed.visible().count();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .title(Span::styled(
            format!(
                " {} · {} ({shown}/{}) [n] ",
                t!("News.Title"),
                feed.filter().label(),
                feed.total()
            ),
            styles::title(),
        ));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let message = match feed.status() {
        FeedStatus::Idle => Some((t!("News.Idle"), styles::dark_gray())),
        FeedStatus::Loading => Some((t!("Loading"), styles::dark_gray())),
        FeedStatus::Failed(reason) => Some((t!("News.Failed", reason = reason), styles::error())),
        FeedStatus::Ready if shown == 0 => Some((t!("News.Empty"), styles::dark_gray())),
        FeedStatus::Ready => None,
    };
    if let Some((message, style)) = message {
        frame.render_widget(Paragraph::new(Span::styled(message, style)), inner);
        return;
    }

    let width = usize::from(inner.width);
    let items: Vec<ListItem> = feed
        .visible()
        .map(|article| {
            let tone = article.display_tone();
            let badge = format!("[{}] ", tone.label());
            let title_width = width.saturating_sub(badge.chars().count());
            let published = article
                .published_date()
                .map_or_else(|| text::EMPTY_PLACEHOLDER.to_string(), |d| d.to_string());
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(badge, styles::tone(tone)),
                    Span::styled(text::truncate(&article.title, title_width), styles::text()),
                ]),
                Line::from(Span::styled(
                    format!("  {} · {published}", article.source_label()),
                    styles::dark_gray(),
                )),
            ])
        })
        .collect();
    frame.render_widget(List::new(items), inner);
}

fn ratio(percent: Decimal) -> f64 {
    (f64::try_from(percent).unwrap_or(0.0) / 100.0).clamp(0.0, 1.0)
}

/// Bullish, sector and buzz gauges
pub(super) fn sentiment(frame: &mut Frame, rect: Rect, pane: &TickerPane) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .title(Span::styled(
            format!(" {} ", t!("Sentiment.Title")),
            styles::title(),
        ));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let Some(snapshot) = pane.sentiment() else {
        let message = if pane.is_loading() {
            t!("Loading")
        } else {
            text::EMPTY_PLACEHOLDER.to_string()
        };
        frame.render_widget(Paragraph::new(Span::styled(message, styles::dark_gray())), inner);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
        ])
        .split(inner);

    let bucket = snapshot.bucket();
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{}: ", t!("Sentiment.Overall")), styles::label()),
            Span::styled(bucket.label(), styles::bucket(bucket)),
        ])),
        rows[0],
    );

    let gauges = [
        (t!("Sentiment.Bullish"), snapshot.bullish_percent(), styles::bucket(bucket)),
        (
            t!("Sentiment.Sector"),
            snapshot.sector_percent(),
            styles::bucket(SentimentBucket::classify(snapshot.sector_percent())),
        ),
        (t!("Sentiment.Buzz"), snapshot.buzz_percent(), styles::keyboard()),
    ];
    for ((label, percent, style), row) in gauges.into_iter().zip(rows.iter().skip(1)) {
        let gauge = Gauge::default()
            .block(Block::default().title(Span::styled(label, styles::label())))
            .gauge_style(style)
            .ratio(ratio(percent))
            .label(display_percent(percent));
        frame.render_widget(gauge, *row);
    }
}
