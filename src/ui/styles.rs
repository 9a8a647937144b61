use std::{
    cmp::Ordering,
    sync::atomic::{AtomicU8, Ordering as AtomicOrdering},
};

use ratatui::style::{Color, Modifier, Style};
use strum::IntoEnumIterator;

use crate::{data::Palette, news::Tone, sentiment::SentimentBucket};

static PALETTE: AtomicU8 = AtomicU8::new(0);

pub fn set_palette(palette: Palette) {
    let index = Palette::iter().position(|p| p == palette).unwrap_or(0);
    PALETTE.store(u8::try_from(index).unwrap_or(0), AtomicOrdering::Relaxed);
}

pub fn palette() -> Palette {
    let index = usize::from(PALETTE.load(AtomicOrdering::Relaxed));
    Palette::iter().nth(index).unwrap_or_default()
}

#[inline]
pub fn gray() -> Style {
    Style::default().fg(Color::Gray)
}

#[inline]
pub fn dark_gray() -> Style {
    Style::default().fg(Color::DarkGray)
}

#[inline]
pub fn label() -> Style {
    Style::default().fg(Color::Gray)
}

#[inline]
pub fn text() -> Style {
    Style::default().fg(Color::Reset)
}

#[inline]
pub fn text_selected() -> Style {
    text().add_modifier(Modifier::REVERSED)
}

#[inline]
pub fn keyboard() -> Style {
    Style::default().fg(Color::Cyan)
}

#[inline]
pub fn popup() -> Style {
    text()
}

#[inline]
pub fn title() -> Style {
    text().add_modifier(Modifier::BOLD)
}

#[inline]
pub fn border() -> Style {
    Style::default().fg(Color::DarkGray)
}

#[inline]
pub fn warning() -> Style {
    Style::default().fg(Color::Yellow)
}

#[inline]
pub fn error() -> Style {
    Style::default().fg(Color::LightRed)
}

/// (rising, falling) colors for the active palette
fn up_down_colors() -> (Color, Color) {
    match palette() {
        Palette::Standard => (Color::LightGreen, Color::LightRed),
        Palette::RedUp => (Color::LightRed, Color::LightGreen),
        Palette::ColorBlind => (Color::LightBlue, Color::Rgb(230, 159, 0)),
    }
}

#[inline]
pub fn bull_bear() -> (Style, Style) {
    let (up, down) = up_down_colors();
    (Style::default().fg(up), Style::default().fg(down))
}

#[inline]
pub fn up(val: Ordering) -> Style {
    match val {
        Ordering::Less => bull_bear().1,
        Ordering::Equal => Style::default().fg(Color::Reset),
        Ordering::Greater => bull_bear().0,
    }
}

pub fn bucket(bucket: SentimentBucket) -> Style {
    match bucket {
        SentimentBucket::Positive => bull_bear().0,
        SentimentBucket::Neutral => warning(),
        SentimentBucket::Negative => bull_bear().1,
    }
}

pub fn tone(tone: Tone) -> Style {
    match tone {
        Tone::Positive => bull_bear().0,
        Tone::Neutral => gray(),
        Tone::Negative => bull_bear().1,
    }
}
