//! Side-by-side comparison of two tickers and the derived "better pick".

use std::rc::Rc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use strum::EnumIter;
use time::Date;

use crate::{
    chart::{ChartFactory, ChartOutcome},
    data::{DisplayMode, TimeRange},
    pane::TickerPane,
};

/// Weight of the bullish percent in the score
const SENTIMENT_WEIGHT: Decimal = dec!(0.5);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum SlotId {
    A,
    B,
}

impl SlotId {
    pub fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

/// `percent_change + 0.5 × sentiment_percent`
pub fn score(percent_change: Decimal, sentiment_percent: Decimal) -> Decimal {
    percent_change + sentiment_percent * SENTIMENT_WEIGHT
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Winner {
        slot: SlotId,
        score_a: Decimal,
        score_b: Decimal,
    },
    Tie {
        score: Decimal,
    },
}

/// Decide between two `(percent_change, sentiment_percent)` pairs
///
/// `None` until both sides are known.
pub fn decide(a: Option<(Decimal, Decimal)>, b: Option<(Decimal, Decimal)>) -> Option<Verdict> {
    let score_a = a.map(|(pct, sentiment)| score(pct, sentiment))?;
    let score_b = b.map(|(pct, sentiment)| score(pct, sentiment))?;
    Some(match score_a.cmp(&score_b) {
        std::cmp::Ordering::Greater => Verdict::Winner {
            slot: SlotId::A,
            score_a,
            score_b,
        },
        std::cmp::Ordering::Less => Verdict::Winner {
            slot: SlotId::B,
            score_a,
            score_b,
        },
        std::cmp::Ordering::Equal => Verdict::Tie { score: score_a },
    })
}

pub struct ComparisonController {
    a: TickerPane,
    b: TickerPane,
    verdict: Option<Verdict>,
}

impl ComparisonController {
    pub fn new(
        factory: &Rc<dyn ChartFactory>,
        mode: DisplayMode,
        range: TimeRange,
        ceiling: Decimal,
    ) -> Self {
        Self {
            a: TickerPane::new(factory.clone(), mode, range, ceiling),
            b: TickerPane::new(factory.clone(), mode, range, ceiling),
            verdict: None,
        }
    }

    pub fn slot(&self, id: SlotId) -> &TickerPane {
        match id {
            SlotId::A => &self.a,
            SlotId::B => &self.b,
        }
    }

    pub fn slot_mut(&mut self, id: SlotId) -> &mut TickerPane {
        match id {
            SlotId::A => &mut self.a,
            SlotId::B => &mut self.b,
        }
    }

    /// Recompute after any slot update, returns true when the verdict changed
    pub fn refresh_verdict(&mut self) -> bool {
        let verdict = decide(self.a.score_inputs(), self.b.score_inputs());
        let changed = verdict != self.verdict;
        self.verdict = verdict;
        changed
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    pub fn is_loading(&self) -> bool {
        self.a.is_loading() || self.b.is_loading()
    }

    pub fn set_mode(&mut self, mode: DisplayMode, today: Date) -> [ChartOutcome; 2] {
        [self.a.set_mode(mode, today), self.b.set_mode(mode, today)]
    }

    pub fn set_range(&mut self, range: TimeRange, today: Date) -> [ChartOutcome; 2] {
        [self.a.set_range(range, today), self.b.set_range(range, today)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chart::CountingFactory,
        data::{PriceRecord, Ticker},
        panel::DEFAULT_PRICE_CEILING,
        sentiment::SentimentSnapshot,
    };
    use time::macros::date;

    #[test]
    fn scoring_example() {
        // A: +5%, 80% bullish -> 45; B: +10%, 50% bullish -> 35
        let verdict = decide(Some((dec!(5), dec!(80))), Some((dec!(10), dec!(50)))).unwrap();
        assert_eq!(
            verdict,
            Verdict::Winner {
                slot: SlotId::A,
                score_a: dec!(45),
                score_b: dec!(35),
            }
        );
    }

    #[test]
    fn order_independent() {
        let a = Some((dec!(-2.5), dec!(30)));
        let b = Some((dec!(1), dec!(20)));
        let ab = decide(a, b).unwrap();
        let ba = decide(b, a).unwrap();
        assert!(matches!(ab, Verdict::Winner { slot: SlotId::A, .. }));
        assert!(matches!(ba, Verdict::Winner { slot: SlotId::B, .. }));
        assert_eq!(decide(a, b), decide(a, b));
    }

    #[test]
    fn tie_and_missing() {
        assert_eq!(
            decide(Some((dec!(10), dec!(40))), Some((dec!(20), dec!(20)))),
            Some(Verdict::Tie { score: dec!(30) })
        );
        assert_eq!(decide(None, Some((dec!(1), dec!(1)))), None);
        assert_eq!(decide(Some((dec!(1), dec!(1))), None), None);
    }

    #[test]
    fn controller_waits_for_both_slots() {
        let today = date!(2024 - 06 - 30);
        let factory: Rc<dyn ChartFactory> = Rc::new(CountingFactory::new());
        let mut compare = ComparisonController::new(
            &factory,
            DisplayMode::Line,
            TimeRange::default(),
            DEFAULT_PRICE_CEILING,
        );

        let feed = |pane: &mut TickerPane, symbol: &str, prev, last, bullish| {
            let generation = pane.begin(Ticker::parse(symbol).unwrap(), 2);
            pane.apply_stock_data(
                generation,
                Ok(vec![
                    PriceRecord {
                        date: "2024-06-27".into(),
                        close: Some(prev),
                        ..PriceRecord::default()
                    },
                    PriceRecord {
                        date: "2024-06-28".into(),
                        close: Some(last),
                        ..PriceRecord::default()
                    },
                ]),
                today,
            );
            pane.apply_sentiment(
                generation,
                Ok(SentimentSnapshot {
                    sentiment_score: bullish,
                    ..SentimentSnapshot::default()
                }),
            );
        };

        feed(compare.slot_mut(SlotId::A), "AAPL", dec!(100), dec!(105), 0.8);
        assert!(!compare.refresh_verdict());
        assert_eq!(compare.verdict(), None);

        feed(compare.slot_mut(SlotId::B), "MSFT", dec!(100), dec!(110), 0.5);
        assert!(compare.refresh_verdict());
        assert!(matches!(
            compare.verdict(),
            Some(Verdict::Winner { slot: SlotId::A, .. })
        ));
        assert!(!compare.refresh_verdict());
        assert!(!compare.is_loading());
    }
}
