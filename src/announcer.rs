use std::time::{Duration, Instant};

use crate::{
    compare::Verdict,
    events::{Notification, Target},
};

const TTL: Duration = Duration::from_secs(6);

/// Keeps the latest status-line announcement for the footer
#[derive(Debug, Default)]
pub struct Announcer {
    latest: Option<(String, Instant)>,
}

impl Announcer {
    pub fn hear(&mut self, notification: &Notification) {
        if let Some(message) = announcement(notification) {
            self.latest = Some((message, Instant::now()));
        }
    }

    /// Current announcement, expired ones are dropped
    pub fn current(&self, now: Instant) -> Option<&str> {
        self.latest
            .as_ref()
            .filter(|(_, at)| now.duration_since(*at) < TTL)
            .map(|(message, _)| message.as_str())
    }

    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = self
            .latest
            .as_ref()
            .is_some_and(|(_, at)| now.duration_since(*at) >= TTL);
        if expired {
            self.latest = None;
        }
        expired
    }
}

fn pane_name(target: Target) -> String {
    match target {
        Target::Main => String::new(),
        Target::Slot(slot) => format!("[{}] ", slot.label()),
    }
}

/// Short spoken-style summary, `None` for noise
pub fn announcement(notification: &Notification) -> Option<String> {
    let message = match notification {
        Notification::DataLoaded { target, ticker, .. } => format!(
            "{}{}",
            pane_name(*target),
            t!("Announce.DataLoaded", ticker = ticker)
        ),
        Notification::ChartUpdated {
            target,
            ticker,
            days,
            points,
        } => format!(
            "{}{}",
            pane_name(*target),
            t!(
                "Announce.ChartUpdated",
                ticker = ticker,
                days = days,
                points = points
            )
        ),
        Notification::NewsDisplayed { shown, total } => {
            t!("Announce.NewsDisplayed", shown = shown, total = total)
        }
        Notification::TickerNotFound { target, ticker, .. } => format!(
            "{}{}",
            pane_name(*target),
            t!("Announce.TickerNotFound", ticker = ticker)
        ),
        Notification::VerdictChanged(Some(Verdict::Winner { slot, .. })) => {
            t!("Announce.Winner", slot = slot.label())
        }
        Notification::VerdictChanged(Some(Verdict::Tie { .. })) => t!("Announce.Tie"),
        Notification::SentimentUpdated { .. }
        | Notification::FetchFailed { .. }
        | Notification::EmptyRange { .. }
        | Notification::ChartUnavailable { .. }
        | Notification::VerdictChanged(None) => return None,
    };
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Ticker;

    #[test]
    fn keeps_latest_and_expires() {
        let _lock = crate::helper::TEST_LOCALE_LOCK.lock().expect("poison");
        rust_i18n::set_locale("en");

        let mut announcer = Announcer::default();
        let now = Instant::now();
        assert_eq!(announcer.current(now), None);

        announcer.hear(&Notification::DataLoaded {
            target: Target::Main,
            ticker: Ticker::parse("AAPL").unwrap(),
            points: 10,
        });
        let text = announcer.current(Instant::now()).unwrap().to_string();
        assert!(text.contains("AAPL"), "{text}");

        // noise doesn't replace the last announcement
        announcer.hear(&Notification::VerdictChanged(None));
        assert_eq!(announcer.current(Instant::now()), Some(text.as_str()));

        let later = Instant::now() + TTL;
        assert_eq!(announcer.current(later), None);
        assert!(announcer.expire(later));
        assert!(!announcer.expire(later));
    }

    #[test]
    fn slot_prefix() {
        let _lock = crate::helper::TEST_LOCALE_LOCK.lock().expect("poison");
        rust_i18n::set_locale("en");
        let text = announcement(&Notification::TickerNotFound {
            target: Target::Slot(crate::compare::SlotId::B),
            ticker: Ticker::parse("ZZZZ").unwrap(),
            reason: crate::pane::NotFoundReason::Unknown,
        })
        .unwrap();
        assert!(text.starts_with("[B] "));
        assert!(text.contains("ZZZZ"));
    }
}
