use time::Date;

use crate::data::{PricePoint, TimeRange};

/// Points dated on or after `today - range` days, in series order
///
/// `points` must be sorted by date, which `TickerSeries` guarantees.
pub fn filter_window(points: &[PricePoint], range: TimeRange, today: Date) -> &[PricePoint] {
    let start = range.start_date(today);
    let offset = points.partition_point(|point| point.date < start);
    &points[offset..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use time::{macros::date, Duration};

    fn daily(today: Date, days: i64) -> Vec<PricePoint> {
        (0..days)
            .rev()
            .map(|ago| {
                let close = Decimal::from(100 + ago);
                PricePoint {
                    date: today - Duration::days(ago),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 1_000,
                }
            })
            .collect()
    }

    #[test]
    fn keeps_points_inside_window() {
        let today = date!(2024 - 06 - 30);
        let points = daily(today, 400);

        for days in [7, 30, 90, 180, 365] {
            let range = TimeRange::new(days);
            let window = filter_window(&points, range, today);
            let cutoff = today - Duration::days(i64::from(days));

            assert!(window.iter().all(|p| p.date >= cutoff), "range {days}");
            assert_eq!(window.len(), days as usize + 1, "range {days}");
            assert!(
                window.windows(2).all(|w| w[0].date < w[1].date),
                "range {days} lost ordering"
            );
            // everything dropped is older than the cutoff
            let dropped = &points[..points.len() - window.len()];
            assert!(dropped.iter().all(|p| p.date < cutoff));
        }
    }

    #[test]
    fn sparse_points() {
        let today = date!(2024 - 06 - 30);
        let mut points = daily(today, 3);
        points.insert(
            0,
            PricePoint {
                date: date!(2023 - 01 - 01),
                ..points[0]
            },
        );

        let window = filter_window(&points, TimeRange::new(7), today);
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].date, date!(2024 - 06 - 28));
    }

    #[test]
    fn empty_window() {
        let today = date!(2024 - 06 - 30);
        let stale = daily(date!(2023 - 01 - 31), 10);
        assert!(filter_window(&stale, TimeRange::new(30), today).is_empty());
        assert!(filter_window(&[], TimeRange::default(), today).is_empty());
    }
}
