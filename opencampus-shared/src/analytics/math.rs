/// Pure arithmetic for analytics reports
///
/// Every division the engine performs goes through a helper here so the
/// zero-denominator policy lives in exactly one place and stays unit
/// tested. No helper ever returns NaN or infinity.

use chrono::{Datelike, Duration, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Rounds to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percent change from `previous` to `current`
///
/// A zero previous value reports 100 when anything exists now and 0
/// otherwise, so a brand-new platform shows growth rather than a division
/// error.
pub fn percent_change(previous: i64, current: i64) -> f64 {
    if previous == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }
    round2((current - previous) as f64 / previous as f64 * 100.0)
}

/// `part` as a percentage of `total`; 0 when `total` is 0
pub fn percent_of(part: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

/// Average of `total` over `denominator`, with the denominator floored at 1
pub fn average_per(total: i64, denominator: i64) -> f64 {
    round2(total as f64 / denominator.max(1) as f64)
}

/// Chains funnel stage rates: each stage relative to the one before it
///
/// The first stage is always 100. A stage following an empty stage reports
/// 0 regardless of its own count.
pub fn funnel_rates(counts: &[i64]) -> Vec<f64> {
    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            if i == 0 {
                100.0
            } else {
                percent_of(count, counts[i - 1])
            }
        })
        .collect()
}

/// English name of a month (1-12)
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month as usize - 1) % 12]
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // day 1 always exists
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `n` months before the month containing `date`
pub fn months_back(date: NaiveDate, n: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 - n as i32;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(date)
}

/// Ascending sequence of month starts ending with the month of `end`
pub fn month_sequence(end: NaiveDate, count: u32) -> Vec<NaiveDate> {
    (0..count)
        .rev()
        .map(|n| months_back(end, n))
        .collect()
}

/// Materializes a full daily series over `[start, start + days)`
///
/// `observed` holds (date, count) pairs for days that had activity; every
/// other day in the range reports 0.
pub fn fill_daily(start: NaiveDate, days: u32, observed: &[(NaiveDate, i64)]) -> Vec<(NaiveDate, i64)> {
    (0..days)
        .map(|offset| {
            let date = start + Duration::days(offset as i64);
            let count = observed
                .iter()
                .find(|(d, _)| *d == date)
                .map(|(_, c)| *c)
                .unwrap_or(0);
            (date, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_percent_change_basic() {
        assert_eq!(percent_change(100, 150), 50.0);
        assert_eq!(percent_change(200, 100), -50.0);
        assert_eq!(percent_change(3, 4), 33.33);
    }

    #[test]
    fn test_percent_change_zero_previous() {
        assert_eq!(percent_change(0, 5), 100.0);
        assert_eq!(percent_change(0, 0), 0.0);
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(1, 4), 25.0);
        assert_eq!(percent_of(1, 3), 33.33);
        assert_eq!(percent_of(0, 10), 0.0);
        assert_eq!(percent_of(7, 0), 0.0);
    }

    #[test]
    fn test_average_per_floors_denominator() {
        assert_eq!(average_per(10, 4), 2.5);
        assert_eq!(average_per(10, 0), 10.0);
        assert_eq!(average_per(0, 0), 0.0);
    }

    #[test]
    fn test_funnel_rates_chain() {
        // 100 signups, 40 trials, 10 paid
        assert_eq!(funnel_rates(&[100, 40, 10]), vec![100.0, 40.0, 25.0]);
    }

    #[test]
    fn test_funnel_rates_empty_stage() {
        assert_eq!(funnel_rates(&[50, 0, 0]), vec![100.0, 0.0, 0.0]);
        assert_eq!(funnel_rates(&[0, 0]), vec![100.0, 0.0]);
    }

    #[test]
    fn test_funnel_rates_single_stage() {
        assert_eq!(funnel_rates(&[7]), vec![100.0]);
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(date(2025, 3, 17)), date(2025, 3, 1));
        assert_eq!(month_start(date(2025, 3, 1)), date(2025, 3, 1));
    }

    #[test]
    fn test_months_back_same_year() {
        assert_eq!(months_back(date(2025, 6, 15), 2), date(2025, 4, 1));
        assert_eq!(months_back(date(2025, 6, 15), 0), date(2025, 6, 1));
    }

    #[test]
    fn test_months_back_crosses_year_boundary() {
        assert_eq!(months_back(date(2025, 2, 10), 3), date(2024, 11, 1));
        assert_eq!(months_back(date(2025, 1, 1), 12), date(2024, 1, 1));
    }

    #[test]
    fn test_month_sequence_is_ascending() {
        let seq = month_sequence(date(2025, 3, 20), 3);
        assert_eq!(seq, vec![date(2025, 1, 1), date(2025, 2, 1), date(2025, 3, 1)]);
    }

    #[test]
    fn test_fill_daily_zero_fills_gaps() {
        // logins on day 1 and day 3, nothing on day 2
        let observed = vec![(date(2025, 5, 1), 4), (date(2025, 5, 3), 2)];
        let series = fill_daily(date(2025, 5, 1), 3, &observed);
        assert_eq!(
            series,
            vec![
                (date(2025, 5, 1), 4),
                (date(2025, 5, 2), 0),
                (date(2025, 5, 3), 2),
            ]
        );
    }

    #[test]
    fn test_fill_daily_empty_observed() {
        let series = fill_daily(date(2025, 5, 1), 2, &[]);
        assert_eq!(series, vec![(date(2025, 5, 1), 0), (date(2025, 5, 2), 0)]);
    }
}
