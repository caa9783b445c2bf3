use chrono::NaiveDate;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rounds to one decimal place for display.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Percentage of `part` over `whole`, or 0.0 when `whole` is not positive.
pub fn pct(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// 1-based day of lactation for `date`; lactation start itself is day 1.
pub fn day_index(lactation_start: NaiveDate, date: NaiveDate) -> i64 {
    (date - lactation_start).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0]), 3.0);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(74.96), 75.0);
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn test_pct_guards_zero_whole() {
        assert_eq!(pct(5.0, 0.0), 0.0);
        assert_eq!(pct(15.0, 20.0), 75.0);
    }

    #[test]
    fn test_day_index_crosses_leap_day() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(day_index(start, start), 1);
        assert_eq!(day_index(start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()), 61);
    }
}
