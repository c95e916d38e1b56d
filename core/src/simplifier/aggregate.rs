//! Numeric helpers for the windowed operators.

use core::cmp::Ordering;

/// Ascending order with NaN placed before every other value.
pub(super) fn ascending(a: &f64, b: &f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    }
}

pub(super) fn sort(values: &mut [f64]) {
    values.sort_by(ascending);
}

/// Mean of the non-NaN values; NaN when there are none.
pub(super) fn mean(values: &[f64]) -> f64 {
    let (total, used) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(total, used), v| (total + v, used + 1));
    total / used as f64
}

/// Population standard deviation of the non-NaN values.
pub(super) fn stdev(values: &[f64]) -> f64 {
    let mean = mean(values);
    let (total, used) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(total, used), v| {
            let diff = v - mean;
            (total + diff * diff, used + 1)
        });
    (total / used as f64).sqrt()
}

/// Sorts `values` and returns the middle value, or the mean of the two middle
/// values for an even count.
pub(super) fn median(values: &mut [f64]) -> f64 {
    sort(values);
    let middle = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[middle - 1] + values[middle]) / 2.0
    } else {
        values[middle]
    }
}

/// Median absolute deviation from the median.
pub(super) fn mad(values: &mut [f64]) -> f64 {
    let center = median(values);
    for v in values.iter_mut() {
        *v = (*v - center).abs();
    }
    median(values)
}

/// Nearest-rank percentile. `percent` must lie in `(0, 100]`.
pub(super) fn percentile(values: &mut [f64], percent: f64) -> f64 {
    sort(values);
    let rank = (percent / 100.0 * values.len() as f64).ceil() as usize;
    values[rank.clamp(1, values.len()) - 1]
}

/// Fold-left extremum seeded with `seed`. A NaN seed sticks; NaN items are skipped.
pub(super) fn extremum(seed: f64, values: &[f64], pick_larger: bool) -> f64 {
    values.iter().fold(seed, |best, &v| {
        let better = if pick_larger { v > best } else { v < best };
        if better { v } else { best }
    })
}

/// Average of the trailing `count` samples of a series.
///
/// With `skip_nan` NaN samples are left out of both the sum and the divisor;
/// otherwise a single NaN poisons the result.
pub(super) fn trend(series: &[f64], count: usize, skip_nan: bool) -> f64 {
    let window = &series[series.len() - count..];
    let (total, used) = window
        .iter()
        .filter(|v| !skip_nan || !v.is_nan())
        .fold((0.0, 0usize), |(total, used), v| (total + v, used + 1));
    total / used as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_puts_nan_first() {
        let mut values = [3.0, f64::NAN, -1.0, f64::INFINITY];
        sort(&mut values);
        assert!(values[0].is_nan());
        assert_eq!(&values[1..], &[-1.0, 3.0, f64::INFINITY]);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&mut [42.0, 13.0]), 27.5);
        assert_eq!(median(&mut [1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(median(&mut [3.0, 2.0, 5.0, 1.0, 4.0]), 3.0);
    }

    #[test]
    fn test_mad() {
        assert_eq!(mad(&mut [42.0, 666.0, 13.0]), 29.0);
        assert_eq!(mad(&mut [3.0, 2.0, 5.0, 1.0, 4.0]), 1.0);
    }

    #[test]
    fn test_mean_and_stdev_skip_nan() {
        assert_eq!(mean(&[42.0, f64::NAN, 13.0]), 27.5);
        assert!(mean(&[f64::NAN, f64::NAN]).is_nan());
        assert_eq!(stdev(&[13.0, 42.0]), 14.5);
    }

    #[test]
    fn test_percentile_nearest_rank() {
        assert_eq!(percentile(&mut [15.0, 20.0, 35.0, 40.0, 50.0], 30.0), 20.0);
        assert_eq!(percentile(&mut [15.0, 20.0, 35.0, 40.0, 50.0], 100.0), 50.0);
        assert_eq!(percentile(&mut [7.0], 1.0), 7.0);
    }

    #[test]
    fn test_extremum() {
        assert_eq!(extremum(13.0, &[42.0, f64::NEG_INFINITY], false), f64::NEG_INFINITY);
        assert_eq!(extremum(13.0, &[42.0, f64::NAN], true), 42.0);
        assert!(extremum(f64::NAN, &[42.0], true).is_nan());
    }

    #[test]
    fn test_trend() {
        let series = [1.0, 2.0, f64::NAN, 4.0, 5.0, f64::NAN, 7.0, 8.0, 9.0, 10.0];
        assert_eq!(trend(&series, 10, true), 5.75);
        assert!(trend(&series, 10, false).is_nan());
        assert_eq!(trend(&series, 2, false), 9.5);
    }
}
