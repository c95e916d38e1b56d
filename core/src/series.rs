//! Bucketing of sparse time series into fixed-step series.
//!
//! `TREND` and `TRENDNAN` read a series binding as one value per sampling
//! interval. Data usually arrives as irregular `(time, value)` samples instead;
//! [`SparseSeries::bucket`] consolidates those samples into the fixed-step
//! [`Def`] that can be bound directly.

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

use crate::bindings::Value;

/// How the samples that fall into one bucket are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consolidation {
    /// Mean of the samples. Meaningless for discrete values.
    Avg,
    /// Latest sample.
    Last,
    Max,
    Min,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("cannot bucket with non-matching lengths of times and values: {times} != {values}")]
    LengthMismatch { times: usize, values: usize },

    #[error("cannot bucket with non-positive step: {0}")]
    NonPositiveStep(TimeDelta),

    #[error("time outside the representable range")]
    OutOfRange,
}

/// Irregular samples of one series.
///
/// `times` must be strictly increasing and `values[i]` is the sample taken at
/// `times[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseSeries {
    pub label: String,
    pub times: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
}

/// A fixed-step series: `values[i]` covers `[start + i*step, start + (i+1)*step)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Def {
    pub label: String,
    pub start: DateTime<Utc>,
    pub step: TimeDelta,
    pub values: Vec<f64>,
}

impl SparseSeries {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Appends one sample.
    pub fn push(&mut self, time: DateTime<Utc>, value: f64) {
        self.times.push(time);
        self.values.push(value);
    }

    /// Consolidates the samples between `start` and `end` (both inclusive)
    /// into buckets of width `step`.
    ///
    /// The first bucket starts at `start` truncated to a multiple of `step`
    /// since the epoch, and buckets are added until one covers `end`. Buckets
    /// without a non-NaN sample hold NaN.
    ///
    /// ```
    /// use chrono::{DateTime, TimeDelta};
    /// use tsrpn_core::series::{Consolidation, SparseSeries};
    ///
    /// let at = |secs| DateTime::from_timestamp(secs, 0).unwrap();
    /// let mut series = SparseSeries::new("qps");
    /// series.push(at(60), 13.0);
    /// series.push(at(62), 42.0);
    ///
    /// let def = series
    ///     .bucket(at(60), at(62), TimeDelta::seconds(1), Consolidation::Last)
    ///     .unwrap();
    /// assert_eq!(def.values.len(), 3);
    /// assert!(def.values[1].is_nan());
    /// ```
    pub fn bucket(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: TimeDelta,
        consolidation: Consolidation,
    ) -> Result<Def, SeriesError> {
        if self.times.len() != self.values.len() {
            return Err(SeriesError::LengthMismatch {
                times: self.times.len(),
                values: self.values.len(),
            });
        }
        let step_ns = step.num_nanoseconds().ok_or(SeriesError::OutOfRange)?;
        if step_ns <= 0 {
            return Err(SeriesError::NonPositiveStep(step));
        }
        let start_ns = nanos(start)?;
        let end_ns = nanos(end)?;

        let first_ns = start_ns - start_ns.rem_euclid(step_ns);
        let count = if first_ns + step_ns > end_ns {
            1
        } else {
            let mut last_ns = end_ns - end_ns.rem_euclid(step_ns);
            if last_ns < end_ns {
                last_ns += step_ns;
            }
            ((last_ns - first_ns) / step_ns + 1) as usize
        };

        let mut buckets = vec![Bucket::default(); count];
        for (time, value) in self.times.iter().zip(&self.values) {
            let ns = nanos(*time)?;
            if ns < first_ns || ns > end_ns {
                continue;
            }
            let index = ((ns - first_ns) / step_ns) as usize;
            if let Some(bucket) = buckets.get_mut(index) {
                bucket.add(*value);
            }
        }

        Ok(Def {
            label: self.label.clone(),
            start: DateTime::from_timestamp_nanos(first_ns),
            step,
            values: buckets.iter().map(|b| b.consolidate(consolidation)).collect(),
        })
    }
}

fn nanos(time: DateTime<Utc>) -> Result<i64, SeriesError> {
    time.timestamp_nanos_opt().ok_or(SeriesError::OutOfRange)
}

/// Running statistics of the non-NaN samples in one bucket.
#[derive(Debug, Clone, Copy)]
struct Bucket {
    count: usize,
    sum: f64,
    max: f64,
    min: f64,
    last: f64,
}

impl Default for Bucket {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            max: f64::NEG_INFINITY,
            min: f64::INFINITY,
            last: f64::NAN,
        }
    }
}

impl Bucket {
    fn add(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.count += 1;
        self.sum += value;
        self.max = self.max.max(value);
        self.min = self.min.min(value);
        self.last = value;
    }

    fn consolidate(&self, consolidation: Consolidation) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        match consolidation {
            Consolidation::Avg => self.sum / self.count as f64,
            Consolidation::Last => self.last,
            Consolidation::Max => self.max,
            Consolidation::Min => self.min,
        }
    }
}

impl Def {
    /// Start time of every bucket.
    pub fn times(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        (0..self.values.len()).map(move |i| self.start + self.step * i as i32)
    }
}

impl From<Def> for Value {
    fn from(def: Def) -> Self {
        Value::F64s(def.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Program, ProgramOptions};
    use crate::bindings::Bindings;
    use pretty_assertions::assert_eq;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn series(samples: &[(i64, f64)]) -> SparseSeries {
        let mut series = SparseSeries::new("t1");
        for (secs, value) in samples {
            series.push(at(*secs), *value);
        }
        series
    }

    fn one_second(series: &SparseSeries, start: i64, end: i64) -> Vec<f64> {
        series
            .bucket(at(start), at(end), TimeDelta::seconds(1), Consolidation::Last)
            .unwrap()
            .values
    }

    /// Renders values so NaN compares equal to itself.
    fn show(values: &[f64]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_no_source_data() {
        let values = one_second(&SparseSeries::new("t1"), 60, 62);
        assert_eq!(show(&values), ["NaN", "NaN", "NaN"]);
    }

    #[test]
    fn test_request_outside_data() {
        let data = series(&[(60, 13.0), (61, 42.0), (62, 99.0)]);
        assert_eq!(show(&one_second(&data, 50, 53)), ["NaN"; 4]);
        assert_eq!(show(&one_second(&data, 120, 123)), ["NaN"; 4]);
    }

    #[test]
    fn test_single_point() {
        let data = series(&[(60, 13.0), (61, 42.0), (62, 99.0)]);
        assert_eq!(one_second(&data, 61, 61), [42.0]);

        let gap = series(&[(50, 13.0), (70, 42.0)]);
        assert_eq!(show(&one_second(&gap, 60, 60)), ["NaN"]);
    }

    #[test]
    fn test_label_start_and_step() {
        let data = series(&[(60, 13.0)]);
        let def = data
            .bucket(at(65), at(80), TimeDelta::seconds(10), Consolidation::Last)
            .unwrap();
        assert_eq!(def.label, "t1");
        assert_eq!(def.start, at(60));
        assert_eq!(def.step, TimeDelta::seconds(10));
        assert_eq!(def.times().collect::<Vec<_>>(), [at(60), at(70), at(80)]);
    }

    #[test]
    fn test_gaps_become_nan() {
        let data = series(&[(60, 13.0), (61, 42.0)]);
        assert_eq!(show(&one_second(&data, 58, 61)), ["NaN", "NaN", "13", "42"]);
        assert_eq!(show(&one_second(&data, 60, 63)), ["13", "42", "NaN", "NaN"]);

        let sparse = series(&[(60, 13.0), (63, 42.0)]);
        assert_eq!(show(&one_second(&sparse, 60, 63)), ["13", "NaN", "NaN", "42"]);
    }

    #[test]
    fn test_consolidations_skip_nan() {
        let data = series(&[(60, 13.0), (61, f64::NAN), (62, 42.0)]);
        let cases = [
            (Consolidation::Avg, 27.5),
            (Consolidation::Last, 42.0),
            (Consolidation::Min, 13.0),
            (Consolidation::Max, 42.0),
        ];
        for (consolidation, expected) in cases {
            let def = data
                .bucket(at(60), at(69), TimeDelta::seconds(10), consolidation)
                .unwrap();
            assert_eq!(def.values, [expected], "{:?}", consolidation);
        }
    }

    #[test]
    fn test_infinite_samples_survive() {
        let data = series(&[(60, f64::NEG_INFINITY), (61, f64::NEG_INFINITY)]);
        let def = data
            .bucket(at(60), at(69), TimeDelta::seconds(10), Consolidation::Max)
            .unwrap();
        assert_eq!(def.values, [f64::NEG_INFINITY]);

        let data = series(&[(60, f64::INFINITY)]);
        let def = data
            .bucket(at(60), at(69), TimeDelta::seconds(10), Consolidation::Min)
            .unwrap();
        assert_eq!(def.values, [f64::INFINITY]);
    }

    #[test]
    fn test_bad_input() {
        let mut data = series(&[(60, 13.0)]);
        data.values.push(42.0);
        let err = data
            .bucket(at(60), at(61), TimeDelta::seconds(1), Consolidation::Avg)
            .unwrap_err();
        assert_eq!(err, SeriesError::LengthMismatch { times: 1, values: 2 });

        let err = series(&[])
            .bucket(at(60), at(61), TimeDelta::zero(), Consolidation::Avg)
            .unwrap_err();
        assert_eq!(err, SeriesError::NonPositiveStep(TimeDelta::zero()));
    }

    #[test]
    fn test_def_feeds_trend() {
        let data = series(&[(0, 1.0), (300, 2.0), (600, f64::NAN), (900, 4.0)]);
        let def = data
            .bucket(at(0), at(900), TimeDelta::seconds(300), Consolidation::Avg)
            .unwrap();
        let options = ProgramOptions::default();
        let program = Program::with_options("qps,900,TRENDNAN", options).unwrap();
        let value = program
            .evaluate(&Bindings::new().bind("qps", def))
            .unwrap();
        assert_eq!(value, 3.0);
    }
}
