//! Ordered, deduplicated, range-validated time series.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::error::SeriesError;
use crate::parameter::ParameterKind;

/// An immutable mapping from instant to value for one parameter kind.
///
/// Guarantees, established by [`TimeSeriesBuilder::build`]:
/// - instants are strictly increasing and unique
/// - the series is non-empty
/// - every value lies within the kind's valid range
/// - with a reference instant, no instant precedes it
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    kind: ParameterKind,
    reference_time: Option<DateTime<Utc>>,
    values: BTreeMap<DateTime<Utc>, f64>,
}

impl TimeSeries {
    pub fn builder(kind: ParameterKind) -> TimeSeriesBuilder {
        TimeSeriesBuilder::new(kind)
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// Production instant of the forecast cycle, if this is a forecast series.
    pub fn reference_time(&self) -> Option<DateTime<Utc>> {
        self.reference_time
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a built series; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, instant: &DateTime<Utc>) -> Option<f64> {
        self.values.get(instant).copied()
    }

    pub fn first(&self) -> Option<(DateTime<Utc>, f64)> {
        self.values.iter().next().map(|(t, v)| (*t, *v))
    }

    pub fn last(&self) -> Option<(DateTime<Utc>, f64)> {
        self.values.iter().next_back().map(|(t, v)| (*t, *v))
    }

    /// Iterate in ascending instant order.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.values.iter().map(|(t, v)| (*t, *v))
    }

    pub fn instants(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.values.keys().copied()
    }

    /// A new series with one value inserted or replaced.
    pub fn with_value(&self, instant: DateTime<Utc>, value: f64) -> Result<TimeSeries, SeriesError> {
        self.to_builder().insert(instant, value).build()
    }

    /// A builder seeded with this series' contents.
    pub fn to_builder(&self) -> TimeSeriesBuilder {
        TimeSeriesBuilder {
            kind: self.kind,
            reference_time: self.reference_time,
            values: self.values.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = (&'a DateTime<Utc>, &'a f64);
    type IntoIter = std::collections::btree_map::Iter<'a, DateTime<Utc>, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Accumulates points for a [`TimeSeries`].
///
/// Inserting an instant twice keeps the later value.
#[derive(Debug, Clone)]
pub struct TimeSeriesBuilder {
    kind: ParameterKind,
    reference_time: Option<DateTime<Utc>>,
    values: BTreeMap<DateTime<Utc>, f64>,
}

impl TimeSeriesBuilder {
    pub fn new(kind: ParameterKind) -> Self {
        Self {
            kind,
            reference_time: None,
            values: BTreeMap::new(),
        }
    }

    /// Mark the series as a forecast produced at `reference`.
    pub fn reference_time(mut self, reference: DateTime<Utc>) -> Self {
        self.reference_time = Some(reference);
        self
    }

    pub fn insert(mut self, instant: DateTime<Utc>, value: f64) -> Self {
        self.push(instant, value);
        self
    }

    /// In-place variant of [`insert`](Self::insert) for loops.
    pub fn push(&mut self, instant: DateTime<Utc>, value: f64) {
        self.values.insert(instant, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Validate and freeze the series.
    pub fn build(self) -> Result<TimeSeries, SeriesError> {
        if self.values.is_empty() {
            return Err(SeriesError::Empty(self.kind));
        }

        if let Some(reference) = self.reference_time {
            // BTreeMap keys are sorted; only the first can be the earliest
            if let Some(first) = self.values.keys().next() {
                if *first < reference {
                    return Err(SeriesError::BeforeReference {
                        instant: *first,
                        reference,
                    });
                }
            }
        }

        for (instant, value) in &self.values {
            self.kind
                .checked(*value)
                .map_err(|source| SeriesError::OutOfRange {
                    instant: *instant,
                    source,
                })?;
        }

        Ok(TimeSeries {
            kind: self.kind,
            reference_time: self.reference_time,
            values: self.values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_duplicate_instant_last_write_wins() {
        let series = TimeSeries::builder(ParameterKind::AirTemperature)
            .insert(t0(), 1.0)
            .insert(t0(), 2.0)
            .build()
            .unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.get(&t0()), Some(2.0));
    }

    #[test]
    fn test_ordering_independent_of_insertion() {
        let series = TimeSeries::builder(ParameterKind::DewPoint)
            .insert(t0() + Duration::hours(2), 3.0)
            .insert(t0(), 1.0)
            .insert(t0() + Duration::hours(1), 2.0)
            .build()
            .unwrap();
        let values: Vec<f64> = series.iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
        assert_eq!(series.first().map(|(t, _)| t), Some(t0()));
        assert_eq!(series.last().map(|(_, v)| v), Some(3.0));
    }

    #[test]
    fn test_empty_rejected() {
        let err = TimeSeries::builder(ParameterKind::WindSpeed).build().unwrap_err();
        assert_eq!(err, SeriesError::Empty(ParameterKind::WindSpeed));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = TimeSeries::builder(ParameterKind::CloudCover)
            .insert(t0(), 120.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, SeriesError::OutOfRange { instant, .. } if instant == t0()));
    }

    #[test]
    fn test_forecast_before_reference_rejected() {
        let err = TimeSeries::builder(ParameterKind::RainAmount)
            .reference_time(t0())
            .insert(t0() - Duration::minutes(1), 0.0)
            .insert(t0(), 0.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, SeriesError::BeforeReference { .. }));
    }

    #[test]
    fn test_with_value_returns_new_series() {
        let original = TimeSeries::builder(ParameterKind::AirTemperature)
            .insert(t0(), 1.0)
            .build()
            .unwrap();
        let updated = original.with_value(t0(), 5.0).unwrap();
        assert_eq!(original.get(&t0()), Some(1.0));
        assert_eq!(updated.get(&t0()), Some(5.0));
    }
}
