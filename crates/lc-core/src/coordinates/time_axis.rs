//! Time coordinate system for light-curve tables

use tracing::debug;

use super::{interp, Coordinates};
use crate::{CoreError, Result, Time, TimeUnit};

/// A one-dimensional coordinate system backed by absolute timestamps
///
/// World values are times relative to `reference_time`, expressed in `unit`.
/// Pixel values are fractional row indices. Both directions are exact linear
/// interpolation over the sampled times and never extrapolate past the data.
#[derive(Debug, Clone)]
pub struct TimeAxis {
    /// Absolute timestamps, one per row
    times: Vec<Time>,
    /// Origin of the relative axis
    reference_time: Time,
    /// Unit of the relative values
    unit: TimeUnit,
    /// `times - reference_time` in `unit`
    values: Vec<f64>,
    /// Row positions 0..n-1
    index: Vec<f64>,
}

impl TimeAxis {
    /// Create an axis in days relative to the first timestamp
    pub fn new(times: Vec<Time>) -> Result<Self> {
        Self::with_reference(times, None, TimeUnit::Day)
    }

    /// Create an axis with an explicit origin and unit
    ///
    /// `reference_time` defaults to the first timestamp. All timestamps, and
    /// the reference, must be finite. Timestamps on another scale than the
    /// reference are converted before taking the difference.
    pub fn with_reference(
        times: Vec<Time>,
        reference_time: Option<Time>,
        unit: TimeUnit,
    ) -> Result<Self> {
        let first = *times.first().ok_or_else(|| {
            CoreError::InvalidInput("time axis requires at least one timestamp".to_string())
        })?;
        let reference_time = reference_time.unwrap_or(first);

        if !reference_time.is_finite() {
            return Err(CoreError::InvalidInput(format!(
                "reference time {} is not finite",
                reference_time
            )));
        }

        let mut values = Vec::with_capacity(times.len());
        for (row, time) in times.iter().enumerate() {
            if !time.is_finite() {
                return Err(CoreError::InvalidInput(format!(
                    "timestamp at row {} is not finite",
                    row
                )));
            }
            let days = time.days_since(&reference_time);
            values.push(unit.from_days(days));
        }

        let index = (0..times.len()).map(|i| i as f64).collect();

        debug!(
            "Built time axis with {} samples relative to {} in {}",
            times.len(),
            reference_time,
            unit
        );

        Ok(Self {
            times,
            reference_time,
            unit,
            values,
            index,
        })
    }

    /// Number of samples on the axis
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false; an axis cannot be constructed empty
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// The absolute timestamps this axis was built from
    pub fn time_axis(&self) -> &[Time] {
        &self.times
    }

    pub fn reference_time(&self) -> Time {
        self.reference_time
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Relative world values, aligned with `time_axis`
    pub fn relative_values(&self) -> &[f64] {
        &self.values
    }

    /// Row positions, aligned with `time_axis`
    pub fn index(&self) -> &[f64] {
        &self.index
    }

    /// Whether the timestamps are non-decreasing
    pub fn is_sorted(&self) -> bool {
        self.values.windows(2).all(|w| w[0] <= w[1])
    }

    /// Fractional row for a relative time, `None` outside the sampled span
    pub fn world_to_pixel(&self, world: f64) -> Option<f64> {
        interp(world, &self.values, &self.index)
    }

    /// Relative time for a fractional row, `None` outside `0..=n-1`
    pub fn pixel_to_world(&self, pixel: f64) -> Option<f64> {
        interp(pixel, &self.index, &self.values)
    }

    /// Fractional row for an absolute timestamp on any scale
    pub fn time_to_pixel(&self, time: &Time) -> Option<f64> {
        let days = time.days_since(&self.reference_time);
        if !days.is_finite() {
            return None;
        }
        self.world_to_pixel(self.unit.from_days(days))
    }

    fn single_axis<'a>(&self, values: &'a [&'a [f64]]) -> Result<&'a [f64]> {
        match values {
            [single] => Ok(*single),
            _ => Err(CoreError::InvalidInput(format!(
                "time axis is one-dimensional and only accepts a single scalar or array \
                 to convert, got {} arrays",
                values.len()
            ))),
        }
    }
}

impl Coordinates for TimeAxis {
    fn n_dim(&self) -> usize {
        1
    }

    fn world_axis_units(&self) -> Vec<String> {
        vec![self.unit.vounit().to_string()]
    }

    fn pixel_to_world_values(&self, pixel: &[&[f64]]) -> Result<Vec<f64>> {
        let pixel = self.single_axis(pixel)?;
        Ok(pixel
            .iter()
            .map(|&p| self.pixel_to_world(p).unwrap_or(f64::NAN))
            .collect())
    }

    fn world_to_pixel_values(&self, world: &[&[f64]]) -> Result<Vec<f64>> {
        let world = self.single_axis(world)?;
        Ok(world
            .iter()
            .map(|&w| self.world_to_pixel(w).unwrap_or(f64::NAN))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TimeScale;

    fn btjd(values: &[f64]) -> Vec<Time> {
        values.iter().map(|&v| Time::from_btjd(v)).collect()
    }

    #[test]
    fn test_axis_defaults_to_first_time() {
        let axis = TimeAxis::new(btjd(&[1000.0, 1000.5, 1002.0])).unwrap();
        assert_eq!(axis.reference_time(), Time::from_btjd(1000.0));
        assert_eq!(axis.relative_values(), &[0.0, 0.5, 2.0]);
        assert_eq!(axis.index(), &[0.0, 1.0, 2.0]);
        assert_eq!(axis.len(), 3);
        assert!(axis.is_sorted());
    }

    #[test]
    fn test_axis_explicit_reference_and_unit() {
        let axis = TimeAxis::with_reference(
            btjd(&[1000.0, 1001.0]),
            Some(Time::from_btjd(999.0)),
            TimeUnit::Hour,
        )
        .unwrap();
        assert_eq!(axis.relative_values(), &[24.0, 48.0]);
        assert_eq!(axis.world_axis_units(), vec!["h".to_string()]);
    }

    #[test]
    fn test_axis_rejects_bad_input() {
        assert!(matches!(TimeAxis::new(Vec::new()), Err(CoreError::InvalidInput(_))));

        let nan = vec![Time::from_btjd(1.0), Time::from_btjd(f64::NAN)];
        assert!(TimeAxis::new(nan).is_err());

        let nan_reference = TimeAxis::with_reference(
            btjd(&[1.0]),
            Some(Time::from_jd(f64::NAN, TimeScale::Utc)),
            TimeUnit::Day,
        );
        assert!(nan_reference.is_err());
    }

    #[test]
    fn test_axis_converts_other_scales() {
        // JD 2459000.5 UTC is 69.184 s later than JD 2459000.5 TDB
        let mixed = vec![Time::from_btjd(2000.0), Time::from_jd(2_459_000.5, TimeScale::Utc)];
        let axis = TimeAxis::with_reference(mixed, None, TimeUnit::Second).unwrap();
        assert_eq!(axis.reference_time(), Time::from_btjd(2000.0));
        assert_eq!(axis.relative_values()[0], 0.0);
        let expected = 43_200.0 + 69.184;
        assert!((axis.relative_values()[1] - expected).abs() < 0.05);

        // A UTC reference shifts every barycentric sample the other way
        let axis = TimeAxis::with_reference(
            btjd(&[2000.0, 2001.0]),
            Some(Time::from_jd(2_459_000.0, TimeScale::Utc)),
            TimeUnit::Second,
        )
        .unwrap();
        assert!((axis.relative_values()[0] + 69.184).abs() < 0.05);
        assert!((axis.relative_values()[1] - (86_400.0 - 69.184)).abs() < 0.05);
    }

    #[test]
    fn test_time_to_pixel_across_scales() {
        let axis = TimeAxis::new(btjd(&[2000.0, 2001.0, 2003.0])).unwrap();

        let same_instant = Time::from_btjd(2001.0).to_scale(TimeScale::Utc);
        assert_eq!(same_instant.scale(), TimeScale::Utc);
        assert!((axis.time_to_pixel(&same_instant).unwrap() - 1.0).abs() < 1e-8);

        // Noon UTC two days on is 69.184 s past two TDB days
        let utc = Time::from_jd(2_459_002.0, TimeScale::Utc);
        let days = 2.0 + 69.184 / 86_400.0;
        let expected = 1.0 + (days - 1.0) / 2.0;
        assert!((axis.time_to_pixel(&utc).unwrap() - expected).abs() < 1e-6);

        assert_eq!(axis.time_to_pixel(&Time::from_jd(f64::NAN, TimeScale::Utc)), None);
        assert_eq!(axis.time_to_pixel(&Time::from_jd(2_458_000.0, TimeScale::Tt)), None);
    }

    #[test]
    fn test_pixel_world_round_trip() {
        let axis = TimeAxis::new(btjd(&[1000.0, 1000.02, 1000.1, 1003.7, 1003.75])).unwrap();
        for i in 0..axis.len() {
            let pixel = i as f64;
            let world = axis.pixel_to_world(pixel).unwrap();
            assert_eq!(axis.world_to_pixel(world), Some(pixel));
        }
    }

    #[test]
    fn test_interpolates_between_samples() {
        let axis = TimeAxis::new(btjd(&[0.0, 1.0, 3.0])).unwrap();
        assert_eq!(axis.world_to_pixel(2.0), Some(1.5));
        assert_eq!(axis.pixel_to_world(0.5), Some(0.5));
        assert_eq!(axis.time_to_pixel(&Time::from_btjd(2.0)), Some(1.5));
    }

    #[test]
    fn test_out_of_range_is_undefined() {
        let axis = TimeAxis::new(btjd(&[0.0, 1.0, 3.0])).unwrap();
        assert_eq!(axis.world_to_pixel(-0.001), None);
        assert_eq!(axis.world_to_pixel(3.5), None);
        assert_eq!(axis.pixel_to_world(2.0), Some(3.0));
        assert_eq!(axis.pixel_to_world(2.5), None);
        assert_eq!(axis.pixel_to_world(-1.0), None);
        assert_eq!(axis.pixel_to_world(3.0), None);
    }

    #[test]
    fn test_vectorized_conversions() {
        let axis = TimeAxis::new(btjd(&[0.0, 1.0, 3.0])).unwrap();
        let pixels = axis.world_to_pixel_values(&[&[0.0, 2.0, 9.0]]).unwrap();
        assert_eq!(pixels[0], 0.0);
        assert_eq!(pixels[1], 1.5);
        assert!(pixels[2].is_nan());

        let world = axis.pixel_to_world_values(&[&[1.0]]).unwrap();
        assert_eq!(world, vec![1.0]);
    }

    #[test]
    fn test_rejects_multiple_axes() {
        let axis = TimeAxis::new(btjd(&[0.0, 1.0])).unwrap();
        let result = axis.world_to_pixel_values(&[&[0.0], &[1.0]]);
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
        assert!(axis.pixel_to_world_values(&[]).is_err());
    }
}
