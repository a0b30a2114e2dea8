//! Absolute timestamps and relative time units
//!
//! Absolute times are Julian dates tagged with the time scale they were
//! measured in, backed by a `hifitime::Epoch` so that differences between
//! times on different scales account for leap seconds and the TT/TDB offsets.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use hifitime::{Duration, Epoch};
use serde::{Deserialize, Serialize};

use crate::{CoreError, Result};

/// JD - MJD
const MJD_OFFSET: f64 = 2_400_000.5;
/// JD - BTJD (TESS)
const BTJD_OFFSET: f64 = 2_457_000.0;
/// JD - BKJD (Kepler)
const BKJD_OFFSET: f64 = 2_454_833.0;
/// TT - TAI
const TT_MINUS_TAI_SECONDS: f64 = 32.184;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Time scale an absolute timestamp is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeScale {
    /// Barycentric dynamical time (mission light curves)
    Tdb,
    /// Terrestrial time
    Tt,
    /// Coordinated universal time
    Utc,
}

impl TimeScale {
    /// The instant at which a clock on this scale reads `jd`
    fn epoch(&self, jd: f64) -> Option<Epoch> {
        if !jd.is_finite() {
            return None;
        }
        Some(match self {
            TimeScale::Tdb => Epoch::from_jde_tdb(jd),
            TimeScale::Tt => Epoch::from_jde_tai(jd) - Duration::from_seconds(TT_MINUS_TAI_SECONDS),
            TimeScale::Utc => Epoch::from_jde_utc(jd),
        })
    }

    /// Julian date read on this scale at `epoch`
    fn julian_date(&self, epoch: Epoch) -> f64 {
        match self {
            TimeScale::Tdb => epoch.to_jde_tdb_days(),
            TimeScale::Tt => {
                (epoch + Duration::from_seconds(TT_MINUS_TAI_SECONDS)).to_jde_tai_days()
            }
            TimeScale::Utc => epoch.to_jde_utc_days(),
        }
    }
}

impl fmt::Display for TimeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeScale::Tdb => "tdb",
            TimeScale::Tt => "tt",
            TimeScale::Utc => "utc",
        };
        f.write_str(name)
    }
}

/// Stored form of a [`Time`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct JulianDate {
    jd: f64,
    scale: TimeScale,
}

impl From<JulianDate> for Time {
    fn from(date: JulianDate) -> Self {
        Time::from_jd(date.jd, date.scale)
    }
}

impl From<Time> for JulianDate {
    fn from(time: Time) -> Self {
        JulianDate {
            jd: time.jd,
            scale: time.scale,
        }
    }
}

/// An absolute timestamp
///
/// The Julian date is kept exactly as given on its own scale; the epoch is
/// only consulted when comparing against another scale. Non-finite dates
/// have no epoch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "JulianDate", into = "JulianDate")]
pub struct Time {
    jd: f64,
    scale: TimeScale,
    epoch: Option<Epoch>,
}

impl Time {
    /// Create a time from a Julian date
    pub fn from_jd(jd: f64, scale: TimeScale) -> Self {
        Self {
            jd,
            scale,
            epoch: scale.epoch(jd),
        }
    }

    /// Create a time from a modified Julian date
    pub fn from_mjd(mjd: f64, scale: TimeScale) -> Self {
        Self::from_jd(mjd + MJD_OFFSET, scale)
    }

    /// Create a time from a TESS barycentric Julian date
    pub fn from_btjd(btjd: f64) -> Self {
        Self::from_jd(btjd + BTJD_OFFSET, TimeScale::Tdb)
    }

    /// Create a time from a Kepler barycentric Julian date
    pub fn from_bkjd(bkjd: f64) -> Self {
        Self::from_jd(bkjd + BKJD_OFFSET, TimeScale::Tdb)
    }

    /// Read an epoch on the given scale
    pub fn from_epoch(epoch: Epoch, scale: TimeScale) -> Self {
        Self {
            jd: scale.julian_date(epoch),
            scale,
            epoch: Some(epoch),
        }
    }

    /// Create a UTC time from a calendar timestamp
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        let seconds =
            datetime.timestamp() as f64 + datetime.timestamp_subsec_nanos() as f64 * 1e-9;
        Self::from_epoch(Epoch::from_unix_seconds(seconds), TimeScale::Utc)
    }

    /// Calendar representation, `None` if the date is outside chrono's range
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let seconds = self.epoch?.to_unix_seconds();
        if !seconds.is_finite() {
            return None;
        }
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(whole as i64, nanos)
    }

    /// The same instant read on another scale
    pub fn to_scale(&self, scale: TimeScale) -> Self {
        match self.epoch {
            Some(epoch) if scale != self.scale => Self::from_epoch(epoch, scale),
            _ => *self,
        }
    }

    pub fn jd(&self) -> f64 {
        self.jd
    }

    pub fn mjd(&self) -> f64 {
        self.jd - MJD_OFFSET
    }

    pub fn scale(&self) -> TimeScale {
        self.scale
    }

    pub fn epoch(&self) -> Option<Epoch> {
        self.epoch
    }

    pub fn is_finite(&self) -> bool {
        self.jd.is_finite()
    }

    /// Signed difference `self - other` in days
    ///
    /// Times on one scale subtract their Julian dates directly. Otherwise both
    /// are converted to epochs first. NaN if either time is not finite.
    pub fn days_since(&self, other: &Time) -> f64 {
        if self.scale == other.scale {
            return self.jd - other.jd;
        }
        match (self.epoch, other.epoch) {
            (Some(a), Some(b)) => (a - b).to_seconds() / SECONDS_PER_DAY,
            _ => f64::NAN,
        }
    }

    /// Shift by a number of days on the same scale
    pub fn add_days(&self, days: f64) -> Self {
        Self::from_jd(self.jd + days, self.scale)
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.jd == other.jd && self.scale == other.scale
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JD {} ({})", self.jd, self.scale)
    }
}

/// Unit of the relative time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    /// Number of this unit in one day
    pub fn per_day(&self) -> f64 {
        match self {
            TimeUnit::Day => 1.0,
            TimeUnit::Hour => 24.0,
            TimeUnit::Minute => 1_440.0,
            TimeUnit::Second => SECONDS_PER_DAY,
        }
    }

    /// Convert a span in days into this unit
    pub fn from_days(&self, days: f64) -> f64 {
        days * self.per_day()
    }

    /// Convert a span in this unit into days
    pub fn to_days(&self, value: f64) -> f64 {
        value / self.per_day()
    }

    /// IVOA unit string
    pub fn vounit(&self) -> &'static str {
        match self {
            TimeUnit::Day => "d",
            TimeUnit::Hour => "h",
            TimeUnit::Minute => "min",
            TimeUnit::Second => "s",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.vounit())
    }
}

impl FromStr for TimeUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "d" | "day" | "days" => Ok(TimeUnit::Day),
            "h" | "hr" | "hour" | "hours" => Ok(TimeUnit::Hour),
            "min" | "minute" | "minutes" => Ok(TimeUnit::Minute),
            "s" | "sec" | "second" | "seconds" => Ok(TimeUnit::Second),
            other => Err(CoreError::InvalidInput(format!("unknown time unit '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_mission_offsets() {
        assert_eq!(Time::from_btjd(1000.0).jd(), 2_458_000.0);
        assert_eq!(Time::from_bkjd(100.0).jd(), 2_454_933.0);
        assert_eq!(Time::from_mjd(0.0, TimeScale::Utc).jd(), 2_400_000.5);
        assert_eq!(Time::from_btjd(1000.0).scale(), TimeScale::Tdb);
    }

    #[test]
    fn test_datetime_conversion() {
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        let time = Time::from_datetime(epoch);
        assert!((time.jd() - 2_440_587.5).abs() < 1e-9);
        assert_eq!(time.scale(), TimeScale::Utc);
        let back = time.to_datetime().unwrap();
        assert!((back - epoch).num_milliseconds().abs() < 1);

        let later = Utc.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).unwrap();
        let back = Time::from_datetime(later).to_datetime().unwrap();
        assert!((back - later).num_milliseconds().abs() < 1);

        assert_eq!(Time::from_btjd(f64::NAN).to_datetime(), None);
    }

    #[test]
    fn test_barycentric_datetime_accounts_for_leap_seconds() {
        // BTJD 2000.0 is 2020-05-31T12:00:00 TDB, 69.184 s ahead of UTC
        let noon = Utc.with_ymd_and_hms(2020, 5, 31, 12, 0, 0).unwrap();
        let utc = Time::from_btjd(2000.0).to_datetime().unwrap();
        let offset = (noon - utc).num_milliseconds() as f64 / 1000.0;
        assert!((offset - 69.184).abs() < 0.05, "offset {}", offset);
    }

    #[test]
    fn test_days_since_converts_scales() {
        let a = Time::from_jd(10.0, TimeScale::Tdb);
        let b = Time::from_jd(7.5, TimeScale::Tdb);
        assert_eq!(a.days_since(&b), 2.5);

        // TDB runs 37 leap seconds plus 32.184 s ahead of UTC in 2020
        let tdb = Time::from_btjd(2000.0);
        let utc = Time::from_jd(2_459_000.0, TimeScale::Utc);
        let seconds = tdb.days_since(&utc) * SECONDS_PER_DAY;
        assert!((seconds + 69.184).abs() < 0.05, "difference {}", seconds);
        assert!((utc.days_since(&tdb) * SECONDS_PER_DAY - 69.184).abs() < 0.05);

        // TT and TDB differ by at most a couple of milliseconds
        let tt = Time::from_jd(2_459_000.0, TimeScale::Tt);
        assert!((tt.days_since(&tdb) * SECONDS_PER_DAY).abs() < 0.01);

        assert!(Time::from_btjd(f64::NAN).days_since(&utc).is_nan());
    }

    #[test]
    fn test_to_scale_keeps_the_instant() {
        let tdb = Time::from_btjd(2000.0);
        let utc = tdb.to_scale(TimeScale::Utc);
        assert_eq!(utc.scale(), TimeScale::Utc);
        assert!(((tdb.jd() - utc.jd()) * SECONDS_PER_DAY - 69.184).abs() < 0.05);
        assert!((utc.days_since(&tdb) * SECONDS_PER_DAY).abs() < 1e-3);
        assert_eq!(tdb.to_scale(TimeScale::Tdb), tdb);
    }

    #[test]
    fn test_time_unit_conversion() {
        assert_eq!(TimeUnit::Hour.from_days(1.5), 36.0);
        assert_eq!(TimeUnit::Second.to_days(43_200.0), 0.5);
        assert_eq!("min".parse::<TimeUnit>(), Ok(TimeUnit::Minute));
        assert!("fortnight".parse::<TimeUnit>().is_err());
        assert_eq!(TimeUnit::default().vounit(), "d");
    }

    #[test]
    fn test_json_form() {
        let time = Time::from_btjd(1.5);
        let json = serde_json::to_value(time).unwrap();
        assert_eq!(json, serde_json::json!({"jd": 2_457_001.5, "scale": "tdb"}));
        assert_eq!(serde_json::from_value::<Time>(json).unwrap(), time);
    }
}
