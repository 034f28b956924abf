//! Low-precision solar ephemeris (NOAA / Meeus ch. 25)
//!
//! Good to about 0.01° in longitude for dates within a few centuries of
//! J2000, which is far finer than a 10° decan or a one-minute hour edge.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Julian Day of the Unix epoch
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian Day of J2000.0
const J2000_JD: f64 = 2_451_545.0;

const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Julian Day (UT) of an instant
pub fn julian_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> f64 {
    instant.timestamp_millis() as f64 / 86_400_000.0 + UNIX_EPOCH_JD
}

/// Julian centuries since J2000.0
pub fn julian_century(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

/// Sun's position at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarPosition {
    /// Apparent tropical ecliptic longitude, degrees `[0, 360)`
    pub longitude: f64,
    /// Declination, degrees
    pub declination: f64,
    /// Equation of time, minutes (apparent minus mean solar time)
    pub equation_of_time: f64,
}

impl SolarPosition {
    pub fn at_jd(jd: f64) -> Self {
        let t = julian_century(jd);

        let l0 = (280.466_46 + t * (36_000.769_83 + t * 0.000_303_2)).rem_euclid(360.0);
        let m = 357.529_11 + t * (35_999.050_29 - t * 0.000_153_7);
        let e = 0.016_708_634 - t * (0.000_042_037 + t * 0.000_000_126_7);

        let m_rad = m.to_radians();
        let center = m_rad.sin() * (1.914_602 - t * (0.004_817 + t * 0.000_014))
            + (2.0 * m_rad).sin() * (0.019_993 - t * 0.000_101)
            + (3.0 * m_rad).sin() * 0.000_289;

        let true_longitude = l0 + center;
        let omega = (125.04 - 1_934.136 * t).to_radians();
        let apparent = true_longitude - 0.005_69 - 0.004_78 * omega.sin();

        let mean_obliquity =
            23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.000_59 - t * 0.001_813))) / 60.0) / 60.0;
        let obliquity = (mean_obliquity + 0.002_56 * omega.cos()).to_radians();

        let declination = (obliquity.sin() * apparent.to_radians().sin()).asin();

        let y = (obliquity / 2.0).tan().powi(2);
        let l0_rad = l0.to_radians();
        let eot_rad = y * (2.0 * l0_rad).sin() - 2.0 * e * m_rad.sin()
            + 4.0 * e * y * m_rad.sin() * (2.0 * l0_rad).cos()
            - 0.5 * y * y * (4.0 * l0_rad).sin()
            - 1.25 * e * e * (2.0 * m_rad).sin();

        Self {
            longitude: apparent.rem_euclid(360.0),
            declination: declination.to_degrees(),
            equation_of_time: 4.0 * eot_rad.to_degrees(),
        }
    }

    pub fn at<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::at_jd(julian_day(instant))
    }
}

/// Sun's apparent ecliptic longitude at an instant, degrees `[0, 360)`
pub fn solar_longitude<Tz: TimeZone>(instant: &DateTime<Tz>) -> f64 {
    SolarPosition::at(instant).longitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn angular_gap(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn test_julian_day_epochs() {
        assert!((julian_day(&utc(2000, 1, 1, 12, 0)) - J2000_JD).abs() < 1e-9);
        assert!((julian_day(&utc(1970, 1, 1, 0, 0)) - UNIX_EPOCH_JD).abs() < 1e-9);
    }

    #[test]
    fn test_equinox_longitude() {
        // March equinox 2024: 03:06 UT
        let lon = solar_longitude(&utc(2024, 3, 20, 3, 6));
        assert!(angular_gap(lon, 0.0) < 0.05, "lon = {}", lon);
    }

    #[test]
    fn test_solstice_longitude() {
        // June solstice 2024: 20:51 UT
        let pos = SolarPosition::at(&utc(2024, 6, 20, 20, 51));
        assert!(angular_gap(pos.longitude, 90.0) < 0.05, "lon = {}", pos.longitude);
        assert!((pos.declination - 23.44).abs() < 0.05);
    }

    #[test]
    fn test_equation_of_time_extremes() {
        // early November: sundial ~16.4 min fast
        let nov = SolarPosition::at(&utc(2024, 11, 3, 12, 0));
        assert!((nov.equation_of_time - 16.4).abs() < 0.5);
        // mid February: ~14.2 min slow
        let feb = SolarPosition::at(&utc(2024, 2, 11, 12, 0));
        assert!((feb.equation_of_time + 14.2).abs() < 0.5);
    }
}
