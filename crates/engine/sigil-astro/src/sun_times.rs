//! Sunrise and sunset
//!
//! The NOAA hour-angle method: the Sun is "up" when its centre is 0.833°
//! below the geometric horizon (34' refraction plus 16' semi-diameter).
//! Each event is refined by recomputing the solar position at the previous
//! estimate of the event itself.

use crate::solar::{julian_day, SolarPosition};
use crate::GeoLocation;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sigil_core::{Error, Result};
use std::cmp::Ordering;

/// Zenith distance of the Sun's centre at rise/set, degrees
pub const SUNRISE_ZENITH_DEG: f64 = 90.833;

const REFINEMENT_PASSES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Rise,
    Set,
}

/// Sunrise and sunset for one civil date at one place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunTimes {
    pub date: NaiveDate,
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
}

impl SunTimes {
    /// Compute rise and set for `date` (local civil date) at `location`
    ///
    /// Times are reported in `offset`. Fails when the Sun does not cross the
    /// horizon that day (polar day or polar night).
    pub fn compute(date: NaiveDate, location: &GeoLocation, offset: FixedOffset) -> Result<Self> {
        location.validate()?;

        // start from the UT date of local noon; the offset may be far from
        // solar time, so step until the sunrise lands on `date`
        let local_noon = date.and_time(NaiveTime::MIN) + Duration::hours(12);
        let mut base = (local_noon - Duration::seconds(offset.local_minus_utc() as i64)).date();
        for _ in 0..3 {
            let sunrise = event_time(base, location, Event::Rise)?.with_timezone(&offset);
            match sunrise.date_naive().cmp(&date) {
                Ordering::Greater => base = step(base, NaiveDate::pred_opt)?,
                Ordering::Less => base = step(base, NaiveDate::succ_opt)?,
                Ordering::Equal => {
                    // same solar day, so the set always follows the rise
                    let sunset =
                        event_time(base, location, Event::Set)?.with_timezone(&offset);
                    return Ok(Self {
                        date: sunrise.date_naive(),
                        sunrise,
                        sunset,
                    });
                }
            }
        }

        Err(Error::LocationOrTimeInvalid(format!(
            "no sunrise on local date {} at {:.4},{:.4}",
            date, location.latitude, location.longitude
        )))
    }

    pub fn day_length(&self) -> Duration {
        self.sunset - self.sunrise
    }
}

fn step(date: NaiveDate, next: fn(&NaiveDate) -> Option<NaiveDate>) -> Result<NaiveDate> {
    next(&date)
        .ok_or_else(|| Error::LocationOrTimeInvalid(format!("date out of range near {}", date)))
}

/// Rise or set around the mean solar noon of UT date `date`
fn event_time(date: NaiveDate, location: &GeoLocation, event: Event) -> Result<DateTime<Utc>> {
    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let midnight_jd = julian_day(&midnight);
    let phi = location.latitude.to_radians();

    // start from mean solar noon
    let mut minutes = 720.0 - 4.0 * location.longitude;
    for _ in 0..REFINEMENT_PASSES {
        let pos = SolarPosition::at_jd(midnight_jd + minutes / 1_440.0);
        let delta = pos.declination.to_radians();

        let cos_h = (SUNRISE_ZENITH_DEG.to_radians().cos() - phi.sin() * delta.sin())
            / (phi.cos() * delta.cos());
        if !cos_h.is_finite() || cos_h.abs() > 1.0 {
            let state = if cos_h > 1.0 { "polar night" } else { "polar day" };
            return Err(Error::LocationOrTimeInvalid(format!(
                "no {} on {} at {:.4},{:.4} ({})",
                match event {
                    Event::Rise => "sunrise",
                    Event::Set => "sunset",
                },
                date,
                location.latitude,
                location.longitude,
                state
            )));
        }

        let hour_angle = cos_h.acos().to_degrees();
        let signed = match event {
            Event::Rise => hour_angle,
            Event::Set => -hour_angle,
        };
        minutes = 720.0 - 4.0 * (location.longitude + signed) - pos.equation_of_time;
    }

    Ok(midnight + Duration::milliseconds((minutes * 60_000.0).round() as i64))
}
