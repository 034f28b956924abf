//! Planetary hours
//!
//! ```text
//!   sunrise          sunset                 next sunrise
//!     │ 1  2 ... 12    │ 13 14 ...        24  │
//!     └── day / 12 ────┴──── night / 12 ──────┘
//! ```
//!
//! The planetary day starts at sunrise and is ruled by the planet of its
//! weekday. Each following hour passes to the next planet in Chaldean order,
//! so the 25th hour lands on the next weekday's ruler.

use crate::sun_times::SunTimes;
use crate::GeoLocation;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use sigil_core::{Error, Planet, Result};

/// Planetary hours per day (12 day + 12 night)
pub const HOURS_PER_DAY: u8 = 24;

const HOURS_PER_HALF: u8 = 12;

/// One of the 24 unequal hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetaryHour {
    /// 0..=23, counted from sunrise
    pub index: u8,
    pub ruler: Planet,
    pub is_day: bool,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// A full planetary day, sunrise to next sunrise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetaryDay {
    /// Civil date of the opening sunrise
    pub date: NaiveDate,
    pub day_ruler: Planet,
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
    pub next_sunrise: DateTime<FixedOffset>,
    pub hours: Vec<PlanetaryHour>,
}

impl PlanetaryDay {
    /// The planetary day opened by the sunrise of `date`
    pub fn for_date(date: NaiveDate, location: &GeoLocation, offset: FixedOffset) -> Result<Self> {
        let today = SunTimes::compute(date, location, offset)?;
        let next_date = date
            .succ_opt()
            .ok_or_else(|| Error::LocationOrTimeInvalid(format!("no day after {}", date)))?;
        let tomorrow = SunTimes::compute(next_date, location, offset)?;
        Ok(Self::from_sun_times(&today, tomorrow.sunrise))
    }

    /// Lay out the 24 hours between precomputed boundaries
    pub fn from_sun_times(today: &SunTimes, next_sunrise: DateTime<FixedOffset>) -> Self {
        // the weekday of the opening sunrise, in the caller's offset
        let day_ruler = Planet::of_weekday(today.sunrise.date_naive().weekday());
        let day_hour = (today.sunset - today.sunrise) / HOURS_PER_HALF as i32;
        let night_hour = (next_sunrise - today.sunset) / HOURS_PER_HALF as i32;

        let hours = (0..HOURS_PER_DAY)
            .map(|index| {
                let is_day = index < HOURS_PER_HALF;
                let (base, length, k) = if is_day {
                    (today.sunrise, day_hour, index)
                } else {
                    (today.sunset, night_hour, index - HOURS_PER_HALF)
                };
                let start = base + length * k as i32;
                let end = match index {
                    i if i == HOURS_PER_HALF - 1 => today.sunset,
                    i if i == HOURS_PER_DAY - 1 => next_sunrise,
                    _ => start + length,
                };
                PlanetaryHour {
                    index,
                    ruler: day_ruler.advance(index as u32),
                    is_day,
                    start,
                    end,
                }
            })
            .collect();

        Self {
            date: today.sunrise.date_naive(),
            day_ruler,
            sunrise: today.sunrise,
            sunset: today.sunset,
            next_sunrise,
            hours,
        }
    }

    /// The planetary day containing `instant`
    ///
    /// A moment before the local sunrise belongs to the previous day's night.
    pub fn containing(instant: &DateTime<FixedOffset>, location: &GeoLocation) -> Result<Self> {
        let offset = *instant.offset();
        let mut date = instant.date_naive();

        // the civil date of the instant is at most one day off the planetary one
        for _ in 0..3 {
            let day = Self::for_date(date, location, offset)?;
            if *instant < day.sunrise {
                date = date
                    .pred_opt()
                    .ok_or_else(|| Error::LocationOrTimeInvalid(format!("no day before {}", date)))?;
            } else if *instant >= day.next_sunrise {
                date = date
                    .succ_opt()
                    .ok_or_else(|| Error::LocationOrTimeInvalid(format!("no day after {}", date)))?;
            } else {
                return Ok(day);
            }
        }

        Err(Error::LocationOrTimeInvalid(format!(
            "could not place {} inside a planetary day",
            instant
        )))
    }

    /// The hour containing `instant`, if it falls inside this day
    pub fn hour_at(&self, instant: &DateTime<FixedOffset>) -> Option<&PlanetaryHour> {
        if *instant < self.sunrise || *instant >= self.next_sunrise {
            return None;
        }
        let (base, span, first) = if *instant < self.sunset {
            (self.sunrise, self.sunset - self.sunrise, 0)
        } else {
            (self.sunset, self.next_sunrise - self.sunset, HOURS_PER_HALF)
        };
        let fraction = fraction_of(*instant - base, span);
        let k = ((fraction * HOURS_PER_HALF as f64).floor() as u8).min(HOURS_PER_HALF - 1);
        self.hours.get((first + k) as usize)
    }

    pub fn day_length(&self) -> Duration {
        self.sunset - self.sunrise
    }

    pub fn night_length(&self) -> Duration {
        self.next_sunrise - self.sunset
    }
}

fn fraction_of(elapsed: Duration, span: Duration) -> f64 {
    let span_ms = span.num_milliseconds();
    if span_ms <= 0 {
        return 0.0;
    }
    elapsed.num_milliseconds() as f64 / span_ms as f64
}
