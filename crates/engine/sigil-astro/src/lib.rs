//! # Sigil Astro
//!
//! Resolves which planets rule a given moment at a given place:
//!
//! ```text
//!   (instant, lat/lon)
//!        │
//!        ├──► SunTimes ──► PlanetaryDay ──► hour ruler   (weekday + Chaldean order)
//!        │
//!        └──► SolarPosition ──► longitude ──► decan ruler (36-face table)
//! ```
//!
//! Everything here is a pure function of its inputs. [`RulerCache`] memoizes
//! resolutions for callers that ask about the same moment repeatedly, keeping
//! at most a fixed number of them.

pub mod decan;
pub mod hours;
pub mod solar;
pub mod sun_times;

pub use decan::{decan_of, Decan, DECAN_COUNT};
pub use hours::{PlanetaryDay, PlanetaryHour, HOURS_PER_DAY};
pub use solar::{julian_day, solar_longitude, SolarPosition};
pub use sun_times::SunTimes;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use sigil_core::{Error, Planet, Result, ZodiacSign};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Geographic position, degrees (north and east positive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || self.latitude.abs() > 90.0 {
            return Err(Error::LocationOrTimeInvalid(format!(
                "latitude {} outside -90..=90",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || self.longitude.abs() > 180.0 {
            return Err(Error::LocationOrTimeInvalid(format!(
                "longitude {} outside -180..=180",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// Rulers in force at one instant and place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulerAssignment {
    pub hour_ruler: Planet,
    pub decan_ruler: Planet,
    /// 0..=35
    pub decan_index: u8,
    /// 0..=23 from sunrise
    pub hour_index: u8,
    pub is_day: bool,
    pub day_ruler: Planet,
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
    /// Sun's apparent ecliptic longitude, degrees
    pub solar_longitude: f64,
    pub sign: ZodiacSign,
}

/// Resolve the planetary-hour and decan rulers
pub fn resolve(instant: &DateTime<FixedOffset>, location: &GeoLocation) -> Result<RulerAssignment> {
    let (assignment, _) = resolve_with_day(instant, location)?;
    Ok(assignment)
}

/// Like [`resolve`], also returning the full planetary day
pub fn resolve_with_day(
    instant: &DateTime<FixedOffset>,
    location: &GeoLocation,
) -> Result<(RulerAssignment, PlanetaryDay)> {
    location.validate()?;

    let day = PlanetaryDay::containing(instant, location)?;
    let hour = *day.hour_at(instant).ok_or_else(|| {
        Error::LocationOrTimeInvalid(format!("{} falls outside its planetary day", instant))
    })?;

    let longitude = solar_longitude(instant);
    let decan = decan_of(longitude);

    tracing::debug!(
        %instant,
        hour = hour.index,
        hour_ruler = %hour.ruler,
        decan = decan.index,
        decan_ruler = %decan.ruler,
        "resolved rulers"
    );

    let assignment = RulerAssignment {
        hour_ruler: hour.ruler,
        decan_ruler: decan.ruler,
        decan_index: decan.index,
        hour_index: hour.index,
        is_day: hour.is_day,
        day_ruler: day.day_ruler,
        sunrise: day.sunrise,
        sunset: day.sunset,
        solar_longitude: longitude,
        sign: decan.sign,
    };
    Ok((assignment, day))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    millis: i64,
    offset_secs: i32,
    latitude_bits: u64,
    longitude_bits: u64,
}

impl CacheKey {
    fn new(instant: &DateTime<FixedOffset>, location: &GeoLocation) -> Self {
        Self {
            millis: instant.timestamp_millis(),
            offset_secs: instant.offset().local_minus_utc(),
            latitude_bits: location.latitude.to_bits(),
            longitude_bits: location.longitude.to_bits(),
        }
    }
}

/// Entries kept by [`RulerCache::new`]
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

#[derive(Debug, Default)]
struct CacheEntries {
    map: HashMap<CacheKey, RulerAssignment>,
    /// Insertion order, oldest first
    order: VecDeque<CacheKey>,
}

/// Memoizes [`resolve`] per (instant, location)
///
/// Only successful resolutions are stored. Once `capacity` entries are held
/// the oldest one is evicted.
#[derive(Debug)]
pub struct RulerCache {
    capacity: usize,
    entries: Mutex<CacheEntries>,
}

impl Default for RulerCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl RulerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(CacheEntries::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn resolve(
        &self,
        instant: &DateTime<FixedOffset>,
        location: &GeoLocation,
    ) -> Result<RulerAssignment> {
        let key = CacheKey::new(instant, location);
        if let Some(hit) = self.lock().map.get(&key) {
            return Ok(hit.clone());
        }
        let assignment = resolve(instant, location)?;

        let mut entries = self.lock();
        if entries.map.insert(key, assignment.clone()).is_none() {
            entries.order.push_back(key);
            while entries.order.len() > self.capacity {
                if let Some(oldest) = entries.order.pop_front() {
                    entries.map.remove(&oldest);
                }
            }
        }
        Ok(assignment)
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().map.is_empty()
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.map.clear();
        entries.order.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheEntries> {
        // entries are plain values; a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn london() -> GeoLocation {
        GeoLocation::new(51.5074, -0.1278)
    }

    fn bst(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_resolve_midsummer_noon() {
        // Tuesday 2024-06-25, Sun at ~94° (Cancer I, Venus)
        let rulers = resolve(&bst(2024, 6, 25, 13, 0), &london()).unwrap();
        assert_eq!(rulers.day_ruler, Planet::Mars);
        assert_eq!(rulers.decan_index, 9);
        assert_eq!(rulers.decan_ruler, Planet::Venus);
        assert_eq!(rulers.sign, ZodiacSign::Cancer);
        assert!(rulers.is_day);
        assert_eq!(rulers.hour_ruler, Planet::Mars.advance(rulers.hour_index as u32));
    }

    #[test]
    fn test_assignment_json() {
        let rulers = resolve(&bst(2024, 6, 25, 13, 0), &london()).unwrap();
        let json = serde_json::to_value(&rulers).unwrap();
        assert_eq!(json["decan_ruler"], "venus");
        assert_eq!(json["sign"], "cancer");
        assert_eq!(json["day_ruler"], "mars");
        let back: RulerAssignment = serde_json::from_value(json).unwrap();
        assert_eq!(back, rulers);
    }

    #[test]
    fn test_decan_index_in_range_all_year() {
        let location = london();
        for month in 1..=12 {
            let rulers = resolve(&bst(2024, month, 10, 12, 0), &location).unwrap();
            assert!(rulers.decan_index < DECAN_COUNT);
            assert!(rulers.hour_index < HOURS_PER_DAY);
        }
    }

    #[test]
    fn test_polar_location_reports_error() {
        let tromso = GeoLocation::new(69.65, 18.96);
        let result = resolve(&bst(2024, 6, 21, 12, 0), &tromso);
        assert!(matches!(result, Err(Error::LocationOrTimeInvalid(_))));
    }

    #[test]
    fn test_invalid_location() {
        assert!(GeoLocation::new(0.0, 181.0).validate().is_err());
        assert!(GeoLocation::new(-90.0, 180.0).validate().is_ok());
        assert!(resolve(&bst(2024, 6, 21, 12, 0), &GeoLocation::new(91.0, 0.0)).is_err());
    }

    #[test]
    fn test_cache_memoizes() {
        let cache = RulerCache::new();
        let instant = bst(2024, 6, 25, 13, 0);
        let first = cache.resolve(&instant, &london()).unwrap();
        let second = cache.resolve(&instant, &london()).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        let _ = cache.resolve(&bst(2024, 6, 25, 14, 0), &london()).unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_is_bounded() {
        let cache = RulerCache::with_capacity(4);
        let first = bst(2024, 6, 25, 6, 0);
        for minute in 0..50 {
            let instant = first + chrono::Duration::minutes(minute);
            cache.resolve(&instant, &london()).unwrap();
            assert!(cache.len() <= 4);
        }
        assert_eq!(cache.len(), 4);

        // the oldest entry was evicted and comes back on demand
        cache.resolve(&first, &london()).unwrap();
        assert_eq!(cache.len(), 4);
        assert_eq!(RulerCache::new().capacity(), DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_cache_skips_failures() {
        let cache = RulerCache::new();
        let tromso = GeoLocation::new(69.65, 18.96);
        assert!(cache.resolve(&bst(2024, 6, 21, 12, 0), &tromso).is_err());
        assert!(cache.is_empty());
    }
}
