//! The seven classical planets and the twelve zodiac signs.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classical planets in Chaldean order (slowest to fastest)
///
/// The discriminant is the planet's slot on the Planetary ring and its
/// position in the planetary-hour sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Planet {
    Saturn = 0,
    Jupiter = 1,
    Mars = 2,
    Sun = 3,
    Venus = 4,
    Mercury = 5,
    Moon = 6,
}

impl Planet {
    /// All planets, Chaldean order
    pub const CHALDEAN: [Planet; 7] = [
        Planet::Saturn,
        Planet::Jupiter,
        Planet::Mars,
        Planet::Sun,
        Planet::Venus,
        Planet::Mercury,
        Planet::Moon,
    ];

    pub fn from_index(index: u8) -> Self {
        Self::CHALDEAN[(index % 7) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// The planet `steps` places further along the Chaldean sequence
    pub fn advance(self, steps: u32) -> Self {
        Self::from_index(((self.index() as u32 + steps) % 7) as u8)
    }

    /// Ruler of a weekday (Sunday = Sun, Monday = Moon, ...)
    pub fn of_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => Self::Sun,
            Weekday::Mon => Self::Moon,
            Weekday::Tue => Self::Mars,
            Weekday::Wed => Self::Mercury,
            Weekday::Thu => Self::Jupiter,
            Weekday::Fri => Self::Venus,
            Weekday::Sat => Self::Saturn,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Saturn => "Saturn",
            Self::Jupiter => "Jupiter",
            Self::Mars => "Mars",
            Self::Sun => "Sun",
            Self::Venus => "Venus",
            Self::Mercury => "Mercury",
            Self::Moon => "Moon",
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Self::Saturn => '♄',
            Self::Jupiter => '♃',
            Self::Mars => '♂',
            Self::Sun => '☉',
            Self::Venus => '♀',
            Self::Mercury => '☿',
            Self::Moon => '☽',
        }
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Planet {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "saturn" => Ok(Self::Saturn),
            "jupiter" => Ok(Self::Jupiter),
            "mars" => Ok(Self::Mars),
            "sun" | "sol" => Ok(Self::Sun),
            "venus" => Ok(Self::Venus),
            "mercury" => Ok(Self::Mercury),
            "moon" | "luna" => Ok(Self::Moon),
            other => Err(crate::Error::InvalidParameter(format!("unknown planet '{}'", other))),
        }
    }
}

/// Tropical zodiac signs, 30° each starting at the vernal equinox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sign containing an ecliptic longitude in degrees
    pub fn from_longitude(longitude_deg: f64) -> Self {
        let lon = longitude_deg.rem_euclid(360.0);
        Self::ALL[((lon / 30.0) as usize).min(11)]
    }

    /// Traditional domicile ruler
    pub fn ruler(&self) -> Planet {
        match self {
            Self::Aries | Self::Scorpio => Planet::Mars,
            Self::Taurus | Self::Libra => Planet::Venus,
            Self::Gemini | Self::Virgo => Planet::Mercury,
            Self::Cancer => Planet::Moon,
            Self::Leo => Planet::Sun,
            Self::Sagittarius | Self::Pisces => Planet::Jupiter,
            Self::Capricorn | Self::Aquarius => Planet::Saturn,
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for (i, planet) in Planet::CHALDEAN.iter().enumerate() {
            assert_eq!(planet.index() as usize, i);
            assert_eq!(Planet::from_index(i as u8), *planet);
        }
    }

    #[test]
    fn test_advance_wraps() {
        assert_eq!(Planet::Moon.advance(1), Planet::Saturn);
        assert_eq!(Planet::Sun.advance(7), Planet::Sun);
        assert_eq!(Planet::Sun.advance(24), Planet::Moon);
    }

    #[test]
    fn test_weekday_rulers() {
        assert_eq!(Planet::of_weekday(Weekday::Sun), Planet::Sun);
        assert_eq!(Planet::of_weekday(Weekday::Fri), Planet::Venus);
        assert_eq!(Planet::of_weekday(Weekday::Sat), Planet::Saturn);
    }

    #[test]
    fn test_parse_planet() {
        assert_eq!("Venus".parse::<Planet>().unwrap(), Planet::Venus);
        assert_eq!(" luna ".parse::<Planet>().unwrap(), Planet::Moon);
        assert!("pluto".parse::<Planet>().is_err());
    }

    #[test]
    fn test_sign_from_longitude() {
        assert_eq!(ZodiacSign::from_longitude(0.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(359.9), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(-15.0), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(125.0), ZodiacSign::Leo);
        assert_eq!(ZodiacSign::Leo.ruler(), Planet::Sun);
    }
}
