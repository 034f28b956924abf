//! Decans: thirty-six 10° faces of the zodiac

use serde::{Deserialize, Serialize};
use sigil_core::{Planet, ZodiacSign, DECAN_RULERS};

/// Number of decans
pub const DECAN_COUNT: u8 = 36;

/// Width of one decan, degrees
pub const DECAN_WIDTH_DEG: f64 = 10.0;

/// A zodiacal decan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decan {
    /// 0..=35 from 0° Aries
    pub index: u8,
    pub sign: ZodiacSign,
    /// 0..=2 within the sign
    pub face: u8,
    pub ruler: Planet,
}

impl Decan {
    pub fn from_index(index: u8) -> Self {
        let index = index % DECAN_COUNT;
        Self {
            index,
            sign: ZodiacSign::ALL[(index / 3) as usize],
            face: index % 3,
            ruler: DECAN_RULERS[index as usize],
        }
    }

    /// Ecliptic longitude where this decan begins
    pub fn start_longitude(&self) -> f64 {
        self.index as f64 * DECAN_WIDTH_DEG
    }
}

/// Decan containing an ecliptic longitude (degrees, any range)
pub fn decan_of(longitude_deg: f64) -> Decan {
    let lon = longitude_deg.rem_euclid(360.0);
    let index = ((lon / DECAN_WIDTH_DEG).floor() as u8).min(DECAN_COUNT - 1);
    Decan::from_index(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(decan_of(0.0).index, 0);
        assert_eq!(decan_of(9.999).index, 0);
        assert_eq!(decan_of(10.0).index, 1);
        assert_eq!(decan_of(359.999).index, 35);
        assert_eq!(decan_of(360.0).index, 0);
        assert_eq!(decan_of(-0.5).index, 35);
    }

    #[test]
    fn test_rulers() {
        assert_eq!(decan_of(5.0).ruler, Planet::Mars);
        assert_eq!(decan_of(94.4).ruler, Planet::Venus);
        let leo_one = decan_of(125.0);
        assert_eq!(leo_one.sign, ZodiacSign::Leo);
        assert_eq!(leo_one.face, 0);
        assert_eq!(leo_one.ruler, Planet::Saturn);
        assert_eq!(decan_of(355.0).ruler, Planet::Mars);
    }

    #[test]
    fn test_index_always_in_range() {
        let mut lon = -720.0;
        while lon < 720.0 {
            assert!(decan_of(lon).index < DECAN_COUNT);
            lon += 0.37;
        }
    }
}
