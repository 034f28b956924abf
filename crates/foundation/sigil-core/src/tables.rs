//! Correspondence Tables - letters to digits, planets and layout slots
//!
//! All lookups take an uppercase `A`..=`Z` letter. Anything else is rejected
//! with [`Error::InvalidAlphabetCharacter`] so a stray character can never
//! become a token.
//!
//! ```text
//!   Latin ──► Hebrew ──┬──► gematria value   (Hebrew Kamea)
//!                      └──► planet           (Planetary)
//!   Latin ──► position ──► digit 1..9        (Numeric, Latin Kamea)
//!   Latin ──► Rose-Cross slot 0..25          (Rosicrucian)
//! ```

use crate::planet::Planet;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Letters of the sigil alphabet
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Letters per Rose-Cross arm
pub const ROSE_ARM_LEN: u8 = 5;

/// Letters on the central Rose-Cross ring
pub const ROSE_RING_LEN: u8 = 6;

/// Rose-Cross layout: four arms (up, right, down, left) then the centre ring
pub const ROSE_CROSS_LAYOUT: [&str; 5] = ["ABCDE", "FGHIJ", "KLMNO", "PQRST", "UVWXYZ"];

/// Ruler of each 10° decan, Aries I through Pisces III
///
/// Chaldean "faces": Mars, Sun, Venus, Mercury, Moon, Saturn, Jupiter,
/// repeating. 36 is not a multiple of 7, so Pisces III and Aries I are
/// both Mars.
pub const DECAN_RULERS: [Planet; 36] = {
    use Planet::*;
    [
        Mars, Sun, Venus, // Aries
        Mercury, Moon, Saturn, // Taurus
        Jupiter, Mars, Sun, // Gemini
        Venus, Mercury, Moon, // Cancer
        Saturn, Jupiter, Mars, // Leo
        Sun, Venus, Mercury, // Virgo
        Moon, Saturn, Jupiter, // Libra
        Mars, Sun, Venus, // Scorpio
        Mercury, Moon, Saturn, // Sagittarius
        Jupiter, Mars, Sun, // Capricorn
        Venus, Mercury, Moon, // Aquarius
        Saturn, Jupiter, Mars, // Pisces
    ]
};

/// Zero-based alphabet index of a letter
pub fn alpha_index(letter: char) -> Result<u8> {
    if letter.is_ascii_uppercase() {
        Ok(letter as u8 - b'A')
    } else {
        Err(Error::InvalidAlphabetCharacter(letter))
    }
}

/// Reduce a positive number to one digit by repeated digit sums
pub fn reduce_digits(mut n: u32) -> u8 {
    while n > 9 {
        let mut sum = 0;
        while n > 0 {
            sum += n % 10;
            n /= 10;
        }
        n = sum;
    }
    n as u8
}

/// Pythagorean value of a letter (A=1 .. I=9, J=1 .. R=9, S=1 .. Z=8)
pub fn digit_of(letter: char) -> Result<u8> {
    Ok(reduce_digits(alpha_index(letter)? as u32 + 1))
}

pub fn is_vowel(letter: char) -> Result<bool> {
    alpha_index(letter)?;
    Ok(matches!(letter, 'A' | 'E' | 'I' | 'O' | 'U'))
}

/// Ruling planet of a letter, through its Hebrew equivalent
pub fn planet_of(letter: char) -> Result<Planet> {
    Ok(hebrew_of(letter)?.planet())
}

/// Slot of a letter in the Rose-Cross layout
///
/// Arm slots are `arm * 5 + position` (0..=19); ring slots are 20..=25.
pub fn rose_cross_position(letter: char) -> Result<u8> {
    alpha_index(letter)?;
    let mut base = 0u8;
    for group in ROSE_CROSS_LAYOUT {
        if let Some(pos) = group.find(letter) {
            return Ok(base + pos as u8);
        }
        base += group.len() as u8;
    }
    Err(Error::InvalidAlphabetCharacter(letter))
}

/// The twenty-two Hebrew letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HebrewLetter {
    Aleph,
    Beth,
    Gimel,
    Daleth,
    He,
    Vav,
    Zayin,
    Cheth,
    Teth,
    Yod,
    Kaph,
    Lamed,
    Mem,
    Nun,
    Samekh,
    Ayin,
    Pe,
    Tzaddi,
    Qoph,
    Resh,
    Shin,
    Tav,
}

/// Sepher Yetzirah class of a Hebrew letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterClass {
    /// Aleph, Mem, Shin: the elements
    Mother,
    /// The seven planetary letters
    Double,
    /// The twelve zodiacal letters
    Simple,
}

impl HebrewLetter {
    /// Gematria value (1..=400)
    pub fn value(&self) -> u16 {
        match self {
            Self::Aleph => 1,
            Self::Beth => 2,
            Self::Gimel => 3,
            Self::Daleth => 4,
            Self::He => 5,
            Self::Vav => 6,
            Self::Zayin => 7,
            Self::Cheth => 8,
            Self::Teth => 9,
            Self::Yod => 10,
            Self::Kaph => 20,
            Self::Lamed => 30,
            Self::Mem => 40,
            Self::Nun => 50,
            Self::Samekh => 60,
            Self::Ayin => 70,
            Self::Pe => 80,
            Self::Tzaddi => 90,
            Self::Qoph => 100,
            Self::Resh => 200,
            Self::Shin => 300,
            Self::Tav => 400,
        }
    }

    pub fn class(&self) -> LetterClass {
        match self {
            Self::Aleph | Self::Mem | Self::Shin => LetterClass::Mother,
            Self::Beth | Self::Gimel | Self::Daleth | Self::Kaph | Self::Pe | Self::Resh
            | Self::Tav => LetterClass::Double,
            _ => LetterClass::Simple,
        }
    }

    /// Planetary attribution
    ///
    /// Doubles carry their own planet, simples the ruler of their sign,
    /// mothers the day ruler of their element's triplicity
    /// (Air: Saturn, Water: Venus, Fire: Sun).
    pub fn planet(&self) -> Planet {
        match self {
            // mothers
            Self::Aleph => Planet::Saturn,
            Self::Mem => Planet::Venus,
            Self::Shin => Planet::Sun,
            // doubles
            Self::Beth => Planet::Mercury,
            Self::Gimel => Planet::Moon,
            Self::Daleth => Planet::Venus,
            Self::Kaph => Planet::Jupiter,
            Self::Pe => Planet::Mars,
            Self::Resh => Planet::Sun,
            Self::Tav => Planet::Saturn,
            // simples
            Self::He => Planet::Mars,
            Self::Vav => Planet::Venus,
            Self::Zayin => Planet::Mercury,
            Self::Cheth => Planet::Moon,
            Self::Teth => Planet::Sun,
            Self::Yod => Planet::Mercury,
            Self::Lamed => Planet::Venus,
            Self::Nun => Planet::Mars,
            Self::Samekh => Planet::Jupiter,
            Self::Ayin => Planet::Saturn,
            Self::Tzaddi => Planet::Saturn,
            Self::Qoph => Planet::Jupiter,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Self::Aleph => 'א',
            Self::Beth => 'ב',
            Self::Gimel => 'ג',
            Self::Daleth => 'ד',
            Self::He => 'ה',
            Self::Vav => 'ו',
            Self::Zayin => 'ז',
            Self::Cheth => 'ח',
            Self::Teth => 'ט',
            Self::Yod => 'י',
            Self::Kaph => 'כ',
            Self::Lamed => 'ל',
            Self::Mem => 'מ',
            Self::Nun => 'נ',
            Self::Samekh => 'ס',
            Self::Ayin => 'ע',
            Self::Pe => 'פ',
            Self::Tzaddi => 'צ',
            Self::Qoph => 'ק',
            Self::Resh => 'ר',
            Self::Shin => 'ש',
            Self::Tav => 'ת',
        }
    }
}

/// Hebrew equivalent of a Latin letter
pub fn hebrew_of(letter: char) -> Result<HebrewLetter> {
    use HebrewLetter::*;
    Ok(match letter {
        'A' => Aleph,
        'B' => Beth,
        'C' | 'K' => Kaph,
        'D' => Daleth,
        'E' => He,
        'F' | 'U' | 'V' | 'W' => Vav,
        'G' => Gimel,
        'H' => Cheth,
        'I' | 'J' | 'Y' => Yod,
        'L' => Lamed,
        'M' => Mem,
        'N' => Nun,
        'O' => Ayin,
        'P' => Pe,
        'Q' => Qoph,
        'R' => Resh,
        'S' => Shin,
        'T' => Tav,
        'X' => Samekh,
        'Z' => Zayin,
        other => return Err(Error::InvalidAlphabetCharacter(other)),
    })
}
