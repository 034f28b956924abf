//! Request parameters, tokens and geometry primitives

use crate::planet::Planet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Encoding tradition used to turn a phrase into tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Vowels and repeated consonants removed (Spare)
    #[default]
    Classical,
    /// Pythagorean digit reduction
    Numeric,
    /// Letters placed at their ruling planet
    Planetary,
    /// Walk across a planetary magic square
    Kamea,
    /// Fixed Rose-Cross layout
    Rosicrucian,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Classical,
        Method::Numeric,
        Method::Planetary,
        Method::Kamea,
        Method::Rosicrucian,
    ];

    /// Number of radial guide lines for ring-based methods
    ///
    /// Kamea has no fixed count: its grid follows the square order.
    pub fn ring_divisions(&self) -> Option<u32> {
        match self {
            Self::Classical => Some(26),
            Self::Numeric => Some(9),
            Self::Planetary => Some(7),
            Self::Rosicrucian => Some(4),
            Self::Kamea => None,
        }
    }

    /// Whether the method consults a ruling planet
    pub fn uses_planet(&self) -> bool {
        matches!(self, Self::Planetary | Self::Kamea)
    }

    /// Whether repeated letters are kept
    pub fn keeps_repeats(&self) -> bool {
        matches!(self, Self::Numeric | Self::Kamea)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Classical => "classical",
            Self::Numeric => "numeric",
            Self::Planetary => "planetary",
            Self::Kamea => "kamea",
            Self::Rosicrucian => "rosicrucian",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classical" | "classic" => Ok(Self::Classical),
            "numeric" => Ok(Self::Numeric),
            "planetary" => Ok(Self::Planetary),
            "kamea" => Ok(Self::Kamea),
            "rosicrucian" => Ok(Self::Rosicrucian),
            other => Err(crate::Error::InvalidParameter(format!("unknown method '{}'", other))),
        }
    }
}

/// Alphabet used to value letters on a Kamea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlphabetVariant {
    #[default]
    Latin,
    Hebrew,
}

impl FromStr for AlphabetVariant {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latin" => Ok(Self::Latin),
            "hebrew" => Ok(Self::Hebrew),
            other => Err(crate::Error::InvalidParameter(format!("unknown alphabet '{}'", other))),
        }
    }
}

/// How the astronomical ruler constrains the planet choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RulerMode {
    /// Decan ruler is only a default; the caller may override it
    #[default]
    Flexible,
    /// Decan ruler is forced onto the Kamea; overrides are rejected
    Strict,
}

/// Rendering style, passed through to the renderer untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    #[default]
    Modern,
    Traditional,
}

impl FromStr for RenderStyle {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "modern" => Ok(Self::Modern),
            "traditional" => Ok(Self::Traditional),
            other => Err(crate::Error::InvalidParameter(format!("unknown style '{}'", other))),
        }
    }
}

/// Purpose of the sigil; only the renderer interprets it (color choice)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Intention {
    #[default]
    Protection,
    Love,
    Prosperity,
    Health,
    Wisdom,
    Power,
    Other(String),
}

impl FromStr for Intention {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(crate::Error::InvalidParameter("empty intention".into()));
        }
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "protection" => Self::Protection,
            "love" => Self::Love,
            "prosperity" | "money" => Self::Prosperity,
            "health" | "healing" => Self::Health,
            "wisdom" => Self::Wisdom,
            "power" => Self::Power,
            _ => Self::Other(trimmed.to_string()),
        })
    }
}

/// One resolved symbolic unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Token {
    /// Classical: a retained consonant
    Letter { letter: char },
    /// Numeric: reduced digit 1..=9
    Digit { digit: u8 },
    /// Planetary: a letter at its ruling planet
    Planetary { letter: char, planet: Planet },
    /// Kamea: the square cell holding the letter's value
    Cell { row: u8, col: u8, value: u16 },
    /// Rosicrucian: a letter's fixed layout slot
    RoseSlot { letter: char, slot: u8 },
}

impl Token {
    /// Source letter, when the token still carries one
    pub fn letter(&self) -> Option<char> {
        match self {
            Self::Letter { letter }
            | Self::Planetary { letter, .. }
            | Self::RoseSlot { letter, .. } => Some(*letter),
            Self::Digit { .. } | Self::Cell { .. } => None,
        }
    }
}

/// Ordered tokens for one method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSequence {
    pub method: Method,
    pub tokens: Vec<Token>,
}

impl TokenSequence {
    pub fn new(method: Method, tokens: Vec<Token>) -> Self {
        Self { method, tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Letters carried by the tokens, in order
    pub fn letters(&self) -> String {
        self.tokens.iter().filter_map(Token::letter).collect()
    }
}

/// Point in a normalized frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point on a circle of `radius` around the origin (screen orientation)
    pub fn polar(radius: f64, angle_rad: f64) -> Self {
        Self {
            x: radius * angle_rad.cos(),
            y: radius * angle_rad.sin(),
        }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Coordinate frame a point sequence is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frame {
    /// Centred at the origin, radius 1, y grows downward
    UnitCircle,
    /// `[0,1] x [0,1]`, row 0 at the top
    UnitSquare,
}
