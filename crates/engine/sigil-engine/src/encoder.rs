//! Encoders - Phrase to TokenSequence, one per method
//!
//! Encoding is deterministic: the same phrase and parameters always give the
//! same tokens, so a renderer can recompute a sigil from its inputs alone.
//!
//! | Method      | Token            | Repeats |
//! |-------------|------------------|---------|
//! | Classical   | consonant        | dropped |
//! | Numeric     | digit 1..=9      | kept    |
//! | Planetary   | letter + planet  | dropped |
//! | Kamea       | square cell      | kept    |
//! | Rosicrucian | letter + slot    | dropped |

use sigil_core::tables::{self, reduce_digits};
use sigil_core::{AlphabetVariant, Error, Method, Phrase, Result, Token, TokenSequence};
use sigil_kamea::MagicSquare;

/// Shared contract of every encoding method
pub trait SigilEncoder {
    fn method(&self) -> Method;

    fn encode(&self, phrase: &Phrase) -> Result<TokenSequence>;
}

/// Spare's method: drop vowels, then every repeated consonant
#[derive(Debug, Clone, Copy, Default)]
pub struct Classical;

/// Pythagorean numerology
#[derive(Debug, Clone, Copy, Default)]
pub struct Numeric;

/// Letters at their ruling planet
#[derive(Debug, Clone, Copy, Default)]
pub struct Planetary;

/// Rose-Cross layout
#[derive(Debug, Clone, Copy, Default)]
pub struct Rosicrucian;

/// Path over a planetary magic square
#[derive(Debug, Clone, Copy)]
pub struct Kamea<'a> {
    pub square: &'a MagicSquare,
    pub alphabet: AlphabetVariant,
}

/// A method together with its parameters
#[derive(Debug, Clone, Copy)]
pub enum Encoding<'a> {
    Classical,
    Numeric,
    Planetary,
    Kamea(Kamea<'a>),
    Rosicrucian,
}

impl<'a> Encoding<'a> {
    /// Encoding for a method; Kamea needs its square
    pub fn for_method(
        method: Method,
        square: Option<&'a MagicSquare>,
        alphabet: AlphabetVariant,
    ) -> Result<Self> {
        Ok(match method {
            Method::Classical => Self::Classical,
            Method::Numeric => Self::Numeric,
            Method::Planetary => Self::Planetary,
            Method::Rosicrucian => Self::Rosicrucian,
            Method::Kamea => {
                let square = square.ok_or_else(|| {
                    Error::InvalidParameter("kamea method requires a magic square".into())
                })?;
                Self::Kamea(Kamea { square, alphabet })
            }
        })
    }
}

impl SigilEncoder for Encoding<'_> {
    fn method(&self) -> Method {
        match self {
            Self::Classical => Method::Classical,
            Self::Numeric => Method::Numeric,
            Self::Planetary => Method::Planetary,
            Self::Kamea(_) => Method::Kamea,
            Self::Rosicrucian => Method::Rosicrucian,
        }
    }

    fn encode(&self, phrase: &Phrase) -> Result<TokenSequence> {
        match self {
            Self::Classical => Classical.encode(phrase),
            Self::Numeric => Numeric.encode(phrase),
            Self::Planetary => Planetary.encode(phrase),
            Self::Kamea(kamea) => kamea.encode(phrase),
            Self::Rosicrucian => Rosicrucian.encode(phrase),
        }
    }
}

/// Tracks which letters were already emitted
struct FirstSeen([bool; 26]);

impl FirstSeen {
    fn new() -> Self {
        Self([false; 26])
    }

    /// True the first time a letter is offered
    fn first(&mut self, letter: char) -> Result<bool> {
        let slot = &mut self.0[tables::alpha_index(letter)? as usize];
        Ok(!std::mem::replace(slot, true))
    }
}

fn non_empty(method: Method, tokens: Vec<Token>) -> Result<TokenSequence> {
    if tokens.is_empty() {
        return Err(Error::EmptyResult { method });
    }
    Ok(TokenSequence::new(method, tokens))
}

impl SigilEncoder for Classical {
    fn method(&self) -> Method {
        Method::Classical
    }

    fn encode(&self, phrase: &Phrase) -> Result<TokenSequence> {
        let mut seen = FirstSeen::new();
        let mut tokens = Vec::new();
        for letter in phrase.letters() {
            if tables::is_vowel(letter)? {
                continue;
            }
            if seen.first(letter)? {
                tokens.push(Token::Letter { letter });
            }
        }
        non_empty(self.method(), tokens)
    }
}

impl SigilEncoder for Numeric {
    fn method(&self) -> Method {
        Method::Numeric
    }

    fn encode(&self, phrase: &Phrase) -> Result<TokenSequence> {
        let tokens = phrase
            .letters()
            .map(|letter| Ok(Token::Digit { digit: tables::digit_of(letter)? }))
            .collect::<Result<Vec<_>>>()?;
        non_empty(self.method(), tokens)
    }
}

impl SigilEncoder for Planetary {
    fn method(&self) -> Method {
        Method::Planetary
    }

    fn encode(&self, phrase: &Phrase) -> Result<TokenSequence> {
        let mut seen = FirstSeen::new();
        let mut tokens = Vec::new();
        for letter in phrase.letters() {
            if seen.first(letter)? {
                tokens.push(Token::Planetary {
                    letter,
                    planet: tables::planet_of(letter)?,
                });
            }
        }
        non_empty(self.method(), tokens)
    }
}

impl SigilEncoder for Rosicrucian {
    fn method(&self) -> Method {
        Method::Rosicrucian
    }

    fn encode(&self, phrase: &Phrase) -> Result<TokenSequence> {
        let mut seen = FirstSeen::new();
        let mut tokens = Vec::new();
        for letter in phrase.letters() {
            if seen.first(letter)? {
                tokens.push(Token::RoseSlot {
                    letter,
                    slot: tables::rose_cross_position(letter)?,
                });
            }
        }
        non_empty(self.method(), tokens)
    }
}

impl Kamea<'_> {
    /// Value a letter takes on this square
    pub fn value_of(&self, letter: char) -> Result<u16> {
        match self.alphabet {
            AlphabetVariant::Latin => Ok(tables::digit_of(letter)? as u16),
            AlphabetVariant::Hebrew => {
                let gematria = tables::hebrew_of(letter)?.value();
                Ok(aiq_bekar(gematria, self.square.size()))
            }
        }
    }
}

impl SigilEncoder for Kamea<'_> {
    fn method(&self) -> Method {
        Method::Kamea
    }

    fn encode(&self, phrase: &Phrase) -> Result<TokenSequence> {
        let tokens = phrase
            .letters()
            .map(|letter| {
                let value = self.value_of(letter)?;
                let (row, col) = self.square.cell_of(value).ok_or_else(|| {
                    Error::InvalidParameter(format!(
                        "value {} of {:?} is not on the {} kamea",
                        value,
                        letter,
                        self.square.planet()
                    ))
                })?;
                Ok(Token::Cell { row, col, value })
            })
            .collect::<Result<Vec<_>>>()?;
        non_empty(self.method(), tokens)
    }
}

/// Qabalah of nine chambers: drop trailing zeros until the value fits
///
/// 200 on a 16-cell square becomes 20, then 2.
pub fn aiq_bekar(mut value: u16, max: u16) -> u16 {
    while value > max && value % 10 == 0 {
        value /= 10;
    }
    if value > max {
        value = reduce_digits(value as u32) as u16;
    }
    value
}
