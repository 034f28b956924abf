//! # Sigil Core
//!
//! Foundation types for the sigil engine: the phrase model, the five encoding
//! methods, the seven classical planets and the fixed correspondence tables
//! every other crate reads from.
//!
//! ```text
//!   "Prosperity!"  ──normalize──►  Phrase("PROSPERITY")
//!                                       │
//!                    tables::digit_of ──┼── tables::planet_of
//!                    tables::is_vowel ──┼── tables::rose_cross_position
//!                                       ▼
//!                                 TokenSequence
//! ```
//!
//! Nothing here allocates global state: the tables are `const` data.

pub mod phrase;
pub mod planet;
pub mod tables;
pub mod types;

pub use phrase::Phrase;
pub use planet::{Planet, ZodiacSign};
pub use tables::{HebrewLetter, DECAN_RULERS};
pub use types::{
    AlphabetVariant, Frame, Intention, Method, Point, RenderStyle, RulerMode, Token,
    TokenSequence,
};

/// Result type for sigil operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by every sigil crate
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Phrase reduces to no usable letters for the {method} method")]
    EmptyResult { method: Method },

    #[error("No canonical magic square of order {order} for {planet}")]
    UnsupportedOrder { planet: Planet, order: u8 },

    #[error("Sunrise/sunset undefined for this location or time: {0}")]
    LocationOrTimeInvalid(String),

    #[error("Character {0:?} is not part of the sigil alphabet")]
    InvalidAlphabetCharacter(char),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
