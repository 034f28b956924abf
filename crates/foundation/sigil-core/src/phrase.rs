//! Phrase normalization
//!
//! A [`Phrase`] only ever holds `A`..=`Z`. Input is uppercased, decomposed
//! (NFD) so accents fall away as combining marks, and everything that is not
//! a Latin letter afterwards is dropped.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalized, immutable phrase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phrase(String);

impl Phrase {
    /// Normalize free text (`"Ñandú 42!"` becomes `"NANDU"`)
    ///
    /// Never fails; the result may be empty.
    pub fn normalize(input: &str) -> Self {
        let letters = input
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_uppercase)
            .filter(char::is_ascii_uppercase)
            .collect();
        Self(letters)
    }

    /// Accept text that is already normalized, rejecting anything else
    pub fn from_normalized(letters: &str) -> Result<Self> {
        if let Some(bad) = letters.chars().find(|c| !c.is_ascii_uppercase()) {
            return Err(Error::InvalidAlphabetCharacter(bad));
        }
        Ok(Self(letters.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn letters(&self) -> std::str::Chars<'_> {
        self.0.chars()
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Phrase {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_normalized(&value)
    }
}

impl From<Phrase> for String {
    fn from(phrase: Phrase) -> Self {
        phrase.0
    }
}
