//! # Sigil Kamea
//!
//! The seven planetary magic squares of the classical tradition, one per
//! planet, each of a fixed order:
//!
//! ```text
//!   Saturn 3x3   Jupiter 4x4   Mars 5x5   Sun 6x6
//!   Venus  7x7   Mercury 8x8   Moon 9x9
//! ```
//!
//! Squares are never generated. They are read from the canonical table below,
//! checked once on first use (every row, column and both diagonals must sum to
//! `n(n²+1)/2`, and the cells must be exactly `1..=n²`) and shared read-only
//! afterwards.

use serde::Serialize;
use sigil_core::{Error, Planet, Result};
use std::sync::OnceLock;

/// Smallest order with a canonical square
pub const MIN_ORDER: u8 = 3;

/// Largest order with a canonical square
pub const MAX_ORDER: u8 = 9;

const SATURN: &[&[u16]] = &[&[4, 9, 2], &[3, 5, 7], &[8, 1, 6]];

const JUPITER: &[&[u16]] = &[
    &[4, 14, 15, 1],
    &[9, 7, 6, 12],
    &[5, 11, 10, 8],
    &[16, 2, 3, 13],
];

const MARS: &[&[u16]] = &[
    &[11, 24, 7, 20, 3],
    &[4, 12, 25, 8, 16],
    &[17, 5, 13, 21, 9],
    &[10, 18, 1, 14, 22],
    &[23, 6, 19, 2, 15],
];

const SUN: &[&[u16]] = &[
    &[6, 32, 3, 34, 35, 1],
    &[7, 11, 27, 28, 8, 30],
    &[19, 14, 16, 15, 23, 24],
    &[18, 20, 22, 21, 17, 13],
    &[25, 29, 10, 9, 26, 12],
    &[36, 5, 33, 4, 2, 31],
];

const VENUS: &[&[u16]] = &[
    &[22, 47, 16, 41, 10, 35, 4],
    &[5, 23, 48, 17, 42, 11, 29],
    &[30, 6, 24, 49, 18, 36, 12],
    &[13, 31, 7, 25, 43, 19, 37],
    &[38, 14, 32, 1, 26, 44, 20],
    &[21, 39, 8, 33, 2, 27, 45],
    &[46, 15, 40, 9, 34, 3, 28],
];

const MERCURY: &[&[u16]] = &[
    &[8, 58, 59, 5, 4, 62, 63, 1],
    &[49, 15, 14, 52, 53, 11, 10, 56],
    &[41, 23, 22, 44, 45, 19, 18, 48],
    &[32, 34, 35, 29, 28, 38, 39, 25],
    &[40, 26, 27, 37, 36, 30, 31, 33],
    &[17, 47, 46, 20, 21, 43, 42, 24],
    &[9, 55, 54, 12, 13, 51, 50, 16],
    &[64, 2, 3, 61, 60, 6, 7, 57],
];

const MOON: &[&[u16]] = &[
    &[37, 78, 29, 70, 21, 62, 13, 54, 5],
    &[6, 38, 79, 30, 71, 22, 63, 14, 46],
    &[47, 7, 39, 80, 31, 72, 23, 55, 15],
    &[16, 48, 8, 40, 81, 32, 64, 24, 56],
    &[57, 17, 49, 9, 41, 73, 33, 65, 25],
    &[26, 58, 18, 50, 1, 42, 74, 34, 66],
    &[67, 27, 59, 10, 51, 2, 43, 75, 35],
    &[36, 68, 19, 60, 11, 52, 3, 44, 76],
    &[77, 28, 69, 20, 61, 12, 53, 4, 45],
];

fn canonical_rows(planet: Planet) -> &'static [&'static [u16]] {
    match planet {
        Planet::Saturn => SATURN,
        Planet::Jupiter => JUPITER,
        Planet::Mars => MARS,
        Planet::Sun => SUN,
        Planet::Venus => VENUS,
        Planet::Mercury => MERCURY,
        Planet::Moon => MOON,
    }
}

/// Order of a planet's canonical square
pub fn canonical_order(planet: Planet) -> u8 {
    canonical_rows(planet).len() as u8
}

/// A planetary magic square
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MagicSquare {
    planet: Planet,
    order: u8,
    /// Row-major cell values
    cells: Vec<u16>,
    /// `positions[v - 1]` is the (row, col) holding `v`
    #[serde(skip)]
    positions: Vec<(u8, u8)>,
}

impl MagicSquare {
    /// Build and validate a square from its rows
    pub fn from_rows(planet: Planet, rows: &[&[u16]]) -> Result<Self> {
        let n = rows.len();
        if !(MIN_ORDER as usize..=MAX_ORDER as usize).contains(&n) {
            return Err(Error::UnsupportedOrder { planet, order: n as u8 });
        }
        if rows.iter().any(|row| row.len() != n) {
            return Err(Error::InvalidParameter(format!(
                "{} square is not {}x{}",
                planet, n, n
            )));
        }

        let cells: Vec<u16> = rows.iter().flat_map(|row| row.iter().copied()).collect();
        let mut positions = vec![(u8::MAX, u8::MAX); n * n];
        for (i, &value) in cells.iter().enumerate() {
            let slot = (value as usize)
                .checked_sub(1)
                .filter(|s| *s < n * n)
                .ok_or_else(|| {
                    Error::InvalidParameter(format!("{} square holds out-of-range {}", planet, value))
                })?;
            if positions[slot].0 != u8::MAX {
                return Err(Error::InvalidParameter(format!(
                    "{} square repeats {}",
                    planet, value
                )));
            }
            positions[slot] = ((i / n) as u8, (i % n) as u8);
        }

        let square = Self {
            planet,
            order: n as u8,
            cells,
            positions,
        };
        if !square.verify() {
            return Err(Error::InvalidParameter(format!(
                "{} square is not magic",
                planet
            )));
        }
        Ok(square)
    }

    pub fn planet(&self) -> Planet {
        self.planet
    }

    pub fn order(&self) -> u8 {
        self.order
    }

    /// Number of cells (`n²`), also the largest value
    pub fn size(&self) -> u16 {
        (self.order as u16) * (self.order as u16)
    }

    /// Common sum of every row, column and diagonal
    pub fn magic_constant(&self) -> u32 {
        let n = self.order as u32;
        n * (n * n + 1) / 2
    }

    pub fn get(&self, row: u8, col: u8) -> Option<u16> {
        if row >= self.order || col >= self.order {
            return None;
        }
        Some(self.cells[row as usize * self.order as usize + col as usize])
    }

    /// Cell holding `value`, if the square contains it
    pub fn cell_of(&self, value: u16) -> Option<(u8, u8)> {
        let slot = (value as usize).checked_sub(1)?;
        self.positions.get(slot).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u16]> {
        self.cells.chunks(self.order as usize)
    }

    /// Check the magic invariant
    pub fn verify(&self) -> bool {
        let n = self.order as usize;
        let target = self.magic_constant();
        let at = |r: usize, c: usize| self.cells[r * n + c] as u32;

        let rows_ok = (0..n).all(|r| (0..n).map(|c| at(r, c)).sum::<u32>() == target);
        let cols_ok = (0..n).all(|c| (0..n).map(|r| at(r, c)).sum::<u32>() == target);
        let diag = (0..n).map(|i| at(i, i)).sum::<u32>() == target;
        let anti = (0..n).map(|i| at(i, n - 1 - i)).sum::<u32>() == target;

        rows_ok && cols_ok && diag && anti
    }
}

fn table() -> Result<&'static [MagicSquare]> {
    static TABLE: OnceLock<Result<Vec<MagicSquare>>> = OnceLock::new();
    TABLE
        .get_or_init(|| {
            let squares = Planet::CHALDEAN
                .iter()
                .map(|&planet| MagicSquare::from_rows(planet, canonical_rows(planet)))
                .collect::<Result<Vec<_>>>();
            match &squares {
                Ok(_) => tracing::debug!("loaded {} canonical kameas", Planet::CHALDEAN.len()),
                Err(e) => tracing::error!("canonical kamea table rejected: {}", e),
            }
            squares
        })
        .as_deref()
        .map_err(Clone::clone)
}

/// All seven canonical squares, Chaldean order
pub fn all() -> Result<&'static [MagicSquare]> {
    table()
}

/// The canonical square for a planet
pub fn kamea_for(planet: Planet) -> Result<&'static MagicSquare> {
    Ok(&table()?[planet.index() as usize])
}

/// The canonical square for a planet at a requested order
///
/// Each planet has exactly one canonical order; any other order, including
/// anything outside `3..=9`, is unsupported.
pub fn kamea(planet: Planet, order: u8) -> Result<&'static MagicSquare> {
    let square = kamea_for(planet)?;
    if square.order() != order {
        return Err(Error::UnsupportedOrder { planet, order });
    }
    Ok(square)
}

/// Planet whose canonical square has the given order
pub fn planet_for_order(order: u8) -> Option<Planet> {
    Planet::CHALDEAN
        .iter()
        .copied()
        .find(|p| canonical_order(*p) == order)
}
