//! Path generation - TokenSequence to normalized coordinates
//!
//! ```text
//!   Ring (Classical 26, Numeric 9, Planetary 7)      Grid (Kamea N)
//!
//!              slot 0                               (0,0) ─────► col
//!            ╱   │   ╲                                │  ·  ·  ·
//!       slot d-1 ┼  slot 1     unit circle, y down    │  ·  ·  ·   unit square,
//!            ╲   │   ╱                                ▼  ·  ·  ·   cell centres
//!             clockwise                              row
//!
//!   Rose-Cross: four arms of five slots stepping out by 1/6 from the
//!   centre (up, right, down, left), six ring slots at radius 1/6
//! ```
//!
//! Points are renderer-agnostic. Scaling to a canvas is the renderer's job.

use serde::{Deserialize, Serialize};
use sigil_core::tables::{self, ROSE_ARM_LEN, ROSE_RING_LEN};
use sigil_core::{Error, Frame, Method, Point, Result, Token, TokenSequence};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Numeric slots are taken modulo this ring size
const NUMERIC_RING: u32 = 9;

/// Step between consecutive Rose-Cross arm positions
const ROSE_STEP: f64 = 1.0 / 6.0;

/// Arm directions, screen orientation
const ROSE_ARMS: [(f64, f64); 4] = [(0.0, -1.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)];

/// Geometry a method lays its tokens out on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum Layout {
    /// Evenly spaced slots on the unit circle
    Ring { divisions: u32 },
    /// Cell centres of an N x N grid
    Grid { order: u8 },
    RoseCross,
}

impl Layout {
    /// Layout for a method; Kamea needs the order of its square
    pub fn for_method(method: Method, kamea_order: Option<u8>) -> Result<Self> {
        match method {
            Method::Rosicrucian => Ok(Self::RoseCross),
            Method::Kamea => {
                let order = kamea_order.ok_or_else(|| {
                    Error::InvalidParameter("kamea layout requires the square order".into())
                })?;
                Ok(Self::Grid { order })
            }
            _ => {
                let divisions = method.ring_divisions().ok_or_else(|| {
                    Error::InvalidParameter(format!("{} has no ring layout", method))
                })?;
                Ok(Self::Ring { divisions })
            }
        }
    }

    pub fn frame(&self) -> Frame {
        match self {
            Self::Grid { .. } => Frame::UnitSquare,
            Self::Ring { .. } | Self::RoseCross => Frame::UnitCircle,
        }
    }

    /// Guide lines a renderer may draw behind the path
    pub fn guide_divisions(&self) -> u32 {
        match self {
            Self::Ring { divisions } => *divisions,
            Self::Grid { order } => *order as u32,
            Self::RoseCross => ROSE_ARMS.len() as u32,
        }
    }
}

/// Ordered points plus the frame they live in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSequence {
    pub frame: Frame,
    pub points: Vec<Point>,
}

impl CoordinateSequence {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total length of the polyline
    pub fn path_length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }
}

/// Default ring rotation in degrees for a method and phrase length
///
/// Classical sigils turn by seven degrees per letter so that phrases of
/// different lengths do not all start at the top.
pub fn default_rotation(method: Method, phrase_len: usize) -> f64 {
    match method {
        Method::Classical => ((phrase_len * 7) % 360) as f64,
        _ => 0.0,
    }
}

/// Trace tokens to points, one point per token
///
/// `rotation_deg` only affects ring layouts.
pub fn trace(tokens: &TokenSequence, layout: &Layout, rotation_deg: f64) -> Result<CoordinateSequence> {
    if tokens.is_empty() {
        return Err(Error::EmptyResult { method: tokens.method });
    }
    if !rotation_deg.is_finite() {
        return Err(Error::InvalidParameter(format!("rotation {}", rotation_deg)));
    }

    let points = tokens
        .iter()
        .map(|token| place(token, layout, rotation_deg))
        .collect::<Result<Vec<_>>>()?;

    tracing::trace!(method = %tokens.method, points = points.len(), "traced path");

    Ok(CoordinateSequence {
        frame: layout.frame(),
        points,
    })
}

fn place(token: &Token, layout: &Layout, rotation_deg: f64) -> Result<Point> {
    match (layout, token) {
        (Layout::Ring { divisions }, _) => {
            let slot = ring_slot(token, *divisions)?;
            Ok(ring_point(slot, *divisions, rotation_deg))
        }
        (Layout::Grid { order }, Token::Cell { row, col, .. }) => {
            if row >= order || col >= order {
                return Err(Error::InvalidParameter(format!(
                    "cell ({}, {}) outside a {}x{} grid",
                    row, col, order, order
                )));
            }
            let n = *order as f64;
            Ok(Point::new(
                (*col as f64 + 0.5) / n,
                (*row as f64 + 0.5) / n,
            ))
        }
        (Layout::RoseCross, Token::RoseSlot { slot, .. }) => rose_point(*slot),
        (layout, token) => Err(Error::InvalidParameter(format!(
            "{:?} cannot be placed on {:?}",
            token, layout
        ))),
    }
}

fn ring_slot(token: &Token, divisions: u32) -> Result<u32> {
    let slot = match token {
        Token::Letter { letter } => tables::alpha_index(*letter)? as u32,
        Token::Digit { digit } => *digit as u32 % NUMERIC_RING,
        Token::Planetary { planet, .. } => planet.index() as u32,
        other => {
            return Err(Error::InvalidParameter(format!(
                "{:?} has no ring slot",
                other
            )))
        }
    };
    if slot >= divisions {
        return Err(Error::InvalidParameter(format!(
            "slot {} outside a ring of {}",
            slot, divisions
        )));
    }
    Ok(slot)
}

/// Slot 0 at the top, advancing clockwise
fn ring_point(slot: u32, divisions: u32, rotation_deg: f64) -> Point {
    let angle = slot as f64 / divisions as f64 * TAU - FRAC_PI_2 + rotation_deg.to_radians();
    Point::polar(1.0, angle)
}

fn rose_point(slot: u8) -> Result<Point> {
    let arm_slots = ROSE_ARM_LEN * ROSE_ARMS.len() as u8;
    if slot < arm_slots {
        let (dx, dy) = ROSE_ARMS[(slot / ROSE_ARM_LEN) as usize];
        let distance = ((slot % ROSE_ARM_LEN) + 1) as f64 * ROSE_STEP;
        return Ok(Point::new(dx * distance, dy * distance));
    }
    let ring = slot - arm_slots;
    if ring >= ROSE_RING_LEN {
        return Err(Error::InvalidParameter(format!("rose-cross slot {}", slot)));
    }
    let angle = ring as f64 / ROSE_RING_LEN as f64 * TAU;
    Ok(Point::polar(ROSE_STEP, angle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_core::Planet;

    const EPS: f64 = 1e-9;

    fn near(a: Point, x: f64, y: f64) -> bool {
        (a.x - x).abs() < EPS && (a.y - y).abs() < EPS
    }

    fn letters(method: Method, text: &str) -> TokenSequence {
        TokenSequence::new(
            method,
            text.chars().map(|letter| Token::Letter { letter }).collect(),
        )
    }

    #[test]
    fn test_ring_starts_at_top_clockwise() {
        let layout = Layout::for_method(Method::Classical, None).unwrap();
        let path = trace(&letters(Method::Classical, "AN"), &layout, 0.0).unwrap();
        assert_eq!(path.frame, Frame::UnitCircle);
        // A at the top, N (13 of 26) at the bottom
        assert!(near(path.points[0], 0.0, -1.0));
        assert!(near(path.points[1], 0.0, 1.0));
    }

    #[test]
    fn test_quarter_turn_moves_clockwise_on_screen() {
        let layout = Layout::Ring { divisions: 4 };
        let seq = letters(Method::Classical, "B");
        let path = trace(&seq, &layout, 0.0).unwrap();
        assert!(near(path.points[0], 1.0, 0.0));
        let rotated = trace(&seq, &layout, 90.0).unwrap();
        assert!(near(rotated.points[0], 0.0, 1.0));
    }

    #[test]
    fn test_points_stay_on_unit_circle() {
        let layout = Layout::for_method(Method::Classical, None).unwrap();
        let seq = letters(Method::Classical, "BCDFGHJKLMNPQRSTVWXYZ");
        let path = trace(&seq, &layout, 133.0).unwrap();
        assert_eq!(path.len(), seq.len());
        for p in &path.points {
            assert!((p.distance(&Point::ORIGIN) - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_numeric_nine_sits_at_slot_zero() {
        let layout = Layout::for_method(Method::Numeric, None).unwrap();
        let seq = TokenSequence::new(
            Method::Numeric,
            vec![Token::Digit { digit: 9 }, Token::Digit { digit: 1 }],
        );
        let path = trace(&seq, &layout, 0.0).unwrap();
        assert!(near(path.points[0], 0.0, -1.0));
        assert!(!near(path.points[1], 0.0, -1.0));
    }

    #[test]
    fn test_planetary_uses_chaldean_slot() {
        let layout = Layout::for_method(Method::Planetary, None).unwrap();
        let seq = TokenSequence::new(
            Method::Planetary,
            vec![Token::Planetary { letter: 'A', planet: Planet::Saturn }],
        );
        let path = trace(&seq, &layout, 0.0).unwrap();
        assert!(near(path.points[0], 0.0, -1.0));
        assert_eq!(layout.guide_divisions(), 7);
    }

    #[test]
    fn test_grid_cell_centres() {
        let layout = Layout::for_method(Method::Kamea, Some(3)).unwrap();
        let seq = TokenSequence::new(
            Method::Kamea,
            vec![
                Token::Cell { row: 2, col: 1, value: 1 },
                Token::Cell { row: 0, col: 2, value: 2 },
            ],
        );
        let path = trace(&seq, &layout, 45.0).unwrap();
        assert_eq!(path.frame, Frame::UnitSquare);
        assert!(near(path.points[0], 0.5, 2.5 / 3.0));
        assert!(near(path.points[1], 2.5 / 3.0, 0.5 / 3.0));
        assert_eq!(layout.guide_divisions(), 3);
    }

    #[test]
    fn test_grid_rejects_out_of_range_cell() {
        let layout = Layout::Grid { order: 3 };
        let seq = TokenSequence::new(Method::Kamea, vec![Token::Cell { row: 3, col: 0, value: 1 }]);
        assert!(trace(&seq, &layout, 0.0).is_err());
    }

    #[test]
    fn test_rose_cross_arms_and_ring() {
        let seq = TokenSequence::new(
            Method::Rosicrucian,
            vec![
                Token::RoseSlot { letter: 'A', slot: 0 },
                Token::RoseSlot { letter: 'J', slot: 9 },
                Token::RoseSlot { letter: 'U', slot: 20 },
            ],
        );
        let path = trace(&seq, &Layout::RoseCross, 0.0).unwrap();
        assert!(near(path.points[0], 0.0, -1.0 / 6.0));
        assert!(near(path.points[1], 5.0 / 6.0, 0.0));
        assert!(near(path.points[2], 1.0 / 6.0, 0.0));
        assert_eq!(Layout::RoseCross.guide_divisions(), 4);
    }

    #[test]
    fn test_mismatched_token_rejected() {
        let seq = TokenSequence::new(Method::Kamea, vec![Token::Cell { row: 0, col: 0, value: 4 }]);
        let ring = Layout::for_method(Method::Classical, None).unwrap();
        assert!(matches!(trace(&seq, &ring, 0.0), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_empty_sequence_is_empty_result() {
        let seq = TokenSequence::new(Method::Numeric, Vec::new());
        let layout = Layout::for_method(Method::Numeric, None).unwrap();
        assert_eq!(
            trace(&seq, &layout, 0.0),
            Err(Error::EmptyResult { method: Method::Numeric })
        );
    }

    #[test]
    fn test_default_rotation() {
        assert_eq!(default_rotation(Method::Classical, 10), 70.0);
        assert_eq!(default_rotation(Method::Classical, 60), 60.0);
        assert_eq!(default_rotation(Method::Numeric, 10), 0.0);
    }

    #[test]
    fn test_path_length() {
        let seq = letters(Method::Classical, "AN");
        let layout = Layout::for_method(Method::Classical, None).unwrap();
        let path = trace(&seq, &layout, 0.0).unwrap();
        assert!((path.path_length() - 2.0).abs() < EPS);
    }
}
