//! # Sigil Engine
//!
//! Turns a phrase into an ordered, renderer-agnostic point path.
//!
//! ```text
//!   "I am protected"
//!        │ normalize
//!        ▼
//!   IAMPROTECTED ──► PlanetPolicy ◄── RulerAssignment (sigil-astro)
//!        │                │
//!        │ encode         ▼
//!        ▼           MagicSquare (sigil-kamea, Kamea only)
//!   TokenSequence
//!        │ trace
//!        ▼
//!   CoordinateSequence + guide divisions ──► renderer
//! ```
//!
//! ```rust,ignore
//! use sigil_engine::{SigilEngine, SigilRequest};
//! use sigil_core::Method;
//!
//! let engine = SigilEngine::new();
//! let sigil = engine.generate(&SigilRequest::new("prosperity", Method::Classical))?;
//! assert_eq!(sigil.tokens.letters(), "PRSTY");
//! ```

pub mod assembly;
pub mod encoder;
pub mod path;
pub mod policy;

pub use assembly::{Guides, SigilEngine, SigilOutput, SigilRequest};
pub use encoder::{aiq_bekar, Encoding, SigilEncoder};
pub use path::{default_rotation, trace, CoordinateSequence, Layout};
pub use policy::{PlanetChoice, PlanetPolicy, PlanetSource, FALLBACK_PLANET};

pub use sigil_core::{Error, Result};
