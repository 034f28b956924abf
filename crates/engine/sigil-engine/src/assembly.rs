//! One full compute pass: request in, renderable sigil out

use crate::encoder::{Encoding, SigilEncoder};
use crate::path::{default_rotation, trace, CoordinateSequence, Layout};
use crate::policy::{PlanetChoice, PlanetPolicy};
use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use sigil_astro::{GeoLocation, RulerAssignment, RulerCache};
use sigil_core::{
    AlphabetVariant, Error, Intention, Method, Phrase, Planet, RenderStyle, Result, RulerMode,
    TokenSequence,
};
use sigil_kamea::MagicSquare;

/// Everything the UI collaborator hands over for one sigil
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigilRequest {
    /// Free text, normalized before encoding
    pub phrase: String,
    #[serde(default)]
    pub method: Method,
    #[serde(default)]
    pub style: RenderStyle,
    #[serde(default)]
    pub intention: Intention,
    #[serde(default)]
    pub show_guides: bool,
    #[serde(default)]
    pub alphabet: AlphabetVariant,
    #[serde(default)]
    pub planet: Option<Planet>,
    #[serde(default)]
    pub kamea_order: Option<u8>,
    #[serde(default)]
    pub mode: RulerMode,
    #[serde(default)]
    pub location: Option<GeoLocation>,
    /// Moment to resolve rulers for; now when absent
    #[serde(default)]
    pub at: Option<DateTime<FixedOffset>>,
    /// Ring rotation in degrees; method default when absent
    #[serde(default)]
    pub rotation_deg: Option<f64>,
    /// Resolve rulers even for methods that do not use a planet
    #[serde(default)]
    pub include_rulers: bool,
}

impl SigilRequest {
    pub fn new(phrase: impl Into<String>, method: Method) -> Self {
        Self {
            phrase: phrase.into(),
            method,
            style: RenderStyle::default(),
            intention: Intention::default(),
            show_guides: false,
            alphabet: AlphabetVariant::default(),
            planet: None,
            kamea_order: None,
            mode: RulerMode::default(),
            location: None,
            at: None,
            rotation_deg: None,
            include_rulers: false,
        }
    }

    pub fn with_planet(mut self, planet: Planet) -> Self {
        self.planet = Some(planet);
        self
    }

    pub fn with_order(mut self, order: u8) -> Self {
        self.kamea_order = Some(order);
        self
    }

    pub fn with_alphabet(mut self, alphabet: AlphabetVariant) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn strict(mut self) -> Self {
        self.mode = RulerMode::Strict;
        self
    }

    pub fn at(mut self, instant: DateTime<FixedOffset>, location: GeoLocation) -> Self {
        self.at = Some(instant);
        self.location = Some(location);
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation_deg = Some(degrees);
        self
    }

    pub fn with_style(mut self, style: RenderStyle, intention: Intention) -> Self {
        self.style = style;
        self.intention = intention;
        self
    }

    pub fn with_guides(mut self, show: bool) -> Self {
        self.show_guides = show;
        self
    }

    pub fn policy(&self) -> PlanetPolicy {
        PlanetPolicy::new(self.mode, self.planet, self.kamea_order)
    }
}

/// Guide lines behind the path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guides {
    pub divisions: u32,
    pub visible: bool,
}

/// Renderer-agnostic result of one pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SigilOutput {
    pub phrase: Phrase,
    pub method: Method,
    pub tokens: TokenSequence,
    pub layout: Layout,
    pub rotation_deg: f64,
    pub path: CoordinateSequence,
    pub guides: Guides,
    pub style: RenderStyle,
    pub intention: Intention,
    /// Governing planet (Planetary and Kamea)
    pub planet: Option<PlanetChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kamea: Option<MagicSquare>,
    pub rulers: Option<RulerAssignment>,
    pub override_rejected: bool,
}

impl SigilOutput {
    pub fn governing_planet(&self) -> Option<Planet> {
        self.planet.map(|choice| choice.planet)
    }
}

/// Entry point for sigil generation
///
/// Holds a ruler cache so repeated requests for the same moment and place
/// skip the solar computation.
#[derive(Debug, Default)]
pub struct SigilEngine {
    cache: RulerCache,
}

impl SigilEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &RulerCache {
        &self.cache
    }

    /// Normalize, resolve rulers and planet, encode, trace
    pub fn generate(&self, request: &SigilRequest) -> Result<SigilOutput> {
        let method = request.method;
        let phrase = Phrase::normalize(&request.phrase);
        if phrase.is_empty() {
            return Err(Error::EmptyResult { method });
        }

        let rulers = self.rulers_for(request)?;
        let choice = request.policy().choose(method, rulers.as_ref())?;

        let square = match (method, choice) {
            (Method::Kamea, Some(choice)) => {
                let order = choice
                    .order
                    .unwrap_or_else(|| sigil_kamea::canonical_order(choice.planet));
                Some(sigil_kamea::kamea(choice.planet, order)?)
            }
            _ => None,
        };

        let encoding = Encoding::for_method(method, square, request.alphabet)?;
        let tokens = encoding.encode(&phrase)?;

        let layout = Layout::for_method(method, square.map(MagicSquare::order))?;
        let rotation_deg = request
            .rotation_deg
            .unwrap_or_else(|| default_rotation(method, phrase.len()));
        let path = trace(&tokens, &layout, rotation_deg)?;

        tracing::info!(
            %method,
            phrase = %phrase,
            tokens = tokens.len(),
            planet = ?choice.map(|c| c.planet),
            override_rejected = choice.is_some_and(|c| c.override_rejected),
            "generated sigil"
        );

        Ok(SigilOutput {
            override_rejected: choice.is_some_and(|c| c.override_rejected),
            guides: Guides {
                divisions: layout.guide_divisions(),
                visible: request.show_guides,
            },
            phrase,
            method,
            tokens,
            layout,
            rotation_deg,
            path,
            style: request.style,
            intention: request.intention.clone(),
            planet: choice,
            kamea: square.cloned(),
            rulers,
        })
    }

    fn rulers_for(&self, request: &SigilRequest) -> Result<Option<RulerAssignment>> {
        if !(request.policy().needs_rulers(request.method) || request.include_rulers) {
            return Ok(None);
        }
        let Some(location) = request.location else {
            tracing::debug!(method = %request.method, "no location, rulers not resolved");
            return Ok(None);
        };
        match request.at {
            Some(instant) => self.cache.resolve(&instant, &location).map(Some),
            // "now" never repeats, so it is not worth a cache slot
            None => sigil_astro::resolve(&Local::now().fixed_offset(), &location).map(Some),
        }
    }
}
