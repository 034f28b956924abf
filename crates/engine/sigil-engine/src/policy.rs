//! Which planet governs a Planetary or Kamea sigil
//!
//! Flexible mode honours the caller's choice and falls back to the decan
//! ruler of the moment. Strict mode always takes the decan ruler for the
//! Kamea method; a conflicting choice is discarded and reported.

use serde::{Deserialize, Serialize};
use sigil_astro::RulerAssignment;
use sigil_core::{Error, Method, Planet, Result, RulerMode};
use sigil_kamea::{canonical_order, planet_for_order};

/// Used when nothing else names a planet
pub const FALLBACK_PLANET: Planet = Planet::Jupiter;

/// Where the chosen planet came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanetSource {
    /// Named by the caller
    Requested,
    /// Implied by the requested square order
    Order,
    /// Decan ruler of the moment
    DecanRuler,
    Fallback,
}

/// Outcome of planet resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetChoice {
    pub planet: Planet,
    pub source: PlanetSource,
    /// Square order to use (Kamea only)
    pub order: Option<u8>,
    /// A caller override was discarded by strict mode
    pub override_rejected: bool,
}

/// Caller preferences for planet selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanetPolicy {
    pub mode: RulerMode,
    pub planet: Option<Planet>,
    pub order: Option<u8>,
}

impl PlanetPolicy {
    pub fn new(mode: RulerMode, planet: Option<Planet>, order: Option<u8>) -> Self {
        Self { mode, planet, order }
    }

    /// Whether resolving needs the rulers of the moment
    pub fn needs_rulers(&self, method: Method) -> bool {
        match method {
            Method::Kamea if self.mode == RulerMode::Strict => true,
            m if m.uses_planet() => self.planet.is_none() && self.order.is_none(),
            _ => false,
        }
    }

    /// Pick the governing planet, or `None` for methods without one
    pub fn choose(
        &self,
        method: Method,
        rulers: Option<&RulerAssignment>,
    ) -> Result<Option<PlanetChoice>> {
        match method {
            Method::Kamea if self.mode == RulerMode::Strict => self.strict(rulers).map(Some),
            Method::Kamea => self.flexible_kamea(rulers).map(Some),
            Method::Planetary => Ok(Some(self.flexible_planetary(rulers))),
            _ => Ok(None),
        }
    }

    fn strict(&self, rulers: Option<&RulerAssignment>) -> Result<PlanetChoice> {
        let rulers = rulers.ok_or_else(|| {
            Error::InvalidParameter("strict mode needs a location and time".into())
        })?;
        let planet = rulers.decan_ruler;
        let order = canonical_order(planet);

        let planet_rejected = self.planet.is_some_and(|p| p != planet);
        let order_rejected = self.order.is_some_and(|o| o != order);
        let override_rejected = planet_rejected || order_rejected;
        if override_rejected {
            tracing::warn!(
                requested_planet = ?self.planet,
                requested_order = ?self.order,
                decan_ruler = %planet,
                "strict mode: override discarded in favour of the decan ruler"
            );
        }

        Ok(PlanetChoice {
            planet,
            source: PlanetSource::DecanRuler,
            order: Some(order),
            override_rejected,
        })
    }

    fn flexible_kamea(&self, rulers: Option<&RulerAssignment>) -> Result<PlanetChoice> {
        let (planet, source) = match (self.planet, self.order) {
            (Some(planet), _) => (planet, PlanetSource::Requested),
            (None, Some(order)) => match planet_for_order(order) {
                Some(planet) => (planet, PlanetSource::Order),
                None => {
                    let (planet, _) = self.default_planet(rulers);
                    return Err(Error::UnsupportedOrder { planet, order });
                }
            },
            (None, None) => self.default_planet(rulers),
        };
        Ok(PlanetChoice {
            planet,
            source,
            order: Some(self.order.unwrap_or_else(|| canonical_order(planet))),
            override_rejected: false,
        })
    }

    fn flexible_planetary(&self, rulers: Option<&RulerAssignment>) -> PlanetChoice {
        let (planet, source) = match self.planet {
            Some(planet) => (planet, PlanetSource::Requested),
            None => self.default_planet(rulers),
        };
        PlanetChoice {
            planet,
            source,
            order: None,
            override_rejected: false,
        }
    }

    fn default_planet(&self, rulers: Option<&RulerAssignment>) -> (Planet, PlanetSource) {
        match rulers {
            Some(r) => (r.decan_ruler, PlanetSource::DecanRuler),
            None => (FALLBACK_PLANET, PlanetSource::Fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use sigil_astro::GeoLocation;

    fn midsummer_rulers() -> RulerAssignment {
        // decan ruler Venus
        let instant = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 25, 13, 0, 0)
            .unwrap();
        sigil_astro::resolve(&instant, &GeoLocation::new(51.5074, -0.1278)).unwrap()
    }

    #[test]
    fn test_strict_forces_decan_ruler() {
        let rulers = midsummer_rulers();
        let policy = PlanetPolicy::new(RulerMode::Strict, Some(Planet::Mars), None);
        let choice = policy.choose(Method::Kamea, Some(&rulers)).unwrap().unwrap();
        assert_eq!(choice.planet, Planet::Venus);
        assert_eq!(choice.order, Some(7));
        assert!(choice.override_rejected);
    }

    #[test]
    fn test_strict_agreeing_override_is_not_rejected() {
        let rulers = midsummer_rulers();
        let policy = PlanetPolicy::new(RulerMode::Strict, Some(Planet::Venus), Some(7));
        let choice = policy.choose(Method::Kamea, Some(&rulers)).unwrap().unwrap();
        assert!(!choice.override_rejected);
    }

    #[test]
    fn test_strict_order_conflict_is_rejected() {
        let rulers = midsummer_rulers();
        let policy = PlanetPolicy::new(RulerMode::Strict, None, Some(3));
        let choice = policy.choose(Method::Kamea, Some(&rulers)).unwrap().unwrap();
        assert_eq!(choice.order, Some(7));
        assert!(choice.override_rejected);
    }

    #[test]
    fn test_strict_without_rulers_fails() {
        let policy = PlanetPolicy::new(RulerMode::Strict, None, None);
        assert!(policy.needs_rulers(Method::Kamea));
        assert!(policy.choose(Method::Kamea, None).is_err());
    }

    #[test]
    fn test_flexible_honours_request() {
        let rulers = midsummer_rulers();
        let policy = PlanetPolicy::new(RulerMode::Flexible, Some(Planet::Saturn), None);
        assert!(!policy.needs_rulers(Method::Kamea));
        let choice = policy.choose(Method::Kamea, Some(&rulers)).unwrap().unwrap();
        assert_eq!(choice.planet, Planet::Saturn);
        assert_eq!(choice.order, Some(3));
        assert_eq!(choice.source, PlanetSource::Requested);
    }

    #[test]
    fn test_flexible_order_implies_planet() {
        let policy = PlanetPolicy::new(RulerMode::Flexible, None, Some(5));
        let choice = policy.choose(Method::Kamea, None).unwrap().unwrap();
        assert_eq!(choice.planet, Planet::Mars);
        assert_eq!(choice.source, PlanetSource::Order);

        let bad = PlanetPolicy::new(RulerMode::Flexible, None, Some(11));
        assert_eq!(
            bad.choose(Method::Kamea, None),
            Err(Error::UnsupportedOrder { planet: FALLBACK_PLANET, order: 11 })
        );
        let rulers = midsummer_rulers();
        assert_eq!(
            bad.choose(Method::Kamea, Some(&rulers)),
            Err(Error::UnsupportedOrder { planet: Planet::Venus, order: 11 })
        );
    }

    #[test]
    fn test_flexible_defaults() {
        let rulers = midsummer_rulers();
        let policy = PlanetPolicy::default();
        assert!(policy.needs_rulers(Method::Planetary));

        let choice = policy.choose(Method::Planetary, Some(&rulers)).unwrap().unwrap();
        assert_eq!(choice.planet, Planet::Venus);
        assert_eq!(choice.source, PlanetSource::DecanRuler);

        let choice = policy.choose(Method::Planetary, None).unwrap().unwrap();
        assert_eq!(choice.planet, FALLBACK_PLANET);
        assert_eq!(choice.source, PlanetSource::Fallback);
    }

    #[test]
    fn test_methods_without_planet() {
        let policy = PlanetPolicy::new(RulerMode::Strict, Some(Planet::Sun), None);
        for method in [Method::Classical, Method::Numeric, Method::Rosicrucian] {
            assert!(!policy.needs_rulers(method));
            assert_eq!(policy.choose(method, None).unwrap(), None);
        }
    }
}
