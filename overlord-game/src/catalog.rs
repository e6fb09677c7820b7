//! Static content tables: the planets of the galaxy and the visitor pool.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::constants::RESERVED_VISITOR_IDS;
use crate::data::{Conditions, Planet, SpecialEffect, Visitor};

const BUNDLED_PLANETS: &str = include_str!("../assets/planets.json");
const BUNDLED_VISITORS: &str = include_str!("../assets/visitors.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse {table} table: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("catalog contains no planets")]
    NoPlanets,
    #[error("duplicate planet id `{0}`")]
    DuplicatePlanet(String),
    #[error("duplicate visitor id `{0}`")]
    DuplicateVisitor(String),
    #[error("visitor `{0}` has no options")]
    NoOptions(String),
    #[error("visitor `{0}` has a zero selection weight")]
    ZeroWeight(String),
    #[error("visitor id `{0}` is reserved for engine-built visitors")]
    ReservedVisitor(String),
    #[error("visitor `{visitor}` references unknown planet `{planet}`")]
    UnknownPlanet { visitor: String, planet: String },
}

/// Immutable planet and visitor tables shared by every reign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Catalog {
    pub planets: Vec<Planet>,
    pub visitors: Vec<Visitor>,
}

impl Catalog {
    /// Build a catalog from already-parsed tables.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the tables are inconsistent.
    pub fn new(planets: Vec<Planet>, visitors: Vec<Visitor>) -> Result<Self, CatalogError> {
        let catalog = Self { planets, visitors };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse the planet and visitor JSON tables.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if either table fails to parse or validate.
    pub fn from_json(planets_json: &str, visitors_json: &str) -> Result<Self, CatalogError> {
        let planets = serde_json::from_str(planets_json).map_err(|source| CatalogError::Parse {
            table: "planets",
            source,
        })?;
        let visitors =
            serde_json::from_str(visitors_json).map_err(|source| CatalogError::Parse {
                table: "visitors",
                source,
            })?;
        Self::new(planets, visitors)
    }

    /// The content shipped with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled assets are malformed.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_PLANETS, BUNDLED_VISITORS)
    }

    #[must_use]
    pub fn visitor(&self, id: &str) -> Option<&Visitor> {
        self.visitors.iter().find(|visitor| visitor.id == id)
    }

    #[must_use]
    pub fn planet(&self, id: &str) -> Option<&Planet> {
        self.planets.iter().find(|planet| planet.id == id)
    }

    /// Check ids are unique, none shadows an engine-built visitor and every
    /// planet reference resolves.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.planets.is_empty() {
            return Err(CatalogError::NoPlanets);
        }
        let mut planet_ids = HashSet::new();
        for planet in &self.planets {
            if !planet_ids.insert(planet.id.as_str()) {
                return Err(CatalogError::DuplicatePlanet(planet.id.clone()));
            }
        }

        let mut visitor_ids = HashSet::new();
        for visitor in &self.visitors {
            if !visitor_ids.insert(visitor.id.as_str()) {
                return Err(CatalogError::DuplicateVisitor(visitor.id.clone()));
            }
            if RESERVED_VISITOR_IDS.contains(&visitor.id.as_str()) {
                return Err(CatalogError::ReservedVisitor(visitor.id.clone()));
            }
            if visitor.options.is_empty() {
                return Err(CatalogError::NoOptions(visitor.id.clone()));
            }
            if visitor.weight == 0 {
                return Err(CatalogError::ZeroWeight(visitor.id.clone()));
            }
            for planet in referenced_planets(visitor) {
                if !planet_ids.contains(planet) {
                    return Err(CatalogError::UnknownPlanet {
                        visitor: visitor.id.clone(),
                        planet: planet.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn referenced_planets(visitor: &Visitor) -> Vec<&str> {
    let mut refs = Vec::new();
    if let Some(Conditions {
        requires_owned_planet,
        requires_planet_not_owned,
        ..
    }) = &visitor.conditions
    {
        refs.extend(requires_owned_planet.as_deref());
        refs.extend(requires_planet_not_owned.as_deref());
    }
    for option in &visitor.options {
        refs.extend(option.effects.add_planet.as_deref());
        match &option.effects.special {
            Some(SpecialEffect::StartWar {
                defended_planet,
                enemy_planet,
                ..
            }) => {
                refs.extend(defended_planet.as_deref());
                refs.extend(enemy_planet.as_deref());
            }
            Some(SpecialEffect::Surrender { planet }) => refs.push(planet.as_str()),
            _ => {}
        }
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CATALOG_BOUNTY_HUNTER;

    const PLANETS: &str = r#"[
        { "id": "home", "name": "Home", "owned": true },
        { "id": "far", "name": "Far" }
    ]"#;

    #[test]
    fn bundled_content_loads() {
        let catalog = Catalog::bundled().expect("bundled content is valid");
        assert!(catalog.planets.len() >= 2);
        assert!(catalog.planets.iter().any(|planet| planet.owned));
        assert!(catalog.planets.iter().any(|planet| !planet.owned));
        assert!(catalog.visitor(CATALOG_BOUNTY_HUNTER).is_some());
    }

    #[test]
    fn rejects_unknown_planet_reference() {
        let visitors = r#"[{
            "id": "merchant", "name": "Merchant", "sprite": "m.png", "text": "Buy?",
            "options": [{ "id": "buy", "text": "Yes", "effects": { "add_planet": "nowhere" } }]
        }]"#;
        let err = Catalog::from_json(PLANETS, visitors).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownPlanet { ref planet, .. } if planet == "nowhere"));
    }

    #[test]
    fn rejects_duplicates_and_empty_options() {
        let dup = r#"[
            { "id": "a", "name": "A", "sprite": "a.png", "text": "", "options": [{ "id": "o", "text": "o" }] },
            { "id": "a", "name": "A", "sprite": "a.png", "text": "", "options": [{ "id": "o", "text": "o" }] }
        ]"#;
        assert!(matches!(
            Catalog::from_json(PLANETS, dup),
            Err(CatalogError::DuplicateVisitor(id)) if id == "a"
        ));

        let empty = r#"[{ "id": "a", "name": "A", "sprite": "a.png", "text": "", "options": [] }]"#;
        assert!(matches!(
            Catalog::from_json(PLANETS, empty),
            Err(CatalogError::NoOptions(_))
        ));
    }

    #[test]
    fn rejects_engine_reserved_ids() {
        for reserved in ["tax_collector", "jester_entertainment", "war_general"] {
            let visitors = format!(
                r#"[{{ "id": "{reserved}", "name": "X", "sprite": "x.png", "text": "", "options": [{{ "id": "o", "text": "o" }}] }}]"#
            );
            assert!(matches!(
                Catalog::from_json(PLANETS, &visitors),
                Err(CatalogError::ReservedVisitor(id)) if id == reserved
            ));
        }
    }

    #[test]
    fn parse_errors_name_the_table() {
        let err = Catalog::from_json("[", "[]").unwrap_err();
        assert!(err.to_string().contains("planets"));
        let err = Catalog::from_json(PLANETS, "{").unwrap_err();
        assert!(err.to_string().contains("visitors"));
    }

    #[test]
    fn empty_planet_table_is_rejected() {
        assert!(matches!(
            Catalog::from_json("[]", "[]"),
            Err(CatalogError::NoPlanets)
        ));
    }
}
