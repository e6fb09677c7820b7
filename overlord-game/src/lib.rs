//! Duck Overlord Game Engine
//!
//! Platform-agnostic core logic for the Duck Overlord court simulation: visitor
//! selection, option effects, wars, and the day cycle. Rendering, audio and
//! `{user}` text substitution belong to the presentation layer.

pub mod catalog;
pub mod conditions;
pub mod config;
pub mod constants;
pub mod data;
pub mod day_cycle;
pub mod effects;
pub mod engine;
pub mod numbers;
pub mod result;
pub mod scripted;
pub mod selector;
pub mod session;
pub mod state;
pub mod war;

use std::path::PathBuf;
use thiserror::Error;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError};
pub use conditions::matches;
pub use config::{ConfigError, EngineConfig};
pub use data::{CampaignKind, Conditions, Effects, Planet, SpecialEffect, Visitor, VisitorOption};
pub use engine::{Action, Engine, Rejection};
pub use result::{Ending, check_terminal};
pub use selector::{Guard, Selection, choose_weighted, select_visitor};
pub use session::{GameSession, StateObserver};
pub use state::{
    ActiveEncounter, BountyContract, DaySummary, GameOver, GameState, Gender, Player, ScienceStep,
    SummaryPhase,
};
pub use war::{WarPlan, WarReport, resolve_war, win_probability};

/// Trait for abstracting content loading.
/// Platform-specific front ends provide their own source.
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the planet and visitor tables
    ///
    /// # Errors
    ///
    /// Returns an error if the tables cannot be read or are inconsistent.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;

    /// Load balance configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read or parsed.
    fn load_config(&self) -> Result<EngineConfig, Self::Error>;
}

/// Failure while loading content from any [`DataLoader`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Content compiled into the crate with default balance.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledContent;

impl DataLoader for BundledContent {
    type Error = LoadError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Ok(Catalog::bundled()?)
    }

    fn load_config(&self) -> Result<EngineConfig, Self::Error> {
        Ok(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Default)]
    struct FixtureLoader;

    impl DataLoader for FixtureLoader {
        type Error = LoadError;

        fn load_catalog(&self) -> Result<Catalog, Self::Error> {
            Ok(Catalog::new(
                vec![Planet {
                    id: "solo".to_string(),
                    name: "Solo".to_string(),
                    owned: true,
                }],
                Vec::new(),
            )?)
        }

        fn load_config(&self) -> Result<EngineConfig, Self::Error> {
            Ok(EngineConfig::from_json(r#"{ "start": { "coins": 42 } }"#)?)
        }
    }

    #[test]
    fn bundled_content_builds_an_engine() {
        let engine = Engine::from_loader(&BundledContent).expect("bundled engine");
        assert!(!engine.catalog().visitors.is_empty());
        assert_eq!(engine.initial_state().player.coins, 100);
    }

    #[test]
    fn custom_loader_feeds_the_engine() {
        let engine = Engine::from_loader(&FixtureLoader).unwrap();
        let state = engine.initial_state();
        assert_eq!(state.player.coins, 42);
        assert_eq!(state.total_planets(), 1);
    }

    #[test]
    fn load_errors_wrap_their_source() {
        let err: LoadError = Catalog::from_json("[]", "[]").unwrap_err().into();
        assert!(matches!(err, LoadError::Catalog(CatalogError::NoPlanets)));
    }
}
